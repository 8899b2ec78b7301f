// ********* RCV rounds ***********
//
// Views over the RCV rows of a contest. Each row is one round, first round
// first, laid out as described by the results mapping of the contest.

use std::cmp::Reverse;
use std::collections::HashMap;

use log::debug;

use crate::error::*;
use crate::model::*;
use crate::registry::*;

/// The standing of a candidate at the end of one round.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct CandidateRound {
    /// 1-based.
    pub round_num: usize,
    pub votes: i64,
    /// The difference with the previous round, wide enough for any two
    /// totals.
    pub transfer: i128,
    /// The continuing ballots of the round.
    pub continuing: i64,
    /// Placeholder round following the elimination of the candidate. It
    /// carries the negative transfer of the eliminated votes.
    pub after_eliminated: bool,
}

impl CandidateRound {
    pub fn percent(&self) -> Option<f64> {
        if self.continuing == 0 {
            None
        } else {
            Some(100.0 * (self.votes as f64) / (self.continuing as f64))
        }
    }
}

pub struct RcvResults<'a> {
    candidates: &'a IdRegistry<Candidate>,
    mapping: &'a ResultsMapping,
    rcv_totals: &'a [Vec<Option<i64>>],
    continuing_index: usize,
}

impl<'a> RcvResults<'a> {
    /// The RCV results of a contest. The contest must have candidates.
    /// Without detailed results, there are no rounds.
    pub fn new(contest: &'a Contest, continuing_stat_id: &str) -> LoadResult<RcvResults<'a>> {
        let candidates = match &contest.choices {
            ContestChoices::Candidates(c) => c,
            ContestChoices::Choices(_) => {
                return Err(LoadError::StructuralMismatch {
                    entity: "Contest",
                    id: contest.id.clone(),
                    message: format!("a {} contest has no candidates", contest.kind.type_name()),
                })
            }
        };
        let rcv_totals: &[Vec<Option<i64>>] = match &contest.results {
            Some(r) => &r.rcv_totals,
            None => &[],
        };
        RcvResults::from_parts(
            candidates,
            &contest.results_mapping,
            rcv_totals,
            continuing_stat_id,
        )
        .map_err(|e| match e {
            LoadError::DanglingReference {
                entity,
                attr,
                missing,
                ..
            } => LoadError::DanglingReference {
                entity,
                id: Some(contest.id.clone()),
                attr,
                missing,
            },
            e => e,
        })
    }

    pub fn from_parts(
        candidates: &'a IdRegistry<Candidate>,
        mapping: &'a ResultsMapping,
        rcv_totals: &'a [Vec<Option<i64>>],
        continuing_stat_id: &str,
    ) -> LoadResult<RcvResults<'a>> {
        let continuing_index =
            mapping
                .stat_index(continuing_stat_id)
                .ok_or_else(|| LoadError::DanglingReference {
                    entity: "Contest",
                    id: None,
                    attr: "continuing_stat",
                    missing: continuing_stat_id.to_string(),
                })?;
        Ok(RcvResults {
            candidates,
            mapping,
            rcv_totals,
            continuing_index,
        })
    }

    pub fn round_count(&self) -> usize {
        self.rcv_totals.len()
    }

    fn cell(&self, round_num: usize, column: usize) -> Option<i64> {
        if round_num == 0 {
            return None;
        }
        self.rcv_totals
            .get(round_num - 1)
            .and_then(|row| row.get(column))
            .cloned()
            .flatten()
    }

    pub fn continuing_total(&self, round_num: usize) -> Option<i64> {
        self.cell(round_num, self.continuing_index)
    }

    /// `None` once the candidate is eliminated.
    pub fn candidate_total(&self, candidate: &Candidate, round_num: usize) -> Option<i64> {
        self.cell(round_num, self.mapping.choice_index(candidate.index))
    }

    /// The history of a candidate, stopping at the round following their
    /// elimination.
    pub fn candidate_rounds(&self, candidate: &Candidate) -> Vec<CandidateRound> {
        let mut rounds: Vec<CandidateRound> = Vec::new();
        let mut prev_total = 0;
        for round_num in 1..=self.round_count() {
            let (votes, after_eliminated) = match self.candidate_total(candidate, round_num) {
                Some(x) => (x, false),
                None => (0, true),
            };
            rounds.push(CandidateRound {
                round_num,
                votes,
                transfer: i128::from(votes) - i128::from(prev_total),
                continuing: self.continuing_total(round_num).unwrap_or(0),
                after_eliminated,
            });
            if after_eliminated {
                break;
            }
            prev_total = votes;
        }
        rounds
    }

    /// The last round reached by a candidate. The placeholder round after
    /// the elimination does not count, unless the candidate was eliminated
    /// in the first round.
    pub fn find_max_round(&self, candidate: &Candidate) -> Option<CandidateRound> {
        let mut rounds = self.candidate_rounds(candidate);
        if rounds.len() > 1 && rounds.last().map(|r| r.after_eliminated) == Some(true) {
            rounds.pop();
        }
        rounds.pop()
    }

    pub fn compute_max_rounds(&self) -> HashMap<String, CandidateRound> {
        self.candidates
            .iter()
            .filter_map(|c| self.find_max_round(c).map(|r| (c.id.clone(), r)))
            .collect()
    }

    /// The candidates with their max round, starting with the winner: by
    /// max round, then by votes in that round, then by id.
    pub fn candidate_order(&self) -> Vec<(&'a Candidate, CandidateRound)> {
        let mut res: Vec<(&'a Candidate, CandidateRound)> = self
            .candidates
            .iter()
            .filter_map(|c| self.find_max_round(c).map(|r| (c, r)))
            .collect();
        res.sort_by_key(|(c, r)| (Reverse(r.round_num), Reverse(r.votes), c.id.clone()));
        debug!(
            "candidate_order: {:?}",
            res.iter().map(|(c, r)| (&c.id, r.round_num, r.votes)).collect::<Vec<_>>()
        );
        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_data::*;

    fn candidates() -> IdRegistry<Candidate> {
        let cands = ["101", "102", "103", "104"].iter().map(|id| Candidate {
            id: id.to_string(),
            contest_id: "C1".to_string(),
            ballot_title: None,
            ballot_designation: None,
            candidate_party: None,
            index: 0,
        });
        IdRegistry::build(cands, Indexing::Indexed).unwrap()
    }

    fn mapping() -> ResultsMapping {
        ResultsMapping {
            stat_ids: vec!["RSCst".to_string(), "RSCnt".to_string()],
            choice_count: 4,
        }
    }

    #[test]
    fn round_history() {
        let (cands, mapping, totals) = (candidates(), mapping(), sample_rcv_totals());
        let rcv = RcvResults::from_parts(&cands, &mapping, &totals, "RSCnt").unwrap();
        let alice = cands.get("101").unwrap();
        let rounds = rcv.candidate_rounds(alice);
        assert_eq!(rounds.len(), 3);
        assert_eq!((rounds[0].votes, rounds[0].transfer), (600, 600));
        assert_eq!((rounds[1].votes, rounds[1].transfer), (650, 50));
        assert_eq!((rounds[2].votes, rounds[2].transfer), (0, -650));
        assert!(rounds[2].after_eliminated);
        assert!(!rounds[1].after_eliminated);
        assert_eq!(rounds[1].continuing, 1900);
        assert_eq!(rcv.find_max_round(alice).unwrap().round_num, 2);
    }

    #[test]
    fn totals_and_percent() {
        let (cands, mapping, totals) = (candidates(), mapping(), sample_rcv_totals());
        let rcv = RcvResults::from_parts(&cands, &mapping, &totals, "RSCnt").unwrap();
        let bob = cands.get("102").unwrap();
        assert_eq!(rcv.candidate_total(bob, 2), Some(820));
        assert_eq!(rcv.continuing_total(3), Some(1850));
        assert_eq!(rcv.candidate_total(cands.get("104").unwrap(), 2), None);
        let round = &rcv.candidate_rounds(bob)[1];
        assert_eq!(round.transfer, 20);
        let percent = round.percent().unwrap();
        assert!((percent - 43.1578947).abs() < 1e-6);
    }

    #[test]
    fn max_rounds() {
        let (cands, mapping, totals) = (candidates(), mapping(), sample_rcv_totals());
        let rcv = RcvResults::from_parts(&cands, &mapping, &totals, "RSCnt").unwrap();
        let max_rounds = rcv.compute_max_rounds();
        let reached: Vec<usize> = ["101", "102", "103", "104"]
            .iter()
            .map(|id| max_rounds[*id].round_num)
            .collect();
        assert_eq!(reached, vec![2, 3, 3, 1]);
    }

    #[test]
    fn winner_first() {
        let (cands, mapping, totals) = (candidates(), mapping(), sample_rcv_totals());
        let rcv = RcvResults::from_parts(&cands, &mapping, &totals, "RSCnt").unwrap();
        let order: Vec<&str> = rcv
            .candidate_order()
            .iter()
            .map(|(c, _)| c.id.as_str())
            .collect();
        assert_eq!(order, vec!["102", "103", "101", "104"]);
    }

    #[test]
    fn ties_broken_by_id() {
        let cands = candidates();
        let mapping = mapping();
        let totals = vec![vec![Some(100), Some(100), Some(25), Some(25), Some(25), Some(25)]];
        let rcv = RcvResults::from_parts(&cands, &mapping, &totals, "RSCnt").unwrap();
        let order: Vec<&str> = rcv
            .candidate_order()
            .iter()
            .map(|(c, _)| c.id.as_str())
            .collect();
        assert_eq!(order, vec!["101", "102", "103", "104"]);
    }

    #[test]
    fn eliminated_in_first_round() {
        let cands = candidates();
        let mapping = mapping();
        let totals = vec![vec![Some(100), Some(100), Some(50), Some(50), None, None]];
        let rcv = RcvResults::from_parts(&cands, &mapping, &totals, "RSCnt").unwrap();
        let max = rcv.find_max_round(cands.get("103").unwrap()).unwrap();
        assert_eq!(max.round_num, 1);
        assert!(max.after_eliminated);
    }

    #[test]
    fn extreme_totals() {
        let cands = candidates();
        let mapping = mapping();
        let totals = vec![
            vec![Some(1), Some(1), Some(i64::MIN), Some(0), Some(0), Some(0)],
            vec![Some(1), Some(1), Some(i64::MAX), Some(0), Some(0), Some(0)],
        ];
        let rcv = RcvResults::from_parts(&cands, &mapping, &totals, "RSCnt").unwrap();
        let rounds = rcv.candidate_rounds(cands.get("101").unwrap());
        assert_eq!(rounds[0].transfer, i128::from(i64::MIN));
        assert_eq!(rounds[1].transfer, i128::from(i64::MAX) - i128::from(i64::MIN));
    }

    #[test]
    fn unknown_continuing_stat() {
        let (cands, mapping, totals) = (candidates(), mapping(), sample_rcv_totals());
        let res = RcvResults::from_parts(&cands, &mapping, &totals, "RSOvr");
        assert!(matches!(
            res,
            Err(LoadError::DanglingReference { ref missing, .. }) if missing == "RSOvr"
        ));
    }

    #[test]
    fn measures_have_no_rcv() {
        let graph = crate::builder::build_graph(sample_root(), None).unwrap();
        let m1 = graph.election.contests.get("M1").unwrap();
        assert!(matches!(
            RcvResults::new(m1, "RSCnt"),
            Err(LoadError::StructuralMismatch { .. })
        ));
        let c1 = graph.election.contests.get("C1").unwrap();
        assert_eq!(RcvResults::new(c1, "RSCnt").unwrap().round_count(), 0);
    }
}
