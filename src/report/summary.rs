// The JSON summary of an election: the ballot tree, and for each contest the
// reporting status, the totals of the detailed results and the RCV outcome.

use serde_json::json;
use serde_json::Map as JSMap;

use crate::report::*;

fn ballot_item_js(election: &Election, key: BallotItemKey) -> JSValue {
    match key {
        BallotItemKey::Header(pos) => {
            let (id, children) = match election.headers.at(pos) {
                Some(h) => (h.id.as_str(), h.children.as_slice()),
                None => ("", &[][..]),
            };
            let items: Vec<JSValue> = children
                .iter()
                .map(|k| ballot_item_js(election, *k))
                .collect();
            json!({"header": id, "items": items})
        }
        BallotItemKey::Contest(_) => json!({ "contest": election.item_id(key) }),
    }
}

fn column_total(contest: &Contest, results: &ContestResults, col: usize) -> ReportResult<i64> {
    let mut total: i64 = 0;
    for x in results.rows.iter().filter_map(|r| r.get(col)) {
        total = match total.checked_add(*x) {
            Some(t) => t,
            None => whatever!(
                "contest {}: the total of column {} overflows",
                contest.id,
                col
            ),
        };
    }
    Ok(total)
}

/// Sums the columns of the rows of detailed results, by stat id and by
/// choice id.
fn totals_js(contest: &Contest, results: &ContestResults) -> ReportResult<JSValue> {
    let mapping = &contest.results_mapping;
    let mut totals: JSMap<String, JSValue> = JSMap::new();
    for (idx, stat_id) in mapping.stat_ids.iter().enumerate() {
        totals.insert(stat_id.clone(), json!(column_total(contest, results, idx)?));
    }
    for (idx, choice_id) in contest.choices.ids().iter().enumerate() {
        let total = column_total(contest, results, mapping.choice_index(idx))?;
        totals.insert(choice_id.to_string(), json!(total));
    }
    Ok(JSValue::Object(totals))
}

fn rcv_js(contest: &Contest, continuing_stat_id: &str) -> ReportResult<JSValue> {
    let rcv = RcvResults::new(contest, continuing_stat_id).context(SummarizingSnafu {
        contest_id: contest.id.clone(),
    })?;
    let order: Vec<JSValue> = rcv
        .candidate_order()
        .iter()
        .map(|(candidate, max_round)| {
            json!({
                "candidate": candidate.id,
                "round": max_round.round_num,
                "votes": max_round.votes,
                "percent": max_round.percent().map(|p| format!("{:.2}", p)),
            })
        })
        .collect();
    Ok(json!({"rounds": rcv.round_count(), "order": order}))
}

fn contest_js(
    graph: &ElectionGraph,
    contest: &Contest,
    continuing_stat_id: &str,
) -> ReportResult<JSValue> {
    let mut js = json!({
        "id": contest.id,
        "type": contest.kind.type_name(),
        "resultStyle": contest.result_style_id,
        "votingDistrict": contest.voting_district_id,
        "choices": contest.choices.ids(),
        "reportingGroups": contest.reporting_group_count(),
        "precinctsReporting": contest.precincts_reporting,
        "totalPrecincts": contest.total_precincts,
        "reportingTime": contest
            .reporting_time
            .map(|t| t.format(DATE_TIME_FORMAT).to_string()),
    });
    if let Some(results) = &contest.results {
        js["totals"] = totals_js(contest, results)?;
        let is_rcv = graph
            .result_style_of(contest)
            .and_then(|s| s.is_rcv)
            .unwrap_or(false);
        if is_rcv && !results.rcv_totals.is_empty() {
            js["rcv"] = rcv_js(contest, continuing_stat_id)?;
        }
    }
    Ok(js)
}

pub fn build_summary(graph: &ElectionGraph, continuing_stat_id: &str) -> ReportResult<JSValue> {
    let election = &graph.election;
    let ballot: Vec<JSValue> = election
        .roots()
        .iter()
        .map(|k| ballot_item_js(election, *k))
        .collect();
    let mut contests: Vec<JSValue> = Vec::new();
    for contest in election.contests.iter() {
        contests.push(contest_js(graph, contest, continuing_stat_id)?);
    }
    debug!("build_summary: {} contests", contests.len());
    Ok(json!({
        "election": {
            "ballotTitle": election.ballot_title,
            "date": election.date.map(|d| d.format(DATE_FORMAT).to_string()),
            "area": election.election_area,
        },
        "ballot": ballot,
        "contests": contests,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::fixtures::*;

    fn loaded_graph(name: &str) -> ElectionGraph {
        let dir = write_input_dir(name);
        let config = ReportConfig {
            input_directory: Some(display_path(&dir)),
            ..ReportConfig::default()
        };
        let paths = ReportPaths::from_config(&config).unwrap();
        load_election(&config, &paths).unwrap()
    }

    #[test]
    fn ballot_tree() {
        let graph = build_graph(election_json(), None).unwrap();
        let summary = build_summary(&graph, "RSCnt").unwrap();
        assert_eq!(
            summary["ballot"],
            json!([
                {"header": "H1", "items": [{"contest": "C1"}]},
                {"contest": "M1"}
            ])
        );
        assert_eq!(summary["election"]["date"], "2018-06-05");
        // Nothing loaded besides the election file.
        assert!(summary["contests"][0].get("totals").is_none());
        assert_eq!(summary["contests"][0]["precinctsReporting"], JSValue::Null);
    }

    #[test]
    fn contest_totals() {
        let graph = loaded_graph("summary_contest_totals");
        let summary = build_summary(&graph, "RSCnt").unwrap();
        let m1 = &summary["contests"][1];
        assert_eq!(m1["totals"], json!({"RSReg": 3600, "RSCst": 1550, "M1Y": 1100, "M1N": 450}));
        assert_eq!(m1["precinctsReporting"], 1);
        assert!(m1.get("rcv").is_none());
        let c1 = &summary["contests"][0];
        assert_eq!(c1["totals"]["101"], 450);
        assert_eq!(c1["reportingTime"], "2018-06-06 01:15:00");
    }

    #[test]
    fn rcv_outcome() {
        let graph = loaded_graph("summary_rcv_outcome");
        let summary = build_summary(&graph, "RSCnt").unwrap();
        assert_eq!(
            summary["contests"][0]["rcv"],
            json!({
                "rounds": 2,
                "order": [
                    {"candidate": "101", "round": 2, "votes": 500, "percent": "52.63"},
                    {"candidate": "102", "round": 2, "votes": 450, "percent": "47.37"},
                    {"candidate": "103", "round": 1, "votes": 150, "percent": "15.00"}
                ]
            })
        );
    }

    #[test]
    fn overflowing_totals() {
        let mut graph = build_graph(election_json(), None).unwrap();
        let big = "5000000000000000000";
        let header: Vec<String> = ["RGid", "VGid", "RSReg", "RSCst", "M1Y", "M1N"]
            .iter()
            .map(|x| x.to_string())
            .collect();
        let mut rows: Vec<Vec<String>> = Vec::new();
        for area in ["P1", "P2"] {
            for group in ["EV", "MV"] {
                let mut row = vec![area.to_string(), group.to_string()];
                row.extend(std::iter::repeat(big.to_string()).take(4));
                rows.push(row);
            }
        }
        graph
            .election
            .load_contest_results("M1", &header, rows)
            .unwrap();
        let res = build_summary(&graph, "RSCnt");
        assert!(matches!(res, Err(ReportError::Whatever { ref message, .. }) if message.contains("M1")));
    }

    #[test]
    fn unknown_continuing_stat() {
        let graph = loaded_graph("summary_unknown_stat");
        let res = build_summary(&graph, "RSOvr");
        assert!(matches!(
            res,
            Err(ReportError::Summarizing { ref contest_id, .. }) if contest_id == "C1"
        ));
    }
}
