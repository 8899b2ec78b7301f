// ********* Election data model ***********
//
// The entities below are only ever created by the loaders. References
// between entities are stored as ids (for the global tables) or as
// registry positions (for the ballot item tree).

use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value as JSValue;

use crate::registry::*;

/// A translatable text. Translations are not resolved by the loader: the
/// value is kept as it appears in the input.
pub type I18nText = JSValue;

#[derive(PartialEq, Debug, Clone)]
pub struct ResultStatType {
    pub id: String,
    pub heading: Option<I18nText>,
    pub is_percent: Option<bool>,
}

/// A reporting dimension, for example vote-by-mail vs. in person.
#[derive(PartialEq, Debug, Clone)]
pub struct VotingGroup {
    pub id: String,
    pub heading: Option<I18nText>,
}

/// Which statistics and voting groups apply to a contest.
#[derive(PartialEq, Debug, Clone)]
pub struct ResultStyle {
    pub id: String,
    pub description: Option<I18nText>,
    pub is_rcv: Option<bool>,
    /// Ids into the voting group registry, in declaration order.
    pub voting_group_ids: Vec<String>,
    /// Ids into the result stat type registry, in column order.
    pub result_stat_type_ids: Vec<String>,
}

impl ResultStyle {
    pub fn voting_group_index(&self, voting_group_id: &str) -> Option<usize> {
        self.voting_group_ids
            .iter()
            .position(|x| x == voting_group_id)
    }

    pub fn stat_count(&self) -> usize {
        self.result_stat_type_ids.len()
    }
}

/// A geographic or administrative reporting unit.
#[derive(PartialEq, Debug, Clone)]
pub struct Area {
    pub id: String,
    pub classification: Option<JSValue>,
    pub name: Option<I18nText>,
    pub short_name: Option<I18nText>,
    pub is_vbm: Option<bool>,
    pub consolidated_ids: Option<JSValue>,
    /// The areas reported on separately for contests in this district.
    pub reporting_group_ids: Vec<String>,
}

/// A grouping node in the ballot item tree.
#[derive(PartialEq, Debug, Clone)]
pub struct Header {
    pub id: String,
    pub ballot_title: Option<I18nText>,
    pub classification: Option<JSValue>,
    /// The declared parent, as read from the input.
    pub parent_header_id: Option<String>,
    pub index: usize,
    /// Position of the parent in the header registry, once linked.
    pub parent: Option<usize>,
    pub children: Vec<BallotItemKey>,
}

/// The address of a ballot item in the election registries.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum BallotItemKey {
    Header(usize),
    Contest(usize),
}

#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum ContestKind {
    /// An election for an office, with candidates.
    Office,
    /// A ballot measure, with choices.
    Measure,
    /// A yes/no retention vote for an office, with choices.
    YesNoOffice,
}

impl ContestKind {
    pub fn from_type_name(name: &str) -> Option<ContestKind> {
        match name {
            "office" => Some(ContestKind::Office),
            "measure" => Some(ContestKind::Measure),
            "ynoffice" => Some(ContestKind::YesNoOffice),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            ContestKind::Office => "office",
            ContestKind::Measure => "measure",
            ContestKind::YesNoOffice => "ynoffice",
        }
    }

    pub fn has_candidates(&self) -> bool {
        matches!(self, ContestKind::Office)
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct Choice {
    pub id: String,
    pub contest_id: String,
    pub ballot_title: Option<I18nText>,
    pub index: usize,
}

#[derive(PartialEq, Debug, Clone)]
pub struct Candidate {
    pub id: String,
    pub contest_id: String,
    pub ballot_title: Option<I18nText>,
    pub ballot_designation: Option<I18nText>,
    pub candidate_party: Option<I18nText>,
    pub index: usize,
}

/// The selections of a contest. Offices have candidates, the other contest
/// kinds have plain choices.
#[derive(PartialEq, Debug, Clone)]
pub enum ContestChoices {
    Candidates(IdRegistry<Candidate>),
    Choices(IdRegistry<Choice>),
}

impl ContestChoices {
    pub fn len(&self) -> usize {
        match self {
            ContestChoices::Candidates(r) => r.len(),
            ContestChoices::Choices(r) => r.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn ids(&self) -> Vec<&str> {
        match self {
            ContestChoices::Candidates(r) => r.iter().map(|c| c.id.as_str()).collect(),
            ContestChoices::Choices(r) => r.iter().map(|c| c.id.as_str()).collect(),
        }
    }

    pub fn candidates(&self) -> Option<&IdRegistry<Candidate>> {
        match self {
            ContestChoices::Candidates(r) => Some(r),
            ContestChoices::Choices(_) => None,
        }
    }
}

/// The column layout of a row of detailed results: the statistics of the
/// result style first, then one column per choice in declaration order.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ResultsMapping {
    pub stat_ids: Vec<String>,
    pub choice_count: usize,
}

impl ResultsMapping {
    pub fn stat_index(&self, stat_id: &str) -> Option<usize> {
        self.stat_ids.iter().position(|x| x == stat_id)
    }

    /// The column of a choice, given its index in the contest.
    pub fn choice_index(&self, choice_index: usize) -> usize {
        self.stat_ids.len() + choice_index
    }

    pub fn stat_count(&self) -> usize {
        self.stat_ids.len()
    }

    pub fn column_count(&self) -> usize {
        self.stat_ids.len() + self.choice_count
    }
}

/// A row dimension of the detailed results of a contest.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ReportingGroup {
    pub area_id: String,
    pub voting_group_id: String,
}

/// The detailed results of a contest, as read from its results file.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct ContestResults {
    /// One row per RCV round, first round first. An empty cell is a
    /// candidate who is no longer running.
    pub rcv_totals: Vec<Vec<Option<i64>>>,
    /// One row per reporting group.
    pub rows: Vec<Vec<i64>>,
}

#[derive(PartialEq, Debug, Clone)]
pub struct Contest {
    pub id: String,
    pub kind: ContestKind,
    pub ballot_subtitle: Option<I18nText>,
    pub ballot_title: Option<I18nText>,
    pub choice_names: Option<JSValue>,
    pub choices: ContestChoices,
    pub choice_count: usize,
    pub parent_header_id: Option<String>,
    pub instructions_text: Option<JSValue>,
    pub is_partisan: Option<JSValue>,
    pub number_elected: Option<JSValue>,
    pub question_text: Option<JSValue>,
    pub result_style_id: String,
    pub results_mapping: ResultsMapping,
    pub voting_district_id: Option<String>,
    pub reporting_groups: Vec<ReportingGroup>,
    pub type_name: Option<JSValue>,
    pub vote_for_msg: Option<JSValue>,
    pub writeins_allowed: Option<i64>,
    pub index: usize,
    pub parent: Option<usize>,
    // Set by the contest status overlay.
    pub reporting_time: Option<NaiveDateTime>,
    pub total_precincts: Option<i64>,
    pub precincts_reporting: Option<i64>,
    pub rcv_rounds: Option<i64>,
    // Set when the detailed results are loaded.
    pub results: Option<ContestResults>,
}

impl Contest {
    pub fn result_stat_count(&self) -> usize {
        self.results_mapping.stat_count()
    }

    pub fn reporting_group_count(&self) -> usize {
        self.reporting_groups.len()
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct Election {
    pub ballot_title: Option<I18nText>,
    pub date: Option<NaiveDate>,
    pub election_area: Option<I18nText>,
    pub headers: IdRegistry<Header>,
    pub contests: IdRegistry<Contest>,
}

impl Election {
    /// The ballot items without a parent header, headers first.
    pub fn roots(&self) -> Vec<BallotItemKey> {
        let headers = self
            .headers
            .iter()
            .enumerate()
            .filter(|(_, h)| h.parent.is_none())
            .map(|(pos, _)| BallotItemKey::Header(pos));
        let contests = self
            .contests
            .iter()
            .enumerate()
            .filter(|(_, c)| c.parent.is_none())
            .map(|(pos, _)| BallotItemKey::Contest(pos));
        headers.chain(contests).collect()
    }

    pub fn item_id(&self, key: BallotItemKey) -> Option<&str> {
        match key {
            BallotItemKey::Header(pos) => self.headers.at(pos).map(|h| h.id.as_str()),
            BallotItemKey::Contest(pos) => self.contests.at(pos).map(|c| c.id.as_str()),
        }
    }

    pub fn parent_of(&self, key: BallotItemKey) -> Option<&Header> {
        let parent = match key {
            BallotItemKey::Header(pos) => self.headers.at(pos).and_then(|h| h.parent),
            BallotItemKey::Contest(pos) => self.contests.at(pos).and_then(|c| c.parent),
        };
        parent.and_then(|pos| self.headers.at(pos))
    }
}

/// The result of a full load: the global tables and the election.
#[derive(PartialEq, Debug, Clone)]
pub struct ElectionGraph {
    pub build_time: Option<NaiveDateTime>,
    pub languages: Option<JSValue>,
    pub translations: Option<JSValue>,
    pub result_stat_types: IdRegistry<ResultStatType>,
    pub voting_groups: IdRegistry<VotingGroup>,
    pub result_styles: IdRegistry<ResultStyle>,
    pub areas: IdRegistry<Area>,
    pub election: Election,
}

impl ElectionGraph {
    pub fn result_style_of(&self, contest: &Contest) -> Option<&ResultStyle> {
        self.result_styles.get(&contest.result_style_id)
    }

    pub fn voting_district_of(&self, contest: &Contest) -> Option<&Area> {
        contest
            .voting_district_id
            .as_deref()
            .and_then(|id| self.areas.get(id))
    }
}

impl Identified for ResultStatType {
    const KIND: &'static str = "ResultStatType";
    fn id(&self) -> &str {
        &self.id
    }
}

impl Identified for VotingGroup {
    const KIND: &'static str = "VotingGroup";
    fn id(&self) -> &str {
        &self.id
    }
}

impl Identified for ResultStyle {
    const KIND: &'static str = "ResultStyle";
    fn id(&self) -> &str {
        &self.id
    }
}

impl Identified for Area {
    const KIND: &'static str = "Area";
    fn id(&self) -> &str {
        &self.id
    }
}

impl Identified for Header {
    const KIND: &'static str = "Header";
    fn id(&self) -> &str {
        &self.id
    }
    fn set_index(&mut self, index: usize) {
        self.index = index;
    }
}

impl Identified for Contest {
    const KIND: &'static str = "Contest";
    fn id(&self) -> &str {
        &self.id
    }
    fn set_index(&mut self, index: usize) {
        self.index = index;
    }
}

impl Identified for Choice {
    const KIND: &'static str = "Choice";
    fn id(&self) -> &str {
        &self.id
    }
    fn set_index(&mut self, index: usize) {
        self.index = index;
    }
}

impl Identified for Candidate {
    const KIND: &'static str = "Candidate";
    fn id(&self) -> &str {
        &self.id
    }
    fn set_index(&mut self, index: usize) {
        self.index = index;
    }
}
