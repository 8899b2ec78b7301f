// The binding tables of every entity of the election graph.
//
// Keys follow the export format: ids are stored under `_id`, the parent of a
// ballot item under `header_id`, and the contest kind under `_type`.

use log::debug;
use serde_json::Value as JSValue;

use crate::binding::*;
use crate::context::*;
use crate::convert::*;
use crate::error::*;
use crate::model::*;
use crate::registry::*;

pub const ID_KEY: &str = "_id";
pub const CONTEST_TYPE_KEY: &str = "_type";

fn empty_id(id: Option<String>) -> String {
    id.unwrap_or_default()
}

// ********* Global tables ***********

impl Draft for ResultStatType {
    type Params = ();
    type Entity = ResultStatType;
    const ENTITY: &'static str = "ResultStatType";

    fn start(id: Option<String>, _: ()) -> Self {
        ResultStatType {
            id: empty_id(id),
            heading: None,
            is_percent: None,
        }
    }

    fn finish(self) -> LoadResult<ResultStatType> {
        Ok(self)
    }
}

pub static RESULT_STAT_TYPE_LOADER: EntityLoader<ResultStatType> = EntityLoader {
    id_key: Some(ID_KEY),
    fields: &[
        field(
            "heading",
            Conversion::Text(|s: &mut ResultStatType, v| s.heading = Some(v)),
        ),
        field(
            "is_percent",
            Conversion::Bool(|s: &mut ResultStatType, v| s.is_percent = v),
        ),
    ],
    finalize: None,
};

impl Draft for VotingGroup {
    type Params = ();
    type Entity = VotingGroup;
    const ENTITY: &'static str = "VotingGroup";

    fn start(id: Option<String>, _: ()) -> Self {
        VotingGroup {
            id: empty_id(id),
            heading: None,
        }
    }

    fn finish(self) -> LoadResult<VotingGroup> {
        Ok(self)
    }
}

pub static VOTING_GROUP_LOADER: EntityLoader<VotingGroup> = EntityLoader {
    id_key: Some(ID_KEY),
    fields: &[field(
        "heading",
        Conversion::Text(|g: &mut VotingGroup, v| g.heading = Some(v)),
    )],
    finalize: None,
};

/// Parses a list of ids and checks that each one is registered.
fn resolve_ids<T>(
    value: &JSValue,
    registry: &IdRegistry<T>,
    site: &FieldSite<'_>,
) -> LoadResult<Vec<String>> {
    let ids = parse_ids(value).map_err(|e| site.invalid(value, e))?;
    if let Some(missing) = ids.iter().find(|id| !registry.contains(id)) {
        return Err(site.dangling(missing));
    }
    Ok(ids)
}

fn load_result_voting_groups(
    style: &mut ResultStyle,
    value: Option<JSValue>,
    ctx: &LoadContext,
    site: &FieldSite<'_>,
) -> LoadResult<()> {
    let groups = ctx.voting_groups(site)?;
    if let Some(v) = value {
        style.voting_group_ids = resolve_ids(&v, groups, site)?;
    }
    Ok(())
}

fn load_stat_types(
    style: &mut ResultStyle,
    value: Option<JSValue>,
    ctx: &LoadContext,
    site: &FieldSite<'_>,
) -> LoadResult<()> {
    let stats = ctx.result_stat_types(site)?;
    if let Some(v) = value {
        style.result_stat_type_ids = resolve_ids(&v, stats, site)?;
    }
    Ok(())
}

impl Draft for ResultStyle {
    type Params = ();
    type Entity = ResultStyle;
    const ENTITY: &'static str = "ResultStyle";

    fn start(id: Option<String>, _: ()) -> Self {
        ResultStyle {
            id: empty_id(id),
            description: None,
            is_rcv: None,
            voting_group_ids: Vec::new(),
            result_stat_type_ids: Vec::new(),
        }
    }

    fn finish(self) -> LoadResult<ResultStyle> {
        Ok(self)
    }
}

pub static RESULT_STYLE_LOADER: EntityLoader<ResultStyle> = EntityLoader {
    id_key: Some(ID_KEY),
    fields: &[
        field(
            "description",
            Conversion::Text(|s: &mut ResultStyle, v| s.description = Some(v)),
        ),
        field(
            "is_rcv",
            Conversion::Bool(|s: &mut ResultStyle, v| s.is_rcv = v),
        ),
        with_deps(
            "voting_groups",
            Source::Key("voting_group_ids"),
            &[Dependency::VotingGroups],
            load_result_voting_groups,
        ),
        with_deps(
            "result_stat_types",
            Source::Key("result_stat_type_ids"),
            &[Dependency::ResultStatTypes],
            load_stat_types,
        ),
    ],
    finalize: None,
};

impl Draft for Area {
    type Params = ();
    type Entity = Area;
    const ENTITY: &'static str = "Area";

    fn start(id: Option<String>, _: ()) -> Self {
        Area {
            id: empty_id(id),
            classification: None,
            name: None,
            short_name: None,
            is_vbm: None,
            consolidated_ids: None,
            reporting_group_ids: Vec::new(),
        }
    }

    fn finish(self) -> LoadResult<Area> {
        Ok(self)
    }
}

pub static AREA_LOADER: EntityLoader<Area> = EntityLoader {
    id_key: Some(ID_KEY),
    fields: &[
        field(
            "classification",
            Conversion::AsIs(|a: &mut Area, v| a.classification = Some(v)),
        ),
        field("name", Conversion::Text(|a: &mut Area, v| a.name = Some(v))),
        field(
            "short_name",
            Conversion::Text(|a: &mut Area, v| a.short_name = Some(v)),
        ),
        field("is_vbm", Conversion::Bool(|a: &mut Area, v| a.is_vbm = v)),
        field(
            "consolidated_ids",
            Conversion::AsIs(|a: &mut Area, v| a.consolidated_ids = Some(v)),
        ),
        field(
            "reporting_group_ids",
            Conversion::Ids(|a: &mut Area, v| a.reporting_group_ids = v),
        ),
    ],
    finalize: None,
};

// ********* Ballot items ***********

// An empty parent id means that the item is a root.
fn set_parent_header(target: &mut Option<String>, id: String) {
    *target = Some(id).filter(|x| !x.is_empty());
}

impl Draft for Header {
    type Params = ();
    type Entity = Header;
    const ENTITY: &'static str = "Header";

    fn start(id: Option<String>, _: ()) -> Self {
        Header {
            id: empty_id(id),
            ballot_title: None,
            classification: None,
            parent_header_id: None,
            index: 0,
            parent: None,
            children: Vec::new(),
        }
    }

    fn finish(self) -> LoadResult<Header> {
        Ok(self)
    }
}

pub static HEADER_LOADER: EntityLoader<Header> = EntityLoader {
    id_key: Some(ID_KEY),
    fields: &[
        field(
            "ballot_title",
            Conversion::Text(|h: &mut Header, v| h.ballot_title = Some(v)),
        ),
        field(
            "classification",
            Conversion::AsIs(|h: &mut Header, v| h.classification = Some(v)),
        ),
        keyed(
            "parent_header_id",
            "header_id",
            Conversion::Id(|h: &mut Header, v| set_parent_header(&mut h.parent_header_id, v)),
        ),
    ],
    finalize: None,
};

impl Draft for Choice {
    /// The id of the contest.
    type Params = String;
    type Entity = Choice;
    const ENTITY: &'static str = "Choice";

    fn start(id: Option<String>, contest_id: String) -> Self {
        Choice {
            id: empty_id(id),
            contest_id,
            ballot_title: None,
            index: 0,
        }
    }

    fn finish(self) -> LoadResult<Choice> {
        Ok(self)
    }
}

pub static CHOICE_LOADER: EntityLoader<Choice> = EntityLoader {
    id_key: Some(ID_KEY),
    fields: &[field(
        "ballot_title",
        Conversion::Text(|c: &mut Choice, v| c.ballot_title = Some(v)),
    )],
    finalize: None,
};

impl Draft for Candidate {
    /// The id of the contest.
    type Params = String;
    type Entity = Candidate;
    const ENTITY: &'static str = "Candidate";

    fn start(id: Option<String>, contest_id: String) -> Self {
        Candidate {
            id: empty_id(id),
            contest_id,
            ballot_title: None,
            ballot_designation: None,
            candidate_party: None,
            index: 0,
        }
    }

    fn finish(self) -> LoadResult<Candidate> {
        Ok(self)
    }
}

pub static CANDIDATE_LOADER: EntityLoader<Candidate> = EntityLoader {
    id_key: Some(ID_KEY),
    fields: &[
        field(
            "ballot_title",
            Conversion::Text(|c: &mut Candidate, v| c.ballot_title = Some(v)),
        ),
        field(
            "ballot_designation",
            Conversion::Text(|c: &mut Candidate, v| c.ballot_designation = Some(v)),
        ),
        field(
            "candidate_party",
            Conversion::Text(|c: &mut Candidate, v| c.candidate_party = Some(v)),
        ),
    ],
    finalize: None,
};

/// A contest being loaded. The result style and the results mapping are
/// required to finish it.
pub struct ContestDraft {
    id: String,
    kind: ContestKind,
    ballot_subtitle: Option<I18nText>,
    ballot_title: Option<I18nText>,
    choice_names: Option<JSValue>,
    choices: ContestChoices,
    choice_count: usize,
    parent_header_id: Option<String>,
    instructions_text: Option<JSValue>,
    is_partisan: Option<JSValue>,
    number_elected: Option<JSValue>,
    question_text: Option<JSValue>,
    result_style_id: Option<String>,
    results_mapping: Option<ResultsMapping>,
    voting_district_id: Option<String>,
    reporting_groups: Vec<ReportingGroup>,
    type_name: Option<JSValue>,
    vote_for_msg: Option<JSValue>,
    writeins_allowed: Option<i64>,
}

impl Draft for ContestDraft {
    type Params = ContestKind;
    type Entity = Contest;
    const ENTITY: &'static str = "Contest";

    fn start(id: Option<String>, kind: ContestKind) -> Self {
        let choices = if kind.has_candidates() {
            ContestChoices::Candidates(IdRegistry::new())
        } else {
            ContestChoices::Choices(IdRegistry::new())
        };
        ContestDraft {
            id: empty_id(id),
            kind,
            ballot_subtitle: None,
            ballot_title: None,
            choice_names: None,
            choices,
            choice_count: 0,
            parent_header_id: None,
            instructions_text: None,
            is_partisan: None,
            number_elected: None,
            question_text: None,
            result_style_id: None,
            results_mapping: None,
            voting_district_id: None,
            reporting_groups: Vec::new(),
            type_name: None,
            vote_for_msg: None,
            writeins_allowed: None,
        }
    }

    fn finish(self) -> LoadResult<Contest> {
        let missing = |attr: &'static str| LoadError::MissingRequiredField {
            entity: "Contest",
            id: Some(self.id.clone()),
            attr,
        };
        let result_style_id = self
            .result_style_id
            .clone()
            .ok_or_else(|| missing("result_style"))?;
        let results_mapping = self
            .results_mapping
            .clone()
            .ok_or_else(|| missing("results_mapping"))?;
        Ok(Contest {
            id: self.id,
            kind: self.kind,
            ballot_subtitle: self.ballot_subtitle,
            ballot_title: self.ballot_title,
            choice_names: self.choice_names,
            choices: self.choices,
            choice_count: self.choice_count,
            parent_header_id: self.parent_header_id,
            instructions_text: self.instructions_text,
            is_partisan: self.is_partisan,
            number_elected: self.number_elected,
            question_text: self.question_text,
            result_style_id,
            results_mapping,
            voting_district_id: self.voting_district_id,
            reporting_groups: self.reporting_groups,
            type_name: self.type_name,
            vote_for_msg: self.vote_for_msg,
            writeins_allowed: self.writeins_allowed,
            index: 0,
            parent: None,
            reporting_time: None,
            total_precincts: None,
            precincts_reporting: None,
            rcv_rounds: None,
            results: None,
        })
    }
}

fn load_choices(
    contest: &mut ContestDraft,
    value: Option<JSValue>,
    ctx: &LoadContext,
    site: &FieldSite<'_>,
) -> LoadResult<()> {
    let values = expect_list(value, site)?;
    contest.choices = if contest.kind.has_candidates() {
        ContestChoices::Candidates(CANDIDATE_LOADER.load_all(
            values,
            contest.id.clone(),
            Indexing::Indexed,
            ctx,
        )?)
    } else {
        ContestChoices::Choices(CHOICE_LOADER.load_all(
            values,
            contest.id.clone(),
            Indexing::Indexed,
            ctx,
        )?)
    };
    Ok(())
}

fn load_contest_result_style(
    contest: &mut ContestDraft,
    value: Option<JSValue>,
    ctx: &LoadContext,
    site: &FieldSite<'_>,
) -> LoadResult<()> {
    let styles = ctx.result_styles(site)?;
    if let Some(v) = value {
        let id = parse_id(&v).map_err(|e| site.invalid(&v, e))?;
        if !styles.contains(&id) {
            return Err(site.dangling(&id));
        }
        contest.result_style_id = Some(id);
    }
    Ok(())
}

fn load_voting_district(
    contest: &mut ContestDraft,
    value: Option<JSValue>,
    ctx: &LoadContext,
    site: &FieldSite<'_>,
) -> LoadResult<()> {
    let areas = ctx.areas(site)?;
    if let Some(v) = value {
        let id = parse_id(&v).map_err(|e| site.invalid(&v, e))?;
        if !areas.contains(&id) {
            return Err(site.dangling(&id));
        }
        contest.voting_district_id = Some(id);
    }
    Ok(())
}

// Derived: the result style's statistics, then one column per choice.
fn load_results_mapping(
    contest: &mut ContestDraft,
    _: Option<JSValue>,
    ctx: &LoadContext,
    site: &FieldSite<'_>,
) -> LoadResult<()> {
    let styles = ctx.result_styles(site)?;
    let style = match contest.result_style_id.as_deref() {
        Some(id) => styles.get(id).ok_or_else(|| site.dangling(id))?,
        None => return Ok(()),
    };
    contest.results_mapping = Some(ResultsMapping {
        stat_ids: style.result_stat_type_ids.clone(),
        choice_count: contest.choices.len(),
    });
    Ok(())
}

// Derived: the areas reported in the district (the district itself when it
// lists none), crossed with the voting groups of the result style.
fn load_reporting_groups(
    contest: &mut ContestDraft,
    _: Option<JSValue>,
    ctx: &LoadContext,
    site: &FieldSite<'_>,
) -> LoadResult<()> {
    let areas = ctx.areas(site)?;
    let styles = ctx.result_styles(site)?;
    let (district_id, style_id) = match (
        contest.voting_district_id.as_deref(),
        contest.result_style_id.as_deref(),
    ) {
        (Some(d), Some(s)) => (d, s),
        _ => return Ok(()),
    };
    let district = areas.get(district_id).ok_or_else(|| site.dangling(district_id))?;
    let style = styles.get(style_id).ok_or_else(|| site.dangling(style_id))?;
    let area_ids: Vec<String> = if district.reporting_group_ids.is_empty() {
        vec![district.id.clone()]
    } else {
        district.reporting_group_ids.clone()
    };
    let mut groups: Vec<ReportingGroup> = Vec::new();
    for area_id in area_ids.iter() {
        if !areas.contains(area_id) {
            return Err(site.dangling(area_id));
        }
        for vg_id in style.voting_group_ids.iter() {
            groups.push(ReportingGroup {
                area_id: area_id.clone(),
                voting_group_id: vg_id.clone(),
            });
        }
    }
    debug!(
        "load_reporting_groups: contest {}: {} reporting groups",
        contest.id,
        groups.len()
    );
    contest.reporting_groups = groups;
    Ok(())
}

fn count_choices(contest: &mut ContestDraft) -> LoadResult<()> {
    contest.choice_count = contest.choices.len();
    Ok(())
}

pub static CONTEST_LOADER: EntityLoader<ContestDraft> = EntityLoader {
    id_key: Some(ID_KEY),
    fields: &[
        field(
            "ballot_subtitle",
            Conversion::Text(|c: &mut ContestDraft, v| c.ballot_subtitle = Some(v)),
        ),
        field(
            "ballot_title",
            Conversion::Text(|c: &mut ContestDraft, v| c.ballot_title = Some(v)),
        ),
        field(
            "choice_names",
            Conversion::AsIs(|c: &mut ContestDraft, v| c.choice_names = Some(v)),
        ),
        with_deps("choices", Source::Key("choices"), &[], load_choices),
        keyed(
            "parent_header_id",
            "header_id",
            Conversion::Id(|c: &mut ContestDraft, v| {
                set_parent_header(&mut c.parent_header_id, v)
            }),
        ),
        field(
            "instructions_text",
            Conversion::AsIs(|c: &mut ContestDraft, v| c.instructions_text = Some(v)),
        ),
        field(
            "is_partisan",
            Conversion::AsIs(|c: &mut ContestDraft, v| c.is_partisan = Some(v)),
        ),
        field(
            "number_elected",
            Conversion::AsIs(|c: &mut ContestDraft, v| c.number_elected = Some(v)),
        ),
        field(
            "question_text",
            Conversion::AsIs(|c: &mut ContestDraft, v| c.question_text = Some(v)),
        ),
        with_deps(
            "result_style",
            Source::Key("result_style"),
            &[Dependency::ResultStyles],
            load_contest_result_style,
        ),
        with_deps(
            "results_mapping",
            Source::Derived,
            &[Dependency::ResultStyles],
            load_results_mapping,
        ),
        with_deps(
            "voting_district",
            Source::Key("voting_district"),
            &[Dependency::Areas],
            load_voting_district,
        ),
        with_deps(
            "reporting_groups",
            Source::Derived,
            &[Dependency::Areas, Dependency::ResultStyles],
            load_reporting_groups,
        ),
        keyed(
            "type_name",
            "type",
            Conversion::AsIs(|c: &mut ContestDraft, v| c.type_name = Some(v)),
        ),
        field(
            "vote_for_msg",
            Conversion::AsIs(|c: &mut ContestDraft, v| c.vote_for_msg = Some(v)),
        ),
        field(
            "writeins_allowed",
            Conversion::Int(|c: &mut ContestDraft, v| c.writeins_allowed = v),
        ),
    ],
    finalize: Some(count_choices),
};

/// Loads a contest. After the id, the kind of the contest is read from
/// `_type`, since it decides how the choices are loaded.
pub fn load_contest(value: JSValue, ctx: &LoadContext) -> LoadResult<Contest> {
    let mut record = RawRecord::from_value("Contest", value)?;
    let id_site = FieldSite {
        entity: "Contest",
        id: None,
        attr: "id",
    };
    let raw_id = record.take(ID_KEY).ok_or_else(|| id_site.missing())?;
    let id = parse_id(&raw_id).map_err(|e| id_site.invalid(&raw_id, e))?;
    let site = FieldSite {
        entity: "Contest",
        id: Some(&id),
        attr: CONTEST_TYPE_KEY,
    };
    let raw_type = record.take(CONTEST_TYPE_KEY).ok_or_else(|| site.missing())?;
    let kind = raw_type
        .as_str()
        .and_then(ContestKind::from_type_name)
        .ok_or_else(|| {
            site.invalid(
                &raw_type,
                ConvertError::WrongType {
                    expected: "one of office, measure, ynoffice",
                },
            )
        })?;
    // Put the id back for the loader.
    let mut fields = serde_json::Map::new();
    fields.insert(ID_KEY.to_string(), JSValue::String(id));
    for key in record.leftover_keys() {
        if let Some(v) = record.take(&key) {
            fields.insert(key, v);
        }
    }
    CONTEST_LOADER.load(JSValue::Object(fields), kind, ctx)
}

// ********* Election ***********

impl Draft for Election {
    type Params = ();
    type Entity = Election;
    const ENTITY: &'static str = "Election";

    fn start(_: Option<String>, _: ()) -> Self {
        Election {
            ballot_title: None,
            date: None,
            election_area: None,
            headers: IdRegistry::new(),
            contests: IdRegistry::new(),
        }
    }

    fn finish(self) -> LoadResult<Election> {
        Ok(self)
    }
}

fn load_headers(
    election: &mut Election,
    value: Option<JSValue>,
    ctx: &LoadContext,
    site: &FieldSite<'_>,
) -> LoadResult<()> {
    let values = expect_list(value, site)?;
    election.headers = HEADER_LOADER.load_all(values, (), Indexing::Indexed, ctx)?;
    Ok(())
}

fn load_contests(
    election: &mut Election,
    value: Option<JSValue>,
    ctx: &LoadContext,
    site: &FieldSite<'_>,
) -> LoadResult<()> {
    let values = expect_list(value, site)?;
    let mut contests: Vec<Contest> = Vec::with_capacity(values.len());
    for v in values {
        contests.push(load_contest(v, ctx)?);
    }
    election.contests = IdRegistry::build(contests, Indexing::Indexed)?;
    Ok(())
}

pub static ELECTION_LOADER: EntityLoader<Election> = EntityLoader {
    id_key: None,
    fields: &[
        field(
            "ballot_title",
            Conversion::Text(|e: &mut Election, v| e.ballot_title = Some(v)),
        ),
        keyed(
            "date",
            "election_date",
            Conversion::Date(|e: &mut Election, v| e.date = Some(v)),
        ),
        field(
            "election_area",
            Conversion::Text(|e: &mut Election, v| e.election_area = Some(v)),
        ),
        // Headers before contests: contests refer to headers, not the other
        // way around.
        with_deps("headers", Source::Key("headers"), &[], load_headers),
        with_deps(
            "contests",
            Source::Key("contests"),
            &[
                Dependency::Areas,
                Dependency::ResultStyles,
                Dependency::VotingGroups,
            ],
            load_contests,
        ),
    ],
    finalize: None,
};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn context() -> LoadContext {
        let mut ctx = LoadContext::new();
        let stats = RESULT_STAT_TYPE_LOADER
            .load_all(
                vec![
                    json!({"_id": "RSReg", "heading": "Registered Voters", "is_percent": "N"}),
                    json!({"_id": "RSCst", "heading": "Ballots Cast"}),
                ],
                (),
                Indexing::Unindexed,
                &ctx,
            )
            .unwrap();
        ctx.publish_result_stat_types(stats).unwrap();
        let groups = VOTING_GROUP_LOADER
            .load_all(
                vec![
                    json!({"_id": "EV", "heading": "Election Day"}),
                    json!({"_id": "MV", "heading": "Vote by Mail"}),
                ],
                (),
                Indexing::Unindexed,
                &ctx,
            )
            .unwrap();
        ctx.publish_voting_groups(groups).unwrap();
        let styles = RESULT_STYLE_LOADER
            .load_all(
                vec![json!({
                    "_id": "RS1",
                    "is_rcv": "N",
                    "voting_group_ids": "EV MV",
                    "result_stat_type_ids": "RSReg RSCst"
                })],
                (),
                Indexing::Unindexed,
                &ctx,
            )
            .unwrap();
        ctx.publish_result_styles(styles).unwrap();
        let areas = AREA_LOADER
            .load_all(
                vec![
                    json!({"_id": "ALL", "name": "County", "reporting_group_ids": "P1 P2"}),
                    json!({"_id": "P1", "is_vbm": 0}),
                    json!({"_id": "P2"}),
                ],
                (),
                Indexing::Unindexed,
                &ctx,
            )
            .unwrap();
        ctx.publish_areas(areas).unwrap();
        ctx
    }

    #[test]
    fn result_style_resolves_its_tables() {
        let ctx = context();
        let site = FieldSite {
            entity: "ResultStyle",
            id: None,
            attr: "result_style",
        };
        let style = ctx.result_styles(&site).unwrap().get("RS1").unwrap();
        assert_eq!(style.voting_group_ids, vec!["EV", "MV"]);
        assert_eq!(style.result_stat_type_ids, vec!["RSReg", "RSCst"]);
        assert_eq!(style.voting_group_index("MV"), Some(1));
        assert_eq!(style.is_rcv, Some(false));
    }

    #[test]
    fn result_style_with_unknown_stat() {
        let ctx = context();
        let res = RESULT_STYLE_LOADER.load(
            json!({"_id": "RS2", "result_stat_type_ids": "RSReg RSXX"}),
            (),
            &ctx,
        );
        assert!(matches!(
            res,
            Err(LoadError::DanglingReference { attr: "result_stat_types", ref missing, .. }) if missing == "RSXX"
        ));
    }

    #[test]
    fn office_contest_has_candidates() {
        let ctx = context();
        let c = load_contest(
            json!({
                "_id": "C1",
                "_type": "office",
                "ballot_title": {"en": "Mayor"},
                "header_id": "H1",
                "result_style": "RS1",
                "voting_district": "ALL",
                "writeins_allowed": "1",
                "choices": [
                    {"_id": "101", "ballot_title": "ALICE", "candidate_party": "X"},
                    {"_id": "102", "ballot_title": "BOB"}
                ]
            }),
            &ctx,
        )
        .unwrap();
        assert_eq!(c.kind, ContestKind::Office);
        assert_eq!(c.choice_count, 2);
        assert_eq!(c.parent_header_id.as_deref(), Some("H1"));
        assert_eq!(c.writeins_allowed, Some(1));
        let candidates = c.choices.candidates().unwrap();
        let bob = candidates.get("102").unwrap();
        assert_eq!(bob.index, 1);
        assert_eq!(bob.contest_id, "C1");
        assert_eq!(c.results_mapping.stat_count(), 2);
        assert_eq!(c.results_mapping.column_count(), 4);
        assert_eq!(c.results_mapping.choice_index(bob.index), 3);
        // Two precincts, two voting groups.
        assert_eq!(c.reporting_group_count(), 4);
        assert_eq!(
            c.reporting_groups[1],
            ReportingGroup {
                area_id: "P1".to_string(),
                voting_group_id: "MV".to_string()
            }
        );
    }

    #[test]
    fn measure_contest_has_choices() {
        let ctx = context();
        let c = load_contest(
            json!({
                "_id": "M1",
                "_type": "measure",
                "header_id": "",
                "result_style": "RS1",
                "voting_district": "P2",
                "choices": [{"_id": "Y"}, {"_id": "N"}]
            }),
            &ctx,
        )
        .unwrap();
        assert!(c.choices.candidates().is_none());
        assert_eq!(c.choices.ids(), vec!["Y", "N"]);
        assert_eq!(c.parent_header_id, None);
        // A district listing no reporting areas reports on itself.
        assert_eq!(c.reporting_group_count(), 2);
    }

    #[test]
    fn contest_kind_is_required() {
        let ctx = context();
        let res = load_contest(json!({"_id": "C9", "result_style": "RS1"}), &ctx);
        assert!(matches!(
            res,
            Err(LoadError::MissingRequiredField { attr: "_type", .. })
        ));
        let res = load_contest(json!({"_id": "C9", "_type": "poll"}), &ctx);
        assert!(matches!(res, Err(LoadError::InvalidValueFormat { .. })));
    }

    #[test]
    fn contest_id_is_read_before_its_kind() {
        let ctx = context();
        let res = load_contest(json!({"result_style": "RS1"}), &ctx);
        assert!(matches!(
            res,
            Err(LoadError::MissingRequiredField { attr: "id", id: None, .. })
        ));
        // Integer ids are kept in the error.
        let res = load_contest(json!({"_id": 7, "_type": "poll"}), &ctx);
        assert!(matches!(
            res,
            Err(LoadError::InvalidValueFormat { attr: "_type", ref id, .. }) if id.as_deref() == Some("7")
        ));
        let res = load_contest(json!({"_id": 7, "_type": "measure", "result_style": "RS1"}), &ctx);
        assert_eq!(res.unwrap().id, "7");
    }

    #[test]
    fn contest_without_result_style() {
        let ctx = context();
        let res = load_contest(json!({"_id": "C9", "_type": "measure"}), &ctx);
        assert!(matches!(
            res,
            Err(LoadError::MissingRequiredField { attr: "result_style", .. })
        ));
    }

    #[test]
    fn contest_with_unknown_district() {
        let ctx = context();
        let res = load_contest(
            json!({"_id": "C9", "_type": "measure", "result_style": "RS1", "voting_district": "P7"}),
            &ctx,
        );
        assert!(matches!(res, Err(LoadError::DanglingReference { attr: "voting_district", .. })));
    }

    #[test]
    fn unknown_choice_field() {
        let ctx = context();
        let res = load_contest(
            json!({
                "_id": "C1",
                "_type": "office",
                "result_style": "RS1",
                "choices": [{"_id": "101", "party": "X"}]
            }),
            &ctx,
        );
        assert!(matches!(
            res,
            Err(LoadError::UnrecognizedField { entity: "Candidate", .. })
        ));
    }

    #[test]
    fn contests_need_the_global_tables() {
        let ctx = LoadContext::new();
        let res = ELECTION_LOADER.load(json!({"contests": []}), (), &ctx);
        assert!(matches!(
            res,
            Err(LoadError::MissingDependency { attr: "contests", .. })
        ));
    }

    #[test]
    fn election_date() {
        let ctx = context();
        let e = ELECTION_LOADER
            .load(json!({"election_date": "2018-06-05", "ballot_title": "Primary"}), (), &ctx)
            .unwrap();
        assert_eq!(e.date.unwrap().to_string(), "2018-06-05");
        let res = ELECTION_LOADER.load(json!({"election_date": "June 5"}), (), &ctx);
        assert!(matches!(res, Err(LoadError::InvalidValueFormat { attr: "date", .. })));
    }
}
