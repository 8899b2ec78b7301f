// ********* Graph builder ***********
//
// Runs the entity loaders in their dependency order, publishing each global
// table before the next stage starts, then links the ballot item tree.

use chrono::NaiveDateTime;
use log::{debug, info};
use serde_json::Value as JSValue;

use crate::binding::*;
use crate::context::*;
use crate::error::*;
use crate::loaders::*;
use crate::model::*;
use crate::registry::*;

const ROOT_ENTITY: &str = "ElectionGraph";

fn stage_records(record: &mut RawRecord, key: &'static str) -> LoadResult<Vec<JSValue>> {
    let site = FieldSite {
        entity: ROOT_ENTITY,
        id: None,
        attr: key,
    };
    expect_list(record.take(key), &site)
}

fn load_result_stat_types(record: &mut RawRecord, ctx: &mut LoadContext) -> LoadResult<()> {
    let values = stage_records(record, "result_stat_types")?;
    let reg = RESULT_STAT_TYPE_LOADER.load_all(values, (), Indexing::Unindexed, ctx)?;
    ctx.publish_result_stat_types(reg)
}

fn load_voting_groups(record: &mut RawRecord, ctx: &mut LoadContext) -> LoadResult<()> {
    let values = stage_records(record, "voting_groups")?;
    let reg = VOTING_GROUP_LOADER.load_all(values, (), Indexing::Unindexed, ctx)?;
    ctx.publish_voting_groups(reg)
}

fn load_result_styles(record: &mut RawRecord, ctx: &mut LoadContext) -> LoadResult<()> {
    let values = stage_records(record, "result_styles")?;
    let reg = RESULT_STYLE_LOADER.load_all(values, (), Indexing::Unindexed, ctx)?;
    ctx.publish_result_styles(reg)
}

fn load_areas(record: &mut RawRecord, ctx: &mut LoadContext) -> LoadResult<()> {
    let values = stage_records(record, "areas")?;
    let reg = AREA_LOADER.load_all(values, (), Indexing::Unindexed, ctx)?;
    ctx.publish_areas(reg)
}

/// Builds the election graph from the decoded content of an election file.
///
/// The stages always run in the same order: result stat types, voting
/// groups, result styles, areas and finally the election with its headers
/// and contests. Any error aborts the whole load.
pub fn build_graph(root: JSValue, build_time: Option<NaiveDateTime>) -> LoadResult<ElectionGraph> {
    let mut record = RawRecord::from_value(ROOT_ENTITY, root)?;
    let mut ctx = LoadContext::new();

    let languages = record.take("languages");
    let translations = record.take("translations");

    load_result_stat_types(&mut record, &mut ctx)?;
    load_voting_groups(&mut record, &mut ctx)?;
    load_result_styles(&mut record, &mut ctx)?;
    load_areas(&mut record, &mut ctx)?;

    let election_value = record.take("election").ok_or_else(|| {
        FieldSite {
            entity: ROOT_ENTITY,
            id: None,
            attr: "election",
        }
        .missing()
    })?;
    let mut election = ELECTION_LOADER.load(election_value, (), &ctx)?;
    record.ensure_consumed(None)?;

    link_ballot_items(&mut election)?;

    let tables = ctx.into_tables()?;
    info!(
        "build_graph: {} areas, {} headers, {} contests",
        tables.areas.len(),
        election.headers.len(),
        election.contests.len()
    );
    Ok(ElectionGraph {
        build_time,
        languages,
        translations,
        result_stat_types: tables.result_stat_types,
        voting_groups: tables.voting_groups,
        result_styles: tables.result_styles,
        areas: tables.areas,
        election,
    })
}

fn resolve_parent(
    headers: &IdRegistry<Header>,
    entity: &'static str,
    id: &str,
    parent_id: &Option<String>,
) -> LoadResult<Option<usize>> {
    match parent_id {
        None => Ok(None),
        Some(pid) => match headers.position(pid) {
            Some(pos) => Ok(Some(pos)),
            None => Err(LoadError::DanglingReference {
                entity,
                id: Some(id.to_string()),
                attr: "header_id",
                missing: pid.clone(),
            }),
        },
    }
}

/// Second pass: resolves the parent header of every header and contest and
/// fills in the children lists. Headers are attached before contests.
///
/// Earlier links are replaced, so linking an election twice gives the same
/// tree.
pub fn link_ballot_items(election: &mut Election) -> LoadResult<()> {
    let mut links: Vec<(BallotItemKey, usize)> = Vec::new();
    for (pos, h) in election.headers.iter().enumerate() {
        if let Some(parent) = resolve_parent(&election.headers, "Header", &h.id, &h.parent_header_id)? {
            links.push((BallotItemKey::Header(pos), parent));
        }
    }
    for (pos, c) in election.contests.iter().enumerate() {
        if let Some(parent) = resolve_parent(&election.headers, "Contest", &c.id, &c.parent_header_id)? {
            links.push((BallotItemKey::Contest(pos), parent));
        }
    }

    for pos in 0..election.headers.len() {
        if let Some(h) = election.headers.at_mut(pos) {
            h.parent = None;
            h.children.clear();
        }
    }
    for pos in 0..election.contests.len() {
        if let Some(c) = election.contests.at_mut(pos) {
            c.parent = None;
        }
    }

    for (item, parent) in links {
        match item {
            BallotItemKey::Header(pos) => {
                if let Some(h) = election.headers.at_mut(pos) {
                    h.parent = Some(parent);
                }
            }
            BallotItemKey::Contest(pos) => {
                if let Some(c) = election.contests.at_mut(pos) {
                    c.parent = Some(parent);
                }
            }
        }
        if let Some(p) = election.headers.at_mut(parent) {
            p.children.push(item);
        }
        debug!(
            "link_ballot_items: {:?} -> {:?}",
            election.item_id(item),
            election.headers.at(parent).map(|h| h.id.as_str())
        );
    }

    check_header_cycles(&election.headers)
}

// Walking up from any header takes at most `len` steps unless the chain
// loops. After `len` steps the walk is necessarily on the loop.
fn check_header_cycles(headers: &IdRegistry<Header>) -> LoadResult<()> {
    let n = headers.len();
    for start in 0..n {
        let mut current = start;
        let mut steps = 0;
        while let Some(parent) = headers.at(current).and_then(|h| h.parent) {
            current = parent;
            steps += 1;
            if steps > n {
                let id = headers.at(current).map(|h| h.id.clone()).unwrap_or_default();
                return HeaderCycleSnafu { id }.fail();
            }
        }
    }
    Ok(())
}
