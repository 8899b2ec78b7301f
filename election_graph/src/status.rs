// ********* Contest status ***********
//
// The status file is published separately from the election file, while the
// results come in. Each of its records updates one contest.

use chrono::NaiveDateTime;
use log::{debug, warn};
use serde_json::Value as JSValue;

use crate::binding::*;
use crate::context::*;
use crate::convert::*;
use crate::error::*;
use crate::loaders::ID_KEY;
use crate::model::*;

/// The status read from one record. The outer option tells whether the key
/// was present: an absent key leaves the contest unchanged.
#[derive(Debug, Default)]
struct ContestStatus {
    reporting_time: Option<Option<NaiveDateTime>>,
    total_precincts: Option<Option<i64>>,
    precincts_reporting: Option<Option<i64>>,
    rcv_rounds: Option<Option<i64>>,
}

impl ContestStatus {
    fn apply_to(self, contest: &mut Contest) {
        if let Some(x) = self.reporting_time {
            contest.reporting_time = x;
        }
        if let Some(x) = self.total_precincts {
            contest.total_precincts = x;
        }
        if let Some(x) = self.precincts_reporting {
            contest.precincts_reporting = x;
        }
        if let Some(x) = self.rcv_rounds {
            contest.rcv_rounds = x;
        }
    }
}

static CONTEST_STATUS_FIELDS: &[FieldBinding<ContestStatus>] = &[
    field(
        "reporting_time",
        Conversion::DateTime(|c: &mut ContestStatus, v| c.reporting_time = Some(Some(v))),
    ),
    field(
        "total_precincts",
        Conversion::Int(|c: &mut ContestStatus, v| c.total_precincts = Some(v)),
    ),
    field(
        "precincts_reporting",
        Conversion::Int(|c: &mut ContestStatus, v| c.precincts_reporting = Some(v)),
    ),
    field("rcv_rounds", Conversion::Int(|c: &mut ContestStatus, v| c.rcv_rounds = Some(v))),
];

fn read_status(
    election: &Election,
    value: JSValue,
    ctx: &LoadContext,
) -> LoadResult<(String, ContestStatus)> {
    let mut record = RawRecord::from_value("Contest", value)?;
    let site = FieldSite {
        entity: "Contest",
        id: None,
        attr: ID_KEY,
    };
    let raw = record.take(ID_KEY).ok_or_else(|| site.missing())?;
    let id = parse_id(&raw).map_err(|e| site.invalid(&raw, e))?;
    if !election.contests.contains(&id) {
        return Err(site.dangling(&id));
    }
    let mut status = ContestStatus::default();
    for binding in CONTEST_STATUS_FIELDS.iter() {
        binding.apply(&mut status, &mut record, ctx, Some(&id))?;
    }
    let skipped = record.leftover_keys();
    if !skipped.is_empty() {
        warn!(
            "apply_contest_status: contest {}: skipping keys {:?}",
            id, skipped
        );
    }
    Ok((id, status))
}

/// Sets the reporting status of the contests listed in `records`.
///
/// Every record must name an existing contest. Keys other than the status
/// fields are ignored. All the records are read before any contest is
/// updated: on error, the election is left unchanged.
pub fn apply_contest_status(election: &mut Election, records: Vec<JSValue>) -> LoadResult<()> {
    // The status fields have no dependencies.
    let ctx = LoadContext::new();
    let mut statuses: Vec<(String, ContestStatus)> = Vec::with_capacity(records.len());
    for value in records {
        statuses.push(read_status(election, value, &ctx)?);
    }
    let count = statuses.len();
    for (id, status) in statuses {
        if let Some(contest) = election.contests.get_mut(&id) {
            status.apply_to(contest);
            debug!(
                "apply_contest_status: contest {}: rcv_rounds={:?} precincts={:?}/{:?}",
                id, contest.rcv_rounds, contest.precincts_reporting, contest.total_precincts
            );
        }
    }
    debug!("apply_contest_status: {} records", count);
    Ok(())
}
