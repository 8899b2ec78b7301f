// ********* Detailed results ***********
//
// Layout of a results table, one per contest:
//   - a header line: two label columns, then one column per result stat and
//     one column per choice, as given by the results mapping of the contest
//   - the RCV rounds, last round first, labelled RCV<n>. An empty cell is a
//     candidate who is no longer running.
//   - one row per reporting group, in reporting group order.

use log::debug;
use serde_json::Value as JSValue;

use crate::convert::*;
use crate::error::*;
use crate::model::*;

const LABEL_COLUMNS: usize = 2;
const RESULTS_ATTR: &str = "results";

fn mismatch(contest: &Contest, message: String) -> LoadError {
    LoadError::StructuralMismatch {
        entity: "Contest",
        id: contest.id.clone(),
        message,
    }
}

fn parse_cell(contest: &Contest, cell: &str) -> LoadResult<Option<i64>> {
    let raw = JSValue::String(cell.to_string());
    parse_int(&raw).map_err(|source| LoadError::InvalidValueFormat {
        entity: "Contest",
        id: Some(contest.id.clone()),
        attr: RESULTS_ATTR,
        raw: raw.to_string(),
        source,
    })
}

fn check_width(contest: &Contest, row: &[String], num_columns: usize) -> LoadResult<()> {
    if row.len() != num_columns {
        return Err(mismatch(
            contest,
            format!(
                "row {:?} has {} columns, expected {}",
                row.first(),
                row.len(),
                num_columns
            ),
        ));
    }
    Ok(())
}

fn parse_rcv_row(
    contest: &Contest,
    round: i64,
    row: &[String],
    num_columns: usize,
) -> LoadResult<Vec<Option<i64>>> {
    let label = format!("RCV{}", round);
    if row.first().map(|s| s.as_str()) != Some(label.as_str()) {
        return Err(mismatch(
            contest,
            format!("expected a row starting with {}, found {:?}", label, row.first()),
        ));
    }
    check_width(contest, row, num_columns)?;
    row.iter()
        .skip(LABEL_COLUMNS)
        .map(|cell| parse_cell(contest, cell))
        .collect()
}

fn parse_group_row(contest: &Contest, row: &[String]) -> LoadResult<Vec<i64>> {
    let mut res: Vec<i64> = Vec::with_capacity(row.len());
    for cell in row.iter().skip(LABEL_COLUMNS) {
        match parse_cell(contest, cell)? {
            Some(x) => res.push(x),
            None => {
                return Err(LoadError::InvalidValueFormat {
                    entity: "Contest",
                    id: Some(contest.id.clone()),
                    attr: RESULTS_ATTR,
                    raw: cell.clone(),
                    source: ConvertError::WrongType {
                        expected: "an integer",
                    },
                })
            }
        }
    }
    Ok(res)
}

/// Reads the detailed results of a contest from the header and the rows of
/// its results table.
///
/// The number of RCV rows is taken from the contest status (none if the
/// status was not loaded).
pub fn parse_contest_results(
    contest: &Contest,
    header: &[String],
    rows: Vec<Vec<String>>,
) -> LoadResult<ContestResults> {
    let num_columns = header.len();
    let expected = LABEL_COLUMNS + contest.results_mapping.column_count();
    if num_columns != expected {
        return Err(mismatch(
            contest,
            format!(
                "header has {} columns, expected {} (stats={} choices={})",
                num_columns,
                expected,
                contest.result_stat_count(),
                contest.choices.len()
            ),
        ));
    }

    let rounds = contest.rcv_rounds.unwrap_or(0).max(0);
    if (rows.len() as i64) < rounds {
        return Err(mismatch(
            contest,
            format!("{} RCV rounds but only {} rows", rounds, rows.len()),
        ));
    }

    let mut rcv_totals: Vec<Vec<Option<i64>>> = Vec::new();
    let mut remaining = rows.into_iter();
    for round in (1..=rounds).rev() {
        if let Some(row) = remaining.next() {
            rcv_totals.push(parse_rcv_row(contest, round, &row, num_columns)?);
        }
    }
    // First round first.
    rcv_totals.reverse();

    let mut group_rows: Vec<Vec<i64>> = Vec::new();
    for row in remaining {
        check_width(contest, &row, num_columns)?;
        group_rows.push(parse_group_row(contest, &row)?);
    }

    if group_rows.len() != contest.reporting_group_count() {
        return Err(mismatch(
            contest,
            format!(
                "{} result rows for {} reporting groups",
                group_rows.len(),
                contest.reporting_group_count()
            ),
        ));
    }
    debug!(
        "parse_contest_results: contest {}: {} rounds, {} rows",
        contest.id,
        rcv_totals.len(),
        group_rows.len()
    );
    Ok(ContestResults {
        rcv_totals,
        rows: group_rows,
    })
}

impl Election {
    /// Parses and attaches the detailed results of one contest.
    pub fn load_contest_results(
        &mut self,
        contest_id: &str,
        header: &[String],
        rows: Vec<Vec<String>>,
    ) -> LoadResult<()> {
        let contest = match self.contests.get_mut(contest_id) {
            Some(c) => c,
            None => {
                return Err(LoadError::DanglingReference {
                    entity: "Election",
                    id: None,
                    attr: "contests",
                    missing: contest_id.to_string(),
                })
            }
        };
        let results = parse_contest_results(contest, header, rows)?;
        contest.results = Some(results);
        Ok(())
    }
}
