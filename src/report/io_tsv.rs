// Primitives for reading delimited text files.
//
// The files are not quoted. Newlines and delimiters inside a field are
// replaced by look-alike characters when writing, and restored when reading.

use std::path::Path;

use csv::{QuoteStyle, ReaderBuilder, WriterBuilder};

use crate::report::*;

/// The delimiters that may be detected, by order of preference.
pub const DELIMITERS: [u8; 3] = [b'\t', b'|', b','];

/// A table read from a delimited file. The rows are padded with empty
/// strings up to the width of the header.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Table {
    pub delimiter: u8,
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn num_columns(&self) -> usize {
        self.header.len()
    }
}

// (field character, file character)
fn char_map(delimiter: u8) -> Option<[(char, char); 2]> {
    match delimiter {
        b'\t' => Some([('\n', '␤'), ('\t', '␉')]),
        b'|' => Some([('\n', '␤'), ('|', '¦')]),
        b',' => Some([('\n', '␤'), (',', '，')]),
        _ => None,
    }
}

pub fn escape_field(field: &str, delimiter: u8) -> String {
    match char_map(delimiter) {
        Some(map) => field
            .chars()
            .map(|c| map.iter().find(|(s, _)| *s == c).map_or(c, |(_, f)| *f))
            .collect(),
        None => field.to_string(),
    }
}

pub fn unescape_field(field: &str, delimiter: u8) -> String {
    match char_map(delimiter) {
        Some(map) => field
            .chars()
            .map(|c| map.iter().find(|(_, f)| *f == c).map_or(c, |(s, _)| *s))
            .collect(),
        None => field.to_string(),
    }
}

pub fn detect_delimiter(header_line: &str) -> Option<u8> {
    DELIMITERS
        .iter()
        .find(|d| header_line.as_bytes().contains(*d))
        .cloned()
}

/// Parses the content of a delimited file. `path` is only used in errors.
pub fn parse_table(contents: &str, path: &str) -> ReportResult<Table> {
    let header_line = contents.lines().next().context(EmptyTableSnafu { path })?;
    let delimiter = detect_delimiter(header_line).context(MissingDelimiterSnafu {
        path,
        line: header_line,
    })?;
    // Trailing whitespace is not significant. Trimmed delimiters come back
    // as empty cells through the padding.
    let trimmed: Vec<&str> = contents.lines().map(|l| l.trim_end()).collect();
    let trimmed = trimmed.join("\n");

    let mut rdr = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .quoting(false)
        .flexible(true)
        .from_reader(trimmed.as_bytes());

    let mut header: Vec<String> = Vec::new();
    let mut rows: Vec<Vec<String>> = Vec::new();
    for (idx, record_r) in rdr.records().enumerate() {
        let record = record_r.context(ReadingTableSnafu { path })?;
        let mut row: Vec<String> = record
            .iter()
            .map(|f| unescape_field(f, delimiter))
            .collect();
        if idx == 0 {
            header = row;
            continue;
        }
        if row.len() < header.len() {
            row.resize(header.len(), String::new());
        }
        debug!("parse_table: {}: line {}: {:?}", path, idx + 1, row);
        rows.push(row);
    }
    debug!(
        "parse_table: {}: delimiter {:?}, {} columns, {} rows",
        path,
        delimiter as char,
        header.len(),
        rows.len()
    );
    Ok(Table {
        delimiter,
        header,
        rows,
    })
}

pub fn read_table(path: &Path) -> ReportResult<Table> {
    let p = display_path(path);
    let contents = fs::read_to_string(path).context(OpeningFileSnafu { path: p.clone() })?;
    parse_table(&contents, &p)
}

pub fn write_table(path: &Path, table: &Table) -> ReportResult<()> {
    let p = display_path(path);
    let mut wtr = WriterBuilder::new()
        .delimiter(table.delimiter)
        .quote_style(QuoteStyle::Never)
        .from_path(path)
        .context(WritingTableSnafu { path: p.clone() })?;
    for row in std::iter::once(&table.header).chain(table.rows.iter()) {
        let escaped: Vec<String> = row
            .iter()
            .map(|f| escape_field(f, table.delimiter))
            .collect();
        wtr.write_record(&escaped)
            .context(WritingTableSnafu { path: p.clone() })?;
    }
    wtr.flush().context(WritingFileSnafu { path: p })?;
    Ok(())
}
