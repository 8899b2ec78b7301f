use crate::report::*;

use serde::{Deserialize, Serialize};

pub const DEFAULT_ELECTION_FILE: &str = "election.json";
pub const DEFAULT_RESULTS_DIR: &str = "resultdata";
pub const DEFAULT_RESULTS_FILE_NAME_FORMAT: &str = "results-{}.tsv";
pub const DEFAULT_CONTEST_STATUS_FILE: &str = "contest-status.json";
pub const DEFAULT_CONTINUING_STAT_ID: &str = "RSCnt";

/// The configuration of a report. All the keys are optional.
#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    /// The directory with the election file and the results directory.
    #[serde(rename = "inputDirectory")]
    pub input_directory: Option<String>,
    #[serde(rename = "electionFile")]
    pub election_file: Option<String>,
    /// Relative to the input directory.
    #[serde(rename = "resultsDirectory")]
    pub results_directory: Option<String>,
    /// `{}` is replaced by the id of the contest.
    #[serde(rename = "resultsFileNameFormat")]
    pub results_file_name_format: Option<String>,
    /// Relative to the results directory.
    #[serde(rename = "contestStatusFile")]
    pub contest_status_file: Option<String>,
    #[serde(rename = "continuingStatId")]
    pub continuing_stat_id: Option<String>,
    #[serde(rename = "loadStatus")]
    pub load_status: Option<bool>,
    #[serde(rename = "loadResults")]
    pub load_results: Option<bool>,
}

impl ReportConfig {
    pub fn input_directory(&self) -> String {
        self.input_directory.clone().unwrap_or_else(|| ".".to_string())
    }

    pub fn election_file(&self) -> String {
        self.election_file
            .clone()
            .unwrap_or_else(|| DEFAULT_ELECTION_FILE.to_string())
    }

    pub fn results_directory(&self) -> String {
        self.results_directory
            .clone()
            .unwrap_or_else(|| DEFAULT_RESULTS_DIR.to_string())
    }

    pub fn results_file_name_format(&self) -> String {
        self.results_file_name_format
            .clone()
            .unwrap_or_else(|| DEFAULT_RESULTS_FILE_NAME_FORMAT.to_string())
    }

    pub fn contest_status_file(&self) -> String {
        self.contest_status_file
            .clone()
            .unwrap_or_else(|| DEFAULT_CONTEST_STATUS_FILE.to_string())
    }

    pub fn continuing_stat_id(&self) -> String {
        self.continuing_stat_id
            .clone()
            .unwrap_or_else(|| DEFAULT_CONTINUING_STAT_ID.to_string())
    }

    pub fn load_status(&self) -> bool {
        self.load_status.unwrap_or(true)
    }

    pub fn load_results(&self) -> bool {
        self.load_results.unwrap_or(true)
    }
}

/// Reads a configuration file. A relative input directory is resolved
/// against the directory of the configuration file.
pub fn read_config(path: &Path) -> ReportResult<ReportConfig> {
    let p = display_path(path);
    let config_str = fs::read_to_string(path).context(OpeningFileSnafu { path: p.clone() })?;
    let mut config: ReportConfig =
        serde_json::from_str(&config_str).context(ParsingJsonSnafu { path: p })?;
    let config_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let input_dir = config_dir.join(config.input_directory());
    config.input_directory = Some(display_path(&input_dir));
    debug!("read_config: {:?}", config);
    Ok(config)
}
