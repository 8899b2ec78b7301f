// The layout of the input directory.

use std::path::{Path, PathBuf};

use crate::report::config_reader::ReportConfig;
use crate::report::*;

pub fn display_path(path: &Path) -> String {
    path.display().to_string()
}

/// Where the input files of a report are.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ReportPaths {
    pub election: PathBuf,
    pub results_dir: PathBuf,
    pub contest_status: PathBuf,
    results_file_name_format: String,
}

impl ReportPaths {
    pub fn from_config(config: &ReportConfig) -> ReportResult<ReportPaths> {
        let input_dir = PathBuf::from(config.input_directory());
        let results_dir = input_dir.join(config.results_directory());
        let results_file_name_format = config.results_file_name_format();
        if !results_file_name_format.contains("{}") {
            whatever!(
                "The results file name format {:?} has no {{}} placeholder for the contest id",
                results_file_name_format
            )
        }
        Ok(ReportPaths {
            election: input_dir.join(config.election_file()),
            contest_status: results_dir.join(config.contest_status_file()),
            results_dir,
            results_file_name_format,
        })
    }

    pub fn contest_results(&self, contest_id: &str) -> PathBuf {
        self.results_dir
            .join(self.results_file_name_format.replacen("{}", contest_id, 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout() {
        let config = ReportConfig {
            input_directory: Some("/data/june".to_string()),
            ..ReportConfig::default()
        };
        let paths = ReportPaths::from_config(&config).unwrap();
        assert_eq!(paths.election, PathBuf::from("/data/june/election.json"));
        assert_eq!(
            paths.contest_status,
            PathBuf::from("/data/june/resultdata/contest-status.json")
        );
        assert_eq!(
            paths.contest_results("C1"),
            PathBuf::from("/data/june/resultdata/results-C1.tsv")
        );
    }

    #[test]
    fn custom_results_format() {
        let config = ReportConfig {
            input_directory: Some("/data".to_string()),
            results_directory: Some("details".to_string()),
            results_file_name_format: Some("{}.psv".to_string()),
            ..ReportConfig::default()
        };
        let paths = ReportPaths::from_config(&config).unwrap();
        assert_eq!(paths.contest_results("M1"), PathBuf::from("/data/details/M1.psv"));

        let config = ReportConfig {
            results_file_name_format: Some("results.tsv".to_string()),
            ..ReportConfig::default()
        };
        assert!(ReportPaths::from_config(&config).is_err());
    }
}
