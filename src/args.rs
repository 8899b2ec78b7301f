use clap::Parser;

/// This program loads an election results export and summarizes it.
#[derive(Parser, Debug, Clone, Default)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON configuration file. See the documentation of ReportConfig for the keys.
    /// Relative directories in the configuration are resolved against the directory of this file.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (directory, optional) The directory containing the election file and the result data.
    /// Setting this option overrides the directory that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the summary of the election will be written in JSON format to the given
    /// location.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference summary in JSON format. If provided, elrep will check that the computed summary
    /// matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (default RSCnt) The id of the result stat type holding the continuing ballots of RCV rounds.
    #[clap(long, value_parser)]
    pub continuing_stat: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
