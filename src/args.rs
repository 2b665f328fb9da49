use clap::Parser;

/// Computes voting cohesion metrics over legislative roll-call records.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path) The CSV file containing the roll-call data: one poll per
    /// column, one voter per row, votes encoded as 1 (yes), 0 (no) or empty
    /// (null). The metadata columns name, party and state are recognized when
    /// all three are present.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (rice_index or adjusted_rice_index) The cohesion metric to compute per
    /// poll. When absent, the transformed table is written out instead of
    /// scores.
    #[clap(short, long, value_parser)]
    pub metric: Option<String>,

    /// (float in (0, 1]) Drop the polls where a single vote value reaches
    /// this share of the non-null votes, before any other transformation.
    #[clap(long, value_parser)]
    pub majority_percentual: Option<f64>,

    /// (name, party or state) Collapse the rows sharing a value of this
    /// metadata column into one representative vote per poll.
    #[clap(short, long, value_parser)]
    pub groupby: Option<String>,

    /// Keep only the rows with one of these names. May be repeated.
    #[clap(long, value_parser)]
    pub name: Vec<String>,

    /// Keep only the rows with one of these parties. May be repeated.
    #[clap(long, value_parser)]
    pub party: Vec<String>,

    /// Keep only the rows with one of these states. May be repeated.
    #[clap(long, value_parser)]
    pub state: Vec<String>,

    /// (file path or empty) Where to write the results. Defaults to the
    /// standard output. A path ending in .json switches the output from CSV
    /// to a JSON summary.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
