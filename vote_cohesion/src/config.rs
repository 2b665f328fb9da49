// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// All the possible states of a single roll-call response.
///
/// Anything that is not a recognized yes or no sentinel (an abstention, an
/// absence, an empty cell) is a null vote. Null votes are carried through the
/// table transformations but never counted by the metrics.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum VoteValue {
    No,
    Yes,
    Null,
}

impl VoteValue {
    pub fn is_null(&self) -> bool {
        matches!(self, VoteValue::Null)
    }
}

/// The pair of sentinel values that encode yes and no in a raw dataset.
///
/// Different sources encode roll-calls differently ("1"/"0", "yes"/"no", ...).
/// Decoding is an exact, case-sensitive match; every other cell is null.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct VoteCoding {
    pub yes: String,
    pub no: String,
}

impl VoteCoding {
    pub fn new(yes: &str, no: &str) -> VoteCoding {
        VoteCoding {
            yes: yes.to_string(),
            no: no.to_string(),
        }
    }

    /// The usual numeric encoding: 1 for yes, 0 for no.
    pub fn numeric() -> VoteCoding {
        VoteCoding::new("1", "0")
    }

    pub fn decode(&self, raw: &str) -> VoteValue {
        if raw == self.yes {
            VoteValue::Yes
        } else if raw == self.no {
            VoteValue::No
        } else {
            VoteValue::Null
        }
    }

    /// The raw sentinel for a vote value. Null votes have no sentinel.
    pub fn encode(&self, vote: VoteValue) -> Option<&str> {
        match vote {
            VoteValue::Yes => Some(self.yes.as_str()),
            VoteValue::No => Some(self.no.as_str()),
            VoteValue::Null => None,
        }
    }
}

impl Default for VoteCoding {
    fn default() -> VoteCoding {
        VoteCoding::numeric()
    }
}

// ********* Configuration **********

/// The cohesion metric to compute for each poll.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum MetricKind {
    RiceIndex,
    AdjustedRiceIndex,
}

impl MetricKind {
    /// Looks up a metric by its external name, as used on the command line.
    pub fn from_name(name: &str) -> Option<MetricKind> {
        match name {
            "rice_index" => Some(MetricKind::RiceIndex),
            "adjusted_rice_index" => Some(MetricKind::AdjustedRiceIndex),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            MetricKind::RiceIndex => "rice_index",
            MetricKind::AdjustedRiceIndex => "adjusted_rice_index",
        }
    }

    /// Applies the metric to one poll's votes. `None` when the metric is
    /// undefined for this sequence (see the module documentation).
    pub fn apply(&self, votes: &[VoteValue]) -> Option<f64> {
        match self {
            MetricKind::RiceIndex => crate::rice_index(votes),
            MetricKind::AdjustedRiceIndex => crate::adjusted_rice_index(votes),
        }
    }
}

/// One filtering constraint: keep only the rows whose value for `column` is
/// a member of `values`. An empty value set imposes no constraint.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct MetadataFilter {
    pub column: String,
    pub values: Vec<String>,
}

impl MetadataFilter {
    pub fn new(column: &str, values: &[&str]) -> MetadataFilter {
        MetadataFilter {
            column: column.to_string(),
            values: values.iter().map(|v| v.to_string()).collect(),
        }
    }
}

/// The options that govern one analysis run.
#[derive(PartialEq, Debug, Clone)]
pub struct AnalysisRules {
    /// The metric to compute per poll. When absent, the run returns the
    /// transformed table itself instead of scores.
    pub metric: Option<MetricKind>,
    /// Polls where a single vote value reaches this share of the non-null
    /// votes are dropped before anything else. Unset means no removal.
    pub majority_percentual: Option<f64>,
    /// The metadata column to collapse rows by. Unknown columns are ignored.
    pub group_by: Option<String>,
    pub filters: Vec<MetadataFilter>,
}

impl AnalysisRules {
    pub const DEFAULT_RULES: AnalysisRules = AnalysisRules {
        metric: None,
        majority_percentual: None,
        group_by: None,
        filters: Vec::new(),
    };
}

// ******** Output data structures *********

/// The metric result for a single poll, in input column order.
#[derive(PartialEq, Debug, Clone)]
pub struct PollScore {
    pub poll: String,
    /// `None` when the metric is undefined for this poll (no counted votes,
    /// or a sample too small for the adjustment).
    pub score: Option<f64>,
}

/// A rendering of the transformed table: the optional group-key column
/// followed by the poll columns, with nulls as explicit `None` cells.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct TableView {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

#[derive(PartialEq, Debug, Clone)]
pub enum AnalysisOutcome {
    Scores(Vec<PollScore>),
    Table(TableView),
}

/// Errors that prevent a roll-call table from being assembled.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum CohesionErrors {
    EmptyHeader,
    DuplicatePollColumn,
    MismatchedRow,
}

impl Error for CohesionErrors {}

impl Display for CohesionErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CohesionErrors::EmptyHeader => write!(f, "the table has no columns"),
            CohesionErrors::DuplicatePollColumn => {
                write!(f, "the table has duplicated poll columns")
            }
            CohesionErrors::MismatchedRow => {
                write!(f, "a row does not match the number of header columns")
            }
        }
    }
}
