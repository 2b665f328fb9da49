mod config;
pub mod builder;
pub mod manual;

use log::{debug, info};

use std::collections::{BTreeMap, HashSet};

pub use crate::config::*;

/// The metadata columns recognized at construction time, exact match.
///
/// They are split out of the vote table only when all of them are present;
/// a table without them is pure vote data and cannot be filtered or grouped.
pub const METADATA_COLUMNS: [&str; 3] = ["name", "party", "state"];

// **** Metrics ****

/// Computes the Rice Index of a sequence of votes, ignoring null votes.
///
/// The index is the absolute difference between the yes and no counts divided
/// by the number of counted votes: 0 for a perfectly split poll, 1 for a
/// unanimous one. It is undefined when no vote was counted.
pub fn rice_index(votes: &[VoteValue]) -> Option<f64> {
    let yes = votes.iter().filter(|v| **v == VoteValue::Yes).count();
    let no = votes.iter().filter(|v| **v == VoteValue::No).count();
    let total = yes + no;
    if total == 0 {
        return None;
    }
    Some((yes as f64 - no as f64).abs() / total as f64)
}

/// Computes the Adjusted Rice Index, a small-sample bias correction of
/// [rice_index].
///
/// With `r` the raw index and `t` the number of counted votes, the adjusted
/// value is `(t * r^2 + t - 2) / (2 * (t - 1))`. It is undefined whenever the
/// raw index is, and also for a single counted vote. The result may fall
/// outside [0, 1] for very small samples; this is a property of the
/// estimator, not an error.
pub fn adjusted_rice_index(votes: &[VoteValue]) -> Option<f64> {
    let r = rice_index(votes)?;
    let total = votes.iter().filter(|v| !v.is_null()).count();
    if total <= 1 {
        return None;
    }
    let t = total as f64;
    Some((t * r * r + t - 2.0) / (2.0 * (t - 1.0)))
}

/// Applies a metric independently to each poll column of a vote matrix.
///
/// `vote_rows` is row-major: one entry per voter (or group), each of length
/// `num_polls`. The results come back in column order. With no rows, every
/// poll sees an empty sequence and gets the metric's undefined result.
pub fn calculate_metric(
    num_polls: usize,
    vote_rows: &[Vec<VoteValue>],
    metric: MetricKind,
) -> Vec<Option<f64>> {
    (0..num_polls)
        .map(|col| {
            let column: Vec<VoteValue> = vote_rows.iter().map(|row| row[col]).collect();
            metric.apply(&column)
        })
        .collect()
}

// **** The roll-call table ****

#[derive(Eq, PartialEq, Debug, Clone)]
struct MetadataTable {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

/// A tabular roll-call dataset: one column per poll, one row per voter (or
/// one per group after aggregation), with the recognized metadata columns
/// held apart from the votes, aligned row by row.
///
/// A table is built once and then transformed through a chain of consuming
/// operations; each transformation returns the new table.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Rollcall {
    polls: Vec<String>,
    votes: Vec<Vec<VoteValue>>,
    metadata: Option<MetadataTable>,
    coding: VoteCoding,
    grouped_by: Option<String>,
}

impl Rollcall {
    /// Builds a roll-call table from a header and rows of raw cells.
    ///
    /// Cells under the poll columns are decoded with `coding`; everything
    /// that is not a yes/no sentinel becomes a null vote. Ragged rows and
    /// duplicated poll columns are rejected.
    pub fn from_table(
        columns: &[String],
        rows: &[Vec<String>],
        coding: &VoteCoding,
    ) -> Result<Rollcall, CohesionErrors> {
        if columns.is_empty() {
            return Err(CohesionErrors::EmptyHeader);
        }
        for row in rows.iter() {
            if row.len() != columns.len() {
                return Err(CohesionErrors::MismatchedRow);
            }
        }

        let has_metadata = METADATA_COLUMNS
            .iter()
            .all(|m| columns.iter().any(|c| c == m));
        let meta_idx: Vec<usize> = if has_metadata {
            columns
                .iter()
                .enumerate()
                .filter(|(_, c)| METADATA_COLUMNS.contains(&c.as_str()))
                .map(|(idx, _)| idx)
                .collect()
        } else {
            Vec::new()
        };
        let poll_idx: Vec<usize> = (0..columns.len())
            .filter(|idx| !meta_idx.contains(idx))
            .collect();

        let polls: Vec<String> = poll_idx.iter().map(|&idx| columns[idx].clone()).collect();
        let mut seen: HashSet<&String> = HashSet::new();
        for name in polls.iter() {
            if !seen.insert(name) {
                return Err(CohesionErrors::DuplicatePollColumn);
            }
        }

        let votes: Vec<Vec<VoteValue>> = rows
            .iter()
            .map(|row| poll_idx.iter().map(|&idx| coding.decode(&row[idx])).collect())
            .collect();
        let metadata = if has_metadata {
            Some(MetadataTable {
                columns: meta_idx.iter().map(|&idx| columns[idx].clone()).collect(),
                rows: rows
                    .iter()
                    .map(|row| meta_idx.iter().map(|&idx| row[idx].clone()).collect())
                    .collect(),
            })
        } else {
            None
        };
        debug!(
            "from_table: {} rows, {} polls, metadata: {}",
            votes.len(),
            polls.len(),
            has_metadata
        );

        Ok(Rollcall {
            polls,
            votes,
            metadata,
            coding: coding.clone(),
            grouped_by: None,
        })
    }

    pub fn poll_names(&self) -> &[String] {
        &self.polls
    }

    pub fn vote_rows(&self) -> &[Vec<VoteValue>] {
        &self.votes
    }

    pub fn num_rows(&self) -> usize {
        self.votes.len()
    }

    pub fn has_metadata(&self) -> bool {
        self.metadata.is_some()
    }

    /// The metadata column the rows were collapsed by, if grouping happened.
    pub fn group_key(&self) -> Option<&str> {
        self.grouped_by.as_deref()
    }

    /// Keeps only the rows matching every constraining filter.
    ///
    /// Filters with an empty value set, filters naming an unknown column and
    /// filtering without metadata are all silent no-ops, so that optional
    /// command line flags compose freely.
    pub fn filter(self, filters: &[MetadataFilter]) -> Rollcall {
        let metadata = match &self.metadata {
            Some(m) => m,
            None => return self,
        };
        let active: Vec<(usize, &MetadataFilter)> = filters
            .iter()
            .filter(|f| !f.values.is_empty())
            .filter_map(|f| {
                metadata
                    .columns
                    .iter()
                    .position(|c| *c == f.column)
                    .map(|idx| (idx, f))
            })
            .collect();
        if active.is_empty() {
            return self;
        }

        let mask: Vec<bool> = metadata
            .rows
            .iter()
            .map(|row| {
                active
                    .iter()
                    .all(|(idx, f)| f.values.contains(&row[*idx]))
            })
            .collect();
        debug!(
            "filter: keeping {} of {} rows",
            mask.iter().filter(|m| **m).count(),
            mask.len()
        );

        let keep = |rows: &[Vec<String>]| -> Vec<Vec<String>> {
            rows.iter()
                .zip(mask.iter())
                .filter(|(_, m)| **m)
                .map(|(row, _)| row.clone())
                .collect()
        };
        let votes: Vec<Vec<VoteValue>> = self
            .votes
            .iter()
            .zip(mask.iter())
            .filter(|(_, m)| **m)
            .map(|(row, _)| row.clone())
            .collect();
        let metadata = MetadataTable {
            columns: metadata.columns.clone(),
            rows: keep(&metadata.rows),
        };
        Rollcall {
            polls: self.polls,
            votes,
            metadata: Some(metadata),
            coding: self.coding,
            grouped_by: self.grouped_by,
        }
    }

    /// Drops every poll where a single vote value reaches `majority_percentual`
    /// of the non-null votes. An unset threshold is the identity.
    ///
    /// A poll with zero non-null votes is never considered unanimous and is
    /// always kept. Row count is unaffected.
    pub fn remove_unanimous_votes(self, majority_percentual: Option<f64>) -> Rollcall {
        let threshold = match majority_percentual {
            Some(t) => t,
            None => return self,
        };
        let keep: Vec<bool> = (0..self.polls.len())
            .map(|col| {
                let yes = self
                    .votes
                    .iter()
                    .filter(|row| row[col] == VoteValue::Yes)
                    .count();
                let no = self
                    .votes
                    .iter()
                    .filter(|row| row[col] == VoteValue::No)
                    .count();
                let total = yes + no;
                // A poll nobody voted on is not unanimous.
                if total == 0 {
                    return true;
                }
                let top_share = yes.max(no) as f64 / total as f64;
                top_share < threshold
            })
            .collect();
        if keep.iter().all(|k| *k) {
            return self;
        }

        let dropped: Vec<&String> = self
            .polls
            .iter()
            .zip(keep.iter())
            .filter(|(_, k)| !**k)
            .map(|(name, _)| name)
            .collect();
        debug!("remove_unanimous_votes: dropping polls {:?}", dropped);

        let polls: Vec<String> = self
            .polls
            .iter()
            .zip(keep.iter())
            .filter(|(_, k)| **k)
            .map(|(name, _)| name.clone())
            .collect();
        let votes: Vec<Vec<VoteValue>> = self
            .votes
            .iter()
            .map(|row| {
                row.iter()
                    .zip(keep.iter())
                    .filter(|(_, k)| **k)
                    .map(|(v, _)| *v)
                    .collect()
            })
            .collect();
        Rollcall {
            polls,
            votes,
            metadata: self.metadata,
            coding: self.coding,
            grouped_by: self.grouped_by,
        }
    }

    /// Collapses the rows sharing a value of the `group_by` metadata column
    /// into one representative row per group: for each poll, the most
    /// frequent non-null vote of the partition (null when the partition has
    /// no counted vote at all).
    ///
    /// Grouping without metadata or by an unknown column is a silent no-op.
    /// Groups come out sorted by key, and ties in the mode break toward the
    /// numerically smallest vote value (no before yes).
    pub fn median_votes_grouped_by(self, group_by: Option<&str>) -> Rollcall {
        let key = match group_by {
            Some(k) => k,
            None => return self,
        };
        let metadata = match &self.metadata {
            Some(m) => m,
            None => return self,
        };
        let key_idx = match metadata.columns.iter().position(|c| c == key) {
            Some(idx) => idx,
            None => {
                debug!("median_votes_grouped_by: unknown column {:?}, skipping", key);
                return self;
            }
        };

        let mut groups: BTreeMap<&String, Vec<usize>> = BTreeMap::new();
        for (row_idx, row) in metadata.rows.iter().enumerate() {
            groups.entry(&row[key_idx]).or_default().push(row_idx);
        }
        debug!(
            "median_votes_grouped_by: {} groups by {:?}",
            groups.len(),
            key
        );

        let mut labels: Vec<Vec<String>> = Vec::with_capacity(groups.len());
        let mut votes: Vec<Vec<VoteValue>> = Vec::with_capacity(groups.len());
        for (label, members) in groups.iter() {
            let row: Vec<VoteValue> = (0..self.polls.len())
                .map(|col| vote_mode(members.iter().map(|&row_idx| self.votes[row_idx][col])))
                .collect();
            labels.push(vec![(*label).clone()]);
            votes.push(row);
        }
        Rollcall {
            polls: self.polls,
            votes,
            metadata: Some(MetadataTable {
                columns: vec![key.to_string()],
                rows: labels,
            }),
            coding: self.coding,
            grouped_by: Some(key.to_string()),
        }
    }

    /// Renders the table with its raw sentinels: the group-key column first
    /// when the rows were grouped, then the polls, nulls as `None`.
    pub fn table_view(&self) -> TableView {
        let mut columns: Vec<String> = Vec::new();
        let grouped = match (&self.grouped_by, &self.metadata) {
            (Some(key), Some(metadata)) => {
                columns.push(key.clone());
                Some(metadata)
            }
            _ => None,
        };
        columns.extend(self.polls.iter().cloned());

        let rows: Vec<Vec<Option<String>>> = self
            .votes
            .iter()
            .enumerate()
            .map(|(row_idx, row)| {
                let mut cells: Vec<Option<String>> = Vec::with_capacity(columns.len());
                if let Some(metadata) = grouped {
                    cells.push(Some(metadata.rows[row_idx][0].clone()));
                }
                cells.extend(
                    row.iter()
                        .map(|v| self.coding.encode(*v).map(|s| s.to_string())),
                );
                cells
            })
            .collect();
        TableView { columns, rows }
    }
}

/// The most frequent non-null vote, ties broken toward the smallest value.
fn vote_mode(votes: impl Iterator<Item = VoteValue>) -> VoteValue {
    let mut yes: usize = 0;
    let mut no: usize = 0;
    for v in votes {
        match v {
            VoteValue::Yes => yes += 1,
            VoteValue::No => no += 1,
            VoteValue::Null => {}
        }
    }
    if yes + no == 0 {
        VoteValue::Null
    } else if yes > no {
        VoteValue::Yes
    } else {
        VoteValue::No
    }
}

// **** The pipeline ****

/// Runs the full analysis over a roll-call table with the given rules.
///
/// The transformations apply in a fixed order: unanimous-poll removal, then
/// row filtering, then grouping. With a metric selected, the result is one
/// score (possibly undefined) per remaining poll, in column order; without
/// one, it is the transformed table itself.
pub fn run_cohesion_stats(
    rollcall: Rollcall,
    rules: &AnalysisRules,
) -> Result<AnalysisOutcome, CohesionErrors> {
    info!(
        "run_cohesion_stats: processing {} rows over {} polls, rules: {:?}",
        rollcall.num_rows(),
        rollcall.poll_names().len(),
        rules
    );
    let transformed = rollcall
        .remove_unanimous_votes(rules.majority_percentual)
        .filter(&rules.filters)
        .median_votes_grouped_by(rules.group_by.as_deref());
    info!(
        "run_cohesion_stats: {} rows over {} polls after transformations",
        transformed.num_rows(),
        transformed.poll_names().len()
    );

    match rules.metric {
        Some(metric) => {
            let scores = calculate_metric(transformed.polls.len(), &transformed.votes, metric);
            let polls = transformed
                .polls
                .iter()
                .zip(scores)
                .map(|(name, score)| PollScore {
                    poll: name.clone(),
                    score,
                })
                .collect();
            Ok(AnalysisOutcome::Scores(polls))
        }
        None => Ok(AnalysisOutcome::Table(transformed.table_view())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const Y: VoteValue = VoteValue::Yes;
    const N: VoteValue = VoteValue::No;
    const X: VoteValue = VoteValue::Null;

    fn close(a: Option<f64>, b: f64) -> bool {
        match a {
            Some(x) => (x - b).abs() < 1e-12,
            None => false,
        }
    }

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    fn plain_table(columns: &[&str], rows: &[&[&str]]) -> Rollcall {
        let rows: Vec<Vec<String>> = rows.iter().map(|r| strings(r)).collect();
        Rollcall::from_table(&strings(columns), &rows, &VoteCoding::numeric()).unwrap()
    }

    #[test]
    fn rice_index_counts_only_yes_and_no() {
        assert_eq!(rice_index(&[]), None);
        assert_eq!(rice_index(&[X, X]), None);
        assert!(close(rice_index(&[N, Y]), 0.0));
        assert!(close(rice_index(&[N, N, N]), 1.0));
        assert!(close(rice_index(&[N, N, Y]), 0.3333333333333333));
        assert!(close(rice_index(&[N, Y, Y, Y]), 0.5));
        assert!(close(rice_index(&[N, X, Y, X]), 0.0));
    }

    #[test]
    fn rice_index_stays_in_unit_interval() {
        let sequences: Vec<Vec<VoteValue>> = vec![
            vec![Y],
            vec![N, N, Y, Y, Y],
            vec![X, Y, N, N, X, N],
            vec![Y, Y, Y, Y, N],
        ];
        for votes in sequences {
            let r = rice_index(&votes).unwrap();
            assert!((0.0..=1.0).contains(&r), "out of range for {:?}", votes);
        }
    }

    #[test]
    fn adjusted_rice_index_corrects_small_samples() {
        assert!(close(adjusted_rice_index(&[N, N, Y, Y]), 1.0 / 3.0));
        assert!(close(adjusted_rice_index(&[N, N, N, Y, Y, Y]), 0.4));
        // Defined exactly when more than one vote was counted.
        assert_eq!(adjusted_rice_index(&[]), None);
        assert_eq!(adjusted_rice_index(&[Y]), None);
        assert_eq!(adjusted_rice_index(&[Y, X, X]), None);
        assert!(close(adjusted_rice_index(&[Y, Y]), 1.0));
    }

    #[test]
    fn calculate_metric_applies_per_column() {
        let rows = vec![vec![N, Y, N], vec![Y, X, N]];
        let scores = calculate_metric(3, &rows, MetricKind::RiceIndex);
        assert!(close(scores[0].clone(), 0.0));
        assert!(close(scores[1].clone(), 1.0));
        assert!(close(scores[2].clone(), 1.0));
        // Polls with no rows at all yield the metric's undefined result.
        assert_eq!(
            calculate_metric(2, &[], MetricKind::AdjustedRiceIndex),
            vec![None, None]
        );
        assert!(calculate_metric(0, &rows[..1], MetricKind::RiceIndex).is_empty());
    }

    #[test]
    fn construction_splits_metadata_only_when_complete() {
        let with_meta = plain_table(
            &["name", "party", "state", "poll1"],
            &[&["Joao", "PT", "PB", "1"]],
        );
        assert!(with_meta.has_metadata());
        assert_eq!(with_meta.poll_names(), &["poll1".to_string()]);

        // A partial set of metadata columns is treated as vote data.
        let partial = plain_table(&["name", "party", "poll1"], &[&["Joao", "PT", "1"]]);
        assert!(!partial.has_metadata());
        assert_eq!(partial.poll_names().len(), 3);
    }

    #[test]
    fn construction_rejects_malformed_tables() {
        let err = Rollcall::from_table(&[], &[], &VoteCoding::numeric());
        assert_eq!(err, Err(CohesionErrors::EmptyHeader));

        let err = Rollcall::from_table(
            &strings(&["poll1", "poll1"]),
            &[strings(&["1", "0"])],
            &VoteCoding::numeric(),
        );
        assert_eq!(err, Err(CohesionErrors::DuplicatePollColumn));

        let err = Rollcall::from_table(
            &strings(&["poll1", "poll2"]),
            &[strings(&["1"])],
            &VoteCoding::numeric(),
        );
        assert_eq!(err, Err(CohesionErrors::MismatchedRow));
    }

    #[test]
    fn filter_keeps_matching_rows_aligned() {
        let rollcall = plain_table(
            &["name", "party", "state", "poll1"],
            &[&["Joao", "PT", "PB", "1"], &["Pedro", "PSOL", "PE", "0"]],
        );
        let filtered = rollcall.filter(&[MetadataFilter::new("state", &["PE"])]);
        assert_eq!(filtered.num_rows(), 1);
        assert_eq!(filtered.vote_rows()[0], vec![N]);
        // The surviving metadata row is still Pedro's.
        let grouped = filtered.median_votes_grouped_by(Some("name"));
        assert_eq!(grouped.table_view().rows[0][0], Some("Pedro".to_string()));
    }

    #[test]
    fn filter_combines_columns_with_and() {
        let rollcall = plain_table(
            &["name", "party", "state", "poll1"],
            &[
                &["Joao", "PT", "PB", "1"],
                &["Joana", "PT", "PE", "1"],
                &["Pedro", "PSOL", "PE", "0"],
            ],
        );
        let filtered = rollcall.filter(&[
            MetadataFilter::new("party", &["PT"]),
            MetadataFilter::new("state", &["PE"]),
        ]);
        assert_eq!(filtered.num_rows(), 1);
        assert_eq!(filtered.vote_rows()[0], vec![Y]);
    }

    #[test]
    fn filter_tolerates_unconstrained_specs() {
        let rollcall = plain_table(
            &["name", "party", "state", "poll1"],
            &[&["Joao", "PT", "PB", "1"], &["Pedro", "PSOL", "PE", "0"]],
        );
        // Empty value sets and unknown columns impose no constraint.
        let unchanged = rollcall
            .clone()
            .filter(&[
                MetadataFilter::new("state", &[]),
                MetadataFilter::new("city", &["Recife"]),
            ]);
        assert_eq!(unchanged, rollcall);

        // No metadata at all: filtering is impossible and does nothing.
        let bare = plain_table(&["poll1"], &[&["1"], &["0"]]);
        let filtered = bare
            .clone()
            .filter(&[MetadataFilter::new("state", &["PE"])]);
        assert_eq!(filtered, bare);
    }

    #[test]
    fn remove_unanimous_votes_unset_is_identity() {
        let rollcall = plain_table(&["poll1"], &[&["1"], &["1"], &["1"]]);
        let unchanged = rollcall.clone().remove_unanimous_votes(None);
        assert_eq!(unchanged, rollcall);
    }

    #[test]
    fn remove_unanimous_votes_drops_dominated_polls() {
        let rollcall = plain_table(
            &["poll1", "poll2"],
            &[&["1", "1"], &["1", "1"], &["1", "0"], &["0", "0"]],
        );
        // poll1 is 75% yes and goes; poll2 is an even split and stays.
        let trimmed = rollcall.remove_unanimous_votes(Some(0.75));
        assert_eq!(trimmed.poll_names(), &["poll2".to_string()]);
        assert_eq!(trimmed.num_rows(), 4);
    }

    #[test]
    fn remove_unanimous_votes_ignores_null_votes() {
        let rollcall = plain_table(
            &["poll1", "poll2"],
            &[&["1", ""], &["", ""], &["", ""], &["0", ""]],
        );
        // poll1 splits 50/50 over its two counted votes; poll2 has no votes
        // at all and is deliberately never dropped.
        let trimmed = rollcall.remove_unanimous_votes(Some(0.9));
        assert_eq!(
            trimmed.poll_names(),
            &["poll1".to_string(), "poll2".to_string()]
        );
    }

    #[test]
    fn grouping_collapses_rows_to_modal_votes() {
        let rollcall = plain_table(
            &["name", "party", "state", "poll1"],
            &[
                &["Joao", "PT", "PB", "1"],
                &["Joana", "PT", "PB", "1"],
                &["Marcio", "PT", "PB", "0"],
                &["Pedro", "PSOL", "PE", "0"],
            ],
        );
        let grouped = rollcall.median_votes_grouped_by(Some("party"));
        assert_eq!(grouped.group_key(), Some("party"));
        // Groups come out sorted by key: PSOL before PT.
        assert_eq!(grouped.vote_rows(), &[vec![N], vec![Y]]);
        let view = grouped.table_view();
        assert_eq!(view.columns, strings(&["party", "poll1"]));
        assert_eq!(
            view.rows,
            vec![
                vec![Some("PSOL".to_string()), Some("0".to_string())],
                vec![Some("PT".to_string()), Some("1".to_string())],
            ]
        );
    }

    #[test]
    fn grouping_ties_break_toward_no() {
        let rollcall = plain_table(
            &["name", "party", "state", "poll1", "poll2"],
            &[&["Joao", "PT", "PB", "1", ""], &["Joana", "PT", "PB", "0", ""]],
        );
        let grouped = rollcall.median_votes_grouped_by(Some("party"));
        // poll1 is a 1-1 tie; poll2 has no counted vote in the partition.
        assert_eq!(grouped.vote_rows(), &[vec![N, X]]);
    }

    #[test]
    fn grouping_by_unknown_column_is_a_noop() {
        let rollcall = plain_table(
            &["name", "party", "state", "poll1"],
            &[&["Joao", "PT", "PB", "1"], &["Pedro", "PSOL", "PE", "0"]],
        );
        let unchanged = rollcall.clone().median_votes_grouped_by(Some("city"));
        assert_eq!(unchanged, rollcall);
        let unchanged = rollcall.clone().median_votes_grouped_by(None);
        assert_eq!(unchanged, rollcall);

        let bare = plain_table(&["poll1"], &[&["1"]]);
        let unchanged = bare.clone().median_votes_grouped_by(Some("party"));
        assert_eq!(unchanged, bare);
    }

    #[test]
    fn run_cohesion_stats_scores_each_poll() {
        let rollcall = plain_table(
            &["poll1", "poll2", "poll3"],
            &[&["0", "", "1"], &["1", "1", "1"]],
        );
        let rules = AnalysisRules {
            metric: Some(MetricKind::AdjustedRiceIndex),
            ..AnalysisRules::DEFAULT_RULES
        };
        let outcome = run_cohesion_stats(rollcall, &rules).unwrap();
        match outcome {
            AnalysisOutcome::Scores(scores) => {
                assert_eq!(scores.len(), 3);
                assert_eq!(scores[0].poll, "poll1");
                assert!(close(scores[0].score, 0.0));
                // A single counted vote: the adjustment is undefined.
                assert_eq!(scores[1].score, None);
                assert!(close(scores[2].score, 1.0));
            }
            other => panic!("expected scores, got {:?}", other),
        }
    }

    #[test]
    fn run_cohesion_stats_full_pipeline() {
        let rollcall = plain_table(
            &["name", "party", "state", "poll1", "poll2"],
            &[
                &["Joao", "PT", "PB", "1", "1"],
                &["Joana", "PT", "PB", "1", "1"],
                &["Marcio", "PT", "PB", "0", "1"],
                &["Pedro", "PSOL", "PE", "0", "1"],
                &["Maria", "PSOL", "PE", "0", "0"],
            ],
        );
        let rules = AnalysisRules {
            metric: Some(MetricKind::RiceIndex),
            majority_percentual: Some(0.8),
            group_by: Some("party".to_string()),
            filters: vec![MetadataFilter::new("state", &["PB", "PE"])],
        };
        // poll2 is 80% yes and is removed; grouping leaves one modal vote
        // per party on poll1, a perfect split.
        let outcome = run_cohesion_stats(rollcall, &rules).unwrap();
        match outcome {
            AnalysisOutcome::Scores(scores) => {
                assert_eq!(scores.len(), 1);
                assert_eq!(scores[0].poll, "poll1");
                assert!(close(scores[0].score, 0.0));
            }
            other => panic!("expected scores, got {:?}", other),
        }
    }

    #[test]
    fn run_cohesion_stats_without_metric_returns_rows() {
        let rollcall = plain_table(
            &["name", "party", "state", "poll1"],
            &[&["Joao", "PT", "PB", "1"], &["Pedro", "PSOL", "PE", ""]],
        );
        let outcome = run_cohesion_stats(rollcall, &AnalysisRules::DEFAULT_RULES).unwrap();
        match outcome {
            AnalysisOutcome::Table(view) => {
                // No grouping requested: plain poll columns, nulls explicit.
                assert_eq!(view.columns, strings(&["poll1"]));
                assert_eq!(
                    view.rows,
                    vec![vec![Some("1".to_string())], vec![None]]
                );
            }
            other => panic!("expected a table, got {:?}", other),
        }
    }
}
