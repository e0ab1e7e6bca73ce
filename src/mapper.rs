//! Column mapper state: four buckets that partition the preview's columns.
//!
//! Every bucket change goes through a single relocation step that keeps the
//! partition invariant: every preview column sits in exactly one bucket.
//! Drag events and manual add/remove are expressed in terms of it.

use std::collections::{HashMap, HashSet};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::{
    bucket::{Bucket, ColumnSet},
    heuristic,
    preview::{CsvPreview, PreviewColumn},
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MapperError {
    #[error("preview '{0}' does not contain any columns")]
    EmptyPreview(String),
    #[error("preview '{file}' lists column '{column}' more than once")]
    DuplicateColumn { file: String, column: String },
}

/// Column names submitted for import, in bucket insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub input: Vec<String>,
    pub expected: Vec<String>,
    pub metadata: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedState {
    Unseeded,
    Seeded,
}

/// Result of offering a preview to the mapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewOutcome {
    /// Buckets were populated from the preview.
    Seeded,
    /// The mapper was already seeded; nothing changed.
    Retained,
}

/// A finished drag gesture. `source` and `target` are raw card identifiers;
/// `target` is `None` when the column was dropped outside every card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropEvent {
    pub column: String,
    pub source: Option<String>,
    pub target: Option<String>,
}

impl DropEvent {
    pub fn new(column: &str, source: &str, target: Option<&str>) -> Self {
        Self {
            column: column.to_string(),
            source: Some(source.to_string()),
            target: target.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ColumnMapper {
    state: SeedState,
    preview: Option<CsvPreview>,
    buckets: [ColumnSet; 4],
    /// Where `add_to_bucket` took each column from, so a later remove can
    /// put it back.
    origins: HashMap<String, Bucket>,
}

impl Default for ColumnMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl ColumnMapper {
    pub fn new() -> Self {
        Self {
            state: SeedState::Unseeded,
            preview: None,
            buckets: Default::default(),
            origins: HashMap::new(),
        }
    }

    pub fn state(&self) -> SeedState {
        self.state
    }

    pub fn preview(&self) -> Option<&CsvPreview> {
        self.preview.as_ref()
    }

    /// Seeds the buckets from `preview` the first time one arrives. Once
    /// seeded, later arrivals are ignored so user edits survive refreshes.
    pub fn load_preview(&mut self, preview: CsvPreview) -> Result<PreviewOutcome, MapperError> {
        if self.state == SeedState::Seeded {
            debug!(
                "Ignoring preview '{}' because the mapper is already seeded",
                preview.file_name
            );
            return Ok(PreviewOutcome::Retained);
        }
        if preview.columns.is_empty() {
            return Err(MapperError::EmptyPreview(preview.file_name));
        }
        let mut seen = HashSet::new();
        for column in &preview.columns {
            if !seen.insert(column.name.as_str()) {
                return Err(MapperError::DuplicateColumn {
                    file: preview.file_name.clone(),
                    column: column.name.clone(),
                });
            }
        }

        let names = preview.column_names();
        let picks = heuristic::default_assignment(&names);
        let mut buckets: [ColumnSet; 4] = Default::default();
        for name in names {
            let bucket = Bucket::ROLES
                .into_iter()
                .find(|role| picks.get(*role) == Some(name))
                .unwrap_or(Bucket::Unmapped);
            buckets[bucket.index()].insert(name);
        }
        info!(
            "Seeded {} column(s) from '{}': input={:?} expected={:?} metadata={:?}",
            preview.columns.len(),
            preview.file_name,
            picks.input,
            picks.expected,
            picks.metadata
        );

        self.buckets = buckets;
        self.origins.clear();
        self.preview = Some(preview);
        self.state = SeedState::Seeded;
        Ok(PreviewOutcome::Seeded)
    }

    /// Drops the preview and every assignment. Used when the dialog closes,
    /// the user cancels, or an import went through.
    pub fn reset(&mut self) {
        for set in &mut self.buckets {
            set.clear();
        }
        self.origins.clear();
        self.preview = None;
        self.state = SeedState::Unseeded;
    }

    pub fn bucket(&self, bucket: Bucket) -> &ColumnSet {
        &self.buckets[bucket.index()]
    }

    pub fn bucket_of(&self, column: &str) -> Option<Bucket> {
        Bucket::ALL
            .into_iter()
            .find(|bucket| self.bucket(*bucket).contains(column))
    }

    /// Preview columns assigned to `bucket`, in preview order.
    pub fn columns_in(&self, bucket: Bucket) -> Vec<&PreviewColumn> {
        let set = self.bucket(bucket);
        self.preview
            .iter()
            .flat_map(|preview| preview.columns.iter())
            .filter(|column| set.contains(&column.name))
            .collect()
    }

    /// Moves `column` from `from` to `to`. Returns `true` when the partition
    /// changed. Same-bucket moves and columns not currently in `from` are
    /// no-ops.
    pub fn move_column(&mut self, from: Bucket, to: Bucket, column: &str) -> bool {
        if !self.relocate(from, to, column) {
            return false;
        }
        self.origins.remove(column);
        true
    }

    fn relocate(&mut self, from: Bucket, to: Bucket, column: &str) -> bool {
        if from == to || !self.bucket(from).contains(column) {
            return false;
        }
        self.buckets[from.index()].remove(column);
        self.buckets[to.index()].insert(column);
        debug!("Moved column '{column}' from {from} to {to}");
        true
    }

    /// Applies a finished drag gesture. Drops without a target, or naming a
    /// card that is not a bucket, are ignored.
    pub fn apply_drop(&mut self, event: &DropEvent) -> bool {
        let Some(target) = event.target.as_deref() else {
            debug!("Drop of '{}' had no target", event.column);
            return false;
        };
        let Some(source) = event.source.as_deref() else {
            debug!("Drop of '{}' had no source card", event.column);
            return false;
        };
        if source == target {
            return false;
        }
        match (source.parse::<Bucket>(), target.parse::<Bucket>()) {
            (Ok(from), Ok(to)) => self.move_column(from, to, &event.column),
            _ => {
                debug!(
                    "Ignoring drop of '{}' from '{source}' to '{target}'",
                    event.column
                );
                false
            }
        }
    }

    /// Puts `column` into `bucket`, taking it from whichever bucket held it.
    pub fn add_to_bucket(&mut self, bucket: Bucket, column: &str) -> bool {
        let Some(current) = self.bucket_of(column) else {
            return false;
        };
        if !self.relocate(current, bucket, column) {
            return false;
        }
        self.origins.insert(column.to_string(), current);
        true
    }

    /// Takes `column` out of `bucket`. A column placed by `add_to_bucket`
    /// returns to the bucket it came from; anything else goes to `unmapped`.
    /// Removing a column from `unmapped` that was never added there is a
    /// no-op.
    pub fn remove_from_bucket(&mut self, bucket: Bucket, column: &str) -> bool {
        if !self.bucket(bucket).contains(column) {
            return false;
        }
        let destination = self
            .origins
            .get(column)
            .copied()
            .filter(|origin| *origin != bucket)
            .unwrap_or(Bucket::Unmapped);
        if !self.relocate(bucket, destination, column) {
            return false;
        }
        self.origins.remove(column);
        true
    }

    pub fn mapping(&self) -> ColumnMapping {
        ColumnMapping {
            input: self.bucket(Bucket::Input).to_vec(),
            expected: self.bucket(Bucket::Expected).to_vec(),
            metadata: self.bucket(Bucket::Metadata).to_vec(),
        }
    }

    pub fn can_submit(&self) -> bool {
        self.state == SeedState::Seeded && !self.bucket(Bucket::Input).is_empty()
    }
}
