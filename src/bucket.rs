//! Column buckets and the insertion-ordered name set each bucket owns.

use std::{fmt, str::FromStr};

use indexmap::IndexSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Input,
    Expected,
    Metadata,
    Unmapped,
}

impl Bucket {
    pub const ALL: [Bucket; 4] = [
        Bucket::Input,
        Bucket::Expected,
        Bucket::Metadata,
        Bucket::Unmapped,
    ];

    /// Buckets that end up in the submitted mapping.
    pub const ROLES: [Bucket; 3] = [Bucket::Input, Bucket::Expected, Bucket::Metadata];

    pub fn as_str(&self) -> &'static str {
        match self {
            Bucket::Input => "input",
            Bucket::Expected => "expected",
            Bucket::Metadata => "metadata",
            Bucket::Unmapped => "unmapped",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Bucket::Input => "Input",
            Bucket::Expected => "Expected",
            Bucket::Metadata => "Metadata",
            Bucket::Unmapped => "Not mapped",
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Bucket::Input => 0,
            Bucket::Expected => 1,
            Bucket::Metadata => 2,
            Bucket::Unmapped => 3,
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown bucket '{0}' (expected input, expected, metadata or unmapped)")]
pub struct UnknownBucket(pub String);

impl FromStr for Bucket {
    type Err = UnknownBucket;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "input" => Ok(Bucket::Input),
            "expected" => Ok(Bucket::Expected),
            "metadata" => Ok(Bucket::Metadata),
            "unmapped" => Ok(Bucket::Unmapped),
            other => Err(UnknownBucket(other.to_string())),
        }
    }
}

/// Set of column names that iterates in insertion order. Removal shifts
/// later names down so the order survives drag edits.
#[derive(Debug, Clone, Default)]
pub struct ColumnSet {
    names: IndexSet<String>,
}

impl ColumnSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Returns `false` when the name was already present.
    pub fn insert(&mut self, name: &str) -> bool {
        if self.names.contains(name) {
            return false;
        }
        self.names.insert(name.to_string())
    }

    /// Returns `false` when the name was absent.
    pub fn remove(&mut self, name: &str) -> bool {
        self.names.shift_remove(name)
    }

    pub fn clear(&mut self) {
        self.names.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.names.iter().cloned().collect()
    }
}

// IndexSet equality ignores order; buckets compare in insertion order.
impl PartialEq for ColumnSet {
    fn eq(&self, other: &Self) -> bool {
        self.names.iter().eq(other.names.iter())
    }
}

impl Eq for ColumnSet {}
