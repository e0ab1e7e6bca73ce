//! Preview of an uploaded CSV file as produced by the upstream parser.

use std::{fs::File, io::BufReader, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewColumn {
    pub name: String,
    #[serde(default)]
    pub samples: Vec<String>,
}

impl PreviewColumn {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            samples: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvPreview {
    pub file_name: String,
    pub columns: Vec<PreviewColumn>,
    #[serde(default)]
    pub preview_rows: usize,
    #[serde(default)]
    pub total_columns: usize,
}

impl CsvPreview {
    /// Builds a sample-less preview, mostly useful for tests and tooling.
    pub fn from_names<I, S>(file_name: &str, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<PreviewColumn> = names.into_iter().map(PreviewColumn::new).collect();
        let total_columns = columns.len();
        Self {
            file_name: file_name.to_string(),
            columns,
            preview_rows: 0,
            total_columns,
        }
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Opening preview file {path:?}"))?;
        let reader = BufReader::new(file);
        let preview = serde_json::from_reader(reader).context("Parsing preview JSON")?;
        Ok(preview)
    }
}
