#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use csv_import_mapper::preview::{CsvPreview, PreviewColumn};
use tempfile::{TempDir, tempdir};

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes())
            .expect("write temp file contents");
        path
    }

    /// Serializes `preview` as the upstream parser would and returns its path.
    pub fn write_preview(&self, name: &str, preview: &CsvPreview) -> PathBuf {
        let json = serde_json::to_string_pretty(preview).expect("serialize preview");
        self.write(name, &json)
    }
}

/// The question/answer preview used across the suites.
pub fn qa_preview() -> CsvPreview {
    let column = |name: &str, samples: &[&str]| PreviewColumn {
        name: name.to_string(),
        samples: samples.iter().map(|s| s.to_string()).collect(),
    };
    CsvPreview {
        file_name: "qa.csv".to_string(),
        columns: vec![
            column("question", &["What is 2+2?", "Capital of France?"]),
            column("answer", &["4", "Paris"]),
            column("notes", &["easy", ""]),
            column("id", &["1", "2"]),
        ],
        preview_rows: 2,
        total_columns: 4,
    }
}

pub const QA_CSV: &str = "question,answer,notes,id\n\
What is 2+2?,4,easy,1\n\
Capital of France?,Paris,,2\n";
