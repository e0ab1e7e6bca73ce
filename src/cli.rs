use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Map CSV columns to dataset fields and import them",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show the default column mapping for a preview, with optional edits applied
    Map(MapArgs),
    /// Upload a CSV file and import it into a dataset using the column mapping
    Import(ImportArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveSpec {
    pub from: String,
    pub to: String,
    pub column: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketEdit {
    pub bucket: String,
    pub column: String,
}

#[derive(Debug, Args)]
pub struct EditArgs {
    /// Move a column between buckets, written `from:to:column`
    #[arg(long = "move", value_parser = parse_move, action = clap::ArgAction::Append)]
    pub moves: Vec<MoveSpec>,
    /// Put a column into a bucket, written `bucket:column`
    #[arg(long = "add", value_parser = parse_bucket_edit, action = clap::ArgAction::Append)]
    pub adds: Vec<BucketEdit>,
    /// Take a column out of a bucket (it becomes unmapped), written `bucket:column`
    #[arg(long = "remove", value_parser = parse_bucket_edit, action = clap::ArgAction::Append)]
    pub removes: Vec<BucketEdit>,
}

#[derive(Debug, Args)]
pub struct MapArgs {
    /// Preview JSON describing the CSV columns
    #[arg(short, long)]
    pub preview: PathBuf,
    #[command(flatten)]
    pub edits: EditArgs,
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Preview JSON describing the CSV columns
    #[arg(short, long)]
    pub preview: PathBuf,
    /// Raw CSV file to upload
    #[arg(short, long)]
    pub file: PathBuf,
    /// YAML file with the API location and default target
    #[arg(short, long)]
    pub config: PathBuf,
    /// Project receiving the import (overrides the config file)
    #[arg(long = "project-id")]
    pub project_id: Option<String>,
    /// Dataset receiving the import (overrides the config file)
    #[arg(long = "dataset-id")]
    pub dataset_id: Option<String>,
    #[command(flatten)]
    pub edits: EditArgs,
}

pub fn parse_move(value: &str) -> Result<MoveSpec, String> {
    let mut parts = value.splitn(3, ':');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(from), Some(to), Some(column)) if !column.is_empty() => Ok(MoveSpec {
            from: from.trim().to_string(),
            to: to.trim().to_string(),
            column: column.to_string(),
        }),
        _ => Err(format!(
            "Move '{value}' must look like from:to:column (e.g. metadata:unmapped:notes)"
        )),
    }
}

pub fn parse_bucket_edit(value: &str) -> Result<BucketEdit, String> {
    match value.split_once(':') {
        Some((bucket, column)) if !column.is_empty() => Ok(BucketEdit {
            bucket: bucket.trim().to_string(),
            column: column.to_string(),
        }),
        _ => Err(format!(
            "Edit '{value}' must look like bucket:column (e.g. input:question)"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_keeps_colons_inside_column_names() {
        let spec = parse_move("input:unmapped:time:utc").expect("move");
        assert_eq!(spec.from, "input");
        assert_eq!(spec.to, "unmapped");
        assert_eq!(spec.column, "time:utc");
        assert!(parse_move("input:unmapped").is_err());
        assert!(parse_move("input:unmapped:").is_err());
    }

    #[test]
    fn bucket_edit_requires_a_column() {
        let edit = parse_bucket_edit("expected:answer").expect("edit");
        assert_eq!(edit.bucket, "expected");
        assert_eq!(edit.column, "answer");
        assert!(parse_bucket_edit("expected").is_err());
    }
}
