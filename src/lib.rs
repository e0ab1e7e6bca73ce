pub mod bucket;
pub mod cli;
pub mod config;
pub mod heuristic;
pub mod http;
pub mod import;
pub mod mapper;
pub mod preview;
pub mod submit;
pub mod table;

use std::{env, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, debug, info, warn};

use crate::{
    bucket::Bucket,
    cli::{Cli, Commands, EditArgs, OutputFormat},
    mapper::{ColumnMapper, DropEvent},
    preview::CsvPreview,
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("csv_import_mapper", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Map(args) => handle_map(&args),
        Commands::Import(args) => import::execute(&args),
    }
}

fn handle_map(args: &cli::MapArgs) -> Result<()> {
    let mapper = seeded_mapper(&args.preview, &args.edits)?;
    match args.format {
        OutputFormat::Table => print!("{}", table::render_buckets(&mapper)),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&mapper.mapping())
                .context("Serializing column mapping")?;
            println!("{json}");
        }
    }
    Ok(())
}

/// Loads the preview, seeds the default mapping and replays the edit flags:
/// moves first, then adds, then removes.
pub(crate) fn seeded_mapper(
    preview_path: &std::path::Path,
    edits: &EditArgs,
) -> Result<ColumnMapper> {
    let preview = CsvPreview::load(preview_path)
        .with_context(|| format!("Loading preview from {preview_path:?}"))?;
    info!(
        "Mapping {} column(s) from '{}'",
        preview.columns.len(),
        preview.file_name
    );
    let mut mapper = ColumnMapper::new();
    mapper
        .load_preview(preview)
        .with_context(|| format!("Seeding columns from {preview_path:?}"))?;
    apply_edits(&mut mapper, edits);
    Ok(mapper)
}

fn apply_edits(mapper: &mut ColumnMapper, edits: &EditArgs) {
    for spec in &edits.moves {
        let event = DropEvent::new(&spec.column, &spec.from, Some(&spec.to));
        if !mapper.apply_drop(&event) {
            warn!(
                "Move of '{}' from '{}' to '{}' left the mapping unchanged",
                spec.column, spec.from, spec.to
            );
        }
    }
    for edit in &edits.adds {
        match edit.bucket.parse::<Bucket>() {
            Ok(bucket) => {
                if !mapper.add_to_bucket(bucket, &edit.column) {
                    debug!("'{}' already in {bucket} or not in preview", edit.column);
                }
            }
            Err(err) => warn!("Skipping add of '{}': {err}", edit.column),
        }
    }
    for edit in &edits.removes {
        match edit.bucket.parse::<Bucket>() {
            Ok(bucket) => {
                if !mapper.remove_from_bucket(bucket, &edit.column) {
                    debug!("'{}' was not removable from {bucket}", edit.column);
                }
            }
            Err(err) => warn!("Skipping remove of '{}': {err}", edit.column),
        }
    }
}
