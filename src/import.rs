//! `import` subcommand: upload the raw CSV and start the dataset import.

use std::fs;

use anyhow::{Context, Result, bail};
use log::info;

use crate::{
    bucket::Bucket,
    cli::ImportArgs,
    config::ImportConfig,
    http::{ApiClient, HttpTransfer},
    seeded_mapper,
    submit::Submitter,
};

pub fn execute(args: &ImportArgs) -> Result<()> {
    let config = ImportConfig::load(&args.config)
        .with_context(|| format!("Loading config from {:?}", args.config))?;
    let target = config.target(args.project_id.as_deref(), args.dataset_id.as_deref())?;
    let mut mapper = seeded_mapper(&args.preview, &args.edits)?;
    if !mapper.can_submit() {
        bail!(
            "Nothing is mapped to {}; add a column with --add input:<column>",
            Bucket::Input
        );
    }
    let file = fs::read(&args.file).with_context(|| format!("Reading CSV file {:?}", args.file))?;

    let api = ApiClient::new(&config.api_url, config.api_token.clone(), config.timeout())
        .context("Building API client")?;
    let transfer = HttpTransfer::new(config.timeout()).context("Building upload client")?;
    let submitter = Submitter {
        locations: &api,
        transfer: &transfer,
        importer: &api,
        cache: &(),
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Starting async runtime")?;
    let receipt = runtime
        .block_on(submitter.submit(&mut mapper, &target, file))
        .with_context(|| format!("Importing {:?} into dataset {}", args.file, target.dataset_id))?;

    info!(
        "Imported {} input, {} expected and {} metadata column(s)",
        receipt.mapping.input.len(),
        receipt.mapping.expected.len(),
        receipt.mapping.metadata.len()
    );
    println!("{}", receipt.bucket_path);
    Ok(())
}
