//! Import configuration loaded from YAML.
//!
//! ```yaml
//! api_url: https://datasets.example.com
//! project_id: proj-123
//! dataset_id: ds-456
//! timeout_secs: 30
//! ```
//!
//! `CSV_IMPORT_API_TOKEN` overrides `api_token` when set.

use std::{env, fs, path::Path, time::Duration};

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};

use crate::submit::ImportTarget;

pub const TOKEN_ENV: &str = "CSV_IMPORT_API_TOKEN";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportConfig {
    pub api_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub dataset_id: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ImportConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Opening config file {path:?}"))?;
        let mut config: ImportConfig = serde_yaml::from_str(&raw)
            .with_context(|| format!("Parsing config YAML {path:?}"))?;
        if let Ok(token) = env::var(TOKEN_ENV)
            && !token.trim().is_empty()
        {
            config.api_token = Some(token);
        }
        ensure!(
            !config.api_url.trim().is_empty(),
            "Config {path:?} must set api_url"
        );
        Ok(config)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Resolves the import target, letting command-line values win over the
    /// file.
    pub fn target(
        &self,
        project_id: Option<&str>,
        dataset_id: Option<&str>,
    ) -> Result<ImportTarget> {
        let project_id = project_id
            .or(self.project_id.as_deref())
            .context("No project id given (use --project-id or set project_id)")?;
        let dataset_id = dataset_id
            .or(self.dataset_id.as_deref())
            .context("No dataset id given (use --dataset-id or set dataset_id)")?;
        Ok(ImportTarget {
            project_id: project_id.to_string(),
            dataset_id: dataset_id.to_string(),
        })
    }
}
