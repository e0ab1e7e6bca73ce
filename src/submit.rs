//! Submission pipeline: upload location, raw transfer, then import.
//!
//! The external services are ports so the pipeline can run against the HTTP
//! adapters in [`crate::http`] or against in-memory fakes.

use std::fmt;

use async_trait::async_trait;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::mapper::{ColumnMapper, ColumnMapping, SeedState};

/// Content types accepted by the storage-location service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaContentType {
    #[serde(rename = "text/csv")]
    Csv,
}

impl MediaContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaContentType::Csv => "text/csv",
        }
    }
}

impl fmt::Display for MediaContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadLocation {
    pub upload_url: String,
    pub bucket_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRequest {
    pub project_id: String,
    pub dataset_id: String,
    pub bucket_path: String,
    pub mapping: ColumnMapping,
}

/// HTTP status returned by a raw transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferStatus(pub u16);

impl TransferStatus {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.0)
    }
}

impl fmt::Display for TransferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Boxed error from an adapter, so ports stay transport-agnostic.
pub type PortError = Box<dyn std::error::Error + Send + Sync>;

#[async_trait]
pub trait StorageLocationService: Send + Sync {
    async fn request_upload_location(
        &self,
        project_id: &str,
        content_type: MediaContentType,
    ) -> Result<UploadLocation, PortError>;
}

#[async_trait]
pub trait RawTransfer: Send + Sync {
    async fn put(
        &self,
        upload_url: &str,
        content_type: MediaContentType,
        body: Vec<u8>,
    ) -> Result<TransferStatus, PortError>;
}

#[async_trait]
pub trait ImportService: Send + Sync {
    async fn import_from_csv(&self, request: &ImportRequest) -> Result<(), PortError>;
}

pub trait DatasetCache: Send + Sync {
    fn invalidate(&self, project_id: &str);
}

impl DatasetCache for () {
    fn invalidate(&self, _project_id: &str) {}
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("no preview has been mapped yet")]
    NotSeeded,
    #[error("at least one column must be mapped to input")]
    EmptyInput,
    #[error("failed to obtain an upload location: {0}")]
    Location(#[source] PortError),
    #[error("failed to upload file: {0}")]
    Transfer(#[source] PortError),
    #[error("upload was rejected with status {0}")]
    TransferRejected(TransferStatus),
    #[error("import request failed: {0}")]
    Import(#[source] PortError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportReceipt {
    pub bucket_path: String,
    pub mapping: ColumnMapping,
}

/// Target of a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportTarget {
    pub project_id: String,
    pub dataset_id: String,
}

pub struct Submitter<'a> {
    pub locations: &'a dyn StorageLocationService,
    pub transfer: &'a dyn RawTransfer,
    pub importer: &'a dyn ImportService,
    pub cache: &'a dyn DatasetCache,
}

impl Submitter<'_> {
    /// Uploads `file` and imports it with the mapper's current mapping.
    ///
    /// The mapper is borrowed for the whole submission, so a second one
    /// cannot start while this is pending. It is reset only after the import
    /// succeeds; any failure leaves it untouched for a retry.
    pub async fn submit(
        &self,
        mapper: &mut ColumnMapper,
        target: &ImportTarget,
        file: Vec<u8>,
    ) -> Result<ImportReceipt, SubmitError> {
        if mapper.state() != SeedState::Seeded {
            return Err(SubmitError::NotSeeded);
        }
        if !mapper.can_submit() {
            return Err(SubmitError::EmptyInput);
        }
        let mapping = mapper.mapping();
        let content_type = MediaContentType::Csv;

        let location = self
            .locations
            .request_upload_location(&target.project_id, content_type)
            .await
            .map_err(SubmitError::Location)?;
        info!(
            "Uploading {} byte(s) for project {} to {}",
            file.len(),
            target.project_id,
            location.bucket_path
        );

        let status = self
            .transfer
            .put(&location.upload_url, content_type, file)
            .await
            .map_err(|err| {
                warn!("Upload to {} failed: {err}", location.bucket_path);
                SubmitError::Transfer(err)
            })?;
        if !status.is_success() {
            warn!(
                "Upload to {} rejected with status {status}",
                location.bucket_path
            );
            return Err(SubmitError::TransferRejected(status));
        }

        let request = ImportRequest {
            project_id: target.project_id.clone(),
            dataset_id: target.dataset_id.clone(),
            bucket_path: location.bucket_path,
            mapping,
        };
        self.importer
            .import_from_csv(&request)
            .await
            .map_err(SubmitError::Import)?;
        info!(
            "Import into dataset {} started from {}",
            request.dataset_id, request.bucket_path
        );

        self.cache.invalidate(&target.project_id);
        mapper.reset();
        Ok(ImportReceipt {
            bucket_path: request.bucket_path,
            mapping: request.mapping,
        })
    }
}
