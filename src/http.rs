//! `reqwest` adapters for the submission ports.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, RequestBuilder, StatusCode, header::CONTENT_TYPE};
use serde::Serialize;

use crate::submit::{
    ImportRequest, ImportService, MediaContentType, PortError, RawTransfer,
    StorageLocationService, TransferStatus, UploadLocation,
};

const UPLOAD_URL_PATH: &str = "/api/datasets/upload-url";
const IMPORT_PATH: &str = "/api/datasets/import";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} responded with status {status}: {body}")]
    Status {
        url: String,
        status: StatusCode,
        body: String,
    },
}

fn build_client(timeout: Duration) -> Result<Client, ApiError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|source| ApiError::Request {
            url: String::new(),
            source,
        })
}

/// Client for the dataset API: upload locations and CSV imports.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UploadUrlBody<'a> {
    project_id: &'a str,
    content_type: MediaContentType,
}

impl ApiClient {
    pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> Result<Self, ApiError> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn post(&self, url: &str) -> RequestBuilder {
        let builder = self.client.post(url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<reqwest::Response, ApiError> {
        let url = self.endpoint(path);
        debug!("POST {url}");
        let response = self
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|source| ApiError::Request {
                url: url.clone(),
                source,
            })?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status { url, status, body });
        }
        Ok(response)
    }
}

#[async_trait]
impl StorageLocationService for ApiClient {
    async fn request_upload_location(
        &self,
        project_id: &str,
        content_type: MediaContentType,
    ) -> Result<UploadLocation, PortError> {
        let body = UploadUrlBody {
            project_id,
            content_type,
        };
        let response = self.send_json(UPLOAD_URL_PATH, &body).await?;
        let url = response.url().to_string();
        let location = response
            .json::<UploadLocation>()
            .await
            .map_err(|source| ApiError::Request { url, source })?;
        Ok(location)
    }
}

#[async_trait]
impl ImportService for ApiClient {
    async fn import_from_csv(&self, request: &ImportRequest) -> Result<(), PortError> {
        self.send_json(IMPORT_PATH, request).await?;
        Ok(())
    }
}

/// Raw PUT of file bytes to a presigned URL.
#[derive(Debug, Clone)]
pub struct HttpTransfer {
    client: Client,
}

impl HttpTransfer {
    pub fn new(timeout: Duration) -> Result<Self, ApiError> {
        Ok(Self {
            client: build_client(timeout)?,
        })
    }
}

#[async_trait]
impl RawTransfer for HttpTransfer {
    async fn put(
        &self,
        upload_url: &str,
        content_type: MediaContentType,
        body: Vec<u8>,
    ) -> Result<TransferStatus, PortError> {
        debug!("PUT {} byte(s) to presigned URL", body.len());
        let response = self
            .client
            .put(upload_url)
            .header(CONTENT_TYPE, content_type.as_str())
            .body(body)
            .send()
            .await
            .map_err(|source| ApiError::Request {
                url: upload_url.to_string(),
                source,
            })?;
        Ok(TransferStatus(response.status().as_u16()))
    }
}
