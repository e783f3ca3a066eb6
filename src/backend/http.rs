//! HTTP implementation of [`DatasetApi`] using reqwest's blocking client

use super::api::{DatasetApi, FetchError};
use crate::config::ApiConfig;
use crate::error::Result;
use crate::types::{Dataset, DatasetId, RowPage, Summary, SummaryResponse, UploadReceipt};
use reqwest::blocking::{multipart, Client, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::Path;

/// Dataset API backed by the REST service at `base_url`
#[derive(Debug, Clone)]
pub struct HttpDatasetApi {
    client: Client,
    base_url: String,
}

impl HttpDatasetApi {
    /// Build a client from the API configuration
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.request_timeout()).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an endpoint path such as `datasets/3/rows/`
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> std::result::Result<T, FetchError> {
        let url = self.endpoint(path);
        tracing::debug!("GET {}", url);
        let response = check_status(self.client.get(&url).send()?)?;
        Ok(response.json::<T>()?)
    }
}

impl DatasetApi for HttpDatasetApi {
    fn list_datasets(&self) -> std::result::Result<Vec<Dataset>, FetchError> {
        self.get_json("datasets/")
    }

    fn fetch_summary(&self, id: DatasetId) -> std::result::Result<Summary, FetchError> {
        let body: SummaryResponse = self.get_json(&format!("datasets/{}/summary/", id))?;
        Ok(body.summary)
    }

    fn fetch_rows(
        &self,
        id: DatasetId,
        page_size: usize,
    ) -> std::result::Result<RowPage, FetchError> {
        self.get_json(&format!("datasets/{}/rows/?page_size={}", id, page_size))
    }

    fn upload_csv(
        &self,
        path: &Path,
        name: Option<String>,
    ) -> std::result::Result<UploadReceipt, FetchError> {
        let mut form = multipart::Form::new().file("file", path)?;
        if let Some(name) = name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()) {
            form = form.text("name", name);
        }

        let url = self.endpoint("upload/");
        tracing::debug!("POST {} ({:?})", url, path);
        let response = check_status(self.client.post(&url).multipart(form).send()?)?;
        Ok(response.json::<UploadReceipt>()?)
    }

    fn download_csv(&self, id: DatasetId) -> std::result::Result<Vec<u8>, FetchError> {
        let url = self.endpoint(&format!("datasets/{}/download/", id));
        tracing::debug!("GET {}", url);
        let response = check_status(self.client.get(&url).send()?)?;
        Ok(response.bytes()?.to_vec())
    }

    fn delete_dataset(&self, id: DatasetId) -> std::result::Result<(), FetchError> {
        let url = self.endpoint(&format!("datasets/{}/", id));
        tracing::debug!("DELETE {}", url);
        check_status(self.client.delete(&url).send()?)?;
        Ok(())
    }
}

/// Pass successful responses through, turn the rest into a [`FetchError`]
fn check_status(response: Response) -> std::result::Result<Response, FetchError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    Err(error_from_body(status.as_u16(), &body))
}

/// Interpret an error response body.
///
/// JSON bodies with a string `error` (or DRF-style `detail`) field become
/// [`FetchError::Rejected`]; anything else is reported with its status.
pub fn error_from_body(status: u16, body: &str) -> FetchError {
    let message = serde_json::from_str::<Value>(body).ok().and_then(|json| {
        ["error", "detail"]
            .iter()
            .find_map(|key| json.get(key).and_then(Value::as_str).map(str::to_string))
    });

    match message {
        Some(message) => FetchError::Rejected(message),
        None => {
            let text = body.trim();
            let message = if text.is_empty() {
                reqwest::StatusCode::from_u16(status)
                    .ok()
                    .and_then(|s| s.canonical_reason())
                    .unwrap_or("unknown error")
                    .to_string()
            } else {
                text.chars().take(200).collect()
            };
            FetchError::Status { status, message }
        }
    }
}
