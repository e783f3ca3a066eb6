//! Mock construction helpers

use chemvis_rs::backend::{ApiBackend, DatasetApi, FetchError, FrontendReceiver};
use chemvis_rs::{AppConfig, Dataset, DatasetId, RowPage, Summary, UploadReceipt};
use mockall::mock;
use std::path::Path;
use std::sync::Arc;
use std::thread::JoinHandle;

mock! {
    pub Api {}

    impl DatasetApi for Api {
        fn list_datasets(&self) -> Result<Vec<Dataset>, FetchError>;
        fn fetch_summary(&self, id: DatasetId) -> Result<Summary, FetchError>;
        fn fetch_rows(&self, id: DatasetId, page_size: usize) -> Result<RowPage, FetchError>;
        fn upload_csv(
            &self,
            path: &Path,
            name: Option<String>,
        ) -> Result<UploadReceipt, FetchError>;
        fn download_csv(&self, id: DatasetId) -> Result<Vec<u8>, FetchError>;
        fn delete_dataset(&self, id: DatasetId) -> Result<(), FetchError>;
    }
}

/// Run the real backend worker against `api` on its own thread
pub fn spawn_backend(api: MockApi) -> (FrontendReceiver, JoinHandle<()>) {
    spawn_backend_with(AppConfig::default(), api)
}

pub fn spawn_backend_with(config: AppConfig, api: MockApi) -> (FrontendReceiver, JoinHandle<()>) {
    let (backend, frontend) = ApiBackend::new(config, Arc::new(api));
    let handle = std::thread::spawn(move || backend.run());
    (frontend, handle)
}

pub fn transport_error() -> FetchError {
    FetchError::Transport("connection refused".to_string())
}
