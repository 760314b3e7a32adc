use crate::domain::model::{HealthReport, LookupQuery, LookupResult, PurgeOutcome, SelectedFile, UploadOutcome};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait ConfigProvider: Send + Sync {
    fn api_base_url(&self) -> &str;
    fn request_timeout(&self) -> Duration;
    fn upload_timeout(&self) -> Duration;
    fn required_filename(&self) -> &str;
}

/// The backend as seen by the view controller.
#[async_trait]
pub trait ViabilityApi: Send + Sync {
    async fn lookup(&self, query: &LookupQuery) -> Result<LookupResult>;
    async fn upload(&self, file: &SelectedFile) -> Result<UploadOutcome>;
    async fn purge(&self) -> Result<PurgeOutcome>;
    async fn health(&self) -> Result<HealthReport>;
}
