#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::adapters::http::{DEFAULT_REQUEST_TIMEOUT, DEFAULT_UPLOAD_TIMEOUT};
use crate::core::ConfigProvider;
use crate::domain::model::REQUIRED_UPLOAD_FILENAME;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_file_extension, validate_non_empty_string, validate_positive_number, validate_url,
    Validate,
};
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Fully resolved client configuration, passed explicitly to the API client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub api_base_url: String,
    pub request_timeout: Duration,
    pub upload_timeout: Duration,
    pub required_filename: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            upload_timeout: DEFAULT_UPLOAD_TIMEOUT,
            required_filename: REQUIRED_UPLOAD_FILENAME.to_string(),
        }
    }
}

impl ConfigProvider for ClientSettings {
    fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    fn upload_timeout(&self) -> Duration {
        self.upload_timeout
    }

    fn required_filename(&self) -> &str {
        &self.required_filename
    }
}

impl Validate for ClientSettings {
    fn validate(&self) -> Result<()> {
        validate_url("api.base_url", &self.api_base_url)?;
        validate_positive_number("api.timeout_seconds", self.request_timeout.as_secs(), 1)?;
        validate_positive_number(
            "api.upload_timeout_seconds",
            self.upload_timeout.as_secs(),
            1,
        )?;
        validate_non_empty_string("upload.required_filename", &self.required_filename)?;
        validate_file_extension("upload.required_filename", &self.required_filename, "xlsx")?;
        Ok(())
    }
}
