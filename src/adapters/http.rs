//! reqwest implementation of [`ViabilityApi`].

use crate::domain::model::{
    HealthReport, LookupQuery, LookupResult, PurgeOutcome, SelectedFile, UploadOutcome, XLSX_MIME,
};
use crate::domain::ports::{ConfigProvider, ViabilityApi};
use crate::utils::error::{ClientError, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use std::time::Duration;
use url::Url;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// Spreadsheet processing on the backend can take several minutes.
pub const DEFAULT_UPLOAD_TIMEOUT: Duration = Duration::from_secs(600);

#[derive(Debug, Clone)]
pub struct HttpApiClient {
    /// Always ends with `/` so endpoint paths join under it.
    base_url: Url,
    client: Client,
    request_timeout: Duration,
    upload_timeout: Duration,
}

impl HttpApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_client(base_url, Client::new())
    }

    pub fn with_client(base_url: &str, client: Client) -> Result<Self> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            base_url,
            client,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            upload_timeout: DEFAULT_UPLOAD_TIMEOUT,
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Ok(Self::new(config.api_base_url())?
            .with_timeouts(config.request_timeout(), config.upload_timeout()))
    }

    pub fn with_timeouts(mut self, request_timeout: Duration, upload_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self.upload_timeout = upload_timeout;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }
}

/// Pulls a string `detail` out of an error body, if the body is JSON and has one.
fn error_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("detail")?
        .as_str()
        .filter(|detail| !detail.trim().is_empty())
        .map(ToOwned::to_owned)
}

#[async_trait]
impl ViabilityApi for HttpApiClient {
    async fn lookup(&self, query: &LookupQuery) -> Result<LookupResult> {
        let url = self.endpoint("consultar")?;
        tracing::debug!(
            "Looking up postal code {} number {}",
            query.postal_code,
            query.house_number
        );

        let response = self
            .client
            .get(url)
            .query(&[
                ("cep", query.postal_code.as_str()),
                ("numero", query.house_number.as_str()),
            ])
            .timeout(self.request_timeout)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Lookup response status: {}", status);
        if !status.is_success() {
            return Err(ClientError::LookupFailed {
                status: status.as_u16(),
            });
        }

        let result: LookupResult = response.json().await?;
        tracing::info!("Lookup finished, found: {}", result.found);
        Ok(result)
    }

    async fn upload(&self, file: &SelectedFile) -> Result<UploadOutcome> {
        let url = self.endpoint("upload")?;
        let bytes = tokio::fs::read(&file.path).await?;
        tracing::info!("Uploading {} ({} bytes)", file.name, bytes.len());

        let part = Part::bytes(bytes)
            .file_name(file.name.clone())
            .mime_str(XLSX_MIME)?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(url)
            .multipart(form)
            .timeout(self.upload_timeout)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Upload response status: {}", status);
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("Upload rejected with status {}", status);
            return Err(match error_detail(&body) {
                Some(detail) => ClientError::UploadRejected {
                    status: status.as_u16(),
                    detail,
                },
                None => ClientError::UploadFailed {
                    status: status.as_u16(),
                },
            });
        }

        let outcome: UploadOutcome = response.json().await?;
        // The backend reports processing failures inside a 200 response.
        if outcome.success == Some(false) {
            tracing::warn!("Backend could not process the spreadsheet");
            return Err(match outcome.message.filter(|m| !m.trim().is_empty()) {
                Some(detail) => ClientError::UploadRejected {
                    status: status.as_u16(),
                    detail,
                },
                None => ClientError::UploadFailed {
                    status: status.as_u16(),
                },
            });
        }

        tracing::info!(
            "Upload accepted: {} records in {:.2}s",
            outcome.records_inserted,
            outcome.processing_seconds
        );
        Ok(outcome)
    }

    async fn purge(&self) -> Result<PurgeOutcome> {
        let url = self.endpoint("limpar")?;
        tracing::warn!("Purging all records at {}", url);

        let response = self
            .client
            .delete(url)
            .timeout(self.request_timeout)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Purge response status: {}", status);
        if !status.is_success() {
            return Err(ClientError::PurgeFailed {
                status: status.as_u16(),
            });
        }

        // The body carries nothing the caller depends on.
        let body = response.text().await.unwrap_or_default();
        Ok(serde_json::from_str(&body).unwrap_or_default())
    }

    async fn health(&self) -> Result<HealthReport> {
        let url = self.endpoint("health")?;
        let response = self
            .client
            .get(url)
            .timeout(self.request_timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::HealthFailed {
                status: status.as_u16(),
            });
        }

        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::REQUIRED_UPLOAD_FILENAME;
    use crate::utils::error::ErrorCategory;
    use httpmock::prelude::*;
    use tempfile::TempDir;
    use tokio_test::{assert_err, assert_ok};

    fn spreadsheet(dir: &TempDir) -> SelectedFile {
        let path = dir.path().join(REQUIRED_UPLOAD_FILENAME);
        std::fs::write(&path, b"PK fake xlsx payload").unwrap();
        SelectedFile::from_path(path)
    }

    fn query() -> LookupQuery {
        LookupQuery {
            postal_code: "60876672".to_string(),
            house_number: "144".to_string(),
        }
    }

    #[test]
    fn base_url_gets_trailing_slash() {
        let client = HttpApiClient::new("http://example.com/api").unwrap();
        assert_eq!(client.base_url().as_str(), "http://example.com/api/");
        assert_eq!(
            client.endpoint("consultar").unwrap().as_str(),
            "http://example.com/api/consultar"
        );
    }

    #[test]
    fn invalid_base_url_is_a_config_error() {
        let err = HttpApiClient::new("not a url").unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Config);
    }

    #[test]
    fn error_detail_only_accepts_string_details() {
        assert_eq!(
            error_detail(r#"{"detail": "bad file"}"#).as_deref(),
            Some("bad file")
        );
        assert_eq!(error_detail(r#"{"detail": [{"loc": ["file"]}]}"#), None);
        assert_eq!(error_detail(r#"{"erro": "x"}"#), None);
        assert_eq!(error_detail("<html>oops</html>"), None);
    }

    #[tokio::test]
    async fn test_lookup_sends_unmasked_params() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/consultar")
                .query_param("cep", "60876672")
                .query_param("numero", "144");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "encontrado": true,
                    "viabilidade": "Viável",
                    "detalhes": {"municipio": "FORTALEZA", "bairro": "MESSEJANA"}
                }));
        });

        let client = HttpApiClient::new(&server.base_url()).unwrap();
        let result = client.lookup(&query()).await.unwrap();

        api_mock.assert();
        assert!(result.found);
        assert_eq!(result.viability.as_deref(), Some("Viável"));
        assert_eq!(
            result.details.unwrap().bairro.as_deref(),
            Some("MESSEJANA")
        );
    }

    #[tokio::test]
    async fn test_lookup_not_found_is_not_an_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/consultar");
            then.status(200).json_body(serde_json::json!({
                "encontrado": false,
                "mensagem": "Endereço não encontrado"
            }));
        });

        let client = HttpApiClient::new(&server.base_url()).unwrap();
        let result = assert_ok!(client.lookup(&query()).await);
        assert!(!result.found);
        assert_eq!(result.message.as_deref(), Some("Endereço não encontrado"));
    }

    #[tokio::test]
    async fn test_lookup_http_failure_is_generic() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/consultar");
            then.status(500).json_body(serde_json::json!({"detail": "db down"}));
        });

        let client = HttpApiClient::new(&server.base_url()).unwrap();
        let err = assert_err!(client.lookup(&query()).await);
        assert!(matches!(err, ClientError::LookupFailed { status: 500 }));
        assert_eq!(err.to_string(), "Failed to look up address");
    }

    #[tokio::test]
    async fn test_upload_posts_multipart_file_field() {
        let dir = TempDir::new().unwrap();
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/upload")
                .header_exists("content-type")
                .body_contains("name=\"file\"")
                .body_contains("filename=\"enderecos_nordeste.xlsx\"")
                .body_contains("PK fake xlsx payload");
            then.status(200).json_body(serde_json::json!({
                "sucesso": true,
                "mensagem": "Planilha processada com sucesso! 3 registros inseridos.",
                "registros_inseridos": 3,
                "tempo_processamento": 1.25
            }));
        });

        let client = HttpApiClient::new(&server.base_url()).unwrap();
        let outcome = client.upload(&spreadsheet(&dir)).await.unwrap();

        api_mock.assert();
        assert_eq!(outcome.records_inserted, 3);
        assert_eq!(
            outcome.message.as_deref(),
            Some("Planilha processada com sucesso! 3 registros inseridos.")
        );
    }

    #[tokio::test]
    async fn test_upload_failure_surfaces_detail() {
        let dir = TempDir::new().unwrap();
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/upload");
            then.status(400).json_body(serde_json::json!({"detail": "bad file"}));
        });

        let client = HttpApiClient::new(&server.base_url()).unwrap();
        let err = client.upload(&spreadsheet(&dir)).await.unwrap_err();
        assert_eq!(err.to_string(), "bad file");
        assert_eq!(err.status(), Some(400));
    }

    #[tokio::test]
    async fn test_upload_failure_with_unparsable_body_is_generic() {
        let dir = TempDir::new().unwrap();
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/upload");
            then.status(502).body("Bad Gateway");
        });

        let client = HttpApiClient::new(&server.base_url()).unwrap();
        let err = client.upload(&spreadsheet(&dir)).await.unwrap_err();
        assert!(matches!(err, ClientError::UploadFailed { status: 502 }));
        assert_eq!(err.to_string(), "Failed to upload spreadsheet");
    }

    #[tokio::test]
    async fn test_upload_reported_failure_in_success_body() {
        let dir = TempDir::new().unwrap();
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/upload");
            then.status(200).json_body(serde_json::json!({
                "sucesso": false,
                "mensagem": "Nenhum registro encontrado na planilha"
            }));
        });

        let client = HttpApiClient::new(&server.base_url()).unwrap();
        let err = client.upload(&spreadsheet(&dir)).await.unwrap_err();
        assert_eq!(err.to_string(), "Nenhum registro encontrado na planilha");
    }

    #[tokio::test]
    async fn test_upload_missing_file_is_io_error() {
        let client = HttpApiClient::new("http://127.0.0.1:9").unwrap();
        let file = SelectedFile::from_path("/definitely/not/here/enderecos_nordeste.xlsx");
        let err = client.upload(&file).await.unwrap_err();
        assert!(matches!(err, ClientError::IoError(_)));
    }

    #[tokio::test]
    async fn test_purge_ignores_body() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(DELETE).path("/limpar");
            then.status(200).body("");
        });

        let client = HttpApiClient::new(&server.base_url()).unwrap();
        let outcome = client.purge().await.unwrap();

        api_mock.assert();
        assert_eq!(outcome.message, None);
    }

    #[tokio::test]
    async fn test_purge_failure_is_generic() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(DELETE).path("/limpar");
            then.status(500).json_body(serde_json::json!({"detail": "locked"}));
        });

        let client = HttpApiClient::new(&server.base_url()).unwrap();
        let err = client.purge().await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to purge database");
    }

    #[tokio::test]
    async fn test_health_parses_report() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/health");
            then.status(200).json_body(serde_json::json!({
                "status": "healthy",
                "banco_de_dados": "conectado",
                "total_registros": 1200,
                "estatisticas": {"total_registros": 1200}
            }));
        });

        let client = HttpApiClient::new(&server.base_url()).unwrap();
        let report = client.health().await.unwrap();
        assert_eq!(report.status, "healthy");
        assert_eq!(report.database, "conectado");
        assert_eq!(report.total_records, 1200);
        assert!(report.statistics.is_some());
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error() {
        let client = HttpApiClient::new("http://127.0.0.1:9").unwrap();
        let err = client.lookup(&query()).await.unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Transport);
    }
}
