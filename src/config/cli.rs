use crate::config::toml_config::FileConfig;
use crate::config::ClientSettings;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Parser)]
#[command(name = "address-viability")]
#[command(about = "Query address viability, load spreadsheets and manage the backend data")]
pub struct CliConfig {
    /// Backend base URL
    #[arg(long, env = "API_URL")]
    pub api_url: Option<String>,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Timeout for lookup, purge and health requests
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Timeout for spreadsheet uploads
    #[arg(long)]
    pub upload_timeout_secs: Option<u64>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Check viability for a postal code and house number
    Lookup {
        /// Postal code (CEP), masked or not
        #[arg(long)]
        cep: String,
        /// House number
        #[arg(long)]
        numero: String,
    },
    /// Replace the backend data with a spreadsheet
    Upload { path: PathBuf },
    /// Delete every record held by the backend
    Purge {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Show backend status and record count
    Health,
}

impl CliConfig {
    /// Defaults, then the config file, then flags and environment.
    pub fn resolve(&self) -> Result<ClientSettings> {
        let mut settings = ClientSettings::default();

        if let Some(path) = &self.config {
            tracing::debug!("Loading configuration from {}", path.display());
            FileConfig::from_file(path)?.apply_to(&mut settings);
        }
        if let Some(url) = &self.api_url {
            settings.api_base_url = url.clone();
        }
        if let Some(secs) = self.timeout_secs {
            settings.request_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = self.upload_timeout_secs {
            settings.upload_timeout = Duration::from_secs(secs);
        }

        settings.validate()?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn parses_lookup_subcommand() {
        let config = CliConfig::try_parse_from([
            "address-viability",
            "--api-url",
            "http://api.local:8000",
            "lookup",
            "--cep",
            "60876-672",
            "--numero",
            "144",
        ])
        .unwrap();

        assert_eq!(
            config.command,
            Command::Lookup {
                cep: "60876-672".to_string(),
                numero: "144".to_string(),
            }
        );
        let settings = config.resolve().unwrap();
        assert_eq!(settings.api_base_url, "http://api.local:8000");
    }

    #[test]
    fn flags_override_config_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[api]\nbase_url = \"http://from-file:8000\"\ntimeout_seconds = 5\n")
            .unwrap();
        let path = temp_file.path().to_str().unwrap().to_string();

        let config = CliConfig::try_parse_from([
            "address-viability",
            "--config",
            path.as_str(),
            "--api-url",
            "http://from-flag:8000",
            "health",
        ])
        .unwrap();

        let settings = config.resolve().unwrap();
        assert_eq!(settings.api_base_url, "http://from-flag:8000");
        assert_eq!(settings.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn invalid_url_fails_resolution() {
        let config = CliConfig::try_parse_from([
            "address-viability",
            "--api-url",
            "ftp://nope",
            "purge",
            "--yes",
        ])
        .unwrap();
        assert!(config.resolve().is_err());
    }
}
