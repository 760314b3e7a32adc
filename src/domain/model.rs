use crate::core::form;
use crate::utils::error::{ClientError, Result};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Spreadsheet name the backend's loader expects.
pub const REQUIRED_UPLOAD_FILENAME: &str = "enderecos_nordeste.xlsx";

pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupQuery {
    /// Unmasked, digits only.
    pub postal_code: String,
    pub house_number: String,
}

impl LookupQuery {
    /// Builds a query from user-typed values, dropping any mask characters.
    pub fn from_input(postal_code: &str, house_number: &str) -> Result<Self> {
        let query = Self {
            postal_code: form::digits_only(postal_code),
            house_number: form::sanitize_house_number(house_number),
        };
        query.validate()?;
        Ok(query)
    }
}

impl Validate for LookupQuery {
    fn validate(&self) -> Result<()> {
        if !form::is_postal_code_valid(&self.postal_code) {
            return Err(ClientError::ValidationError {
                message: form::POSTAL_CODE_HINT.to_string(),
            });
        }
        if !form::is_house_number_valid(&self.house_number) {
            return Err(ClientError::ValidationError {
                message: form::HOUSE_NUMBER_HINT.to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AddressDetails {
    #[serde(default)]
    pub viabilidade_atual: Option<String>,
    #[serde(default)]
    pub uf: Option<String>,
    #[serde(default)]
    pub municipio: Option<String>,
    #[serde(default)]
    pub localidade: Option<String>,
    #[serde(default)]
    pub bairro: Option<String>,
    #[serde(default)]
    pub logradouro: Option<String>,
    #[serde(default)]
    pub n_fachada: Option<String>,
    #[serde(default)]
    pub comp_1: Option<String>,
    #[serde(default)]
    pub comp_2: Option<String>,
    #[serde(default)]
    pub comp_3: Option<String>,
    #[serde(default)]
    pub regiao: Option<String>,
    #[serde(default)]
    pub cep: Option<String>,
    #[serde(default)]
    pub cod_logradouro: Option<String>,
    #[serde(default)]
    pub total_hps: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LookupResult {
    #[serde(rename = "encontrado", alias = "found")]
    pub found: bool,
    #[serde(rename = "viabilidade", default)]
    pub viability: Option<String>,
    #[serde(rename = "mensagem", alias = "message", default)]
    pub message: Option<String>,
    #[serde(rename = "detalhes", alias = "details", default)]
    pub details: Option<AddressDetails>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub path: PathBuf,
}

impl SelectedFile {
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            name,
            path: path.to_path_buf(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UploadOutcome {
    #[serde(rename = "sucesso", default)]
    pub success: Option<bool>,
    #[serde(rename = "mensagem", default)]
    pub message: Option<String>,
    #[serde(rename = "registros_inseridos", default)]
    pub records_inserted: u64,
    #[serde(rename = "tempo_processamento", default)]
    pub processing_seconds: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PurgeOutcome {
    #[serde(rename = "mensagem", default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
    #[serde(rename = "banco_de_dados")]
    pub database: String,
    #[serde(rename = "total_registros", default)]
    pub total_records: u64,
    #[serde(rename = "estatisticas", default)]
    pub statistics: Option<serde_json::Value>,
}
