use crate::domain::model::LookupResult;

const EMPTY_CELL: &str = "-";
const VIABLE: &str = "Viável";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub postal_code: String,
    pub house_number: String,
    /// Field hint shown under a non-empty, invalid postal code.
    pub postal_code_hint: Option<String>,
    pub lookup_enabled: bool,
    pub lookup_loading: bool,
    pub lookup_error: Option<String>,
    pub result_row: Option<ResultRow>,

    pub required_filename: String,
    pub selected_file_name: Option<String>,
    pub file_input_enabled: bool,
    pub upload_enabled: bool,
    pub upload_loading: bool,
    /// `MM:SS`, present only while an upload is pending.
    pub upload_elapsed: Option<String>,
    pub upload_error: Option<String>,
    pub upload_success: Option<String>,

    pub purge_prompt_open: bool,
    /// Confirm and cancel buttons of the purge prompt.
    pub purge_controls_enabled: bool,
    pub purge_loading: bool,
    /// Blocking message the user has to dismiss.
    pub notification: Option<String>,
}

impl AppViewModel {
    pub fn lookup_button_label(&self) -> &'static str {
        if self.lookup_loading {
            "Searching..."
        } else {
            "Search"
        }
    }

    pub fn upload_button_label(&self) -> &'static str {
        if self.upload_loading {
            "Sending..."
        } else {
            "Send spreadsheet"
        }
    }

    pub fn purge_confirm_label(&self) -> &'static str {
        if self.purge_loading {
            "Purging..."
        } else {
            "Yes, purge"
        }
    }
}

/// The single table row rendered for a found address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    pub viability: String,
    pub municipality: String,
    pub neighborhood: String,
    pub street: String,
    pub viable: bool,
}

impl ResultRow {
    pub const HEADERS: [&'static str; 4] = ["Viability", "Municipality", "Neighborhood", "Street"];

    pub fn from_result(result: &LookupResult) -> Self {
        let details = result.details.clone().unwrap_or_default();
        let cell = |value: Option<String>| {
            value
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| EMPTY_CELL.to_string())
        };

        let current = details.viabilidade_atual.clone();
        let viable = current.as_deref() == Some(VIABLE);
        let viability = cell(current.or_else(|| result.viability.clone()));

        Self {
            viability,
            municipality: cell(details.municipio),
            neighborhood: cell(details.bairro),
            street: cell(details.logradouro),
            viable,
        }
    }

    pub fn cells(&self) -> [&str; 4] {
        [
            self.viability.as_str(),
            self.municipality.as_str(),
            self.neighborhood.as_str(),
            self.street.as_str(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::AddressDetails;

    #[test]
    fn row_falls_back_to_top_level_viability_and_dashes() {
        let result = LookupResult {
            found: true,
            viability: Some("Não viável".to_string()),
            message: None,
            details: Some(AddressDetails {
                municipio: Some("RECIFE".to_string()),
                ..AddressDetails::default()
            }),
        };

        let row = ResultRow::from_result(&result);
        assert_eq!(row.cells(), ["Não viável", "RECIFE", "-", "-"]);
        assert!(!row.viable);
    }

    #[test]
    fn row_marks_viable_addresses() {
        let result = LookupResult {
            found: true,
            details: Some(AddressDetails {
                viabilidade_atual: Some("Viável".to_string()),
                ..AddressDetails::default()
            }),
            ..LookupResult::default()
        };
        assert!(ResultRow::from_result(&result).viable);
    }
}
