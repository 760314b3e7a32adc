//! View state and its pure update function.
//!
//! Every user action and every network completion is a [`Msg`]. [`update`]
//! applies it to a [`ViewState`] and returns the [`Effect`]s the controller
//! must run. Nothing here performs I/O.

use crate::core::form;
use crate::core::view_model::{AppViewModel, ResultRow};
use crate::domain::model::{
    LookupQuery, LookupResult, PurgeOutcome, SelectedFile, UploadOutcome, REQUIRED_UPLOAD_FILENAME,
};
use std::path::PathBuf;

pub const LOOKUP_FAILED: &str = "Failed to look up address";
pub const LOOKUP_NOT_FOUND: &str = "Address not found";
pub const UPLOAD_FAILED: &str = "Failed to upload spreadsheet";
pub const UPLOAD_SUCCEEDED: &str = "Upload completed successfully!";
pub const UPLOAD_NO_FILE: &str = "Select a file first";
pub const PURGE_FAILED: &str = "Failed to purge database";
pub const PURGE_SUCCEEDED: &str = "Database purged successfully!";

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Raw text typed into the postal code field.
    PostalCodeChanged(String),
    /// Raw text typed into the house number field.
    HouseNumberChanged(String),
    LookupSubmitted,
    LookupSettled(Result<LookupResult, String>),
    /// The file picker changed; `None` means the selection was cleared.
    FileChosen(Option<PathBuf>),
    UploadSubmitted,
    /// One second of upload time has passed.
    UploadTick,
    UploadSettled(Result<UploadOutcome, String>),
    PurgeRequested,
    PurgeCancelled,
    PurgeConfirmed,
    PurgeSettled(Result<PurgeOutcome, String>),
    NotificationDismissed,
}

impl Msg {
    /// Completion messages close an in-flight request.
    pub fn is_completion(&self) -> bool {
        matches!(
            self,
            Msg::LookupSettled(_) | Msg::UploadSettled(_) | Msg::PurgeSettled(_)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Lookup(LookupQuery),
    Upload(SelectedFile),
    StartUploadTimer,
    StopUploadTimer,
    Purge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PurgeState {
    #[default]
    Idle,
    ConfirmPending,
    Purging,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    required_filename: String,

    postal_code: String,
    house_number: String,
    lookup_loading: bool,
    lookup_error: Option<String>,
    lookup_result: Option<LookupResult>,

    file_input: Option<PathBuf>,
    selected_file: Option<SelectedFile>,
    upload_loading: bool,
    upload_error: Option<String>,
    upload_success: Option<String>,
    upload_elapsed_secs: u64,

    purge: PurgeState,
    notification: Option<String>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::with_required_filename(REQUIRED_UPLOAD_FILENAME)
    }
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_required_filename(required_filename: impl Into<String>) -> Self {
        Self {
            required_filename: required_filename.into(),
            postal_code: String::new(),
            house_number: String::new(),
            lookup_loading: false,
            lookup_error: None,
            lookup_result: None,
            file_input: None,
            selected_file: None,
            upload_loading: false,
            upload_error: None,
            upload_success: None,
            upload_elapsed_secs: 0,
            purge: PurgeState::Idle,
            notification: None,
        }
    }

    pub fn postal_code(&self) -> &str {
        &self.postal_code
    }

    pub fn house_number(&self) -> &str {
        &self.house_number
    }

    pub fn lookup_result(&self) -> Option<&LookupResult> {
        self.lookup_result.as_ref()
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.selected_file.as_ref()
    }

    /// Current value of the file picker control.
    pub fn file_input(&self) -> Option<&PathBuf> {
        self.file_input.as_ref()
    }

    pub fn upload_elapsed_secs(&self) -> u64 {
        self.upload_elapsed_secs
    }

    pub fn purge_state(&self) -> PurgeState {
        self.purge
    }

    pub fn is_postal_code_valid(&self) -> bool {
        form::is_postal_code_valid(&self.postal_code)
    }

    pub fn is_house_number_valid(&self) -> bool {
        form::is_house_number_valid(&self.house_number)
    }

    pub fn can_submit_lookup(&self) -> bool {
        self.is_postal_code_valid() && self.is_house_number_valid() && !self.lookup_loading
    }

    pub fn can_submit_upload(&self) -> bool {
        self.selected_file.is_some() && !self.upload_loading
    }

    pub fn is_busy(&self) -> bool {
        self.lookup_loading || self.upload_loading || self.purge == PurgeState::Purging
    }

    pub fn view(&self) -> AppViewModel {
        let postal_code_hint = (!self.postal_code.is_empty() && !self.is_postal_code_valid())
            .then(|| form::POSTAL_CODE_HINT.to_string());

        let result_row = self
            .lookup_result
            .as_ref()
            .filter(|result| result.found)
            .map(ResultRow::from_result);

        AppViewModel {
            postal_code: self.postal_code.clone(),
            house_number: self.house_number.clone(),
            postal_code_hint,
            lookup_enabled: self.can_submit_lookup(),
            lookup_loading: self.lookup_loading,
            lookup_error: self.lookup_error.clone(),
            result_row,
            required_filename: self.required_filename.clone(),
            selected_file_name: self.selected_file.as_ref().map(|f| f.name.clone()),
            file_input_enabled: !self.upload_loading,
            upload_enabled: self.can_submit_upload(),
            upload_loading: self.upload_loading,
            upload_elapsed: self
                .upload_loading
                .then(|| form::format_elapsed(self.upload_elapsed_secs)),
            upload_error: self.upload_error.clone(),
            upload_success: self.upload_success.clone(),
            purge_prompt_open: self.purge != PurgeState::Idle,
            purge_controls_enabled: self.purge != PurgeState::Purging,
            purge_loading: self.purge == PurgeState::Purging,
            notification: self.notification.clone(),
        }
    }

    fn choose_file(&mut self, path: Option<PathBuf>) {
        let Some(path) = path else {
            self.file_input = None;
            self.selected_file = None;
            self.upload_error = None;
            return;
        };

        let file = SelectedFile::from_path(&path);
        match form::check_spreadsheet_name(&file.name, &self.required_filename) {
            Ok(()) => {
                self.file_input = Some(path);
                self.selected_file = Some(file);
                self.upload_error = None;
                self.upload_success = None;
            }
            Err(rejection) => {
                tracing::warn!("Rejected spreadsheet selection: {}", file.name);
                self.file_input = None;
                self.selected_file = None;
                self.upload_error = Some(rejection.message(&self.required_filename));
            }
        }
    }
}

fn non_empty(message: Option<String>, fallback: &str) -> String {
    message
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: ViewState, msg: Msg) -> (ViewState, Vec<Effect>) {
    let effects = match msg {
        Msg::PostalCodeChanged(raw) => {
            state.postal_code = form::mask_postal_code(&raw);
            Vec::new()
        }
        Msg::HouseNumberChanged(raw) => {
            state.house_number = form::sanitize_house_number(&raw);
            Vec::new()
        }
        Msg::LookupSubmitted => {
            if !state.can_submit_lookup() {
                return (state, Vec::new());
            }
            let query = LookupQuery {
                postal_code: form::digits_only(&state.postal_code),
                house_number: state.house_number.clone(),
            };
            state.lookup_loading = true;
            state.lookup_error = None;
            state.lookup_result = None;
            vec![Effect::Lookup(query)]
        }
        Msg::LookupSettled(outcome) => {
            state.lookup_loading = false;
            match outcome {
                Ok(result) => {
                    if !result.found {
                        state.lookup_error =
                            Some(non_empty(result.message.clone(), LOOKUP_NOT_FOUND));
                    }
                    state.lookup_result = Some(result);
                }
                Err(message) => {
                    state.lookup_error = Some(non_empty(Some(message), LOOKUP_FAILED));
                }
            }
            Vec::new()
        }
        Msg::FileChosen(path) => {
            if !state.upload_loading {
                state.choose_file(path);
            }
            Vec::new()
        }
        Msg::UploadSubmitted => {
            if state.upload_loading {
                return (state, Vec::new());
            }
            let Some(file) = state.selected_file.clone() else {
                state.upload_error = Some(UPLOAD_NO_FILE.to_string());
                return (state, Vec::new());
            };
            state.upload_loading = true;
            state.upload_error = None;
            state.upload_success = None;
            state.upload_elapsed_secs = 0;
            vec![Effect::StartUploadTimer, Effect::Upload(file)]
        }
        Msg::UploadTick => {
            if state.upload_loading {
                state.upload_elapsed_secs += 1;
            }
            Vec::new()
        }
        Msg::UploadSettled(outcome) => {
            state.upload_loading = false;
            match outcome {
                Ok(outcome) => {
                    state.upload_success = Some(non_empty(outcome.message, UPLOAD_SUCCEEDED));
                    state.selected_file = None;
                    state.file_input = None;
                }
                Err(message) => {
                    state.upload_error = Some(non_empty(Some(message), UPLOAD_FAILED));
                }
            }
            vec![Effect::StopUploadTimer]
        }
        Msg::PurgeRequested => {
            if state.purge == PurgeState::Idle {
                state.purge = PurgeState::ConfirmPending;
            }
            Vec::new()
        }
        Msg::PurgeCancelled => {
            if state.purge == PurgeState::ConfirmPending {
                state.purge = PurgeState::Idle;
            }
            Vec::new()
        }
        Msg::PurgeConfirmed => {
            if state.purge != PurgeState::ConfirmPending {
                return (state, Vec::new());
            }
            state.purge = PurgeState::Purging;
            vec![Effect::Purge]
        }
        Msg::PurgeSettled(outcome) => {
            match outcome {
                Ok(_) => {
                    state.purge = PurgeState::Idle;
                    state.notification = Some(PURGE_SUCCEEDED.to_string());
                    // The records behind the displayed result may be gone.
                    state.lookup_result = None;
                }
                Err(message) => {
                    state.purge = PurgeState::ConfirmPending;
                    state.notification = Some(non_empty(Some(message), PURGE_FAILED));
                }
            }
            Vec::new()
        }
        Msg::NotificationDismissed => {
            state.notification = None;
            Vec::new()
        }
    };

    (state, effects)
}
