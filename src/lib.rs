pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod render;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::{CliConfig, Command};

pub use adapters::HttpApiClient;
pub use config::ClientSettings;
pub use core::controller::ViewController;
pub use core::view::{update, Effect, Msg, PurgeState, ViewState};
pub use core::view_model::{AppViewModel, ResultRow};
pub use domain::ports::ViabilityApi;
pub use utils::error::{ClientError, Result};
