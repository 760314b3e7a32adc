pub mod controller;
pub mod form;
pub mod view;
pub mod view_model;

pub use crate::domain::model::{LookupQuery, LookupResult, SelectedFile};
pub use crate::domain::ports::{ConfigProvider, ViabilityApi};
pub use crate::utils::error::Result;
