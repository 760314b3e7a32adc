pub mod error;
pub mod logger;
pub mod timer;
pub mod validation;
