#![deny(missing_docs)]
//! Shared error taxonomy, vocabulary and configuration for the comma
//! hypothesis and calibration tools.

pub mod config;
pub mod errors;
pub mod serde;
pub mod vocabulary;

pub use config::{load_config, CommaConfig, DecimalSeparator, FileLayout, RemoteConfig};
pub use errors::{CommaError, ErrorInfo};
pub use vocabulary::{HypothesisKind, Vocabulary};
