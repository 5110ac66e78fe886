pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::TomlConfig;

pub use adapters::{ConsoleNotifier, FormSnapshot, HttpLookupBackend, InMemoryForm};
pub use crate::core::autofill::{AutofillHandler, HandlerOptions};
pub use domain::model::{FieldKey, LookupKind, LookupOutcome, LookupResponse, LotNamePolicy};
pub use utils::error::{AutofillError, Result};
