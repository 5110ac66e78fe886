pub mod autofill;
pub mod inflight;

pub use crate::domain::model::{FieldKey, LookupKind, LookupOutcome, LookupResponse};
pub use crate::domain::ports::{ConfigProvider, FormFields, LookupBackend, Notifier};
pub use crate::utils::error::Result;
