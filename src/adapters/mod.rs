// Adapters layer: concrete implementations of the domain ports.

pub mod form;
pub mod http;
pub mod notifier;

pub use form::{FormSnapshot, InMemoryForm};
pub use http::HttpLookupBackend;
pub use notifier::ConsoleNotifier;
