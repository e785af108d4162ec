//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the application core and external
//! systems. Each port is a trait implemented by an adapter in the
//! infrastructure layer (or by a scripted double in tests).

mod curl;
mod persistence;
mod prompt;
mod transport;

pub use curl::{CurlImporter, CurlParseError, ParsedCurl};
pub use persistence::{CollectionPersistence, PersistenceError};
pub use prompt::{AlwaysConfirm, ConfirmPrompt};
pub use transport::Transport;
