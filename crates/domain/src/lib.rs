//! Relay Domain - Core data types
//!
//! This crate defines the domain model for the Relay API client.
//! All types here are pure Rust with no I/O dependencies.

pub mod collection;
pub mod extraction;
pub mod id;
pub mod key_value;
pub mod request;
pub mod response;

pub use collection::{CollectionRecord, SavedFolder, SavedRequest};
pub use extraction::{ExtractionRule, VariableExtraction};
pub use id::generate_id;
pub use key_value::KeyValuePair;
pub use request::RequestSpec;
pub use response::{ResponseData, TransportFailure};
