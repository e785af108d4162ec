//! Relay Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer.

pub mod http;
pub mod import;
pub mod persistence;
pub mod serialization;

pub use http::ReqwestTransport;
pub use import::{CurlCommandParser, parse_curl_command};
pub use persistence::JsonFileStore;
pub use serialization::{SerializationError, from_json, to_json_stable};
