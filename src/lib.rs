// Public modules
pub mod chat;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod observability;
pub mod render;
pub mod sse;
pub mod transport;
pub mod types;

// Re-exports
pub use client::Anura;
pub use config::Config;
pub use error::{Error, Result};
pub use models::decode_models;
pub use observability::register_biometrics;
pub use sse::{Line, ParseOptions, StreamParser, parse_reader, process_stream};
pub use transport::{ByteStream, CompletionBody, HttpTransport, Transport};
pub use types::*;
