// Public modules
pub mod chat_request;
pub mod message;
pub mod models_envelope;
pub mod stream_chunk;
pub mod stream_response;

// Re-exports
pub use chat_request::{ChatRequest, build_completion_payload};
pub use message::{Message, Role};
pub use models_envelope::{ModelsData, ModelsEnvelope};
pub use stream_chunk::{ChunkMessage, StreamChunk};
pub use stream_response::StreamResponse;
