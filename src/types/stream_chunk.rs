use serde::{Deserialize, Serialize};

/// One partial message decoded from a line of a completion stream.
///
/// Every field defaults when absent or `null`, so any JSON object whose
/// present fields have the right types decodes as a chunk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamChunk {
    /// Model that produced the chunk.
    pub model: String,

    /// Server timestamp, kept as the text the server sent.
    pub created_at: String,

    /// Fragment of the assistant message.
    pub message: Option<ChunkMessage>,

    /// Set on the chunk the server considers final.
    pub done: bool,
}

/// The message fragment inside a [`StreamChunk`].
///
/// The role is kept as the server sent it; streams may use roles outside
/// those a request can carry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkMessage {
    /// Role reported by the server.
    pub role: String,

    /// Text fragment.
    pub content: String,
}

impl StreamChunk {
    /// Decode a chunk from a line payload, or `None` if it is not one.
    ///
    /// A literal `null` decodes as an empty chunk.
    pub fn decode(payload: &str) -> Option<Self> {
        serde_json::from_str::<Option<Self>>(payload)
            .ok()
            .map(Option::unwrap_or_default)
    }

    /// The text this chunk contributes to the response.
    pub fn content(&self) -> &str {
        self.message.as_ref().map_or("", |m| m.content.as_str())
    }
}
