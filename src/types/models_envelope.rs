use serde::{Deserialize, Serialize};

/// Response from the list models endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelsEnvelope {
    /// The payload holding the model names.
    pub data: ModelsData,

    /// Status message from the server.
    pub message: String,

    /// Status code echoed by the server.
    pub status: i64,
}

/// Payload of a [`ModelsEnvelope`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelsData {
    /// Available model names, in server order.
    pub models: Vec<String>,
}

impl ModelsEnvelope {
    /// Get the list of model names.
    pub fn models(&self) -> &[String] {
        &self.data.models
    }

    /// Consume the envelope and return the model names.
    pub fn into_models(self) -> Vec<String> {
        self.data.models
    }
}
