use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::Message;

/// Request payload for the chat completions endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Name of the model that should answer.
    pub model: String,

    /// The conversation so far, oldest first.
    pub messages: Vec<Message>,
}

impl ChatRequest {
    /// Create a new `ChatRequest`.
    pub fn new(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            messages,
        }
    }

    /// Encode the request as a JSON body.
    pub fn to_payload(&self) -> Result<Bytes> {
        serde_json::to_vec(self).map(Bytes::from).map_err(|e| {
            Error::encoding(
                format!("Failed to encode chat request: {e}"),
                Some(Box::new(e)),
            )
        })
    }
}

/// Encode `model` and `messages` as a chat completions payload.
///
/// The model name must not be empty; the message list may be.
pub fn build_completion_payload(model: &str, messages: &[Message]) -> Result<Bytes> {
    if model.trim().is_empty() {
        return Err(Error::validation(
            "model name must not be empty",
            Some("model".to_string()),
        ));
    }
    ChatRequest::new(model, messages.to_vec()).to_payload()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn payload_has_stable_field_names() {
        let messages = vec![
            Message::system("You are a helpful assistant."),
            Message::user("Hi"),
        ];
        let payload = build_completion_payload("qwen2.5:7b", &messages).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&payload).unwrap();
        assert_eq!(
            value,
            json!({
                "model": "qwen2.5:7b",
                "messages": [
                    {"role": "system", "content": "You are a helpful assistant."},
                    {"role": "user", "content": "Hi"}
                ]
            })
        );
    }

    #[test]
    fn field_order_is_model_then_messages() {
        let payload = ChatRequest::new("m", vec![]).to_payload().unwrap();
        assert_eq!(&payload[..], br#"{"model":"m","messages":[]}"#);
    }

    #[test]
    fn empty_model_is_rejected() {
        let err = build_completion_payload("  ", &[]).unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
    }
}
