//! Core chat session management.
//!
//! This module provides the `ChatSession` struct which owns the conversation
//! history and turns each user line into one completion request.

use crate::error::Result;
use crate::render::Renderer;
use crate::transport::{HttpTransport, Transport};
use crate::types::{Message, Role, StreamResponse};
use crate::{Anura, Error};

/// A chat session that manages conversation state and API interactions.
///
/// The history always starts with a system message.
pub struct ChatSession<T: Transport = HttpTransport> {
    client: Anura<T>,
    model: String,
    messages: Vec<Message>,
    request_count: u64,
    last_job_id: Option<String>,
}

/// Snapshot of a chat session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStats {
    /// The model used for the session.
    pub model: String,
    /// The number of messages in the conversation, system prompt included.
    pub message_count: usize,
    /// The current system prompt.
    pub system_prompt: String,
    /// Number of completion requests sent.
    pub total_requests: u64,
    /// Job id reported by the most recent reply, if any.
    pub last_job_id: Option<String>,
}

impl<T: Transport> ChatSession<T> {
    /// Creates a new chat session seeded with `system_prompt`.
    pub fn new(client: Anura<T>, model: impl Into<String>, system_prompt: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            messages: vec![Message::system(system_prompt)],
            request_count: 0,
            last_job_id: None,
        }
    }

    /// Sends a user message and renders the reply.
    ///
    /// On success both the user message and the reply join the history. On
    /// failure the history is left as it was; if the stream broke part way,
    /// whatever arrived is rendered before the error is returned.
    pub async fn send(&mut self, user_input: &str, renderer: &mut dyn Renderer) -> Result<StreamResponse> {
        let previous_len = self.messages.len();
        self.messages.push(Message::user(user_input));
        self.request_count = self.request_count.saturating_add(1);

        match self.client.complete_chat(&self.model, &self.messages).await {
            Ok(response) => {
                renderer.print_reply(&response.text);
                if self.client.config().verbose()
                    && let Some(job_id) = &response.job_id
                {
                    renderer.print_metadata("Job ID", job_id);
                }
                self.last_job_id = response.job_id.clone();
                self.messages.push(Message::assistant(response.text.clone()));
                Ok(response)
            }
            Err(err) => {
                self.messages.truncate(previous_len);
                if let Some(partial) = err.partial_response().filter(|p| !p.is_empty()) {
                    renderer.print_reply(&partial.text);
                }
                Err(err)
            }
        }
    }

    /// Lists the models the service offers.
    pub async fn list_models(&self) -> Result<Vec<String>> {
        self.client.list_models().await
    }

    /// Clears the conversation history, keeping the system prompt.
    pub fn clear(&mut self) {
        self.messages.truncate(1);
    }

    /// Returns the number of messages in the conversation.
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// Returns the conversation history.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Changes the model used for responses.
    pub fn set_model(&mut self, model: impl Into<String>) -> Result<()> {
        let model = model.into();
        if model.trim().is_empty() {
            return Err(Error::validation(
                "model name must not be empty",
                Some("model".to_string()),
            ));
        }
        self.model = model;
        Ok(())
    }

    /// Returns the current model.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Replaces the system prompt at the head of the history.
    pub fn set_system_prompt(&mut self, prompt: impl Into<String>) {
        let prompt = Message::system(prompt);
        match self.messages.first_mut() {
            Some(first) if first.role == Role::System => *first = prompt,
            _ => self.messages.insert(0, prompt),
        }
    }

    /// Returns the current system prompt.
    pub fn system_prompt(&self) -> &str {
        self.messages
            .first()
            .filter(|m| m.role == Role::System)
            .map(|m| m.content.as_str())
            .unwrap_or("")
    }

    /// Returns the current session statistics snapshot.
    pub fn stats(&self) -> SessionStats {
        SessionStats {
            model: self.model.clone(),
            message_count: self.message_count(),
            system_prompt: self.system_prompt().to_string(),
            total_requests: self.request_count,
            last_job_id: self.last_job_id.clone(),
        }
    }
}

/// Resolves a menu answer against the offered models.
///
/// Accepts a 1-based index or an exact model name; an empty answer picks the
/// first model. Returns `None` if nothing matches.
pub fn choose_model(models: &[String], answer: &str) -> Option<String> {
    let answer = answer.trim();
    if answer.is_empty() {
        return models.first().cloned();
    }
    if let Ok(index) = answer.parse::<usize>() {
        return index
            .checked_sub(1)
            .and_then(|index| models.get(index))
            .cloned();
    }
    models.iter().find(|m| m.as_str() == answer).cloned()
}
