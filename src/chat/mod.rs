//! Interactive chat on top of the Anura client.
//!
//! - [`config`]: CLI argument parsing and session settings
//! - [`session`]: conversation history and API interaction
//! - [`commands`]: command parsing

mod commands;
mod config;
mod session;

pub use crate::render::{PlainTextRenderer, Renderer};
pub use commands::{ChatCommand, help_text, parse_command};
pub use config::{ChatArgs, ChatConfig, DEFAULT_SYSTEM_PROMPT};
pub use session::{ChatSession, SessionStats, choose_model};
