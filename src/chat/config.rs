//! Configuration types for the chat application.
//!
//! This module provides CLI argument parsing via `arrrg` and the settings
//! that control a chat session.

use arrrg_derive::CommandLine;

use crate::config::Config;
use crate::error::Result;

/// System prompt that seeds every conversation.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// Command-line arguments for the anura-chat tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// Model to use for chat.
    #[arrrg(optional, "Model to use (skips the selection menu)", "MODEL")]
    pub model: Option<String>,

    /// System prompt to set context for the conversation.
    #[arrrg(optional, "System prompt for the conversation", "PROMPT")]
    pub system: Option<String>,

    /// Base URL of the API.
    #[arrrg(optional, "Base URL of the Anura API", "URL")]
    pub base_url: Option<String>,

    /// Report stream events and job ids.
    #[arrrg(flag, "Show stream events, job ids and skipped lines")]
    pub verbose: bool,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,
}

/// Settings for a chat session, resolved from command-line arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatConfig {
    /// Model requested on the command line, if any.
    pub model: Option<String>,

    /// System prompt that seeds the conversation.
    pub system_prompt: String,

    /// Base URL override, if any.
    pub base_url: Option<String>,

    /// Whether to report stream diagnostics.
    pub verbose: bool,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,
}

impl ChatConfig {
    /// Creates a new ChatConfig with default values.
    pub fn new() -> Self {
        Self {
            model: None,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            base_url: None,
            verbose: false,
            use_color: true,
        }
    }

    /// Applies the command-line overrides to the client configuration.
    ///
    /// A model given on the command line wins over `ANURA_MODEL`.
    pub fn apply(&self, config: Config) -> Result<Config> {
        let mut config = config.with_verbose(self.verbose);
        if let Some(model) = &self.model {
            config = config.with_model(Some(model.clone()));
        }
        if let Some(base_url) = &self.base_url {
            config = config.with_base_url(base_url)?;
        }
        Ok(config)
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ChatArgs> for ChatConfig {
    fn from(args: ChatArgs) -> Self {
        ChatConfig {
            model: args.model,
            system_prompt: args
                .system
                .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string()),
            base_url: args.base_url,
            verbose: args.verbose,
            use_color: !args.no_color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_from_args_defaults() {
        let config = ChatConfig::from(ChatArgs::default());
        assert_eq!(config, ChatConfig::default());
        assert_eq!(config.system_prompt, DEFAULT_SYSTEM_PROMPT);
        assert!(config.use_color);
        assert!(!config.verbose);
    }

    #[test]
    fn config_from_args_custom() {
        let args = ChatArgs {
            model: Some("llama3.1:8b".to_string()),
            system: Some("You are terse.".to_string()),
            base_url: Some("http://localhost:9000/api/v1/".to_string()),
            verbose: true,
            no_color: true,
        };
        let config = ChatConfig::from(args);
        assert_eq!(config.model.as_deref(), Some("llama3.1:8b"));
        assert_eq!(config.system_prompt, "You are terse.");
        assert!(config.verbose);
        assert!(!config.use_color);
    }

    #[test]
    fn apply_overrides_client_config() {
        let chat = ChatConfig {
            model: Some("llama3.1:8b".to_string()),
            base_url: Some("http://localhost:9000/api/v1".to_string()),
            verbose: true,
            ..ChatConfig::new()
        };
        let base = Config::new("key").unwrap().with_model(Some("env-model".to_string()));
        let config = chat.apply(base).unwrap();
        assert_eq!(config.model(), Some("llama3.1:8b"));
        assert!(config.verbose());
        assert_eq!(
            config.models_url().unwrap().as_str(),
            "http://localhost:9000/api/v1/models"
        );
    }

    #[test]
    fn apply_keeps_environment_model() {
        let base = Config::new("key").unwrap().with_model(Some("env-model".to_string()));
        let config = ChatConfig::new().apply(base).unwrap();
        assert_eq!(config.model(), Some("env-model"));
    }
}
