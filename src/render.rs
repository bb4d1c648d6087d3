//! Output rendering for the chat loop.
//!
//! This module provides the renderer trait and a plain-text implementation
//! with optional ANSI styling.

use std::io::{self, Stdout, Write};

/// ANSI escape code for dim text (used for metadata).
const ANSI_DIM: &str = "\x1b[2m";

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

/// ANSI escape code for cyan text (used for the assistant label).
const ANSI_CYAN: &str = "\x1b[36m";

/// ANSI escape code for green text (used for highlighted values).
const ANSI_GREEN: &str = "\x1b[32m";

/// ANSI escape code for red text (used for errors).
const ANSI_RED: &str = "\x1b[31m";

/// Trait for rendering chat output.
pub trait Renderer: Send {
    /// Print the assistant's reply.
    fn print_reply(&mut self, text: &str);

    /// Print side-channel metadata such as a job id.
    fn print_metadata(&mut self, label: &str, value: &str);

    /// Print an error message.
    fn print_error(&mut self, error: &str);

    /// Print an informational message.
    fn print_info(&mut self, info: &str);

    /// Print a value the user should notice, such as the selected model.
    fn print_highlight(&mut self, label: &str, value: &str);
}

/// Plain text renderer with optional ANSI styling.
pub struct PlainTextRenderer {
    stdout: Stdout,
    use_color: bool,
}

impl PlainTextRenderer {
    /// Creates a new PlainTextRenderer with ANSI colors enabled.
    pub fn new() -> Self {
        Self::with_color(true)
    }

    /// Creates a new PlainTextRenderer with specified color setting.
    pub fn with_color(use_color: bool) -> Self {
        Self {
            stdout: io::stdout(),
            use_color,
        }
    }

    fn flush(&mut self) {
        let _ = self.stdout.flush();
    }

    fn paint(&self, color: &str, text: &str) -> String {
        if self.use_color {
            format!("{color}{text}{ANSI_RESET}")
        } else {
            text.to_string()
        }
    }
}

impl Default for PlainTextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for PlainTextRenderer {
    fn print_reply(&mut self, text: &str) {
        println!("\n{} {text}", self.paint(ANSI_CYAN, "AI:"));
        self.flush();
    }

    fn print_metadata(&mut self, label: &str, value: &str) {
        println!("{}", self.paint(ANSI_DIM, &format!("{label}: {value}")));
        self.flush();
    }

    fn print_error(&mut self, error: &str) {
        eprintln!("{}", self.paint(ANSI_RED, &format!("Error: {error}")));
    }

    fn print_info(&mut self, info: &str) {
        println!("{info}");
        self.flush();
    }

    fn print_highlight(&mut self, label: &str, value: &str) {
        println!("{label}: {}", self.paint(ANSI_GREEN, value));
        self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renderer_default_has_color() {
        let renderer = PlainTextRenderer::new();
        assert!(renderer.use_color);
        assert_eq!(renderer.paint(ANSI_RED, "x"), "\x1b[31mx\x1b[0m");
    }

    #[test]
    fn renderer_without_color() {
        let renderer = PlainTextRenderer::with_color(false);
        assert!(!renderer.use_color);
        assert_eq!(renderer.paint(ANSI_RED, "x"), "x");
    }
}
