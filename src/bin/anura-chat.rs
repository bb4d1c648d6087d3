//! Interactive chat application for the Anura API.
//!
//! # Usage
//!
//! ```bash
//! # Pick a model from the menu
//! ANURA_API_KEY=... anura-chat
//!
//! # Skip the menu
//! ANURA_API_KEY=... anura-chat --model qwen2.5:7b
//!
//! # Show stream events and job ids
//! ANURA_API_KEY=... anura-chat --verbose
//! ```
//!
//! Type `exit` or `quit` (or press Ctrl+D) to leave; `/help` lists commands.

use arrrg::CommandLine;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing_subscriber::EnvFilter;

use anura::chat::{
    ChatArgs, ChatCommand, ChatConfig, ChatSession, PlainTextRenderer, Renderer, choose_model,
    help_text, parse_command,
};
use anura::config::DEFAULT_MODEL;
use anura::{Anura, Config};

const RULE: &str = "─────────────────────────────────────────────────────────────";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (args, _) = ChatArgs::from_command_line_relaxed("anura-chat [OPTIONS]");
    let chat_config = ChatConfig::from(args);
    init_tracing(chat_config.verbose);
    let mut renderer = PlainTextRenderer::with_color(chat_config.use_color);

    println!("Welcome to the Anura Chat CLI!");
    println!("{RULE}");

    let config = match Config::from_env().and_then(|config| chat_config.apply(config)) {
        Ok(config) => config,
        Err(err) => {
            renderer.print_error(&err.to_string());
            std::process::exit(1);
        }
    };
    let client = Anura::new(config)?;
    let mut rl = DefaultEditor::new()?;

    let model = match client.config().model() {
        Some(model) => model.to_string(),
        None => {
            let models = fetch_models(&client, &mut renderer).await;
            match select_model(&mut rl, &models, &mut renderer) {
                Some(model) => model,
                None => return Ok(()),
            }
        }
    };
    renderer.print_highlight("Using model", &model);

    let mut session = ChatSession::new(client, model, chat_config.system_prompt.clone());

    println!("Type your messages and press Enter.");
    println!("Type 'exit', 'quit', or press Ctrl+D to end the conversation. /help lists commands.");
    println!("{RULE}");

    loop {
        match rl.readline("\nYou: ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line);

                if let Some(cmd) = parse_command(line) {
                    match cmd {
                        ChatCommand::Quit => {
                            println!("Goodbye!");
                            break;
                        }
                        ChatCommand::Clear => {
                            session.clear();
                            renderer.print_info("Conversation cleared.");
                        }
                        ChatCommand::Help => {
                            for line in help_text().lines() {
                                println!("    {line}");
                            }
                        }
                        ChatCommand::Model(name) => match session.set_model(name.clone()) {
                            Ok(()) => renderer.print_highlight("Model changed to", &name),
                            Err(err) => renderer.print_error(&err.to_string()),
                        },
                        ChatCommand::Models => match session.list_models().await {
                            Ok(models) => print_models(&models, session.model()),
                            Err(err) => renderer.print_error(&err.to_string()),
                        },
                        ChatCommand::System(prompt) => {
                            let prompt = prompt.unwrap_or_else(|| {
                                anura::chat::DEFAULT_SYSTEM_PROMPT.to_string()
                            });
                            renderer.print_info(&format!("System prompt set to: {prompt}"));
                            session.set_system_prompt(prompt);
                        }
                        ChatCommand::History => {
                            let stats = session.stats();
                            println!("    Model: {}", stats.model);
                            println!("    Messages: {}", stats.message_count);
                            println!("    Requests: {}", stats.total_requests);
                            println!("    System prompt: {}", stats.system_prompt);
                            if let Some(job_id) = stats.last_job_id {
                                println!("    Last job ID: {job_id}");
                            }
                        }
                        ChatCommand::Invalid(message) => {
                            renderer.print_error(&message);
                        }
                    }
                    continue;
                }

                println!("\nAnura is processing...");
                if let Err(err) = session.send(line, &mut renderer).await {
                    renderer.print_error(&err.to_string());
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!();
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("\nGoodbye!");
                break;
            }
            Err(err) => {
                renderer.print_error(&format!("Input error: {err}"));
                break;
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "anura=info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn fetch_models(client: &Anura, renderer: &mut PlainTextRenderer) -> Vec<String> {
    println!("Fetching available models...");
    match client.list_models().await {
        Ok(models) if !models.is_empty() => models,
        Ok(_) => {
            renderer.print_error("The service listed no models");
            println!("Using default model: {DEFAULT_MODEL}");
            vec![DEFAULT_MODEL.to_string()]
        }
        Err(err) => {
            renderer.print_error(&format!("Error fetching models: {err}"));
            println!("Using default model: {DEFAULT_MODEL}");
            vec![DEFAULT_MODEL.to_string()]
        }
    }
}

fn select_model(
    rl: &mut DefaultEditor,
    models: &[String],
    renderer: &mut PlainTextRenderer,
) -> Option<String> {
    println!("Select AI Model");
    print_models(models, "");
    loop {
        match rl.readline(&format!("Model [1-{}, default 1]: ", models.len())) {
            Ok(answer) => match choose_model(models, &answer) {
                Some(model) => return Some(model),
                None => renderer.print_error(&format!("No model matches '{}'", answer.trim())),
            },
            Err(err) => {
                renderer.print_error(&format!("Selection failed: {err}"));
                return None;
            }
        }
    }
}

fn print_models(models: &[String], current: &str) {
    for (index, model) in models.iter().enumerate() {
        let marker = if model == current { "➤" } else { " " };
        println!("  {marker} {:>2}. {model}", index + 1);
    }
}
