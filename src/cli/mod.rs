//! CLI Module for the Moonshot SDK
//!
//! Provides a command-line interface with subcommands for:
//! - Listing models and querying the account balance
//! - Estimating token counts
//! - One-shot chat completions and interactive sessions
//! - Browsing the documented error table

mod commands;

pub use commands::*;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::VERSION;

/// moonshot: command-line client for the Moonshot chat-completion service
#[derive(Parser, Debug)]
#[command(name = "moonshot")]
#[command(version = VERSION)]
#[command(about = "Command-line client for the Moonshot chat-completion service")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Global configuration file path (YAML, TOML, or JSON)
    #[arg(short, long, global = true, env = "MOONSHOT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Global log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Enable JSON log output
    #[arg(long, global = true, env = "MOONSHOT_JSON_LOGS")]
    pub json_logs: bool,

    /// API key sent as the bearer credential
    #[arg(long, global = true, env = "MOONSHOT_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Override the service base URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List available models
    Models(ModelsCommand),

    /// Show the account balance
    Balance(BalanceCommand),

    /// Estimate the token count of a prompt
    Tokens(TokensCommand),

    /// Send a single chat completion
    Chat(ChatCommand),

    /// Interactive multi-turn conversation on stdin
    Session(SessionCommand),

    /// Show the documented error table
    Errors(ErrorsCommand),

    /// Show version and build information
    Version,
}

/// List available models
#[derive(Parser, Debug)]
pub struct ModelsCommand {
    /// Output format (table, json, yaml)
    #[arg(short, long, default_value = "table")]
    pub format: String,
}

/// Show the account balance
#[derive(Parser, Debug)]
pub struct BalanceCommand {
    /// Output format (table, json, yaml)
    #[arg(short, long, default_value = "table")]
    pub format: String,
}

/// Estimate the token count of a prompt
#[derive(Parser, Debug)]
pub struct TokensCommand {
    /// Model to use
    #[arg(short, long)]
    pub model: Option<String>,

    /// Message text ("-" reads stdin)
    pub message: String,

    /// System prompt
    #[arg(short, long)]
    pub system: Option<String>,
}

/// Send a single chat completion
#[derive(Parser, Debug)]
pub struct ChatCommand {
    /// Model to use
    #[arg(short, long)]
    pub model: Option<String>,

    /// Message text ("-" reads stdin)
    pub message: String,

    /// System prompt
    #[arg(short, long)]
    pub system: Option<String>,

    /// Maximum tokens to generate
    #[arg(long, conflicts_with = "max")]
    pub max_tokens: Option<u64>,

    /// Spend all tokens the model context has left after the input
    #[arg(long)]
    pub max: bool,

    /// Temperature, in [0, 1]
    #[arg(short, long)]
    pub temperature: Option<f64>,

    /// Nucleus sampling, in (0, 1)
    #[arg(long)]
    pub top_p: Option<f64>,

    /// Number of candidate replies, in [1, 5]
    #[arg(short)]
    pub n: Option<u32>,

    /// Presence penalty, in [-2, 2]
    #[arg(long, allow_hyphen_values = true)]
    pub presence_penalty: Option<f64>,

    /// Frequency penalty, in [-2, 2]
    #[arg(long, allow_hyphen_values = true)]
    pub frequency_penalty: Option<f64>,

    /// Ask for a JSON object reply
    #[arg(long)]
    pub json: bool,

    /// Stop sequence (repeatable, at most 5)
    #[arg(long)]
    pub stop: Vec<String>,

    /// Request a streamed reply (not supported by this client)
    #[arg(long)]
    pub stream: bool,

    /// Print the full response instead of the selected reply
    #[arg(long)]
    pub raw: bool,
}

/// Interactive multi-turn conversation on stdin
#[derive(Parser, Debug)]
pub struct SessionCommand {
    /// Model to use
    #[arg(short, long)]
    pub model: Option<String>,

    /// System prompt placed at the start of the history
    #[arg(short, long)]
    pub system: Option<String>,

    /// Temperature, in [0, 1]
    #[arg(short, long)]
    pub temperature: Option<f64>,

    /// Spend all tokens the model context has left on every turn
    #[arg(long)]
    pub max: bool,
}

/// Show the documented error table
#[derive(Parser, Debug)]
pub struct ErrorsCommand {
    /// Only show entries with this status code
    #[arg(long)]
    pub code: Option<u16>,

    /// Output format (table, json, yaml)
    #[arg(short, long, default_value = "table")]
    pub format: String,
}
