//! CLI Command Implementations
//!
//! Implementations for all CLI subcommands.

use std::io::{self, Read};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;

use crate::budget;
use crate::classify;
use crate::config::MoonshotConfig;
use crate::sdk::{Client, RequestContext};
use crate::session::Session;
use crate::telemetry::init_telemetry;
use crate::types::*;
use crate::VERSION;

use super::{
    BalanceCommand, ChatCommand, Cli, Commands, ErrorsCommand, ModelsCommand, SessionCommand,
    TokensCommand,
};

/// Model used when neither the command line nor the configuration names one
pub const DEFAULT_MODEL: &str = "moonshot-v1-8k";

/// Execute the CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    // Load base configuration
    let mut config = if let Some(path) = &cli.config {
        MoonshotConfig::from_file(path)
            .with_context(|| format!("Failed to load configuration from {:?}", path))?
    } else {
        MoonshotConfig::from_env()?
    };

    // Apply global settings
    if let Some(level) = &cli.log_level {
        config.telemetry.log_level = level.clone();
    }
    if cli.json_logs {
        config.telemetry.json_logs = true;
    }
    if let Some(url) = &cli.base_url {
        config.client.base_url = url.clone();
    }
    config.validate()?;

    init_telemetry(&config.telemetry)?;

    let cancel = cancel_on_ctrl_c();
    let app = App {
        api_key: cli.api_key,
        cancel,
        config,
    };

    match cli.command {
        Commands::Models(cmd) => app.models(cmd).await,
        Commands::Balance(cmd) => app.balance(cmd).await,
        Commands::Tokens(cmd) => app.tokens(cmd).await,
        Commands::Chat(cmd) => app.chat(cmd).await,
        Commands::Session(cmd) => app.session(cmd).await,
        Commands::Errors(cmd) => execute_errors(cmd),
        Commands::Version => execute_version(),
    }
}

/// Shared state for commands that talk to the service
struct App {
    api_key: Option<String>,
    cancel: CancellationToken,
    config: MoonshotConfig,
}

impl App {
    fn client(&self) -> Result<Client> {
        Client::with_config(self.config.client.clone()).context("Failed to create client")
    }

    fn context(&self) -> Result<RequestContext> {
        let key = self
            .api_key
            .clone()
            .context("No API key given: pass --api-key or set MOONSHOT_API_KEY")?;
        Ok(RequestContext::new(key).with_cancellation(self.cancel.clone()))
    }

    fn model(&self, requested: Option<String>) -> String {
        requested
            .or_else(|| self.config.client.default_model.clone())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string())
    }

    async fn models(&self, cmd: ModelsCommand) -> Result<()> {
        let response = self.client()?.list_models(&self.context()?).await?;

        if !print_structured(&cmd.format, &response)? {
            println!("{:<32} {:<12} {:>12}", "MODEL", "OWNER", "CAPACITY");
            println!("{}", "-".repeat(58));
            for m in &response.data {
                let capacity = budget::model_capacity(&m.id)
                    .map(|c| c.to_string())
                    .unwrap_or_else(|_| "-".to_string());
                println!("{:<32} {:<12} {:>12}", m.id, m.owned_by, capacity);
            }
        }

        Ok(())
    }

    async fn balance(&self, cmd: BalanceCommand) -> Result<()> {
        let balance = self.client()?.query_balance(&self.context()?).await?;

        if !print_structured(&cmd.format, &balance)? {
            println!("Available: {:>12.4}", balance.available_balance);
            println!("Voucher:   {:>12.4}", balance.voucher_balance);
            println!("Cash:      {:>12.4}", balance.cash_balance);
        }

        Ok(())
    }

    async fn tokens(&self, cmd: TokensCommand) -> Result<()> {
        let model = self.model(cmd.model);
        let messages = prompt(cmd.system, read_message(cmd.message)?);

        let count = self
            .client()?
            .estimate_token_count(&self.context()?, &model, &messages)
            .await?;

        println!("Input tokens: {}", count);
        match budget::resolve(&model, count) {
            Ok(left) => println!("Remaining:    {}", left),
            Err(e) => tracing::debug!(error = %e, "No capacity for model"),
        }

        Ok(())
    }

    async fn chat(&self, cmd: ChatCommand) -> Result<()> {
        let model = self.model(cmd.model);
        let messages = prompt(cmd.system, read_message(cmd.message)?);

        let mut options = ChatOptions::new().max_token_policy(if cmd.max {
            MaxTokenPolicy::Max
        } else {
            self.config.client.default_max_token_policy
        });
        options.max_tokens = cmd.max_tokens;
        options.temperature = cmd.temperature;
        options.top_p = cmd.top_p;
        options.n = cmd.n;
        options.presence_penalty = cmd.presence_penalty;
        options.frequency_penalty = cmd.frequency_penalty;
        options.response_format = cmd.json.then_some(ResponseFormat::JsonObject);
        options.stop = (!cmd.stop.is_empty()).then_some(cmd.stop);
        options.stream = cmd.stream.then_some(true);

        let client = self.client()?;
        let ctx = self.context()?;
        let request = client.prepare_request(&ctx, model, messages, &options).await?;
        let response = client.send_chat(&ctx, &request).await?;

        if cmd.raw {
            println!("{}", serde_json::to_string_pretty(response.inner())?);
        } else {
            println!("{}", response.content());
        }

        Ok(())
    }

    async fn session(&self, cmd: SessionCommand) -> Result<()> {
        let model = self.model(cmd.model);
        let client = self.client()?;
        let ctx = self.context()?;

        let mut options = ChatOptions::new().max_token_policy(if cmd.max {
            MaxTokenPolicy::Max
        } else {
            self.config.client.default_max_token_policy
        });
        options.temperature = cmd.temperature;

        let history = cmd.system.map(Message::system).into_iter().collect();
        let mut session = Session::new(client, ctx, &model)
            .with_options(options)
            .with_history(history);
        session.subscribe(Arc::new(|m: &Message| println!("[{}] {}", m.role, m.content)));

        eprintln!("Chatting with {} (empty line or Ctrl-D to quit)", model);
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            let line = tokio::select! {
                line = lines.next_line() => line?,
                _ = self.cancel.cancelled() => None,
            };
            let Some(line) = line else { break };
            let text = line.trim();
            if text.is_empty() {
                break;
            }

            if let Err(e) = session.send_turn_with(text, self.cancel.clone()).await {
                if self.cancel.is_cancelled() {
                    break;
                }
                // the unanswered message stays in the history
                eprintln!("{}", e);
            }
        }

        eprintln!("{} messages exchanged", session.len());
        Ok(())
    }
}

fn execute_errors(cmd: ErrorsCommand) -> Result<()> {
    let entries: Vec<_> = classify::entries()
        .iter()
        .filter(|e| cmd.code.map_or(true, |code| e.code == code))
        .collect();

    if !print_structured(&cmd.format, &entries)? {
        for entry in entries {
            println!("{} {}", entry.code, entry.error_type);
            println!("    {}", entry.message_template);
            println!("    {}", entry.description);
        }
    }

    Ok(())
}

fn execute_version() -> Result<()> {
    println!("moonshot {}", VERSION);
    println!();
    println!("Build Information:");
    println!("  Version:       {}", VERSION);
    println!("  Base URL:      {}", crate::sdk::DEFAULT_BASE_URL);
    println!("  Error catalog: {} entries", classify::entries().len());
    Ok(())
}

// Helper functions

/// Print `value` as JSON or YAML; `false` means the caller prints a table
fn print_structured<T: Serialize>(format: &str, value: &T) -> Result<bool> {
    match format {
        "json" => println!("{}", serde_json::to_string_pretty(value)?),
        "yaml" => println!("{}", serde_yaml::to_string(value)?),
        "table" => return Ok(false),
        other => bail!("Unknown output format '{}'. Use table, json, or yaml", other),
    }
    Ok(true)
}

/// Read the message from stdin if "-"
fn read_message(message: String) -> Result<String> {
    if message != "-" {
        return Ok(message);
    }

    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("Failed to read message from stdin")?;
    Ok(input.trim().to_string())
}

fn prompt(system: Option<String>, message: String) -> Vec<Message> {
    system
        .map(Message::system)
        .into_iter()
        .chain(std::iter::once(Message::user(message)))
        .collect()
}

/// Token cancelled on the first Ctrl-C
fn cancel_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let on_signal = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupted, cancelling in-flight request");
            on_signal.cancel();
        }
    });
    token
}
