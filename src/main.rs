use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

use chatterm::{
    ChatTurnUseCase, DomainError, OpenAiClient, TurnOutcome, DEFAULT_MAX_TOKENS, DEFAULT_MODEL,
    DEFAULT_TEMPERATURE, DEFAULT_TIMEOUT_SECS,
};

#[derive(Parser)]
#[command(name = "chatterm")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long)]
    verbose: bool,

    /// Model identifier sent with every request
    #[arg(short, long, default_value = DEFAULT_MODEL)]
    model: String,

    /// Reply length ceiling in tokens
    #[arg(long, default_value_t = DEFAULT_MAX_TOKENS)]
    max_tokens: u32,

    /// Sampling temperature, clamped to [0.0, 2.0]
    #[arg(short, long, default_value_t = DEFAULT_TEMPERATURE)]
    temperature: f32,

    /// Endpoint base URL; overrides OPENAI_BASE_URL
    #[arg(long)]
    base_url: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Credential and transport problems must surface before the first prompt.
    let timeout = Duration::from_secs(cli.timeout_secs);
    let client = match cli.base_url.as_deref() {
        Some(base) => OpenAiClient::new(OpenAiClient::api_key_from_env()?, base, timeout)?,
        None => OpenAiClient::from_env(timeout)?,
    };

    let use_case = ChatTurnUseCase::new(Arc::new(client))
        .with_model(cli.model)
        .with_max_tokens(cli.max_tokens)
        .with_temperature(cli.temperature);

    println!("Chatterm Console Application 🤖");
    println!("Type your message and press Enter. Type 'exit' to quit.");

    let stdin = io::stdin();
    let mut line = String::new();

    loop {
        print!("\n🧑 You: ");
        io::stdout().flush()?;

        line.clear();
        // EOF ends the session the same way the exit sentinel does.
        if stdin.lock().read_line(&mut line)? == 0 {
            println!();
            debug!("stdin closed");
            break;
        }
        let input = line.trim_end_matches(&['\r', '\n'][..]);

        match use_case.execute(input).await {
            Ok(TurnOutcome::Exit) => {
                println!("Exiting application. Goodbye! 👋");
                break;
            }
            Ok(TurnOutcome::Reply(reply)) => {
                println!("🤖 Assistant: {reply}");
            }
            Err(DomainError::RemoteRejected { status, body }) => {
                eprintln!("Error: API returned status {status}");
                eprintln!("Response body: {body}");
            }
            Err(e) if e.is_recoverable() => {
                eprintln!("An error occurred while communicating with the API: {e}");
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}
