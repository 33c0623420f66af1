// ABOUTME: Entry point for chatbox — a terminal chat client for a remote reply service.
// ABOUTME: Parses CLI args, loads config, sets up logging, and runs the TUI or a one-shot command.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use chatbox::app::App;
use chatbox::chat::SendOutcome;
use chatbox::config::Config;
use chatbox::logging;

#[derive(Debug, Parser)]
#[command(name = "chatbox", version, about = "Terminal chat client")]
struct Cli {
    /// Backend endpoint (overrides config and CHATBOX_BACKEND_URL).
    #[arg(long, global = true)]
    url: Option<String>,

    /// Profile whose history and session to use.
    #[arg(long, global = true, default_value = "default")]
    profile: String,

    /// Config file path.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Send one message and print the reply.
    Send { text: String },
    /// Print the stored conversation.
    History,
    /// Clear the conversation and start a new session.
    Clear,
    /// Empty the conversation but keep the current session.
    ResetHistory,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let _ = dotenvy::dotenv();

    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let mut config = Config::load_from(&config_path)?;
    config.apply_env();
    if let Some(url) = cli.url {
        config.backend.url = url;
    }

    if let Err(e) = logging::init(&Config::log_path()) {
        eprintln!("Warning: failed to set up logging: {}", e);
    }

    let app = App::new(config, Config::storage_path(&cli.profile));

    match cli.command {
        None => app.run().await,
        Some(Command::Send { text }) => {
            let backend = app.http_backend()?;
            match app.send_once(&text, &backend, std::io::stdout()).await? {
                SendOutcome::Failed(e) => Err(anyhow::anyhow!("backend error: {}", e)),
                _ => Ok(()),
            }
        }
        Some(Command::History) => {
            app.history(std::io::stdout())?;
            Ok(())
        }
        Some(Command::Clear) => {
            let session = app.clear()?;
            println!("Conversation cleared. New session: {}", session);
            Ok(())
        }
        Some(Command::ResetHistory) => {
            app.reset_history()?;
            println!("History cleared.");
            Ok(())
        }
    }
}
