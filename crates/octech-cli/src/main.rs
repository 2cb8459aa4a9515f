use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod repl;

use octech_core::load_config;
use octech_server::state::AppState;

const DEFAULT_LOG_FILTER: &str = "octech=info,octech_server=info,tower_http=debug";

#[derive(Parser)]
#[command(name = "octech", version, about = "OC Tech Support site server")]
struct Cli {
    #[arg(
        long,
        default_value = ".",
        help = "Root directory (contains config/ and logs/)"
    )]
    root: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Start the HTTP server")]
    Serve {
        #[arg(long, help = "Bind address, overrides OCTECH_BIND and server.bind")]
        bind: Option<String>,
    },
    #[command(about = "Validate config files")]
    Validate,
    #[command(about = "Print a bcrypt hash for auth.password_hash")]
    HashPassword {
        #[arg(help = "Plaintext password")]
        password: String,
    },
    #[command(about = "Local chat REPL against the response matcher")]
    Chat,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_dir = cli.root.join("logs");
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("failed to create log dir: {}", log_dir.display()))?;
    let file_appender = tracing_appender::rolling::daily(&log_dir, "octech.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking),
        )
        .init();

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    match command {
        Commands::Serve { bind } => {
            let config = load_config(&cli.root.join("config"))?;
            let addr = bind
                .or_else(|| std::env::var("OCTECH_BIND").ok().filter(|v| !v.is_empty()))
                .unwrap_or_else(|| config.server.bind.clone());
            let state = AppState::from_config(&config)?;
            octech_server::serve(state, &addr).await?;
        }
        Commands::Validate => {
            let config = load_config(&cli.root.join("config"))?;
            println!(
                "Config valid. Admin: {}, bind: {}, assistant model: {}, assistant key: {}.",
                config.auth.admin_email,
                config.server.bind,
                config.assistant.model,
                if config.assistant.api_key.is_empty() {
                    "missing"
                } else {
                    "set"
                }
            );
        }
        Commands::HashPassword { password } => {
            let hash = bcrypt::hash(&password, bcrypt::DEFAULT_COST)?;
            println!("{hash}");
        }
        Commands::Chat => {
            repl::run_repl().await?;
        }
    }

    Ok(())
}
