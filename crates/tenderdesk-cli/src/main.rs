//! tenderdesk - command-line front end for tender-search sessions.
//!
//! Signs in against the back end, keeps the bearer token in the configured
//! session store, and shows how the route guard treats each front-end page.

mod app;

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tenderdesk_core::{Config, StoreBackend};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use app::App;

#[derive(Parser)]
#[command(
    name = "tenderdesk",
    version,
    about = "Session and route access for the tender-search front end"
)]
struct Cli {
    /// Where the session token is kept (overrides config and TENDERDESK_STORE)
    #[arg(long, global = true, value_enum)]
    store: Option<StoreArg>,

    /// API base URL (overrides config)
    #[arg(long, global = true, env = "TENDERDESK_API_URL")]
    api_url: Option<String>,

    /// Also write logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum StoreArg {
    File,
    Keyring,
    Memory,
}

impl From<StoreArg> for StoreBackend {
    fn from(arg: StoreArg) -> Self {
        match arg {
            StoreArg::File => StoreBackend::File,
            StoreArg::Keyring => StoreBackend::Keyring,
            StoreArg::Memory => StoreBackend::Memory,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Sign in and store the session token
    Login {
        #[arg(long)]
        email: Option<String>,
    },
    /// Create an account; signs in if the server returns a token
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: String,
    },
    /// Show the user behind the stored token
    Whoami,
    /// Forget the stored token
    Logout,
    /// Navigate to a front-end path through the access guard
    Open { path: String },
    /// List routes and whether they need a session
    Routes,
    /// Show whether a session token is present
    Status,
}

/// Initialize the tracing subscriber for logging.
/// The returned guard must live until exit so buffered file logs are flushed.
fn init_tracing(log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            let name = path.file_name().ok_or_else(|| {
                anyhow::anyhow!("Log file path has no file name: {}", path.display())
            })?;
            let appender = tracing_appender::rolling::never(dir, name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(fmt::layer().with_ansi(false).with_writer(writer)), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    Ok(guard)
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load().context("Failed to load configuration")?;
    if let Some(store) = cli.store {
        config.store = store.into();
    }
    if let Some(ref url) = cli.api_url {
        config.base_url = url.clone();
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let _log_guard = init_tracing(cli.log_file.as_deref())?;

    let config = load_config(&cli)?;
    info!(base_url = %config.base_url, store = ?config.store, "tenderdesk starting");

    let mut app = App::new(config)?;

    match cli.command {
        Command::Login { email } => app.login(email).await?,
        Command::Register { email, name } => app.register(email, name).await?,
        Command::Whoami => app.whoami().await?,
        Command::Logout => app.logout()?,
        Command::Open { path } => {
            let location = app.open(&path);
            match (&location.redirected_from, &location.route) {
                (Some(from), _) => {
                    println!("{} requires sign-in, redirected to {}", from, location.path)
                }
                (None, Some(route)) => {
                    println!("{} -> {} ({})", location.path, route.name, route.view)
                }
                (None, None) => println!("{} -> no matching route", location.path),
            }
        }
        Command::Routes => {
            let table = app.route_table();
            for route in table.routes() {
                let access = if table.is_public(&route.path) { "public" } else { "protected" };
                println!("{:<16} {:<12} {:<14} {}", route.path, route.name, route.view, access);
            }
        }
        Command::Status => {
            if app.has_token() {
                println!("Signed in ({:?} store)", app.config.store);
            } else {
                println!("Signed out ({:?} store)", app.config.store);
            }
        }
    }

    Ok(())
}
