use std::error::Error;
use std::net::SocketAddr;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use payroll_tax_engine::api::{AppState, create_router};
use payroll_tax_engine::config::ConfigLoader;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Statutory payroll tax engine.
///
/// Loads and validates the statutory schedules, then serves the payroll tax
/// API. Any invalid schedule stops startup.
#[derive(Debug, Parser)]
struct Cli {
    /// Directory holding one subdirectory per jurisdiction.
    #[arg(long, env = "PAYROLL_CONFIG_DIR", default_value = "./config")]
    config_dir: String,

    /// Serve the built-in Kenya schedule instead of reading `config_dir`.
    #[arg(long, default_value_t = false)]
    builtin: bool,

    /// Address to listen on.
    #[arg(long, env = "PAYROLL_BIND_ADDR", default_value = "0.0.0.0:3000")]
    bind: SocketAddr,

    /// Jurisdiction used when a request does not name one.
    #[arg(long, env = "PAYROLL_DEFAULT_JURISDICTION", default_value = "KE")]
    default_jurisdiction: String,
}

// ─── tracing ─────────────────────────────────────────────────────────────────

/// Initialise the tracing subscriber.
///
/// * Honours `RUST_LOG` when set.
/// * Falls back to `info`.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::from("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();

    let cli = Cli::parse();

    let loader = if cli.builtin {
        ConfigLoader::builtin()
    } else {
        ConfigLoader::load(&cli.config_dir)
    };
    let loader = loader.inspect_err(|err| {
        error!(config_dir = %cli.config_dir, error = %err, "Failed to load statutory schedules");
    })?;

    loader
        .get_jurisdiction(&cli.default_jurisdiction)
        .inspect_err(|err| error!(error = %err, "Default jurisdiction is not configured"))?;

    let state = AppState::new(loader, cli.default_jurisdiction);
    let router = create_router(state);

    let listener = TcpListener::bind(cli.bind).await?;
    info!(address = %cli.bind, "Payroll tax engine listening");
    axum::serve(listener, router).await?;

    Ok(())
}
