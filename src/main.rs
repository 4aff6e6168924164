//! SCM Provisioner
//!
//! Command-line front end for inspecting and provisioning storage-class
//! memory. Results are printed as JSON on stdout; logs go to stderr.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use scm_provisioner::{PrepRequest, ScmConfig, ScmManager, ScmProvider};

// =============================================================================
// CLI Arguments
// =============================================================================

/// SCM Provisioner - persistent memory region and namespace management
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// YAML configuration file
    #[arg(long, env = "SCM_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long, env = "LOG_JSON")]
    log_json: bool,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Show the current SCM region state
    State,
    /// List existing pmem namespaces
    Namespaces,
    /// Show state, modules and namespaces
    Scan,
    /// Create regions or namespaces as the current state requires
    Prep,
    /// Remove namespaces and regions, returning capacity to memory mode
    PrepReset,
}

// =============================================================================
// Main
// =============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    init_logging(&args)?;

    let config = match &args.config {
        Some(path) => ScmConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ScmConfig::default(),
    };

    info!("Starting {} {}", scm_provisioner::NAME, scm_provisioner::VERSION);

    let provider = ScmProvider::from_config(&config);

    let output = match args.command {
        Cmd::State => serde_json::to_string_pretty(&provider.state().await?)?,
        Cmd::Namespaces => serde_json::to_string_pretty(&provider.namespaces().await?)?,
        Cmd::Scan => serde_json::to_string_pretty(&provider.scan().await?)?,
        Cmd::Prep => {
            serde_json::to_string_pretty(&provider.prep(PrepRequest { reset: false }).await?)?
        }
        Cmd::PrepReset => {
            serde_json::to_string_pretty(&provider.prep(PrepRequest { reset: true }).await?)?
        }
    };

    println!("{}", output);
    Ok(())
}

// =============================================================================
// Logging Setup
// =============================================================================

fn init_logging(args: &Args) -> anyhow::Result<()> {
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if args.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .try_init()?;
    }

    Ok(())
}
