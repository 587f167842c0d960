// SPDX-FileCopyrightText: 2026 Portcullis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Portcullis - redirect sterilization, IP classification and client-IP resolution.
//!
//! This is the binary entry point.

mod inspect;
mod password;
mod serve;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use portcullis_config::PortcullisConfig;

/// Portcullis - request-facing security helpers.
#[derive(Parser, Debug)]
#[command(name = "portcullis", version, about, long_about = None)]
struct Cli {
    /// Load configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Print a redirect target if it is safe to follow, `#` otherwise.
    Sterilize {
        /// Redirect target as received from the client.
        target: String,
    },
    /// Classify an IP address as private or public.
    Classify {
        ip: String,
        /// Use the wider rule set applied to client addresses.
        #[arg(long)]
        client: bool,
    },
    /// Resolve the client address of a hypothetical request.
    Resolve {
        /// Transport remote address of the request.
        #[arg(long)]
        remote: Option<String>,
        /// Request header, as `Name: value`. Repeatable.
        #[arg(short = 'H', long = "header", value_parser = inspect::parse_header)]
        headers: Vec<(String, String)>,
    },
    /// Hash a password read from stdin.
    HashPassword,
    /// Check a password read from stdin against a PHC hash.
    VerifyPassword {
        /// Stored hash, e.g. `$argon2id$v=19$...`.
        hash: String,
    },
    /// Run the demo HTTP gateway.
    Serve {
        /// Socket address to bind, overriding `[gateway] bind_address`.
        #[arg(long)]
        bind: Option<String>,
    },
    /// Validate the configuration and report problems.
    CheckConfig,
    /// Print the version.
    Version,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Load and validate configuration at startup
    let loaded = match &cli.config {
        Some(path) => portcullis_config::load_and_validate_path(path),
        None => portcullis_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            portcullis_config::render_errors(&errors);
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config.logging.level);

    match run(cli.command, &config).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("portcullis: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(
    command: Option<Commands>,
    config: &PortcullisConfig,
) -> Result<ExitCode, portcullis_core::PortcullisError> {
    match command {
        Some(Commands::Sterilize { target }) => {
            println!("{}", inspect::sterilize_target(&target));
        }
        Some(Commands::Classify { ip, client }) => {
            println!("{}", inspect::classify(&ip, client)?);
        }
        Some(Commands::Resolve { remote, headers }) => {
            println!("{}", inspect::resolve(config, remote.as_deref(), &headers)?);
        }
        Some(Commands::HashPassword) => {
            let input = password::read_password()?;
            println!("{}", password::hash(config, &input)?);
        }
        Some(Commands::VerifyPassword { hash }) => {
            let input = password::read_password()?;
            if !password::verify(&input, &hash)? {
                println!("mismatch");
                return Ok(ExitCode::FAILURE);
            }
            println!("match");
        }
        Some(Commands::Serve { bind }) => {
            serve::run_serve(config, bind.as_deref()).await?;
        }
        Some(Commands::CheckConfig) => {
            println!("{}", inspect::check_config(config)?);
        }
        Some(Commands::Version) => {
            println!("{}", portcullis_core::version_string("portcullis"));
        }
        None => {
            println!("portcullis: use --help for available commands");
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Install the global tracing subscriber. Logs go to stderr so command
/// output on stdout stays clean.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("portcullis={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
