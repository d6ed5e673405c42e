//! OpenCart command-line installer.
//!
//! # Usage
//!
//! ```bash
//! cd install
//! oc-install install --db_hostname localhost \
//!                    --db_username root \
//!                    --db_password pass \
//!                    --db_database opencart \
//!                    --db_driver mysqli \
//!                    --db_port 3306 \
//!                    --username admin \
//!                    --password admin \
//!                    --email youremail@example.com \
//!                    --http_server http://localhost/opencart/
//! ```
//!
//! # Commands
//!
//! - `install` - Seed the database and write the configuration files
//! - `usage` - Print an example invocation (also the fallback for anything else)

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use oc_install_cli::commands::install;
use oc_install_cli::{InstallError, InstallerConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Example flags shown by `usage`.
const USAGE_OPTIONS: &[&str] = &[
    "--db_hostname",
    "localhost",
    "--db_username",
    "root",
    "--db_password",
    "pass",
    "--db_database",
    "opencart",
    "--db_driver",
    "mysqli",
    "--db_port",
    "3306",
    "--username",
    "admin",
    "--password",
    "admin",
    "--email",
    "youremail@example.com",
    "--http_server",
    "http://localhost/opencart/",
];

#[derive(Parser)]
#[command(name = "oc-install")]
#[command(author, version, about = "OpenCart command-line installer")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Install OpenCart from `--name value` pairs
    Install {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, num_args = 0..)]
        options: Vec<String>,
    },
    /// Print an example invocation
    Usage {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, num_args = 0.., hide = true)]
        rest: Vec<String>,
    },
    #[command(external_subcommand)]
    Other(Vec<String>),
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    init_tracing();

    // Anything clap cannot make sense of falls back to the usage text.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            return;
        }
        Err(e) => {
            tracing::debug!("Unrecognized arguments: {e}");
            print_usage();
            return;
        }
    };

    match cli.command {
        Some(Commands::Install { options }) => {
            if let Err(e) = run(&options).await {
                tracing::error!("Install failed: {e}");
                print_failure(&e);
                std::process::exit(1);
            }
        }
        Some(Commands::Usage { rest }) => {
            if !rest.is_empty() {
                tracing::debug!(?rest, "Ignoring extra arguments");
            }
            print_usage();
        }
        Some(Commands::Other(_)) | None => print_usage(),
    }
}

/// Logs go to stderr so stdout carries only the installer's messages.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "oc_install_cli=info,oc_install=info".into());

    let json = std::env::var("LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json"));
    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer = (!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

async fn run(options: &[String]) -> Result<(), InstallError> {
    let config = InstallerConfig::from_env()?;
    let installation = install::run(options, &config).await?;

    #[allow(clippy::print_stdout)]
    {
        println!("SUCCESS! Opencart successfully installed on your server");
        println!("Store link: {}", installation.store_url);
        println!("Admin link: {}", installation.admin_url);
        println!();
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_failure(err: &InstallError) {
    println!("{}", err.report());
    println!();
}

#[allow(clippy::print_stdout)]
fn print_usage() {
    println!("Usage:");
    println!("======");
    println!();
    println!("oc-install install {}", USAGE_OPTIONS.join(" "));
    println!();
}
