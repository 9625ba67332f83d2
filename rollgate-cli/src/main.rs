//! Rollgate CLI - inspect feature decisions and configuration.
//!
//! # Commands
//!
//! - `rollgate check <feature> --user <id>` - Evaluate one feature
//! - `rollgate batch <feature>... --user <id>` - Evaluate several features
//! - `rollgate bucket <user> <feature>` - Show a user's rollout bucket
//! - `rollgate dump` - Print the resolved configuration
//! - `rollgate validate` - Load the configuration and report problems

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use rollgate_features::{DEFAULT_SALT, Environment};
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;
mod error;

use commands::{batch, bucket, check, dump, validate};
use error::CliResult;

/// Rollgate - deterministic feature targeting
#[derive(Parser)]
#[command(name = "rollgate")]
#[command(version)]
#[command(about = "Inspect Rollgate feature decisions and configuration")]
#[command(propagate_version = true)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Feature file (JSON, TOML or .env); repeat to layer several
    #[arg(short, long = "config", global = true, value_name = "FILE")]
    pub configs: Vec<PathBuf>,

    /// Deployment environment (local, integration, production)
    #[arg(short, long, global = true, env = "ROLLGATE_ENV")]
    pub env: Option<Environment>,

    /// Prefix of feature environment variables
    #[arg(long, global = true, default_value = rollgate_config::DEFAULT_PREFIX)]
    pub prefix: String,

    /// Do not read feature keys from the process environment
    #[arg(long, global = true)]
    pub no_env: bool,

    /// Salt mixed into bucket keys
    #[arg(long, global = true, default_value = DEFAULT_SALT)]
    pub salt: String,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

impl GlobalArgs {
    pub fn environment(&self) -> Environment {
        self.env.unwrap_or_default()
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate one feature for a user (exit code 1 when disabled)
    Check(check::CheckArgs),

    /// Evaluate several features for a user
    Batch(batch::BatchArgs),

    /// Show the rollout bucket of a user for a feature
    Bucket(bucket::BucketArgs),

    /// Print the resolved configuration for the environment
    Dump,

    /// Load the configuration and report problems
    Validate,
}

fn main() -> ExitCode {
    // Quiet by default; decisions go to stdout, logs to stderr
    let mut log_config = rollgate_log::LogConfig::from_env();
    if std::env::var_os("ROLLGATE_LOG_LEVEL").is_none() && !log_config.debug {
        log_config.level = rollgate_log::Level::Warn;
    }
    let _ = rollgate_log::try_init(log_config);

    let cli = Cli::parse();
    if cli.global.no_color {
        colored::control::set_override(false);
    }

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> CliResult<ExitCode> {
    match cli.command {
        Commands::Check(args) => check::execute(&cli.global, &args),
        Commands::Batch(args) => batch::execute(&cli.global, &args),
        Commands::Bucket(args) => bucket::execute(&cli.global, &args),
        Commands::Dump => dump::execute(&cli.global),
        Commands::Validate => validate::execute(&cli.global),
    }
}
