// Conciliador CLI - reconcile a bank statement against a sales ledger

mod exit_codes;
mod recon;
mod util;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use exit_codes::{EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "conciliador")]
#[command(about = "Match bank statement entries to sales records")]
#[command(version)]
struct Cli {
    /// Log engine decisions (same as RUST_LOG=debug)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile a bank statement against a sales ledger
    #[command(after_help = "\
Examples:
  conciliador run cartola.csv ventas.csv
  conciliador run cartola.csv ventas.csv --tolerance-amount 0 --tolerance-days 2
  conciliador run cartola.csv ventas.csv --config recon.toml --json
  conciliador run cartola.csv ventas.json --sales-ref Folio --output result.json
  conciliador run cartola.csv ventas.csv --details

Exit codes:
  0  every record reconciled
  3  records remain pending
  4  invalid config
  5  unreadable input")]
    Run(recon::RunArgs),

    /// Show which columns would be used for amount, date and reference
    #[command(after_help = "\
Examples:
  conciliador detect cartola.csv
  conciliador detect ventas.json --json")]
    Detect {
        /// Ledger file (.csv or .json)
        file: PathBuf,

        /// Output JSON instead of a plain listing
        #[arg(long)]
        json: bool,
    },

    /// Validate a recon config without running
    #[command(after_help = "\
Examples:
  conciliador validate recon.toml")]
    Validate {
        /// Path to the .toml config file
        config: PathBuf,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Run(args) => recon::cmd_run(args),
        Commands::Detect { file, json } => recon::cmd_detect(file, json),
        Commands::Validate { config } => recon::cmd_validate(config),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
