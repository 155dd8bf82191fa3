//! GoldCalc CLI - gold jewelry pricing in your terminal

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::{calc, config, login, logout, logs, purities, rate, register, whoami};

/// Environment variable holding the diagnostic log filter
const LOG_ENV: &str = "GOLDCALC_LOG";

/// GoldCalc - price gold jewelry at the current market rate
#[derive(Parser)]
#[command(name = "gc", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a local account and sign in
    Register {
        /// Display name
        #[arg(long)]
        name: Option<String>,
        /// Email address used to sign in
        #[arg(long)]
        email: Option<String>,
        /// Password (prompted when omitted)
        #[arg(long, env = "GOLDCALC_PASSWORD", hide_env_values = true)]
        password: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Sign in to an existing account
    Login {
        /// Email address
        #[arg(long)]
        email: Option<String>,
        /// Password (prompted when omitted)
        #[arg(long, env = "GOLDCALC_PASSWORD", hide_env_values = true)]
        password: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// End the current session
    Logout {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the signed-in user
    Whoami {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Fetch the current gold rate
    Rate {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Price a gold item
    Calc {
        /// Weight in grams
        grams: Decimal,
        /// Karat label (24K, 22K, 21K, 18K, 14K, 10K, 9K)
        #[arg(short, long, default_value = "24K")]
        purity: String,
        /// Flat making charge added before tax
        #[arg(short, long, default_value = "0")]
        making_charge: Decimal,
        /// Use this 24K rate per gram instead of fetching one
        #[arg(long)]
        rate: Option<Decimal>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the supported purity grades
    Purities {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Inspect or initialize settings
    Config {
        #[command(subcommand)]
        command: config::ConfigCommands,
    },

    /// View and manage the event log
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Register { name, email, password, json } => {
            register::run(name, email, password, json)
        }
        Commands::Login { email, password, json } => login::run(email, password, json),
        Commands::Logout { json } => logout::run(json),
        Commands::Whoami { json } => whoami::run(json),
        Commands::Rate { json } => rate::run(json),
        Commands::Calc { grams, purity, making_charge, rate, json } => {
            calc::run(purity, grams, making_charge, rate, json)
        }
        Commands::Purities { json } => purities::run(json),
        Commands::Config { command } => config::run(command),
        Commands::Logs { command } => logs::run(command),
    }
}
