//! Command-line front end over [`AccountManager`].

pub mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use money_config::{Config, ConfigManager};

use crate::{errors::CliError, AccountManager, BalanceOutcome};

#[derive(Debug, Parser)]
#[command(
    name = "account_manager_cli",
    version,
    about = "Validate and record balances, deposits and transfers"
)]
pub struct Cli {
    /// Directory holding the JSON stores. Overrides the config file.
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Config file to load instead of `<data dir>/config.json`.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Disable coloured output.
    #[arg(long, global = true)]
    pub plain: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check an IBAN against the Spanish format.
    ValidateIban { iban: String },
    /// Sum the movements of an IBAN and record the balance.
    Balance { iban: String },
    /// Record the deposit described in a JSON input file.
    Deposit { file: PathBuf },
    /// Record a transfer between two accounts.
    Transfer {
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
        #[arg(long)]
        concept: String,
        /// ORDINARY, URGENT or IMMEDIATE.
        #[arg(long = "type", value_name = "TYPE")]
        transfer_type: String,
        /// Execution date, DD/MM/YYYY.
        #[arg(long)]
        date: String,
        #[arg(long, allow_hyphen_values = true)]
        amount: String,
    },
}

/// Parses process arguments and runs the selected command.
pub fn run_cli() -> Result<(), CliError> {
    run(Cli::parse())
}

pub fn run(cli: Cli) -> Result<(), CliError> {
    output::set_preferences(output::OutputPreferences { plain: cli.plain });

    if let Command::ValidateIban { iban } = &cli.command {
        return if AccountManager::validate_iban(iban) {
            output::success(format!("{} is a valid IBAN", iban));
            Ok(())
        } else {
            Err(CliError::Input(format!("{} is not a valid IBAN", iban)))
        };
    }

    let config = load_config(&cli)?;
    let manager = AccountManager::from_config(&config);

    match cli.command {
        Command::ValidateIban { .. } => Ok(()),
        Command::Balance { iban } => {
            match manager.calculate_balance(&iban)? {
                BalanceOutcome::Recorded(record) => output::success(format!(
                    "balance for {} on {}: {}",
                    record.iban, record.date, record.amount
                )),
                BalanceOutcome::ZeroBalance => {
                    output::info(format!("balance for {} is zero; nothing recorded", iban))
                }
            }
            Ok(())
        }
        Command::Deposit { file } => {
            let signature = manager.deposit_into_account(&file)?;
            output::success(format!("deposit signature {}", signature));
            Ok(())
        }
        Command::Transfer {
            from,
            to,
            concept,
            transfer_type,
            date,
            amount,
        } => {
            let code =
                manager.transfer_request_str(&from, &to, &concept, &transfer_type, &date, &amount)?;
            output::success(format!("transfer code {}", code));
            Ok(())
        }
    }
}

fn load_config(cli: &Cli) -> Result<Config, CliError> {
    let path = match &cli.config {
        Some(path) => path.clone(),
        None => {
            let base = cli
                .data_dir
                .clone()
                .unwrap_or_else(|| Config::default().resolve_data_dir());
            base.join("config.json")
        }
    };
    let mut config = ConfigManager::new(path).load()?;
    if let Some(dir) = &cli.data_dir {
        config.data_dir = Some(dir.clone());
    }
    tracing::debug!(data_dir = %config.resolve_data_dir().display(), "configuration loaded");
    Ok(config)
}
