use std::path::PathBuf;

use bullion_core::config::DEFAULT_CONFIG_PATH;
use bullion_core::TransactionFilter;
use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "bullion")]
#[command(about = "Gold and silver billing for the shop counter")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file (JSON)
    #[arg(long, short = 'c', global = true, env = "BULLION_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Ledger file (overrides the configured path)
    #[arg(long, short = 'l', global = true, env = "BULLION_LEDGER")]
    pub ledger: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(long, short = 'v', global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Bill a gold purchase and record it
    Gold(BillArgs),

    /// Bill a silver purchase and record it
    Silver(BillArgs),

    /// List the gold purity grades in use
    Purities,

    /// Create an account
    Register {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "BULLION_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Log in (records the login in the audit log) and show the dashboard
    Login(Credentials),

    /// Show the dashboard for your role
    Dashboard(Credentials),

    /// Show recorded transactions
    History {
        #[command(flatten)]
        credentials: Credentials,

        /// Which metal to show: gold, silver, or anything else for all
        #[arg(long = "type", default_value = "all", value_parser = parse_filter)]
        kind: TransactionFilter,
    },

    /// Export recorded transactions as CSV
    Export {
        #[command(flatten)]
        credentials: Credentials,

        #[arg(long = "type", default_value = "all", value_parser = parse_filter)]
        kind: TransactionFilter,

        /// Output file (defaults to stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Manage user accounts
    Users {
        #[command(subcommand)]
        action: UsersAction,
    },

    /// View or change shop settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },

    /// Show the audit log, newest first
    Audit(Credentials),

    /// Report service health
    Health,
}

/// Raw bill fields. Kept as text so they are validated the same way a
/// submitted form is.
#[derive(Args, Debug)]
pub struct BillArgs {
    /// Weight in grams
    #[arg(long, short = 'w', allow_hyphen_values = true)]
    pub weight: String,

    /// Price per gram (defaults to the last one used)
    #[arg(long, short = 'p', allow_hyphen_values = true)]
    pub price_per_gram: Option<String>,

    /// Karat label for gold (e.g. 22K), percentage for silver (e.g. 92.5)
    #[arg(long)]
    pub purity: String,

    /// Service charge percent (defaults to the last one used)
    #[arg(long, short = 's', allow_hyphen_values = true)]
    pub service_charge: Option<String>,

    /// Tax percent (defaults to the last one used)
    #[arg(long, short = 't', allow_hyphen_values = true)]
    pub tax: Option<String>,

    /// Print the bill as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct Credentials {
    /// Account email
    #[arg(long, short = 'e', env = "BULLION_EMAIL")]
    pub email: String,

    /// Account password
    #[arg(long, env = "BULLION_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(Subcommand, Debug)]
pub enum UsersAction {
    /// List all accounts
    List(Credentials),

    /// Change a user's role
    SetRole {
        #[command(flatten)]
        credentials: Credentials,

        /// Id of the user to change
        #[arg(long)]
        user_id: u64,

        #[arg(long, value_enum)]
        role: RoleArg,
    },
}

#[derive(Subcommand, Debug)]
pub enum SettingsAction {
    /// Show the settings in force
    Show(Credentials),

    /// Save new settings
    Set {
        #[command(flatten)]
        credentials: Credentials,

        /// Three-letter currency code
        #[arg(long)]
        currency: String,

        /// light or dark
        #[arg(long)]
        theme: String,
    },
}

/// Same leniency as a history query string: unknown values list everything.
fn parse_filter(value: &str) -> Result<TransactionFilter, String> {
    Ok(TransactionFilter::from_query(value))
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum RoleArg {
    Customer,
    Manager,
    Admin,
}
