//! # Bullion CLI Application
//!
//! Counter-side interface: bill gold and silver purchases, then review
//! history, export CSV and administer the shop from the same ledger file.

mod cli;
mod render;

use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use bullion_core::access::{require, Capability, Role};
use bullion_core::calculations::{Bill, Metal};
use bullion_core::dashboard::dashboard_for;
use bullion_core::export::{write_csv, EXPORT_FILE_NAME};
use bullion_core::form::BillForm;
use bullion_core::health::{HealthReport, SystemHealth};
use bullion_core::ledger::RateDefaults;
use bullion_core::settings::ShopSettings;
use bullion_core::{
    load_or_create_ledger, record_bill, save_ledger, AppConfig, BillError, BillResult, FileLock, Ledger,
    PurityTable, Registration, Transaction, TransactionFilter, TransactionRepository, User,
};

use cli::{BillArgs, Cli, Command, Credentials, RoleArg, SettingsAction, UsersAction};

/// Exit code for errors the user can fix by re-entering input
const EXIT_INVALID_INPUT: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            if let Some(bill_err) = e.downcast_ref::<BillError>() {
                if let Ok(json) = serde_json::to_string_pretty(bill_err) {
                    eprintln!();
                    eprintln!("Error JSON:");
                    eprintln!("{}", json);
                }
                if bill_err.is_recoverable() {
                    eprintln!("The ledger is in use by another terminal; try again in a moment.");
                }
                if bill_err.is_user_error() {
                    return ExitCode::from(EXIT_INVALID_INPUT);
                }
            }
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Resolved configuration shared by every command.
struct App {
    config: AppConfig,
    ledger_path: PathBuf,
    table: PurityTable,
    default_settings: ShopSettings,
}

impl App {
    fn load(cli: &Cli) -> anyhow::Result<Self> {
        let config = AppConfig::load(&cli.config)
            .with_context(|| format!("Invalid configuration in {}", cli.config.display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid configuration in {}", cli.config.display()))?;

        let ledger_path = cli.ledger.clone().unwrap_or_else(|| config.ledger_path.clone());
        let table = config.purity_table()?;
        let default_settings = config.default_settings()?;

        Ok(App {
            config,
            ledger_path,
            table,
            default_settings,
        })
    }

    /// Load the ledger for reading. No lock is taken.
    fn read(&self) -> anyhow::Result<Ledger> {
        load_or_create_ledger(&self.ledger_path, &self.config.shop_name)
            .with_context(|| format!("Cannot open ledger {}", self.ledger_path.display()))
    }

    /// Lock, load, apply `change`, and save only if it succeeded.
    fn write<T>(&self, change: impl FnOnce(&mut Ledger) -> BillResult<T>) -> anyhow::Result<T> {
        let holder = std::env::var("USER").unwrap_or_else(|_| "bullion".to_string());
        let _lock = FileLock::acquire(&self.ledger_path, holder)?;

        let mut ledger = self.read()?;
        let out = change(&mut ledger)?;
        save_ledger(&ledger, &self.ledger_path)
            .with_context(|| format!("Cannot save ledger {}", self.ledger_path.display()))?;
        Ok(out)
    }

    fn currency(&self, ledger: &Ledger) -> String {
        ledger.effective_settings(&self.default_settings).currency
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let app = App::load(&cli)?;

    match cli.command {
        Command::Gold(args) => bill_command(&app, Metal::Gold, args),
        Command::Silver(args) => bill_command(&app, Metal::Silver, args),
        Command::Purities => {
            print!("{}", render::purities(&app.table));
            Ok(())
        }
        Command::Register {
            first_name,
            last_name,
            username,
            email,
            password,
        } => {
            let form = Registration {
                first_name,
                last_name,
                username,
                email,
                password,
            };
            let user = app.write(|ledger| ledger.register(&form))?;
            println!("Registered {} (id {}, role {}).", user.username, user.id, user.role);
            Ok(())
        }
        Command::Login(credentials) => {
            let user = app.write(|ledger| ledger.authenticate(&credentials.email, &credentials.password))?;
            let ledger = app.read()?;
            let dash = dashboard_for(&ledger, &user, SystemHealth::sample)?;
            print!("{}", render::dashboard(&user, &dash));
            Ok(())
        }
        Command::Dashboard(credentials) => {
            let ledger = app.read()?;
            let user = signed_in(&ledger, &credentials)?;
            let dash = dashboard_for(&ledger, &user, SystemHealth::sample)?;
            print!("{}", render::dashboard(&user, &dash));
            Ok(())
        }
        Command::History { credentials, kind } => {
            let ledger = app.read()?;
            let user = signed_in(&ledger, &credentials)?;
            require(&user, Capability::ViewHistory)?;
            let transactions = ledger.transactions(kind);
            print!("{}", render::history(&transactions, &app.currency(&ledger)));
            Ok(())
        }
        Command::Export {
            credentials,
            kind,
            output,
        } => export_command(&app, &credentials, kind, output),
        Command::Users { action } => users_command(&app, action),
        Command::Settings { action } => settings_command(&app, action),
        Command::Audit(credentials) => {
            let ledger = app.read()?;
            let user = signed_in(&ledger, &credentials)?;
            let entries = ledger.audit_log(&user)?;
            print!("{}", render::audit(&entries));
            Ok(())
        }
        Command::Health => {
            print!("{}", render::health(&HealthReport::current()));
            Ok(())
        }
    }
}

fn signed_in(ledger: &Ledger, credentials: &Credentials) -> BillResult<User> {
    ledger.check_credentials(&credentials.email, &credentials.password)
}

fn role(arg: RoleArg) -> Role {
    match arg {
        RoleArg::Customer => Role::Customer,
        RoleArg::Manager => Role::Manager,
        RoleArg::Admin => Role::Admin,
    }
}

/// Form fields from the command line, with remembered rates standing in for
/// anything left out. With nothing remembered the price falls back to zero,
/// which the calculator then rejects.
fn fill_form(args: &BillArgs, remembered: &RateDefaults) -> BillForm {
    let or_remembered = |given: &Option<String>, fallback: f64| {
        given.clone().unwrap_or_else(|| fallback.to_string())
    };
    BillForm {
        weight: args.weight.clone(),
        price_per_gram: or_remembered(&args.price_per_gram, remembered.price_per_gram.0),
        purity: args.purity.clone(),
        service_charge: or_remembered(&args.service_charge, remembered.service_charge_rate.0),
        tax: or_remembered(&args.tax, remembered.tax_rate.0),
    }
}

/// Calculate and record a bill, then remember its rates for next time.
fn bill_command(app: &App, metal: Metal, args: BillArgs) -> anyhow::Result<()> {
    let (tx, bill, currency) = app.write(|ledger| -> BillResult<(Transaction, Bill, String)> {
        let form = fill_form(&args, &ledger.remembered.for_metal(metal));
        let request = form.parse(metal)?;
        let (tx, bill) = record_bill(ledger, &request, &app.table)?;
        ledger.remember_rates(&request);
        Ok((tx, bill, app.currency(ledger)))
    })?;

    if args.json {
        let json = serde_json::to_string_pretty(&serde_json::json!({
            "transaction": tx,
            "bill": bill,
            "currency": currency,
        }))?;
        println!("{}", json);
    } else {
        print!("{}", render::bill(&app.config.shop_name, &tx, &bill, &currency));
    }
    Ok(())
}

fn export_command(
    app: &App,
    credentials: &Credentials,
    kind: TransactionFilter,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let ledger = app.read()?;
    let user = signed_in(&ledger, credentials)?;
    require(&user, Capability::ExportCsv)?;

    let transactions = ledger.transactions(kind);
    match output {
        Some(path) => {
            let file = File::create(&path).with_context(|| format!("Cannot create {}", path.display()))?;
            write_csv(transactions.iter().copied(), file)?;
            info!(rows = transactions.len(), filter = kind.as_str(), path = %path.display(), "exported transactions");
            eprintln!("Wrote {} transactions to {}", transactions.len(), path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            write_csv(transactions.iter().copied(), &mut handle)?;
            handle.flush()?;
            info!(rows = transactions.len(), filter = kind.as_str(), "exported transactions as {}", EXPORT_FILE_NAME);
        }
    }
    Ok(())
}

fn users_command(app: &App, action: UsersAction) -> anyhow::Result<()> {
    match action {
        UsersAction::List(credentials) => {
            let ledger = app.read()?;
            let user = signed_in(&ledger, &credentials)?;
            let users = ledger.users(&user)?;
            print!("{}", render::users(&users));
        }
        UsersAction::SetRole {
            credentials,
            user_id,
            role: new_role,
        } => {
            let updated = app.write(|ledger| {
                let actor = signed_in(ledger, &credentials)?;
                ledger.set_role(&actor, user_id, role(new_role))
            })?;
            println!("User {}'s level updated to {}.", updated.username, updated.role);
        }
    }
    Ok(())
}

fn settings_command(app: &App, action: SettingsAction) -> anyhow::Result<()> {
    match action {
        SettingsAction::Show(credentials) => {
            let ledger = app.read()?;
            let user = signed_in(&ledger, &credentials)?;
            require(&user, Capability::ChangeSettings)?;
            let settings = ledger.effective_settings(&app.default_settings);
            print!("{}", render::settings(&settings, ledger.settings.is_some()));
        }
        SettingsAction::Set {
            credentials,
            currency,
            theme,
        } => {
            let saved = app.write(|ledger| {
                let actor = signed_in(ledger, &credentials)?;
                ledger.update_settings(&actor, &currency, &theme)
            })?;
            println!(
                "Settings updated successfully. Currency set to {}. Theme set to {}.",
                saved.currency, saved.theme
            );
        }
    }
    Ok(())
}
