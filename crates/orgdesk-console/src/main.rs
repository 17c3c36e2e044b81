//! orgdesk admin console
//!
//! Terminal front end for the organization backend: record-count dashboard,
//! branch management, contact and route listings, and admin signup.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

mod prompt;
mod render;

use clap::{Args, Parser, Subcommand};
use orgdesk_client::{
    AdminRegistration, ApiClient, BranchList, BranchListManager, DELETE_CONFIRMATION,
    DashboardAggregator, DashboardState, Notice, RegistrationOutcome,
};
use orgdesk_core::{BranchDraft, Config, LogFormat, init_logging};
use serde::Serialize;
use std::{path::PathBuf, process::ExitCode};
use thiserror::Error;
use tracing::{debug, info};

/// Command line interface for the admin console
#[derive(Parser)]
#[command(
    name = "orgdesk",
    version = env!("CARGO_PKG_VERSION"),
    about = "Admin console for the organization management backend",
    long_about = "Shows the record-count dashboard, manages branches, lists contact requests and routes, and registers admin accounts against the organization REST backend."
)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Backend base address (overrides configuration)
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,

    /// Log format (json, pretty)
    #[arg(long)]
    log_format: Option<String>,

    /// Print results as JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    /// Subcommand
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
enum Commands {
    /// Show record counts and the latest entries
    Dashboard,

    /// Manage branches
    Branches {
        /// Branch subcommand
        #[command(subcommand)]
        action: BranchCommands,
    },

    /// List contact requests
    Contacts,

    /// List routes
    Routes,

    /// Register an admin account
    Register {
        /// Admin email address
        #[arg(long)]
        email: String,

        /// Admin password
        #[arg(long, env = "ORGDESK_ADMIN_PASSWORD", hide_env_values = true)]
        password: String,

        /// Skip the pause before returning to the login page
        #[arg(long)]
        no_wait: bool,
    },

    /// Show the resolved configuration
    Config,
}

/// Branch management commands
#[derive(Subcommand)]
enum BranchCommands {
    /// List all branches
    List,

    /// Delete a branch
    Delete {
        /// Branch identifier
        #[arg(value_name = "ID")]
        id: String,

        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Add a branch
    Add(NewBranch),

    /// Edit a branch; omitted fields keep their current value
    Edit {
        /// Branch identifier
        #[arg(value_name = "ID")]
        id: String,

        /// Fields to change
        #[command(flatten)]
        changes: BranchChanges,
    },
}

/// Fields of a new branch
#[derive(Args)]
struct NewBranch {
    /// Branch name
    #[arg(long)]
    name: String,
    /// District
    #[arg(long)]
    district: String,
    /// Street address
    #[arg(long, default_value = "")]
    address: String,
    /// Phone number
    #[arg(long, default_value = "")]
    phone: String,
    /// Manager name
    #[arg(long, default_value = "")]
    manager: String,
    /// Opening hours
    #[arg(long, default_value = "")]
    hours: String,
}

/// Changes to an existing branch
#[derive(Args)]
struct BranchChanges {
    /// Branch name
    #[arg(long)]
    name: Option<String>,
    /// District
    #[arg(long)]
    district: Option<String>,
    /// Street address
    #[arg(long)]
    address: Option<String>,
    /// Phone number
    #[arg(long)]
    phone: Option<String>,
    /// Manager name
    #[arg(long)]
    manager: Option<String>,
    /// Opening hours
    #[arg(long)]
    hours: Option<String>,
}

impl From<NewBranch> for BranchDraft {
    fn from(new: NewBranch) -> Self {
        Self {
            name: new.name,
            district: new.district,
            address: new.address,
            phone: new.phone,
            manager: new.manager,
            hours: new.hours,
        }
    }
}

impl BranchChanges {
    fn apply(self, draft: &mut BranchDraft) {
        let fields = [
            (self.name, &mut draft.name),
            (self.district, &mut draft.district),
            (self.address, &mut draft.address),
            (self.phone, &mut draft.phone),
            (self.manager, &mut draft.manager),
            (self.hours, &mut draft.hours),
        ];
        for (change, field) in fields {
            if let Some(value) = change {
                *field = value;
            }
        }
    }
}

/// Console failures
#[derive(Debug, Error)]
enum ConsoleError {
    /// Configuration or local validation failure
    #[error(transparent)]
    Core(#[from] orgdesk_core::Error),

    /// Terminal I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON output failure
    #[error("JSON output failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration could not be rendered
    #[error("failed to render configuration: {0}")]
    Toml(#[from] toml::ser::Error),

    /// The operation failed and the user has already been told why
    #[error("operation failed")]
    Reported,
}

type Result<T> = std::result::Result<T, ConsoleError>;

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env is fine
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = match resolve_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_logging(&config.logging.level, config.logging.format) {
        eprintln!("warning: {e}");
    }
    if let Err(e) = dotenv {
        debug!("No .env file loaded: {e}");
    }

    match run(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(ConsoleError::Reported) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Load configuration and apply command line overrides
fn resolve_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load_from(cli.config.as_deref())?;

    if let Some(base_url) = &cli.base_url {
        config.api.base_url.clone_from(base_url);
    }
    if let Some(level) = &cli.log_level {
        config.logging.level.clone_from(level);
    }
    if let Some(format) = &cli.log_format {
        config.logging.format = format.parse::<LogFormat>()?;
    }

    config.validate()?;
    Ok(config)
}

async fn run(cli: Cli, config: Config) -> Result<()> {
    let json = cli.json;

    if matches!(cli.command, Commands::Config) {
        print!("{}", toml::to_string_pretty(&config)?);
        return Ok(());
    }

    let client = ApiClient::from_config(&config.api)?;
    info!(base_url = client.base_url(), "Using backend");

    match cli.command {
        Commands::Dashboard => show_dashboard(client, json).await,
        Commands::Branches { action } => handle_branch_command(client, action, json).await,
        Commands::Contacts => {
            let result = client.contact_messages().await;
            show_listing("contact requests", result, json, render::contacts_table)
        }
        Commands::Routes => {
            let result = client.routes().await;
            show_listing("routes", result, json, render::routes_table)
        }
        Commands::Register {
            email,
            password,
            no_wait,
        } => register(client, email, password, no_wait).await,
        Commands::Config => Ok(()),
    }
}

async fn show_dashboard(client: ApiClient, json: bool) -> Result<()> {
    let mut state = DashboardState::new(DashboardAggregator::new(client));

    if state.is_loading() && !json {
        eprintln!("Loading dashboard...");
    }
    let notice = state.refresh().await;

    if let Some(notice) = &notice {
        report(notice);
    }

    // A failed load still renders, as an empty dashboard
    if json {
        print_json(state.snapshot())?;
    } else {
        print!("{}", render::dashboard(state.snapshot()));
    }

    if notice.is_some() {
        Err(ConsoleError::Reported)
    } else {
        Ok(())
    }
}

async fn handle_branch_command(client: ApiClient, action: BranchCommands, json: bool) -> Result<()> {
    let manager = BranchListManager::new(client);

    match action {
        BranchCommands::List => {
            let (list, notice) = BranchList::activate(manager).await;
            if let Some(notice) = &notice {
                report(notice);
            }
            if json {
                print_json(list.branches())?;
            } else {
                print!("{}", render::branch_table(list.branches()));
            }
            notice.map_or(Ok(()), |_| Err(ConsoleError::Reported))
        }
        BranchCommands::Delete { id, yes } => {
            if !yes && !prompt::confirm(DELETE_CONFIRMATION)? {
                println!("Deletion cancelled");
                return Ok(());
            }
            let mut list = BranchList::new(manager);
            finish(&list.delete(&id).await)
        }
        BranchCommands::Add(new) => {
            let mut list = BranchList::new(manager);
            finish(&list.create(&BranchDraft::from(new)).await)
        }
        BranchCommands::Edit { id, changes } => {
            let (mut list, notice) = BranchList::activate(manager).await;
            if let Some(notice) = notice {
                return finish(&notice);
            }
            let Some(current) = list.find(&id) else {
                return finish(&Notice::error(format!("No branch with id {id}")));
            };
            let mut draft = BranchDraft::from(current.clone());
            changes.apply(&mut draft);
            finish(&list.update(&id, &draft).await)
        }
    }
}

fn show_listing<T: Serialize>(
    collection: &str,
    result: orgdesk_client::ApiResult<Vec<T>>,
    json: bool,
    table: impl FnOnce(&[T]) -> String,
) -> Result<()> {
    let (items, notice) = match result {
        Ok(items) => (items, None),
        Err(err) => {
            tracing::error!(collection, error = %err, "Error fetching listing");
            (Vec::new(), Some(Notice::fetch_failed(collection, &err)))
        }
    };

    if let Some(notice) = &notice {
        report(notice);
    }
    if json {
        print_json(&items)?;
    } else {
        print!("{}", table(&items));
    }

    notice.map_or(Ok(()), |_| Err(ConsoleError::Reported))
}

async fn register(client: ApiClient, email: String, password: String, no_wait: bool) -> Result<()> {
    let outcome = AdminRegistration::new(client).register(email, password).await;

    match outcome {
        RegistrationOutcome::Registered { message, redirect } => {
            println!("{}", render::success(&message));
            if !no_wait {
                redirect.wait().await;
            }
            println!("Continue at the login page ({})", redirect.path);
            Ok(())
        }
        RegistrationOutcome::Rejected { error } => {
            eprintln!("{}", render::failure(&error));
            Err(ConsoleError::Reported)
        }
    }
}

fn finish(notice: &Notice) -> Result<()> {
    report(notice);
    if notice.is_error() {
        Err(ConsoleError::Reported)
    } else {
        Ok(())
    }
}

fn report(notice: &Notice) {
    if notice.is_error() {
        eprintln!("{}", render::notice(notice));
    } else {
        println!("{}", render::notice(notice));
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
