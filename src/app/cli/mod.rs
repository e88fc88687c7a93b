//! CLI adapter.

mod logging;

use std::io::ErrorKind;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use dialoguer::{Error as DialoguerError, Password};

use crate::domain::{AppError, ConnectionDescriptor};

pub use logging::{LogArgs, init_global_subscriber};

#[derive(Parser)]
#[command(name = "bipub")]
#[command(version)]
#[command(about = "Publish BI models and their data sources to a BI server", long_about = None)]
struct Cli {
    #[command(flatten)]
    log: LogArgs,
    /// Configuration file (defaults to ./bipub.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that a server accepts publishes from a user
    #[clap(visible_alias = "v")]
    Validate {
        /// Server base URL, e.g. http://localhost:8080/pentaho
        #[arg(long)]
        url: String,
        /// User id
        #[arg(long)]
        user: String,
        /// Password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,
    },
    /// Run a job file
    #[clap(visible_alias = "p")]
    Publish {
        /// Path to the job TOML
        job: PathBuf,
    },
    /// Print the obscured form of a password for job files
    Encrypt {
        password: String,
    },
    /// Print the persisted XML of a publish entry
    ExportEntry {
        /// Path to the job TOML
        job: PathBuf,
        /// Entry name
        entry: String,
    },
}

/// Entry point for the CLI.
pub fn run() {
    let cli = Cli::parse();
    init_global_subscriber(cli.log);

    let config = cli.config.as_deref();
    let result: Result<i32, AppError> = match cli.command {
        Commands::Validate { url, user, password } => run_validate(url, user, password, config),
        Commands::Publish { job } => run_publish(job, config),
        Commands::Encrypt { password } => {
            println!("{}", crate::app::api::encrypt_password(&password));
            Ok(0)
        }
        Commands::ExportEntry { job, entry } => {
            crate::app::api::export_entry(&job, &entry).map(|xml| {
                print!("{xml}");
                0
            })
        }
    };

    match result {
        Ok(exit_code) => {
            if exit_code != 0 {
                std::process::exit(exit_code);
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn run_validate(
    url: String,
    user: String,
    password: Option<String>,
    config: Option<&std::path::Path>,
) -> Result<i32, AppError> {
    let password = match password {
        Some(password) => password,
        None => match prompt_password()? {
            Some(password) => password,
            None => return Ok(1),
        },
    };

    let connection = ConnectionDescriptor::new(&url, user, password);
    let valid = crate::app::api::validate(&connection, config)?;
    Ok(if valid { 0 } else { 1 })
}

fn run_publish(job: PathBuf, config: Option<&std::path::Path>) -> Result<i32, AppError> {
    let result = crate::app::api::publish(&job, config)?;

    if result.result {
        println!(
            "✅ Job finished: {} entries run in {} ms",
            result.entries_run.len(),
            result.elapsed_ms()
        );
        return Ok(0);
    }

    eprintln!("❌ Job finished with {} error(s):", result.nr_errors);
    for message in &result.messages {
        eprintln!("  • {}", message);
    }
    Ok(1)
}

fn prompt_password() -> Result<Option<String>, AppError> {
    match Password::new().with_prompt("Password").interact() {
        Ok(value) => Ok(Some(value)),
        Err(DialoguerError::IO(err)) if err.kind() == ErrorKind::Interrupted => Ok(None),
        Err(err) => Err(AppError::config_error(format!("Failed to read password: {}", err))),
    }
}
