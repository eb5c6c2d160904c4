//! CLI definitions and entry point

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use super::commands;
use idir::output::OutputMode;

/// idir - membership service for a community mutual-aid society
#[derive(Parser, Debug)]
#[command(
    name = "idir",
    version,
    about = "Membership service for a community mutual-aid society",
    long_about = "Members and dependents, loans, attendance, funeral duty rotation,\n\
                  fines, settings, officer accounts and a cash book, served as a\n\
                  JSON REST API."
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output in JSON format (machine-readable)
    #[arg(long, global = true)]
    pub json: bool,

    /// Config file (default: ./idir.toml, then ~/.config/idir/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP API
    Serve {
        /// Bind address (overrides config)
        #[arg(long)]
        bind: Option<String>,

        /// Listen port (overrides config and IDIR_PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Manage officer accounts
    Officer {
        #[command(subcommand)]
        action: OfficerAction,
    },

    /// Issue bearer tokens
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },

    /// Funeral duty rotation
    Duty {
        #[command(subcommand)]
        action: DutyAction,
    },

    /// Show version
    Version,
}

#[derive(Subcommand, Debug)]
pub enum OfficerAction {
    /// Create the first super-admin account
    Bootstrap {
        /// Login name
        username: String,

        /// Display name
        #[arg(short, long)]
        name: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum TokenAction {
    /// Issue a token for an existing, active officer
    Issue {
        /// Officer username
        username: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum DutyAction {
    /// Show the duties the next funeral would receive
    Preview,
}

/// Run the CLI
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    let output_mode = if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Human
    };
    let config = cli.config.as_deref();

    match cli.command {
        Some(Command::Serve { bind, port }) => commands::serve(config, bind, port),
        Some(Command::Officer {
            action: OfficerAction::Bootstrap { username, name },
        }) => commands::officer_bootstrap(config, &username, &name, output_mode),
        Some(Command::Token {
            action: TokenAction::Issue { username },
        }) => commands::token_issue(config, &username, output_mode),
        Some(Command::Duty {
            action: DutyAction::Preview,
        }) => commands::duty_preview(config, output_mode),
        Some(Command::Version) => {
            if output_mode == OutputMode::Json {
                println!(
                    "{}",
                    serde_json::json!({
                        "version": env!("CARGO_PKG_VERSION")
                    })
                );
            } else {
                println!("idir v{}", env!("CARGO_PKG_VERSION"));
            }
            Ok(())
        },
        None => {
            if output_mode == OutputMode::Json {
                println!(
                    "{}",
                    serde_json::json!({
                        "version": env!("CARGO_PKG_VERSION"),
                        "hint": "Use --help for usage"
                    })
                );
            } else {
                println!("idir v{}", env!("CARGO_PKG_VERSION"));
                println!("\nRun 'idir --help' for usage");
                println!("Run 'idir officer bootstrap <username> --name <name>' to get started");
            }
            Ok(())
        },
    }
}
