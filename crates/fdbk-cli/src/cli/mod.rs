//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use fdbk_core::config;
use fdbk_core::feedback::SortOrder;

mod commands;

#[derive(Parser)]
#[command(name = "fdbk")]
#[command(version)]
#[command(about = "Feedback board client (terminal UI + scripting commands)")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Sign in with email and password (password is read from stdin)
    Login {
        /// Account email
        #[arg(long)]
        email: String,
    },

    /// Forget the persisted session
    Logout,

    /// Print one page of feedback as a table
    List {
        /// Sort order
        #[arg(long, default_value = "date-desc", value_parser = parse_order)]
        order: SortOrder,

        /// Keep only rows whose name or comment contains this text
        #[arg(long, default_value = "")]
        search: String,

        /// Page to print (5 rows per page)
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
        page: u64,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
}

fn parse_order(value: &str) -> Result<SortOrder, String> {
    value.parse()
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;
    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    // Config commands must work even when the existing file is broken.
    if let Some(Commands::Config { command }) = &cli.command {
        return match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
        };
    }

    let config = config::Config::load().context("load config")?;
    let _log_guard = fdbk_core::logging::init(&config).context("init logging")?;
    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "fdbk starting");

    let Some(command) = cli.command else {
        return fdbk_tui::run_app(&config).await;
    };

    match command {
        // Handled before config loading.
        Commands::Config { .. } => Ok(()),
        Commands::Login { email } => commands::auth::login(&config, &email).await,
        Commands::Logout => commands::auth::logout(),
        Commands::List {
            order,
            search,
            page,
        } => commands::list::run(&config, order, &search, page as usize).await,
    }
}
