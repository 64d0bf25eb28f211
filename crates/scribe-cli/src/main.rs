use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use scribe_core::history::DecayPolicy;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "scribe")]
#[command(about = "Scribe - random writing prompts without repeats", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Keep config, history and writings under this directory
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the prompt folder
    Folder {
        #[command(subcommand)]
        action: FolderAction,
    },
    /// List the categories of the prompt folder
    Categories,
    /// Show a prompt from CATEGORY that has not been shown this cycle
    Next { category: String },
    /// Show how far CATEGORY is through its current cycle
    Status { category: String },
    /// Forget the history of CATEGORY, or of every category
    Reset { category: Option<String> },
    /// Show or change settings in config.toml
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Save a finished writing
    Save {
        #[arg(long)]
        category: String,
        /// Feedback criteria the piece was written for
        #[arg(long)]
        criteria: String,
        /// Read the writing from this file instead of stdin
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the current settings
    Show,
    /// Change how shown prompts age out of the history
    Set {
        /// Hours after which a shown prompt is forgotten (0 disables decay)
        #[arg(long)]
        decay_hours: Option<u64>,
        /// What happens to a forgotten prompt: forget or requeue
        #[arg(long, value_parser = commands::config::parse_decay_policy)]
        decay_policy: Option<DecayPolicy>,
    },
}

#[derive(Subcommand)]
enum FolderAction {
    /// Select the folder prompts are read from
    Set { path: PathBuf },
    /// Print the selected folder
    Show,
}

fn init_tracing(verbose: u8, quiet: bool) {
    let default_level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let app = commands::App::bootstrap(cli.config_dir.as_deref()).await?;

    let outcome = match cli.command {
        Commands::Folder { action } => match action {
            FolderAction::Set { path } => commands::folder::set(&app, &path).await,
            FolderAction::Show => commands::folder::show(&app).await,
        },
        Commands::Categories => commands::prompts::categories(&app).await,
        Commands::Next { category } => commands::prompts::next(&app, &category).await,
        Commands::Status { category } => commands::prompts::status(&app, &category).await,
        Commands::Reset { category } => commands::prompts::reset(&app, category.as_deref()).await,
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show(&app.config),
            ConfigAction::Set {
                decay_hours,
                decay_policy,
            } => commands::config::set(&app.config, decay_hours, decay_policy),
        },
        Commands::Save {
            category,
            criteria,
            file,
        } => commands::writing::save(&app, &category, &criteria, file.as_deref()).await,
    };

    if let Err(e) = outcome {
        eprintln!("{}", commands::describe(&e));
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_save() {
        let cli = Cli::parse_from([
            "scribe", "-vv", "save", "--category", "fantasy", "--criteria", "voice",
        ]);

        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Save {
                category,
                criteria,
                file,
            } => {
                assert_eq!(category, "fantasy");
                assert_eq!(criteria, "voice");
                assert!(file.is_none());
            }
            _ => panic!("expected save"),
        }
    }

    #[test]
    fn test_parse_config_set() {
        let cli = Cli::parse_from([
            "scribe", "config", "set", "--decay-hours", "6", "--decay-policy", "requeue",
        ]);

        match cli.command {
            Commands::Config {
                action:
                    ConfigAction::Set {
                        decay_hours,
                        decay_policy,
                    },
            } => {
                assert_eq!(decay_hours, Some(6));
                assert_eq!(decay_policy, Some(DecayPolicy::Requeue));
            }
            _ => panic!("expected config set"),
        }
        assert!(
            Cli::try_parse_from(["scribe", "config", "set", "--decay-policy", "never"]).is_err()
        );
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["scribe", "-q", "-v", "categories"]).is_err());
    }
}
