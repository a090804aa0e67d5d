//! pc-sweeper - temp folder sweeper and maintenance tool launcher

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use pc_sweeper_lib::{
    read_option_pairs, ConfigError, OptionKey, OptionSet, Orchestrator, Settings, TOOL_CATALOG,
};

#[derive(Parser)]
#[command(name = "pc-sweeper")]
#[command(author, version, about = "Clears Windows temp folders and opens maintenance tools")]
struct Cli {
    /// Settings file (falls back to $PC_SWEEPER_CONFIG)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch the selected tools and sweep the target folders (default)
    Run {
        #[command(flatten)]
        select: Selection,
        /// Print the summary report as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the tool catalogue
    Tools,
    /// Show which folders a run would sweep
    Targets {
        #[command(flatten)]
        select: Selection,
    },
}

#[derive(Args, Default)]
struct Selection {
    /// JSON object of option flags, e.g. {"openSFC": true}
    #[arg(long, value_name = "FILE")]
    options: Option<PathBuf>,
    /// Enable one option by key; repeatable. Unknown keys are rejected,
    /// unlike keys in an options file, which are ignored
    #[arg(long = "enable", value_name = "KEY")]
    enable: Vec<String>,
    /// Enable every recognized option
    #[arg(long, conflicts_with_all = ["options", "enable"])]
    all: bool,
}

impl Selection {
    /// Raw key/value pairs, unvalidated. The option count limit is applied
    /// by the library.
    fn pairs(&self) -> Result<Vec<(String, bool)>, ConfigError> {
        if self.all {
            return Ok(OptionKey::ALL
                .iter()
                .map(|key| (key.as_str().to_string(), true))
                .collect());
        }

        let mut pairs = Vec::new();
        if let Some(path) = &self.options {
            pairs.extend(read_option_pairs(path)?);
        }
        for key in &self.enable {
            if OptionKey::from_key(key).is_none() {
                return Err(ConfigError::UnknownOption(key.clone()));
            }
            pairs.push((key.clone(), true));
        }
        Ok(pairs)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so `--json` output stays clean.
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let settings = Settings::load(cli.config.as_deref()).context("Failed to load settings")?;

    match cli.command.unwrap_or(Commands::Run {
        select: Selection::default(),
        json: false,
    }) {
        Commands::Run { select, json } => run(settings, &select, json).await,
        Commands::Tools => {
            list_tools();
            Ok(())
        }
        Commands::Targets { select } => targets(settings, &select).await,
    }
}

async fn run(settings: Settings, select: &Selection, json: bool) -> Result<()> {
    let pairs = select.pairs().context("Invalid option selection")?;
    let orchestrator = Orchestrator::from_settings(settings);
    let report = orchestrator
        .run(pairs)
        .await
        .context("Invalid option selection")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report.line);
    }
    Ok(())
}

async fn targets(settings: Settings, select: &Selection) -> Result<()> {
    let options = OptionSet::from_pairs(select.pairs()?).context("Invalid option selection")?;
    let orchestrator = Orchestrator::from_settings(settings);
    for target in orchestrator.resolve_targets(&options).await.iter() {
        println!("{}", target.display());
    }
    Ok(())
}

fn list_tools() {
    for spec in TOOL_CATALOG {
        for invocation in spec.invocations {
            println!(
                "{:<28} {:<24} {}",
                spec.option.as_str(),
                invocation.display_name,
                invocation.command_line()
            );
        }
    }
}
