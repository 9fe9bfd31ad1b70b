use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use stepup_core::{discover, UpgradePackage};
use stepup_engine::{
    create_recipe, create_release_recipe, human_estimate, Engine, EngineError, RecipeOptions,
    RunContext, StateLayout,
};
use stepup_ledger::FileLedger;

use crate::config::CliConfig;
use crate::logging::init_logging;
use crate::render;

#[derive(Parser, Debug)]
#[command(name = "stepup")]
#[command(about = "Dependency-graph driven installation upgrade engine", long_about = None)]
pub struct Cli {
    /// Installation state directory holding the ledger, log and config.
    #[arg(long, global = true)]
    state_dir: Option<PathBuf>,
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Discover pending upgrades and run the pre-upgrade checks only.
    Check,
    /// Apply every pending upgrade.
    Run {
        /// Run unattended: skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
    #[command(subcommand)]
    Show(ShowCommands),
    #[command(subcommand)]
    Create(CreateCommands),
    /// Emit a shell completion script on stdout.
    Completions { shell: Shell },
}

#[derive(Subcommand, Debug)]
enum ShowCommands {
    /// List upgrades that have not been applied yet.
    Pending {
        #[arg(long)]
        json: bool,
    },
    /// List upgrades recorded in the ledger.
    Applied {
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand, Debug)]
enum CreateCommands {
    /// Scaffold a new upgrade recipe source file.
    Recipe {
        path: PathBuf,
        /// Depend on every current endpoint instead of the latest applied
        /// upgrade.
        #[arg(long)]
        release: bool,
        #[arg(long)]
        repository: Option<String>,
        #[arg(long = "depends-on")]
        depends_on: Vec<String>,
        #[arg(long)]
        output_path: Option<PathBuf>,
    },
}

pub fn run(packages: Vec<Box<dyn UpgradePackage>>) -> Result<()> {
    run_cli(Cli::parse(), packages)
}

pub fn run_cli(cli: Cli, packages: Vec<Box<dyn UpgradePackage>>) -> Result<()> {
    let layout = StateLayout::new(
        cli.state_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(".")),
    );
    let config = CliConfig::load(cli.config.as_deref(), &layout)?;

    // Only a real run writes the log file; the read-only commands stay on
    // the console.
    let log_path = config
        .log_file
        .clone()
        .unwrap_or_else(|| layout.log_path());
    match &cli.command {
        Commands::Run { .. } => {
            layout.ensure_base_dirs()?;
            init_logging(Some(&log_path))?;
        }
        Commands::Completions { .. } => {}
        _ => init_logging(None)?,
    }

    match cli.command {
        Commands::Check => cmd_check(&layout, &config, &packages),
        Commands::Run { yes } => cmd_run(&layout, &config, &packages, yes, &log_path),
        Commands::Show(ShowCommands::Pending { json }) => {
            cmd_show_pending(&layout, &config, &packages, json)
        }
        Commands::Show(ShowCommands::Applied { json }) => cmd_show_applied(&layout, json),
        Commands::Create(CreateCommands::Recipe {
            path,
            release,
            repository,
            depends_on,
            output_path,
        }) => {
            let options = RecipeOptions {
                repository,
                depends_on: (!depends_on.is_empty()).then_some(depends_on),
                release,
                output_path,
            };
            cmd_create_recipe(&layout, &packages, &path, options)
        }
        Commands::Completions { shell } => {
            let mut command = Cli::command();
            clap_complete::generate(shell, &mut command, "stepup", &mut io::stdout());
            Ok(())
        }
    }
}

fn build_engine<'a>(ledger: &'a FileLedger, config: &CliConfig) -> Engine<'a> {
    let mut engine = Engine::new(ledger);
    if let Some(gate) = &config.scheduler {
        engine = engine
            .with_pre_check(gate.pre_check())
            .with_post_check(gate.post_check());
    }
    engine
}

fn cmd_check(
    layout: &StateLayout,
    config: &CliConfig,
    packages: &[Box<dyn UpgradePackage>],
) -> Result<()> {
    let ledger = FileLedger::new(layout.ledger_path());
    let engine = build_engine(&ledger, config);
    let mut ctx = RunContext::new();

    let units = discover(packages)?;
    let pending = engine.pending(units, &mut ctx)?;
    if pending.is_empty() {
        println!("All upgrades have been applied.");
        return Ok(());
    }

    println!("Following upgrade(s) have not been applied yet:");
    for line in render::format_pending_lines(&pending) {
        println!("{line}");
    }

    println!("Running pre-upgrade checks...");
    if let Err(error) = engine.pre_upgrade_checks(&pending, &mut ctx) {
        tracing::error!("{error}");
        println!("{}", render::error_line("Upgrade check failed. Aborting."));
        bail!("upgrade check failed");
    }

    println!(
        "{}",
        render::success_line(&format!(
            "Upgrade check successful - estimated time for upgrading: {}.",
            human_estimate(&pending)
        ))
    );
    Ok(())
}

fn cmd_run(
    layout: &StateLayout,
    config: &CliConfig,
    packages: &[Box<dyn UpgradePackage>],
    yes: bool,
    log_path: &Path,
) -> Result<()> {
    let ledger = FileLedger::new(layout.ledger_path());
    let engine = build_engine(&ledger, config);
    let mut ctx = RunContext::new();

    let units = discover(packages)?;
    let pending = engine.pending(units, &mut ctx)?;
    if pending.is_empty() {
        println!("All upgrades have been applied.");
        return Ok(());
    }

    println!("Following upgrade(s) will be applied:");
    for line in render::format_pending_lines(&pending) {
        println!("{line}");
    }

    println!("Running pre-upgrade checks...");
    if let Err(error) = engine.pre_upgrade_checks(&pending, &mut ctx) {
        return Err(run_failure(error, log_path));
    }

    let estimate = human_estimate(&pending);
    if !yes && !confirm_upgrade(&estimate)? {
        bail!("upgrade aborted by operator");
    }

    if let Err(error) = engine.apply_all(&pending, &mut ctx) {
        return Err(run_failure(error, log_path));
    }

    println!("Running post-upgrade checks...");
    if let Err(error) = engine.post_upgrade_checks(&pending, &mut ctx) {
        return Err(run_failure(error, log_path));
    }

    if ctx.has_warnings() {
        println!(
            "{}",
            render::warning_line(&format!(
                "Upgrade completed with {} warning(s) - please check the log file \
                 for further information:\nless {}",
                ctx.warning_count(),
                log_path.display()
            ))
        );
    } else {
        println!("{}", render::success_line("Upgrade completed successfully."));
    }
    Ok(())
}

fn run_failure(error: EngineError, log_path: &Path) -> anyhow::Error {
    tracing::error!("{error}");
    println!(
        "Please check the log file for further information:\nless {}",
        log_path.display()
    );
    anyhow::Error::new(error).context("upgrade run failed")
}

fn confirm_upgrade(estimate: &str) -> Result<bool> {
    println!(
        "{}",
        render::warning_line(&format!(
            "WARNING: You are about to upgrade your installation \
             (estimated time: {estimate})!"
        ))
    );
    print!("Continue? [y/N] ");
    io::stdout().flush().context("failed to flush stdout")?;

    let mut answer = String::new();
    io::stdin()
        .read_line(&mut answer)
        .context("failed to read confirmation")?;
    Ok(is_affirmative(&answer))
}

pub(crate) fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn cmd_show_pending(
    layout: &StateLayout,
    config: &CliConfig,
    packages: &[Box<dyn UpgradePackage>],
    json: bool,
) -> Result<()> {
    let ledger = FileLedger::new(layout.ledger_path());
    let engine = build_engine(&ledger, config);
    let mut ctx = RunContext::new();

    let units = discover(packages)?;
    let pending = engine.pending(units, &mut ctx)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&render::pending_json(&pending))?);
        return Ok(());
    }

    if pending.is_empty() {
        println!("All upgrades have been applied.");
        return Ok(());
    }

    println!("Following upgrade(s) are ready to be applied:");
    for line in render::format_pending_lines(&pending) {
        println!("{line}");
    }
    Ok(())
}

fn cmd_show_applied(layout: &StateLayout, json: bool) -> Result<()> {
    let ledger = FileLedger::new(layout.ledger_path());
    let engine = Engine::new(&ledger);
    let entries = engine.history()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&render::applied_json(&entries))?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No upgrades have been applied.");
        return Ok(());
    }

    println!("Following upgrade(s) have been applied:");
    for line in render::format_applied_lines(&entries) {
        println!("{line}");
    }
    Ok(())
}

fn cmd_create_recipe(
    layout: &StateLayout,
    packages: &[Box<dyn UpgradePackage>],
    path: &Path,
    options: RecipeOptions,
) -> Result<()> {
    let ledger = FileLedger::new(layout.ledger_path());
    let today = Utc::now().date_naive();

    let recipe_path = if options.release {
        let units = discover(packages)?;
        create_release_recipe(&units, path, &options, &ledger, today)?
    } else {
        create_recipe(path, &options, &ledger, today)?
    };

    println!("Created new upgrade recipe {}", recipe_path.display());
    Ok(())
}
