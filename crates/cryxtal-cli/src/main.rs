use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand};
use cryxtal_viewsync::SyncConfig;
use std::path::{Path, PathBuf};
use tracing::info;

mod script;

use script::{Runner, Script};

#[derive(Parser)]
#[command(name = "cryxtal")]
#[command(about = "CryXtal Castor view binding and camera sync driver")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Replay a session script and print the final cameras.
    Run(RunArgs),
    /// Replay a session script and print the binding menu of one view.
    Menu(MenuArgs),
}

#[derive(Args)]
struct RunArgs {
    #[arg(long)]
    script: PathBuf,
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Args)]
struct MenuArgs {
    #[arg(long)]
    script: PathBuf,
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    view: String,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Run(args) => run(args),
        Command::Menu(args) => menu(args),
    }
}

fn run(args: RunArgs) -> Result<()> {
    let runner = replay(&args.script, args.config.as_deref())?;
    let report = runner.report();
    println!("{}", serde_json::to_string_pretty(&report)?);
    info!(path = %args.script.display(), views = report.len(), "run complete");
    Ok(())
}

fn menu(args: MenuArgs) -> Result<()> {
    let runner = replay(&args.script, args.config.as_deref())?;
    let sync = runner.sync();
    let view = sync
        .registry()
        .window_by_title(&args.view)
        .ok_or_else(|| anyhow!("no view titled {:?}", args.view))?;
    let menu = sync
        .binding_menu(view)
        .ok_or_else(|| anyhow!("{:?} is not a 3D view", args.view))?;
    println!("{}", serde_json::to_string_pretty(&menu)?);
    Ok(())
}

fn replay(script: &Path, config: Option<&Path>) -> Result<Runner> {
    let config = match config {
        Some(path) => SyncConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => SyncConfig::default(),
    };
    let script = Script::load(script)?;
    let mut runner = Runner::new(config);
    runner.run(&script)?;
    Ok(runner)
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
