//! saimeta-replay: runs a script of SAI operations through the validation
//! layer against an in-memory switch and checks each reported status.

use anyhow::{bail, Context, Result};
use clap::Parser;
use sonic_sai_meta::replay::{Replayer, Script, ScriptFormat};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Replay SAI DASH operations through the meta validation layer
#[derive(Parser, Debug)]
#[command(name = "saimeta-replay")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Script of operations to run
    #[arg(short = 's', long)]
    script: PathBuf,

    /// Script format; inferred from the file extension when omitted
    #[arg(short = 'f', long, value_enum)]
    format: Option<ScriptFormat>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,

    /// Keep running after a step fails and report every failure
    #[arg(short = 'k', long)]
    keep_going: bool,
}

fn init_logging(args: &Args) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);
    if args.json_logs {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn run(args: &Args) -> Result<()> {
    let script = Script::load(&args.script, args.format)
        .with_context(|| format!("failed to load script {}", args.script.display()))?;
    info!(
        script = %args.script.display(),
        steps = script.steps.len(),
        "replaying script"
    );

    let mut replayer = Replayer::with_virtual_switch();
    let summary = replayer
        .run(&script, args.keep_going)
        .context("replay stopped")?;

    for failure in &summary.failures {
        error!("{}", failure);
    }
    if !summary.is_success() {
        bail!(
            "{} of {} steps failed",
            summary.failures.len(),
            summary.steps
        );
    }
    info!(
        steps = summary.steps,
        objects = replayer.meta().object_count(),
        "all steps passed"
    );
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(&args);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
