use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use serde::Serialize;
use synthetics_provider::{
    config,
    diagnostics::{Diagnostic, has_errors},
    provider::Provider,
    resource::{MonitorRecord, PlanAction, ResourceError, SyntheticsMonitorResource},
    state::StateFile,
    synthetics::SyntheticsApi,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, level_filters::LevelFilter, trace, warn};
use tracing_subscriber::{filter, layer::SubscriberExt, util::SubscriberInitExt};

type Monitors = SyntheticsMonitorResource<dyn SyntheticsApi>;

#[derive(Debug, Clone, Parser)]
#[command(version, about = "Manage a Synthetics monitor from a declarative record")]
struct Args {
    /// Provider config file (JSON or TOML); the environment fills the gaps
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Print the resource schemas as JSON
    Schema,

    /// Check a monitor record without contacting the service
    Validate {
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Show what `apply` would do
    Plan {
        #[arg(short, long)]
        file: PathBuf,
        #[arg(short, long)]
        state: Option<PathBuf>,
    },

    /// Create, update or replace the monitor so it matches the record
    Apply {
        #[arg(short, long)]
        file: PathBuf,
        #[arg(short, long)]
        state: Option<PathBuf>,
    },

    /// Re-read the monitor and update the state
    Refresh {
        #[arg(short, long)]
        state: Option<PathBuf>,
    },

    /// Delete the monitor and clear the state
    Destroy {
        #[arg(short, long)]
        state: Option<PathBuf>,
    },

    /// Adopt an existing monitor into the state
    Import {
        id: String,
        #[arg(short, long)]
        state: Option<PathBuf>,
    },
}

fn init(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let filter = filter::Targets::new().with_targets(vec![
        ("synthetics_provider", level),
        ("synthetics_monitor", level),
    ]);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .compact()
                .with_ansi(false),
        )
        .with(filter)
        .init();
}

fn default_state_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("synthetics-provider").join("state.json"))
        .unwrap_or_else(|| PathBuf::from("synthetics-state.json"))
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn report(diagnostics: &[Diagnostic]) {
    for diagnostic in diagnostics {
        eprintln!("{diagnostic}");
    }
}

/// Read and decode a monitor record; diagnostics go to stderr
fn load_record(path: &Path) -> anyhow::Result<MonitorRecord> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("{} is not valid JSON", path.display()))?;

    let record = MonitorRecord::from_config(value).map_err(|diagnostics| {
        report(&diagnostics);
        anyhow::anyhow!("invalid monitor record in {}", path.display())
    })?;

    let diagnostics = record.validate();
    report(&diagnostics);
    if has_errors(&diagnostics) {
        bail!("invalid monitor record in {}", path.display());
    }

    Ok(record)
}

fn provider(args: &Args) -> anyhow::Result<Provider> {
    let config = config::load(args.config.as_deref())?;
    Ok(Provider::from_config(&config)?)
}

/// Current state of the tracked monitor, refreshed from the service
async fn refreshed(
    monitors: &Monitors,
    state: &StateFile,
    cancel: &CancellationToken,
) -> Result<Option<MonitorRecord>, ResourceError> {
    match state.monitor.as_ref().and_then(|m| m.id.as_deref()) {
        Some(id) => monitors.read(id, cancel).await,
        None => Ok(None),
    }
}

async fn apply(
    monitors: &Monitors,
    desired: &MonitorRecord,
    prior: Option<MonitorRecord>,
    cancel: &CancellationToken,
) -> Result<MonitorRecord, ResourceError> {
    let action = Monitors::plan(prior.as_ref(), desired);
    debug!("plan: {action:?}");

    match (action, prior) {
        (PlanAction::NoOp, Some(prior)) => {
            info!("monitor is up to date");
            Ok(prior)
        }
        (PlanAction::Update { attributes }, Some(prior)) => {
            info!("updating {}", attributes.join(", "));
            // unset options keep the values the service already has
            let record = MonitorRecord {
                id: prior.id,
                uri: desired.uri.clone().or(prior.uri),
                validation_string: desired
                    .validation_string
                    .clone()
                    .or(prior.validation_string),
                verify_ssl: desired.verify_ssl.or(prior.verify_ssl),
                bypass_head_request: desired.bypass_head_request.or(prior.bypass_head_request),
                treat_redirect_as_failure: desired
                    .treat_redirect_as_failure
                    .or(prior.treat_redirect_as_failure),
                ..desired.clone()
            };
            monitors.update(&record, cancel).await
        }
        (PlanAction::Replace { attributes }, Some(prior)) => {
            info!("{} changed, replacing monitor", attributes.join(", "));
            if let Some(id) = prior.id.as_deref() {
                monitors.delete(id, cancel).await?;
            }
            monitors.create(desired, cancel).await
        }
        _ => monitors.create(desired, cancel).await,
    }
}

async fn run(args: Args, cancel: CancellationToken) -> anyhow::Result<()> {
    match &args.command {
        Command::Schema => print_json(&Provider::schemas()),

        Command::Validate { file } => {
            let record = load_record(file)?;
            info!("{} is valid", file.display());
            print_json(&record)
        }

        Command::Plan { file, state } => {
            let desired = load_record(file)?;
            let state = StateFile::load(&state.clone().unwrap_or_else(default_state_path))?;
            let monitors = provider(&args)?.monitors();

            let prior = refreshed(&monitors, &state, &cancel).await?;
            match Monitors::plan(prior.as_ref(), &desired) {
                PlanAction::Create => println!("monitor will be created"),
                PlanAction::NoOp => println!("no changes"),
                PlanAction::Update { attributes } => {
                    println!("monitor will be updated in place: {}", attributes.join(", "))
                }
                PlanAction::Replace { attributes } => {
                    println!("monitor must be replaced: {}", attributes.join(", "))
                }
            }
            Ok(())
        }

        Command::Apply { file, state } => {
            let desired = load_record(file)?;
            let state_path = state.clone().unwrap_or_else(default_state_path);
            let mut state = StateFile::load(&state_path)?;
            let monitors = provider(&args)?.monitors();

            let prior = refreshed(&monitors, &state, &cancel).await?;
            let current = match apply(&monitors, &desired, prior, &cancel).await {
                Ok(current) => current,
                Err(e) => {
                    if let Some(id) = e.created_id() {
                        warn!("monitor {id} was created but not read back, tracking it anyway");
                        state.monitor = Some(MonitorRecord {
                            id: Some(id.to_string()),
                            ..desired
                        });
                        state.save(&state_path)?;
                    }
                    return Err(e.into());
                }
            };

            state.monitor = Some(current.clone());
            state.save(&state_path)?;
            print_json(&current)
        }

        Command::Refresh { state } => {
            let state_path = state.clone().unwrap_or_else(default_state_path);
            let mut state = StateFile::load(&state_path)?;
            let monitors = provider(&args)?.monitors();

            let current = refreshed(&monitors, &state, &cancel).await?;
            if current.is_none() && state.monitor.is_some() {
                warn!("monitor no longer exists, removing it from state");
            }
            state.monitor = current;
            state.save(&state_path)?;
            print_json(&state.monitor)
        }

        Command::Destroy { state } => {
            let state_path = state.clone().unwrap_or_else(default_state_path);
            let mut state = StateFile::load(&state_path)?;

            let Some(id) = state.monitor.as_ref().and_then(|m| m.id.clone()) else {
                info!("nothing to destroy");
                return Ok(());
            };

            let monitors = provider(&args)?.monitors();
            monitors.delete(&id, &cancel).await?;

            state.monitor = None;
            state.save(&state_path)?;
            info!("destroyed monitor {id}");
            Ok(())
        }

        Command::Import { id, state } => {
            let state_path = state.clone().unwrap_or_else(default_state_path);
            let mut state = StateFile::load(&state_path)?;
            if let Some(existing) = state.monitor.as_ref().and_then(|m| m.id.as_deref()) {
                bail!("state already tracks monitor {existing}");
            }

            let monitors = provider(&args)?.monitors();
            let Some(current) = monitors.import(id, &cancel).await? else {
                bail!("monitor {id} does not exist");
            };

            state.monitor = Some(current.clone());
            state.save(&state_path)?;
            print_json(&current)
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init(args.verbose);
    trace!("started with args: {args:?}");

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted, cancelling");
            on_signal.cancel();
        }
    });

    match run(args, cancel).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<ResourceError>() {
                Some(err) => report(&err.to_diagnostics()),
                None => eprintln!("error: {e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}
