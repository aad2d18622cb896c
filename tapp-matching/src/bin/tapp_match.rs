use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;

use tapp_matching::sort::sort_for_position;
use tapp_matching::status::{get_hours_assigned, get_match_status};
use tapp_matching::summary::fill_stats;
use shared_types::FinalizeResponse;
use tapp_matching::{InMemoryStore, MatchingConfig, MatchingSnapshot, MatchingState};

#[derive(Parser, Debug)]
#[command(name = "tapp-match", about = "Inspect and stage TA matches from a matching snapshot")]
struct Cli {
    /// Matching snapshot (JSON); defaults to `data.snapshot_path` from config
    #[arg(long, value_name = "PATH", global = true)]
    snapshot: Option<PathBuf>,

    /// Also write logs to this file
    #[arg(long, value_name = "PATH", global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fill status of every position
    Summary {
        /// List each position's applicants with their status
        #[arg(long)]
        detail: bool,
    },
    /// Print one applicant's summary as JSON
    Applicant {
        #[arg(long)]
        applicant: i64,
    },
    /// Match status of an applicant for a position
    Status {
        #[arg(long)]
        applicant: i64,
        #[arg(long)]
        position: i64,
    },
    /// Stage or unstage an assignment
    ToggleAssigned {
        #[arg(long)]
        applicant: i64,
        #[arg(long)]
        position: i64,
        /// Hours to stage; defaults to config, then the position's hours per assignment
        #[arg(long)]
        hours: Option<f64>,
    },
    ToggleStarred {
        #[arg(long)]
        applicant: i64,
        #[arg(long)]
        position: i64,
    },
    ToggleHidden {
        #[arg(long)]
        applicant: i64,
        #[arg(long)]
        position: i64,
    },
    /// Hide or unhide an applicant for every position
    ToggleApplicantHidden {
        #[arg(long)]
        applicant: i64,
    },
    /// Turn staged assignments into assignments
    Finalize {
        /// Only list what would be created
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let (config, config_path) =
        MatchingConfig::load().context("Failed to load matching config")?;
    let log_file = cli.log_file.clone().or_else(|| config.log_file());
    let _guard = init_tracing(config.log_level().unwrap_or("info"), log_file.as_deref());
    tracing::debug!("Loaded config from {:?}", config_path);

    let snapshot_path = cli
        .snapshot
        .clone()
        .or_else(|| config.snapshot_path())
        .ok_or_else(|| {
            anyhow::anyhow!(
                "No snapshot given. Pass --snapshot or set data.snapshot_path in {:?}",
                config_path
            )
        })?;

    let store = InMemoryStore::new(MatchingSnapshot::load(&snapshot_path)?);
    let mut state = MatchingState::new();
    let failed = state.refresh(&store).await;
    if !failed.is_empty() {
        tracing::warn!("Working from partial data; failed to load {:?}", failed);
    }

    let mutated = match cli.command {
        Command::Summary { detail } => {
            print_summary(&mut state, detail);
            false
        }
        Command::Applicant { applicant } => {
            let summary = state.applicant_summary(applicant)?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
            false
        }
        Command::Status {
            applicant,
            position,
        } => {
            let position = state.position(position)?.clone();
            let summary = state.applicant_summary(applicant)?;
            println!(
                "{} {}: {} ({} hours)",
                summary.applicant.utorid,
                position.position_code,
                get_match_status(&summary, &position),
                get_hours_assigned(&summary, &position)
            );
            false
        }
        Command::ToggleAssigned {
            applicant,
            position,
            hours,
        } => {
            let hours = hours.or_else(|| config.default_hours());
            let staged = state
                .toggle_assigned(&store, applicant, position, hours)
                .await?;
            println!(
                "Applicant {} position {}: assigned={} hours={}",
                staged.applicant_id, staged.position_id, staged.assigned, staged.hours_assigned
            );
            true
        }
        Command::ToggleStarred {
            applicant,
            position,
        } => {
            let staged = state.toggle_starred(&store, applicant, position).await?;
            println!(
                "Applicant {} position {}: starred={}",
                staged.applicant_id, staged.position_id, staged.starred
            );
            true
        }
        Command::ToggleHidden {
            applicant,
            position,
        } => {
            let staged = state.toggle_hidden(&store, applicant, position).await?;
            println!(
                "Applicant {} position {}: hidden={}",
                staged.applicant_id, staged.position_id, staged.hidden
            );
            true
        }
        Command::ToggleApplicantHidden { applicant } => {
            let datum = state.toggle_applicant_hidden(&store, applicant).await?;
            println!("Applicant {}: hidden={}", datum.applicant_id, datum.hidden);
            true
        }
        Command::Finalize { dry_run } => {
            if dry_run {
                let requests = state.planned_assignments()?;
                println!("{}", serde_json::to_string_pretty(&requests)?);
                false
            } else {
                let created = state.finalize(&store).await?;
                tracing::info!("Created {} assignments", created.len());
                let mutated = !created.is_empty();
                println!(
                    "{}",
                    serde_json::to_string_pretty(&FinalizeResponse { created })?
                );
                mutated
            }
        }
    };

    if mutated {
        store.snapshot().await.save(&snapshot_path)?;
        tracing::info!("Saved snapshot to {:?}", snapshot_path);
    }

    Ok(())
}

fn print_summary(state: &mut MatchingState, detail: bool) {
    let summaries = state.position_summaries();
    for summary in summaries.values() {
        let stats = fill_stats(summary);
        println!(
            "{:<12} {:>8.2}/{:<8.2} {:<8} assigned={} staged={} starred={} applied={}",
            summary.position.position_code,
            summary.hours_assigned,
            summary.position.target_hours(),
            summary.filled_status,
            stats.assigned,
            stats.staged_assigned,
            stats.starred,
            stats.applied,
        );

        if detail {
            let mut applicants = summary.applicant_summaries.clone();
            sort_for_position(&mut applicants, &summary.position);
            for applicant in &applicants {
                println!(
                    "    {:<10} {:<24} {:<16} {:>6.2}",
                    applicant.applicant.utorid,
                    applicant.applicant.full_name(),
                    get_match_status(applicant, &summary.position),
                    get_hours_assigned(applicant, &summary.position),
                );
            }
        }
    }
}

fn init_tracing(level: &str, log_file: Option<&Path>) -> Option<WorkerGuard> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let Some(log_path) = log_file else {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .try_init();
        return None;
    };

    let file_appender = tracing_appender::rolling::never(
        log_path.parent().unwrap_or(Path::new(".")),
        log_path
            .file_name()
            .unwrap_or(std::ffi::OsStr::new("tapp-match.log")),
    );
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(true)
                .with_writer(std::io::stderr),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking),
        )
        .try_init();

    Some(guard)
}
