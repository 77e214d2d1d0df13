use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use floorplan::{
    CorrectionCfg, PlanBuilder, PlanCfg, ReconstructionSession, ReplayTracker, SessionCfg,
};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::fmt::SubscriberBuilder;

mod provenance;
mod records;

use provenance::{write_sidecar, Provenance};
use records::{read_measurements, read_poses, write_json, PlanRecord};

#[derive(Parser)]
#[command(name = "floorplan")]
#[command(about = "Offline floor-plan reconstruction from recorded wall captures")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Args, Clone, Copy)]
struct Tolerances {
    /// Minimum |cos| between a wall's direction and its neighbour's normal
    #[arg(long, default_value_t = PlanCfg::default().eps_parallel)]
    eps_parallel: f64,
}

#[derive(Subcommand)]
enum Action {
    /// Build a plan straight from recorded measurements
    Build {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
        /// Close the polygon (last wall meets the first)
        #[arg(long)]
        closed: bool,
        #[command(flatten)]
        tol: Tolerances,
    },
    /// Replay a capture and run the finish pass against corrected poses
    Finish {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        poses: PathBuf,
        #[arg(long)]
        out: PathBuf,
        #[command(flatten)]
        tol: Tolerances,
        #[arg(long, default_value_t = CorrectionCfg::default().max_attempts)]
        max_attempts: u32,
        #[arg(long, default_value_t = 0)]
        retry_delay_ms: u64,
    },
    /// Print a small provenance JSON block
    Report,
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Build {
            input,
            out,
            closed,
            tol,
        } => build(&input, &out, closed, PlanCfg { eps_parallel: tol.eps_parallel }),
        Action::Finish {
            input,
            poses,
            out,
            tol,
            max_attempts,
            retry_delay_ms,
        } => {
            let cfg = SessionCfg {
                plan: PlanCfg {
                    eps_parallel: tol.eps_parallel,
                },
                correction: CorrectionCfg {
                    max_attempts,
                    retry_delay: Duration::from_millis(retry_delay_ms),
                },
            };
            finish(&input, &poses, &out, cfg)
        }
        Action::Report => report(),
    }
}

fn build(input: &Path, out: &Path, closed: bool, cfg: PlanCfg) -> Result<()> {
    let measurements = read_measurements(input)?;
    tracing::info!(input = %input.display(), walls = measurements.len(), closed, "build");
    let plan = PlanBuilder::new(cfg).build(&measurements, closed);
    if !plan.degenerate_corners().is_empty() {
        tracing::warn!(corners = ?plan.degenerate_corners(), "plan has degenerate corners");
    }
    write_json(out, &PlanRecord::from_plan(&plan))?;
    let prov = Provenance::new(
        "build",
        json!({ "closed": closed, "eps_parallel": cfg.eps_parallel }),
    )
    .with_input(input);
    write_sidecar(out, &prov)?;
    tracing::info!(out = %out.display(), corners = plan.len(), "plan written");
    Ok(())
}

fn finish(input: &Path, poses: &Path, out: &Path, cfg: SessionCfg) -> Result<()> {
    let measurements = read_measurements(input)?;
    let mut tracker = ReplayTracker::default();
    for record in read_poses(poses)? {
        tracker.insert(record.timestamp, record.to_stamped()?);
    }
    tracing::info!(
        input = %input.display(),
        poses = %poses.display(),
        walls = measurements.len(),
        "finish"
    );

    let session = ReconstructionSession::new(cfg);
    for m in measurements {
        session.add_measurement(m)?;
    }
    let report = session.finish(&tracker)?;
    write_json(out, &PlanRecord::from_report(&report))?;
    let prov = Provenance::new(
        "finish",
        json!({
            "eps_parallel": cfg.plan.eps_parallel,
            "max_attempts": cfg.correction.max_attempts,
            "retry_delay_ms": cfg.correction.retry_delay.as_millis() as u64,
            "stale": report.stale_count(),
        }),
    )
    .with_input(input)
    .with_input(poses);
    write_sidecar(out, &prov)?;
    tracing::info!(
        out = %out.display(),
        refreshed = report.refreshed,
        stale = report.stale_count(),
        "plan written"
    );
    Ok(())
}

fn report() -> Result<()> {
    let doc = Provenance::new("report", json!({})).document();
    println!("{}", serde_json::to_string_pretty(&doc)?);
    Ok(())
}
