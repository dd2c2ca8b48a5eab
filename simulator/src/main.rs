use anyhow::Context;
use clap::Parser;
use drishticore::store::FlushReport;
use generator::profile::build_placements;
use gui_bridge::bridge::{gui_bind_address, GuiBridge};
use gui_bridge::model::DashboardModel;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use tokio::task::JoinHandle;
use workflow::config::{Overrides, WorkflowConfig};
use workflow::runner::Runner;

mod generator;
mod gui_bridge;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Drishti anomaly simulation driver")]
struct Args {
    /// Run the configured scenario once and emit a summary
    #[arg(long, default_value_t = false)]
    offline: bool,
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    /// Backend origin for best-effort state mirroring
    #[arg(long, env = "DRISHTI_API_URL")]
    api_url: Option<String>,
    #[arg(long)]
    seed: Option<u64>,
    /// Directory for the persisted simulation snapshot
    #[arg(long)]
    storage_dir: Option<PathBuf>,
    /// Number of anomalies the offline scenario places
    #[arg(long)]
    placements: Option<usize>,
    /// Discard sync tasks instead of sending them to the backend
    #[arg(long, default_value_t = false)]
    no_sync: bool,
    /// Keep the HTTP bridge alive for dashboard clients
    #[arg(long, default_value_t = false)]
    serve: bool,
}

async fn run_offline(runner: &Runner, workflow: &WorkflowConfig) -> anyhow::Result<()> {
    let scenario = &workflow.scenario;
    let plans = build_placements(scenario).context("building scenario placements")?;
    for plan in &plans {
        runner
            .place(plan, scenario.route.as_ref())
            .await
            .with_context(|| format!("placing {} at {:?}", plan.kind, plan.position))?;
    }
    let flush = runner.flush().await;

    let model = DashboardModel::capture(runner);
    println!(
        "Offline run -> anomalies {}, alerts {}, detections {}, readings {}, synced {}/{}",
        model.state.anomalies.len(),
        model.state.alerts.len(),
        model.state.detections.len(),
        model.state.readings.len(),
        flush.sent,
        flush.sent + flush.failed
    );

    let report = format!(
        "scenario={} anomalies={} alerts={} detections={} metrics={:?}\n",
        scenario.name.as_deref().unwrap_or("unnamed"),
        model.state.anomalies.len(),
        model.state.alerts.len(),
        model.state.detections.len(),
        model.metrics
    );
    let report_path = PathBuf::from("tools/data/offline_simulation.log");
    if let Some(parent) = report_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&report_path)
        .with_context(|| format!("opening report {}", report_path.display()))?;
    file.write_all(report.as_bytes())?;
    Ok(())
}

async fn serve(runner: Arc<Runner>) -> anyhow::Result<()> {
    let interval = runner.sync_interval();
    let flusher = runner.clone();
    let flush_loop = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            flusher.flush().await;
        }
    });

    let bridge = GuiBridge::new(runner.clone());
    println!("[GUI] HTTP bridge running on {} (Ctrl+C to stop)...", gui_bind_address());
    tokio::select! {
        _ = bridge.serve(gui_bind_address()) => {}
        result = signal::ctrl_c() => {
            result.context("awaiting Ctrl+C to exit")?;
        }
    }

    let report = shutdown(&runner, flush_loop).await;
    println!(
        "[SYNC] final flush: {} sent, {} failed",
        report.sent, report.failed
    );
    Ok(())
}

/// Stops the periodic flusher and sends whatever is still queued.
async fn shutdown(runner: &Runner, flush_loop: JoinHandle<()>) -> FlushReport {
    flush_loop.abort();
    let _ = flush_loop.await;
    runner.flush().await
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let base = if let Some(path) = &args.workflow {
        WorkflowConfig::load(path)?
    } else {
        WorkflowConfig::from_env()
    };
    let workflow = base.apply(Overrides {
        api_url: args.api_url.clone(),
        seed: args.seed,
        storage_dir: args.storage_dir.clone(),
        placements: args.placements,
    });
    let config = workflow.to_simulation_config();

    let runtime = TokioBuilder::new_multi_thread()
        .enable_all()
        .build()
        .context("creating runtime")?;
    let runner = Arc::new(Runner::from_config(&config, args.no_sync)?);

    if args.offline {
        runtime.block_on(run_offline(&runner, &workflow))?;
    }
    if args.serve {
        runtime.block_on(serve(runner))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use drishticore::catalog::AnomalyKind;
    use drishticore::{LatLng, SimulationConfig};

    #[tokio::test]
    async fn shutdown_sends_queued_tasks() {
        let config = SimulationConfig::default().without_delay();
        let runner = Arc::new(Runner::from_config(&config, true).unwrap());
        let idle = tokio::spawn(std::future::pending::<()>());

        runner.select_kind(AnomalyKind::Obstruction);
        runner
            .place_at(LatLng::new(28.6442, 77.2167), None)
            .await
            .unwrap();
        let queued = runner.store().outbox().len();
        assert!(queued > 0);

        let report = shutdown(&runner, idle).await;
        assert_eq!(report.sent, queued);
        assert_eq!(report.failed, 0);
        assert!(runner.store().outbox().is_empty());
    }
}
