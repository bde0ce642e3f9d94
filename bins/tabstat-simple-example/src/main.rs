use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tabstat_config::{Config, ConfigManager};
use tabstat_logging::{init_logging, LogConfig};
use tabstat_monitor::{LogReporter, MetricsRegistry, Reporter};
use tabstat_service::{TabletStatConfig, TabletStatMgr};
use tabstat_utils::BackgroundRunner;

mod demo;

use demo::{DemoConfig, SyntheticMetaService};

/// Tablet stats daemon demo
///
/// Seeds an in-memory catalog, serves synthetic tablet stats from a fake
/// metadata service and runs the stats daemon until Ctrl+C.
#[derive(Parser, Debug)]
#[command(name = "tabstat-simple-example", version, about)]
struct Args {
    /// Path to configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Dump default configuration and exit
    #[arg(long)]
    dump_default_config: bool,
}

fn section(root: &toml::Value, name: &str) -> toml::Value {
    root.get(name)
        .cloned()
        .unwrap_or_else(|| toml::Value::Table(Default::default()))
}

fn dump_default_config() -> anyhow::Result<String> {
    Ok(format!(
        "[tablet_stat]\n{}\n[log]\n{}\n[demo]\n{}",
        TabletStatConfig::default().render(),
        toml::to_string(&LogConfig::default())?,
        toml::to_string(&DemoConfig::default())?,
    ))
}

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => { tracing::info!("Received CTRL+C"); }
                    _ = sigterm.recv() => { tracing::info!("Received SIGTERM"); }
                }
                return;
            }
            Err(e) => tracing::warn!(error = %e, "failed to register SIGTERM handler"),
        }
    }
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("Received CTRL+C");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.dump_default_config {
        print!("{}", dump_default_config()?);
        return Ok(());
    }

    let root: toml::Value = match &args.config {
        Some(path) => std::fs::read_to_string(path)?.parse()?,
        None => toml::Value::Table(Default::default()),
    };
    let log_config: LogConfig = section(&root, "log").try_into()?;
    let demo_config: DemoConfig = section(&root, "demo").try_into()?;
    let stat_config = TabletStatConfig::from_toml(&section(&root, "tablet_stat"))?;
    stat_config.validate()?;

    let _log_guard = init_logging(&log_config)?;
    tracing::info!(config = ?args.config, "Starting tablet stats demo");
    tracing::info!(config = %stat_config.render().replace('\n', " "), "tablet stat config");

    let catalog = demo::seed_catalog(&demo_config)?;
    let stub = Arc::new(SyntheticMetaService::new(demo_config.growth_per_cycle));
    let registry = Arc::new(MetricsRegistry::new());
    let interval = stat_config.update_interval();
    let config = Arc::new(ConfigManager::new(stat_config));

    let mgr = TabletStatMgr::new(catalog.clone(), stub, config, &registry).into_arc();
    let mut runner = BackgroundRunner::new();
    mgr.start(&mut runner);

    let reporter_registry = registry.clone();
    let reporter = LogReporter::with_prefix("tablet_stat.");
    runner.spawn_periodic("metrics_reporter", interval, move || {
        let registry = reporter_registry.clone();
        let reporter = reporter.clone();
        async move {
            reporter.report(&registry.collect());
        }
    });

    catalog.set_ready(true);
    tracing::info!("Catalog ready, press Ctrl+C to stop");

    wait_for_shutdown_signal().await;
    runner.shutdown().await;

    let snapshot = mgr.table_stats_map();
    tracing::info!(tables = snapshot.len(), "Tablet stats demo shutting down");
    Ok(())
}
