//! Host Metrics Agent
//!
//! Serves kernel statistics on an HTTP metrics endpoint and samples them
//! at the interval set in the config file until interrupted.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::{mpsc, Arc};
use std::time::Duration;

use clap::Parser;
use host_metrics_agent::{
    config::{Reconfigurator, DEFAULT_CONFIG_PATH},
    metrics::{MetricsRegistry, MetricsServer, MetricsServerConfig, DEFAULT_PORT},
    procfs::{ProcFs, DEFAULT_PROC_ROOT},
    sampling::{Sampler, DEFAULT_DISK_DEVICE},
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Command-line options.
#[derive(Debug, Parser)]
#[command(name = "host-metrics-agent", version, about)]
struct Args {
    /// JSON config file, re-read every sampling cycle
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Port for the metrics endpoint
    #[arg(long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Address for the metrics endpoint
    #[arg(long, default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    bind: IpAddr,

    /// Mount point of the proc filesystem
    #[arg(long, default_value = DEFAULT_PROC_ROOT)]
    proc_root: PathBuf,

    /// Block device used for the disk metrics
    #[arg(long, default_value = DEFAULT_DISK_DEVICE)]
    disk_device: String,
}

fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    info!("Host metrics agent v{}", host_metrics_agent::VERSION);

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to start async runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let hub = Arc::new(MetricsRegistry::new());
    let server = MetricsServer::new(
        MetricsServerConfig {
            bind_addr: SocketAddr::new(args.bind, args.port),
        },
        Arc::clone(&hub),
    );

    // The endpoint must be up before sampling starts
    let listener = match runtime.block_on(server.bind()) {
        Ok(listener) => listener,
        Err(e) => {
            eprintln!("Failed to start metrics server: {}", e);
            return ExitCode::FAILURE;
        }
    };
    runtime.spawn(async move {
        if let Err(e) = server.serve(listener).await {
            error!(error = %e, "Metrics server stopped");
        }
    });

    let (stop_tx, stop_rx) = mpsc::channel();
    let signal_tx = stop_tx.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        let _ = signal_tx.send(());
    }) {
        warn!(error = %e, "Failed to install signal handler");
    }

    let mut sampler = Sampler::new(
        ProcFs::new(args.proc_root),
        hub,
        Reconfigurator::new(args.config),
        args.disk_device,
    );
    sampler.run(&stop_rx);

    drop(stop_tx);
    runtime.shutdown_timeout(Duration::from_secs(1));
    info!("Done");
    ExitCode::SUCCESS
}
