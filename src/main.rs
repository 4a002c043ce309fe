//! elb-probe: authenticate with AK/SK, then list classic load balancer
//! listeners and load balancers, logging every HTTP exchange.

use std::process::ExitCode;

use clap::Parser;

use elb_probe::config::{load_config, Cli, ObservabilityConfig};
use elb_probe::lifecycle;
use elb_probe::observability;

/// Exit code after Ctrl+C, as shells report SIGINT.
const EXIT_INTERRUPTED: u8 = 130;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let loaded = load_config(&cli);

    // Logging comes up even when the configuration is unusable, so the
    // reason can be reported.
    let observability_config = loaded
        .as_ref()
        .map(|config| config.observability.clone())
        .unwrap_or_else(|_| ObservabilityConfig::default());
    if let Err(e) = observability::init_logging(&observability_config) {
        eprintln!("failed to initialize logging: {}", e);
    }

    tracing::info!("elb-probe v{} starting", env!("CARGO_PKG_VERSION"));

    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            let e = elb_probe::ProbeError::from(e);
            tracing::error!(error = %e, "Invalid configuration");
            return ExitCode::from(e.exit_code());
        }
    };

    tokio::select! {
        result = lifecycle::run(&config) => match result {
            Ok(report) => {
                tracing::info!(
                    listeners = report.listeners.len(),
                    load_balancers = report.load_balancers.len(),
                    "Probe complete"
                );
                ExitCode::SUCCESS
            }
            Err(e) => {
                tracing::error!(error = %e, "Probe failed");
                ExitCode::from(e.exit_code())
            }
        },
        _ = lifecycle::signals::interrupted() => {
            tracing::warn!("Probe interrupted");
            ExitCode::from(EXIT_INTERRUPTED)
        }
    }
}
