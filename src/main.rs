use std::io::{self, BufWriter, Write};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use tsmap::workload::{self, WorkloadConfig};

fn main() -> ExitCode {
    // Logs go to stderr; stdout carries only the table dump.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let config = match WorkloadConfig::from_args(std::env::args()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let report = match workload::run(&config) {
        Ok(report) => report,
        Err(e) => {
            error!(error = %e, "workload failed");
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let totals = report.totals();
    info!(?totals, "all workers joined");

    let mut out = BufWriter::new(io::stdout().lock());
    if let Err(e) = write!(out, "{}", report.map).and_then(|_| out.flush()) {
        error!(error = %e, "failed to write table dump");
        return ExitCode::FAILURE;
    }

    let released = report.teardown();
    info!(released, "done");
    ExitCode::SUCCESS
}
