//! # proxy-probe - Smoke-Test CLI
//!
//! Runs the full probe sequence against a deployed proxy and maps the
//! result onto the process exit code.

use proxy_probe::{config::Config, probes::ProbeRunner};
use tracing::debug;

#[tokio::main]
async fn main() {
    // Parse configuration from CLI args and .env file
    let config = Config::parse_args();

    debug!("probing deployment at {}", config.base_url());

    let runner = ProbeRunner::new(&config);
    let report = runner.run_all().await;

    std::process::exit(if report.success() { 0 } else { 1 });
}
