//! # proxy-probe - LLM Proxy Smoke-Test Harness
//!
//! A command-line smoke-test harness for proxy deployments that front a
//! chat-completions API with an OpenAI-compatible interface. The harness
//! issues a fixed sequence of HTTP probes against a running deployment,
//! prints human-readable pass/fail results, and exits 0 only when no
//! probe failed.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use proxy_probe::{config::Config, probes::ProbeRunner};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = Config::for_test();
//!     let runner = ProbeRunner::new(&config);
//!     let report = runner.run_all().await;
//!     std::process::exit(if report.success() { 0 } else { 1 });
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`config`] - Configuration management with CLI and environment support
//! - [`client`] - OpenAI-compatible chat client (non-streaming and SSE streaming)
//! - [`probes`] - The probe runner: ten probes plus the sequential driver
//! - [`report`] - Styled terminal output for probe results
//! - [`schemas`] - Request/response data structures
//! - [`error`] - Probe error types and conversions

// Core infrastructure
pub mod core;
pub mod client;
pub mod config;
pub mod error;
pub mod schemas;

// Probe harness
pub mod probes;
pub mod report;

pub use client::ChatClient;
pub use config::Config;
pub use error::ProbeError;
pub use probes::{ProbeOutcome, ProbeReport, ProbeRunner};
