//! Core infrastructure shared by the probe clients.

pub mod http_client;

pub use http_client::{HttpClientBuilder, HttpClientError};
