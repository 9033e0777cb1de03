//! HTTP client module
//!
//! Provides the HTTP plumbing used by the request builder.
//!
//! # Features
//!
//! - **Single attempt**: one round trip per call, failures surface immediately
//! - **Deadlines**: optional per-request timeout
//! - **Session tokens**: injectable generator for the per-request session id

mod client;
mod session;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig};
pub use session::{FixedSessionToken, RandomSessionToken, SessionTokenGenerator};

#[cfg(test)]
mod tests;
