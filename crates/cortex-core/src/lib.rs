//! cortex-core - Core library for the Cortex client
//!
//! This crate provides the request/response contract layer shared by Cortex
//! client frontends:
//!
//! - **client**: API client for the Cortex backend (transport helper plus one
//!   wrapper per backend operation)
//! - **config**: layered configuration (environment, config file, defaults)
//! - **session**: credential storage and the session gate
//! - **types**: domain data model (assistant configuration, profiles,
//!   preferences, API keys)

pub mod client;
pub mod config;
pub mod error;
pub mod session;
pub mod types;

// Re-export commonly used types
pub use client::ApiClient;
pub use config::Config;
pub use error::{Error, Result};
pub use session::{CredentialStore, FileCredentialStore, MemoryCredentialStore, SessionGate};
