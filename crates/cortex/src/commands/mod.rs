//! Command implementations for the cortex CLI.
//!
//! Each submodule implements the logic for a command group.

pub mod assistant;
pub mod auth;
pub mod keys;
pub mod model;
pub mod prefs;
pub mod user;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use colored::Colorize;
use cortex_core::{ApiClient, Config, CredentialStore, FileCredentialStore, SessionGate};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

/// Build the credential store, session gate and API client for a command.
pub(crate) fn connect(config: &Config) -> Result<(SessionGate, ApiClient)> {
    debug!("Using backend at {}", config.api.url);

    let store: Arc<dyn CredentialStore> =
        Arc::new(FileCredentialStore::new(config.token_path()));
    let gate = SessionGate::new(store.clone());
    let client = ApiClient::new(config, store)?;

    Ok((gate, client))
}

/// Gate check for protected commands. Prints the login hint and returns
/// false when no credential marker is present.
pub(crate) fn ensure_login(gate: &SessionGate) -> bool {
    if gate.is_authenticated() {
        true
    } else {
        println!("{} Not logged in.", "✗".red());
        println!("  Run {} first.", "cortex auth login".cyan());
        false
    }
}

/// Spinner shown while a request is in flight.
pub(crate) fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner());
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
