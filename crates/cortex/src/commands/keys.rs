//! Third-party API key commands.
//!
//! The bundle is fetched and overwritten wholesale. Keys are entered through
//! hidden prompts and only ever displayed masked.

use anyhow::Result;
use colored::Colorize;
use cortex_core::types::{API_KEY_PROVIDERS, ApiKeyBundle, mask};
use cortex_core::{Config, Error};
use dialoguer::Password;

use crate::cli::{KeysAction, KeysCommand};
use crate::commands::{connect, ensure_login, spinner};

pub async fn execute(cmd: KeysCommand, config: &Config) -> Result<()> {
    match cmd.action {
        KeysAction::Show => show(config).await,
        KeysAction::Set => set(config).await,
    }
}

async fn show(config: &Config) -> Result<()> {
    let (gate, client) = connect(config)?;
    if !ensure_login(&gate) {
        return Ok(());
    }

    let pb = spinner("Fetching API keys...");
    let result = client.get_api_keys().await;
    pb.finish_and_clear();

    let keys = result?;

    println!("{}", "API Keys".bold());
    println!("{}", "─".repeat(40));
    for (provider, masked) in keys.masked() {
        println!("{provider:<14} {masked}");
    }

    Ok(())
}

async fn set(config: &Config) -> Result<()> {
    let (gate, client) = connect(config)?;
    if !ensure_login(&gate) {
        return Ok(());
    }

    let pb = spinner("Fetching API keys...");
    let result = client.get_api_keys().await;
    pb.finish_and_clear();

    // A user without stored keys starts from an empty bundle
    let mut bundle = match result {
        Ok(keys) => keys,
        Err(Error::Api { status: 404, .. }) => ApiKeyBundle::default(),
        Err(e) => return Err(e.into()),
    };

    println!("Enter new keys. Leave a prompt empty to keep the current value.");
    for &provider in API_KEY_PROVIDERS {
        let current = bundle.get(provider).unwrap_or_default();
        let entered = Password::new()
            .with_prompt(format!("{provider} ({})", mask(current)))
            .allow_empty_password(true)
            .interact()?;

        if !entered.is_empty() {
            bundle.set(provider, entered);
        }
    }

    let pb = spinner("Saving API keys...");
    let result = client.update_api_keys(&bundle).await;
    pb.finish_and_clear();

    result?;
    println!("{} API keys saved.", "✓".green());

    Ok(())
}
