//! Stored preference commands.
//!
//! Preferences are fetched, edited locally and pushed back wholesale - there
//! are no partial updates.

use std::collections::BTreeSet;

use anyhow::Result;
use colored::Colorize;
use cortex_core::types::Preferences;
use cortex_core::{Config, Error};
use dialoguer::Input;

use crate::cli::{PrefsAction, PrefsCommand};
use crate::commands::{connect, ensure_login, spinner};

pub async fn execute(cmd: PrefsCommand, config: &Config) -> Result<()> {
    match cmd.action {
        PrefsAction::Show { json } => show(json, config).await,
        PrefsAction::Edit => edit(config).await,
    }
}

async fn show(as_json: bool, config: &Config) -> Result<()> {
    let (gate, client) = connect(config)?;
    if !ensure_login(&gate) {
        return Ok(());
    }

    let pb = spinner("Fetching preferences...");
    let result = client.get_preferences().await;
    pb.finish_and_clear();

    let prefs = result?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&prefs)?);
        return Ok(());
    }

    println!("{}", "Preferences".bold());
    println!("{}", "─".repeat(40));
    println!("Personality: {}", or_dash(&prefs.personality));
    println!("Tasks:       {}", join_or_dash(&prefs.tasks));
    println!("Use cases:   {}", join_or_dash(&prefs.use_cases));

    Ok(())
}

async fn edit(config: &Config) -> Result<()> {
    let (gate, client) = connect(config)?;
    if !ensure_login(&gate) {
        return Ok(());
    }

    let pb = spinner("Fetching preferences...");
    let result = client.get_preferences().await;
    pb.finish_and_clear();

    // A user without stored preferences starts from an empty record
    let current = match result {
        Ok(prefs) => prefs,
        Err(Error::Api { status: 404, .. }) => Preferences::default(),
        Err(e) => return Err(e.into()),
    };

    let personality: String = Input::new()
        .with_prompt("Personality")
        .default(current.personality.clone())
        .interact_text()?;
    let tasks = prompt_tag_list("Tasks (comma-separated)", &current.tasks)?;
    let use_cases = prompt_tag_list("Use cases (comma-separated)", &current.use_cases)?;

    let prefs = Preferences {
        personality,
        tasks,
        use_cases,
    };

    let pb = spinner("Saving preferences...");
    let result = client.set_preferences(&prefs).await;
    pb.finish_and_clear();

    result?;
    println!("{} Preferences saved.", "✓".green());

    Ok(())
}

fn prompt_tag_list(prompt: &str, current: &BTreeSet<String>) -> Result<BTreeSet<String>> {
    let joined = current.iter().cloned().collect::<Vec<_>>().join(", ");
    let input: String = Input::new()
        .with_prompt(prompt)
        .default(joined)
        .interact_text()?;

    Ok(input
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect())
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() { "-" } else { value }
}

fn join_or_dash(set: &BTreeSet<String>) -> String {
    if set.is_empty() {
        "-".to_string()
    } else {
        set.iter().cloned().collect::<Vec<_>>().join(", ")
    }
}
