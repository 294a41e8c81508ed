//! User administration commands.

use anyhow::Result;
use colored::Colorize;
use cortex_core::Config;
use cortex_core::types::NewUser;
use dialoguer::{Input, Password};

use crate::cli::{UserAction, UserCommand};
use crate::commands::{connect, ensure_login, spinner};

pub async fn execute(cmd: UserCommand, config: &Config) -> Result<()> {
    match cmd.action {
        UserAction::Create { username, email } => create(username, email, config).await,
    }
}

/// Create a user record without starting a session for it.
async fn create(username: Option<String>, email: Option<String>, config: &Config) -> Result<()> {
    let (gate, client) = connect(config)?;
    if !ensure_login(&gate) {
        return Ok(());
    }

    let username: String = match username {
        Some(u) => u,
        None => Input::new().with_prompt("Username").interact_text()?,
    };
    let email: String = match email {
        Some(e) => e,
        None => Input::new().with_prompt("Email").interact_text()?,
    };
    let password = Password::new()
        .with_prompt("Password")
        .with_confirmation("Confirm password", "Passwords do not match")
        .interact()?;

    let pb = spinner("Creating user...");
    let result = client
        .create_user(&NewUser {
            username,
            email,
            password,
        })
        .await;
    pb.finish_and_clear();

    let user = result?;
    println!("{} User created.", "✓".green());
    println!("{}", serde_json::to_string_pretty(&user)?);

    Ok(())
}
