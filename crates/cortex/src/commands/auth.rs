//! Account and session commands.
//!
//! Login and registration store the returned token as the local credential
//! marker; logout clears it. Status only reports marker presence - the client
//! never validates the token against the server.

use std::os::unix::fs::PermissionsExt;

use anyhow::Result;
use colored::Colorize;
use cortex_core::types::NewUser;
use cortex_core::{Config, CredentialStore, FileCredentialStore};
use dialoguer::{Input, Password};

use crate::cli::{AuthAction, AuthCommand};
use crate::commands::{connect, spinner};

pub async fn execute(cmd: AuthCommand, config: &Config) -> Result<()> {
    match cmd.action {
        AuthAction::Register { username, email } => register(username, email, config).await,
        AuthAction::Login { email } => login(email, config).await,
        AuthAction::Logout => logout(config).await,
        AuthAction::Status => status(config).await,
    }
}

/// Register a new account and establish a session from the response.
async fn register(
    username: Option<String>,
    email: Option<String>,
    config: &Config,
) -> Result<()> {
    let (gate, client) = connect(config)?;

    if gate.is_authenticated() {
        println!("{} Already logged in.", "✗".red());
        println!("  Run {} first.", "cortex auth logout".cyan());
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

    let pb = spinner("Registering...");
    let result = client
        .register(&NewUser {
            username,
            email,
            password,
        })
        .await;
    pb.finish_and_clear();

    match result {
        Ok(credential) => {
            gate.establish(&credential.token)?;
            println!("{} Registered and logged in.", "✓".green());
        }
        Err(e) => println!("{} Registration failed: {}", "✗".red(), e),
    }

    Ok(())
}

/// Login and establish a session from the response.
async fn login(email: Option<String>, config: &Config) -> Result<()> {
    let (gate, client) = connect(config)?;

    if gate.is_authenticated() {
        println!("{} Already logged in.", "✗".red());
        println!("  Run {} first.", "cortex auth logout".cyan());
        return Ok(());
    }

    let email: String = match email {
        Some(e) => e,
        None => Input::new().with_prompt("Email").interact_text()?,
    };
    let password = Password::new().with_prompt("Password").interact()?;

    let pb = spinner("Logging in...");
    let result = client.login(&email, &password).await;
    pb.finish_and_clear();

    match result {
        Ok(credential) => {
            gate.establish(&credential.token)?;
            println!("{} Login successful.", "✓".green());
        }
        Err(e) => {
            println!("{} Login failed: {}", "✗".red(), e);
            println!("  Check your credentials and try again.");
        }
    }

    Ok(())
}

/// Clear the credential marker.
async fn logout(config: &Config) -> Result<()> {
    let (gate, _client) = connect(config)?;

    if !gate.is_authenticated() {
        println!("{} Not logged in.", "✗".red());
        return Ok(());
    }

    gate.logout()?;
    println!("{} Logged out.", "✓".green());

    Ok(())
}

/// Show session status: marker presence, token file location, permissions.
async fn status(config: &Config) -> Result<()> {
    let store = FileCredentialStore::new(config.token_path());

    println!("{}", "Session Status".bold());
    println!("{}", "─".repeat(40));
    println!("Backend:   {}", config.api.url);

    match store.get() {
        Some(token) => {
            let prefix = &token[..12.min(token.len())];
            println!("Token:     {} ({}...)", "Present".green(), prefix.yellow());

            let metadata = std::fs::metadata(store.path())?;
            let mode = metadata.permissions().mode() & 0o777;
            if mode == 0o600 {
                println!("Perms:     {} (0600)", "Secure".green());
            } else {
                println!("Perms:     {} ({:o})", "Insecure".yellow(), mode);
            }
        }
        None => {
            println!("Token:     {}", "Not logged in".red());
        }
    }

    Ok(())
}
