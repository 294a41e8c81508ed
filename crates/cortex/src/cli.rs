//! CLI argument definitions using clap derive macros.

use clap::{Args, Parser, Subcommand};

/// Cortex client CLI
///
/// Configure, generate, fine-tune and deploy AI assistants on a Cortex
/// backend.
#[derive(Parser, Debug)]
#[command(name = "cortex")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Account registration, login and session status
    Auth(AuthCommand),

    /// Assistant profiles (build, list, deploy)
    Assistant(AssistantCommand),

    /// Model operations (fine-tune, PPO training, GNN init)
    Model(ModelCommand),

    /// Stored user preferences
    Prefs(PrefsCommand),

    /// Third-party API keys
    Keys(KeysCommand),

    /// User administration
    User(UserCommand),

    /// Show version
    Version,
}

// ─────────────────────────────────────────────────────────────────────────────
// Auth Commands
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Args, Debug)]
pub struct AuthCommand {
    #[command(subcommand)]
    pub action: AuthAction,
}

#[derive(Subcommand, Debug)]
pub enum AuthAction {
    /// Create an account and start a session
    Register {
        /// Username for the new account (prompted when omitted)
        #[arg(short, long)]
        username: Option<String>,

        /// Email address (prompted when omitted)
        #[arg(short, long)]
        email: Option<String>,
    },

    /// Login with email and password
    Login {
        /// Email address (prompted when omitted)
        #[arg(short, long)]
        email: Option<String>,
    },

    /// Clear the stored session credential
    Logout,

    /// Show session status
    Status,
}

// ─────────────────────────────────────────────────────────────────────────────
// Assistant Commands
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Args, Debug)]
pub struct AssistantCommand {
    #[command(subcommand)]
    pub action: AssistantAction,
}

#[derive(Subcommand, Debug)]
pub enum AssistantAction {
    /// Interactively configure and generate an assistant profile
    Build,

    /// List assistant profiles stored on the backend
    List {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Deploy an assistant from an existing profile
    Deploy {
        /// Profile ID to deploy
        profile_id: String,

        /// Deployment parameters as inline JSON (defaults to the standard
        /// production parameters)
        #[arg(short, long)]
        params: Option<String>,
    },
}

// ─────────────────────────────────────────────────────────────────────────────
// Model Commands
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Args, Debug)]
pub struct ModelCommand {
    #[command(subcommand)]
    pub action: ModelAction,
}

#[derive(Subcommand, Debug)]
pub enum ModelAction {
    /// Fine-tune a model
    FineTune {
        /// Model ID to fine-tune
        model_id: String,

        /// Learning rate for fine-tuning
        #[arg(short, long, default_value_t = 0.0003)]
        learning_rate: f64,

        /// Extra fine-tune parameters as inline JSON (merged over
        /// --learning-rate)
        #[arg(short, long)]
        params: Option<String>,
    },

    /// Train the PPO agent
    TrainPpo {
        /// Total environment timesteps
        #[arg(short, long, default_value_t = 10000)]
        timesteps: u64,
    },

    /// Initialize the GNN model
    InitGnn {
        /// Initialization parameters as inline JSON (defaults to the standard
        /// dimensions)
        #[arg(short, long)]
        params: Option<String>,
    },
}

// ─────────────────────────────────────────────────────────────────────────────
// Preferences Commands
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Args, Debug)]
pub struct PrefsCommand {
    #[command(subcommand)]
    pub action: PrefsAction,
}

#[derive(Subcommand, Debug)]
pub enum PrefsAction {
    /// Show stored preferences
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Edit preferences and push them back
    Edit,
}

// ─────────────────────────────────────────────────────────────────────────────
// API Key Commands
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Args, Debug)]
pub struct KeysCommand {
    #[command(subcommand)]
    pub action: KeysAction,
}

#[derive(Subcommand, Debug)]
pub enum KeysAction {
    /// Show stored API keys (masked)
    Show,

    /// Update API keys (prompts per provider, stored wholesale)
    Set,
}

// ─────────────────────────────────────────────────────────────────────────────
// User Commands
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Args, Debug)]
pub struct UserCommand {
    #[command(subcommand)]
    pub action: UserAction,
}

#[derive(Subcommand, Debug)]
pub enum UserAction {
    /// Create a user record
    Create {
        /// Username (prompted when omitted)
        #[arg(short, long)]
        username: Option<String>,

        /// Email address (prompted when omitted)
        #[arg(short, long)]
        email: Option<String>,
    },
}
