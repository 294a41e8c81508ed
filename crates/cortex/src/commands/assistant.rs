//! Assistant profile commands.
//!
//! `build` walks through the customization form, generates a profile, then
//! offers fine-tune and deploy follow-ups. Fine-tune and deploy are only
//! reachable once a profile exists - the backend is never called without one.

use anyhow::Result;
use colored::Colorize;
use cortex_core::Config;
use cortex_core::types::{AiProfile, AssistantConfig, ProfileId};
use dialoguer::{Confirm, Input, MultiSelect, Select};
use serde_json::{Value, json};

use crate::cli::{AssistantAction, AssistantCommand};
use crate::commands::{connect, ensure_login, spinner};

// Customization catalog
const BASE_MODELS: &[&str] = &[
    "gpt4mini",
    "llama3.2-3b",
    "llama3.2-1b",
    "mini-llava",
    "qwen2.5-2b",
];
const PERSONALITIES: &[&str] = &["friendly", "professional", "witty", "empathetic"];
const EXPERTISE: &[&str] = &[
    "general",
    "tech",
    "health",
    "finance",
    "creative",
    "legal",
    "scientific",
];
const MEMORY_MODULES: &[&str] = &["regular", "legal", "medical", "scientific"];
const TOOL_INTEGRATIONS: &[&str] = &["web-search", "calculator", "text-to-speech"];
const ETHICAL_BOUNDARIES: &[&str] = &["no-harm", "privacy", "truthful"];
const LANGUAGES: &[&str] = &["english", "spanish", "mandarin"];

/// Deployment parameters submitted when the user supplies none.
fn default_deployment_params() -> Value {
    json!({
        "environment": "production",
        "scaling": { "min_instances": 1, "max_instances": 5 },
    })
}

pub async fn execute(cmd: AssistantCommand, config: &Config) -> Result<()> {
    match cmd.action {
        AssistantAction::Build => build(config).await,
        AssistantAction::List { json } => list(json, config).await,
        AssistantAction::Deploy { profile_id, params } => {
            deploy(&profile_id, params.as_deref(), config).await
        }
    }
}

async fn build(config: &Config) -> Result<()> {
    let (gate, client) = connect(config)?;
    if !ensure_login(&gate) {
        return Ok(());
    }

    let assistant = prompt_config()?;

    let pb = spinner("Generating AI profile...");
    let result = client.generate_profile(&assistant).await;
    pb.finish_and_clear();

    let profile = match result {
        Ok(profile) => profile,
        Err(e) => {
            println!("{} Failed to generate AI profile: {}", "✗".red(), e);
            return Ok(());
        }
    };

    println!(
        "{} Profile {} generated.",
        "✓".green(),
        profile.id.to_string().yellow()
    );
    print_profile(&profile);

    // Follow-ups require the freshly generated profile
    if Confirm::new()
        .with_prompt("Fine-tune the base model now?")
        .default(false)
        .interact()?
    {
        let model_id = profile
            .base_model
            .clone()
            .unwrap_or_else(|| assistant.base_model.clone());
        let params = json!({ "learning_rate": assistant.learning_rate });

        let pb = spinner("Fine-tuning model...");
        let result = client.fine_tune_model(&model_id, &params).await;
        pb.finish_and_clear();

        match result {
            Ok(_) => println!("{} Model fine-tuned.", "✓".green()),
            Err(e) => println!("{} Fine-tune failed: {}", "✗".red(), e),
        }
    }

    if Confirm::new()
        .with_prompt("Deploy the assistant now?")
        .default(false)
        .interact()?
    {
        let pb = spinner("Deploying assistant...");
        let result = client
            .deploy_assistant(&profile.id, &default_deployment_params())
            .await;
        pb.finish_and_clear();

        match result {
            Ok(deployment) => {
                println!("{} Assistant deployed.", "✓".green());
                println!("{}", serde_json::to_string_pretty(&deployment)?);
            }
            Err(e) => println!("{} Deployment failed: {}", "✗".red(), e),
        }
    }

    Ok(())
}

/// Walk through the customization form.
fn prompt_config() -> Result<AssistantConfig> {
    let mut assistant = AssistantConfig::default();

    let pick = Select::new()
        .with_prompt("Base model")
        .items(BASE_MODELS)
        .default(0)
        .interact()?;
    assistant.base_model = BASE_MODELS[pick].to_string();

    let pick = Select::new()
        .with_prompt("Personality")
        .items(PERSONALITIES)
        .default(0)
        .interact()?;
    assistant.personality = PERSONALITIES[pick].to_string();

    let pick = Select::new()
        .with_prompt("Primary expertise")
        .items(EXPERTISE)
        .default(0)
        .interact()?;
    assistant.primary_expertise = EXPERTISE[pick].to_string();

    assistant.communication_style =
        prompt_slider("Communication style (0 concise - 100 detailed)")?;
    assistant.creativity_level =
        prompt_slider("Creativity level (0 conservative - 100 highly creative)")?;
    assistant.response_length =
        prompt_slider("Response length (0 brief - 100 comprehensive)")?;

    for tag in prompt_tags("Memory modules (RAG)", MEMORY_MODULES)? {
        assistant.toggle_memory_module(&tag);
    }
    for tag in prompt_tags("Tool integrations", TOOL_INTEGRATIONS)? {
        assistant.toggle_tool_integration(&tag);
    }
    for tag in prompt_tags("Ethical boundaries", ETHICAL_BOUNDARIES)? {
        assistant.toggle_ethical_boundary(&tag);
    }
    for tag in prompt_tags("Language proficiency", LANGUAGES)? {
        assistant.toggle_language(&tag);
    }

    assistant.execute_code = Confirm::new()
        .with_prompt("Allow code execution?")
        .default(false)
        .interact()?;
    assistant.always_on = Confirm::new()
        .with_prompt("Always-on mode (second brain)?")
        .default(false)
        .interact()?;
    assistant.voice_interface = Confirm::new()
        .with_prompt("Enable voice interface?")
        .default(false)
        .interact()?;
    assistant.speech_to_text = Confirm::new()
        .with_prompt("Enable speech-to-text?")
        .default(false)
        .interact()?;

    assistant.learning_rate = Input::new()
        .with_prompt("Learning rate")
        .default(0.0003)
        .interact_text()?;

    Ok(assistant)
}

fn prompt_slider(prompt: &str) -> Result<u8> {
    let value: u8 = Input::new()
        .with_prompt(prompt)
        .default(50)
        .interact_text()?;
    Ok(value.min(100))
}

fn prompt_tags(prompt: &str, items: &[&str]) -> Result<Vec<String>> {
    let picks = MultiSelect::new()
        .with_prompt(prompt)
        .items(items)
        .interact()?;
    Ok(picks.into_iter().map(|i| items[i].to_string()).collect())
}

fn print_profile(profile: &AiProfile) {
    if let Some(model) = &profile.base_model {
        println!("  Base model: {model}");
    }
    if let Some(personality) = &profile.personality {
        println!("  Personality: {personality}");
    }
    if let Some(expertise) = &profile.primary_expertise {
        println!("  Expertise: {expertise}");
    }
    if let Some(always_on) = profile.always_on {
        println!("  Always-on: {}", if always_on { "yes" } else { "no" });
    }
}

async fn list(as_json: bool, config: &Config) -> Result<()> {
    let (gate, client) = connect(config)?;
    if !ensure_login(&gate) {
        return Ok(());
    }

    let pb = spinner("Fetching profiles...");
    let result = client.list_profiles().await;
    pb.finish_and_clear();

    let profiles = result?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&profiles)?);
        return Ok(());
    }

    if profiles.is_empty() {
        println!("No assistant profiles yet. Run {}.", "cortex assistant build".cyan());
        return Ok(());
    }

    println!("{}", "Assistant Profiles".bold());
    println!("{}", "─".repeat(40));
    for profile in &profiles {
        println!(
            "{}  {}  {}",
            profile.id.to_string().yellow(),
            profile.base_model.as_deref().unwrap_or("-"),
            profile.personality.as_deref().unwrap_or("-"),
        );
    }

    Ok(())
}

async fn deploy(profile_id: &str, params: Option<&str>, config: &Config) -> Result<()> {
    let (gate, client) = connect(config)?;
    if !ensure_login(&gate) {
        return Ok(());
    }

    let deployment_params = match params {
        Some(raw) => serde_json::from_str(raw)
            .map_err(|e| anyhow::anyhow!("Invalid --params JSON: {e}"))?,
        None => default_deployment_params(),
    };

    let pb = spinner("Deploying assistant...");
    let result = client
        .deploy_assistant(&ProfileId::parse(profile_id), &deployment_params)
        .await;
    pb.finish_and_clear();

    let deployment = result?;
    println!("{} Assistant deployed.", "✓".green());
    println!("{}", serde_json::to_string_pretty(&deployment)?);

    Ok(())
}
