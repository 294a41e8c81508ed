//! Direct model operation commands: fine-tune, PPO training, GNN init.

use anyhow::Result;
use colored::Colorize;
use cortex_core::Config;
use serde_json::{Value, json};

use crate::cli::{ModelAction, ModelCommand};
use crate::commands::{connect, ensure_login, spinner};

pub async fn execute(cmd: ModelCommand, config: &Config) -> Result<()> {
    match cmd.action {
        ModelAction::FineTune {
            model_id,
            learning_rate,
            params,
        } => fine_tune(&model_id, learning_rate, params.as_deref(), config).await,
        ModelAction::TrainPpo { timesteps } => train_ppo(timesteps, config).await,
        ModelAction::InitGnn { params } => init_gnn(params.as_deref(), config).await,
    }
}

async fn fine_tune(
    model_id: &str,
    learning_rate: f64,
    params: Option<&str>,
    config: &Config,
) -> Result<()> {
    let (gate, client) = connect(config)?;
    if !ensure_login(&gate) {
        return Ok(());
    }

    let fine_tune_params = build_fine_tune_params(learning_rate, params)?;

    let pb = spinner("Fine-tuning model...");
    let result = client.fine_tune_model(model_id, &fine_tune_params).await;
    pb.finish_and_clear();

    let outcome = result?;
    println!("{} Model fine-tuned.", "✓".green());
    println!("{}", serde_json::to_string_pretty(&outcome)?);

    Ok(())
}

/// Start from `{"learning_rate": ...}` and merge any inline JSON over it.
fn build_fine_tune_params(learning_rate: f64, params: Option<&str>) -> Result<Value> {
    let mut fine_tune_params = serde_json::Map::new();
    fine_tune_params.insert("learning_rate".to_string(), json!(learning_rate));

    if let Some(raw) = params {
        let extra: Value = serde_json::from_str(raw)
            .map_err(|e| anyhow::anyhow!("Invalid --params JSON: {e}"))?;
        let extra = extra
            .as_object()
            .ok_or_else(|| anyhow::anyhow!("--params must be a JSON object"))?;

        for (key, value) in extra {
            fine_tune_params.insert(key.clone(), value.clone());
        }
    }

    Ok(Value::Object(fine_tune_params))
}

async fn train_ppo(timesteps: u64, config: &Config) -> Result<()> {
    let (gate, client) = connect(config)?;
    if !ensure_login(&gate) {
        return Ok(());
    }

    let pb = spinner("Training PPO agent...");
    let result = client.train_ppo(timesteps).await;
    pb.finish_and_clear();

    let outcome = result?;
    println!("{} PPO training requested ({} timesteps).", "✓".green(), timesteps);
    println!("{}", serde_json::to_string_pretty(&outcome)?);

    Ok(())
}

async fn init_gnn(params: Option<&str>, config: &Config) -> Result<()> {
    let (gate, client) = connect(config)?;
    if !ensure_login(&gate) {
        return Ok(());
    }

    let init_params = match params {
        Some(raw) => serde_json::from_str(raw)
            .map_err(|e| anyhow::anyhow!("Invalid --params JSON: {e}"))?,
        // Standard dimensions the backend initializes with
        None => json!({ "input_dim": 10, "hidden_dim": 16, "output_dim": 4 }),
    };

    let pb = spinner("Initializing GNN model...");
    let result = client.init_gnn(&init_params).await;
    pb.finish_and_clear();

    let outcome = result?;
    println!("{} GNN model initialized.", "✓".green());
    println!("{}", serde_json::to_string_pretty(&outcome)?);

    Ok(())
}
