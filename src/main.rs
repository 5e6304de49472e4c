use std::time::Duration;

use linkboard::config::{EngineConfig, env_parse};
use linkboard::engine::EngineCore;
use linkboard::replay::{ReplayScene, replay};

const DEFAULT_REPLAY_MS: u64 = 250;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // stdout carries the result document; logs go to stderr.
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let scene_path = std::env::var("LINKBOARD_SCENE").map_err(|_| "LINKBOARD_SCENE required")?;
    let config = EngineConfig::from_env();
    config.validate()?;
    let replay_ms = env_parse("LINKBOARD_REPLAY_MS", DEFAULT_REPLAY_MS);

    let raw = tokio::fs::read_to_string(&scene_path).await?;
    let scene: ReplayScene = serde_json::from_str(&raw)?;
    tracing::info!(
        path = %scene_path,
        entities = scene.entities.len(),
        commands = scene.script.len(),
        replay_ms,
        "replaying scene"
    );

    let mut core = EngineCore::with_config(config);
    let outcome = replay(&mut core, scene, Duration::from_millis(replay_ms)).await;
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}
