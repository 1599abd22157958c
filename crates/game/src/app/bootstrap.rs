use engine::{Layer, LoopConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

use super::levels::{LevelBank, LevelError};
use super::scenes::LevelScene;
use super::state::GameState;

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) state: GameState,
    pub(crate) root_scene: Box<dyn Layer<GameState>>,
}

pub(crate) fn build_app() -> Result<AppWiring, LevelError> {
    init_tracing();
    info!("=== Sacrifices Must be Made ===");

    let bank = LevelBank::load()?;
    info!(levels = bank.level_count(), "level_bank_loaded");

    let config = LoopConfig {
        window_title: "Sacrifices Must be Made".to_string(),
        ..LoopConfig::default()
    };

    Ok(AppWiring {
        config,
        state: GameState::new(bank),
        root_scene: LevelScene::boxed(0),
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}
