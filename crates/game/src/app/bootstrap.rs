use engine::{LoopConfig, Scene};
use tracing::info;
use tracing_subscriber::EnvFilter;

use super::config::{load_config, ConfigError};
use super::scene::SurvivalScene;

const WINDOW_TITLE: &str = "Tile Survival";

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) scene: Box<dyn Scene>,
}

pub(crate) fn build_app() -> Result<AppWiring, ConfigError> {
    init_tracing();
    info!(version = env!("CARGO_PKG_VERSION"), "startup");

    let game_config = load_config()?;
    info!(
        seed = game_config.seed,
        columns = game_config.world.columns,
        tile_size = game_config.tile_size,
        "game_config"
    );

    let config = LoopConfig {
        window_title: WINDOW_TITLE.to_string(),
        window_width: game_config.screen_width,
        window_height: game_config.screen_height,
        ..LoopConfig::default()
    };

    Ok(AppWiring {
        config,
        scene: Box::new(SurvivalScene::new(game_config)),
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
