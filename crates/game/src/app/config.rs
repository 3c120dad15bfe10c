use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use crate::sim::spatial::QUERY_PAD_TILES;
use crate::sim::GameConfig;

pub(crate) const CONFIG_PATH_ENV_VAR: &str = "SURVIVAL_CONFIG";
pub(crate) const SEED_ENV_VAR: &str = "SURVIVAL_SEED";

const MIN_ROWS: usize = 6;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path} at {field}: {source}")]
    Parse {
        path: PathBuf,
        field: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config value {field}: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
}

/// Defaults, overridden by the JSON file named in `SURVIVAL_CONFIG`, then by
/// `SURVIVAL_SEED`.
pub(crate) fn load_config() -> Result<GameConfig, ConfigError> {
    let path = std::env::var_os(CONFIG_PATH_ENV_VAR).map(PathBuf::from);
    let seed = std::env::var(SEED_ENV_VAR).ok();
    resolve_config(path.as_deref(), seed.as_deref())
}

fn resolve_config(
    path: Option<&Path>,
    seed_override: Option<&str>,
) -> Result<GameConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let config = load_config_file(path)?;
            info!(path = %path.display(), "config_file_loaded");
            config
        }
        None => GameConfig::default(),
    };
    if let Some(raw) = seed_override {
        apply_seed_override(&mut config, raw);
    }
    validate(&config)?;
    Ok(config)
}

fn load_config_file(path: &Path) -> Result<GameConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config_json(&raw, path)
}

fn parse_config_json(raw: &str, path: &Path) -> Result<GameConfig, ConfigError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|error| {
        let field = error.path().to_string();
        ConfigError::Parse {
            path: path.to_path_buf(),
            field,
            source: error.into_inner(),
        }
    })
}

fn apply_seed_override(config: &mut GameConfig, raw: &str) {
    match raw.trim().parse::<u64>() {
        Ok(seed) => config.seed = seed,
        Err(error) => warn!(
            value = raw,
            error = %error,
            fallback = config.seed,
            "seed_override_ignored"
        ),
    }
}

fn invalid(field: &'static str, message: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        message: message.into(),
    }
}

fn require_positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("expected positive number, got {value}")))
    }
}

fn require_probability(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(field, format!("expected value in [0, 1], got {value}")))
    }
}

pub(crate) fn validate(config: &GameConfig) -> Result<(), ConfigError> {
    if config.tile_size == 0 {
        return Err(invalid("tile_size", "must be non-zero"));
    }
    if config.screen_width == 0 {
        return Err(invalid("screen_width", "must be non-zero"));
    }
    let rows = config.rows();
    if rows < MIN_ROWS {
        return Err(invalid(
            "screen_height",
            format!("must fit at least {MIN_ROWS} tile rows, fits {rows}"),
        ));
    }

    let world = &config.world;
    if world.ground_depth == 0 || world.ground_depth >= rows {
        return Err(invalid(
            "world.ground_depth",
            format!("expected 1..{rows}, got {}", world.ground_depth),
        ));
    }
    if world.clear_sky_rows > config.ground_row() {
        return Err(invalid(
            "world.clear_sky_rows",
            format!(
                "sky band of {} rows overlaps ground row {}",
                world.clear_sky_rows,
                config.ground_row()
            ),
        ));
    }
    if config.world_width_px() < config.screen_width as f32 {
        return Err(invalid(
            "world.columns",
            format!(
                "world is {} px wide, narrower than the {} px screen",
                config.world_width_px(),
                config.screen_width
            ),
        ));
    }
    require_probability("world.wood_chance", world.wood_chance)?;
    require_probability("world.stone_chance", world.stone_chance)?;

    require_positive("physics.gravity", config.physics.gravity)?;

    let player = &config.player;
    require_positive("player.width", player.width)?;
    require_positive("player.height", player.height)?;
    require_positive("player.speed", player.speed)?;
    require_positive("player.terminal_velocity", player.terminal_velocity)?;
    if !(player.jump_velocity.is_finite() && player.jump_velocity < 0.0) {
        return Err(invalid(
            "player.jump_velocity",
            format!("expected negative number, got {}", player.jump_velocity),
        ));
    }
    if player.max_health <= 0 {
        return Err(invalid("player.max_health", "must be positive"));
    }
    require_positive("player.mining_range_tiles", player.mining_range_tiles)?;

    let zombie = &config.zombie;
    require_positive("zombie.width", zombie.width)?;
    require_positive("zombie.height", zombie.height)?;
    require_positive("zombie.speed", zombie.speed)?;
    require_positive("zombie.terminal_velocity", zombie.terminal_velocity)?;

    // Collision lookups only see tiles within the query pad.
    let pad_px = QUERY_PAD_TILES as f32 * config.tile_size_px();
    let fastest = [
        player.speed,
        player.terminal_velocity,
        player.jump_velocity.abs(),
        zombie.speed,
        zombie.terminal_velocity,
    ]
    .into_iter()
    .fold(0.0f32, f32::max);
    if fastest >= pad_px {
        return Err(invalid(
            "tile_size",
            format!("per-tick speed {fastest} must stay below the {pad_px} px collision pad"),
        ));
    }

    let cycle = &config.cycle;
    if cycle.day_ms == 0 {
        return Err(invalid("cycle.day_ms", "must be non-zero"));
    }
    if cycle.night_ms == 0 {
        return Err(invalid("cycle.night_ms", "must be non-zero"));
    }
    if cycle.spawn_interval_ms == 0 {
        return Err(invalid("cycle.spawn_interval_ms", "must be non-zero"));
    }
    Ok(())
}
