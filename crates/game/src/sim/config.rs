use serde::Deserialize;

/// Every tunable of the simulation. All fields have defaults, so a partial
/// JSON override only needs the values it changes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    pub seed: u64,
    pub screen_width: u32,
    pub screen_height: u32,
    pub tile_size: u32,
    pub world: WorldGenConfig,
    pub physics: PhysicsConfig,
    pub player: PlayerConfig,
    pub zombie: ZombieConfig,
    pub cycle: CycleConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorldGenConfig {
    pub columns: usize,
    /// Dirt rows at the bottom of the grid.
    pub ground_depth: usize,
    /// Rows from the top that never receive resources.
    pub clear_sky_rows: usize,
    pub wood_chance: f64,
    pub stone_chance: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PhysicsConfig {
    pub gravity: f32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlayerConfig {
    pub width: f32,
    pub height: f32,
    pub spawn_x: f32,
    pub spawn_y: f32,
    pub speed: f32,
    /// Negative: up is towards row 0.
    pub jump_velocity: f32,
    pub terminal_velocity: f32,
    pub max_health: i32,
    pub mining_range_tiles: f32,
    pub hit_cooldown_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ZombieConfig {
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    pub terminal_velocity: f32,
    pub contact_damage: i32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CycleConfig {
    pub day_ms: u64,
    pub night_ms: u64,
    pub spawn_interval_ms: u64,
}

impl GameConfig {
    pub fn rows(&self) -> usize {
        if self.tile_size == 0 {
            return 0;
        }
        (self.screen_height / self.tile_size) as usize
    }

    pub fn ground_row(&self) -> usize {
        self.rows().saturating_sub(self.world.ground_depth)
    }

    pub fn tile_size_px(&self) -> f32 {
        self.tile_size as f32
    }

    pub fn world_width_px(&self) -> f32 {
        self.world.columns as f32 * self.tile_size_px()
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: 0x5eed,
            screen_width: 960,
            screen_height: 540,
            tile_size: 32,
            world: WorldGenConfig::default(),
            physics: PhysicsConfig::default(),
            player: PlayerConfig::default(),
            zombie: ZombieConfig::default(),
            cycle: CycleConfig::default(),
        }
    }
}

impl Default for WorldGenConfig {
    fn default() -> Self {
        Self {
            columns: 300,
            ground_depth: 5,
            clear_sky_rows: 4,
            wood_chance: 0.02,
            stone_chance: 0.015,
        }
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self { gravity: 0.6 }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            width: 28.0,
            height: 48.0,
            spawn_x: 200.0,
            spawn_y: 200.0,
            speed: 4.0,
            jump_velocity: -12.0,
            terminal_velocity: 12.0,
            max_health: 100,
            mining_range_tiles: 3.0,
            hit_cooldown_ms: 600,
        }
    }
}

impl Default for ZombieConfig {
    fn default() -> Self {
        Self {
            width: 28.0,
            height: 48.0,
            speed: 1.2,
            terminal_velocity: 10.0,
            contact_damage: 10,
        }
    }
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            day_ms: 20_000,
            night_ms: 25_000,
            spawn_interval_ms: 4_000,
        }
    }
}
