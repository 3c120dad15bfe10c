//! Tile-world survival simulation: grid, collision, entities and the
//! day/night director, advanced one fixed tick at a time.

pub mod config;
pub mod day_night;
pub mod geometry;
pub mod physics;
pub mod player;
pub mod spatial;
pub mod tile_world;
pub mod zombie;


use std::ops::Range;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

pub use config::GameConfig;
pub use day_night::{DayNightDirector, DirectorReport, Phase};
pub use geometry::Rect;
pub use player::{
    CraftResult, Facing, Inventory, MineResult, MovementIntent, PlaceResult, Player, Recipe,
    ResourceKind,
};
pub use tile_world::{Tile, TileWorld};
pub use zombie::Zombie;

/// A player command that targets the world, in screen pixels where relevant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WorldAction {
    Mine { screen_x: f32, screen_y: f32 },
    Place { screen_x: f32, screen_y: f32 },
    Craft(Recipe),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    pub movement: MovementIntent,
    pub actions: Vec<WorldAction>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    Mined {
        row: i32,
        col: i32,
        result: MineResult,
    },
    Placed {
        row: i32,
        col: i32,
        result: PlaceResult,
    },
    Crafted {
        recipe: Recipe,
        result: CraftResult,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub director: DirectorReport,
    pub outcomes: Vec<ActionOutcome>,
    /// Contact hits that got past the damage cooldown.
    pub hits_taken: u32,
    pub player_died: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleTile {
    pub rect: Rect,
    pub tile: Tile,
}

/// Everything needed to draw one frame, in world pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSnapshot {
    pub camera_x: f32,
    pub visible_columns: Range<usize>,
    pub tiles: Vec<VisibleTile>,
    pub player: Rect,
    pub facing: Facing,
    pub zombies: Vec<Rect>,
    pub inventory: Inventory,
    pub health: i32,
    pub max_health: i32,
    pub phase: Phase,
    pub game_over: bool,
}

/// `clamp(player_x - screen_width / 2, 0, world_width - screen_width)`; zero
/// when the world is narrower than the screen.
pub fn camera_x(player_x: f32, screen_width: f32, world_width_px: f32) -> f32 {
    (player_x - screen_width / 2.0)
        .min(world_width_px - screen_width)
        .max(0.0)
}

#[derive(Debug, Clone)]
pub struct Simulation {
    config: GameConfig,
    world: TileWorld,
    player: Player,
    zombies: Vec<Zombie>,
    director: DayNightDirector,
    rng: StdRng,
}

impl Simulation {
    pub fn new(config: GameConfig) -> Self {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let world = TileWorld::generate(&config, &mut rng);
        Self::from_parts(config, world, rng)
    }

    fn from_parts(config: GameConfig, world: TileWorld, rng: StdRng) -> Self {
        let player = Player::new(&config.player);
        let director = DayNightDirector::new(&config, 0);
        Self {
            config,
            world,
            player,
            zombies: Vec::new(),
            director,
            rng,
        }
    }

    pub fn world(&self) -> &TileWorld {
        &self.world
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn director(&self) -> &DayNightDirector {
        &self.director
    }

    pub fn is_game_over(&self) -> bool {
        self.player.is_dead()
    }

    pub fn camera_x(&self) -> f32 {
        camera_x(
            self.player.x(),
            self.config.screen_width as f32,
            self.world.width_px(),
        )
    }

    /// Tile under a screen position, using the camera for the player's
    /// current position.
    pub fn cursor_to_tile(&self, screen_x: f32, screen_y: f32) -> (i32, i32) {
        self.world.tile_at_world(screen_x + self.camera_x(), screen_y)
    }

    /// Advances one fixed step. Order: director, world actions, player
    /// movement, zombies and contact damage. Does nothing once the player is dead.
    pub fn tick(&mut self, input: &TickInput, now_ms: u64) -> TickReport {
        let mut report = TickReport::default();
        if self.is_game_over() {
            return report;
        }

        report.director =
            self.director.update(now_ms, self.player.x(), &mut self.zombies, &mut self.rng);
        self.log_director_report(&report.director, now_ms);

        for action in &input.actions {
            let outcome = self.apply_action(*action);
            report.outcomes.push(outcome);
        }

        self.player.update(input.movement, &self.world, &self.config.physics);

        let player_rect = self.player.rect();
        for zombie in &mut self.zombies {
            zombie.update(
                player_rect.x,
                &self.world,
                &self.config.zombie,
                &self.config.physics,
            );
            if zombie.touches(&player_rect)
                && self
                    .player
                    .take_damage(self.config.zombie.contact_damage, now_ms)
            {
                report.hits_taken += 1;
                info!(health = self.player.health(), now_ms, "player_damaged");
            }
        }

        if self.player.is_dead() {
            report.player_died = true;
            info!(
                health = self.player.health(),
                now_ms,
                phase = self.director.phase().label(),
                "game_over"
            );
        }

        report
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        let camera_x = self.camera_x();
        let visible_columns = self
            .world
            .visible_columns(camera_x, self.config.screen_width as f32);

        let mut tiles = Vec::new();
        for row in 0..self.world.rows() {
            for col in visible_columns.clone() {
                let tile = self.world.tile_at_index(row, col);
                if tile.is_solid() {
                    tiles.push(VisibleTile {
                        rect: self.world.tile_rect(row as i32, col as i32),
                        tile,
                    });
                }
            }
        }

        FrameSnapshot {
            camera_x,
            visible_columns,
            tiles,
            player: self.player.rect(),
            facing: self.player.facing(),
            zombies: self.zombies.iter().map(Zombie::rect).collect(),
            inventory: *self.player.inventory(),
            health: self.player.health(),
            max_health: self.player.max_health(),
            phase: self.director.phase(),
            game_over: self.is_game_over(),
        }
    }

    fn apply_action(&mut self, action: WorldAction) -> ActionOutcome {
        match action {
            WorldAction::Mine { screen_x, screen_y } => {
                let (row, col) = self.cursor_to_tile(screen_x, screen_y);
                let result = self.player.mine(&mut self.world, row, col);
                if let MineResult::Success(resource) = result {
                    debug!(row, col, resource = ?resource, "tile_mined");
                }
                ActionOutcome::Mined { row, col, result }
            }
            WorldAction::Place { screen_x, screen_y } => {
                let (row, col) = self.cursor_to_tile(screen_x, screen_y);
                let result = self.player.place(&mut self.world, row, col);
                if result == PlaceResult::Success {
                    debug!(row, col, "wall_placed");
                }
                ActionOutcome::Placed { row, col, result }
            }
            WorldAction::Craft(recipe) => {
                let result = self.player.craft(recipe);
                if result == CraftResult::Success {
                    debug!(recipe = recipe.label(), "item_crafted");
                }
                ActionOutcome::Crafted { recipe, result }
            }
        }
    }

    fn log_director_report(&self, report: &DirectorReport, now_ms: u64) {
        if let Some(phase) = report.transition {
            info!(phase = phase.label(), now_ms, "phase_changed");
        }
        if report.cleared > 0 {
            info!(count = report.cleared, "zombies_cleared");
        }
        if let Some((side, x)) = report.spawned {
            debug!(
                side = ?side,
                x,
                total = self.zombies.len(),
                "zombie_spawned"
            );
        }
    }
}

#[cfg(test)]
impl Simulation {
    /// Uses a prepared world instead of generating one.
    pub fn with_world(config: GameConfig, world: TileWorld) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self::from_parts(config, world, rng)
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn zombies(&self) -> &[Zombie] {
        &self.zombies
    }

    pub fn zombies_mut(&mut self) -> &mut Vec<Zombie> {
        &mut self.zombies
    }

    pub fn set_director(&mut self, director: DayNightDirector) {
        self.director = director;
    }
}
