use super::config::{PhysicsConfig, PlayerConfig};
use super::geometry::Rect;
use super::physics::{integrate, is_grounded, Body, BodyParams, PhysicsBody};
use super::tile_world::{Tile, TileWorld};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Wood,
    Stone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Recipe {
    /// 2 stone -> 1 stone wall.
    StoneWall,
    /// 2 wood -> 1 wood wall.
    WoodWall,
}

impl Recipe {
    pub const ALL: [Recipe; 2] = [Recipe::StoneWall, Recipe::WoodWall];

    /// Menu hotkey numbering, starting at 1.
    pub fn from_digit(digit: u8) -> Option<Self> {
        match digit {
            1 => Some(Recipe::StoneWall),
            2 => Some(Recipe::WoodWall),
            _ => None,
        }
    }

    pub fn cost(self) -> u32 {
        2
    }

    pub fn label(self) -> &'static str {
        match self {
            Recipe::StoneWall => "STONE WALL",
            Recipe::WoodWall => "WOOD WALL",
        }
    }

    pub fn ingredient(self) -> ResourceKind {
        match self {
            Recipe::StoneWall => ResourceKind::Stone,
            Recipe::WoodWall => ResourceKind::Wood,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MineResult {
    Success(ResourceKind),
    TooFar,
    NotMinable,
    OutOfBounds,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceResult {
    Success,
    Occupied,
    NoMaterial,
    OutOfBounds,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CraftResult {
    Success,
    Insufficient,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Inventory {
    pub wood: u32,
    pub stone: u32,
    pub stone_wall: u32,
    pub wood_wall: u32,
}

impl Inventory {
    fn resource_mut(&mut self, kind: ResourceKind) -> &mut u32 {
        match kind {
            ResourceKind::Wood => &mut self.wood,
            ResourceKind::Stone => &mut self.stone,
        }
    }
}

/// Held movement keys for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MovementIntent {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    body: PhysicsBody,
    health: i32,
    inventory: Inventory,
    last_hit_ms: Option<u64>,
    facing: Facing,
    config: PlayerConfig,
}

impl Body for Player {
    fn body(&self) -> &PhysicsBody {
        &self.body
    }

    fn body_mut(&mut self) -> &mut PhysicsBody {
        &mut self.body
    }
}

impl Player {
    pub fn new(config: &PlayerConfig) -> Self {
        Self {
            body: PhysicsBody::new(config.spawn_x, config.spawn_y, config.width, config.height),
            health: config.max_health,
            inventory: Inventory::default(),
            last_hit_ms: None,
            facing: Facing::Right,
            config: config.clone(),
        }
    }

    pub fn rect(&self) -> Rect {
        self.body.rect()
    }

    pub fn x(&self) -> f32 {
        self.body.x
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn max_health(&self) -> i32 {
        self.config.max_health
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    /// Right wins when both directions are held. Jumping needs ground underfoot
    /// at the moment of the press.
    pub fn handle_movement_input(&mut self, intent: MovementIntent, world: &TileWorld) {
        self.body.vx = 0.0;
        if intent.left {
            self.body.vx = -self.config.speed;
        }
        if intent.right {
            self.body.vx = self.config.speed;
        }
        if self.body.vx < 0.0 {
            self.facing = Facing::Left;
        } else if self.body.vx > 0.0 {
            self.facing = Facing::Right;
        }

        if intent.jump && is_grounded(&*self, world) {
            self.body.vy = self.config.jump_velocity;
        }
    }

    pub fn update(&mut self, intent: MovementIntent, world: &TileWorld, physics: &PhysicsConfig) {
        self.handle_movement_input(intent, world);
        let params = BodyParams {
            terminal_velocity: self.config.terminal_velocity,
            clamp_to_world: true,
        };
        let vx = self.body.vx;
        integrate(self, vx, &params, world, physics);
    }

    pub fn mine(&mut self, world: &mut TileWorld, row: i32, col: i32) -> MineResult {
        if !world.in_bounds(row, col) {
            return MineResult::OutOfBounds;
        }
        if !self.within_reach(world, row, col) {
            return MineResult::TooFar;
        }
        let kind = match world.get_tile(row, col) {
            Tile::Wood => ResourceKind::Wood,
            Tile::Stone => ResourceKind::Stone,
            _ => return MineResult::NotMinable,
        };
        *self.inventory.resource_mut(kind) += 1;
        world.set_tile(row, col, Tile::Air);
        MineResult::Success(kind)
    }

    /// Spends a stone wall if one is held, otherwise a wood wall.
    pub fn place(&mut self, world: &mut TileWorld, row: i32, col: i32) -> PlaceResult {
        if !world.in_bounds(row, col) {
            return PlaceResult::OutOfBounds;
        }
        if world.get_tile(row, col) != Tile::Air {
            return PlaceResult::Occupied;
        }
        let stock = if self.inventory.stone_wall > 0 {
            &mut self.inventory.stone_wall
        } else if self.inventory.wood_wall > 0 {
            &mut self.inventory.wood_wall
        } else {
            return PlaceResult::NoMaterial;
        };
        *stock -= 1;
        world.set_tile(row, col, Tile::Wall);
        PlaceResult::Success
    }

    pub fn craft(&mut self, recipe: Recipe) -> CraftResult {
        let cost = recipe.cost();
        let ingredient = self.inventory.resource_mut(recipe.ingredient());
        if *ingredient < cost {
            return CraftResult::Insufficient;
        }
        *ingredient -= cost;
        match recipe {
            Recipe::StoneWall => self.inventory.stone_wall += 1,
            Recipe::WoodWall => self.inventory.wood_wall += 1,
        }
        CraftResult::Success
    }

    /// Applies only when more than the cooldown has passed since the last
    /// applied hit. Health is allowed to drop below zero.
    pub fn take_damage(&mut self, amount: i32, now_ms: u64) -> bool {
        if let Some(last_hit_ms) = self.last_hit_ms {
            if now_ms.saturating_sub(last_hit_ms) <= self.config.hit_cooldown_ms {
                return false;
            }
        }
        self.health -= amount;
        self.last_hit_ms = Some(now_ms);
        true
    }

    fn within_reach(&self, world: &TileWorld, row: i32, col: i32) -> bool {
        let ts = world.tile_size();
        let (player_cx, player_cy) = self.rect().center();
        let (tile_cx, tile_cy) = world.tile_rect(row, col).center();
        let distance = (tile_cx - player_cx).hypot(tile_cy - player_cy);
        distance <= self.config.mining_range_tiles * ts
    }
}

#[cfg(test)]
impl Player {
    pub fn inventory_mut(&mut self) -> &mut Inventory {
        &mut self.inventory
    }

    pub fn last_hit_ms(&self) -> Option<u64> {
        self.last_hit_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::tile_world::parse_rows;

    fn player_at(x: f32, y: f32) -> Player {
        let mut player = Player::new(&PlayerConfig::default());
        player.body_mut().x = x;
        player.body_mut().y = y;
        player
    }

    fn resource_world() -> TileWorld {
        parse_rows(
            32.0,
            &[
                "...W....S", ".........", ".........", ".........", ".........",
                "#########",
            ],
        )
    }

    #[test]
    fn new_player_starts_at_spawn_with_full_health() {
        let player = Player::new(&PlayerConfig::default());
        assert_eq!(player.rect(), Rect::new(200.0, 200.0, 28.0, 48.0));
        assert_eq!(player.health(), 100);
        assert_eq!(player.inventory(), &Inventory::default());
        assert_eq!(player.facing(), Facing::Right);
        assert_eq!(player.last_hit_ms(), None);
    }

    #[test]
    fn movement_sets_velocity_and_facing() {
        let world = resource_world();
        let mut player = player_at(40.0, 112.0);

        player.handle_movement_input(
            MovementIntent {
                left: true,
                ..MovementIntent::default()
            },
            &world,
        );
        assert_eq!(player.body().vx, -4.0);
        assert_eq!(player.facing(), Facing::Left);

        player.handle_movement_input(MovementIntent::default(), &world);
        assert_eq!(player.body().vx, 0.0);
        assert_eq!(player.facing(), Facing::Left);

        player.handle_movement_input(
            MovementIntent {
                left: true,
                right: true,
                jump: false,
            },
            &world,
        );
        assert_eq!(player.body().vx, 4.0);
        assert_eq!(player.facing(), Facing::Right);
    }

    #[test]
    fn jump_requires_ground() {
        let world = resource_world();
        let jump = MovementIntent {
            jump: true,
            ..MovementIntent::default()
        };

        let mut grounded = player_at(40.0, 112.0);
        grounded.handle_movement_input(jump, &world);
        assert_eq!(grounded.body().vy, -12.0);

        let mut airborne = player_at(40.0, 40.0);
        airborne.handle_movement_input(jump, &world);
        assert_eq!(airborne.body().vy, 0.0);
    }

    #[test]
    fn jump_then_land_returns_to_rest() {
        let world = resource_world();
        let physics = PhysicsConfig::default();
        let mut player = player_at(40.0, 112.0);
        player.update(
            MovementIntent {
                jump: true,
                ..MovementIntent::default()
            },
            &world,
            &physics,
        );
        assert!(player.rect().y < 112.0);
        for _ in 0..120 {
            player.update(MovementIntent::default(), &world, &physics);
        }
        assert_eq!(player.rect().y, 112.0);
    }

    #[test]
    fn mining_collects_resource_once() {
        let mut world = resource_world();
        let mut player = player_at(2.0, -8.0);

        assert_eq!(
            player.mine(&mut world, 0, 3),
            MineResult::Success(ResourceKind::Wood)
        );
        assert_eq!(player.inventory().wood, 1);
        assert_eq!(world.get_tile(0, 3), Tile::Air);

        assert_eq!(player.mine(&mut world, 0, 3), MineResult::NotMinable);
        assert_eq!(player.inventory().wood, 1);
    }

    #[test]
    fn mining_range_boundary_is_inclusive() {
        // Player center (16, 16); tile (0, 3) center (112, 16): exactly three tiles.
        let mut world = resource_world();
        let mut player = player_at(2.0, -8.0);
        assert_eq!(
            player.mine(&mut world, 0, 3),
            MineResult::Success(ResourceKind::Wood)
        );

        let mut world = resource_world();
        let mut player = player_at(1.99, -8.0);
        assert_eq!(player.mine(&mut world, 0, 3), MineResult::TooFar);
        assert_eq!(world.get_tile(0, 3), Tile::Wood);
        assert_eq!(player.inventory().wood, 0);
    }

    #[test]
    fn mining_stone_and_non_resources() {
        let mut world = resource_world();
        let mut player = player_at(200.0, -8.0);
        assert_eq!(
            player.mine(&mut world, 0, 8),
            MineResult::Success(ResourceKind::Stone)
        );
        assert_eq!(player.inventory().stone, 1);
        assert_eq!(player.mine(&mut world, 0, 7), MineResult::NotMinable);

        let mut ground_player = player_at(200.0, 112.0);
        assert_eq!(ground_player.mine(&mut world, 5, 6), MineResult::NotMinable);
        assert_eq!(world.get_tile(5, 6), Tile::Dirt);
    }

    #[test]
    fn out_of_bounds_actions_never_mutate() {
        let mut world = resource_world();
        let before = world.clone();
        let mut player = player_at(2.0, -8.0);
        player.inventory_mut().stone_wall = 3;

        for (row, col) in [(-1, 0), (0, -1), (6, 0), (0, 9), (-1, -1)] {
            assert_eq!(player.mine(&mut world, row, col), MineResult::OutOfBounds);
            assert_eq!(player.place(&mut world, row, col), PlaceResult::OutOfBounds);
        }
        assert_eq!(world, before);
        assert_eq!(player.inventory().stone_wall, 3);
    }

    #[test]
    fn placement_prefers_stone_walls() {
        let mut world = resource_world();
        let mut player = player_at(40.0, 112.0);
        player.inventory_mut().stone_wall = 1;
        player.inventory_mut().wood_wall = 1;

        assert_eq!(player.place(&mut world, 4, 4), PlaceResult::Success);
        assert_eq!(world.get_tile(4, 4), Tile::Wall);
        assert_eq!(player.inventory().stone_wall, 0);
        assert_eq!(player.inventory().wood_wall, 1);

        assert_eq!(player.place(&mut world, 4, 5), PlaceResult::Success);
        assert_eq!(player.inventory().wood_wall, 0);
        assert_eq!(player.place(&mut world, 4, 6), PlaceResult::NoMaterial);
        assert_eq!(world.get_tile(4, 6), Tile::Air);
    }

    #[test]
    fn placement_on_solid_tile_is_occupied() {
        let mut world = resource_world();
        let mut player = player_at(40.0, 112.0);
        player.inventory_mut().wood_wall = 1;

        assert_eq!(player.place(&mut world, 5, 0), PlaceResult::Occupied);
        assert_eq!(player.place(&mut world, 0, 3), PlaceResult::Occupied);
        assert_eq!(player.inventory().wood_wall, 1);
    }

    #[test]
    fn crafting_checks_ingredients_first() {
        let mut player = player_at(0.0, 0.0);
        player.inventory_mut().stone = 1;
        assert_eq!(player.craft(Recipe::StoneWall), CraftResult::Insufficient);
        assert_eq!(
            player.inventory(),
            &Inventory {
                stone: 1,
                ..Inventory::default()
            }
        );

        player.inventory_mut().stone = 2;
        assert_eq!(player.craft(Recipe::StoneWall), CraftResult::Success);
        assert_eq!(player.inventory().stone, 0);
        assert_eq!(player.inventory().stone_wall, 1);

        player.inventory_mut().wood = 5;
        assert_eq!(player.craft(Recipe::WoodWall), CraftResult::Success);
        assert_eq!(player.craft(Recipe::WoodWall), CraftResult::Success);
        assert_eq!(player.craft(Recipe::WoodWall), CraftResult::Insufficient);
        assert_eq!(player.inventory().wood, 1);
        assert_eq!(player.inventory().wood_wall, 2);
    }

    #[test]
    fn recipe_hotkeys() {
        assert_eq!(Recipe::from_digit(1), Some(Recipe::StoneWall));
        assert_eq!(Recipe::from_digit(2), Some(Recipe::WoodWall));
        assert_eq!(Recipe::from_digit(3), None);
    }

    #[test]
    fn first_hit_always_applies() {
        let mut player = player_at(0.0, 0.0);
        assert!(player.take_damage(10, 0));
        assert_eq!(player.health(), 90);
        assert_eq!(player.last_hit_ms(), Some(0));
    }

    #[test]
    fn hits_inside_cooldown_are_ignored() {
        let mut player = player_at(0.0, 0.0);
        assert!(player.take_damage(10, 1_000));
        assert!(!player.take_damage(10, 1_100));
        assert!(!player.take_damage(10, 1_600));
        assert_eq!(player.health(), 90);
        assert_eq!(player.last_hit_ms(), Some(1_000));
    }

    #[test]
    fn hits_past_cooldown_apply_again() {
        let mut player = player_at(0.0, 0.0);
        assert!(player.take_damage(10, 1_000));
        assert!(player.take_damage(10, 1_700));
        assert_eq!(player.health(), 80);
        assert!(player.take_damage(10, 2_301));
        assert_eq!(player.health(), 70);
    }

    #[test]
    fn health_may_drop_below_zero() {
        let mut player = player_at(0.0, 0.0);
        assert!(player.take_damage(95, 0));
        assert!(!player.is_dead());
        assert!(player.take_damage(10, 1_000));
        assert_eq!(player.health(), -5);
        assert!(player.is_dead());
    }
}
