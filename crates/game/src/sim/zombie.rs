use super::config::{PhysicsConfig, ZombieConfig};
use super::geometry::Rect;
use super::physics::{integrate, Body, BodyParams, PhysicsBody};
use super::tile_world::TileWorld;

/// Walks straight at the player's x every tick. Walls stop it; it never
/// jumps, so it may stay stuck behind one.
#[derive(Debug, Clone, PartialEq)]
pub struct Zombie {
    body: PhysicsBody,
}

impl Body for Zombie {
    fn body(&self) -> &PhysicsBody {
        &self.body
    }

    fn body_mut(&mut self) -> &mut PhysicsBody {
        &mut self.body
    }
}

impl Zombie {
    pub fn new(x: f32, y: f32, config: &ZombieConfig) -> Self {
        Self {
            body: PhysicsBody::new(x, y, config.width, config.height),
        }
    }

    pub fn rect(&self) -> Rect {
        self.body.rect()
    }

    pub fn update(
        &mut self,
        player_x: f32,
        world: &TileWorld,
        config: &ZombieConfig,
        physics: &PhysicsConfig,
    ) {
        let vx = if player_x > self.body.x {
            config.speed
        } else {
            -config.speed
        };
        let params = BodyParams {
            terminal_velocity: config.terminal_velocity,
            clamp_to_world: false,
        };
        integrate(self, vx, &params, world, physics);
    }

    pub fn touches(&self, target: &Rect) -> bool {
        self.rect().intersects(target)
    }
}
