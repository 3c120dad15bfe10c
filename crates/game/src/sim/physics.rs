use super::config::PhysicsConfig;
use super::geometry::Rect;
use super::spatial::{collides, solid_tiles_around};
use super::tile_world::TileWorld;

/// How far below the feet a tile still counts as ground.
const GROUND_PROBE_PX: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsBody {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub width: f32,
    pub height: f32,
}

impl PhysicsBody {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            width,
            height,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// Anything with a position, velocity and bounding box that gravity acts on.
pub trait Body {
    fn body(&self) -> &PhysicsBody;
    fn body_mut(&mut self) -> &mut PhysicsBody;
}

impl Body for PhysicsBody {
    fn body(&self) -> &PhysicsBody {
        self
    }

    fn body_mut(&mut self) -> &mut PhysicsBody {
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyParams {
    pub terminal_velocity: f32,
    /// Keep the body horizontally inside `[0, world width]`.
    pub clamp_to_world: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Horizontal,
    Vertical,
}

/// One tick of motion: set vx, apply gravity, then move and resolve X before Y.
pub fn integrate<B: Body + ?Sized>(
    body: &mut B,
    horizontal_velocity: f32,
    params: &BodyParams,
    world: &TileWorld,
    physics: &PhysicsConfig,
) {
    let body = body.body_mut();
    body.vx = horizontal_velocity;
    body.vy = (body.vy + physics.gravity).min(params.terminal_velocity);

    body.x += body.vx;
    resolve_axis(body, Axis::Horizontal, world);

    body.y += body.vy;
    resolve_axis(body, Axis::Vertical, world);

    if params.clamp_to_world {
        let max_x = (world.width_px() - body.width).max(0.0);
        body.x = body.x.clamp(0.0, max_x);
    }
}

pub fn is_grounded<B: Body + ?Sized>(body: &B, world: &TileWorld) -> bool {
    collides(&body.body().rect().translated(0.0, GROUND_PROBE_PX), world)
}

/// Pushes the body out of every overlapping tile along one axis, against the
/// direction of travel. Tiles are visited row-major and each snap refreshes the
/// box, so when several tiles overlap the last one scanned decides.
fn resolve_axis(body: &mut PhysicsBody, axis: Axis, world: &TileWorld) {
    let delta = match axis {
        Axis::Horizontal => body.vx,
        Axis::Vertical => body.vy,
    };
    if delta == 0.0 {
        return;
    }

    let query = body.rect();
    let mut rect = query;
    for solid in solid_tiles_around(&query, world) {
        if !rect.intersects(&solid.rect) {
            continue;
        }
        match axis {
            Axis::Horizontal if delta > 0.0 => body.x = solid.rect.left() - body.width,
            Axis::Horizontal => body.x = solid.rect.right(),
            Axis::Vertical => {
                body.y = if delta > 0.0 {
                    solid.rect.top() - body.height
                } else {
                    solid.rect.bottom()
                };
                body.vy = 0.0;
            }
        }
        rect = body.rect();
    }
}
