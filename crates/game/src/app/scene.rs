use engine::{DrawList, InputAction, InputEvent, InputSnapshot, PointerButton, Scene, SceneCommand};
use tracing::{debug, info};

use super::presentation::{build_frame, HudState, Viewport};
use crate::sim::{GameConfig, MovementIntent, Recipe, Simulation, TickInput, WorldAction};

/// Simulation time driven only by fixed steps, so a run is reproducible.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct SimClock {
    elapsed_ms: f64,
}

impl SimClock {
    fn advance(&mut self, dt_seconds: f32) -> u64 {
        self.elapsed_ms += f64::from(dt_seconds) * 1_000.0;
        self.now_ms()
    }

    fn now_ms(&self) -> u64 {
        self.elapsed_ms as u64
    }
}

/// One playthrough; rebuilt from scratch on restart.
struct Session {
    sim: Simulation,
    clock: SimClock,
    hud: HudState,
}

pub(crate) struct SurvivalScene {
    config: GameConfig,
    session: Option<Session>,
}

impl SurvivalScene {
    pub(crate) fn new(config: GameConfig) -> Self {
        Self {
            config,
            session: None,
        }
    }

    fn viewport(&self) -> Viewport {
        Viewport {
            width: self.config.screen_width as i32,
            height: self.config.screen_height as i32,
        }
    }
}

impl Scene for SurvivalScene {
    fn load(&mut self) {
        let sim = Simulation::new(self.config.clone());
        info!(
            seed = self.config.seed,
            rows = sim.world().rows(),
            cols = sim.world().cols(),
            "world_generated"
        );
        self.session = Some(Session {
            sim,
            clock: SimClock::default(),
            hud: HudState::default(),
        });
    }

    fn update(&mut self, fixed_dt_seconds: f32, input: &InputSnapshot) -> SceneCommand {
        let Some(session) = self.session.as_mut() else {
            return SceneCommand::None;
        };
        let game_over = session.sim.is_game_over();
        let mut actions = Vec::new();
        let mut jump_pressed = false;

        for event in input.events() {
            match *event {
                InputEvent::Quit => return SceneCommand::Quit,
                InputEvent::Restart if game_over => {
                    info!("restart_requested");
                    return SceneCommand::HardReset;
                }
                _ if game_over => {}
                InputEvent::Jump => jump_pressed = true,
                InputEvent::ToggleMenu => {
                    session.hud.crafting_open = !session.hud.crafting_open;
                    debug!(open = session.hud.crafting_open, "crafting_menu_toggled");
                }
                InputEvent::Digit(digit) if session.hud.crafting_open => {
                    if let Some(recipe) = Recipe::from_digit(digit) {
                        actions.push(WorldAction::Craft(recipe));
                    }
                }
                InputEvent::PointerDown {
                    button,
                    position_px,
                } => {
                    let (screen_x, screen_y) = (position_px.x, position_px.y);
                    match button {
                        PointerButton::Left => {
                            actions.push(WorldAction::Mine { screen_x, screen_y })
                        }
                        PointerButton::Right => {
                            actions.push(WorldAction::Place { screen_x, screen_y })
                        }
                        PointerButton::Middle => {}
                    }
                }
                _ => {}
            }
        }

        if game_over {
            return SceneCommand::None;
        }

        let tick_input = TickInput {
            movement: MovementIntent {
                left: input.is_down(InputAction::MoveLeft),
                right: input.is_down(InputAction::MoveRight),
                jump: jump_pressed || input.is_down(InputAction::Jump),
            },
            actions,
        };
        let now_ms = session.clock.advance(fixed_dt_seconds);
        session.sim.tick(&tick_input, now_ms);
        SceneCommand::None
    }

    fn render(&mut self, frame: &mut DrawList) {
        let viewport = self.viewport();
        if let Some(session) = &self.session {
            build_frame(&session.sim.snapshot(), session.hud, viewport, frame);
        }
    }

    fn unload(&mut self) {
        if let Some(session) = self.session.take() {
            debug!(
                elapsed_ms = session.clock.now_ms(),
                health = session.sim.player().health(),
                "session_ended"
            );
        }
    }

    fn debug_title(&self) -> Option<String> {
        let session = self.session.as_ref()?;
        let phase = session.sim.director().phase().label();
        Some(format!(
            "Tile Survival | {phase} | HP {}",
            session.sim.player().health()
        ))
    }
}
