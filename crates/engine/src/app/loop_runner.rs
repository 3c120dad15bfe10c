use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, info, warn};
use winit::dpi::LogicalSize;
use winit::error::{EventLoopError, OsError};
use winit::event::{ElementState, Event, MouseButton, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::WindowBuilder;

use super::input::ActionStates;
use super::metrics::MetricsAccumulator;
use super::rendering::{Renderer, RendererError};
use super::scene::SceneRuntime;
use super::{
    DrawList, InputAction, InputEvent, InputSnapshot, PointerButton, Scene, SceneCommand, Vec2,
};

#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub window_title: String,
    /// Framebuffer size; the window opens at this logical size and scales it.
    pub window_width: u32,
    pub window_height: u32,
    pub target_tps: u32,
    pub max_frame_delta: Duration,
    pub max_ticks_per_frame: u32,
    pub metrics_log_interval: Duration,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            window_title: "Survival".to_string(),
            window_width: 960,
            window_height: 540,
            target_tps: 60,
            max_frame_delta: Duration::from_millis(250),
            max_ticks_per_frame: 5,
            metrics_log_interval: Duration::from_secs(5),
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to create event loop: {0}")]
    CreateEventLoop(#[source] EventLoopError),
    #[error("failed to create application window: {0}")]
    CreateWindow(#[source] OsError),
    #[error("failed to initialize renderer: {0}")]
    CreateRenderer(#[source] RendererError),
    #[error("event loop failed: {0}")]
    EventLoopRun(#[source] EventLoopError),
}

pub fn run_app(config: LoopConfig, scene: Box<dyn Scene>) -> Result<(), AppError> {
    let mut runtime = SceneRuntime::new(scene);

    let event_loop = EventLoop::new().map_err(AppError::CreateEventLoop)?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(config.window_title.clone())
            .with_inner_size(LogicalSize::new(
                config.window_width as f64,
                config.window_height as f64,
            ))
            .build(&event_loop)
            .map_err(AppError::CreateWindow)?,
    );
    let mut renderer = Renderer::new(
        Arc::clone(&window),
        config.window_width,
        config.window_height,
    )
    .map_err(AppError::CreateRenderer)?;

    event_loop.set_control_flow(ControlFlow::Poll);

    let target_tps = config.target_tps.max(1);
    let max_frame_delta =
        normalize_non_zero_duration(config.max_frame_delta, Duration::from_millis(250));
    let max_ticks_per_frame = config.max_ticks_per_frame.max(1);
    let metrics_log_interval =
        normalize_non_zero_duration(config.metrics_log_interval, Duration::from_secs(5));
    let fixed_dt = Duration::from_secs_f64(1.0 / target_tps as f64);
    let fixed_dt_seconds = fixed_dt.as_secs_f32();

    info!(
        target_tps,
        max_frame_delta_ms = max_frame_delta.as_millis() as u64,
        max_ticks_per_frame,
        framebuffer_width = config.window_width,
        framebuffer_height = config.window_height,
        "loop_config"
    );

    runtime.load();

    let mut input_collector = InputCollector::default();
    let mut draw_list = DrawList::default();
    let mut accumulator = Duration::ZERO;
    let mut last_frame_instant = Instant::now();
    let mut metrics_accumulator = MetricsAccumulator::new(metrics_log_interval);
    let mut last_applied_title: Option<String> = None;

    event_loop
        .run(move |event, window_target| match event {
            Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
                WindowEvent::CloseRequested => {
                    info!(reason = "window_close", "shutdown_requested");
                    window_target.exit();
                }
                WindowEvent::Resized(new_size) => {
                    if let Err(error) = renderer.resize(new_size.width, new_size.height) {
                        warn!(error = %error, "renderer_resize_failed");
                        window_target.exit();
                    }
                }
                WindowEvent::CursorMoved { position, .. } => {
                    match renderer.window_to_buffer_px(position) {
                        Some(cursor) => input_collector.set_cursor_position_px(cursor),
                        None => input_collector.clear_cursor_position(),
                    }
                }
                WindowEvent::CursorLeft { .. } => {
                    input_collector.clear_cursor_position();
                }
                WindowEvent::MouseInput { state, button, .. } => {
                    input_collector.handle_mouse_input(button, state);
                }
                WindowEvent::KeyboardInput { event, .. } => {
                    input_collector.handle_key(event.physical_key, event.state);
                }
                WindowEvent::RedrawRequested => {
                    let now = Instant::now();
                    let raw_frame_dt = now.saturating_duration_since(last_frame_instant);
                    last_frame_instant = now;

                    let clamped_frame_dt = clamp_frame_delta(raw_frame_dt, max_frame_delta);
                    accumulator = accumulator.saturating_add(clamped_frame_dt);

                    let step_plan = plan_sim_steps(accumulator, fixed_dt, max_ticks_per_frame);
                    let mut quit_requested = false;
                    for _ in 0..step_plan.ticks_to_run {
                        let input_snapshot = input_collector.snapshot_for_tick();
                        match runtime.update(fixed_dt_seconds, &input_snapshot) {
                            SceneCommand::None => {}
                            SceneCommand::HardReset => {
                                runtime.hard_reset();
                                info!("scene_reset");
                            }
                            SceneCommand::Quit => {
                                quit_requested = true;
                            }
                        }
                        metrics_accumulator.record_tick();
                        if quit_requested {
                            break;
                        }
                    }
                    accumulator = step_plan.remaining_accumulator;

                    if quit_requested {
                        info!(reason = "scene_quit", "shutdown_requested");
                        window_target.exit();
                        return;
                    }

                    if step_plan.dropped_backlog > Duration::ZERO {
                        metrics_accumulator.record_dropped_backlog(step_plan.dropped_backlog);
                        warn!(
                            dropped_backlog_ms = step_plan.dropped_backlog.as_millis() as u64,
                            max_ticks_per_frame, "sim_clamp_triggered"
                        );
                    }

                    runtime.render(&mut draw_list);
                    if let Err(error) = renderer.render(&draw_list) {
                        warn!(error = %error, "renderer_draw_failed");
                        window_target.exit();
                        return;
                    }

                    let next_title = runtime.debug_title();
                    if next_title != last_applied_title {
                        match &next_title {
                            Some(title) => window.set_title(title),
                            None => window.set_title(&config.window_title),
                        }
                        last_applied_title = next_title;
                    }
                    metrics_accumulator.record_frame(raw_frame_dt);

                    if let Some(snapshot) = metrics_accumulator.maybe_snapshot(now) {
                        info!(
                            fps = snapshot.fps,
                            tps = snapshot.tps,
                            frame_time_ms = snapshot.frame_time_ms,
                            dropped_backlog_ms = snapshot.dropped_backlog_ms,
                            "loop_metrics"
                        );
                    }
                }
                _ => {}
            },
            Event::AboutToWait => {
                window.request_redraw();
            }
            Event::LoopExiting => {
                runtime.shutdown();
                info!("shutdown");
            }
            _ => {}
        })
        .map_err(AppError::EventLoopRun)
}

/// Turns raw window events into the per-tick two-tier snapshot: queued
/// edge events plus the held-action state.
#[derive(Debug, Default)]
struct InputCollector {
    pending_events: Vec<InputEvent>,
    latched_keys: HashSet<KeyCode>,
    latched_buttons: HashSet<PointerButton>,
    action_states: ActionStates,
    cursor_position_px: Option<Vec2>,
}

impl InputCollector {
    fn handle_key(&mut self, key: PhysicalKey, state: ElementState) {
        let PhysicalKey::Code(code) = key else {
            return;
        };
        let is_pressed = state == ElementState::Pressed;
        if let Some(action) = action_for_key(code) {
            self.action_states.set(action, is_pressed);
        }

        if is_pressed {
            // Held keys auto-repeat; only the first press counts.
            if self.latched_keys.insert(code) {
                if let Some(event) = event_for_key(code) {
                    self.pending_events.push(event);
                }
            }
        } else {
            self.latched_keys.remove(&code);
        }
    }

    fn handle_mouse_input(&mut self, button: MouseButton, state: ElementState) {
        let Some(button) = pointer_button(button) else {
            return;
        };
        match state {
            ElementState::Pressed => {
                if !self.latched_buttons.insert(button) {
                    return;
                }
                match self.cursor_position_px {
                    Some(position_px) => self.pending_events.push(InputEvent::PointerDown {
                        button,
                        position_px,
                    }),
                    None => debug!(button = button.id(), "pointer_down_without_cursor"),
                }
            }
            ElementState::Released => {
                self.latched_buttons.remove(&button);
            }
        }
    }

    fn set_cursor_position_px(&mut self, cursor: Vec2) {
        self.cursor_position_px = Some(cursor);
    }

    fn clear_cursor_position(&mut self) {
        self.cursor_position_px = None;
    }

    fn snapshot_for_tick(&mut self) -> InputSnapshot {
        InputSnapshot::new(
            std::mem::take(&mut self.pending_events),
            self.action_states,
            self.cursor_position_px,
        )
    }
}

fn action_for_key(code: KeyCode) -> Option<InputAction> {
    match code {
        KeyCode::KeyA | KeyCode::ArrowLeft => Some(InputAction::MoveLeft),
        KeyCode::KeyD | KeyCode::ArrowRight => Some(InputAction::MoveRight),
        KeyCode::Space | KeyCode::KeyW | KeyCode::ArrowUp => Some(InputAction::Jump),
        _ => None,
    }
}

fn event_for_key(code: KeyCode) -> Option<InputEvent> {
    let event = match code {
        KeyCode::Escape => InputEvent::Quit,
        KeyCode::KeyR => InputEvent::Restart,
        KeyCode::KeyE => InputEvent::ToggleMenu,
        KeyCode::Digit1 => InputEvent::Digit(1),
        KeyCode::Digit2 => InputEvent::Digit(2),
        KeyCode::Space | KeyCode::KeyW | KeyCode::ArrowUp => InputEvent::Jump,
        _ => return None,
    };
    Some(event)
}

fn pointer_button(button: MouseButton) -> Option<PointerButton> {
    match button {
        MouseButton::Left => Some(PointerButton::Left),
        MouseButton::Middle => Some(PointerButton::Middle),
        MouseButton::Right => Some(PointerButton::Right),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy)]
struct StepPlan {
    ticks_to_run: u32,
    remaining_accumulator: Duration,
    dropped_backlog: Duration,
}

fn plan_sim_steps(
    mut accumulator: Duration,
    fixed_dt: Duration,
    max_ticks_per_frame: u32,
) -> StepPlan {
    let mut ticks_to_run = 0u32;

    while accumulator >= fixed_dt && ticks_to_run < max_ticks_per_frame {
        accumulator = accumulator.saturating_sub(fixed_dt);
        ticks_to_run = ticks_to_run.saturating_add(1);
    }

    let dropped_backlog = if accumulator >= fixed_dt {
        std::mem::replace(&mut accumulator, Duration::ZERO)
    } else {
        Duration::ZERO
    };

    StepPlan {
        ticks_to_run,
        remaining_accumulator: accumulator,
        dropped_backlog,
    }
}

fn clamp_frame_delta(frame_dt: Duration, max_frame_delta: Duration) -> Duration {
    frame_dt.min(max_frame_delta)
}

fn normalize_non_zero_duration(value: Duration, fallback: Duration) -> Duration {
    if value.is_zero() {
        fallback
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(input: &mut InputCollector, code: KeyCode) {
        input.handle_key(PhysicalKey::Code(code), ElementState::Pressed);
    }

    fn release(input: &mut InputCollector, code: KeyCode) {
        input.handle_key(PhysicalKey::Code(code), ElementState::Released);
    }

    #[test]
    fn clamp_frame_delta_caps_large_frame() {
        let max_frame_delta = Duration::from_millis(250);
        assert_eq!(
            clamp_frame_delta(Duration::from_millis(600), max_frame_delta),
            max_frame_delta
        );
    }

    #[test]
    fn plan_sim_steps_runs_expected_ticks_without_drop() {
        let result = plan_sim_steps(Duration::from_millis(48), Duration::from_millis(16), 5);

        assert_eq!(result.ticks_to_run, 3);
        assert_eq!(result.remaining_accumulator, Duration::ZERO);
        assert_eq!(result.dropped_backlog, Duration::ZERO);
    }

    #[test]
    fn plan_sim_steps_keeps_partial_tick_remainder() {
        let result = plan_sim_steps(Duration::from_millis(40), Duration::from_millis(16), 5);

        assert_eq!(result.ticks_to_run, 2);
        assert_eq!(result.remaining_accumulator, Duration::from_millis(8));
    }

    #[test]
    fn plan_sim_steps_drops_backlog_when_tick_cap_hit() {
        let result = plan_sim_steps(Duration::from_millis(120), Duration::from_millis(16), 3);

        assert_eq!(result.ticks_to_run, 3);
        assert_eq!(result.remaining_accumulator, Duration::ZERO);
        assert_eq!(result.dropped_backlog, Duration::from_millis(72));
    }

    #[test]
    fn key_press_event_is_delivered_for_single_tick() {
        let mut input = InputCollector::default();
        press(&mut input, KeyCode::KeyE);

        let first = input.snapshot_for_tick();
        let second = input.snapshot_for_tick();

        assert_eq!(first.events(), &[InputEvent::ToggleMenu]);
        assert!(second.events().is_empty());
    }

    #[test]
    fn held_key_does_not_repeat_events() {
        let mut input = InputCollector::default();

        press(&mut input, KeyCode::Digit1);
        let first = input.snapshot_for_tick();
        press(&mut input, KeyCode::Digit1);
        let second = input.snapshot_for_tick();
        release(&mut input, KeyCode::Digit1);
        press(&mut input, KeyCode::Digit1);
        let third = input.snapshot_for_tick();

        assert_eq!(first.events(), &[InputEvent::Digit(1)]);
        assert!(second.events().is_empty());
        assert_eq!(third.events(), &[InputEvent::Digit(1)]);
    }

    #[test]
    fn events_between_ticks_are_queued_in_order() {
        let mut input = InputCollector::default();
        press(&mut input, KeyCode::KeyE);
        press(&mut input, KeyCode::Digit2);
        press(&mut input, KeyCode::Escape);

        let snapshot = input.snapshot_for_tick();
        assert_eq!(
            snapshot.events(),
            &[
                InputEvent::ToggleMenu,
                InputEvent::Digit(2),
                InputEvent::Quit
            ]
        );
    }

    #[test]
    fn movement_keys_are_level_triggered() {
        let mut input = InputCollector::default();
        press(&mut input, KeyCode::KeyA);
        press(&mut input, KeyCode::Space);

        let first = input.snapshot_for_tick();
        let second = input.snapshot_for_tick();

        assert!(first.is_down(InputAction::MoveLeft));
        assert!(first.is_down(InputAction::Jump));
        assert!(second.is_down(InputAction::MoveLeft));
        assert!(second.events().is_empty());
    }

    #[test]
    fn arrow_keys_map_to_movement_actions() {
        let mut input = InputCollector::default();
        press(&mut input, KeyCode::ArrowRight);
        press(&mut input, KeyCode::ArrowUp);

        let snapshot = input.snapshot_for_tick();
        assert!(snapshot.is_down(InputAction::MoveRight));
        assert!(snapshot.is_down(InputAction::Jump));
    }

    #[test]
    fn tapped_jump_survives_until_next_tick() {
        let mut input = InputCollector::default();
        press(&mut input, KeyCode::Space);
        release(&mut input, KeyCode::Space);

        let first = input.snapshot_for_tick();
        assert!(!first.is_down(InputAction::Jump));
        assert_eq!(first.events(), &[InputEvent::Jump]);
        assert!(input.snapshot_for_tick().events().is_empty());
    }

    #[test]
    fn only_recipe_digits_produce_events() {
        let mut input = InputCollector::default();
        press(&mut input, KeyCode::Digit1);
        press(&mut input, KeyCode::Digit3);
        press(&mut input, KeyCode::Digit9);

        assert_eq!(input.snapshot_for_tick().events(), &[InputEvent::Digit(1)]);
    }

    #[test]
    fn key_release_clears_action_state() {
        let mut input = InputCollector::default();
        press(&mut input, KeyCode::KeyD);
        release(&mut input, KeyCode::KeyD);

        assert!(!input.snapshot_for_tick().is_down(InputAction::MoveRight));
    }

    #[test]
    fn pointer_down_carries_button_and_cursor() {
        let mut input = InputCollector::default();
        input.set_cursor_position_px(Vec2 { x: 100.0, y: 200.0 });
        input.handle_mouse_input(MouseButton::Right, ElementState::Pressed);

        let first = input.snapshot_for_tick();
        let second = input.snapshot_for_tick();

        assert_eq!(
            first.events(),
            &[InputEvent::PointerDown {
                button: PointerButton::Right,
                position_px: Vec2 { x: 100.0, y: 200.0 },
            }]
        );
        assert!(second.events().is_empty());
    }

    #[test]
    fn held_mouse_button_does_not_repeat_pointer_down() {
        let mut input = InputCollector::default();
        input.set_cursor_position_px(Vec2 { x: 1.0, y: 1.0 });
        input.handle_mouse_input(MouseButton::Left, ElementState::Pressed);
        let first = input.snapshot_for_tick();
        input.handle_mouse_input(MouseButton::Left, ElementState::Pressed);
        let second = input.snapshot_for_tick();

        assert_eq!(first.events().len(), 1);
        assert!(second.events().is_empty());
    }

    #[test]
    fn pointer_down_without_cursor_is_dropped() {
        let mut input = InputCollector::default();
        input.handle_mouse_input(MouseButton::Left, ElementState::Pressed);

        assert!(input.snapshot_for_tick().events().is_empty());
    }

    #[test]
    fn snapshot_carries_cursor_position() {
        let mut input = InputCollector::default();
        input.set_cursor_position_px(Vec2 { x: 100.0, y: 200.0 });
        let cursor = input
            .snapshot_for_tick()
            .cursor_position_px()
            .expect("cursor");
        assert!((cursor.x - 100.0).abs() < 0.0001);
        assert!((cursor.y - 200.0).abs() < 0.0001);

        input.clear_cursor_position();
        assert!(input.snapshot_for_tick().cursor_position_px().is_none());
    }
}
