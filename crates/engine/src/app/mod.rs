mod input;
mod loop_runner;
mod metrics;
mod rendering;
mod scene;

pub use input::{InputAction, InputEvent, InputSnapshot, PointerButton};
pub use loop_runner::{run_app, AppError, LoopConfig};
pub use metrics::LoopMetricsSnapshot;
pub use rendering::{text_height_px, text_width_px, DrawCommand, DrawList, RendererError, Rgba};
pub use scene::{Scene, SceneCommand, Vec2};
