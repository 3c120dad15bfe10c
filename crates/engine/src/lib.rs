pub mod app;

pub use app::{
    run_app, text_height_px, text_width_px, AppError, DrawCommand, DrawList, InputAction,
    InputEvent, InputSnapshot, LoopConfig, LoopMetricsSnapshot, PointerButton, RendererError,
    Rgba, Scene, SceneCommand, Vec2,
};
