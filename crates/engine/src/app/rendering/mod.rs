mod draw;
mod renderer;
mod text;

pub use draw::{DrawCommand, DrawList, Rgba};
pub(crate) use renderer::Renderer;
pub use renderer::RendererError;
pub use text::{text_height_px, text_width_px};
