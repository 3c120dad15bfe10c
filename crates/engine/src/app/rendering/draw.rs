use super::text::draw_text_clipped;

pub type Rgba = [u8; 4];

/// One primitive emitted by a scene; coordinates are framebuffer pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Rgba),
    FillRect {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        color: Rgba,
    },
    OutlineRect {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        thickness: i32,
        color: Rgba,
    },
    Text {
        x: i32,
        y: i32,
        text: String,
        scale: i32,
        color: Rgba,
    },
    /// Alpha-blended over the whole frame.
    Tint(Rgba),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub(crate) fn clear_commands(&mut self) {
        self.commands.clear();
    }

    pub fn clear(&mut self, color: Rgba) {
        self.commands.push(DrawCommand::Clear(color));
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: Rgba) {
        self.commands.push(DrawCommand::FillRect {
            x,
            y,
            width,
            height,
            color,
        });
    }

    pub fn outline_rect(
        &mut self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        thickness: i32,
        color: Rgba,
    ) {
        self.commands.push(DrawCommand::OutlineRect {
            x,
            y,
            width,
            height,
            thickness,
            color,
        });
    }

    pub fn text(&mut self, x: i32, y: i32, text: impl Into<String>, scale: i32, color: Rgba) {
        self.commands.push(DrawCommand::Text {
            x,
            y,
            text: text.into(),
            scale,
            color,
        });
    }

    pub fn tint(&mut self, color: Rgba) {
        self.commands.push(DrawCommand::Tint(color));
    }
}

pub(crate) fn rasterize(frame: &mut [u8], width: u32, height: u32, commands: &[DrawCommand]) {
    if width == 0 || height == 0 {
        return;
    }

    for command in commands {
        match command {
            DrawCommand::Clear(color) => {
                for chunk in frame.chunks_exact_mut(4) {
                    chunk.copy_from_slice(color);
                }
            }
            DrawCommand::FillRect {
                x,
                y,
                width: rect_width,
                height: rect_height,
                color,
            } => draw_filled_rect(
                frame,
                width,
                height,
                *x,
                *y,
                *rect_width,
                *rect_height,
                *color,
            ),
            DrawCommand::OutlineRect {
                x,
                y,
                width: rect_width,
                height: rect_height,
                thickness,
                color,
            } => draw_rect_outline(
                frame,
                width,
                height,
                *x,
                *y,
                *rect_width,
                *rect_height,
                *thickness,
                *color,
            ),
            DrawCommand::Text {
                x,
                y,
                text,
                scale,
                color,
            } => draw_text_clipped(frame, width, height, *x, *y, text, *scale, *color),
            DrawCommand::Tint(color) => {
                draw_filled_rect(
                    frame,
                    width,
                    height,
                    0,
                    0,
                    width as i32,
                    height as i32,
                    *color,
                );
            }
        }
    }
}

pub(crate) fn write_pixel_rgba(frame: &mut [u8], width: usize, x: usize, y: usize, color: Rgba) {
    let Some(pixel_offset) = y.checked_mul(width).and_then(|row| row.checked_add(x)) else {
        return;
    };
    let Some(byte_offset) = pixel_offset.checked_mul(4) else {
        return;
    };
    let Some(end) = byte_offset.checked_add(4) else {
        return;
    };
    if end > frame.len() {
        return;
    }

    let dst = &mut frame[byte_offset..end];
    match color[3] {
        0 => {}
        255 => dst.copy_from_slice(&color),
        alpha => {
            let alpha = alpha as u16;
            let inv = 255 - alpha;
            for channel in 0..3 {
                let blended = (color[channel] as u16 * alpha + dst[channel] as u16 * inv) / 255;
                dst[channel] = blended as u8;
            }
            dst[3] = 255;
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_filled_rect(
    frame: &mut [u8],
    width: u32,
    height: u32,
    x: i32,
    y: i32,
    rect_width: i32,
    rect_height: i32,
    color: Rgba,
) {
    let start_x = x.max(0);
    let start_y = y.max(0);
    let end_x = x.saturating_add(rect_width).min(width as i32);
    let end_y = y.saturating_add(rect_height).min(height as i32);
    if end_x <= start_x || end_y <= start_y {
        return;
    }

    let width_usize = width as usize;
    for py in start_y..end_y {
        for px in start_x..end_x {
            write_pixel_rgba(frame, width_usize, px as usize, py as usize, color);
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_rect_outline(
    frame: &mut [u8],
    width: u32,
    height: u32,
    x: i32,
    y: i32,
    rect_width: i32,
    rect_height: i32,
    thickness: i32,
    color: Rgba,
) {
    let t = thickness.max(1);
    if rect_width <= t || rect_height <= t {
        draw_filled_rect(frame, width, height, x, y, rect_width, rect_height, color);
        return;
    }
    draw_filled_rect(frame, width, height, x, y, rect_width, t, color);
    draw_filled_rect(
        frame,
        width,
        height,
        x,
        y + rect_height - t,
        rect_width,
        t,
        color,
    );
    draw_filled_rect(frame, width, height, x, y, t, rect_height, color);
    draw_filled_rect(
        frame,
        width,
        height,
        x + rect_width - t,
        y,
        t,
        rect_height,
        color,
    );
}
