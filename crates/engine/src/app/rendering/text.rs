use super::draw::{write_pixel_rgba, Rgba};

const GLYPH_WIDTH: i32 = 3;
const GLYPH_HEIGHT: i32 = 5;

type GlyphRows = [u8; GLYPH_HEIGHT as usize];

const BLANK: GlyphRows = [0, 0, 0, 0, 0];

pub fn text_width_px(text: &str, scale: i32) -> i32 {
    let scale = scale.max(1);
    let count = text.chars().count() as i32;
    if count == 0 {
        return 0;
    }
    count * (GLYPH_WIDTH + 1) * scale - scale
}

pub fn text_height_px(scale: i32) -> i32 {
    GLYPH_HEIGHT * scale.max(1)
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn draw_text_clipped(
    frame: &mut [u8],
    width: u32,
    height: u32,
    mut x: i32,
    y: i32,
    text: &str,
    scale: i32,
    color: Rgba,
) {
    let scale = scale.max(1);
    for ch in text.chars() {
        draw_glyph_clipped(frame, width, height, x, y, glyph_rows(ch), scale, color);
        x = x.saturating_add((GLYPH_WIDTH + 1) * scale);
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_glyph_clipped(
    frame: &mut [u8],
    width: u32,
    height: u32,
    x: i32,
    y: i32,
    rows: GlyphRows,
    scale: i32,
    color: Rgba,
) {
    if width == 0 || height == 0 {
        return;
    }

    let width_i32 = width as i32;
    let height_i32 = height as i32;

    for (row_index, row_bits) in rows.iter().enumerate() {
        let glyph_y = y.saturating_add(row_index as i32 * scale);
        for col in 0..GLYPH_WIDTH {
            if (row_bits & (1 << (GLYPH_WIDTH - 1 - col))) == 0 {
                continue;
            }
            let glyph_x = x.saturating_add(col * scale);
            for sy in 0..scale {
                let pixel_y = glyph_y.saturating_add(sy);
                if pixel_y < 0 || pixel_y >= height_i32 {
                    continue;
                }
                for sx in 0..scale {
                    let pixel_x = glyph_x.saturating_add(sx);
                    if pixel_x < 0 || pixel_x >= width_i32 {
                        continue;
                    }
                    write_pixel_rgba(
                        frame,
                        width as usize,
                        pixel_x as usize,
                        pixel_y as usize,
                        color,
                    );
                }
            }
        }
    }
}

/// 3x5 bitmap for printable ASCII; anything else renders blank.
fn glyph_rows(ch: char) -> GlyphRows {
    match ch {
        '!' => [0b010, 0b010, 0b010, 0b000, 0b010],
        '"' => [0b101, 0b101, 0b000, 0b000, 0b000],
        '#' => [0b101, 0b111, 0b101, 0b111, 0b101],
        '$' => [0b111, 0b110, 0b111, 0b011, 0b111],
        '%' => [0b101, 0b001, 0b010, 0b100, 0b101],
        '&' => [0b010, 0b101, 0b010, 0b101, 0b011],
        '\'' => [0b010, 0b010, 0b000, 0b000, 0b000],
        '(' => [0b001, 0b010, 0b010, 0b010, 0b001],
        ')' => [0b100, 0b010, 0b010, 0b010, 0b100],
        '*' => [0b000, 0b101, 0b010, 0b101, 0b000],
        '+' => [0b000, 0b010, 0b111, 0b010, 0b000],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b010, 0b010, 0b010],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        ';' => [0b000, 0b010, 0b000, 0b010, 0b100],
        '<' => [0b001, 0b010, 0b100, 0b010, 0b001],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        '>' => [0b100, 0b010, 0b001, 0b010, 0b100],
        '?' => [0b111, 0b001, 0b011, 0b000, 0b010],
        '@' => [0b111, 0b101, 0b111, 0b100, 0b111],
        'A' => [0b010, 0b101, 0b111, 0b101, 0b101],
        'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'E' => [0b111, 0b100, 0b110, 0b100, 0b111],
        'F' => [0b111, 0b100, 0b110, 0b100, 0b100],
        'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'J' => [0b111, 0b001, 0b001, 0b101, 0b111],
        'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'M' => [0b101, 0b111, 0b111, 0b101, 0b101],
        'N' => [0b101, 0b111, 0b111, 0b111, 0b101],
        'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'P' => [0b110, 0b101, 0b110, 0b100, 0b100],
        'Q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'V' => [0b101, 0b101, 0b101, 0b101, 0b010],
        'W' => [0b101, 0b101, 0b111, 0b111, 0b101],
        'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'Y' => [0b101, 0b101, 0b010, 0b010, 0b010],
        'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '[' => [0b110, 0b100, 0b100, 0b100, 0b110],
        '\\' => [0b100, 0b100, 0b010, 0b001, 0b001],
        ']' => [0b011, 0b001, 0b001, 0b001, 0b011],
        '^' => [0b010, 0b101, 0b000, 0b000, 0b000],
        '_' => [0b000, 0b000, 0b000, 0b000, 0b111],
        '`' => [0b100, 0b010, 0b000, 0b000, 0b000],
        'a' => [0b000, 0b111, 0b001, 0b111, 0b111],
        'b' => [0b100, 0b100, 0b110, 0b101, 0b110],
        'c' => [0b000, 0b111, 0b100, 0b100, 0b111],
        'd' => [0b001, 0b001, 0b111, 0b101, 0b111],
        'e' => [0b000, 0b111, 0b110, 0b100, 0b111],
        'f' => [0b011, 0b100, 0b110, 0b100, 0b100],
        'g' => [0b000, 0b111, 0b101, 0b111, 0b001],
        'h' => [0b100, 0b100, 0b110, 0b101, 0b101],
        'i' => [0b010, 0b000, 0b010, 0b010, 0b010],
        'j' => [0b001, 0b000, 0b001, 0b101, 0b010],
        'k' => [0b100, 0b101, 0b110, 0b101, 0b101],
        'l' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'm' => [0b000, 0b110, 0b111, 0b101, 0b101],
        'n' => [0b000, 0b110, 0b101, 0b101, 0b101],
        'o' => [0b000, 0b111, 0b101, 0b101, 0b111],
        'p' => [0b000, 0b110, 0b101, 0b110, 0b100],
        'q' => [0b000, 0b111, 0b101, 0b111, 0b001],
        'r' => [0b000, 0b110, 0b101, 0b100, 0b100],
        's' => [0b000, 0b111, 0b110, 0b001, 0b111],
        't' => [0b010, 0b111, 0b010, 0b010, 0b011],
        'u' => [0b000, 0b101, 0b101, 0b101, 0b111],
        'v' => [0b000, 0b101, 0b101, 0b101, 0b010],
        'w' => [0b000, 0b101, 0b101, 0b111, 0b010],
        'x' => [0b000, 0b101, 0b010, 0b010, 0b101],
        'y' => [0b000, 0b101, 0b101, 0b111, 0b001],
        'z' => [0b000, 0b111, 0b001, 0b010, 0b111],
        '{' => [0b011, 0b010, 0b110, 0b010, 0b011],
        '|' => [0b010, 0b010, 0b010, 0b010, 0b010],
        '}' => [0b110, 0b010, 0b011, 0b010, 0b110],
        '~' => [0b000, 0b011, 0b110, 0b000, 0b000],
        _ => BLANK,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgba = [255, 255, 255, 255];

    #[test]
    fn every_printable_letter_and_digit_has_ink() {
        for ch in ('A'..='Z').chain('a'..='z').chain('0'..='9') {
            assert_ne!(glyph_rows(ch), BLANK, "glyph for {ch:?} is blank");
        }
    }

    #[test]
    fn unknown_characters_render_blank() {
        assert_eq!(glyph_rows(' '), BLANK);
        assert_eq!(glyph_rows('é'), BLANK);
    }

    #[test]
    fn negative_origin_is_clipped_safely() {
        let mut frame = vec![0u8; 8 * 8 * 4];
        draw_text_clipped(&mut frame, 8, 8, -2, -2, "HP", 2, WHITE);
        assert_eq!(frame.len(), 8 * 8 * 4);
    }

    #[test]
    fn text_beyond_bounds_writes_nothing() {
        let mut frame = vec![0u8; 8 * 8 * 4];
        draw_text_clipped(&mut frame, 8, 8, 64, 64, "NIGHT", 3, WHITE);
        assert!(frame.iter().all(|byte| *byte == 0));
    }

    #[test]
    fn tiny_frames_never_panic() {
        let mut one = vec![0u8; 4];
        draw_text_clipped(&mut one, 1, 1, -10, -10, "Wood", 3, WHITE);
        let mut empty = Vec::new();
        draw_text_clipped(&mut empty, 0, 8, 0, 0, "Stone", 3, WHITE);
    }

    #[test]
    fn scaled_glyph_fills_scale_squared_block() {
        let mut frame = vec![0u8; 16 * 16 * 4];
        draw_text_clipped(&mut frame, 16, 16, 0, 0, "I", 2, WHITE);
        let lit = frame.chunks_exact(4).filter(|p| *p == WHITE).count();
        // 'I' has 9 lit cells: 3 + 1 + 1 + 1 + 3.
        assert_eq!(lit, 9 * 4);
    }

    #[test]
    fn width_accounts_for_spacing_between_glyphs() {
        assert_eq!(text_width_px("", 2), 0);
        assert_eq!(text_width_px("A", 2), 6);
        assert_eq!(text_width_px("AB", 2), 14);
        assert_eq!(text_height_px(3), 15);
    }
}
