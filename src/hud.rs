//! Tiny 3x5 bitmap font for stamping frame statistics onto luma snapshots.

use crate::FrameStats;

pub const GLYPH_WIDTH: usize = 3;
pub const GLYPH_HEIGHT: usize = 5;
pub const GLYPH_SPACING: usize = 1;
pub const LINE_SPACING: usize = 2;

/// A single-channel 8-bit image, row 0 at the top.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LumaImage {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u8>,
}

impl LumaImage {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width * height],
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(y * self.width + x).copied()
    }

    /// Draws `text` with its top-left corner at `(x, y)`, brightening pixels
    /// to at least `value`. Text running off the right edge is cut.
    pub fn overlay_text(&mut self, x: usize, y: usize, text: &str, value: u8) {
        let mut cursor_x = x;
        for ch in text.chars() {
            self.draw_glyph(cursor_x, y, ch, value);
            cursor_x = cursor_x.saturating_add(GLYPH_WIDTH + GLYPH_SPACING);
            if cursor_x >= self.width {
                break;
            }
        }
    }

    fn draw_glyph(&mut self, x: usize, y: usize, ch: char, value: u8) {
        let rows = glyph_rows(ch);
        for (row, bits) in rows.iter().enumerate() {
            for col in 0..GLYPH_WIDTH {
                if bits & (1 << (GLYPH_WIDTH - 1 - col)) == 0 {
                    continue;
                }
                let tx = x + col;
                let ty = y + row;
                if tx >= self.width || ty >= self.height {
                    continue;
                }
                let cell = &mut self.pixels[ty * self.width + tx];
                *cell = (*cell).max(value);
            }
        }
    }
}

/// Writes frame number, step size, total dye and peak dye in the top-left
/// corner.
pub fn overlay_stats(image: &mut LumaImage, stats: &FrameStats) {
    let line_height = GLYPH_HEIGHT + LINE_SPACING;
    let lines = [
        format!("F {}", stats.frame),
        format!("DT {:.3}", stats.dt),
        format!("M {:.2}", stats.mass),
        format!("PK {:.2}", stats.peak_density),
    ];
    let mut y = 2;
    for line in &lines {
        image.overlay_text(2, y, line, 255);
        y = y.saturating_add(line_height);
    }
}

fn glyph_rows(ch: char) -> [u8; GLYPH_HEIGHT] {
    match ch {
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
        'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'F' => [0b111, 0b100, 0b110, 0b100, 0b100],
        'M' => [0b101, 0b111, 0b111, 0b101, 0b101],
        'P' => [0b110, 0b101, 0b110, 0b100, 0b100],
        'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        _ => [0b000; GLYPH_HEIGHT],
    }
}
