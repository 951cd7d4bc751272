use crate::palette::Rgb;
use crate::render::Canvas;
use ratatui::style::Color;

/// Braille character rendering for high-resolution terminal graphics.
/// Each Braille character represents a 2x4 grid of dots (8 dots total).
///
/// Dot positions and their bit values:
/// ```text
/// (0,0)=0x01  (1,0)=0x08
/// (0,1)=0x02  (1,1)=0x10
/// (0,2)=0x04  (1,2)=0x20
/// (0,3)=0x40  (1,3)=0x80
/// ```
///
/// Unicode Braille patterns: U+2800 to U+28FF (256 patterns)
const BRAILLE_BASE: u32 = 0x2800;

/// Dot position to bit mapping for Braille characters
const BRAILLE_DOTS: [[u8; 4]; 2] = [
    [0x01, 0x02, 0x04, 0x40], // Left column (x=0): rows 0,1,2,3
    [0x08, 0x10, 0x20, 0x80], // Right column (x=1): rows 0,1,2,3
];

/// Pixels dimmer than this leave their dot unset. The 8-bit fade stalls
/// below channel value 26, so faded residue never reaches it.
const LIT_THRESHOLD: f32 = 28.0;

/// A single rendered Braille cell with position and color
#[derive(Clone, Copy)]
pub struct BrailleCell {
    pub x: u16,
    pub y: u16,
    pub char: char,
    pub color: Color,
}

impl From<Rgb> for Color {
    fn from(c: Rgb) -> Self {
        Color::Rgb(c.r, c.g, c.b)
    }
}

/// Square viewport of the canvas inside a terminal area, in braille dots
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Canvas pixels per dot
    pub pixels_per_dot: f64,
    /// Dot offset that centres the canvas horizontally / vertically
    pub offset_x: usize,
    pub offset_y: usize,
}

/// Fit the whole canvas into the dot grid of `cols x rows` terminal cells
pub fn fit_viewport(canvas: &Canvas, cols: u16, rows: u16) -> Viewport {
    let dots_w = (cols as usize * 2).max(1);
    let dots_h = (rows as usize * 4).max(1);
    let pixels_per_dot = (canvas.width() as f64 / dots_w as f64)
        .max(canvas.height() as f64 / dots_h as f64);
    let used_w = (canvas.width() as f64 / pixels_per_dot).floor() as usize;
    let used_h = (canvas.height() as f64 / pixels_per_dot).floor() as usize;
    Viewport {
        pixels_per_dot,
        offset_x: dots_w.saturating_sub(used_w) / 2,
        offset_y: dots_h.saturating_sub(used_h) / 2,
    }
}

/// Brightest pixel in the canvas block covered by a dot
fn brightest_in_dot(canvas: &Canvas, viewport: &Viewport, dot_x: usize, dot_y: usize) -> Option<Rgb> {
    if dot_x < viewport.offset_x || dot_y < viewport.offset_y {
        return None;
    }
    let scale = viewport.pixels_per_dot;
    let local_x = (dot_x - viewport.offset_x) as f64;
    let local_y = (dot_y - viewport.offset_y) as f64;

    let x0 = (local_x * scale) as u32;
    let y0 = (local_y * scale) as u32;
    if x0 >= canvas.width() || y0 >= canvas.height() {
        return None;
    }
    let x1 = (((local_x + 1.0) * scale) as u32).clamp(x0 + 1, canvas.width());
    let y1 = (((local_y + 1.0) * scale) as u32).clamp(y0 + 1, canvas.height());

    let mut best: Option<(f32, Rgb)> = None;
    for y in y0..y1 {
        for x in x0..x1 {
            let pixel = canvas.pixel(x, y);
            let lum = pixel.luminance();
            if lum > LIT_THRESHOLD && best.map_or(true, |(b, _)| lum > b) {
                best = Some((lum, pixel));
            }
        }
    }
    best.map(|(_, color)| color)
}

/// Render the canvas to Braille characters, keeping its square aspect
pub fn render_to_braille(canvas: &Canvas, canvas_width: u16, canvas_height: u16) -> Vec<BrailleCell> {
    let viewport = fit_viewport(canvas, canvas_width, canvas_height);
    let mut cells = Vec::with_capacity(canvas_width as usize * canvas_height as usize);

    for cy in 0..canvas_height {
        for cx in 0..canvas_width {
            let mut pattern: u8 = 0;
            let mut brightest: Option<Rgb> = None;

            // Sample the 2x4 dots for this Braille character
            let base_bx = cx as usize * 2;
            let base_by = cy as usize * 4;

            for dx in 0..2 {
                for dy in 0..4 {
                    if let Some(color) = brightest_in_dot(canvas, &viewport, base_bx + dx, base_by + dy) {
                        pattern |= BRAILLE_DOTS[dx][dy];
                        if brightest.map_or(true, |b| color.luminance() > b.luminance()) {
                            brightest = Some(color);
                        }
                    }
                }
            }

            // Only emit cells that have at least one dot
            if let Some(color) = brightest {
                let braille_char = char::from_u32(BRAILLE_BASE + pattern as u32).unwrap_or(' ');
                cells.push(BrailleCell {
                    x: cx,
                    y: cy,
                    char: braille_char,
                    color: color.into(),
                });
            }
        }
    }

    cells
}
