use crate::error::ArtError;
use crate::palette::Rgb;
use crate::particle::Segment;
use image::{ImageBuffer, Rgb as Pixel, RgbImage};
use std::path::Path;

/// Default per-frame fade alpha (0-255) painted over the whole canvas
pub const DEFAULT_FADE: u8 = 5;

fn blend_channel(dst: u8, src: u8, opacity: f64) -> u8 {
    (src as f64 * opacity + dst as f64 * (1.0 - opacity))
        .round()
        .clamp(0.0, 255.0) as u8
}

/// Raster target for the draw-call stream.
///
/// Starts black. Each frame the caller fades the canvas, then draws that
/// frame's segments in emission order.
pub struct Canvas {
    image: RgbImage,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: ImageBuffer::from_pixel(width, height, Pixel([0, 0, 0])),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Reset to solid black
    pub fn clear(&mut self) {
        for pixel in self.image.pixels_mut() {
            *pixel = Pixel([0, 0, 0]);
        }
    }

    /// Composite black at `alpha / 255` over every pixel
    pub fn fade(&mut self, alpha: u8) {
        if alpha == 0 {
            return;
        }
        let opacity = alpha as f64 / 255.0;
        for pixel in self.image.pixels_mut() {
            for c in pixel.0.iter_mut() {
                *c = blend_channel(*c, 0, opacity);
            }
        }
    }

    fn blend_pixel(&mut self, x: i64, y: i64, color: Rgb, opacity: f64) {
        if x < 0 || y < 0 || x >= self.width() as i64 || y >= self.height() as i64 {
            return;
        }
        let pixel = self.image.get_pixel_mut(x as u32, y as u32);
        let [r, g, b] = pixel.0;
        pixel.0 = [
            blend_channel(r, color.r, opacity),
            blend_channel(g, color.g, opacity),
            blend_channel(b, color.b, opacity),
        ];
    }

    /// 1-pixel Bresenham stroke; every covered pixel is blended once
    pub fn draw_segment(&mut self, segment: &Segment) {
        let opacity = segment.opacity();
        if opacity <= 0.0 {
            return;
        }

        let mut x0 = segment.from.x.floor() as i64;
        let mut y0 = segment.from.y.floor() as i64;
        let x1 = segment.to.x.floor() as i64;
        let y1 = segment.to.y.floor() as i64;

        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.blend_pixel(x0, y0, segment.color, opacity);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    /// Fade once, then draw one frame's segments
    pub fn paint_frame(&mut self, segments: &[Segment], fade: u8) {
        self.fade(fade);
        for segment in segments {
            self.draw_segment(segment);
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgb {
        let [r, g, b] = self.image.get_pixel(x, y).0;
        Rgb::new(r, g, b)
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn save_png(&self, path: &Path) -> Result<(), ArtError> {
        self.image
            .save_with_format(path, image::ImageFormat::Png)
            .map_err(ArtError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;

    fn segment(from: (f64, f64), to: (f64, f64), alpha: f64) -> Segment {
        Segment {
            from: DVec2::new(from.0, from.1),
            to: DVec2::new(to.0, to.1),
            color: Rgb::new(255, 0, 110),
            alpha,
        }
    }

    #[test]
    fn test_new_canvas_is_black() {
        let canvas = Canvas::new(8, 8);
        assert_eq!(canvas.pixel(3, 3), Rgb::new(0, 0, 0));
    }

    #[test]
    fn test_opaque_segment_paints_color() {
        let mut canvas = Canvas::new(16, 16);
        canvas.draw_segment(&segment((2.0, 2.0), (6.0, 2.0), 255.0));
        for x in 2..=6 {
            assert_eq!(canvas.pixel(x, 2), Rgb::new(255, 0, 110));
        }
        assert_eq!(canvas.pixel(7, 2), Rgb::new(0, 0, 0));
    }

    #[test]
    fn test_translucent_segment_blends() {
        let mut canvas = Canvas::new(8, 8);
        canvas.draw_segment(&segment((1.0, 1.0), (1.0, 1.0), 127.5));
        assert_eq!(canvas.pixel(1, 1), Rgb::new(128, 0, 55));
    }

    #[test]
    fn test_diagonal_segment_is_connected() {
        let mut canvas = Canvas::new(16, 16);
        canvas.draw_segment(&segment((0.0, 0.0), (5.5, 5.5), 255.0));
        for i in 0..=5 {
            assert_eq!(canvas.pixel(i, i), Rgb::new(255, 0, 110));
        }
    }

    #[test]
    fn test_off_canvas_pixels_are_skipped() {
        let mut canvas = Canvas::new(4, 4);
        canvas.draw_segment(&segment((-3.0, 1.0), (10.0, 1.0), 255.0));
        assert_eq!(canvas.pixel(0, 1), Rgb::new(255, 0, 110));
        assert_eq!(canvas.pixel(3, 1), Rgb::new(255, 0, 110));
    }

    #[test]
    fn test_fade_darkens() {
        let mut canvas = Canvas::new(4, 4);
        canvas.draw_segment(&segment((0.0, 0.0), (0.0, 0.0), 255.0));
        canvas.fade(128);
        let faded = canvas.pixel(0, 0);
        assert!(faded.r < 255 && faded.r > 0);
        canvas.fade(255);
        assert_eq!(canvas.pixel(0, 0), Rgb::new(0, 0, 0));
    }
}
