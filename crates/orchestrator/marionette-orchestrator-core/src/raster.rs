//! RGBA8 software raster target.
//!
//! Shapes are filled at pixel centres with source-over blending; there is no
//! anti-aliasing. Text uses a built-in 3x5 bitmap font covering A-Z and 0-9.

use crate::surface::{segment_quad, Color, DrawSurface};
use marionette_api_core::Vec2;

#[derive(Clone, Debug)]
pub struct RasterTarget {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl RasterTarget {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 4],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major RGBA8, top row first.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let mut px = [0; 4];
        px.copy_from_slice(&self.pixels[i..i + 4]);
        Some(px)
    }

    fn blend(&mut self, x: i64, y: i64, color: Color) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let dst = &mut self.pixels[i..i + 4];
        let a = color.a as u32;
        if a == 255 {
            dst.copy_from_slice(&color.to_array());
            return;
        }
        let inv = 255 - a;
        for (d, s) in dst.iter_mut().zip([color.r, color.g, color.b]) {
            *d = ((s as u32 * a + *d as u32 * inv + 127) / 255) as u8;
        }
        dst[3] = (a + (dst[3] as u32 * inv + 127) / 255).min(255) as u8;
    }

    /// Fill pixel centres `x + 0.5` in `[x0, x1]` on row `y`.
    fn span(&mut self, y: i64, x0: f32, x1: f32, color: Color) {
        let start = (x0 - 0.5).ceil().max(0.0) as i64;
        let end = (x1 - 0.5).floor().min(self.width as f32 - 1.0) as i64;
        for x in start..=end {
            self.blend(x, y, color);
        }
    }

    fn rows(&self, min_y: f32, max_y: f32) -> std::ops::RangeInclusive<i64> {
        let first = (min_y - 0.5).ceil().max(0.0) as i64;
        let last = (max_y - 0.5).floor().min(self.height as f32 - 1.0) as i64;
        first..=last
    }
}

impl DrawSurface for RasterTarget {
    fn clear(&mut self, color: Color) {
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&color.to_array());
        }
    }

    /// Even-odd scanline fill.
    fn fill_polygon(&mut self, points: &[Vec2], color: Color) {
        if points.len() < 3 || points.iter().any(|p| !p.is_finite()) {
            return;
        }
        let min_y = points.iter().map(|p| p.y).fold(f32::INFINITY, f32::min);
        let max_y = points.iter().map(|p| p.y).fold(f32::NEG_INFINITY, f32::max);
        let mut crossings = Vec::with_capacity(points.len());
        for y in self.rows(min_y, max_y) {
            let sy = y as f32 + 0.5;
            crossings.clear();
            for (i, a) in points.iter().enumerate() {
                let b = points[(i + 1) % points.len()];
                if (a.y <= sy) != (b.y <= sy) {
                    crossings.push(a.x + (sy - a.y) / (b.y - a.y) * (b.x - a.x));
                }
            }
            crossings.sort_by(f32::total_cmp);
            for pair in crossings.chunks_exact(2) {
                self.span(y, pair[0], pair[1], color);
            }
        }
    }

    fn line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color) {
        if let Some(quad) = segment_quad(from, to, width.max(1.0)) {
            self.fill_polygon(&quad, color);
        }
    }

    fn ellipse(&mut self, center: Vec2, radii: Vec2, color: Color) {
        if !center.is_finite() || !(radii.x > 0.0 && radii.y > 0.0) {
            return;
        }
        for y in self.rows(center.y - radii.y, center.y + radii.y) {
            let dy = (y as f32 + 0.5 - center.y) / radii.y;
            if dy.abs() > 1.0 {
                continue;
            }
            let half = radii.x * (1.0 - dy * dy).sqrt();
            self.span(y, center.x - half, center.x + half, color);
        }
    }

    fn text(&mut self, position: Vec2, text: &str, size: f32, color: Color) {
        if !position.is_finite() || !(size > 0.0) {
            return;
        }
        let cell = (size / 5.0).max(1.0);
        let mut pen = position;
        for c in text.chars() {
            if let Some(rows) = glyph(c) {
                for (row, bits) in rows.iter().enumerate() {
                    for col in 0..3 {
                        if bits & (0b100 >> col) == 0 {
                            continue;
                        }
                        let x = pen.x + col as f32 * cell;
                        let y = pen.y + row as f32 * cell;
                        let quad = [
                            Vec2::new(x, y),
                            Vec2::new(x + cell, y),
                            Vec2::new(x + cell, y + cell),
                            Vec2::new(x, y + cell),
                        ];
                        self.fill_polygon(&quad, color);
                    }
                }
            }
            pen.x += 4.0 * cell;
        }
    }
}

/// Rows top to bottom, three bits each (0b100 is the left column).
fn glyph(c: char) -> Option<[u8; 5]> {
    let rows = match c.to_ascii_uppercase() {
        'A' => [2, 5, 7, 5, 5],
        'B' => [6, 5, 6, 5, 6],
        'C' => [3, 4, 4, 4, 3],
        'D' => [6, 5, 5, 5, 6],
        'E' => [7, 4, 6, 4, 7],
        'F' => [7, 4, 6, 4, 4],
        'G' => [3, 4, 5, 5, 3],
        'H' => [5, 5, 7, 5, 5],
        'I' => [7, 2, 2, 2, 7],
        'J' => [1, 1, 1, 5, 2],
        'K' => [5, 5, 6, 5, 5],
        'L' => [4, 4, 4, 4, 7],
        'M' => [5, 7, 7, 5, 5],
        'N' => [6, 5, 5, 5, 5],
        'O' => [2, 5, 5, 5, 2],
        'P' => [6, 5, 6, 4, 4],
        'Q' => [2, 5, 5, 6, 3],
        'R' => [6, 5, 6, 5, 5],
        'S' => [3, 4, 2, 1, 6],
        'T' => [7, 2, 2, 2, 2],
        'U' => [5, 5, 5, 5, 7],
        'V' => [5, 5, 5, 5, 2],
        'W' => [5, 5, 7, 7, 5],
        'X' => [5, 5, 2, 5, 5],
        'Y' => [5, 5, 2, 2, 2],
        'Z' => [7, 1, 2, 4, 7],
        '0' => [7, 5, 5, 5, 7],
        '1' => [2, 6, 2, 2, 7],
        '2' => [6, 1, 2, 4, 7],
        '3' => [6, 1, 2, 1, 6],
        '4' => [5, 5, 7, 1, 1],
        '5' => [7, 4, 6, 1, 6],
        '6' => [3, 4, 7, 5, 7],
        '7' => [7, 1, 2, 2, 2],
        '8' => [7, 5, 7, 5, 7],
        '9' => [7, 5, 7, 1, 6],
        _ => return None,
    };
    Some(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Color = Color::rgb(255, 0, 0);

    #[test]
    fn polygon_fills_pixel_centres() {
        let mut target = RasterTarget::new(8, 8);
        target.clear(Color::rgb(0, 0, 0));
        let square = [
            Vec2::new(2.0, 2.0),
            Vec2::new(6.0, 2.0),
            Vec2::new(6.0, 6.0),
            Vec2::new(2.0, 6.0),
        ];
        target.fill_polygon(&square, RED);
        let lit = target
            .pixels()
            .chunks_exact(4)
            .filter(|px| px[0] == 255)
            .count();
        assert_eq!(lit, 16);
        assert_eq!(target.pixel(2, 2), Some([255, 0, 0, 255]));
        assert_eq!(target.pixel(6, 6), Some([0, 0, 0, 255]));
    }

    #[test]
    fn shapes_are_clipped_to_the_canvas() {
        let mut target = RasterTarget::new(4, 4);
        target.ellipse(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0), RED);
        target.line(Vec2::new(-5.0, 1.5), Vec2::new(20.0, 1.5), 1.0, RED);
        assert_eq!(target.pixel(3, 3), Some([255, 0, 0, 255]));
        assert_eq!(target.pixels().len(), 64);
    }

    #[test]
    fn half_alpha_blends() {
        let mut target = RasterTarget::new(1, 1);
        target.clear(Color::rgb(0, 0, 255));
        target.ellipse(Vec2::new(0.5, 0.5), Vec2::new(1.0, 1.0), Color::rgba(255, 0, 0, 128));
        let px = target.pixel(0, 0).unwrap();
        assert!(px[0] > 120 && px[0] < 135);
        assert!(px[2] > 120 && px[2] < 135);
        assert_eq!(px[3], 255);
    }

    #[test]
    fn text_draws_known_glyphs() {
        let mut target = RasterTarget::new(20, 10);
        target.text(Vec2::new(0.0, 0.0), "X", 5.0, RED);
        // X: corners set, centre of the top row clear.
        assert_eq!(target.pixel(0, 0), Some([255, 0, 0, 255]));
        assert_eq!(target.pixel(1, 0), Some([0, 0, 0, 0]));
        assert_eq!(target.pixel(1, 2), Some([255, 0, 0, 255]));
        let before = target.pixels().to_vec();
        target.text(Vec2::new(10.0, 0.0), "~", 5.0, RED);
        assert_eq!(target.pixels(), &before[..]);
    }
}
