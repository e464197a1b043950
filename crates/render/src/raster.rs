//! RGBA8 pixel buffer with alpha-blended line drawing.
//!
//! Always available (no feature gate) so that drivers without the `png`
//! feature can still rasterize a frame and hand the bytes to their own
//! presentation layer.

use flow_studio_core::color::Srgb;
use flow_studio_core::error::StudioError;
use glam::DVec2;

/// Row-major RGBA8 buffer, 4 bytes per pixel, fully opaque.
#[derive(Debug, Clone, PartialEq)]
pub struct RgbaCanvas {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl RgbaCanvas {
    /// Creates a canvas filled with `background`.
    ///
    /// Returns `StudioError::InvalidDimensions` if either dimension is zero
    /// or the byte length overflows `usize`.
    pub fn new(width: usize, height: usize, background: Srgb) -> Result<Self, StudioError> {
        if width == 0 || height == 0 {
            return Err(StudioError::InvalidDimensions);
        }
        let len = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(4))
            .ok_or(StudioError::InvalidDimensions)?;
        let mut canvas = Self {
            width,
            height,
            data: vec![0; len],
        };
        canvas.fill(background);
        Ok(canvas)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// The RGBA bytes at `(x, y)`, if on the canvas.
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y * self.width + x) * 4;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    pub fn fill(&mut self, color: Srgb) {
        let [r, g, b] = color.to_rgb8();
        for px in self.data.chunks_exact_mut(4) {
            px.copy_from_slice(&[r, g, b, 255]);
        }
    }

    /// Opaque one-pixel grid lines every `spacing` pixels, starting at 0.
    pub fn draw_grid(&mut self, spacing: usize, color: Srgb) {
        if spacing == 0 {
            return;
        }
        for x in (0..self.width).step_by(spacing) {
            for y in 0..self.height {
                self.blend(x as i64, y as i64, color, 255);
            }
        }
        for y in (0..self.height).step_by(spacing) {
            for x in 0..self.width {
                self.blend(x as i64, y as i64, color, 255);
            }
        }
    }

    /// Blends `color` over the pixel at `(x, y)` with coverage `alpha`.
    /// Off-canvas coordinates are ignored.
    pub fn blend(&mut self, x: i64, y: i64, color: Srgb, alpha: u8) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let i = (y as usize * self.width + x as usize) * 4;
        let src = color.to_rgb8();
        let a = alpha as u32;
        for c in 0..3 {
            let dst = self.data[i + c] as u32;
            self.data[i + c] = ((src[c] as u32 * a + dst * (255 - a) + 127) / 255) as u8;
        }
    }

    /// One-pixel line from `a` to `b`, both endpoints inclusive.
    ///
    /// The line is clipped to the canvas plus a one-pixel margin first, so
    /// the work is bounded by the canvas size however far off the endpoints
    /// lie.
    pub fn draw_line(&mut self, a: DVec2, b: DVec2, color: Srgb, alpha: u8) {
        if !a.is_finite() || !b.is_finite() {
            return;
        }
        let lo = DVec2::splat(-1.0);
        let hi = DVec2::new(self.width as f64 + 1.0, self.height as f64 + 1.0);
        let Some((a, b)) = clip_segment(a, b, lo, hi) else {
            return;
        };
        let delta = b - a;
        let steps = delta.x.abs().max(delta.y.abs()).ceil().max(1.0) as usize;
        let mut last = None;
        for i in 0..=steps {
            let p = a + delta * (i as f64 / steps as f64);
            let cell = (p.x.floor() as i64, p.y.floor() as i64);
            // Avoid double-blending a pixel the line revisits.
            if last == Some(cell) {
                continue;
            }
            last = Some(cell);
            self.blend(cell.0, cell.1, color, alpha);
        }
    }
}

/// Liang-Barsky clip of `a -> b` against the box `[lo, hi]`.
///
/// Unclipped ends are returned unchanged.
fn clip_segment(a: DVec2, b: DVec2, lo: DVec2, hi: DVec2) -> Option<(DVec2, DVec2)> {
    let d = b - a;
    if !d.is_finite() {
        return None;
    }
    let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
    for (p, q) in [
        (-d.x, a.x - lo.x),
        (d.x, hi.x - a.x),
        (-d.y, a.y - lo.y),
        (d.y, hi.y - a.y),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
        } else {
            let r = q / p;
            if p < 0.0 {
                if r > t1 {
                    return None;
                }
                t0 = t0.max(r);
            } else {
                if r < t0 {
                    return None;
                }
                t1 = t1.min(r);
            }
        }
    }
    let start = if t0 > 0.0 { a + d * t0 } else { a };
    let end = if t1 < 1.0 { a + d * t1 } else { b };
    Some((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn black() -> Srgb {
        Srgb::from_rgb8(0, 0, 0)
    }

    fn white() -> Srgb {
        Srgb::from_rgb8(255, 255, 255)
    }

    #[test]
    fn new_has_correct_length_and_background() {
        let c = RgbaCanvas::new(8, 4, Srgb::from_rgb8(20, 20, 30)).unwrap();
        assert_eq!(c.data().len(), 8 * 4 * 4);
        assert_eq!(c.pixel(7, 3), Some([20, 20, 30, 255]));
    }

    #[test]
    fn new_rejects_zero_and_overflow() {
        assert!(RgbaCanvas::new(0, 4, black()).is_err());
        assert!(RgbaCanvas::new(4, 0, black()).is_err());
        assert!(RgbaCanvas::new(usize::MAX, 2, black()).is_err());
    }

    #[test]
    fn pixel_out_of_bounds_is_none() {
        let c = RgbaCanvas::new(2, 2, black()).unwrap();
        assert!(c.pixel(2, 0).is_none());
        assert!(c.pixel(0, 2).is_none());
    }

    #[test]
    fn full_alpha_blend_replaces_color() {
        let mut c = RgbaCanvas::new(2, 2, black()).unwrap();
        c.blend(1, 1, white(), 255);
        assert_eq!(c.pixel(1, 1), Some([255, 255, 255, 255]));
    }

    #[test]
    fn zero_alpha_blend_is_noop() {
        let mut c = RgbaCanvas::new(2, 2, black()).unwrap();
        c.blend(0, 0, white(), 0);
        assert_eq!(c.pixel(0, 0), Some([0, 0, 0, 255]));
    }

    #[test]
    fn partial_alpha_mixes() {
        let mut c = RgbaCanvas::new(1, 1, black()).unwrap();
        c.blend(0, 0, white(), 128);
        let [r, _, _, a] = c.pixel(0, 0).unwrap();
        assert_eq!(r, 128);
        assert_eq!(a, 255);
    }

    #[test]
    fn blend_off_canvas_is_ignored() {
        let mut c = RgbaCanvas::new(2, 2, black()).unwrap();
        let before = c.clone();
        c.blend(-1, 0, white(), 255);
        c.blend(0, 2, white(), 255);
        assert_eq!(c, before);
    }

    #[test]
    fn grid_lines_land_on_multiples_of_spacing() {
        let mut c = RgbaCanvas::new(100, 100, black()).unwrap();
        c.draw_grid(40, white());
        assert_eq!(c.pixel(40, 7), Some([255, 255, 255, 255]));
        assert_eq!(c.pixel(7, 80), Some([255, 255, 255, 255]));
        assert_eq!(c.pixel(0, 0), Some([255, 255, 255, 255]));
        assert_eq!(c.pixel(41, 41), Some([0, 0, 0, 255]));
    }

    #[test]
    fn zero_spacing_grid_is_noop() {
        let mut c = RgbaCanvas::new(4, 4, black()).unwrap();
        let before = c.clone();
        c.draw_grid(0, white());
        assert_eq!(c, before);
    }

    #[test]
    fn horizontal_line_covers_endpoints() {
        let mut c = RgbaCanvas::new(10, 3, black()).unwrap();
        c.draw_line(DVec2::new(1.5, 1.5), DVec2::new(6.5, 1.5), white(), 255);
        for x in 1..=6 {
            assert_eq!(c.pixel(x, 1), Some([255, 255, 255, 255]), "gap at x={x}");
        }
        assert_eq!(c.pixel(0, 1), Some([0, 0, 0, 255]));
        assert_eq!(c.pixel(7, 1), Some([0, 0, 0, 255]));
    }

    #[test]
    fn diagonal_line_is_connected() {
        let mut c = RgbaCanvas::new(10, 10, black()).unwrap();
        c.draw_line(DVec2::new(0.5, 0.5), DVec2::new(8.5, 8.5), white(), 255);
        for i in 0..=8 {
            assert_eq!(c.pixel(i, i), Some([255, 255, 255, 255]));
        }
    }

    #[test]
    fn line_does_not_double_blend_a_pixel() {
        let mut c = RgbaCanvas::new(4, 4, black()).unwrap();
        c.draw_line(DVec2::new(1.1, 1.1), DVec2::new(1.4, 1.4), white(), 128);
        assert_eq!(c.pixel(1, 1).unwrap()[0], 128);
    }

    #[test]
    fn far_off_endpoints_are_clipped_to_the_canvas() {
        let mut c = RgbaCanvas::new(8, 4, black()).unwrap();
        c.draw_line(DVec2::new(-1e12, 2.5), DVec2::new(1e12, 2.5), white(), 255);
        for x in 0..8 {
            assert_eq!(c.pixel(x, 2), Some([255, 255, 255, 255]), "gap at x = {x}");
        }
        assert_eq!(c.pixel(3, 1), Some([0, 0, 0, 255]));
    }

    #[test]
    fn line_entirely_off_canvas_draws_nothing() {
        let mut c = RgbaCanvas::new(8, 4, black()).unwrap();
        let before = c.clone();
        c.draw_line(DVec2::new(100.0, 100.0), DVec2::new(1e15, 3e15), white(), 255);
        c.draw_line(DVec2::new(-50.0, 2.0), DVec2::new(-3.0, 2.0), white(), 255);
        assert_eq!(c, before);
    }

    #[test]
    fn non_finite_line_is_skipped() {
        let mut c = RgbaCanvas::new(4, 4, black()).unwrap();
        let before = c.clone();
        c.draw_line(DVec2::ZERO, DVec2::new(f64::NAN, 1.0), white(), 255);
        assert_eq!(c, before);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn draw_line_anywhere_keeps_buffer_shape(
                ax in -500.0f64..500.0, ay in -500.0f64..500.0,
                bx in -500.0f64..500.0, by in -500.0f64..500.0,
                alpha in 0u8..=255,
            ) {
                let mut c = RgbaCanvas::new(32, 24, black()).unwrap();
                c.draw_line(DVec2::new(ax, ay), DVec2::new(bx, by), white(), alpha);
                prop_assert_eq!(c.data().len(), 32 * 24 * 4);
                prop_assert!(c.data().chunks(4).all(|px| px[3] == 255));
            }
        }
    }
}
