#![deny(unsafe_code)]
//! Frame rendering for flow-studio.
//!
//! Draws the studio background and every particle trail as connected,
//! fading line segments into an [`RgbaCanvas`]. Works against any
//! [`Engine`], so it never sees the swarm's mutable state.

pub mod raster;

#[cfg(feature = "png")]
pub mod snapshot;

use flow_studio_core::color::Srgb;
use flow_studio_core::engine::{Engine, TrailView};
use flow_studio_core::error::StudioError;
use flow_studio_core::surface::Surface;
use glam::DVec2;

pub use raster::RgbaCanvas;

/// Alpha lost per segment, counted back from the newest segment.
pub const FADE_STEP: u8 = 5;
/// Oldest segments never fade below this alpha.
pub const FADE_FLOOR: u8 = 40;
pub const GRID_SPACING: usize = 40;

pub fn background_color() -> Srgb {
    Srgb::from_rgb8(20, 20, 30)
}

pub fn grid_color() -> Srgb {
    Srgb::from_rgb8(30, 30, 40)
}

/// Alpha of the segment `age` steps back from the newest (0 = newest).
pub fn segment_alpha(age: usize) -> u8 {
    let fade = age.saturating_mul(FADE_STEP as usize);
    255usize.saturating_sub(fade).max(FADE_FLOOR as usize) as u8
}

/// Whether the segment `a -> b` is a wraparound jump rather than motion.
///
/// A particle crossing an edge re-enters on the far side; connecting those
/// two points would streak across the whole frame.
pub fn is_wrap_jump(a: DVec2, b: DVec2, surface: &Surface) -> bool {
    let d = (b - a).abs();
    d.x > surface.width() / 2.0 || d.y > surface.height() / 2.0
}

/// Draws one trail, oldest segment first, newest segment brightest.
pub fn draw_trail(canvas: &mut RgbaCanvas, trail: &TrailView<'_>, surface: &Surface) {
    let segments = trail.segment_count();
    let points = trail.points;
    for i in 0..segments {
        let (a, b) = (points[i], points[i + 1]);
        if is_wrap_jump(a, b, surface) {
            continue;
        }
        canvas.draw_line(a, b, trail.color, segment_alpha(segments - 1 - i));
    }
}

/// Renders a full frame: background, grid, then every trail.
///
/// The canvas matches the engine surface, rounded to whole pixels.
pub fn render_frame(engine: &dyn Engine) -> Result<RgbaCanvas, StudioError> {
    let surface = engine.surface();
    let mut canvas = RgbaCanvas::new(
        surface.width().round() as usize,
        surface.height().round() as usize,
        background_color(),
    )?;
    canvas.draw_grid(GRID_SPACING, grid_color());
    for trail in engine.trails() {
        draw_trail(&mut canvas, &trail, &surface);
    }
    Ok(canvas)
}
