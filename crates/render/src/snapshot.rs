//! PNG export of a rendered frame.
//!
//! Feature-gated behind `png` (default on) so that embedders with their own
//! presentation layer do not pull in the `image` crate. Export failures are
//! returned to the caller and never touch simulation state.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use flow_studio_core::error::StudioError;
use log::debug;

use crate::raster::RgbaCanvas;

/// Writes the canvas as a PNG image.
///
/// Returns `StudioError::InvalidDimensions` if the canvas dimensions overflow
/// `u32`, or `StudioError::Io` on encode or write failure.
pub fn write_png(canvas: &RgbaCanvas, path: &Path) -> Result<(), StudioError> {
    let w = u32::try_from(canvas.width()).map_err(|_| StudioError::InvalidDimensions)?;
    let h = u32::try_from(canvas.height()).map_err(|_| StudioError::InvalidDimensions)?;
    let img = image::RgbaImage::from_raw(w, h, canvas.data().to_vec())
        .ok_or_else(|| StudioError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path)
        .map_err(|e| StudioError::Io(format!("{}: {e}", path.display())))?;
    debug!("wrote {}x{} frame to {}", w, h, path.display());
    Ok(())
}

/// `flow_field_<timestamp>.png`.
pub fn export_file_name(timestamp: u64) -> String {
    format!("flow_field_{timestamp}.png")
}

/// Seconds since the Unix epoch, or 0 if the clock is before it.
pub fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Writes the canvas into `dir` under a timestamped name and returns the path.
pub fn export_frame(canvas: &RgbaCanvas, dir: &Path) -> Result<PathBuf, StudioError> {
    let path = dir.join(export_file_name(unix_timestamp()));
    write_png(canvas, &path)?;
    Ok(path)
}
