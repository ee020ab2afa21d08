//! CPU rasterization backend for [`Canvas2d`](crate::canvas::Canvas2d).
//!
//! Pixels are RGBA8, premultiplied, row-major, top-left origin. Anti-aliasing
//! is analytic: each shape computes a coverage value from the signed distance
//! between the pixel center and its edge, so no supersampling is needed.

mod canvas;
mod coverage;
mod pixmap;

pub use canvas::PixelCanvas;
pub use pixmap::{Pixmap, MAX_AREA};
