//! Coordinate and geometry types shared by the canvas implementations.
//!
//! Canonical CPU space:
//! - Logical pixels (density-independent) until a [`Transform`] maps them
//! - Origin top-left
//! - +X right, +Y down, positive angles turn clockwise

mod rect;
mod transform;
mod vec2;
mod viewport;

pub use rect::Rect;
pub use transform::Transform;
pub use vec2::Vec2;
pub use viewport::Viewport;
