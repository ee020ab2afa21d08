//! Quartz engine crate.
//!
//! Owns the drawing substrate the clock widget paints through: the immediate-mode
//! [`canvas::Canvas2d`] port, a recording and a rasterizing implementation of it,
//! and the platform + GPU runtime used to put rasterized surfaces on screen.

pub mod canvas;
pub mod coords;
pub mod paint;
pub mod raster;
pub mod scene;
pub mod text;

pub mod core;
pub mod device;
pub mod logging;
pub mod render;
pub mod time;
pub mod window;
