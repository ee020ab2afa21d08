//! GPU presentation.
//!
//! All painting happens on the CPU (see [`raster`](crate::raster)); the GPU side
//! only uploads finished pixmaps and composites them onto the window surface.
//!
//! Convention:
//! - layer positions are in physical pixels (top-left origin, +Y down)
//! - the vertex shader converts to NDC using a per-layer uniform

mod ctx;
mod pixmap;

pub use ctx::{RenderCtx, RenderTarget};
pub use pixmap::{PixmapLayer, PixmapRenderer};
