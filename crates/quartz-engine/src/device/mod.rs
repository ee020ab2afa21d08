//! GPU device + window surface management.
//!
//! Used only to put rasterized pixmaps on screen:
//! - creating the wgpu Instance/Adapter/Device/Queue
//! - creating & configuring the window Surface (swapchain)
//! - acquiring frames and providing encoders/views for presentation

mod gpu;
mod init;

pub use gpu::{Gpu, GpuFrame, SurfaceErrorAction};
pub use init::GpuInit;
