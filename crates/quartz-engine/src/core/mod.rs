//! Contracts between the platform runtime and the code that draws into a window.
//!
//! The runtime owns the event loop, the window and the GPU; an [`App`] only sees
//! a per-frame [`FrameCtx`].

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, WindowCtx};
