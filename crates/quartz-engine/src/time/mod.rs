//! Frame timing.
//!
//! The runtime ticks one [`FrameClock`] per window and hands the resulting
//! [`FrameTime`] to the application each redraw.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
