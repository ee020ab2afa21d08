//! Recorded draw stream.
//!
//! A [`DrawList`] is what a [`RecordingCanvas`](crate::canvas::RecordingCanvas)
//! produces: one [`DrawCmd`] per canvas call, in paint order, with geometry
//! already mapped through the transform that was active at the call.

mod cmd;
mod list;

pub use cmd::{CircleCmd, ClearCmd, DrawCmd, DrawKind, LineCmd, TextCmd};
pub use list::DrawList;
