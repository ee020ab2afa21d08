//! Paint model shared between the clock theme and the canvas implementations.
//!
//! Scope is flat colors only: the clock face has no gradients or patterns.

pub mod color;

pub use color::{Color, ColorParseError};
