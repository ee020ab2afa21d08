//! Immediate-mode 2D drawing context.
//!
//! [`Canvas2d`] is the port the clock renderer paints through. A host binds it
//! to whatever actually produces pixels; this crate ships two bindings:
//! - [`RecordingCanvas`]: records calls into a [`DrawList`](crate::scene::DrawList)
//! - [`PixelCanvas`](crate::raster::PixelCanvas): rasterizes into a [`Pixmap`](crate::raster::Pixmap)
//!
//! All geometry passed to a canvas is in the coordinate space established by
//! the current transform. Stroke widths, radii and font sizes scale with it.

mod recording;
mod state;

pub use recording::RecordingCanvas;
pub use state::StateStack;

use crate::coords::{Rect, Transform, Vec2};
use crate::paint::Color;

/// Shape drawn at both ends of a stroked line.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum LineCap {
    /// Ends exactly at the endpoints.
    #[default]
    Butt,
    /// Half-disc of radius `width / 2` past each endpoint.
    Round,
    /// Half-square of `width / 2` past each endpoint.
    Square,
}

/// Stroke parameters for lines and circle outlines.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    pub width: f32,
    pub color: Color,
    pub cap: LineCap,
}

impl Stroke {
    #[inline]
    pub fn new(width: f32, color: Color) -> Self {
        Self { width, color, cap: LineCap::Butt }
    }

    #[inline]
    pub fn cap(mut self, cap: LineCap) -> Self {
        self.cap = cap;
        self
    }
}

/// Horizontal placement of text relative to its anchor.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Vertical placement of text relative to its anchor.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum TextBaseline {
    Top,
    Middle,
    #[default]
    Alphabetic,
    Bottom,
}

/// Text painting parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    /// Font size in the current coordinate space.
    pub size: f32,
    pub color: Color,
    pub align: TextAlign,
    pub baseline: TextBaseline,
}

impl TextStyle {
    #[inline]
    pub fn new(size: f32, color: Color) -> Self {
        Self { size, color, align: TextAlign::Left, baseline: TextBaseline::Alphabetic }
    }

    /// Centers the text on its anchor in both axes.
    #[inline]
    pub fn centered(mut self) -> Self {
        self.align = TextAlign::Center;
        self.baseline = TextBaseline::Middle;
        self
    }
}

/// Immediate-mode 2D drawing context.
///
/// Transform handling follows canvas semantics: `translate` and `rotate`
/// post-multiply the current transform, `set_transform` replaces it, and
/// `save`/`restore` push and pop it. An unbalanced `restore` is ignored.
pub trait Canvas2d {
    /// Current transform from drawing coordinates to device pixels.
    fn transform(&self) -> Transform;

    /// Replaces the current transform.
    fn set_transform(&mut self, transform: Transform);

    /// Pushes the current drawing state.
    fn save(&mut self);

    /// Pops the most recently saved drawing state.
    fn restore(&mut self);

    fn translate(&mut self, offset: Vec2) {
        let t = self.transform().translate(offset);
        self.set_transform(t);
    }

    fn rotate(&mut self, radians: f32) {
        let t = self.transform().rotate(radians);
        self.set_transform(t);
    }

    /// Resets every pixel covered by `rect` to transparent.
    fn clear_rect(&mut self, rect: Rect);

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);

    /// Strokes a circle outline centered on the circle's edge.
    fn stroke_circle(&mut self, center: Vec2, radius: f32, stroke: &Stroke);

    fn stroke_line(&mut self, from: Vec2, to: Vec2, stroke: &Stroke);

    fn fill_text(&mut self, text: &str, anchor: Vec2, style: &TextStyle);
}
