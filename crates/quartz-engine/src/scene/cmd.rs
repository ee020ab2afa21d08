use crate::canvas::{LineCap, TextAlign, TextBaseline};
use crate::coords::{Rect, Vec2};
use crate::paint::Color;

/// Device-space region reset to transparent.
#[derive(Debug, Clone, PartialEq)]
pub struct ClearCmd {
    pub rect: Rect,
}

/// Filled disc or stroked ring.
#[derive(Debug, Clone, PartialEq)]
pub struct CircleCmd {
    pub center: Vec2,
    pub radius: f32,
    /// `Some` for `fill_circle`.
    pub fill: Option<Color>,
    /// `(width, color)` for `stroke_circle`.
    pub stroke: Option<(f32, Color)>,
}

/// Stroked segment.
#[derive(Debug, Clone, PartialEq)]
pub struct LineCmd {
    pub from: Vec2,
    pub to: Vec2,
    pub width: f32,
    pub color: Color,
    pub cap: LineCap,
}

/// Painted text run.
#[derive(Debug, Clone, PartialEq)]
pub struct TextCmd {
    pub text: String,
    pub anchor: Vec2,
    /// Font size in device pixels.
    pub size: f32,
    pub color: Color,
    pub align: TextAlign,
    pub baseline: TextBaseline,
}

/// Renderer-agnostic draw command.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Clear(ClearCmd),
    Circle(CircleCmd),
    Line(LineCmd),
    Text(TextCmd),
}

/// Discriminant of [`DrawCmd`], for counting and filtering.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum DrawKind {
    Clear,
    Circle,
    Line,
    Text,
}

impl DrawCmd {
    #[inline]
    pub fn kind(&self) -> DrawKind {
        match self {
            DrawCmd::Clear(_) => DrawKind::Clear,
            DrawCmd::Circle(_) => DrawKind::Circle,
            DrawCmd::Line(_) => DrawKind::Line,
            DrawCmd::Text(_) => DrawKind::Text,
        }
    }
}
