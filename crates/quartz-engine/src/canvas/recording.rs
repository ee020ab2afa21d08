use crate::coords::{Rect, Transform, Vec2};
use crate::paint::Color;
use crate::scene::{CircleCmd, ClearCmd, DrawCmd, DrawList, LineCmd, TextCmd};

use super::{Canvas2d, StateStack, Stroke, TextStyle};

/// [`Canvas2d`] that records every call instead of producing pixels.
///
/// Geometry is stored in device space: points go through the current
/// transform and widths, radii and font sizes are multiplied by its
/// uniform scale. Text keeps its alignment flags verbatim.
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    state: StateStack,
    list: DrawList,
}

impl RecordingCanvas {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn draw_list(&self) -> &DrawList {
        &self.list
    }

    /// Drops recorded commands; the transform state is kept.
    #[inline]
    pub fn reset(&mut self) {
        self.list.clear();
    }

    /// Outstanding `save` calls.
    #[inline]
    pub fn save_depth(&self) -> usize {
        self.state.depth()
    }
}

impl Canvas2d for RecordingCanvas {
    fn transform(&self) -> Transform {
        self.state.current()
    }

    fn set_transform(&mut self, transform: Transform) {
        self.state.set(transform);
    }

    fn save(&mut self) {
        self.state.save();
    }

    fn restore(&mut self) {
        self.state.restore();
    }

    fn clear_rect(&mut self, rect: Rect) {
        let t = self.state.current();
        let corners = rect.corners().map(|p| t.apply(p));
        self.list.push(DrawCmd::Clear(ClearCmd { rect: Rect::bounding(&corners) }));
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        let t = self.state.current();
        self.list.push(DrawCmd::Circle(CircleCmd {
            center: t.apply(center),
            radius: radius * t.uniform_scale(),
            fill: Some(color),
            stroke: None,
        }));
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, stroke: &Stroke) {
        let t = self.state.current();
        let k = t.uniform_scale();
        self.list.push(DrawCmd::Circle(CircleCmd {
            center: t.apply(center),
            radius: radius * k,
            fill: None,
            stroke: Some((stroke.width * k, stroke.color)),
        }));
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, stroke: &Stroke) {
        let t = self.state.current();
        self.list.push(DrawCmd::Line(LineCmd {
            from: t.apply(from),
            to: t.apply(to),
            width: stroke.width * t.uniform_scale(),
            color: stroke.color,
            cap: stroke.cap,
        }));
    }

    fn fill_text(&mut self, text: &str, anchor: Vec2, style: &TextStyle) {
        let t = self.state.current();
        self.list.push(DrawCmd::Text(TextCmd {
            text: text.to_string(),
            anchor: t.apply(anchor),
            size: style.size * t.uniform_scale(),
            color: style.color,
            align: style.align,
            baseline: style.baseline,
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::DrawKind;

    fn black() -> Color {
        Color::from_srgb_u8(0, 0, 0, 255)
    }

    #[test]
    fn records_in_device_space() {
        let mut c = RecordingCanvas::new();
        c.set_transform(Transform::from_scale(2.0));
        c.save();
        c.translate(Vec2::new(10.0, 10.0));
        c.stroke_line(Vec2::zero(), Vec2::new(5.0, 0.0), &Stroke::new(3.0, black()));
        c.restore();
        c.fill_circle(Vec2::new(1.0, 1.0), 4.0, black());

        let list = c.draw_list();
        let line = list.lines().next().unwrap();
        assert_eq!(line.from, Vec2::new(20.0, 20.0));
        assert_eq!(line.to, Vec2::new(30.0, 20.0));
        assert_eq!(line.width, 6.0);

        let DrawCmd::Circle(circle) = &list.items()[1] else { panic!("expected circle") };
        assert_eq!(circle.center, Vec2::new(2.0, 2.0));
        assert_eq!(circle.radius, 8.0);
        assert_eq!(c.save_depth(), 0);
    }

    #[test]
    fn clear_rect_is_scaled() {
        let mut c = RecordingCanvas::new();
        c.set_transform(Transform::from_scale(1.5));
        c.clear_rect(Rect::square(100.0));
        let DrawCmd::Clear(clear) = &c.draw_list().items()[0] else { panic!("expected clear") };
        assert_eq!(clear.rect, Rect::square(150.0));
    }

    #[test]
    fn counts_by_kind() {
        let mut c = RecordingCanvas::new();
        c.fill_text("12", Vec2::zero(), &TextStyle::new(10.0, black()).centered());
        c.fill_text("3", Vec2::zero(), &TextStyle::new(10.0, black()));
        c.stroke_circle(Vec2::zero(), 5.0, &Stroke::new(1.0, black()));
        assert_eq!(c.draw_list().count(DrawKind::Text), 2);
        assert_eq!(c.draw_list().count(DrawKind::Circle), 1);
        assert_eq!(c.draw_list().count(DrawKind::Line), 0);
    }
}
