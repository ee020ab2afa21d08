use std::rc::Rc;

use crate::canvas::{Canvas2d, StateStack, Stroke, TextAlign, TextBaseline, TextStyle};
use crate::coords::{Rect, Transform, Vec2};
use crate::paint::Color;
use crate::text::{FontId, FontSystem};

use super::coverage;
use super::Pixmap;

/// [`Canvas2d`] that rasterizes into an owned [`Pixmap`].
///
/// Text needs a font: attach one with [`with_font`](Self::with_font). Without a
/// font, text calls are skipped (logged once). Glyphs are placed at the
/// transformed anchor and scaled with the transform, but are not rotated.
pub struct PixelCanvas {
    pixmap: Pixmap,
    state: StateStack,
    font: Option<(Rc<FontSystem>, FontId)>,
    warned_no_font: bool,
}

impl PixelCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixmap: Pixmap::new(width, height),
            state: StateStack::new(),
            font: None,
            warned_no_font: false,
        }
    }

    pub fn with_font(mut self, fonts: Rc<FontSystem>, font: FontId) -> Self {
        self.font = Some((fonts, font));
        self
    }

    #[inline]
    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Reallocates the backing buffer. Contents and transform are reset.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.pixmap.resize(width, height);
        self.state = StateStack::new();
    }

    /// Runs `coverage_at` over every pixel in the device-space `bounds` and blends
    /// `color` with the returned coverage.
    fn paint_coverage(&mut self, bounds: Rect, color: Color, coverage_at: impl Fn(Vec2) -> f32) {
        let Some((x0, y0, x1, y1)) = self.pixel_span(bounds) else { return };
        for y in y0..y1 {
            for x in x0..x1 {
                let c = coverage_at(Vec2::new(x as f32 + 0.5, y as f32 + 0.5));
                if c > 0.0 {
                    self.pixmap.blend(x, y, color.with_coverage(c));
                }
            }
        }
    }

    /// Clamps a device-space rect to the pixmap as a half-open pixel span.
    fn pixel_span(&self, bounds: Rect) -> Option<(u32, u32, u32, u32)> {
        let b = bounds.normalized();
        if !(b.origin.is_finite() && b.size.is_finite()) {
            return None;
        }
        let (w, h) = (self.pixmap.width() as f32, self.pixmap.height() as f32);
        let x0 = b.min().x.floor().clamp(0.0, w) as u32;
        let y0 = b.min().y.floor().clamp(0.0, h) as u32;
        let x1 = b.max().x.ceil().clamp(0.0, w) as u32;
        let y1 = b.max().y.ceil().clamp(0.0, h) as u32;
        (x0 < x1 && y0 < y1).then_some((x0, y0, x1, y1))
    }
}

impl Canvas2d for PixelCanvas {
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
        let bounds = Rect::bounding(&corners);
        // Only pixels whose centers fall inside the rect are cleared.
        let snapped = Rect::new(
            bounds.origin.x.round(),
            bounds.origin.y.round(),
            bounds.max().x.round() - bounds.origin.x.round(),
            bounds.max().y.round() - bounds.origin.y.round(),
        );
        if let Some((x0, y0, x1, y1)) = self.pixel_span(snapped) {
            self.pixmap.clear_region(x0, y0, x1, y1);
        }
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        let t = self.state.current();
        let c = t.apply(center);
        let r = radius * t.uniform_scale();
        if r <= 0.0 {
            return;
        }
        let bounds = Rect::new(c.x - r - 1.0, c.y - r - 1.0, 2.0 * r + 2.0, 2.0 * r + 2.0);
        self.paint_coverage(bounds, color, |p| coverage::disc(p, c, r));
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, stroke: &Stroke) {
        let t = self.state.current();
        let k = t.uniform_scale();
        let c = t.apply(center);
        let r = radius * k;
        let w = stroke.width * k;
        if w <= 0.0 || r < 0.0 {
            return;
        }
        let outer = r + w * 0.5 + 1.0;
        let bounds = Rect::new(c.x - outer, c.y - outer, 2.0 * outer, 2.0 * outer);
        self.paint_coverage(bounds, stroke.color, |p| coverage::ring(p, c, r, w));
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, stroke: &Stroke) {
        let t = self.state.current();
        let (a, b) = (t.apply(from), t.apply(to));
        let w = stroke.width * t.uniform_scale();
        if w <= 0.0 {
            return;
        }
        let pad = w * 0.5 + 1.0;
        let bounds = Rect::bounding(&[a, b]);
        let bounds = Rect::new(
            bounds.origin.x - pad,
            bounds.origin.y - pad,
            bounds.size.x + 2.0 * pad,
            bounds.size.y + 2.0 * pad,
        );
        let cap = stroke.cap;
        self.paint_coverage(bounds, stroke.color, |p| coverage::segment(p, a, b, w, cap));
    }

    fn fill_text(&mut self, text: &str, anchor: Vec2, style: &TextStyle) {
        // Glyph bitmaps scale with the font size; skip them when nothing can land.
        if self.pixmap.data().is_empty() {
            return;
        }
        let Some((fonts, id)) = self.font.clone() else {
            if !self.warned_no_font {
                log::warn!("no font attached to pixel canvas; text is not painted");
                self.warned_no_font = true;
            }
            return;
        };
        let Some(font) = fonts.get(id) else { return };

        let t = self.state.current();
        let px = style.size * t.uniform_scale();
        if !px.is_finite() || px < 1.0 {
            return;
        }
        let origin = t.apply(anchor);

        let extent = fonts.measure_text(text, id, px);
        let vm = fonts.vertical_metrics(id, px);

        let mut pen_x = match style.align {
            TextAlign::Left => origin.x,
            TextAlign::Center => origin.x - extent.x * 0.5,
            TextAlign::Right => origin.x - extent.x,
        };
        let baseline = match style.baseline {
            TextBaseline::Top => origin.y + vm.ascent,
            TextBaseline::Middle => origin.y + (vm.ascent + vm.descent) * 0.5,
            TextBaseline::Alphabetic => origin.y,
            TextBaseline::Bottom => origin.y + vm.descent,
        };

        for ch in text.chars() {
            let (m, bitmap) = font.rasterize(ch, px);
            let gx = (pen_x + m.xmin as f32).round() as i64;
            let gy = (baseline - (m.ymin + m.height as i32) as f32).round() as i64;

            for row in 0..m.height {
                for col in 0..m.width {
                    let alpha = bitmap[row * m.width + col];
                    let (x, y) = (gx + col as i64, gy + row as i64);
                    if alpha == 0 || x < 0 || y < 0 {
                        continue;
                    }
                    self.pixmap.blend(x as u32, y as u32, style.color.with_coverage(alpha as f32 / 255.0));
                }
            }

            pen_x += m.advance_width;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::LineCap;

    fn red() -> Color {
        Color::from_srgb_u8(255, 0, 0, 255)
    }

    #[test]
    fn fill_circle_paints_center_not_corner() {
        let mut c = PixelCanvas::new(20, 20);
        c.fill_circle(Vec2::new(10.0, 10.0), 6.0, red());
        assert_eq!(c.pixmap().pixel(10, 10), Some([255, 0, 0, 255]));
        assert_eq!(c.pixmap().pixel(0, 0), Some([0, 0, 0, 0]));
    }

    #[test]
    fn scale_transform_maps_logical_to_physical() {
        // Logical 10×10 canvas at density 2 → 20×20 physical.
        let mut c = PixelCanvas::new(20, 20);
        c.set_transform(Transform::from_scale(2.0));
        c.fill_circle(Vec2::new(5.0, 5.0), 2.0, red());
        assert_eq!(c.pixmap().pixel(10, 10), Some([255, 0, 0, 255]));
        assert_eq!(c.pixmap().pixel(12, 10), Some([255, 0, 0, 255]));
        assert_eq!(c.pixmap().pixel(16, 10), Some([0, 0, 0, 0]));
    }

    #[test]
    fn stroke_circle_leaves_middle_empty() {
        let mut c = PixelCanvas::new(30, 30);
        c.stroke_circle(Vec2::new(15.0, 15.0), 10.0, &Stroke::new(4.0, red()));
        assert_eq!(c.pixmap().pixel(15, 15), Some([0, 0, 0, 0]));
        assert_eq!(c.pixmap().pixel(25, 15).map(|p| p[3]), Some(255));
    }

    #[test]
    fn clear_rect_resets_pixels() {
        let mut c = PixelCanvas::new(10, 10);
        c.fill_circle(Vec2::new(5.0, 5.0), 20.0, red());
        c.clear_rect(Rect::square(10.0));
        assert!(c.pixmap().data().iter().all(|&b| b == 0));
    }

    #[test]
    fn rotated_line_lands_where_expected() {
        let mut c = PixelCanvas::new(40, 40);
        c.save();
        c.translate(Vec2::new(20.0, 20.0));
        c.rotate(core::f32::consts::FRAC_PI_2);
        c.stroke_line(Vec2::zero(), Vec2::new(15.0, 0.0), &Stroke::new(2.0, red()).cap(LineCap::Round));
        c.restore();
        // Quarter turn clockwise: the line points straight down.
        assert_eq!(c.pixmap().pixel(20, 30).map(|p| p[3]), Some(255));
        assert_eq!(c.pixmap().pixel(30, 20).map(|p| p[3]), Some(0));
    }

    #[test]
    fn text_without_font_is_skipped() {
        let mut c = PixelCanvas::new(10, 10);
        c.fill_text("12", Vec2::new(5.0, 5.0), &TextStyle::new(8.0, red()).centered());
        assert!(c.pixmap().data().iter().all(|&b| b == 0));
    }
}
