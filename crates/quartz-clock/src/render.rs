//! Frame painting.
//!
//! [`paint`] draws one complete frame in logical coordinates. It only touches
//! the canvas: configuration and run state are read, never changed.

use quartz_engine::canvas::{Canvas2d, LineCap, Stroke, TextStyle};
use quartz_engine::coords::{Rect, Vec2};
use quartz_engine::paint::Color;

use crate::geometry::{
    numeral_anchor, numeral_size, FaceGeometry, Hand, HandAngles, TickSpec, BORDER_WIDTH, HANDS,
    HUB_RADIUS, TICK_COUNT,
};
use crate::options::{ClockOptions, Theme};
use crate::time::ClockTime;

/// Paints face, ticks, numerals, hands and hub for `time`.
pub fn paint(canvas: &mut dyn Canvas2d, options: &ClockOptions, time: &ClockTime) {
    let theme = &options.theme;
    canvas.clear_rect(Rect::square(options.size));

    let face = FaceGeometry::for_size(options.size);
    canvas.fill_circle(face.center, face.radius, theme.face);
    canvas.stroke_circle(face.center, face.radius, &Stroke::new(BORDER_WIDTH, theme.border));

    if options.show_ticks {
        paint_ticks(canvas, options, &face);
    }
    if options.show_numbers {
        paint_numerals(canvas, theme, &face);
    }

    let angles = HandAngles::from_time(time);
    for spec in &HANDS {
        canvas.save();
        canvas.translate(face.center);
        canvas.rotate(spec.angle(&angles));
        let stroke = Stroke::new(spec.width, hand_color(theme, spec.hand)).cap(LineCap::Round);
        canvas.stroke_line(Vec2::zero(), Vec2::new(spec.length * face.radius, 0.0), &stroke);
        canvas.restore();
    }

    canvas.fill_circle(face.center, HUB_RADIUS, theme.border);
}

fn paint_ticks(canvas: &mut dyn Canvas2d, options: &ClockOptions, face: &FaceGeometry) {
    canvas.save();
    canvas.translate(face.center);
    for i in 0..TICK_COUNT {
        let tick = TickSpec::at(i, options.tick_length, options.tick_width);
        let (from, to) = tick.segment(face.radius);
        canvas.stroke_line(from, to, &Stroke::new(tick.width, options.theme.hour_mark));
    }
    canvas.restore();
}

fn paint_numerals(canvas: &mut dyn Canvas2d, theme: &Theme, face: &FaceGeometry) {
    let style = TextStyle::new(numeral_size(face.radius), theme.number).centered();
    canvas.save();
    canvas.translate(face.center);
    for n in 1..=12u32 {
        canvas.fill_text(&n.to_string(), numeral_anchor(n, Vec2::zero(), face.radius), &style);
    }
    canvas.restore();
}

fn hand_color(theme: &Theme, hand: Hand) -> Color {
    match hand {
        Hand::Hour => theme.hour_hand,
        Hand::Minute => theme.minute_hand,
        Hand::Second => theme.second_hand,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quartz_engine::canvas::RecordingCanvas;
    use quartz_engine::coords::Transform;
    use quartz_engine::raster::PixelCanvas;
    use quartz_engine::scene::{DrawCmd, DrawKind, LineCmd};

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    fn record(options: &ClockOptions, time: ClockTime) -> RecordingCanvas {
        let mut c = RecordingCanvas::new();
        paint(&mut c, options, &time);
        c
    }

    /// The three hand strokes, in paint order.
    fn hands(c: &RecordingCanvas) -> Vec<LineCmd> {
        c.draw_list().lines().filter(|l| l.cap == LineCap::Round).cloned().collect()
    }

    // ── structure ─────────────────────────────────────────────────────────

    #[test]
    fn default_frame_paints_everything_in_order() {
        let c = record(&ClockOptions::default(), ClockTime::new(10, 10, 30, 0));
        let list = c.draw_list();

        assert!(matches!(list.items()[0], DrawCmd::Clear(_)));
        assert_eq!(list.count(DrawKind::Line), 60 + 3);
        assert_eq!(list.count(DrawKind::Text), 12);
        // face fill, face border, hub
        assert_eq!(list.count(DrawKind::Circle), 3);

        let DrawCmd::Circle(hub) = list.items().last().unwrap() else { panic!("hub last") };
        assert_eq!(hub.radius, HUB_RADIUS);
        assert_eq!(hub.fill, Some(ClockOptions::default().theme.border));
        assert_eq!(c.save_depth(), 0);
    }

    #[test]
    fn size_100_without_numbers() {
        let opts = ClockOptions::default().size(100.0).show_numbers(false);
        let c = record(&opts, ClockTime::new(0, 0, 0, 0));
        let list = c.draw_list();

        assert_eq!(list.count(DrawKind::Text), 0);
        assert_eq!(list.count(DrawKind::Line), 63);

        let DrawCmd::Circle(face) = &list.items()[1] else { panic!("face second") };
        assert_eq!(face.radius, 46.0);
        assert_eq!(face.center, Vec2::new(50.0, 50.0));
        let DrawCmd::Circle(border) = &list.items()[2] else { panic!("border third") };
        assert_eq!(border.stroke.map(|s| s.0), Some(4.0));
    }

    #[test]
    fn hidden_ticks_paint_only_hands() {
        let opts = ClockOptions::default().show_ticks(false);
        let c = record(&opts, ClockTime::new(0, 0, 0, 0));
        assert_eq!(c.draw_list().count(DrawKind::Line), 3);
    }

    #[test]
    fn clear_covers_logical_area() {
        let mut c = RecordingCanvas::new();
        c.set_transform(Transform::from_scale(2.0));
        paint(&mut c, &ClockOptions::default().size(120.0), &ClockTime::new(0, 0, 0, 0));
        let DrawCmd::Clear(clear) = &c.draw_list().items()[0] else { panic!("clear first") };
        assert_eq!(clear.rect, Rect::square(240.0));
    }

    // ── ticks ─────────────────────────────────────────────────────────────

    #[test]
    fn ticks_end_on_radius_with_hour_marks_wider() {
        let opts = ClockOptions::default().size(100.0);
        let c = record(&opts, ClockTime::new(0, 0, 0, 0));
        let ticks: Vec<_> = c.draw_list().lines().take(60).cloned().collect();

        assert!(ticks.iter().all(|t| t.cap == LineCap::Butt));
        assert_eq!(ticks.iter().filter(|t| t.width == 2.0).count(), 12);
        assert_eq!(ticks.iter().filter(|t| t.width == 1.0).count(), 48);

        // Tick 0 points at 3 o'clock, full length 8.
        assert!(approx(ticks[0].from.x, 88.0) && approx(ticks[0].from.y, 50.0));
        assert!(approx(ticks[0].to.x, 96.0) && approx(ticks[0].to.y, 50.0));
        // Tick 1 is a minor mark, length 4.
        let len = (ticks[1].to - ticks[1].from).length();
        assert!(approx(len, 4.0));
    }

    // ── numerals ──────────────────────────────────────────────────────────

    #[test]
    fn numerals_are_centered_around_face() {
        let c = record(&ClockOptions::default().size(100.0), ClockTime::new(0, 0, 0, 0));
        let texts: Vec<_> = c.draw_list().texts().cloned().collect();
        assert_eq!(texts[0].text, "1");
        assert_eq!(texts[11].text, "12");
        assert!(approx(texts[11].anchor.x, 50.0));
        assert!(approx(texts[11].anchor.y, 50.0 - 0.78 * 46.0));
        assert!(approx(texts[2].anchor.x, 50.0 + 0.78 * 46.0));
        assert_eq!(texts[0].size, 5.0);
        let centered = TextStyle::new(5.0, texts[0].color).centered();
        assert_eq!((texts[0].align, texts[0].baseline), (centered.align, centered.baseline));
    }

    // ── hands ─────────────────────────────────────────────────────────────

    #[test]
    fn three_oclock_hands() {
        let c = record(&ClockOptions::default().size(100.0), ClockTime::new(3, 0, 0, 0));
        let h = hands(&c);
        assert_eq!(h.len(), 3);

        // Hour: right, 0.5 * 46.
        assert!(approx(h[0].to.x, 73.0) && approx(h[0].to.y, 50.0));
        assert_eq!(h[0].width, 6.0);
        // Minute and second: straight up.
        assert!(approx(h[1].to.x, 50.0) && approx(h[1].to.y, 50.0 - 0.75 * 46.0));
        assert_eq!(h[1].width, 4.0);
        assert!(approx(h[2].to.x, 50.0) && approx(h[2].to.y, 50.0 - 0.85 * 46.0));
        assert_eq!(h[2].width, 2.0);
        assert_eq!(h[2].color, ClockOptions::default().theme.second_hand);
        assert!(h.iter().all(|l| l.from == Vec2::new(50.0, 50.0)));
    }

    #[test]
    fn six_oclock_hour_hand_points_down() {
        let c = record(&ClockOptions::default().size(100.0), ClockTime::new(6, 0, 0, 0));
        let hour = &hands(&c)[0];
        assert!(approx(hour.to.x, 50.0) && approx(hour.to.y, 73.0));
    }

    #[test]
    fn same_time_paints_same_frame() {
        let opts = ClockOptions::default();
        let t = ClockTime::new(7, 42, 13, 250);
        assert_eq!(record(&opts, t).draw_list().items(), record(&opts, t).draw_list().items());
    }

    // ── pixels ────────────────────────────────────────────────────────────

    #[test]
    fn rasterized_frame_has_face_and_hub() {
        let mut c = PixelCanvas::new(100, 100);
        paint(&mut c, &ClockOptions::default().size(100.0), &ClockTime::new(3, 0, 0, 0));
        let p = c.pixmap();
        // Hub in border ink.
        assert_eq!(p.pixel(50, 50), Some([0x22, 0x22, 0x22, 255]));
        // Face interior away from hands, ticks and numerals.
        assert_eq!(p.pixel(40, 65), Some([255, 255, 255, 255]));
        // Outside the face.
        assert_eq!(p.pixel(1, 1), Some([0, 0, 0, 0]));
    }
}
