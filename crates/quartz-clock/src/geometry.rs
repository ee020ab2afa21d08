//! Face layout and hand angles.
//!
//! All angles are in radians in screen space (+Y down), so an angle of zero
//! points at 3 o'clock and positive angles turn clockwise. A fraction `f` of a
//! full revolution measured from 12 o'clock maps to `f·2π - π/2`.

use core::f32::consts::{FRAC_PI_2, TAU};

use quartz_engine::coords::Vec2;

use crate::time::ClockTime;

/// Space reserved between the surface edge and the face radius for the border.
pub const BORDER_MARGIN: f32 = 4.0;
/// Stroke width of the face outline.
pub const BORDER_WIDTH: f32 = 4.0;
/// Radius of the center hub painted over the hands.
pub const HUB_RADIUS: f32 = 4.0;
/// Distance of numeral anchors from the center, as a share of the radius.
pub const NUMERAL_RADIUS: f32 = 0.78;
/// Numeral font size as a share of the radius.
pub const NUMERAL_SIZE: f32 = 0.12;
/// Ticks around the face, one per minute.
pub const TICK_COUNT: u32 = 60;

/// Maps a fraction of a revolution from 12 o'clock to a screen angle.
#[inline]
pub fn fraction_to_angle(fraction: f32) -> f32 {
    fraction * TAU - FRAC_PI_2
}

/// Center and radius of the face for a logical surface size.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FaceGeometry {
    pub center: Vec2,
    pub radius: f32,
}

impl FaceGeometry {
    pub fn for_size(size: f32) -> Self {
        let (cx, cy) = (size / 2.0, size / 2.0);
        Self { center: Vec2::new(cx, cy), radius: cx.min(cy) - BORDER_MARGIN }
    }
}

/// Share of a full revolution each hand has travelled.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct HandFractions {
    pub hour: f32,
    pub minute: f32,
    pub second: f32,
}

impl HandFractions {
    /// Minute and second hands include the fractional second; the hour hand
    /// moves with whole minutes.
    pub fn from_time(t: &ClockTime) -> Self {
        let seconds = t.second as f32 + t.millisecond as f32 / 1000.0;
        let minutes = t.minute as f32;
        Self {
            hour: ((t.hour % 12) as f32 + minutes / 60.0) / 12.0,
            minute: (minutes + seconds / 60.0) / 60.0,
            second: seconds / 60.0,
        }
    }

    pub fn angles(&self) -> HandAngles {
        HandAngles {
            hour: fraction_to_angle(self.hour),
            minute: fraction_to_angle(self.minute),
            second: fraction_to_angle(self.second),
        }
    }
}

/// Screen angles of the three hands.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct HandAngles {
    pub hour: f32,
    pub minute: f32,
    pub second: f32,
}

impl HandAngles {
    pub fn from_time(t: &ClockTime) -> Self {
        HandFractions::from_time(t).angles()
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Hand {
    Hour,
    Minute,
    Second,
}

/// Length and stroke width of one hand.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct HandSpec {
    pub hand: Hand,
    /// Share of the face radius.
    pub length: f32,
    pub width: f32,
}

/// Hands in paint order.
pub const HANDS: [HandSpec; 3] = [
    HandSpec { hand: Hand::Hour, length: 0.50, width: 6.0 },
    HandSpec { hand: Hand::Minute, length: 0.75, width: 4.0 },
    HandSpec { hand: Hand::Second, length: 0.85, width: 2.0 },
];

impl HandSpec {
    pub fn angle(&self, angles: &HandAngles) -> f32 {
        match self.hand {
            Hand::Hour => angles.hour,
            Hand::Minute => angles.minute,
            Hand::Second => angles.second,
        }
    }

    /// Tip of the hand for a face of `radius` centered at `center`.
    pub fn tip(&self, center: Vec2, radius: f32, angle: f32) -> Vec2 {
        center + Vec2::from_angle(angle) * (self.length * radius)
    }
}

/// One radial tick mark.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TickSpec {
    /// Screen angle; tick 0 points at 3 o'clock.
    pub angle: f32,
    pub length: f32,
    pub width: f32,
    pub is_hour: bool,
}

impl TickSpec {
    /// Every fifth tick is an hour mark at full size; the rest are half
    /// length and half width (rounded down, at least 1 wide).
    pub fn at(index: u32, tick_length: f32, tick_width: f32) -> Self {
        let is_hour = index % 5 == 0;
        let (length, width) = if is_hour {
            (tick_length, tick_width)
        } else {
            ((tick_length / 2.0).floor(), (tick_width / 2.0).floor().max(1.0))
        };
        Self { angle: index as f32 / TICK_COUNT as f32 * TAU, length, width, is_hour }
    }

    /// Segment endpoints relative to the face center. The tick ends on the
    /// face radius.
    pub fn segment(&self, radius: f32) -> (Vec2, Vec2) {
        let dir = Vec2::from_angle(self.angle);
        (dir * (radius - self.length), dir * radius)
    }
}

/// Anchor of numeral `n` (1..=12), centered on it in both axes.
pub fn numeral_anchor(n: u32, center: Vec2, radius: f32) -> Vec2 {
    let angle = fraction_to_angle(n as f32 / 12.0);
    center + Vec2::from_angle(angle) * (radius * NUMERAL_RADIUS)
}

/// Numeral font size for a face of `radius`.
pub fn numeral_size(radius: f32) -> f32 {
    (radius * NUMERAL_SIZE).floor()
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f32::consts::PI;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    fn approx_v(a: Vec2, b: Vec2) -> bool {
        approx(a.x, b.x) && approx(a.y, b.y)
    }

    // ── face ──────────────────────────────────────────────────────────────

    #[test]
    fn face_radius_leaves_border_margin() {
        let f = FaceGeometry::for_size(100.0);
        assert_eq!(f.center, Vec2::new(50.0, 50.0));
        assert_eq!(f.radius, 46.0);
        assert_eq!(FaceGeometry::for_size(150.0).radius, 71.0);
    }

    #[test]
    fn degenerate_size_is_not_clamped() {
        assert_eq!(FaceGeometry::for_size(4.0).radius, -2.0);
    }

    // ── hands ─────────────────────────────────────────────────────────────

    #[test]
    fn three_oclock() {
        let f = HandFractions::from_time(&ClockTime::new(3, 0, 0, 0));
        assert_eq!(f, HandFractions { hour: 0.25, minute: 0.0, second: 0.0 });
        let a = f.angles();
        assert!(approx(a.hour, 0.0));
        assert!(approx(a.minute, -FRAC_PI_2));
    }

    #[test]
    fn six_oclock_points_down() {
        let f = HandFractions::from_time(&ClockTime::new(6, 0, 0, 0));
        assert_eq!(f.hour, 0.5);
        assert!(approx(f.angles().hour, FRAC_PI_2));
    }

    #[test]
    fn fractional_seconds_move_minute_and_second_hands() {
        let f = HandFractions::from_time(&ClockTime::new(0, 0, 30, 500));
        assert!(approx(f.second, 30.5 / 60.0));
        assert!(approx(f.minute, (30.5 / 60.0) / 60.0));
        assert_eq!(f.hour, 0.0);
    }

    #[test]
    fn hour_hand_ignores_seconds() {
        let a = HandFractions::from_time(&ClockTime::new(15, 30, 0, 0));
        let b = HandFractions::from_time(&ClockTime::new(15, 30, 59, 999));
        assert_eq!(a.hour, b.hour);
        assert!(approx(a.hour, 3.5 / 12.0));
    }

    #[test]
    fn afternoon_wraps_to_face() {
        let am = HandFractions::from_time(&ClockTime::new(9, 15, 0, 0));
        let pm = HandFractions::from_time(&ClockTime::new(21, 15, 0, 0));
        assert_eq!(am, pm);
    }

    #[test]
    fn hand_tip_follows_angle() {
        let spec = HANDS[2];
        let tip = spec.tip(Vec2::new(50.0, 50.0), 40.0, FRAC_PI_2);
        assert!(approx_v(tip, Vec2::new(50.0, 84.0)));
        let tip = HANDS[0].tip(Vec2::new(50.0, 50.0), 40.0, PI);
        assert!(approx_v(tip, Vec2::new(30.0, 50.0)));
    }

    // ── ticks ─────────────────────────────────────────────────────────────

    #[test]
    fn hour_ticks_use_full_size() {
        let t = TickSpec::at(15, 8.0, 2.0);
        assert!(t.is_hour);
        assert_eq!((t.length, t.width), (8.0, 2.0));
        assert!(approx(t.angle, FRAC_PI_2));
    }

    #[test]
    fn minor_ticks_use_half_with_min_width() {
        let t = TickSpec::at(1, 8.0, 2.0);
        assert!(!t.is_hour);
        assert_eq!((t.length, t.width), (4.0, 1.0));
        let t = TickSpec::at(7, 9.0, 1.0);
        assert_eq!((t.length, t.width), (4.0, 1.0));
        let t = TickSpec::at(7, 10.0, 6.0);
        assert_eq!((t.length, t.width), (5.0, 3.0));
    }

    #[test]
    fn tick_segment_ends_on_radius() {
        let (a, b) = TickSpec::at(0, 8.0, 2.0).segment(46.0);
        assert!(approx_v(a, Vec2::new(38.0, 0.0)));
        assert!(approx_v(b, Vec2::new(46.0, 0.0)));
        let (a, b) = TickSpec::at(15, 8.0, 2.0).segment(46.0);
        assert!(approx_v(a, Vec2::new(0.0, 38.0)));
        assert!(approx_v(b, Vec2::new(0.0, 46.0)));
    }

    // ── numerals ──────────────────────────────────────────────────────────

    #[test]
    fn twelve_is_on_top_and_three_on_the_right() {
        let c = Vec2::new(50.0, 50.0);
        let r = 46.0;
        assert!(approx_v(numeral_anchor(12, c, r), Vec2::new(50.0, 50.0 - 0.78 * r)));
        assert!(approx_v(numeral_anchor(3, c, r), Vec2::new(50.0 + 0.78 * r, 50.0)));
        assert!(approx_v(numeral_anchor(6, c, r), Vec2::new(50.0, 50.0 + 0.78 * r)));
    }

    #[test]
    fn numeral_size_rounds_down() {
        assert_eq!(numeral_size(46.0), 5.0);
        assert_eq!(numeral_size(71.0), 8.0);
    }
}
