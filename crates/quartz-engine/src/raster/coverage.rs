//! Signed-distance coverage for the shapes the canvas can paint.
//!
//! All functions take device-pixel positions and return coverage in `[0, 1]`
//! for a pixel whose center is at `p`. Edges get a one pixel wide ramp.

use crate::canvas::LineCap;
use crate::coords::Vec2;

#[inline]
fn ramp(signed_inside: f32) -> f32 {
    (signed_inside + 0.5).clamp(0.0, 1.0)
}

/// Filled disc.
#[inline]
pub(super) fn disc(p: Vec2, center: Vec2, radius: f32) -> f32 {
    ramp(radius - p.distance(center))
}

/// Ring of `width` centered on the circle of `radius`.
#[inline]
pub(super) fn ring(p: Vec2, center: Vec2, radius: f32, width: f32) -> f32 {
    let half = width * 0.5;
    ramp(half - (p.distance(center) - radius).abs())
}

/// Stroked segment `a → b` of `width` with `cap` at both ends.
pub(super) fn segment(p: Vec2, a: Vec2, b: Vec2, width: f32, cap: LineCap) -> f32 {
    let half = width * 0.5;
    let ab = b - a;
    let len = ab.length();

    if len <= f32::EPSILON {
        return match cap {
            LineCap::Butt => 0.0,
            LineCap::Round => disc(p, a, half),
            LineCap::Square => {
                let d = p - a;
                ramp(half - d.x.abs()) * ramp(half - d.y.abs())
            }
        };
    }

    let dir = ab / len;
    let ap = p - a;
    let along = ap.dot(dir);
    let across = (ap.x * dir.y - ap.y * dir.x).abs();

    match cap {
        LineCap::Round => {
            let t = along.clamp(0.0, len);
            ramp(half - p.distance(a + dir * t))
        }
        LineCap::Butt => ramp(half - across) * ramp(along.min(len - along)),
        LineCap::Square => ramp(half - across) * ramp((along + half).min(len + half - along)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const O: Vec2 = Vec2::new(0.0, 0.0);

    // ── disc / ring ───────────────────────────────────────────────────────

    #[test]
    fn disc_is_solid_inside_and_empty_outside() {
        assert_eq!(disc(Vec2::new(1.0, 1.0), O, 10.0), 1.0);
        assert_eq!(disc(Vec2::new(20.0, 0.0), O, 10.0), 0.0);
        assert_eq!(disc(Vec2::new(10.0, 0.0), O, 10.0), 0.5);
    }

    #[test]
    fn ring_covers_only_the_band() {
        assert_eq!(ring(Vec2::new(10.0, 0.0), O, 10.0, 4.0), 1.0);
        assert_eq!(ring(Vec2::new(0.0, 0.0), O, 10.0, 4.0), 0.0);
        assert_eq!(ring(Vec2::new(13.0, 0.0), O, 10.0, 4.0), 0.0);
    }

    // ── segment ───────────────────────────────────────────────────────────

    #[test]
    fn round_cap_extends_past_endpoint() {
        let a = O;
        let b = Vec2::new(10.0, 0.0);
        let past_end = Vec2::new(11.0, 0.0);
        assert_eq!(segment(past_end, a, b, 4.0, LineCap::Round), 1.0);
        assert_eq!(segment(past_end, a, b, 4.0, LineCap::Butt), 0.0);
        assert_eq!(segment(past_end, a, b, 4.0, LineCap::Square), 1.0);
    }

    #[test]
    fn segment_respects_width() {
        let a = O;
        let b = Vec2::new(10.0, 0.0);
        assert_eq!(segment(Vec2::new(5.0, 0.5), a, b, 4.0, LineCap::Butt), 1.0);
        assert_eq!(segment(Vec2::new(5.0, 4.0), a, b, 4.0, LineCap::Butt), 0.0);
    }

    #[test]
    fn zero_length_butt_segment_paints_nothing() {
        assert_eq!(segment(O, O, O, 4.0, LineCap::Butt), 0.0);
        assert_eq!(segment(O, O, O, 4.0, LineCap::Round), 1.0);
    }
}
