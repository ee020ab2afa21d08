use super::Vec2;

/// 2D affine transform using the canvas matrix layout.
///
/// ```text
/// | a c e |
/// | b d f |
/// | 0 0 1 |
/// ```
///
/// `x' = a·x + c·y + e`, `y' = b·x + d·y + f`.
///
/// [`translate`](Self::translate), [`rotate`](Self::rotate) and
/// [`scale`](Self::scale) post-multiply, so the most recently applied
/// operation acts first on incoming points (canvas semantics).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl Transform {
    pub const IDENTITY: Transform = Transform { a: 1.0, b: 0.0, c: 0.0, d: 1.0, e: 0.0, f: 0.0 };

    #[inline]
    pub const fn new(a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) -> Self {
        Self { a, b, c, d, e, f }
    }

    /// Uniform scale about the origin.
    #[inline]
    pub const fn from_scale(s: f32) -> Self {
        Self::new(s, 0.0, 0.0, s, 0.0, 0.0)
    }

    #[inline]
    pub const fn from_translation(offset: Vec2) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, offset.x, offset.y)
    }

    #[inline]
    pub fn from_rotation(radians: f32) -> Self {
        let (sin, cos) = radians.sin_cos();
        Self::new(cos, sin, -sin, cos, 0.0, 0.0)
    }

    /// Returns `self × rhs` (apply `rhs` first, then `self`).
    #[inline]
    pub fn then(self, rhs: Transform) -> Transform {
        Transform {
            a: self.a * rhs.a + self.c * rhs.b,
            b: self.b * rhs.a + self.d * rhs.b,
            c: self.a * rhs.c + self.c * rhs.d,
            d: self.b * rhs.c + self.d * rhs.d,
            e: self.a * rhs.e + self.c * rhs.f + self.e,
            f: self.b * rhs.e + self.d * rhs.f + self.f,
        }
    }

    #[inline]
    pub fn translate(self, offset: Vec2) -> Transform {
        self.then(Transform::from_translation(offset))
    }

    #[inline]
    pub fn rotate(self, radians: f32) -> Transform {
        self.then(Transform::from_rotation(radians))
    }

    #[inline]
    pub fn scale(self, s: f32) -> Transform {
        self.then(Transform::from_scale(s))
    }

    /// Maps a point.
    #[inline]
    pub fn apply(self, p: Vec2) -> Vec2 {
        Vec2::new(
            self.a * p.x + self.c * p.y + self.e,
            self.b * p.x + self.d * p.y + self.f,
        )
    }

    /// Length scale factor for widths and radii: `sqrt(|det|)`.
    ///
    /// Exact for similarity transforms (uniform scale + rotation + translation),
    /// which is all the canvas API can produce.
    #[inline]
    pub fn uniform_scale(self) -> f32 {
        (self.a * self.d - self.b * self.c).abs().sqrt()
    }

    /// Rotation angle of the transform's X axis.
    #[inline]
    pub fn rotation(self) -> f32 {
        self.b.atan2(self.a)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f32::consts::FRAC_PI_2;

    fn close(a: Vec2, b: Vec2) -> bool {
        (a.x - b.x).abs() < 1e-5 && (a.y - b.y).abs() < 1e-5
    }

    #[test]
    fn identity_leaves_points_alone() {
        let p = Vec2::new(3.0, -7.5);
        assert_eq!(Transform::IDENTITY.apply(p), p);
    }

    #[test]
    fn scale_then_translate_maps_logical_to_device() {
        // setTransform(2) followed by translate(10, 10): logical (1, 0) lands at 2·(11, 10).
        let t = Transform::from_scale(2.0).translate(Vec2::new(10.0, 10.0));
        assert!(close(t.apply(Vec2::new(1.0, 0.0)), Vec2::new(22.0, 20.0)));
        assert_eq!(t.uniform_scale(), 2.0);
    }

    #[test]
    fn quarter_turn_points_down() {
        // +Y is down, so a positive quarter turn maps +X onto +Y.
        let t = Transform::IDENTITY.rotate(FRAC_PI_2);
        assert!(close(t.apply(Vec2::new(5.0, 0.0)), Vec2::new(0.0, 5.0)));
        assert!((t.rotation() - FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn rotation_preserves_uniform_scale() {
        let t = Transform::from_scale(1.5).rotate(0.7);
        assert!((t.uniform_scale() - 1.5).abs() < 1e-5);
    }
}
