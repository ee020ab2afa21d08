use super::Vec2;

/// Window drawable area in physical pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Size as the `vec2<f32>` shaders divide by. Never zero.
    #[inline]
    pub fn extent(self) -> [f32; 2] {
        [self.width.max(1) as f32, self.height.max(1) as f32]
    }

    /// Whole-pixel top-left corner that centers a `width` × `height` box.
    ///
    /// Boxes larger than the viewport get a negative origin and are clipped
    /// evenly on both sides.
    pub fn centered(self, width: u32, height: u32) -> Vec2 {
        let offset = |outer: u32, inner: u32| ((outer as f32 - inner as f32) / 2.0).floor();
        Vec2::new(offset(self.width, width), offset(self.height, height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centers_on_whole_pixels() {
        let v = Viewport::new(300, 201);
        assert_eq!(v.centered(100, 100), Vec2::new(100.0, 50.0));
        assert_eq!(v.centered(400, 201), Vec2::new(-50.0, 0.0));
    }

    #[test]
    fn extent_never_zero() {
        assert_eq!(Viewport::new(0, 0).extent(), [1.0, 1.0]);
        assert!(Viewport::new(0, 10).is_empty());
        assert!(!Viewport::new(1, 1).is_empty());
    }
}
