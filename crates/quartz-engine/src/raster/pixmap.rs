use crate::paint::Color;

/// RGBA8 premultiplied pixel buffer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pixmap {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

/// Largest pixel count a pixmap will allocate (8192², 256 MiB of RGBA).
pub const MAX_AREA: u64 = 8_192 * 8_192;

/// Byte length for `width × height`, or `None` past [`MAX_AREA`].
fn byte_len(width: u32, height: u32) -> Option<usize> {
    let area = (width as u64).checked_mul(height as u64)?;
    if area > MAX_AREA {
        return None;
    }
    usize::try_from(area).ok()?.checked_mul(4)
}

impl Pixmap {
    /// Creates a transparent pixmap.
    ///
    /// Sizes past [`MAX_AREA`] give an empty 0×0 pixmap.
    pub fn new(width: u32, height: u32) -> Self {
        let mut pixmap = Self::default();
        pixmap.resize(width, height);
        pixmap
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw premultiplied bytes, row-major, 4 bytes per pixel.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Reallocates to `width × height`. Contents are discarded (transparent).
    ///
    /// A request past [`MAX_AREA`] leaves an empty 0×0 pixmap, so nothing is
    /// painted.
    pub fn resize(&mut self, width: u32, height: u32) {
        let (width, height, len) = match byte_len(width, height) {
            Some(len) => (width, height, len),
            None => {
                log::warn!("pixmap {width}x{height} exceeds {MAX_AREA} pixels; using 0x0");
                (0, 0, 0)
            }
        };
        self.width = width;
        self.height = height;
        self.data.clear();
        self.data.shrink_to(len);
        self.data.resize(len, 0);
    }

    /// Returns the premultiplied pixel at `(x, y)`, if in bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = self.index(x, y);
        Some([self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]])
    }

    /// Resets the half-open pixel range `[x0, x1) × [y0, y1)` to transparent.
    /// Out-of-bounds parts are ignored.
    pub fn clear_region(&mut self, x0: u32, y0: u32, x1: u32, y1: u32) {
        let (x1, y1) = (x1.min(self.width), y1.min(self.height));
        for y in y0..y1 {
            for x in x0..x1 {
                let i = self.index(x, y);
                self.data[i..i + 4].fill(0);
            }
        }
    }

    /// Source-over composite of premultiplied `src` onto `(x, y)`.
    #[inline]
    pub fn blend(&mut self, x: u32, y: u32, src: Color) {
        if x >= self.width || y >= self.height || src.a <= 0.0 {
            return;
        }
        let i = self.index(x, y);
        let inv = 1.0 - src.a;
        let px = &mut self.data[i..i + 4];
        for (channel, s) in px.iter_mut().zip([src.r, src.g, src.b, src.a]) {
            let d = *channel as f32 / 255.0;
            *channel = ((s + d * inv).clamp(0.0, 1.0) * 255.0).round() as u8;
        }
    }

    /// Straight-alpha copy of the pixel data, as image encoders expect.
    pub fn to_straight_rgba(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        for px in out.chunks_exact_mut(4) {
            let a = px[3];
            if a == 0 || a == 255 {
                continue;
            }
            let k = 255.0 / a as f32;
            for c in &mut px[..3] {
                *c = (*c as f32 * k).round().min(255.0) as u8;
            }
        }
        out
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }
}
