use crate::coords::Vec2;

/// Error returned by [`FontSystem::load_font`].
#[derive(Debug, Clone, thiserror::Error)]
#[error("font load error: {0}")]
pub struct FontLoadError(pub String);

/// Opaque handle to a font loaded into a [`FontSystem`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct FontId(pub(crate) usize);

/// Ascent/descent of a font at one pixel size.
///
/// `descent` is negative (below the baseline), matching fontdue.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct VerticalMetrics {
    pub ascent: f32,
    pub descent: f32,
}

/// Owns a collection of loaded fonts.
///
/// Fonts are immutable after loading. Canvases that paint text share the
/// system through an `Rc` and rasterize glyphs on demand.
#[derive(Default)]
pub struct FontSystem {
    fonts: Vec<fontdue::Font>,
}

impl FontSystem {
    pub fn new() -> Self {
        Self { fonts: Vec::new() }
    }

    /// Parses and stores a TrueType or OpenType font from raw bytes.
    pub fn load_font(&mut self, bytes: &[u8]) -> Result<FontId, FontLoadError> {
        let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
            .map_err(|e| FontLoadError(e.to_string()))?;
        let id = FontId(self.fonts.len());
        self.fonts.push(font);
        log::debug!("loaded font #{}", id.0);
        Ok(id)
    }

    /// Returns the underlying `fontdue::Font`, if `id` is valid.
    pub(crate) fn get(&self, id: FontId) -> Option<&fontdue::Font> {
        self.fonts.get(id.0)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    /// Ascent/descent at `size` pixels, with a 0.8 / -0.2 em fallback for
    /// fonts that carry no horizontal metrics.
    pub fn vertical_metrics(&self, id: FontId, size: f32) -> VerticalMetrics {
        self.get(id)
            .and_then(|f| f.horizontal_line_metrics(size))
            .map(|m| VerticalMetrics { ascent: m.ascent, descent: m.descent })
            .unwrap_or(VerticalMetrics { ascent: size * 0.8, descent: -size * 0.2 })
    }

    /// Single-line extent of `text` at `size` pixels: `(advance width, ascent - descent)`.
    #[must_use]
    pub fn measure_text(&self, text: &str, id: FontId, size: f32) -> Vec2 {
        let vm = self.vertical_metrics(id, size);
        let Some(font) = self.get(id) else {
            return Vec2::new(0.0, vm.ascent - vm.descent);
        };
        let width = text.chars().map(|ch| font.metrics(ch, size).advance_width).sum();
        Vec2::new(width, vm.ascent - vm.descent)
    }
}
