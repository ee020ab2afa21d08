use quartz_engine::canvas::Canvas2d;
use quartz_engine::coords::Transform;

use crate::host::{DisplayDensity, SharedSurface, SurfaceId};

/// Result of the last sizing pass.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SurfaceLayout {
    /// Logical footprint, equal to the configured size in both axes.
    pub logical_size: f32,
    /// Density the backing buffer was sized for.
    pub ratio: f32,
    /// Physical backing-buffer size.
    pub backing: (u32, u32),
}

/// Density to size for; unknown or unusable values fall back to 1.
pub fn effective_ratio(density: &dyn DisplayDensity) -> f32 {
    match density.pixel_ratio() {
        Some(r) if r.is_finite() && r > 0.0 => r as f32,
        _ => 1.0,
    }
}

/// Backing-buffer edge for a logical `size` at `ratio`.
///
/// Negative and NaN products saturate to 0.
pub fn backing_edge(size: f32, ratio: f32) -> u32 {
    (size * ratio).round().max(0.0) as u32
}

/// Owns the clock's drawing surface and keeps it sized for the display.
///
/// After [`resize`](Self::resize) the context carries a uniform scale of the
/// display ratio, so painting happens in logical pixels.
pub struct SurfaceManager {
    surface: SharedSurface,
    id: SurfaceId,
    layout: SurfaceLayout,
}

impl SurfaceManager {
    pub fn new(surface: SharedSurface) -> Self {
        let id = surface.borrow().id();
        Self {
            surface,
            id,
            layout: SurfaceLayout { logical_size: 0.0, ratio: 1.0, backing: (0, 0) },
        }
    }

    #[inline]
    pub fn id(&self) -> SurfaceId {
        self.id
    }

    #[inline]
    pub fn surface(&self) -> &SharedSurface {
        &self.surface
    }

    #[inline]
    pub fn layout(&self) -> SurfaceLayout {
        self.layout
    }

    /// Sizes the surface for `size` logical pixels at the current density and
    /// installs the matching scale transform.
    pub fn resize(&mut self, size: f32, density: &dyn DisplayDensity) -> SurfaceLayout {
        let ratio = effective_ratio(density);
        let edge = backing_edge(size, ratio);

        let mut surface = self.surface.borrow_mut();
        surface.set_backing_size(edge, edge);
        surface.set_display_size(size, size);
        // Resizing may reset the context state, so the transform goes last.
        if let Some(ctx) = surface.context() {
            ctx.set_transform(Transform::from_scale(ratio));
        }

        self.layout = SurfaceLayout { logical_size: size, ratio, backing: (edge, edge) };
        log::trace!("surface {:?} sized {size} @ {ratio}x -> {edge}x{edge}", self.id);
        self.layout
    }

    /// Runs `f` with the drawing context, if the surface has one.
    pub fn with_context<R>(&self, f: impl FnOnce(&mut dyn Canvas2d) -> R) -> Option<R> {
        let mut surface = self.surface.borrow_mut();
        surface.context().map(f)
    }
}
