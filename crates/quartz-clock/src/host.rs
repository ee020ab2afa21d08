//! Capabilities the clock consumes from its host.
//!
//! The clock never touches a platform directly. A host supplies these ports,
//! bundled in a [`Host`], and drives them from its own event loop. Everything
//! is single-threaded: ports take `&self` and use interior mutability, and
//! callbacks are plain `FnOnce`/`Fn` closures run on the host's thread.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use quartz_engine::canvas::Canvas2d;
use quartz_engine::raster::Pixmap;

use crate::time::WallClock;

/// Identity of a drawing surface, unique per process.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct SurfaceId(u64);

impl SurfaceId {
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        SurfaceId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Handle returned by [`FrameScheduler::request_frame`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct FrameHandle(pub u64);

/// Handle returned by [`ResizeSource::subscribe`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ListenerId(pub u64);

/// A visual element with a 2D drawing context.
pub trait Surface {
    fn id(&self) -> SurfaceId;

    /// The 2D drawing context, or `None` when the host cannot provide one.
    fn context(&mut self) -> Option<&mut dyn Canvas2d>;

    /// Physical backing-buffer size. Resizing clears the contents.
    fn set_backing_size(&mut self, width: u32, height: u32);

    fn backing_size(&self) -> (u32, u32);

    /// Footprint in the container, in logical pixels.
    fn set_display_size(&mut self, width: f32, height: f32);

    fn display_size(&self) -> (f32, f32);

    /// Rasterized contents, for surfaces that produce pixels.
    fn pixmap(&self) -> Option<&Pixmap> {
        None
    }
}

pub type SharedSurface = Rc<RefCell<dyn Surface>>;

/// Creates drawing surfaces.
pub trait SurfaceFactory {
    fn create_surface(&self) -> SharedSurface;
}

/// Element that holds child surfaces.
pub trait Container {
    fn append_child(&self, surface: SharedSurface);

    /// Removes the child with `id`. Returns `false` if it was not a child.
    fn remove_child(&self, id: SurfaceId) -> bool;

    fn contains(&self, id: SurfaceId) -> bool;
}

/// Physical pixels per logical pixel of the current display.
pub trait DisplayDensity {
    /// `None` when the host does not know.
    fn pixel_ratio(&self) -> Option<f64>;
}

/// Per-frame callback scheduler, one callback per request.
///
/// A cancelled request must not run. Requests made from inside a callback run
/// on a later frame.
pub trait FrameScheduler {
    fn request_frame(&self, callback: Box<dyn FnOnce()>) -> FrameHandle;

    fn cancel_frame(&self, handle: FrameHandle);
}

/// Host-wide resize notifications, shared by every clock on the host.
pub trait ResizeSource {
    fn subscribe(&self, listener: Rc<dyn Fn()>) -> ListenerId;

    fn unsubscribe(&self, id: ListenerId);
}

/// Everything a clock needs from its host.
#[derive(Clone)]
pub struct Host {
    pub container: Rc<dyn Container>,
    pub surfaces: Rc<dyn SurfaceFactory>,
    pub density: Rc<dyn DisplayDensity>,
    pub scheduler: Rc<dyn FrameScheduler>,
    pub resize: Rc<dyn ResizeSource>,
    pub wall_clock: Rc<dyn WallClock>,
}
