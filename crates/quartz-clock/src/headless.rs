//! In-memory bindings for the host ports.
//!
//! Used by the snapshot renderer, the windowed studio (which drives the
//! scheduler from its redraw loop) and the tests.

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::Rc;

use quartz_engine::canvas::{Canvas2d, RecordingCanvas};
use quartz_engine::raster::{PixelCanvas, Pixmap};
use quartz_engine::scene::DrawList;
use quartz_engine::text::{FontId, FontSystem};

use crate::host::{
    Container, DisplayDensity, FrameHandle, FrameScheduler, Host, ListenerId, ResizeSource,
    SharedSurface, Surface, SurfaceFactory, SurfaceId,
};
use crate::time::{SystemClock, WallClock};

// ── scheduler ─────────────────────────────────────────────────────────────

type FrameCallback = Box<dyn FnOnce()>;

/// Frame scheduler whose frames fire when the host calls [`run_frame`](Self::run_frame).
#[derive(Default)]
pub struct ManualFrameScheduler {
    next: Cell<u64>,
    queue: RefCell<Vec<(FrameHandle, FrameCallback)>>,
    /// Handles cancelled while their frame batch is running.
    cancelled: RefCell<HashSet<FrameHandle>>,
}

impl ManualFrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs every callback requested before this call, in request order.
    ///
    /// Callbacks may request new frames (they run on the next call) or cancel
    /// requests still waiting in the current batch. Returns the number of
    /// callbacks run.
    pub fn run_frame(&self) -> usize {
        let batch = std::mem::take(&mut *self.queue.borrow_mut());
        let mut ran = 0;
        for (handle, callback) in batch {
            if self.cancelled.borrow_mut().remove(&handle) {
                continue;
            }
            callback();
            ran += 1;
        }
        self.cancelled.borrow_mut().clear();
        ran
    }

    /// Requests waiting for the next frame.
    pub fn pending_count(&self) -> usize {
        self.queue.borrow().len()
    }
}

impl FrameScheduler for ManualFrameScheduler {
    fn request_frame(&self, callback: Box<dyn FnOnce()>) -> FrameHandle {
        let handle = FrameHandle(self.next.get());
        self.next.set(handle.0 + 1);
        self.queue.borrow_mut().push((handle, callback));
        handle
    }

    fn cancel_frame(&self, handle: FrameHandle) {
        let mut queue = self.queue.borrow_mut();
        let before = queue.len();
        queue.retain(|(h, _)| *h != handle);
        if queue.len() == before {
            // Possibly part of the batch currently running.
            self.cancelled.borrow_mut().insert(handle);
        }
    }
}

// ── resize ────────────────────────────────────────────────────────────────

/// Host-wide resize notification source.
#[derive(Default)]
pub struct ResizeNotifier {
    next: Cell<u64>,
    listeners: RefCell<Vec<(ListenerId, Rc<dyn Fn()>)>>,
}

impl ResizeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls every listener subscribed at the time of the call.
    pub fn notify(&self) {
        let listeners: Vec<_> = self.listeners.borrow().iter().map(|(_, l)| l.clone()).collect();
        log::trace!("resize notification to {} listener(s)", listeners.len());
        for listener in listeners {
            listener();
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

impl ResizeSource for ResizeNotifier {
    fn subscribe(&self, listener: Rc<dyn Fn()>) -> ListenerId {
        let id = ListenerId(self.next.get());
        self.next.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, listener));
        id
    }

    fn unsubscribe(&self, id: ListenerId) {
        self.listeners.borrow_mut().retain(|(l, _)| *l != id);
    }
}

// ── density ───────────────────────────────────────────────────────────────

/// Display density set by the host.
#[derive(Debug, Default)]
pub struct SharedDensity {
    ratio: Cell<Option<f64>>,
}

impl SharedDensity {
    pub fn new(ratio: Option<f64>) -> Self {
        Self { ratio: Cell::new(ratio) }
    }

    pub fn set(&self, ratio: Option<f64>) {
        self.ratio.set(ratio);
    }
}

impl DisplayDensity for SharedDensity {
    fn pixel_ratio(&self) -> Option<f64> {
        self.ratio.get()
    }
}

// ── container ─────────────────────────────────────────────────────────────

/// Ordered list of child surfaces.
#[derive(Default)]
pub struct ChildList {
    children: RefCell<Vec<SharedSurface>>,
}

impl ChildList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.children.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.borrow().is_empty()
    }

    pub fn children(&self) -> Vec<SharedSurface> {
        self.children.borrow().clone()
    }
}

impl Container for ChildList {
    fn append_child(&self, surface: SharedSurface) {
        self.children.borrow_mut().push(surface);
    }

    fn remove_child(&self, id: SurfaceId) -> bool {
        let mut children = self.children.borrow_mut();
        let before = children.len();
        children.retain(|c| c.borrow().id() != id);
        children.len() != before
    }

    fn contains(&self, id: SurfaceId) -> bool {
        self.children.borrow().iter().any(|c| c.borrow().id() == id)
    }
}

// ── raster surfaces ───────────────────────────────────────────────────────

/// Surface backed by a [`PixelCanvas`].
pub struct RasterSurface {
    id: SurfaceId,
    canvas: PixelCanvas,
    display: (f32, f32),
}

impl Surface for RasterSurface {
    fn id(&self) -> SurfaceId {
        self.id
    }

    fn context(&mut self) -> Option<&mut dyn Canvas2d> {
        Some(&mut self.canvas)
    }

    fn set_backing_size(&mut self, width: u32, height: u32) {
        self.canvas.resize(width, height);
    }

    fn backing_size(&self) -> (u32, u32) {
        let p = self.canvas.pixmap();
        (p.width(), p.height())
    }

    fn set_display_size(&mut self, width: f32, height: f32) {
        self.display = (width, height);
    }

    fn display_size(&self) -> (f32, f32) {
        self.display
    }

    fn pixmap(&self) -> Option<&Pixmap> {
        Some(self.canvas.pixmap())
    }
}

/// Creates [`RasterSurface`]s, optionally with a font for numerals.
#[derive(Default)]
pub struct RasterSurfaceFactory {
    font: Option<(Rc<FontSystem>, FontId)>,
}

impl RasterSurfaceFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_font(mut self, fonts: Rc<FontSystem>, font: FontId) -> Self {
        self.font = Some((fonts, font));
        self
    }
}

impl SurfaceFactory for RasterSurfaceFactory {
    fn create_surface(&self) -> SharedSurface {
        let mut canvas = PixelCanvas::new(0, 0);
        if let Some((fonts, font)) = &self.font {
            canvas = canvas.with_font(fonts.clone(), *font);
        }
        let surface = RasterSurface { id: SurfaceId::next(), canvas, display: (0.0, 0.0) };
        log::trace!("created raster surface {:?}", surface.id);
        Rc::new(RefCell::new(surface))
    }
}

// ── recording surfaces ────────────────────────────────────────────────────

/// Surface that records drawing calls instead of producing pixels.
pub struct RecordingSurface {
    id: SurfaceId,
    canvas: Option<RecordingCanvas>,
    backing: (u32, u32),
    display: (f32, f32),
    resizes: usize,
}

impl RecordingSurface {
    /// Everything drawn so far, in device space. Empty without a context.
    pub fn draw_list(&self) -> DrawList {
        self.canvas.as_ref().map(|c| c.draw_list().clone()).unwrap_or_default()
    }

    /// Drops recorded commands.
    pub fn reset(&mut self) {
        if let Some(c) = self.canvas.as_mut() {
            c.reset();
        }
    }

    /// Number of backing-buffer resizes.
    pub fn resize_count(&self) -> usize {
        self.resizes
    }

    pub fn save_depth(&self) -> usize {
        self.canvas.as_ref().map_or(0, |c| c.save_depth())
    }
}

impl Surface for RecordingSurface {
    fn id(&self) -> SurfaceId {
        self.id
    }

    fn context(&mut self) -> Option<&mut dyn Canvas2d> {
        self.canvas.as_mut().map(|c| c as &mut dyn Canvas2d)
    }

    fn set_backing_size(&mut self, width: u32, height: u32) {
        self.backing = (width, height);
        self.resizes += 1;
    }

    fn backing_size(&self) -> (u32, u32) {
        self.backing
    }

    fn set_display_size(&mut self, width: f32, height: f32) {
        self.display = (width, height);
    }

    fn display_size(&self) -> (f32, f32) {
        self.display
    }
}

/// Creates [`RecordingSurface`]s and keeps a handle to each.
#[derive(Default)]
pub struct RecordingSurfaceFactory {
    without_context: bool,
    created: RefCell<Vec<Rc<RefCell<RecordingSurface>>>>,
}

impl RecordingSurfaceFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Surfaces from this factory provide no 2D context.
    pub fn without_context() -> Self {
        Self { without_context: true, ..Self::default() }
    }

    pub fn surfaces(&self) -> Vec<Rc<RefCell<RecordingSurface>>> {
        self.created.borrow().clone()
    }

    /// The most recently created surface.
    pub fn last(&self) -> Option<Rc<RefCell<RecordingSurface>>> {
        self.created.borrow().last().cloned()
    }
}

impl SurfaceFactory for RecordingSurfaceFactory {
    fn create_surface(&self) -> SharedSurface {
        let surface = Rc::new(RefCell::new(RecordingSurface {
            id: SurfaceId::next(),
            canvas: (!self.without_context).then(RecordingCanvas::new),
            backing: (0, 0),
            display: (0.0, 0.0),
            resizes: 0,
        }));
        self.created.borrow_mut().push(surface.clone());
        surface
    }
}

// ── bundle ────────────────────────────────────────────────────────────────

/// A complete in-memory host with typed handles to every binding.
pub struct HeadlessHost<F: SurfaceFactory + 'static> {
    pub container: Rc<ChildList>,
    pub surfaces: Rc<F>,
    pub density: Rc<SharedDensity>,
    pub scheduler: Rc<ManualFrameScheduler>,
    pub resize: Rc<ResizeNotifier>,
    pub wall_clock: Rc<dyn WallClock>,
}

impl<F: SurfaceFactory + 'static> HeadlessHost<F> {
    /// Host with density 1 and the system clock.
    pub fn new(surfaces: F) -> Self {
        Self {
            container: Rc::new(ChildList::new()),
            surfaces: Rc::new(surfaces),
            density: Rc::new(SharedDensity::new(Some(1.0))),
            scheduler: Rc::new(ManualFrameScheduler::new()),
            resize: Rc::new(ResizeNotifier::new()),
            wall_clock: Rc::new(SystemClock),
        }
    }

    pub fn with_wall_clock(mut self, clock: Rc<dyn WallClock>) -> Self {
        self.wall_clock = clock;
        self
    }

    pub fn with_density(self, ratio: Option<f64>) -> Self {
        self.density.set(ratio);
        self
    }

    /// Port bundle for [`AnalogClock::new`](crate::AnalogClock::new).
    pub fn host(&self) -> Host {
        Host {
            container: self.container.clone(),
            surfaces: self.surfaces.clone(),
            density: self.density.clone(),
            scheduler: self.scheduler.clone(),
            resize: self.resize.clone(),
            wall_clock: self.wall_clock.clone(),
        }
    }
}

impl HeadlessHost<RecordingSurfaceFactory> {
    pub fn recording() -> Self {
        Self::new(RecordingSurfaceFactory::new())
    }
}

impl HeadlessHost<RasterSurfaceFactory> {
    pub fn raster() -> Self {
        Self::new(RasterSurfaceFactory::new())
    }
}
