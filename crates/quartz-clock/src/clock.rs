use std::cell::RefCell;
use std::rc::{Rc, Weak};

use chrono::NaiveDateTime;

use crate::error::ClockError;
use crate::geometry::HandAngles;
use crate::host::{FrameHandle, Host, ListenerId, SurfaceId};
use crate::options::{ClockOptions, OptionsPatch};
use crate::render;
use crate::surface::{SurfaceLayout, SurfaceManager};
use crate::time::{ClockTime, TimeSource};

/// Whether the per-frame paint loop is active.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum RunState {
    Stopped,
    Running,
}

/// A live analog clock painted onto a surface it owns inside the host container.
///
/// Construction paints once. [`start`](Self::start) repaints on every frame the
/// host scheduler delivers until [`stop`](Self::stop). [`set_time`](Self::set_time)
/// and [`update_options`](Self::update_options) repaint immediately whatever the
/// run state. [`destroy`](Self::destroy) (or dropping the clock) stops the loop,
/// unsubscribes from resize notifications and detaches the surface.
pub struct AnalogClock {
    inner: Rc<RefCell<Inner>>,
}

struct Inner {
    host: Host,
    options: Rc<ClockOptions>,
    time_source: TimeSource,
    run_state: RunState,
    surface: SurfaceManager,
    /// Frame requested by the running loop.
    pending: Option<FrameHandle>,
    /// Bumped on every stop; frames carry the epoch they were requested in.
    epoch: u64,
    listener: Option<ListenerId>,
    destroyed: bool,
}

impl AnalogClock {
    /// Creates the surface, attaches it to the host container and paints the
    /// first frame.
    ///
    /// Fails with [`ClockError::ContextUnavailable`] if the surface has no 2D
    /// context; the container is left untouched in that case.
    pub fn new(host: Host, options: ClockOptions) -> Result<Self, ClockError> {
        let surface = host.surfaces.create_surface();
        if surface.borrow_mut().context().is_none() {
            log::error!("surface {:?} has no 2D context", surface.borrow().id());
            return Err(ClockError::ContextUnavailable);
        }
        warn_issues(&options);

        host.container.append_child(surface.clone());
        let mut manager = SurfaceManager::new(surface);
        manager.resize(options.size, &*host.density);

        let inner = Rc::new(RefCell::new(Inner {
            host: host.clone(),
            options: Rc::new(options),
            time_source: TimeSource::Wall,
            run_state: RunState::Stopped,
            surface: manager,
            pending: None,
            epoch: 0,
            listener: None,
            destroyed: false,
        }));

        let weak = Rc::downgrade(&inner);
        let listener = host.resize.subscribe(Rc::new(move || on_resize(&weak)));
        inner.borrow_mut().listener = Some(listener);

        inner.borrow().draw();
        log::debug!("clock created on surface {:?}", inner.borrow().surface.id());
        Ok(Self { inner })
    }

    /// Paints now, then once per scheduled frame. No-op while running.
    pub fn start(&mut self) {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.destroyed || inner.run_state == RunState::Running {
                return;
            }
            inner.run_state = RunState::Running;
            inner.draw();
        }
        log::debug!("clock started");
        request_frame(&self.inner);
    }

    /// Cancels the pending frame. No paint happens after this returns, even
    /// for a frame the host has already dequeued.
    pub fn stop(&mut self) {
        stop(&self.inner);
    }

    /// Pins the clock to `instant`, or follows the wall clock again with
    /// `None`. Repaints immediately.
    pub fn set_time(&mut self, instant: Option<NaiveDateTime>) {
        let mut inner = self.inner.borrow_mut();
        if inner.destroyed {
            return;
        }
        inner.time_source = TimeSource::from_override(instant);
        inner.draw();
    }

    /// Applies `patch` over the current options (theme colors merge one by
    /// one), re-sizes the surface and repaints.
    pub fn update_options(&mut self, patch: &OptionsPatch) {
        let mut inner = self.inner.borrow_mut();
        if inner.destroyed {
            return;
        }
        let next = inner.options.merged(patch);
        warn_issues(&next);
        inner.options = Rc::new(next);
        inner.resize();
        inner.draw();
    }

    /// Tears the clock down. Dropping the clock does the same.
    pub fn destroy(mut self) {
        self.teardown();
    }

    /// Active configuration. Updates replace it; a held snapshot never changes.
    pub fn options(&self) -> Rc<ClockOptions> {
        self.inner.borrow().options.clone()
    }

    pub fn run_state(&self) -> RunState {
        self.inner.borrow().run_state
    }

    pub fn time_source(&self) -> TimeSource {
        self.inner.borrow().time_source
    }

    pub fn surface_layout(&self) -> SurfaceLayout {
        self.inner.borrow().surface.layout()
    }

    pub fn surface_id(&self) -> SurfaceId {
        self.inner.borrow().surface.id()
    }

    /// Hand angles for the instant the clock would paint now.
    pub fn hand_angles(&self) -> HandAngles {
        HandAngles::from_time(&self.inner.borrow().current_time())
    }

    fn teardown(&mut self) {
        if self.inner.borrow().destroyed {
            return;
        }
        stop(&self.inner);

        let mut inner = self.inner.borrow_mut();
        inner.destroyed = true;
        if let Some(id) = inner.listener.take() {
            inner.host.resize.unsubscribe(id);
        }
        let surface = inner.surface.id();
        if inner.host.container.contains(surface) {
            inner.host.container.remove_child(surface);
        }
        log::debug!("clock destroyed, surface {surface:?} detached");
    }
}

impl Drop for AnalogClock {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl Inner {
    fn current_time(&self) -> ClockTime {
        let now = self.time_source.resolve(&*self.host.wall_clock, self.options.use_local_time);
        ClockTime::from_datetime(&now)
    }

    fn draw(&self) {
        let time = self.current_time();
        let options = &self.options;
        self.surface.with_context(|canvas| render::paint(canvas, options, &time));
    }

    fn resize(&mut self) {
        let density = self.host.density.clone();
        self.surface.resize(self.options.size, &*density);
    }
}

fn warn_issues(options: &ClockOptions) {
    for issue in options.issues() {
        log::warn!("clock option: {issue}");
    }
}

fn request_frame(inner: &Rc<RefCell<Inner>>) {
    let (scheduler, epoch) = {
        let i = inner.borrow();
        (i.host.scheduler.clone(), i.epoch)
    };
    let weak = Rc::downgrade(inner);
    let handle = scheduler.request_frame(Box::new(move || on_frame(&weak, epoch)));
    inner.borrow_mut().pending = Some(handle);
}

fn on_frame(weak: &Weak<RefCell<Inner>>, epoch: u64) {
    let Some(inner) = weak.upgrade() else { return };
    {
        let mut i = inner.borrow_mut();
        if i.run_state != RunState::Running || i.epoch != epoch {
            log::trace!("stale frame from epoch {epoch} dropped");
            return;
        }
        i.pending = None;
        i.draw();
    }
    request_frame(&inner);
}

fn on_resize(weak: &Weak<RefCell<Inner>>) {
    let Some(inner) = weak.upgrade() else { return };
    let mut i = inner.borrow_mut();
    if i.destroyed {
        return;
    }
    i.resize();
    i.draw();
}

fn stop(inner: &Rc<RefCell<Inner>>) {
    let (scheduler, pending) = {
        let mut i = inner.borrow_mut();
        let was_running = i.run_state == RunState::Running;
        i.run_state = RunState::Stopped;
        i.epoch += 1;
        if was_running {
            log::debug!("clock stopped");
        }
        (i.host.scheduler.clone(), i.pending.take())
    };
    if let Some(handle) = pending {
        scheduler.cancel_frame(handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    use chrono::NaiveDate;
    use core::f32::consts::FRAC_PI_2;
    use quartz_engine::paint::Color;
    use quartz_engine::scene::{DrawCmd, DrawKind};

    use crate::headless::{HeadlessHost, RecordingSurface, RecordingSurfaceFactory};
    use crate::host::{Container, FrameScheduler, Surface, SurfaceFactory};
    use crate::options::ThemePatch;
    use crate::time::FixedClock;

    fn at(h: u32, m: u32, s: u32, ms: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap().and_hms_milli_opt(h, m, s, ms).unwrap()
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    struct Fixture {
        headless: HeadlessHost<RecordingSurfaceFactory>,
        wall: Rc<FixedClock>,
    }

    impl Fixture {
        fn new() -> Self {
            let wall = Rc::new(FixedClock::new(at(10, 8, 0, 0)));
            let headless = HeadlessHost::recording().with_wall_clock(wall.clone());
            Self { headless, wall }
        }

        fn clock(&self, options: ClockOptions) -> AnalogClock {
            AnalogClock::new(self.headless.host(), options).unwrap()
        }

        fn surface(&self) -> Rc<RefCell<RecordingSurface>> {
            self.headless.surfaces.last().unwrap()
        }

        /// Frames painted so far on the most recent surface.
        fn paints(&self) -> usize {
            self.surface().borrow().draw_list().count(DrawKind::Clear)
        }
    }

    // ── construction ──────────────────────────────────────────────────────

    #[test]
    fn construction_sizes_for_density_and_paints_once() {
        let f = Fixture::new();
        f.headless.density.set(Some(2.0));
        let clock = f.clock(ClockOptions::default().size(100.0));

        let layout = clock.surface_layout();
        assert_eq!(layout.logical_size, 100.0);
        assert_eq!(layout.backing, (200, 200));
        let surface = f.surface();
        assert_eq!(surface.borrow().display_size(), (100.0, 100.0));
        assert_eq!(surface.borrow().backing_size(), (200, 200));

        assert_eq!(f.paints(), 1);
        assert_eq!(clock.run_state(), RunState::Stopped);
        assert_eq!(clock.time_source(), TimeSource::Wall);
        assert_eq!(f.headless.container.len(), 1);
        assert!(f.headless.container.contains(clock.surface_id()));
    }

    #[test]
    fn default_size_without_density_info() {
        let f = Fixture::new();
        f.headless.density.set(None);
        let clock = f.clock(ClockOptions::default());
        assert_eq!(clock.surface_layout().backing, (150, 150));
        assert_eq!(clock.surface_layout().ratio, 1.0);
    }

    #[test]
    fn missing_context_fails_and_attaches_nothing() {
        let headless = HeadlessHost::new(RecordingSurfaceFactory::without_context());
        let result = AnalogClock::new(headless.host(), ClockOptions::default());
        assert!(matches!(result, Err(ClockError::ContextUnavailable)));
        assert!(headless.container.is_empty());
        assert_eq!(headless.resize.listener_count(), 0);
    }

    #[test]
    fn size_100_without_numbers_paints_ticks_only() {
        let f = Fixture::new();
        let _clock = f.clock(ClockOptions::default().size(100.0).show_numbers(false));
        let list = f.surface().borrow().draw_list();
        assert_eq!(list.count(DrawKind::Text), 0);
        assert_eq!(list.count(DrawKind::Line), 60 + 3);
        let face = list.items().iter().find_map(|c| match c {
            DrawCmd::Circle(c) if c.fill.is_some() => Some(c.radius),
            _ => None,
        });
        assert_eq!(face, Some(46.0));
    }

    // ── time ──────────────────────────────────────────────────────────────

    #[test]
    fn set_time_pins_hands() {
        let f = Fixture::new();
        let mut clock = f.clock(ClockOptions::default());

        clock.set_time(Some(at(3, 0, 0, 0)));
        let a = clock.hand_angles();
        assert!(approx(a.hour, 0.0));
        assert!(approx(a.minute, -FRAC_PI_2));
        assert!(approx(a.second, -FRAC_PI_2));

        clock.set_time(Some(at(6, 0, 0, 0)));
        assert!(approx(clock.hand_angles().hour, FRAC_PI_2));
        assert_eq!(f.paints(), 3);
    }

    #[test]
    fn pinned_time_repaints_identically_despite_wall_drift() {
        let f = Fixture::new();
        let mut clock = f.clock(ClockOptions::default());
        let surface = f.surface();
        surface.borrow_mut().reset();

        clock.set_time(Some(at(0, 0, 30, 500)));
        let first = surface.borrow().draw_list();
        surface.borrow_mut().reset();

        f.wall.advance(chrono::Duration::seconds(17));
        clock.set_time(Some(at(0, 0, 30, 500)));
        let second = surface.borrow().draw_list();
        assert_eq!(first.items(), second.items());
    }

    #[test]
    fn clearing_override_follows_wall_clock() {
        let f = Fixture::new();
        let mut clock = f.clock(ClockOptions::default());
        clock.set_time(Some(at(3, 0, 0, 0)));
        clock.set_time(None);
        assert_eq!(clock.time_source(), TimeSource::Wall);

        f.wall.set(at(6, 0, 0, 0));
        assert!(approx(clock.hand_angles().hour, FRAC_PI_2));
    }

    // ── run loop ──────────────────────────────────────────────────────────

    #[test]
    fn start_paints_now_and_every_frame() {
        let f = Fixture::new();
        let mut clock = f.clock(ClockOptions::default());
        clock.start();
        assert_eq!(clock.run_state(), RunState::Running);
        assert_eq!(f.paints(), 2);

        for _ in 0..3 {
            assert_eq!(f.headless.scheduler.run_frame(), 1);
        }
        assert_eq!(f.paints(), 5);
        assert_eq!(f.headless.scheduler.pending_count(), 1);
    }

    #[test]
    fn start_twice_is_a_no_op() {
        let f = Fixture::new();
        let mut clock = f.clock(ClockOptions::default());
        clock.start();
        clock.start();
        assert_eq!(f.paints(), 2);
        assert_eq!(f.headless.scheduler.pending_count(), 1);
    }

    #[test]
    fn stop_cancels_pending_frame() {
        let f = Fixture::new();
        let mut clock = f.clock(ClockOptions::default());
        clock.start();
        f.headless.scheduler.run_frame();
        let before = f.paints();

        clock.stop();
        assert_eq!(clock.run_state(), RunState::Stopped);
        assert_eq!(f.headless.scheduler.pending_count(), 0);
        f.headless.scheduler.run_frame();
        assert_eq!(f.paints(), before);

        clock.stop();
        assert_eq!(clock.run_state(), RunState::Stopped);
    }

    /// Scheduler that has already handed its frames to the host: cancelling
    /// has no effect on them.
    #[derive(Default)]
    struct DequeuedScheduler {
        next: Cell<u64>,
        queue: RefCell<Vec<Box<dyn FnOnce()>>>,
    }

    impl DequeuedScheduler {
        fn fire(&self) {
            let batch = std::mem::take(&mut *self.queue.borrow_mut());
            for cb in batch {
                cb();
            }
        }
    }

    impl FrameScheduler for DequeuedScheduler {
        fn request_frame(&self, callback: Box<dyn FnOnce()>) -> FrameHandle {
            self.next.set(self.next.get() + 1);
            self.queue.borrow_mut().push(callback);
            FrameHandle(self.next.get())
        }

        fn cancel_frame(&self, _handle: FrameHandle) {}
    }

    #[test]
    fn stop_wins_over_already_dequeued_frame() {
        let f = Fixture::new();
        let scheduler = Rc::new(DequeuedScheduler::default());
        let mut host = f.headless.host();
        host.scheduler = scheduler.clone();

        let mut clock = AnalogClock::new(host, ClockOptions::default()).unwrap();
        clock.start();
        scheduler.fire();
        let before = f.paints();

        clock.stop();
        scheduler.fire();
        assert_eq!(f.paints(), before);

        // Restarting does not revive the stale frame either.
        clock.start();
        assert_eq!(f.paints(), before + 1);
        scheduler.fire();
        assert_eq!(f.paints(), before + 2);
    }

    #[test]
    fn set_time_repaints_while_stopped() {
        let f = Fixture::new();
        let mut clock = f.clock(ClockOptions::default());
        clock.set_time(Some(at(1, 2, 3, 0)));
        assert_eq!(clock.run_state(), RunState::Stopped);
        assert_eq!(f.paints(), 2);
        assert_eq!(f.headless.scheduler.pending_count(), 0);
    }

    // ── options ───────────────────────────────────────────────────────────

    #[test]
    fn partial_theme_update_changes_one_color() {
        let f = Fixture::new();
        let mut clock = f.clock(ClockOptions::default());
        let before = clock.options();
        let red = Color::from_hex("#ff0000").unwrap();

        clock.update_options(&OptionsPatch::new().theme(ThemePatch::new().second_hand(red)));
        let after = clock.options();

        assert_eq!(after.theme.second_hand, red);
        assert_eq!(after.theme.face, before.theme.face);
        assert_eq!(after.theme.border, before.theme.border);
        assert_eq!(after.theme.hour_mark, before.theme.hour_mark);
        assert_eq!(after.theme.hour_hand, before.theme.hour_hand);
        assert_eq!(after.theme.minute_hand, before.theme.minute_hand);
        assert_eq!(after.theme.number, before.theme.number);
        // The earlier snapshot is a separate value.
        assert_ne!(before.theme.second_hand, red);
        assert_eq!(f.paints(), 2);
    }

    #[test]
    fn size_update_resizes_backing() {
        let f = Fixture::new();
        f.headless.density.set(Some(1.5));
        let mut clock = f.clock(ClockOptions::default());
        clock.update_options(&OptionsPatch::new().size(201.0));
        assert_eq!(clock.surface_layout().backing, (302, 302));
        assert_eq!(f.surface().borrow().display_size(), (201.0, 201.0));
    }

    #[test]
    fn bad_values_are_accepted() {
        let f = Fixture::new();
        let mut clock = f.clock(ClockOptions::default());
        clock.update_options(&OptionsPatch::new().size(-20.0).tick_width(-3.0));
        assert_eq!(clock.options().size, -20.0);
        assert_eq!(clock.surface_layout().backing, (0, 0));
    }

    #[test]
    fn huge_size_on_raster_surface_paints_nothing() {
        let headless = HeadlessHost::raster();
        let mut clock = AnalogClock::new(headless.host(), ClockOptions::default()).unwrap();
        clock.start();

        clock.update_options(&OptionsPatch::new().size(1.0e10));
        headless.scheduler.run_frame();
        let surface = headless.container.children()[0].clone();
        assert_eq!(surface.borrow().backing_size(), (0, 0));
        assert_eq!(surface.borrow().pixmap().map(|p| p.data().len()), Some(0));

        clock.update_options(&OptionsPatch::new().size(40.0));
        headless.scheduler.run_frame();
        assert_eq!(surface.borrow().backing_size(), (40, 40));
    }

    // ── resize ────────────────────────────────────────────────────────────

    #[test]
    fn resize_notification_tracks_density() {
        let f = Fixture::new();
        let clock = f.clock(ClockOptions::default().size(100.0));
        f.headless.density.set(Some(3.0));
        f.headless.resize.notify();

        assert_eq!(clock.surface_layout().backing, (300, 300));
        assert_eq!(f.surface().borrow().display_size(), (100.0, 100.0));
        assert_eq!(f.paints(), 2);
    }

    // ── teardown ──────────────────────────────────────────────────────────

    #[test]
    fn destroy_detaches_surface_and_listener() {
        let f = Fixture::new();
        let other = f.headless.surfaces.create_surface();
        f.headless.container.append_child(other);

        let mut clock = f.clock(ClockOptions::default());
        let surface = f.surface();
        clock.start();
        assert_eq!(f.headless.container.len(), 2);
        assert_eq!(f.headless.resize.listener_count(), 1);

        clock.destroy();
        assert_eq!(f.headless.container.len(), 1);
        assert_eq!(f.headless.resize.listener_count(), 0);
        assert_eq!(f.headless.scheduler.pending_count(), 0);

        let resizes = surface.borrow().resize_count();
        f.headless.density.set(Some(2.0));
        f.headless.resize.notify();
        assert_eq!(surface.borrow().resize_count(), resizes);
    }

    #[test]
    fn destroy_leaves_other_clocks_alone() {
        let f = Fixture::new();
        let a = f.clock(ClockOptions::default());
        let b = f.clock(ClockOptions::default().size(80.0));
        assert_eq!(f.headless.resize.listener_count(), 2);

        a.destroy();
        assert_eq!(f.headless.resize.listener_count(), 1);
        assert_eq!(f.headless.container.len(), 1);
        assert!(f.headless.container.contains(b.surface_id()));

        f.headless.density.set(Some(2.0));
        f.headless.resize.notify();
        assert_eq!(b.surface_layout().backing, (160, 160));
    }

    #[test]
    fn destroy_skips_surface_already_removed() {
        let f = Fixture::new();
        let other = f.headless.surfaces.create_surface();
        f.headless.container.append_child(other);
        let clock = f.clock(ClockOptions::default());

        assert!(f.headless.container.remove_child(clock.surface_id()));
        clock.destroy();
        assert_eq!(f.headless.container.len(), 1);
    }

    #[test]
    fn drop_tears_down_like_destroy() {
        let f = Fixture::new();
        {
            let mut clock = f.clock(ClockOptions::default());
            clock.start();
        }
        assert!(f.headless.container.is_empty());
        assert_eq!(f.headless.resize.listener_count(), 0);
        assert_eq!(f.headless.scheduler.pending_count(), 0);
        assert_eq!(f.headless.scheduler.run_frame(), 0);
    }
}
