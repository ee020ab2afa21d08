use std::cell::Ref;

use anyhow::Result;
use chrono::NaiveDateTime;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::window::WindowId;

use quartz_clock::headless::{HeadlessHost, RasterSurfaceFactory};
use quartz_clock::host::Surface;
use quartz_clock::{AnalogClock, ClockOptions};
use quartz_engine::core::{App, AppControl, FrameCtx};
use quartz_engine::device::GpuInit;
use quartz_engine::paint::Color;
use quartz_engine::render::{PixmapLayer, PixmapRenderer};
use quartz_engine::window::{Runtime, RuntimeConfig};

/// Space around the clock in the initial window, logical pixels.
const MARGIN: f64 = 24.0;

/// Opens a window hosting one running clock and blocks until it closes.
pub fn run(
    options: ClockOptions,
    pinned: Option<NaiveDateTime>,
    surfaces: RasterSurfaceFactory,
    vsync: bool,
) -> Result<()> {
    let edge = options.size.max(1.0) as f64 + 2.0 * MARGIN;
    let config = RuntimeConfig {
        title: "quartz".to_string(),
        initial_size: LogicalSize::new(edge, edge),
        ..RuntimeConfig::default()
    };

    let app = ClockWindow::new(options, pinned, surfaces)?;
    Runtime::run(config, GpuInit::default().vsync(vsync), app)
}

/// Binds the clock's host ports to a window.
///
/// The headless scheduler is driven once per redraw, so the clock paints at
/// the display refresh rate. Window scale changes are pushed into the shared
/// density followed by a resize notification.
struct ClockWindow {
    headless: HeadlessHost<RasterSurfaceFactory>,
    clock: Option<AnalogClock>,
    renderer: PixmapRenderer,
    scale: Option<f64>,
    background: Color,
}

impl ClockWindow {
    fn new(options: ClockOptions, pinned: Option<NaiveDateTime>, surfaces: RasterSurfaceFactory) -> Result<Self> {
        // Density is unknown until the first frame reports the window scale.
        let headless = HeadlessHost::new(surfaces).with_density(None);
        let mut clock = AnalogClock::new(headless.host(), options)?;
        if pinned.is_some() {
            clock.set_time(pinned);
        }
        clock.start();

        Ok(Self {
            headless,
            clock: Some(clock),
            renderer: PixmapRenderer::new(),
            scale: None,
            background: Color::from_srgb_u8(0xec, 0xec, 0xec, 0xff),
        })
    }

    fn sync_density(&mut self, scale: f64) {
        if self.scale == Some(scale) {
            return;
        }
        log::info!("window scale factor {scale}");
        self.scale = Some(scale);
        self.headless.density.set(Some(scale));
        self.headless.resize.notify();
    }
}

impl App for ClockWindow {
    fn on_window_event(&mut self, _window_id: WindowId, event: &WindowEvent) -> AppControl {
        match event {
            WindowEvent::Resized(_) => self.headless.resize.notify(),
            WindowEvent::CloseRequested => {
                if let Some(clock) = self.clock.take() {
                    clock.destroy();
                }
            }
            _ => {}
        }
        AppControl::Continue
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        self.sync_density(ctx.window.scale_factor());
        self.headless.scheduler.run_frame();

        let viewport = ctx.window.viewport();
        let children = self.headless.container.children();
        let surfaces: Vec<Ref<'_, dyn Surface>> = children.iter().map(|s| s.borrow()).collect();
        let layers: Vec<PixmapLayer<'_>> = surfaces
            .iter()
            .filter_map(|s| s.pixmap())
            .map(|pixmap| PixmapLayer {
                pixmap,
                origin: viewport.centered(pixmap.width(), pixmap.height()),
            })
            .collect();

        let renderer = &mut self.renderer;
        ctx.render(self.background, |rctx, target| renderer.render(rctx, target, &layers))
    }
}
