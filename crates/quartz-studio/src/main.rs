mod window_host;

use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{Context, Result};
use chrono::{NaiveDateTime, NaiveTime};
use clap::Parser;

use quartz_clock::headless::{HeadlessHost, RasterSurfaceFactory};
use quartz_clock::{AnalogClock, ClockOptions, ThemePatch};
use quartz_engine::logging::{init_logging, LoggingConfig};
use quartz_engine::paint::Color;
use quartz_engine::text::{FontId, FontSystem};

/// Live analog clock.
///
/// Opens a window with a running clock, or with `--snapshot` renders a single
/// frame to a PNG file without opening a window.
#[derive(Parser, Debug)]
#[command(name = "quartz-studio", version)]
struct Cli {
    /// Clock diameter in logical pixels.
    #[arg(long, default_value_t = 150.0)]
    size: f32,

    /// Pin the clock to a time of day (HH:MM, HH:MM:SS or HH:MM:SS.mmm).
    #[arg(long, value_parser = parse_time)]
    time: Option<NaiveTime>,

    #[arg(long)]
    hide_numbers: bool,

    #[arg(long)]
    hide_ticks: bool,

    /// Second hand color, e.g. "#c0392b".
    #[arg(long, value_parser = parse_color)]
    second_hand: Option<Color>,

    /// Face color, e.g. "#fffbe6".
    #[arg(long, value_parser = parse_color)]
    face: Option<Color>,

    /// TrueType/OpenType font for the numerals. Defaults to a system sans font.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Write one frame to this PNG file and exit.
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Repaint as fast as possible instead of once per display refresh.
    #[arg(long)]
    no_vsync: bool,

    /// Pixel density for `--snapshot`.
    #[arg(long, default_value_t = 1.0)]
    scale: f64,
}

impl Cli {
    fn clock_options(&self) -> ClockOptions {
        let theme = ClockOptions::default().theme.merged(&ThemePatch {
            face: self.face,
            second_hand: self.second_hand,
            ..ThemePatch::default()
        });
        ClockOptions::default()
            .size(self.size)
            .show_numbers(!self.hide_numbers)
            .show_ticks(!self.hide_ticks)
            .theme(theme)
    }

    /// `--time` on today's date.
    fn pinned(&self) -> Option<NaiveDateTime> {
        self.time.map(|t| chrono::Local::now().date_naive().and_time(t))
    }
}

fn parse_time(s: &str) -> Result<NaiveTime, String> {
    ["%H:%M:%S%.f", "%H:%M"]
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(s, fmt).ok())
        .ok_or_else(|| format!("invalid time {s:?}, expected HH:MM[:SS[.mmm]]"))
}

fn parse_color(s: &str) -> Result<Color, String> {
    Color::from_hex(s).map_err(|e| e.to_string())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(LoggingConfig::quartz(log::LevelFilter::Info));

    let surfaces = match load_font(cli.font.as_deref())? {
        Some((fonts, id)) => RasterSurfaceFactory::new().with_font(fonts, id),
        None => {
            log::warn!("no font found; numerals will not be painted (use --font)");
            RasterSurfaceFactory::new()
        }
    };

    match &cli.snapshot {
        Some(path) => snapshot(&cli, surfaces, path),
        None => window_host::run(cli.clock_options(), cli.pinned(), surfaces, !cli.no_vsync),
    }
}

/// Renders one frame headlessly and writes it as PNG.
fn snapshot(cli: &Cli, surfaces: RasterSurfaceFactory, path: &Path) -> Result<()> {
    let headless = HeadlessHost::new(surfaces).with_density(Some(cli.scale));
    let mut clock = AnalogClock::new(headless.host(), cli.clock_options())?;
    clock.set_time(Some(cli.pinned().unwrap_or_else(|| chrono::Local::now().naive_local())));

    let surface = headless
        .container
        .children()
        .into_iter()
        .find(|s| s.borrow().id() == clock.surface_id())
        .context("clock surface is not attached")?;
    let surface = surface.borrow();
    let pixmap = surface.pixmap().context("clock surface has no pixels")?;
    anyhow::ensure!(
        pixmap.width() > 0 && pixmap.height() > 0,
        "nothing to write: backing buffer is {}x{}",
        pixmap.width(),
        pixmap.height()
    );

    let img = image::RgbaImage::from_raw(pixmap.width(), pixmap.height(), pixmap.to_straight_rgba())
        .context("pixmap size does not match its buffer")?;
    img.save(path)
        .with_context(|| format!("failed to write {}", path.display()))?;

    log::info!("wrote {}x{} snapshot to {}", pixmap.width(), pixmap.height(), path.display());
    Ok(())
}

fn load_font(explicit: Option<&Path>) -> Result<Option<(Rc<FontSystem>, FontId)>> {
    let bytes = match explicit {
        Some(path) => {
            Some(std::fs::read(path).with_context(|| format!("failed to read font {}", path.display()))?)
        }
        None => [
            "/usr/share/fonts/TTF/DejaVuSans.ttf",
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/noto/NotoSans-Regular.ttf",
            "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
        ]
        .iter()
        .find_map(|p| std::fs::read(p).ok()),
    };
    let Some(bytes) = bytes else { return Ok(None) };

    let mut fonts = FontSystem::new();
    let id = fonts.load_font(&bytes)?;
    Ok(Some((Rc::new(fonts), id)))
}
