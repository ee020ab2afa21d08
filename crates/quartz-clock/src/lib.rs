//! Analog clock widget.
//!
//! The widget paints a face, 60 ticks, numerals and three smoothly moving hands
//! onto a drawing surface it owns inside a host container. Everything the
//! host provides (surfaces, display density, the per-frame scheduler, resize
//! notifications, the wall clock) is reached through the ports in [`host`];
//! [`headless`] binds those ports in memory.
//!
//! ```rust,ignore
//! let headless = HeadlessHost::recording();
//! let mut clock = AnalogClock::new(headless.host(), ClockOptions::default().size(200.0))?;
//! clock.start();
//! headless.scheduler.run_frame();
//! ```

pub mod clock;
pub mod error;
pub mod geometry;
pub mod headless;
pub mod host;
pub mod options;
pub mod render;
pub mod surface;
pub mod time;

pub use clock::{AnalogClock, RunState};
pub use error::ClockError;
pub use host::Host;
pub use options::{ClockOptions, OptionsPatch, Theme, ThemePatch};
pub use time::{ClockTime, TimeSource};
