use std::fmt;

use quartz_engine::paint::Color;

/// Flat colors used by the clock face.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub face: Color,
    pub border: Color,
    pub hour_mark: Color,
    pub hour_hand: Color,
    pub minute_hand: Color,
    pub second_hand: Color,
    pub number: Color,
}

impl Default for Theme {
    fn default() -> Self {
        let ink = Color::from_srgb_u8(0x22, 0x22, 0x22, 0xff);
        Self {
            face: Color::from_srgb_u8(0xff, 0xff, 0xff, 0xff),
            border: ink,
            hour_mark: ink,
            hour_hand: ink,
            minute_hand: ink,
            second_hand: Color::from_srgb_u8(0xc0, 0x39, 0x2b, 0xff),
            number: ink,
        }
    }
}

impl Theme {
    /// Returns a copy with every color present in `patch` replaced.
    pub fn merged(&self, patch: &ThemePatch) -> Theme {
        Theme {
            face: patch.face.unwrap_or(self.face),
            border: patch.border.unwrap_or(self.border),
            hour_mark: patch.hour_mark.unwrap_or(self.hour_mark),
            hour_hand: patch.hour_hand.unwrap_or(self.hour_hand),
            minute_hand: patch.minute_hand.unwrap_or(self.minute_hand),
            second_hand: patch.second_hand.unwrap_or(self.second_hand),
            number: patch.number.unwrap_or(self.number),
        }
    }
}

/// Partial theme: only the supplied colors are applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThemePatch {
    pub face: Option<Color>,
    pub border: Option<Color>,
    pub hour_mark: Option<Color>,
    pub hour_hand: Option<Color>,
    pub minute_hand: Option<Color>,
    pub second_hand: Option<Color>,
    pub number: Option<Color>,
}

impl ThemePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn face(mut self, c: Color) -> Self { self.face = Some(c); self }
    pub fn border(mut self, c: Color) -> Self { self.border = Some(c); self }
    pub fn hour_mark(mut self, c: Color) -> Self { self.hour_mark = Some(c); self }
    pub fn hour_hand(mut self, c: Color) -> Self { self.hour_hand = Some(c); self }
    pub fn minute_hand(mut self, c: Color) -> Self { self.minute_hand = Some(c); self }
    pub fn second_hand(mut self, c: Color) -> Self { self.second_hand = Some(c); self }
    pub fn number(mut self, c: Color) -> Self { self.number = Some(c); self }
}

/// Fully populated clock configuration.
///
/// Construct from [`Default`] and chain setters:
/// ```rust,ignore
/// ClockOptions::default().size(100.0).show_numbers(false)
/// ```
/// Values are not validated; see [`issues`](Self::issues).
#[derive(Debug, Clone, PartialEq)]
pub struct ClockOptions {
    /// Logical diameter of the surface.
    pub size: f32,
    pub show_numbers: bool,
    pub show_ticks: bool,
    /// Hour-mark length; minor ticks use half.
    pub tick_length: f32,
    /// Hour-mark width; minor ticks use half, at least 1.
    pub tick_width: f32,
    pub theme: Theme,
    /// Accepted for compatibility. Wall time is always local.
    pub use_local_time: bool,
}

impl Default for ClockOptions {
    fn default() -> Self {
        Self {
            size: 150.0,
            show_numbers: true,
            show_ticks: true,
            tick_length: 8.0,
            tick_width: 2.0,
            theme: Theme::default(),
            use_local_time: true,
        }
    }
}

impl ClockOptions {
    pub fn size(mut self, v: f32) -> Self { self.size = v; self }
    pub fn show_numbers(mut self, v: bool) -> Self { self.show_numbers = v; self }
    pub fn show_ticks(mut self, v: bool) -> Self { self.show_ticks = v; self }
    pub fn tick_length(mut self, v: f32) -> Self { self.tick_length = v; self }
    pub fn tick_width(mut self, v: f32) -> Self { self.tick_width = v; self }
    pub fn theme(mut self, v: Theme) -> Self { self.theme = v; self }
    pub fn use_local_time(mut self, v: bool) -> Self { self.use_local_time = v; self }

    /// Returns a new configuration with `patch` applied over `self`.
    ///
    /// Top-level fields are replaced when present; a theme patch is merged
    /// color by color over the current theme.
    pub fn merged(&self, patch: &OptionsPatch) -> ClockOptions {
        ClockOptions {
            size: patch.size.unwrap_or(self.size),
            show_numbers: patch.show_numbers.unwrap_or(self.show_numbers),
            show_ticks: patch.show_ticks.unwrap_or(self.show_ticks),
            tick_length: patch.tick_length.unwrap_or(self.tick_length),
            tick_width: patch.tick_width.unwrap_or(self.tick_width),
            theme: match &patch.theme {
                Some(t) => self.theme.merged(t),
                None => self.theme.clone(),
            },
            use_local_time: patch.use_local_time.unwrap_or(self.use_local_time),
        }
    }

    /// Values the geometry cannot render sensibly.
    ///
    /// These are reported, never corrected: painting proceeds with whatever the
    /// geometry produces.
    pub fn issues(&self) -> Vec<OptionIssue> {
        let mut out = Vec::new();
        if !(self.size > 0.0) {
            out.push(OptionIssue::NonPositiveSize(self.size));
        }
        if !(self.tick_length >= 0.0) {
            out.push(OptionIssue::NegativeTickLength(self.tick_length));
        }
        if !(self.tick_width >= 0.0) {
            out.push(OptionIssue::NegativeTickWidth(self.tick_width));
        }
        out
    }
}

/// Partial configuration for [`AnalogClock::update_options`](crate::AnalogClock::update_options).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptionsPatch {
    pub size: Option<f32>,
    pub show_numbers: Option<bool>,
    pub show_ticks: Option<bool>,
    pub tick_length: Option<f32>,
    pub tick_width: Option<f32>,
    pub theme: Option<ThemePatch>,
    pub use_local_time: Option<bool>,
}

impl OptionsPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn size(mut self, v: f32) -> Self { self.size = Some(v); self }
    pub fn show_numbers(mut self, v: bool) -> Self { self.show_numbers = Some(v); self }
    pub fn show_ticks(mut self, v: bool) -> Self { self.show_ticks = Some(v); self }
    pub fn tick_length(mut self, v: f32) -> Self { self.tick_length = Some(v); self }
    pub fn tick_width(mut self, v: f32) -> Self { self.tick_width = Some(v); self }
    pub fn theme(mut self, v: ThemePatch) -> Self { self.theme = Some(v); self }
    pub fn use_local_time(mut self, v: bool) -> Self { self.use_local_time = Some(v); self }
}

/// A configuration value outside the range the geometry expects.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum OptionIssue {
    NonPositiveSize(f32),
    NegativeTickLength(f32),
    NegativeTickWidth(f32),
}

impl fmt::Display for OptionIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionIssue::NonPositiveSize(v) => write!(f, "size {v} is not positive"),
            OptionIssue::NegativeTickLength(v) => write!(f, "tick length {v} is negative"),
            OptionIssue::NegativeTickWidth(v) => write!(f, "tick width {v} is negative"),
        }
    }
}
