use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, ensure};
use serde::Deserialize;

use crate::error::Error;

/// Timing options for a single slideshow.
///
/// `delay` is how long one item stays active; `speed` is the timer tick
/// interval that advances the virtual clock and redraws the progress bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Settings {
    #[serde(with = "humantime_serde")]
    pub delay: Duration,
    #[serde(with = "humantime_serde")]
    pub speed: Duration,
}

impl Settings {
    const fn default_delay() -> Duration {
        Duration::from_millis(8000)
    }

    const fn default_speed() -> Duration {
        Duration::from_millis(50)
    }

    pub fn from_millis(delay: u64, speed: u64) -> Self {
        Self {
            delay: Duration::from_millis(delay),
            speed: Duration::from_millis(speed),
        }
    }

    /// Parse host-supplied options, filling anything omitted from the defaults.
    pub fn from_yaml(s: &str) -> Result<Self, Error> {
        let settings: Self = serde_yaml::from_str(s)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn delay_ms(&self) -> u64 {
        self.delay.as_millis() as u64
    }

    pub fn speed_ms(&self) -> u64 {
        self.speed.as_millis() as u64
    }

    /// Both durations feed divisions and the tick interval, so they must be
    /// at least one millisecond. The clock counts whole milliseconds, so a
    /// fractional duration would let the timer and the clock drift apart.
    pub fn validate(&self) -> Result<(), Error> {
        if self.delay_ms() == 0 {
            return Err(Error::InvalidSettings("delay must be at least 1ms"));
        }
        if self.speed_ms() == 0 {
            return Err(Error::InvalidSettings("speed must be at least 1ms"));
        }
        if !is_whole_millis(self.delay) {
            return Err(Error::InvalidSettings(
                "delay must be a whole number of milliseconds",
            ));
        }
        if !is_whole_millis(self.speed) {
            return Err(Error::InvalidSettings(
                "speed must be a whole number of milliseconds",
            ));
        }
        Ok(())
    }
}

fn is_whole_millis(d: Duration) -> bool {
    d.subsec_nanos() % 1_000_000 == 0
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            delay: Self::default_delay(),
            speed: Self::default_speed(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BorderStyle {
    Solid,
    Dashed,
    Dotted,
}

impl BorderStyle {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Solid => "solid",
            Self::Dashed => "dashed",
            Self::Dotted => "dotted",
        }
    }
}

impl fmt::Display for BorderStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Edge drawn around each item in the strip.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Border {
    pub width: u32,
    pub style: BorderStyle,
    pub color: String,
}

impl Default for Border {
    fn default() -> Self {
        Self {
            width: 1,
            style: BorderStyle::Solid,
            color: "#ccc".to_string(),
        }
    }
}

impl fmt::Display for Border {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}px {} {}", self.width, self.style, self.color)
    }
}

/// Measurements of the surface the slideshow is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct LayoutOptions {
    pub container_width: u32,
    pub display_height: u32,
    pub bar_height: u32,
    /// When absent the item strip height is derived from the first image.
    pub item_height: Option<u32>,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            container_width: 960,
            display_height: 540,
            bar_height: 4,
            item_height: None,
        }
    }
}

/// One explicitly listed slide.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ItemEntry {
    pub image: PathBuf,
    #[serde(default)]
    pub link: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Configuration {
    /// Time each item stays active before auto-advancing.
    #[serde(with = "humantime_serde")]
    pub delay: Duration,
    /// Timer tick interval driving the progress bar.
    #[serde(with = "humantime_serde")]
    pub speed: Duration,
    /// Directory scanned recursively for images, appended after `items`.
    pub library_path: Option<PathBuf>,
    /// Explicit items, shown first and in order.
    pub items: Vec<ItemEntry>,
    pub layout: LayoutOptions,
    pub border: Border,
}

impl Configuration {
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Ok(serde_yaml::from_str(&s)?)
    }

    /// Validate runtime invariants that cannot be expressed via serde defaults alone.
    pub fn validated(self) -> Result<Self> {
        self.settings()
            .validate()
            .context("invalid timing configuration")?;
        ensure!(
            self.library_path.is_some() || !self.items.is_empty(),
            "either library-path or items must be configured"
        );
        ensure!(
            self.layout.container_width > 0,
            "layout.container-width must be greater than zero"
        );
        Ok(self)
    }

    pub fn settings(&self) -> Settings {
        Settings {
            delay: self.delay,
            speed: self.speed,
        }
    }
}

impl Default for Configuration {
    fn default() -> Self {
        let settings = Settings::default();
        Self {
            delay: settings.delay,
            speed: settings.speed,
            library_path: None,
            items: Vec::new(),
            layout: LayoutOptions::default(),
            border: Border::default(),
        }
    }
}
