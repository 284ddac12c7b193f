use crate::config::Settings;
use crate::error::{Error, Result};

/// Observable run-time state of one slideshow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimelineState {
    /// Elapsed virtual milliseconds, wrapping after one full cycle.
    pub current_time: u64,
    /// Last rendered item; `None` until the first transition.
    pub current_display_index: Option<usize>,
    pub paused: bool,
}

/// Virtual clock of a slideshow. Knows nothing about rendering.
#[derive(Debug, Clone)]
pub struct Timeline {
    delay_ms: u64,
    speed_ms: u64,
    item_count: usize,
    state: TimelineState,
}

impl Timeline {
    pub fn new(settings: &Settings, item_count: usize) -> Result<Self> {
        settings.validate()?;
        if item_count == 0 {
            return Err(Error::NoItems);
        }
        Ok(Self {
            delay_ms: settings.delay_ms(),
            speed_ms: settings.speed_ms(),
            item_count,
            state: TimelineState::default(),
        })
    }

    pub fn state(&self) -> TimelineState {
        self.state
    }

    pub fn delay_ms(&self) -> u64 {
        self.delay_ms
    }

    pub fn current_time(&self) -> u64 {
        self.state.current_time
    }

    pub fn is_paused(&self) -> bool {
        self.state.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.state.paused = paused;
    }

    /// Length of one pass over every item.
    pub fn cycle_ms(&self) -> u64 {
        self.delay_ms.saturating_mul(self.item_count as u64)
    }

    /// Advance by one tick. Returns `false` without touching the clock when
    /// paused. Time wraps to zero only once it is strictly past the cycle.
    pub fn advance(&mut self) -> bool {
        if self.state.paused {
            return false;
        }
        self.state.current_time = self.state.current_time.saturating_add(self.speed_ms);
        if self.state.current_time > self.cycle_ms() {
            self.state.current_time = 0;
        }
        true
    }

    /// Jump to the start of `index`'s window. Out-of-range indices are kept
    /// as-is and normalized by the next `advance`.
    pub fn seek(&mut self, index: usize) {
        self.state.current_time = self.delay_ms.saturating_mul(index as u64);
    }

    /// Item that should be on screen for the current time.
    pub fn target_index(&self) -> usize {
        let index = self.state.current_time / self.delay_ms;
        if index >= self.item_count as u64 {
            0
        } else {
            index as usize
        }
    }

    /// Fraction of the active item's window already elapsed, in `[0, 1)`.
    pub fn window_progress(&self) -> f64 {
        (self.state.current_time % self.delay_ms) as f64 / self.delay_ms as f64
    }

    pub fn displayed(&self) -> Option<usize> {
        self.state.current_display_index
    }

    /// Record that `index` is now on screen and return what it replaced.
    pub fn mark_displayed(&mut self, index: usize) -> Option<usize> {
        self.state.current_display_index.replace(index)
    }
}
