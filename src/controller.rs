use std::time::Duration;

use tracing::{debug, trace};

use crate::config::{Border, Settings};
use crate::error::{Error, Result};
use crate::items::Item;
use crate::layout::{HostMetrics, Layout};
use crate::render::{Renderer, SlideChange};
use crate::timeline::{Timeline, TimelineState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Running,
    Paused,
}

/// Result of clicking an item in the strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickOutcome {
    pub index: usize,
    /// The item's own link must not be followed; the click only seeks.
    pub default_prevented: bool,
}

/// Drives one slideshow: owns its clock, its layout and its renderer.
///
/// Nothing here is time-aware on its own. A ticker calls [`on_tick`]
/// every `speed`; hosts call [`pause`], [`resume`], [`toggle`], [`view`]
/// and [`click_item`] in between.
///
/// [`on_tick`]: SlideshowController::on_tick
/// [`pause`]: SlideshowController::pause
/// [`resume`]: SlideshowController::resume
/// [`toggle`]: SlideshowController::toggle
/// [`view`]: SlideshowController::view
/// [`click_item`]: SlideshowController::click_item
pub struct SlideshowController<R> {
    settings: Settings,
    items: Vec<Item>,
    layout: Layout,
    timeline: Timeline,
    renderer: R,
}

impl<R: Renderer> SlideshowController<R> {
    pub fn new(
        mut items: Vec<Item>,
        settings: Settings,
        metrics: &HostMetrics,
        border: &Border,
        mut renderer: R,
    ) -> Result<Self> {
        let timeline = Timeline::new(&settings, items.len())?;
        let layout = Layout::compute(metrics, items.len(), border)?;

        for (index, item) in items.iter_mut().enumerate() {
            item.index = index;
        }

        renderer.apply_layout(&layout);
        renderer.progress(0.0);
        debug!(
            items = items.len(),
            item_width = layout.item_width,
            delay_ms = settings.delay_ms(),
            speed_ms = settings.speed_ms(),
            "slideshow initialized"
        );

        Ok(Self {
            settings,
            items,
            layout,
            timeline,
            renderer,
        })
    }

    pub fn pause(&mut self) -> &mut Self {
        self.timeline.set_paused(true);
        self
    }

    pub fn resume(&mut self) -> &mut Self {
        self.timeline.set_paused(false);
        self
    }

    /// The controls handler: flips between running and paused based on the
    /// current mode and returns the mode it switched to.
    pub fn toggle(&mut self) -> Mode {
        if self.timeline.is_paused() {
            self.resume();
            Mode::Running
        } else {
            self.pause();
            Mode::Paused
        }
    }

    pub fn mode(&self) -> Mode {
        if self.timeline.is_paused() {
            Mode::Paused
        } else {
            Mode::Running
        }
    }

    /// Seek to the start of `index`. While paused the change is drawn right
    /// away; while running the next tick picks it up.
    pub fn view(&mut self, index: usize) -> &mut Self {
        self.timeline.seek(index);
        debug!(index, current_time = self.timeline.current_time(), "view");
        if self.timeline.is_paused() {
            self.transition();
        }
        self
    }

    pub fn click_item(&mut self, index: usize) -> Result<ClickOutcome> {
        let index = self
            .items
            .get(index)
            .map(|item| item.index)
            .ok_or(Error::UnknownItem {
                index,
                count: self.items.len(),
            })?;
        self.view(index);
        Ok(ClickOutcome {
            index,
            default_prevented: true,
        })
    }

    /// Timer callback. Returns whether the clock moved.
    pub fn on_tick(&mut self) -> bool {
        if !self.timeline.advance() {
            return false;
        }
        self.transition();
        true
    }

    fn transition(&mut self) {
        let bar = self
            .layout
            .bar_width(self.timeline.current_time(), self.timeline.delay_ms());
        self.renderer.progress(bar);

        let index = self.timeline.target_index();
        if self.timeline.displayed() == Some(index) {
            return;
        }

        let change = SlideChange {
            previous: self.timeline.displayed(),
            item: &self.items[index],
            highlight_offset: self.layout.highlight_offset(index),
        };
        trace!(index, previous = ?change.previous, "transition");
        self.renderer.render(&change);
        self.timeline.mark_displayed(index);
    }

    pub fn snapshot(&self) -> TimelineState {
        self.timeline.state()
    }

    /// Elapsed fraction of the active item's window.
    pub fn window_progress(&self) -> f64 {
        self.timeline.window_progress()
    }

    /// Timer period; always the same whole-millisecond step the clock adds.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.settings.speed_ms())
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }
}
