use std::path::Path;

use tracing::{debug, info, trace};

use crate::items::Item;
use crate::layout::Layout;

/// A change of the active item, handed to the renderer in one piece.
#[derive(Debug, Clone, Copy)]
pub struct SlideChange<'a> {
    /// Item that loses the "current" marker, if any was shown.
    pub previous: Option<usize>,
    /// Item to show in the display area and mark as current.
    pub item: &'a Item,
    /// Where the highlight must end up. Any slide still in flight is
    /// finished immediately before starting this one.
    pub highlight_offset: u32,
}

/// Surface a slideshow draws on.
///
/// The controller decides what is visible; implementations decide how it
/// looks and animates.
pub trait Renderer {
    /// Size the container, highlight and item boxes. Called once on attach.
    fn apply_layout(&mut self, layout: &Layout);

    /// Set the progress bar width in pixels.
    fn progress(&mut self, bar_width_px: f64);

    /// Swap the displayed item.
    fn render(&mut self, change: &SlideChange<'_>);
}

/// Renderer that reports every visual change through `tracing`.
#[derive(Debug, Default)]
pub struct TracingRenderer {
    container: String,
    last_bar_px: u32,
}

impl TracingRenderer {
    pub fn new(container: impl Into<String>) -> Self {
        Self {
            container: container.into(),
            last_bar_px: 0,
        }
    }
}

impl Renderer for TracingRenderer {
    fn apply_layout(&mut self, layout: &Layout) {
        info!(
            container = %self.container,
            width = layout.container_width,
            height = layout.container_height,
            items = layout.item_count,
            item_width = layout.item_width,
            item_height = layout.item_height,
            "layout applied"
        );
        for item in &layout.items {
            debug!(
                container = %self.container,
                index = item.index,
                content_width = item.content_width,
                left = ?item.border_left.as_ref().map(ToString::to_string),
                right = %item.border_right,
                "item box"
            );
        }
    }

    fn progress(&mut self, bar_width_px: f64) {
        // Only whole pixels are visible; skip sub-pixel churn.
        let px = bar_width_px.floor() as u32;
        if px != self.last_bar_px {
            self.last_bar_px = px;
            trace!(container = %self.container, bar_px = px, "progress");
        }
    }

    fn render(&mut self, change: &SlideChange<'_>) {
        let item = change.item;
        info!(
            container = %self.container,
            index = item.index,
            previous = ?change.previous,
            highlight_offset = change.highlight_offset,
            image = %display_name(&item.image),
            link = item.link.as_deref().unwrap_or("-"),
            "showing item"
        );
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
