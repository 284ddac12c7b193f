use crate::config::{Border, LayoutOptions};
use crate::error::{Error, Result};
use crate::items::Item;

/// Strip height used when neither the host nor the first image can say.
pub const DEFAULT_ITEM_HEIGHT: u32 = 80;

/// Sizes measured on the host surface before the slideshow is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostMetrics {
    pub container_width: u32,
    pub display_height: u32,
    pub bar_height: u32,
    pub item_height: u32,
}

impl HostMetrics {
    /// Resolve configured options against the items. A missing item height
    /// is taken from the first item's aspect ratio at strip width.
    pub fn resolve(opts: &LayoutOptions, items: &[Item]) -> Self {
        let item_height = opts.item_height.unwrap_or_else(|| {
            let count = items.len().max(1) as u32;
            let item_width = opts.container_width / count;
            items
                .first()
                .and_then(|item| item.dimensions)
                .filter(|&(w, _)| w > 0)
                .map(|(w, h)| {
                    let scaled = u64::from(item_width) * u64::from(h) / u64::from(w);
                    u32::try_from(scaled).unwrap_or(u32::MAX)
                })
                .filter(|&h| h > 0)
                .unwrap_or(DEFAULT_ITEM_HEIGHT)
        });
        Self {
            container_width: opts.container_width,
            display_height: opts.display_height,
            bar_height: opts.bar_height,
            item_height,
        }
    }
}

/// Box of a single item in the strip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemBox {
    pub index: usize,
    /// Width left for content once borders are drawn.
    pub content_width: u32,
    pub border_left: Option<Border>,
    pub border_right: Border,
    pub border_bottom: Border,
}

/// Geometry computed once when a slideshow is attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub item_count: usize,
    pub item_width: u32,
    pub item_height: u32,
    pub container_width: u32,
    /// Display, progress bar and item strip stacked.
    pub container_height: u32,
    /// The sliding highlight covers exactly one item.
    pub highlight_width: u32,
    pub highlight_height: u32,
    pub items: Vec<ItemBox>,
}

impl Layout {
    pub fn compute(metrics: &HostMetrics, item_count: usize, border: &Border) -> Result<Self> {
        if item_count == 0 {
            return Err(Error::NoItems);
        }
        let item_width = metrics.container_width / item_count as u32;

        let items = (0..item_count)
            .map(|index| {
                // The first item closes the strip on the left, so it loses
                // two border widths instead of one.
                let (content_width, border_left) = if index == 0 {
                    (
                        item_width.saturating_sub(border.width * 2),
                        Some(border.clone()),
                    )
                } else {
                    (item_width.saturating_sub(border.width), None)
                };
                ItemBox {
                    index,
                    content_width,
                    border_left,
                    border_right: border.clone(),
                    border_bottom: border.clone(),
                }
            })
            .collect();

        Ok(Self {
            item_count,
            item_width,
            item_height: metrics.item_height,
            container_width: metrics.container_width,
            container_height: metrics
                .display_height
                .saturating_add(metrics.bar_height)
                .saturating_add(metrics.item_height),
            highlight_width: item_width,
            highlight_height: metrics.item_height,
            items,
        })
    }

    /// Progress bar width for a point on the timeline: one item width per
    /// `delay_ms` of elapsed time.
    pub fn bar_width(&self, current_time_ms: u64, delay_ms: u64) -> f64 {
        current_time_ms as f64 * (f64::from(self.item_width) / delay_ms as f64)
    }

    /// Horizontal offset of the highlight when it sits over `index`.
    pub fn highlight_offset(&self, index: usize) -> u32 {
        self.item_width.saturating_mul(index as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(width: u32) -> HostMetrics {
        HostMetrics {
            container_width: width,
            display_height: 300,
            bar_height: 5,
            item_height: 60,
        }
    }

    #[test]
    fn item_width_is_floored_share_of_container() {
        let layout = Layout::compute(&metrics(1000), 3, &Border::default()).unwrap();
        assert_eq!(layout.item_width, 333);
        assert_eq!(layout.container_height, 365);
        assert_eq!((layout.highlight_width, layout.highlight_height), (333, 60));
    }

    #[test]
    fn first_item_gets_extra_left_border() {
        let layout = Layout::compute(&metrics(300), 3, &Border::default()).unwrap();
        assert_eq!(layout.items[0].content_width, 98);
        assert!(layout.items[0].border_left.is_some());
        assert_eq!(layout.items[1].content_width, 99);
        assert!(layout.items[1].border_left.is_none());
        assert_eq!(layout.items[2].border_right.to_string(), "1px solid #ccc");
    }

    #[test]
    fn zero_items_is_an_error_not_a_division_by_zero() {
        assert!(matches!(
            Layout::compute(&metrics(300), 0, &Border::default()),
            Err(Error::NoItems)
        ));
    }

    #[test]
    fn bar_fills_one_item_per_delay() {
        let layout = Layout::compute(&metrics(300), 3, &Border::default()).unwrap();
        assert_eq!(layout.bar_width(0, 1000), 0.0);
        assert!((layout.bar_width(500, 1000) - 50.0).abs() < 1e-9);
        assert!((layout.bar_width(2000, 1000) - 200.0).abs() < 1e-9);
        assert_eq!(layout.highlight_offset(2), 200);
    }

    #[test]
    fn item_height_falls_back_to_first_image_aspect() {
        let opts = LayoutOptions {
            container_width: 400,
            display_height: 300,
            bar_height: 4,
            item_height: None,
        };
        let items = vec![
            Item::new(0, "a.jpg").with_dimensions(800, 600),
            Item::new(1, "b.jpg"),
        ];
        assert_eq!(HostMetrics::resolve(&opts, &items).item_height, 150);
        assert_eq!(
            HostMetrics::resolve(&opts, &[Item::new(0, "x.png")]).item_height,
            DEFAULT_ITEM_HEIGHT
        );
    }

    #[test]
    fn extreme_aspect_ratio_clamps_item_height() {
        let opts = LayoutOptions {
            container_width: 4000,
            display_height: 300,
            bar_height: 4,
            item_height: None,
        };
        let items = vec![Item::new(0, "needle.png").with_dimensions(1, u32::MAX)];
        assert_eq!(HostMetrics::resolve(&opts, &items).item_height, u32::MAX);
    }

    #[test]
    fn oversized_heights_saturate_instead_of_overflowing() {
        let huge = HostMetrics {
            container_width: 300,
            display_height: u32::MAX,
            bar_height: 4,
            item_height: 80,
        };
        let layout = Layout::compute(&huge, 3, &Border::default()).unwrap();
        assert_eq!(layout.container_height, u32::MAX);
        assert_eq!(layout.highlight_height, 80);
    }
}
