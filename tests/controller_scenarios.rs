use time_slider::config::{Border, Settings};
use time_slider::controller::{Mode, SlideshowController};
use time_slider::items::Item;
use time_slider::layout::{HostMetrics, Layout};
use time_slider::render::{Renderer, SlideChange};

#[derive(Default)]
struct Recorder {
    layouts: usize,
    bar: f64,
    shown: Vec<usize>,
    highlight: Vec<u32>,
    current_marker: Option<usize>,
    links: Vec<Option<String>>,
}

impl Renderer for Recorder {
    fn apply_layout(&mut self, _layout: &Layout) {
        self.layouts += 1;
    }

    fn progress(&mut self, bar_width_px: f64) {
        self.bar = bar_width_px;
    }

    fn render(&mut self, change: &SlideChange<'_>) {
        assert_eq!(
            change.previous, self.current_marker,
            "marker must move from the previously shown item"
        );
        self.current_marker = Some(change.item.index);
        self.shown.push(change.item.index);
        self.highlight.push(change.highlight_offset);
        self.links.push(change.item.link.clone());
    }
}

fn slideshow(delay: u64, speed: u64, count: usize) -> SlideshowController<Recorder> {
    let items = (0..count)
        .map(|i| Item::new(i, format!("/photos/{i}.jpg")).with_link(format!("/full/{i}")))
        .collect();
    let metrics = HostMetrics {
        container_width: 120 * count as u32,
        display_height: 400,
        bar_height: 6,
        item_height: 80,
    };
    SlideshowController::new(
        items,
        Settings::from_millis(delay, speed),
        &metrics,
        &Border::default(),
        Recorder::default(),
    )
    .expect("valid slideshow")
}

fn tick_for(c: &mut SlideshowController<Recorder>, elapsed_ms: u64) {
    let speed = c.settings().speed_ms();
    for _ in 0..elapsed_ms / speed {
        c.on_tick();
    }
}

#[test]
fn layout_is_applied_once_on_construction() {
    let c = slideshow(1000, 50, 4);
    assert_eq!(c.renderer().layouts, 1);
    assert_eq!(c.layout().item_width, 120);
    assert_eq!(c.layout().container_height, 486);
    assert_eq!(c.mode(), Mode::Running);
}

#[test]
fn scenario_a_default_timing_reaches_second_item_after_8050ms() {
    let mut c = slideshow(8000, 50, 3);
    tick_for(&mut c, 8050);
    assert_eq!(c.snapshot().current_time, 8050);
    assert_eq!(c.snapshot().current_display_index, Some(1));
    assert_eq!(c.renderer().shown, vec![0, 1]);
}

#[test]
fn scenario_b_view_while_paused_switches_immediately() {
    let mut c = slideshow(1000, 50, 5);
    c.pause().view(2);
    let state = c.snapshot();
    assert_eq!(state.current_time, 2000);
    assert_eq!(state.current_display_index, Some(2));
    assert_eq!(c.renderer().highlight, vec![240]);
    assert_eq!(c.window_progress(), 0.0);
    // The bar's leading edge sits at the start of item 2's window.
    assert!((c.renderer().bar - 240.0).abs() < 1e-9);
}

#[test]
fn view_while_running_only_moves_time() {
    let mut c = slideshow(1000, 50, 5);
    c.view(2);
    assert_eq!(c.snapshot().current_time, 2000);
    assert_eq!(c.snapshot().current_display_index, None);
}

#[test]
fn scenario_c_click_is_view_with_navigation_suppressed() {
    let mut clicked = slideshow(1000, 50, 6);
    let mut viewed = slideshow(1000, 50, 6);
    clicked.pause();
    viewed.pause();

    let outcome = clicked.click_item(4).expect("item 4 exists");
    viewed.view(4);

    assert!(outcome.default_prevented);
    assert_eq!(outcome.index, 4);
    assert_eq!(clicked.snapshot(), viewed.snapshot());
    assert_eq!(clicked.renderer().links, vec![Some("/full/4".to_string())]);
}

#[test]
fn every_view_within_range_renders_that_item_when_paused() {
    let mut c = slideshow(700, 35, 5);
    c.pause();
    for index in [3, 0, 4, 1, 2] {
        c.view(index);
        assert_eq!(c.snapshot().current_display_index, Some(index));
        assert_eq!(c.window_progress(), 0.0);
    }
    assert_eq!(c.renderer().shown, vec![3, 0, 4, 1, 2]);
}

#[test]
fn each_delay_boundary_changes_display_exactly_once_in_order() {
    let mut c = slideshow(200, 30, 4);
    // Three full cycles, enough to wrap several times.
    tick_for(&mut c, 3 * 4 * 200);
    let shown = &c.renderer().shown;
    for pair in shown.windows(2) {
        let expected = (pair[0] + 1) % 4;
        assert_eq!(pair[1], expected, "sequence {:?}", shown);
    }
    assert_eq!(shown[0], 0);
    assert!(shown.len() >= 12);
}

#[test]
fn pause_twice_is_idempotent() {
    let mut c = slideshow(1000, 100, 3);
    tick_for(&mut c, 1500);
    let before = c.snapshot();
    c.pause();
    c.pause();
    let after = c.snapshot();
    assert!(after.paused);
    assert_eq!(after.current_display_index, before.current_display_index);
    assert_eq!(after.current_time, before.current_time);
    assert!(!c.on_tick(), "paused ticks must not advance");
}

#[test]
fn time_wraps_exactly_when_it_exceeds_the_cycle() {
    let mut c = slideshow(100, 25, 3);
    tick_for(&mut c, 300);
    assert_eq!(c.snapshot().current_time, 300);
    c.on_tick();
    assert_eq!(c.snapshot().current_time, 0);
    assert_eq!(c.snapshot().current_display_index, Some(0));
}

#[test]
fn out_of_range_view_renders_first_item_until_next_tick() {
    let mut c = slideshow(100, 10, 3);
    c.pause().view(9);
    assert_eq!(c.snapshot().current_time, 900);
    assert_eq!(c.snapshot().current_display_index, Some(0));
    c.resume();
    c.on_tick();
    assert_eq!(c.snapshot().current_time, 0);
}

#[test]
fn toggling_many_times_never_stacks_handlers() {
    let mut c = slideshow(100, 10, 3);
    assert_eq!(c.toggle(), Mode::Paused);
    assert_eq!(c.toggle(), Mode::Running);
    for _ in 0..10 {
        c.toggle();
    }
    assert_eq!(c.mode(), Mode::Running);
    assert!(c.on_tick());
}
