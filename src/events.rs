use tokio::sync::oneshot;

use crate::controller::{ClickOutcome, Mode};
use crate::error::Result;
use crate::timeline::TimelineState;

/// Requests delivered to a running slideshow task. Each carries a reply
/// channel that fires once the request has been applied.
#[derive(Debug)]
pub enum SlideshowCommand {
    Pause(oneshot::Sender<TimelineState>),
    Resume(oneshot::Sender<TimelineState>),
    /// The controls element was activated.
    Toggle(oneshot::Sender<Mode>),
    View(usize, oneshot::Sender<TimelineState>),
    ClickItem(usize, oneshot::Sender<Result<ClickOutcome>>),
}

impl SlideshowCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Pause(_) => "pause",
            Self::Resume(_) => "resume",
            Self::Toggle(_) => "toggle",
            Self::View(..) => "view",
            Self::ClickItem(..) => "click-item",
        }
    }
}
