use thiserror::Error;

/// Library error type for slideshow operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A slideshow needs at least one item to lay out and rotate.
    #[error("slideshow has no items")]
    NoItems,

    /// Timing settings that would stall the clock or divide by zero.
    #[error("invalid settings: {0}")]
    InvalidSettings(&'static str),

    /// A click resolved to an index that is not in the strip.
    #[error("no item with index {index} (slideshow has {count})")]
    UnknownItem { index: usize, count: usize },

    /// The slideshow task has been disposed and no longer accepts commands.
    #[error("slideshow has been disposed")]
    Disposed,

    /// Underlying IO error.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// YAML/serde configuration error.
    #[error(transparent)]
    Config(#[from] serde_yaml::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
