//! Image slideshow with a timed progress bar and click-to-navigate strip.
//!
//! A [`controller::SlideshowController`] owns the clock and tells a
//! [`render::Renderer`] what to show. [`tasks::ticker`] drives it from a
//! repeating timer and [`registry::Registry`] keeps one per container.

pub mod config;
pub mod controller;
pub mod error;
pub mod events;
pub mod items;
pub mod layout;
pub mod registry;
pub mod render;
pub mod timeline;
pub mod tasks {
    pub mod ticker;
}

pub use error::{Error, Result};
