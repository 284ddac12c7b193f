use std::borrow::Borrow;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;

use tracing::{debug, info};

use crate::controller::SlideshowController;
use crate::error::Result;
use crate::render::Renderer;
use crate::tasks::ticker::{self, SlideshowHandle};

/// Identity of the surface a slideshow is attached to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContainerId(String);

impl ContainerId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ContainerId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ContainerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ContainerId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Running slideshows, at most one per container.
#[derive(Debug, Default)]
pub struct Registry {
    instances: HashMap<ContainerId, SlideshowHandle>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a slideshow to `id` unless one is already running there, in
    /// which case the existing instance is returned and `build` is never
    /// called.
    pub fn attach<R, F>(
        &mut self,
        id: impl Into<ContainerId>,
        build: F,
    ) -> Result<&mut SlideshowHandle>
    where
        R: Renderer + Send + 'static,
        F: FnOnce() -> Result<SlideshowController<R>>,
    {
        match self.instances.entry(id.into()) {
            Entry::Occupied(entry) => {
                debug!(container = %entry.key(), "already attached; reusing instance");
                Ok(entry.into_mut())
            }
            Entry::Vacant(entry) => {
                let controller = build()?;
                let handle = ticker::spawn(entry.key().as_str(), controller);
                info!(container = %entry.key(), "slideshow attached");
                Ok(entry.insert(handle))
            }
        }
    }

    pub fn instance(&self, id: &str) -> Option<&SlideshowHandle> {
        self.instances.get(id)
    }

    pub fn instance_mut(&mut self, id: &str) -> Option<&mut SlideshowHandle> {
        self.instances.get_mut(id)
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Detach and stop the slideshow on `id`. Returns whether one existed.
    pub async fn dispose(&mut self, id: &str) -> anyhow::Result<bool> {
        let Some(mut handle) = self.instances.remove(id) else {
            return Ok(false);
        };
        handle.dispose().await?;
        info!(container = id, "slideshow disposed");
        Ok(true)
    }

    pub async fn dispose_all(&mut self) -> anyhow::Result<()> {
        for (id, mut handle) in self.instances.drain() {
            handle.dispose().await?;
            debug!(container = %id, "slideshow disposed");
        }
        Ok(())
    }
}
