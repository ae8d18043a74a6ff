#![forbid(unsafe_code)]

//! View resolution seam: mapping a logical pane to its renderable widget.
//!
//! The container does not build widgets itself; it asks a [`ViewResolver`].
//! Resolution must be deterministic per pane identity (asking twice for the
//! same pane yields the same widget) so a remount after a detach restores
//! the same view. [`MemoResolver`] provides that guarantee over any factory
//! closure and serves embedders without a richer registry.

use ahash::AHashMap;
use std::cell::RefCell;

use sash_core::{EntityId, ModelEntity, Pane};

use crate::widget::Widget;

/// Maps a logical pane to the widget that renders it.
///
/// Implementations may create lazily and cache; the container treats the
/// returned handle as fresh and mounts it as its sole child.
pub trait ViewResolver {
    /// The widget rendering `pane`, created on first request.
    fn resolve(&self, pane: &Pane) -> Widget;
}

/// [`ViewResolver`] memoizing a factory closure per pane id.
pub struct MemoResolver<F> {
    build: F,
    cache: RefCell<AHashMap<EntityId, Widget>>,
}

impl<F: Fn(&Pane) -> Widget> MemoResolver<F> {
    /// Resolver building views with `build`, one per pane id.
    #[must_use]
    pub fn new(build: F) -> Self {
        Self {
            build,
            cache: RefCell::new(AHashMap::new()),
        }
    }

    /// Number of cached views.
    #[must_use]
    pub fn cached_views(&self) -> usize {
        self.cache.borrow().len()
    }
}

impl<F: Fn(&Pane) -> Widget> ViewResolver for MemoResolver<F> {
    fn resolve(&self, pane: &Pane) -> Widget {
        if let Some(existing) = self.cache.borrow().get(&pane.id()) {
            return existing.clone();
        }
        let view = (self.build)(pane);
        self.cache.borrow_mut().insert(pane.id(), view.clone());
        view
    }
}

impl<F> std::fmt::Debug for MemoResolver<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoResolver")
            .field("cached_views", &self.cache.borrow().len())
            .finish()
    }
}
