#![forbid(unsafe_code)]

//! Entity identity and lifecycle base shared by every model object.
//!
//! Every model object in the shell (panes, pane trees, containers) embeds an
//! [`EntityCore`] and implements [`ModelEntity`]. The core carries two pieces
//! of state:
//!
//! - a process-unique [`EntityId`], assigned once and immutable afterwards;
//! - an `alive` flag that flips to `false` exactly once on [`destroy`].
//!
//! # Id assignment
//!
//! Fresh ids come from a single process-wide atomic counter and are strictly
//! increasing. Entities restored from saved session state carry an explicit
//! id; claiming an explicit id advances the counter past it unconditionally,
//! so a later fresh id can never collide with an id restored out of order.
//!
//! # Invariants
//!
//! 1. No two simultaneously-alive entities share an id.
//! 2. The next fresh id is strictly greater than every id ever claimed,
//!    fresh or explicit.
//! 3. `destroy()` runs the [`ModelEntity::on_destroyed`] hook at most once,
//!    only on the alive → destroyed transition. Repeat calls are no-ops.
//!
//! # Failure Modes
//!
//! None of these operations raise errors. Double-destroy is an explicit
//! no-op by contract, not a fault.

use std::cell::Cell;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::trace;

/// First id handed out by a fresh counter.
const FIRST_ENTITY_ID: u64 = 1;

/// Process-wide counter holding the next fresh id.
static NEXT_ENTITY_ID: AtomicU64 = AtomicU64::new(FIRST_ENTITY_ID);

/// Process-unique identifier for a model entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u64);

impl EntityId {
    /// Claim a fresh id from the process-wide counter.
    #[must_use]
    pub fn next() -> Self {
        Self(NEXT_ENTITY_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Claim an id, either the explicit one (restored from saved state) or a
    /// fresh one from the counter.
    ///
    /// Claiming an explicit id advances the counter to `explicit + 1` when
    /// the counter is at or below it, guarding against collisions when ids
    /// are restored out of order.
    #[must_use]
    pub fn claim(explicit: Option<EntityId>) -> Self {
        match explicit {
            Some(id) => {
                NEXT_ENTITY_ID.fetch_max(id.0.saturating_add(1), Ordering::Relaxed);
                id
            }
            None => Self::next(),
        }
    }

    /// Raw id value, e.g. for keying caches or serializing session state.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Rebuild an id from its raw value (deserializing session state).
    ///
    /// Does not advance the counter; use [`EntityId::claim`] when the id is
    /// actually attached to a live entity.
    #[must_use]
    pub const fn from_value(value: u64) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reset the process-wide id counter to its initial value.
///
/// Test isolation only. Calling this while entities from a previous sequence
/// are still alive breaks the uniqueness invariant.
#[doc(hidden)]
pub fn reset_entity_ids() {
    NEXT_ENTITY_ID.store(FIRST_ENTITY_ID, Ordering::SeqCst);
}

/// Identity + lifecycle state embedded by composition in every model object.
///
/// The id is fixed at construction; only the alive flag mutates, and only
/// once.
#[derive(Debug)]
pub struct EntityCore {
    id: EntityId,
    alive: Cell<bool>,
}

impl EntityCore {
    /// Core with a fresh id.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: EntityId::claim(None),
            alive: Cell::new(true),
        }
    }

    /// Core restored from saved state with an explicit id.
    ///
    /// Advances the fresh-id counter past `id` (see [`EntityId::claim`]).
    #[must_use]
    pub fn restored(id: EntityId) -> Self {
        Self {
            id: EntityId::claim(Some(id)),
            alive: Cell::new(true),
        }
    }

    /// The entity's id.
    #[inline]
    #[must_use]
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Whether the entity is still alive.
    #[inline]
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.alive.get()
    }

    /// Flip alive → destroyed. Returns `true` only on the first call.
    pub fn mark_destroyed(&self) -> bool {
        if self.alive.get() {
            self.alive.set(false);
            true
        } else {
            false
        }
    }
}

impl Default for EntityCore {
    fn default() -> Self {
        Self::new()
    }
}

/// Contract implemented by every model object in the shell.
///
/// Implementors embed an [`EntityCore`] and return it from
/// [`entity_core`](ModelEntity::entity_core); everything else is provided.
/// Types that own resources override [`on_destroyed`](ModelEntity::on_destroyed)
/// to release them; the default body is a no-op, so there is no runtime
/// "does a hook exist" check anywhere.
pub trait ModelEntity {
    /// The embedded identity/lifecycle core.
    fn entity_core(&self) -> &EntityCore;

    /// Hook invoked exactly once, on the alive → destroyed transition.
    fn on_destroyed(&self) {}

    /// The entity's process-unique id.
    fn id(&self) -> EntityId {
        self.entity_core().id()
    }

    /// Whether the entity has not been destroyed yet.
    fn is_alive(&self) -> bool {
        self.entity_core().is_alive()
    }

    /// Inverse of [`is_alive`](ModelEntity::is_alive).
    fn is_destroyed(&self) -> bool {
        !self.is_alive()
    }

    /// Destroy the entity. Idempotent: the first call flips the alive flag
    /// and runs [`on_destroyed`](ModelEntity::on_destroyed); every later call
    /// returns immediately with no side effect.
    fn destroy(&self) {
        if self.entity_core().mark_destroyed() {
            trace!(id = %self.id(), "entity destroyed");
            self.on_destroyed();
        }
    }
}
