#![forbid(unsafe_code)]

//! Logical pane model: pane handles and the observable root slot.
//!
//! A [`Pane`] is a node of the logical pane tree: a cheap-to-clone handle
//! whose identity is its [`EntityId`]. A [`PaneTree`] owns the single root
//! slot a container renders; interested parties observe the slot via
//! [`PaneTree::observe_root`] and receive synchronous notifications on every
//! change, including a change to empty.
//!
//! # Invariants
//!
//! 1. Observers are notified in registration order, synchronously, one root
//!    change at a time. No coalescing, no reordering.
//! 2. Setting a root identical to the current one (same pane id, or both
//!    empty) is a no-op: no notification fires.
//! 3. Dropping or disposing a [`Subscription`] stops delivery; dead
//!    observers are pruned lazily on the next notification.
//!
//! # Failure Modes
//!
//! - Mutating the root from within an observer callback is a design bug in
//!   the observer graph; the slot is not written during delivery, so the
//!   nested write lands but its notifications interleave with the outer
//!   delivery pass.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use tracing::debug;

use crate::dispose::Disposable;
use crate::entity::{EntityCore, EntityId, ModelEntity};

/// Observer callback invoked with the new root value (or `None` for empty).
type RootObserver = dyn Fn(Option<&Pane>);

struct PaneInner {
    core: EntityCore,
    label: String,
}

/// A node of the logical pane tree.
///
/// Cloning a `Pane` clones the handle, not the node; equality is by entity
/// id. Pane contents (buffers, items) live elsewhere; this layer only
/// carries identity, lifecycle, and a human-readable label.
#[derive(Clone)]
pub struct Pane {
    inner: Rc<PaneInner>,
}

impl Pane {
    /// Create a pane with a fresh id.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            inner: Rc::new(PaneInner {
                core: EntityCore::new(),
                label: label.into(),
            }),
        }
    }

    /// Rebuild a pane from saved session state with its original id.
    #[must_use]
    pub fn restored(id: EntityId, label: impl Into<String>) -> Self {
        Self {
            inner: Rc::new(PaneInner {
                core: EntityCore::restored(id),
                label: label.into(),
            }),
        }
    }

    /// Human-readable label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.inner.label
    }
}

impl ModelEntity for Pane {
    fn entity_core(&self) -> &EntityCore {
        &self.inner.core
    }
}

impl PartialEq for Pane {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for Pane {}

impl std::fmt::Debug for Pane {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pane")
            .field("id", &self.id())
            .field("label", &self.inner.label)
            .field("alive", &self.is_alive())
            .finish()
    }
}

/// RAII guard for a root-slot observer.
///
/// Dropping the guard drops the strong callback reference; the weak entry in
/// the tree's observer list fails to upgrade and is pruned on the next
/// notification.
pub struct Subscription {
    _guard: Rc<RootObserver>,
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}

impl From<Subscription> for Disposable {
    /// Wrap the guard so a [`DisposableSet`](crate::dispose::DisposableSet)
    /// can cancel the observation alongside the scope's other resources.
    fn from(sub: Subscription) -> Self {
        Disposable::new(move || drop(sub))
    }
}

/// Model root holder: the single logical child slot a pane container
/// renders.
///
/// A `PaneTree` is itself a [`ModelEntity`], so a restored session can
/// rebuild it with its original id. The tree is shared state: the container
/// observes it, whoever drives the pane tree writes it.
pub struct PaneTree {
    core: EntityCore,
    root: RefCell<Option<Pane>>,
    observers: RefCell<Vec<Weak<RootObserver>>>,
}

impl PaneTree {
    /// Create an empty tree with a fresh id.
    #[must_use]
    pub fn new() -> Self {
        Self {
            core: EntityCore::new(),
            root: RefCell::new(None),
            observers: RefCell::new(Vec::new()),
        }
    }

    /// Rebuild a tree from saved session state with its original id.
    #[must_use]
    pub fn restored(id: EntityId) -> Self {
        Self {
            core: EntityCore::restored(id),
            root: RefCell::new(None),
            observers: RefCell::new(Vec::new()),
        }
    }

    /// Current root, if any.
    #[must_use]
    pub fn root(&self) -> Option<Pane> {
        self.root.borrow().clone()
    }

    /// Replace the root slot.
    ///
    /// Observers are notified synchronously, in registration order, unless
    /// the new root is identical to the current one (same pane id, or both
    /// empty).
    pub fn set_root(&self, new_root: Option<Pane>) {
        {
            let mut slot = self.root.borrow_mut();
            let unchanged = match (slot.as_ref(), new_root.as_ref()) {
                (Some(current), Some(next)) => current == next,
                (None, None) => true,
                _ => false,
            };
            if unchanged {
                return;
            }
            *slot = new_root.clone();
        }
        debug!(
            tree = %self.id(),
            root = ?new_root.as_ref().map(|p| p.id()),
            "pane tree root changed"
        );
        self.notify(new_root.as_ref());
    }

    /// Observe root changes.
    ///
    /// The handler is invoked synchronously with the new root value on each
    /// change. It is not invoked for the current value at registration time;
    /// callers that need an initial render read [`root`](PaneTree::root)
    /// themselves.
    pub fn observe_root(&self, handler: impl Fn(Option<&Pane>) + 'static) -> Subscription {
        let strong: Rc<RootObserver> = Rc::new(handler);
        self.observers.borrow_mut().push(Rc::downgrade(&strong));
        Subscription { _guard: strong }
    }

    /// Number of registered observers, including dead ones not yet pruned.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.observers.borrow().len()
    }

    /// Notify live observers in registration order, pruning dead entries.
    fn notify(&self, root: Option<&Pane>) {
        // Collect upgrades first so no borrow is held while callbacks run.
        let live: Vec<Rc<RootObserver>> = {
            let mut observers = self.observers.borrow_mut();
            observers.retain(|weak| weak.strong_count() > 0);
            observers.iter().filter_map(Weak::upgrade).collect()
        };
        for observer in &live {
            observer(root);
        }
    }
}

impl Default for PaneTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelEntity for PaneTree {
    fn entity_core(&self) -> &EntityCore {
        &self.core
    }

    fn on_destroyed(&self) {
        self.root.borrow_mut().take();
        self.observers.borrow_mut().clear();
    }
}

impl std::fmt::Debug for PaneTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaneTree")
            .field("id", &self.id())
            .field("root", &self.root.borrow().as_ref().map(Pane::id))
            .field("observers", &self.observers.borrow().len())
            .finish()
    }
}
