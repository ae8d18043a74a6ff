#![forbid(unsafe_code)]

//! One-shot cleanup handles and the scoped aggregate that owns them.
//!
//! A [`Disposable`] wraps a single cleanup action (cancel a subscription,
//! release an external resource) that runs at most once. A [`DisposableSet`]
//! collects disposables for a logical scope, typically a view-owning
//! component, and releases all of them as a unit.
//!
//! # Invariants
//!
//! 1. A disposable's action runs at most once, no matter how disposal is
//!    triggered (explicit call, set disposal, drop).
//! 2. Disposing a set disposes every contained handle exactly once, in
//!    membership order, then marks the set disposed. Repeat calls are no-ops.
//! 3. Adding to an already-disposed set disposes the handle immediately and
//!    returns an inert token. This is the documented policy: late
//!    registrations are cleaned up, never silently leaked.
//!
//! # Failure Modes
//!
//! - A panicking cleanup action propagates to the disposer and leaves later
//!   entries undisposed; cleanup actions are expected not to panic.

use tracing::trace;

/// A one-shot cleanup handle.
///
/// The wrapped action runs on the first [`dispose`](Disposable::dispose)
/// call (or on drop, if never disposed explicitly); afterwards the handle is
/// inert.
pub struct Disposable {
    action: Option<Box<dyn FnOnce()>>,
}

impl Disposable {
    /// Wrap a cleanup action.
    #[must_use]
    pub fn new(action: impl FnOnce() + 'static) -> Self {
        Self {
            action: Some(Box::new(action)),
        }
    }

    /// A handle with nothing to clean up. Reports as already disposed.
    #[must_use]
    pub fn empty() -> Self {
        Self { action: None }
    }

    /// Run the cleanup action if it has not run yet.
    pub fn dispose(&mut self) {
        if let Some(action) = self.action.take() {
            action();
        }
    }

    /// Whether the cleanup action has already run (or never existed).
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.action.is_none()
    }
}

impl Drop for Disposable {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl std::fmt::Debug for Disposable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Disposable")
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

/// Token identifying one entry of a [`DisposableSet`], for early disposal of
/// that entry alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DisposeToken(u64);

/// Ordered aggregate of [`Disposable`] handles, disposed as a single unit.
///
/// Owned exclusively by the component that created it; intentionally not
/// `Clone`. The set disposes its remaining entries on drop.
pub struct DisposableSet {
    entries: Vec<(u64, Disposable)>,
    next_token: u64,
    disposed: bool,
}

impl DisposableSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_token: 1,
            disposed: false,
        }
    }

    /// Register a handle for later cleanup.
    ///
    /// Returns a token that can dispose this single entry early via
    /// [`dispose_entry`](DisposableSet::dispose_entry). If the set is already
    /// disposed, the handle is disposed immediately and the returned token is
    /// inert.
    pub fn add(&mut self, mut handle: Disposable) -> DisposeToken {
        let token = DisposeToken(self.next_token);
        self.next_token += 1;
        if self.disposed {
            trace!("disposable added to disposed set, disposing immediately");
            handle.dispose();
        } else {
            self.entries.push((token.0, handle));
        }
        token
    }

    /// Dispose and remove the entry behind `token`.
    ///
    /// Returns `true` if the entry was present.
    pub fn dispose_entry(&mut self, token: DisposeToken) -> bool {
        match self.entries.iter().position(|(id, _)| *id == token.0) {
            Some(index) => {
                let (_, mut handle) = self.entries.remove(index);
                handle.dispose();
                true
            }
            None => false,
        }
    }

    /// Dispose every registered handle in membership order, then mark the
    /// set disposed. Safe to call repeatedly; later calls are no-ops.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        for (_, mut handle) in self.entries.drain(..) {
            handle.dispose();
        }
    }

    /// Whether [`dispose`](DisposableSet::dispose) has run.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Number of live entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set holds no live entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for DisposableSet {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for DisposableSet {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl std::fmt::Debug for DisposableSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DisposableSet")
            .field("entries", &self.entries.len())
            .field("disposed", &self.disposed)
            .finish()
    }
}
