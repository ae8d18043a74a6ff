#![forbid(unsafe_code)]

//! Pane container: keeps one widget mounted for the pane tree's root slot
//! and carries keyboard focus across swaps.
//!
//! The container observes a [`PaneTree`]'s root slot. On every change it
//! detaches the previous view, mounts the new root's view resolved through
//! the configured [`ViewResolver`], and re-homes focus after the swap when
//! focus was inside the container. Teardown runs through the
//! [`ModelEntity`] contract: destroying the container cancels its
//! subscription exactly once.
//!
//! # State machine
//!
//! `Unattached` → [`initialize`](PaneContainer::initialize) → `Observing`
//! → root changes (any number) → `Observing` → [`destroy`](ModelEntity::destroy)
//! → `Disposed` (terminal).
//!
//! # Invariants
//!
//! 1. At any instant the container has zero or one mounted widget, matching
//!    the most recently processed notification.
//! 2. The root-change steps run strictly in order (focus check, detach,
//!    mount, focus restore) and never interleave with another notification
//!    (delivery is single-threaded and synchronous).
//! 3. The subscription is registered in the container's [`DisposableSet`]
//!    and cancelled exactly once, on destroy.
//!
//! # Failure Modes
//!
//! - Initialization without a resolver fails fast with
//!   [`ContainerError::MissingResolver`]; no subscription is registered.
//! - Errors (panics) from the resolver or widget mount propagate to the
//!   caller of [`on_root_changed`](PaneContainer::on_root_changed); a view
//!   that cannot render is not recoverable here.
//! - A missing focus target on restore is tolerated silently; focus
//!   restoration is best-effort by contract.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tracing::{debug, trace};

use sash_core::{DisposableSet, EntityCore, ModelEntity, Pane, PaneTree};

use crate::focus::FocusQuery;
use crate::resolver::ViewResolver;
use crate::widget::Widget;

/// Errors surfaced by container setup.
#[derive(Debug)]
pub enum ContainerError {
    /// No [`ViewResolver`] was configured; the container has no rendering
    /// strategy without one.
    MissingResolver,
    /// `initialize` was called on a container that already left the
    /// `Unattached` state.
    AlreadyInitialized,
}

impl std::fmt::Display for ContainerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingResolver => {
                write!(f, "pane container initialized without a view resolver")
            }
            Self::AlreadyInitialized => {
                write!(f, "pane container is already bound to a pane tree")
            }
        }
    }
}

impl std::error::Error for ContainerError {}

/// Container setup options.
#[derive(Default)]
pub struct ContainerConfig {
    resolver: Option<Rc<dyn ViewResolver>>,
}

impl ContainerConfig {
    /// Empty config with no resolver; initialization fails until one is
    /// set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the view resolver.
    #[must_use]
    pub fn resolver(mut self, resolver: Rc<dyn ViewResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }
}

impl std::fmt::Debug for ContainerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContainerConfig")
            .field("resolver", &self.resolver.is_some())
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ContainerState {
    Unattached,
    Observing,
    Disposed,
}

/// Rendering surface for one pane-tree root slot.
pub struct PaneContainer {
    core: EntityCore,
    /// The container's own toolkit surface; mounted views become its sole
    /// child.
    surface: Widget,
    state: Cell<ContainerState>,
    mounted: RefCell<Option<Widget>>,
    resolver: RefCell<Option<Rc<dyn ViewResolver>>>,
    subscriptions: RefCell<DisposableSet>,
    focus: Rc<dyn FocusQuery>,
}

impl PaneContainer {
    /// Create an unattached container using `focus` for focus queries.
    #[must_use]
    pub fn new(focus: Rc<dyn FocusQuery>) -> Rc<Self> {
        Rc::new(Self {
            core: EntityCore::new(),
            surface: Widget::new("pane-container"),
            state: Cell::new(ContainerState::Unattached),
            mounted: RefCell::new(None),
            resolver: RefCell::new(None),
            subscriptions: RefCell::new(DisposableSet::new()),
            focus,
        })
    }

    /// Bind the container to `tree` and start observing its root slot.
    ///
    /// Registers exactly one subscription (owned by the container's
    /// disposable set), then synchronously renders the current root.
    /// Returns the container for fluent setup.
    ///
    /// # Errors
    ///
    /// - [`ContainerError::MissingResolver`] when `config` carries no
    ///   resolver; no subscription is registered in that case.
    /// - [`ContainerError::AlreadyInitialized`] when the container already
    ///   left the `Unattached` state.
    pub fn initialize(
        self: &Rc<Self>,
        tree: &PaneTree,
        config: ContainerConfig,
    ) -> Result<Rc<Self>, ContainerError> {
        if self.state.get() != ContainerState::Unattached {
            return Err(ContainerError::AlreadyInitialized);
        }
        let resolver = config.resolver.ok_or(ContainerError::MissingResolver)?;
        *self.resolver.borrow_mut() = Some(resolver);

        let weak = Rc::downgrade(self);
        let subscription = tree.observe_root(move |root| {
            if let Some(container) = weak.upgrade() {
                container.on_root_changed(root);
            }
        });
        self.subscriptions.borrow_mut().add(subscription.into());
        self.state.set(ContainerState::Observing);
        debug!(container = %self.id(), tree = %tree.id(), "pane container observing");

        self.on_root_changed(tree.root().as_ref());
        Ok(Rc::clone(self))
    }

    /// Process a root-slot change.
    ///
    /// Steps, in strict order: focus containment check, detach the mounted
    /// widget, mount the new root's view, best-effort focus restore. Called
    /// synchronously by the tree's notification path; callable directly by
    /// embedders that drive the slot themselves.
    pub fn on_root_changed(&self, new_root: Option<&Pane>) {
        // 1. Was focus inside the container?
        let focused_before = self.focus.focused();
        let had_focus = focused_before
            .as_ref()
            .is_some_and(|focused| self.surface.contains(focused));

        // 2. Detach the previous view. The container keeps no reference;
        //    ownership returns through the resolver's cache.
        if let Some(old) = self.mounted.borrow_mut().take() {
            self.surface.remove_child(&old);
            trace!(container = %self.id(), widget = old.id(), "detached pane view");
        }

        // 3. Mount the new root's view as the sole child.
        if let Some(pane) = new_root {
            // An observing container always has a resolver; a direct call
            // before initialization leaves the slot unrendered.
            let resolver = self.resolver.borrow().clone();
            if let Some(resolver) = resolver {
                let view = resolver.resolve(pane);
                self.surface.append_child(&view);
                trace!(container = %self.id(), pane = %pane.id(), widget = view.id(), "mounted pane view");
                *self.mounted.borrow_mut() = Some(view);
            }
        }

        // 4. Restore focus when it was inside. The previously focused
        //    element wins if it survived the swap; otherwise focus moves to
        //    the new view's focus target. No target means no refocus.
        if had_focus {
            let target = match focused_before {
                Some(previous) if self.surface.contains(&previous) => Some(previous),
                _ => self
                    .mounted
                    .borrow()
                    .as_ref()
                    .and_then(Widget::focus_target),
            };
            match target {
                Some(target) => self.focus.set_focus(&target),
                None => trace!(container = %self.id(), "no focus target after swap"),
            }
        }
    }

    /// The container's toolkit surface, for mounting it inside a larger
    /// widget tree.
    #[must_use]
    pub fn surface(&self) -> &Widget {
        &self.surface
    }

    /// The currently mounted view, if any.
    #[must_use]
    pub fn mounted_widget(&self) -> Option<Widget> {
        self.mounted.borrow().clone()
    }

    /// Whether the container is observing a pane tree.
    #[must_use]
    pub fn is_observing(&self) -> bool {
        self.state.get() == ContainerState::Observing
    }
}

impl ModelEntity for PaneContainer {
    fn entity_core(&self) -> &EntityCore {
        &self.core
    }

    /// Cancels the root-change subscription. The mounted widget stays
    /// attached; detachment only happens via a root change to empty or by
    /// the embedder tearing down the surface.
    fn on_destroyed(&self) {
        self.subscriptions.borrow_mut().dispose();
        self.state.set(ContainerState::Disposed);
        debug!(container = %self.id(), "pane container disposed");
    }
}

impl std::fmt::Debug for PaneContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaneContainer")
            .field("id", &self.id())
            .field("state", &self.state.get())
            .field("mounted", &self.mounted.borrow().as_ref().map(Widget::id))
            .finish()
    }
}
