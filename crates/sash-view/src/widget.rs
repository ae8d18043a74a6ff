#![forbid(unsafe_code)]

//! Widget handles: the container's view of the toolkit surface.
//!
//! The shell does not inherit from a toolkit widget type. Instead a
//! [`Widget`] is a cheap-to-clone handle wrapping a toolkit node by
//! composition, exposing exactly the capability set the container needs:
//! mount a child, detach a child, walk parent links, and answer focus
//! containment queries.
//!
//! # Invariants
//!
//! 1. A widget has at most one parent; appending a child that is attached
//!    elsewhere re-parents it (detaches from the old parent first).
//! 2. `contains` walks parent links upward from the candidate, so a widget
//!    contains itself and every descendant.
//! 3. Parent links are weak; a detached subtree keeps no parent alive.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for unique widget handles.
static WIDGET_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

struct WidgetNode {
    id: u64,
    label: String,
    focusable: Cell<bool>,
    parent: RefCell<Weak<WidgetNode>>,
    children: RefCell<Vec<Widget>>,
}

/// Handle to one node of the widget tree.
///
/// Cloning clones the handle; equality is handle identity (two handles are
/// equal when they point at the same node).
#[derive(Clone)]
pub struct Widget {
    node: Rc<WidgetNode>,
}

impl Widget {
    /// Create a detached, non-focusable widget.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            node: Rc::new(WidgetNode {
                id: WIDGET_ID_COUNTER.fetch_add(1, Ordering::Relaxed),
                label: label.into(),
                focusable: Cell::new(false),
                parent: RefCell::new(Weak::new()),
                children: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Builder-style focusable flag.
    #[must_use]
    pub fn focusable(self, focusable: bool) -> Self {
        self.node.focusable.set(focusable);
        self
    }

    /// Unique id of the underlying node.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.node.id
    }

    /// Debug label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.node.label
    }

    /// Whether this widget accepts keyboard focus itself.
    #[must_use]
    pub fn is_focusable(&self) -> bool {
        self.node.focusable.get()
    }

    /// Change the focusable flag in place.
    pub fn set_focusable(&self, focusable: bool) {
        self.node.focusable.set(focusable);
    }

    /// Parent widget, if attached.
    #[must_use]
    pub fn parent(&self) -> Option<Widget> {
        self.node.parent.borrow().upgrade().map(|node| Widget { node })
    }

    /// Current children, in mount order.
    #[must_use]
    pub fn children(&self) -> Vec<Widget> {
        self.node.children.borrow().clone()
    }

    /// Number of mounted children.
    #[must_use]
    pub fn child_count(&self) -> usize {
        self.node.children.borrow().len()
    }

    /// Mount `child` as the last child of this widget.
    ///
    /// If `child` is attached elsewhere it is detached from its old parent
    /// first; a child is never in two trees at once.
    pub fn append_child(&self, child: &Widget) {
        if let Some(old_parent) = child.parent() {
            old_parent.remove_child(child);
        }
        *child.node.parent.borrow_mut() = Rc::downgrade(&self.node);
        self.node.children.borrow_mut().push(child.clone());
    }

    /// Detach `child` from this widget.
    ///
    /// Returns `true` if the child was attached here. The child's parent
    /// link is cleared; its own subtree is untouched.
    pub fn remove_child(&self, child: &Widget) -> bool {
        let mut children = self.node.children.borrow_mut();
        match children.iter().position(|c| c == child) {
            Some(index) => {
                children.remove(index);
                *child.node.parent.borrow_mut() = Weak::new();
                true
            }
            None => false,
        }
    }

    /// Focus containment: whether `candidate` is this widget or nested
    /// anywhere below it. Walks parent links upward from the candidate
    /// until this widget or the tree root is reached.
    #[must_use]
    pub fn contains(&self, candidate: &Widget) -> bool {
        let mut current = Some(candidate.clone());
        while let Some(widget) = current {
            if widget == *self {
                return true;
            }
            current = widget.parent();
        }
        false
    }

    /// The focus-accepting target for this subtree: the widget itself when
    /// focusable, otherwise the first focusable descendant in depth-first
    /// mount order.
    #[must_use]
    pub fn focus_target(&self) -> Option<Widget> {
        if self.is_focusable() {
            return Some(self.clone());
        }
        self.node
            .children
            .borrow()
            .iter()
            .find_map(Widget::focus_target)
    }
}

impl PartialEq for Widget {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.node, &other.node)
    }
}

impl Eq for Widget {}

impl std::fmt::Debug for Widget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Widget")
            .field("id", &self.node.id)
            .field("label", &self.node.label)
            .field("focusable", &self.node.focusable.get())
            .field("children", &self.node.children.borrow().len())
            .finish()
    }
}
