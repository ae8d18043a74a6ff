#![forbid(unsafe_code)]

//! Keyboard-focus capability injected into view components.
//!
//! Focus-dependent logic never reaches for a global "focused widget"
//! singleton; components receive a [`FocusQuery`] at construction. The
//! in-memory [`FocusTracker`] backs tests and headless embedders; a real
//! toolkit backend implements the same trait over its focus APIs.

use std::cell::RefCell;
use tracing::trace;

use crate::widget::Widget;

/// Read/write access to the process-wide keyboard focus.
pub trait FocusQuery {
    /// The currently focused widget, if any.
    fn focused(&self) -> Option<Widget>;

    /// Move keyboard focus to `target`.
    fn set_focus(&self, target: &Widget);

    /// Drop focus entirely.
    fn clear_focus(&self);
}

/// In-memory focus state, single-threaded.
///
/// Records whatever it is handed; it does not validate focusability. That
/// is the caller's concern (the container picks targets via
/// [`Widget::focus_target`]).
#[derive(Default)]
pub struct FocusTracker {
    current: RefCell<Option<Widget>>,
}

impl FocusTracker {
    /// Tracker with nothing focused.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl FocusQuery for FocusTracker {
    fn focused(&self) -> Option<Widget> {
        self.current.borrow().clone()
    }

    fn set_focus(&self, target: &Widget) {
        trace!(widget = target.id(), label = target.label(), "focus moved");
        *self.current.borrow_mut() = Some(target.clone());
    }

    fn clear_focus(&self) {
        *self.current.borrow_mut() = None;
    }
}

impl std::fmt::Debug for FocusTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FocusTracker")
            .field("focused", &self.current.borrow().as_ref().map(Widget::id))
            .finish()
    }
}
