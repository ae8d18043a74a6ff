#![forbid(unsafe_code)]

//! View-side of the sash pane shell.
//!
//! - [`widget`]: widget handles wrapping the toolkit surface by composition.
//! - [`focus`]: the injected keyboard-focus capability.
//! - [`resolver`]: the pane → widget resolution seam.
//! - [`container`]: the pane container that mirrors a pane-tree root slot.

pub mod container;
pub mod focus;
pub mod resolver;
pub mod widget;

pub use container::{ContainerConfig, ContainerError, PaneContainer};
pub use focus::{FocusQuery, FocusTracker};
pub use resolver::{MemoResolver, ViewResolver};
pub use widget::Widget;
