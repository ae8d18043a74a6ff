#![forbid(unsafe_code)]

//! Model-side primitives for the sash pane shell.
//!
//! - [`entity`]: process-unique identity and one-shot lifecycle shared by
//!   every model object.
//! - [`dispose`]: one-shot cleanup handles and the scoped aggregate that
//!   releases them as a unit.
//! - [`pane`]: pane handles and the observable pane-tree root slot.

pub mod dispose;
pub mod entity;
pub mod pane;

pub use dispose::{Disposable, DisposableSet, DisposeToken};
pub use entity::{EntityCore, EntityId, ModelEntity};
pub use pane::{Pane, PaneTree, Subscription};
