//! End-to-end pane container behavior: root-slot swaps, single-mount
//! invariant, and focus continuity.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use sash_core::{ModelEntity, Pane, PaneTree};
use sash_view::{
    ContainerConfig, ContainerError, FocusQuery, FocusTracker, PaneContainer, ViewResolver, Widget,
};

/// Resolver over a fixed pane → widget table, counting resolutions.
struct TableResolver {
    views: HashMap<u64, Widget>,
    resolutions: RefCell<Vec<u64>>,
}

impl TableResolver {
    fn new(entries: &[(&Pane, &Widget)]) -> Self {
        Self {
            views: entries
                .iter()
                .map(|(pane, widget)| (pane.id().value(), (*widget).clone()))
                .collect(),
            resolutions: RefCell::new(Vec::new()),
        }
    }

    fn resolutions(&self) -> Vec<u64> {
        self.resolutions.borrow().clone()
    }
}

impl ViewResolver for TableResolver {
    fn resolve(&self, pane: &Pane) -> Widget {
        self.resolutions.borrow_mut().push(pane.id().value());
        self.views[&pane.id().value()].clone()
    }
}

struct Fixture {
    tree: PaneTree,
    container: Rc<PaneContainer>,
    focus: Rc<FocusTracker>,
    resolver: Rc<TableResolver>,
    pane_a: Pane,
    pane_b: Pane,
    widget_a: Widget,
    widget_b: Widget,
}

fn fixture() -> Fixture {
    let pane_a = Pane::new("pane-a");
    let pane_b = Pane::new("pane-b");
    let widget_a = Widget::new("view-a");
    widget_a.append_child(&Widget::new("editor-a").focusable(true));
    let widget_b = Widget::new("view-b");
    widget_b.append_child(&Widget::new("editor-b").focusable(true));

    let resolver = Rc::new(TableResolver::new(&[
        (&pane_a, &widget_a),
        (&pane_b, &widget_b),
    ]));
    let focus = Rc::new(FocusTracker::new());
    let tree = PaneTree::new();
    let container = PaneContainer::new(Rc::clone(&focus) as Rc<dyn FocusQuery>);
    container
        .initialize(
            &tree,
            ContainerConfig::new().resolver(Rc::clone(&resolver) as Rc<dyn ViewResolver>),
        )
        .expect("container initializes");

    Fixture {
        tree,
        container,
        focus,
        resolver,
        pane_a,
        pane_b,
        widget_a,
        widget_b,
    }
}

#[test]
fn swap_sequence_keeps_exactly_one_widget_mounted() {
    let f = fixture();

    // empty → A
    f.tree.set_root(Some(f.pane_a.clone()));
    assert_eq!(f.container.mounted_widget(), Some(f.widget_a.clone()));
    assert_eq!(f.container.surface().child_count(), 1);
    assert_eq!(f.widget_a.parent(), Some(f.container.surface().clone()));

    // A → B
    f.tree.set_root(Some(f.pane_b.clone()));
    assert_eq!(f.container.mounted_widget(), Some(f.widget_b.clone()));
    assert_eq!(f.container.surface().child_count(), 1);
    assert_eq!(f.widget_a.parent(), None, "A detached on swap");
    assert_eq!(f.widget_b.parent(), Some(f.container.surface().clone()));

    // B → empty
    f.tree.set_root(None);
    assert_eq!(f.container.mounted_widget(), None);
    assert_eq!(f.container.surface().child_count(), 0);
    assert_eq!(f.widget_b.parent(), None);

    // Each pane resolved exactly once per mount.
    assert_eq!(
        f.resolver.resolutions(),
        vec![f.pane_a.id().value(), f.pane_b.id().value()]
    );
}

#[test]
fn mounted_widget_mirrors_latest_notification() {
    let f = fixture();

    for _ in 0..3 {
        f.tree.set_root(Some(f.pane_a.clone()));
        f.tree.set_root(Some(f.pane_b.clone()));
    }
    f.tree.set_root(Some(f.pane_a.clone()));
    assert_eq!(f.container.mounted_widget(), Some(f.widget_a.clone()));
    assert_eq!(f.container.surface().child_count(), 1);
}

#[test]
fn remount_after_detach_restores_same_view() {
    let f = fixture();

    f.tree.set_root(Some(f.pane_a.clone()));
    f.tree.set_root(None);
    f.tree.set_root(Some(f.pane_a.clone()));

    assert_eq!(f.container.mounted_widget(), Some(f.widget_a.clone()));
    assert_eq!(
        f.resolver.resolutions(),
        vec![f.pane_a.id().value(), f.pane_a.id().value()],
        "resolver asked once per mount, returning the cached view"
    );
}

#[test]
fn focus_inside_container_lands_in_new_view_after_swap() {
    let f = fixture();

    f.tree.set_root(Some(f.pane_a.clone()));
    let editor_a = f.widget_a.focus_target().expect("A has a focusable editor");
    f.focus.set_focus(&editor_a);

    f.tree.set_root(Some(f.pane_b.clone()));
    let focused = f.focus.focused().expect("focus survives the swap");
    assert!(
        f.container.surface().contains(&focused),
        "focus ends up inside the container"
    );
    assert_eq!(focused, f.widget_b.focus_target().expect("B's target"));
}

#[test]
fn surviving_focused_element_is_regrabbed() {
    let f = fixture();

    // Focus the container surface itself; it survives every swap.
    f.tree.set_root(Some(f.pane_a.clone()));
    f.focus.set_focus(f.container.surface());

    f.tree.set_root(Some(f.pane_b.clone()));
    assert_eq!(
        f.focus.focused(),
        Some(f.container.surface().clone()),
        "previously focused element wins when still inside"
    );
}

#[test]
fn focus_outside_container_is_untouched() {
    let f = fixture();
    let sidebar = Widget::new("sidebar").focusable(true);
    f.focus.set_focus(&sidebar);

    f.tree.set_root(Some(f.pane_a.clone()));
    f.tree.set_root(Some(f.pane_b.clone()));
    f.tree.set_root(None);

    assert_eq!(f.focus.focused(), Some(sidebar), "outside focus never moves");
}

#[test]
fn missing_focus_target_is_tolerated() {
    let pane_a = Pane::new("pane-a");
    let pane_plain = Pane::new("pane-plain");
    let widget_a = Widget::new("view-a").focusable(true);
    let widget_plain = Widget::new("view-plain"); // nothing focusable

    let resolver = Rc::new(TableResolver::new(&[
        (&pane_a, &widget_a),
        (&pane_plain, &widget_plain),
    ]));
    let focus = Rc::new(FocusTracker::new());
    let tree = PaneTree::new();
    let container = PaneContainer::new(Rc::clone(&focus) as Rc<dyn FocusQuery>);
    container
        .initialize(
            &tree,
            ContainerConfig::new().resolver(resolver as Rc<dyn ViewResolver>),
        )
        .expect("container initializes");

    tree.set_root(Some(pane_a));
    focus.set_focus(&widget_a);

    // Swap to a view with no focus target: restoration is skipped, no panic.
    tree.set_root(Some(pane_plain));
    assert_eq!(container.mounted_widget(), Some(widget_plain));
}

#[test]
fn initialize_without_resolver_registers_nothing() {
    let tree = PaneTree::new();
    let container = PaneContainer::new(Rc::new(FocusTracker::new()));

    let err = container
        .initialize(&tree, ContainerConfig::new())
        .unwrap_err();
    assert!(matches!(err, ContainerError::MissingResolver));
    assert_eq!(tree.observer_count(), 0);

    // Later root changes reach nobody.
    tree.set_root(Some(Pane::new("orphan")));
    assert_eq!(container.mounted_widget(), None);
}

#[test]
fn destroyed_container_ignores_further_changes() {
    let f = fixture();

    f.tree.set_root(Some(f.pane_a.clone()));
    f.container.destroy();
    assert!(f.container.is_destroyed());

    f.tree.set_root(Some(f.pane_b.clone()));
    assert_eq!(
        f.container.mounted_widget(),
        Some(f.widget_a.clone()),
        "destroy cancels observation but does not detach"
    );

    f.container.destroy(); // idempotent, still fine
}

#[test]
fn dropped_container_prunes_its_observer() {
    let f = fixture();
    assert_eq!(f.tree.observer_count(), 1);

    drop(f.container);
    f.tree.set_root(Some(f.pane_a.clone()));
    assert_eq!(f.tree.observer_count(), 0, "dead observer pruned");
}
