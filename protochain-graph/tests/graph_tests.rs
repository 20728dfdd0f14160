use pretty_assertions::assert_eq;
use protochain_graph::{props, EntityId, GraphError, PrototypeGraph, Value};

/// Three entities linked `c -> b -> a`.
fn three_level() -> (PrototypeGraph, EntityId, EntityId, EntityId) {
    let mut graph = PrototypeGraph::new();
    let a = graph.create_entity(props! { "x" => 1, "only_a" => "a" });
    let b = graph.create_entity(props! { "x" => 2 });
    let c = graph.create_entity(props! {});
    graph.set_parent(b, Some(a)).unwrap();
    graph.set_parent(c, Some(b)).unwrap();
    (graph, a, b, c)
}

// ── Creation ─────────────────────────────────────────────────────

#[test]
fn new_graph_is_empty() {
    let graph = PrototypeGraph::new();
    assert!(graph.is_empty());
    assert_eq!(graph.len(), 0);
}

#[test]
fn create_entity_has_no_parent() {
    let mut graph = PrototypeGraph::new();
    let id = graph.create_entity(props! { "x" => 1 });
    assert!(graph.contains(id));
    assert_eq!(graph.parent_of(id).unwrap(), None);
    assert_eq!(graph.get(id, "x").unwrap(), Some(&Value::from(1)));
}

#[test]
fn create_empty_entity() {
    let mut graph = PrototypeGraph::new();
    let id = graph.create_entity(props! {});
    assert!(graph.own_keys(id).unwrap().is_empty());
}

#[test]
fn create_with_parent_links_immediately() {
    let mut graph = PrototypeGraph::new();
    let proto = graph.create_entity(props! { "kind" => "point" });
    let point = graph.create_with_parent(proto, props! { "x" => 3 }).unwrap();
    assert_eq!(graph.parent_of(point).unwrap(), Some(proto));
    assert_eq!(graph.get(point, "kind").unwrap(), Some(&Value::from("point")));
}

#[test]
fn create_with_unknown_parent_fails() {
    let mut graph = PrototypeGraph::new();
    let ghost = EntityId::new();
    let err = graph.create_with_parent(ghost, props! {}).unwrap_err();
    assert!(matches!(err, GraphError::UnknownEntity(id) if id == ghost));
    assert!(graph.is_empty());
}

#[test]
fn ids_are_sorted_and_complete() {
    let (graph, a, b, c) = three_level();
    let mut expected = vec![a, b, c];
    expected.sort();
    assert_eq!(graph.ids(), expected);
}

// ── Delegation links ─────────────────────────────────────────────

#[test]
fn set_parent_replaces_previous_link() {
    let mut graph = PrototypeGraph::new();
    let first = graph.create_entity(props! { "from" => "first" });
    let second = graph.create_entity(props! { "from" => "second" });
    let child = graph.create_entity(props! {});

    graph.set_parent(child, Some(first)).unwrap();
    assert_eq!(graph.get(child, "from").unwrap(), Some(&Value::from("first")));

    graph.set_parent(child, Some(second)).unwrap();
    assert_eq!(graph.get(child, "from").unwrap(), Some(&Value::from("second")));
    assert_eq!(graph.get(first, "from").unwrap(), Some(&Value::from("first")));
}

#[test]
fn set_parent_none_detaches() {
    let (mut graph, _a, b, _c) = three_level();
    graph.set_parent(b, None).unwrap();
    assert_eq!(graph.parent_of(b).unwrap(), None);
    assert_eq!(graph.get(b, "only_a").unwrap(), None);
}

#[test]
fn set_parent_to_self_is_a_cycle() {
    let mut graph = PrototypeGraph::new();
    let a = graph.create_entity(props! {});
    let err = graph.set_parent(a, Some(a)).unwrap_err();
    assert!(matches!(err, GraphError::Cycle { child, parent } if child == a && parent == a));
    assert_eq!(graph.parent_of(a).unwrap(), None);
}

#[test]
fn closing_a_three_entity_loop_is_rejected() {
    let (mut graph, a, b, c) = three_level();
    let err = graph.set_parent(a, Some(c)).unwrap_err();
    assert!(matches!(err, GraphError::Cycle { .. }));

    assert_eq!(graph.parent_of(a).unwrap(), None);
    assert_eq!(graph.parent_of(b).unwrap(), Some(a));
    assert_eq!(graph.parent_of(c).unwrap(), Some(b));
}

#[test]
fn failed_relink_keeps_existing_parent() {
    let (mut graph, a, b, c) = three_level();
    let other = graph.create_entity(props! {});
    graph.set_parent(a, Some(other)).unwrap();

    assert!(graph.set_parent(a, Some(c)).is_err());
    assert_eq!(graph.parent_of(a).unwrap(), Some(other));
    assert_eq!(graph.chain(c).unwrap(), vec![c, b, a, other]);
}

#[test]
fn siblings_may_share_a_parent() {
    let mut graph = PrototypeGraph::new();
    let proto = graph.create_entity(props! { "shared" => true });
    let left = graph.create_with_parent(proto, props! {}).unwrap();
    let right = graph.create_with_parent(proto, props! {}).unwrap();

    assert_eq!(graph.get(left, "shared").unwrap(), Some(&Value::Bool(true)));
    assert_eq!(graph.get(right, "shared").unwrap(), Some(&Value::Bool(true)));

    let mut expected = vec![left, right];
    expected.sort();
    assert_eq!(graph.children_of(proto).unwrap(), expected);
}

#[test]
fn relinking_sibling_under_sibling_is_allowed() {
    let mut graph = PrototypeGraph::new();
    let proto = graph.create_entity(props! {});
    let left = graph.create_with_parent(proto, props! {}).unwrap();
    let right = graph.create_with_parent(proto, props! {}).unwrap();
    graph.set_parent(right, Some(left)).unwrap();
    assert_eq!(graph.chain(right).unwrap(), vec![right, left, proto]);
}

#[test]
fn set_parent_with_unknown_ids_fails() {
    let mut graph = PrototypeGraph::new();
    let a = graph.create_entity(props! {});
    let ghost = EntityId::new();

    assert!(matches!(
        graph.set_parent(ghost, Some(a)),
        Err(GraphError::UnknownEntity(id)) if id == ghost
    ));
    assert!(matches!(
        graph.set_parent(a, Some(ghost)),
        Err(GraphError::UnknownEntity(id)) if id == ghost
    ));
    assert_eq!(graph.parent_of(a).unwrap(), None);
}

// ── Chain ────────────────────────────────────────────────────────

#[test]
fn chain_runs_from_entity_to_root() {
    let (graph, a, b, c) = three_level();
    assert_eq!(graph.chain(c).unwrap(), vec![c, b, a]);
    assert_eq!(graph.chain(b).unwrap(), vec![b, a]);
    assert_eq!(graph.chain(a).unwrap(), vec![a]);
}

#[test]
fn chain_ends_at_entity_without_parent() {
    let (graph, _a, _b, c) = three_level();
    let chain = graph.chain(c).unwrap();
    let root = *chain.last().unwrap();
    assert_eq!(graph.parent_of(root).unwrap(), None);
}

#[test]
fn chain_reflects_later_relinks() {
    let (mut graph, a, b, c) = three_level();
    assert_eq!(graph.chain(c).unwrap().len(), 3);
    graph.set_parent(c, Some(a)).unwrap();
    assert_eq!(graph.chain(c).unwrap(), vec![c, a]);
    assert_eq!(graph.chain(b).unwrap(), vec![b, a]);
}

#[test]
fn chain_of_unknown_entity_fails() {
    let graph = PrototypeGraph::new();
    assert!(matches!(
        graph.chain(EntityId::new()),
        Err(GraphError::UnknownEntity(_))
    ));
}

// ── Lookup ───────────────────────────────────────────────────────

#[test]
fn nearest_own_property_wins() {
    let (graph, a, b, c) = three_level();
    assert_eq!(graph.get(a, "x").unwrap(), Some(&Value::from(1)));
    assert_eq!(graph.get(b, "x").unwrap(), Some(&Value::from(2)));
    assert_eq!(graph.get(c, "x").unwrap(), Some(&Value::from(2)));
}

#[test]
fn lookup_reports_owner() {
    let (graph, a, b, c) = three_level();
    let (owner, value) = graph.lookup(c, "x").unwrap().unwrap();
    assert_eq!(owner, b);
    assert_eq!(value, &Value::from(2));

    let (owner, _) = graph.lookup(c, "only_a").unwrap().unwrap();
    assert_eq!(owner, a);
}

#[test]
fn missing_property_is_none() {
    let (graph, _a, _b, c) = three_level();
    assert_eq!(graph.get(c, "nope").unwrap(), None);
}

#[test]
fn repeated_get_is_stable() {
    let (graph, _a, _b, c) = three_level();
    let first = graph.get(c, "x").unwrap().cloned();
    for _ in 0..10 {
        assert_eq!(graph.get(c, "x").unwrap().cloned(), first);
    }
}

#[test]
fn get_on_unknown_entity_fails() {
    let graph = PrototypeGraph::new();
    assert!(matches!(
        graph.get(EntityId::new(), "x"),
        Err(GraphError::UnknownEntity(_))
    ));
}

// ── Own properties ───────────────────────────────────────────────

#[test]
fn set_own_property_shadows_inherited() {
    let (mut graph, a, _b, c) = three_level();
    graph.set_own_property(c, "only_a", "shadowed").unwrap();
    assert_eq!(graph.get(c, "only_a").unwrap(), Some(&Value::from("shadowed")));
    assert_eq!(graph.get(a, "only_a").unwrap(), Some(&Value::from("a")));
}

#[test]
fn deleting_own_property_reveals_inherited() {
    let (mut graph, _a, b, _c) = three_level();
    assert!(graph.delete_own_property(b, "x").unwrap());
    assert_eq!(graph.get(b, "x").unwrap(), Some(&Value::from(1)));
}

#[test]
fn deleting_absent_property_returns_false() {
    let (mut graph, a, _b, c) = three_level();
    assert!(!graph.delete_own_property(c, "x").unwrap());
    assert_eq!(graph.get(a, "x").unwrap(), Some(&Value::from(1)));
}

#[test]
fn delete_never_touches_ancestors() {
    let (mut graph, a, _b, c) = three_level();
    assert!(!graph.delete_own_property(c, "only_a").unwrap());
    assert!(graph.has_own_property(a, "only_a").unwrap());
}

#[test]
fn set_own_property_on_unknown_entity_fails() {
    let mut graph = PrototypeGraph::new();
    assert!(matches!(
        graph.set_own_property(EntityId::new(), "x", 1),
        Err(GraphError::UnknownEntity(_))
    ));
}

#[test]
fn has_own_property_ignores_inherited() {
    let (graph, a, b, _c) = three_level();
    assert!(graph.has_own_property(a, "only_a").unwrap());
    assert!(!graph.has_own_property(b, "only_a").unwrap());
}

// ── Keys ─────────────────────────────────────────────────────────

#[test]
fn own_keys_are_sorted() {
    let mut graph = PrototypeGraph::new();
    let id = graph.create_entity(props! { "b" => 1, "a" => 2, "c" => 3 });
    assert_eq!(graph.own_keys(id).unwrap(), vec!["a", "b", "c"]);
}

#[test]
fn keys_walk_the_chain_without_duplicates() {
    let (mut graph, _a, _b, c) = three_level();
    graph.set_own_property(c, "z", 0).unwrap();
    assert_eq!(graph.keys(c).unwrap(), vec!["z", "x", "only_a"]);
}

// ── Removal ──────────────────────────────────────────────────────

#[test]
fn remove_leaf_returns_entity() {
    let (mut graph, _a, b, c) = three_level();
    let removed = graph.remove_entity(c).unwrap();
    assert_eq!(removed.id(), c);
    assert_eq!(removed.parent(), Some(b));
    assert!(!graph.contains(c));
    assert_eq!(graph.len(), 2);
}

#[test]
fn parent_outlives_removed_child() {
    let (mut graph, a, b, c) = three_level();
    graph.remove_entity(c).unwrap();
    assert_eq!(graph.get(b, "x").unwrap(), Some(&Value::from(2)));
    assert_eq!(graph.chain(b).unwrap(), vec![b, a]);
    assert!(graph.children_of(b).unwrap().is_empty());
}

#[test]
fn removing_a_parent_is_refused() {
    let (mut graph, a, b, _c) = three_level();
    let err = graph.remove_entity(a).unwrap_err();
    assert!(matches!(err, GraphError::EntityInUse { id, dependents: 1 } if id == a));
    assert!(graph.contains(a));
    assert_eq!(graph.parent_of(b).unwrap(), Some(a));
}

#[test]
fn parent_can_be_removed_after_children_detach() {
    let (mut graph, a, b, _c) = three_level();
    graph.set_parent(b, None).unwrap();
    graph.remove_entity(a).unwrap();
    assert!(!graph.contains(a));
}

#[test]
fn remove_unknown_entity_fails() {
    let mut graph = PrototypeGraph::new();
    assert!(matches!(
        graph.remove_entity(EntityId::new()),
        Err(GraphError::UnknownEntity(_))
    ));
}
