use assertables::*;
use ocv_testutils::*;

use super::*;

#[rstest]
fn test_snapshot_then_incremental() {
    let mut store = CollectionStore::new();
    let change = store.apply(ResourceKind::Pods, WatchEvent::Snapshot(vec![test_pod("a", &[]), test_pod("b", &[])]));
    assert_eq!(change, Some(StoreChange::Snapshot));
    assert_eq!(names(store.get(ResourceKind::Pods)), vec!["a", "b"]);

    let change = store.apply(ResourceKind::Pods, WatchEvent::Upsert(test_pod("c", &[])));
    assert_eq!(change, Some(StoreChange::Upsert { name: "c".into(), action: WatchAction::Added }));
    assert_eq!(names(store.get(ResourceKind::Pods)), vec!["a", "b", "c"]);

    let change = store.apply(ResourceKind::Pods, WatchEvent::Delete("a".into()));
    assert_eq!(change.as_ref().and_then(|c| c.action()), Some(WatchAction::Deleted));
    assert_eq!(names(store.get(ResourceKind::Pods)), vec!["b", "c"]);

    let change = store.apply(ResourceKind::Pods, WatchEvent::Upsert(test_pod("b", &[("app", "a")])));
    assert_eq!(change, Some(StoreChange::Upsert { name: "b".into(), action: WatchAction::Modified }));
    assert_eq!(names(store.get(ResourceKind::Pods)), vec!["b", "c"]);
}

#[rstest]
fn test_snapshot_replaces_everything() {
    let mut store = store_with([(ResourceKind::Services, vec![test_service("a", &[]), test_service("b", &[])])]);
    store.apply(ResourceKind::Services, WatchEvent::Snapshot(vec![test_service("c", &[])]));
    assert_eq!(names(store.get(ResourceKind::Services)), vec!["c"]);
}

#[rstest]
fn test_kinds_are_independent() {
    let mut store = CollectionStore::new();
    store.upsert(ResourceKind::Pods, test_pod("foo", &[]));
    store.upsert(ResourceKind::Services, test_service("foo", &[]));
    store.remove(ResourceKind::Pods, "foo");

    assert_is_empty!(store.get(ResourceKind::Pods));
    assert_some!(store.get_obj(ResourceKind::Services, "foo"));
}

#[rstest]
fn test_versions_and_sync() {
    let mut store = CollectionStore::new();
    assert_eq!(store.version(ResourceKind::Builds), 0);
    assert!(!store.has_synced(ResourceKind::Builds));
    assert_is_empty!(store.get(ResourceKind::Builds));

    store.upsert(ResourceKind::Builds, test_build(TEST_BUILD, TEST_OUTPUT_IMAGE));
    assert_eq!(store.version(ResourceKind::Builds), 1);
    assert!(!store.has_synced(ResourceKind::Builds));

    store.replace_all(ResourceKind::Builds, vec![]);
    assert_eq!(store.version(ResourceKind::Builds), 2);
    assert!(store.has_synced(ResourceKind::Builds));
    assert_eq!(store.version(ResourceKind::Pods), 0);
}

#[rstest]
fn test_delete_missing_object() {
    let mut store = store_with([(ResourceKind::Pods, vec![test_pod("a", &[])])]);
    let version = store.version(ResourceKind::Pods);

    let change = store.apply(ResourceKind::Pods, WatchEvent::Delete("nope".into()));
    assert_eq!(change, Some(StoreChange::Delete { name: "nope".into() }));
    assert_eq!(store.version(ResourceKind::Pods), version);
    assert_eq!(names(store.get(ResourceKind::Pods)), vec!["a"]);
}

#[rstest]
fn test_nameless_objects_are_skipped() {
    let mut nameless = test_pod("a", &[]);
    nameless.metadata.name = None;

    let mut store = CollectionStore::new();
    assert_none!(store.apply(ResourceKind::Pods, WatchEvent::Upsert(nameless.clone())));

    store.apply(ResourceKind::Pods, WatchEvent::Snapshot(vec![nameless, test_pod("b", &[])]));
    assert_eq!(names(store.get(ResourceKind::Pods)), vec!["b"]);
}

#[rstest]
fn test_replacement_does_not_mutate_old_object() {
    let mut store = store_with([(ResourceKind::Pods, vec![test_pod("a", &[("app", "old")])])]);
    let old = store.get_obj(ResourceKind::Pods, "a").cloned().unwrap();

    store.upsert(ResourceKind::Pods, test_pod("a", &[("app", "new")]));
    assert_eq!(old.labels()["app"], "old");
    assert_eq!(store.get_obj(ResourceKind::Pods, "a").unwrap().labels()["app"], "new");
}
