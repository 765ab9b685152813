use std::sync::atomic::{
    AtomicUsize,
    Ordering,
};

use assertables::*;
use ocv_testutils::*;

use super::*;
use crate::subscription::MockSubscriptionHandle;

fn apply(store: &mut CollectionStore, views: &mut [&mut ConsoleView], kind: ResourceKind, evt: WatchEvent) -> bool {
    let change = store.apply(kind, evt).unwrap();
    let mut changed = false;
    for view in views.iter_mut() {
        changed |= view.handle(store, kind, &change);
    }
    changed
}

#[fixture]
fn store() -> CollectionStore {
    store_with([
        (
            ResourceKind::Services,
            vec![
                test_service_with_labels("frontend", &[("app", "frontend")]),
                test_service_with_labels("db", &[("app", "db")]),
            ],
        ),
        (ResourceKind::Deployments, vec![test_deployment_with_labels("frontend-1", &[("app", "frontend")])]),
        (ResourceKind::Pods, vec![test_pod("p1", &[("deploymentconfig", TEST_DEPLOYMENT_CONFIG)])]),
    ])
}

#[rstest]
fn test_sync_builds_initial_state(store: CollectionStore) {
    let mut view = ConsoleView::new(&ViewConfig::default());
    view.sync(&store);

    assert_eq!(names(view.filtered(ResourceKind::Services).unwrap()), vec!["db", "frontend"]);
    assert_eq!(view.suggestions()["app"].len(), 2);
    assert_eq!(view.state().get(ResourceKind::Deployments).unwrap().empty_message, "No deployments to show");
    assert_eq!(view.associations().pods_by_label().len(), 1);
}

#[rstest]
fn test_independent_consumers(mut store: CollectionStore) {
    let mut frontend = ConsoleView::new(&ViewConfig {
        label_selector: LabelSelector::from_pairs([("app", "frontend")]),
        ..Default::default()
    });
    let mut everything = ConsoleView::new(&ViewConfig::default());
    frontend.sync(&store);
    everything.sync(&store);

    assert_eq!(names(frontend.filtered(ResourceKind::Services).unwrap()), vec!["frontend"]);
    assert_eq!(names(everything.filtered(ResourceKind::Services).unwrap()), vec!["db", "frontend"]);

    // Narrowing one view's filter leaves the other alone
    assert!(everything.set_selector(&store, LabelSelector::from_pairs([("app", "db")])));
    assert_eq!(names(frontend.filtered(ResourceKind::Services).unwrap()), vec!["frontend"]);
    assert_eq!(names(everything.filtered(ResourceKind::Services).unwrap()), vec!["db"]);

    // Both see the same store updates through their own filters
    let evt = WatchEvent::Upsert(test_service_with_labels("frontend-2", &[("app", "frontend")]));
    assert!(apply(&mut store, &mut [&mut frontend, &mut everything], ResourceKind::Services, evt));
    assert_eq!(names(frontend.filtered(ResourceKind::Services).unwrap()), vec!["frontend", "frontend-2"]);
    assert_eq!(names(everything.filtered(ResourceKind::Services).unwrap()), vec!["db"]);
}

#[rstest]
fn test_filter_change_raises_and_clears_alert(store: CollectionStore) {
    let mut view = ConsoleView::new(&ViewConfig::default());
    view.sync(&store);

    assert!(view.set_selector(&store, LabelSelector::from_pairs([("app", "nope")])));
    assert_some!(view.state().alert(ResourceKind::Services));
    assert_some!(view.state().alert(ResourceKind::Deployments));
    assert_contains!(view.summary(), "The active filters are hiding all services.");

    // Setting the same selector again is a no-op
    assert!(!view.set_selector(&store, LabelSelector::from_pairs([("app", "nope")])));

    assert!(view.set_selector(&store, LabelSelector::everything()));
    assert_eq!(view.state().alerts().count(), 0);
}

#[rstest]
fn test_selector_listeners(store: CollectionStore) {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut view = ConsoleView::new(&ViewConfig::default());
    let listener_calls = calls.clone();
    view.on_selector_changed(move |_| {
        listener_calls.fetch_add(1, Ordering::SeqCst);
    });

    view.set_selector(&store, LabelSelector::from_pairs([("app", "db")]));
    view.set_selector(&store, LabelSelector::from_pairs([("app", "db")]));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[rstest]
fn test_unchanged_view_is_not_reported(mut store: CollectionStore) {
    let mut view = ConsoleView::new(&ViewConfig {
        label_selector: LabelSelector::from_pairs([("app", "frontend")]),
        ..Default::default()
    });
    view.sync(&store);

    // Relabelling a service that the filter hides doesn't change what this view shows
    let evt = WatchEvent::Upsert(test_service_with_labels("db", &[("app", "db"), ("tier", "cache")]));
    assert!(!apply(&mut store, &mut [&mut view], ResourceKind::Services, evt));
    assert_eq!(view.suggestions()["tier"].len(), 1);
}

#[rstest]
fn test_filtered_pods_by_service(mut store: CollectionStore) {
    let mut view = ConsoleView::new(&ViewConfig {
        label_selector: LabelSelector::from_pairs([("app", "frontend")]),
        ..Default::default()
    });
    view.sync(&store);

    let mut svc = test_service_with_labels("frontend", &[("app", "frontend")]);
    svc.data["spec"]["selector"] = serde_json::json!({"deploymentconfig": TEST_DEPLOYMENT_CONFIG});
    apply(&mut store, &mut [&mut view], ResourceKind::Services, WatchEvent::Upsert(svc));

    let pods_by_service = view.filtered_pods_by_service();
    assert_eq!(pods_by_service.len(), 1);
    assert_eq!(names(pods_by_service["frontend"]), vec!["p1"]);
    assert_some!(view.pods_for_service("db"));
}

#[rstest]
fn test_teardown_isolation(mut store: CollectionStore) {
    let mut handle = MockSubscriptionHandle::new();
    handle.expect_close().times(1).return_const(());

    let mut view = ConsoleView::new(&ViewConfig::default());
    view.add_subscription(Box::new(handle));
    view.sync(&store);
    let before = view.state().clone();

    view.teardown();
    view.teardown();
    assert!(view.is_closed());

    let evt = WatchEvent::Upsert(test_service_with_labels("late", &[("app", "late")]));
    assert!(!apply(&mut store, &mut [&mut view], ResourceKind::Services, evt));
    assert!(!view.set_selector(&store, LabelSelector::from_pairs([("app", "db")])));
    assert_eq!(view.state(), &before);
    assert!(!view.suggestions()["app"].contains("late"));
}
