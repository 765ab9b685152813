use assertables::*;
use ocv_testutils::*;
use serde_json::json;

use super::*;
use crate::associations::*;

const OTHER_IMAGE: &str = "other-stream:latest";

fn linked_builds(triggers: &[LinkedTrigger]) -> Vec<&str> {
    triggers.iter().flat_map(|t| t.builds.keys().map(|k| k.as_str())).collect()
}

#[rstest]
fn test_parse_triggers() {
    let triggers = parse_triggers(&test_deployment_config(TEST_DEPLOYMENT_CONFIG, TEST_OUTPUT_IMAGE));
    assert_eq!(triggers.len(), 2);
    assert_eq!(triggers[0].trigger_type, TriggerType::ConfigChange);
    assert!(triggers[0].image.is_none());
    assert_eq!(triggers[1].trigger_type, TriggerType::ImageChange);
    assert_eq!(triggers[1].image.as_deref(), Some(TEST_OUTPUT_IMAGE));
}

#[rstest]
fn test_parse_legacy_fields() {
    let mut dc = test_deployment_config(TEST_DEPLOYMENT_CONFIG, TEST_OUTPUT_IMAGE);
    dc.data = json!({"triggers": [
        {"type": "ImageChange", "imageChangeParams": {"from": {"name": "legacy:latest"}}},
        {"type": "Generic"},
    ]});
    let triggers = parse_triggers(&dc);
    assert_eq!(triggers[0].image.as_deref(), Some("legacy:latest"));
    assert_eq!(triggers[1].trigger_type, TriggerType::Other("Generic".into()));

    let mut build = test_build(TEST_BUILD, TEST_OUTPUT_IMAGE);
    build.data = json!({"parameters": {"output": {"to": {"name": "legacy:latest"}}}});
    assert_eq!(build_output_image(&build), Some("legacy:latest"));

    let linked = link_triggers(&dc, &collection([build]));
    assert_eq!(linked_builds(&linked), vec![TEST_BUILD]);
}

#[rstest]
fn test_dc_without_triggers() {
    let mut dc = test_deployment_config(TEST_DEPLOYMENT_CONFIG, TEST_OUTPUT_IMAGE);
    dc.data = json!({"spec": {"replicas": 1}});
    assert_is_empty!(link_triggers(&dc, &collection([test_build(TEST_BUILD, TEST_OUTPUT_IMAGE)])));
}

#[rstest]
fn test_link_only_matching_builds() {
    let dc = test_deployment_config(TEST_DEPLOYMENT_CONFIG, TEST_OUTPUT_IMAGE);
    let builds = collection([
        test_build("b1", TEST_OUTPUT_IMAGE),
        test_build("b2", OTHER_IMAGE),
        test_build("b3", TEST_OUTPUT_IMAGE),
    ]);

    let triggers = link_triggers(&dc, &builds);
    assert_is_empty!(&triggers[0].builds);
    assert_eq!(names(&triggers[1].builds), vec!["b1", "b3"]);
}

#[rstest]
fn test_link_is_idempotent() {
    let dcs = collection([test_deployment_config("dc1", TEST_OUTPUT_IMAGE), test_deployment_config("dc2", OTHER_IMAGE)]);
    let builds = collection([test_build("b1", TEST_OUTPUT_IMAGE), test_build("b2", OTHER_IMAGE)]);

    let mut index = link_all(&dcs, &builds);
    let first = index.clone();
    for (name, build) in &builds {
        assert!(!link_build(&mut index, name, build));
    }
    assert_eq!(index, first);
    assert_eq!(link_all(&dcs, &builds), first);
}

#[rstest]
fn test_build_delete_prunes_every_trigger() {
    let mut store = store_with([
        (
            ResourceKind::DeploymentConfigs,
            vec![test_deployment_config("dc1", TEST_OUTPUT_IMAGE), test_deployment_config("dc2", TEST_OUTPUT_IMAGE)],
        ),
        (ResourceKind::Builds, vec![test_build("b1", TEST_OUTPUT_IMAGE), test_build("b2", TEST_OUTPUT_IMAGE)]),
    ]);
    let mut engine = AssociationEngine::default();
    engine.rebuild(&store);
    assert_eq!(linked_builds(engine.triggers_for("dc1")), vec!["b1", "b2"]);

    let change = store.apply(ResourceKind::Builds, WatchEvent::Delete("b1".into())).unwrap();
    assert!(engine.handle(&store, ResourceKind::Builds, &change));

    assert_eq!(linked_builds(engine.triggers_for("dc1")), vec!["b2"]);
    assert_eq!(linked_builds(engine.triggers_for("dc2")), vec!["b2"]);

    // Deleting it again has nothing left to prune
    assert!(!engine.handle(&store, ResourceKind::Builds, &change));
}

#[rstest]
#[case::dcs_first([ResourceKind::DeploymentConfigs, ResourceKind::Builds])]
#[case::builds_first([ResourceKind::Builds, ResourceKind::DeploymentConfigs])]
fn test_snapshot_order_independence(#[case] order: [ResourceKind; 2]) {
    let dcs = vec![test_deployment_config("dc1", TEST_OUTPUT_IMAGE), test_deployment_config("dc2", OTHER_IMAGE)];
    let builds = vec![
        test_build("b1", TEST_OUTPUT_IMAGE),
        test_build("b2", OTHER_IMAGE),
        test_build("b3", TEST_OUTPUT_IMAGE),
    ];

    let mut store = CollectionStore::new();
    let mut engine = AssociationEngine::default();
    for kind in order {
        let objs = match kind {
            ResourceKind::DeploymentConfigs => dcs.clone(),
            _ => builds.clone(),
        };
        let change = store.apply(kind, WatchEvent::Snapshot(objs)).unwrap();
        engine.handle(&store, kind, &change);
    }

    let expected = link_all(&collection(dcs), &collection(builds));
    assert_eq!(engine.triggers(), &expected);
    assert_eq!(linked_builds(engine.triggers_for("dc1")), vec!["b1", "b3"]);
    assert_eq!(linked_builds(engine.triggers_for("dc2")), vec!["b2"]);
}

#[rstest]
fn test_incremental_build_and_dc_events() {
    let mut store = store_with([
        (ResourceKind::DeploymentConfigs, vec![test_deployment_config("dc1", TEST_OUTPUT_IMAGE)]),
        (ResourceKind::Builds, vec![]),
    ]);
    let mut engine = AssociationEngine::default();
    engine.rebuild(&store);

    // A new build is linked against the existing trigger
    let change = store.apply(ResourceKind::Builds, WatchEvent::Upsert(test_build("b1", TEST_OUTPUT_IMAGE))).unwrap();
    engine.handle(&store, ResourceKind::Builds, &change);
    assert_eq!(linked_builds(engine.triggers_for("dc1")), vec!["b1"]);

    // If its output changes it moves off of the trigger
    let change = store.apply(ResourceKind::Builds, WatchEvent::Upsert(test_build("b1", OTHER_IMAGE))).unwrap();
    engine.handle(&store, ResourceKind::Builds, &change);
    assert_is_empty!(linked_builds(engine.triggers_for("dc1")));

    // A new DC picks up the builds that already exist
    let change = store
        .apply(ResourceKind::DeploymentConfigs, WatchEvent::Upsert(test_deployment_config("dc2", OTHER_IMAGE)))
        .unwrap();
    engine.handle(&store, ResourceKind::DeploymentConfigs, &change);
    assert_eq!(linked_builds(engine.triggers_for("dc2")), vec!["b1"]);

    // A deleted DC has no triggers left
    let change = store.apply(ResourceKind::DeploymentConfigs, WatchEvent::Delete("dc2".into())).unwrap();
    engine.handle(&store, ResourceKind::DeploymentConfigs, &change);
    assert_is_empty!(engine.triggers_for("dc2"));
    assert_eq!(engine.triggers().len(), 1);
}

#[rstest]
fn test_linked_builds_track_replacements() {
    let mut store = store_with([
        (ResourceKind::DeploymentConfigs, vec![test_deployment_config("dc1", TEST_OUTPUT_IMAGE)]),
        (ResourceKind::Builds, vec![test_build("b1", TEST_OUTPUT_IMAGE)]),
    ]);
    let mut engine = AssociationEngine::default();
    engine.rebuild(&store);

    let mut running = test_build("b1", TEST_OUTPUT_IMAGE);
    running.data["status"]["phase"] = json!("Running");
    let change = store.apply(ResourceKind::Builds, WatchEvent::Upsert(running)).unwrap();
    engine.handle(&store, ResourceKind::Builds, &change);

    let linked = &engine.triggers_for("dc1")[1].builds["b1"];
    assert_eq!(linked.data["status"]["phase"], "Running");
}
