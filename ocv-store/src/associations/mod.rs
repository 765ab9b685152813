mod deployments;
mod images;
mod services;
mod triggers;

pub use deployments::*;
pub use images::*;
pub use services::*;
pub use triggers::*;

use ocv_core::prelude::*;
use tracing::*;

use crate::collection::CollectionStore;
use crate::config::AnnotationConfig;
use crate::event::StoreChange;
use crate::projection::GroupedIndex;

// The AssociationEngine owns every derived cross-collection index.  Each store change is routed
// to the recomputation for that kind and event shape, so (for example) a single build update only
// touches the trigger lists and not the rest of the indices.  Everything in here can be thrown away
// and recomputed from the store with `rebuild`.
#[derive(Clone, Debug, Default)]
pub struct AssociationEngine {
    annotations: AnnotationConfig,

    triggers: TriggerIndex,
    pods_by_label: GroupedIndex,
    pods_by_service: PodsByService,
    deployments_by_config: GroupedIndex,
    encoded_configs: EncodedConfigs,
    pod_templates: PodTemplates,
    image_stream_refs: ImageRefsByDockerReference,
    images_by_docker_reference: GroupedIndex,
    resolved_images: ResolvedImages,
}

impl AssociationEngine {
    pub fn new(annotations: AnnotationConfig) -> AssociationEngine {
        AssociationEngine { annotations, ..Default::default() }
    }

    pub fn rebuild(&mut self, store: &CollectionStore) {
        for kind in ResourceKind::ALL {
            self.handle(store, kind, &StoreChange::Snapshot);
        }
    }

    // Returns true if any derived index actually changed; re-delivering the same contents (e.g.,
    // a polled snapshot that nothing happened to) is not a change.
    pub fn handle(&mut self, store: &CollectionStore, kind: ResourceKind, change: &StoreChange) -> bool {
        match change.action() {
            Some(action) => {
                debug!("recomputing associations for {kind}: {action} {}", change.name().unwrap_or_default())
            },
            None => debug!("recomputing associations for {kind} snapshot"),
        }

        match kind {
            ResourceKind::DeploymentConfigs => self.handle_deployment_config(store, change),
            ResourceKind::Builds => self.handle_build(store, change),
            ResourceKind::Deployments => self.handle_deployment(store, change),
            ResourceKind::Pods | ResourceKind::Services => self.relink_pods(store),
            ResourceKind::ImageStreams => {
                let refs = image_stream_refs(store.get(ResourceKind::ImageStreams));
                replace(&mut self.image_stream_refs, refs) | self.resolve(store)
            },
            ResourceKind::Images => {
                let index = images_by_docker_reference(store.get(ResourceKind::Images));
                replace(&mut self.images_by_docker_reference, index) | self.resolve(store)
            },
        }
    }

    fn handle_deployment_config(&mut self, store: &CollectionStore, change: &StoreChange) -> bool {
        let builds = store.get(ResourceKind::Builds);
        match change {
            StoreChange::Snapshot => {
                let triggers = link_all(store.get(ResourceKind::DeploymentConfigs), builds);
                replace(&mut self.triggers, triggers)
            },
            StoreChange::Upsert { name, .. } => match store.get_obj(ResourceKind::DeploymentConfigs, name) {
                Some(dc) => {
                    let linked = link_triggers(dc, builds);
                    let changed = self.triggers.get(name) != Some(&linked);
                    self.triggers.insert(name.clone(), linked);
                    changed
                },
                None => self.triggers.remove(name).is_some(),
            },
            StoreChange::Delete { name } => self.triggers.remove(name).is_some(),
        }
    }

    fn handle_build(&mut self, store: &CollectionStore, change: &StoreChange) -> bool {
        match change {
            StoreChange::Snapshot => {
                let triggers = link_all(store.get(ResourceKind::DeploymentConfigs), store.get(ResourceKind::Builds));
                replace(&mut self.triggers, triggers)
            },
            StoreChange::Upsert { name, .. } => match store.get_obj(ResourceKind::Builds, name) {
                Some(build) => link_build(&mut self.triggers, name, build),
                None => unlink_build(&mut self.triggers, name),
            },
            StoreChange::Delete { name } => unlink_build(&mut self.triggers, name),
        }
    }

    fn handle_deployment(&mut self, store: &CollectionStore, change: &StoreChange) -> bool {
        let deployments = store.get(ResourceKind::Deployments);
        let mut changed = replace(
            &mut self.deployments_by_config,
            deployments_by_config(deployments, &self.annotations.deployment_config),
        );
        changed |= replace(&mut self.pod_templates, pod_templates(deployments));

        changed |= match change {
            StoreChange::Snapshot => {
                let configs = deployments
                    .keys()
                    .filter_map(|name| Some((name.clone(), self.encoded_config_from_store(store, name)?)))
                    .collect();
                replace(&mut self.encoded_configs, configs)
            },
            StoreChange::Upsert { name, .. } => {
                let config = self.encoded_config_from_store(store, name);
                let prev = match config.clone() {
                    Some(c) => self.encoded_configs.insert(name.clone(), c),
                    None => self.encoded_configs.remove(name),
                };
                prev != config
            },
            StoreChange::Delete { name } => self.encoded_configs.remove(name).is_some(),
        };
        self.resolve(store) | changed
    }

    fn encoded_config_from_store(&self, store: &CollectionStore, name: &str) -> Option<serde_json::Value> {
        let deployment = store.get_obj(ResourceKind::Deployments, name)?;
        match parse_encoded_config(deployment, &self.annotations.encoded_deployment_config) {
            Ok(config) => config,
            Err(err) => {
                warn!("failed to parse encoded deployment config, ignoring: {err:#}");
                None
            },
        }
    }

    fn relink_pods(&mut self, store: &CollectionStore) -> bool {
        let by_label = pods_by_label(store.get(ResourceKind::Pods));
        let by_service = pods_by_service(store.get(ResourceKind::Services), &by_label);
        replace(&mut self.pods_by_label, by_label) | replace(&mut self.pods_by_service, by_service)
    }

    fn resolve(&mut self, store: &CollectionStore) -> bool {
        let resolved = resolve_images(&self.pod_templates, &self.image_stream_refs, store.get(ResourceKind::Images));
        replace(&mut self.resolved_images, resolved)
    }

    pub fn triggers(&self) -> &TriggerIndex {
        &self.triggers
    }

    pub fn triggers_for(&self, dc_name: &str) -> &[LinkedTrigger] {
        self.triggers.get(dc_name).map(|t| t.as_slice()).unwrap_or_default()
    }

    pub fn pods_by_label(&self) -> &GroupedIndex {
        &self.pods_by_label
    }

    pub fn pods_by_service(&self) -> &PodsByService {
        &self.pods_by_service
    }

    pub fn deployments_by_config(&self) -> &GroupedIndex {
        &self.deployments_by_config
    }

    pub fn encoded_config(&self, deployment_name: &str) -> Option<&serde_json::Value> {
        self.encoded_configs.get(deployment_name)
    }

    pub fn pod_templates(&self) -> &PodTemplates {
        &self.pod_templates
    }

    pub fn image_stream_refs(&self) -> &ImageRefsByDockerReference {
        &self.image_stream_refs
    }

    pub fn images_by_docker_reference(&self) -> &GroupedIndex {
        &self.images_by_docker_reference
    }

    pub fn resolved_images(&self) -> &ResolvedImages {
        &self.resolved_images
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}
