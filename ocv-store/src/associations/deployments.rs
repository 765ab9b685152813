use std::collections::BTreeMap;

use anyhow::Context;
use ocv_core::prelude::*;
use serde_json as json;

use crate::collection::Collection;
use crate::projection::{
    GroupedIndex,
    Projection,
    project,
};

// deployment name -> the deployment config that was serialized into its annotations
pub type EncodedConfigs = BTreeMap<String, json::Value>;

// deployment name -> the deployment's pod template (`spec.template`)
pub type PodTemplates = BTreeMap<String, json::Value>;

// Returns Ok(None) if the deployment doesn't carry the annotation at all; a present-but-malformed
// annotation is an error, which the caller is expected to log and move on from.
pub fn parse_encoded_config(deployment: &DynamicObject, annotation_key: &str) -> anyhow::Result<Option<json::Value>> {
    let Some(raw) = deployment.annotations().get(annotation_key) else {
        return Ok(None);
    };

    let config: json::Value = json::from_str(raw)
        .with_context(|| format!("malformed {annotation_key} annotation on {}", deployment.namespaced_name()))?;
    Ok(Some(config))
}

pub fn deployments_by_config(deployments: &Collection, annotation_key: &str) -> GroupedIndex {
    project(deployments, &Projection::Annotation(annotation_key.into()), None)
}

pub fn pod_templates(deployments: &Collection) -> PodTemplates {
    deployments
        .iter()
        .filter_map(|(name, d)| Some((name.clone(), d.data.pointer("/spec/template")?.clone())))
        .collect()
}
