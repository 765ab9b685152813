use ocv_core::prelude::*;
use rstest::fixture;
use serde_json::json;

use crate::constants::*;

fn new_obj(kind: ResourceKind, name: &str) -> DynamicObject {
    let obj = DynamicObject::new(name, &kind.api_resource());
    if kind.namespaced() { obj.within(TEST_NAMESPACE) } else { obj }
}

fn with_labels(mut obj: DynamicObject, labels: &[(&str, &str)]) -> DynamicObject {
    obj.labels_mut()
        .extend(labels.iter().map(|(k, v)| (k.to_string(), v.to_string())));
    obj
}

// A deployment config with a config-change trigger and an image-change trigger watching `image`
#[fixture]
pub fn test_deployment_config(
    #[default(TEST_DEPLOYMENT_CONFIG)] name: &str,
    #[default(TEST_OUTPUT_IMAGE)] image: &str,
) -> DynamicObject {
    new_obj(ResourceKind::DeploymentConfigs, name).data(json!({
        "spec": {
            "replicas": 1,
            "triggers": [
                {"type": "ConfigChange"},
                {
                    "type": "ImageChange",
                    "imageChangeParams": {
                        "automatic": true,
                        "containerNames": ["app"],
                        "from": {"kind": "ImageStreamTag", "name": image},
                    },
                },
            ],
        },
    }))
}

#[fixture]
pub fn test_build(#[default(TEST_BUILD)] name: &str, #[default(TEST_OUTPUT_IMAGE)] output: &str) -> DynamicObject {
    new_obj(ResourceKind::Builds, name).data(json!({
        "spec": {
            "strategy": {"type": "Source"},
            "output": {"to": {"kind": "ImageStreamTag", "name": output}},
        },
        "status": {"phase": "Complete"},
    }))
}

pub fn test_pod(name: &str, labels: &[(&str, &str)]) -> DynamicObject {
    let pod = new_obj(ResourceKind::Pods, name).data(json!({
        "spec": {"containers": [{"name": "app", "image": TEST_DOCKER_REF}]},
        "status": {"phase": "Running"},
    }));
    with_labels(pod, labels)
}

pub fn test_service(name: &str, selector: &[(&str, &str)]) -> DynamicObject {
    let selector: serde_json::Map<_, _> = selector.iter().map(|(k, v)| (k.to_string(), json!(v))).collect();
    new_obj(ResourceKind::Services, name).data(json!({
        "spec": {
            "selector": selector,
            "ports": [{"port": 8080, "protocol": "TCP"}],
        },
    }))
}

// A replication controller rolled out by `dc`, running `image` (the usual "deployment" object)
#[fixture]
pub fn test_deployment(
    #[default(TEST_DEPLOYMENT)] name: &str,
    #[default(TEST_DEPLOYMENT_CONFIG)] dc: &str,
    #[default(TEST_DOCKER_REF)] image: &str,
) -> DynamicObject {
    let mut depl = new_obj(ResourceKind::Deployments, name).data(json!({
        "spec": {
            "replicas": 1,
            "template": {
                "metadata": {"labels": {"deploymentconfig": dc}},
                "spec": {"containers": [{"name": "app", "image": image}]},
            },
        },
    }));
    depl.annotations_mut().insert(DEPLOYMENT_CONFIG_ANNOTATION_KEY.into(), dc.into());
    depl
}

pub fn test_deployment_with_labels(name: &str, labels: &[(&str, &str)]) -> DynamicObject {
    with_labels(test_deployment(name, TEST_DEPLOYMENT_CONFIG, TEST_DOCKER_REF), labels)
}

pub fn test_service_with_labels(name: &str, labels: &[(&str, &str)]) -> DynamicObject {
    with_labels(test_service(name, &[]), labels)
}

#[fixture]
pub fn test_image_stream(
    #[default(TEST_IMAGE_STREAM)] name: &str,
    #[default(TEST_DOCKER_REF)] docker_ref: &str,
    #[default(TEST_IMAGE)] image: &str,
) -> DynamicObject {
    new_obj(ResourceKind::ImageStreams, name).data(json!({
        "spec": {},
        "status": {
            "dockerImageRepository": format!("172.30.17.3:5001/{TEST_NAMESPACE}/{name}"),
            "tags": [{
                "tag": TEST_IMAGE_TAG,
                "items": [{
                    "created": "2015-04-14T18:20:12Z",
                    "dockerImageReference": docker_ref,
                    "image": image,
                }],
            }],
        },
    }))
}

#[fixture]
pub fn test_image(#[default(TEST_IMAGE)] name: &str, #[default(TEST_DOCKER_REF)] docker_ref: &str) -> DynamicObject {
    new_obj(ResourceKind::Images, name).data(json!({
        "dockerImageReference": docker_ref,
        "dockerImageMetadata": {"Architecture": "amd64"},
    }))
}
