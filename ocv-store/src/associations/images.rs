use std::collections::BTreeMap;
use std::sync::Arc;

use ocv_core::jsonutils::{
    lookup_array,
    lookup_str,
};
use ocv_core::prelude::*;
use serde_json as json;

use super::deployments::PodTemplates;
use crate::collection::Collection;
use crate::projection::{
    GroupedIndex,
    Projection,
    project,
};

// Where a docker image reference came from: the image stream, the tag within that stream, and the
// name of the Image object that the tag pointed at.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ImageStreamImageRef {
    pub image_stream: String,
    pub tag: String,
    pub image: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedImage {
    pub docker_image_reference: String,
    pub image_stream_ref: ImageStreamImageRef,
    pub image: Option<Arc<DynamicObject>>,
}

pub type ImageRefsByDockerReference = BTreeMap<String, ImageStreamImageRef>;
pub type ResolvedImages = BTreeMap<String, ResolvedImage>;

// Walk the tag history of every image stream.  History items are newest-first, and if the same
// reference shows up more than once (e.g., two tags pointing at the same image) the first one we
// see wins.
pub fn image_stream_refs(image_streams: &Collection) -> ImageRefsByDockerReference {
    let mut refs = ImageRefsByDockerReference::new();
    for (is_name, is) in image_streams {
        for tag in lookup_array(&is.data, &["/status/tags"]) {
            let Some(tag_name) = lookup_str(tag, &["/tag"]) else { continue };
            for item in lookup_array(tag, &["/items"]) {
                let (Some(docker_ref), Some(image)) =
                    (lookup_str(item, &["/dockerImageReference"]), lookup_str(item, &["/image"]))
                else {
                    continue;
                };
                refs.entry(docker_ref.into()).or_insert_with(|| ImageStreamImageRef {
                    image_stream: is_name.clone(),
                    tag: tag_name.into(),
                    image: image.into(),
                });
            }
        }
    }
    refs
}

pub fn images_by_docker_reference(images: &Collection) -> GroupedIndex {
    project(images, &Projection::Field("/dockerImageReference".into()), None)
}

pub fn container_images(template: &json::Value) -> impl Iterator<Item = &str> {
    lookup_array(template, &["/spec/containers"])
        .iter()
        .filter_map(|c| c.get("image")?.as_str())
}

pub fn resolve_images(
    pod_templates: &PodTemplates,
    refs: &ImageRefsByDockerReference,
    images: &Collection,
) -> ResolvedImages {
    let mut resolved = ResolvedImages::new();
    for image_ref in pod_templates.values().flat_map(container_images) {
        let Some(is_ref) = refs.get(image_ref) else { continue };
        resolved.entry(image_ref.into()).or_insert_with(|| ResolvedImage {
            docker_image_reference: image_ref.into(),
            image_stream_ref: is_ref.clone(),
            image: images.get(&is_ref.image).cloned(),
        });
    }
    resolved
}
