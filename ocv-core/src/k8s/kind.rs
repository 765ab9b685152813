use std::fmt;

use kube::api::ApiResource;
use kube::core::GroupVersionKind;
use serde::{
    Deserialize,
    Serialize,
};

// The seven collections the console keeps in sync.  The serialized names are the names that the
// console's data layer has always used for these watches (note that "deployments" are really
// replication controllers, since that's what a DeploymentConfig rolls out).
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum ResourceKind {
    #[serde(rename = "replicationcontrollers")]
    Deployments,
    #[serde(rename = "deploymentConfigs")]
    DeploymentConfigs,
    #[serde(rename = "builds")]
    Builds,
    #[serde(rename = "pods")]
    Pods,
    #[serde(rename = "services")]
    Services,
    #[serde(rename = "images")]
    Images,
    #[serde(rename = "imageStreams")]
    ImageStreams,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 7] = [
        ResourceKind::Deployments,
        ResourceKind::DeploymentConfigs,
        ResourceKind::Builds,
        ResourceKind::Pods,
        ResourceKind::Services,
        ResourceKind::Images,
        ResourceKind::ImageStreams,
    ];

    // Only these kinds are subject to the user's label filter
    pub const FILTERABLE: [ResourceKind; 2] = [ResourceKind::Deployments, ResourceKind::Services];

    pub fn gvk(&self) -> GroupVersionKind {
        let (group, version, kind) = match self {
            ResourceKind::Deployments => ("", "v1", "ReplicationController"),
            ResourceKind::DeploymentConfigs => ("apps.openshift.io", "v1", "DeploymentConfig"),
            ResourceKind::Builds => ("build.openshift.io", "v1", "Build"),
            ResourceKind::Pods => ("", "v1", "Pod"),
            ResourceKind::Services => ("", "v1", "Service"),
            ResourceKind::Images => ("image.openshift.io", "v1", "Image"),
            ResourceKind::ImageStreams => ("image.openshift.io", "v1", "ImageStream"),
        };
        GroupVersionKind::gvk(group, version, kind)
    }

    pub fn plural(&self) -> &'static str {
        match self {
            ResourceKind::Deployments => "replicationcontrollers",
            ResourceKind::DeploymentConfigs => "deploymentconfigs",
            ResourceKind::Builds => "builds",
            ResourceKind::Pods => "pods",
            ResourceKind::Services => "services",
            ResourceKind::Images => "images",
            ResourceKind::ImageStreams => "imagestreams",
        }
    }

    // We know all of these types statically, so there's no need to go through discovery to get
    // the ApiResource for them.
    pub fn api_resource(&self) -> ApiResource {
        ApiResource::from_gvk_with_plural(&self.gvk(), self.plural())
    }

    // Images are the only cluster-scoped resource that we watch
    pub fn namespaced(&self) -> bool {
        !matches!(self, ResourceKind::Images)
    }

    pub fn is_filterable(&self) -> bool {
        ResourceKind::FILTERABLE.contains(self)
    }

    // Human-readable plural, used in the messages shown to the user
    pub fn display_plural(&self) -> &'static str {
        match self {
            ResourceKind::Deployments => "deployments",
            ResourceKind::DeploymentConfigs => "deployment configs",
            ResourceKind::Builds => "builds",
            ResourceKind::Pods => "pods",
            ResourceKind::Services => "services",
            ResourceKind::Images => "images",
            ResourceKind::ImageStreams => "image streams",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let gvk = self.gvk();
        if gvk.group.is_empty() {
            write!(f, "{}.{}", gvk.version, gvk.kind)
        } else {
            write!(f, "{}/{}.{}", gvk.group, gvk.version, gvk.kind)
        }
    }
}
