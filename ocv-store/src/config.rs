use std::collections::BTreeMap;
use std::fs::File;
use std::time::Duration;

use ocv_core::prelude::*;
use serde::{
    Deserialize,
    Serialize,
};

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchOptions {
    // If set, the collection is re-listed on this interval instead of being watched
    #[serde(default, skip_serializing_if = "Option::is_none", with = "humantime_opt")]
    pub poll_interval: Option<Duration>,
}

impl WatchOptions {
    pub fn poll(interval: Duration) -> WatchOptions {
        WatchOptions { poll_interval: Some(interval) }
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnnotationConfig {
    pub deployment_config: String,
    pub encoded_deployment_config: String,
}

impl Default for AnnotationConfig {
    fn default() -> AnnotationConfig {
        AnnotationConfig {
            deployment_config: DEPLOYMENT_CONFIG_ANNOTATION_KEY.into(),
            encoded_deployment_config: ENCODED_DEPLOYMENT_CONFIG_ANNOTATION_KEY.into(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewConfig {
    pub namespace: String,
    pub watches: BTreeMap<ResourceKind, WatchOptions>,
    pub annotations: AnnotationConfig,
    pub label_selector: LabelSelector,
}

impl Default for ViewConfig {
    fn default() -> ViewConfig {
        let watches = ResourceKind::ALL
            .into_iter()
            .map(|kind| match kind {
                ResourceKind::Pods => (kind, WatchOptions::poll(DEFAULT_POD_POLL_INTERVAL)),
                _ => (kind, WatchOptions::default()),
            })
            .collect();

        ViewConfig {
            namespace: DEFAULT_NAMESPACE.into(),
            watches,
            annotations: AnnotationConfig::default(),
            label_selector: LabelSelector::everything(),
        }
    }
}

impl ViewConfig {
    pub fn load(filename: &str) -> anyhow::Result<ViewConfig> {
        Ok(serde_yaml::from_reader(File::open(filename)?)?)
    }
}

mod humantime_opt {
    use std::time::Duration;

    use serde::{
        Deserialize,
        Deserializer,
        Serializer,
        de,
    };

    pub fn serialize<S: Serializer>(d: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error> {
        match d {
            Some(d) => serializer.collect_str(&humantime::format_duration(*d)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Duration>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|s| humantime::parse_duration(&s).map_err(de::Error::custom))
            .transpose()
    }
}
