use std::collections::BTreeMap;
use std::sync::Arc;

use ocv_core::jsonutils::{
    lookup_array,
    lookup_str,
};
use ocv_core::prelude::*;
use serde_json as json;

use crate::collection::Collection;

const TRIGGERS_POINTERS: &[&str] = &["/spec/triggers", "/triggers"];
const BUILD_OUTPUT_POINTERS: &[&str] = &["/spec/output/to/name", "/parameters/output/to/name"];
const TRIGGER_IMAGE_POINTER: &str = "/imageChangeParams/from/name";

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TriggerType {
    ImageChange,
    ConfigChange,
    Other(String),
}

impl From<&str> for TriggerType {
    fn from(s: &str) -> TriggerType {
        match s {
            IMAGE_CHANGE_TRIGGER_TYPE => TriggerType::ImageChange,
            CONFIG_CHANGE_TRIGGER_TYPE => TriggerType::ConfigChange,
            other => TriggerType::Other(other.into()),
        }
    }
}

// A DeploymentConfig trigger together with the builds that produce the image it's watching.  The
// `builds` collection only ever contains builds that are currently in the store and whose output
// image is exactly the trigger's source image; it's always empty for non-ImageChange triggers.
#[derive(Clone, Debug, PartialEq)]
pub struct LinkedTrigger {
    pub trigger_type: TriggerType,
    pub image: Option<String>,
    pub builds: Collection,
}

impl LinkedTrigger {
    fn from_json(trigger: &json::Value) -> LinkedTrigger {
        let trigger_type: TriggerType = trigger.get("type").and_then(|t| t.as_str()).unwrap_or_default().into();
        let image = match trigger_type {
            TriggerType::ImageChange => trigger.pointer(TRIGGER_IMAGE_POINTER).and_then(|v| v.as_str()).map(String::from),
            _ => None,
        };
        LinkedTrigger { trigger_type, image, builds: Collection::new() }
    }

    pub fn accepts(&self, build: &DynamicObject) -> bool {
        self.trigger_type == TriggerType::ImageChange
            && self.image.is_some()
            && self.image.as_deref() == build_output_image(build)
    }

    // Insert the build if it matches, and remove it if it doesn't; so calling this again for a
    // build whose output changed moves it to the right trigger.  Returns true if `builds` changed.
    fn link(&mut self, name: &str, build: &Arc<DynamicObject>) -> bool {
        if self.accepts(build) {
            self.builds.insert(name.into(), build.clone()).as_ref() != Some(build)
        } else {
            self.builds.remove(name).is_some()
        }
    }
}

// DeploymentConfig name -> its triggers, in the order they're declared
pub type TriggerIndex = BTreeMap<String, Vec<LinkedTrigger>>;

pub fn parse_triggers(dc: &DynamicObject) -> Vec<LinkedTrigger> {
    lookup_array(&dc.data, TRIGGERS_POINTERS).iter().map(LinkedTrigger::from_json).collect()
}

pub fn build_output_image(build: &DynamicObject) -> Option<&str> {
    lookup_str(&build.data, BUILD_OUTPUT_POINTERS)
}

// Rebuild a single DeploymentConfig's triggers from scratch against every known build
pub fn link_triggers(dc: &DynamicObject, builds: &Collection) -> Vec<LinkedTrigger> {
    let mut triggers = parse_triggers(dc);
    for trigger in triggers.iter_mut().filter(|t| t.trigger_type == TriggerType::ImageChange) {
        for (name, build) in builds {
            trigger.link(name, build);
        }
    }
    triggers
}

pub fn link_all(dcs: &Collection, builds: &Collection) -> TriggerIndex {
    dcs.iter().map(|(name, dc)| (name.clone(), link_triggers(dc, builds))).collect()
}

pub fn link_build(index: &mut TriggerIndex, name: &str, build: &Arc<DynamicObject>) -> bool {
    let mut changed = false;
    for trigger in index.values_mut().flatten() {
        changed |= trigger.link(name, build);
    }
    changed
}

pub fn unlink_build(index: &mut TriggerIndex, name: &str) -> bool {
    let mut changed = false;
    for trigger in index.values_mut().flatten() {
        changed |= trigger.builds.remove(name).is_some();
    }
    changed
}
