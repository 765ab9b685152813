use std::collections::BTreeMap;

use ocv_core::prelude::*;

use crate::collection::Collection;
use crate::projection::{
    GroupedIndex,
    Projection,
    project,
};

// service name -> the pods that the service selects
pub type PodsByService = BTreeMap<String, Collection>;

pub fn pods_by_label(pods: &Collection) -> GroupedIndex {
    project(pods, &Projection::Labels, None)
}

pub fn service_selector(svc: &DynamicObject) -> BTreeMap<String, String> {
    let Some(selector) = svc.data.pointer("/spec/selector").and_then(|s| s.as_object()) else {
        return BTreeMap::new();
    };

    selector
        .iter()
        .filter_map(|(k, v)| Some((k.clone(), v.as_str()?.to_string())))
        .collect()
}

// A pod belongs to the service iff it shows up under *every* key/value pair in the selector.  A
// service with no selector doesn't select any pods (its endpoints are managed some other way).
pub fn pods_for_selector(selector: &BTreeMap<String, String>, pods_by_label: &GroupedIndex) -> Collection {
    let mut pairs = selector.iter();
    let Some((k, v)) = pairs.next() else {
        return Collection::new();
    };

    let mut matched = pods_by_label.get(&[k.as_str(), v.as_str()]).cloned().unwrap_or_default();
    for (k, v) in pairs {
        let Some(candidates) = pods_by_label.get(&[k.as_str(), v.as_str()]) else {
            return Collection::new();
        };
        matched.retain(|name, _| candidates.contains_key(name));
    }
    matched
}

pub fn pods_by_service(services: &Collection, pods_by_label: &GroupedIndex) -> PodsByService {
    services
        .iter()
        .map(|(name, svc)| (name.clone(), pods_for_selector(&service_selector(svc), pods_by_label)))
        .collect()
}
