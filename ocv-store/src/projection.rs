use std::collections::{
    BTreeMap,
    BTreeSet,
};

use ocv_core::jsonutils::render_scalar;
use ocv_core::prelude::*;

use crate::collection::Collection;

// A Projection says how to compute the grouping key(s) for an object.  Most projections yield
// zero or one key per object (zero when the field is missing, in which case the object just
// doesn't show up in the index); `Labels` yields one two-part key per label, which is how we build
// label-key -> label-value indices.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Projection {
    Name,
    Namespace,
    Label(String),
    Labels,
    Annotation(String),
    // JSON pointer into the kind-specific part of the object, e.g. "/dockerImageReference"
    Field(String),
}

impl Projection {
    pub fn keys(&self, obj: &DynamicObject) -> Vec<Vec<String>> {
        let single = |v: Option<String>| v.map(|v| vec![vec![v]]).unwrap_or_default();
        match self {
            Projection::Name => single(obj.metadata.name.clone()),
            Projection::Namespace => single(obj.metadata.namespace.clone()),
            Projection::Label(key) => single(obj.labels().get(key).cloned()),
            Projection::Labels => obj.labels().iter().map(|(k, v)| vec![k.clone(), v.clone()]).collect(),
            Projection::Annotation(key) => single(obj.annotations().get(key).cloned()),
            Projection::Field(pointer) => single(obj.data.pointer(pointer).and_then(render_scalar)),
        }
    }
}

// A GroupedIndex maps a key path to the collection of objects that live at that path, e.g. for a
// label index, ["app", "frontend"] -> {pod names -> pods}.  The paths are stored flattened, which
// makes both lookups and equality checks trivial.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GroupedIndex {
    groups: BTreeMap<Vec<String>, Collection>,
}

impl GroupedIndex {
    pub fn get(&self, path: &[&str]) -> Option<&Collection> {
        let key: Vec<String> = path.iter().map(|s| s.to_string()).collect();
        self.groups.get(&key)
    }

    // Return the distinct path components directly underneath `prefix`; e.g., for a label index,
    // children(&[]) is the set of label keys and children(&["app"]) the set of values for "app".
    pub fn children(&self, prefix: &[&str]) -> BTreeSet<&str> {
        self.groups
            .keys()
            .filter(|path| path.len() > prefix.len() && path.iter().zip(prefix).all(|(a, b)| a == b))
            .map(|path| path[prefix.len()].as_str())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }
}

// Group a collection by the primary projection (and then by the secondary one, if given); the
// leaves are always keyed by object name.  This is a pure function of its inputs.
pub fn project(collection: &Collection, primary: &Projection, secondary: Option<&Projection>) -> GroupedIndex {
    let mut groups: BTreeMap<Vec<String>, Collection> = BTreeMap::new();
    for (name, obj) in collection {
        let secondary_keys = match secondary {
            Some(p) => p.keys(obj),
            None => vec![vec![]],
        };

        for pk in primary.keys(obj) {
            for sk in &secondary_keys {
                let path = pk.iter().chain(sk).cloned().collect();
                groups.entry(path).or_default().insert(name.clone(), obj.clone());
            }
        }
    }
    GroupedIndex { groups }
}
