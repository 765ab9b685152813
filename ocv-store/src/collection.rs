use std::collections::{
    BTreeMap,
    HashMap,
    HashSet,
};
use std::sync::Arc;

use ocv_core::prelude::*;
use tracing::*;

use crate::event::{
    StoreChange,
    WatchAction,
    WatchEvent,
};
use crate::projection::{
    GroupedIndex,
    Projection,
    project,
};

// Objects are never mutated once they're in the store; an update swaps out the Arc, so anything
// that's holding on to the old version (a filtered view, a trigger's build list) still sees a
// consistent object.
pub type Collection = BTreeMap<String, Arc<DynamicObject>>;

static EMPTY_COLLECTION: Collection = BTreeMap::new();

// The CollectionStore is the single source of truth for every watched kind.  Each kind has a
// version counter that is bumped on every mutation, and a "synced" flag which is set once we've
// seen the initial snapshot for that kind; this is how views tell the difference between "there's
// nothing here" and "we haven't heard anything yet".
#[derive(Clone, Debug, Default)]
pub struct CollectionStore {
    collections: HashMap<ResourceKind, Collection>,
    versions: HashMap<ResourceKind, u64>,
    synced: HashSet<ResourceKind>,
}

impl CollectionStore {
    pub fn new() -> CollectionStore {
        CollectionStore::default()
    }

    pub fn apply(&mut self, kind: ResourceKind, evt: WatchEvent) -> Option<StoreChange> {
        match evt {
            WatchEvent::Snapshot(objs) => {
                self.replace_all(kind, objs);
                Some(StoreChange::Snapshot)
            },
            WatchEvent::Upsert(obj) => {
                let Some(name) = obj.metadata.name.clone() else {
                    warn!("{kind} object without a name cannot be stored, skipping");
                    return None;
                };
                let action = self.upsert(kind, obj);
                Some(StoreChange::Upsert { name, action })
            },
            WatchEvent::Delete(name) => {
                if self.remove(kind, &name).is_none() {
                    debug!("{kind} {name} deleted but was not present in the store");
                }
                Some(StoreChange::Delete { name })
            },
        }
    }

    pub fn upsert(&mut self, kind: ResourceKind, obj: DynamicObject) -> WatchAction {
        let name = obj.name_any();
        let prev = self.collections.entry(kind).or_default().insert(name, Arc::new(obj));
        self.bump(kind);
        match prev {
            Some(_) => WatchAction::Modified,
            None => WatchAction::Added,
        }
    }

    pub fn remove(&mut self, kind: ResourceKind, name: &str) -> Option<Arc<DynamicObject>> {
        let removed = self.collections.get_mut(&kind)?.remove(name);
        if removed.is_some() {
            self.bump(kind);
        }
        removed
    }

    // A snapshot always replaces the entire collection, anything that isn't in the new list is
    // gone.  Objects without a name can't be keyed so they are dropped.
    pub fn replace_all(&mut self, kind: ResourceKind, objs: Vec<DynamicObject>) {
        let collection: Collection = objs
            .into_iter()
            .filter_map(|obj| match obj.metadata.name.clone() {
                Some(name) => Some((name, Arc::new(obj))),
                None => {
                    warn!("{kind} object without a name in snapshot, skipping");
                    None
                },
            })
            .collect();

        info!("{kind} snapshot: {} objects", collection.len());
        self.collections.insert(kind, collection);
        self.synced.insert(kind);
        self.bump(kind);
    }

    pub fn get(&self, kind: ResourceKind) -> &Collection {
        self.collections.get(&kind).unwrap_or(&EMPTY_COLLECTION)
    }

    pub fn get_obj(&self, kind: ResourceKind, name: &str) -> Option<&Arc<DynamicObject>> {
        self.collections.get(&kind)?.get(name)
    }

    pub fn project(&self, kind: ResourceKind, primary: &Projection, secondary: Option<&Projection>) -> GroupedIndex {
        project(self.get(kind), primary, secondary)
    }

    pub fn version(&self, kind: ResourceKind) -> u64 {
        self.versions.get(&kind).copied().unwrap_or_default()
    }

    pub fn has_synced(&self, kind: ResourceKind) -> bool {
        self.synced.contains(&kind)
    }

    fn bump(&mut self, kind: ResourceKind) {
        *self.versions.entry(kind).or_default() += 1;
    }
}
