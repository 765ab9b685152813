use std::fmt;

use ocv_core::prelude::*;

// Everything an event source can tell us about a collection.  The first event for any collection
// is always a Snapshot; after that we only get single-object changes (until the source re-lists,
// at which point we get another Snapshot).
#[derive(Clone, Debug, PartialEq)]
pub enum WatchEvent {
    Snapshot(Vec<DynamicObject>),
    Upsert(DynamicObject),
    Delete(String),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WatchAction {
    Added,
    Modified,
    Deleted,
}

impl fmt::Display for WatchAction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            WatchAction::Added => write!(f, "ADDED"),
            WatchAction::Modified => write!(f, "MODIFIED"),
            WatchAction::Deleted => write!(f, "DELETED"),
        }
    }
}

// What the store actually did with a WatchEvent; this is what the association engine and the
// views key their recomputation off of.  Upserts and deletes only carry the name, the current
// object (if any) is always read back out of the store.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum StoreChange {
    Snapshot,
    Upsert { name: String, action: WatchAction },
    Delete { name: String },
}

impl StoreChange {
    pub fn action(&self) -> Option<WatchAction> {
        match self {
            StoreChange::Snapshot => None,
            StoreChange::Upsert { action, .. } => Some(*action),
            StoreChange::Delete { .. } => Some(WatchAction::Deleted),
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            StoreChange::Snapshot => None,
            StoreChange::Upsert { name, .. } | StoreChange::Delete { name } => Some(name),
        }
    }
}
