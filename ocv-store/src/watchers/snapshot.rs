use kube::runtime::watcher::Event;
use ocv_core::prelude::*;
use tracing::*;

use crate::event::WatchEvent;

// The kube watcher delivers the initial list one object at a time (Init, InitApply..., InitDone),
// and does the same thing again whenever it has to re-list.  The store wants the whole list at
// once so that it can replace the collection atomically, so we hold on to the init-applies until
// the list is done.
#[derive(Debug, Default)]
pub struct SnapshotBuffer {
    pending: Option<Vec<DynamicObject>>,
}

impl SnapshotBuffer {
    pub fn push(&mut self, evt: Event<DynamicObject>) -> Option<WatchEvent> {
        match evt {
            Event::Init => {
                self.pending = Some(vec![]);
                None
            },
            Event::InitApply(obj) => {
                self.pending.get_or_insert_default().push(obj);
                None
            },
            Event::InitDone => Some(WatchEvent::Snapshot(self.pending.take().unwrap_or_default())),
            Event::Apply(obj) => Some(WatchEvent::Upsert(obj)),
            Event::Delete(obj) => match obj.metadata.name {
                Some(name) => Some(WatchEvent::Delete(name)),
                None => {
                    warn!("received delete event for an object with no name, skipping");
                    None
                },
            },
        }
    }

    pub fn is_buffering(&self) -> bool {
        self.pending.is_some()
    }
}
