mod snapshot;

use std::pin::Pin;
use std::time::Duration;

use futures::{
    Stream,
    StreamExt,
    TryStreamExt,
    future,
    stream,
};
use kube::api::{
    Api,
    ListParams,
};
use kube::runtime::WatchStreamExt;
use kube::runtime::watcher::{
    self,
    watcher,
};
use ocv_core::prelude::*;
use tracing::*;

pub use self::snapshot::SnapshotBuffer;
use crate::config::WatchOptions;
use crate::event::WatchEvent;

pub type WatchStream = Pin<Box<dyn Stream<Item = anyhow::Result<WatchEvent>> + Send>>;

// Everything but images lives in the view's namespace
pub fn api_for(client: kube::Client, kind: ResourceKind, namespace: &str) -> Api<DynamicObject> {
    let ar = kind.api_resource();
    if kind.namespaced() {
        Api::namespaced_with(client, namespace, &ar)
    } else {
        Api::all_with(client, &ar)
    }
}

pub fn watch(api: Api<DynamicObject>, opts: &WatchOptions) -> WatchStream {
    match opts.poll_interval {
        Some(interval) => poll_stream(api, interval),
        None => push_stream(api),
    }
}

pub fn push_stream(api: Api<DynamicObject>) -> WatchStream {
    from_kube_events(watcher(api, watcher::Config::default()).default_backoff())
}

// Re-list the collection on every tick; every list is delivered as a fresh snapshot, which means
// that the consumers never see individual ADDED/MODIFIED/DELETED events for polled kinds.
pub fn poll_stream(api: Api<DynamicObject>, interval: Duration) -> WatchStream {
    let ticker = tokio::time::interval(interval);
    stream::unfold((api, ticker), |(api, mut ticker)| async move {
        ticker.tick().await;
        debug!("polling {}", api.resource_url());
        let res = api
            .list(&ListParams::default())
            .await
            .map(|list| WatchEvent::Snapshot(list.items))
            .map_err(anyhow::Error::from);
        Some((res, (api, ticker)))
    })
    .boxed()
}

// Fold a raw kube watcher stream into WatchEvents
pub fn from_kube_events<S>(events: S) -> WatchStream
where
    S: Stream<Item = watcher::Result<watcher::Event<DynamicObject>>> + Send + 'static,
{
    let mut buffer = SnapshotBuffer::default();
    events
        .map_err(anyhow::Error::from)
        .try_filter_map(move |evt| future::ready(Ok(buffer.push(evt))))
        .boxed()
}

#[cfg(test)]
mod tests;
