use std::sync::Arc;

use futures::StreamExt;
use ocv_core::errors::*;
use ocv_core::prelude::*;
use tokio::sync::{
    Mutex,
    mpsc,
    watch,
};
use tokio::task::JoinSet;
use tracing::*;

use crate::collection::CollectionStore;
use crate::config::ViewConfig;
use crate::console::ConsoleView;
use crate::event::WatchEvent;
use crate::watchers::{
    self,
    WatchStream,
    api_for,
};

err_impl! {WatchError,
    #[error("event channel closed while forwarding {0} events")]
    ChannelClosed(ResourceKind),

    #[error("no console view with id {0}")]
    UnknownView(usize),
}

#[derive(Debug)]
pub struct Message {
    pub(crate) kind: ResourceKind,
    pub(crate) event: WatchEvent,
}

impl Message {
    pub fn new(kind: ResourceKind, event: WatchEvent) -> Message {
        Message { kind, event }
    }
}

pub type Sender = mpsc::UnboundedSender<Message>;
pub type Receiver = mpsc::UnboundedReceiver<Message>;

pub type ViewId = usize;

// The Console is the shared CollectionStore plus every consumer view that it feeds.  Only the
// dispatcher task mutates it; everything else gets at it through the manager's mutex.
#[derive(Debug, Default)]
pub struct Console {
    store: CollectionStore,
    views: Vec<ConsoleView>,
}

impl Console {
    pub fn new() -> Console {
        Console::default()
    }

    pub fn add_view(&mut self, mut view: ConsoleView) -> ViewId {
        view.sync(&self.store);
        self.views.push(view);
        self.views.len() - 1
    }

    // Apply the event to the store and then let every view recompute what it needs to; returns
    // true if any view changed.
    pub fn dispatch(&mut self, msg: Message) -> bool {
        let Some(change) = self.store.apply(msg.kind, msg.event) else {
            return false;
        };

        let mut changed = false;
        for view in self.views.iter_mut() {
            changed |= view.handle(&self.store, msg.kind, &change);
        }
        changed
    }

    pub fn set_selector(&mut self, id: ViewId, selector: LabelSelector) -> anyhow::Result<bool> {
        let view = self.views.get_mut(id).ok_or_else(|| WatchError::unknown_view(&id))?;
        Ok(view.set_selector(&self.store, selector))
    }

    pub fn store(&self) -> &CollectionStore {
        &self.store
    }

    pub fn view(&self, id: ViewId) -> Option<&ConsoleView> {
        self.views.get(id)
    }

    pub fn view_mut(&mut self, id: ViewId) -> Option<&mut ConsoleView> {
        self.views.get_mut(id)
    }
}

pub struct ViewManager {
    console: Arc<Mutex<Console>>,
    view_id: ViewId,
    changes: watch::Receiver<u64>,
    js: JoinSet<()>,
}

impl ViewManager {
    pub async fn start(client: kube::Client, config: ViewConfig) -> anyhow::Result<ViewManager> {
        ensure!(!config.namespace.is_empty(), "cannot start a console view without a namespace");

        let (tx, rx): (Sender, Receiver) = mpsc::unbounded_channel();
        let (changed_tx, changes) = watch::channel(0);

        let mut view = ConsoleView::new(&config);
        let mut js = JoinSet::new();
        for (kind, opts) in &config.watches {
            let api = api_for(client.clone(), *kind, &config.namespace);
            let handle = js.spawn(forward_events(*kind, watchers::watch(api, opts), tx.clone()));
            view.add_subscription(Box::new(handle));
        }
        info!("watching {} collection(s) in {}", config.watches.len(), config.namespace);

        let mut console = Console::new();
        let view_id = console.add_view(view);
        let console = Arc::new(Mutex::new(console));
        js.spawn(handle_messages(rx, console.clone(), changed_tx));

        Ok(ViewManager { console, view_id, changes, js })
    }

    pub fn console(&self) -> Arc<Mutex<Console>> {
        self.console.clone()
    }

    pub fn view_id(&self) -> ViewId {
        self.view_id
    }

    // The value is a generation counter that's bumped every time the view changes
    pub fn subscribe_changes(&self) -> watch::Receiver<u64> {
        self.changes.clone()
    }

    pub async fn set_selector(&self, selector: LabelSelector) -> anyhow::Result<bool> {
        self.console.lock().await.set_selector(self.view_id, selector)
    }

    pub async fn summary(&self) -> Option<String> {
        Some(self.console.lock().await.view(self.view_id)?.summary())
    }

    pub async fn teardown(&mut self) {
        if let Some(view) = self.console.lock().await.view_mut(self.view_id) {
            view.teardown();
        }
        self.js.shutdown().await;
    }
}

// Errors from the watch stream are logged and dropped here, so the dispatcher only ever sees
// well-formed events.
pub(crate) async fn forward_events(kind: ResourceKind, mut stream: WatchStream, tx: Sender) {
    debug!("forwarding {kind} events");
    while let Some(res) = stream.next().await {
        let event = match res {
            Ok(event) => event,
            Err(err) => {
                ocverr!(err, "{} watch stream error", kind);
                continue;
            },
        };

        if tx.send(Message { kind, event }).is_err() {
            ocverr!(WatchError::channel_closed(&kind), "stopping watch");
            break;
        }
    }
}

pub(crate) async fn handle_messages(mut rx: Receiver, console: Arc<Mutex<Console>>, changed_tx: watch::Sender<u64>) {
    while let Some(msg) = rx.recv().await {
        debug!("dispatching {} event", msg.kind);
        let changed = console.lock().await.dispatch(msg);
        if changed {
            changed_tx.send_modify(|generation| *generation += 1);
        }
    }
    info!("all watches have stopped, dispatcher exiting");
}
