use tracing::*;

// Anything that can be cancelled when the view goes away; in practice this is the abort handle
// for a watch-forwarding task.
#[cfg_attr(test, mockall::automock)]
pub trait SubscriptionHandle: Send {
    fn close(&mut self);
}

impl SubscriptionHandle for tokio::task::AbortHandle {
    fn close(&mut self) {
        self.abort();
    }
}

#[derive(Default)]
pub struct Subscriptions {
    handles: Vec<Box<dyn SubscriptionHandle>>,
    closed: bool,
}

impl Subscriptions {
    pub fn new() -> Subscriptions {
        Subscriptions::default()
    }

    // Once we've been torn down, nothing new is allowed to start delivering events
    pub fn add(&mut self, mut handle: Box<dyn SubscriptionHandle>) {
        if self.closed {
            debug!("subscription added after teardown, closing it immediately");
            handle.close();
            return;
        }
        self.handles.push(handle);
    }

    pub fn teardown_all(&mut self) {
        if self.closed {
            return;
        }

        info!("tearing down {} subscription(s)", self.handles.len());
        for mut handle in self.handles.drain(..) {
            handle.close();
        }
        self.closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

impl std::fmt::Debug for Subscriptions {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Subscriptions")
            .field("handles", &self.handles.len())
            .field("closed", &self.closed)
            .finish()
    }
}
