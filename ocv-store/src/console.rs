use std::collections::BTreeMap;

use ocv_core::prelude::*;
use tracing::*;

use crate::associations::AssociationEngine;
use crate::collection::{
    Collection,
    CollectionStore,
};
use crate::config::ViewConfig;
use crate::event::StoreChange;
use crate::filter::{
    LabelFilter,
    LabelSuggestions,
    add_suggestions_from_resources,
};
use crate::subscription::{
    SubscriptionHandle,
    Subscriptions,
};
use crate::view::{
    ViewState,
    reduce,
};

// A ConsoleView is one consumer of the shared store: it has its own label filter, its own derived
// associations and its own subscriptions.  Several of these can be fed from the same
// CollectionStore without affecting each other.
#[derive(Debug)]
pub struct ConsoleView {
    filter: LabelFilter,
    associations: AssociationEngine,
    state: ViewState,
    subscriptions: Subscriptions,
}

impl ConsoleView {
    pub fn new(config: &ViewConfig) -> ConsoleView {
        ConsoleView {
            filter: LabelFilter::new(config.label_selector.clone()),
            associations: AssociationEngine::new(config.annotations.clone()),
            state: ViewState::default(),
            subscriptions: Subscriptions::new(),
        }
    }

    // Recompute everything from the store; used when a view is attached to a store that already
    // has data in it.
    pub fn sync(&mut self, store: &CollectionStore) {
        for kind in ResourceKind::FILTERABLE {
            self.update_suggestions(store, kind);
        }
        self.associations.rebuild(store);
        self.state = reduce(store, &self.filter);
    }

    // Returns true if the composed view changed as a result of this event.  Events for the
    // non-filterable kinds only feed the associations, so they count as a change only if some
    // association moved.
    pub fn handle(&mut self, store: &CollectionStore, kind: ResourceKind, change: &StoreChange) -> bool {
        if self.subscriptions.is_closed() {
            debug!("view is torn down, dropping {kind} event");
            return false;
        }

        let associations_changed = self.associations.handle(store, kind, change);
        if !kind.is_filterable() {
            return associations_changed;
        }

        self.update_suggestions(store, kind);
        self.recompute(store) | associations_changed
    }

    pub fn set_selector(&mut self, store: &CollectionStore, selector: LabelSelector) -> bool {
        if self.subscriptions.is_closed() || !self.filter.set_selector(selector) {
            return false;
        }
        self.recompute(store)
    }

    pub fn on_selector_changed<F>(&mut self, f: F)
    where
        F: FnMut(&LabelSelector) + Send + 'static,
    {
        self.filter.on_selector_changed(f);
    }

    pub fn add_subscription(&mut self, handle: Box<dyn SubscriptionHandle>) {
        self.subscriptions.add(handle);
    }

    pub fn teardown(&mut self) {
        self.subscriptions.teardown_all();
    }

    pub fn is_closed(&self) -> bool {
        self.subscriptions.is_closed()
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn associations(&self) -> &AssociationEngine {
        &self.associations
    }

    pub fn selector(&self) -> &LabelSelector {
        self.filter.selector()
    }

    pub fn suggestions(&self) -> &LabelSuggestions {
        self.filter.suggestions()
    }

    pub fn filtered(&self, kind: ResourceKind) -> Option<&Collection> {
        self.state.filtered(kind)
    }

    pub fn pods_for_service(&self, service: &str) -> Option<&Collection> {
        self.associations.pods_by_service().get(service)
    }

    // Only the services that survive the label filter, each with the pods it selects
    pub fn filtered_pods_by_service(&self) -> BTreeMap<&str, &Collection> {
        let Some(services) = self.filtered(ResourceKind::Services) else {
            return BTreeMap::new();
        };
        services
            .keys()
            .filter_map(|name| Some((name.as_str(), self.pods_for_service(name)?)))
            .collect()
    }

    pub fn summary(&self) -> String {
        let mut parts = vec![];
        for (kind, view) in &self.state.views {
            if view.filtered.is_empty() {
                parts.push(format!("{}: {}", kind.display_plural(), view.empty_message));
            } else {
                parts.push(format!("{}: {}", kind.display_plural(), view.filtered.len()));
            }
            if let Some(alert) = &view.alert {
                parts.push(alert.details.clone());
            }
        }
        let linked_builds: usize = self.associations.triggers().values().flatten().map(|t| t.builds.len()).sum();
        parts.push(format!("linked builds: {linked_builds}"));
        parts.push(format!("resolved images: {}", self.associations.resolved_images().len()));
        parts.join("; ")
    }

    fn update_suggestions(&mut self, store: &CollectionStore, kind: ResourceKind) {
        let mut observed = LabelSuggestions::new();
        add_suggestions_from_resources(store.get(kind), &mut observed);
        self.filter.set_suggestions(&observed);
    }

    fn recompute(&mut self, store: &CollectionStore) -> bool {
        let state = reduce(store, &self.filter);
        if state == self.state {
            return false;
        }
        self.state = state;
        true
    }
}
