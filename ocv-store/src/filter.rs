use std::collections::{
    BTreeMap,
    BTreeSet,
};
use std::fmt;

use ocv_core::prelude::*;
use tracing::*;

use crate::collection::Collection;

// label key -> every value we've seen for that key
pub type LabelSuggestions = BTreeMap<String, BTreeSet<String>>;

pub type SelectorListener = Box<dyn FnMut(&LabelSelector) + Send>;

// The LabelFilter holds the user's active label selector, plus the set of labels that we've seen
// on the filterable collections (used to offer suggestions when the user is building a filter).
// Each consumer owns its own LabelFilter, so two views looking at the same store can have
// completely independent filters.
#[derive(Default)]
pub struct LabelFilter {
    selector: LabelSelector,
    suggestions: LabelSuggestions,
    listeners: Vec<SelectorListener>,
}

impl LabelFilter {
    pub fn new(selector: LabelSelector) -> LabelFilter {
        LabelFilter { selector, ..Default::default() }
    }

    pub fn selector(&self) -> &LabelSelector {
        &self.selector
    }

    // Listeners are called synchronously, and only when the selector actually changes.  Returns
    // true if the selector changed.
    pub fn set_selector(&mut self, selector: LabelSelector) -> bool {
        if selector == self.selector {
            return false;
        }

        info!("active label filter changed: \"{}\" -> \"{}\"", self.selector, selector);
        self.selector = selector;
        for listener in self.listeners.iter_mut() {
            listener(&self.selector);
        }
        true
    }

    pub fn on_selector_changed<F>(&mut self, f: F)
    where
        F: FnMut(&LabelSelector) + Send + 'static,
    {
        self.listeners.push(Box::new(f));
    }

    pub fn suggestions(&self) -> &LabelSuggestions {
        &self.suggestions
    }

    // Suggestions only ever grow: a label that we saw once stays a valid suggestion even if the
    // object carrying it goes away.
    pub fn set_suggestions(&mut self, suggestions: &LabelSuggestions) {
        for (k, values) in suggestions {
            self.suggestions.entry(k.clone()).or_default().extend(values.iter().cloned());
        }
    }

    pub fn select(&self, collection: &Collection) -> Collection {
        if self.selector.is_empty() {
            return collection.clone();
        }

        collection
            .iter()
            .filter(|(_, obj)| obj.matches(&self.selector))
            .map(|(name, obj)| (name.clone(), obj.clone()))
            .collect()
    }
}

impl fmt::Debug for LabelFilter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("LabelFilter")
            .field("selector", &self.selector)
            .field("suggestions", &self.suggestions)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

pub fn add_suggestions_from_resources(collection: &Collection, acc: &mut LabelSuggestions) {
    for obj in collection.values() {
        for (k, v) in obj.labels() {
            acc.entry(k.clone()).or_default().insert(v.clone());
        }
    }
}
