use std::collections::BTreeMap;

use ocv_core::prelude::*;

use crate::collection::{
    Collection,
    CollectionStore,
};
use crate::filter::LabelFilter;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AlertType {
    Warning,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FilterAlert {
    pub alert_type: AlertType,
    pub details: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilteredView {
    pub filtered: Collection,
    pub empty_message: String,
    pub alert: Option<FilterAlert>,
}

// The composed view for every filterable kind.  Two ViewStates compare equal iff a consumer would
// render them identically, which is how the console decides whether an event "changed" anything.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViewState {
    pub views: BTreeMap<ResourceKind, FilteredView>,
}

impl ViewState {
    pub fn get(&self, kind: ResourceKind) -> Option<&FilteredView> {
        self.views.get(&kind)
    }

    pub fn filtered(&self, kind: ResourceKind) -> Option<&Collection> {
        Some(&self.views.get(&kind)?.filtered)
    }

    pub fn alert(&self, kind: ResourceKind) -> Option<&FilterAlert> {
        self.views.get(&kind)?.alert.as_ref()
    }

    pub fn alerts(&self) -> impl Iterator<Item = (ResourceKind, &FilterAlert)> {
        self.views.iter().filter_map(|(kind, v)| Some((*kind, v.alert.as_ref()?)))
    }
}

// Only warn when it's the filter's fault that there's nothing to show: a non-empty selector hid
// every object from a non-empty collection.
pub fn filter_alert(
    kind: ResourceKind,
    selector: &LabelSelector,
    filtered: &Collection,
    unfiltered: &Collection,
) -> Option<FilterAlert> {
    if selector.is_empty() || !filtered.is_empty() || unfiltered.is_empty() {
        return None;
    }

    Some(FilterAlert {
        alert_type: AlertType::Warning,
        details: format!("The active filters are hiding all {}.", kind.display_plural()),
    })
}

pub fn empty_message(store: &CollectionStore, kind: ResourceKind) -> String {
    if store.has_synced(kind) {
        format!("No {} to show", kind.display_plural())
    } else {
        LOADING_MESSAGE.into()
    }
}

pub fn reduce_kind(store: &CollectionStore, kind: ResourceKind, filter: &LabelFilter) -> FilteredView {
    let unfiltered = store.get(kind);
    let filtered = filter.select(unfiltered);
    let alert = filter_alert(kind, filter.selector(), &filtered, unfiltered);
    FilteredView { filtered, empty_message: empty_message(store, kind), alert }
}

pub fn reduce(store: &CollectionStore, filter: &LabelFilter) -> ViewState {
    ViewState {
        views: ResourceKind::FILTERABLE
            .into_iter()
            .map(|kind| (kind, reduce_kind(store, kind, filter)))
            .collect(),
    }
}
