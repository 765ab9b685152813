pub mod associations;
mod collection;
mod config;
mod console;
mod event;
mod filter;
mod manager;
mod projection;
mod subscription;
pub mod view;
pub mod watchers;

pub use crate::associations::AssociationEngine;
pub use crate::collection::{
    Collection,
    CollectionStore,
};
pub use crate::config::{
    AnnotationConfig,
    ViewConfig,
    WatchOptions,
};
pub use crate::console::ConsoleView;
pub use crate::event::{
    StoreChange,
    WatchAction,
    WatchEvent,
};
pub use crate::filter::{
    LabelFilter,
    LabelSuggestions,
    add_suggestions_from_resources,
};
pub use crate::manager::{
    Console,
    Message,
    ViewId,
    ViewManager,
    WatchError,
};
pub use crate::projection::{
    GroupedIndex,
    Projection,
    project,
};
pub use crate::subscription::{
    SubscriptionHandle,
    Subscriptions,
};
pub use crate::view::{
    FilterAlert,
    FilteredView,
    ViewState,
};

#[cfg(test)]
mod tests;
