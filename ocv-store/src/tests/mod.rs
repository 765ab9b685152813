mod collection_test;
mod console_test;
mod triggers_test;

use std::sync::Arc;

use ocv_core::prelude::*;
use rstest::*;

use super::*;

fn collection(objs: impl IntoIterator<Item = DynamicObject>) -> Collection {
    objs.into_iter().map(|obj| (obj.name_any(), Arc::new(obj))).collect()
}

fn store_with(contents: impl IntoIterator<Item = (ResourceKind, Vec<DynamicObject>)>) -> CollectionStore {
    let mut store = CollectionStore::new();
    for (kind, objs) in contents {
        store.replace_all(kind, objs);
    }
    store
}

fn names(c: &Collection) -> Vec<&str> {
    c.keys().map(|k| k.as_str()).collect()
}
