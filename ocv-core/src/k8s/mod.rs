mod kind;
mod label_selector;
mod util;

pub use kind::*;
pub use label_selector::*;

use crate::prelude::*;

pub trait KubeResourceExt {
    fn namespaced_name(&self) -> String;
    fn matches(&self, sel: &LabelSelector) -> bool;
}

#[cfg(test)]
pub mod tests;
