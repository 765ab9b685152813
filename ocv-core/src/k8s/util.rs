use kube::api::Resource;

use super::*;

impl<T: Resource> KubeResourceExt for T {
    fn namespaced_name(&self) -> String {
        match self.namespace() {
            Some(ns) => format!("{}/{}", ns, self.name_any()),
            None => self.name_any(),
        }
    }

    fn matches(&self, sel: &LabelSelector) -> bool {
        sel.matches(self.labels())
    }
}
