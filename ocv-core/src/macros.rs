// Generate labels (or annotations) for a k8s object, using klabel!("label1" => "value1", "label2" => "value2")
// syntax; the result is wrapped in Some(...) so it can be dropped directly into an ObjectMeta
#[macro_export]
macro_rules! klabel {
    ($($key:expr => $val:expr),+$(,)?) => {
        Some(::std::collections::BTreeMap::from([$(($key.to_string(), $val.to_string())),+]))
    };
}

pub use klabel;
