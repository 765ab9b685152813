use serde_json as json;

// Kind-specific fields moved around between API versions (e.g., DeploymentConfig triggers used to
// live at the top level of the object and now live under `spec`), so most lookups take a list of
// candidate JSON pointers and return the first one that's present.
pub fn lookup<'a>(v: &'a json::Value, pointers: &[&str]) -> Option<&'a json::Value> {
    pointers.iter().find_map(|p| v.pointer(p)).filter(|v| !v.is_null())
}

pub fn lookup_str<'a>(v: &'a json::Value, pointers: &[&str]) -> Option<&'a str> {
    lookup(v, pointers)?.as_str()
}

pub fn lookup_array<'a>(v: &'a json::Value, pointers: &[&str]) -> &'a [json::Value] {
    lookup(v, pointers)
        .and_then(|v| v.as_array())
        .map(|a| a.as_slice())
        .unwrap_or_default()
}

// Render a scalar so it can be used as an index key; compound values (and null) can't be keys, so
// they're treated as "no value".
pub fn render_scalar(v: &json::Value) -> Option<String> {
    match v {
        json::Value::String(s) => Some(s.clone()),
        json::Value::Bool(b) => Some(b.to_string()),
        json::Value::Number(n) => Some(n.to_string()),
        json::Value::Null | json::Value::Array(_) | json::Value::Object(_) => None,
    }
}
