//! Merging fetched content over caller defaults.

use serde_json::Value;

use buildll_core::ContentResponse;

/// Layer fetched content over `defaults`.
///
/// With no content the defaults are returned unchanged. Object payloads are
/// shallow-merged over object defaults; any other payload replaces them.
pub fn merge_defaults(defaults: &Value, fetched: Option<&ContentResponse>) -> Value {
    match fetched {
        Some(content) => overlay(defaults, &content.data),
        None => defaults.clone(),
    }
}

/// Shallow-merge `top` over `base`. A `null` top keeps `base`.
pub fn overlay(base: &Value, top: &Value) -> Value {
    match (base, top) {
        (_, Value::Null) => base.clone(),
        (Value::Object(base), Value::Object(top)) => {
            let mut merged = base.clone();
            merged.extend(top.iter().map(|(k, v)| (k.clone(), v.clone())));
            Value::Object(merged)
        }
        _ => top.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn content(data: Value) -> ContentResponse {
        ContentResponse { id: "hero".into(), data, meta: None }
    }

    #[test]
    fn test_missing_content_keeps_defaults() {
        let defaults = json!({"title": "Hello"});
        assert_eq!(merge_defaults(&defaults, None), defaults);
    }

    #[test]
    fn test_fetched_fields_override_defaults() {
        let defaults = json!({"title": "Hello", "subtitle": "Default sub"});
        let merged = merge_defaults(&defaults, Some(&content(json!({"title": "Fetched Title"}))));
        assert_eq!(merged, json!({"title": "Fetched Title", "subtitle": "Default sub"}));
    }

    #[test]
    fn test_merge_is_shallow() {
        let defaults = json!({"cta": {"label": "Go", "href": "/"}});
        let merged = merge_defaults(&defaults, Some(&content(json!({"cta": {"label": "Buy"}}))));
        assert_eq!(merged, json!({"cta": {"label": "Buy"}}));
    }

    #[test]
    fn test_non_object_payload_replaces_defaults() {
        let merged = merge_defaults(&json!({"title": "x"}), Some(&content(json!("plain text"))));
        assert_eq!(merged, json!("plain text"));

        let merged = merge_defaults(&Value::Null, Some(&content(json!({"a": 1}))));
        assert_eq!(merged, json!({"a": 1}));
    }

    #[test]
    fn test_null_payload_keeps_defaults() {
        let defaults = json!({"title": "Hello"});
        assert_eq!(merge_defaults(&defaults, Some(&content(Value::Null))), defaults);
    }
}
