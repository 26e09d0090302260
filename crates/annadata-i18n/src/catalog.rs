//! A fully loaded translation mapping.

use std::fmt::Display;

use annadata_core::error::AnnadataError;
use serde_json::{Map, Value};
use tracing::debug;

/// Nested mapping of key segments to string templates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    root: Map<String, Value>,
}

impl Catalog {
    /// Parse a catalog file. The top level must be a JSON object.
    pub fn from_json_str(content: &str) -> Result<Self, AnnadataError> {
        let value: Value = serde_json::from_str(content)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, AnnadataError> {
        match value {
            Value::Object(root) => Ok(Self { root }),
            other => Err(AnnadataError::Localization(format!(
                "catalog root must be an object, got {}",
                kind(&other)
            ))),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Walk `key` segment by segment. `None` on any missing level or a
    /// non-string leaf.
    pub fn resolve(&self, key: &str) -> Option<&str> {
        let mut segments = key.split('.');
        let mut node = self.root.get(segments.next()?)?;
        for segment in segments {
            node = node.as_object()?.get(segment)?;
        }
        node.as_str()
    }

    /// Resolve `key`, or return the key itself when it is missing.
    pub fn t(&self, key: &str) -> String {
        self.t_with(key, &[])
    }

    /// Resolve `key` and substitute `{name}` / `#{name}` placeholders.
    pub fn t_with(&self, key: &str, args: &[(&str, &dyn Display)]) -> String {
        match self.resolve(key) {
            Some(template) => interpolate(template, args),
            None => {
                debug!("missing translation key '{key}'");
                key.to_string()
            }
        }
    }

    /// All dotted keys with string leaves, sorted.
    #[cfg(test)]
    pub(crate) fn keys(&self) -> Vec<String> {
        let mut out = Vec::new();
        collect_keys(&self.root, "", &mut out);
        out.sort();
        out
    }
}

#[cfg(test)]
fn collect_keys(map: &Map<String, Value>, prefix: &str, out: &mut Vec<String>) {
    for (k, v) in map {
        let path = if prefix.is_empty() {
            k.clone()
        } else {
            format!("{prefix}.{k}")
        };
        match v {
            Value::String(_) => out.push(path),
            Value::Object(child) => collect_keys(child, &path, out),
            _ => {}
        }
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Replace every `{name}` and legacy `#{name}` with the stringified value.
/// Placeholders without a matching arg are left as-is.
pub fn interpolate(template: &str, args: &[(&str, &dyn Display)]) -> String {
    let mut out = template.to_string();
    for (name, value) in args {
        let value = value.to_string();
        // Legacy form first: "#{name}" contains "{name}".
        out = out.replace(&format!("#{{{name}}}"), &value);
        out = out.replace(&format!("{{{name}}}"), &value);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn catalog(value: Value) -> Catalog {
        Catalog::from_value(value).unwrap()
    }

    #[test]
    fn test_nested_lookup_with_interpolation() {
        let c = catalog(json!({"a": {"b": {"c": "Hello {name}"}}}));
        assert_eq!(c.t_with("a.b.c", &[("name", &"World")]), "Hello World");
    }

    #[test]
    fn test_missing_key_returns_key() {
        let c = catalog(json!({"a": {"b": "x"}}));
        assert_eq!(c.t("missing.key"), "missing.key");
        assert_eq!(c.t("a.b.c"), "a.b.c");
        assert_eq!(c.t("a"), "a");
        assert_eq!(c.t(""), "");
        assert_eq!(Catalog::default().t("dashboard.totalRevenue"), "dashboard.totalRevenue");
    }

    #[test]
    fn test_non_string_leaf_is_a_miss() {
        let c = catalog(json!({"n": 3, "list": ["a"], "flag": true}));
        assert_eq!(c.t("n"), "n");
        assert_eq!(c.t("list"), "list");
        assert_eq!(c.resolve("flag"), None);
    }

    #[test]
    fn test_every_occurrence_and_legacy_form() {
        let out = interpolate("{n} + #{n} = {sum}", &[("n", &2), ("sum", &4)]);
        assert_eq!(out, "2 + 2 = 4");
        let out = interpolate("{n}{n}{n}", &[("n", &"ab")]);
        assert_eq!(out, "ababab");
    }

    #[test]
    fn test_unknown_placeholder_left_intact() {
        let c = catalog(json!({"cart": {"items": "{count} items for {name}"}}));
        assert_eq!(c.t_with("cart.items", &[("count", &3)]), "3 items for {name}");
        assert_eq!(c.t("cart.items"), "{count} items for {name}");
    }

    #[test]
    fn test_root_must_be_object() {
        let err = Catalog::from_json_str("[1, 2]").unwrap_err();
        assert!(err.to_string().contains("an array"));
        assert!(Catalog::from_json_str("{oops").is_err());
    }

    #[test]
    fn test_keys_lists_string_leaves() {
        let c = catalog(json!({"nav": {"home": "Home", "cart": "Cart"}, "title": "T", "n": 1}));
        assert_eq!(c.keys(), vec!["nav.cart", "nav.home", "title"]);
    }
}
