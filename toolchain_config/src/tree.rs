//! The tagged value type every configuration layer is expressed in.
//!
//! Trees are plain [`serde_json::Value`]s built with `preserve_order`, so
//! mappings keep the key order of the layer that introduced them. The
//! [`TreeVisitor`] trait lets passes rewrite mapping entries at any depth
//! without matching on the tree shape themselves.

use serde_json::{Map, Value};

/// A recursively nested configuration value.
pub type ConfigTree = Value;

/// A mapping node inside a [`ConfigTree`].
pub type ConfigMap = Map<String, ConfigTree>;

/// Returns an empty mapping, the identity element for merges.
#[must_use]
pub fn empty_tree() -> ConfigTree {
    Value::Object(Map::new())
}

/// Returns `true` when `value` counts as "set" for switch-like keys.
///
/// `null`, `false`, zero and the empty string are falsy; every other value,
/// including empty sequences and mappings, is truthy.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use toolchain_config::tree::is_truthy;
///
/// assert!(is_truthy(&json!("src/index.js")));
/// assert!(!is_truthy(&json!("")));
/// assert!(!is_truthy(&json!(null)));
/// ```
#[must_use]
pub fn is_truthy(value: &ConfigTree) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_none_or(|n| n.abs() > f64::EPSILON),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Visitor invoked for every mapping entry during [`walk_mut`].
pub trait TreeVisitor {
    /// Inspect or rewrite `value`, stored under `key`, before the walk
    /// descends into it.
    fn visit_entry(&mut self, key: &str, value: &mut ConfigTree);
}

/// Walk `tree` depth-first, calling `visitor` for every mapping entry.
///
/// Sequences are walked element-wise and mappings key-wise; scalars end the
/// descent. The visitor sees an entry before its children, so rewrites made
/// to `value` are what the walk continues into.
pub fn walk_mut<V>(tree: &mut ConfigTree, visitor: &mut V)
where
    V: TreeVisitor + ?Sized,
{
    match tree {
        Value::Array(items) => {
            for item in items {
                walk_mut(item, visitor);
            }
        }
        Value::Object(map) => {
            for (key, value) in map.iter_mut() {
                visitor.visit_entry(key, value);
                walk_mut(value, visitor);
            }
        }
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    #[rstest]
    #[case(json!(null), false)]
    #[case(json!(false), false)]
    #[case(json!(true), true)]
    #[case(json!(0), false)]
    #[case(json!(1), true)]
    #[case(json!(""), false)]
    #[case(json!("index.js"), true)]
    #[case(json!([]), true)]
    #[case(json!({}), true)]
    fn truthiness_follows_switch_semantics(#[case] value: ConfigTree, #[case] expected: bool) {
        assert_eq!(is_truthy(&value), expected);
    }

    struct KeyRecorder(Vec<String>);

    impl TreeVisitor for KeyRecorder {
        fn visit_entry(&mut self, key: &str, _value: &mut ConfigTree) {
            self.0.push(key.to_owned());
        }
    }

    #[test]
    fn walk_visits_nested_entries_in_order() {
        let mut tree = json!({
            "a": {"b": 1},
            "c": [{"d": true}, 3],
        });
        let mut recorder = KeyRecorder(Vec::new());
        walk_mut(&mut tree, &mut recorder);
        assert_eq!(recorder.0, ["a", "b", "c", "d"]);
    }
}
