//! Property lookup on resolved configuration trees.

use std::sync::Arc;

use serde_json::Value;

use crate::tree::ConfigTree;
use crate::{ConfigError, ConfigResult};

/// Return `tree` itself, or its `property` when one is requested.
///
/// # Errors
///
/// Returns [`ConfigError::MissingProperty`] when `property` is not an own key
/// of `tree`. The error lists every key that is present.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use toolchain_config::pluck;
///
/// let tree = json!({"a": 1, "b": 2});
/// assert_eq!(pluck(tree.clone(), Some("b"))?, json!(2));
/// assert_eq!(pluck(tree.clone(), None)?, tree);
///
/// let err = pluck(tree, Some("c")).unwrap_err();
/// assert_eq!(
///     err.to_string(),
///     "property 'c' is not present in the resolved configuration; available keys: [a, b]"
/// );
/// # Ok::<_, std::sync::Arc<toolchain_config::ConfigError>>(())
/// ```
pub fn pluck(tree: ConfigTree, property: Option<&str>) -> ConfigResult<ConfigTree> {
    let Some(requested) = property else {
        return Ok(tree);
    };
    match tree {
        Value::Object(mut map) => match map.remove(requested) {
            Some(value) => Ok(value),
            None => Err(Arc::new(ConfigError::missing_property(
                requested,
                map.keys().cloned(),
            ))),
        },
        _ => Err(Arc::new(ConfigError::missing_property(
            requested,
            std::iter::empty::<String>(),
        ))),
    }
}
