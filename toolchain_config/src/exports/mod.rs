//! Normalization of the build-scripts domain.
//!
//! Users describe package exports in shorthand: a bare source path, an
//! internal `{name, path}` record, or an external `{name}` reference. The
//! normalizer validates every entry and rewrites `build.exports` into
//! [`ExportDeclaration`] records that the bundler consumes as-is. It also
//! derives the mutually exclusive stage switches implied by `build.main`.
//!
//! Both passes mutate the merged tree they are handed and nothing else.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::merge::{Overwrite, merge_into};
use crate::tree::{ConfigMap, ConfigTree, is_truthy};
use crate::{ConfigError, ConfigResult, ConfigResultExt, ExportIssue};

/// Namespace prepended to every canonical export name.
///
/// The normalizer owns this prefix; user-supplied names must not carry it.
pub const RESERVED_EXPORT_PREFIX: &str = "@toolchain-internal";

/// Output bucket for stylesheet exports.
pub const CSS_BUCKET: &str = "css";

/// Output bucket for every other export.
pub const EXPORTS_BUCKET: &str = "exports";

/// A validated export handed to the bundler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportDeclaration {
    /// Output name, always starting with [`RESERVED_EXPORT_PREFIX`].
    pub name: String,
    /// Package-relative source path or external package name.
    pub path: String,
    /// Extra options forwarded to the bundler.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<ConfigMap>,
}

/// Derive the bucketed output name for `path`.
///
/// Stylesheets land in the `css/` bucket without their suffix; everything else
/// lands in `exports/`. `flatten` turns the path into a single file-safe
/// token.
///
/// # Examples
///
/// ```
/// use toolchain_config::exports::derive_output_name;
///
/// let flatten = |p: &str| p.replace('/', "-");
/// assert_eq!(derive_output_name("styles/app.css", flatten), "css/styles-app");
/// assert_eq!(derive_output_name("foo/bar", flatten), "exports/foo-bar");
/// ```
#[must_use]
pub fn derive_output_name<F>(path: &str, flatten: F) -> String
where
    F: Fn(&str) -> String,
{
    path.strip_suffix(".css").map_or_else(
        || format!("{EXPORTS_BUCKET}/{}", flatten(path)),
        |stem| format!("{CSS_BUCKET}/{}", flatten(stem)),
    )
}

/// Apply both normalization passes to a merged build-scripts tree.
///
/// # Errors
///
/// Returns the first export validation failure: [`ConfigError::InvalidExternalExport`],
/// [`ConfigError::MissingExportIdentifier`], [`ConfigError::ReservedPrefixCollision`]
/// or [`ConfigError::MalformedExport`].
pub fn normalize_build_scripts<F>(tree: &mut ConfigTree, flatten: F) -> ConfigResult<()>
where
    F: Fn(&str) -> String,
{
    let Some(build) = tree.get_mut("build").and_then(Value::as_object_mut) else {
        return Ok(());
    };
    apply_single_entry_mode(build);
    normalize_exports(build, flatten)
}

/// Pass A: a single-entry build skips the transpile and legacy bundle stages.
fn apply_single_entry_mode(build: &mut ConfigMap) {
    if !build.get("main").is_some_and(is_truthy) {
        return;
    }
    tracing::debug!("single-entry build: disabling babel and bundler stages");
    build.insert("babel".to_owned(), Value::Bool(false));
    build.insert("bundler".to_owned(), Value::Bool(false));
    let exports = build.entry("exports").or_insert(Value::Null);
    if exports.is_null() {
        *exports = Value::Array(Vec::new());
    }
}

/// Pass B: canonicalize `build.exports` and keep the legacy bundler off them.
fn normalize_exports<F>(build: &mut ConfigMap, flatten: F) -> ConfigResult<()>
where
    F: Fn(&str) -> String,
{
    let Some(Value::Array(raw)) = build.get("exports") else {
        return Ok(());
    };
    let canonical = raw
        .iter()
        .enumerate()
        .map(|(index, entry)| canonicalize(index, entry, &flatten))
        .collect::<ConfigResult<Vec<_>>>()?;
    tracing::debug!(count = canonical.len(), "normalized build exports");

    let has_exports = !canonical.is_empty();
    build.insert(
        "exports".to_owned(),
        serde_json::to_value(canonical).into_config()?,
    );
    if has_exports {
        exclude_from_legacy_bundler(build);
    }
    Ok(())
}

fn exclude_from_legacy_bundler(build: &mut ConfigMap) {
    let Some(bundler) = build.get_mut("bundler") else {
        return;
    };
    match bundler {
        Value::Bool(true) => *bundler = json!({}),
        Value::Object(_) => {}
        _ => return,
    }
    tracing::debug!("excluding exported entries from the legacy bundler");
    merge_into(bundler, &json!({"exclude": {"*": true}}), &Overwrite);
}

fn canonicalize<F>(index: usize, entry: &ConfigTree, flatten: &F) -> ConfigResult<ExportDeclaration>
where
    F: Fn(&str) -> String,
{
    let issue = || ExportIssue::new(index, entry);
    let declaration = match entry {
        Value::String(path) => ExportDeclaration {
            name: derive_output_name(path, flatten),
            path: path.clone(),
            options: None,
        },
        Value::Object(record) => canonicalize_record(record, flatten, issue)?,
        _ => {
            return Err(ConfigError::malformed_export(
                issue(),
                "expected a path string or a record",
            ));
        }
    };
    apply_prefix(declaration, issue)
}

fn canonicalize_record<F, I>(
    record: &ConfigMap,
    flatten: &F,
    issue: I,
) -> ConfigResult<ExportDeclaration>
where
    F: Fn(&str) -> String,
    I: Fn() -> ExportIssue,
{
    let declared_name = string_field(record, "name", &issue)?;
    let declared_path = string_field(record, "path", &issue)?;
    let options = collect_options(record, &issue)?;
    match (declared_name, declared_path) {
        (Some(name), Some(path)) if path.starts_with('.') => Ok(ExportDeclaration {
            name: name.to_owned(),
            path: path.to_owned(),
            options,
        }),
        (Some(_), Some(_)) => Err(Arc::new(ConfigError::InvalidExternalExport { issue: issue() })),
        (Some(name), None) => Ok(ExportDeclaration {
            name: derive_output_name(name, flatten),
            path: name.to_owned(),
            options,
        }),
        (None, Some(path)) => Ok(ExportDeclaration {
            name: derive_output_name(path, flatten),
            path: path.to_owned(),
            options,
        }),
        (None, None) => Err(Arc::new(ConfigError::MissingExportIdentifier { issue: issue() })),
    }
}

fn apply_prefix<I>(mut declaration: ExportDeclaration, issue: I) -> ConfigResult<ExportDeclaration>
where
    I: Fn() -> ExportIssue,
{
    if declaration.name.starts_with(RESERVED_EXPORT_PREFIX) {
        return Err(Arc::new(ConfigError::ReservedPrefixCollision {
            issue: issue(),
            prefix: RESERVED_EXPORT_PREFIX,
        }));
    }
    declaration.name = format!("{RESERVED_EXPORT_PREFIX}/{}", declaration.name);
    Ok(declaration)
}

fn string_field<'a, I>(record: &'a ConfigMap, key: &str, issue: &I) -> ConfigResult<Option<&'a str>>
where
    I: Fn() -> ExportIssue,
{
    match record.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text.as_str())),
        Some(_) => Err(ConfigError::malformed_export(
            issue(),
            format!("`{key}` must be a string"),
        )),
    }
}

/// Gather `options` plus any keys besides `name`, `path` and `options`.
fn collect_options<I>(record: &ConfigMap, issue: &I) -> ConfigResult<Option<ConfigMap>>
where
    I: Fn() -> ExportIssue,
{
    let mut options = match record.get("options") {
        None | Some(Value::Null) => ConfigMap::new(),
        Some(Value::Object(map)) => map.clone(),
        Some(_) => {
            return Err(ConfigError::malformed_export(
                issue(),
                "`options` must be a record",
            ));
        }
    };
    for (key, value) in record {
        if !matches!(key.as_str(), "name" | "path" | "options") {
            options.insert(key.clone(), value.clone());
        }
    }
    Ok((!options.is_empty()).then_some(options))
}

/// Decode the normalized `build.exports` list of a resolved build-scripts
/// tree.
///
/// Returns an empty list when no exports are declared.
///
/// # Errors
///
/// Returns [`ConfigError::Decode`] when the list has not been normalized.
pub fn canonical_exports(tree: &ConfigTree) -> ConfigResult<Vec<ExportDeclaration>> {
    match tree.get("build").and_then(|build| build.get("exports")) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(exports) => Vec::<ExportDeclaration>::deserialize(exports).into_config(),
    }
}
