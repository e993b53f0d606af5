//! Format-specific parsing for override files.

use std::error::Error;

use camino::Utf8Path;
use figment::{
    Figment,
    providers::{Format, Json, Toml},
};

use crate::tree::ConfigTree;

/// Parse override data according to the file extension.
///
/// `.json` files are read as JSON; everything else as TOML. The data is
/// syntax-checked first so failures report the parser's own position
/// information before Figment performs its pass.
///
/// # Errors
///
/// Returns the parser or extraction error when `data` is not a valid
/// mapping in the detected format.
pub(crate) fn parse_tree(
    path: &Utf8Path,
    data: &str,
) -> Result<ConfigTree, Box<dyn Error + Send + Sync>> {
    let ext = path.extension().map(str::to_ascii_lowercase);
    let figment = if ext.as_deref() == Some("json") {
        serde_json::from_str::<serde_json::Value>(data)?;
        Figment::from(Json::string(data))
    } else {
        toml::from_str::<toml::Value>(data)?;
        Figment::from(Toml::string(data))
    };
    Ok(figment.extract::<ConfigTree>()?)
}
