//! Helpers for reading override files into configuration trees.

mod helpers;
mod loader;
mod parser;
mod path;

pub(crate) use helpers::read_optional;
pub use loader::{ROOT_OVERRIDE_FILES, RootOverride, load_root_override};
pub(crate) use parser::parse_tree;
pub(crate) use path::same_location;
