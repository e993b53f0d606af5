//! The closed set of configuration domains and their built-in defaults.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde_json::json;

use crate::ConfigError;
use crate::collaborators::PlatformVersion;
use crate::merge::MergeMode;
use crate::tree::ConfigTree;

/// A configuration namespace with its own merge mode and source recipe.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum Domain {
    /// Linter configuration.
    Lint,
    /// Code formatter configuration.
    Format,
    /// Test runner configuration.
    Test,
    /// Transpiler presets and plugins.
    Transpile,
    /// Bundler configuration.
    Bundle,
    /// Multi-stage build descriptor.
    BuildScripts,
    /// Minifier configuration.
    Minify,
    /// Stylesheet linter configuration.
    StyleLint,
}

impl Domain {
    /// Every domain, in resolution order for [`crate::Resolver::resolve_all`].
    pub const ALL: [Self; 8] = [
        Self::Lint,
        Self::Format,
        Self::Test,
        Self::Transpile,
        Self::Bundle,
        Self::BuildScripts,
        Self::Minify,
        Self::StyleLint,
    ];

    /// The name used to request this domain.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lint => "lint",
            Self::Format => "format",
            Self::Test => "test",
            Self::Transpile => "transpile",
            Self::Bundle => "bundle",
            Self::BuildScripts => "buildScripts",
            Self::Minify => "minify",
            Self::StyleLint => "styleLint",
        }
    }

    /// The merge mode applied to this domain's layers.
    #[must_use]
    pub const fn mode(self) -> MergeMode {
        match self {
            Self::Lint | Self::Transpile | Self::StyleLint => MergeMode::ConcatUnique,
            Self::BuildScripts => MergeMode::Structural,
            Self::Format | Self::Test | Self::Bundle | Self::Minify => MergeMode::Default,
        }
    }

    /// Built-in defaults, the lowest-precedence layer of every recipe.
    ///
    /// Only the transpile defaults depend on the host: its `env` preset
    /// targets `platform` when known and the running platform otherwise.
    #[must_use]
    pub fn defaults(self, platform: Option<PlatformVersion>) -> ConfigTree {
        match self {
            Self::Lint => json!({
                "extends": ["toolchain/recommended"],
                "plugins": ["import"],
                "rules": {},
            }),
            Self::Format => json!({
                "printWidth": 80,
                "singleQuote": true,
                "trailingComma": "es5",
            }),
            Self::Test => json!({
                "testEnvironment": "node",
                "roots": ["<rootDir>/src"],
                "collectCoverage": false,
            }),
            Self::Transpile => {
                let node = platform.map_or_else(|| "current".to_owned(), |v| v.to_string());
                json!({
                    "presets": [["env", {"targets": {"node": node}}]],
                    "plugins": [],
                })
            }
            Self::Bundle => json!({
                "format": "esm",
                "sourcemap": true,
                "plugins": [],
            }),
            Self::BuildScripts => json!({
                "build": {
                    "main": null,
                    "babel": {},
                    "bundler": {},
                    "exports": null,
                },
            }),
            Self::Minify => json!({
                "compress": true,
                "mangle": true,
            }),
            Self::StyleLint => json!({
                "extends": ["stylelint-config-standard"],
                "plugins": [],
            }),
        }
    }

    fn expected_names() -> String {
        Self::ALL.map(Self::as_str).join(", ")
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Domain {
    type Err = Arc<ConfigError>;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|domain| domain.as_str() == name)
            .ok_or_else(|| {
                Arc::new(ConfigError::UnknownDomain {
                    domain: name.to_owned(),
                    expected: Self::expected_names(),
                })
            })
    }
}
