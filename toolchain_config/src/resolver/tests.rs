//! Unit tests for domain resolution against in-memory collaborators.

use std::cell::Cell;
use std::collections::BTreeMap;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use rstest::{fixture, rstest};
use serde_json::json;

use super::*;
use crate::collaborators::{PlatformVersion, flatten_package_path};
use crate::merge::WholeValueIdentity;
use crate::{ConfigError, ConfigResult};

enum RootFile {
    Missing,
    Present(ConfigTree),
    Broken,
}

struct FakeCollaborators {
    cwd: Utf8PathBuf,
    root: Option<Utf8PathBuf>,
    root_file: RootFile,
    user: BTreeMap<Domain, ConfigTree>,
    platform: Option<PlatformVersion>,
    root_lookups: Cell<usize>,
    root_reads: Cell<usize>,
}

impl FakeCollaborators {
    fn at(cwd: &str) -> Self {
        Self {
            cwd: Utf8PathBuf::from(cwd),
            root: None,
            root_file: RootFile::Missing,
            user: BTreeMap::new(),
            platform: None,
            root_lookups: Cell::new(0),
            root_reads: Cell::new(0),
        }
    }

    fn with_root(mut self, root: &str, file: RootFile) -> Self {
        self.root = Some(Utf8PathBuf::from(root));
        self.root_file = file;
        self
    }

    fn with_user(mut self, domain: Domain, tree: ConfigTree) -> Self {
        self.user.insert(domain, tree);
        self
    }

    fn with_platform(mut self, version: PlatformVersion) -> Self {
        self.platform = Some(version);
        self
    }
}

impl Collaborators for FakeCollaborators {
    fn current_dir(&self) -> ConfigResult<Utf8PathBuf> {
        Ok(self.cwd.clone())
    }

    fn find_project_root(&self) -> Option<Utf8PathBuf> {
        self.root_lookups.set(self.root_lookups.get() + 1);
        self.root.clone()
    }

    fn load_root_override(&self, root: &Utf8Path) -> RootOverride {
        self.root_reads.set(self.root_reads.get() + 1);
        let path = root.join("toolchain.config.toml");
        match &self.root_file {
            RootFile::Missing => RootOverride::NotFound,
            RootFile::Present(tree) => RootOverride::Found {
                tree: tree.clone(),
                path,
            },
            RootFile::Broken => RootOverride::Failed(ConfigError::override_load(
                &path,
                io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
            )),
        }
    }

    fn load_user_override(&self, domain: Domain) -> ConfigResult<ConfigTree> {
        Ok(self.user.get(&domain).cloned().unwrap_or_else(|| json!({})))
    }

    fn detect_platform_version(&self) -> Option<PlatformVersion> {
        self.platform
    }

    fn flatten_path(&self, path: &str) -> String {
        flatten_package_path(path)
    }
}

#[fixture]
fn package() -> FakeCollaborators {
    FakeCollaborators::at("/repo/packages/app")
}

#[rstest]
fn unknown_domain_is_rejected(package: FakeCollaborators) {
    let err = Resolver::new(package)
        .resolve("madeUpDomain", None)
        .expect_err("unknown domain");
    assert!(matches!(&*err, ConfigError::UnknownDomain { domain, .. } if domain == "madeUpDomain"));
}

#[rstest]
fn lint_concatenates_user_plugins(package: FakeCollaborators) {
    let collaborators = package.with_user(Domain::Lint, json!({"plugins": ["import", "react"]}));
    let plugins = Resolver::new(collaborators)
        .resolve("lint", Some("plugins"))
        .expect("lint resolves");
    assert_eq!(plugins, json!(["import", "react"]));
}

#[rstest]
fn format_user_value_wins(package: FakeCollaborators) {
    let collaborators = package.with_user(Domain::Format, json!({"printWidth": 100}));
    let tree = Resolver::new(collaborators)
        .resolve("format", None)
        .expect("format resolves");
    assert_eq!(
        tree,
        json!({"printWidth": 100, "singleQuote": true, "trailingComma": "es5"})
    );
}

#[rstest]
#[case::detected(Some(PlatformVersion::new(20, 11)), "20.11")]
#[case::unknown(None, "current")]
fn transpile_targets_the_platform(
    package: FakeCollaborators,
    #[case] version: Option<PlatformVersion>,
    #[case] expected: &str,
) {
    let mut collaborators = package;
    collaborators.platform = version;
    let presets = Resolver::new(collaborators)
        .resolve("transpile", Some("presets"))
        .expect("transpile resolves");
    assert_eq!(presets, json!([["env", {"targets": {"node": expected}}]]));
}

#[test]
fn pinned_platform_version_is_not_redetected() {
    let collaborators = FakeCollaborators::at("/repo").with_platform(PlatformVersion::new(18, 0));
    let context = ResolveContext::new().with_platform_version(Some(PlatformVersion::new(22, 3)));
    let presets = Resolver::with_context(collaborators, context)
        .resolve("transpile", Some("presets"))
        .expect("transpile resolves");
    assert_eq!(presets, json!([["env", {"targets": {"node": "22.3"}}]]));
}

#[test]
fn build_scripts_without_root_use_defaults_and_user() {
    let collaborators = FakeCollaborators::at("/repo/app")
        .with_user(Domain::BuildScripts, json!({"build": {"bundler": {"minify": true}}}));
    let tree = Resolver::new(collaborators)
        .resolve("buildScripts", None)
        .expect("build scripts resolve");
    assert_eq!(
        tree,
        json!({"build": {
            "main": null,
            "babel": {},
            "bundler": {"minify": true},
            "exports": null,
        }})
    );
}

#[test]
fn root_override_sits_between_defaults_and_user() {
    let collaborators = FakeCollaborators::at("/repo/packages/app")
        .with_root(
            "/repo",
            RootFile::Present(json!({"build": {"bundler": {"target": "es2019", "minify": false}}})),
        )
        .with_user(Domain::BuildScripts, json!({"build": {"bundler": {"minify": true}}}));
    let bundler = Resolver::new(collaborators)
        .resolve("buildScripts", Some("build"))
        .expect("build scripts resolve");
    assert_eq!(bundler.get("bundler"), Some(&json!({"target": "es2019", "minify": true})));
}

#[test]
fn user_override_is_skipped_at_the_root() {
    let collaborators = FakeCollaborators::at("/repo")
        .with_root("/repo", RootFile::Present(json!({"build": {"babel": false}})))
        .with_user(Domain::BuildScripts, json!({"build": {"babel": {"plugins": ["x"]}}}));
    let build = Resolver::new(collaborators)
        .resolve("buildScripts", Some("build"))
        .expect("build scripts resolve");
    assert_eq!(build.get("babel"), Some(&json!(false)));
}

#[test]
fn missing_root_override_is_recovered() {
    let collaborators = FakeCollaborators::at("/repo/app").with_root("/repo", RootFile::Missing);
    let resolver = Resolver::new(collaborators);
    let build = resolver
        .resolve("buildScripts", Some("build"))
        .expect("build scripts resolve");
    assert_eq!(build.get("bundler"), Some(&json!({})));
    assert_eq!(resolver.collaborators().root_reads.get(), 1);
}

#[test]
fn broken_root_override_is_fatal() {
    let collaborators = FakeCollaborators::at("/repo/app").with_root("/repo", RootFile::Broken);
    let err = Resolver::new(collaborators)
        .resolve("buildScripts", None)
        .expect_err("load failure");
    assert!(matches!(
        &*err,
        ConfigError::OverrideLoadFailure { path, .. } if path == "/repo/toolchain.config.toml"
    ));
}

#[test]
fn single_entry_build_disables_sibling_stages() {
    let collaborators = FakeCollaborators::at("/repo/app").with_root(
        "/repo",
        RootFile::Present(json!({"build": {
            "main": "src/index.js",
            "babel": {"plugins": ["macros"]},
            "bundler": {"target": "es2019"},
        }})),
    );
    let resolver = Resolver::new(collaborators);

    let build = resolver
        .resolve("buildScripts", Some("build"))
        .expect("build scripts resolve");
    assert_eq!(
        build,
        json!({"main": "src/index.js", "babel": false, "bundler": false, "exports": []})
    );

    let plugins = resolver
        .resolve("transpile", Some("plugins"))
        .expect("transpile resolves");
    assert_eq!(plugins, json!([]));
    let bundle = resolver.resolve("bundle", None).expect("bundle resolves");
    assert_eq!(bundle.get("target"), None);
}

#[test]
fn babel_stage_feeds_transpile() {
    let collaborators = FakeCollaborators::at("/repo/app")
        .with_root("/repo", RootFile::Present(json!({"build": {"babel": {"plugins": ["macros"]}}})))
        .with_user(Domain::Transpile, json!({"plugins": ["macros", "decorators"]}));
    let plugins = Resolver::new(collaborators)
        .resolve("transpile", Some("plugins"))
        .expect("transpile resolves");
    assert_eq!(plugins, json!(["macros", "decorators"]));
}

#[test]
fn exported_entries_are_excluded_from_the_bundle() {
    let collaborators = FakeCollaborators::at("/repo/app").with_root(
        "/repo",
        RootFile::Present(json!({"build": {"exports": ["foo/bar", "styles/app.css"]}})),
    );
    let resolver = Resolver::new(collaborators);

    let exports = resolver
        .resolve("buildScripts", Some("build"))
        .expect("build scripts resolve")
        .get("exports")
        .cloned();
    assert_eq!(
        exports,
        Some(json!([
            {"name": "@toolchain-internal/exports/foo_bar", "path": "foo/bar"},
            {"name": "@toolchain-internal/css/styles_app", "path": "styles/app.css"},
        ]))
    );

    let exclude = resolver
        .resolve("bundle", Some("exclude"))
        .expect("bundle resolves");
    assert_eq!(exclude, json!({"*": true}));
}

#[test]
fn export_errors_surface_through_dependent_domains() {
    let collaborators = FakeCollaborators::at("/repo/app").with_root(
        "/repo",
        RootFile::Present(json!({"build": {"exports": [{"name": "@toolchain-internal/exports/x", "path": "./x"}]}})),
    );
    let err = Resolver::new(collaborators)
        .resolve("bundle", None)
        .expect_err("reserved prefix");
    assert!(matches!(&*err, ConfigError::ReservedPrefixCollision { .. }));
}

#[rstest]
fn transpile_exclusions_are_applied_and_removed(package: FakeCollaborators) {
    let collaborators = package.with_user(
        Domain::Transpile,
        json!({
            "presets": ["react"],
            "$exclusions": {"presets": ["env"]},
        }),
    );
    let tree = Resolver::new(collaborators)
        .resolve("transpile", None)
        .expect("transpile resolves");
    assert_eq!(tree, json!({"presets": ["react"], "plugins": []}));
}

#[rstest]
fn whole_value_identity_keeps_differently_configured_presets(package: FakeCollaborators) {
    let collaborators = package.with_user(Domain::Transpile, json!({"presets": ["env"]}));
    let presets = Resolver::new(collaborators)
        .with_identity_policy(WholeValueIdentity)
        .resolve("transpile", Some("presets"))
        .expect("transpile resolves");
    assert_eq!(
        presets,
        json!([["env", {"targets": {"node": "current"}}], "env"])
    );
}

#[rstest]
fn missing_property_lists_available_keys(package: FakeCollaborators) {
    let err = Resolver::new(package)
        .resolve("minify", Some("sourceMap"))
        .expect_err("missing property");
    let ConfigError::MissingProperty { requested, available } = &*err else {
        panic!("unexpected error {err:?}");
    };
    assert_eq!(requested, "sourceMap");
    assert_eq!(available, &["compress".to_owned(), "mangle".to_owned()]);
}

#[test]
fn resolve_all_covers_every_domain_and_discovers_the_root_once() {
    let collaborators = FakeCollaborators::at("/repo/app").with_root("/repo", RootFile::Missing);
    let resolver = Resolver::new(collaborators);
    let all = resolver.resolve_all().expect("all domains resolve");

    let names: Vec<_> = all.keys().map(String::as_str).collect();
    assert_eq!(names, Domain::ALL.map(Domain::as_str));
    assert_eq!(resolver.collaborators().root_lookups.get(), 1);
}

#[test]
fn pinned_missing_root_skips_discovery() {
    let collaborators = FakeCollaborators::at("/repo/app").with_root("/repo", RootFile::Broken);
    let context = ResolveContext::new().with_project_root(None);
    let resolver = Resolver::with_context(collaborators, context);
    resolver
        .resolve("buildScripts", None)
        .expect("no root means no override read");
    assert_eq!(resolver.collaborators().root_lookups.get(), 0);
    assert_eq!(resolver.collaborators().root_reads.get(), 0);
}
