//! End-to-end resolution against on-disk projects.

use anyhow::{Result, anyhow, bail, ensure};
use rstest::{fixture, rstest};
use serde_json::json;
use serial_test::serial;
use test_helpers::{cwd, env as test_env, project::TempProject};
use toolchain_config::collaborators::{PLATFORM_VERSION_ENV, ROOT_MARKER, USER_OVERRIDE_FILE};
use toolchain_config::exports::canonical_exports;
use toolchain_config::{Collaborators, ConfigError, FsCollaborators, Resolver};

const ROOT_EXPORTS: &str = r#"
[build]
exports = ["./src/widget.js", { name = "left-pad" }]

[build.babel]
plugins = ["macros"]
"#;

#[fixture]
fn monorepo() -> Result<TempProject> {
    let project = TempProject::new()?;
    project.write("toolchain.config.toml", ROOT_EXPORTS)?;
    project.create_dir("packages/app")?;
    Ok(project)
}

fn resolver_at(project: &TempProject, relative: &str) -> Resolver<FsCollaborators> {
    let cwd = if relative.is_empty() {
        project.root().to_path_buf()
    } else {
        project.root().join(relative)
    };
    Resolver::new(FsCollaborators::new(cwd))
}

#[rstest]
fn package_inherits_root_exports(monorepo: Result<TempProject>) -> Result<()> {
    let project = monorepo?;
    let resolver = resolver_at(&project, "packages/app");

    let scripts = resolver
        .resolve("buildScripts", None)
        .map_err(|e| anyhow!("{e}"))?;
    let exports = canonical_exports(&scripts).map_err(|e| anyhow!("{e}"))?;
    let names: Vec<_> = exports.iter().map(|d| d.name.as_str()).collect();
    ensure!(
        names
            == [
                "@toolchain-internal/exports/src_widget.js",
                "@toolchain-internal/exports/left-pad",
            ],
        "unexpected export names {names:?}"
    );

    let exclude = resolver
        .resolve("bundle", Some("exclude"))
        .map_err(|e| anyhow!("{e}"))?;
    ensure!(exclude == json!({"*": true}), "bundle exclude {exclude}");

    let plugins = resolver
        .resolve("transpile", Some("plugins"))
        .map_err(|e| anyhow!("{e}"))?;
    ensure!(plugins == json!(["macros"]), "transpile plugins {plugins}");
    Ok(())
}

#[rstest]
fn package_override_applies_below_the_root(monorepo: Result<TempProject>) -> Result<()> {
    let project = monorepo?;
    project.write(
        &format!("packages/app/{USER_OVERRIDE_FILE}"),
        "[buildScripts.build]\nmain = \"src/index.js\"\n\n[lint]\nplugins = [\"react\"]\n",
    )?;
    let resolver = resolver_at(&project, "packages/app");

    let build = resolver
        .resolve("buildScripts", Some("build"))
        .map_err(|e| anyhow!("{e}"))?;
    ensure!(build.get("babel") == Some(&json!(false)), "build {build}");
    ensure!(build.get("bundler") == Some(&json!(false)), "build {build}");

    let plugins = resolver
        .resolve("lint", Some("plugins"))
        .map_err(|e| anyhow!("{e}"))?;
    ensure!(plugins == json!(["import", "react"]), "lint plugins {plugins}");
    Ok(())
}

#[rstest]
fn root_ignores_its_own_user_override(monorepo: Result<TempProject>) -> Result<()> {
    let project = monorepo?;
    project.write(USER_OVERRIDE_FILE, "[buildScripts.build]\nmain = \"src/index.js\"\n")?;

    let build = resolver_at(&project, "")
        .resolve("buildScripts", Some("build"))
        .map_err(|e| anyhow!("{e}"))?;
    ensure!(build.get("main") == Some(&json!(null)), "build {build}");
    Ok(())
}

#[test]
fn json_root_override_is_used_when_toml_is_absent() -> Result<()> {
    let project = TempProject::new()?;
    project.write(
        "toolchain.config.json",
        r#"{"build": {"bundler": {"target": "es2019"}}}"#,
    )?;
    project.create_dir("web")?;

    let target = resolver_at(&project, "web")
        .resolve("bundle", Some("target"))
        .map_err(|e| anyhow!("{e}"))?;
    ensure!(target == json!("es2019"), "bundle target {target}");
    Ok(())
}

#[test]
fn marker_without_override_falls_back_to_defaults() -> Result<()> {
    let project = TempProject::new()?;
    project.write(ROOT_MARKER, "")?;
    let package = project.create_dir("packages/lib")?;

    let collaborators = FsCollaborators::new(&package);
    ensure!(collaborators.find_project_root().as_deref() == Some(project.root()));

    let build = Resolver::new(collaborators)
        .resolve("buildScripts", Some("build"))
        .map_err(|e| anyhow!("{e}"))?;
    ensure!(
        build == json!({"main": null, "babel": {}, "bundler": {}, "exports": null}),
        "build {build}"
    );
    Ok(())
}

#[test]
fn malformed_root_override_names_the_file() -> Result<()> {
    let project = TempProject::new()?;
    project.write("toolchain.config.toml", "[build\nmain = 1\n")?;
    project.create_dir("app")?;

    let Err(err) = resolver_at(&project, "app").resolve("buildScripts", None) else {
        bail!("expected a load failure");
    };
    ensure!(
        matches!(&*err, ConfigError::OverrideLoadFailure { path, .. }
            if path.ends_with("toolchain.config.toml")),
        "unexpected error {err:?}"
    );
    Ok(())
}

#[rstest]
#[case::reserved_prefix("[build]\nexports = [{ name = \"@toolchain-internal/exports/x\", path = \"./x\" }]\n")]
#[case::external_path("[build]\nexports = [{ name = \"x\", path = \"lib/x.js\" }]\n")]
fn invalid_exports_fail_every_dependent_domain(#[case] root: &str) -> Result<()> {
    let project = TempProject::new()?;
    project.write("toolchain.config.toml", root)?;
    let resolver = resolver_at(&project, "");
    for domain in ["buildScripts", "bundle", "transpile"] {
        ensure!(resolver.resolve(domain, None).is_err(), "{domain} resolved");
    }
    ensure!(resolver.resolve("lint", None).is_ok(), "lint failed");
    Ok(())
}

#[test]
fn transpile_exclusions_from_user_override() -> Result<()> {
    let project = TempProject::new()?;
    project.write(
        USER_OVERRIDE_FILE,
        "[transpile]\npresets = [\"react\"]\n\n[transpile.\"$exclusions\"]\npresets = [\"env\"]\n",
    )?;

    let tree = resolver_at(&project, "")
        .resolve("transpile", None)
        .map_err(|e| anyhow!("{e}"))?;
    ensure!(
        tree == json!({"presets": ["react"], "plugins": []}),
        "transpile {tree}"
    );
    Ok(())
}

#[test]
fn unknown_domain_lists_the_known_ones() -> Result<()> {
    let project = TempProject::new()?;
    let Err(err) = resolver_at(&project, "").resolve("madeUpDomain", None) else {
        bail!("expected an unknown domain error");
    };
    let rendered = err.to_string();
    ensure!(rendered.contains("madeUpDomain"), "{rendered}");
    ensure!(rendered.contains("buildScripts"), "{rendered}");
    Ok(())
}

#[test]
#[serial]
fn platform_version_targets_transpile_presets() -> Result<()> {
    let _guard = test_env::set_var(PLATFORM_VERSION_ENV, "v20.11.1");
    let project = TempProject::new()?;

    let presets = resolver_at(&project, "")
        .resolve("transpile", Some("presets"))
        .map_err(|e| anyhow!("{e}"))?;
    ensure!(
        presets == json!([["env", {"targets": {"node": "20.11"}}]]),
        "presets {presets}"
    );
    Ok(())
}

#[test]
#[serial]
fn collaborators_follow_the_process_working_directory() -> Result<()> {
    let project = TempProject::new()?;
    project.write(ROOT_MARKER, "")?;
    let package = project.create_dir("packages/app")?;
    let guard = cwd::set_dir(&package)?;

    let collaborators = FsCollaborators::from_current_dir().map_err(|e| anyhow!("{e}"))?;
    let found = collaborators.find_project_root();
    guard.restore()?;

    let root = found.ok_or_else(|| anyhow!("no project root found"))?;
    ensure!(
        root.file_name() == project.root().file_name(),
        "root {root} differs from {}",
        project.root()
    );
    Ok(())
}

#[test]
fn resolve_all_reports_every_domain() -> Result<()> {
    let project = TempProject::new()?;
    let all = resolver_at(&project, "")
        .resolve_all()
        .map_err(|e| anyhow!("{e}"))?;
    let names: Vec<_> = all.keys().map(String::as_str).collect();
    ensure!(
        names
            == [
                "lint",
                "format",
                "test",
                "transpile",
                "bundle",
                "buildScripts",
                "minify",
                "styleLint",
            ],
        "domains {names:?}"
    );
    Ok(())
}
