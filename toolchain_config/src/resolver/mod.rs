//! Per-domain orchestration of sources, merging and post-passes.
//!
//! A [`Resolver`] assembles the layers a domain is built from, merges them
//! with the domain's [`MergeMode`](crate::merge::MergeMode), runs the
//! domain's post-pass and finally plucks the requested property.
//!
//! | Domain         | Extra layers between defaults and user override |
//! | -------------- | ----------------------------------------------- |
//! | `transpile`    | `build.babel` from the resolved build scripts   |
//! | `bundle`       | `build.bundler` from the resolved build scripts |
//! | `buildScripts` | the root override, when a root is found         |
//!
//! Build scripts skip the user override when resolving at the project root,
//! since the root override already plays that part.

mod context;

pub use context::ResolveContext;

use serde_json::Value;
use tracing::debug;

use crate::collaborators::Collaborators;
use crate::domain::Domain;
use crate::exclusion::{Exclusions, filter_tree};
use crate::exports::normalize_build_scripts;
use crate::extract::pluck;
use crate::file::{RootOverride, same_location};
use crate::merge::{FirstElementIdentity, IdentityPolicy, MergeComposer, StrategyTable};
use crate::tree::{ConfigMap, ConfigTree};
use crate::ConfigResult;

/// Resolves domain configurations against a set of collaborators.
pub struct Resolver<C> {
    collaborators: C,
    context: ResolveContext,
    identity: Box<dyn IdentityPolicy>,
}

impl<C: Collaborators> Resolver<C> {
    /// Create a resolver with an empty [`ResolveContext`].
    #[must_use]
    pub fn new(collaborators: C) -> Self {
        Self::with_context(collaborators, ResolveContext::new())
    }

    /// Create a resolver reusing a caller-provided context.
    #[must_use]
    pub fn with_context(collaborators: C, context: ResolveContext) -> Self {
        Self {
            collaborators,
            context,
            identity: Box::new(FirstElementIdentity),
        }
    }

    /// Replace the identity policy used by
    /// [`MergeMode::ConcatUnique`](crate::merge::MergeMode::ConcatUnique) and by
    /// the transpile exclusion filter.
    #[must_use]
    pub fn with_identity_policy(mut self, policy: impl IdentityPolicy + 'static) -> Self {
        self.identity = Box::new(policy);
        self
    }

    /// The collaborators this resolver consults.
    #[must_use]
    pub const fn collaborators(&self) -> &C {
        &self.collaborators
    }

    /// The memoized context.
    #[must_use]
    pub const fn context(&self) -> &ResolveContext {
        &self.context
    }

    /// Resolve the domain named `domain`, optionally plucking `property`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ConfigError::UnknownDomain`] for unrecognised names,
    /// plus any error [`Resolver::resolve_domain`] reports.
    pub fn resolve(&self, domain: &str, property: Option<&str>) -> ConfigResult<ConfigTree> {
        let parsed: Domain = domain.parse()?;
        self.resolve_domain(parsed, property)
    }

    /// Resolve `domain`, optionally plucking `property`.
    ///
    /// # Errors
    ///
    /// Propagates override loading failures, export normalization failures
    /// and [`crate::ConfigError::MissingProperty`] when `property` is absent.
    pub fn resolve_domain(&self, domain: Domain, property: Option<&str>) -> ConfigResult<ConfigTree> {
        let tree = self.resolve_tree(domain)?;
        pluck(tree, property)
    }

    /// Resolve every domain, keyed by its canonical name.
    ///
    /// # Errors
    ///
    /// Stops at the first domain that fails to resolve.
    pub fn resolve_all(&self) -> ConfigResult<ConfigMap> {
        let mut all = ConfigMap::new();
        for domain in Domain::ALL {
            all.insert(domain.as_str().to_owned(), self.resolve_tree(domain)?);
        }
        Ok(all)
    }

    fn resolve_tree(&self, domain: Domain) -> ConfigResult<ConfigTree> {
        let composer = self.compose(domain)?;
        let strategies = StrategyTable::new(&*self.identity);
        debug!(%domain, mode = %domain.mode(), layers = composer.len(), "merging domain");
        let mut tree = composer.merge(strategies.get(domain.mode()));
        self.post_pass(domain, &mut tree)?;
        Ok(tree)
    }

    fn compose(&self, domain: Domain) -> ConfigResult<MergeComposer> {
        let platform = self.context.platform_version(&self.collaborators);
        let mut composer = MergeComposer::new();
        composer.push_defaults(domain.defaults(platform));
        let include_user = match domain {
            Domain::Transpile => {
                self.push_stage(&mut composer, domain, "babel")?;
                true
            }
            Domain::Bundle => {
                self.push_stage(&mut composer, domain, "bundler")?;
                true
            }
            Domain::BuildScripts => self.push_root_override(&mut composer)?,
            _ => true,
        };
        if include_user {
            composer.push_user_override(self.collaborators.load_user_override(domain)?);
        }
        Ok(composer)
    }

    /// Push the build-scripts stage `stage` as a sibling layer when it is a
    /// mapping. Disabled stages contribute nothing.
    fn push_stage(&self, composer: &mut MergeComposer, domain: Domain, stage: &str) -> ConfigResult<()> {
        let mut scripts = self.resolve_tree(Domain::BuildScripts)?;
        match scripts.pointer_mut(&format!("/build/{stage}")).map(Value::take) {
            Some(sub_tree @ Value::Object(_)) => {
                debug!(%domain, stage, "layering build-scripts stage");
                composer.push_sibling(Domain::BuildScripts, sub_tree);
            }
            _ => debug!(%domain, stage, "build-scripts stage disabled"),
        }
        Ok(())
    }

    /// Push the root override and report whether the user override still
    /// applies.
    fn push_root_override(&self, composer: &mut MergeComposer) -> ConfigResult<bool> {
        let Some(root) = self.context.project_root(&self.collaborators) else {
            return Ok(true);
        };
        match self.collaborators.load_root_override(root) {
            RootOverride::Found { tree, path } => {
                debug!(%path, "loaded root override");
                composer.push_root_override(tree, path);
            }
            RootOverride::NotFound => debug!(%root, "no root override; using defaults"),
            RootOverride::Failed(err) => return Err(err),
        }
        let cwd = self.context.current_dir(&self.collaborators)?;
        Ok(!same_location(cwd, root))
    }

    fn post_pass(&self, domain: Domain, tree: &mut ConfigTree) -> ConfigResult<()> {
        match domain {
            Domain::BuildScripts => {
                normalize_build_scripts(tree, |path: &str| self.collaborators.flatten_path(path))
            }
            Domain::Transpile => {
                if let Some(exclusions) = Exclusions::take_from(tree) {
                    let removed = filter_tree(tree, &exclusions, &*self.identity);
                    debug!(removed, "applied transpile exclusions");
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

impl<C> std::fmt::Debug for Resolver<C>
where
    C: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("collaborators", &self.collaborators)
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
