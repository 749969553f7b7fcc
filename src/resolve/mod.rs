// src/resolve/mod.rs
// =============================================================================
// The resolver: module path in, ResolutionResult out.
//
// Steps, strictly in this order, one request at a time:
//   1. parse segment 0 into module name + optional branchtag
//   2. look the module up (not found -> minimal result, done)
//   3. pick the provider, derive the repository URL
//   4. no explicit branchtag -> ask the provider for the default branch
//   5. outside API mode: list branches/tags, build breadcrumbs
//   6. compute the repository-relative path
//   7. fetch the tree at that path (upstream errors are captured)
//   8. directory -> sort, fetch README; file -> decode content
//   9. assemble
//
// Steps communicate through Option values: once a step yields nothing, every
// step that depends on it is skipped and its fields stay None.
// =============================================================================

mod result;
mod segments;


pub use result::{Breadcrumb, ResolutionResult, ResolvedModule};
pub use segments::{build_breadcrumbs, parse_module_segment, repo_path, split_module_path, ModuleSegment};

use crate::branchtag::fetch_branchtags;
use crate::config::{Config, Endpoints};
use crate::error::{ResolveError, Result};
use crate::forge::{provider_for, Provider, StepOutcome, TreeFetch};
use crate::http::{Fetcher, HeaderProvider};
use crate::registry::ModuleLookup;
use crate::tree::{sort_listing, Tree};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

/// Input of one resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveRequest {
    pub segments: Vec<String>,
    /// API mode skips branch/tag listing and breadcrumbs
    pub is_api: bool,
}

impl ResolveRequest {
    pub fn new(segments: Vec<String>, is_api: bool) -> Self {
        Self { segments, is_api }
    }

    // Builds a request from a raw "oak@v1/src/mod.ts" path
    pub fn from_path(path: &str, is_api: bool) -> Self {
        Self::new(split_module_path(path), is_api)
    }
}

pub struct Resolver<L> {
    lookup: L,
    fetcher: Fetcher,
    endpoints: Endpoints,
}

impl<L: ModuleLookup> Resolver<L> {
    pub fn new(lookup: L, fetcher: Fetcher, endpoints: Endpoints) -> Self {
        Self {
            lookup,
            fetcher,
            endpoints,
        }
    }

    pub fn from_config(lookup: L, config: &Config, headers: Arc<dyn HeaderProvider>) -> Result<Self> {
        let fetcher = Fetcher::new(config, headers)?;
        Ok(Self::new(lookup, fetcher, config.endpoints.clone()))
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    // Resolves a module path into its metadata bundle
    //
    // Errors propagate, except a failed contents request, which ends up in
    // ResolutionResult::errors. A module that is not registered is a normal
    // result, see ResolutionResult::not_found.
    pub async fn resolve(&self, request: &ResolveRequest) -> Result<ResolutionResult> {
        let segments = request.segments.clone();
        let first = segments.first().ok_or(ResolveError::MissingModuleSegment)?;
        let ModuleSegment { name, branchtag } = parse_module_segment(first)?;

        info!(module = %name, branchtag = ?branchtag, api = request.is_api, "resolving module path");

        let Some(reference) = self.lookup.lookup(&name).await? else {
            debug!(module = %name, "module not registered");
            return Ok(ResolutionResult::not_found(segments));
        };

        let provider = provider_for(&reference.kind, &self.endpoints);
        let module = ResolvedModule {
            repo_url: provider.repo_url(&reference)?,
            name,
            reference,
        };

        let mut pipeline = Pipeline::new(&self.fetcher, provider.as_ref(), &module);

        let branchtag = pipeline.branchtag(branchtag).await?;

        let (branchtags, breadcrumbs) = if request.is_api {
            (None, None)
        } else {
            let refs = pipeline.branchtags().await?;
            (Some(refs), Some(build_breadcrumbs(&segments)))
        };

        let path = repo_path(&segments);

        let (mut tree, errors) = pipeline.tree(&path, branchtag.as_deref()).await?;

        let details = match tree.as_mut() {
            Some(tree) => pipeline.details(tree).await?,
            None => Details::default(),
        };

        let unsupported = pipeline.finish();

        Ok(ResolutionResult {
            segments,
            module: Some(module),
            branchtag,
            branchtags,
            breadcrumbs,
            path: Some(path),
            tree,
            readme: details.readme,
            content: details.content,
            source_url: details.source_url,
            errors,
            unsupported,
        })
    }

    // Branch and tag names of a registered module, None if it isn't registered
    pub async fn branchtags_for(&self, name: &str) -> Result<Option<Vec<String>>> {
        let Some(reference) = self.lookup.lookup(name).await? else {
            return Ok(None);
        };
        let provider = provider_for(&reference.kind, &self.endpoints);
        let names = fetch_branchtags(&self.fetcher, provider.as_ref(), &reference).await?;
        Ok(Some(names))
    }
}

// What step 8 produces
#[derive(Debug, Default)]
struct Details {
    readme: Option<String>,
    content: Option<String>,
    source_url: Option<String>,
}

// Per-request state shared by the steps that talk to the provider
struct Pipeline<'a> {
    fetcher: &'a Fetcher,
    provider: &'a dyn Provider,
    module: &'a ResolvedModule,
    unsupported: Vec<String>,
}

impl<'a> Pipeline<'a> {
    fn new(fetcher: &'a Fetcher, provider: &'a dyn Provider, module: &'a ResolvedModule) -> Self {
        Self {
            fetcher,
            provider,
            module,
            unsupported: Vec::new(),
        }
    }

    // Turns a step outcome into an Option, remembering unsupported steps
    fn settle<T>(&mut self, step: &str, outcome: StepOutcome<T>) -> Option<T> {
        match outcome {
            StepOutcome::Ready(value) => Some(value),
            StepOutcome::Missing => None,
            StepOutcome::Unsupported => {
                debug!(step, provider = %self.provider.kind(), "step not supported by provider");
                self.unsupported.push(step.to_string());
                None
            }
        }
    }

    // Step 4: explicit branchtag wins, otherwise ask the provider
    async fn branchtag(&mut self, explicit: Option<String>) -> Result<Option<String>> {
        if explicit.is_some() {
            return Ok(explicit);
        }
        let outcome = self
            .provider
            .default_branch(self.fetcher, &self.module.reference)
            .await?;
        Ok(self.settle("default_branch", outcome))
    }

    // Step 5 (network half)
    async fn branchtags(&mut self) -> Result<Vec<String>> {
        fetch_branchtags(self.fetcher, self.provider, &self.module.reference).await
    }

    // Step 7: returns (tree, captured upstream error)
    async fn tree(&mut self, path: &str, branchtag: Option<&str>) -> Result<(Option<Tree>, Option<Value>)> {
        let Some(branchtag) = branchtag else {
            debug!("no branchtag resolved, skipping tree");
            return Ok((None, None));
        };

        let outcome = self
            .provider
            .fetch_tree(self.fetcher, &self.module.reference, path, branchtag)
            .await?;

        Ok(match self.settle("tree", outcome) {
            Some(TreeFetch::Tree(tree)) => (Some(tree), None),
            Some(TreeFetch::Failed(body)) => (None, Some(body)),
            None => (None, None),
        })
    }

    // Step 8: README for directories, decoded content for files
    async fn details(&mut self, tree: &mut Tree) -> Result<Details> {
        match tree {
            Tree::Listing(entries) => {
                sort_listing(entries);
                let outcome = self.provider.fetch_readme(self.fetcher, entries).await?;
                Ok(Details {
                    readme: self.settle("readme", outcome),
                    ..Default::default()
                })
            }
            Tree::File(entry) => {
                let outcome = self.provider.file_view(entry)?;
                let view = self.settle("content", outcome).unwrap_or_default();
                Ok(Details {
                    content: view.content,
                    source_url: view.source_url,
                    ..Default::default()
                })
            }
        }
    }

    fn finish(self) -> Vec<String> {
        self.unsupported
    }
}
