// src/forge/mod.rs
// =============================================================================
// Provider abstraction: one trait, one implementation per code host.
//
// The resolver picks a provider ONCE per request (provider_for) and then only
// talks to the `dyn Provider` handle. Nothing downstream matches on the
// provider type again.
//
// Implementations:
// - github:  full support (default branch, refs, contents, readme, files)
// - gitlab:  refs only, everything else reports StepOutcome::Unsupported
// - unknown: any provider string we don't recognise; URL builders fail with
//            ResolveError::InvalidProvider
// =============================================================================

mod github;
mod gitlab;
mod unknown;

pub use github::GitHub;
pub use gitlab::GitLab;
pub use unknown::UnknownProvider;

use crate::config::Endpoints;
use crate::error::Result;
use crate::http::Fetcher;
use crate::tree::{Tree, TreeEntry};
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Which code host a module lives on.
///
/// Stored as a plain string in the registry ("github", "gitlab"). Anything
/// else survives deserialization as `Unknown` so the failure happens where
/// the provider is actually used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProviderKind {
    GitHub,
    GitLab,
    Unknown(String),
}

impl From<String> for ProviderKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "github" => ProviderKind::GitHub,
            "gitlab" => ProviderKind::GitLab,
            _ => ProviderKind::Unknown(value),
        }
    }
}

impl From<ProviderKind> for String {
    fn from(kind: ProviderKind) -> Self {
        kind.to_string()
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::GitHub => write!(f, "github"),
            ProviderKind::GitLab => write!(f, "gitlab"),
            ProviderKind::Unknown(name) => write!(f, "{}", name),
        }
    }
}

/// A hosted repository: provider + org + repo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleReference {
    #[serde(rename = "type")]
    pub kind: ProviderKind,
    pub org: String,
    pub repo: String,
}

impl ModuleReference {
    pub fn new(kind: ProviderKind, org: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            kind,
            org: org.into(),
            repo: repo.into(),
        }
    }
}

/// Result of one optional pipeline step.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome<T> {
    /// The step ran and produced a value
    Ready(T),
    /// The step ran but there was nothing to produce
    Missing,
    /// The provider does not implement this step
    Unsupported,
}

/// What the contents step came back with.
#[derive(Debug, Clone, PartialEq)]
pub enum TreeFetch {
    Tree(Tree),
    /// Upstream refused; the error body, verbatim
    Failed(Value),
}

/// Decoded view of a single file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FileView {
    pub content: Option<String>,
    pub source_url: Option<String>,
}

/// Everything the resolver needs from a code host.
#[async_trait]
pub trait Provider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// Human-facing web URL of the repository.
    fn repo_url(&self, reference: &ModuleReference) -> Result<String>;

    /// API URLs that together list every branch and tag, in query order.
    fn branchtag_urls(&self, reference: &ModuleReference) -> Result<Vec<String>>;

    /// Flattens one decoded refs response into ref names. No I/O.
    fn transform_branchtags(&self, body: Value) -> Result<Vec<String>>;

    /// Headers to attach to every request made for this provider.
    fn request_headers(&self, fetcher: &Fetcher) -> HeaderMap;

    async fn default_branch(
        &self,
        fetcher: &Fetcher,
        reference: &ModuleReference,
    ) -> Result<StepOutcome<String>>;

    async fn fetch_tree(
        &self,
        fetcher: &Fetcher,
        reference: &ModuleReference,
        path: &str,
        branchtag: &str,
    ) -> Result<StepOutcome<TreeFetch>>;

    /// Fetches the README of an already sorted listing.
    async fn fetch_readme(&self, fetcher: &Fetcher, listing: &[TreeEntry]) -> Result<StepOutcome<String>>;

    fn file_view(&self, entry: &TreeEntry) -> Result<StepOutcome<FileView>>;
}

// Picks the implementation for a provider kind
pub fn provider_for(kind: &ProviderKind, endpoints: &Endpoints) -> Box<dyn Provider> {
    match kind {
        ProviderKind::GitHub => Box::new(GitHub::new(endpoints)),
        ProviderKind::GitLab => Box::new(GitLab::new(endpoints)),
        ProviderKind::Unknown(name) => Box::new(UnknownProvider::new(name.clone())),
    }
}

// Canonical web URL for a repository, e.g. https://github.com/denoland/deno
pub fn repo_url(reference: &ModuleReference, endpoints: &Endpoints) -> Result<String> {
    provider_for(&reference.kind, endpoints).repo_url(reference)
}

// Branch/tag listing URLs for a repository
pub fn branchtag_urls(reference: &ModuleReference, endpoints: &Endpoints) -> Result<Vec<String>> {
    provider_for(&reference.kind, endpoints).branchtag_urls(reference)
}
