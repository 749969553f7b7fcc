// src/forge/github.rs
// =============================================================================
// GitHub implementation of Provider, on top of the GitHub REST API v3.
//
// Endpoints used:
//   GET /repos/{org}/{repo}                          default branch
//   GET /repos/{org}/{repo}/branches                 branch names
//   GET /repos/{org}/{repo}/tags                     tag names
//   GET /repos/{org}/{repo}/contents{path}?ref={bt}  directory or file
//   GET {download_url}                               raw README bytes
//
// Every request carries the headers from the HeaderProvider (token auth).
// =============================================================================

use super::{FileView, ModuleReference, Provider, ProviderKind, StepOutcome, TreeFetch};
use crate::config::Endpoints;
use crate::error::Result;
use crate::http::Fetcher;
use crate::tree::{decode_content, find_readme, Tree, TreeEntry};
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

// Element of /branches and /tags; both carry more fields, we only need `name`
#[derive(Debug, Deserialize)]
struct NamedRef {
    name: String,
}

// The slice of /repos/{org}/{repo} we care about
#[derive(Debug, Deserialize)]
struct RepoMetadata {
    default_branch: String,
}

pub struct GitHub {
    api: String,
    web: String,
}

impl GitHub {
    pub fn new(endpoints: &Endpoints) -> Self {
        Self {
            api: endpoints.github_api.clone(),
            web: endpoints.github_web.clone(),
        }
    }

    fn repo_api(&self, reference: &ModuleReference) -> String {
        format!("{}/repos/{}/{}", self.api, reference.org, reference.repo)
    }

    // Contents URL; `path` always starts with '/'
    fn contents_url(&self, reference: &ModuleReference, path: &str) -> String {
        format!("{}/contents{}", self.repo_api(reference), path)
    }
}

#[async_trait]
impl Provider for GitHub {
    fn kind(&self) -> ProviderKind {
        ProviderKind::GitHub
    }

    fn repo_url(&self, reference: &ModuleReference) -> Result<String> {
        Ok(format!("{}/{}/{}", self.web, reference.org, reference.repo))
    }

    fn branchtag_urls(&self, reference: &ModuleReference) -> Result<Vec<String>> {
        let base = self.repo_api(reference);
        Ok(vec![format!("{}/branches", base), format!("{}/tags", base)])
    }

    fn transform_branchtags(&self, body: Value) -> Result<Vec<String>> {
        let refs: Vec<NamedRef> = serde_json::from_value(body)?;
        Ok(refs.into_iter().map(|r| r.name).collect())
    }

    fn request_headers(&self, fetcher: &Fetcher) -> HeaderMap {
        fetcher.github_headers()
    }

    async fn default_branch(
        &self,
        fetcher: &Fetcher,
        reference: &ModuleReference,
    ) -> Result<StepOutcome<String>> {
        let metadata: RepoMetadata = fetcher
            .get_json(&self.repo_api(reference), self.request_headers(fetcher))
            .await?;
        debug!(branch = %metadata.default_branch, "resolved default branch");
        Ok(StepOutcome::Ready(metadata.default_branch))
    }

    async fn fetch_tree(
        &self,
        fetcher: &Fetcher,
        reference: &ModuleReference,
        path: &str,
        branchtag: &str,
    ) -> Result<StepOutcome<TreeFetch>> {
        let url = self.contents_url(reference, path);
        let raw = fetcher
            .get_raw(&url, self.request_headers(fetcher), &[("ref", branchtag)])
            .await?;

        if !raw.is_success() {
            // Captured, not thrown: the page still renders refs and breadcrumbs
            debug!(url = %url, status = raw.status, "contents request failed");
            return Ok(StepOutcome::Ready(TreeFetch::Failed(raw.body_value())));
        }

        let tree: Tree = serde_json::from_str(&raw.body)?;
        Ok(StepOutcome::Ready(TreeFetch::Tree(tree)))
    }

    async fn fetch_readme(&self, fetcher: &Fetcher, listing: &[TreeEntry]) -> Result<StepOutcome<String>> {
        let Some(download_url) = find_readme(listing).and_then(|entry| entry.download_url.as_deref())
        else {
            return Ok(StepOutcome::Missing);
        };

        let text = fetcher
            .get_text(download_url, self.request_headers(fetcher))
            .await?;
        Ok(StepOutcome::Ready(text))
    }

    fn file_view(&self, entry: &TreeEntry) -> Result<StepOutcome<FileView>> {
        Ok(StepOutcome::Ready(FileView {
            content: decode_content(entry)?,
            source_url: entry.download_url.clone(),
        }))
    }
}
