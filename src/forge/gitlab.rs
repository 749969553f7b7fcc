// src/forge/gitlab.rs
// =============================================================================
// GitLab implementation of Provider.
//
// Only the refs listing is wired up. GitLab's `/{org}/{repo}/refs` endpoint
// answers with {"Branches": [...], "Tags": [...]}. Default branch, tree,
// readme and file content are reported as Unsupported so the result says
// which steps never ran.
// =============================================================================

use super::{FileView, ModuleReference, Provider, ProviderKind, StepOutcome, TreeFetch};
use crate::config::Endpoints;
use crate::error::Result;
use crate::http::Fetcher;
use crate::tree::TreeEntry;
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct RefsResponse {
    #[serde(rename = "Branches", default)]
    branches: Vec<String>,
    #[serde(rename = "Tags", default)]
    tags: Vec<String>,
}

pub struct GitLab {
    web: String,
}

impl GitLab {
    pub fn new(endpoints: &Endpoints) -> Self {
        Self {
            web: endpoints.gitlab_web.clone(),
        }
    }

    // Where a tree listing would come from once GitLab trees are supported
    pub fn tree_url(&self, reference: &ModuleReference, branchtag: &str) -> String {
        format!(
            "{}/{}/{}/-/refs/{}/logs_tree/?format=json",
            self.web, reference.org, reference.repo, branchtag
        )
    }
}

#[async_trait]
impl Provider for GitLab {
    fn kind(&self) -> ProviderKind {
        ProviderKind::GitLab
    }

    fn repo_url(&self, reference: &ModuleReference) -> Result<String> {
        Ok(format!("{}/{}/{}", self.web, reference.org, reference.repo))
    }

    fn branchtag_urls(&self, reference: &ModuleReference) -> Result<Vec<String>> {
        Ok(vec![format!("{}/{}/{}/refs", self.web, reference.org, reference.repo)])
    }

    fn transform_branchtags(&self, body: Value) -> Result<Vec<String>> {
        let refs: RefsResponse = serde_json::from_value(body)?;
        Ok(refs.branches.into_iter().chain(refs.tags).collect())
    }

    // TODO: send a PRIVATE-TOKEN header once HeaderProvider grows a GitLab variant
    fn request_headers(&self, _fetcher: &Fetcher) -> HeaderMap {
        HeaderMap::new()
    }

    async fn default_branch(
        &self,
        _fetcher: &Fetcher,
        _reference: &ModuleReference,
    ) -> Result<StepOutcome<String>> {
        Ok(StepOutcome::Unsupported)
    }

    async fn fetch_tree(
        &self,
        _fetcher: &Fetcher,
        reference: &ModuleReference,
        _path: &str,
        branchtag: &str,
    ) -> Result<StepOutcome<TreeFetch>> {
        debug!(url = %self.tree_url(reference, branchtag), "gitlab tree listing not supported");
        Ok(StepOutcome::Unsupported)
    }

    async fn fetch_readme(&self, _fetcher: &Fetcher, _listing: &[TreeEntry]) -> Result<StepOutcome<String>> {
        Ok(StepOutcome::Unsupported)
    }

    fn file_view(&self, _entry: &TreeEntry) -> Result<StepOutcome<FileView>> {
        Ok(StepOutcome::Unsupported)
    }
}
