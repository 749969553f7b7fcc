// src/forge/unknown.rs
// A provider string nobody recognises. URL builders and the refs transformer
// fail with InvalidProvider; the default branch falls back to "master".

use super::{FileView, ModuleReference, Provider, ProviderKind, StepOutcome, TreeFetch};
use crate::error::{ResolveError, Result};
use crate::http::Fetcher;
use crate::tree::TreeEntry;
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use serde_json::Value;

pub const FALLBACK_BRANCH: &str = "master";

pub struct UnknownProvider {
    name: String,
}

impl UnknownProvider {
    pub fn new(name: String) -> Self {
        Self { name }
    }

    fn invalid(&self) -> ResolveError {
        ResolveError::InvalidProvider(self.name.clone())
    }
}

#[async_trait]
impl Provider for UnknownProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Unknown(self.name.clone())
    }

    fn repo_url(&self, _reference: &ModuleReference) -> Result<String> {
        Err(self.invalid())
    }

    fn branchtag_urls(&self, _reference: &ModuleReference) -> Result<Vec<String>> {
        Err(self.invalid())
    }

    fn transform_branchtags(&self, _body: Value) -> Result<Vec<String>> {
        Err(self.invalid())
    }

    fn request_headers(&self, _fetcher: &Fetcher) -> HeaderMap {
        HeaderMap::new()
    }

    async fn default_branch(
        &self,
        _fetcher: &Fetcher,
        _reference: &ModuleReference,
    ) -> Result<StepOutcome<String>> {
        Ok(StepOutcome::Ready(FALLBACK_BRANCH.to_string()))
    }

    async fn fetch_tree(
        &self,
        _fetcher: &Fetcher,
        _reference: &ModuleReference,
        _path: &str,
        _branchtag: &str,
    ) -> Result<StepOutcome<TreeFetch>> {
        Ok(StepOutcome::Unsupported)
    }

    async fn fetch_readme(&self, _fetcher: &Fetcher, _listing: &[TreeEntry]) -> Result<StepOutcome<String>> {
        Ok(StepOutcome::Unsupported)
    }

    fn file_view(&self, _entry: &TreeEntry) -> Result<StepOutcome<FileView>> {
        Ok(StepOutcome::Unsupported)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::http::TokenHeaders;
    use std::sync::Arc;

    #[test]
    fn test_transform_fails() {
        let provider = UnknownProvider::new("hg".to_string());
        let result = provider.transform_branchtags(serde_json::json!([]));
        assert!(matches!(result, Err(ResolveError::InvalidProvider(name)) if name == "hg"));
    }

    #[tokio::test]
    async fn test_default_branch_is_master() {
        let fetcher = Fetcher::new(&Config::default(), Arc::new(TokenHeaders::default())).unwrap();
        let provider = UnknownProvider::new("hg".to_string());
        let reference = ModuleReference::new(provider.kind(), "a", "b");

        let outcome = provider.default_branch(&fetcher, &reference).await.unwrap();
        assert_eq!(outcome, StepOutcome::Ready("master".to_string()));
    }
}
