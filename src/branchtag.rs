// src/branchtag.rs
// =============================================================================
// Branch and tag enumeration.
//
// - transform_branchtags: reshape one decoded response into ref names (pure)
// - fetch_branchtags: query every listing URL of a provider, in order, and
//   concatenate the names
//
// No deduplication: a name that is both a branch and a tag shows up twice.
// No partial results: the first failing URL fails the whole call.
// =============================================================================

use crate::config::Endpoints;
use crate::error::Result;
use crate::forge::{provider_for, ModuleReference, Provider, ProviderKind};
use crate::http::Fetcher;
use serde_json::Value;
use tracing::debug;

// Flattens a raw refs response for the given provider
//
// Example:
//   GitHub  [{"name":"main"},{"name":"v1"}]          -> ["main", "v1"]
//   GitLab  {"Branches":["main"],"Tags":["v1","v2"]} -> ["main", "v1", "v2"]
pub fn transform_branchtags(body: Value, kind: &ProviderKind) -> Result<Vec<String>> {
    // The transformer never touches endpoints, defaults are fine
    provider_for(kind, &Endpoints::default()).transform_branchtags(body)
}

// Fetches every branch and tag name for a repository
//
// Requests go out one after the other (branches, then tags on GitHub), so
// the output order is stable: all names from the first URL, then the next.
pub async fn fetch_branchtags(
    fetcher: &Fetcher,
    provider: &dyn Provider,
    reference: &ModuleReference,
) -> Result<Vec<String>> {
    let urls = provider.branchtag_urls(reference)?;
    let headers = provider.request_headers(fetcher);

    let mut names = Vec::new();
    for url in &urls {
        let body: Value = fetcher.get_json(url, headers.clone()).await?;
        let batch = provider.transform_branchtags(body)?;
        debug!(url = %url, count = batch.len(), "fetched refs");
        names.extend(batch);
    }

    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::error::ResolveError;
    use crate::http::TokenHeaders;
    use serde_json::json;
    use std::sync::Arc;

    fn fetcher() -> Fetcher {
        Fetcher::new(&Config::default(), Arc::new(TokenHeaders::new(Some("t0k".to_string())))).unwrap()
    }

    #[test]
    fn test_transform_github_fixture() {
        let body = json!([{"name": "main"}, {"name": "v1"}]);
        assert_eq!(transform_branchtags(body, &ProviderKind::GitHub).unwrap(), vec!["main", "v1"]);
    }

    #[test]
    fn test_transform_gitlab_fixture() {
        let body = json!({"Branches": ["main"], "Tags": ["v1", "v2"]});
        assert_eq!(
            transform_branchtags(body, &ProviderKind::GitLab).unwrap(),
            vec!["main", "v1", "v2"]
        );
    }

    #[test]
    fn test_transform_unknown_provider() {
        let result = transform_branchtags(json!([]), &ProviderKind::Unknown("cvs".to_string()));
        assert!(matches!(result, Err(ResolveError::InvalidProvider(_))));
    }

    #[tokio::test]
    async fn test_fetch_github_branches_then_tags_with_auth() {
        let mut server = mockito::Server::new_async().await;
        let branches = server
            .mock("GET", "/repos/o/r/branches")
            .match_header("authorization", "token t0k")
            .with_status(200)
            .with_body(r#"[{"name":"main"},{"name":"v1"}]"#)
            .create_async()
            .await;
        let tags = server
            .mock("GET", "/repos/o/r/tags")
            .match_header("authorization", "token t0k")
            .with_status(200)
            .with_body(r#"[{"name":"v1"},{"name":"v2"}]"#)
            .create_async()
            .await;

        let endpoints = Endpoints::single_host(&server.url()).unwrap();
        let reference = ModuleReference::new(ProviderKind::GitHub, "o", "r");
        let provider = provider_for(&reference.kind, &endpoints);

        let names = fetch_branchtags(&fetcher(), provider.as_ref(), &reference).await.unwrap();

        branches.assert_async().await;
        tags.assert_async().await;
        // "v1" is both a branch and a tag, and appears twice
        assert_eq!(names, vec!["main", "v1", "v1", "v2"]);
    }

    #[tokio::test]
    async fn test_fetch_gitlab_single_request() {
        let mut server = mockito::Server::new_async().await;
        let refs = server
            .mock("GET", "/group/project/refs")
            .with_status(200)
            .with_body(r#"{"Branches":["main"],"Tags":["v1.0.0"]}"#)
            .create_async()
            .await;

        let endpoints = Endpoints::single_host(&server.url()).unwrap();
        let reference = ModuleReference::new(ProviderKind::GitLab, "group", "project");
        let provider = provider_for(&reference.kind, &endpoints);

        let names = fetch_branchtags(&fetcher(), provider.as_ref(), &reference).await.unwrap();

        refs.assert_async().await;
        assert_eq!(names, vec!["main", "v1.0.0"]);
    }

    #[tokio::test]
    async fn test_fetch_fails_when_any_url_fails() {
        let mut server = mockito::Server::new_async().await;
        let _branches = server
            .mock("GET", "/repos/o/r/branches")
            .with_status(200)
            .with_body(r#"[{"name":"main"}]"#)
            .create_async()
            .await;
        let _tags = server
            .mock("GET", "/repos/o/r/tags")
            .with_status(403)
            .with_body(r#"{"message":"API rate limit exceeded"}"#)
            .create_async()
            .await;

        let endpoints = Endpoints::single_host(&server.url()).unwrap();
        let reference = ModuleReference::new(ProviderKind::GitHub, "o", "r");
        let provider = provider_for(&reference.kind, &endpoints);

        let result = fetch_branchtags(&fetcher(), provider.as_ref(), &reference).await;
        assert!(matches!(result, Err(ResolveError::UpstreamStatus { status: 403, .. })));
    }
}
