// src/resolve/result.rs
// =============================================================================
// The resolver's output types.
//
// Every field except `segments` is an Option: each one is filled by a
// different pipeline step, and any step may be skipped. When serialized,
// absent fields are left out entirely, so a not-found result is exactly
// {"segments": [...]}.
// =============================================================================

use crate::forge::ModuleReference;
use crate::tree::Tree;
use serde::Serialize;
use serde_json::Value;

/// A registry hit plus the derived repository URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedModule {
    pub name: String,
    #[serde(flatten)]
    pub reference: ModuleReference,
    pub repo_url: String,
}

/// One navigation link: the segment label and the path up to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breadcrumb {
    pub label: String,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionResult {
    pub segments: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module: Option<ResolvedModule>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branchtag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branchtags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breadcrumbs: Option<Vec<Breadcrumb>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tree: Option<Tree>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub readme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    /// Error body of a failed contents request, verbatim
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Value>,
    /// Steps the provider does not implement ("default_branch", "tree", ...)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unsupported: Vec<String>,
}

impl ResolutionResult {
    // The terminal "no such module" result: only the segments survive
    pub fn not_found(segments: Vec<String>) -> Self {
        Self {
            segments,
            ..Default::default()
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.module.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forge::ProviderKind;
    use serde_json::json;

    #[test]
    fn test_not_found_serializes_to_segments_only() {
        let result = ResolutionResult::not_found(vec!["nope".to_string(), "a".to_string()]);
        assert!(result.is_not_found());
        assert_eq!(serde_json::to_value(&result).unwrap(), json!({"segments": ["nope", "a"]}));
    }

    #[test]
    fn test_resolved_module_flattens_reference() {
        let module = ResolvedModule {
            name: "oak".to_string(),
            reference: ModuleReference::new(ProviderKind::GitHub, "oakserver", "oak"),
            repo_url: "https://github.com/oakserver/oak".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&module).unwrap(),
            json!({
                "name": "oak",
                "type": "github",
                "org": "oakserver",
                "repo": "oak",
                "repoUrl": "https://github.com/oakserver/oak"
            })
        );
    }
}
