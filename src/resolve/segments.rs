// src/resolve/segments.rs
// =============================================================================
// Everything derived purely from the path segments, no I/O:
// - parsing segment 0 (`name` or `name@branchtag`)
// - the breadcrumb trail
// - the repository-relative path
// =============================================================================

use super::result::Breadcrumb;
use crate::error::{ResolveError, Result};
use regex::Regex;
use std::sync::LazyLock;

// Label of the first breadcrumb, which links to the module index
const ROOT_CRUMB: &str = "x";

static MODULE_SEGMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<name>[a-z0-9_-]+)(?:@(?P<branchtag>.+))?$")
        .expect("unable to compile module segment regex")
});

/// Segment 0, split into module name and optional branch/tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleSegment {
    pub name: String,
    pub branchtag: Option<String>,
}

// Parses "oak" or "oak@v10.1.0"
pub fn parse_module_segment(segment: &str) -> Result<ModuleSegment> {
    let caps = MODULE_SEGMENT_RE
        .captures(segment)
        .ok_or_else(|| ResolveError::InvalidModuleSegment(segment.to_string()))?;

    Ok(ModuleSegment {
        name: caps["name"].to_string(),
        branchtag: caps.name("branchtag").map(|m| m.as_str().to_string()),
    })
}

// Splits a raw "oak@v1/src/mod.ts" style path into segments, dropping empties
pub fn split_module_path(raw: &str) -> Vec<String> {
    raw.split('/')
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

// One breadcrumb per prefix of ["x", ..segments]
//
// Example:
//   ["foo", "bar"] -> [("x", "/x"), ("foo", "/x/foo"), ("bar", "/x/foo/bar")]
pub fn build_breadcrumbs(segments: &[String]) -> Vec<Breadcrumb> {
    let trail: Vec<&str> = std::iter::once(ROOT_CRUMB)
        .chain(segments.iter().map(String::as_str))
        .collect();

    (0..trail.len())
        .map(|i| Breadcrumb {
            label: trail[i].to_string(),
            href: format!("/{}", trail[..=i].join("/")),
        })
        .collect()
}

// Repository-relative path: everything after segment 0, always rooted at "/"
pub fn repo_path(segments: &[String]) -> String {
    let rest = segments.get(1..).unwrap_or_default();
    format!("/{}", rest.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segs(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    fn crumb(label: &str, href: &str) -> Breadcrumb {
        Breadcrumb {
            label: label.to_string(),
            href: href.to_string(),
        }
    }

    #[test]
    fn test_parse_name_only() {
        let parsed = parse_module_segment("oak").unwrap();
        assert_eq!(parsed.name, "oak");
        assert_eq!(parsed.branchtag, None);
    }

    #[test]
    fn test_parse_with_branchtag() {
        let parsed = parse_module_segment("my_mod-2@v10.1.0").unwrap();
        assert_eq!(parsed.name, "my_mod-2");
        assert_eq!(parsed.branchtag.as_deref(), Some("v10.1.0"));
    }

    #[test]
    fn test_parse_rejects_bad_names() {
        for bad in ["Oak", "", "@v1", "oak@", "o.ak", "oak mod"] {
            assert!(
                matches!(parse_module_segment(bad), Err(ResolveError::InvalidModuleSegment(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_breadcrumbs() {
        assert_eq!(
            build_breadcrumbs(&segs(&["foo", "bar", "baz"])),
            vec![
                crumb("x", "/x"),
                crumb("foo", "/x/foo"),
                crumb("bar", "/x/foo/bar"),
                crumb("baz", "/x/foo/bar/baz"),
            ]
        );
    }

    #[test]
    fn test_breadcrumbs_keep_branchtag_label() {
        let crumbs = build_breadcrumbs(&segs(&["oak@v1"]));
        assert_eq!(crumbs[1], crumb("oak@v1", "/x/oak@v1"));
    }

    #[test]
    fn test_repo_path() {
        assert_eq!(repo_path(&segs(&["foo", "a", "b"])), "/a/b");
        assert_eq!(repo_path(&segs(&["foo"])), "/");
        assert_eq!(repo_path(&[]), "/");
    }

    #[test]
    fn test_split_module_path() {
        assert_eq!(split_module_path("/oak@v1/src//mod.ts"), segs(&["oak@v1", "src", "mod.ts"]));
        assert!(split_module_path("").is_empty());
    }
}
