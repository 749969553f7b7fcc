// src/tree.rs
// =============================================================================
// Types for what a provider's contents API returns, plus the small helpers
// the resolver applies to them.
//
// The GitHub contents API answers a path with either:
// - a JSON array when the path is a directory (one object per entry)
// - a JSON object when the path is a file (with base64 content inline)
//
// serde's `untagged` enum lets us decode both shapes into one type.
// =============================================================================

use crate::error::{ResolveError, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// One file or directory descriptor as returned by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEntry {
    pub name: String,
    #[serde(default)]
    pub path: String,
    /// Raw provider type string ("file", "dir", "symlink", "submodule" on GitHub)
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
    pub download_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html_url: Option<String>,
}

/// A directory listing or a single file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Tree {
    Listing(Vec<TreeEntry>),
    File(TreeEntry),
}

impl Tree {
    pub fn is_listing(&self) -> bool {
        matches!(self, Tree::Listing(_))
    }
}

// Sorts a listing by the raw `type` string
//
// Plain lexical order, so on GitHub "dir" lands before "file". sort_by is
// stable: entries with the same type keep the order the provider sent.
pub fn sort_listing(entries: &mut [TreeEntry]) {
    entries.sort_by(|a, b| a.kind.cmp(&b.kind));
}

// Finds the first `readme.md` in a listing, ignoring case
pub fn find_readme(entries: &[TreeEntry]) -> Option<&TreeEntry> {
    entries
        .iter()
        .find(|entry| entry.name.eq_ignore_ascii_case("readme.md"))
}

// Decodes a file entry's inline content according to its declared encoding
//
// Returns:
//   Ok(None)        the entry carries no content at all
//   Ok(Some(text))  decoded text (invalid UTF-8 is replaced, not rejected)
//   Err(..)         unknown encoding or broken base64
pub fn decode_content(entry: &TreeEntry) -> Result<Option<String>> {
    let Some(content) = &entry.content else {
        return Ok(None);
    };

    match entry.encoding.as_deref() {
        None | Some("utf-8") | Some("utf8") | Some("none") => Ok(Some(content.clone())),
        Some("base64") => {
            // GitHub wraps base64 at 60 columns
            let compact: String = content.chars().filter(|c| !c.is_ascii_whitespace()).collect();
            let bytes = STANDARD.decode(compact)?;
            Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
        }
        Some(other) => Err(ResolveError::UnsupportedEncoding(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, kind: &str) -> TreeEntry {
        TreeEntry {
            name: name.to_string(),
            path: name.to_string(),
            kind: kind.to_string(),
            size: 0,
            sha: None,
            content: None,
            encoding: None,
            download_url: Some(format!("https://raw.example.com/{}", name)),
            html_url: None,
        }
    }

    #[test]
    fn test_decode_directory_listing() {
        let body = r#"[
            {"name": "mod.ts", "path": "mod.ts", "type": "file", "size": 12, "download_url": "https://raw/mod.ts"},
            {"name": "src", "path": "src", "type": "dir", "size": 0, "download_url": null}
        ]"#;
        let tree: Tree = serde_json::from_str(body).unwrap();
        match tree {
            Tree::Listing(entries) => {
                assert_eq!(entries.len(), 2);
                assert_eq!(entries[1].kind, "dir");
                assert!(entries[1].download_url.is_none());
            }
            Tree::File(_) => panic!("expected a listing"),
        }
    }

    #[test]
    fn test_decode_single_file() {
        let body = r#"{"name": "mod.ts", "path": "mod.ts", "type": "file", "size": 5,
                       "content": "aGVsbG8=\n", "encoding": "base64",
                       "download_url": "https://raw/mod.ts"}"#;
        let tree: Tree = serde_json::from_str(body).unwrap();
        assert!(!tree.is_listing());
    }

    #[test]
    fn test_sort_listing_is_stable_by_type() {
        let mut entries = vec![
            entry("b.ts", "file"),
            entry("lib", "dir"),
            entry("a.ts", "file"),
            entry("docs", "dir"),
        ];
        sort_listing(&mut entries);

        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["lib", "docs", "b.ts", "a.ts"]);
    }

    #[test]
    fn test_find_readme_ignores_case() {
        let entries = vec![entry("mod.ts", "file"), entry("ReadMe.MD", "file")];
        assert_eq!(find_readme(&entries).unwrap().name, "ReadMe.MD");
    }

    #[test]
    fn test_find_readme_requires_md() {
        let entries = vec![entry("README", "file"), entry("readme.txt", "file")];
        assert!(find_readme(&entries).is_none());
    }

    #[test]
    fn test_decode_content_base64_with_newlines() {
        let mut file = entry("mod.ts", "file");
        file.content = Some("ZXhwb3J0IGNv\nbnN0IHggPSAx\n".to_string());
        file.encoding = Some("base64".to_string());
        assert_eq!(decode_content(&file).unwrap().unwrap(), "export const x = 1");
    }

    #[test]
    fn test_decode_content_without_encoding_is_text() {
        let mut file = entry("mod.ts", "file");
        file.content = Some("plain".to_string());
        assert_eq!(decode_content(&file).unwrap().unwrap(), "plain");
    }

    #[test]
    fn test_decode_content_missing() {
        assert!(decode_content(&entry("mod.ts", "file")).unwrap().is_none());
    }

    #[test]
    fn test_decode_content_unknown_encoding() {
        let mut file = entry("mod.ts", "file");
        file.content = Some("abc".to_string());
        file.encoding = Some("rot13".to_string());
        assert!(matches!(decode_content(&file), Err(ResolveError::UnsupportedEncoding(_))));
    }
}
