// src/classify.rs
// =============================================================================
// Small pure helpers the rendering side uses to decide how to show a file.
// =============================================================================

use crate::error::{ResolveError, Result};

pub const JAVASCRIPT_MIME: &str = "application/javascript";
pub const TYPESCRIPT_MIME: &str = "application/typescript";
pub const PLAIN_TEXT_MIME: &str = "text/plain";

const IMAGE_EXTENSIONS: [&str; 5] = [".gif", ".jpg", ".jpeg", ".png", ".svg"];

// MIME type for a file name, based on its last extension
//
// "mod.ts" -> application/typescript, "x.js" -> application/javascript,
// anything else with a dot -> text/plain. No dot at all is an error.
pub fn content_type(filename: &str) -> Result<&'static str> {
    let (_, extension) = filename
        .rsplit_once('.')
        .ok_or_else(|| ResolveError::MissingExtension(filename.to_string()))?;

    Ok(match extension {
        "js" => JAVASCRIPT_MIME,
        "ts" => TYPESCRIPT_MIME,
        _ => PLAIN_TEXT_MIME,
    })
}

// Case-sensitive: "logo.PNG" is not an image here
pub fn is_image(filename: &str) -> bool {
    IMAGE_EXTENSIONS.iter().any(|ext| filename.ends_with(ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type() {
        assert_eq!(content_type("x.js").unwrap(), JAVASCRIPT_MIME);
        assert_eq!(content_type("x.ts").unwrap(), TYPESCRIPT_MIME);
        assert_eq!(content_type("x.md").unwrap(), PLAIN_TEXT_MIME);
        assert_eq!(content_type("types.d.ts").unwrap(), TYPESCRIPT_MIME);
    }

    #[test]
    fn test_content_type_without_extension_fails() {
        let result = content_type("Makefile");
        assert!(matches!(result, Err(ResolveError::MissingExtension(name)) if name == "Makefile"));
    }

    #[test]
    fn test_is_image() {
        assert!(is_image("a.png"));
        assert!(is_image("logo.svg"));
        assert!(is_image("photo.jpeg"));
        assert!(!is_image("a.PNG"));
        assert!(!is_image("a.txt"));
    }
}
