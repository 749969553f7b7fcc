// src/error.rs
// =============================================================================
// Error type for the resolver library.
//
// The binary uses anyhow (any error, with context), but library callers need
// to tell failures apart: an unknown provider is a data problem, a bad path
// segment is a user problem, a network error is an upstream problem.
//
// Note what is NOT here:
// - "Module not found" is a normal result (ResolutionResult::not_found)
// - A failed contents request is captured into ResolutionResult::errors
// =============================================================================

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResolveError {
    /// A provider-dispatch function got a provider type it does not know
    #[error("invalid provider type: {0}")]
    InvalidProvider(String),

    /// The request had no segments at all
    #[error("module path is empty, expected at least a module name")]
    MissingModuleSegment,

    /// Segment 0 is not `name` or `name@branchtag`
    #[error("invalid module segment: {0}")]
    InvalidModuleSegment(String),

    /// content_type() was given a file name without a dot
    #[error("file name has no extension: {0}")]
    MissingExtension(String),

    /// An upstream API answered with a non-success status on a step that
    /// does not capture errors
    #[error("HTTP {status}: {url}")]
    UpstreamStatus { url: String, status: u16 },

    /// A file entry declared an encoding we cannot decode
    #[error("unsupported content encoding: {0}")]
    UnsupportedEncoding(String),

    #[error("invalid base64 content: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("failed to load module registry {path}: {source}")]
    Registry {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("invalid endpoint URL '{url}': {source}")]
    InvalidEndpoint {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

// Shorthand used across the library, same idea as anyhow::Result
pub type Result<T> = std::result::Result<T, ResolveError>;
