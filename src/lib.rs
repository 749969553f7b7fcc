// src/lib.rs
// =============================================================================
// module-resolver: resolve a module path ("oak@v10/src/mod.ts") against
// GitHub or GitLab and return everything a module-browsing page needs:
// repository info, branches and tags, breadcrumbs, directory listing or file
// content, README.
//
// Module map:
// - config:    endpoints, token, registry path, timeout
// - http:      reqwest wrapper + GitHub auth headers
// - forge:     Provider trait and the GitHub/GitLab/unknown implementations
// - branchtag: branch/tag listing (transform + fetch)
// - tree:      contents API types, listing sort, content decoding
// - registry:  module name -> repository lookup
// - resolve:   the pipeline that ties it all together
// - classify:  MIME type / image helpers for rendering
// =============================================================================

pub mod branchtag;
pub mod classify;
pub mod config;
pub mod error;
pub mod forge;
pub mod http;
pub mod logging;
pub mod registry;
pub mod resolve;
pub mod tree;

pub use error::{ResolveError, Result};
pub use resolve::{ResolutionResult, ResolveRequest, Resolver};
