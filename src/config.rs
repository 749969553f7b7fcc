// src/config.rs
// =============================================================================
// Runtime configuration for the resolver.
//
// Everything here has a sensible default so `Config::default()` talks to the
// public GitHub/GitLab hosts. Overrides come from environment variables
// (Config::from_env) and then from CLI flags in main.rs.
//
// Environment variables:
//   GITHUB_TOKEN / GH_TOKEN       token for authenticated GitHub requests
//   MODULE_RESOLVER_GITHUB_API    GitHub REST API base URL
//   MODULE_RESOLVER_GITLAB_URL    GitLab base URL
//   MODULE_RESOLVER_REGISTRY      path of the module registry JSON file
// =============================================================================

use crate::error::{ResolveError, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

pub const DEFAULT_GITHUB_API: &str = "https://api.github.com";
pub const DEFAULT_GITHUB_WEB: &str = "https://github.com";
pub const DEFAULT_GITLAB_WEB: &str = "https://gitlab.com";
pub const DEFAULT_REGISTRY_PATH: &str = "modules.json";

const TOKEN_ENV: [&str; 2] = ["GITHUB_TOKEN", "GH_TOKEN"];

/// Base URLs for every host the resolver talks to.
///
/// Stored without a trailing slash so builders can do `format!("{base}/...")`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// GitHub REST API (branches, tags, contents, repository metadata)
    pub github_api: String,
    /// GitHub web host, used for the human-facing repository URL
    pub github_web: String,
    /// GitLab web host; the refs listing lives under it
    pub gitlab_web: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            github_api: DEFAULT_GITHUB_API.to_string(),
            github_web: DEFAULT_GITHUB_WEB.to_string(),
            gitlab_web: DEFAULT_GITLAB_WEB.to_string(),
        }
    }
}

impl Endpoints {
    // Builds endpoints from explicit base URLs, validating each one
    pub fn new(github_api: &str, github_web: &str, gitlab_web: &str) -> Result<Self> {
        Ok(Self {
            github_api: normalize_base(github_api)?,
            github_web: normalize_base(github_web)?,
            gitlab_web: normalize_base(gitlab_web)?,
        })
    }

    // Points every host at the same base URL (handy for a local mock server)
    pub fn single_host(base: &str) -> Result<Self> {
        Self::new(base, base, base)
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub endpoints: Endpoints,
    pub github_token: Option<String>,
    pub registry_path: PathBuf,
    /// Per-request timeout. None means wait forever, the caller decides.
    pub timeout: Option<Duration>,
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoints: Endpoints::default(),
            github_token: None,
            registry_path: PathBuf::from(DEFAULT_REGISTRY_PATH),
            timeout: None,
            user_agent: format!("module-resolver/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Config {
    // Reads overrides from the environment on top of the defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Some(api) = non_empty_var("MODULE_RESOLVER_GITHUB_API") {
            config.endpoints.github_api = normalize_base(&api)?;
        }
        if let Some(gitlab) = non_empty_var("MODULE_RESOLVER_GITLAB_URL") {
            config.endpoints.gitlab_web = normalize_base(&gitlab)?;
        }
        if let Some(path) = non_empty_var("MODULE_RESOLVER_REGISTRY") {
            config.registry_path = PathBuf::from(path);
        }

        config.github_token = TOKEN_ENV.iter().find_map(|name| non_empty_var(name));

        Ok(config)
    }

    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

// Validates a base URL and strips trailing slashes
fn normalize_base(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    Url::parse(trimmed).map_err(|source| ResolveError::InvalidEndpoint {
        url: raw.to_string(),
        source,
    })?;
    Ok(trimmed.to_string())
}
