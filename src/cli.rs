// src/cli.rs
// =============================================================================
// Command-line interface, built with clap's derive API.
//
// Subcommands:
// - resolve:    resolve a module path and print the metadata bundle
// - branchtags: list every branch and tag of a registered module
// - classify:   show how a file name would be rendered
//
// Global flags (--registry, --timeout, --verbose) work before or after the
// subcommand because they are marked `global = true`.
// =============================================================================

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "module-resolver",
    version,
    about = "Resolve module paths against GitHub/GitLab and print repository metadata",
    long_about = "module-resolver maps a module path like `oak@v10.1.0/src/mod.ts` to its repository \
                  through a module registry, then fetches branches, tags, the directory listing or \
                  file content, and the README from the code host."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Module registry JSON file (name -> {type, org, repo})
    ///
    /// Falls back to $MODULE_RESOLVER_REGISTRY, then ./modules.json
    #[arg(long, global = true)]
    pub registry: Option<PathBuf>,

    /// Give up on any single upstream request after this many seconds
    ///
    /// Without it, a hung upstream request hangs the whole resolution
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Log every request and pipeline step to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve a module path
    ///
    /// Example: module-resolver resolve oak@v10.1.0/src/mod.ts
    Resolve {
        /// Module path: `name[@branchtag]` followed by a file path
        path: String,

        /// API mode: skip the branch/tag list and breadcrumbs
        #[arg(long)]
        api: bool,

        /// Print the full result as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// List branches and tags of a module
    ///
    /// Example: module-resolver branchtags oak
    Branchtags {
        /// Registered module name
        module: String,

        /// Output as a JSON array
        #[arg(long)]
        json: bool,
    },

    /// Show the MIME type and image flag for a file name
    ///
    /// Example: module-resolver classify mod.ts
    Classify {
        filename: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_resolve_with_flags() {
        let cli = Cli::parse_from(["module-resolver", "resolve", "oak@v1/mod.ts", "--api", "--timeout", "5"]);
        assert_eq!(cli.timeout, Some(5));
        match cli.command {
            Commands::Resolve { path, api, json } => {
                assert_eq!(path, "oak@v1/mod.ts");
                assert!(api);
                assert!(!json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_registry_flag_before_subcommand() {
        let cli = Cli::parse_from(["module-resolver", "--registry", "mods.json", "branchtags", "oak"]);
        assert_eq!(cli.registry, Some(PathBuf::from("mods.json")));
        assert!(matches!(cli.command, Commands::Branchtags { ref module, json: false } if module == "oak"));
    }
}
