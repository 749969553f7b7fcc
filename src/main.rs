// src/main.rs
// =============================================================================
// Entry point of the module-resolver CLI.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Build the configuration (env vars + flags) and load the module registry
// 3. Dispatch to the appropriate subcommand handler
// 4. Exit with proper code (0 = success, 1 = not found / upstream error,
//    2 = unexpected error)
//
// All the real work lives in the library (src/lib.rs); this file only wires
// it up and prints results.
// =============================================================================

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use module_resolver::classify::{content_type, is_image};
use module_resolver::config::Config;
use module_resolver::http::TokenHeaders;
use module_resolver::logging::init_logging;
use module_resolver::registry::ModuleRegistry;
use module_resolver::tree::Tree;
use module_resolver::{ResolutionResult, ResolveRequest, Resolver};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // {:#} prints the whole context chain on one line
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = success
//   Ok(1) = module not found, or the code host refused the path
//   Err   = unexpected error (exit code 2)
async fn run() -> Result<i32> {
    let Cli {
        command,
        registry,
        timeout,
        verbose,
    } = Cli::parse();

    init_logging(verbose);

    match command {
        Commands::Classify { filename } => handle_classify(&filename),
        Commands::Resolve { path, api, json } => {
            let resolver = build_resolver(registry, timeout)?;
            handle_resolve(&resolver, &path, api, json).await
        }
        Commands::Branchtags { module, json } => {
            let resolver = build_resolver(registry, timeout)?;
            handle_branchtags(&resolver, &module, json).await
        }
    }
}

// Builds a resolver from env vars, CLI flags and the registry file
fn build_resolver(registry: Option<PathBuf>, timeout: Option<u64>) -> Result<Resolver<ModuleRegistry>> {
    let mut config = Config::from_env()?.with_timeout(timeout.map(Duration::from_secs));
    if let Some(path) = registry {
        config.registry_path = path;
    }

    let modules = ModuleRegistry::load(&config.registry_path).with_context(|| {
        format!(
            "could not load module registry {}",
            config.registry_path.display()
        )
    })?;

    let headers = Arc::new(TokenHeaders::from_config(&config));
    Ok(Resolver::from_config(modules, &config, headers)?)
}

// Handles the 'resolve' subcommand
async fn handle_resolve(
    resolver: &Resolver<ModuleRegistry>,
    path: &str,
    api: bool,
    json: bool,
) -> Result<i32> {
    if !json {
        println!("🔍 Resolving module path: {}", path);
    }

    let request = ResolveRequest::from_path(path, api);
    let result = resolver.resolve(&request).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_summary(&result);
    }

    if result.is_not_found() || result.errors.is_some() {
        Ok(1)
    } else {
        Ok(0)
    }
}

// Handles the 'branchtags' subcommand
async fn handle_branchtags(resolver: &Resolver<ModuleRegistry>, module: &str, json: bool) -> Result<i32> {
    let Some(names) = resolver.branchtags_for(module).await? else {
        eprintln!("❌ Module not found: {}", module);
        return Ok(1);
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&names)?);
    } else {
        for name in &names {
            println!("{}", name);
        }
    }
    Ok(0)
}

// Handles the 'classify' subcommand; a name without extension is an error
fn handle_classify(filename: &str) -> Result<i32> {
    let mime = content_type(filename)?;
    println!("{:<12} {}", "MIME", mime);
    println!("{:<12} {}", "IMAGE", is_image(filename));
    Ok(0)
}

// Prints a human-readable view of a resolution result
fn print_summary(result: &ResolutionResult) {
    let Some(module) = &result.module else {
        println!("❌ Module not found: {}", result.segments.join("/"));
        return;
    };

    println!(
        "📦 {} -> {} ({})",
        module.name, module.repo_url, module.reference.kind
    );
    println!("🌿 Branch/tag: {}", result.branchtag.as_deref().unwrap_or("(unresolved)"));

    if let Some(branchtags) = &result.branchtags {
        println!("🏷️  {} branch(es)/tag(s) available", branchtags.len());
    }
    if let Some(path) = &result.path {
        println!("📂 Path: {}", path);
    }

    match &result.tree {
        Some(Tree::Listing(entries)) => {
            println!();
            println!("{:<8} {:<50} {:>10}", "TYPE", "NAME", "SIZE");
            println!("{}", "=".repeat(70));
            for entry in entries {
                println!("{:<8} {:<50} {:>10}", entry.kind, entry.name, entry.size);
            }
            println!();
        }
        Some(Tree::File(entry)) => {
            let mime = content_type(&entry.name).unwrap_or("unknown");
            let kind = if is_image(&entry.name) { "image" } else { mime };
            let bytes = result.content.as_ref().map(String::len).unwrap_or(0);
            println!("📄 {} ({}, {} bytes)", entry.name, kind, bytes);
        }
        None => {}
    }

    if let Some(readme) = &result.readme {
        println!("📖 README: {} bytes", readme.len());
    }
    if let Some(source) = &result.source_url {
        println!("🔗 Source: {}", source);
    }
    if let Some(errors) = &result.errors {
        println!("⚠️  Upstream error: {}", errors);
    }
    if !result.unsupported.is_empty() {
        println!("⏭️  Not supported by provider: {}", result.unsupported.join(", "));
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why is there a lib.rs AND a main.rs?
//    - The library (module_resolver) is what a web server would embed
//    - main.rs is just one consumer of it, imported like any other crate:
//      `use module_resolver::...`
//    - Only cli.rs is declared with `mod` here, it belongs to the binary
//
// 2. What is `let Some(x) = ... else { ... };`?
//    - "let-else": bind the value if the pattern matches, otherwise run the
//      else block, which must leave the function (return, break, ...)
//    - Keeps the happy path un-indented
//
// 3. anyhow vs ResolveError
//    - The library returns ResolveError so callers can match on variants
//    - Here we only print errors, so anyhow::Result is enough; `?` converts
//      ResolveError into anyhow::Error automatically
// -----------------------------------------------------------------------------
