use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::config::{RouteTable, TrieOptions};
use crate::dispatch::{resolve, Resolution};
use crate::trie::Trie;

/// Command-line interface for pathtrie
#[derive(Parser, Debug)]
#[command(name = "pathtrie")]
#[command(about = "Inspect route tables and resolve request paths", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List registered patterns and their methods
    Routes {
        /// Path to the TOML route table
        #[arg(short, long)]
        table: PathBuf,

        /// Take matching options from PATHTRIE_* environment variables
        #[arg(long, default_value_t = false)]
        env_options: bool,
    },
    /// Resolve request paths against a route table
    Resolve {
        /// Path to the TOML route table
        #[arg(short, long)]
        table: PathBuf,

        /// Request method key
        #[arg(short, long, default_value = "GET")]
        method: String,

        /// Print one JSON object per path
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Take matching options from PATHTRIE_* environment variables
        #[arg(long, default_value_t = false)]
        env_options: bool,

        /// Request paths, each starting with '/'
        #[arg(required = true)]
        paths: Vec<String>,
    },
}

fn load_trie(table: &Path, env_options: bool) -> Result<Trie<String>> {
    let mut table = RouteTable::load(table)?;
    if env_options {
        table.options = TrieOptions::from_env();
    }
    table.build_trie().context("Invalid route table")
}

/// One line per endpoint: pattern, then its `Allow` list
#[must_use]
pub fn render_routes(trie: &Trie<String>) -> String {
    let mut out = String::new();
    for node in trie.endpoints() {
        let allow = if node.allow().is_empty() {
            "-"
        } else {
            node.allow()
        };
        out.push_str(node.pattern());
        out.push('\t');
        out.push_str(allow);
        out.push('\n');
    }
    out
}

/// JSON description of how `path` resolved
#[must_use]
pub fn render_resolution(path: &str, method: &str, resolution: &Resolution<'_, String>) -> Value {
    let status = resolution.status();
    match resolution {
        Resolution::Handler { handler, route } => json!({
            "path": path,
            "method": method,
            "status": status,
            "handler": handler,
            "pattern": route.pattern(),
            "params": route.params_map(),
        }),
        Resolution::Redirect { location, .. } => json!({
            "path": path,
            "method": method,
            "status": status,
            "location": location,
        }),
        Resolution::MethodNotAllowed { allow } => json!({
            "path": path,
            "method": method,
            "status": status,
            "allow": allow,
        }),
        Resolution::NotFound | Resolution::NotImplemented => json!({
            "path": path,
            "method": method,
            "status": status,
        }),
    }
}

fn render_text(value: &Value) -> String {
    let mut line = format!(
        "{} {} -> {}",
        value["method"].as_str().unwrap_or_default(),
        value["path"].as_str().unwrap_or_default(),
        value["status"]
    );
    if let Some(handler) = value["handler"].as_str() {
        line.push_str(&format!(" handler={} params={}", handler, value["params"]));
    }
    if let Some(location) = value["location"].as_str() {
        line.push_str(&format!(" location={}", location));
    }
    if let Some(allow) = value["allow"].as_str() {
        line.push_str(&format!(" allow=\"{}\"", allow));
    }
    line
}

/// Execute a parsed command, writing results to `out`
///
/// # Errors
///
/// Returns an error if the route table cannot be loaded or built, a path
/// is not a valid request path, or writing fails.
pub fn run(cli: &Cli, out: &mut impl Write) -> Result<()> {
    match &cli.command {
        Commands::Routes { table, env_options } => {
            let trie = load_trie(table, *env_options)?;
            out.write_all(render_routes(&trie).as_bytes())?;
        }
        Commands::Resolve {
            table,
            method,
            json,
            env_options,
            paths,
        } => {
            let trie = load_trie(table, *env_options)?;
            for path in paths {
                let result = trie
                    .match_path(path)
                    .with_context(|| format!("Cannot resolve {}", path))?;
                let resolution = resolve(result, method);
                if matches!(resolution, Resolution::NotFound) {
                    warn!(path = %path, method = %method, "No route matched");
                }

                let value = render_resolution(path, method, &resolution);
                if *json {
                    writeln!(out, "{}", value)?;
                } else {
                    writeln!(out, "{}", render_text(&value))?;
                }
            }
        }
    }
    Ok(())
}

/// Parse arguments and run against stdout
///
/// # Errors
///
/// See [`run`].
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run(&cli, &mut out)
}
