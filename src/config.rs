//! # Configuration Module
//!
//! Matching options and on-disk route tables.
//!
//! ## Environment Variables
//!
//! [`TrieOptions::from_env`] reads three flags, each defaulting to `true`:
//!
//! - `PATHTRIE_IGNORE_CASE` - case-insensitive literal fragments
//! - `PATHTRIE_FIXED_PATH_REDIRECT` - suggest `/a/b` for `/a//b`
//! - `PATHTRIE_TRAILING_SLASH_REDIRECT` - suggest `/a/b` for `/a/b/` and back
//!
//! Accepted values are `true`/`false`, `1`/`0`, `yes`/`no` and `on`/`off`.
//!
//! ## Route Tables
//!
//! A route table is a TOML file listing patterns and the handler name bound
//! to each method key:
//!
//! ```toml
//! [options]
//! ignore_case = false
//!
//! [[routes]]
//! pattern = "/api/:type/:ID"
//! handlers = { GET = "get_item", DELETE = "delete_item" }
//!
//! [[routes]]
//! pattern = "/files/:filepath*"
//! handlers = { GET = "serve_file" }
//! ```
//!
//! Omitted options keep their defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::path::Path;
use tracing::{info, warn};

use crate::error::TrieError;
use crate::trie::Trie;

/// Matching options, fixed for the lifetime of a [`Trie`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrieOptions {
    /// Compare literal fragments case-insensitively
    pub ignore_case: bool,
    /// Report a fixed-path redirect when collapsing `//` would match
    pub fixed_path_redirect: bool,
    /// Report a trailing-slash redirect when adding or removing `/` would match
    pub trailing_slash_redirect: bool,
}

impl Default for TrieOptions {
    fn default() -> Self {
        Self {
            ignore_case: true,
            fixed_path_redirect: true,
            trailing_slash_redirect: true,
        }
    }
}

impl TrieOptions {
    /// All three options disabled
    #[must_use]
    pub fn none() -> Self {
        Self {
            ignore_case: false,
            fixed_path_redirect: false,
            trailing_slash_redirect: false,
        }
    }

    /// Load options from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            ignore_case: flag(&lookup, "PATHTRIE_IGNORE_CASE", defaults.ignore_case),
            fixed_path_redirect: flag(
                &lookup,
                "PATHTRIE_FIXED_PATH_REDIRECT",
                defaults.fixed_path_redirect,
            ),
            trailing_slash_redirect: flag(
                &lookup,
                "PATHTRIE_TRAILING_SLASH_REDIRECT",
                defaults.trailing_slash_redirect,
            ),
        }
    }
}

fn flag(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: bool) -> bool {
    let Some(raw) = lookup(key) else {
        return default;
    };
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => {
            warn!(key, value = %raw, default, "Unrecognised boolean, using default");
            default
        }
    }
}

/// One pattern of a route table and its method handlers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteEntry {
    /// Registration pattern, e.g. `/api/:type/:ID`
    pub pattern: String,
    /// Handler name per method key
    #[serde(default)]
    pub handlers: BTreeMap<String, String>,
}

/// Route table loaded from TOML
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteTable {
    /// Matching options for the trie built from this table
    #[serde(default)]
    pub options: TrieOptions,
    /// Patterns in registration order
    #[serde(default)]
    pub routes: Vec<RouteEntry>,
}

impl RouteTable {
    /// Parse a route table from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid route table.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("Failed to parse route table")
    }

    /// Load a route table from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read route table {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid route table {}", path.display()))
    }

    /// Build a trie with handler names as payloads
    ///
    /// Routes are defined in table order; handlers of one route are attached
    /// in method-key order.
    ///
    /// # Errors
    ///
    /// The first [`TrieError`] raised while defining patterns or attaching
    /// handlers.
    pub fn build_trie(&self) -> Result<Trie<String>, TrieError> {
        let mut trie = Trie::with_options(self.options);
        for route in &self.routes {
            let node = trie.define(&route.pattern)?;
            for (method, handler) in &route.handlers {
                node.attach_handler(method.clone(), handler.clone())?;
            }
        }

        info!(
            routes_count = self.routes.len(),
            ignore_case = self.options.ignore_case,
            fixed_path_redirect = self.options.fixed_path_redirect,
            trailing_slash_redirect = self.options.trailing_slash_redirect,
            "Route table loaded"
        );

        Ok(trie)
    }
}
