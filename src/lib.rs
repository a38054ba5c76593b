//! # pathtrie
//!
//! **pathtrie** is a compiled-pattern prefix tree for matching URL request paths
//! against registered route patterns. It is the routing core beneath an HTTP
//! dispatcher: patterns are registered once at startup, then looked up on every
//! request.
//!
//! ## Overview
//!
//! Each registration pattern is split on `/` into fragments and grown into a
//! tree of [`Node`]s. A lookup walks the same tree one fragment at a time,
//! binding named parameters as it goes, and reports one of four outcomes
//! ([`MatchResult`]): a match, a fixed-path redirect, a trailing-slash
//! redirect, or a miss.
//!
//! ## Architecture
//!
//! - **[`trie`]** - Pattern compilation, tree construction and matching
//! - **[`error`]** - [`TrieError`], returned by registration and by invalid lookups
//! - **[`config`]** - [`TrieOptions`] and TOML route tables
//! - **[`dispatch`]** - Turning a lookup result and a method into a dispatch decision
//! - **[`otel`]** - Structured logging setup for binaries
//! - **[`cli`]** - The `pathtrie` command-line tool
//!
//! ### Pattern Grammar
//!
//! | Fragment | Matches |
//! |----------|---------|
//! | `users` | exactly `users` (case-folded when `ignore_case` is on) |
//! | `::users` | exactly `:users` |
//! | `:id` | any non-empty fragment, bound to `id` |
//! | `:id(^\d+$)` | a non-empty fragment matching the regex |
//! | `:path*` | the rest of the path, bound to `path`; must be last |
//!
//! Literal children are always tried before the single dynamic child.
//!
//! ### Request Handling Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Caller
//!     participant Trie
//!     participant Dispatch as dispatch::resolve
//!
//!     Caller->>Trie: match_path("/api//user/7/")
//!     Trie->>Trie: Collapse "//" (fixed-path redirect on)
//!     Trie->>Trie: Walk fragments, bind params
//!     Trie-->>Caller: MatchResult
//!     Caller->>Dispatch: resolve(result, "GET")
//!     Dispatch-->>Caller: Handler / Redirect / 404 / 405 / 501
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use pathtrie::{dispatch::resolve, Resolution, Trie};
//!
//! let mut trie = Trie::new();
//! trie.define("/api/:type/:ID")
//!     .unwrap()
//!     .attach_handler("GET", "get_item")
//!     .unwrap();
//!
//! match resolve(trie.match_path("/api/user/123").unwrap(), "GET") {
//!     Resolution::Handler { handler, route } => {
//!         assert_eq!(*handler, "get_item");
//!         assert_eq!(route.get_param("ID"), Some("123"));
//!     }
//!     other => panic!("unexpected {}", other.status()),
//! }
//! ```
//!
//! ## Concurrency
//!
//! Registration takes `&mut Trie`; lookups take `&Trie`. Build the tree during
//! startup, then share it (for example behind an `Arc`) across worker threads.
//! `Trie<H>` is `Send + Sync` whenever `H` is.

pub mod cli;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod otel;
pub mod trie;

pub use config::{RouteEntry, RouteTable, TrieOptions};
pub use dispatch::{resolve, Resolution};
pub use error::TrieError;
pub use trie::{MatchResult, Node, ParamVec, RouteMatch, Trie};
