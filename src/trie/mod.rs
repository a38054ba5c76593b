//! # Trie Module
//!
//! The trie module provides path matching and route resolution for pathtrie.
//! Route patterns are compiled fragment by fragment into a prefix tree; request
//! paths are then matched by walking that tree once, left to right.
//!
//! ## Overview
//!
//! The trie is responsible for:
//! - Compiling route patterns (`/api/:type/:ID(^\d+$)`, `/files/:path*`)
//! - Matching incoming request paths to registered endpoints
//! - Extracting path parameters from matched routes
//! - Suggesting fixed-path and trailing-slash redirects for near misses
//!
//! ## Architecture
//!
//! The trie uses a two-phase approach:
//!
//! 1. **Compilation**: At startup, every pattern is split on `/` and each
//!    fragment compiled into a literal key or a named parameter. Each node has
//!    any number of literal children and at most one dynamic child.
//!
//! 2. **Matching**: For each request, the path is walked fragment by fragment.
//!    Literal children win over the dynamic child; a catch-all ends the walk.
//!
//! ## Example
//!
//! ```rust
//! use pathtrie::Trie;
//!
//! let mut trie: Trie<&str> = Trie::new();
//! trie.define("/files/:filepath*")?.attach_handler("GET", "serve_file")?;
//!
//! let result = trie.match_path("/files/templates/article.html")?;
//! let m = result.into_route_match().expect("route should match");
//! assert_eq!(m.get_param("filepath"), Some("templates/article.html"));
//!
//! // "/api/foo/" is one trailing slash away from "/api/foo"
//! trie.define("/api/foo")?;
//! assert_eq!(trie.match_path("/api/foo/")?.tsr(), Some("/api/foo"));
//! assert_eq!(trie.match_path("/api//foo")?.fpr(), Some("/api/foo"));
//! # Ok::<(), pathtrie::TrieError>(())
//! ```
//!
//! ## Performance
//!
//! - Matching is O(k) in the number of path fragments, independent of the
//!   number of registered routes
//! - Literal lookups are a single hash probe per fragment
//! - No locking: the tree is immutable once built

mod core;
mod node;
pub mod pattern;
#[cfg(test)]
mod performance_tests;

pub use self::core::{MatchResult, ParamVec, RouteMatch, Trie, MAX_INLINE_PARAMS};
pub use node::Node;
