//! Trie core - pattern registration and the request-path walk.
//!
//! # Hot path
//!
//! [`Trie::match_path`] runs once per request. It never mutates the tree and
//! allocates only the parameter vector (inline for up to
//! [`MAX_INLINE_PARAMS`] parameters) plus redirect targets.

#![deny(clippy::inefficient_to_string)]
#![deny(clippy::format_push_string)]
#![deny(clippy::unnecessary_to_owned)]

use once_cell::sync::Lazy;
use regex::Regex;
use smallvec::SmallVec;
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, trace};

use super::node::Node;
use super::pattern::compile_fragment;
use crate::config::TrieOptions;
use crate::error::TrieError;

/// Maximum number of path parameters before heap allocation.
pub const MAX_INLINE_PARAMS: usize = 8;

/// Extracted path parameters in walk order.
///
/// Names are `Arc<str>` shared with the tree; values are per-request text.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

#[allow(clippy::expect_used)]
static MULTI_SLASH: Lazy<Regex> =
    Lazy::new(|| Regex::new("/{2,}").expect("multi-slash regex must compile"));

/// A successful lookup: the endpoint node plus bound parameters
#[derive(Debug)]
pub struct RouteMatch<'t, H> {
    /// The endpoint node reached by the walk
    pub node: &'t Node<H>,
    /// Parameters bound on the way, in path order
    pub params: ParamVec,
}

impl<'t, H> RouteMatch<'t, H> {
    /// Get a parameter by name
    ///
    /// Uses "last write wins" semantics should a name be bound twice.
    #[inline]
    #[must_use]
    pub fn get_param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Convert params to a HashMap
    /// Note: This allocates - use get_param() in hot paths instead
    #[must_use]
    pub fn params_map(&self) -> HashMap<String, String> {
        self.params
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    /// Pattern registered at the matched node
    #[must_use]
    pub fn pattern(&self) -> &'t str {
        self.node.pattern()
    }

    /// Handler attached to the matched node for `method`
    #[inline]
    #[must_use]
    pub fn handler(&self, method: &str) -> Option<&'t H> {
        self.node.lookup_handler(method)
    }
}

/// Outcome of [`Trie::match_path`]
///
/// The variants are mutually exclusive: a lookup matches, suggests exactly
/// one redirect, or misses.
#[derive(Debug)]
pub enum MatchResult<'t, H> {
    /// The path reached an endpoint
    Matched(RouteMatch<'t, H>),
    /// The path matches once duplicate separators are collapsed
    FixedPathRedirect(String),
    /// The path matches with a trailing slash added or removed
    TrailingSlashRedirect(String),
    /// Nothing matches
    NotFound,
}

impl<'t, H> MatchResult<'t, H> {
    /// The matched node, if any
    #[must_use]
    pub fn node(&self) -> Option<&'t Node<H>> {
        match self {
            MatchResult::Matched(m) => Some(m.node),
            _ => None,
        }
    }

    /// Bound parameters; empty unless matched
    #[must_use]
    pub fn params(&self) -> &[(Arc<str>, String)] {
        match self {
            MatchResult::Matched(m) => &m.params,
            _ => &[],
        }
    }

    /// Fixed-path redirect target
    #[must_use]
    pub fn fpr(&self) -> Option<&str> {
        match self {
            MatchResult::FixedPathRedirect(to) => Some(to),
            _ => None,
        }
    }

    /// Trailing-slash redirect target
    #[must_use]
    pub fn tsr(&self) -> Option<&str> {
        match self {
            MatchResult::TrailingSlashRedirect(to) => Some(to),
            _ => None,
        }
    }

    /// True for [`MatchResult::Matched`]
    #[must_use]
    pub fn is_match(&self) -> bool {
        matches!(self, MatchResult::Matched(_))
    }

    /// Short label for logs
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            MatchResult::Matched(_) => "matched",
            MatchResult::FixedPathRedirect(_) => "fixed_path_redirect",
            MatchResult::TrailingSlashRedirect(_) => "trailing_slash_redirect",
            MatchResult::NotFound => "not_found",
        }
    }

    /// Consume the result, keeping only a successful match
    #[must_use]
    pub fn into_route_match(self) -> Option<RouteMatch<'t, H>> {
        match self {
            MatchResult::Matched(m) => Some(m),
            _ => None,
        }
    }
}

/// Prefix tree of compiled route patterns
///
/// Build it with [`Trie::define`] during startup, then share it read-only:
/// `define` takes `&mut self` and `match_path` takes `&self`, so the
/// construction-then-lookup discipline is checked by the compiler rather
/// than by a lock on the hot path.
///
/// # Example
///
/// ```rust
/// use pathtrie::{MatchResult, Trie};
///
/// let mut trie: Trie<&str> = Trie::new();
/// trie.define("/api/:type/:ID")?.attach_handler("GET", "get_item")?;
///
/// match trie.match_path("/api/user/123")? {
///     MatchResult::Matched(m) => {
///         assert_eq!(m.handler("GET"), Some(&"get_item"));
///         assert_eq!(m.get_param("type"), Some("user"));
///         assert_eq!(m.get_param("ID"), Some("123"));
///     }
///     other => panic!("unexpected {:?}", other.kind()),
/// }
/// # Ok::<(), pathtrie::TrieError>(())
/// ```
#[derive(Debug)]
pub struct Trie<H> {
    options: TrieOptions,
    root: Node<H>,
}

impl<H> Default for Trie<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> Trie<H> {
    /// Create a trie with every option enabled
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(TrieOptions::default())
    }

    /// Create a trie with explicit options
    #[must_use]
    pub fn with_options(options: TrieOptions) -> Self {
        Self {
            options,
            root: Node::root(),
        }
    }

    /// Options fixed at construction
    #[must_use]
    pub fn options(&self) -> TrieOptions {
        self.options
    }

    /// Root of the tree, for inspection
    #[must_use]
    pub fn root(&self) -> &Node<H> {
        &self.root
    }

    /// Register a pattern and return its endpoint node
    ///
    /// Defining the same pattern again returns the same node. One leading
    /// `/` is stripped; every other `/` separates fragments, and an empty
    /// final fragment stands for a trailing slash.
    ///
    /// # Errors
    ///
    /// - [`TrieError::MultiSlash`] if the pattern contains `//`
    /// - [`TrieError::InvalidPattern`] / [`TrieError::InvalidRegex`] for
    ///   fragments outside the grammar
    /// - [`TrieError::ConflictingParameter`] if another parameter shape is
    ///   already defined at the same position
    /// - [`TrieError::PatternAfterCatchAll`] if the pattern continues past a
    ///   catch-all parameter
    pub fn define(&mut self, pattern: &str) -> Result<&mut Node<H>, TrieError> {
        if pattern.contains("//") {
            return Err(TrieError::MultiSlash {
                pattern: pattern.to_string(),
            });
        }

        let ignore_case = self.options.ignore_case;
        let trimmed = pattern.strip_prefix('/').unwrap_or(pattern);
        let fragments = trimmed
            .split('/')
            .map(|fragment| compile_fragment(fragment, ignore_case).map(|spec| (fragment, spec)))
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(last) = fragments.iter().position(|(_, spec)| spec.is_catch_all()) {
            if last + 1 < fragments.len() {
                let mut position = String::new();
                for (fragment, _) in &fragments[..=last] {
                    position.push('/');
                    position.push_str(fragment);
                }
                return Err(TrieError::PatternAfterCatchAll {
                    pattern: pattern.to_string(),
                    position,
                });
            }
        }

        // A failed define must leave the tree as it was
        let mut existing = Some(&self.root);
        for (fragment, spec) in &fragments {
            let Some(node) = existing else { break };
            existing = node.existing_child(spec, fragment)?;
        }

        let mut node = &mut self.root;
        for (fragment, spec) in fragments {
            node = node.child_or_insert(spec, fragment)?;
        }
        node.mark_endpoint(pattern);

        debug!(
            pattern = %pattern,
            position = %node.position(),
            catch_all = node.is_catch_all(),
            "Pattern defined"
        );

        Ok(node)
    }

    /// Match a request path
    ///
    /// # Errors
    ///
    /// [`TrieError::InvalidPath`] if `path` is empty or does not start with
    /// `/`. Misses and redirects are ordinary [`MatchResult`] values.
    pub fn match_path(&self, path: &str) -> Result<MatchResult<'_, H>, TrieError> {
        if !path.starts_with('/') {
            return Err(TrieError::InvalidPath {
                path: path.to_string(),
            });
        }

        let collapsed = if self.options.fixed_path_redirect {
            MULTI_SLASH.replace_all(path, "/")
        } else {
            Cow::Borrowed(path)
        };
        let was_fixed = matches!(collapsed, Cow::Owned(_));
        let path = collapsed.as_ref();

        let result = self.walk(path, was_fixed);
        trace!(path = %path, outcome = result.kind(), "Route match");
        Ok(result)
    }

    fn walk<'t>(&'t self, path: &str, was_fixed: bool) -> MatchResult<'t, H> {
        let ignore_case = self.options.ignore_case;
        let tsr = self.options.trailing_slash_redirect;
        let end = path.len();

        let mut params = ParamVec::new();
        let mut node = &self.root;
        let mut start = 1;

        loop {
            let stop = path[start..].find('/').map_or(end, |i| start + i);
            let fragment = &path[start..stop];

            let Some(child) = node.match_child(fragment, ignore_case) else {
                // "/a/b/" where "/a/b" is registered
                if tsr && node.is_endpoint() && stop == end && fragment.is_empty() {
                    return Self::redirect(path[..end - 1].to_string(), was_fixed);
                }
                return MatchResult::NotFound;
            };

            node = child;
            if node.is_dynamic() {
                if node.is_catch_all() {
                    params.push((Arc::clone(node.name_arc()), path[start..].to_string()));
                    break;
                }
                params.push((Arc::clone(node.name_arc()), fragment.to_string()));
            }

            if stop == end {
                break;
            }
            start = stop + 1;
        }

        if node.is_endpoint() {
            if was_fixed {
                return MatchResult::FixedPathRedirect(path.to_string());
            }
            return MatchResult::Matched(RouteMatch { node, params });
        }

        // "/a/b" where "/a/b/" is registered
        if tsr && node.literal_child("").is_some() {
            let mut target = String::with_capacity(end + 1);
            target.push_str(path);
            target.push('/');
            return Self::redirect(target, was_fixed);
        }

        MatchResult::NotFound
    }

    fn redirect<'t>(target: String, was_fixed: bool) -> MatchResult<'t, H> {
        if was_fixed {
            MatchResult::FixedPathRedirect(target)
        } else {
            MatchResult::TrailingSlashRedirect(target)
        }
    }

    /// Every endpoint node, sorted by pattern
    #[must_use]
    pub fn endpoints(&self) -> Vec<&Node<H>> {
        let mut out = Vec::new();
        let mut stack = vec![&self.root];
        while let Some(node) = stack.pop() {
            if node.is_endpoint() {
                out.push(node);
            }
            stack.extend(node.literal_children().map(|(_, child)| child));
            stack.extend(node.dynamic_child());
        }
        out.sort_by(|a, b| a.pattern().cmp(b.pattern()));
        out
    }
}
