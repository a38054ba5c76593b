//! Pattern compiler - turns one registration fragment into a node specification.
//!
//! A registration pattern such as `/api/:type/:ID(^\d+$)` is split on `/` by
//! [`Trie::define`](super::Trie::define) and every fragment is compiled here
//! before the tree is touched, so a grammar error never leaves a half-built
//! route behind.
//!
//! ## Grammar
//!
//! | Fragment | Compiles to |
//! |----------|-------------|
//! | `users` | literal, exact match |
//! | `::users` | literal `:users` (one leading `:` stripped) |
//! | `:id` | named parameter, any non-empty fragment |
//! | `:path*` | named catch-all, the rest of the path |
//! | `:id(^\d+$)` | named parameter constrained by a regex |
//! | (empty) | literal trailing slash |
//!
//! Parameter names are restricted to `[0-9A-Za-z_]+`.

use regex::Regex;
use std::fmt;
use std::sync::Arc;

use crate::error::TrieError;

/// Compiled regex constraint of a named parameter
///
/// Equality is defined on the source text: two definitions of the same
/// parameter must spell the expression identically.
#[derive(Clone)]
pub struct PathRegex {
    source: Box<str>,
    re: Regex,
}

impl PathRegex {
    fn new(source: &str, fragment: &str) -> Result<Self, TrieError> {
        let re = Regex::new(source).map_err(|e| TrieError::InvalidRegex {
            fragment: fragment.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            source: source.into(),
            re,
        })
    }

    /// The expression as written in the pattern
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// The compiled expression
    #[must_use]
    pub fn regex(&self) -> &Regex {
        &self.re
    }

    /// Unanchored test; anchors belong in the expression itself
    #[inline]
    #[must_use]
    pub fn is_match(&self, fragment: &str) -> bool {
        self.re.is_match(fragment)
    }
}

impl fmt::Debug for PathRegex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PathRegex").field(&self.source).finish()
    }
}

impl PartialEq for PathRegex {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for PathRegex {}

/// How a named parameter consumes the request path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamKind {
    /// `:name` - one non-empty fragment
    Named,
    /// `:name*` - the remainder of the path, separators included
    CatchAll,
    /// `:name(expr)` - one non-empty fragment satisfying `expr`
    Regex(PathRegex),
}

/// Named parameter parsed from a `:`-prefixed fragment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamSpec {
    /// Parameter name, shared with every match that binds it
    pub name: Arc<str>,
    /// Matching behaviour
    pub kind: ParamKind,
}

/// Compiled form of one pattern fragment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FragmentSpec {
    /// Exact-match key, already unescaped and case-folded
    Literal(String),
    /// Dynamic child
    Param(ParamSpec),
}

impl FragmentSpec {
    /// True for `:name*`
    #[must_use]
    pub fn is_catch_all(&self) -> bool {
        matches!(
            self,
            FragmentSpec::Param(ParamSpec {
                kind: ParamKind::CatchAll,
                ..
            })
        )
    }
}

/// Compile a single fragment of a registration pattern
///
/// With `ignore_case` set, literal keys are lowercased; parameter names and
/// regex sources are never folded.
///
/// # Errors
///
/// [`TrieError::InvalidPattern`] for grammar violations and
/// [`TrieError::InvalidRegex`] when a constraint fails to compile.
pub fn compile_fragment(fragment: &str, ignore_case: bool) -> Result<FragmentSpec, TrieError> {
    if let Some(escaped) = fragment.strip_prefix("::") {
        // "::" itself is the literal ":"
        let mut key = String::with_capacity(escaped.len() + 1);
        key.push(':');
        key.push_str(escaped);
        return Ok(FragmentSpec::Literal(fold(key, ignore_case)));
    }

    if let Some(body) = fragment.strip_prefix(':') {
        return compile_param(fragment, body).map(FragmentSpec::Param);
    }

    if fragment.starts_with(['*', '(', ')']) {
        return Err(invalid(fragment));
    }

    Ok(FragmentSpec::Literal(fold(fragment.to_string(), ignore_case)))
}

fn compile_param(fragment: &str, body: &str) -> Result<ParamSpec, TrieError> {
    let mut name = body;
    let mut kind = ParamKind::Named;

    if let Some(head) = body.strip_suffix(')') {
        // An unmatched ')' stays in the name and fails the name check below
        if let Some(open) = head.find('(').filter(|&i| i > 0) {
            let expr = &head[open + 1..];
            if expr.is_empty() {
                return Err(invalid(fragment));
            }
            name = &head[..open];
            kind = ParamKind::Regex(PathRegex::new(expr, fragment)?);
        }
    } else if let Some(head) = body.strip_suffix('*') {
        name = head;
        kind = ParamKind::CatchAll;
    }

    if !is_param_name(name) {
        return Err(invalid(fragment));
    }

    Ok(ParamSpec {
        name: Arc::from(name),
        kind,
    })
}

fn is_param_name(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

fn fold(key: String, ignore_case: bool) -> String {
    if ignore_case {
        key.to_lowercase()
    } else {
        key
    }
}

fn invalid(fragment: &str) -> TrieError {
    TrieError::InvalidPattern {
        fragment: fragment.to_string(),
    }
}
