//! Trie vertices and their handler tables.

use regex::Regex;
use std::collections::HashMap;
use std::sync::Arc;

use super::pattern::{FragmentSpec, ParamKind, ParamSpec, PathRegex};
use crate::error::TrieError;

/// One vertex of the route tree
///
/// A node stands for a single path fragment shared by every pattern with the
/// same prefix. Children are owned outright: literal children in a map keyed
/// by fragment text (the empty key is a trailing slash), and at most one
/// dynamic child for a named parameter.
///
/// Nodes are handed out by [`Trie::define`](super::Trie::define) so that the
/// dispatch layer can attach handlers of type `H`; the trie itself never
/// looks at them.
#[derive(Debug)]
pub struct Node<H> {
    /// Parameter name, empty for literal nodes
    name: Arc<str>,
    /// First pattern registered at this node
    pattern: String,
    endpoint: bool,
    catch_all: bool,
    regex: Option<PathRegex>,
    /// Path from the root to this node, as first defined
    position: Arc<str>,
    /// Position of the parent; diagnostics only, never walked
    parent: Option<Arc<str>>,
    children: HashMap<String, Node<H>>,
    dynamic_child: Option<Box<Node<H>>>,
    handlers: HashMap<String, H>,
    /// Registered method keys in registration order, comma separated
    allow: String,
}

impl<H> Node<H> {
    pub(crate) fn root() -> Self {
        Self::new(Arc::from(""), None, Arc::from(""))
    }

    fn new(position: Arc<str>, parent: Option<Arc<str>>, name: Arc<str>) -> Self {
        Self {
            name,
            pattern: String::new(),
            endpoint: false,
            catch_all: false,
            regex: None,
            position,
            parent,
            children: HashMap::new(),
            dynamic_child: None,
            handlers: HashMap::new(),
            allow: String::new(),
        }
    }

    /// Parameter name, or `""` for a literal node
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn name_arc(&self) -> &Arc<str> {
        &self.name
    }

    /// Whether this node binds a parameter
    #[must_use]
    pub fn is_dynamic(&self) -> bool {
        !self.name.is_empty()
    }

    /// The registration pattern that ends here, or `""` if none does
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// True once some `define` call ended exactly at this node
    #[must_use]
    pub fn is_endpoint(&self) -> bool {
        self.endpoint
    }

    /// True if the parameter consumes the remainder of the path
    #[must_use]
    pub fn is_catch_all(&self) -> bool {
        self.catch_all
    }

    /// Regex constraint of a named parameter
    #[must_use]
    pub fn regex(&self) -> Option<&Regex> {
        self.regex.as_ref().map(PathRegex::regex)
    }

    /// Path from the root to this node, e.g. `/api/:type`
    #[must_use]
    pub fn position(&self) -> &str {
        if self.position.is_empty() {
            "/"
        } else {
            &self.position
        }
    }

    /// Position of the parent node, `None` for the root
    #[must_use]
    pub fn parent(&self) -> Option<&str> {
        self.parent
            .as_deref()
            .map(|p| if p.is_empty() { "/" } else { p })
    }

    /// Fragment text this node was first defined with
    fn fragment(&self) -> &str {
        self.position
            .rsplit_once('/')
            .map_or("", |(_, fragment)| fragment)
    }

    /// Literal child registered under `key` (case-folded if the trie is)
    #[must_use]
    pub fn literal_child(&self, key: &str) -> Option<&Node<H>> {
        self.children.get(key)
    }

    /// Literal children keyed by fragment text
    pub fn literal_children(&self) -> impl Iterator<Item = (&str, &Node<H>)> {
        self.children.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The single named-parameter child, if any
    #[must_use]
    pub fn dynamic_child(&self) -> Option<&Node<H>> {
        self.dynamic_child.as_deref()
    }

    /// Attach a handler for a method key
    ///
    /// # Errors
    ///
    /// [`TrieError::DuplicateHandler`] if `method` already has a handler here.
    pub fn attach_handler(&mut self, method: impl Into<String>, handler: H) -> Result<(), TrieError> {
        let method = method.into();
        if self.handlers.contains_key(&method) {
            let pattern = if self.pattern.is_empty() {
                self.position()
            } else {
                &self.pattern
            };
            return Err(TrieError::DuplicateHandler {
                pattern: pattern.to_string(),
                method,
            });
        }
        if !self.allow.is_empty() {
            self.allow.push_str(", ");
        }
        self.allow.push_str(&method);
        self.handlers.insert(method, handler);
        Ok(())
    }

    /// Handler attached for `method`
    #[inline]
    #[must_use]
    pub fn lookup_handler(&self, method: &str) -> Option<&H> {
        self.handlers.get(method)
    }

    /// Registered method keys for an `Allow` header, e.g. `"GET, PUT"`
    #[must_use]
    pub fn allow(&self) -> &str {
        &self.allow
    }

    /// Registered method keys in registration order
    pub fn methods(&self) -> impl Iterator<Item = &str> {
        self.allow.split(", ").filter(|m| !m.is_empty())
    }

    pub(crate) fn mark_endpoint(&mut self, pattern: &str) {
        self.endpoint = true;
        if self.pattern.is_empty() {
            self.pattern = pattern.to_string();
        }
    }

    /// Return the child for a compiled fragment, creating it if absent
    pub(crate) fn child_or_insert(
        &mut self,
        spec: FragmentSpec,
        fragment: &str,
    ) -> Result<&mut Node<H>, TrieError> {
        let position: Arc<str> = Arc::from(format!("{}/{}", self.position, fragment));
        let parent = Some(Arc::clone(&self.position));

        match spec {
            FragmentSpec::Literal(key) => Ok(self
                .children
                .entry(key)
                .or_insert_with(|| Node::new(position, parent, Arc::from("")))),
            FragmentSpec::Param(param) => {
                if let Some(existing) = self.dynamic_child.as_deref() {
                    if !existing.same_param(&param) {
                        return Err(self.conflict(existing, fragment));
                    }
                }
                let child = self
                    .dynamic_child
                    .get_or_insert_with(|| Box::new(Node::param(position, parent, param)));
                Ok(&mut **child)
            }
        }
    }

    /// Child a compiled fragment would walk into, without creating it
    ///
    /// `Ok(None)` means the fragment would grow a new branch here.
    pub(crate) fn existing_child(
        &self,
        spec: &FragmentSpec,
        fragment: &str,
    ) -> Result<Option<&Node<H>>, TrieError> {
        match spec {
            FragmentSpec::Literal(key) => Ok(self.children.get(key.as_str())),
            FragmentSpec::Param(param) => match self.dynamic_child.as_deref() {
                Some(existing) if !existing.same_param(param) => {
                    Err(self.conflict(existing, fragment))
                }
                existing => Ok(existing),
            },
        }
    }

    fn conflict(&self, existing: &Node<H>, fragment: &str) -> TrieError {
        TrieError::ConflictingParameter {
            fragment: fragment.to_string(),
            position: self.position().to_string(),
            existing: existing.fragment().to_string(),
        }
    }

    fn param(position: Arc<str>, parent: Option<Arc<str>>, param: ParamSpec) -> Self {
        let mut node = Node::new(position, parent, param.name);
        match param.kind {
            ParamKind::Named => {}
            ParamKind::CatchAll => node.catch_all = true,
            ParamKind::Regex(re) => node.regex = Some(re),
        }
        node
    }

    fn same_param(&self, param: &ParamSpec) -> bool {
        let (catch_all, regex) = match &param.kind {
            ParamKind::Named => (false, None),
            ParamKind::CatchAll => (true, None),
            ParamKind::Regex(re) => (false, Some(re)),
        };
        self.name == param.name && self.catch_all == catch_all && self.regex.as_ref() == regex
    }

    /// Whether the dynamic child accepts a request fragment
    ///
    /// Named and regex parameters need a non-empty fragment; a catch-all
    /// takes whatever remains.
    #[inline]
    fn accepts(&self, fragment: &str) -> bool {
        if self.catch_all {
            return true;
        }
        if fragment.is_empty() {
            return false;
        }
        self.regex.as_ref().map_or(true, |re| re.is_match(fragment))
    }

    /// Child for one request fragment: literal first, then the dynamic child
    ///
    /// The regex of a dynamic child always sees the fragment as sent.
    #[inline]
    pub(crate) fn match_child(&self, fragment: &str, ignore_case: bool) -> Option<&Node<H>> {
        if let Some(child) = self.children.get(fragment) {
            return Some(child);
        }
        if ignore_case && folds(fragment) {
            if let Some(child) = self.children.get(fragment.to_lowercase().as_str()) {
                return Some(child);
            }
        }
        self.dynamic_child
            .as_deref()
            .filter(|child| child.accepts(fragment))
    }
}

/// Whether lowercasing changes `fragment`
///
/// Covers titlecase letters such as `ǅ`, which are not uppercase but still fold.
fn folds(fragment: &str) -> bool {
    fragment.chars().any(|c| {
        let mut lower = c.to_lowercase();
        lower.next() != Some(c) || lower.next().is_some()
    })
}
