//! # Dispatch Module
//!
//! Turns a [`MatchResult`] and a request method into the decision an HTTP
//! dispatcher acts on. Nothing here performs I/O or invokes handlers; the
//! caller owns both.
//!
//! | Lookup outcome | Method has handler | Decision |
//! |----------------|--------------------|----------|
//! | matched | yes | [`Resolution::Handler`] |
//! | matched | no, others do | [`Resolution::MethodNotAllowed`] (405) |
//! | matched | node has no handlers | [`Resolution::NotImplemented`] (501) |
//! | fixed-path / trailing-slash redirect | - | [`Resolution::Redirect`] (301 / 307) |
//! | not found | - | [`Resolution::NotFound`] (404) |

use tracing::trace;

use crate::trie::{MatchResult, RouteMatch};

/// Status for redirects of safe requests
pub const STATUS_MOVED_PERMANENTLY: u16 = 301;
/// Status for redirects that must keep the method and body
pub const STATUS_TEMPORARY_REDIRECT: u16 = 307;
/// Status when nothing matches
pub const STATUS_NOT_FOUND: u16 = 404;
/// Status when the path matches but the method does not
pub const STATUS_METHOD_NOT_ALLOWED: u16 = 405;
/// Status when the path matches but no handler is attached at all
pub const STATUS_NOT_IMPLEMENTED: u16 = 501;

/// What a dispatcher should do with a request
#[derive(Debug)]
pub enum Resolution<'t, H> {
    /// Invoke `handler` with the bound parameters
    Handler {
        /// Handler attached for the request method
        handler: &'t H,
        /// The match it was found through
        route: RouteMatch<'t, H>,
    },
    /// Answer with a redirect to `location`
    Redirect {
        /// Corrected path
        location: String,
        /// 301 for `GET`/`HEAD`, 307 otherwise
        status: u16,
    },
    /// 404
    NotFound,
    /// 405, with the methods that are registered
    MethodNotAllowed {
        /// Value for the `Allow` header
        allow: &'t str,
    },
    /// 501
    NotImplemented,
}

impl<'t, H> Resolution<'t, H> {
    /// HTTP status code for this decision; 200 for a handler
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            Resolution::Handler { .. } => 200,
            Resolution::Redirect { status, .. } => *status,
            Resolution::NotFound => STATUS_NOT_FOUND,
            Resolution::MethodNotAllowed { .. } => STATUS_METHOD_NOT_ALLOWED,
            Resolution::NotImplemented => STATUS_NOT_IMPLEMENTED,
        }
    }

    /// `Allow` header value for a 405
    #[must_use]
    pub fn allow(&self) -> Option<&'t str> {
        match self {
            Resolution::MethodNotAllowed { allow } => Some(allow),
            _ => None,
        }
    }
}

/// Redirect status for a request method
#[must_use]
pub fn redirect_status(method: &str) -> u16 {
    if method.eq_ignore_ascii_case("GET") || method.eq_ignore_ascii_case("HEAD") {
        STATUS_MOVED_PERMANENTLY
    } else {
        STATUS_TEMPORARY_REDIRECT
    }
}

/// Resolve a lookup result for `method`
///
/// `method` is compared to the attached method keys exactly as given.
#[must_use]
pub fn resolve<'t, H>(result: MatchResult<'t, H>, method: &str) -> Resolution<'t, H> {
    let resolution = match result {
        MatchResult::Matched(route) => match route.handler(method) {
            Some(handler) => Resolution::Handler { handler, route },
            None if route.node.allow().is_empty() => Resolution::NotImplemented,
            None => Resolution::MethodNotAllowed {
                allow: route.node.allow(),
            },
        },
        MatchResult::FixedPathRedirect(location) | MatchResult::TrailingSlashRedirect(location) => {
            Resolution::Redirect {
                location,
                status: redirect_status(method),
            }
        }
        MatchResult::NotFound => Resolution::NotFound,
    };

    trace!(method, status = resolution.status(), "Request resolved");
    resolution
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trie::Trie;

    fn trie() -> Trie<&'static str> {
        let mut trie = Trie::new();
        let node = trie.define("/pets/:id").unwrap();
        node.attach_handler("GET", "get_pet").unwrap();
        node.attach_handler("DELETE", "delete_pet").unwrap();
        trie.define("/bare").unwrap();
        trie
    }

    #[test]
    fn test_handler_found() {
        let trie = trie();
        match resolve(trie.match_path("/pets/7").unwrap(), "GET") {
            Resolution::Handler { handler, route } => {
                assert_eq!(*handler, "get_pet");
                assert_eq!(route.get_param("id"), Some("7"));
            }
            other => panic!("unexpected status {}", other.status()),
        }
    }

    #[test]
    fn test_method_not_allowed_lists_methods() {
        let trie = trie();
        let resolution = resolve(trie.match_path("/pets/7").unwrap(), "PUT");
        assert_eq!(resolution.status(), 405);
        assert_eq!(resolution.allow(), Some("GET, DELETE"));
    }

    #[test]
    fn test_not_implemented_without_handlers() {
        let trie = trie();
        let resolution = resolve(trie.match_path("/bare").unwrap(), "GET");
        assert!(matches!(resolution, Resolution::NotImplemented));
        assert_eq!(resolution.status(), 501);
    }

    #[test]
    fn test_redirect_statuses() {
        let trie = trie();
        match resolve(trie.match_path("/pets/7/").unwrap(), "GET") {
            Resolution::Redirect { location, status } => {
                assert_eq!(location, "/pets/7");
                assert_eq!(status, 301);
            }
            other => panic!("unexpected status {}", other.status()),
        }
        let resolution = resolve(trie.match_path("//pets/7").unwrap(), "POST");
        assert_eq!(resolution.status(), 307);
    }

    #[test]
    fn test_not_found() {
        let trie = trie();
        let resolution = resolve(trie.match_path("/owners").unwrap(), "GET");
        assert!(matches!(resolution, Resolution::NotFound));
        assert_eq!(resolution.allow(), None);
    }

    #[test]
    fn test_redirect_status_by_method() {
        assert_eq!(redirect_status("GET"), 301);
        assert_eq!(redirect_status("head"), 301);
        assert_eq!(redirect_status("PATCH"), 307);
    }
}
