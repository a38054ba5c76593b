use std::fmt;

/// Error returned by route registration and by malformed lookups
///
/// Every variant except [`TrieError::InvalidPath`] is a construction-time
/// failure: the route table is broken and would behave unpredictably if it
/// were used anyway. Callers decide whether that is fatal at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrieError {
    /// The pattern contains two consecutive separators (`//`)
    MultiSlash {
        /// The rejected pattern
        pattern: String,
    },
    /// A fragment does not follow the pattern grammar
    ///
    /// Raised for bad parameter names (`:a-b`, `:`), empty regex
    /// constraints (`:id()`) and literals starting with `*`, `(` or `)`.
    InvalidPattern {
        /// The offending fragment
        fragment: String,
    },
    /// The regex constraint of a named parameter failed to compile
    InvalidRegex {
        /// The offending fragment
        fragment: String,
        /// Message from the regex engine
        reason: String,
    },
    /// A different parameter shape is already defined at this position
    ///
    /// A node may only ever have one dynamic child; its name, catch-all flag
    /// and regex text must match on every definition.
    ConflictingParameter {
        /// The offending fragment
        fragment: String,
        /// Position of the parent node (e.g. `/api/:type`)
        position: String,
        /// Fragment text of the dynamic child already registered there
        existing: String,
    },
    /// A pattern continues past a catch-all parameter
    PatternAfterCatchAll {
        /// The rejected pattern
        pattern: String,
        /// Position of the catch-all node
        position: String,
    },
    /// A handler is already attached for this method on this node
    DuplicateHandler {
        /// Pattern of the endpoint node
        pattern: String,
        /// Method key that was registered twice
        method: String,
    },
    /// A lookup path that is empty or does not start with `/`
    InvalidPath {
        /// The rejected path
        path: String,
    },
}

impl fmt::Display for TrieError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrieError::MultiSlash { pattern } => {
                write!(f, "multi-slash in pattern: \"{}\"", pattern)
            }
            TrieError::InvalidPattern { fragment } => {
                write!(f, "invalid pattern fragment: \"{}\"", fragment)
            }
            TrieError::InvalidRegex { fragment, reason } => {
                write!(
                    f,
                    "invalid regex in pattern fragment \"{}\": {}",
                    fragment, reason
                )
            }
            TrieError::ConflictingParameter {
                fragment,
                position,
                existing,
            } => {
                write!(
                    f,
                    "parameter \"{}\" conflicts with \"{}\" already defined under \"{}\"",
                    fragment, existing, position
                )
            }
            TrieError::PatternAfterCatchAll { pattern, position } => {
                write!(
                    f,
                    "can't define pattern \"{}\" after catch-all parameter \"{}\"",
                    pattern, position
                )
            }
            TrieError::DuplicateHandler { pattern, method } => {
                write!(
                    f,
                    "handler for \"{}\" already defined on \"{}\"",
                    method, pattern
                )
            }
            TrieError::InvalidPath { path } => {
                write!(f, "path does not start with \"/\": \"{}\"", path)
            }
        }
    }
}

impl std::error::Error for TrieError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_the_offending_input() {
        let err = TrieError::InvalidPattern {
            fragment: ":a-b".to_string(),
        };
        assert_eq!(err.to_string(), "invalid pattern fragment: \":a-b\"");

        let err = TrieError::DuplicateHandler {
            pattern: "/api".to_string(),
            method: "GET".to_string(),
        };
        assert!(err.to_string().contains("\"GET\""));
        assert!(err.to_string().contains("\"/api\""));
    }

    #[test]
    fn test_error_is_usable_with_anyhow() {
        let err: anyhow::Error = TrieError::InvalidPath {
            path: "api".to_string(),
        }
        .into();
        assert!(err.to_string().contains("\"api\""));
    }
}
