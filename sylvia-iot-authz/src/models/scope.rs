//! Scope strings and matching policies.
//!
//! A scope string is a set of whitespace-delimited scope tokens such as `api:read api:write`.
//! There is no canonical ordering and duplicates are harmless.

pub const SCOPE_READ: &'static str = "api:read";
pub const SCOPE_WRITE: &'static str = "api:write";
pub const SCOPE_ADMIN: &'static str = "api:admin";
pub const DEFAULT_SCOPE: &'static str = "api:read api:write";

/// How a required scope is compared with a scope string.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum ScopeMatch {
    /// The required scope occurs anywhere in the scope string.
    ///
    /// `api:read` matches `api:readonly`. Scope names must be chosen so that one is never a
    /// substring of another.
    #[default]
    Substring,
    /// The required scope equals one of the whitespace-delimited tokens.
    Exact,
}

impl ScopeMatch {
    pub const SUBSTRING: &'static str = "substring";
    pub const EXACT: &'static str = "exact";

    /// To parse the configuration value. Returns `None` for unknown values.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            Self::SUBSTRING => Some(ScopeMatch::Substring),
            Self::EXACT => Some(ScopeMatch::Exact),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ScopeMatch::Substring => Self::SUBSTRING,
            ScopeMatch::Exact => Self::EXACT,
        }
    }

    /// Empty inputs never match.
    pub fn matches(&self, scopes: &str, scope: &str) -> bool {
        if scopes.len() == 0 || scope.len() == 0 {
            return false;
        }
        match self {
            ScopeMatch::Substring => scopes.contains(scope),
            ScopeMatch::Exact => scopes.split_whitespace().any(|s| s == scope),
        }
    }
}

/// To check if `scopes` grants `scope` using [`ScopeMatch::Substring`].
pub fn has_scope(scopes: &str, scope: &str) -> bool {
    ScopeMatch::Substring.matches(scopes, scope)
}
