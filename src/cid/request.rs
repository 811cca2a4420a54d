//! Scope requests and their validation.

use serde::{Deserialize, Serialize};

use crate::error::CidError;

/// A validated request for a scope-specific identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeRequest {
    /// Namespace of the requesting integration. Matches `[A-Za-z0-9_-]+`.
    pub scope: String,
    /// Whether a missing scope cookie may be created on direct documents.
    #[serde(default)]
    pub create_if_missing: bool,
    /// Cookie to read instead of one named after the scope.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cookie_name: Option<String>,
}

impl ScopeRequest {
    /// A request that may create the scope cookie.
    #[must_use]
    pub fn creating(scope: impl Into<String>) -> Self {
        Self { scope: scope.into(), create_if_missing: true, cookie_name: None }
    }

    /// Uses `name` as the cookie for this scope.
    #[must_use]
    pub fn with_cookie_name(mut self, name: impl Into<String>) -> Self {
        self.cookie_name = Some(name.into());
        self
    }

    /// Cookie name on the direct-origin path.
    #[must_use]
    pub fn cookie_name(&self) -> &str {
        self.cookie_name.as_deref().unwrap_or(&self.scope)
    }
}

/// What callers may pass to [`crate::cid::CidService::resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeArg {
    /// Bare scope name; never creates a cookie.
    Scope(String),
    /// Full request.
    Request(ScopeRequest),
}

impl ScopeArg {
    /// Normalizes into a [`ScopeRequest`], validating the scope.
    ///
    /// # Errors
    ///
    /// Returns [`CidError::InvalidScope`] if the scope is empty or contains
    /// characters outside `[A-Za-z0-9_-]`.
    pub fn into_request(self) -> Result<ScopeRequest, CidError> {
        let request = match self {
            Self::Scope(scope) => {
                ScopeRequest { scope, create_if_missing: false, cookie_name: None }
            }
            Self::Request(request) => request,
        };
        validate_scope(&request.scope)?;
        Ok(request)
    }
}

impl From<&str> for ScopeArg {
    fn from(scope: &str) -> Self {
        Self::Scope(scope.to_string())
    }
}

impl From<String> for ScopeArg {
    fn from(scope: String) -> Self {
        Self::Scope(scope)
    }
}

impl From<ScopeRequest> for ScopeArg {
    fn from(request: ScopeRequest) -> Self {
        Self::Request(request)
    }
}

/// Checks `scope` against `[A-Za-z0-9_-]+`.
///
/// # Errors
///
/// Returns [`CidError::InvalidScope`] on an empty scope or a disallowed character.
pub fn validate_scope(scope: &str) -> Result<(), CidError> {
    let valid = !scope.is_empty()
        && scope.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
    if valid {
        Ok(())
    } else {
        Err(CidError::InvalidScope(scope.to_string()))
    }
}
