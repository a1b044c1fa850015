//! Permission Types
//!
//! A permission is an immutable `(resource, action)` capability atom. Either
//! side may be a wildcard, modelled as a tagged [`Scope`] rather than a magic
//! `"*"` string so a resource literally named `*` never widens a grant.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Verb a permission grants on a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
    Execute,
    /// Download data out of the dashboard (analytics, audit log).
    Export,
}

impl Action {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Execute => "execute",
            Self::Export => "export",
        }
    }

    /// Returns all actions as a slice.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Create,
            Self::Read,
            Self::Update,
            Self::Delete,
            Self::Execute,
            Self::Export,
        ]
    }
}

impl AsRef<str> for Action {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| Error::UnknownAction(s.to_string()))
    }
}

/// Either every value (`Wildcard`) or exactly one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope<T> {
    Wildcard,
    Exact(T),
}

impl<T> Scope<T> {
    #[must_use]
    pub const fn is_wildcard(&self) -> bool {
        matches!(self, Self::Wildcard)
    }
}

/// Resource side of a permission.
pub type ResourceScope = Scope<String>;

/// Action side of a permission.
pub type ActionScope = Scope<Action>;

impl Scope<String> {
    /// Whether this scope covers the queried resource tag.
    #[must_use]
    pub fn matches(&self, resource: &str) -> bool {
        match self {
            Self::Wildcard => true,
            Self::Exact(tag) => tag == resource,
        }
    }
}

impl Scope<Action> {
    /// Whether this scope covers the queried action.
    ///
    /// Queries are free strings; anything that is not a known [`Action`]
    /// can only be matched by a wildcard.
    #[must_use]
    pub fn matches(&self, action: &str) -> bool {
        match self {
            Self::Wildcard => true,
            Self::Exact(a) => a.as_str() == action,
        }
    }
}

/// A `(resource, action)` capability atom.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Permission {
    pub id: String,
    /// Human-readable label, e.g. "View Dashboard".
    pub name: String,
    pub resource: ResourceScope,
    pub action: ActionScope,
}

impl Permission {
    /// Exact permission on a single resource and action.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        resource: impl Into<String>,
        action: Action,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            resource: Scope::Exact(resource.into()),
            action: Scope::Exact(action),
        }
    }

    /// Wildcard on both sides; matches every query.
    #[must_use]
    pub fn full_access() -> Self {
        Self {
            id: "all_access".to_string(),
            name: "Full Access".to_string(),
            resource: Scope::Wildcard,
            action: Scope::Wildcard,
        }
    }

    #[must_use]
    pub fn matches(&self, resource: &str, action: &str) -> bool {
        self.resource.matches(resource) && self.action.matches(action)
    }
}
