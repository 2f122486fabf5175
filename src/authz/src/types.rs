//! Core authorization types

use crate::error::AuthzError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Unique policy identifier
pub type PolicyId = String;

/// A level of the permission hierarchy.
///
/// The derived `Ord` is declaration order and exists only so scopes can key
/// ordered maps. Nesting is defined by the [`ScopeTree`](crate::scope::ScopeTree),
/// never by this ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionScope {
    User,
    Project,
    Cluster,
    Namespace,
    Release,
    Stack,
    Registry,
    HelmRepo,
    Infra,
    Operation,
    GitInstallation,
    Invite,
    Settings,
}

impl PermissionScope {
    /// Every known scope
    pub const ALL: [PermissionScope; 13] = [
        Self::User,
        Self::Project,
        Self::Cluster,
        Self::Namespace,
        Self::Release,
        Self::Stack,
        Self::Registry,
        Self::HelmRepo,
        Self::Infra,
        Self::Operation,
        Self::GitInstallation,
        Self::Invite,
        Self::Settings,
    ];

    /// Wire name of the scope
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Project => "project",
            Self::Cluster => "cluster",
            Self::Namespace => "namespace",
            Self::Release => "release",
            Self::Stack => "stack",
            Self::Registry => "registry",
            Self::HelmRepo => "helm_repo",
            Self::Infra => "infra",
            Self::Operation => "operation",
            Self::GitInstallation => "git_installation",
            Self::Invite => "invite",
            Self::Settings => "settings",
        }
    }
}

impl fmt::Display for PermissionScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PermissionScope {
    type Err = AuthzError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|scope| scope.as_str() == s)
            .ok_or_else(|| AuthzError::InvalidInput(format!("unknown permission scope '{}'", s)))
    }
}

/// Kind of action attempted against a scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiVerb {
    Get,
    Create,
    List,
    Update,
    Delete,
}

impl ApiVerb {
    /// Wire name of the verb
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Create => "create",
            Self::List => "list",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    /// Whether this is the list verb, which never targets a single resource
    pub fn is_list(&self) -> bool {
        matches!(self, Self::List)
    }
}

impl fmt::Display for ApiVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApiVerb {
    type Err = AuthzError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "get" => Ok(Self::Get),
            "create" => Ok(Self::Create),
            "list" => Ok(Self::List),
            "update" => Ok(Self::Update),
            "delete" => Ok(Self::Delete),
            other => Err(AuthzError::InvalidInput(format!("unknown verb '{}'", other))),
        }
    }
}

/// Read-only verbs
pub fn read_verb_group() -> Vec<ApiVerb> {
    vec![ApiVerb::Get, ApiVerb::List]
}

/// Every verb. Used as the baseline grant when the root document is absent.
pub fn read_write_verb_group() -> Vec<ApiVerb> {
    vec![
        ApiVerb::Get,
        ApiVerb::List,
        ApiVerb::Create,
        ApiVerb::Update,
        ApiVerb::Delete,
    ]
}

/// A resource identifier: either a name or a numeric id.
///
/// Equality is exact on both variant and value, so `Name("42")` and
/// `UInt(42)` are different resources.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NameOrUInt {
    UInt(u64),
    Name(String),
}

impl From<&str> for NameOrUInt {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for NameOrUInt {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<u64> for NameOrUInt {
    fn from(id: u64) -> Self {
        Self::UInt(id)
    }
}

impl fmt::Display for NameOrUInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => f.write_str(name),
            Self::UInt(id) => write!(f, "{}", id),
        }
    }
}

/// Action attempted at one scope of a request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestAction {
    /// What is being done
    pub verb: ApiVerb,

    /// Which resource at this scope it is done to
    pub resource: NameOrUInt,
}

impl RequestAction {
    pub fn new(verb: ApiVerb, resource: impl Into<NameOrUInt>) -> Self {
        Self {
            verb,
            resource: resource.into(),
        }
    }
}

/// One action per scope touched by a request
pub type RequestActions = HashMap<PermissionScope, RequestAction>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_round_trip_names() {
        for scope in PermissionScope::ALL {
            assert_eq!(scope.as_str().parse::<PermissionScope>().unwrap(), scope);
        }
        assert!("galaxy".parse::<PermissionScope>().is_err());
    }

    #[test]
    fn test_scope_serde_snake_case() {
        let json = serde_json::to_string(&PermissionScope::GitInstallation).unwrap();
        assert_eq!(json, "\"git_installation\"");
    }

    #[test]
    fn test_verb_groups() {
        let read = read_verb_group();
        assert!(read.contains(&ApiVerb::Get));
        assert!(read.contains(&ApiVerb::List));
        assert!(!read.contains(&ApiVerb::Delete));
        assert_eq!(read_write_verb_group().len(), 5);
    }

    #[test]
    fn test_name_or_uint_untagged() {
        let ids: Vec<NameOrUInt> = serde_json::from_str(r#"["web", 42]"#).unwrap();
        assert_eq!(ids, vec![NameOrUInt::from("web"), NameOrUInt::from(42u64)]);
        assert_ne!(NameOrUInt::from("42"), NameOrUInt::from(42u64));
    }

    #[test]
    fn test_request_action_parse() {
        let action: RequestAction =
            serde_json::from_str(r#"{"verb": "update", "resource": 7}"#).unwrap();
        assert_eq!(action, RequestAction::new(ApiVerb::Update, 7u64));
    }
}
