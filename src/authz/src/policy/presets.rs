//! Built-in project roles

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::document::PolicyDocument;
use crate::error::AuthzError;
use crate::types::{read_verb_group, read_write_verb_group, PermissionScope};

/// Role every project ships with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresetRole {
    /// Full access to the project and everything in it
    Admin,
    /// Full access except project settings, which are read-only
    Developer,
    /// Read-only access; no access to project settings
    Viewer,
}

impl PresetRole {
    pub const ALL: [PresetRole; 3] = [Self::Admin, Self::Developer, Self::Viewer];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Developer => "developer",
            Self::Viewer => "viewer",
        }
    }

    /// Policy documents granted by this role
    pub fn policy(&self) -> Vec<PolicyDocument> {
        match self {
            Self::Admin => admin_policy(),
            Self::Developer => developer_policy(),
            Self::Viewer => viewer_policy(),
        }
    }
}

impl fmt::Display for PresetRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PresetRole {
    type Err = AuthzError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "developer" => Ok(Self::Developer),
            "viewer" => Ok(Self::Viewer),
            other => Err(AuthzError::InvalidInput(format!("unknown role '{}'", other))),
        }
    }
}

pub fn admin_policy() -> Vec<PolicyDocument> {
    vec![PolicyDocument::new(PermissionScope::Project).with_verbs(read_write_verb_group())]
}

pub fn developer_policy() -> Vec<PolicyDocument> {
    vec![PolicyDocument::new(PermissionScope::Project)
        .with_verbs(read_write_verb_group())
        .with_child(PolicyDocument::new(PermissionScope::Settings).with_verbs(read_verb_group()))]
}

pub fn viewer_policy() -> Vec<PolicyDocument> {
    vec![PolicyDocument::new(PermissionScope::Project)
        .with_verbs(read_verb_group())
        .with_child(PolicyDocument::new(PermissionScope::Settings))]
}
