//! Policy document model

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::Result;
use crate::types::{ApiVerb, NameOrUInt, PermissionScope};

/// A grant at one scope, nested to mirror the scope hierarchy
///
/// `children` is keyed by child scope. An empty `resources` list means the
/// grant is not restricted to particular resources. An explicitly empty
/// `verbs` list grants nothing; verbs are only inherited from the parent
/// when the document for a scope is absent altogether.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyDocument {
    /// Scope this document grants access to
    pub scope: PermissionScope,

    /// Verbs allowed at this scope
    #[serde(default)]
    pub verbs: Vec<ApiVerb>,

    /// Resources the grant is restricted to (empty = all)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<NameOrUInt>,

    /// Explicit grants for nested scopes
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub children: BTreeMap<PermissionScope, PolicyDocument>,
}

impl PolicyDocument {
    /// Create an empty grant for `scope`
    pub fn new(scope: PermissionScope) -> Self {
        Self {
            scope,
            verbs: Vec::new(),
            resources: Vec::new(),
            children: BTreeMap::new(),
        }
    }

    /// Default node for a scope the caller did not specify
    ///
    /// Verbs are inherited from the parent. Resource restrictions are not.
    pub fn synthesized(scope: PermissionScope, parent_verbs: &[ApiVerb]) -> Self {
        Self::new(scope).with_verbs(parent_verbs.iter().copied())
    }

    pub fn with_verbs(mut self, verbs: impl IntoIterator<Item = ApiVerb>) -> Self {
        self.verbs = verbs.into_iter().collect();
        self
    }

    pub fn with_resources<R>(mut self, resources: impl IntoIterator<Item = R>) -> Self
    where
        R: Into<NameOrUInt>,
    {
        self.resources = resources.into_iter().map(Into::into).collect();
        self
    }

    /// Attach a child grant, keyed by the child's own scope
    pub fn with_child(mut self, child: PolicyDocument) -> Self {
        self.children.insert(child.scope, child);
        self
    }

    /// Attach a child grant under an explicit key
    ///
    /// The key is not required to match `child.scope`; such a document is
    /// rejected at evaluation time.
    pub fn with_child_at(mut self, key: PermissionScope, child: PolicyDocument) -> Self {
        self.children.insert(key, child);
        self
    }

    /// Whether the grant names specific resources
    pub fn is_resource_restricted(&self) -> bool {
        !self.resources.is_empty()
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
