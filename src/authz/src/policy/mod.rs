//! Policy definition and storage

pub mod document;
pub mod presets;

pub use document::PolicyDocument;
pub use presets::PresetRole;

use crate::error::{AuthzError, Result};
use crate::types::PolicyId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::warn;

/// A stored, named set of policy documents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    /// Unique policy identifier
    pub id: PolicyId,

    /// Human readable name
    pub name: String,

    /// Documents tried in order during evaluation
    pub documents: Vec<PolicyDocument>,
}

impl Policy {
    pub fn new(
        id: impl Into<PolicyId>,
        name: impl Into<String>,
        documents: Vec<PolicyDocument>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            documents,
        }
    }

    /// Policy for a built-in role, stored under the role's name
    pub fn from_role(role: PresetRole) -> Self {
        Self::new(role.as_str(), role.as_str(), role.policy())
    }
}

/// Source of the policies bound to a principal
///
/// Evaluation only needs [`bindings`](PolicyStore::bindings); the rest is the
/// management surface storage backends implement.
#[async_trait]
pub trait PolicyStore: Send + Sync {
    /// Get a policy by ID
    async fn get(&self, id: &str) -> Result<Option<Policy>>;

    /// Store a policy, replacing any policy with the same ID
    async fn put(&self, policy: Policy) -> Result<()>;

    /// List all policies
    async fn list(&self) -> Result<Vec<Policy>>;

    /// Delete a policy. Bindings to it are left dangling and skipped.
    async fn delete(&self, id: &str) -> Result<()>;

    /// Bind a stored policy to a principal
    async fn bind(&self, principal: &str, policy_id: &str) -> Result<()>;

    /// Remove a binding
    async fn unbind(&self, principal: &str, policy_id: &str) -> Result<()>;

    /// Policies bound to a principal, in bind order
    async fn bindings(&self, principal: &str) -> Result<Vec<Policy>>;
}

/// In-memory policy store implementation
pub struct InMemoryPolicyStore {
    policies: Arc<RwLock<HashMap<PolicyId, Policy>>>,
    bindings: Arc<RwLock<HashMap<String, Vec<PolicyId>>>>,
}

impl InMemoryPolicyStore {
    /// Create a new in-memory policy store
    pub fn new() -> Self {
        Self {
            policies: Arc::new(RwLock::new(HashMap::new())),
            bindings: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Create a store pre-loaded with the built-in roles
    pub async fn with_preset_roles() -> Self {
        let store = Self::new();
        {
            let mut policies = store.policies.write().await;
            for role in PresetRole::ALL {
                let policy = Policy::from_role(role);
                policies.insert(policy.id.clone(), policy);
            }
        }
        store
    }
}

impl Default for InMemoryPolicyStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PolicyStore for InMemoryPolicyStore {
    async fn get(&self, id: &str) -> Result<Option<Policy>> {
        let policies = self.policies.read().await;
        Ok(policies.get(id).cloned())
    }

    async fn put(&self, policy: Policy) -> Result<()> {
        let mut policies = self.policies.write().await;
        policies.insert(policy.id.clone(), policy);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Policy>> {
        let policies = self.policies.read().await;
        let mut all: Vec<Policy> = policies.values().cloned().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(all)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let mut policies = self.policies.write().await;
        policies.remove(id);
        Ok(())
    }

    async fn bind(&self, principal: &str, policy_id: &str) -> Result<()> {
        if !self.policies.read().await.contains_key(policy_id) {
            return Err(AuthzError::PolicyNotFound(policy_id.to_string()));
        }

        let mut bindings = self.bindings.write().await;
        let bound = bindings.entry(principal.to_string()).or_default();
        if !bound.iter().any(|id| id == policy_id) {
            bound.push(policy_id.to_string());
        }
        Ok(())
    }

    async fn unbind(&self, principal: &str, policy_id: &str) -> Result<()> {
        let mut bindings = self.bindings.write().await;
        if let Some(bound) = bindings.get_mut(principal) {
            bound.retain(|id| id != policy_id);
        }
        Ok(())
    }

    async fn bindings(&self, principal: &str) -> Result<Vec<Policy>> {
        let ids = match self.bindings.read().await.get(principal) {
            Some(ids) => ids.clone(),
            None => return Ok(Vec::new()),
        };

        let policies = self.policies.read().await;
        let mut bound = Vec::with_capacity(ids.len());
        for id in ids {
            match policies.get(&id) {
                Some(policy) => bound.push(policy.clone()),
                None => warn!("Principal {} is bound to missing policy {}", principal, id),
            }
        }

        Ok(bound)
    }
}
