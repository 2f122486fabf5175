//! Principal-level authorization through a policy store

use std::sync::Arc;
use tracing::{debug, info};

use super::decision::AccessDecision;
use super::AccessEvaluator;
use crate::error::Result;
use crate::policy::{PolicyDocument, PolicyStore};
use crate::types::RequestActions;

/// Resolves a principal's bound policies and evaluates a request against them
///
/// ```text
/// principal → PolicyStore::bindings → [documents in bind order] → AccessEvaluator
/// ```
pub struct Authorizer {
    evaluator: AccessEvaluator,
    store: Arc<dyn PolicyStore>,
}

impl Authorizer {
    pub fn new(evaluator: AccessEvaluator, store: Arc<dyn PolicyStore>) -> Self {
        Self { evaluator, store }
    }

    pub fn evaluator(&self) -> &AccessEvaluator {
        &self.evaluator
    }

    /// Decide whether `principal` may perform `requested`
    ///
    /// Only store failures are errors; a refusal is an `Ok` decision with
    /// `allowed == false`.
    pub async fn authorize(&self, principal: &str, requested: &RequestActions) -> Result<AccessDecision> {
        let policies = self.store.bindings(principal).await?;
        let binding_count = policies.len();

        let mut policy_ids = Vec::new();
        let mut documents: Vec<PolicyDocument> = Vec::new();
        for policy in policies {
            for document in policy.documents {
                policy_ids.push(policy.id.clone());
                documents.push(document);
            }
        }

        debug!(
            "Authorizing principal={} with {} documents from {} bindings",
            principal,
            documents.len(),
            binding_count
        );

        let decision = self.evaluator.evaluate(&documents, requested);

        match decision.granted_by {
            Some(index) => info!(
                "Decision: ALLOW principal={} by policy '{}'",
                principal, policy_ids[index]
            ),
            None => info!("Decision: DENY principal={} ({})", principal, decision.reason()),
        }

        Ok(decision)
    }

    /// Boolean form of [`authorize`](Self::authorize)
    pub async fn is_authorized(&self, principal: &str, requested: &RequestActions) -> Result<bool> {
        Ok(self.authorize(principal, requested).await?.allowed)
    }
}
