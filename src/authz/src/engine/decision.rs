//! Authorization decision types

use serde::Serialize;

use super::matcher::ActionDenial;
use super::walk::PolicyViolation;
use crate::types::PermissionScope;

/// Result of evaluating one policy document against a request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DocumentOutcome {
    /// Every matched scope allows the requested action
    Granted,

    /// The document does not conform to the scope hierarchy
    Invalid { violation: PolicyViolation },

    /// At least one matched scope refused its action
    Denied { denials: Vec<ActionDenial> },

    /// Requested scopes the document could not place in the hierarchy
    /// (only reported when strict scope checking is enabled)
    Unmatched { scopes: Vec<PermissionScope> },
}

impl DocumentOutcome {
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted)
    }
}

/// Authorization decision with per-document detail
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessDecision {
    /// Whether the request is allowed
    pub allowed: bool,

    /// Index of the document that granted access
    #[serde(skip_serializing_if = "Option::is_none")]
    pub granted_by: Option<usize>,

    /// Outcome of each document tried, in order
    pub outcomes: Vec<DocumentOutcome>,

    /// Requested scopes the hierarchy cannot reach from its root
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unreachable_scopes: Vec<PermissionScope>,
}

impl AccessDecision {
    pub(crate) fn granted(
        index: usize,
        outcomes: Vec<DocumentOutcome>,
        unreachable_scopes: Vec<PermissionScope>,
    ) -> Self {
        Self {
            allowed: true,
            granted_by: Some(index),
            outcomes,
            unreachable_scopes,
        }
    }

    pub(crate) fn denied(
        outcomes: Vec<DocumentOutcome>,
        unreachable_scopes: Vec<PermissionScope>,
    ) -> Self {
        Self {
            allowed: false,
            granted_by: None,
            outcomes,
            unreachable_scopes,
        }
    }

    /// Short human readable explanation
    pub fn reason(&self) -> String {
        match self.granted_by {
            Some(index) => format!("granted by policy document {}", index),
            None if self.outcomes.is_empty() => "no policy documents".to_string(),
            None => format!("denied by all {} policy documents", self.outcomes.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ApiVerb;

    #[test]
    fn test_granted_decision() {
        let decision = AccessDecision::granted(
            1,
            vec![
                DocumentOutcome::Denied {
                    denials: vec![ActionDenial::Verb {
                        scope: PermissionScope::Project,
                        verb: ApiVerb::Delete,
                    }],
                },
                DocumentOutcome::Granted,
            ],
            Vec::new(),
        );

        assert!(decision.allowed);
        assert_eq!(decision.reason(), "granted by policy document 1");
    }

    #[test]
    fn test_denied_reasons() {
        assert_eq!(
            AccessDecision::denied(Vec::new(), Vec::new()).reason(),
            "no policy documents"
        );

        let decision = AccessDecision::denied(
            vec![DocumentOutcome::Invalid {
                violation: PolicyViolation::UnknownScope {
                    scope: PermissionScope::User,
                },
            }],
            Vec::new(),
        );
        assert_eq!(decision.reason(), "denied by all 1 policy documents");
    }

    #[test]
    fn test_decision_json() {
        let decision = AccessDecision::denied(
            vec![DocumentOutcome::Unmatched {
                scopes: vec![PermissionScope::User],
            }],
            vec![PermissionScope::User],
        );

        let json = serde_json::to_value(&decision).unwrap();
        assert_eq!(json["allowed"], false);
        assert!(json.get("granted_by").is_none());
        assert_eq!(json["outcomes"][0]["outcome"], "unmatched");
        assert_eq!(json["unreachable_scopes"][0], "user");
    }
}
