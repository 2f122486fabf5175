//! Access evaluation engine
//!
//! Decides whether a caller's policy documents authorize a request that
//! touches one or more scopes.

pub mod authorizer;
pub mod decision;
pub mod matcher;
pub mod walk;

pub use authorizer::Authorizer;
pub use decision::{AccessDecision, DocumentOutcome};
pub use matcher::{check_action, resource_allowed, verb_allowed, ActionDenial};
pub use walk::{populate_and_verify, walk_document, MatchSet, PolicyViolation};

use crate::error::{AuthzError, Result};
use crate::policy::PolicyDocument;
use crate::scope::{scope_hierarchy, ScopeTree};
use crate::types::{read_write_verb_group, ApiVerb, PermissionScope, RequestActions};

use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Evaluator configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Scope every document is walked from
    pub root_scope: PermissionScope,

    /// Verbs granted when the root document itself is absent
    pub baseline_verbs: Vec<ApiVerb>,

    /// Deny requests naming scopes a document cannot place in the hierarchy
    pub strict_unreachable_scopes: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            root_scope: PermissionScope::Project,
            baseline_verbs: read_write_verb_group(),
            strict_unreachable_scopes: false,
        }
    }
}

impl EngineConfig {
    /// Reads overrides from the environment
    ///
    /// - `AUTHZ_ROOT_SCOPE` - root scope name (default: project)
    /// - `AUTHZ_STRICT_SCOPES` - `true`/`false` (default: false)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(root) = lookup("AUTHZ_ROOT_SCOPE") {
            config.root_scope = root.trim().parse().map_err(|_| {
                AuthzError::Config(format!("AUTHZ_ROOT_SCOPE: unknown scope '{}'", root))
            })?;
        }

        if let Some(strict) = lookup("AUTHZ_STRICT_SCOPES") {
            config.strict_unreachable_scopes = match strict.trim() {
                "1" | "true" => true,
                "0" | "false" => false,
                other => {
                    return Err(AuthzError::Config(format!(
                        "AUTHZ_STRICT_SCOPES: expected true or false, got '{}'",
                        other
                    )))
                }
            };
        }

        Ok(config)
    }
}

/// Evaluates policy documents against a scope hierarchy
///
/// Cheap to clone; the hierarchy is shared and never mutated.
#[derive(Debug, Clone)]
pub struct AccessEvaluator {
    schema: Arc<ScopeTree>,
    config: EngineConfig,
}

impl AccessEvaluator {
    /// Evaluator over the default hierarchy with default configuration
    pub fn new() -> Self {
        Self {
            schema: Arc::clone(scope_hierarchy()),
            config: EngineConfig::default(),
        }
    }

    /// Evaluator over the default hierarchy
    pub fn with_config(config: EngineConfig) -> Result<Self> {
        Self::with_schema(Arc::clone(scope_hierarchy()), config)
    }

    /// Evaluator over a custom hierarchy
    ///
    /// The hierarchy must validate and define `config.root_scope` at its top level.
    pub fn with_schema(schema: Arc<ScopeTree>, config: EngineConfig) -> Result<Self> {
        schema.validate()?;

        if !schema.contains(config.root_scope) {
            return Err(AuthzError::Config(format!(
                "root scope '{}' is not a top-level scope of the hierarchy",
                config.root_scope
            )));
        }

        info!(
            "AccessEvaluator initialized with root={}, depth={}, strict_unreachable_scopes={}",
            config.root_scope,
            schema.depth(),
            config.strict_unreachable_scopes
        );

        Ok(Self { schema, config })
    }

    pub fn schema(&self) -> &ScopeTree {
        &self.schema
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Whether any of `documents` authorizes every scope in `requested`
    pub fn has_scope_access(&self, documents: &[PolicyDocument], requested: &RequestActions) -> bool {
        self.evaluate(documents, requested).allowed
    }

    /// Tries each document in order; the first that authorizes the request wins
    pub fn evaluate(&self, documents: &[PolicyDocument], requested: &RequestActions) -> AccessDecision {
        let unreachable = self.unreachable_scopes(requested);
        if !unreachable.is_empty() {
            warn!(
                "Requested scopes {:?} are not reachable from '{}'; they will not be checked",
                unreachable, self.config.root_scope
            );
        }

        let mut outcomes = Vec::with_capacity(documents.len());

        for (index, document) in documents.iter().enumerate() {
            let outcome = self.evaluate_document(document, requested);
            debug!("Policy document {}: {:?}", index, outcome);

            let granted = outcome.is_granted();
            outcomes.push(outcome);

            if granted {
                return AccessDecision::granted(index, outcomes, unreachable);
            }
        }

        debug!("No policy document authorized the request");
        AccessDecision::denied(outcomes, unreachable)
    }

    fn evaluate_document(&self, document: &PolicyDocument, requested: &RequestActions) -> DocumentOutcome {
        let matches = match walk_document(
            document,
            &self.schema,
            self.config.root_scope,
            &self.config.baseline_verbs,
            requested,
        ) {
            Ok(matches) => matches,
            Err(violation) => return DocumentOutcome::Invalid { violation },
        };

        if self.config.strict_unreachable_scopes {
            let mut unmatched: Vec<PermissionScope> = requested
                .keys()
                .filter(|scope| !matches.contains_key(*scope))
                .copied()
                .collect();

            if !unmatched.is_empty() {
                unmatched.sort();
                return DocumentOutcome::Unmatched { scopes: unmatched };
            }
        }

        let denials: Vec<ActionDenial> = matches
            .iter()
            .filter_map(|(scope, node)| {
                requested
                    .get(scope)
                    .and_then(|action| check_action(*scope, node, action))
            })
            .collect();

        if denials.is_empty() {
            DocumentOutcome::Granted
        } else {
            DocumentOutcome::Denied { denials }
        }
    }

    fn unreachable_scopes(&self, requested: &RequestActions) -> Vec<PermissionScope> {
        let mut unreachable: Vec<PermissionScope> = requested
            .keys()
            .filter(|scope| !self.schema.reaches(self.config.root_scope, **scope))
            .copied()
            .collect();
        unreachable.sort();
        unreachable
    }
}

impl Default for AccessEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

/// Checks `requested` against `documents` using the default hierarchy
pub fn has_scope_access(documents: &[PolicyDocument], requested: &RequestActions) -> bool {
    AccessEvaluator::new().has_scope_access(documents, requested)
}
