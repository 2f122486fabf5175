//! # Hierarchical Scope Authorization
//!
//! Decides whether a caller's policy documents authorize a request that
//! touches several nested permission scopes (project, cluster, namespace, ...).
//!
//! ## Features
//!
//! - **Scope hierarchy schema** built once and shared read-only
//! - **Policy documents** that mirror the hierarchy, with verbs inherited
//!   into unspecified branches
//! - **Fail-closed validation**: documents that do not conform to the
//!   hierarchy never grant access
//! - **Resource allow-lists** per scope, bypassed for list requests
//! - **Preset roles** (admin, developer, viewer) and a pluggable policy store
//!
//! ## Example
//!
//! ```rust
//! use hierarchy_authz::{
//!     has_scope_access, ApiVerb, PermissionScope, PolicyDocument, RequestAction, RequestActions,
//! };
//!
//! let policy = vec![PolicyDocument::new(PermissionScope::Project)
//!     .with_verbs([ApiVerb::Get])
//!     .with_child(
//!         PolicyDocument::new(PermissionScope::Cluster)
//!             .with_verbs([ApiVerb::Get, ApiVerb::Update])
//!             .with_resources([42u64]),
//!     )];
//!
//! let mut request = RequestActions::new();
//! request.insert(PermissionScope::Project, RequestAction::new(ApiVerb::Get, "x"));
//! request.insert(PermissionScope::Cluster, RequestAction::new(ApiVerb::Update, 42u64));
//! assert!(has_scope_access(&policy, &request));
//!
//! request.insert(PermissionScope::Cluster, RequestAction::new(ApiVerb::Update, 43u64));
//! assert!(!has_scope_access(&policy, &request));
//! ```

pub mod engine;
pub mod error;
pub mod policy;
pub mod scope;
pub mod types;

// Re-export commonly used types
pub use engine::{
    has_scope_access, AccessDecision, AccessEvaluator, Authorizer, DocumentOutcome, EngineConfig,
    PolicyViolation,
};
pub use error::{AuthzError, Result};
pub use policy::{InMemoryPolicyStore, Policy, PolicyDocument, PolicyStore, PresetRole};
pub use scope::{scope_hierarchy, ScopeTree, ScopeTreeBuilder};
pub use types::{
    read_verb_group, read_write_verb_group, ApiVerb, NameOrUInt, PermissionScope, PolicyId,
    RequestAction, RequestActions,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
