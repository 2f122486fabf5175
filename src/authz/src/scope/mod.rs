/// Scope hierarchy schema module
///
/// Defines which permission scopes exist and which scopes nest beneath
/// which. The default hierarchy is built once on first use and is shared
/// read-only by every evaluation.
///
/// # Examples
///
/// ```
/// use hierarchy_authz::scope::scope_hierarchy;
/// use hierarchy_authz::PermissionScope;
///
/// let schema = scope_hierarchy();
/// assert!(schema.reaches(PermissionScope::Project, PermissionScope::Release));
/// assert!(!schema.reaches(PermissionScope::Project, PermissionScope::User));
/// ```

mod builder;
mod tree;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::types::PermissionScope;

pub use builder::ScopeTreeBuilder;
pub use tree::{ScopeTree, MAX_SCOPE_DEPTH};

static SCOPE_HIERARCHY: Lazy<Arc<ScopeTree>> = Lazy::new(|| Arc::new(default_hierarchy()));

/// The process-wide default hierarchy
pub fn scope_hierarchy() -> &'static Arc<ScopeTree> {
    &SCOPE_HIERARCHY
}

fn default_hierarchy() -> ScopeTree {
    use PermissionScope::*;

    ScopeTreeBuilder::new()
        .scope(Project, |project| {
            project
                .scope(Cluster, |cluster| {
                    cluster.scope(Namespace, |namespace| namespace.leaf(Release).leaf(Stack))
                })
                .leaf(Registry)
                .leaf(HelmRepo)
                .scope(Infra, |infra| infra.leaf(Operation))
                .leaf(GitInstallation)
                .leaf(Invite)
                .leaf(Settings)
        })
        .finish()
}
