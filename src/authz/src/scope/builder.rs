//! Programmatic construction of scope hierarchies

use std::collections::BTreeMap;

use super::tree::ScopeTree;
use crate::error::{AuthzError, Result};
use crate::types::PermissionScope;

/// Builds a [`ScopeTree`] level by level
///
/// # Examples
///
/// ```
/// use hierarchy_authz::scope::ScopeTreeBuilder;
/// use hierarchy_authz::PermissionScope;
///
/// let tree = ScopeTreeBuilder::new()
///     .scope(PermissionScope::Project, |project| {
///         project
///             .scope(PermissionScope::Cluster, |cluster| cluster.leaf(PermissionScope::Namespace))
///             .leaf(PermissionScope::Registry)
///     })
///     .build()
///     .unwrap();
///
/// assert_eq!(tree.depth(), 3);
/// ```
#[derive(Debug, Default)]
pub struct ScopeTreeBuilder {
    nodes: BTreeMap<PermissionScope, ScopeTree>,
    duplicate: Option<PermissionScope>,
}

impl ScopeTreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `scope` at this level with children built by `children`
    pub fn scope<F>(mut self, scope: PermissionScope, children: F) -> Self
    where
        F: FnOnce(ScopeTreeBuilder) -> ScopeTreeBuilder,
    {
        let child = children(ScopeTreeBuilder::new());
        if self.duplicate.is_none() {
            self.duplicate = child.duplicate;
        }
        self.insert(scope, child.finish())
    }

    /// Adds `scope` at this level with no children
    pub fn leaf(self, scope: PermissionScope) -> Self {
        self.insert(scope, ScopeTree::new())
    }

    fn insert(mut self, scope: PermissionScope, subtree: ScopeTree) -> Self {
        if self.nodes.insert(scope, subtree).is_some() && self.duplicate.is_none() {
            self.duplicate = Some(scope);
        }
        self
    }

    /// Validates and returns the tree
    pub fn build(self) -> Result<ScopeTree> {
        if let Some(scope) = self.duplicate {
            return Err(AuthzError::InvalidSchema(format!(
                "scope '{}' declared twice under the same parent",
                scope
            )));
        }

        let tree = self.finish();
        tree.validate()?;
        Ok(tree)
    }

    pub(crate) fn finish(self) -> ScopeTree {
        ScopeTree::from_nodes(self.nodes)
    }
}
