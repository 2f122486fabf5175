//! Scope hierarchy schema
//!
//! A `ScopeTree` maps each scope to the subtree of scopes nestable directly
//! beneath it. The top level of a tree holds the root scope(s).

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{AuthzError, Result};
use crate::types::PermissionScope;

/// Deepest hierarchy accepted by [`ScopeTree::validate`].
///
/// The populate-and-verify walk recurses once per level, so this bounds its
/// stack use when hierarchies come from configuration.
pub const MAX_SCOPE_DEPTH: usize = 16;

/// Immutable tree of permission scopes
///
/// Serialized as nested objects keyed by scope name:
///
/// ```json
/// { "project": { "cluster": { "namespace": {} }, "registry": {} } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScopeTree {
    nodes: BTreeMap<PermissionScope, ScopeTree>,
}

impl ScopeTree {
    /// Creates an empty tree
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_nodes(nodes: BTreeMap<PermissionScope, ScopeTree>) -> Self {
        Self { nodes }
    }

    /// Parses and validates a hierarchy from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let tree: ScopeTree = serde_json::from_str(json)?;
        tree.validate()?;
        Ok(tree)
    }

    /// Subtree for `scope` at this level, if the schema defines it here
    pub fn get(&self, scope: PermissionScope) -> Option<&ScopeTree> {
        self.nodes.get(&scope)
    }

    /// Whether `scope` is defined at this level
    pub fn contains(&self, scope: PermissionScope) -> bool {
        self.nodes.contains_key(&scope)
    }

    /// Scopes defined at this level
    pub fn scopes(&self) -> impl Iterator<Item = PermissionScope> + '_ {
        self.nodes.keys().copied()
    }

    /// Scope/subtree pairs defined at this level
    pub fn iter(&self) -> impl Iterator<Item = (PermissionScope, &ScopeTree)> {
        self.nodes.iter().map(|(scope, subtree)| (*scope, subtree))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of levels in the tree (0 for an empty tree)
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack: Vec<(&ScopeTree, usize)> = vec![(self, 0)];

        while let Some((tree, depth)) = stack.pop() {
            if tree.is_empty() {
                max_depth = max_depth.max(depth);
                continue;
            }
            for subtree in tree.nodes.values() {
                stack.push((subtree, depth + 1));
            }
        }

        max_depth
    }

    /// Whether `target` is `root` itself or nested somewhere beneath it
    ///
    /// `root` must be defined at the top level of this tree.
    pub fn reaches(&self, root: PermissionScope, target: PermissionScope) -> bool {
        let Some(root_subtree) = self.get(root) else {
            return false;
        };

        if root == target {
            return true;
        }

        let mut stack = vec![root_subtree];
        while let Some(tree) = stack.pop() {
            if tree.contains(target) {
                return true;
            }
            stack.extend(tree.nodes.values());
        }

        false
    }

    /// Checks the structural invariants of the hierarchy
    ///
    /// Rejects empty trees, scopes nested beneath themselves, and trees deeper
    /// than [`MAX_SCOPE_DEPTH`].
    pub fn validate(&self) -> Result<()> {
        if self.is_empty() {
            return Err(AuthzError::InvalidSchema(
                "hierarchy defines no scopes".to_string(),
            ));
        }

        let mut stack: Vec<(&ScopeTree, Vec<PermissionScope>)> = vec![(self, Vec::new())];

        while let Some((tree, path)) = stack.pop() {
            for (scope, subtree) in tree.iter() {
                if path.contains(&scope) {
                    return Err(AuthzError::InvalidSchema(format!(
                        "scope '{}' is nested beneath itself at {}/{}",
                        scope,
                        render_path(&path),
                        scope
                    )));
                }

                let mut child_path = path.clone();
                child_path.push(scope);

                if child_path.len() > MAX_SCOPE_DEPTH {
                    return Err(AuthzError::InvalidSchema(format!(
                        "hierarchy exceeds maximum depth {} at {}",
                        MAX_SCOPE_DEPTH,
                        render_path(&child_path)
                    )));
                }

                stack.push((subtree, child_path));
            }
        }

        Ok(())
    }

    fn fmt_level(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        for (scope, subtree) in self.iter() {
            writeln!(f, "{:width$}{}", "", scope, width = indent * 2)?;
            subtree.fmt_level(f, indent + 1)?;
        }
        Ok(())
    }
}

fn render_path(path: &[PermissionScope]) -> String {
    path.iter()
        .map(PermissionScope::as_str)
        .collect::<Vec<_>>()
        .join("/")
}

impl fmt::Display for ScopeTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_level(f, 0)
    }
}
