//! Populate-and-verify walk over a policy document
//!
//! Walks the scope hierarchy and the caller's document side by side. Scopes
//! the document leaves out are filled with a default node that inherits its
//! parent's verbs. Along the way the document is checked against the
//! hierarchy, and the node governing every requested scope is collected.

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

use crate::policy::PolicyDocument;
use crate::scope::ScopeTree;
use crate::types::{ApiVerb, PermissionScope, RequestActions};

/// Node governing each requested scope, explicit or synthesized
pub type MatchSet<'a> = BTreeMap<PermissionScope, Cow<'a, PolicyDocument>>;

/// Why a document does not conform to the scope hierarchy
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PolicyViolation {
    /// The hierarchy has no such scope at this level
    #[error("scope '{scope}' is not defined at this level of the hierarchy")]
    UnknownScope { scope: PermissionScope },

    /// A document was attached under a key for a different scope
    #[error("document under '{expected}' declares scope '{found}'")]
    ScopeMismatch {
        expected: PermissionScope,
        found: PermissionScope,
    },

    /// The document names children the hierarchy does not define here
    #[error("document for '{scope}' declares {declared} children, only {recognized} defined by the hierarchy")]
    UnrecognizedChildren {
        scope: PermissionScope,
        declared: usize,
        recognized: usize,
    },
}

/// Walks `document` as the node for `scope`, where `level` is the hierarchy
/// level that should define `scope`.
///
/// `matches` is moved in and handed back on success. A failed walk drops it,
/// so a partially collected set can never be consulted.
pub fn populate_and_verify<'a>(
    document: Option<&'a PolicyDocument>,
    level: &ScopeTree,
    scope: PermissionScope,
    parent_verbs: &[ApiVerb],
    requested: &RequestActions,
    mut matches: MatchSet<'a>,
) -> Result<MatchSet<'a>, PolicyViolation> {
    let node: Cow<'a, PolicyDocument> = match document {
        Some(doc) => Cow::Borrowed(doc),
        None => Cow::Owned(PolicyDocument::synthesized(scope, parent_verbs)),
    };

    let subtree = level
        .get(scope)
        .ok_or(PolicyViolation::UnknownScope { scope })?;

    if node.scope != scope {
        return Err(PolicyViolation::ScopeMismatch {
            expected: scope,
            found: node.scope,
        });
    }

    let mut recognized = 0;
    for child_scope in subtree.scopes() {
        // Synthesized nodes never have children, so only an explicit document can supply one
        let child = document.and_then(|doc| doc.children.get(&child_scope));
        if child.is_some() {
            recognized += 1;
        }

        matches = populate_and_verify(
            child,
            subtree,
            child_scope,
            &node.verbs,
            requested,
            matches,
        )?;
    }

    if recognized != node.children.len() {
        return Err(PolicyViolation::UnrecognizedChildren {
            scope,
            declared: node.children.len(),
            recognized,
        });
    }

    if requested.contains_key(&scope) {
        matches.insert(scope, node);
    }

    Ok(matches)
}

/// Walks a whole document from the hierarchy root
pub fn walk_document<'a>(
    document: &'a PolicyDocument,
    schema: &ScopeTree,
    root: PermissionScope,
    baseline_verbs: &[ApiVerb],
    requested: &RequestActions,
) -> Result<MatchSet<'a>, PolicyViolation> {
    populate_and_verify(
        Some(document),
        schema,
        root,
        baseline_verbs,
        requested,
        MatchSet::new(),
    )
}
