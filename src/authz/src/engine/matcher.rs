//! Verb and resource checks against a matched policy node

use serde::Serialize;

use crate::policy::PolicyDocument;
use crate::types::{ApiVerb, NameOrUInt, PermissionScope, RequestAction};

/// Why a matched node refused the requested action
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActionDenial {
    /// The node does not grant the verb
    Verb { scope: PermissionScope, verb: ApiVerb },

    /// The node is restricted to resources that exclude the requested one
    Resource {
        scope: PermissionScope,
        resource: NameOrUInt,
    },
}

pub fn verb_allowed(node: &PolicyDocument, verb: ApiVerb) -> bool {
    node.verbs.contains(&verb)
}

/// An unrestricted node allows every resource
pub fn resource_allowed(node: &PolicyDocument, resource: &NameOrUInt) -> bool {
    !node.is_resource_restricted() || node.resources.contains(resource)
}

/// Checks `action` at `scope` against the node governing that scope
///
/// Listing skips the resource check, since a list does not target a single
/// resource.
pub fn check_action(
    scope: PermissionScope,
    node: &PolicyDocument,
    action: &RequestAction,
) -> Option<ActionDenial> {
    if !action.verb.is_list() && !resource_allowed(node, &action.resource) {
        return Some(ActionDenial::Resource {
            scope,
            resource: action.resource.clone(),
        });
    }

    if !verb_allowed(node, action.verb) {
        return Some(ActionDenial::Verb {
            scope,
            verb: action.verb,
        });
    }

    None
}
