//! Test suite for the scope hierarchy module
//!
//! Tests cover:
//! - The default hierarchy
//! - Builder validation
//! - JSON configuration
//! - Reachability queries

use super::*;
use crate::error::AuthzError;
use std::thread;

// ============================================================================
// Default Hierarchy Tests
// ============================================================================

#[test]
fn test_default_hierarchy_is_valid() {
    let schema = scope_hierarchy();
    assert!(schema.validate().is_ok());
    assert_eq!(schema.depth(), 4);
    assert_eq!(schema.scopes().collect::<Vec<_>>(), vec![PermissionScope::Project]);
}

#[test]
fn test_default_hierarchy_children() {
    let project = scope_hierarchy().get(PermissionScope::Project).unwrap();
    assert_eq!(project.len(), 7);
    assert!(project.contains(PermissionScope::Settings));
    assert!(!project.contains(PermissionScope::Namespace));

    let namespace = project
        .get(PermissionScope::Cluster)
        .and_then(|cluster| cluster.get(PermissionScope::Namespace))
        .unwrap();
    assert!(namespace.contains(PermissionScope::Release));
    assert!(namespace.contains(PermissionScope::Stack));
}

#[test]
fn test_default_hierarchy_shared_instance() {
    let handles: Vec<_> = (0..4)
        .map(|_| thread::spawn(|| Arc::as_ptr(scope_hierarchy()) as usize))
        .collect();

    let pointers: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(pointers.windows(2).all(|pair| pair[0] == pair[1]));
}

// ============================================================================
// Reachability Tests
// ============================================================================

#[test]
fn test_reaches() {
    let schema = scope_hierarchy();
    assert!(schema.reaches(PermissionScope::Project, PermissionScope::Project));
    assert!(schema.reaches(PermissionScope::Project, PermissionScope::Operation));
    assert!(schema.reaches(PermissionScope::Project, PermissionScope::Stack));
    assert!(!schema.reaches(PermissionScope::Project, PermissionScope::User));

    // Not a root of this schema
    assert!(!schema.reaches(PermissionScope::Cluster, PermissionScope::Namespace));
}

// ============================================================================
// Builder Tests
// ============================================================================

#[test]
fn test_builder_rejects_empty() {
    let result = ScopeTreeBuilder::new().build();
    assert!(matches!(result, Err(AuthzError::InvalidSchema(_))));
}

#[test]
fn test_builder_rejects_self_nesting() {
    let result = ScopeTreeBuilder::new()
        .scope(PermissionScope::Project, |p| {
            p.scope(PermissionScope::Cluster, |c| c.leaf(PermissionScope::Project))
        })
        .build();

    match result {
        Err(AuthzError::InvalidSchema(msg)) => assert!(msg.contains("project/cluster/project")),
        other => panic!("expected schema error, got {:?}", other),
    }
}

#[test]
fn test_builder_rejects_duplicate_sibling() {
    let result = ScopeTreeBuilder::new()
        .scope(PermissionScope::Project, |p| {
            p.leaf(PermissionScope::Registry).leaf(PermissionScope::Registry)
        })
        .build();

    assert!(matches!(result, Err(AuthzError::InvalidSchema(_))));
}

#[test]
fn test_same_scope_on_separate_branches_is_allowed() {
    let tree = ScopeTreeBuilder::new()
        .scope(PermissionScope::Project, |p| {
            p.scope(PermissionScope::Cluster, |c| c.leaf(PermissionScope::Settings))
                .leaf(PermissionScope::Settings)
        })
        .build()
        .unwrap();

    assert_eq!(tree.depth(), 3);
}

// ============================================================================
// JSON Configuration Tests
// ============================================================================

#[test]
fn test_from_json() {
    let tree = ScopeTree::from_json(r#"{"project": {"cluster": {}, "registry": {}}}"#).unwrap();
    let project = tree.get(PermissionScope::Project).unwrap();
    assert_eq!(project.len(), 2);
    assert!(project.get(PermissionScope::Cluster).unwrap().is_empty());
}

#[test]
fn test_from_json_unknown_scope() {
    let result = ScopeTree::from_json(r#"{"project": {"galaxy": {}}}"#);
    assert!(matches!(result, Err(AuthzError::Serialization(_))));
}

#[test]
fn test_from_json_cycle() {
    let result = ScopeTree::from_json(r#"{"project": {"cluster": {"cluster": {}}}}"#);
    assert!(matches!(result, Err(AuthzError::InvalidSchema(_))));
}

#[test]
fn test_longest_chain_is_accepted() {
    // Ancestors are always distinct, so the deepest possible chain uses every scope once
    let mut json = String::from("{}");
    for scope in PermissionScope::ALL.iter().rev() {
        json = format!("{{\"{}\": {}}}", scope, json);
    }

    let tree = ScopeTree::from_json(&json).unwrap();
    assert_eq!(tree.depth(), PermissionScope::ALL.len());
    assert!(tree.depth() <= MAX_SCOPE_DEPTH);
}

#[test]
fn test_display_indents_levels() {
    let tree = ScopeTreeBuilder::new()
        .scope(PermissionScope::Project, |p| p.leaf(PermissionScope::Cluster))
        .build()
        .unwrap();

    assert_eq!(tree.to_string(), "project\n  cluster\n");
}
