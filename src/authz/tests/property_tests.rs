//! Property tests for the access evaluator

use hierarchy_authz::{
    has_scope_access, read_write_verb_group, AccessEvaluator, ApiVerb, NameOrUInt,
    PermissionScope, PolicyDocument, RequestAction, RequestActions,
};
use proptest::prelude::*;
use proptest::sample::select;

fn any_scope() -> impl Strategy<Value = PermissionScope> {
    select(PermissionScope::ALL.to_vec())
}

fn any_verb() -> impl Strategy<Value = ApiVerb> {
    select(vec![
        ApiVerb::Get,
        ApiVerb::Create,
        ApiVerb::List,
        ApiVerb::Update,
        ApiVerb::Delete,
    ])
}

fn any_resource() -> impl Strategy<Value = NameOrUInt> {
    prop_oneof![
        (0u64..8).prop_map(NameOrUInt::UInt),
        select(vec!["web", "api", "db"]).prop_map(NameOrUInt::from),
    ]
}

fn any_request() -> impl Strategy<Value = RequestActions> {
    prop::collection::hash_map(
        any_scope(),
        (any_verb(), any_resource()).prop_map(|(verb, resource)| RequestAction::new(verb, resource)),
        1..5,
    )
}

/// Documents of up to three levels with arbitrary (often invalid) shapes
fn any_document() -> impl Strategy<Value = PolicyDocument> {
    let leaf = (
        any_scope(),
        prop::collection::vec(any_verb(), 0..4),
        prop::collection::vec(any_resource(), 0..2),
    )
        .prop_map(|(scope, verbs, resources)| {
            PolicyDocument::new(scope).with_verbs(verbs).with_resources(resources)
        });

    leaf.prop_recursive(3, 12, 3, |inner| {
        (
            any_scope(),
            prop::collection::vec(any_verb(), 0..4),
            prop::collection::vec(inner, 0..3),
        )
            .prop_map(|(scope, verbs, children)| {
                children
                    .into_iter()
                    .fold(PolicyDocument::new(scope).with_verbs(verbs), |doc, child| {
                        doc.with_child(child)
                    })
            })
    })
}

proptest! {
    #[test]
    fn empty_policy_list_never_authorizes(requested in any_request()) {
        prop_assert!(!has_scope_access(&[], &requested));
    }

    #[test]
    fn evaluation_is_idempotent(
        documents in prop::collection::vec(any_document(), 0..4),
        requested in any_request(),
    ) {
        let evaluator = AccessEvaluator::new();
        let first = evaluator.evaluate(&documents, &requested);
        let second = evaluator.evaluate(&documents, &requested);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn grant_comes_from_first_granted_outcome(
        documents in prop::collection::vec(any_document(), 1..4),
        requested in any_request(),
    ) {
        let decision = AccessEvaluator::new().evaluate(&documents, &requested);
        if let Some(index) = decision.granted_by {
            prop_assert!(decision.outcomes[index].is_granted());
            prop_assert!(decision.outcomes[..index].iter().all(|o| !o.is_granted()));
        } else {
            prop_assert!(!decision.allowed);
        }
    }

    #[test]
    fn documents_with_unrecognized_children_never_authorize(
        inner in any_document(),
        requested in any_request(),
    ) {
        // User never nests beneath project, whatever else the document holds
        let document = PolicyDocument::new(PermissionScope::Project)
            .with_verbs(read_write_verb_group())
            .with_child(inner)
            .with_child(PolicyDocument::new(PermissionScope::User));

        prop_assert!(!has_scope_access(&[document], &requested));
    }

    #[test]
    fn appending_documents_never_revokes(
        documents in prop::collection::vec(any_document(), 1..3),
        extra in any_document(),
        requested in any_request(),
    ) {
        let evaluator = AccessEvaluator::new();
        let before = evaluator.has_scope_access(&documents, &requested);

        let mut extended = documents.clone();
        extended.push(extra);
        let after = evaluator.has_scope_access(&extended, &requested);

        prop_assert!(!before || after);
    }

    #[test]
    fn list_requests_ignore_resource_lists(
        resources in prop::collection::vec(any_resource(), 1..3),
        requested_resource in any_resource(),
    ) {
        let documents = vec![PolicyDocument::new(PermissionScope::Project)
            .with_verbs([ApiVerb::List])
            .with_resources(resources)];
        let requested: RequestActions =
            [(PermissionScope::Project, RequestAction::new(ApiVerb::List, requested_resource))].into();

        prop_assert!(has_scope_access(&documents, &requested));
    }
}
