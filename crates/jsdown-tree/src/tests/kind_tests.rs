use crate::kind::*;
use crate::pass::GenericNode;
use crate::raw::BlockSlots;
use crate::TreeError;
use std::sync::Arc;

#[test]
fn test_estree_registry_builds() {
    let registry = KindRegistryBuilder::estree().build().unwrap();

    let program = registry.lookup("Program").unwrap();
    assert_eq!(registry.root_kind(), program);
    assert_eq!(registry.boundary(program), Boundary::all());

    let block = registry.lookup("BlockStatement").unwrap();
    assert_eq!(registry.block_kind(), block);
    assert_eq!(registry.name(block), "BlockStatement");
    assert_eq!(registry.boundary(block), Boundary::SCOPE);

    let function = registry.lookup("FunctionExpression").unwrap();
    assert_eq!(
        registry.boundary(function),
        Boundary::FUNCTION_SCOPE | Boundary::LEXICAL
    );

    let arrow = registry.lookup("ArrowFunctionExpression").unwrap();
    assert!(!registry.boundary(arrow).contains(Boundary::LEXICAL));

    assert!(registry.lookup("TSInterfaceDeclaration").is_none());
}

#[test]
fn test_registry_ids_are_dense() {
    let registry = KindRegistryBuilder::estree().build().unwrap();
    for (id, info) in registry.iter() {
        assert_eq!(registry.lookup(&info.name), Some(id));
    }
    assert_eq!(registry.iter().count(), registry.len());
}

#[test]
fn test_duplicate_kind_is_rejected() {
    let err = KindRegistryBuilder::estree()
        .register("Identifier", Boundary::empty())
        .build()
        .unwrap_err();
    assert!(matches!(err, TreeError::DuplicateKind(kind) if kind == "Identifier"));
}

#[test]
fn test_missing_root_kind_is_rejected() {
    let err = KindRegistry::builder()
        .register("BlockStatement", Boundary::SCOPE)
        .block_slots(BlockSlots::empty())
        .build()
        .unwrap_err();
    assert!(matches!(
        err,
        TreeError::UnregisteredKind { ref kind, role: "root" } if kind == "Program"
    ));
}

#[test]
fn test_missing_block_kind_is_rejected() {
    let err = KindRegistry::builder()
        .register("Program", Boundary::all())
        .block_slots(BlockSlots::empty())
        .build()
        .unwrap_err();
    assert!(matches!(err, TreeError::UnregisteredKind { role: "block", .. }));
}

#[test]
fn test_unregistered_block_slot_owner_is_rejected() {
    let err = KindRegistry::builder()
        .register("Program", Boundary::all())
        .register("BlockStatement", Boundary::SCOPE)
        .build()
        .unwrap_err();
    assert!(matches!(
        err,
        TreeError::UnregisteredKind {
            role: "block-slot owner",
            ..
        }
    ));
}

#[test]
fn test_behavior_for_unknown_kind_is_rejected() {
    let err = KindRegistryBuilder::estree()
        .behavior("Decorator", Arc::new(GenericNode))
        .build()
        .unwrap_err();
    assert!(matches!(
        err,
        TreeError::UnregisteredKind { ref kind, role: "behavior" } if kind == "Decorator"
    ));
}

#[test]
fn test_minimal_registry_with_custom_root() {
    let registry = KindRegistry::builder()
        .root_kind("Module")
        .block_kind("Block")
        .block_slots(BlockSlots::empty().with_slot("Loop", "body"))
        .register("Module", Boundary::all())
        .register("Block", Boundary::SCOPE)
        .register("Loop", Boundary::empty())
        .build()
        .unwrap();

    assert_eq!(registry.len(), 3);
    assert_eq!(registry.name(registry.root_kind()), "Module");
    assert_eq!(registry.block_slots().slot_for("Loop"), Some("body"));
}
