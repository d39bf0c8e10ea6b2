use crate::TreeError;
use crate::build::TreeBuilder;
use crate::node::{Field, NodeIndex};
use crate::test_fixtures::*;
use jsdown_common::PositionedText;
use serde_json::{Value, json};

#[test]
fn test_root_has_depth_zero_and_no_parent() {
    let program = program(IF_SOURCE, if_statement());
    let tree = program.tree();
    let root = tree.get(tree.root());

    assert_eq!(tree.kind_name(tree.root()), "Program");
    assert_eq!(root.depth, 0);
    assert!(root.is_root());
    assert_eq!(tree.parent(tree.root()), None);
}

#[test]
fn test_depth_is_parent_depth_plus_one() {
    let program = program(FUNCTION_SOURCE, function_declaration());
    let tree = program.tree();

    for index in tree.iter_preorder().skip(1) {
        let parent = tree.parent(index).expect("non-root has a parent");
        assert_eq!(tree.depth(index), tree.depth(parent) + 1);
        assert!(parent < index, "parents are allocated before children");
    }
}

#[test]
fn test_keys_follow_raw_declaration_order() {
    let program = program(IF_SOURCE, if_statement());
    let tree = program.tree();
    let if_node = tree.children(tree.root())[0];

    let keys: Vec<&str> = tree.get(if_node).keys().collect();
    assert_eq!(
        keys,
        ["type", "start", "end", "test", "consequent", "alternate"]
    );

    let root_keys: Vec<&str> = tree.get(tree.root()).keys().collect();
    assert_eq!(root_keys, ["type", "start", "end", "body", "sourceType"]);
}

#[test]
fn test_fields_are_wrapped_by_shape() {
    let program = program(IF_SOURCE, if_statement());
    let tree = program.tree();
    let if_node = tree.children(tree.root())[0];

    assert_eq!(
        tree.field(if_node, "type"),
        Some(&Field::Value(json!("IfStatement")))
    );
    assert_eq!(tree.field(if_node, "start"), Some(&Field::Value(json!(0))));
    assert!(tree.field(if_node, "alternate").unwrap().is_null());
    assert!(tree.child(if_node, "test").is_some());
    assert!(matches!(
        tree.field(tree.root(), "body"),
        Some(Field::List(items)) if items.len() == 1
    ));
    assert_eq!(
        tree.field(tree.root(), "sourceType").and_then(Field::as_str),
        Some("script")
    );
}

#[test]
fn test_array_holes_are_preserved() {
    let program = program(HOLE_SOURCE, array_with_hole());
    let tree = program.tree();
    let statement = tree.children(tree.root())[0];
    let array = tree.child(statement, "expression").unwrap();

    let elements = tree.field(array, "elements").and_then(Field::as_list).unwrap();
    assert_eq!(elements.len(), 3);
    assert!(elements[0].as_node().is_some());
    assert!(elements[1].is_null());
    assert!(elements[2].as_node().is_some());

    // Holes are skipped when listing children
    assert_eq!(tree.children(array).len(), 2);
}

#[test]
fn test_plain_data_objects_are_not_nodes() {
    let source = "/a+/g;";
    let raw = json!({
        "type": "Program",
        "start": 0,
        "end": 6,
        "body": [{
            "type": "ExpressionStatement",
            "start": 0,
            "end": 6,
            "expression": {
                "type": "Literal",
                "start": 0,
                "end": 5,
                "value": {},
                "raw": "/a+/g",
                "regex": { "pattern": "a+", "flags": "g" }
            }
        }],
        "sourceType": "script"
    });

    let program = program(source, raw);
    let tree = program.tree();
    assert_eq!(tree.len(), 3);

    let literal = NodeIndex(2);
    assert_eq!(tree.kind_name(literal), "Literal");
    assert_eq!(
        tree.field(literal, "regex"),
        Some(&Field::Value(json!({ "pattern": "a+", "flags": "g" })))
    );
}

#[test]
fn test_every_node_start_and_end_is_a_sourcemap_location() {
    let program = program(FUNCTION_SOURCE, function_declaration());
    let tree = program.tree();
    let text = program.text();

    for index in tree.iter_preorder() {
        let node = tree.get(index);
        assert!(text.is_sourcemap_location(node.start));
        assert!(text.is_sourcemap_location(node.end));
    }
    assert_eq!(
        text.sourcemap_locations(),
        vec![0, 9, 10, 13, 19, 22, 24, 25, 27]
    );
}

#[test]
fn test_trees_get_distinct_program_ids() {
    let first = program(IF_SOURCE, if_statement());
    let second = program(IF_SOURCE, if_statement());
    assert_ne!(first.tree().program_id(), second.tree().program_id());
}

fn build(source: &str, raw: Value) -> Result<crate::NodeTree, TreeError> {
    let mut text = PositionedText::new(source);
    TreeBuilder::new(estree_registry(), &mut text).build(raw)
}

#[test]
fn test_non_object_root_is_rejected() {
    let err = build("", json!([1, 2])).unwrap_err();
    assert!(matches!(err, TreeError::NotANode { found: "an array" }));
}

#[test]
fn test_root_without_type_is_rejected() {
    let err = build("", json!({ "start": 0, "end": 0 })).unwrap_err();
    assert!(matches!(err, TreeError::MissingType { ref key } if key == "<root>"));
}

#[test]
fn test_non_string_type_is_rejected() {
    let raw = json!({
        "type": "Program",
        "start": 0,
        "end": 1,
        "body": [{ "type": 7, "start": 0, "end": 1 }]
    });
    let err = build("x", raw).unwrap_err();
    assert!(matches!(err, TreeError::MissingType { ref key } if key == "body"));
}

#[test]
fn test_unknown_kind_fails_fast() {
    let raw = json!({
        "type": "Program",
        "start": 0,
        "end": 12,
        "body": [{ "type": "TSTypeAliasDeclaration", "start": 0, "end": 12 }]
    });
    let err = build("type A = B;;", raw).unwrap_err();
    assert!(matches!(
        err,
        TreeError::UnknownKind { ref kind, start: 0 } if kind == "TSTypeAliasDeclaration"
    ));
}

#[test]
fn test_invalid_offsets_are_rejected() {
    let missing = json!({ "type": "Program", "start": 0, "body": [] });
    assert!(matches!(
        build("", missing).unwrap_err(),
        TreeError::InvalidOffset { field: "end", .. }
    ));

    let fractional = json!({ "type": "Program", "start": 0.5, "end": 1, "body": [] });
    assert!(matches!(
        build("x", fractional).unwrap_err(),
        TreeError::InvalidOffset { field: "start", .. }
    ));

    let past_end = json!({ "type": "Program", "start": 0, "end": 4, "body": [] });
    assert!(matches!(
        build("abc", past_end).unwrap_err(),
        TreeError::InvalidOffset { field: "end", .. }
    ));

    let reversed = json!({ "type": "Program", "start": 2, "end": 1, "body": [] });
    assert!(matches!(
        build("abc", reversed).unwrap_err(),
        TreeError::InvalidOffset { field: "end", .. }
    ));

    let split_char = json!({ "type": "Program", "start": 0, "end": 1, "body": [] });
    assert!(matches!(
        build("é", split_char).unwrap_err(),
        TreeError::InvalidOffset { field: "end", .. }
    ));
}

#[test]
fn test_nesting_limit() {
    let mut text = PositionedText::new(IF_SOURCE);
    let err = TreeBuilder::new(estree_registry(), &mut text)
        .with_max_depth(3)
        .build(if_statement())
        .unwrap_err();
    // Program(0) > IfStatement(1) > BlockStatement(2) > ExpressionStatement(3) > CallExpression(4)
    assert!(matches!(
        err,
        TreeError::TooDeep { ref kind, start: 7, limit: 3 } if kind == "CallExpression"
    ));

    let mut text = PositionedText::new(IF_SOURCE);
    let tree = TreeBuilder::new(estree_registry(), &mut text)
        .with_max_depth(5)
        .build(if_statement())
        .unwrap();
    assert_eq!(tree.iter_preorder().map(|i| tree.depth(i)).max(), Some(5));
}

/// `!!…!x` with `bangs` nested unary operators, as a script.
fn negations(bangs: u32) -> (String, Value) {
    let mut expression = json!({ "type": "Identifier", "start": bangs, "end": bangs + 1, "name": "x" });
    for start in (0..bangs).rev() {
        expression = json!({
            "type": "UnaryExpression",
            "start": start,
            "end": bangs + 1,
            "operator": "!",
            "prefix": true,
            "argument": expression
        });
    }
    let raw = json!({
        "type": "Program",
        "start": 0,
        "end": bangs + 1,
        "body": [{
            "type": "ExpressionStatement",
            "start": 0,
            "end": bangs + 1,
            "expression": expression
        }]
    });
    (format!("{}x", "!".repeat(bangs as usize)), raw)
}

#[test]
fn test_default_depth_limit_on_an_8mb_stack() {
    let handle = std::thread::Builder::new()
        .stack_size(8 * 1024 * 1024)
        .spawn(|| {
            let (source, raw) = negations(988);
            let tree = build(&source, raw).unwrap();
            let deepest = tree.iter_preorder().map(|i| tree.depth(i)).max();
            assert_eq!(deepest, Some(990));

            let (source, raw) = negations(1_000);
            let err = build(&source, raw).unwrap_err();
            assert!(matches!(
                err,
                TreeError::TooDeep { ref kind, start: 999, limit: 1_000 } if kind == "UnaryExpression"
            ));
        })
        .unwrap();
    handle.join().unwrap();
}
