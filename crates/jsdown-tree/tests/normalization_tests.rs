//! Synthetic block insertion for bodyless statement slots.

use jsdown_tree::{BlockSlots, Field, KindRegistryBuilder, NodeIndex, NodeTree, Program, Transforms};
use serde_json::{Value, json};
use std::sync::Arc;

fn build(source: &str, raw: Value, slots: BlockSlots) -> Program {
    let registry = KindRegistryBuilder::estree()
        .block_slots(slots)
        .build()
        .unwrap();
    Program::new(source, raw, Arc::new(registry)).unwrap()
}

fn script(source: &str, statement: Value) -> Value {
    json!({
        "type": "Program",
        "start": 0,
        "end": source.len(),
        "body": [statement],
        "sourceType": "script"
    })
}

fn identifier(start: u32, name: &str) -> Value {
    json!({ "type": "Identifier", "start": start, "end": start + name.len() as u32, "name": name })
}

/// `name();` starting at `start`.
fn call_statement(start: u32, name: &str) -> Value {
    let call_end = start + name.len() as u32 + 2;
    json!({
        "type": "ExpressionStatement",
        "start": start,
        "end": call_end + 1,
        "expression": {
            "type": "CallExpression",
            "start": start,
            "end": call_end,
            "callee": identifier(start, name),
            "arguments": [],
            "optional": false
        }
    })
}

/// Every synthetic block as `(owner kind, owner key, start, end)`.
fn synthetic_blocks(tree: &NodeTree) -> Vec<(String, String, u32, u32)> {
    tree.iter_preorder()
        .filter(|&index| tree.get(index).is_synthetic())
        .map(|index| {
            let owner = tree.parent(index).unwrap();
            let key = tree
                .get(owner)
                .fields()
                .find(|(_, field)| field.as_node() == Some(index))
                .map(|(key, _)| key.to_string())
                .unwrap();
            let block = tree.get(index);
            (tree.kind_name(owner).to_string(), key, block.start, block.end)
        })
        .collect()
}

fn single(tree: &NodeTree, block: NodeIndex) -> NodeIndex {
    let items = tree.field(block, "body").and_then(Field::as_list).unwrap();
    assert_eq!(items.len(), 1);
    items[0].as_node().unwrap()
}

#[test]
fn test_for_body_is_wrapped() {
    let source = "for (;;) a();";
    let raw = script(
        source,
        json!({
            "type": "ForStatement",
            "start": 0,
            "end": 13,
            "init": null,
            "test": null,
            "update": null,
            "body": call_statement(9, "a")
        }),
    );
    let program = build(source, raw, BlockSlots::default());
    let tree = program.tree();

    assert_eq!(
        synthetic_blocks(tree),
        [("ForStatement".to_string(), "body".to_string(), 9, 13)]
    );

    let block = NodeIndex(2);
    assert_eq!(tree.kind_name(block), "BlockStatement");
    let keys: Vec<&str> = tree.get(block).keys().collect();
    assert_eq!(keys, ["start", "end", "type", "body", "synthetic"]);

    let statement = single(tree, block);
    assert_eq!(tree.kind_name(statement), "ExpressionStatement");
    assert_eq!(tree.parent(statement), Some(block));
    assert_eq!(tree.depth(statement), 3);
    assert!(tree.field(NodeIndex(1), "init").unwrap().is_null());
}

#[test]
fn test_for_in_body_is_wrapped() {
    let source = "for (k in o) a();";
    let raw = script(
        source,
        json!({
            "type": "ForInStatement",
            "start": 0,
            "end": 17,
            "left": identifier(5, "k"),
            "right": identifier(10, "o"),
            "body": call_statement(13, "a")
        }),
    );
    let program = build(source, raw, BlockSlots::default());

    assert_eq!(
        synthetic_blocks(program.tree()),
        [("ForInStatement".to_string(), "body".to_string(), 13, 17)]
    );
}

#[test]
fn test_while_body_is_wrapped_and_existing_blocks_are_not() {
    let source = "while (a) b();";
    let raw = script(
        source,
        json!({
            "type": "WhileStatement",
            "start": 0,
            "end": 14,
            "test": identifier(7, "a"),
            "body": call_statement(10, "b")
        }),
    );
    let program = build(source, raw, BlockSlots::default());
    assert_eq!(
        synthetic_blocks(program.tree()),
        [("WhileStatement".to_string(), "body".to_string(), 10, 14)]
    );

    let source = "while (a) { b(); }";
    let raw = script(
        source,
        json!({
            "type": "WhileStatement",
            "start": 0,
            "end": 18,
            "test": identifier(7, "a"),
            "body": {
                "type": "BlockStatement",
                "start": 10,
                "end": 18,
                "body": [call_statement(12, "b")]
            }
        }),
    );
    let braced = build(source, raw, BlockSlots::default());
    let tree = braced.tree();
    assert!(synthetic_blocks(tree).is_empty());

    let block = tree.child(NodeIndex(1), "body").unwrap();
    assert_eq!(tree.kind_name(block), "BlockStatement");
    assert_eq!(tree.get(block).keys().count(), 4);
}

#[test]
fn test_expression_bodied_arrow_is_wrapped() {
    let source = "x => x;";
    let raw = script(
        source,
        json!({
            "type": "ExpressionStatement",
            "start": 0,
            "end": 7,
            "expression": {
                "type": "ArrowFunctionExpression",
                "start": 0,
                "end": 6,
                "id": null,
                "expression": true,
                "generator": false,
                "async": false,
                "params": [identifier(0, "x")],
                "body": identifier(5, "x")
            }
        }),
    );
    let program = build(source, raw, BlockSlots::default());
    let tree = program.tree();

    assert_eq!(
        synthetic_blocks(tree),
        [("ArrowFunctionExpression".to_string(), "body".to_string(), 5, 6)]
    );

    let arrow = NodeIndex(2);
    let block = tree.child(arrow, "body").unwrap();
    let body = single(tree, block);
    assert_eq!(tree.kind_name(body), "Identifier");
    assert_eq!(tree.source_text(body, program.text()).unwrap(), "x");
    // The raw flag is kept as is
    assert_eq!(
        tree.field(arrow, "expression"),
        Some(&Field::Value(json!(true)))
    );
}

#[test]
fn test_only_the_consequent_of_if_is_wrapped() {
    let source = "if (a) b(); else c();";
    let raw = script(
        source,
        json!({
            "type": "IfStatement",
            "start": 0,
            "end": 21,
            "test": identifier(4, "a"),
            "consequent": call_statement(7, "b"),
            "alternate": call_statement(17, "c")
        }),
    );
    let program = build(source, raw, BlockSlots::default());
    let tree = program.tree();

    assert_eq!(
        synthetic_blocks(tree),
        [("IfStatement".to_string(), "consequent".to_string(), 7, 11)]
    );
    let alternate = tree.child(NodeIndex(1), "alternate").unwrap();
    assert_eq!(tree.kind_name(alternate), "ExpressionStatement");
}

#[test]
fn test_nested_statements_are_each_wrapped() {
    let source = "if (a) if (b) c();";
    let raw = script(
        source,
        json!({
            "type": "IfStatement",
            "start": 0,
            "end": 18,
            "test": identifier(4, "a"),
            "consequent": {
                "type": "IfStatement",
                "start": 7,
                "end": 18,
                "test": identifier(11, "b"),
                "consequent": call_statement(14, "c"),
                "alternate": null
            },
            "alternate": null
        }),
    );
    let mut program = build(source, raw, BlockSlots::default());

    let blocks = synthetic_blocks(program.tree());
    assert_eq!(
        blocks,
        [
            ("IfStatement".to_string(), "consequent".to_string(), 7, 18),
            ("IfStatement".to_string(), "consequent".to_string(), 14, 18),
        ]
    );

    let tree = program.tree();
    let call = tree
        .iter_preorder()
        .find(|&index| tree.kind_name(index) == "CallExpression")
        .unwrap();
    // Program > If > Block > If > Block > Statement > Call
    assert_eq!(tree.depth(call), 6);

    program.initialise(&Transforms::none()).unwrap();
    program.transpile(&Transforms::none()).unwrap();
    assert_eq!(program.render(), source);
}

#[test]
fn test_custom_slots() {
    let source = "for (v of l) a();";
    let for_of = || {
        script(
            source,
            json!({
                "type": "ForOfStatement",
                "start": 0,
                "end": 17,
                "await": false,
                "left": identifier(5, "v"),
                "right": identifier(10, "l"),
                "body": call_statement(13, "a")
            }),
        )
    };

    let plain = build(source, for_of(), BlockSlots::default());
    assert!(synthetic_blocks(plain.tree()).is_empty());

    let extended = build(
        source,
        for_of(),
        BlockSlots::default().with_slot("ForOfStatement", "body"),
    );
    assert_eq!(
        synthetic_blocks(extended.tree()),
        [("ForOfStatement".to_string(), "body".to_string(), 13, 17)]
    );
}

#[test]
fn test_empty_slot_table_disables_wrapping() {
    let source = "while (a) b();";
    let raw = script(
        source,
        json!({
            "type": "WhileStatement",
            "start": 0,
            "end": 14,
            "test": identifier(7, "a"),
            "body": call_statement(10, "b")
        }),
    );
    let program = build(source, raw, BlockSlots::empty());
    let tree = program.tree();

    assert!(synthetic_blocks(tree).is_empty());
    assert_eq!(
        tree.kind_name(tree.child(NodeIndex(1), "body").unwrap()),
        "ExpressionStatement"
    );
}
