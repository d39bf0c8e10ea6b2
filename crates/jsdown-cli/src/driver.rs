//! Pipeline driver: read inputs, build the tree, run both passes, format.

use crate::args::{CliArgs, PrintMode};
use anyhow::{Context, Result};
use jsdown_common::{LineMap, PositionedText};
use jsdown_tree::{
    BlockSlots, Field, KindRegistryBuilder, NodeIndex, NodeTree, Program, Transforms, TreeBuilder,
};
use serde::Deserialize;
use serde_json::Value;
use std::fmt::Write as _;
use std::path::Path;
use std::sync::Arc;

/// Run the pipeline for `args` and return what should be printed.
pub fn run(args: &CliArgs) -> Result<String> {
    let source = read_file(&args.source)?;
    let ast = read_file(&args.ast)?;
    let raw = parse_json(&ast)
        .with_context(|| format!("{} is not valid JSON", args.ast.display()))?;

    let transforms: Transforms = args.transforms.iter().cloned().collect();
    let program = compile(source, raw, args, &transforms)
        .with_context(|| format!("failed to compile {}", args.source.display()))?;

    Ok(match args.print {
        PrintMode::Outline => outline(program.tree()),
        PrintMode::Locations => locations(program.text()),
        PrintMode::Output => program.render(),
    })
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Parse an ESTree document without serde_json's nesting cap, leaving the
/// depth limit to `TreeBuilder`.
fn parse_json(ast: &str) -> serde_json::Result<Value> {
    let mut de = serde_json::Deserializer::from_str(ast);
    de.disable_recursion_limit();
    let raw = Value::deserialize(&mut de)?;
    de.end()?;
    Ok(raw)
}

/// Build the tree for `raw` over `source` and run initialise and transpile.
pub fn compile(
    source: String,
    raw: Value,
    args: &CliArgs,
    transforms: &Transforms,
) -> Result<Program> {
    let mut slots = BlockSlots::default();
    for (kind, key) in &args.block_slots {
        slots.insert(kind.as_str(), key.as_str());
    }
    let registry = KindRegistryBuilder::estree()
        .block_slots(slots)
        .build()
        .context("invalid kind registry")?;

    let mut text = PositionedText::new(source);
    let mut builder = TreeBuilder::new(Arc::new(registry), &mut text);
    if let Some(max_depth) = args.max_depth {
        builder = builder.with_max_depth(max_depth);
    }
    let tree = builder.build(raw).context("failed to build node tree")?;
    tracing::info!(nodes = tree.len(), "built node tree");

    let mut program = Program::from_parts(tree, text);
    program
        .initialise(transforms)
        .context("initialise pass failed")?;
    program
        .transpile(transforms)
        .context("transpile pass failed")?;
    Ok(program)
}

/// One line per node in visitation order: the key it sits under, its kind
/// and its `[start, end)` range.
pub fn outline(tree: &NodeTree) -> String {
    let mut out = String::new();
    write_node(tree, tree.root(), None, &mut out);
    out
}

fn write_node(tree: &NodeTree, index: NodeIndex, label: Option<&str>, out: &mut String) {
    let node = tree.get(index);
    for _ in 0..node.depth {
        out.push_str("  ");
    }
    if let Some(label) = label {
        let _ = write!(out, "{label}: ");
    }
    let _ = write!(out, "{} [{}, {})", tree.kind_name(index), node.start, node.end);
    if node.is_synthetic() {
        out.push_str(" synthetic");
    }
    out.push('\n');

    for (key, field) in node.fields() {
        match field {
            Field::Node(child) => write_node(tree, *child, Some(key), out),
            Field::List(items) => {
                for (position, item) in items.iter().enumerate() {
                    if let Some(child) = item.as_node() {
                        let label = format!("{key}[{position}]");
                        write_node(tree, child, Some(&label), out);
                    }
                }
            }
            Field::Value(_) => {}
        }
    }
}

/// Every registered source-map location as `offset line:column`, with
/// 1-based lines and 0-based columns.
pub fn locations(text: &PositionedText) -> String {
    let lines = LineMap::build(text.original());
    let mut out = String::new();
    for offset in text.sourcemap_locations() {
        let position = lines.offset_to_position(offset);
        let _ = writeln!(out, "{offset} {}:{}", position.line + 1, position.column);
    }
    out
}
