use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the jsdown binary.
#[derive(Parser, Debug)]
#[command(
    name = "jsdown",
    version,
    about = "Build a jsdown node tree over ESTree JSON and run both passes"
)]
pub struct CliArgs {
    /// Raw ESTree syntax tree, as JSON.
    pub ast: PathBuf,

    /// Source text the syntax tree was parsed from.
    pub source: PathBuf,

    /// What to print once both passes have run.
    #[arg(long, value_enum, default_value_t = PrintMode::Outline)]
    pub print: PrintMode,

    /// Enable a transform. May be repeated.
    #[arg(short = 't', long = "transform", value_name = "NAME")]
    pub transforms: Vec<String>,

    /// Wrap a bodyless `KIND.KEY` slot in a synthetic block, on top of the
    /// built-in slots. May be repeated.
    #[arg(long = "block-slot", value_name = "KIND.KEY", value_parser = parse_block_slot)]
    pub block_slots: Vec<(String, String)>,

    /// Maximum nesting depth of the tree.
    #[arg(long = "max-depth", value_name = "N")]
    pub max_depth: Option<u32>,
}

/// Output of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PrintMode {
    /// One line per node, indented by depth.
    Outline,
    /// Registered source-map locations with their line and column.
    Locations,
    /// The rendered source buffer.
    Output,
}

fn parse_block_slot(value: &str) -> Result<(String, String), String> {
    match value.split_once('.') {
        Some((kind, key)) if !kind.is_empty() && !key.is_empty() => {
            Ok((kind.to_string(), key.to_string()))
        }
        _ => Err(format!("expected KIND.KEY, got `{value}`")),
    }
}
