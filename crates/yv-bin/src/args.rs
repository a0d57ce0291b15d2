use clap::Parser;
use core_model::{DiffMode, GutterMode, ViewMode};
use std::path::PathBuf;

/// CLI arguments.
#[derive(Parser, Debug, Default)]
#[command(name = "yview", version, about = "Page YAML revisions with syntax highlighting, search and diffs")]
pub struct Args {
    /// YAML files, one revision each in argument order. `-` or no file reads stdin.
    pub files: Vec<PathBuf>,
    /// Configuration file (overrides discovery of `yview.toml`).
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Write logs to this file (filtered by RUST_LOG).
    #[arg(long)]
    pub log: Option<PathBuf>,
    /// adjacent, origin or none.
    #[arg(long)]
    pub diff_mode: Option<DiffMode>,
    /// full, hunks or side-by-side.
    #[arg(long)]
    pub view_mode: Option<ViewMode>,
    /// Start with word wrap enabled.
    #[arg(long)]
    pub wrap: bool,
    /// Context lines around each hunk.
    #[arg(long)]
    pub hunk_context: Option<usize>,
    /// Do not capture the mouse.
    #[arg(long)]
    pub no_mouse: bool,
    /// none, line-numbers or diff-markers.
    #[arg(long)]
    pub gutter: Option<GutterMode>,
    /// Treat each `---` separated document of a single file as a revision.
    #[arg(long)]
    pub split_documents: bool,
}
