//! Reading input files into named sources.

use core_model::Source;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot read standard input: {0}")]
    Stdin(#[source] io::Error),
    #[error("{path} is not valid UTF-8")]
    Encoding { path: PathBuf },
}

const STDIN_NAME: &str = "-";

/// Load every input as `(name, text)`; no files means stdin.
pub fn read_inputs(files: &[PathBuf]) -> Result<Vec<(String, String)>, LoadError> {
    if files.is_empty() {
        return Ok(vec![(STDIN_NAME.to_string(), read_stdin()?)]);
    }
    files
        .iter()
        .map(|path| {
            if path.as_os_str() == STDIN_NAME {
                Ok((STDIN_NAME.to_string(), read_stdin()?))
            } else {
                Ok((display_name(path), read_file(path)?))
            }
        })
        .collect()
}

fn read_stdin() -> Result<String, LoadError> {
    let mut text = String::new();
    io::stdin()
        .read_to_string(&mut text)
        .map_err(LoadError::Stdin)?;
    Ok(text)
}

fn read_file(path: &Path) -> Result<String, LoadError> {
    let bytes = std::fs::read(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    String::from_utf8(bytes).map_err(|_| LoadError::Encoding {
        path: path.to_path_buf(),
    })
}

fn display_name(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Split a multi-document stream at `---` header lines. The header stays
/// with the document it opens; leading content before the first header is
/// its own document.
pub fn split_documents(text: &str) -> Vec<&str> {
    let mut docs = Vec::new();
    let mut start = 0;
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        let bare = line.trim_end_matches(['\n', '\r']);
        let is_header = bare == "---" || bare.starts_with("--- ") || bare.starts_with("---\t");
        if is_header && offset > start && !text[start..offset].trim().is_empty() {
            docs.push(&text[start..offset]);
            start = offset;
        }
        offset += line.len();
    }
    if start < text.len() || docs.is_empty() {
        docs.push(&text[start..]);
    }
    docs
}

/// Build the revision list: one source per input, or one per document when
/// `split` is set and exactly one input was given.
pub fn build_sources(inputs: Vec<(String, String)>, split: bool) -> Vec<Source> {
    let split = split && inputs.len() == 1;
    let mut out = Vec::new();
    for (name, text) in inputs {
        if split {
            let docs = split_documents(&text);
            for (i, doc) in docs.iter().enumerate() {
                let doc = doc.trim_end_matches('\n');
                out.push(Source::from_text(format!("{name}#{}", i + 1), doc));
            }
        } else {
            out.push(Source::from_text(name, text.trim_end_matches('\n')));
        }
    }
    info!(target: "runtime.startup", revisions = out.len(), split, "sources_loaded");
    out
}
