//! Configuration loading and parsing.
//!
//! `yview.toml` is looked up in the working directory first, then in the
//! platform config dir (`<config_dir>/yview/yview.toml`). An explicit path
//! from the binary skips discovery. Every field has a default, and a missing
//! or malformed file yields `Config::default()` (parse errors are logged at
//! warn so the pager still starts). Unknown fields are ignored.
//!
//! ```toml
//! [pager]
//! hunk_context = 3
//! word_wrap = false
//! diff_mode = "adjacent"
//! view_mode = "side-by-side"
//! gutter = "line-numbers"
//!
//! [search]
//! normalizer = "case-fold"
//!
//! [keys]
//! page_down = ["pgdn", "space"]
//! ```

use anyhow::{Context, Result};
use core_keymap::{KeyMap, KeyParseError};
use core_model::{DiffMode, GutterMode, ViewMode};
use core_search::NormalizerKind;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const FILE_NAME: &str = "yview.toml";

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct PagerConfig {
    pub hunk_context: usize,
    pub word_wrap: bool,
    pub mouse: bool,
    pub mouse_delta: usize,
    pub horizontal_step: usize,
    pub fill_height: bool,
    pub diff_mode: DiffMode,
    pub view_mode: ViewMode,
    pub gutter: GutterMode,
}

impl Default for PagerConfig {
    fn default() -> Self {
        Self {
            hunk_context: 3,
            word_wrap: false,
            mouse: true,
            mouse_delta: 3,
            horizontal_step: 4,
            fill_height: false,
            diff_mode: DiffMode::default(),
            view_mode: ViewMode::default(),
            gutter: GutterMode::default(),
        }
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
#[serde(default)]
pub struct SearchConfig {
    pub normalizer: NormalizerKind,
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
#[serde(default)]
pub struct ConfigFile {
    pub pager: PagerConfig,
    pub search: SearchConfig,
    /// Action name -> binding strings, replacing that action's defaults.
    pub keys: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Where the file was read from; `None` when defaults were used.
    pub path: Option<PathBuf>,
    pub file: ConfigFile,
}

/// Best-effort config path: working directory, then the platform config dir.
pub fn discover() -> PathBuf {
    let local = PathBuf::from(FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("yview").join(FILE_NAME);
    }
    local
}

/// Parse configuration text.
pub fn parse(content: &str) -> Result<ConfigFile> {
    toml::from_str::<ConfigFile>(content).context("invalid yview configuration")
}

/// Load `path` (or the discovered file). Never fails on a missing or
/// malformed file; only returns an error for unreadable existing files.
pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    if !path.exists() {
        debug!(target: "config", path = %path.display(), "config_missing_using_defaults");
        return Ok(Config::default());
    }
    let content = fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    match parse(&content) {
        Ok(file) => {
            info!(target: "config", path = %path.display(), keys = file.keys.len(), "config_loaded");
            Ok(Config {
                path: Some(path),
                file,
            })
        }
        Err(e) => {
            warn!(target: "config", path = %path.display(), error = %format!("{e:#}"), "config_parse_failed");
            Ok(Config::default())
        }
    }
}

impl Config {
    pub fn pager(&self) -> &PagerConfig {
        &self.file.pager
    }

    pub fn normalizer(&self) -> NormalizerKind {
        self.file.search.normalizer
    }

    /// Default key map with the `[keys]` overrides applied.
    pub fn keymap(&self) -> (KeyMap, Vec<KeyParseError>) {
        let mut map = KeyMap::default();
        let errors = map.apply_overrides(
            self.file
                .keys
                .iter()
                .map(|(action, keys)| (action.as_str(), keys.as_slice())),
        );
        if !errors.is_empty() {
            warn!(target: "config", count = errors.len(), "key_overrides_skipped");
        }
        (map, errors)
    }

    pub fn source_path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_events::{KeyCode, KeyEvent};
    use core_keymap::PagerAction;
    use std::io::Write;
    use std::sync::{Arc, Mutex, MutexGuard};
    use tracing::Level;
    use tracing::subscriber::with_default;
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone)]
    struct BufferWriter {
        inner: Arc<Mutex<Vec<u8>>>,
    }

    impl BufferWriter {
        fn new() -> (Self, Arc<Mutex<Vec<u8>>>) {
            let buf = Arc::new(Mutex::new(Vec::new()));
            (Self { inner: buf.clone() }, buf)
        }
    }

    struct LockedWriter<'a> {
        guard: MutexGuard<'a, Vec<u8>>,
    }

    impl Write for LockedWriter<'_> {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.guard.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for BufferWriter {
        type Writer = LockedWriter<'a>;

        fn make_writer(&'a self) -> Self::Writer {
            LockedWriter {
                guard: self.inner.lock().expect("log buffer poisoned"),
            }
        }
    }

    fn write_config(body: &str) -> tempfile::NamedTempFile {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), body).unwrap();
        tmp
    }

    #[test]
    fn defaults_when_missing_file() {
        let cfg = load_from(Some(PathBuf::from("__nonexistent_hopefully__.toml"))).unwrap();
        assert!(cfg.path.is_none());
        assert_eq!(cfg.pager(), &PagerConfig::default());
        assert_eq!(cfg.pager().hunk_context, 3);
        assert!(cfg.pager().mouse);
        assert_eq!(cfg.normalizer(), NormalizerKind::StripMarks);
    }

    #[test]
    fn parses_pager_and_search_sections() {
        let tmp = write_config(
            "[pager]\nhunk_context = 1\nword_wrap = true\ndiff_mode = \"origin\"\n\
             view_mode = \"side-by-side\"\ngutter = \"line-numbers\"\n\
             [search]\nnormalizer = \"case-fold\"\n",
        );
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.source_path(), Some(tmp.path()));
        let pager = cfg.pager();
        assert_eq!(pager.hunk_context, 1);
        assert!(pager.word_wrap);
        assert_eq!(pager.diff_mode, DiffMode::Origin);
        assert_eq!(pager.view_mode, ViewMode::SideBySide);
        assert_eq!(pager.gutter, GutterMode::LineNumbers);
        // untouched fields keep their defaults
        assert_eq!(pager.mouse_delta, 3);
        assert_eq!(cfg.normalizer(), NormalizerKind::CaseFold);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let file = parse("[pager]\nshiny = 1\n[elsewhere]\nx = 2\n").unwrap();
        assert_eq!(file, ConfigFile::default());
    }

    #[test]
    fn key_overrides_replace_defaults() {
        let tmp = write_config("[keys]\npage_down = [\"x\", \"ctrl+f\"]\nbogus = [\"y\"]\n");
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        let (map, errors) = cfg.keymap();
        assert_eq!(errors.len(), 1);
        assert_eq!(
            map.resolve(&KeyEvent::plain(KeyCode::Char('x'))),
            Some(PagerAction::PageDown)
        );
        assert_eq!(map.resolve(&KeyEvent::plain(KeyCode::Char(' '))), None);
        assert_eq!(map.resolve(&KeyEvent::ctrl('f')), Some(PagerAction::PageDown));
    }

    #[test]
    fn parse_error_falls_back_and_warns() {
        let tmp = write_config("[pager]\nhunk_context = \"lots\"\n");
        let (writer, buffer) = BufferWriter::new();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::WARN)
            .with_target(true)
            .with_ansi(false)
            .without_time()
            .with_writer(writer)
            .finish();

        let cfg = with_default(subscriber, || load_from(Some(tmp.path().to_path_buf())).unwrap());

        let log_output = String::from_utf8(buffer.lock().unwrap().clone()).unwrap();
        assert!(log_output.contains("WARN config:"));
        assert!(log_output.contains("config_parse_failed"));
        assert!(cfg.path.is_none());
        assert_eq!(cfg.pager().hunk_context, 3);
    }
}
