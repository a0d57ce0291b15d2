use serde::Deserialize;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Text folding applied to both the searched content and the query.
pub trait Normalizer: Send {
    fn normalize(&self, text: &str) -> String;
}

/// NFD decomposition with combining marks removed; case preserved.
#[derive(Debug, Clone, Copy, Default)]
pub struct StripMarks;

impl Normalizer for StripMarks {
    fn normalize(&self, text: &str) -> String {
        text.nfd().filter(|c| !is_combining_mark(*c)).collect()
    }
}

/// `StripMarks` followed by lowercasing.
#[derive(Debug, Clone, Copy, Default)]
pub struct CaseFold;

impl Normalizer for CaseFold {
    fn normalize(&self, text: &str) -> String {
        text.nfd()
            .filter(|c| !is_combining_mark(*c))
            .flat_map(char::to_lowercase)
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl Normalizer for Identity {
    fn normalize(&self, text: &str) -> String {
        text.to_string()
    }
}

/// Configurable choice of normalizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NormalizerKind {
    #[default]
    StripMarks,
    CaseFold,
    Identity,
}

impl NormalizerKind {
    pub fn build(self) -> Box<dyn Normalizer> {
        match self {
            NormalizerKind::StripMarks => Box::new(StripMarks),
            NormalizerKind::CaseFold => Box::new(CaseFold),
            NormalizerKind::Identity => Box::new(Identity),
        }
    }
}
