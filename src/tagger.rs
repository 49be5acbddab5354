//! Headline tagger over the built-in taxonomy.
//!
//! `Taxonomy::classify` does the work; this module exposes the process-wide
//! built-in table for callers that don't load a config file.

use once_cell::sync::Lazy;

use crate::taxonomy::{Category, Taxonomy};

static BUILTIN: Lazy<Taxonomy> = Lazy::new(Taxonomy::builtin);

/// Built-in taxonomy, constructed on first use.
pub fn builtin_taxonomy() -> &'static Taxonomy {
    &BUILTIN
}

/// Classify a headline with the built-in taxonomy. Total: never fails, one tag per call.
pub fn classify(title: &str) -> Category {
    BUILTIN.classify(title)
}
