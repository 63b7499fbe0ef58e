//! Fuzzy identity-name matching.
//!
//! Pure functions only: callers hand in already assembled name strings and a threshold and get a
//! match decision back.

mod engine;
mod normalizer;

pub use engine::{
    is_stop_factor, levenshtein_distance, levenshtein_ratio, word_combinations, SimilarityEngine,
    SimilarityThreshold,
};
pub use normalizer::{normalize_fields, normalize_name, NameFields};
