use serde::{Deserialize, Serialize};
use tracing::debug;

/// Minimum best-pair ratio at which two names are considered the same identity.
///
/// The value is expected to lie in `[0, 1]` but is not clamped or validated here; values outside
/// that range simply make matching stricter or looser.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SimilarityThreshold(f64);

impl SimilarityThreshold {
    pub fn new(value: f64) -> Self {
        Self(value)
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn is_in_unit_range(self) -> bool {
        (0.0..=1.0).contains(&self.0)
    }
}

impl From<f64> for SimilarityThreshold {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

/// Stateless fuzzy comparison of two identity name strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimilarityEngine {
    short_circuit: bool,
}

impl Default for SimilarityEngine {
    fn default() -> Self {
        Self {
            short_circuit: true,
        }
    }
}

impl SimilarityEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine that scores every combination pair even after a perfect ratio is found.
    pub fn exhaustive() -> Self {
        Self {
            short_circuit: false,
        }
    }

    /// Decide whether `reg_person` and `verified_name` describe the same person.
    ///
    /// Rules apply in order and the first one that fires wins: a missing name never matches,
    /// two blank names match, case-insensitive equality matches, equal word sets match, and
    /// otherwise the best Levenshtein ratio across word combinations must reach `threshold`.
    pub fn is_stop_factor(
        &self,
        reg_person: Option<&str>,
        verified_name: Option<&str>,
        threshold: SimilarityThreshold,
    ) -> bool {
        let (Some(reg_person), Some(verified_name)) = (reg_person, verified_name) else {
            return false;
        };

        let reg_person = reg_person.trim();
        let verified_name = verified_name.trim();

        if reg_person.is_empty() && verified_name.is_empty() {
            return true;
        }

        if reg_person.to_lowercase() == verified_name.to_lowercase() {
            return true;
        }

        if contains_same_words(reg_person, verified_name) {
            return true;
        }

        let max_ratio = self.best_ratio(reg_person, verified_name);
        debug!(
            max_ratio,
            threshold = threshold.value(),
            "levenshtein ratio scan finished"
        );

        max_ratio >= 1.0 || max_ratio >= threshold.value()
    }

    /// Highest Levenshtein ratio between any word combination of `left` and any of `right`.
    ///
    /// Comparison is case-insensitive. Returns `0.0` when either side has no words.
    pub fn best_ratio(&self, left: &str, right: &str) -> f64 {
        let left_combinations = word_combinations(&left.to_lowercase());
        let right_combinations = word_combinations(&right.to_lowercase());

        debug!(?left_combinations, "registration name combinations");
        debug!(?right_combinations, "verified name combinations");

        let mut max_ratio: f64 = 0.0;
        for left in &left_combinations {
            for right in &right_combinations {
                let ratio = levenshtein_ratio(left, right);
                debug!(%left, %right, ratio, "compared combinations");
                max_ratio = max_ratio.max(ratio);

                if self.short_circuit && max_ratio >= 1.0 {
                    return max_ratio;
                }
            }
        }

        max_ratio
    }
}

/// [`SimilarityEngine::is_stop_factor`] with the default engine.
pub fn is_stop_factor(
    reg_person: Option<&str>,
    verified_name: Option<&str>,
    threshold: SimilarityThreshold,
) -> bool {
    SimilarityEngine::default().is_stop_factor(reg_person, verified_name, threshold)
}

fn contains_same_words(left: &str, right: &str) -> bool {
    canonical_word_set(left) == canonical_word_set(right)
}

fn canonical_word_set(value: &str) -> String {
    let mut words: Vec<String> = value.split_whitespace().map(str::to_lowercase).collect();
    words.sort();
    words.join(" ")
}

/// Every unordered pair of words in `input`, concatenated without a separator.
///
/// A single word is returned as-is and blank input yields nothing. Pairs keep the input word
/// order and are emitted by ascending first index, then ascending second index.
pub fn word_combinations(input: &str) -> Vec<String> {
    let words: Vec<&str> = input.split_whitespace().collect();

    match words.as_slice() {
        [] => Vec::new(),
        [single] => vec![(*single).to_string()],
        _ => {
            let mut combinations = Vec::with_capacity(words.len() * (words.len() - 1) / 2);
            for (i, first) in words.iter().enumerate() {
                for second in &words[i + 1..] {
                    combinations.push(format!("{first}{second}"));
                }
            }
            combinations
        }
    }
}

/// Similarity in `[0, 1]` derived from the edit distance: `1 - distance / max_len`.
pub fn levenshtein_ratio(s1: &str, s2: &str) -> f64 {
    if s1 == s2 {
        return 1.0;
    }

    let max_len = s1.chars().count().max(s2.chars().count());
    if max_len == 0 {
        return 1.0;
    }

    1.0 - levenshtein_distance(s1, s2) as f64 / max_len as f64
}

/// Unit-cost insert/delete/substitute edit distance, measured in chars.
pub fn levenshtein_distance(s1: &str, s2: &str) -> usize {
    let left: Vec<char> = s1.chars().collect();
    let right: Vec<char> = s2.chars().collect();

    if left.is_empty() {
        return right.len();
    }
    if right.is_empty() {
        return left.len();
    }

    // Two rows of the (len1 + 1) x (len2 + 1) table are enough.
    let mut previous: Vec<usize> = (0..=right.len()).collect();
    let mut current = vec![0; right.len() + 1];

    for (i, left_char) in left.iter().enumerate() {
        current[0] = i + 1;
        for (j, right_char) in right.iter().enumerate() {
            let cost = usize::from(left_char != right_char);
            current[j + 1] = (previous[j + 1] + 1)
                .min(current[j] + 1)
                .min(previous[j] + cost);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[right.len()]
}
