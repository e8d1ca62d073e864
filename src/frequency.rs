use rayon::prelude::*;
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;
use std::time::Instant;
use tracing::info;

use crate::review::Review;
use crate::stopwords::StopwordSet;

/// `(token, count)` pairs, most frequent first.
pub type FrequencyTable = Vec<(String, u32)>;

pub const DEFAULT_MIN_SCORE: u8 = 1;
pub const DEFAULT_MAX_SCORE: u8 = 3;
pub const DEFAULT_TOP_WORDS: usize = 20;

fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\b[a-zA-Z]{3,}\b").expect("token pattern compiles"))
}

/// Maximal runs of three or more ASCII letters standing alone as a word.
///
/// Runs touching digits, underscores or non-ASCII letters are dropped whole.
pub fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    token_pattern().find_iter(text).map(|m| m.as_str())
}

fn merge_counts(mut into: HashMap<String, u32>, from: HashMap<String, u32>) -> HashMap<String, u32> {
    for (word, count) in from {
        *into.entry(word).or_insert(0) += count;
    }
    into
}

/// Ranks non-stopword tokens from reviews scored within `min_score..=max_score`.
///
/// Ties on count are broken alphabetically so the result is deterministic.
/// An empty table means nothing qualified; it is never an error.
pub fn extract_top_words(
    reviews: &[Review],
    min_score: u8,
    max_score: u8,
    top_n: usize,
    stopwords: &StopwordSet,
) -> FrequencyTable {
    if top_n == 0 || min_score > max_score {
        return Vec::new();
    }

    let start_time = Instant::now();

    let counts = reviews
        .par_iter()
        .filter(|review| (min_score..=max_score).contains(&review.score))
        .fold(HashMap::new, |mut acc: HashMap<String, u32>, review| {
            let lowered = review.content.to_lowercase();
            for token in tokenize(&lowered) {
                if !stopwords.contains(token) {
                    *acc.entry(token.to_string()).or_insert(0) += 1;
                }
            }
            acc
        })
        .reduce(HashMap::new, merge_counts);

    let mut ranked: FrequencyTable = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(top_n);

    info!(
        action = "complete",
        component = "word_frequency",
        min_score,
        max_score,
        word_count = ranked.len(),
        duration_ms = start_time.elapsed().as_millis(),
        "Word frequency extraction completed"
    );

    ranked
}
