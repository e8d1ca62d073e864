use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

// Include the Indonesian stopword list at compile time
const DEFAULT_STOPWORDS_BYTES: &[u8] = include_bytes!("../default_stopwords_id.txt");

pub const DEFAULT_STOPWORDS_FILE: &str = "stopwords_id.txt";

pub const ENGLISH_STOPWORDS: &[&str] = &[
    "and", "or", "but", "the", "this", "that", "a", "an", "to", "in", "of", "on", "for", "with",
    "at", "by", "from", "as", "is", "are", "was", "were", "be", "been", "have", "has", "had", "do",
    "does", "did", "not", "no", "yes", "it", "you", "we", "they", "he", "she", "i", "me", "my",
    "your", "our", "their", "his", "her", "its", "ours", "theirs",
];

/// Lowercase words excluded from frequency analysis.
///
/// Built once at startup and handed to the extractor by reference.
#[derive(Debug, Clone, Default)]
pub struct StopwordSet {
    words: HashSet<String>,
}

impl StopwordSet {
    /// Union of `indonesian` with the built-in English list.
    pub fn build<I, S>(indonesian: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = indonesian
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .chain(ENGLISH_STOPWORDS.iter().map(|w| w.to_string()))
            .collect();
        Self { words }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

fn parse_word_list(content: &str) -> Vec<&str> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect()
}

fn embedded_stopwords() -> Result<&'static str> {
    std::str::from_utf8(DEFAULT_STOPWORDS_BYTES).context("Failed to decode embedded stopword list")
}

pub fn load_stopwords(stopword_file_path: Option<&Path>) -> Result<StopwordSet> {
    load_stopwords_from(Path::new("."), stopword_file_path)
}

/// Builds the stopword set, looking for the default file in `base_dir`.
///
/// An explicit file must exist. Otherwise `base_dir/stopwords_id.txt` is used
/// when present and non-empty, falling back to the embedded list.
pub fn load_stopwords_from(base_dir: &Path, stopword_file_path: Option<&Path>) -> Result<StopwordSet> {
    let start_time = Instant::now();
    info!(
        action = "start",
        component = "stopword_loading",
        "Starting stopword loading"
    );

    let set = if let Some(path) = stopword_file_path {
        info!(action = "load", component = "stopword_file", file_path = ?path, "Loading stopwords from specified file");
        if !path.exists() {
            anyhow::bail!("Stopword file not found: {:?}", path);
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read stopword file {:?}", path))?;
        StopwordSet::build(parse_word_list(&content))
    } else {
        let default_file = base_dir.join(DEFAULT_STOPWORDS_FILE);
        let from_file = if default_file.exists() {
            info!(action = "load", component = "default_stopword_file", file_path = ?default_file, "Loading stopwords from default file");
            match fs::read_to_string(&default_file) {
                Ok(content) => {
                    let words = parse_word_list(&content);
                    if words.is_empty() {
                        warn!(action = "parse", component = "default_stopword_file", file_path = ?default_file, "Stopword file is empty");
                        None
                    } else {
                        Some(StopwordSet::build(words))
                    }
                }
                Err(e) => {
                    warn!(action = "read", component = "default_stopword_file", error = %e, "Failed to read stopword file");
                    None
                }
            }
        } else {
            None
        };

        match from_file {
            Some(set) => set,
            None => {
                info!(
                    action = "load",
                    component = "embedded_stopwords",
                    "Using embedded default stopwords"
                );
                StopwordSet::build(parse_word_list(embedded_stopwords()?))
            }
        }
    };

    info!(
        action = "complete",
        component = "stopword_loading",
        stopword_count = set.len(),
        duration_ms = start_time.elapsed().as_millis(),
        "Stopword set built"
    );
    Ok(set)
}

pub fn init_default_stopwords() -> Result<()> {
    let path = init_default_stopwords_in(Path::new("."))?;
    println!("Created {} with default stopwords", path.display());
    Ok(())
}

/// Writes the embedded list to `base_dir/stopwords_id.txt`, never overwriting.
pub fn init_default_stopwords_in(base_dir: &Path) -> Result<PathBuf> {
    let default_file = base_dir.join(DEFAULT_STOPWORDS_FILE);

    if default_file.exists() {
        anyhow::bail!(
            "{} already exists. Remove it first if you want to reinitialize.",
            DEFAULT_STOPWORDS_FILE
        );
    }

    fs::write(&default_file, embedded_stopwords()?)
        .with_context(|| format!("Failed to write {:?}", default_file))?;

    Ok(default_file)
}
