use clap::Parser;
use std::path::PathBuf;

use crate::frequency::{DEFAULT_MAX_SCORE, DEFAULT_MIN_SCORE, DEFAULT_TOP_WORDS};
use crate::review::{Language, SortOrder};

#[derive(Parser, Debug)]
#[command(
    name = "reviewscope",
    about = "Fetch Google Play reviews, chart their ratings and surface common complaints",
    version,
    long_about = None
)]
pub struct Args {
    /// App to analyze, by catalog name or package id (prompts when omitted)
    #[arg(short, long)]
    pub app: Option<String>,

    /// Number of reviews to fetch (1-5000)
    #[arg(short, long, default_value_t = 100)]
    pub count: u32,

    /// Review sort order
    #[arg(short, long, value_enum, default_value_t = SortOrder::Newest)]
    pub sort: SortOrder,

    /// Review language
    #[arg(short, long, value_enum, default_value_t = Language::Indonesian)]
    pub lang: Language,

    /// Lowest score counted as a low-rated review
    #[arg(long, default_value_t = DEFAULT_MIN_SCORE)]
    pub min_score: u8,

    /// Highest score counted as a low-rated review
    #[arg(long, default_value_t = DEFAULT_MAX_SCORE)]
    pub max_score: u8,

    /// Number of frequent words to chart
    #[arg(short, long, default_value_t = DEFAULT_TOP_WORDS)]
    pub top_words: usize,

    /// Save the fetched reviews as CSV without asking
    #[arg(short, long)]
    pub export: bool,

    /// Directory for the CSV export
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Path to custom Indonesian stopword file
    #[arg(long)]
    pub stopwords: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Number of worker threads for word counting
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Initialize stopwords_id.txt with the default list
    #[arg(long)]
    pub init: bool,
}
