pub mod apps;
pub mod args;
pub mod chart;
pub mod export;
pub mod fetcher;
pub mod frequency;
pub mod prompt;
pub mod review;
pub mod session;
pub mod stopwords;
pub mod utils;

pub use args::Args;
pub use fetcher::{fetch_reviews, PlayStoreClient, ReviewSource};
pub use frequency::{extract_top_words, FrequencyTable};
pub use review::{FetchRequest, Language, Review, ReviewTable, SortOrder};
pub use session::{analyze_reviews, run_session, ProblemFilter, Selection, SessionOutcome};
pub use stopwords::{init_default_stopwords, load_stopwords, StopwordSet};
