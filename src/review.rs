use chrono::{DateTime, Utc};
use clap::ValueEnum;
use std::collections::BTreeMap;
use std::fmt;

pub const MIN_REVIEW_COUNT: u32 = 1;
pub const MAX_REVIEW_COUNT: u32 = 5000;
pub const DEFAULT_COUNTRY: &str = "id";

/// One user review as returned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    pub author: String,
    pub score: u8,
    pub content: String,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Language {
    #[default]
    #[value(name = "id")]
    Indonesian,
    #[value(name = "en")]
    English,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Language::Indonesian => "id",
            Language::English => "en",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::Indonesian => write!(f, "Indonesian"),
            Language::English => write!(f, "English"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SortOrder {
    MostRelevant,
    #[default]
    Newest,
}

impl SortOrder {
    /// Sort code understood by the Play Store review RPC.
    pub fn code(self) -> u8 {
        match self {
            SortOrder::MostRelevant => 1,
            SortOrder::Newest => 2,
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::MostRelevant => write!(f, "Most Relevant"),
            SortOrder::Newest => write!(f, "Newest"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub app_id: String,
    pub lang: Language,
    pub country: String,
    pub count: u32,
    pub sort: SortOrder,
}

impl FetchRequest {
    pub fn new(app_id: impl Into<String>, lang: Language, count: u32, sort: SortOrder) -> Self {
        Self {
            app_id: app_id.into(),
            lang,
            country: DEFAULT_COUNTRY.to_string(),
            count,
            sort,
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.app_id.trim().is_empty() {
            anyhow::bail!("App identifier must not be empty");
        }
        if !(MIN_REVIEW_COUNT..=MAX_REVIEW_COUNT).contains(&self.count) {
            anyhow::bail!(
                "Review count must be between {} and {}, got {}",
                MIN_REVIEW_COUNT,
                MAX_REVIEW_COUNT,
                self.count
            );
        }
        Ok(())
    }
}

/// Reviews fetched during one session, in the order the store returned them.
#[derive(Debug, Clone, Default)]
pub struct ReviewTable {
    rows: Vec<Review>,
}

impl ReviewTable {
    pub fn new(rows: Vec<Review>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Review] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Review count per score, for the scores that occur.
    pub fn score_distribution(&self) -> BTreeMap<u8, u32> {
        let mut counts = BTreeMap::new();
        for review in &self.rows {
            *counts.entry(review.score).or_insert(0) += 1;
        }
        counts
    }
}

impl From<Vec<Review>> for ReviewTable {
    fn from(rows: Vec<Review>) -> Self {
        Self::new(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn review(score: u8) -> Review {
        Review {
            author: "Budi".to_string(),
            score,
            content: String::new(),
            at: Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap(),
        }
    }

    #[test]
    fn distribution_only_lists_present_scores() {
        let table = ReviewTable::from(vec![review(5), review(1), review(5), review(3)]);
        let dist: Vec<_> = table.score_distribution().into_iter().collect();
        assert_eq!(dist, vec![(1, 1), (3, 1), (5, 2)]);
    }

    #[test]
    fn request_count_bounds() {
        assert!(FetchRequest::new("com.maxstream", Language::Indonesian, 1, SortOrder::Newest)
            .validate()
            .is_ok());
        assert!(FetchRequest::new("com.maxstream", Language::Indonesian, 5000, SortOrder::Newest)
            .validate()
            .is_ok());
        assert!(FetchRequest::new("com.maxstream", Language::Indonesian, 0, SortOrder::Newest)
            .validate()
            .is_err());
        assert!(FetchRequest::new("com.maxstream", Language::Indonesian, 5001, SortOrder::Newest)
            .validate()
            .is_err());
        assert!(FetchRequest::new(" ", Language::English, 10, SortOrder::Newest)
            .validate()
            .is_err());
    }

    #[test]
    fn sort_codes_match_store_rpc() {
        assert_eq!(SortOrder::MostRelevant.code(), 1);
        assert_eq!(SortOrder::Newest.code(), 2);
        assert_eq!(FetchRequest::new("x", Language::English, 5, SortOrder::Newest).country, "id");
    }
}
