use anyhow::Result;
use colored::Colorize;
use std::fmt::Write;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{error, info};

use crate::apps::{find_app, AppChoice};
use crate::chart::{render_common_problems, render_score_distribution};
use crate::fetcher::{fetch_reviews, ReviewSource};
use crate::frequency::{extract_top_words, FrequencyTable};
use crate::review::{FetchRequest, Language, ReviewTable, SortOrder};
use crate::stopwords::StopwordSet;
use crate::utils::{format_number, truncate_text};
use crate::{export, prompt, Args};

const CONTENT_COLUMN_WIDTH: usize = 60;
const AUTHOR_COLUMN_WIDTH: usize = 20;

/// What the user asked for in this session.
#[derive(Debug, Clone)]
pub struct Selection {
    pub app_name: String,
    pub request: FetchRequest,
}

/// Score window and limit used for the common-problems chart.
#[derive(Debug, Clone, Copy)]
pub struct ProblemFilter {
    pub min_score: u8,
    pub max_score: u8,
    pub top_n: usize,
}

/// Everything one fetch produced. `error` is set when the fetch failed;
/// the table and word list are then empty.
#[derive(Debug, Default)]
pub struct SessionOutcome {
    pub table: ReviewTable,
    pub common_problems: FrequencyTable,
    pub error: Option<String>,
}

impl SessionOutcome {
    pub fn has_reviews(&self) -> bool {
        self.error.is_none() && !self.table.is_empty()
    }
}

impl Selection {
    pub fn from_choice(app: &AppChoice, lang: Language, count: u32, sort: SortOrder) -> Self {
        Self {
            app_name: app.name.to_string(),
            request: FetchRequest::new(app.id, lang, count, sort),
        }
    }

    /// Builds the selection from flags, prompting for whatever `--app` leaves open.
    pub fn resolve(args: &Args) -> Result<(Self, bool)> {
        match &args.app {
            Some(query) => {
                let selection = match find_app(query) {
                    Some(app) => Self::from_choice(app, args.lang, args.count, args.sort),
                    None => anyhow::bail!(
                        "Unknown app '{}'. Choose one of: {}",
                        query,
                        crate::apps::app_names().join(", ")
                    ),
                };
                Ok((selection, false))
            }
            None => {
                let app = prompt::select_app()?;
                let count = prompt::input_review_count(args.count)?;
                let sort = prompt::select_sort(args.sort)?;
                Ok((Self::from_choice(app, args.lang, count, sort), true))
            }
        }
    }
}

pub fn analyze_reviews<S: ReviewSource + ?Sized>(
    source: &S,
    selection: &Selection,
    stopwords: &StopwordSet,
    filter: ProblemFilter,
) -> SessionOutcome {
    let start_time = Instant::now();
    info!(action = "start", component = "session", app = %selection.app_name, "Starting review analysis");

    let reviews = match fetch_reviews(source, &selection.request) {
        Ok(reviews) => reviews,
        Err(e) => {
            error!(action = "fetch", component = "session", error = %format!("{:#}", e), "Review fetch failed");
            return SessionOutcome {
                error: Some(format!("{:#}", e)),
                ..SessionOutcome::default()
            };
        }
    };

    let common_problems = extract_top_words(
        &reviews,
        filter.min_score,
        filter.max_score,
        filter.top_n,
        stopwords,
    );

    info!(
        action = "complete",
        component = "session",
        review_count = reviews.len(),
        problem_words = common_problems.len(),
        duration_ms = start_time.elapsed().as_millis(),
        "Review analysis completed"
    );

    SessionOutcome {
        table: ReviewTable::from(reviews),
        common_problems,
        error: None,
    }
}

pub fn render_review_table(table: &ReviewTable) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<author$}  {:>5}  {:<content$}  {}",
        "userName",
        "score",
        "content",
        "at",
        author = AUTHOR_COLUMN_WIDTH,
        content = CONTENT_COLUMN_WIDTH
    );
    for review in table.rows() {
        let _ = writeln!(
            out,
            "{:<author$}  {:>5}  {:<content$}  {}",
            truncate_text(&review.author, AUTHOR_COLUMN_WIDTH),
            review.score,
            truncate_text(&review.content, CONTENT_COLUMN_WIDTH),
            review.at.format(export::TIMESTAMP_FORMAT),
            author = AUTHOR_COLUMN_WIDTH,
            content = CONTENT_COLUMN_WIDTH
        );
    }
    out
}

/// Renders the outcome the way the report is shown on screen.
pub fn render_outcome(selection: &Selection, filter: ProblemFilter, outcome: &SessionOutcome) -> String {
    let mut out = String::new();

    if let Some(reason) = &outcome.error {
        let _ = writeln!(out, "{}", format!("Error: {}", reason).red());
        return out;
    }

    if outcome.table.is_empty() {
        let _ = writeln!(
            out,
            "{}",
            format!("Tidak ada ulasan untuk {}.", selection.app_name).yellow()
        );
        return out;
    }

    let _ = writeln!(
        out,
        "{}",
        format!("Terunduh {} Ulasan!", format_number(outcome.table.len())).green()
    );
    let _ = writeln!(out);
    out.push_str(&render_review_table(&outcome.table));
    let _ = writeln!(out);
    out.push_str(&render_score_distribution(&outcome.table));
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{}",
        format!(
            "Masalah Umum Pengguna (Rating {}-{})",
            filter.min_score, filter.max_score
        )
        .bold()
    );
    out.push_str(&render_common_problems(&outcome.common_problems));
    out
}

/// Runs one session end to end: fetch, report, optional CSV download.
pub fn run_session<S: ReviewSource + ?Sized>(
    args: &Args,
    source: &S,
    stopwords: &StopwordSet,
) -> Result<Option<PathBuf>> {
    let (selection, interactive) = Selection::resolve(args)?;
    let filter = ProblemFilter {
        min_score: args.min_score,
        max_score: args.max_score,
        top_n: args.top_words,
    };

    println!(
        "{}",
        format!(
            "Mengunduh Ulasan for {} in {}...",
            selection.app_name, selection.request.lang
        )
        .cyan()
    );

    let outcome = analyze_reviews(source, &selection, stopwords, filter);
    print!("{}", render_outcome(&selection, filter, &outcome));

    if !outcome.has_reviews() {
        return Ok(None);
    }

    let file_name = export::export_filename(&selection.app_name);
    let wants_download = args.export || (interactive && prompt::confirm_download(&file_name)?);
    if !wants_download {
        return Ok(None);
    }

    let path = export::export_reviews(&outcome.table, &selection.app_name, &args.output_dir)?;
    println!("{}", format!("Saved {}", path.display()).green());
    Ok(Some(path))
}
