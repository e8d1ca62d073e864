use anyhow::Result;
use time::macros::format_description;
use tracing_subscriber::fmt::time::LocalTime;
use tracing_subscriber::EnvFilter;

use crate::review::{MAX_REVIEW_COUNT, MIN_REVIEW_COUNT};

pub fn setup_logging(verbose: bool) {
    let default_level = if verbose { "info" } else { "error" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(LocalTime::new(format_description!(
            "[hour]:[minute]:[second].[subsecond digits:3]"
        )))
        .with_writer(std::io::stderr)
        .init();
}

/// Configures the global rayon pool; defaults to at most 8 threads.
pub fn setup_workers(workers: Option<usize>) -> Result<usize> {
    let workers = workers.unwrap_or_else(|| std::cmp::min(num_cpus::get(), 8));
    rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build_global()?;
    Ok(workers)
}

pub fn format_number(num: usize) -> String {
    let digits = num.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Shortens `text` to `max_chars` characters on one line, marking the cut with `…`.
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    let single_line = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if single_line.chars().count() <= max_chars {
        return single_line;
    }
    let mut cut: String = single_line.chars().take(max_chars.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

pub fn validate_args(args: &crate::args::Args) -> Result<()> {
    if !(MIN_REVIEW_COUNT..=MAX_REVIEW_COUNT).contains(&args.count) {
        anyhow::bail!(
            "--count must be between {} and {}",
            MIN_REVIEW_COUNT,
            MAX_REVIEW_COUNT
        );
    }

    for (flag, score) in [("--min-score", args.min_score), ("--max-score", args.max_score)] {
        if !(1..=5).contains(&score) {
            anyhow::bail!("{} must be between 1 and 5", flag);
        }
    }

    if let Some(workers) = args.workers {
        if workers == 0 {
            anyhow::bail!("--workers must be greater than 0");
        }
    }

    Ok(())
}
