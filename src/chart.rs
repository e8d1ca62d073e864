use colored::{Color, Colorize};
use std::fmt::Write;

use crate::frequency::FrequencyTable;
use crate::review::ReviewTable;

pub const SCORE_CHART_TITLE: &str = "Distribusi Rating Ulasan";
pub const PROBLEM_CHART_TITLE: &str = "Kata Ulasan Rating Rendah";
pub const NO_ISSUES_MESSAGE: &str = "No significant issues found in low-score reviews.";
pub const NO_REVIEWS_MESSAGE: &str = "No reviews to chart.";

const MAX_BAR_WIDTH: usize = 40;
const BAR_CELL: &str = "█";

// One color per star rating
const SCORE_PALETTE: [Color; 5] = [
    Color::TrueColor { r: 102, g: 194, b: 165 },
    Color::TrueColor { r: 252, g: 141, b: 98 },
    Color::TrueColor { r: 141, g: 160, b: 203 },
    Color::TrueColor { r: 231, g: 138, b: 195 },
    Color::TrueColor { r: 166, g: 216, b: 84 },
];

fn bar_width(count: u32, max: u32) -> usize {
    if max == 0 || count == 0 {
        return 0;
    }
    let width = (count as usize * MAX_BAR_WIDTH).div_ceil(max as usize);
    width.clamp(1, MAX_BAR_WIDTH)
}

/// Darkest red for the top word, fading down the ranking.
fn red_shade(rank: usize, total: usize) -> Color {
    let step = if total > 1 { 150 * rank / (total - 1) } else { 0 };
    let fade = step.min(150) as u8;
    Color::TrueColor {
        r: 200u8.saturating_add(fade / 3),
        g: 20 + fade,
        b: 20 + fade,
    }
}

/// Horizontal bar per rating present in `table`, lowest rating first.
pub fn render_score_distribution(table: &ReviewTable) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", SCORE_CHART_TITLE.bold());

    let distribution = table.score_distribution();
    if distribution.is_empty() {
        let _ = writeln!(out, "{}", NO_REVIEWS_MESSAGE.yellow());
        return out;
    }

    let max = distribution.values().copied().max().unwrap_or(0);
    for (score, count) in distribution {
        let color = SCORE_PALETTE[(score.clamp(1, 5) - 1) as usize];
        let bar = BAR_CELL.repeat(bar_width(count, max));
        let _ = writeln!(
            out,
            "{} {:<width$} {}",
            format!("{}★", score),
            bar.color(color),
            count,
            width = MAX_BAR_WIDTH
        );
    }
    out
}

/// Horizontal bar per frequent word, in ranking order.
pub fn render_common_problems(words: &FrequencyTable) -> String {
    let mut out = String::new();

    if words.is_empty() {
        let _ = writeln!(out, "{}", NO_ISSUES_MESSAGE.yellow());
        return out;
    }

    let _ = writeln!(out, "{}", PROBLEM_CHART_TITLE.bold());
    let label_width = words.iter().map(|(w, _)| w.len()).max().unwrap_or(0);
    let max = words.first().map(|(_, c)| *c).unwrap_or(0);
    for (rank, (word, count)) in words.iter().enumerate() {
        let bar = BAR_CELL.repeat(bar_width(*count, max));
        let _ = writeln!(
            out,
            "{:>label_width$} {:<width$} {}",
            word,
            bar.color(red_shade(rank, words.len())),
            count,
            label_width = label_width,
            width = MAX_BAR_WIDTH
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::review::Review;
    use chrono::{TimeZone, Utc};

    fn plain() {
        colored::control::set_override(false);
    }

    fn review(score: u8) -> Review {
        Review {
            author: "a".to_string(),
            score,
            content: String::new(),
            at: Utc.with_ymd_and_hms(2024, 2, 2, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn bars_scale_to_largest_count() {
        assert_eq!(bar_width(10, 10), MAX_BAR_WIDTH);
        assert_eq!(bar_width(5, 10), MAX_BAR_WIDTH / 2);
        assert_eq!(bar_width(1, 1000), 1);
        assert_eq!(bar_width(0, 10), 0);
    }

    #[test]
    fn histogram_lists_scores_in_order() {
        plain();
        let table = ReviewTable::from(vec![review(5), review(1), review(5)]);
        let rendered = render_score_distribution(&table);
        let lines: Vec<_> = rendered.lines().collect();
        assert_eq!(lines[0], SCORE_CHART_TITLE);
        assert!(lines[1].starts_with("1★"));
        assert!(lines[1].trim_end().ends_with(" 1"));
        assert!(lines[2].starts_with("5★"));
        assert!(lines[2].trim_end().ends_with(" 2"));
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn empty_inputs_render_placeholder_states() {
        plain();
        assert!(render_score_distribution(&ReviewTable::default()).contains(NO_REVIEWS_MESSAGE));
        assert_eq!(render_common_problems(&Vec::new()).trim_end(), NO_ISSUES_MESSAGE);
    }

    #[test]
    fn problem_chart_keeps_ranking() {
        plain();
        let words = vec![("error".to_string(), 3), ("login".to_string(), 1)];
        let rendered = render_common_problems(&words);
        let lines: Vec<_> = rendered.lines().collect();
        assert_eq!(lines[0], PROBLEM_CHART_TITLE);
        assert!(lines[1].starts_with("error "));
        assert!(lines[2].trim_start().starts_with("login "));
        assert_eq!(lines[1].matches(BAR_CELL).count(), MAX_BAR_WIDTH);
    }
}
