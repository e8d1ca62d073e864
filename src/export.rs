use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

use crate::review::{Review, ReviewTable};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CsvRow<'a> {
    user_name: &'a str,
    score: u8,
    content: &'a str,
    at: String,
}

impl<'a> From<&'a Review> for CsvRow<'a> {
    fn from(review: &'a Review) -> Self {
        Self {
            user_name: &review.author,
            score: review.score,
            content: &review.content,
            at: review.at.format(TIMESTAMP_FORMAT).to_string(),
        }
    }
}

pub fn export_filename(app_name: &str) -> String {
    format!("{}_reviews.csv", app_name)
}

/// Writes `table` as UTF-8 CSV with a `userName,score,content,at` header.
pub fn write_csv<W: Write>(table: &ReviewTable, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    if table.is_empty() {
        csv_writer.write_record(["userName", "score", "content", "at"])?;
    }
    for review in table.rows() {
        csv_writer.serialize(CsvRow::from(review))?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn to_csv_bytes(table: &ReviewTable) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    write_csv(table, &mut buffer)?;
    Ok(buffer)
}

pub fn export_reviews(table: &ReviewTable, app_name: &str, output_dir: &Path) -> Result<PathBuf> {
    let start_time = Instant::now();
    let path = output_dir.join(export_filename(app_name));

    let file = File::create(&path).with_context(|| format!("Failed to create {:?}", path))?;
    write_csv(table, file).with_context(|| format!("Failed to write reviews to {:?}", path))?;

    info!(
        action = "complete",
        component = "csv_export",
        file_path = ?path,
        review_count = table.len(),
        duration_ms = start_time.elapsed().as_millis(),
        "Reviews exported"
    );
    Ok(path)
}
