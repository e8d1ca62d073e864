use anyhow::{Context, Result};
use dialoguer::{Confirm, Input, Select};

use crate::apps::{app_names, AppChoice, APP_CHOICES};
use crate::review::{SortOrder, MAX_REVIEW_COUNT, MIN_REVIEW_COUNT};

pub fn select_app() -> Result<&'static AppChoice> {
    let index = Select::new()
        .with_prompt("Pilih App")
        .items(&app_names())
        .default(0)
        .interact()
        .context("App selection cancelled")?;
    Ok(&APP_CHOICES[index])
}

pub fn input_review_count(default: u32) -> Result<u32> {
    Input::<u32>::new()
        .with_prompt("Jumlah Ulasan yang Akan Diambil")
        .default(default)
        .validate_with(|count: &u32| -> Result<(), String> {
            if (MIN_REVIEW_COUNT..=MAX_REVIEW_COUNT).contains(count) {
                Ok(())
            } else {
                Err(format!(
                    "Enter a number between {} and {}",
                    MIN_REVIEW_COUNT, MAX_REVIEW_COUNT
                ))
            }
        })
        .interact_text()
        .context("Review count input cancelled")
}

pub fn select_sort(default: SortOrder) -> Result<SortOrder> {
    let options = [SortOrder::MostRelevant, SortOrder::Newest];
    let labels: Vec<String> = options.iter().map(ToString::to_string).collect();
    let default_index = options.iter().position(|o| *o == default).unwrap_or(1);
    let index = Select::new()
        .with_prompt("Sort Reviews By")
        .items(&labels)
        .default(default_index)
        .interact()
        .context("Sort selection cancelled")?;
    Ok(options[index])
}

pub fn confirm_download(file_name: &str) -> Result<bool> {
    Confirm::new()
        .with_prompt(format!("Download CSV ({})?", file_name))
        .default(true)
        .interact()
        .context("Download confirmation cancelled")
}
