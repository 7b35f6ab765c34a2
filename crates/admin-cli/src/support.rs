use std::{future::Future, sync::Arc, time::Duration};

use anyhow::{Context, anyhow};
use dialoguer::Confirm;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use services::services::{form_state::Navigator, query_cache::QueryResult};

/// Runs `work` behind a spinner on stderr.
pub async fn with_spinner<T, F>(message: &str, work: F) -> T
where
    F: Future<Output = T>,
{
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    let result = work.await;
    spinner.finish_and_clear();
    result
}

/// Unwraps a query snapshot, turning the normalized error into a CLI error.
pub fn query_data<T>(result: QueryResult<T>) -> anyhow::Result<Arc<T>> {
    result
        .into_result()?
        .ok_or_else(|| anyhow!("query was not run"))
}

pub fn confirm(prompt: &str, assume_yes: bool) -> anyhow::Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .context("confirmation prompt failed")
}

#[derive(Clone, Copy)]
pub struct Output {
    pub json: bool,
}

impl Output {
    /// Prints `value` as JSON in `--json` mode, otherwise through `human`.
    pub fn emit<T: Serialize + ?Sized>(&self, value: &T, human: impl FnOnce(&T)) -> anyhow::Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            human(value);
        }
        Ok(())
    }
}

pub fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

pub fn or_dash(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}

/// Stands in for the dashboard router: tells the user where the record lives.
pub struct PrintNavigator;

impl Navigator for PrintNavigator {
    fn navigate(&self, path: &str) {
        eprintln!("-> {path}");
    }
}
