use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};

/// Get the default directory for saved summaries
pub fn get_default_summaries_dir() -> Result<PathBuf> {
    let data_dir = dirs::data_local_dir()
        .context("Could not determine local data directory")?
        .join("article-selection")
        .join("summaries");

    fs::create_dir_all(&data_dir).context("Failed to create summaries directory")?;

    Ok(data_dir)
}

pub fn summaries_filename(now: DateTime<Local>) -> String {
    format!("summaries-{}.txt", now.format("%Y-%m-%d-%H%M"))
}

/// Write rendered summaries text to `path`, or to a timestamped file in the
/// default directory when no path is given.
pub fn save_summaries(text: &str, path: Option<&Path>) -> Result<PathBuf> {
    let filepath = match path {
        Some(path) => path.to_path_buf(),
        None => get_default_summaries_dir()?.join(summaries_filename(Local::now())),
    };

    if let Some(parent) = filepath.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let mut contents = text.to_string();
    if !contents.ends_with('\n') {
        contents.push('\n');
    }

    fs::write(&filepath, contents)
        .with_context(|| format!("Failed to write summaries file: {}", filepath.display()))?;

    Ok(filepath)
}
