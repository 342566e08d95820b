use std::fmt;

use crate::models::{ArticleId, Choice, SummaryResult};
use crate::state::{SelectionForm, UiState};

pub const LOADING_ARTICLES: &str = "Loading articles...";
pub const NO_ARTICLES: &str = "No articles are waiting for review. Nothing to submit.";
pub const GENERATING_SUMMARIES: &str = "Generating summaries, this usually takes 10-20 seconds...";
pub const NO_SUMMARIES: &str = "No summaries available for selected articles.";
pub const SUMMARY_PLACEHOLDER: &str = "No summary available";
pub const MISSING_SUMMARIES_NOTE: &str =
    "Note: some summaries may be missing due to upstream content or generation issues.";

/// One in/out pair for a single article
#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceControl {
    /// Groups the two options so articles never share a selection
    pub key: String,
    pub article_id: ArticleId,
    pub label: String,
    pub selected: Option<Choice>,
}

impl ChoiceControl {
    pub fn scoping_key(id: &ArticleId) -> String {
        format!("article-{}", id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormPanel {
    Blank,
    Loading,
    Empty(String),
    Error(String),
    Controls {
        controls: Vec<ChoiceControl>,
        /// Failure of the previous submission, if any
        banner: Option<String>,
        submitting: bool,
    },
}

impl FormPanel {
    pub fn controls(&self) -> &[ChoiceControl] {
        match self {
            FormPanel::Controls { controls, .. } => controls,
            _ => &[],
        }
    }

    /// Submission is only possible when controls exist
    pub fn submit_enabled(&self) -> bool {
        matches!(self, FormPanel::Controls { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SummariesPanel {
    Hidden,
    Busy,
    Text(String),
    Error(String),
}

impl SummariesPanel {
    pub fn is_visible(&self) -> bool {
        !matches!(self, SummariesPanel::Hidden)
    }
}

/// Rendered page
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    pub form: FormPanel,
    pub summaries: SummariesPanel,
}

pub fn render(state: &UiState) -> View {
    let (form, summaries) = match state {
        UiState::Idle => (FormPanel::Blank, SummariesPanel::Hidden),
        UiState::ArticlesLoading => (FormPanel::Loading, SummariesPanel::Hidden),
        UiState::ArticlesEmpty => (
            FormPanel::Empty(NO_ARTICLES.to_string()),
            SummariesPanel::Hidden,
        ),
        UiState::ArticlesError(reason) => (
            FormPanel::Error(format!("Could not load articles: {}", reason)),
            SummariesPanel::Hidden,
        ),
        UiState::ArticlesReady { form, submit_error } => (
            controls_panel(form, submit_error.clone(), false),
            SummariesPanel::Hidden,
        ),
        UiState::Submitting(form) => (controls_panel(form, None, true), SummariesPanel::Hidden),
        UiState::SummariesLoading(form) => {
            (controls_panel(form, None, false), SummariesPanel::Busy)
        }
        UiState::SummariesReady { form, results } => (
            controls_panel(form, None, false),
            SummariesPanel::Text(render_summaries(results)),
        ),
        UiState::SummariesError { form, reason } => (
            controls_panel(form, None, false),
            SummariesPanel::Error(format!("Could not fetch summaries: {}", reason)),
        ),
    };

    View { form, summaries }
}

fn controls_panel(form: &SelectionForm, banner: Option<String>, submitting: bool) -> FormPanel {
    let controls = form
        .articles()
        .iter()
        .map(|article| ChoiceControl {
            key: ChoiceControl::scoping_key(&article.id),
            article_id: article.id.clone(),
            label: article.title.clone(),
            selected: form.choice(&article.id),
        })
        .collect();

    FormPanel::Controls {
        controls,
        banner: banner.map(|reason| format!("Submission failed: {}", reason)),
        submitting,
    }
}

/// Plain, copyable summaries text
pub fn render_summaries(results: &[SummaryResult]) -> String {
    if results.is_empty() {
        return NO_SUMMARIES.to_string();
    }

    let mut missing = false;
    let blocks: Vec<String> = results
        .iter()
        .map(|result| {
            let summary = result.summary_text().unwrap_or_else(|| {
                missing = true;
                SUMMARY_PLACEHOLDER
            });
            let mut block = format!("Title: {}\nSummary: {}", result.title, summary);
            if let Some(link) = result.link.as_deref().filter(|l| !l.trim().is_empty()) {
                block.push_str(&format!("\nLink: {}", link.trim()));
            }
            block
        })
        .collect();

    let mut text = blocks.join("\n\n");
    if missing {
        text.push_str("\n\n");
        text.push_str(MISSING_SUMMARIES_NOTE);
    }
    text
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "== Articles ==")?;
        match &self.form {
            FormPanel::Blank => {}
            FormPanel::Loading => writeln!(f, "{}", LOADING_ARTICLES)?,
            FormPanel::Empty(message) => writeln!(f, "{}", message)?,
            FormPanel::Error(message) => writeln!(f, "✗ {}", message)?,
            FormPanel::Controls {
                controls,
                banner,
                submitting,
            } => {
                if let Some(banner) = banner {
                    writeln!(f, "✗ {}", banner)?;
                }
                for (i, control) in controls.iter().enumerate() {
                    let (mark_in, mark_out) = match control.selected {
                        Some(Choice::In) => ("x", " "),
                        Some(Choice::Out) => (" ", "x"),
                        None => (" ", " "),
                    };
                    writeln!(
                        f,
                        "{:>3}. [{}] in  [{}] out  {}",
                        i + 1,
                        mark_in,
                        mark_out,
                        control.label
                    )?;
                }
                if *submitting {
                    writeln!(f, "Submitting selections...")?;
                }
            }
        }

        match &self.summaries {
            SummariesPanel::Hidden => {}
            SummariesPanel::Busy => {
                writeln!(f, "\n== Summaries ==")?;
                writeln!(f, "{}", GENERATING_SUMMARIES)?;
            }
            SummariesPanel::Text(text) => {
                writeln!(f, "\n== Summaries ==")?;
                writeln!(f, "{}", text)?;
            }
            SummariesPanel::Error(message) => {
                writeln!(f, "\n== Summaries ==")?;
                writeln!(f, "✗ {}", message)?;
            }
        }

        Ok(())
    }
}
