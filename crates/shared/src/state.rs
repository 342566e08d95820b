use std::collections::BTreeMap;

use crate::error::FormError;
use crate::models::{Article, ArticleId, Choice, Decisions, SummaryResult};

/// The listed articles together with the currently checked controls
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionForm {
    articles: Vec<Article>,
    choices: BTreeMap<ArticleId, Choice>,
}

impl SelectionForm {
    /// Build the form, pre-checking articles the service already has a decision for
    pub fn new(articles: Vec<Article>) -> Self {
        let choices = articles
            .iter()
            .filter_map(|article| article.keyword.map(|choice| (article.id.clone(), choice)))
            .collect();

        Self { articles, choices }
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn choice(&self, id: &ArticleId) -> Option<Choice> {
        self.choices.get(id).copied()
    }

    pub fn choose(&mut self, id: &ArticleId, choice: Choice) -> Result<(), FormError> {
        if !self.articles.iter().any(|article| &article.id == id) {
            return Err(FormError::UnknownArticle(id.clone()));
        }
        self.choices.insert(id.clone(), choice);
        Ok(())
    }

    pub fn clear(&mut self, id: &ArticleId) {
        self.choices.remove(id);
    }

    /// Mapping for every answered article; unanswered ones are left out.
    pub fn decisions(&self) -> Decisions {
        self.articles
            .iter()
            .filter_map(|article| {
                self.choices
                    .get(&article.id)
                    .map(|choice| (article.id.clone(), *choice))
            })
            .collect()
    }
}

/// Everything the page shows. Each transition replaces the whole value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum UiState {
    #[default]
    Idle,
    ArticlesLoading,
    ArticlesReady {
        form: SelectionForm,
        /// Reason the last submission failed, shown above the controls
        submit_error: Option<String>,
    },
    ArticlesEmpty,
    ArticlesError(String),
    Submitting(SelectionForm),
    SummariesLoading(SelectionForm),
    SummariesReady {
        form: SelectionForm,
        results: Vec<SummaryResult>,
    },
    SummariesError {
        form: SelectionForm,
        reason: String,
    },
}

impl UiState {
    pub fn name(&self) -> &'static str {
        match self {
            UiState::Idle => "idle",
            UiState::ArticlesLoading => "articles-loading",
            UiState::ArticlesReady { .. } => "articles-ready",
            UiState::ArticlesEmpty => "articles-empty",
            UiState::ArticlesError(_) => "articles-error",
            UiState::Submitting(_) => "submitting",
            UiState::SummariesLoading(_) => "summaries-loading",
            UiState::SummariesReady { .. } => "summaries-ready",
            UiState::SummariesError { .. } => "summaries-error",
        }
    }

    /// The form, in every state that shows controls
    pub fn form(&self) -> Option<&SelectionForm> {
        match self {
            UiState::ArticlesReady { form, .. }
            | UiState::Submitting(form)
            | UiState::SummariesLoading(form)
            | UiState::SummariesReady { form, .. }
            | UiState::SummariesError { form, .. } => Some(form),
            UiState::Idle
            | UiState::ArticlesLoading
            | UiState::ArticlesEmpty
            | UiState::ArticlesError(_) => None,
        }
    }

    /// The form, only in states where the user may change choices or submit
    pub fn editable_form_mut(&mut self) -> Option<&mut SelectionForm> {
        match self {
            UiState::ArticlesReady { form, .. }
            | UiState::SummariesReady { form, .. }
            | UiState::SummariesError { form, .. } => Some(form),
            _ => None,
        }
    }

    pub fn can_submit(&self) -> bool {
        matches!(
            self,
            UiState::ArticlesReady { .. }
                | UiState::SummariesReady { .. }
                | UiState::SummariesError { .. }
        )
    }

    pub fn is_busy(&self) -> bool {
        matches!(self, UiState::SummariesLoading(_))
    }

    /// Whether `next` is a documented successor of this state
    pub fn allows(&self, next: &UiState) -> bool {
        use UiState::*;
        match (self, next) {
            (Idle, ArticlesLoading) => true,
            (ArticlesLoading, ArticlesReady { .. } | ArticlesEmpty | ArticlesError(_)) => true,
            (ArticlesReady { .. } | SummariesReady { .. } | SummariesError { .. }, Submitting(_)) => {
                true
            }
            (Submitting(_), SummariesLoading(_) | ArticlesReady { .. }) => true,
            (SummariesLoading(_), SummariesReady { .. } | SummariesError { .. }) => true,
            _ => false,
        }
    }
}
