use async_trait::async_trait;
use tokio::sync::watch;

use crate::api::SelectionApi;
use crate::error::FormError;
use crate::models::{ArticleId, Choice};
use crate::render::{render, View};
use crate::state::{SelectionForm, UiState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// Message the user has to acknowledge before the client carries on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Front-end hook for blocking notifications. `notify` should return only once
/// the user has seen the notice.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notice: &Notice);
}

/// Drives the load → select → submit → summaries flow and owns the page state
pub struct SelectionClient<A, N> {
    api: A,
    notifier: N,
    state: UiState,
    publisher: watch::Sender<UiState>,
}

impl<A: SelectionApi, N: Notifier> SelectionClient<A, N> {
    pub fn new(api: A, notifier: N) -> Self {
        let (publisher, _) = watch::channel(UiState::Idle);
        Self {
            api,
            notifier,
            state: UiState::Idle,
            publisher,
        }
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    pub fn view(&self) -> View {
        render(&self.state)
    }

    /// Receiver that sees every state the client moves through
    pub fn subscribe(&self) -> watch::Receiver<UiState> {
        self.publisher.subscribe()
    }

    /// Initial listing request. Only runs once, from `Idle`; a failed load is
    /// final for this client.
    pub async fn load_articles(&mut self) {
        if !matches!(self.state, UiState::Idle) {
            tracing::warn!(state = self.state.name(), "articles already requested, ignoring");
            return;
        }

        self.transition(UiState::ArticlesLoading);

        let next = match self.api.list_articles().await {
            Ok(articles) if articles.is_empty() => UiState::ArticlesEmpty,
            Ok(articles) => {
                tracing::info!(count = articles.len(), "articles loaded");
                UiState::ArticlesReady {
                    form: SelectionForm::new(articles),
                    submit_error: None,
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to load articles");
                UiState::ArticlesError(e.to_string())
            }
        };
        self.transition(next);
    }

    pub fn choose(&mut self, id: &ArticleId, choice: Choice) -> Result<(), FormError> {
        let form = self
            .state
            .editable_form_mut()
            .ok_or(FormError::Unavailable)?;
        form.choose(id, choice)?;
        self.publish();
        Ok(())
    }

    pub fn clear_choice(&mut self, id: &ArticleId) -> Result<(), FormError> {
        let form = self
            .state
            .editable_form_mut()
            .ok_or(FormError::Unavailable)?;
        form.clear(id);
        self.publish();
        Ok(())
    }

    /// Persist the checked choices, then fetch summaries if that succeeded.
    ///
    /// Network failures end up in the state and in a notice; the only error
    /// returned is a submit attempted while no form is shown.
    pub async fn submit(&mut self) -> Result<(), FormError> {
        if !self.state.can_submit() {
            return Err(FormError::Unavailable);
        }
        let form = self.state.form().cloned().ok_or(FormError::Unavailable)?;

        let decisions = form.decisions();
        tracing::info!(
            answered = decisions.len(),
            listed = form.articles().len(),
            "submitting selections"
        );
        self.transition(UiState::Submitting(form.clone()));

        match self.api.submit_decisions(&decisions).await {
            Ok(()) => {
                self.notifier
                    .notify(&Notice::info("Selections saved. Generating summaries..."))
                    .await;
                self.transition(UiState::SummariesLoading(form.clone()));
                self.fetch_summaries(form).await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to submit selections");
                let reason = e.to_string();
                self.transition(UiState::ArticlesReady {
                    form,
                    submit_error: Some(reason.clone()),
                });
                self.notifier
                    .notify(&Notice::error(format!(
                        "Failed to submit selections: {}",
                        reason
                    )))
                    .await;
            }
        }

        Ok(())
    }

    async fn fetch_summaries(&mut self, form: SelectionForm) {
        match self.api.fetch_summaries().await {
            Ok(results) => {
                let missing = results
                    .iter()
                    .filter(|r| r.summary_text().is_none())
                    .count();
                tracing::info!(count = results.len(), missing, "summaries received");
                self.transition(UiState::SummariesReady { form, results });
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to fetch summaries");
                let reason = e.to_string();
                self.transition(UiState::SummariesError {
                    form,
                    reason: reason.clone(),
                });
                self.notifier
                    .notify(&Notice::error(format!(
                        "Failed to fetch summaries: {}",
                        reason
                    )))
                    .await;
            }
        }
    }

    fn transition(&mut self, next: UiState) {
        debug_assert!(
            self.state.allows(&next),
            "illegal transition {} -> {}",
            self.state.name(),
            next.name()
        );
        tracing::info!(from = self.state.name(), to = next.name(), "state transition");
        self.state = next;
        self.publish();
    }

    fn publish(&self) {
        self.publisher.send_replace(self.state.clone());
    }
}
