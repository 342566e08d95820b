// Public modules
pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod io;
pub mod models;
pub mod render;
pub mod state;

// Re-export commonly used types
pub use api::{HttpSelectionApi, SelectionApi};
pub use client::{Notice, NoticeLevel, Notifier, SelectionClient};
pub use config::Config;
pub use error::{ApiError, FormError};
pub use io::{get_default_summaries_dir, save_summaries};
pub use models::{Article, ArticleId, Choice, Decisions, SummaryResult};
pub use render::{render, render_summaries, ChoiceControl, FormPanel, SummariesPanel, View};
pub use state::{SelectionForm, UiState};
