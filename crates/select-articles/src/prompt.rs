use anyhow::Result;
use async_trait::async_trait;
use shared::{ArticleId, Choice, ChoiceControl, Notice, NoticeLevel, Notifier, UiState};
use std::io::{self as stdio, Stderr, Write};

use crate::busy::BusyIndicator;

/// Read one trimmed line. `None` means stdin was closed.
pub fn read_line(prompt: &str) -> Result<Option<String>> {
    print!("{}", prompt);
    stdio::stdout().flush()?;

    let mut input = String::new();
    if stdio::stdin().read_line(&mut input)? == 0 {
        return Ok(None);
    }
    Ok(Some(input.trim().to_string()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    Set(ArticleId, Choice),
    Clear(ArticleId),
}

/// Interpret an answer to the per-article prompt. Empty keeps the current choice.
pub fn parse_edit(id: &ArticleId, answer: &str) -> Option<Result<Edit, String>> {
    match answer.trim().to_lowercase().as_str() {
        "" => None,
        "i" | "in" => Some(Ok(Edit::Set(id.clone(), Choice::In))),
        "o" | "out" => Some(Ok(Edit::Set(id.clone(), Choice::Out))),
        "-" => Some(Ok(Edit::Clear(id.clone()))),
        other => Some(Err(format!(
            "Unrecognized answer {:?}. Use i, o, - or Enter.",
            other
        ))),
    }
}

/// Ask for each article in turn. Stops early (keeping what was answered) if
/// stdin closes.
pub fn prompt_choices(controls: &[ChoiceControl]) -> Result<Vec<Edit>> {
    println!("\nMark each article: i = in, o = out, - = clear, Enter = keep current");

    let mut edits = Vec::new();
    for (i, control) in controls.iter().enumerate() {
        let current = control
            .selected
            .map(|choice| choice.as_str())
            .unwrap_or("undecided");

        loop {
            let prompt = format!("{:>3}. {} [{}]: ", i + 1, control.label, current);
            let Some(answer) = read_line(&prompt)? else {
                return Ok(edits);
            };
            match parse_edit(&control.article_id, &answer) {
                None => break,
                Some(Ok(edit)) => {
                    edits.push(edit);
                    break;
                }
                Some(Err(message)) => println!("  {}", message),
            }
        }
    }

    Ok(edits)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Submit,
    Edit,
    Save,
    Quit,
}

pub fn parse_menu_action(answer: &str, can_save: bool) -> Option<MenuAction> {
    match answer.trim().to_lowercase().as_str() {
        "s" | "submit" => Some(MenuAction::Submit),
        "e" | "edit" => Some(MenuAction::Edit),
        "w" | "write" if can_save => Some(MenuAction::Save),
        "q" | "quit" => Some(MenuAction::Quit),
        _ => None,
    }
}

pub fn prompt_menu(state: &UiState) -> Result<MenuAction> {
    let can_save = matches!(state, UiState::SummariesReady { .. });

    println!();
    println!("  s) Submit selections");
    println!("  e) Edit choices");
    if can_save {
        println!("  w) Write summaries to a file");
    }
    println!("  q) Quit");

    loop {
        let Some(answer) = read_line("\nEnter your choice: ")? else {
            return Ok(MenuAction::Quit);
        };
        match parse_menu_action(&answer, can_save) {
            Some(action) => return Ok(action),
            None => println!("Invalid selection."),
        }
    }
}

/// Prints notices; in interactive mode waits for Enter before returning.
pub struct TerminalNotifier {
    interactive: bool,
    indicator: BusyIndicator<Stderr>,
}

impl TerminalNotifier {
    pub fn new(interactive: bool, indicator: BusyIndicator<Stderr>) -> Self {
        Self {
            interactive,
            indicator,
        }
    }
}

#[async_trait]
impl Notifier for TerminalNotifier {
    async fn notify(&self, notice: &Notice) {
        let icon = match notice.level {
            NoticeLevel::Info => "✓",
            NoticeLevel::Error => "⚠",
        };

        self.indicator.clear();

        if !self.interactive {
            eprintln!("{} {}", icon, notice.message);
            return;
        }

        println!("\n{} {}", icon, notice.message);
        if let Err(e) = read_line("Press Enter to continue...") {
            tracing::warn!(error = %e, "could not wait for acknowledgement");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_edit() {
        let id = ArticleId::new("7");
        assert_eq!(parse_edit(&id, ""), None);
        assert_eq!(parse_edit(&id, "I"), Some(Ok(Edit::Set(id.clone(), Choice::In))));
        assert_eq!(parse_edit(&id, " out "), Some(Ok(Edit::Set(id.clone(), Choice::Out))));
        assert_eq!(parse_edit(&id, "-"), Some(Ok(Edit::Clear(id.clone()))));
        assert!(matches!(parse_edit(&id, "yes"), Some(Err(_))));
    }

    #[test]
    fn test_parse_menu_action() {
        assert_eq!(parse_menu_action("s", false), Some(MenuAction::Submit));
        assert_eq!(parse_menu_action("Quit", false), Some(MenuAction::Quit));
        assert_eq!(parse_menu_action("w", false), None);
        assert_eq!(parse_menu_action("w", true), Some(MenuAction::Save));
        assert_eq!(parse_menu_action("x", true), None);
    }
}
