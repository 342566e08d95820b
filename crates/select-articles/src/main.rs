mod busy;
mod prompt;

use anyhow::{Context, Result};
use clap::Parser;
use shared::{
    render_summaries, save_summaries, ArticleId, Choice, Config, HttpSelectionApi, Notifier,
    SelectionApi, SelectionClient, UiState,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use busy::BusyIndicator;
use prompt::{Edit, MenuAction, TerminalNotifier};

type Spinner = BusyIndicator<std::io::Stderr>;

#[derive(Parser)]
#[command(name = "select-articles")]
#[command(about = "Mark collected articles in or out and fetch summaries for the accepted ones")]
struct Args {
    /// Base URL of the selection service (overrides SELECTION_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// Decide an article without prompting, e.g. --choice 12=in (repeatable).
    /// Submits once and exits.
    #[arg(short, long = "choice", value_parser = parse_choice_arg)]
    choices: Vec<(ArticleId, Choice)>,

    /// Write the summaries to this file once they are ready
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write the summaries to the default summaries directory
    #[arg(long, conflicts_with = "output")]
    save: bool,
}

impl Args {
    fn export_requested(&self) -> bool {
        self.save || self.output.is_some()
    }
}

fn parse_choice_arg(raw: &str) -> Result<(ArticleId, Choice), String> {
    let (id, choice) = raw
        .split_once('=')
        .ok_or_else(|| format!("Expected <id>=<in|out>, got {:?}", raw))?;
    let id = id.trim();
    if id.is_empty() {
        return Err(format!("Missing article id in {:?}", raw));
    }
    Ok((ArticleId::new(id), choice.parse()?))
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let config = Config::from_env(args.api_url.as_deref())?;
    let interactive = args.choices.is_empty();

    let api = HttpSelectionApi::new(&config)?;
    let spinner = BusyIndicator::new(std::io::stderr());
    let mut client =
        SelectionClient::new(api, TerminalNotifier::new(interactive, spinner.clone()));
    let _spinner_task = spinner.spawn(client.subscribe());

    println!("📚 Fetching articles from {}...", config.api_base_url);
    client.load_articles().await;
    println!("\n{}", client.view());

    match client.state() {
        UiState::ArticlesError(_) => {
            println!("Reload by running select-articles again.");
            return Ok(ExitCode::FAILURE);
        }
        UiState::ArticlesEmpty => return Ok(ExitCode::SUCCESS),
        _ => {}
    }

    if interactive {
        run_interactive(&mut client, &spinner, &args).await
    } else {
        run_batch(&mut client, &spinner, &args).await
    }
}

/// Apply the --choice flags, submit once, report.
async fn run_batch<A: SelectionApi, N: Notifier>(
    client: &mut SelectionClient<A, N>,
    spinner: &Spinner,
    args: &Args,
) -> Result<ExitCode> {
    for (id, choice) in &args.choices {
        client
            .choose(id, *choice)
            .with_context(|| format!("Cannot mark article {} as {}", id, choice))?;
    }

    client.submit().await?;
    spinner.clear();
    println!("\n{}", client.view());

    if !matches!(client.state(), UiState::SummariesReady { .. }) {
        return Ok(ExitCode::FAILURE);
    }

    if args.export_requested() {
        export(client.state(), args.output.as_deref())?;
    }

    Ok(ExitCode::SUCCESS)
}

async fn run_interactive<A: SelectionApi, N: Notifier>(
    client: &mut SelectionClient<A, N>,
    spinner: &Spinner,
    args: &Args,
) -> Result<ExitCode> {
    let mut action = MenuAction::Edit;

    loop {
        match action {
            MenuAction::Edit => {
                let edits = prompt::prompt_choices(client.view().form.controls())?;
                for edit in edits {
                    match edit {
                        Edit::Set(id, choice) => client.choose(&id, choice)?,
                        Edit::Clear(id) => client.clear_choice(&id)?,
                    }
                }
                println!("\n{}", client.view());
            }
            MenuAction::Submit => {
                client.submit().await?;
                spinner.clear();
                println!("\n{}", client.view());
                if args.export_requested() {
                    export(client.state(), args.output.as_deref())?;
                }
            }
            MenuAction::Save => {
                export(client.state(), args.output.as_deref())?;
            }
            MenuAction::Quit => return Ok(ExitCode::SUCCESS),
        }

        action = prompt::prompt_menu(client.state())?;
    }
}

fn export(state: &UiState, output: Option<&Path>) -> Result<()> {
    if let UiState::SummariesReady { results, .. } = state {
        let filepath = save_summaries(&render_summaries(results), output)
            .context("Failed to save summaries")?;
        println!("✅ Summaries saved to: {}", filepath.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_choice_arg() {
        assert_eq!(
            parse_choice_arg("12=in"),
            Ok((ArticleId::new("12"), Choice::In))
        );
        assert_eq!(
            parse_choice_arg(" a-3 =OUT"),
            Ok((ArticleId::new("a-3"), Choice::Out))
        );
        assert!(parse_choice_arg("12").is_err());
        assert!(parse_choice_arg("=in").is_err());
        assert!(parse_choice_arg("12=maybe").is_err());
    }

    #[test]
    fn test_args_parse_repeated_choices() {
        let args = Args::try_parse_from([
            "select-articles",
            "--choice",
            "1=in",
            "-c",
            "2=out",
            "--save",
        ])
        .unwrap();
        assert_eq!(args.choices.len(), 2);
        assert!(args.export_requested());
    }

    #[test]
    fn test_output_conflicts_with_save() {
        let parsed = Args::try_parse_from(["select-articles", "--save", "-o", "out.txt"]);
        assert!(parsed.is_err());
    }
}
