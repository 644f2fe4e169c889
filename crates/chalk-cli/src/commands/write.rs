use std::io::{IsTerminal as _, Read as _};

use anyhow::Context;
use chalk_core::enums::SubmissionState;
use chalk_journal::{SubmitError, SubmitOutcome};
use serde::Serialize;

use crate::cli::root_commands::WriteArgs;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::context::AppContext;
use crate::context::Orchestrator;
use crate::output::output;
use crate::progress::Progress;

#[derive(Serialize)]
struct WriteResponse {
    id: String,
    created_at: String,
    text: String,
    sentiment: Option<String>,
    feedback: Option<String>,
    analysis_error: Option<String>,
}

impl From<SubmitOutcome> for WriteResponse {
    fn from(outcome: SubmitOutcome) -> Self {
        let entry = outcome.entry;
        Self {
            id: entry.id,
            created_at: entry.created_at.to_rfc3339(),
            text: entry.text,
            sentiment: entry.sentiment,
            feedback: entry.feedback,
            analysis_error: outcome.analysis_error,
        }
    }
}

/// Handle `chalk write`.
pub async fn handle(args: &WriteArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let text = entry_text(args)?;
    let orchestrator = ctx.orchestrator()?;

    let progress = Progress::spinner(&SubmissionState::Analyzing.status_text());
    match submit_following_state(&orchestrator, &text, &progress).await {
        Ok(outcome) => {
            progress.finish_clear();
            if let Some(error) = &outcome.analysis_error
                && !flags.quiet
            {
                eprintln!("Sentiment: Error analyzing. The entry was saved without analysis ({error}).");
            }
            print_outcome(outcome, flags.format)
        }
        Err(error) => {
            let status = match &error {
                SubmitError::Validation(_) | SubmitError::Busy => None,
                SubmitError::Auth(_) | SubmitError::Persist(_) => Some(orchestrator.state().status_text()),
            };
            progress.finish_err("not saved");

            // Keep what the user wrote so it is not lost.
            if matches!(error, SubmitError::Auth(_) | SubmitError::Persist(_)) && !flags.quiet {
                eprintln!("Your entry was not saved:\n\n{text}\n");
            }

            let error = anyhow::Error::new(error);
            Err(match status.filter(|s| !s.is_empty()) {
                Some(status) => error.context(status),
                None => error,
            })
        }
    }
}

/// Run one submission, mirroring every state change on the spinner.
async fn submit_following_state(
    orchestrator: &Orchestrator<'_>,
    text: &str,
    progress: &Progress,
) -> Result<SubmitOutcome, SubmitError> {
    let mut states = orchestrator.states();
    let submit = orchestrator.submit(text);
    tokio::pin!(submit);

    loop {
        tokio::select! {
            result = &mut submit => return result,
            Ok(()) = states.changed() => progress.follow(&states.borrow_and_update()),
        }
    }
}

fn entry_text(args: &WriteArgs) -> anyhow::Result<String> {
    if !args.text.is_empty() {
        return Ok(args.text.join(" "));
    }

    let mut stdin = std::io::stdin();
    if stdin.is_terminal() {
        eprintln!("Write your entry, then press Ctrl-D.");
    }
    let mut text = String::new();
    stdin
        .read_to_string(&mut text)
        .context("failed to read entry from stdin")?;
    Ok(text)
}

fn print_outcome(outcome: SubmitOutcome, format: OutputFormat) -> anyhow::Result<()> {
    let response = WriteResponse::from(outcome);
    if format != OutputFormat::Text {
        return output(&response, format);
    }

    println!(
        "Sentiment: {}",
        response.sentiment.as_deref().unwrap_or_default()
    );
    if let Some(feedback) = &response.feedback {
        println!("Feedback: {feedback}");
    }
    println!("Saved {}", response.id);
    Ok(())
}
