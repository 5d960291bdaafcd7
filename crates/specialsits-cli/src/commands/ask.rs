//! Ask command implementation

use anyhow::{bail, Result};
use console::style;
use dialoguer::Input;
use specialsits_core::config::Settings;
use specialsits_core::models::Dataset;

use crate::cli::AskArgs;
use crate::output::OutputWriter;
use crate::session;

const QUIT_PHRASES: [&str; 4] = ["exit", "quit", "bye", "stop"];

pub async fn execute(args: AskArgs, output: &OutputWriter) -> Result<()> {
    let settings = Settings::from_env();
    let dataset: Dataset = args.dataset.parse()?;

    if args.question.is_none() && !args.interactive {
        bail!("Provide a question, or pass --interactive to start a chat session.");
    }

    let mut pipeline =
        session::prepare_pipeline(&settings, dataset, args.filter.as_deref(), false).await?;
    let mode = session::retrieval_mode(&settings, args.whole_document, args.top_k);

    if let Some(question) = &args.question {
        let answer = pipeline.ask(question, mode).await?;
        if output.is_json() {
            output.result(serde_json::json!({ "question": question, "answer": answer }))?;
        } else {
            println!("{}", answer);
        }
    }

    if args.interactive {
        output.info("Ask about the loaded filings. Type exit, quit, bye, or stop to leave.");
        loop {
            let question: String = Input::new().with_prompt("you").interact_text()?;
            if is_quit_phrase(&question) {
                output.info("Goodbye.");
                break;
            }
            let answer = pipeline.ask(&question, mode).await?;
            println!("{} {}", style("assistant:").bold().cyan(), answer);
        }
    }

    Ok(())
}

fn is_quit_phrase(input: &str) -> bool {
    QUIT_PHRASES.contains(&input.trim().to_lowercase().as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quit_phrases_are_case_and_whitespace_insensitive() {
        assert!(is_quit_phrase("exit"));
        assert!(is_quit_phrase("  Quit "));
        assert!(is_quit_phrase("BYE"));
        assert!(is_quit_phrase("stop"));
        assert!(!is_quit_phrase("stop the offer"));
        assert!(!is_quit_phrase("what is the price?"));
    }
}
