//! The `careerfit take` command.
//!
//! Walks a respondent through the catalog on the terminal. Options are shown
//! and entered 1-based; the session stores zero-based indices.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;

use careerfit_core::error::AssessmentError;
use careerfit_core::model::{AnswerKind, QuestionSpec};
use careerfit_core::report::AssessmentReport;
use careerfit_core::session::AssessmentSession;

use crate::commands::render_report;
use crate::config::load_config_from;

/// How an interactive run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    Quit,
}

/// Value as the respondent types it.
fn display_value(question: &QuestionSpec, value: i32) -> i32 {
    match question.kind {
        AnswerKind::Likert => value,
        AnswerKind::MultipleChoice => value + 1,
    }
}

/// Value as the session stores it, or `None` if it cannot be represented.
fn raw_value(question: &QuestionSpec, typed: i32) -> Option<i32> {
    match question.kind {
        AnswerKind::Likert => Some(typed),
        AnswerKind::MultipleChoice => typed.checked_sub(1),
    }
}

fn show_range<W: Write>(question: &QuestionSpec, out: &mut W) -> Result<()> {
    let (min, max) = question.value_range();
    writeln!(
        out,
        "Please enter a number from {} to {}.",
        display_value(question, min),
        display_value(question, max)
    )?;
    Ok(())
}

fn show_question<W: Write>(
    session: &AssessmentSession,
    question: &QuestionSpec,
    out: &mut W,
) -> Result<()> {
    let section = session.current_section().map(|s| s.name).unwrap_or_default();
    let position = session.position().unwrap_or(0) + 1;

    writeln!(
        out,
        "\n[{section}] Question {position}/{} ({:.0}% answered)",
        session.catalog().len(),
        session.progress_fraction() * 100.0
    )?;
    writeln!(out, "{}", question.prompt)?;
    match question.kind {
        AnswerKind::Likert => {
            writeln!(out, "  1 = strongly disagree, 3 = neutral, 5 = strongly agree")?;
        }
        AnswerKind::MultipleChoice => {
            for (i, option) in question.options.iter().enumerate() {
                writeln!(out, "  {}) {}", i + 1, option)?;
            }
        }
    }
    Ok(())
}

/// Run the questionnaire until it completes, the respondent quits, or input ends.
pub fn run_interactive<R: BufRead, W: Write>(
    session: &mut AssessmentSession,
    input: &mut R,
    out: &mut W,
) -> Result<Outcome> {
    let mut line = String::new();

    while let Some(question) = session.current_question().cloned() {
        show_question(session, &question, out)?;

        let current = session
            .current_answer()
            .map(|a| display_value(&question, a.value));
        match current {
            Some(v) => write!(out, "Answer [{v}] (b = back, q = quit): ")?,
            None => write!(out, "Answer (b = back, q = quit): ")?,
        }
        out.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            return Ok(Outcome::Quit);
        }

        match line.trim() {
            "q" | "quit" => return Ok(Outcome::Quit),
            "b" | "back" => {
                if session.at_start() {
                    writeln!(out, "Already at the first question.")?;
                } else {
                    session.retreat();
                }
            }
            "" => {
                if current.is_some() {
                    session.advance();
                } else {
                    writeln!(out, "Please enter an answer.")?;
                }
            }
            typed => match typed.parse::<i32>() {
                Ok(n) => {
                    let Some(value) = raw_value(&question, n) else {
                        show_range(&question, out)?;
                        continue;
                    };
                    match session.record_answer(&question.id, value) {
                        Ok(_) => session.advance(),
                        Err(AssessmentError::OutOfRangeValue { .. }) => {
                            show_range(&question, out)?
                        }
                        Err(e) => return Err(e.into()),
                    }
                }
                Err(_) => writeln!(out, "Not a number: {typed}")?,
            },
        }
    }

    Ok(Outcome::Completed)
}

pub fn execute(
    catalog_path: Option<PathBuf>,
    format: Option<String>,
    output: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let catalog = config.load_catalog(catalog_path.as_deref())?;
    let format = config.format(format);
    let output_dir = output.unwrap_or_else(|| config.output_dir.clone());

    let mut session = AssessmentSession::new(catalog).with_policy(config.value_policy);
    println!(
        "{} ({} questions)",
        session.catalog().name(),
        session.catalog().len()
    );

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let outcome = run_interactive(&mut session, &mut stdin.lock(), &mut stdout.lock())?;

    match outcome {
        Outcome::Quit => {
            let progress = session.progress();
            println!(
                "Assessment abandoned after {} of {} answers.",
                progress.answered, progress.total
            );
        }
        Outcome::Completed => {
            let report = AssessmentReport::from_session(&session);
            println!("\n{}", render_report(&report, &format)?);

            let path = output_dir.join(report.file_name());
            report.save_json(&path)?;
            println!("Report saved to {}", path.display());
        }
    }

    Ok(())
}
