//! The `careerfit score` command.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use careerfit_core::report::AssessmentReport;
use careerfit_core::session::AssessmentSession;

use crate::commands::render_report;
use crate::config::load_config_from;

/// An answers file: raw values keyed by question ID.
#[derive(Debug, Deserialize)]
struct AnswersFile {
    answers: BTreeMap<String, i32>,
}

fn read_answers(path: &Path) -> Result<BTreeMap<String, i32>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read answers file: {}", path.display()))?;
    let parsed: AnswersFile = toml::from_str(&content)
        .with_context(|| format!("failed to parse answers file: {}", path.display()))?;
    Ok(parsed.answers)
}

/// Record every answer, stopping at the first one the session rejects.
fn record_all(session: &mut AssessmentSession, answers: &BTreeMap<String, i32>) -> Result<()> {
    for (id, &value) in answers {
        session
            .record_answer(id, value)
            .with_context(|| format!("invalid answer for {id}"))?;
    }
    Ok(())
}

pub fn execute(
    answers_path: PathBuf,
    catalog_path: Option<PathBuf>,
    format: Option<String>,
    output: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let catalog = config.load_catalog(catalog_path.as_deref())?;
    let format = config.format(format);

    let answers = read_answers(&answers_path)?;
    let mut session = AssessmentSession::new(catalog).with_policy(config.value_policy);
    record_all(&mut session, &answers)?;

    let report = AssessmentReport::from_session(&session);
    println!("{}", render_report(&report, &format)?);

    if let Some(path) = output {
        report.save_json(&path)?;
        eprintln!("Report saved to {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use careerfit_core::catalog::QuestionCatalog;
    use careerfit_core::session::ValuePolicy;

    fn session(policy: ValuePolicy) -> AssessmentSession {
        AssessmentSession::new(Arc::new(QuestionCatalog::builtin().unwrap())).with_policy(policy)
    }

    #[test]
    fn parse_answers_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("answers.toml");
        std::fs::write(&path, "[answers]\npsych_1 = 5\ntech_2 = 1\n").unwrap();

        let answers = read_answers(&path).unwrap();
        assert_eq!(answers.len(), 2);
        assert_eq!(answers["tech_2"], 1);
    }

    #[test]
    fn unknown_question_in_answers_fails() {
        let mut s = session(ValuePolicy::Reject);
        let answers = BTreeMap::from([("psych_404".to_string(), 3)]);
        let err = record_all(&mut s, &answers).unwrap_err();
        assert!(format!("{err:#}").contains("unknown question: psych_404"));
    }

    #[test]
    fn out_of_range_follows_policy() {
        let answers = BTreeMap::from([("psych_1".to_string(), 7)]);

        let mut strict = session(ValuePolicy::Reject);
        assert!(record_all(&mut strict, &answers).is_err());

        let mut lenient = session(ValuePolicy::Clamp);
        record_all(&mut lenient, &answers).unwrap();
        assert_eq!(lenient.answer_for("psych_1").unwrap().value, 5);
    }
}
