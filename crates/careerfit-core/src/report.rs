//! Assessment reports with JSON persistence and retake comparison.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{Recommendation, ScoreBand};
use crate::results::AssessmentResult;
use crate::session::AssessmentSession;

/// A completed (or abandoned) assessment, ready to save.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentReport {
    /// Identifier of the session that produced the result.
    pub id: Uuid,
    /// Catalog the session was answered against.
    pub catalog_id: String,
    pub started_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    /// Wall-clock time between session start and report creation.
    pub duration_secs: u64,
    pub result: AssessmentResult,
}

impl AssessmentReport {
    /// Snapshot a session's current result.
    pub fn from_session(session: &AssessmentSession) -> Self {
        let created_at = Utc::now();
        let duration_secs = (created_at - session.started_at())
            .num_seconds()
            .max(0) as u64;

        Self {
            id: session.id(),
            catalog_id: session.catalog().id().to_string(),
            started_at: session.started_at(),
            created_at,
            duration_secs,
            result: session.compute_result(),
        }
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: AssessmentReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// File name the CLI saves this report under.
    pub fn file_name(&self) -> String {
        format!(
            "{}-{}.json",
            self.catalog_id,
            self.created_at.format("%Y%m%dT%H%M%SZ")
        )
    }

    /// Format the report as markdown.
    pub fn to_markdown(&self) -> String {
        let r = &self.result;
        let mut md = String::new();

        md.push_str(&format!(
            "## Recommendation: **{}** ({:.0}%)\n\n",
            r.recommendation, r.overall_score
        ));
        md.push_str(&format!("{}\n\n", r.feedback));
        if !r.is_complete() {
            md.push_str(&format!(
                "_Partial result: {} of {} questions answered._\n\n",
                r.answered, r.total
            ));
        }

        md.push_str("| Score | Value | Band |\n");
        md.push_str("|-------|-------|------|\n");
        for (name, value) in score_rows(r) {
            md.push_str(&format!(
                "| {} | {:.0}% | {} |\n",
                name,
                value,
                ScoreBand::of(value)
            ));
        }
        md.push('\n');

        md.push_str("### Learning path\n\n");
        for (i, step) in r.learning_path.iter().enumerate() {
            md.push_str(&format!("{}. {}\n", i + 1, step));
        }

        if !r.skill_gaps.is_empty() {
            md.push_str("\n### Skill gaps\n\n");
            for gap in &r.skill_gaps {
                md.push_str(&format!("- {gap}\n"));
            }
        }

        md
    }

    /// Compare this report against an earlier one.
    pub fn compare(&self, baseline: &AssessmentReport) -> ScoreComparison {
        let deltas = score_rows(&baseline.result)
            .into_iter()
            .zip(score_rows(&self.result))
            .map(|((name, before), (_, after))| ScoreDelta {
                name: name.to_string(),
                baseline: before,
                current: after,
                delta: after - before,
            })
            .collect();

        ScoreComparison {
            baseline_recommendation: baseline.result.recommendation,
            current_recommendation: self.result.recommendation,
            deltas,
        }
    }
}

/// Named scores in display order.
pub fn score_rows(result: &AssessmentResult) -> Vec<(&'static str, f64)> {
    let mut rows = vec![
        ("overall", result.overall_score),
        ("psychometric", result.psychometric_score),
        ("technical", result.technical_score),
    ];
    for (dim, score) in result.wiscar_scores.iter() {
        rows.push((dim.tag(), score));
    }
    rows.push(("wiscar_average", result.wiscar_average));
    rows
}

/// Result of comparing two reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreComparison {
    pub baseline_recommendation: Recommendation,
    pub current_recommendation: Recommendation,
    /// One entry per score, in display order.
    pub deltas: Vec<ScoreDelta>,
}

/// Change in one score between two reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreDelta {
    pub name: String,
    pub baseline: f64,
    pub current: f64,
    pub delta: f64,
}

impl ScoreComparison {
    pub fn recommendation_changed(&self) -> bool {
        self.baseline_recommendation != self.current_recommendation
    }

    /// Scores that rose by more than `threshold` points.
    pub fn improvements(&self, threshold: f64) -> impl Iterator<Item = &ScoreDelta> {
        self.deltas.iter().filter(move |d| d.delta > threshold)
    }

    /// Scores that fell by more than `threshold` points.
    pub fn declines(&self, threshold: f64) -> impl Iterator<Item = &ScoreDelta> {
        self.deltas.iter().filter(move |d| d.delta < -threshold)
    }

    /// Format the comparison as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!(
            "**Recommendation:** {} -> {}\n\n",
            self.baseline_recommendation, self.current_recommendation
        ));
        md.push_str("| Score | Baseline | Current | Delta |\n");
        md.push_str("|-------|----------|---------|-------|\n");
        for d in &self.deltas {
            md.push_str(&format!(
                "| {} | {:.1}% | {:.1}% | {:+.1} |\n",
                d.name, d.baseline, d.current, d.delta
            ));
        }

        md
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::QuestionCatalog;
    use std::sync::Arc;

    fn session_with(answers: &[(&str, i32)]) -> AssessmentSession {
        let mut s = AssessmentSession::new(Arc::new(QuestionCatalog::builtin().unwrap()));
        for (id, value) in answers {
            s.record_answer(id, *value).unwrap();
        }
        s
    }

    #[test]
    fn report_from_session() {
        let s = session_with(&[("psych_1", 5)]);
        let report = AssessmentReport::from_session(&s);
        assert_eq!(report.id, s.id());
        assert_eq!(report.catalog_id, "environmental-impact-assessor");
        assert_eq!(report.result.answered, 1);
        assert!(report.created_at >= report.started_at);
        assert!(report.file_name().starts_with("environmental-impact-assessor-"));
        assert!(report.file_name().ends_with(".json"));
    }

    #[test]
    fn json_roundtrip() {
        let report = AssessmentReport::from_session(&session_with(&[("tech_2", 1)]));
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("report.json");

        report.save_json(&path).unwrap();
        let loaded = AssessmentReport::load_json(&path).unwrap();

        assert_eq!(loaded.id, report.id);
        assert_eq!(loaded.result, report.result);
    }

    #[test]
    fn load_missing_report() {
        let err = AssessmentReport::load_json(Path::new("/no/such/report.json")).unwrap_err();
        assert!(err.to_string().contains("failed to read report"));
    }

    #[test]
    fn markdown_output() {
        let report = AssessmentReport::from_session(&session_with(&[]));
        let md = report.to_markdown();
        assert!(md.contains("Recommendation: **no**"));
        assert!(md.contains("Partial result: 0 of 42"));
        assert!(md.contains("| technical | 0% | weak |"));
        assert!(md.contains("1. Explore environmental education or outreach roles"));
        assert!(md.contains("### Skill gaps"));
    }

    #[test]
    fn compare_reports() {
        let baseline = AssessmentReport::from_session(&session_with(&[("psych_1", 1)]));
        let current = AssessmentReport::from_session(&session_with(&[
            ("psych_1", 5),
            ("tech_1", 0),
        ]));

        let cmp = current.compare(&baseline);
        assert_eq!(cmp.deltas.len(), 10);
        let psych = cmp.deltas.iter().find(|d| d.name == "psychometric").unwrap();
        assert_eq!(psych.baseline, 20.0);
        assert_eq!(psych.current, 100.0);
        assert_eq!(psych.delta, 80.0);

        let improved: Vec<_> = cmp.improvements(1.0).map(|d| d.name.as_str()).collect();
        assert!(improved.contains(&"technical"));
        assert_eq!(cmp.declines(1.0).count(), 0);
        assert!(cmp.recommendation_changed());
        assert!(cmp.to_markdown().contains("| psychometric | 20.0% | 100.0% | +80.0 |"));
    }
}
