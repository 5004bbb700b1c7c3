pub mod compare;
pub mod init;
pub mod questions;
pub mod score;
pub mod take;
pub mod validate;

use anyhow::Result;
use comfy_table::Table;

use careerfit_core::model::ScoreBand;
use careerfit_core::report::{score_rows, AssessmentReport};

/// Render a report in one of the supported output formats.
pub fn render_report(report: &AssessmentReport, format: &str) -> Result<String> {
    match format {
        "json" => Ok(serde_json::to_string_pretty(report)?),
        "markdown" | "md" => Ok(report.to_markdown()),
        "text" => Ok(render_text(report)),
        other => anyhow::bail!("unknown format '{other}' (expected text, json, or markdown)"),
    }
}

fn render_text(report: &AssessmentReport) -> String {
    let r = &report.result;
    let mut out = String::new();

    out.push_str(&format!(
        "Recommendation: {} ({:.0}%)\n",
        r.recommendation.to_string().to_uppercase(),
        r.overall_score
    ));
    if !r.is_complete() {
        out.push_str(&format!(
            "Partial result: {} of {} questions answered\n",
            r.answered, r.total
        ));
    }
    out.push_str(&format!("\n{}\n\n", r.feedback));

    let mut table = Table::new();
    table.set_header(vec!["Score", "Value", "Band"]);
    for (name, value) in score_rows(r) {
        table.add_row(vec![
            name.to_string(),
            format!("{value:.0}%"),
            ScoreBand::of(value).to_string(),
        ]);
    }
    out.push_str(&format!("{table}\n"));

    out.push_str("\nLearning path:\n");
    for (i, step) in r.learning_path.iter().enumerate() {
        out.push_str(&format!("  {}. {}\n", i + 1, step));
    }

    if !r.skill_gaps.is_empty() {
        out.push_str("\nSkill gaps:\n");
        for gap in &r.skill_gaps {
            out.push_str(&format!("  - {gap}\n"));
        }
    }

    out
}
