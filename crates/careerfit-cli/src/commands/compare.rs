//! The `careerfit compare` command.

use std::path::PathBuf;

use anyhow::Result;

use careerfit_core::report::AssessmentReport;

pub fn execute(
    baseline_path: PathBuf,
    current_path: PathBuf,
    threshold: f64,
    format: String,
) -> Result<()> {
    anyhow::ensure!(threshold >= 0.0, "threshold must not be negative");

    let baseline = AssessmentReport::load_json(&baseline_path)?;
    let current = AssessmentReport::load_json(&current_path)?;

    if baseline.catalog_id != current.catalog_id {
        tracing::warn!(
            baseline = %baseline.catalog_id,
            current = %current.catalog_id,
            "comparing reports from different catalogs"
        );
    }

    let comparison = current.compare(&baseline);

    match format.as_str() {
        "markdown" | "md" => {
            println!("{}", comparison.to_markdown());
        }
        "json" => {
            println!("{}", serde_json::to_string_pretty(&comparison)?);
        }
        _ => {
            // text format
            println!(
                "Recommendation: {} -> {}{}",
                comparison.baseline_recommendation,
                comparison.current_recommendation,
                if comparison.recommendation_changed() {
                    " (changed)"
                } else {
                    ""
                }
            );

            let improvements: Vec<_> = comparison.improvements(threshold).collect();
            if !improvements.is_empty() {
                println!("\nImprovements:");
                for d in improvements {
                    println!(
                        "  {} {:.1}% -> {:.1}% ({:+.1})",
                        d.name, d.baseline, d.current, d.delta
                    );
                }
            }

            let declines: Vec<_> = comparison.declines(threshold).collect();
            if !declines.is_empty() {
                println!("\nDeclines:");
                for d in declines {
                    println!(
                        "  {} {:.1}% -> {:.1}% ({:+.1})",
                        d.name, d.baseline, d.current, d.delta
                    );
                }
            }

            let unchanged = comparison
                .deltas
                .iter()
                .filter(|d| d.delta.abs() <= threshold)
                .count();
            println!("\n{unchanged} score(s) unchanged");
        }
    }

    Ok(())
}
