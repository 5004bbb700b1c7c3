//! The `careerfit init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    write_if_absent("careerfit.toml", SAMPLE_CONFIG)?;
    write_if_absent("answers.example.toml", SAMPLE_ANSWERS)?;

    println!("\nNext steps:");
    println!("  1. Run: careerfit take");
    println!("  2. Or score a prepared file: careerfit score --answers answers.example.toml");

    Ok(())
}

fn write_if_absent(path: &str, content: &str) -> Result<()> {
    if Path::new(path).exists() {
        println!("{path} already exists, skipping.");
    } else {
        std::fs::write(path, content)?;
        println!("Created {path}");
    }
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# careerfit configuration

# Question catalog; the built-in catalog is used when unset.
# catalog = "catalogs/environmental-impact-assessor.toml"

# What to do with out-of-range answers: "reject" or "clamp".
value_policy = "reject"

output_dir = "./careerfit-results"
default_format = "text"
"#;

const SAMPLE_ANSWERS: &str = r#"# Raw answer values keyed by question ID.
# Likert questions take 1-5; multiple-choice questions take a zero-based option index.

[answers]
psych_1 = 4
psych_2 = 5
psych_3 = 3
tech_1 = 0
tech_2 = 1
tech_3 = 2
wiscar_1 = 0
wiscar_2 = 1
wiscar_7 = 1
"#;
