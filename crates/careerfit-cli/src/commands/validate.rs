//! The `careerfit validate` command.

use std::path::PathBuf;

use anyhow::Result;

use careerfit_core::catalog::QuestionCatalog;
use careerfit_core::model::Category;
use careerfit_core::parser;

pub fn execute(catalog_path: Option<PathBuf>) -> Result<()> {
    let catalog = match &catalog_path {
        Some(path) => parser::parse_catalog(path)?,
        None => QuestionCatalog::builtin()?,
    };

    println!("Catalog: {} ({} questions)", catalog.name(), catalog.len());
    for category in Category::ALL {
        println!(
            "  {}: {}",
            category.section_name(),
            catalog.questions_by_category(category).len()
        );
    }

    let warnings = parser::validate_catalog(&catalog);
    for w in &warnings {
        let prefix = w
            .question_id
            .as_ref()
            .map(|id| format!("  [{id}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("Catalog valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
