//! The `careerfit questions` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::Table;

use careerfit_core::model::Category;

use crate::config::load_config_from;

pub fn execute(
    catalog_path: Option<PathBuf>,
    category: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let catalog = config.load_catalog(catalog_path.as_deref())?;

    let filter: Option<Category> = category
        .map(|c| c.parse().map_err(|e: String| anyhow::anyhow!("{}", e)))
        .transpose()?;

    let mut table = Table::new();
    table.set_header(vec!["#", "ID", "Category", "Subcategory", "Kind", "Weight", "Prompt"]);

    let mut shown = 0usize;
    for (i, q) in catalog.all_questions().iter().enumerate() {
        if filter.is_some_and(|c| c != q.category) {
            continue;
        }
        table.add_row(vec![
            (i + 1).to_string(),
            q.id.clone(),
            q.category.to_string(),
            q.subcategory.clone(),
            q.kind.to_string(),
            format!("{:.1}", q.weight),
            q.prompt.clone(),
        ]);
        shown += 1;
    }

    println!("{table}");
    println!("{shown} of {} questions", catalog.len());

    Ok(())
}
