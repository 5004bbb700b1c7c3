//! CLI configuration.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use careerfit_core::catalog::QuestionCatalog;
use careerfit_core::parser::parse_catalog;
use careerfit_core::session::ValuePolicy;

/// Environment variable that overrides the configured catalog path.
pub const CATALOG_ENV: &str = "CAREERFIT_CATALOG";

/// Top-level careerfit configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CareerfitConfig {
    /// Catalog file to load. The built-in catalog is used when unset.
    #[serde(default)]
    pub catalog: Option<PathBuf>,
    /// Handling of out-of-range answer values.
    #[serde(default)]
    pub value_policy: ValuePolicy,
    /// Directory reports are saved to.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Output format when a command is not given `--format`.
    #[serde(default = "default_format")]
    pub default_format: String,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./careerfit-results")
}

fn default_format() -> String {
    "text".to_string()
}

impl Default for CareerfitConfig {
    fn default() -> Self {
        Self {
            catalog: None,
            value_policy: ValuePolicy::default(),
            output_dir: default_output_dir(),
            default_format: default_format(),
        }
    }
}

impl CareerfitConfig {
    /// Load the catalog named by `path`, then by the config, then the built-in one.
    pub fn load_catalog(&self, path: Option<&Path>) -> Result<Arc<QuestionCatalog>> {
        let catalog = match path.or(self.catalog.as_deref()) {
            Some(p) => parse_catalog(p)?,
            None => QuestionCatalog::builtin().context("failed to load built-in catalog")?,
        };
        tracing::debug!(catalog = catalog.id(), "using catalog");
        Ok(Arc::new(catalog))
    }

    /// The explicit format if given, else the configured default.
    pub fn format(&self, explicit: Option<String>) -> String {
        explicit.unwrap_or_else(|| self.default_format.clone())
    }
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order:
/// 1. `careerfit.toml` in the current directory
/// 2. `~/.config/careerfit/config.toml`
///
/// `CAREERFIT_CATALOG` overrides the catalog path from either file.
pub fn load_config_from(path: Option<&Path>) -> Result<CareerfitConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("careerfit.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<CareerfitConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => CareerfitConfig::default(),
    };

    if let Ok(catalog) = std::env::var(CATALOG_ENV) {
        if !catalog.is_empty() {
            config.catalog = Some(PathBuf::from(catalog));
        }
    }

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("careerfit"))
}
