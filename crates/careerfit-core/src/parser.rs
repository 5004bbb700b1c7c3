//! TOML catalog parser.
//!
//! Loads question catalogs from TOML files and checks them for soft issues
//! that do not prevent scoring.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::catalog::{GapCondition, GapMetric, QuestionCatalog, ScoringRule, SkillGapRule, Tier};
use crate::error::CatalogError;
use crate::model::{AnswerKind, Category, QuestionSpec, Recommendation, WiscarDimension};

/// Intermediate TOML structure for parsing catalog files.
#[derive(Debug, Deserialize)]
struct TomlCatalogFile {
    catalog: TomlCatalogHeader,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
    #[serde(default)]
    scoring: TomlScoring,
    #[serde(default)]
    tiers: Vec<TomlTier>,
}

#[derive(Debug, Deserialize)]
struct TomlCatalogHeader {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct TomlQuestion {
    id: String,
    category: String,
    #[serde(default)]
    subcategory: String,
    prompt: String,
    kind: String,
    #[serde(default)]
    options: Vec<String>,
    #[serde(default = "default_weight")]
    weight: f64,
}

fn default_weight() -> f64 {
    1.0
}

#[derive(Debug, Default, Deserialize)]
struct TomlScoring {
    #[serde(default)]
    answer_keys: BTreeMap<String, usize>,
    #[serde(default)]
    option_scores: BTreeMap<String, Vec<f64>>,
}

#[derive(Debug, Deserialize)]
struct TomlTier {
    recommendation: String,
    feedback: String,
    #[serde(default)]
    learning_path: Vec<String>,
    #[serde(default)]
    skill_gaps: Vec<TomlSkillGap>,
}

#[derive(Debug, Deserialize)]
struct TomlSkillGap {
    #[serde(default)]
    metric: Option<GapMetric>,
    #[serde(default)]
    below: Option<f64>,
    label: String,
}

/// Parse a single TOML file into a `QuestionCatalog`.
pub fn parse_catalog(path: &Path) -> Result<QuestionCatalog> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read catalog file: {}", path.display()))?;

    parse_catalog_str(&content, path)
}

/// Parse a TOML string into a `QuestionCatalog`.
pub fn parse_catalog_str(content: &str, source_path: &Path) -> Result<QuestionCatalog> {
    let parsed: TomlCatalogFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let questions = parsed
        .questions
        .into_iter()
        .map(|q| {
            let category: Category = q
                .category
                .parse()
                .map_err(|e: String| anyhow::anyhow!("question {}: {}", q.id, e))?;
            let kind: AnswerKind = q
                .kind
                .parse()
                .map_err(|e: String| anyhow::anyhow!("question {}: {}", q.id, e))?;

            Ok(QuestionSpec {
                id: q.id,
                category,
                subcategory: q.subcategory,
                prompt: q.prompt,
                kind,
                options: q.options,
                weight: q.weight,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let mut rules = HashMap::new();
    for (id, correct) in parsed.scoring.answer_keys {
        rules.insert(id, ScoringRule::AnswerKey { correct });
    }
    for (id, scores) in parsed.scoring.option_scores {
        if rules.contains_key(&id) {
            return Err(CatalogError::ConflictingRules(id))
                .with_context(|| format!("invalid catalog: {}", source_path.display()));
        }
        rules.insert(id, ScoringRule::OptionScores { scores });
    }

    let tiers = parsed
        .tiers
        .into_iter()
        .map(|t| {
            let recommendation: Recommendation = t
                .recommendation
                .parse()
                .map_err(|e: String| anyhow::anyhow!("{}", e))?;

            let skill_gaps = t
                .skill_gaps
                .into_iter()
                .map(|g| {
                    let condition = match (g.metric, g.below) {
                        (Some(metric), Some(below)) => Some(GapCondition { metric, below }),
                        (None, None) => None,
                        _ => return Err(CatalogError::IncompleteGapRule(g.label)),
                    };
                    Ok(SkillGapRule {
                        condition,
                        label: g.label,
                    })
                })
                .collect::<Result<Vec<_>, CatalogError>>()?;

            Ok(Tier {
                recommendation,
                feedback: t.feedback,
                learning_path: t.learning_path,
                skill_gaps,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let catalog = QuestionCatalog::new(
        parsed.catalog.id,
        parsed.catalog.name,
        parsed.catalog.description,
        questions,
        rules,
        tiers,
    )
    .with_context(|| format!("invalid catalog: {}", source_path.display()))?;

    tracing::debug!(
        catalog = catalog.id(),
        questions = catalog.len(),
        "loaded catalog"
    );

    Ok(catalog)
}

/// A warning from catalog validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question ID (if applicable).
    pub question_id: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Check a catalog for issues that do not stop it from loading.
pub fn validate_catalog(catalog: &QuestionCatalog) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    // Multiple-choice questions without a table entry score by raw index
    for q in catalog.all_questions() {
        if q.kind == AnswerKind::MultipleChoice && catalog.rule_for(&q.id).is_none() {
            warnings.push(ValidationWarning {
                question_id: Some(q.id.clone()),
                message: "no scoring rule; the raw option index is used as the score".into(),
            });
        }
    }

    // Rules attached outside the category they are designed for
    for q in catalog.all_questions() {
        let expected = match catalog.rule_for(&q.id) {
            Some(ScoringRule::AnswerKey { .. }) => Category::Technical,
            Some(ScoringRule::OptionScores { .. }) => Category::Wiscar,
            None => continue,
        };
        if q.category != expected {
            warnings.push(ValidationWarning {
                question_id: Some(q.id.clone()),
                message: format!(
                    "scoring rule is meant for {expected} questions but question is {}",
                    q.category
                ),
            });
        }
    }

    // WISCAR questions that no dimension will select
    for q in catalog.questions_by_category(Category::Wiscar) {
        if WiscarDimension::from_tag(&q.subcategory).is_none() {
            warnings.push(ValidationWarning {
                question_id: Some(q.id.clone()),
                message: format!(
                    "subcategory '{}' is not a WISCAR dimension and will not be scored",
                    q.subcategory
                ),
            });
        }
    }

    // Dimension scores divide by a fixed expected count
    for dim in WiscarDimension::ALL {
        let found = catalog
            .questions_by_category(Category::Wiscar)
            .iter()
            .filter(|q| q.subcategory == dim.tag())
            .count();
        if found != dim.expected_count() {
            warnings.push(ValidationWarning {
                question_id: None,
                message: format!(
                    "WISCAR dimension '{dim}' has {found} question(s), scoring expects {}",
                    dim.expected_count()
                ),
            });
        }
    }

    for w in &warnings {
        tracing::warn!(
            question = w.question_id.as_deref().unwrap_or("-"),
            "{}",
            w.message
        );
    }

    warnings
}
