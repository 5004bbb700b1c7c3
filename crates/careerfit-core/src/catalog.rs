//! The question catalog.
//!
//! An ordered, immutable list of questions together with the scoring tables
//! and recommendation tiers that belong to it. A catalog is validated once
//! when it is built and shared read-only between sessions afterwards.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::model::{AnswerKind, Category, QuestionSpec, Recommendation};

/// The catalog shipped with careerfit.
pub const BUILTIN_CATALOG: &str =
    include_str!("../../../catalogs/environmental-impact-assessor.toml");

/// Per-question rule for turning a chosen option into a score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScoringRule {
    /// One option is correct and scores high; all others score low.
    AnswerKey { correct: usize },
    /// Each option position maps to a fixed ordinal score.
    OptionScores { scores: Vec<f64> },
}

/// Sub-score a skill-gap rule is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapMetric {
    Psychometric,
    Technical,
    WiscarAverage,
}

/// Threshold that makes a skill gap apply.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GapCondition {
    pub metric: GapMetric,
    /// The gap applies when the metric is strictly below this value.
    pub below: f64,
}

/// A skill-gap label attached to a tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillGapRule {
    /// `None` means the gap always applies within its tier.
    pub condition: Option<GapCondition>,
    pub label: String,
}

/// Fixed content returned with one recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tier {
    pub recommendation: Recommendation,
    pub feedback: String,
    pub learning_path: Vec<String>,
    pub skill_gaps: Vec<SkillGapRule>,
}

/// A borrowed view of one catalog section.
#[derive(Debug, Clone)]
pub struct Section<'a> {
    pub category: Category,
    pub name: &'static str,
    pub questions: Vec<&'a QuestionSpec>,
}

/// The validated, read-only question catalog.
#[derive(Debug, Clone)]
pub struct QuestionCatalog {
    id: String,
    name: String,
    description: String,
    questions: Vec<QuestionSpec>,
    index: HashMap<String, usize>,
    // Catalog positions of each section's questions, in section order.
    sections: [Vec<usize>; 3],
    rules: HashMap<String, ScoringRule>,
    tiers: Vec<Tier>,
}

impl QuestionCatalog {
    /// Build a catalog, checking it for structural errors.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        questions: Vec<QuestionSpec>,
        rules: HashMap<String, ScoringRule>,
        tiers: Vec<Tier>,
    ) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(questions.len());
        let mut sections: [Vec<usize>; 3] = Default::default();

        for (pos, q) in questions.iter().enumerate() {
            if index.insert(q.id.clone(), pos).is_some() {
                return Err(CatalogError::DuplicateQuestion(q.id.clone()));
            }
            if !q.id.starts_with(q.category.id_prefix()) {
                return Err(CatalogError::PrefixMismatch {
                    id: q.id.clone(),
                    category: q.category,
                });
            }
            if !q.weight.is_finite() || q.weight <= 0.0 {
                return Err(CatalogError::InvalidWeight {
                    id: q.id.clone(),
                    weight: q.weight,
                });
            }
            match q.kind {
                AnswerKind::MultipleChoice if q.options.is_empty() => {
                    return Err(CatalogError::MissingOptions(q.id.clone()));
                }
                AnswerKind::Likert if !q.options.is_empty() => {
                    return Err(CatalogError::UnexpectedOptions(q.id.clone()));
                }
                _ => {}
            }
            sections[q.category.section_index()].push(pos);
        }

        for category in Category::ALL {
            if sections[category.section_index()].is_empty() {
                return Err(CatalogError::EmptySection(category));
            }
        }

        for (qid, rule) in &rules {
            let Some(&pos) = index.get(qid) else {
                return Err(CatalogError::UnknownRuleTarget(qid.clone()));
            };
            let q = &questions[pos];
            if q.kind != AnswerKind::MultipleChoice {
                return Err(CatalogError::RuleOnNonChoice(qid.clone()));
            }
            match rule {
                ScoringRule::AnswerKey { correct } if *correct >= q.options.len() => {
                    return Err(CatalogError::AnswerKeyOutOfBounds {
                        id: qid.clone(),
                        index: *correct,
                        options: q.options.len(),
                    });
                }
                ScoringRule::OptionScores { scores } if scores.len() != q.options.len() => {
                    return Err(CatalogError::OptionScoresLength {
                        id: qid.clone(),
                        expected: q.options.len(),
                        found: scores.len(),
                    });
                }
                _ => {}
            }
        }

        let mut seen = HashSet::new();
        for tier in &tiers {
            if !seen.insert(tier.recommendation) {
                return Err(CatalogError::DuplicateTier(tier.recommendation));
            }
        }
        for rec in Recommendation::ALL {
            if !seen.contains(&rec) {
                return Err(CatalogError::MissingTier(rec));
            }
        }

        Ok(Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            questions,
            index,
            sections,
            rules,
            tiers,
        })
    }

    /// Parse the built-in catalog.
    pub fn builtin() -> anyhow::Result<Self> {
        crate::parser::parse_catalog_str(BUILTIN_CATALOG, Path::new("<builtin>"))
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// All questions in catalog order.
    pub fn all_questions(&self) -> &[QuestionSpec] {
        &self.questions
    }

    /// Questions in one category, in catalog order.
    pub fn questions_by_category(&self, category: Category) -> Vec<&QuestionSpec> {
        self.sections[category.section_index()]
            .iter()
            .map(|&pos| &self.questions[pos])
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<&QuestionSpec> {
        self.index.get(id).map(|&pos| &self.questions[pos])
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Sections in presentation order.
    pub fn sections(&self) -> Vec<Section<'_>> {
        Category::ALL
            .into_iter()
            .map(|category| Section {
                category,
                name: category.section_name(),
                questions: self.questions_by_category(category),
            })
            .collect()
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    pub fn section_len(&self, section: usize) -> usize {
        self.sections.get(section).map_or(0, Vec::len)
    }

    /// The question at a position within a section.
    pub fn section_question(&self, section: usize, question: usize) -> Option<&QuestionSpec> {
        let pos = *self.sections.get(section)?.get(question)?;
        self.questions.get(pos)
    }

    pub fn rule_for(&self, id: &str) -> Option<&ScoringRule> {
        self.rules.get(id)
    }

    pub fn rules(&self) -> &HashMap<String, ScoringRule> {
        &self.rules
    }

    /// Tier content for a recommendation. Present for every variant.
    pub fn tier(&self, recommendation: Recommendation) -> Option<&Tier> {
        self.tiers
            .iter()
            .find(|t| t.recommendation == recommendation)
    }

    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::model::LIKERT_MAX;

    pub(crate) fn likert(id: &str, category: Category, subcategory: &str) -> QuestionSpec {
        QuestionSpec {
            id: id.into(),
            category,
            subcategory: subcategory.into(),
            prompt: format!("prompt for {id}"),
            kind: AnswerKind::Likert,
            options: vec![],
            weight: 1.0,
        }
    }

    pub(crate) fn choice(id: &str, category: Category, subcategory: &str) -> QuestionSpec {
        QuestionSpec {
            kind: AnswerKind::MultipleChoice,
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            ..likert(id, category, subcategory)
        }
    }

    pub(crate) fn tiers() -> Vec<Tier> {
        Recommendation::ALL
            .into_iter()
            .map(|recommendation| Tier {
                recommendation,
                feedback: format!("{recommendation} feedback"),
                learning_path: vec![format!("{recommendation} step")],
                skill_gaps: vec![],
            })
            .collect()
    }

    fn small_questions() -> Vec<QuestionSpec> {
        vec![
            likert("psych_1", Category::Psychometric, "interest"),
            choice("tech_1", Category::Technical, "logical"),
            likert("psych_2", Category::Psychometric, "motivation"),
            choice("wiscar_1", Category::Wiscar, "will"),
        ]
    }

    fn build(
        questions: Vec<QuestionSpec>,
        rules: HashMap<String, ScoringRule>,
        tiers: Vec<Tier>,
    ) -> Result<QuestionCatalog, CatalogError> {
        QuestionCatalog::new("test", "Test", "", questions, rules, tiers)
    }

    #[test]
    fn builtin_catalog_loads() {
        let catalog = QuestionCatalog::builtin().unwrap();
        assert_eq!(catalog.len(), 42);
        assert_eq!(catalog.questions_by_category(Category::Psychometric).len(), 20);
        assert_eq!(catalog.questions_by_category(Category::Technical).len(), 15);
        assert_eq!(catalog.questions_by_category(Category::Wiscar).len(), 7);
        assert_eq!(catalog.tiers().len(), 3);
    }

    #[test]
    fn builtin_tech_2_key_is_second_option() {
        let catalog = QuestionCatalog::builtin().unwrap();
        let q = catalog.get("tech_2").unwrap();
        assert_eq!(q.options[1], "25%");
        assert_eq!(
            catalog.rule_for("tech_2"),
            Some(&ScoringRule::AnswerKey { correct: 1 })
        );
    }

    #[test]
    fn questions_by_category_preserves_catalog_order() {
        let catalog = build(small_questions(), HashMap::new(), tiers()).unwrap();
        let ids: Vec<_> = catalog
            .questions_by_category(Category::Psychometric)
            .iter()
            .map(|q| q.id.as_str())
            .collect();
        assert_eq!(ids, vec!["psych_1", "psych_2"]);
        assert_eq!(catalog.section_question(1, 0).unwrap().id, "tech_1");
        assert!(catalog.section_question(1, 1).is_none());
        assert!(catalog.section_question(3, 0).is_none());
    }

    #[test]
    fn sections_are_named_in_order() {
        let catalog = build(small_questions(), HashMap::new(), tiers()).unwrap();
        let names: Vec<_> = catalog.sections().iter().map(|s| s.name).collect();
        assert_eq!(
            names,
            vec!["Psychometric Assessment", "Technical Knowledge", "WISCAR Analysis"]
        );
    }

    #[test]
    fn rejects_duplicate_ids() {
        let mut questions = small_questions();
        questions.push(likert("psych_1", Category::Psychometric, "interest"));
        let err = build(questions, HashMap::new(), tiers()).unwrap_err();
        assert_eq!(err, CatalogError::DuplicateQuestion("psych_1".into()));
    }

    #[test]
    fn rejects_prefix_mismatch() {
        let mut questions = small_questions();
        questions.push(likert("tech_9", Category::Psychometric, "interest"));
        let err = build(questions, HashMap::new(), tiers()).unwrap_err();
        assert!(matches!(err, CatalogError::PrefixMismatch { .. }));
    }

    #[test]
    fn rejects_non_positive_weight() {
        let mut questions = small_questions();
        questions[0].weight = 0.0;
        let err = build(questions, HashMap::new(), tiers()).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidWeight { .. }));
    }

    #[test]
    fn rejects_option_mismatch_by_kind() {
        let mut questions = small_questions();
        questions[1].options.clear();
        let err = build(questions, HashMap::new(), tiers()).unwrap_err();
        assert_eq!(err, CatalogError::MissingOptions("tech_1".into()));

        let mut questions = small_questions();
        questions[0].options.push("extra".into());
        let err = build(questions, HashMap::new(), tiers()).unwrap_err();
        assert_eq!(err, CatalogError::UnexpectedOptions("psych_1".into()));
    }

    #[test]
    fn rejects_empty_section() {
        let questions = vec![
            likert("psych_1", Category::Psychometric, "interest"),
            choice("tech_1", Category::Technical, "logical"),
        ];
        let err = build(questions, HashMap::new(), tiers()).unwrap_err();
        assert_eq!(err, CatalogError::EmptySection(Category::Wiscar));
    }

    #[test]
    fn rejects_bad_rules() {
        let mut rules = HashMap::new();
        rules.insert("tech_99".into(), ScoringRule::AnswerKey { correct: 0 });
        let err = build(small_questions(), rules, tiers()).unwrap_err();
        assert_eq!(err, CatalogError::UnknownRuleTarget("tech_99".into()));

        let mut rules = HashMap::new();
        rules.insert("psych_1".into(), ScoringRule::AnswerKey { correct: 0 });
        let err = build(small_questions(), rules, tiers()).unwrap_err();
        assert_eq!(err, CatalogError::RuleOnNonChoice("psych_1".into()));

        let mut rules = HashMap::new();
        rules.insert("tech_1".into(), ScoringRule::AnswerKey { correct: 4 });
        let err = build(small_questions(), rules, tiers()).unwrap_err();
        assert!(matches!(err, CatalogError::AnswerKeyOutOfBounds { index: 4, .. }));

        let mut rules = HashMap::new();
        rules.insert(
            "wiscar_1".into(),
            ScoringRule::OptionScores {
                scores: vec![4.0, 3.0],
            },
        );
        let err = build(small_questions(), rules, tiers()).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::OptionScoresLength {
                expected: 4,
                found: 2,
                ..
            }
        ));
    }

    #[test]
    fn rejects_missing_and_duplicate_tiers() {
        let mut partial = tiers();
        partial.pop();
        let err = build(small_questions(), HashMap::new(), partial).unwrap_err();
        assert_eq!(err, CatalogError::MissingTier(Recommendation::No));

        let mut doubled = tiers();
        doubled.push(doubled[0].clone());
        let err = build(small_questions(), HashMap::new(), doubled).unwrap_err();
        assert_eq!(err, CatalogError::DuplicateTier(Recommendation::Yes));
    }

    #[test]
    fn lookups() {
        let catalog = build(small_questions(), HashMap::new(), tiers()).unwrap();
        assert!(catalog.get("wiscar_1").is_some());
        assert!(catalog.get("wiscar_2").is_none());
        assert_eq!(catalog.tier(Recommendation::Maybe).unwrap().feedback, "maybe feedback");
        assert_eq!(catalog.get("psych_1").unwrap().value_range().1, LIKERT_MAX);
    }
}
