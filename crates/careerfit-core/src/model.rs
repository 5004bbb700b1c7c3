//! Core data model types for careerfit.
//!
//! Questions, answers, and the closed enumerations the scoring rules are
//! keyed on.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lowest value on the likert agreement scale.
pub const LIKERT_MIN: i32 = 1;
/// Highest value on the likert agreement scale.
pub const LIKERT_MAX: i32 = 5;

/// Assessment category. Each category is presented as one section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Psychometric,
    Technical,
    Wiscar,
}

impl Category {
    /// All categories in section order.
    pub const ALL: [Category; 3] = [
        Category::Psychometric,
        Category::Technical,
        Category::Wiscar,
    ];

    /// Prefix every question identifier in this category must carry.
    pub fn id_prefix(self) -> &'static str {
        match self {
            Category::Psychometric => "psych_",
            Category::Technical => "tech_",
            Category::Wiscar => "wiscar_",
        }
    }

    /// Display name of the section this category is presented as.
    pub fn section_name(self) -> &'static str {
        match self {
            Category::Psychometric => "Psychometric Assessment",
            Category::Technical => "Technical Knowledge",
            Category::Wiscar => "WISCAR Analysis",
        }
    }

    /// Position of this category's section.
    pub fn section_index(self) -> usize {
        match self {
            Category::Psychometric => 0,
            Category::Technical => 1,
            Category::Wiscar => 2,
        }
    }

    /// Resolve the category an identifier belongs to by its prefix.
    pub fn from_id_prefix(id: &str) -> Option<Category> {
        Category::ALL
            .into_iter()
            .find(|c| id.starts_with(c.id_prefix()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Psychometric => write!(f, "psychometric"),
            Category::Technical => write!(f, "technical"),
            Category::Wiscar => write!(f, "wiscar"),
        }
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "psychometric" | "psych" => Ok(Category::Psychometric),
            "technical" | "tech" => Ok(Category::Technical),
            "wiscar" => Ok(Category::Wiscar),
            other => Err(format!("unknown category: {other}")),
        }
    }
}

/// How a question is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnswerKind {
    /// Agreement scale from [`LIKERT_MIN`] to [`LIKERT_MAX`].
    Likert,
    /// One of an ordered list of option labels, answered by zero-based index.
    MultipleChoice,
}

impl fmt::Display for AnswerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerKind::Likert => write!(f, "likert"),
            AnswerKind::MultipleChoice => write!(f, "multiple-choice"),
        }
    }
}

impl FromStr for AnswerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "likert" => Ok(AnswerKind::Likert),
            "multiple-choice" | "multiple_choice" | "choice" => Ok(AnswerKind::MultipleChoice),
            other => Err(format!("unknown answer kind: {other}")),
        }
    }
}

/// A single survey item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionSpec {
    /// Unique, stable identifier (e.g. "tech_2").
    pub id: String,
    /// Category the question is scored under.
    pub category: Category,
    /// Free-form tag. Within WISCAR it names the dimension.
    pub subcategory: String,
    /// Prompt text shown to the respondent.
    pub prompt: String,
    /// How the question is answered.
    pub kind: AnswerKind,
    /// Option labels, in presentation order. Empty for likert questions.
    #[serde(default)]
    pub options: Vec<String>,
    /// Score multiplier, strictly positive.
    pub weight: f64,
}

impl QuestionSpec {
    /// Inclusive range of raw values this question accepts.
    pub fn value_range(&self) -> (i32, i32) {
        match self.kind {
            AnswerKind::Likert => (LIKERT_MIN, LIKERT_MAX),
            AnswerKind::MultipleChoice => {
                let max = i32::try_from(self.options.len()).unwrap_or(i32::MAX) - 1;
                (0, max)
            }
        }
    }

    pub fn accepts(&self, value: i32) -> bool {
        let (min, max) = self.value_range();
        (min..=max).contains(&value)
    }
}

/// A scored response to one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    /// Identifier of the answered question.
    pub question_id: String,
    /// Likert value (1-5) or zero-based option index.
    pub value: i32,
    /// Weighted score derived from `value`.
    pub score: f64,
}

/// The six WISCAR readiness dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WiscarDimension {
    Will,
    Interest,
    Skill,
    Cognitive,
    Ability,
    Reality,
}

impl WiscarDimension {
    pub const ALL: [WiscarDimension; 6] = [
        WiscarDimension::Will,
        WiscarDimension::Interest,
        WiscarDimension::Skill,
        WiscarDimension::Cognitive,
        WiscarDimension::Ability,
        WiscarDimension::Reality,
    ];

    /// Subcategory tag that selects questions for this dimension.
    pub fn tag(self) -> &'static str {
        match self {
            WiscarDimension::Will => "will",
            WiscarDimension::Interest => "interest",
            WiscarDimension::Skill => "skill",
            WiscarDimension::Cognitive => "cognitive",
            WiscarDimension::Ability => "ability",
            WiscarDimension::Reality => "reality",
        }
    }

    pub fn from_tag(tag: &str) -> Option<WiscarDimension> {
        WiscarDimension::ALL.into_iter().find(|d| d.tag() == tag)
    }
}

impl fmt::Display for WiscarDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Categorical outcome of an assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recommendation {
    Yes,
    Maybe,
    No,
}

impl Recommendation {
    pub const ALL: [Recommendation; 3] = [
        Recommendation::Yes,
        Recommendation::Maybe,
        Recommendation::No,
    ];
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recommendation::Yes => write!(f, "yes"),
            Recommendation::Maybe => write!(f, "maybe"),
            Recommendation::No => write!(f, "no"),
        }
    }
}

impl FromStr for Recommendation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "yes" => Ok(Recommendation::Yes),
            "maybe" => Ok(Recommendation::Maybe),
            "no" => Ok(Recommendation::No),
            other => Err(format!("unknown recommendation: {other}")),
        }
    }
}

/// Coarse band for a 0-100 sub-score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBand {
    Strong,
    Moderate,
    Weak,
}

impl ScoreBand {
    pub fn of(score: f64) -> ScoreBand {
        if score >= 70.0 {
            ScoreBand::Strong
        } else if score >= 40.0 {
            ScoreBand::Moderate
        } else {
            ScoreBand::Weak
        }
    }
}

impl fmt::Display for ScoreBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreBand::Strong => write!(f, "strong"),
            ScoreBand::Moderate => write!(f, "moderate"),
            ScoreBand::Weak => write!(f, "weak"),
        }
    }
}
