//! Scoring rules.
//!
//! Turns raw answer values into weighted scores, aggregates answers into
//! 0-100 sub-scores, and selects a recommendation tier. Every function here
//! is pure over its inputs.

use crate::catalog::{GapMetric, QuestionCatalog, ScoringRule, Tier};
use crate::model::{Answer, AnswerKind, Category, QuestionSpec, Recommendation, WiscarDimension};
use crate::results::{AssessmentResult, WiscarScores};

/// Upper bound of every sub-score and of the overall score.
pub const SCORE_CEILING: f64 = 100.0;

/// Scale applied to the mean psychometric answer score.
pub const PSYCHOMETRIC_SCALE: f64 = 20.0;
/// Scale applied to the mean technical answer score.
pub const TECHNICAL_SCALE: f64 = 15.0;

/// Unweighted score for choosing the keyed option.
pub const KEY_MATCH_SCORE: f64 = 5.0;
/// Unweighted score for choosing any other option.
pub const KEY_MISS_SCORE: f64 = 1.0;

pub const PSYCHOMETRIC_WEIGHT: f64 = 0.3;
pub const TECHNICAL_WEIGHT: f64 = 0.4;
pub const WISCAR_WEIGHT: f64 = 0.3;

/// Minimum overall score for a `yes` recommendation.
pub const YES_THRESHOLD: f64 = 70.0;
/// Minimum overall score for a `maybe` recommendation.
pub const MAYBE_THRESHOLD: f64 = 40.0;

impl WiscarDimension {
    /// Number of questions the dimension score is normalized by.
    ///
    /// This is a fixed constant, not the number of answers that matched, so
    /// an unanswered question in a two-question dimension halves its score.
    pub fn expected_count(self) -> usize {
        match self {
            WiscarDimension::Will => 2,
            _ => 1,
        }
    }

    /// Scale applied to the normalized dimension sum.
    pub fn multiplier(self) -> f64 {
        match self {
            WiscarDimension::Will => 12.5,
            _ => 25.0,
        }
    }
}

impl Recommendation {
    /// Tier for an overall score.
    pub fn from_score(overall: f64) -> Recommendation {
        if overall >= YES_THRESHOLD {
            Recommendation::Yes
        } else if overall >= MAYBE_THRESHOLD {
            Recommendation::Maybe
        } else {
            Recommendation::No
        }
    }
}

/// Unweighted score for choosing option `index`.
///
/// Questions without a rule fall back to the raw option index.
pub fn lookup_score(rule: Option<&ScoringRule>, index: usize) -> f64 {
    match rule {
        Some(ScoringRule::AnswerKey { correct }) => {
            if index == *correct {
                KEY_MATCH_SCORE
            } else {
                KEY_MISS_SCORE
            }
        }
        Some(ScoringRule::OptionScores { scores }) => {
            scores.get(index).copied().unwrap_or(index as f64)
        }
        None => index as f64,
    }
}

/// Weighted score for a raw value.
///
/// `value` must lie in [`QuestionSpec::value_range`]; range checking is the
/// caller's job and [`AssessmentSession::record_answer`] does it. A negative
/// multiple-choice value that slips through is scored as option 0.
///
/// [`AssessmentSession::record_answer`]: crate::session::AssessmentSession::record_answer
pub fn score_answer(question: &QuestionSpec, rule: Option<&ScoringRule>, value: i32) -> f64 {
    match question.kind {
        AnswerKind::Likert => f64::from(value) * question.weight,
        AnswerKind::MultipleChoice => {
            let index = usize::try_from(value).unwrap_or(0);
            lookup_score(rule, index) * question.weight
        }
    }
}

/// Arithmetic mean, or `None` for an empty input.
pub fn mean(scores: &[f64]) -> Option<f64> {
    if scores.is_empty() {
        None
    } else {
        Some(scores.iter().sum::<f64>() / scores.len() as f64)
    }
}

fn in_category(answers: &[Answer], category: Category) -> impl Iterator<Item = &Answer> {
    answers
        .iter()
        .filter(move |a| Category::from_id_prefix(&a.question_id) == Some(category))
}

/// Mean answer score in a category, scaled and capped at 100.
///
/// A category with no answers scores 0.
pub fn category_score(answers: &[Answer], category: Category, scale: f64) -> f64 {
    let scores: Vec<f64> = in_category(answers, category).map(|a| a.score).collect();
    match mean(&scores) {
        Some(m) => (m * scale).min(SCORE_CEILING),
        None => {
            tracing::debug!(%category, "no answers in category, scoring 0");
            0.0
        }
    }
}

/// Score for one WISCAR dimension, capped at 100.
pub fn dimension_score(
    catalog: &QuestionCatalog,
    answers: &[Answer],
    dimension: WiscarDimension,
) -> f64 {
    let matched: Vec<f64> = in_category(answers, Category::Wiscar)
        .filter(|a| {
            catalog
                .get(&a.question_id)
                .is_some_and(|q| q.subcategory == dimension.tag())
        })
        .map(|a| a.score)
        .collect();

    if matched.is_empty() {
        tracing::debug!(%dimension, "no answers for dimension, scoring 0");
        return 0.0;
    }

    let sum: f64 = matched.iter().sum();
    (sum / dimension.expected_count() as f64 * dimension.multiplier()).min(SCORE_CEILING)
}

/// Weighted combination of the category scores, capped at 100.
pub fn overall_score(psychometric: f64, technical: f64, wiscar_average: f64) -> f64 {
    let weighted = psychometric * PSYCHOMETRIC_WEIGHT
        + technical * TECHNICAL_WEIGHT
        + wiscar_average * WISCAR_WEIGHT;
    weighted.min(SCORE_CEILING)
}

/// Labels of the tier's skill gaps that apply to these scores.
pub fn skill_gaps(
    tier: &Tier,
    psychometric: f64,
    technical: f64,
    wiscar_average: f64,
) -> Vec<String> {
    tier.skill_gaps
        .iter()
        .filter(|gap| match gap.condition {
            None => true,
            Some(cond) => {
                let value = match cond.metric {
                    GapMetric::Psychometric => psychometric,
                    GapMetric::Technical => technical,
                    GapMetric::WiscarAverage => wiscar_average,
                };
                value < cond.below
            }
        })
        .map(|gap| gap.label.clone())
        .collect()
}

/// Compute the full result for a set of answers.
///
/// Works on any subset of the catalog; missing answers simply lower the
/// affected sub-scores.
pub fn compute_result(catalog: &QuestionCatalog, answers: &[Answer]) -> AssessmentResult {
    let psychometric_score = category_score(answers, Category::Psychometric, PSYCHOMETRIC_SCALE);
    let technical_score = category_score(answers, Category::Technical, TECHNICAL_SCALE);

    let mut wiscar_scores = WiscarScores::default();
    for dim in WiscarDimension::ALL {
        wiscar_scores.set(dim, dimension_score(catalog, answers, dim));
    }
    let wiscar_average = wiscar_scores.average();

    let overall_score = overall_score(psychometric_score, technical_score, wiscar_average);
    let recommendation = Recommendation::from_score(overall_score);

    let (feedback, learning_path, gaps) = match catalog.tier(recommendation) {
        Some(tier) => (
            tier.feedback.clone(),
            tier.learning_path.clone(),
            skill_gaps(tier, psychometric_score, technical_score, wiscar_average),
        ),
        None => (String::new(), Vec::new(), Vec::new()),
    };

    AssessmentResult {
        psychometric_score,
        technical_score,
        wiscar_scores,
        wiscar_average,
        overall_score,
        recommendation,
        feedback,
        learning_path,
        skill_gaps: gaps,
        answered: answers.len(),
        total: catalog.len(),
    }
}
