//! Result types produced by scoring a set of answers.

use serde::{Deserialize, Serialize};

use crate::model::{Recommendation, WiscarDimension};

/// Sub-scores for the six WISCAR dimensions, each 0-100.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WiscarScores {
    pub will: f64,
    pub interest: f64,
    pub skill: f64,
    pub cognitive: f64,
    pub ability: f64,
    pub reality: f64,
}

impl WiscarScores {
    pub fn get(&self, dimension: WiscarDimension) -> f64 {
        match dimension {
            WiscarDimension::Will => self.will,
            WiscarDimension::Interest => self.interest,
            WiscarDimension::Skill => self.skill,
            WiscarDimension::Cognitive => self.cognitive,
            WiscarDimension::Ability => self.ability,
            WiscarDimension::Reality => self.reality,
        }
    }

    pub fn set(&mut self, dimension: WiscarDimension, score: f64) {
        let slot = match dimension {
            WiscarDimension::Will => &mut self.will,
            WiscarDimension::Interest => &mut self.interest,
            WiscarDimension::Skill => &mut self.skill,
            WiscarDimension::Cognitive => &mut self.cognitive,
            WiscarDimension::Ability => &mut self.ability,
            WiscarDimension::Reality => &mut self.reality,
        };
        *slot = score;
    }

    /// Dimension scores in WISCAR order.
    pub fn iter(&self) -> impl Iterator<Item = (WiscarDimension, f64)> + '_ {
        WiscarDimension::ALL
            .into_iter()
            .map(move |d| (d, self.get(d)))
    }

    /// Mean of the six dimension scores.
    pub fn average(&self) -> f64 {
        self.iter().map(|(_, s)| s).sum::<f64>() / WiscarDimension::ALL.len() as f64
    }
}

/// Scores and recommendation derived from one assessment's answers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentResult {
    /// Psychometric sub-score, 0-100.
    pub psychometric_score: f64,
    /// Technical sub-score, 0-100.
    pub technical_score: f64,
    /// Per-dimension WISCAR sub-scores.
    pub wiscar_scores: WiscarScores,
    /// Mean of the WISCAR dimension scores.
    pub wiscar_average: f64,
    /// Weighted overall score, 0-100.
    pub overall_score: f64,
    pub recommendation: Recommendation,
    pub feedback: String,
    /// Suggested learning steps, in order.
    pub learning_path: Vec<String>,
    pub skill_gaps: Vec<String>,
    /// Number of questions answered when the result was computed.
    pub answered: usize,
    /// Number of questions in the catalog.
    pub total: usize,
}

impl AssessmentResult {
    /// Whether every catalog question had an answer.
    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.answered == self.total
    }
}
