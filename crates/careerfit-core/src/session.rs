//! Assessment session state machine.
//!
//! One `AssessmentSession` owns the answers and cursor for a single
//! respondent. The catalog it reads from is shared and never mutated.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::{QuestionCatalog, Section};
use crate::error::AssessmentError;
use crate::model::{Answer, QuestionSpec};
use crate::results::AssessmentResult;
use crate::scoring;

/// What to do with a value outside the range a question accepts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValuePolicy {
    /// Return [`AssessmentError::OutOfRangeValue`] and leave the answers untouched.
    #[default]
    Reject,
    /// Clamp the value into the accepted range and record it.
    Clamp,
}

/// Where a session is in the questionnaire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cursor {
    InProgress { section: usize, question: usize },
    Complete,
}

/// Snapshot of how far a session has got.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    pub answered: usize,
    pub total: usize,
    pub remaining: usize,
    /// `answered / total`, in [0, 1].
    pub fraction: f64,
    pub is_complete: bool,
}

/// A single respondent's pass through a catalog.
#[derive(Debug, Clone)]
pub struct AssessmentSession {
    id: Uuid,
    started_at: DateTime<Utc>,
    catalog: Arc<QuestionCatalog>,
    policy: ValuePolicy,
    answers: Vec<Answer>,
    cursor: Cursor,
}

impl AssessmentSession {
    /// Start a session on the first question of the first section.
    pub fn new(catalog: Arc<QuestionCatalog>) -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            catalog,
            policy: ValuePolicy::default(),
            answers: Vec::new(),
            cursor: Cursor::InProgress {
                section: 0,
                question: 0,
            },
        }
    }

    pub fn with_policy(mut self, policy: ValuePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn catalog(&self) -> &QuestionCatalog {
        &self.catalog
    }

    pub fn policy(&self) -> ValuePolicy {
        self.policy
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn is_complete(&self) -> bool {
        self.cursor == Cursor::Complete
    }

    /// Answers in the order their questions were first answered.
    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }

    pub fn answer_for(&self, question_id: &str) -> Option<&Answer> {
        self.answers.iter().find(|a| a.question_id == question_id)
    }

    /// Score and store an answer, replacing any earlier answer to the same
    /// question. The cursor does not move.
    pub fn record_answer(
        &mut self,
        question_id: &str,
        value: i32,
    ) -> Result<&Answer, AssessmentError> {
        let question = self
            .catalog
            .get(question_id)
            .ok_or_else(|| AssessmentError::UnknownQuestion(question_id.to_string()))?;

        let (min, max) = question.value_range();
        let value = if question.accepts(value) {
            value
        } else {
            match self.policy {
                ValuePolicy::Reject => {
                    return Err(AssessmentError::OutOfRangeValue {
                        question_id: question_id.to_string(),
                        value,
                        min,
                        max,
                    });
                }
                ValuePolicy::Clamp => {
                    tracing::debug!(question = question_id, value, min, max, "clamping value");
                    value.clamp(min, max)
                }
            }
        };

        let score = scoring::score_answer(question, self.catalog.rule_for(question_id), value);
        let answer = Answer {
            question_id: question_id.to_string(),
            value,
            score,
        };
        tracing::debug!(question = question_id, value, score, "recorded answer");

        let pos = match self
            .answers
            .iter()
            .position(|a| a.question_id == question_id)
        {
            Some(pos) => {
                self.answers[pos] = answer;
                pos
            }
            None => {
                self.answers.push(answer);
                self.answers.len() - 1
            }
        };
        Ok(&self.answers[pos])
    }

    /// Move to the next question, the next section, or completion.
    pub fn advance(&mut self) {
        let Cursor::InProgress { section, question } = self.cursor else {
            return;
        };

        self.cursor = if question + 1 < self.catalog.section_len(section) {
            Cursor::InProgress {
                section,
                question: question + 1,
            }
        } else if section + 1 < self.catalog.section_count() {
            Cursor::InProgress {
                section: section + 1,
                question: 0,
            }
        } else {
            Cursor::Complete
        };

        match self.cursor {
            Cursor::Complete => tracing::info!(
                session = %self.id,
                answered = self.answers.len(),
                total = self.catalog.len(),
                "assessment complete"
            ),
            Cursor::InProgress { section, question } => {
                tracing::debug!(section, question, "advanced")
            }
        }
    }

    /// Move to the previous question. Stays put on the very first question
    /// and once complete.
    pub fn retreat(&mut self) {
        let Cursor::InProgress { section, question } = self.cursor else {
            return;
        };

        if question > 0 {
            self.cursor = Cursor::InProgress {
                section,
                question: question - 1,
            };
        } else if section > 0 {
            let previous = section - 1;
            self.cursor = Cursor::InProgress {
                section: previous,
                question: self.catalog.section_len(previous).saturating_sub(1),
            };
        } else {
            return;
        }
        tracing::debug!(cursor = ?self.cursor, "retreated");
    }

    /// Whether `retreat` would stay put because the cursor is on the first question.
    pub fn at_start(&self) -> bool {
        self.cursor
            == Cursor::InProgress {
                section: 0,
                question: 0,
            }
    }

    /// The question under the cursor, or `None` once complete.
    pub fn current_question(&self) -> Option<&QuestionSpec> {
        match self.cursor {
            Cursor::InProgress { section, question } => {
                self.catalog.section_question(section, question)
            }
            Cursor::Complete => None,
        }
    }

    /// The section under the cursor, or `None` once complete.
    pub fn current_section(&self) -> Option<Section<'_>> {
        match self.cursor {
            Cursor::InProgress { section, .. } => self.catalog.sections().into_iter().nth(section),
            Cursor::Complete => None,
        }
    }

    /// The stored answer for the question under the cursor.
    pub fn current_answer(&self) -> Option<&Answer> {
        let question = self.current_question()?;
        self.answer_for(&question.id)
    }

    /// Zero-based position of the cursor across the whole catalog.
    pub fn position(&self) -> Option<usize> {
        match self.cursor {
            Cursor::InProgress { section, question } => {
                let before: usize = (0..section).map(|s| self.catalog.section_len(s)).sum();
                Some(before + question)
            }
            Cursor::Complete => None,
        }
    }

    /// Fraction of catalog questions answered, in [0, 1].
    pub fn progress_fraction(&self) -> f64 {
        let total = self.catalog.len();
        if total == 0 {
            return 0.0;
        }
        self.answers.len() as f64 / total as f64
    }

    pub fn progress(&self) -> Progress {
        let total = self.catalog.len();
        let answered = self.answers.len();
        Progress {
            answered,
            total,
            remaining: total.saturating_sub(answered),
            fraction: self.progress_fraction(),
            is_complete: self.is_complete(),
        }
    }

    /// Score the answers recorded so far. Callable in any state.
    pub fn compute_result(&self) -> AssessmentResult {
        scoring::compute_result(&self.catalog, &self.answers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AnswerKind, Category, Recommendation};

    fn session() -> AssessmentSession {
        AssessmentSession::new(Arc::new(QuestionCatalog::builtin().unwrap()))
    }

    #[test]
    fn starts_on_first_question() {
        let s = session();
        assert_eq!(
            s.cursor(),
            Cursor::InProgress {
                section: 0,
                question: 0
            }
        );
        assert_eq!(s.current_question().unwrap().id, "psych_1");
        assert_eq!(s.current_section().unwrap().category, Category::Psychometric);
        assert_eq!(s.position(), Some(0));
        assert!(s.at_start());
        assert_eq!(s.progress_fraction(), 0.0);
    }

    #[test]
    fn unknown_question_is_an_error() {
        let mut s = session();
        let err = s.record_answer("psych_99", 3).unwrap_err();
        assert_eq!(err, AssessmentError::UnknownQuestion("psych_99".into()));
        assert!(s.answers().is_empty());
    }

    #[test]
    fn out_of_range_is_rejected_by_default() {
        let mut s = session();
        let err = s.record_answer("psych_1", 6).unwrap_err();
        assert_eq!(
            err,
            AssessmentError::OutOfRangeValue {
                question_id: "psych_1".into(),
                value: 6,
                min: 1,
                max: 5
            }
        );
        assert!(s.record_answer("psych_1", 0).is_err());
        assert!(s.record_answer("tech_1", 4).is_err());
        assert!(s.record_answer("tech_1", -1).is_err());
        assert!(s.answers().is_empty());
    }

    #[test]
    fn out_of_range_is_clamped_when_configured() {
        let mut s = session().with_policy(ValuePolicy::Clamp);
        let a = s.record_answer("psych_1", 9).unwrap();
        assert_eq!(a.value, 5);
        assert_eq!(a.score, 5.0);

        let a = s.record_answer("psych_2", -3).unwrap();
        assert_eq!(a.value, 1);

        let a = s.record_answer("tech_2", 10).unwrap();
        assert_eq!(a.value, 3);
        assert_eq!(a.score, 1.5);
    }

    #[test]
    fn reanswering_replaces() {
        let mut s = session();
        s.record_answer("psych_1", 2).unwrap();
        s.record_answer("psych_2", 4).unwrap();
        s.record_answer("psych_1", 5).unwrap();

        let matching = s
            .answers()
            .iter()
            .filter(|a| a.question_id == "psych_1")
            .count();
        assert_eq!(matching, 1);
        assert_eq!(s.answers().len(), 2);
        assert_eq!(s.answer_for("psych_1").unwrap().value, 5);
        // Replacement keeps the first slot
        assert_eq!(s.answers()[0].question_id, "psych_1");
    }

    #[test]
    fn recording_does_not_move_cursor() {
        let mut s = session();
        s.record_answer("tech_5", 0).unwrap();
        assert!(s.at_start());
    }

    #[test]
    fn tech_2_scores_against_its_key() {
        let mut s = session();
        let weight = s.catalog().get("tech_2").unwrap().weight;
        assert_eq!(s.record_answer("tech_2", 1).unwrap().score, 5.0 * weight);
        assert_eq!(s.record_answer("tech_2", 0).unwrap().score, 1.0 * weight);
        assert_eq!(s.record_answer("tech_2", 3).unwrap().score, 1.0 * weight);
    }

    #[test]
    fn progress_tracks_distinct_answers() {
        let mut s = session();
        let total = s.catalog().len();
        let ids: Vec<String> = s
            .catalog()
            .all_questions()
            .iter()
            .take(5)
            .map(|q| q.id.clone())
            .collect();

        let mut last = 0.0;
        for (n, id) in ids.iter().enumerate() {
            let value = if id.starts_with("psych_") { 3 } else { 0 };
            s.record_answer(id, value).unwrap();
            s.record_answer(id, value).unwrap();
            let fraction = s.progress_fraction();
            assert_eq!(fraction, (n + 1) as f64 / total as f64);
            assert!(fraction >= last);
            last = fraction;
        }

        let p = s.progress();
        assert_eq!(p.answered, 5);
        assert_eq!(p.remaining, total - 5);
        assert!(!p.is_complete);
    }

    #[test]
    fn advance_crosses_sections() {
        let mut s = session();
        for _ in 0..19 {
            s.advance();
        }
        assert_eq!(s.current_question().unwrap().id, "psych_20");
        s.advance();
        assert_eq!(
            s.cursor(),
            Cursor::InProgress {
                section: 1,
                question: 0
            }
        );
        assert_eq!(s.current_question().unwrap().id, "tech_1");
        assert_eq!(s.position(), Some(20));
    }

    #[test]
    fn advance_total_times_completes_and_stops() {
        let mut s = session();
        let total = s.catalog().len();
        for i in 0..total {
            assert!(!s.is_complete(), "completed early after {i} advances");
            s.advance();
        }
        assert!(s.is_complete());
        assert!(s.current_question().is_none());
        assert!(s.current_section().is_none());

        s.advance();
        assert_eq!(s.cursor(), Cursor::Complete);
        s.retreat();
        assert_eq!(s.cursor(), Cursor::Complete);
    }

    #[test]
    fn retreat_is_clamped_and_crosses_sections() {
        let mut s = session();
        s.retreat();
        assert!(s.at_start());

        for _ in 0..20 {
            s.advance();
        }
        assert_eq!(s.current_question().unwrap().id, "tech_1");
        s.retreat();
        assert_eq!(
            s.cursor(),
            Cursor::InProgress {
                section: 0,
                question: 19
            }
        );
        s.advance();
        s.advance();
        s.retreat();
        assert_eq!(s.current_question().unwrap().id, "tech_1");
    }

    #[test]
    fn current_answer_follows_cursor() {
        let mut s = session();
        assert!(s.current_answer().is_none());
        s.record_answer("psych_1", 4).unwrap();
        assert_eq!(s.current_answer().unwrap().value, 4);
        s.advance();
        assert!(s.current_answer().is_none());
    }

    #[test]
    fn result_available_mid_session() {
        let mut s = session();
        s.record_answer("psych_1", 5).unwrap();
        let result = s.compute_result();
        assert_eq!(result.answered, 1);
        assert!(!result.is_complete());
        assert_eq!(result.recommendation, Recommendation::No);
    }

    #[test]
    fn every_question_is_answerable_at_its_bounds() {
        let mut s = session();
        let questions = s.catalog().all_questions().to_vec();
        for q in &questions {
            let (min, max) = q.value_range();
            s.record_answer(&q.id, min).unwrap();
            s.record_answer(&q.id, max).unwrap();
            if q.kind == AnswerKind::Likert {
                assert_eq!((min, max), (1, 5));
            }
        }
        assert_eq!(s.progress().remaining, 0);
    }
}
