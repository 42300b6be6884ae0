//! Input validation for surveys, questions and submissions.
//!
//! Creation enforces per-type answer minimums; updates only require each
//! question to carry a title and a type.

use crate::{
  Result,
  error::Error,
  survey::{NewQuestion, NewSurvey, Question, QuestionType},
};

/// Minimum number of answer options a question of type `t` needs.
pub fn min_answers(t: &QuestionType) -> usize {
  match t {
    QuestionType::MultipleChoice => 2,
    QuestionType::LikertScale => 3,
    _ => 0,
  }
}

/// Check that a question of type `t` offers enough answer options.
pub fn validate_question_type(t: &QuestionType, answers: &[String]) -> Result<()> {
  let min = min_answers(t);
  if answers.len() >= min {
    return Ok(());
  }
  let kind = match t {
    QuestionType::MultipleChoice => "MC Question",
    QuestionType::LikertScale => "Likert Scale Question",
    _ => "Question",
  };
  Err(Error::TooFewAnswers { kind, min })
}

/// A question submitted for update must have a title and a type.
pub fn validate_question_fields(q: &Question) -> Result<()> {
  if q.question_title.is_empty() || q.question_type.is_unset() {
    return Err(Error::IncompleteQuestion);
  }
  Ok(())
}

fn validate_new_question(q: &NewQuestion) -> Result<()> {
  validate_question_type(&q.question_type, &q.answers)
}

/// Validate a creation request. Every question is checked; the first failure
/// is returned.
pub fn validate_new_survey(s: &NewSurvey) -> Result<()> {
  if s.title.is_empty() {
    return Err(Error::EmptyTitle);
  }
  s.questions
    .iter()
    .map(validate_new_question)
    .filter_map(Result::err)
    .next()
    .map_or(Ok(()), Err)
}
