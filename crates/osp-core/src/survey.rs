//! Surveys and their embedded questions.
//!
//! A survey owns its questions outright: questions have ids so responses can
//! reference them, but they are only ever read or written as part of their
//! parent survey.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{ObjectId, Result, error::Error};

// ─── Question type ───────────────────────────────────────────────────────────

/// The kind of a question. Unknown kinds are preserved verbatim so clients can
/// introduce new ones without a server change.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum QuestionType {
  PlainText,
  MultipleChoice,
  LikertScale,
  Other(String),
  /// The type field was missing or empty.
  #[default]
  Unset,
}

impl QuestionType {
  pub const PLAIN_TEXT: &'static str = "Plain Text";
  pub const MULTIPLE_CHOICE: &'static str = "Multiple Choice";
  pub const LIKERT_SCALE: &'static str = "Likert Scale";

  pub fn as_str(&self) -> &str {
    match self {
      Self::PlainText => Self::PLAIN_TEXT,
      Self::MultipleChoice => Self::MULTIPLE_CHOICE,
      Self::LikertScale => Self::LIKERT_SCALE,
      Self::Other(s) => s,
      Self::Unset => "",
    }
  }

  pub fn is_unset(&self) -> bool { matches!(self, Self::Unset) }
}

impl From<String> for QuestionType {
  fn from(s: String) -> Self {
    match s.as_str() {
      "" => Self::Unset,
      Self::PLAIN_TEXT => Self::PlainText,
      Self::MULTIPLE_CHOICE => Self::MultipleChoice,
      Self::LIKERT_SCALE => Self::LikertScale,
      _ => Self::Other(s),
    }
  }
}

impl From<&str> for QuestionType {
  fn from(s: &str) -> Self { Self::from(s.to_owned()) }
}

impl From<QuestionType> for String {
  fn from(t: QuestionType) -> Self {
    match t {
      QuestionType::Other(s) => s,
      other => other.as_str().to_owned(),
    }
  }
}

impl fmt::Display for QuestionType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// ─── Question ────────────────────────────────────────────────────────────────

/// A question embedded in a survey.
///
/// Every field is optional on input so that partial update bodies decode;
/// [`crate::validate`] decides what a complete question looks like.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
  #[serde(default, deserialize_with = "crate::de::null_as_default")]
  pub id:             ObjectId,
  #[serde(default, deserialize_with = "crate::de::null_as_default")]
  pub question_title: String,
  #[serde(default, deserialize_with = "crate::de::null_as_default")]
  pub question_type:  QuestionType,
  /// Answer options; meaning depends on `question_type`.
  #[serde(
    default,
    deserialize_with = "crate::de::null_as_default",
    skip_serializing_if = "Vec::is_empty"
  )]
  pub answers:        Vec<String>,
}

// ─── Survey ──────────────────────────────────────────────────────────────────

/// A stored survey.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Survey {
  pub id:         ObjectId,
  /// Short public handle; unique across all surveys and never changed.
  pub token:      String,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
  pub title:      String,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub questions:  Vec<Question>,
}

/// The listing projection of a survey.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveySummary {
  pub token: String,
  pub title: String,
}

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// A question as submitted for a new survey. Any client-supplied id is
/// ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewQuestion {
  #[serde(default, deserialize_with = "crate::de::null_as_default")]
  pub question_title: String,
  #[serde(default, deserialize_with = "crate::de::null_as_default")]
  pub question_type:  QuestionType,
  #[serde(default, deserialize_with = "crate::de::null_as_default")]
  pub answers:        Vec<String>,
}

/// Body of a survey creation request. Ids, token and timestamps are assigned
/// by the server; unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewSurvey {
  #[serde(default, deserialize_with = "crate::de::null_as_default")]
  pub title:     String,
  #[serde(default, deserialize_with = "crate::de::null_as_default")]
  pub questions: Vec<NewQuestion>,
}

impl NewSurvey {
  /// Build the survey to persist. Callers validate first.
  pub fn into_survey(self, token: String, now: DateTime<Utc>) -> Survey {
    Survey {
      id: ObjectId::new(),
      token,
      created_at: now,
      updated_at: now,
      title: self.title,
      questions: self
        .questions
        .into_iter()
        .map(|q| Question {
          id:             ObjectId::new(),
          question_title: q.question_title,
          question_type:  q.question_type,
          answers:        q.answers,
        })
        .collect(),
    }
  }
}

/// Body of a survey update request. Only a non-empty title and a non-empty
/// question list are applied; everything else is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SurveyUpdate {
  #[serde(default, deserialize_with = "crate::de::null_as_default")]
  pub title:     String,
  #[serde(default, deserialize_with = "crate::de::null_as_default")]
  pub questions: Vec<Question>,
}

/// A field-level change to a stored survey.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurveyPatch {
  pub title:      Option<String>,
  /// Replaces the whole question list when present.
  pub questions:  Option<Vec<Question>>,
  pub updated_at: DateTime<Utc>,
}

impl SurveyUpdate {
  /// Turn the request into a patch.
  ///
  /// Questions without an id get a fresh one so pre-existing and new
  /// questions can be mixed. Fails if any question lacks a title or type, or
  /// if nothing would change.
  pub fn into_patch(self, now: DateTime<Utc>) -> Result<SurveyPatch> {
    let title = Some(self.title).filter(|t| !t.is_empty());

    let questions = if self.questions.is_empty() {
      None
    } else {
      let mut questions = self.questions;
      for q in &mut questions {
        crate::validate::validate_question_fields(q)?;
        if q.id.is_zero() {
          q.id = ObjectId::new();
        }
      }
      Some(questions)
    };

    if title.is_none() && questions.is_none() {
      return Err(Error::NoUpdates);
    }

    Ok(SurveyPatch { title, questions, updated_at: now })
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn question_type_round_trips_known_and_unknown_names() {
    for name in ["Plain Text", "Multiple Choice", "Likert Scale", "Ranking"] {
      let t: QuestionType = serde_json::from_value(json!(name)).unwrap();
      assert_eq!(serde_json::to_value(&t).unwrap(), json!(name));
    }
    let t: QuestionType = serde_json::from_value(json!("Likert Scale")).unwrap();
    assert_eq!(t, QuestionType::LikertScale);
    assert_eq!(QuestionType::from(""), QuestionType::Unset);
  }

  #[test]
  fn new_survey_ignores_client_ids_and_assigns_fresh_ones() {
    let body: NewSurvey = serde_json::from_value(json!({
      "id": "ffffffffffffffffffffffff",
      "token": "XXXXX",
      "title": "Lunch",
      "questions": [
        { "id": "ffffffffffffffffffffffff", "question_title": "Where?", "question_type": "Plain Text" }
      ]
    }))
    .unwrap();

    let now = Utc::now();
    let survey = body.into_survey("abcde".into(), now);
    assert_eq!(survey.token, "abcde");
    assert_eq!(survey.created_at, survey.updated_at);
    assert_ne!(survey.id.to_hex(), "ffffffffffffffffffffffff");
    assert_eq!(survey.questions.len(), 1);
    assert!(!survey.questions[0].id.is_zero());
    assert_ne!(survey.questions[0].id.to_hex(), "ffffffffffffffffffffffff");
  }

  #[test]
  fn survey_json_uses_wire_field_names_and_omits_empty_lists() {
    let now = Utc::now();
    let survey = NewSurvey { title: "Empty".into(), questions: vec![] }
      .into_survey("abcde".into(), now);
    let value = serde_json::to_value(&survey).unwrap();
    let obj = value.as_object().unwrap();
    for key in ["id", "token", "created_at", "updated_at", "title"] {
      assert!(obj.contains_key(key), "missing {key}");
    }
    assert!(!obj.contains_key("questions"));
  }

  #[test]
  fn update_keeps_existing_question_ids_and_fills_missing_ones() {
    let existing = ObjectId::new();
    let update: SurveyUpdate = serde_json::from_value(json!({
      "questions": [
        { "id": existing.to_hex(), "question_title": "Old", "question_type": "Plain Text" },
        { "question_title": "New", "question_type": "Multiple Choice", "answers": ["a"] }
      ]
    }))
    .unwrap();

    let patch = update.into_patch(Utc::now()).unwrap();
    assert!(patch.title.is_none());
    let questions = patch.questions.unwrap();
    assert_eq!(questions[0].id, existing);
    assert!(!questions[1].id.is_zero());
  }

  #[test]
  fn update_without_changes_is_rejected() {
    let err = SurveyUpdate::default().into_patch(Utc::now()).unwrap_err();
    assert!(matches!(err, Error::NoUpdates));
  }

  #[test]
  fn update_rejects_question_without_type() {
    let update: SurveyUpdate = serde_json::from_value(json!({
      "title": "Renamed",
      "questions": [{ "question_title": "Untyped" }]
    }))
    .unwrap();
    let err = update.into_patch(Utc::now()).unwrap_err();
    assert!(matches!(err, Error::IncompleteQuestion));
  }

  #[test]
  fn null_fields_decode_as_empty() {
    let body: NewSurvey =
      serde_json::from_value(json!({ "title": "T", "questions": null })).unwrap();
    assert!(body.questions.is_empty());

    let body: NewSurvey = serde_json::from_value(json!({
      "title": null,
      "questions": [{ "question_title": "Q", "question_type": null, "answers": null }]
    }))
    .unwrap();
    assert!(body.title.is_empty());
    assert!(body.questions[0].question_type.is_unset());
    assert!(body.questions[0].answers.is_empty());

    let update: SurveyUpdate =
      serde_json::from_value(json!({ "title": "X", "questions": null })).unwrap();
    let patch = update.into_patch(Utc::now()).unwrap();
    assert_eq!(patch.title.as_deref(), Some("X"));
    assert!(patch.questions.is_none());

    let q: Question = serde_json::from_value(json!({
      "id": null, "question_title": "Q", "question_type": "Plain Text", "answers": null
    }))
    .unwrap();
    assert!(q.id.is_zero());
  }
}
