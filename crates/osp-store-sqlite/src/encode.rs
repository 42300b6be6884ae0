//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are RFC 3339 strings, ids are 24-char hex, and a survey's
//! questions are stored as one JSON array.

use chrono::{DateTime, Utc};
use osp_core::{ObjectId, response::Response, survey::{Question, Survey}};

use crate::{Error, Result};

// ─── ObjectId ────────────────────────────────────────────────────────────────

pub fn encode_id(id: ObjectId) -> String { id.to_hex() }

pub fn decode_id(s: &str) -> Result<ObjectId> { Ok(ObjectId::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Questions ───────────────────────────────────────────────────────────────

pub fn encode_questions(questions: &[Question]) -> Result<String> {
  Ok(serde_json::to_string(questions)?)
}

pub fn decode_questions(s: &str) -> Result<Vec<Question>> {
  Ok(serde_json::from_str(s)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawSurvey::from_row`].
pub const SURVEY_COLUMNS: &str =
  "survey_id, token, created_at, updated_at, title, questions_json";

/// Raw strings read directly from a `surveys` row.
pub struct RawSurvey {
  pub survey_id:      String,
  pub token:          String,
  pub created_at:     String,
  pub updated_at:     String,
  pub title:          String,
  pub questions_json: String,
}

impl RawSurvey {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      survey_id:      row.get(0)?,
      token:          row.get(1)?,
      created_at:     row.get(2)?,
      updated_at:     row.get(3)?,
      title:          row.get(4)?,
      questions_json: row.get(5)?,
    })
  }

  pub fn into_survey(self) -> Result<Survey> {
    Ok(Survey {
      id:         decode_id(&self.survey_id)?,
      token:      self.token,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
      title:      self.title,
      questions:  decode_questions(&self.questions_json)?,
    })
  }
}

/// Column list matching [`RawResponse::from_row`].
pub const RESPONSE_COLUMNS: &str =
  "response_id, user_id, created_at, survey_id, question_id, response_text";

/// Raw strings read directly from a `responses` row.
pub struct RawResponse {
  pub response_id:   String,
  pub user_id:       String,
  pub created_at:    String,
  pub survey_id:     String,
  pub question_id:   String,
  pub response_text: String,
}

impl RawResponse {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      response_id:   row.get(0)?,
      user_id:       row.get(1)?,
      created_at:    row.get(2)?,
      survey_id:     row.get(3)?,
      question_id:   row.get(4)?,
      response_text: row.get(5)?,
    })
  }

  pub fn into_response(self) -> Result<Response> {
    Ok(Response {
      id:            decode_id(&self.response_id)?,
      user_id:       decode_id(&self.user_id)?,
      created_at:    decode_dt(&self.created_at)?,
      survey_id:     decode_id(&self.survey_id)?,
      question_id:   decode_id(&self.question_id)?,
      response_text: self.response_text,
    })
  }
}
