//! Respondent answers.
//!
//! Each answer to each question is its own record. Answers submitted together
//! share a respondent id (`user_id`) that exists only for that batch.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{ObjectId, Result, error::Error};

/// A stored answer. Never updated; removed only when its survey is deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
  pub id:            ObjectId,
  /// Respondent id shared by every answer of one submission.
  pub user_id:       ObjectId,
  pub created_at:    DateTime<Utc>,
  pub survey_id:     ObjectId,
  pub question_id:   ObjectId,
  pub response_text: String,
}

/// One entry of a submitted batch. Missing fields decode to the zero id and
/// the empty string, which [`ResponseInput::validate`] rejects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseInput {
  #[serde(default, deserialize_with = "crate::de::null_as_default")]
  pub question_id:   ObjectId,
  #[serde(default, deserialize_with = "crate::de::null_as_default")]
  pub response_text: String,
}

impl ResponseInput {
  pub fn validate(&self) -> Result<()> {
    if self.question_id.is_zero() || self.response_text.is_empty() {
      return Err(Error::InvalidSubmission);
    }
    Ok(())
  }

  /// Build the record to store for this entry.
  pub fn to_response(
    &self,
    survey_id: ObjectId,
    user_id: ObjectId,
    now: DateTime<Utc>,
  ) -> Response {
    Response {
      id: ObjectId::new(),
      user_id,
      created_at: now,
      survey_id,
      question_id: self.question_id,
      response_text: self.response_text.clone(),
    }
  }
}
