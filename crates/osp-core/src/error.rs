//! Error types for `osp-core`.
//!
//! The `Display` strings of the validation variants are shown verbatim to API
//! clients, so they read as sentences rather than log lines.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("Title is required, please make sure the title field is filled")]
  EmptyTitle,

  #[error("Failed to create survey, {kind} should have more than {}", more_than(.min))]
  TooFewAnswers { kind: &'static str, min: usize },

  #[error("Invalid Question without title or type")]
  IncompleteQuestion,

  #[error("No updates")]
  NoUpdates,

  #[error("Invalid input from submission")]
  InvalidSubmission,

  #[error("invalid object id: {0:?}")]
  InvalidObjectId(String),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

impl Error {
  /// Whether the error stems from client input rather than a fault on our
  /// side.
  pub fn is_client_error(&self) -> bool {
    !matches!(self, Self::Serialization(_))
  }
}

/// Renders a minimum as the "more than N answer(s)" phrase clients expect.
fn more_than(min: &usize) -> String {
  let floor = min.saturating_sub(1);
  let noun = if floor == 1 { "answer" } else { "answers" };
  format!("{floor} {noun}")
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
