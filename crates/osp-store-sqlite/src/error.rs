//! Error type for `osp-store-sqlite`.

use osp_core::store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] osp_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// The unique index on `surveys.token` rejected an insert.
  #[error("survey token {0:?} is already taken")]
  DuplicateToken(String),
}

impl StoreError for Error {
  fn is_duplicate_token(&self) -> bool { matches!(self, Self::DuplicateToken(_)) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
