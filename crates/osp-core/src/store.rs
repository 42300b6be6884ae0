//! The `SurveyStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `osp-store-sqlite`).
//! The HTTP layer depends on this abstraction, never on a concrete backend.

use std::future::Future;

use crate::{
  ObjectId,
  response::Response,
  survey::{Survey, SurveyPatch, SurveySummary},
};

// ─── Pagination ──────────────────────────────────────────────────────────────

/// A skip/limit window over the survey listing. `limit == 0` means no limit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Page {
  pub skip:  u64,
  pub limit: u64,
}

impl Page {
  /// Every row.
  pub const ALL: Self = Self { skip: 0, limit: 0 };

  /// Derive a window from 1-based `page` and `limit` query parameters.
  ///
  /// Pagination is disabled (and everything returned) when either value is
  /// missing, not positive, or when `page > limit`.
  pub fn from_params(page: Option<i64>, limit: Option<i64>) -> Self {
    let (Some(page), Some(limit)) = (page, limit) else {
      return Self::ALL;
    };
    if page < 1 || limit < 1 || page > limit {
      return Self::ALL;
    }
    match page.checked_mul(limit) {
      Some(end) => Self { skip: (end - limit) as u64, limit: limit as u64 },
      None => Self::ALL,
    }
  }

  pub fn is_unbounded(&self) -> bool { self.limit == 0 }
}

// ─── Errors ──────────────────────────────────────────────────────────────────

/// Backend errors must say whether an insert collided on the survey token, so
/// callers can retry with a fresh one.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  fn is_duplicate_token(&self) -> bool;
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a survey store backend.
///
/// Each method is atomic on its own. Nothing spans calls, so a sequence of
/// calls can be interrupted part-way.
pub trait SurveyStore: Send + Sync {
  type Error: StoreError;

  // ── Surveys ───────────────────────────────────────────────────────────

  /// `{token, title}` of every survey in insertion order, windowed by `page`.
  fn list_surveys(
    &self,
    page: Page,
  ) -> impl Future<Output = Result<Vec<SurveySummary>, Self::Error>> + Send + '_;

  /// Persist a new survey. Fails with an error whose
  /// [`StoreError::is_duplicate_token`] is `true` if the token is taken.
  fn insert_survey<'a>(
    &'a self,
    survey: &'a Survey,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Retrieve a survey by id. Returns `None` if not found.
  fn get_survey(
    &self,
    id: ObjectId,
  ) -> impl Future<Output = Result<Option<Survey>, Self::Error>> + Send + '_;

  /// Retrieve a survey by exact token match. Returns `None` if not found.
  fn get_survey_by_token<'a>(
    &'a self,
    token: &'a str,
  ) -> impl Future<Output = Result<Option<Survey>, Self::Error>> + Send + 'a;

  /// Apply a field-level patch. Returns `false` if no survey has that id.
  fn update_survey(
    &self,
    id: ObjectId,
    patch: SurveyPatch,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Delete a survey together with every response that references it.
  ///
  /// Returns `None` if no survey was deleted, otherwise the number of
  /// responses removed alongside it.
  fn delete_survey(
    &self,
    id: ObjectId,
  ) -> impl Future<Output = Result<Option<u64>, Self::Error>> + Send + '_;

  // ── Responses ─────────────────────────────────────────────────────────

  fn insert_response<'a>(
    &'a self,
    response: &'a Response,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Responses in insertion order, optionally restricted to one survey.
  fn list_responses(
    &self,
    survey_id: Option<ObjectId>,
  ) -> impl Future<Output = Result<Vec<Response>, Self::Error>> + Send + '_;
}
