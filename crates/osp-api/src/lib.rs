//! JSON REST API for the OSP survey service.
//!
//! Exposes an axum [`Router`] backed by any [`osp_core::store::SurveyStore`].
//! Transport, tracing layers and configuration are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = osp_api::api_router(AppState::new(store, ApiSettings::default()));
//! ```

pub mod error;
pub mod responses;
pub mod surveys;

use std::{future::Future, sync::Arc, time::Duration};

use axum::{
  Router,
  routing::{get, put},
};
use osp_core::{ObjectId, store::SurveyStore};
use serde::de::DeserializeOwned;

pub use error::ApiError;

// ─── Settings & state ────────────────────────────────────────────────────────

/// Per-call deadlines for store operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiSettings {
  /// Bound on every store call except token lookups.
  pub db_timeout:     Duration,
  /// Bound on the public token lookup.
  pub lookup_timeout: Duration,
}

impl Default for ApiSettings {
  fn default() -> Self {
    Self {
      db_timeout:     Duration::from_secs(5),
      lookup_timeout: Duration::from_secs(2),
    }
  }
}

/// Shared state threaded through all handlers.
#[derive(Clone)]
pub struct AppState<S: SurveyStore> {
  pub store:    Arc<S>,
  pub settings: ApiSettings,
}

impl<S: SurveyStore> AppState<S> {
  pub fn new(store: S, settings: ApiSettings) -> Self {
    Self { store: Arc::new(store), settings }
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build the API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: AppState<S>) -> Router<()>
where
  S: SurveyStore + Clone + 'static,
{
  Router::new()
    // Surveys
    .route("/surveys", get(surveys::list::<S>).post(surveys::create::<S>))
    .route(
      "/surveys/{survey_id}",
      put(surveys::update::<S>).delete(surveys::delete_one::<S>),
    )
    .route("/surveys/token/{token}", get(surveys::get_by_token::<S>))
    // Responses
    .route("/responses", get(responses::list_all::<S>))
    .route(
      "/responses/{survey_id}",
      get(responses::list_by_survey::<S>).post(responses::submit::<S>),
    )
    .with_state(state)
}

// ─── Shared helpers ──────────────────────────────────────────────────────────

/// Run a store call under `limit`, leaving its own result untouched.
pub(crate) async fn deadline<F: Future>(
  limit: Duration,
  fut: F,
) -> Result<F::Output, ApiError> {
  tokio::time::timeout(limit, fut)
    .await
    .map_err(|_| ApiError::Timeout(limit))
}

/// Run a store call under `limit`, mapping store failures to [`ApiError`].
pub(crate) async fn store_call<T, E, F>(limit: Duration, fut: F) -> Result<T, ApiError>
where
  F: Future<Output = Result<T, E>>,
  E: std::error::Error + Send + Sync + 'static,
{
  deadline(limit, fut)
    .await?
    .map_err(|e| ApiError::Store(Box::new(e)))
}

/// Decode a JSON request body. The `Content-Type` header is not consulted.
pub(crate) fn decode_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
  serde_json::from_slice(body).map_err(|e| ApiError::BadRequest(e.to_string()))
}

pub(crate) fn parse_survey_id(raw: &str) -> Result<ObjectId, ApiError> {
  ObjectId::parse_str(raw).map_err(|_| ApiError::BadRequest("Invalid Survey Id".into()))
}

/// Fail with 400 unless a survey with `id` exists.
pub(crate) async fn ensure_survey_exists<S: SurveyStore>(
  state: &AppState<S>,
  id: ObjectId,
) -> Result<(), ApiError> {
  store_call(state.settings.db_timeout, state.store.get_survey(id))
    .await?
    .map(|_| ())
    .ok_or_else(|| {
      ApiError::BadRequest(
        "the survey does not exist, please provide correct survey id".into(),
      )
    })
}
