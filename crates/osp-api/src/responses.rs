//! Handlers for `/responses` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/responses/:survey_id` | Body: `[ResponseInput]`; returns 201 + the input echoed |
//! | `GET`  | `/responses` | Every response, unfiltered |
//! | `GET`  | `/responses/:survey_id` | Responses of one survey; `[]` if none |

use axum::{
  Json,
  body::Bytes,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::Utc;
use osp_core::{ObjectId, response::{Response, ResponseInput}, store::SurveyStore};

use crate::{
  AppState, deadline, decode_body, ensure_survey_exists, error::ApiError,
  parse_survey_id, store_call,
};

// ─── Submit ───────────────────────────────────────────────────────────────────

/// `POST /responses/:survey_id`
///
/// Every entry of the batch shares one fresh respondent id. Entries are stored
/// one by one; an invalid entry aborts the rest of the batch but does not undo
/// the entries already stored.
pub async fn submit<S>(
  State(state): State<AppState<S>>,
  Path(survey_id): Path<String>,
  body: Bytes,
) -> Result<impl IntoResponse, ApiError>
where
  S: SurveyStore,
{
  let survey_id = parse_survey_id(&survey_id)?;
  ensure_survey_exists(&state, survey_id).await?;

  let inputs: Vec<ResponseInput> = decode_body(&body)?;
  let user_id = ObjectId::new();
  tracing::debug!(%survey_id, %user_id, entries = inputs.len(), "submit responses");

  for (index, input) in inputs.iter().enumerate() {
    if let Err(e) = input.validate() {
      tracing::debug!(%survey_id, index, "rejecting invalid entry");
      return Err(e.into());
    }

    let response = input.to_response(survey_id, user_id, Utc::now());
    deadline(state.settings.db_timeout, state.store.insert_response(&response))
      .await?
      .map_err(|e| {
        tracing::error!(error = %e, %survey_id, index, "failed to store response");
        ApiError::Internal("Failed to submit response".into())
      })?;
  }

  Ok((StatusCode::CREATED, Json(inputs)))
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /responses`
pub async fn list_all<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<Response>>, ApiError>
where
  S: SurveyStore,
{
  tracing::debug!("list all responses");
  let responses =
    store_call(state.settings.db_timeout, state.store.list_responses(None)).await?;
  Ok(Json(responses))
}

/// `GET /responses/:survey_id` — no check that the survey itself exists.
pub async fn list_by_survey<S>(
  State(state): State<AppState<S>>,
  Path(survey_id): Path<String>,
) -> Result<Json<Vec<Response>>, ApiError>
where
  S: SurveyStore,
{
  let survey_id = parse_survey_id(&survey_id)?;
  tracing::debug!(%survey_id, "list responses by survey");

  let responses = store_call(
    state.settings.db_timeout,
    state.store.list_responses(Some(survey_id)),
  )
  .await?;
  Ok(Json(responses))
}
