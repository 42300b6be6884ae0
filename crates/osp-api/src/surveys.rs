//! Handlers for `/surveys` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/surveys` | Optional `?page=&limit=`; returns `{token,title}` only |
//! | `POST`   | `/surveys` | Body: [`NewSurvey`]; returns 201 + stored survey |
//! | `PUT`    | `/surveys/:survey_id` | Body: [`SurveyUpdate`]; title and/or questions |
//! | `DELETE` | `/surveys/:survey_id` | Also deletes the survey's responses |
//! | `GET`    | `/surveys/token/:token` | 404 if no survey has that token |

use axum::{
  Json,
  body::Bytes,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::Utc;
use osp_core::{
  store::{Page, StoreError as _, SurveyStore},
  survey::{NewSurvey, Survey, SurveySummary, SurveyUpdate},
  token, validate,
};
use serde::{Deserialize, Serialize};

use crate::{
  AppState, deadline, decode_body, ensure_survey_exists, error::ApiError,
  parse_survey_id, store_call,
};

/// How many tokens creation tries before giving up on collisions.
pub const TOKEN_ATTEMPTS: usize = 5;

/// Confirmation body for updates and deletes.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
  pub message: String,
}

impl Message {
  fn new(message: &str) -> Json<Self> { Json(Self { message: message.to_owned() }) }
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// Raw pagination parameters. Kept as strings so that garbage values disable
/// pagination instead of rejecting the request.
#[derive(Debug, Deserialize, Default)]
pub struct ListParams {
  pub page:  Option<String>,
  pub limit: Option<String>,
}

impl ListParams {
  fn page(&self) -> Page {
    let int = |v: &Option<String>| v.as_deref().and_then(|s| s.parse::<i64>().ok());
    Page::from_params(int(&self.page), int(&self.limit))
  }
}

/// `GET /surveys[?page=<n>&limit=<n>]`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<SurveySummary>>, ApiError>
where
  S: SurveyStore,
{
  let page = params.page();
  tracing::debug!(?page, "list surveys");

  let surveys =
    store_call(state.settings.db_timeout, state.store.list_surveys(page)).await?;
  Ok(Json(surveys))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /surveys` — returns 201 + the stored [`Survey`].
///
/// The token is retried on collision up to [`TOKEN_ATTEMPTS`] times.
pub async fn create<S>(
  State(state): State<AppState<S>>,
  body: Bytes,
) -> Result<impl IntoResponse, ApiError>
where
  S: SurveyStore,
{
  let input: NewSurvey = decode_body(&body)?;
  tracing::debug!(title = %input.title, questions = input.questions.len(), "create survey");

  validate::validate_new_survey(&input)?;
  let mut survey: Survey = input.into_survey(token::generate(), Utc::now());

  for attempt in 1..=TOKEN_ATTEMPTS {
    match deadline(state.settings.db_timeout, state.store.insert_survey(&survey)).await? {
      Ok(()) => {
        tracing::info!(id = %survey.id, token = %survey.token, "survey created");
        return Ok((StatusCode::CREATED, Json(survey)));
      }
      Err(e) if e.is_duplicate_token() => {
        tracing::warn!(token = %survey.token, attempt, "token collision, regenerating");
        survey.token = token::generate();
      }
      Err(e) => return Err(ApiError::Store(Box::new(e))),
    }
  }

  tracing::error!(attempts = TOKEN_ATTEMPTS, "could not allocate a unique survey token");
  Err(ApiError::Internal("Failed to create survey, please try again".into()))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /surveys/:survey_id` — merges a non-empty title and/or replaces the
/// question list.
///
/// Answer-count minimums are not re-checked here, only that every question
/// has a title and a type.
pub async fn update<S>(
  State(state): State<AppState<S>>,
  Path(survey_id): Path<String>,
  body: Bytes,
) -> Result<Json<Message>, ApiError>
where
  S: SurveyStore,
{
  let id = parse_survey_id(&survey_id)?;
  tracing::debug!(%id, "update survey");
  ensure_survey_exists(&state, id).await?;

  let input: SurveyUpdate = decode_body(&body)?;
  let patch = input.into_patch(Utc::now())?;

  let matched =
    store_call(state.settings.db_timeout, state.store.update_survey(id, patch)).await?;
  if !matched {
    // Deleted between the existence check and the write.
    return Err(ApiError::NotFound("No survey found".into()));
  }

  Ok(Message::new("survey updated"))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /surveys/:survey_id` — removes the survey and all its responses.
pub async fn delete_one<S>(
  State(state): State<AppState<S>>,
  Path(survey_id): Path<String>,
) -> Result<Json<Message>, ApiError>
where
  S: SurveyStore,
{
  let id = parse_survey_id(&survey_id)?;
  tracing::debug!(%id, "delete survey");

  let responses = store_call(state.settings.db_timeout, state.store.delete_survey(id))
    .await?
    .ok_or_else(|| {
      ApiError::Internal(
        "Failed to delete survey, survey might have already removed".into(),
      )
    })?;

  tracing::info!(%id, responses, "survey deleted");
  Ok(Message::new("survey deleted"))
}

// ─── Get by token ─────────────────────────────────────────────────────────────

/// `GET /surveys/token/:token`
pub async fn get_by_token<S>(
  State(state): State<AppState<S>>,
  Path(token): Path<String>,
) -> Result<Json<Survey>, ApiError>
where
  S: SurveyStore,
{
  tracing::debug!(%token, "get survey by token");

  let survey = store_call(
    state.settings.lookup_timeout,
    state.store.get_survey_by_token(&token),
  )
  .await?;

  match survey {
    Some(survey) => Ok(Json(survey)),
    None => {
      tracing::warn!(%token, "no survey found");
      Err(ApiError::NotFound("survey not found".into()))
    }
  }
}
