//! [`SqliteStore`] — the SQLite implementation of [`SurveyStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;

use osp_core::{
  ObjectId,
  response::Response,
  store::{Page, SurveyStore},
  survey::{Survey, SurveyPatch, SurveySummary},
};

use crate::{
  Error, Result,
  encode::{
    RESPONSE_COLUMNS, RawResponse, RawSurvey, SURVEY_COLUMNS, encode_dt,
    encode_id, encode_questions,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A survey store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

/// Whether `err` is the unique index on `surveys.token` firing. The survey id
/// is the primary key, which reports a different extended code.
fn is_token_conflict(err: &tokio_rusqlite::Error) -> bool {
  matches!(
    err,
    tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(e, _))
      if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
  )
}

// ─── SurveyStore impl ────────────────────────────────────────────────────────

impl SurveyStore for SqliteStore {
  type Error = Error;

  // ── Surveys ───────────────────────────────────────────────────────────────

  async fn list_surveys(&self, page: Page) -> Result<Vec<SurveySummary>> {
    // SQLite treats a negative LIMIT as "no limit".
    let limit = if page.is_unbounded() { -1 } else { page.limit as i64 };
    let offset = page.skip as i64;

    let summaries = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT token, title FROM surveys ORDER BY rowid LIMIT ?1 OFFSET ?2",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![limit, offset], |row| {
            Ok(SurveySummary { token: row.get(0)?, title: row.get(1)? })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(summaries)
  }

  async fn insert_survey(&self, survey: &Survey) -> Result<()> {
    let id_str         = encode_id(survey.id);
    let token          = survey.token.clone();
    let created_at_str = encode_dt(survey.created_at);
    let updated_at_str = encode_dt(survey.updated_at);
    let title          = survey.title.clone();
    let questions_str  = encode_questions(&survey.questions)?;

    let token_param = token.clone();
    let result = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO surveys (
             survey_id, token, created_at, updated_at, title, questions_json
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![
            id_str,
            token_param,
            created_at_str,
            updated_at_str,
            title,
            questions_str,
          ],
        )?;
        Ok(())
      })
      .await;

    match result {
      Ok(()) => Ok(()),
      Err(e) if is_token_conflict(&e) => Err(Error::DuplicateToken(token)),
      Err(e) => Err(e.into()),
    }
  }

  async fn get_survey(&self, id: ObjectId) -> Result<Option<Survey>> {
    let id_str = encode_id(id);

    let raw: Option<RawSurvey> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {SURVEY_COLUMNS} FROM surveys WHERE survey_id = ?1"),
            rusqlite::params![id_str],
            RawSurvey::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawSurvey::into_survey).transpose()
  }

  async fn get_survey_by_token(&self, token: &str) -> Result<Option<Survey>> {
    let token = token.to_owned();

    let raw: Option<RawSurvey> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {SURVEY_COLUMNS} FROM surveys WHERE token = ?1"),
            rusqlite::params![token],
            RawSurvey::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawSurvey::into_survey).transpose()
  }

  async fn update_survey(&self, id: ObjectId, patch: SurveyPatch) -> Result<bool> {
    let id_str         = encode_id(id);
    let title          = patch.title;
    let questions_str  = patch
      .questions
      .as_deref()
      .map(encode_questions)
      .transpose()?;
    let updated_at_str = encode_dt(patch.updated_at);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE surveys
             SET title          = COALESCE(?1, title),
                 questions_json = COALESCE(?2, questions_json),
                 updated_at     = ?3
           WHERE survey_id = ?4",
          rusqlite::params![title, questions_str, updated_at_str, id_str],
        )?)
      })
      .await?;

    Ok(changed > 0)
  }

  async fn delete_survey(&self, id: ObjectId) -> Result<Option<u64>> {
    let id_str = encode_id(id);

    let removed = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let deleted = tx.execute(
          "DELETE FROM surveys WHERE survey_id = ?1",
          rusqlite::params![id_str],
        )?;
        if deleted == 0 {
          return Ok(None);
        }
        let responses = tx.execute(
          "DELETE FROM responses WHERE survey_id = ?1",
          rusqlite::params![id_str],
        )?;
        tx.commit()?;
        Ok(Some(responses as u64))
      })
      .await?;

    Ok(removed)
  }

  // ── Responses ─────────────────────────────────────────────────────────────

  async fn insert_response(&self, response: &Response) -> Result<()> {
    let id_str          = encode_id(response.id);
    let user_id_str     = encode_id(response.user_id);
    let created_at_str  = encode_dt(response.created_at);
    let survey_id_str   = encode_id(response.survey_id);
    let question_id_str = encode_id(response.question_id);
    let text            = response.response_text.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO responses (
             response_id, user_id, created_at, survey_id, question_id, response_text
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![
            id_str,
            user_id_str,
            created_at_str,
            survey_id_str,
            question_id_str,
            text,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn list_responses(&self, survey_id: Option<ObjectId>) -> Result<Vec<Response>> {
    let survey_id_str = survey_id.map(encode_id);

    let raws: Vec<RawResponse> = self
      .conn
      .call(move |conn| {
        let rows = if let Some(sid) = survey_id_str {
          let mut stmt = conn.prepare(&format!(
            "SELECT {RESPONSE_COLUMNS} FROM responses WHERE survey_id = ?1 ORDER BY rowid"
          ))?;
          stmt
            .query_map(rusqlite::params![sid], RawResponse::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        } else {
          let mut stmt = conn.prepare(&format!(
            "SELECT {RESPONSE_COLUMNS} FROM responses ORDER BY rowid"
          ))?;
          stmt
            .query_map([], RawResponse::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawResponse::into_response).collect()
  }
}
