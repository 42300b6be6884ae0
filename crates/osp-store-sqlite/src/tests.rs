//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{Duration, Utc};
use osp_core::{
  ObjectId,
  response::{Response, ResponseInput},
  store::{Page, StoreError as _, SurveyStore},
  survey::{NewQuestion, NewSurvey, QuestionType, Survey, SurveyPatch},
  token,
};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn survey(title: &str) -> Survey {
  NewSurvey {
    title:     title.into(),
    questions: vec![
      NewQuestion {
        question_title: "Favourite colour?".into(),
        question_type:  QuestionType::MultipleChoice,
        answers:        vec!["red".into(), "blue".into()],
      },
      NewQuestion {
        question_title: "Anything else?".into(),
        question_type:  QuestionType::PlainText,
        answers:        vec![],
      },
    ],
  }
  .into_survey(token::generate(), Utc::now())
}

fn response(survey_id: ObjectId, user_id: ObjectId, text: &str) -> Response {
  ResponseInput { question_id: ObjectId::new(), response_text: text.into() }
    .to_response(survey_id, user_id, Utc::now())
}

// ─── Surveys ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_and_get_survey() {
  let s = store().await;
  let original = survey("Team lunch");
  s.insert_survey(&original).await.unwrap();

  let fetched = s.get_survey(original.id).await.unwrap().unwrap();
  assert_eq!(fetched, original);
}

#[tokio::test]
async fn get_survey_missing_returns_none() {
  let s = store().await;
  assert!(s.get_survey(ObjectId::new()).await.unwrap().is_none());
}

#[tokio::test]
async fn get_by_token_matches_exactly() {
  let s = store().await;
  let original = survey("Offsite");
  s.insert_survey(&original).await.unwrap();

  let fetched = s.get_survey_by_token(&original.token).await.unwrap().unwrap();
  assert_eq!(fetched.id, original.id);
  assert_eq!(fetched.questions, original.questions);

  let other_case = original.token.to_ascii_uppercase();
  if other_case != original.token {
    assert!(s.get_survey_by_token(&other_case).await.unwrap().is_none());
  }
}

#[tokio::test]
async fn duplicate_token_is_rejected() {
  let s = store().await;
  let first = survey("First");
  s.insert_survey(&first).await.unwrap();

  let mut second = survey("Second");
  second.token = first.token.clone();
  let err = s.insert_survey(&second).await.unwrap_err();
  assert!(matches!(err, Error::DuplicateToken(ref t) if *t == first.token));
  assert!(err.is_duplicate_token());

  // Nothing was written for the rejected survey.
  assert!(s.get_survey(second.id).await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_id_is_not_a_token_conflict() {
  let s = store().await;
  let first = survey("First");
  s.insert_survey(&first).await.unwrap();

  let mut clash = survey("Clash");
  clash.id = first.id;
  let err = s.insert_survey(&clash).await.unwrap_err();
  assert!(!err.is_duplicate_token(), "unexpected: {err}");
}

#[tokio::test]
async fn list_surveys_pages_in_insertion_order() {
  let s = store().await;
  for i in 0..15 {
    s.insert_survey(&survey(&format!("survey {i:02}"))).await.unwrap();
  }

  let all = s.list_surveys(Page::ALL).await.unwrap();
  assert_eq!(all.len(), 15);
  assert_eq!(all[0].title, "survey 00");

  let first = s.list_surveys(Page::from_params(Some(1), Some(10))).await.unwrap();
  assert_eq!(first.len(), 10);
  assert_eq!(first[9].title, "survey 09");

  let second = s.list_surveys(Page::from_params(Some(2), Some(10))).await.unwrap();
  let titles: Vec<_> = second.iter().map(|x| x.title.as_str()).collect();
  assert_eq!(titles, ["survey 10", "survey 11", "survey 12", "survey 13", "survey 14"]);
}

#[tokio::test]
async fn list_surveys_empty_store() {
  let s = store().await;
  assert!(s.list_surveys(Page::ALL).await.unwrap().is_empty());
}

#[tokio::test]
async fn update_title_keeps_questions() {
  let s = store().await;
  let original = survey("Before");
  s.insert_survey(&original).await.unwrap();

  let later = original.updated_at + Duration::seconds(10);
  let patch = SurveyPatch { title: Some("After".into()), questions: None, updated_at: later };
  assert!(s.update_survey(original.id, patch).await.unwrap());

  let fetched = s.get_survey(original.id).await.unwrap().unwrap();
  assert_eq!(fetched.title, "After");
  assert_eq!(fetched.questions, original.questions);
  assert_eq!(fetched.created_at, original.created_at);
  assert_eq!(fetched.updated_at, later);
  assert_eq!(fetched.token, original.token);
}

#[tokio::test]
async fn update_questions_replaces_list() {
  let s = store().await;
  let original = survey("Quiz");
  s.insert_survey(&original).await.unwrap();

  let replacement = vec![original.questions[1].clone()];
  let patch = SurveyPatch {
    title:      None,
    questions:  Some(replacement.clone()),
    updated_at: Utc::now(),
  };
  assert!(s.update_survey(original.id, patch).await.unwrap());

  let fetched = s.get_survey(original.id).await.unwrap().unwrap();
  assert_eq!(fetched.title, "Quiz");
  assert_eq!(fetched.questions, replacement);
}

#[tokio::test]
async fn update_missing_survey_matches_nothing() {
  let s = store().await;
  let patch = SurveyPatch { title: Some("x".into()), questions: None, updated_at: Utc::now() };
  assert!(!s.update_survey(ObjectId::new(), patch).await.unwrap());
  assert!(s.list_surveys(Page::ALL).await.unwrap().is_empty());
}

// ─── Responses ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_responses_filters_by_survey() {
  let s = store().await;
  let a = survey("A");
  let b = survey("B");
  s.insert_survey(&a).await.unwrap();
  s.insert_survey(&b).await.unwrap();

  let user = ObjectId::new();
  s.insert_response(&response(a.id, user, "one")).await.unwrap();
  s.insert_response(&response(a.id, user, "two")).await.unwrap();
  s.insert_response(&response(b.id, ObjectId::new(), "three")).await.unwrap();

  let all = s.list_responses(None).await.unwrap();
  assert_eq!(all.len(), 3);

  let for_a = s.list_responses(Some(a.id)).await.unwrap();
  let texts: Vec<_> = for_a.iter().map(|r| r.response_text.as_str()).collect();
  assert_eq!(texts, ["one", "two"]);
  assert!(for_a.iter().all(|r| r.user_id == user));

  assert!(s.list_responses(Some(ObjectId::new())).await.unwrap().is_empty());
}

#[tokio::test]
async fn response_round_trips() {
  let s = store().await;
  let a = survey("A");
  s.insert_survey(&a).await.unwrap();
  let r = response(a.id, ObjectId::new(), "hello");
  s.insert_response(&r).await.unwrap();

  let fetched = s.list_responses(Some(a.id)).await.unwrap();
  assert_eq!(fetched, vec![r]);
}

// ─── Delete ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_cascades_to_own_responses_only() {
  let s = store().await;
  let doomed = survey("Doomed");
  let kept = survey("Kept");
  s.insert_survey(&doomed).await.unwrap();
  s.insert_survey(&kept).await.unwrap();

  for i in 0..3 {
    s.insert_response(&response(doomed.id, ObjectId::new(), &format!("r{i}"))).await.unwrap();
  }
  s.insert_response(&response(kept.id, ObjectId::new(), "stay")).await.unwrap();

  assert_eq!(s.delete_survey(doomed.id).await.unwrap(), Some(3));
  assert!(s.get_survey(doomed.id).await.unwrap().is_none());
  assert!(s.list_responses(Some(doomed.id)).await.unwrap().is_empty());
  assert_eq!(s.list_responses(Some(kept.id)).await.unwrap().len(), 1);
  assert!(s.get_survey(kept.id).await.unwrap().is_some());
}

#[tokio::test]
async fn delete_missing_survey_returns_none() {
  let s = store().await;
  assert_eq!(s.delete_survey(ObjectId::new()).await.unwrap(), None);
}

#[tokio::test]
async fn delete_twice_reports_already_removed() {
  let s = store().await;
  let a = survey("A");
  s.insert_survey(&a).await.unwrap();
  assert_eq!(s.delete_survey(a.id).await.unwrap(), Some(0));
  assert_eq!(s.delete_survey(a.id).await.unwrap(), None);
}

// ─── Persistence ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn reopening_a_file_keeps_data() {
  let path = std::env::temp_dir().join(format!("osp-store-{}.db", ObjectId::new()));
  let original = survey("Durable");
  {
    let s = SqliteStore::open(&path).await.unwrap();
    s.insert_survey(&original).await.unwrap();
  }
  let s = SqliteStore::open(&path).await.unwrap();
  let fetched = s.get_survey_by_token(&original.token).await.unwrap().unwrap();
  assert_eq!(fetched, original);
  drop(s);
  for suffix in ["", "-wal", "-shm"] {
    let _ = std::fs::remove_file(format!("{}{suffix}", path.display()));
  }
}
