//! SQL schema for the OSP SQLite store.
//!
//! Executed once at connection startup. Idempotent, so reopening an existing
//! database is harmless.

/// Full schema DDL.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- Listing order is rowid order, i.e. insertion order.
CREATE TABLE IF NOT EXISTS surveys (
    survey_id      TEXT PRIMARY KEY,       -- 24-char hex object id
    token          TEXT NOT NULL,
    created_at     TEXT NOT NULL,          -- RFC 3339 UTC
    updated_at     TEXT NOT NULL,          -- RFC 3339 UTC
    title          TEXT NOT NULL,
    questions_json TEXT NOT NULL DEFAULT '[]'
);

CREATE UNIQUE INDEX IF NOT EXISTS surveys_token_idx ON surveys(token);

-- Responses are never updated. They are deleted only together with their
-- survey, so there is no foreign key: a submission racing a delete may leave
-- orphans, which every read tolerates.
CREATE TABLE IF NOT EXISTS responses (
    response_id   TEXT PRIMARY KEY,
    user_id       TEXT NOT NULL,
    created_at    TEXT NOT NULL,
    survey_id     TEXT NOT NULL,
    question_id   TEXT NOT NULL,
    response_text TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS responses_survey_idx ON responses(survey_id);

PRAGMA user_version = 1;
";
