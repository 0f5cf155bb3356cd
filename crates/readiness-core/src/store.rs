//! Persistent storage for users, assessments and responses using redb.
//!
//! # Table design
//!
//! Records are JSON-encoded values keyed by raw UUID bytes, except responses,
//! which use a 20-byte composite key:
//! ```text
//! [ assessment uuid: 16 bytes | question id: u32 big-endian (4 bytes) ]
//! ```
//!
//! All responses of one assessment share the 16-byte prefix, so a single
//! range scan returns them in catalog order. Because the question id is part
//! of the key, recording the same question twice replaces the earlier answer.

use std::path::Path;

use chrono::{DateTime, Utc};
use redb::{Database, ReadableTable, TableDefinition};
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::assessment::{Assessment, Response};
use crate::catalog::Catalog;
use crate::error::{ReadinessError, Result};
use crate::scoring;
use crate::user::User;

// ---------------------------------------------------------------------------
// Table definitions
// ---------------------------------------------------------------------------

/// Key: user uuid bytes. Value: JSON-encoded User.
const USERS: TableDefinition<&[u8], &[u8]> = TableDefinition::new("users");

/// Key: normalized email. Value: user uuid bytes.
const USER_EMAILS: TableDefinition<&str, &[u8]> = TableDefinition::new("user_emails");

/// Key: assessment uuid bytes. Value: JSON-encoded Assessment.
const ASSESSMENTS: TableDefinition<&[u8], &[u8]> = TableDefinition::new("assessments");

/// Key: 20-byte composite (assessment uuid ++ question id). Value: JSON-encoded Response.
const RESPONSES: TableDefinition<&[u8], &[u8]> = TableDefinition::new("responses");

// ---------------------------------------------------------------------------
// Key and codec helpers
// ---------------------------------------------------------------------------

fn response_key(assessment_id: Uuid, question_id: u32) -> [u8; 20] {
    let mut key = [0u8; 20];
    key[..16].copy_from_slice(assessment_id.as_bytes());
    key[16..].copy_from_slice(&question_id.to_be_bytes());
    key
}

fn db_err(e: impl std::fmt::Display) -> ReadinessError {
    ReadinessError::Store(e.to_string())
}

fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(value)?)
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    Ok(serde_json::from_slice(bytes)?)
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

pub struct Store {
    db: Database,
}

impl Store {
    /// Open or create the redb database at `path`, creating every table.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::create(path).map_err(db_err)?;
        let wt = db.begin_write().map_err(db_err)?;
        wt.open_table(USERS).map_err(db_err)?;
        wt.open_table(USER_EMAILS).map_err(db_err)?;
        wt.open_table(ASSESSMENTS).map_err(db_err)?;
        wt.open_table(RESPONSES).map_err(db_err)?;
        wt.commit().map_err(db_err)?;
        Ok(Self { db })
    }

    // -----------------------------------------------------------------------
    // Users
    // -----------------------------------------------------------------------

    /// Insert a new user. Fails with `UserExists` if the email is taken.
    pub fn create_user(&self, user: &User) -> Result<()> {
        let value = encode(user)?;
        let wt = self.db.begin_write().map_err(db_err)?;
        {
            let mut emails = wt.open_table(USER_EMAILS).map_err(db_err)?;
            let taken = emails.get(user.email.as_str()).map_err(db_err)?.is_some();
            if taken {
                return Err(ReadinessError::UserExists(user.email.clone()));
            }
            emails
                .insert(user.email.as_str(), user.id.as_bytes().as_slice())
                .map_err(db_err)?;

            let mut users = wt.open_table(USERS).map_err(db_err)?;
            users
                .insert(user.id.as_bytes().as_slice(), value.as_slice())
                .map_err(db_err)?;
        }
        wt.commit().map_err(db_err)?;
        Ok(())
    }

    pub fn user(&self, id: Uuid) -> Result<User> {
        let rt = self.db.begin_read().map_err(db_err)?;
        let users = rt.open_table(USERS).map_err(db_err)?;
        let guard = users
            .get(id.as_bytes().as_slice())
            .map_err(db_err)?
            .ok_or_else(|| ReadinessError::UserNotFound(id.to_string()))?;
        decode(guard.value())
    }

    /// Look a user up by (already normalized) email.
    pub fn user_by_email(&self, email: &str) -> Result<Option<User>> {
        let rt = self.db.begin_read().map_err(db_err)?;
        let emails = rt.open_table(USER_EMAILS).map_err(db_err)?;
        let Some(id_guard) = emails.get(email).map_err(db_err)? else {
            return Ok(None);
        };
        let id_bytes = id_guard.value().to_vec();
        drop(id_guard);

        let users = rt.open_table(USERS).map_err(db_err)?;
        let guard = users
            .get(id_bytes.as_slice())
            .map_err(db_err)?
            .ok_or_else(|| ReadinessError::UserNotFound(email.to_string()))?;
        Ok(Some(decode(guard.value())?))
    }

    // -----------------------------------------------------------------------
    // Assessments
    // -----------------------------------------------------------------------

    /// Insert a freshly started assessment. Fails if the id is already taken.
    pub fn insert_assessment(&self, assessment: &Assessment) -> Result<()> {
        let value = encode(assessment)?;
        let wt = self.db.begin_write().map_err(db_err)?;
        {
            let mut table = wt.open_table(ASSESSMENTS).map_err(db_err)?;
            let key = assessment.id.as_bytes().as_slice();
            let taken = table.get(key).map_err(db_err)?.is_some();
            if taken {
                return Err(ReadinessError::InvalidState(format!(
                    "assessment {} already exists",
                    assessment.id
                )));
            }
            table.insert(key, value.as_slice()).map_err(db_err)?;
        }
        wt.commit().map_err(db_err)?;
        Ok(())
    }

    /// Insert or overwrite an assessment record.
    pub fn save_assessment(&self, assessment: &Assessment) -> Result<()> {
        let value = encode(assessment)?;
        let wt = self.db.begin_write().map_err(db_err)?;
        {
            let mut table = wt.open_table(ASSESSMENTS).map_err(db_err)?;
            table
                .insert(assessment.id.as_bytes().as_slice(), value.as_slice())
                .map_err(db_err)?;
        }
        wt.commit().map_err(db_err)?;
        Ok(())
    }

    pub fn assessment(&self, id: Uuid) -> Result<Assessment> {
        let rt = self.db.begin_read().map_err(db_err)?;
        let table = rt.open_table(ASSESSMENTS).map_err(db_err)?;
        let guard = table
            .get(id.as_bytes().as_slice())
            .map_err(db_err)?
            .ok_or_else(|| ReadinessError::AssessmentNotFound(id.to_string()))?;
        decode(guard.value())
    }

    /// All assessments, newest first.
    pub fn list_assessments(&self) -> Result<Vec<Assessment>> {
        let rt = self.db.begin_read().map_err(db_err)?;
        let table = rt.open_table(ASSESSMENTS).map_err(db_err)?;

        let mut result = Vec::new();
        for entry in table.iter().map_err(db_err)? {
            let (_, v) = entry.map_err(db_err)?;
            result.push(decode::<Assessment>(v.value())?);
        }
        result.sort_by(|a, b| b.start_date.cmp(&a.start_date));
        Ok(result)
    }

    /// The assessments owned by `user_id`, newest first.
    pub fn assessments_for(&self, user_id: Uuid) -> Result<Vec<Assessment>> {
        let mut all = self.list_assessments()?;
        all.retain(|a| a.owned_by(user_id));
        Ok(all)
    }

    // -----------------------------------------------------------------------
    // Responses
    // -----------------------------------------------------------------------

    /// Persist a page of responses together with the assessment's advanced
    /// cursor, in one write transaction.
    ///
    /// `from_cursor` is the cursor the page was built from. The stored record
    /// must still be in progress at that cursor, otherwise the page is stale
    /// and `InvalidState` is returned. Only the cursor of the stored record
    /// is updated.
    pub fn record_responses(
        &self,
        assessment: &Assessment,
        from_cursor: u32,
        responses: &[Response],
    ) -> Result<()> {
        let wt = self.db.begin_write().map_err(db_err)?;
        {
            let mut assessments = wt.open_table(ASSESSMENTS).map_err(db_err)?;
            let mut stored: Assessment = {
                let guard = assessments
                    .get(assessment.id.as_bytes().as_slice())
                    .map_err(db_err)?
                    .ok_or_else(|| ReadinessError::AssessmentNotFound(assessment.id.to_string()))?;
                decode(guard.value())?
            };
            if stored.is_complete() {
                return Err(ReadinessError::InvalidState(format!(
                    "assessment {} is already complete",
                    stored.id
                )));
            }
            if stored.current_question != from_cursor {
                return Err(ReadinessError::InvalidState(format!(
                    "assessment {} moved to question {} before this page was recorded",
                    stored.id, stored.current_question
                )));
            }
            stored.current_question = assessment.current_question;
            let value = encode(&stored)?;
            assessments
                .insert(stored.id.as_bytes().as_slice(), value.as_slice())
                .map_err(db_err)?;

            let mut table = wt.open_table(RESPONSES).map_err(db_err)?;
            for response in responses {
                let key = response_key(response.assessment_id, response.question_id);
                let value = encode(response)?;
                table
                    .insert(key.as_slice(), value.as_slice())
                    .map_err(db_err)?;
            }
        }
        wt.commit().map_err(db_err)?;
        Ok(())
    }

    /// Responses of one assessment in question order.
    pub fn responses(&self, assessment_id: Uuid) -> Result<Vec<Response>> {
        let rt = self.db.begin_read().map_err(db_err)?;
        let table = rt.open_table(RESPONSES).map_err(db_err)?;
        collect_responses(&table, assessment_id)
    }

    // -----------------------------------------------------------------------
    // Finalization
    // -----------------------------------------------------------------------

    /// Score an assessment from its recorded responses and mark it complete.
    ///
    /// Responses are read inside the same write transaction that commits the
    /// result, so no page can land between scoring and the status change.
    /// Completing an already complete assessment returns it unchanged.
    pub fn finalize(
        &self,
        assessment_id: Uuid,
        catalog: &Catalog,
        now: DateTime<Utc>,
    ) -> Result<Assessment> {
        let wt = self.db.begin_write().map_err(db_err)?;
        let assessment = {
            let mut assessments = wt.open_table(ASSESSMENTS).map_err(db_err)?;
            let mut assessment: Assessment = {
                let guard = assessments
                    .get(assessment_id.as_bytes().as_slice())
                    .map_err(db_err)?
                    .ok_or_else(|| ReadinessError::AssessmentNotFound(assessment_id.to_string()))?;
                decode(guard.value())?
            };
            if assessment.is_complete() {
                return Ok(assessment);
            }

            let responses_table = wt.open_table(RESPONSES).map_err(db_err)?;
            let responses = collect_responses(&responses_table, assessment_id)?;
            let card = scoring::score(catalog, &responses);
            assessment.finalize(&card, now);

            let value = encode(&assessment)?;
            assessments
                .insert(assessment_id.as_bytes().as_slice(), value.as_slice())
                .map_err(db_err)?;
            assessment
        };
        wt.commit().map_err(db_err)?;
        Ok(assessment)
    }
}

fn collect_responses<T>(table: &T, assessment_id: Uuid) -> Result<Vec<Response>>
where
    T: ReadableTable<&'static [u8], &'static [u8]>,
{
    let lower = response_key(assessment_id, 0);
    let upper = response_key(assessment_id, u32::MAX);

    let mut result = Vec::new();
    for entry in table
        .range(lower.as_slice()..=upper.as_slice())
        .map_err(db_err)?
    {
        let (_, v) = entry.map_err(db_err)?;
        result.push(decode::<Response>(v.value())?);
    }
    Ok(result)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
