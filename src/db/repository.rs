use std::str::FromStr;

use chrono::NaiveDateTime;
use rusqlite::{params, Connection};
use uuid::Uuid;

use super::DatabaseError;
use crate::models::enums::Gender;
use crate::models::{SubmissionIntake, SubmissionRecord, TriageAssessment};

/// Insert one submission and return the stored record.
///
/// The id and `created_at` are assigned here, not by the caller:
/// millisecond `strftime('now')` comes from the store's clock so
/// ordering stays consistent across clients with skewed clocks. The
/// record is written in a single INSERT, so there is no partial state.
pub fn insert_submission(
    conn: &Connection,
    owner_id: &str,
    intake: &SubmissionIntake,
    image_ref: &str,
    assessment: &TriageAssessment,
) -> Result<SubmissionRecord, DatabaseError> {
    let id = Uuid::new_v4();
    let assessment_json = serde_json::to_string(assessment)?;

    conn.execute(
        "INSERT INTO submissions
         (id, owner_id, symptoms, age, gender, temperature, blood_pressure,
          image_ref, assessment, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9,
                 strftime('%Y-%m-%d %H:%M:%f', 'now'))",
        params![
            id.to_string(),
            owner_id,
            intake.symptoms,
            intake.age,
            intake.gender.map(|g| g.as_str()).unwrap_or(""),
            intake.temperature,
            intake.blood_pressure,
            image_ref,
            assessment_json,
        ],
    )?;

    get_submission(conn, &id)?.ok_or_else(|| {
        DatabaseError::ConstraintViolation(format!("submission {id} vanished after insert"))
    })
}

pub fn get_submission(
    conn: &Connection,
    id: &Uuid,
) -> Result<Option<SubmissionRecord>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, owner_id, symptoms, age, gender, temperature, blood_pressure,
         image_ref, assessment, created_at
         FROM submissions WHERE id = ?1",
    )?;

    let result = stmt.query_row(params![id.to_string()], row_to_raw);

    match result {
        Ok(row) => Ok(Some(submission_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// List a user's submissions, newest first.
///
/// KNOWN LIMITATION: `search_term` is a lexicographic range match on the
/// `symptoms` column (`symptoms >= search_term`), i.e. a prefix-style
/// filter under the store's ordering. It is NOT substring or full-text
/// search. An empty term returns everything.
pub fn list_submissions(
    conn: &Connection,
    owner_id: &str,
    search_term: &str,
) -> Result<Vec<SubmissionRecord>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, owner_id, symptoms, age, gender, temperature, blood_pressure,
         image_ref, assessment, created_at
         FROM submissions
         WHERE owner_id = ?1 AND (?2 = '' OR symptoms >= ?2)
         ORDER BY created_at DESC, rowid DESC",
    )?;

    let rows = stmt
        .query_map(params![owner_id, search_term], row_to_raw)?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter().map(submission_from_row).collect()
}

struct SubmissionRow {
    id: String,
    owner_id: String,
    symptoms: String,
    age: String,
    gender: String,
    temperature: String,
    blood_pressure: String,
    image_ref: String,
    assessment: String,
    created_at: String,
}

fn row_to_raw(row: &rusqlite::Row<'_>) -> rusqlite::Result<SubmissionRow> {
    Ok(SubmissionRow {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        symptoms: row.get(2)?,
        age: row.get(3)?,
        gender: row.get(4)?,
        temperature: row.get(5)?,
        blood_pressure: row.get(6)?,
        image_ref: row.get(7)?,
        assessment: row.get(8)?,
        created_at: row.get(9)?,
    })
}

fn submission_from_row(row: SubmissionRow) -> Result<SubmissionRecord, DatabaseError> {
    let gender = if row.gender.is_empty() {
        None
    } else {
        Some(Gender::from_str(&row.gender)?)
    };

    Ok(SubmissionRecord {
        id: Uuid::parse_str(&row.id)
            .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        owner_id: row.owner_id,
        symptoms: row.symptoms,
        age: row.age,
        gender,
        temperature: row.temperature,
        blood_pressure: row.blood_pressure,
        image_ref: row.image_ref,
        assessment: serde_json::from_str(&row.assessment)?,
        created_at: parse_created_at(&row.created_at),
    })
}

/// A corrupt timestamp must not fail the whole listing, but it must
/// not pass silently either: the row sorts to the end as epoch zero.
fn parse_created_at(raw: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S"))
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, value = raw, "unparseable created_at, defaulting to epoch");
            NaiveDateTime::default()
        })
}
