use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::diary::{
    self, CreateDiaryEntryRequest, DiaryEntry, DiaryEntryChanges, UpdateDiaryEntryRequest,
};
use crate::schema::patient::diary_entries;
use crate::services::non_empty;

pub fn create(
    conn: &mut PgConnection,
    patient_uuid: Uuid,
    req: &CreateDiaryEntryRequest,
) -> ApiResult<DiaryEntry> {
    non_empty("body", &req.body)?;
    if let Some(score) = req.symptom_score {
        validate_score(score)?;
    }
    let row = req.to_entry(patient_uuid);
    Ok(diesel::insert_into(diary_entries::table)
        .values(&row)
        .returning(DiaryEntry::as_returning())
        .get_result(conn)?)
}

/// Newest entry first; diary reads are reverse-chronological everywhere.
pub fn list(conn: &mut PgConnection, patient_uuid: Uuid) -> ApiResult<Vec<DiaryEntry>> {
    Ok(diary_entries::table
        .filter(diary_entries::patient_uuid.eq(patient_uuid))
        .filter(diary::not_deleted())
        .order(diary_entries::entry_date.desc())
        .select(DiaryEntry::as_select())
        .load(conn)?)
}

pub fn get(conn: &mut PgConnection, patient_uuid: Uuid, entry_id: Uuid) -> ApiResult<DiaryEntry> {
    diary_entries::table
        .filter(diary_entries::id.eq(entry_id))
        .filter(diary_entries::patient_uuid.eq(patient_uuid))
        .filter(diary::not_deleted())
        .select(DiaryEntry::as_select())
        .first(conn)
        .optional()?
        .ok_or(ApiError::NotFound("diary entry"))
}

pub fn update(
    conn: &mut PgConnection,
    patient_uuid: Uuid,
    entry_id: Uuid,
    req: &UpdateDiaryEntryRequest,
) -> ApiResult<DiaryEntry> {
    if let Some(body) = &req.body {
        non_empty("body", body)?;
    }
    if let Some(score) = req.symptom_score {
        validate_score(score)?;
    }
    let changes = DiaryEntryChanges {
        entry_date: req.entry_date,
        mood: req.mood.clone(),
        symptom_score: req.symptom_score,
        body: req.body.as_deref().map(|b| b.trim().to_string()),
        updated_at: Utc::now(),
    };
    diesel::update(
        diary_entries::table
            .filter(diary_entries::id.eq(entry_id))
            .filter(diary_entries::patient_uuid.eq(patient_uuid))
            .filter(diary::not_deleted()),
    )
    .set(changes)
    .returning(DiaryEntry::as_returning())
    .get_result(conn)
    .optional()?
    .ok_or(ApiError::NotFound("diary entry"))
}

pub fn delete(conn: &mut PgConnection, patient_uuid: Uuid, entry_id: Uuid) -> ApiResult<()> {
    let affected = diesel::update(
        diary_entries::table
            .filter(diary_entries::id.eq(entry_id))
            .filter(diary_entries::patient_uuid.eq(patient_uuid)),
    )
    .set((
        diary_entries::is_deleted.eq(true),
        diary_entries::updated_at.eq(Utc::now()),
    ))
    .execute(conn)?;
    if affected == 0 {
        return Err(ApiError::NotFound("diary entry"));
    }
    Ok(())
}

/// Physician-facing view, association-checked by the caller.
pub fn list_for_patient(conn: &mut PgConnection, patient_uuid: Uuid) -> ApiResult<Vec<DiaryEntry>> {
    list(conn, patient_uuid)
}

fn validate_score(score: i32) -> ApiResult<()> {
    if !(0..=10).contains(&score) {
        return Err(ApiError::Validation(
            "symptom_score must be between 0 and 10".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symptom_score_is_bounded() {
        assert!(validate_score(0).is_ok());
        assert!(validate_score(10).is_ok());
        assert!(validate_score(-1).is_err());
        assert!(validate_score(11).is_err());
    }
}
