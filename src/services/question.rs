//! Question sharing and visibility.
//!
//! Only the owning patient may mutate a question; physician-facing reads see
//! shared, non-deleted rows only. Deletes are soft and idempotent in effect.

use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::question::{
    self, CreateQuestionRequest, PatientQuestion, QuestionChanges, UpdateQuestionRequest,
};
use crate::schema::patient::patient_questions;
use crate::services::non_empty;

/// Input checks, shared by the HTTP edge (which fails fast, before a pooled
/// connection is taken) and `create` itself.
pub fn validate_create(req: &CreateQuestionRequest) -> ApiResult<()> {
    non_empty("question_text", &req.question_text)
}

pub fn validate_update(req: &UpdateQuestionRequest) -> ApiResult<()> {
    match &req.question_text {
        Some(text) => non_empty("question_text", text),
        None => Ok(()),
    }
}

pub fn create(
    conn: &mut PgConnection,
    patient_uuid: Uuid,
    req: &CreateQuestionRequest,
) -> ApiResult<PatientQuestion> {
    validate_create(req)?;
    let row = req.to_question(patient_uuid);
    let created = diesel::insert_into(patient_questions::table)
        .values(&row)
        .returning(PatientQuestion::as_returning())
        .get_result(conn)?;
    tracing::info!(question_id = %row.id, "question created");
    Ok(created)
}

/// Non-deleted questions of the owner in creation order, optionally only the
/// ones shared with the physician.
pub fn list(
    conn: &mut PgConnection,
    patient_uuid: Uuid,
    shared_only: bool,
) -> ApiResult<Vec<PatientQuestion>> {
    let mut query = patient_questions::table
        .filter(patient_questions::patient_uuid.eq(patient_uuid))
        .filter(question::not_deleted())
        .order(patient_questions::created_at.asc())
        .select(PatientQuestion::as_select())
        .into_boxed();
    if shared_only {
        query = query.filter(question::shared());
    }
    Ok(query.load(conn)?)
}

pub fn get(
    conn: &mut PgConnection,
    patient_uuid: Uuid,
    question_id: Uuid,
) -> ApiResult<PatientQuestion> {
    patient_questions::table
        .filter(patient_questions::id.eq(question_id))
        .filter(patient_questions::patient_uuid.eq(patient_uuid))
        .filter(question::not_deleted())
        .select(PatientQuestion::as_select())
        .first(conn)
        .optional()?
        .ok_or(ApiError::NotFound("question"))
}

pub fn update(
    conn: &mut PgConnection,
    patient_uuid: Uuid,
    question_id: Uuid,
    req: &UpdateQuestionRequest,
) -> ApiResult<PatientQuestion> {
    validate_update(req)?;
    let changes = QuestionChanges {
        question_text: req.question_text.as_deref().map(|t| t.trim().to_string()),
        category: req.category.clone(),
        share_with_physician: req.share_with_physician,
        is_answered: req.is_answered,
        updated_at: Utc::now(),
    };
    diesel::update(
        patient_questions::table
            .filter(patient_questions::id.eq(question_id))
            .filter(patient_questions::patient_uuid.eq(patient_uuid))
            .filter(question::not_deleted()),
    )
    .set(changes)
    .returning(PatientQuestion::as_returning())
    .get_result(conn)
    .optional()?
    .ok_or(ApiError::NotFound("question"))
}

/// Soft delete. Deliberately does not filter on `is_deleted`: deleting twice
/// succeeds, and the row stays invisible to every list.
pub fn delete(conn: &mut PgConnection, patient_uuid: Uuid, question_id: Uuid) -> ApiResult<()> {
    let affected = diesel::update(
        patient_questions::table
            .filter(patient_questions::id.eq(question_id))
            .filter(patient_questions::patient_uuid.eq(patient_uuid)),
    )
    .set((
        patient_questions::is_deleted.eq(true),
        patient_questions::updated_at.eq(Utc::now()),
    ))
    .execute(conn)?;
    if affected == 0 {
        return Err(ApiError::NotFound("question"));
    }
    Ok(())
}

/// Physician-facing view: shared, non-deleted questions of one patient.
/// Association checks happen before this is called.
pub fn shared_for_patient(
    conn: &mut PgConnection,
    patient_uuid: Uuid,
) -> ApiResult<Vec<PatientQuestion>> {
    Ok(patient_questions::table
        .filter(patient_questions::patient_uuid.eq(patient_uuid))
        .filter(question::not_deleted())
        .filter(question::shared())
        .order(patient_questions::created_at.asc())
        .select(PatientQuestion::as_select())
        .load(conn)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_rejects_blank_text() {
        let req = CreateQuestionRequest {
            question_text: "   ".into(),
            category: None,
            share_with_physician: None,
        };
        assert!(matches!(
            validate_create(&req),
            Err(ApiError::Validation(_))
        ));
    }

    #[test]
    fn update_rejects_blank_replacement_text() {
        let req = UpdateQuestionRequest {
            question_text: Some("".into()),
            category: None,
            share_with_physician: None,
            is_answered: None,
        };
        assert!(matches!(
            validate_update(&req),
            Err(ApiError::Validation(_))
        ));
        let noop = UpdateQuestionRequest {
            question_text: None,
            category: Some("treatment".into()),
            share_with_physician: None,
            is_answered: None,
        };
        assert!(validate_update(&noop).is_ok());
    }
}
