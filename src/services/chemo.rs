use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::chemo::{
    self, ChemoDate, ChemoDateChanges, CreateChemoDateRequest, UpdateChemoDateRequest,
};
use crate::schema::patient::chemo_dates;
use crate::services::non_empty;

pub fn create(
    conn: &mut PgConnection,
    patient_uuid: Uuid,
    req: &CreateChemoDateRequest,
) -> ApiResult<ChemoDate> {
    non_empty("regimen", &req.regimen)?;
    let row = req.to_chemo_date(patient_uuid);
    Ok(diesel::insert_into(chemo_dates::table)
        .values(&row)
        .returning(ChemoDate::as_returning())
        .get_result(conn)?)
}

/// Soonest first; upcoming appointments lead the list.
pub fn list(conn: &mut PgConnection, patient_uuid: Uuid) -> ApiResult<Vec<ChemoDate>> {
    Ok(chemo_dates::table
        .filter(chemo_dates::patient_uuid.eq(patient_uuid))
        .filter(chemo::not_deleted())
        .order(chemo_dates::scheduled_on.asc())
        .select(ChemoDate::as_select())
        .load(conn)?)
}

pub fn get(conn: &mut PgConnection, patient_uuid: Uuid, chemo_id: Uuid) -> ApiResult<ChemoDate> {
    chemo_dates::table
        .filter(chemo_dates::id.eq(chemo_id))
        .filter(chemo_dates::patient_uuid.eq(patient_uuid))
        .filter(chemo::not_deleted())
        .select(ChemoDate::as_select())
        .first(conn)
        .optional()?
        .ok_or(ApiError::NotFound("chemo date"))
}

pub fn update(
    conn: &mut PgConnection,
    patient_uuid: Uuid,
    chemo_id: Uuid,
    req: &UpdateChemoDateRequest,
) -> ApiResult<ChemoDate> {
    if let Some(regimen) = &req.regimen {
        non_empty("regimen", regimen)?;
    }
    let changes = ChemoDateChanges {
        scheduled_on: req.scheduled_on,
        regimen: req.regimen.as_deref().map(|r| r.trim().to_string()),
        notes: req.notes.clone(),
        updated_at: Utc::now(),
    };
    diesel::update(
        chemo_dates::table
            .filter(chemo_dates::id.eq(chemo_id))
            .filter(chemo_dates::patient_uuid.eq(patient_uuid))
            .filter(chemo::not_deleted()),
    )
    .set(changes)
    .returning(ChemoDate::as_returning())
    .get_result(conn)
    .optional()?
    .ok_or(ApiError::NotFound("chemo date"))
}

pub fn delete(conn: &mut PgConnection, patient_uuid: Uuid, chemo_id: Uuid) -> ApiResult<()> {
    let affected = diesel::update(
        chemo_dates::table
            .filter(chemo_dates::id.eq(chemo_id))
            .filter(chemo_dates::patient_uuid.eq(patient_uuid)),
    )
    .set((
        chemo_dates::is_deleted.eq(true),
        chemo_dates::updated_at.eq(Utc::now()),
    ))
    .execute(conn)?;
    if affected == 0 {
        return Err(ApiError::NotFound("chemo date"));
    }
    Ok(())
}

/// Physician-facing read-only view, association-checked by the caller.
pub fn list_for_patient(conn: &mut PgConnection, patient_uuid: Uuid) -> ApiResult<Vec<ChemoDate>> {
    list(conn, patient_uuid)
}
