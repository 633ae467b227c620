//! Doctor-portal views of patient data. Every read here is gated on an
//! active patient-physician association row.

use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::patient::{
    self as patient_model, PatientInfo, PatientInfoChanges, UpdatePatientRequest,
};
use crate::schema::doctor::{patient_info, patient_physician_associations as associations};
use crate::services::principal;

/// All patients with an active association to this physician.
pub fn list_for_physician(
    conn: &mut PgConnection,
    physician_uuid: Uuid,
) -> ApiResult<Vec<PatientInfo>> {
    Ok(patient_info::table
        .inner_join(
            associations::table.on(associations::patient_uuid.eq(patient_info::patient_uuid)),
        )
        .filter(associations::physician_uuid.eq(physician_uuid))
        .filter(patient_model::association_active())
        .filter(patient_model::not_deleted())
        .order(patient_info::last_name.asc())
        .select(PatientInfo::as_select())
        .load(conn)?)
}

pub fn get_for_physician(
    conn: &mut PgConnection,
    physician_uuid: Uuid,
    patient_uuid: Uuid,
) -> ApiResult<PatientInfo> {
    principal::require_association(conn, physician_uuid, patient_uuid)?;
    patient_info::table
        .filter(patient_info::patient_uuid.eq(patient_uuid))
        .filter(patient_model::not_deleted())
        .select(PatientInfo::as_select())
        .first(conn)
        .optional()?
        .ok_or(ApiError::NotFound("patient"))
}

pub fn update_for_physician(
    conn: &mut PgConnection,
    physician_uuid: Uuid,
    patient_uuid: Uuid,
    req: &UpdatePatientRequest,
) -> ApiResult<PatientInfo> {
    principal::require_association(conn, physician_uuid, patient_uuid)?;
    let changes = PatientInfoChanges {
        first_name: req.first_name.clone(),
        last_name: req.last_name.clone(),
        phone: req.phone.clone(),
        email: req.email.clone(),
        updated_at: Utc::now(),
    };
    diesel::update(
        patient_info::table
            .filter(patient_info::patient_uuid.eq(patient_uuid))
            .filter(patient_model::not_deleted()),
    )
    .set(changes)
    .returning(PatientInfo::as_returning())
    .get_result(conn)
    .optional()?
    .ok_or(ApiError::NotFound("patient"))
}

/// Patient uuids this physician may read, for cross-database aggregation.
pub fn associated_patient_uuids(
    conn: &mut PgConnection,
    physician_uuid: Uuid,
) -> ApiResult<Vec<Uuid>> {
    Ok(associations::table
        .filter(associations::physician_uuid.eq(physician_uuid))
        .filter(patient_model::association_active())
        .select(associations::patient_uuid)
        .load(conn)?)
}
