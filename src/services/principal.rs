//! Identity-to-principal resolution. The authenticator only yields a
//! subject; these lookups decide what that subject is allowed to be.

use diesel::prelude::*;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::account::{self, PatientAccount};
use crate::models::patient as patient_model;
use crate::models::staff::{self as staff_model, StaffMember};
use crate::schema::doctor::{patient_physician_associations as associations, staff};
use crate::schema::patient::patient_accounts;

/// Map a token subject to its staff row, or 403.
pub fn require_staff(conn: &mut PgConnection, subject: &str) -> ApiResult<StaffMember> {
    staff::table
        .filter(staff::auth_subject.eq(subject))
        .filter(staff_model::not_deleted())
        .select(StaffMember::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| ApiError::Forbidden("no staff profile for this identity".into()))
}

/// Map a token subject to its patient account, or 403. Onboarding is the one
/// flow that may run without an account; it uses `find_account` instead.
pub fn require_patient(conn: &mut PgConnection, subject: &str) -> ApiResult<PatientAccount> {
    find_account(conn, subject)?
        .ok_or_else(|| ApiError::Forbidden("no patient account for this identity".into()))
}

pub fn find_account(conn: &mut PgConnection, subject: &str) -> ApiResult<Option<PatientAccount>> {
    Ok(patient_accounts::table
        .filter(patient_accounts::auth_subject.eq(subject))
        .filter(account::not_deleted())
        .select(PatientAccount::as_select())
        .first(conn)
        .optional()?)
}

/// Authorization for physician access to patient data: an active association
/// row must exist (doctor database).
pub fn require_association(
    conn: &mut PgConnection,
    physician_uuid: Uuid,
    patient_uuid: Uuid,
) -> ApiResult<()> {
    let linked: bool = diesel::select(diesel::dsl::exists(
        associations::table
            .filter(associations::physician_uuid.eq(physician_uuid))
            .filter(associations::patient_uuid.eq(patient_uuid))
            .filter(patient_model::association_active()),
    ))
    .get_result(conn)?;
    if !linked {
        return Err(ApiError::Forbidden(
            "no active association with this patient".into(),
        ));
    }
    Ok(())
}
