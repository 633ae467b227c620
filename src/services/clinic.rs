use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::clinic::{
    self, Clinic, ClinicChanges, CreateClinicRequest, UpdateClinicRequest,
};
use crate::schema::doctor::clinics;
use crate::services::non_empty;

pub fn create(conn: &mut PgConnection, req: &CreateClinicRequest) -> ApiResult<Clinic> {
    non_empty("name", &req.name)?;
    non_empty("address", &req.address)?;
    non_empty("phone", &req.phone)?;
    let row = req.to_clinic();
    let created = diesel::insert_into(clinics::table)
        .values(&row)
        .returning(Clinic::as_returning())
        .get_result(conn)?;
    tracing::info!(clinic_id = %created.id, name = %created.name, "clinic created");
    Ok(created)
}

pub fn list(conn: &mut PgConnection) -> ApiResult<Vec<Clinic>> {
    Ok(clinics::table
        .filter(clinic::not_deleted())
        .order(clinics::name.asc())
        .select(Clinic::as_select())
        .load(conn)?)
}

pub fn get(conn: &mut PgConnection, clinic_id: Uuid) -> ApiResult<Clinic> {
    clinics::table
        .filter(clinics::id.eq(clinic_id))
        .filter(clinic::not_deleted())
        .select(Clinic::as_select())
        .first(conn)
        .optional()?
        .ok_or(ApiError::NotFound("clinic"))
}

pub fn update(
    conn: &mut PgConnection,
    clinic_id: Uuid,
    req: &UpdateClinicRequest,
) -> ApiResult<Clinic> {
    if let Some(name) = &req.name {
        non_empty("name", name)?;
    }
    let changes = ClinicChanges {
        name: req.name.clone(),
        address: req.address.clone(),
        phone: req.phone.clone(),
        fax_number: req.fax_number.clone(),
        updated_at: Utc::now(),
    };
    diesel::update(
        clinics::table
            .filter(clinics::id.eq(clinic_id))
            .filter(clinic::not_deleted()),
    )
    .set(changes)
    .returning(Clinic::as_returning())
    .get_result(conn)
    .optional()?
    .ok_or(ApiError::NotFound("clinic"))
}

pub fn delete(conn: &mut PgConnection, clinic_id: Uuid) -> ApiResult<()> {
    let affected = diesel::update(clinics::table.filter(clinics::id.eq(clinic_id)))
        .set((
            clinics::is_deleted.eq(true),
            clinics::updated_at.eq(Utc::now()),
        ))
        .execute(conn)?;
    if affected == 0 {
        return Err(ApiError::NotFound("clinic"));
    }
    Ok(())
}
