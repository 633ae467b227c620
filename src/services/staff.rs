use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::staff::{
    CreateStaffRequest, StaffChanges, StaffMember, UpdateStaffRequest, not_deleted,
};
use crate::schema::doctor::staff;
use crate::services::non_empty;

pub fn create(conn: &mut PgConnection, req: &CreateStaffRequest) -> ApiResult<StaffMember> {
    non_empty("auth_subject", &req.auth_subject)?;
    non_empty("first_name", &req.first_name)?;
    non_empty("last_name", &req.last_name)?;
    non_empty("email", &req.email)?;
    non_empty("role", &req.role)?;

    let duplicate: bool = diesel::select(diesel::dsl::exists(
        staff::table
            .filter(staff::auth_subject.eq(req.auth_subject.trim()))
            .filter(not_deleted()),
    ))
    .get_result(conn)?;
    if duplicate {
        return Err(ApiError::Conflict(
            "a staff member with this identity already exists".into(),
        ));
    }

    let row = req.to_staff();
    let created = diesel::insert_into(staff::table)
        .values(&row)
        .returning(StaffMember::as_returning())
        .get_result(conn)?;
    tracing::info!(staff_id = %created.id, clinic_id = %created.clinic_id, "staff member created");
    Ok(created)
}

pub fn list(conn: &mut PgConnection, clinic_id: Option<Uuid>) -> ApiResult<Vec<StaffMember>> {
    let mut query = staff::table
        .filter(not_deleted())
        .order(staff::last_name.asc())
        .select(StaffMember::as_select())
        .into_boxed();
    if let Some(clinic_id) = clinic_id {
        query = query.filter(staff::clinic_id.eq(clinic_id));
    }
    Ok(query.load(conn)?)
}

pub fn get(conn: &mut PgConnection, staff_id: Uuid) -> ApiResult<StaffMember> {
    staff::table
        .filter(staff::id.eq(staff_id))
        .filter(not_deleted())
        .select(StaffMember::as_select())
        .first(conn)
        .optional()?
        .ok_or(ApiError::NotFound("staff member"))
}

pub fn update(
    conn: &mut PgConnection,
    staff_id: Uuid,
    req: &UpdateStaffRequest,
) -> ApiResult<StaffMember> {
    if let Some(email) = &req.email {
        non_empty("email", email)?;
    }
    let changes = StaffChanges {
        first_name: req.first_name.clone(),
        last_name: req.last_name.clone(),
        email: req.email.clone(),
        role: req.role.clone(),
        updated_at: Utc::now(),
    };
    diesel::update(
        staff::table
            .filter(staff::id.eq(staff_id))
            .filter(not_deleted()),
    )
    .set(changes)
    .returning(StaffMember::as_returning())
    .get_result(conn)
    .optional()?
    .ok_or(ApiError::NotFound("staff member"))
}

pub fn delete(conn: &mut PgConnection, staff_id: Uuid) -> ApiResult<()> {
    let affected = diesel::update(staff::table.filter(staff::id.eq(staff_id)))
        .set((staff::is_deleted.eq(true), staff::updated_at.eq(Utc::now())))
        .execute(conn)?;
    if affected == 0 {
        return Err(ApiError::NotFound("staff member"));
    }
    Ok(())
}
