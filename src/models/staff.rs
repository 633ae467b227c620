use chrono::{DateTime, Utc};
use diesel::dsl;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::doctor::staff;

#[derive(Debug, Clone, Queryable, Selectable, Serialize)]
#[diesel(table_name = staff)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct StaffMember {
    pub id: Uuid,
    pub clinic_id: Uuid,
    pub auth_subject: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: String,
    #[serde(skip_serializing)]
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = staff)]
pub struct NewStaffMember {
    pub id: Uuid,
    pub clinic_id: Uuid,
    pub auth_subject: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: String,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateStaffRequest {
    pub clinic_id: Uuid,
    pub auth_subject: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: String,
}

impl CreateStaffRequest {
    pub fn to_staff(&self) -> NewStaffMember {
        let now = Utc::now();
        NewStaffMember {
            id: Uuid::new_v4(),
            clinic_id: self.clinic_id,
            auth_subject: self.auth_subject.trim().to_string(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            role: self.role.trim().to_string(),
            is_deleted: false,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateStaffRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
}

#[derive(AsChangeset)]
#[diesel(table_name = staff)]
pub struct StaffChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub updated_at: DateTime<Utc>,
}

pub fn not_deleted() -> dsl::Eq<staff::is_deleted, bool> {
    staff::is_deleted.eq(false)
}
