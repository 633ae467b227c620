use chrono::{DateTime, Utc};
use diesel::dsl;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::doctor::clinics;

#[derive(Debug, Clone, Queryable, Selectable, Serialize)]
#[diesel(table_name = clinics)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Clinic {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub fax_number: Option<String>,
    #[serde(skip_serializing)]
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = clinics)]
pub struct NewClinic {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub fax_number: Option<String>,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateClinicRequest {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub fax_number: Option<String>,
}

impl CreateClinicRequest {
    pub fn to_clinic(&self) -> NewClinic {
        let now = Utc::now();
        NewClinic {
            id: Uuid::new_v4(),
            name: self.name.trim().to_string(),
            address: self.address.trim().to_string(),
            phone: self.phone.trim().to_string(),
            fax_number: self.fax_number.clone(),
            is_deleted: false,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateClinicRequest {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub fax_number: Option<String>,
}

#[derive(AsChangeset)]
#[diesel(table_name = clinics)]
pub struct ClinicChanges {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub fax_number: Option<String>,
    pub updated_at: DateTime<Utc>,
}

pub fn not_deleted() -> dsl::Eq<clinics::is_deleted, bool> {
    clinics::is_deleted.eq(false)
}
