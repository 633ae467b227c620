use chrono::{DateTime, NaiveDate, Utc};
use diesel::dsl;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::doctor::{patient_info, patient_physician_associations};

/// Doctor-side demographic record for a patient. `patient_uuid` is the
/// cross-database patient identity; `id` is this row's own key.
#[derive(Debug, Clone, Queryable, Selectable, Serialize)]
#[diesel(table_name = patient_info)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PatientInfo {
    pub id: Uuid,
    pub patient_uuid: Uuid,
    pub clinic_id: Uuid,
    pub mrn: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub phone: Option<String>,
    pub email: Option<String>,
    #[serde(skip_serializing)]
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = patient_info)]
pub struct NewPatientInfo {
    pub id: Uuid,
    pub patient_uuid: Uuid,
    pub clinic_id: Uuid,
    pub mrn: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Association row linking patient, physician and clinic. A non-deleted row
/// is the authorization predicate for physician access to patient data.
#[derive(Debug, Clone, Queryable, Selectable, Serialize)]
#[diesel(table_name = patient_physician_associations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PatientPhysicianAssociation {
    pub id: Uuid,
    pub patient_uuid: Uuid,
    pub physician_uuid: Uuid,
    pub clinic_uuid: Uuid,
    #[serde(skip_serializing)]
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = patient_physician_associations)]
pub struct NewAssociation {
    pub id: Uuid,
    pub patient_uuid: Uuid,
    pub physician_uuid: Uuid,
    pub clinic_uuid: Uuid,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NewAssociation {
    pub fn link(patient_uuid: Uuid, physician_uuid: Uuid, clinic_uuid: Uuid) -> Self {
        let now = Utc::now();
        NewAssociation {
            id: Uuid::new_v4(),
            patient_uuid,
            physician_uuid,
            clinic_uuid,
            is_deleted: false,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RegisterPatientRequest {
    pub clinic_id: Uuid,
    pub mrn: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl RegisterPatientRequest {
    pub fn to_patient_info(&self, patient_uuid: Uuid) -> NewPatientInfo {
        let now = Utc::now();
        NewPatientInfo {
            id: Uuid::new_v4(),
            patient_uuid,
            clinic_id: self.clinic_id,
            mrn: self.mrn.trim().to_string(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            date_of_birth: self.date_of_birth,
            phone: self.phone.clone(),
            email: self.email.clone(),
            is_deleted: false,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdatePatientRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

#[derive(AsChangeset)]
#[diesel(table_name = patient_info)]
pub struct PatientInfoChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub updated_at: DateTime<Utc>,
}

pub fn not_deleted() -> dsl::Eq<patient_info::is_deleted, bool> {
    patient_info::is_deleted.eq(false)
}

/// Active association rows only; the check every physician read goes through.
pub fn association_active() -> dsl::Eq<patient_physician_associations::is_deleted, bool> {
    patient_physician_associations::is_deleted.eq(false)
}
