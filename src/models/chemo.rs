use chrono::{DateTime, NaiveDate, Utc};
use diesel::dsl;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::patient::chemo_dates;

#[derive(Debug, Clone, Queryable, Selectable, Serialize)]
#[diesel(table_name = chemo_dates)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ChemoDate {
    pub id: Uuid,
    pub patient_uuid: Uuid,
    pub scheduled_on: NaiveDate,
    pub regimen: String,
    pub notes: Option<String>,
    #[serde(skip_serializing)]
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = chemo_dates)]
pub struct NewChemoDate {
    pub id: Uuid,
    pub patient_uuid: Uuid,
    pub scheduled_on: NaiveDate,
    pub regimen: String,
    pub notes: Option<String>,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateChemoDateRequest {
    pub scheduled_on: NaiveDate,
    pub regimen: String,
    pub notes: Option<String>,
}

impl CreateChemoDateRequest {
    pub fn to_chemo_date(&self, patient_uuid: Uuid) -> NewChemoDate {
        let now = Utc::now();
        NewChemoDate {
            id: Uuid::new_v4(),
            patient_uuid,
            scheduled_on: self.scheduled_on,
            regimen: self.regimen.trim().to_string(),
            notes: self.notes.clone(),
            is_deleted: false,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateChemoDateRequest {
    pub scheduled_on: Option<NaiveDate>,
    pub regimen: Option<String>,
    pub notes: Option<String>,
}

#[derive(AsChangeset)]
#[diesel(table_name = chemo_dates)]
pub struct ChemoDateChanges {
    pub scheduled_on: Option<NaiveDate>,
    pub regimen: Option<String>,
    pub notes: Option<String>,
    pub updated_at: DateTime<Utc>,
}

pub fn not_deleted() -> dsl::Eq<chemo_dates::is_deleted, bool> {
    chemo_dates::is_deleted.eq(false)
}
