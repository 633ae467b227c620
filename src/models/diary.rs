use chrono::{DateTime, NaiveDate, Utc};
use diesel::dsl;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::patient::diary_entries;

#[derive(Debug, Clone, Queryable, Selectable, Serialize)]
#[diesel(table_name = diary_entries)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DiaryEntry {
    pub id: Uuid,
    pub patient_uuid: Uuid,
    pub entry_date: NaiveDate,
    pub mood: Option<String>,
    pub symptom_score: Option<i32>,
    pub body: String,
    #[serde(skip_serializing)]
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = diary_entries)]
pub struct NewDiaryEntry {
    pub id: Uuid,
    pub patient_uuid: Uuid,
    pub entry_date: NaiveDate,
    pub mood: Option<String>,
    pub symptom_score: Option<i32>,
    pub body: String,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateDiaryEntryRequest {
    pub entry_date: NaiveDate,
    pub mood: Option<String>,
    pub symptom_score: Option<i32>,
    pub body: String,
}

impl CreateDiaryEntryRequest {
    pub fn to_entry(&self, patient_uuid: Uuid) -> NewDiaryEntry {
        let now = Utc::now();
        NewDiaryEntry {
            id: Uuid::new_v4(),
            patient_uuid,
            entry_date: self.entry_date,
            mood: self.mood.clone(),
            symptom_score: self.symptom_score,
            body: self.body.trim().to_string(),
            is_deleted: false,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateDiaryEntryRequest {
    pub entry_date: Option<NaiveDate>,
    pub mood: Option<String>,
    pub symptom_score: Option<i32>,
    pub body: Option<String>,
}

#[derive(AsChangeset)]
#[diesel(table_name = diary_entries)]
pub struct DiaryEntryChanges {
    pub entry_date: Option<NaiveDate>,
    pub mood: Option<String>,
    pub symptom_score: Option<i32>,
    pub body: Option<String>,
    pub updated_at: DateTime<Utc>,
}

pub fn not_deleted() -> dsl::Eq<diary_entries::is_deleted, bool> {
    diary_entries::is_deleted.eq(false)
}
