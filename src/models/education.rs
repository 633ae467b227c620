use chrono::{DateTime, Utc};
use diesel::dsl;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::schema::patient::{
    education_deliveries, education_documents, symptom_documents, symptom_sessions, symptoms,
};

/// Document workflow: drafts are editable, approval is one-way, and approved
/// content is immutable. `is_active` toggles visibility, not content.
pub const STATUS_DRAFT: &str = "draft";
pub const STATUS_APPROVED: &str = "approved";

#[derive(Debug, Clone, Queryable, Selectable, Serialize)]
#[diesel(table_name = symptoms)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Symptom {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = symptoms)]
pub struct NewSymptom {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateSymptomRequest {
    pub code: String,
    pub name: String,
}

impl CreateSymptomRequest {
    pub fn to_symptom(&self) -> NewSymptom {
        let now = Utc::now();
        NewSymptom {
            id: Uuid::new_v4(),
            code: self.code.trim().to_lowercase(),
            name: self.name.trim().to_string(),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Serialize)]
#[diesel(table_name = education_documents)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct EducationDocument {
    pub id: Uuid,
    pub title: String,
    pub summary: String,
    pub document_url: Option<String>,
    pub status: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = education_documents)]
pub struct NewEducationDocument {
    pub id: Uuid,
    pub title: String,
    pub summary: String,
    pub document_url: Option<String>,
    pub status: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateDocumentRequest {
    pub title: String,
    pub summary: String,
    pub document_url: Option<String>,
}

impl CreateDocumentRequest {
    pub fn to_document(&self) -> NewEducationDocument {
        let now = Utc::now();
        NewEducationDocument {
            id: Uuid::new_v4(),
            title: self.title.trim().to_string(),
            summary: self.summary.trim().to_string(),
            document_url: self.document_url.clone(),
            status: STATUS_DRAFT.to_string(),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateDocumentRequest {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub document_url: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = symptom_documents)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SymptomDocument {
    pub id: Uuid,
    pub symptom_id: Uuid,
    pub document_id: Uuid,
    pub position: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = symptom_documents)]
pub struct NewSymptomDocument {
    pub id: Uuid,
    pub symptom_id: Uuid,
    pub document_id: Uuid,
    pub position: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct MapDocumentRequest {
    pub document_id: Uuid,
    pub position: i32,
}

#[derive(Debug, Clone, Queryable, Selectable, Serialize)]
#[diesel(table_name = symptom_sessions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SymptomSession {
    pub id: Uuid,
    pub patient_uuid: Uuid,
    pub conversation_id: Option<Uuid>,
    pub flagged_symptom_codes: Value,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = symptom_sessions)]
pub struct NewSymptomSession {
    pub id: Uuid,
    pub patient_uuid: Uuid,
    pub conversation_id: Option<Uuid>,
    pub flagged_symptom_codes: Value,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = education_deliveries)]
pub struct NewEducationDelivery {
    pub id: Uuid,
    pub session_id: Uuid,
    pub document_id: Uuid,
    pub delivered_at: DateTime<Utc>,
}

/// The assembled packet returned to the patient after a completed session.
#[derive(Debug, Serialize)]
pub struct EducationPacket {
    pub session_id: Uuid,
    pub document_ids: Vec<Uuid>,
    pub content: String,
}

pub fn symptom_active() -> dsl::Eq<symptoms::is_active, bool> {
    symptoms::is_active.eq(true)
}

/// Delivery visibility is approved-and-active; compose both predicates.
pub fn document_approved() -> dsl::Eq<education_documents::status, &'static str> {
    education_documents::status.eq(STATUS_APPROVED)
}

pub fn document_active() -> dsl::Eq<education_documents::is_active, bool> {
    education_documents::is_active.eq(true)
}
