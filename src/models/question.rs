use chrono::{DateTime, Utc};
use diesel::dsl;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::patient::patient_questions;

pub const DEFAULT_CATEGORY: &str = "other";

#[derive(Debug, Clone, Queryable, Selectable, Serialize)]
#[diesel(table_name = patient_questions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PatientQuestion {
    pub id: Uuid,
    pub patient_uuid: Uuid,
    pub question_text: String,
    pub share_with_physician: bool,
    pub is_answered: bool,
    pub category: String,
    #[serde(skip_serializing)]
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = patient_questions)]
pub struct NewPatientQuestion {
    pub id: Uuid,
    pub patient_uuid: Uuid,
    pub question_text: String,
    pub share_with_physician: bool,
    pub is_answered: bool,
    pub category: String,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateQuestionRequest {
    pub question_text: String,
    pub category: Option<String>,
    pub share_with_physician: Option<bool>,
}

impl CreateQuestionRequest {
    /// Build the row to insert. Omitted fields take the documented
    /// defaults: not shared, not answered, category "other".
    pub fn to_question(&self, patient_uuid: Uuid) -> NewPatientQuestion {
        let now = Utc::now();
        NewPatientQuestion {
            id: Uuid::new_v4(),
            patient_uuid,
            question_text: self.question_text.trim().to_string(),
            share_with_physician: self.share_with_physician.unwrap_or(false),
            is_answered: false,
            category: self
                .category
                .clone()
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            is_deleted: false,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateQuestionRequest {
    pub question_text: Option<String>,
    pub category: Option<String>,
    pub share_with_physician: Option<bool>,
    pub is_answered: Option<bool>,
}

#[derive(AsChangeset)]
#[diesel(table_name = patient_questions)]
pub struct QuestionChanges {
    pub question_text: Option<String>,
    pub category: Option<String>,
    pub share_with_physician: Option<bool>,
    pub is_answered: Option<bool>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct ListQuestionsQuery {
    #[serde(default)]
    pub shared_only: bool,
}

pub fn not_deleted() -> dsl::Eq<patient_questions::is_deleted, bool> {
    patient_questions::is_deleted.eq(false)
}

/// Physician-facing visibility: shared and not deleted.
pub fn shared() -> dsl::Eq<patient_questions::share_with_physician, bool> {
    patient_questions::share_with_physician.eq(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_defaults_are_unshared_unanswered_other() {
        let req = CreateQuestionRequest {
            question_text: "Simple question".into(),
            category: None,
            share_with_physician: None,
        };
        let row = req.to_question(Uuid::new_v4());
        assert!(!row.share_with_physician);
        assert!(!row.is_answered);
        assert_eq!(row.category, "other");
        assert!(!row.is_deleted);
    }

    #[test]
    fn create_honors_explicit_fields_and_trims_text() {
        let req = CreateQuestionRequest {
            question_text: "  When is my next infusion?  ".into(),
            category: Some("treatment".into()),
            share_with_physician: Some(true),
        };
        let row = req.to_question(Uuid::new_v4());
        assert_eq!(row.question_text, "When is my next infusion?");
        assert_eq!(row.category, "treatment");
        assert!(row.share_with_physician);
        assert!(!row.is_answered);
    }
}
