use chrono::{DateTime, Utc};
use diesel::dsl;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::patient::patient_accounts;

/// Patient-side account. `id` doubles as the patient's cross-database uuid.
#[derive(Debug, Clone, Queryable, Selectable, Serialize)]
#[diesel(table_name = patient_accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PatientAccount {
    pub id: Uuid,
    #[serde(skip_serializing)]
    pub auth_subject: String,
    pub email: String,
    pub display_name: String,
    pub terms_accepted_at: Option<DateTime<Utc>>,
    pub profile_completed_at: Option<DateTime<Utc>>,
    pub onboarding_completed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing)]
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = patient_accounts)]
pub struct NewPatientAccount {
    pub id: Uuid,
    pub auth_subject: String,
    pub email: String,
    pub display_name: String,
    pub terms_accepted_at: Option<DateTime<Utc>>,
    pub profile_completed_at: Option<DateTime<Utc>>,
    pub onboarding_completed_at: Option<DateTime<Utc>>,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct StartOnboardingRequest {
    pub email: String,
    pub display_name: String,
}

impl StartOnboardingRequest {
    pub fn to_account(&self, auth_subject: &str) -> NewPatientAccount {
        let now = Utc::now();
        NewPatientAccount {
            id: Uuid::new_v4(),
            auth_subject: auth_subject.to_string(),
            email: self.email.trim().to_string(),
            display_name: self.display_name.trim().to_string(),
            terms_accepted_at: None,
            profile_completed_at: None,
            onboarding_completed_at: None,
            is_deleted: false,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OnboardingStatus {
    pub account_exists: bool,
    pub terms_accepted: bool,
    pub profile_completed: bool,
    pub completed: bool,
}

pub fn not_deleted() -> dsl::Eq<patient_accounts::is_deleted, bool> {
    patient_accounts::is_deleted.eq(false)
}
