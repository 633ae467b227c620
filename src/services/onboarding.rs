//! Patient onboarding: account creation for a fresh identity, then the
//! terms and profile steps. Completing both stamps the account as
//! onboarded.

use chrono::Utc;
use diesel::prelude::*;

use crate::error::{ApiError, ApiResult};
use crate::models::account::{OnboardingStatus, PatientAccount, StartOnboardingRequest};
use crate::schema::patient::patient_accounts;
use crate::services::{non_empty, principal};

pub fn status(conn: &mut PgConnection, subject: &str) -> ApiResult<OnboardingStatus> {
    let account = principal::find_account(conn, subject)?;
    Ok(match account {
        None => OnboardingStatus {
            account_exists: false,
            terms_accepted: false,
            profile_completed: false,
            completed: false,
        },
        Some(account) => OnboardingStatus {
            account_exists: true,
            terms_accepted: account.terms_accepted_at.is_some(),
            profile_completed: account.profile_completed_at.is_some(),
            completed: account.onboarding_completed_at.is_some(),
        },
    })
}

pub fn start(
    conn: &mut PgConnection,
    subject: &str,
    req: &StartOnboardingRequest,
) -> ApiResult<PatientAccount> {
    non_empty("email", &req.email)?;
    non_empty("display_name", &req.display_name)?;
    if principal::find_account(conn, subject)?.is_some() {
        return Err(ApiError::Conflict(
            "an account already exists for this identity".into(),
        ));
    }
    let account = diesel::insert_into(patient_accounts::table)
        .values(req.to_account(subject))
        .returning(PatientAccount::as_returning())
        .get_result(conn)?;
    tracing::info!(patient_uuid = %account.id, "patient account created");
    Ok(account)
}

/// A step outcome: the fresh account row, and whether this call was the one
/// that finished onboarding (so the caller can notify exactly once).
pub struct StepOutcome {
    pub account: PatientAccount,
    pub newly_completed: bool,
}

/// Idempotent: accepting twice keeps the original timestamp.
pub fn accept_terms(conn: &mut PgConnection, subject: &str) -> ApiResult<StepOutcome> {
    let account = principal::require_patient(conn, subject)?;
    let now = Utc::now();
    if account.terms_accepted_at.is_none() {
        diesel::update(patient_accounts::table.filter(patient_accounts::id.eq(account.id)))
            .set((
                patient_accounts::terms_accepted_at.eq(Some(now)),
                patient_accounts::updated_at.eq(now),
            ))
            .execute(conn)?;
    }
    finalize_if_complete(conn, subject)
}

/// Idempotent, same shape as `accept_terms`.
pub fn complete_profile(conn: &mut PgConnection, subject: &str) -> ApiResult<StepOutcome> {
    let account = principal::require_patient(conn, subject)?;
    let now = Utc::now();
    if account.profile_completed_at.is_none() {
        diesel::update(patient_accounts::table.filter(patient_accounts::id.eq(account.id)))
            .set((
                patient_accounts::profile_completed_at.eq(Some(now)),
                patient_accounts::updated_at.eq(now),
            ))
            .execute(conn)?;
    }
    finalize_if_complete(conn, subject)
}

/// Stamp `onboarding_completed_at` once both steps are done.
fn finalize_if_complete(conn: &mut PgConnection, subject: &str) -> ApiResult<StepOutcome> {
    let account = principal::require_patient(conn, subject)?;
    if account.onboarding_completed_at.is_some()
        || account.terms_accepted_at.is_none()
        || account.profile_completed_at.is_none()
    {
        return Ok(StepOutcome {
            account,
            newly_completed: false,
        });
    }
    let now = Utc::now();
    diesel::update(patient_accounts::table.filter(patient_accounts::id.eq(account.id)))
        .set((
            patient_accounts::onboarding_completed_at.eq(Some(now)),
            patient_accounts::updated_at.eq(now),
        ))
        .execute(conn)?;
    tracing::info!(patient_uuid = %account.id, "onboarding completed");
    Ok(StepOutcome {
        account: principal::require_patient(conn, subject)?,
        newly_completed: true,
    })
}
