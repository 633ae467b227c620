//! Physician dashboard aggregation. Doctor-side and patient-side numbers
//! come from separate databases read independently; the summary tolerates
//! skew between the two reads.

use chrono::{Duration, NaiveDate, Utc};
use diesel::prelude::*;
use serde::Serialize;
use uuid::Uuid;

use crate::error::ApiResult;
use crate::models::{chemo, diary, question};
use crate::schema::patient::{chemo_dates, diary_entries, patient_questions};

#[derive(Debug, Serialize)]
pub struct DashboardSummary {
    pub active_patients: usize,
    pub shared_unanswered_questions: i64,
    pub diary_entries_last_week: i64,
    pub next_chemo_date: Option<NaiveDate>,
}

/// Patient-database half of the summary, over the physician's associated
/// patient uuids (already resolved against the doctor database).
pub fn patient_metrics(
    conn: &mut PgConnection,
    patient_uuids: &[Uuid],
) -> ApiResult<DashboardSummary> {
    if patient_uuids.is_empty() {
        return Ok(DashboardSummary {
            active_patients: 0,
            shared_unanswered_questions: 0,
            diary_entries_last_week: 0,
            next_chemo_date: None,
        });
    }

    let shared_unanswered_questions: i64 = patient_questions::table
        .filter(patient_questions::patient_uuid.eq_any(patient_uuids))
        .filter(question::not_deleted())
        .filter(question::shared())
        .filter(patient_questions::is_answered.eq(false))
        .count()
        .get_result(conn)?;

    let today = Utc::now().date_naive();
    let week_ago = today - Duration::days(7);
    let diary_entries_last_week: i64 = diary_entries::table
        .filter(diary_entries::patient_uuid.eq_any(patient_uuids))
        .filter(diary::not_deleted())
        .filter(diary_entries::entry_date.ge(week_ago))
        .count()
        .get_result(conn)?;

    let next_chemo_date: Option<NaiveDate> = chemo_dates::table
        .filter(chemo_dates::patient_uuid.eq_any(patient_uuids))
        .filter(chemo::not_deleted())
        .filter(chemo_dates::scheduled_on.ge(today))
        .select(diesel::dsl::min(chemo_dates::scheduled_on))
        .first(conn)?;

    Ok(DashboardSummary {
        active_patients: patient_uuids.len(),
        shared_unanswered_questions,
        diary_entries_last_week,
        next_chemo_date,
    })
}
