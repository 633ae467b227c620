//! Patient registration from the doctor portal: one doctor-database
//! transaction creating the demographic record and the physician
//! association. The patient-side account is created later by onboarding.

use diesel::prelude::*;
use serde::Serialize;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::patient::{
    self as patient_model, NewAssociation, PatientInfo, PatientPhysicianAssociation,
    RegisterPatientRequest,
};
use crate::models::staff::StaffMember;
use crate::schema::doctor::{patient_info, patient_physician_associations as associations};
use crate::services::non_empty;

#[derive(Debug, Serialize)]
pub struct RegistrationOutcome {
    pub patient: PatientInfo,
    pub association: PatientPhysicianAssociation,
}

pub fn register(
    conn: &mut PgConnection,
    registrar: &StaffMember,
    req: &RegisterPatientRequest,
) -> ApiResult<RegistrationOutcome> {
    non_empty("mrn", &req.mrn)?;
    non_empty("first_name", &req.first_name)?;
    non_empty("last_name", &req.last_name)?;
    if registrar.clinic_id != req.clinic_id {
        return Err(ApiError::Forbidden(
            "cannot register a patient into another clinic".into(),
        ));
    }

    conn.transaction(|conn| {
        let duplicate: bool = diesel::select(diesel::dsl::exists(
            patient_info::table
                .filter(patient_info::clinic_id.eq(req.clinic_id))
                .filter(patient_info::mrn.eq(req.mrn.trim()))
                .filter(patient_model::not_deleted()),
        ))
        .get_result(conn)?;
        if duplicate {
            return Err(ApiError::Conflict(
                "a patient with this MRN already exists in the clinic".into(),
            ));
        }

        let patient_uuid = Uuid::new_v4();
        let patient = diesel::insert_into(patient_info::table)
            .values(req.to_patient_info(patient_uuid))
            .returning(PatientInfo::as_returning())
            .get_result(conn)?;
        let association = diesel::insert_into(associations::table)
            .values(NewAssociation::link(
                patient_uuid,
                registrar.id,
                req.clinic_id,
            ))
            .returning(PatientPhysicianAssociation::as_returning())
            .get_result(conn)?;

        tracing::info!(
            patient_uuid = %patient_uuid,
            physician_uuid = %registrar.id,
            clinic_id = %req.clinic_id,
            "patient registered"
        );
        Ok(RegistrationOutcome {
            patient,
            association,
        })
    })
}
