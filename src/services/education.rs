//! Clinician-curated education content and the delivery assembly flow.
//!
//! Content administration lives on the doctor portal ("docs" routes);
//! delivery is patient-portal. Approved documents are immutable; only
//! `is_active` flips. Assembly is a deterministic lookup over the mapped,
//! approved, active documents followed by a fixed disclaimer and the care
//! team handout reference.

use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::education::{
    CreateDocumentRequest, CreateSymptomRequest, EducationDocument, EducationPacket,
    MapDocumentRequest, NewEducationDelivery, NewSymptomDocument, STATUS_APPROVED, Symptom,
    SymptomSession, UpdateDocumentRequest, document_active, document_approved, symptom_active,
};
use crate::schema::patient::{
    education_deliveries, education_documents, symptom_documents, symptom_sessions, symptoms,
};
use crate::services::non_empty;

pub const DISCLAIMER: &str = "This information is for education only and is not a substitute \
                              for medical advice. Contact your care team with any questions \
                              about your treatment.";
pub const CARE_TEAM_HANDOUT: &str = "See also: \"Reaching Your Care Team\" handout.";

// ---- content administration (doctor portal) ----

pub fn create_symptom(conn: &mut PgConnection, req: &CreateSymptomRequest) -> ApiResult<Symptom> {
    non_empty("code", &req.code)?;
    non_empty("name", &req.name)?;
    let row = req.to_symptom();
    let duplicate: bool = diesel::select(diesel::dsl::exists(
        symptoms::table.filter(symptoms::code.eq(&row.code)),
    ))
    .get_result(conn)?;
    if duplicate {
        return Err(ApiError::Conflict(format!(
            "symptom code {:?} already exists",
            row.code
        )));
    }
    Ok(diesel::insert_into(symptoms::table)
        .values(&row)
        .returning(Symptom::as_returning())
        .get_result(conn)?)
}

pub fn list_symptoms(conn: &mut PgConnection, include_inactive: bool) -> ApiResult<Vec<Symptom>> {
    let mut query = symptoms::table
        .order(symptoms::code.asc())
        .select(Symptom::as_select())
        .into_boxed();
    if !include_inactive {
        query = query.filter(symptom_active());
    }
    Ok(query.load(conn)?)
}

pub fn set_symptom_active(
    conn: &mut PgConnection,
    symptom_id: Uuid,
    active: bool,
) -> ApiResult<Symptom> {
    diesel::update(symptoms::table.filter(symptoms::id.eq(symptom_id)))
        .set((
            symptoms::is_active.eq(active),
            symptoms::updated_at.eq(Utc::now()),
        ))
        .returning(Symptom::as_returning())
        .get_result(conn)
        .optional()?
        .ok_or(ApiError::NotFound("symptom"))
}

pub fn create_document(
    conn: &mut PgConnection,
    req: &CreateDocumentRequest,
) -> ApiResult<EducationDocument> {
    non_empty("title", &req.title)?;
    non_empty("summary", &req.summary)?;
    Ok(diesel::insert_into(education_documents::table)
        .values(req.to_document())
        .returning(EducationDocument::as_returning())
        .get_result(conn)?)
}

pub fn list_documents(conn: &mut PgConnection) -> ApiResult<Vec<EducationDocument>> {
    Ok(education_documents::table
        .order(education_documents::created_at.asc())
        .select(EducationDocument::as_select())
        .load(conn)?)
}

pub fn get_document(conn: &mut PgConnection, document_id: Uuid) -> ApiResult<EducationDocument> {
    education_documents::table
        .filter(education_documents::id.eq(document_id))
        .select(EducationDocument::as_select())
        .first(conn)
        .optional()?
        .ok_or(ApiError::NotFound("education document"))
}

/// Drafts are editable. On an approved document only `is_active` may change;
/// touching its content is a conflict.
pub fn update_document(
    conn: &mut PgConnection,
    document_id: Uuid,
    req: &UpdateDocumentRequest,
) -> ApiResult<EducationDocument> {
    let document = get_document(conn, document_id)?;
    let edits_content =
        req.title.is_some() || req.summary.is_some() || req.document_url.is_some();
    if document.status == STATUS_APPROVED && edits_content {
        return Err(ApiError::Conflict(
            "approved document content is immutable".into(),
        ));
    }
    if let Some(title) = &req.title {
        non_empty("title", title)?;
    }
    if let Some(summary) = &req.summary {
        non_empty("summary", summary)?;
    }

    let now = Utc::now();
    conn.transaction(|conn| {
        if edits_content {
            diesel::update(education_documents::table.filter(education_documents::id.eq(document_id)))
                .set((
                    req.title
                        .as_deref()
                        .map(|t| education_documents::title.eq(t.trim().to_string())),
                    req.summary
                        .as_deref()
                        .map(|s| education_documents::summary.eq(s.trim().to_string())),
                    req.document_url
                        .clone()
                        .map(|u| education_documents::document_url.eq(u)),
                    education_documents::updated_at.eq(now),
                ))
                .execute(conn)?;
        }
        if let Some(active) = req.is_active {
            diesel::update(education_documents::table.filter(education_documents::id.eq(document_id)))
                .set((
                    education_documents::is_active.eq(active),
                    education_documents::updated_at.eq(now),
                ))
                .execute(conn)?;
        }
        get_document(conn, document_id)
    })
}

/// One-way draft -> approved transition; approving twice is a no-op.
pub fn approve_document(
    conn: &mut PgConnection,
    document_id: Uuid,
) -> ApiResult<EducationDocument> {
    let document = get_document(conn, document_id)?;
    if document.status == STATUS_APPROVED {
        return Ok(document);
    }
    Ok(
        diesel::update(education_documents::table.filter(education_documents::id.eq(document_id)))
            .set((
                education_documents::status.eq(STATUS_APPROVED),
                education_documents::updated_at.eq(Utc::now()),
            ))
            .returning(EducationDocument::as_returning())
            .get_result(conn)?,
    )
}

pub fn map_document(
    conn: &mut PgConnection,
    symptom_id: Uuid,
    req: &MapDocumentRequest,
) -> ApiResult<()> {
    let symptom_exists: bool = diesel::select(diesel::dsl::exists(
        symptoms::table.filter(symptoms::id.eq(symptom_id)),
    ))
    .get_result(conn)?;
    if !symptom_exists {
        return Err(ApiError::NotFound("symptom"));
    }
    get_document(conn, req.document_id)?;

    let already_mapped: bool = diesel::select(diesel::dsl::exists(
        symptom_documents::table
            .filter(symptom_documents::symptom_id.eq(symptom_id))
            .filter(symptom_documents::document_id.eq(req.document_id)),
    ))
    .get_result(conn)?;
    if already_mapped {
        return Err(ApiError::Conflict(
            "document is already mapped to this symptom".into(),
        ));
    }

    diesel::insert_into(symptom_documents::table)
        .values(NewSymptomDocument {
            id: Uuid::new_v4(),
            symptom_id,
            document_id: req.document_id,
            position: req.position,
            created_at: Utc::now(),
        })
        .execute(conn)?;
    Ok(())
}

pub fn unmap_document(
    conn: &mut PgConnection,
    symptom_id: Uuid,
    document_id: Uuid,
) -> ApiResult<()> {
    let affected = diesel::delete(
        symptom_documents::table
            .filter(symptom_documents::symptom_id.eq(symptom_id))
            .filter(symptom_documents::document_id.eq(document_id)),
    )
    .execute(conn)?;
    if affected == 0 {
        return Err(ApiError::NotFound("symptom document mapping"));
    }
    Ok(())
}

// ---- delivery (patient portal) ----

/// Assemble the education packet for a completed symptom session and write
/// the per-document audit rows.
pub fn assemble_for_session(
    conn: &mut PgConnection,
    patient_uuid: Uuid,
    session_id: Uuid,
) -> ApiResult<EducationPacket> {
    let session: SymptomSession = symptom_sessions::table
        .filter(symptom_sessions::id.eq(session_id))
        .filter(symptom_sessions::patient_uuid.eq(patient_uuid))
        .select(SymptomSession::as_select())
        .first(conn)
        .optional()?
        .ok_or(ApiError::NotFound("symptom session"))?;
    if session.completed_at.is_none() {
        return Err(ApiError::Conflict("symptom session is not completed".into()));
    }

    let codes: Vec<String> =
        serde_json::from_value(session.flagged_symptom_codes.clone()).unwrap_or_default();
    let mut documents: Vec<EducationDocument> = Vec::new();
    for code in &codes {
        let mapped = documents_for_symptom_code(conn, code)?;
        for document in mapped {
            if !documents.iter().any(|d| d.id == document.id) {
                documents.push(document);
            }
        }
    }

    let now = Utc::now();
    let audit_rows: Vec<NewEducationDelivery> = documents
        .iter()
        .map(|d| NewEducationDelivery {
            id: Uuid::new_v4(),
            session_id,
            document_id: d.id,
            delivered_at: now,
        })
        .collect();
    if !audit_rows.is_empty() {
        diesel::insert_into(education_deliveries::table)
            .values(&audit_rows)
            .execute(conn)?;
    }
    tracing::info!(
        session_id = %session_id,
        documents = documents.len(),
        "education packet assembled"
    );

    Ok(EducationPacket {
        session_id,
        document_ids: documents.iter().map(|d| d.id).collect(),
        content: assemble_content(&documents),
    })
}

/// Approved, active documents mapped to an active symptom, in mapping order.
fn documents_for_symptom_code(
    conn: &mut PgConnection,
    code: &str,
) -> ApiResult<Vec<EducationDocument>> {
    let symptom_id: Option<Uuid> = symptoms::table
        .filter(symptoms::code.eq(code))
        .filter(symptom_active())
        .select(symptoms::id)
        .first(conn)
        .optional()?;
    let Some(symptom_id) = symptom_id else {
        return Ok(Vec::new());
    };
    Ok(symptom_documents::table
        .inner_join(education_documents::table)
        .filter(symptom_documents::symptom_id.eq(symptom_id))
        .filter(document_approved())
        .filter(document_active())
        .order(symptom_documents::position.asc())
        .select(EducationDocument::as_select())
        .load(conn)?)
}

/// Pure assembly: document summaries in order, the fixed disclaimer, then
/// the care team handout reference.
fn assemble_content(documents: &[EducationDocument]) -> String {
    let mut content = String::new();
    for document in documents {
        content.push_str(&document.summary);
        content.push_str("\n\n");
    }
    content.push_str(DISCLAIMER);
    content.push_str("\n\n");
    content.push_str(CARE_TEAM_HANDOUT);
    content
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(summary: &str) -> EducationDocument {
        let now = Utc::now();
        EducationDocument {
            id: Uuid::new_v4(),
            title: "doc".into(),
            summary: summary.into(),
            document_url: None,
            status: STATUS_APPROVED.into(),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn assembly_preserves_order_and_appends_fixed_trailers() {
        let docs = vec![
            document("Managing nausea at home."),
            document("When to call about a fever."),
        ];
        let content = assemble_content(&docs);
        let nausea = content.find("Managing nausea").expect("first summary");
        let fever = content.find("When to call").expect("second summary");
        let disclaimer = content.find(DISCLAIMER).expect("disclaimer");
        let handout = content.find(CARE_TEAM_HANDOUT).expect("handout");
        assert!(nausea < fever && fever < disclaimer && disclaimer < handout);
    }

    #[test]
    fn empty_packet_still_carries_disclaimer_and_handout() {
        let content = assemble_content(&[]);
        assert!(content.starts_with(DISCLAIMER));
        assert!(content.ends_with(CARE_TEAM_HANDOUT));
    }
}
