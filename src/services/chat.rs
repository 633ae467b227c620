//! Conversations and ordered messages, plus the thin symptom-matcher
//! wrapper. The matcher is deliberately dumb: it scans patient text for
//! active symptom names/codes and accumulates them in the conversation's
//! `engine_state`; the full rule engine lives outside this codebase.

use chrono::Utc;
use diesel::prelude::*;
use serde_json::Value;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::chat::{
    Conversation, ConversationView, Message, NewConversation, NewMessage, SENDER_ASSISTANT,
    SENDER_PATIENT, STATE_ACTIVE, STATE_COMPLETED, StartConversationRequest,
};
use crate::models::education::{NewSymptomSession, Symptom, SymptomSession, symptom_active};
use crate::schema::patient::{conversations, messages, symptom_sessions, symptoms};
use crate::services::non_empty;

pub fn start(
    conn: &mut PgConnection,
    patient_uuid: Uuid,
    req: &StartConversationRequest,
) -> ApiResult<ConversationView> {
    if let Some(message) = &req.message {
        non_empty("message", message)?;
    }
    let conversation: Conversation = diesel::insert_into(conversations::table)
        .values(NewConversation::start(patient_uuid))
        .returning(Conversation::as_returning())
        .get_result(conn)?;
    tracing::info!(conversation_id = %conversation.id, "conversation started");

    match &req.message {
        Some(message) => post_message(conn, patient_uuid, conversation.id, message),
        None => Ok(ConversationView {
            conversation,
            messages: Vec::new(),
        }),
    }
}

/// Newest conversation first.
pub fn list(conn: &mut PgConnection, patient_uuid: Uuid) -> ApiResult<Vec<Conversation>> {
    Ok(conversations::table
        .filter(conversations::patient_uuid.eq(patient_uuid))
        .order(conversations::created_at.desc())
        .select(Conversation::as_select())
        .load(conn)?)
}

pub fn get(
    conn: &mut PgConnection,
    patient_uuid: Uuid,
    conversation_id: Uuid,
) -> ApiResult<ConversationView> {
    let conversation = owned(conn, patient_uuid, conversation_id)?;
    let messages = messages_of(conn, conversation_id)?;
    Ok(ConversationView {
        conversation,
        messages,
    })
}

/// Append a patient message, run the symptom matcher, and append the
/// deterministic acknowledgement reply, all in one transaction.
pub fn post_message(
    conn: &mut PgConnection,
    patient_uuid: Uuid,
    conversation_id: Uuid,
    body: &str,
) -> ApiResult<ConversationView> {
    non_empty("body", body)?;
    let conversation = owned(conn, patient_uuid, conversation_id)?;
    if conversation.conversation_state != STATE_ACTIVE {
        return Err(ApiError::Conflict(
            "conversation is already completed".into(),
        ));
    }

    let conversation = conn.transaction(|conn| {
        let next_seq: i32 = messages::table
            .filter(messages::conversation_id.eq(conversation_id))
            .select(diesel::dsl::max(messages::seq))
            .first::<Option<i32>>(conn)?
            .unwrap_or(0)
            + 1;
        diesel::insert_into(messages::table)
            .values(NewMessage::next(
                conversation_id,
                next_seq,
                SENDER_PATIENT,
                body.trim(),
            ))
            .execute(conn)?;

        let known: Vec<Symptom> = symptoms::table
            .filter(symptom_active())
            .select(Symptom::as_select())
            .load(conn)?;
        let flagged = flag_symptoms(body, &known);
        let mut engine_state = conversation.engine_state.clone();
        merge_flags(&mut engine_state, &flagged);

        diesel::insert_into(messages::table)
            .values(NewMessage::next(
                conversation_id,
                next_seq + 1,
                SENDER_ASSISTANT,
                &acknowledgement(&flagged),
            ))
            .execute(conn)?;

        diesel::update(conversations::table.filter(conversations::id.eq(conversation_id)))
            .set((
                conversations::engine_state.eq(&engine_state),
                conversations::updated_at.eq(Utc::now()),
            ))
            .returning(Conversation::as_returning())
            .get_result(conn)
            .map_err(ApiError::from)
    })?;

    let messages = messages_of(conn, conversation_id)?;
    Ok(ConversationView {
        conversation,
        messages,
    })
}

/// Close the conversation and snapshot its flagged symptoms into a
/// symptom session for education delivery.
pub fn complete(
    conn: &mut PgConnection,
    patient_uuid: Uuid,
    conversation_id: Uuid,
) -> ApiResult<SymptomSession> {
    let conversation = owned(conn, patient_uuid, conversation_id)?;
    if conversation.conversation_state != STATE_ACTIVE {
        return Err(ApiError::Conflict(
            "conversation is already completed".into(),
        ));
    }

    conn.transaction(|conn| {
        let now = Utc::now();
        diesel::update(conversations::table.filter(conversations::id.eq(conversation_id)))
            .set((
                conversations::conversation_state.eq(STATE_COMPLETED),
                conversations::updated_at.eq(now),
            ))
            .execute(conn)?;

        let codes = flagged_codes(&conversation.engine_state);
        let session = diesel::insert_into(symptom_sessions::table)
            .values(NewSymptomSession {
                id: Uuid::new_v4(),
                patient_uuid,
                conversation_id: Some(conversation_id),
                flagged_symptom_codes: Value::from(codes.clone()),
                completed_at: Some(now),
                created_at: now,
            })
            .returning(SymptomSession::as_returning())
            .get_result(conn)?;
        tracing::info!(
            conversation_id = %conversation_id,
            session_id = %session.id,
            flagged = codes.len(),
            "conversation completed"
        );
        Ok(session)
    })
}

/// Hard delete, cascading to the conversation's messages.
pub fn delete(
    conn: &mut PgConnection,
    patient_uuid: Uuid,
    conversation_id: Uuid,
) -> ApiResult<()> {
    conn.transaction(|conn| {
        diesel::delete(messages::table.filter(messages::conversation_id.eq(conversation_id)))
            .execute(conn)?;
        let affected = diesel::delete(
            conversations::table
                .filter(conversations::id.eq(conversation_id))
                .filter(conversations::patient_uuid.eq(patient_uuid)),
        )
        .execute(conn)?;
        if affected == 0 {
            return Err(ApiError::NotFound("conversation"));
        }
        Ok(())
    })
}

fn owned(
    conn: &mut PgConnection,
    patient_uuid: Uuid,
    conversation_id: Uuid,
) -> ApiResult<Conversation> {
    conversations::table
        .filter(conversations::id.eq(conversation_id))
        .filter(conversations::patient_uuid.eq(patient_uuid))
        .select(Conversation::as_select())
        .first(conn)
        .optional()?
        .ok_or(ApiError::NotFound("conversation"))
}

fn messages_of(conn: &mut PgConnection, conversation_id: Uuid) -> ApiResult<Vec<Message>> {
    Ok(messages::table
        .filter(messages::conversation_id.eq(conversation_id))
        .order(messages::seq.asc())
        .select(Message::as_select())
        .load(conn)?)
}

/// Case-insensitive scan of the message for active symptom names or codes.
fn flag_symptoms(body: &str, known: &[Symptom]) -> Vec<String> {
    let lower = body.to_lowercase();
    known
        .iter()
        .filter(|s| lower.contains(&s.name.to_lowercase()) || lower.contains(&s.code))
        .map(|s| s.code.clone())
        .collect()
}

fn merge_flags(engine_state: &mut Value, new_codes: &[String]) {
    if !engine_state.is_object() {
        *engine_state = serde_json::json!({});
    }
    let Value::Object(obj) = engine_state else {
        return;
    };
    let entry = obj
        .entry("flagged_symptoms")
        .or_insert_with(|| Value::Array(Vec::new()));
    if !entry.is_array() {
        *entry = Value::Array(Vec::new());
    }
    if let Value::Array(arr) = entry {
        for code in new_codes {
            if !arr.iter().any(|v| v.as_str() == Some(code)) {
                arr.push(Value::String(code.clone()));
            }
        }
    }
}

pub(crate) fn flagged_codes(engine_state: &Value) -> Vec<String> {
    engine_state
        .get("flagged_symptoms")
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

fn acknowledgement(new_codes: &[String]) -> String {
    if new_codes.is_empty() {
        "Thank you, your message has been recorded. Contact your care team if your symptoms \
         worsen."
            .to_string()
    } else {
        format!(
            "Thank you, your message has been recorded. Noted symptoms: {}.",
            new_codes.join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn symptom(code: &str, name: &str) -> Symptom {
        let now = Utc::now();
        Symptom {
            id: Uuid::new_v4(),
            code: code.into(),
            name: name.into(),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn matcher_finds_names_case_insensitively() {
        let known = vec![symptom("nausea", "Nausea"), symptom("fatigue", "Fatigue")];
        let flagged = flag_symptoms("I felt some NAUSEA after lunch", &known);
        assert_eq!(flagged, vec!["nausea"]);
    }

    #[test]
    fn matcher_returns_nothing_for_unrelated_text() {
        let known = vec![symptom("nausea", "Nausea")];
        assert!(flag_symptoms("all good today", &known).is_empty());
    }

    #[test]
    fn merge_is_idempotent_and_accumulates() {
        let mut state = serde_json::json!({ "flagged_symptoms": ["nausea"] });
        merge_flags(&mut state, &["nausea".into(), "fatigue".into()]);
        assert_eq!(flagged_codes(&state), vec!["nausea", "fatigue"]);
        merge_flags(&mut state, &["fatigue".into()]);
        assert_eq!(flagged_codes(&state), vec!["nausea", "fatigue"]);
    }

    #[test]
    fn merge_repairs_a_malformed_engine_state() {
        let mut state = Value::Null;
        merge_flags(&mut state, &["nausea".into()]);
        assert_eq!(flagged_codes(&state), vec!["nausea"]);
    }

    #[test]
    fn acknowledgement_mentions_flagged_codes() {
        let text = acknowledgement(&["nausea".into(), "fatigue".into()]);
        assert!(text.contains("nausea, fatigue"));
        assert!(acknowledgement(&[]).contains("recorded"));
    }
}
