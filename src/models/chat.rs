use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::schema::patient::{conversations, messages};

/// Conversation lifecycle. `active` accepts messages; `completed` has been
/// snapshotted into a symptom session and is read-only.
pub const STATE_ACTIVE: &str = "active";
pub const STATE_COMPLETED: &str = "completed";

pub const SENDER_PATIENT: &str = "patient";
pub const SENDER_ASSISTANT: &str = "assistant";

#[derive(Debug, Clone, Queryable, Selectable, Serialize)]
#[diesel(table_name = conversations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Conversation {
    pub id: Uuid,
    pub patient_uuid: Uuid,
    pub conversation_state: String,
    pub engine_state: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = conversations)]
pub struct NewConversation {
    pub id: Uuid,
    pub patient_uuid: Uuid,
    pub conversation_state: String,
    pub engine_state: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NewConversation {
    pub fn start(patient_uuid: Uuid) -> Self {
        let now = Utc::now();
        NewConversation {
            id: Uuid::new_v4(),
            patient_uuid,
            conversation_state: STATE_ACTIVE.to_string(),
            engine_state: serde_json::json!({ "flagged_symptoms": [] }),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Messages are ordered within a conversation by `seq`, assigned on insert.
#[derive(Debug, Clone, Queryable, Selectable, Serialize)]
#[diesel(table_name = messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Message {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub seq: i32,
    pub sender: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = messages)]
pub struct NewMessage {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub seq: i32,
    pub sender: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl NewMessage {
    pub fn next(conversation_id: Uuid, seq: i32, sender: &str, body: &str) -> Self {
        NewMessage {
            id: Uuid::new_v4(),
            conversation_id,
            seq,
            sender: sender.to_string(),
            body: body.to_string(),
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct StartConversationRequest {
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PostMessageRequest {
    pub body: String,
}

#[derive(Debug, Serialize)]
pub struct ConversationView {
    pub conversation: Conversation,
    pub messages: Vec<Message>,
}
