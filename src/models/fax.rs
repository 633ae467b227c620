use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::doctor::inbound_faxes;

#[derive(Debug, Clone, Queryable, Selectable, Serialize)]
#[diesel(table_name = inbound_faxes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct InboundFax {
    pub id: Uuid,
    pub from_number: String,
    pub to_number: String,
    pub page_count: i32,
    pub document_url: Option<String>,
    pub received_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = inbound_faxes)]
pub struct NewInboundFax {
    pub id: Uuid,
    pub from_number: String,
    pub to_number: String,
    pub page_count: i32,
    pub document_url: Option<String>,
    pub received_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Payload the fax provider posts to the inbound webhook.
#[derive(Debug, Deserialize)]
pub struct InboundFaxEvent {
    pub from_number: String,
    pub to_number: String,
    pub page_count: i32,
    pub document_url: Option<String>,
    pub received_at: DateTime<Utc>,
}

impl InboundFaxEvent {
    pub fn to_fax(&self) -> NewInboundFax {
        NewInboundFax {
            id: Uuid::new_v4(),
            from_number: self.from_number.clone(),
            to_number: self.to_number.clone(),
            page_count: self.page_count,
            document_url: self.document_url.clone(),
            received_at: self.received_at,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SendFaxRequest {
    pub to_number: String,
    pub document_url: String,
}
