//! Inbound fax webhook persistence. Outbound sending lives in
//! `crate::fax::FaxClient`.

use diesel::prelude::*;

use crate::error::ApiResult;
use crate::models::fax::{InboundFax, InboundFaxEvent};
use crate::schema::doctor::inbound_faxes;

pub fn record_inbound(conn: &mut PgConnection, event: &InboundFaxEvent) -> ApiResult<InboundFax> {
    let fax = diesel::insert_into(inbound_faxes::table)
        .values(event.to_fax())
        .returning(InboundFax::as_returning())
        .get_result(conn)?;
    tracing::info!(fax_id = %fax.id, from = %fax.from_number, "inbound fax recorded");
    Ok(fax)
}

pub fn list_inbound(conn: &mut PgConnection) -> ApiResult<Vec<InboundFax>> {
    Ok(inbound_faxes::table
        .order(inbound_faxes::received_at.desc())
        .select(InboundFax::as_select())
        .load(conn)?)
}
