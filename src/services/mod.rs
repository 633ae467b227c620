//! Per-domain business logic. Service functions are synchronous diesel code;
//! handlers run them on the blocking pool through `db::execute`.

pub mod chat;
pub mod chemo;
pub mod clinic;
pub mod dashboard;
pub mod diary;
pub mod education;
pub mod fax;
pub mod onboarding;
pub mod patient;
pub mod principal;
pub mod question;
pub mod registration;
pub mod staff;

use crate::error::{ApiError, ApiResult};

/// Reject blank or whitespace-only required fields.
pub(crate) fn non_empty(field: &'static str, value: &str) -> ApiResult<()> {
    if value.trim().is_empty() {
        return Err(ApiError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_fields_fail_validation() {
        assert!(non_empty("question_text", "").is_err());
        assert!(non_empty("question_text", "   ").is_err());
        assert!(non_empty("question_text", "\n\t").is_err());
        assert!(non_empty("question_text", "ok").is_ok());
    }
}
