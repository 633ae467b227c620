//! Row structs and request/response bodies, one module per domain.
//!
//! Every soft-deleting table exposes its `is_deleted = false` predicate as a
//! single `not_deleted()` helper here; queries compose it instead of
//! repeating the condition.

pub mod account;
pub mod chat;
pub mod chemo;
pub mod clinic;
pub mod diary;
pub mod education;
pub mod fax;
pub mod patient;
pub mod question;
pub mod staff;
