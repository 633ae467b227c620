//! Route handlers, one module per resource group. Each module exposes a
//! `configure` function the binaries mount under `/api/v1`.

pub mod auth;
pub mod chat;
pub mod chemo;
pub mod clinic;
pub mod dashboard;
pub mod diary;
pub mod docs;
pub mod education;
pub mod fax;
pub mod health;
pub mod onboarding;
pub mod patient;
pub mod question;
pub mod registration;
pub mod staff;
