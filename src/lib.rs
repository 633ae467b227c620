//! careportal - multi-tenant healthcare portal backends.
//!
//! One library, two binaries: `doctor-api` (physician/staff portal) and
//! `patient-api` (patient portal). Each portal owns one Postgres database;
//! both processes pool connections to both databases because the dashboard
//! and education content administration read across the boundary. Writes are
//! never coordinated between the two databases.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod fax;
pub mod handlers;
pub mod models;
pub mod notify;
pub mod schema;
pub mod services;

pub use error::{ApiError, ApiResult};
