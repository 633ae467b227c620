//! Table definitions for the two portal databases. `doctor` and `patient`
//! are separate Postgres databases; tables from different modules never
//! appear in the same query.

pub mod doctor;
pub mod patient;
