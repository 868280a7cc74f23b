//! Core business logic - framework-agnostic operations on the building's books.
//!
//! Every function takes the database connection explicitly and keeps no state
//! between calls. The presentation layer owns the [`crate::session::Session`]
//! and passes it in where an operation is restricted to administrators.

pub mod auth;
pub mod bank;
pub mod building;
pub mod dues;
pub mod expense;
pub mod export;
pub mod ledger;
pub mod report;
pub mod resident;
pub mod validation;
