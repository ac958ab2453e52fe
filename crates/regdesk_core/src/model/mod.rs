//! Domain model for student registration.
//!
//! # Responsibility
//! - Define the canonical student record shared by forms, listing and export.
//! - Hold the static option catalogs rendered as dropdowns.
//!
//! # Invariants
//! - A record without an identifier has never been persisted.
//! - Stored field names are stable and shared by every store implementation.

pub mod catalog;
pub mod course_catalog;
pub mod student;
