//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the document store contract consumed by services.
//! - Isolate SQLite query details from submission orchestration.
//!
//! # Invariants
//! - Store APIs return semantic errors (`NotFound`, `InvalidField`) in
//!   addition to DB transport errors.
//! - A single document write is atomic; nothing spans two calls.

pub mod student_store;
