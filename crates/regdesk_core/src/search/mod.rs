//! Listing filters over loaded student records.
//!
//! # Invariants
//! - Filtering is pure and preserves input order.

pub mod filter;
