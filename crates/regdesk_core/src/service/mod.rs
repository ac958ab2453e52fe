//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store calls into use-case level APIs.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod course_browser;
pub mod listing_service;
pub mod notice;
pub mod registration_service;
pub mod session;
