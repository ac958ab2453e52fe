//! Core domain logic for student registration.
//! This crate is the single source of truth for business invariants.

pub mod config;
pub mod db;
pub mod export;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;
pub mod validation;

pub use config::RegdeskConfig;
pub use export::csv_export::{
    export_csv, render_csv, write_csv, CsvLayout, ExportError, ExportResult, EXPORT_FILE_NAME,
};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::catalog::{admin_filter_options, FilterOptions, FormOptions, FormVariant};
pub use model::student::{StudentField, StudentId, StudentRecord};
pub use repo::student_store::{
    profile_collection, SqliteStudentStore, StoreError, StoreResult, StudentStore,
    ENROLLMENT_COLLECTION, PROFILE_DOCUMENT_ID,
};
pub use search::filter::StudentFilter;
pub use service::course_browser::{ChapterTab, CourseBrowser, CourseView};
pub use service::listing_service::{ListingError, ListingService};
pub use service::notice::{confirmation_rows, ConfirmationPrompt, Navigation};
pub use service::registration_service::{
    PersistKind, RegistrationForm, RegistrationService, SubmissionState, SubmitError,
    SubmitErrorKind, SubmitOutcome,
};
pub use service::session::SessionContext;
pub use validation::{accept_mobile_input, validate_draft, ValidationReport, MOBILE_LEN};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
