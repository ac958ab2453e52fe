//! Mapping from submission results to user-facing notices and navigation.
//!
//! # Responsibility
//! - Turn `SubmitOutcome`/`SubmitError` into stable human-readable strings.
//! - Describe the navigation effect of a finished submission.
//!
//! # Invariants
//! - Store causes are embedded in messages; nothing here propagates errors.

use crate::model::catalog::FormVariant;
use crate::model::student::{StudentField, StudentRecord};
use crate::service::registration_service::{PersistKind, SubmitError, SubmitOutcome};

const WELCOME_NOTICE: &str = "Welcome to join SIGMA CLASSES";
const PROFILE_SAVED_NOTICE: &str = "User data saved successfully!";
const FIX_ERRORS_NOTICE: &str = "Please fix errors above";
const DUPLICATE_MOBILE_NOTICE: &str = "This mobile number is already registered";
const UNAUTHENTICATED_NOTICE: &str = "User not logged in! Please sign in to save your data.";
const FORM_CLEARED_NOTICE: &str = "Form cleared successfully";

/// Where control goes after a successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Show the confirmation view with the persisted record.
    ShowConfirmation(StudentRecord),
    /// Close the form and return to the caller.
    Dismiss,
}

/// Title and body of the dialog that gates a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmationPrompt {
    pub title: &'static str,
    pub message: &'static str,
}

impl ConfirmationPrompt {
    pub fn for_draft(draft: &StudentRecord) -> Self {
        if draft.is_new() {
            Self {
                title: "Confirm Submission",
                message: "Do you want to submit your details?",
            }
        } else {
            Self {
                title: "Confirm Update",
                message: "Update this student?",
            }
        }
    }
}

impl SubmitOutcome {
    /// Success notice shown after this outcome.
    pub fn notice(&self) -> &'static str {
        match self {
            Self::Inserted(_) | Self::Updated(_) => WELCOME_NOTICE,
            Self::ProfileSaved => PROFILE_SAVED_NOTICE,
        }
    }

    /// Navigation effect of this outcome.
    pub fn navigation(&self) -> Navigation {
        match self {
            Self::Inserted(record) => Navigation::ShowConfirmation(record.clone()),
            Self::Updated(_) | Self::ProfileSaved => Navigation::Dismiss,
        }
    }
}

impl SubmitError {
    /// Human-readable message for the form's error banner.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(_) => FIX_ERRORS_NOTICE.to_string(),
            Self::DuplicateMobile => DUPLICATE_MOBILE_NOTICE.to_string(),
            Self::DuplicateCheckFailed(err) => format!("Error checking mobile: {err}"),
            Self::Store {
                kind: PersistKind::Profile,
                source,
            } => format!("Error saving data: {source}"),
            Self::Store { source, .. } => format!("Error: {source}"),
            Self::Unauthenticated => UNAUTHENTICATED_NOTICE.to_string(),
            Self::AlreadySubmitted => "This form has already been submitted".to_string(),
        }
    }
}

/// Notice shown after the user confirms clearing a form.
pub fn form_cleared_notice() -> &'static str {
    FORM_CLEARED_NOTICE
}

/// Screen title of a registration form.
pub fn form_title(variant: FormVariant, draft: &StudentRecord) -> String {
    match (variant, draft.is_new()) {
        (FormVariant::Enrollment, true) => format!("Join {}", draft.course_type),
        (FormVariant::Enrollment, false) => format!("Edit {}", draft.course_type),
        (FormVariant::Profile, true) => "Student Details".to_string(),
        (FormVariant::Profile, false) => "Edit Student".to_string(),
    }
}

/// Label/value rows rendered by the confirmation view.
///
/// Labels are persisted field names with `_` replaced by a space and the
/// first letter upper-cased. Empty notes are omitted.
pub fn confirmation_rows(record: &StudentRecord) -> Vec<(String, String)> {
    let mut rows = StudentField::ALL
        .into_iter()
        .filter(|field| *field != StudentField::Notes || record.notes.is_some())
        .map(|field| {
            (
                display_label(field.stored_name()),
                record.field(field).to_string(),
            )
        })
        .collect::<Vec<_>>();

    if let Some(timestamp) = record.timestamp {
        rows.push((display_label("timestamp"), timestamp.to_string()));
    }
    rows
}

fn display_label(stored_name: &str) -> String {
    let spaced = stored_name.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
