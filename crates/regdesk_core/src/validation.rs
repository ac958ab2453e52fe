//! Client-side draft validation.
//!
//! # Responsibility
//! - Map a draft to per-field error messages and an overall verdict.
//!
//! # Invariants
//! - Every field is checked independently; one failing field never hides
//!   another.
//! - At most one message per field.
//! - Pure: no store access, no logging, no mutation of the draft.

use crate::model::catalog::FormVariant;
use crate::model::student::{StudentField, StudentRecord};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

/// Required mobile number length in characters.
pub const MOBILE_LEN: usize = 10;

static MOBILE_INPUT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{0,10}$").expect("valid mobile input regex"));

/// Per-field validation outcome for one draft.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    errors: BTreeMap<StudentField, &'static str>,
}

impl ValidationReport {
    /// Whether no field failed.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Error message for one field, if it failed.
    pub fn error_for(&self, field: StudentField) -> Option<&'static str> {
        self.errors.get(&field).copied()
    }

    /// Failing fields with their messages, in form order.
    pub fn errors(&self) -> impl Iterator<Item = (StudentField, &'static str)> + '_ {
        self.errors.iter().map(|(field, message)| (*field, *message))
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validates a draft exactly as entered (untrimmed).
///
/// Rules:
/// - name, school/college: blank (whitespace-only included) is rejected.
/// - email: blank or missing `@` is rejected; nothing beyond that.
/// - mobile: character count must be [`MOBILE_LEN`]. Digits are enforced at
///   input time by [`accept_mobile_input`].
/// - class, course, medium, board: empty is rejected.
/// - course type: blank is rejected on [`FormVariant::Profile`] only.
pub fn validate_draft(draft: &StudentRecord, variant: FormVariant) -> ValidationReport {
    let mut errors = BTreeMap::new();

    for field in StudentField::ALL {
        if let Some(message) = check_field(draft, field, variant) {
            errors.insert(field, message);
        }
    }

    ValidationReport { errors }
}

/// Whether mobile form input may replace the current value.
///
/// Input longer than [`MOBILE_LEN`] or containing non-digits is rejected and
/// the caller keeps the previous value.
pub fn accept_mobile_input(input: &str) -> bool {
    MOBILE_INPUT_RE.is_match(input)
}

fn check_field(
    draft: &StudentRecord,
    field: StudentField,
    variant: FormVariant,
) -> Option<&'static str> {
    let value = draft.field(field);
    let failed = match field {
        StudentField::Name | StudentField::SchoolCollege => is_blank(value),
        StudentField::Email => is_blank(value) || !value.contains('@'),
        StudentField::Mobile => value.chars().count() != MOBILE_LEN,
        StudentField::Class | StudentField::Course | StudentField::Medium | StudentField::Board => {
            value.is_empty()
        }
        StudentField::CourseType => variant.validates_course_type() && is_blank(value),
        StudentField::Notes => false,
    };

    if failed {
        error_message(field, variant)
    } else {
        None
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn error_message(field: StudentField, variant: FormVariant) -> Option<&'static str> {
    let message = match (variant, field) {
        (FormVariant::Enrollment, StudentField::Name) => "Name cannot be empty",
        (FormVariant::Enrollment, StudentField::Email) => "Enter a valid email",
        (FormVariant::Enrollment, StudentField::Mobile) => "Enter 10 digit mobile number",
        (FormVariant::Enrollment, StudentField::Class) => "Select a class",
        (FormVariant::Enrollment, StudentField::Course) => "Select a course",
        (FormVariant::Enrollment, StudentField::SchoolCollege) => "School/College cannot be empty",
        (FormVariant::Enrollment, StudentField::Medium) => "Select a medium",
        (FormVariant::Enrollment, StudentField::Board) => "Select a board",
        (FormVariant::Profile, StudentField::Name) => "Name required",
        (FormVariant::Profile, StudentField::Email) => "Valid email required",
        (FormVariant::Profile, StudentField::Mobile) => "10 digit mobile required",
        (FormVariant::Profile, StudentField::Class) => "Class required",
        (FormVariant::Profile, StudentField::Course) => "Course required",
        (FormVariant::Profile, StudentField::CourseType) => "Course type required",
        (FormVariant::Profile, StudentField::SchoolCollege) => "School/College required",
        (FormVariant::Profile, StudentField::Medium) => "Medium required",
        (FormVariant::Profile, StudentField::Board) => "Board required",
        (FormVariant::Enrollment, StudentField::CourseType) | (_, StudentField::Notes) => {
            return None
        }
    };
    Some(message)
}
