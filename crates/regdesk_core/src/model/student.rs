//! Student record model.
//!
//! # Responsibility
//! - Define the single domain entity persisted by the store.
//! - Name every persisted field so validation and queries share one vocabulary.
//!
//! # Invariants
//! - `id` is `None` until the store assigns one on insert.
//! - `timestamp` is owned by the store; drafts never set it.
//! - Serialized field names match the persisted document shape
//!   (`class`, `course_type`, `school_college`, ...).

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Store-assigned document identifier.
pub type StudentId = String;

/// One student's registration data.
///
/// Missing string fields in a stored document decode as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudentRecord {
    /// Assigned by the store; kept out of the document body.
    #[serde(skip)]
    pub id: Option<StudentId>,
    pub name: String,
    pub email: String,
    /// Exactly 10 ASCII digits once validated.
    pub mobile: String,
    #[serde(rename = "class")]
    pub student_class: String,
    pub course: String,
    pub course_type: String,
    pub school_college: String,
    pub medium: String,
    pub board: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Epoch milliseconds of the last store write; kept out of the body.
    #[serde(skip)]
    pub timestamp: Option<i64>,
}

impl StudentRecord {
    /// Creates an empty draft with a preset course type.
    pub fn draft(course_type: impl Into<String>) -> Self {
        Self {
            course_type: course_type.into(),
            ..Self::default()
        }
    }

    /// Returns whether this record has not been persisted yet.
    pub fn is_new(&self) -> bool {
        self.id.as_deref().map_or(true, |id| id.trim().is_empty())
    }

    /// Returns the identifier of a persisted record.
    pub fn existing_id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.trim().is_empty())
    }

    /// Returns the value held for one field.
    pub fn field(&self, field: StudentField) -> &str {
        match field {
            StudentField::Name => &self.name,
            StudentField::Email => &self.email,
            StudentField::Mobile => &self.mobile,
            StudentField::Class => &self.student_class,
            StudentField::Course => &self.course,
            StudentField::CourseType => &self.course_type,
            StudentField::SchoolCollege => &self.school_college,
            StudentField::Medium => &self.medium,
            StudentField::Board => &self.board,
            StudentField::Notes => self.notes.as_deref().unwrap_or(""),
        }
    }

    /// Overwrites one field. Empty notes are stored as `None`.
    pub fn set_field(&mut self, field: StudentField, value: impl Into<String>) {
        let value = value.into();
        match field {
            StudentField::Name => self.name = value,
            StudentField::Email => self.email = value,
            StudentField::Mobile => self.mobile = value,
            StudentField::Class => self.student_class = value,
            StudentField::Course => self.course = value,
            StudentField::CourseType => self.course_type = value,
            StudentField::SchoolCollege => self.school_college = value,
            StudentField::Medium => self.medium = value,
            StudentField::Board => self.board = value,
            StudentField::Notes => {
                self.notes = if value.is_empty() { None } else { Some(value) };
            }
        }
    }
}

/// Editable fields of a [`StudentRecord`], in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StudentField {
    Name,
    Email,
    Mobile,
    Class,
    Course,
    CourseType,
    SchoolCollege,
    Medium,
    Board,
    Notes,
}

impl StudentField {
    pub const ALL: [StudentField; 10] = [
        Self::Name,
        Self::Email,
        Self::Mobile,
        Self::Class,
        Self::Course,
        Self::CourseType,
        Self::SchoolCollege,
        Self::Medium,
        Self::Board,
        Self::Notes,
    ];

    /// Field name as persisted in store documents.
    pub fn stored_name(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Mobile => "mobile",
            Self::Class => "class",
            Self::Course => "course",
            Self::CourseType => "course_type",
            Self::SchoolCollege => "school_college",
            Self::Medium => "medium",
            Self::Board => "board",
            Self::Notes => "notes",
        }
    }

    /// Parses a persisted field name.
    pub fn from_stored_name(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|field| field.stored_name() == value)
    }
}

impl Display for StudentField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.stored_name())
    }
}
