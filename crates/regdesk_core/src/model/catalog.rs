//! Dropdown option catalogs for the registration forms and admin filters.
//!
//! Values are persisted verbatim, so renaming an entry orphans stored records.

use serde::{Deserialize, Serialize};

/// Registration screen a draft belongs to.
///
/// The two screens collect the same record but differ in option sets,
/// messages, course-type validation and persistence path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormVariant {
    /// Course enrollment form; course type comes from the route.
    Enrollment,
    /// Signed-in user's own profile form; course type and notes are editable.
    Profile,
}

/// Option lists rendered by one form variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormOptions {
    pub classes: &'static [&'static str],
    pub courses: &'static [&'static str],
    /// Empty when the variant takes course type from elsewhere.
    pub course_types: &'static [&'static str],
    pub media: &'static [&'static str],
    pub boards: &'static [&'static str],
}

/// Option lists rendered by the admin listing filters.
///
/// The leading `""` entry means "All".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterOptions {
    pub classes: &'static [&'static str],
    pub courses: &'static [&'static str],
    pub boards: &'static [&'static str],
}

const CLASSES: &[&str] = &["4", "5", "6", "7", "8", "9", "10", "11", "12"];
const MEDIA: &[&str] = &["English", "Hindi", "Bilingual"];

const ENROLLMENT_OPTIONS: FormOptions = FormOptions {
    classes: CLASSES,
    courses: &[
        "JEE",
        "NEET",
        "Foundation",
        "Commerce",
        "Arts",
        "Polytechnic",
        "Paramedical",
        "NDA",
        "Competitive",
    ],
    course_types: &[],
    media: MEDIA,
    boards: &["CBSE", "ICSE", "Bihar Board", "Other State Board"],
};

const PROFILE_OPTIONS: FormOptions = FormOptions {
    classes: CLASSES,
    courses: &["JEE", "NEET", "Foundation", "NDA", "Airforce", "Other"],
    course_types: &["Regular", "Crash", "Online", "Offline"],
    media: MEDIA,
    boards: &["CBSE", "ICSE", "Bihar Board", "State Board", "Other"],
};

const ADMIN_FILTER_OPTIONS: FilterOptions = FilterOptions {
    classes: &["", "4", "5", "6", "7", "8", "9", "10", "11", "12"],
    courses: &["", "JEE", "NEET", "Foundation", "NDA", "Airforce", "Other"],
    boards: &["", "CBSE", "ICSE", "Bihar Board", "State Board", "Other"],
};

impl FormVariant {
    /// Dropdown catalogs rendered by this variant.
    pub fn options(self) -> &'static FormOptions {
        match self {
            Self::Enrollment => &ENROLLMENT_OPTIONS,
            Self::Profile => &PROFILE_OPTIONS,
        }
    }

    /// Whether the course type field is user-editable and validated.
    pub fn validates_course_type(self) -> bool {
        matches!(self, Self::Profile)
    }
}

/// Filter catalogs for the admin listing.
pub fn admin_filter_options() -> &'static FilterOptions {
    &ADMIN_FILTER_OPTIONS
}

/// Display label for a filter option; blank means no constraint.
pub fn filter_option_label(option: &str) -> &str {
    if option.trim().is_empty() {
        "All"
    } else {
        option
    }
}

#[cfg(test)]
mod tests {
    use super::{admin_filter_options, filter_option_label, FormVariant};

    #[test]
    fn only_profile_offers_course_types() {
        assert!(FormVariant::Enrollment.options().course_types.is_empty());
        assert_eq!(FormVariant::Profile.options().course_types.len(), 4);
        assert!(FormVariant::Profile.validates_course_type());
        assert!(!FormVariant::Enrollment.validates_course_type());
    }

    #[test]
    fn admin_filters_start_with_all() {
        let filters = admin_filter_options();
        for options in [filters.classes, filters.courses, filters.boards] {
            assert_eq!(filter_option_label(options[0]), "All");
        }
    }
}
