//! Static course catalog browsed by students.
//!
//! # Invariants
//! - Subject ids are unique; chapter ids are unique within a subject.
//! - Every subject has at least one chapter.

/// Icon hint for a subject card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubjectIcon {
    Calculate,
    Science,
    Public,
    Book,
}

impl SubjectIcon {
    /// Icon name understood by the UI layer.
    pub fn name(self) -> &'static str {
        match self {
            Self::Calculate => "calculate",
            Self::Science => "science",
            Self::Public => "public",
            Self::Book => "book",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Video {
    pub id: &'static str,
    pub title: &'static str,
    pub url: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Test {
    pub id: &'static str,
    pub title: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chapter {
    pub id: &'static str,
    pub title: &'static str,
    pub notes: &'static str,
    pub videos: &'static [Video],
    pub tests: &'static [Test],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subject {
    pub id: &'static str,
    pub name: &'static str,
    pub icon: SubjectIcon,
    pub chapters: &'static [Chapter],
}

impl Subject {
    /// Looks up one chapter of this subject.
    pub fn chapter(&self, chapter_id: &str) -> Option<&'static Chapter> {
        self.chapters.iter().find(|chapter| chapter.id == chapter_id)
    }
}

const fn chapter(
    id: &'static str,
    title: &'static str,
    notes: &'static str,
    videos: &'static [Video],
    tests: &'static [Test],
) -> Chapter {
    Chapter {
        id,
        title,
        notes,
        videos,
        tests,
    }
}

static SUBJECTS: &[Subject] = &[
    Subject {
        id: "math",
        name: "Mathematics",
        icon: SubjectIcon::Calculate,
        chapters: &[
            chapter(
                "algebra",
                "Algebra",
                "Notes for Algebra...",
                &[Video { id: "v1", title: "Intro to Algebra", url: "url" }],
                &[Test { id: "t1", title: "Algebra Basics Quiz" }],
            ),
            chapter(
                "geometry",
                "Geometry",
                "Notes for Geometry...",
                &[Video { id: "v2", title: "Intro to Geometry", url: "url" }],
                &[Test { id: "t2", title: "Geometry Basics Quiz" }],
            ),
        ],
    },
    Subject {
        id: "phy",
        name: "Physics",
        icon: SubjectIcon::Science,
        chapters: &[chapter(
            "mechanics",
            "Mechanics",
            "Notes for Mechanics...",
            &[Video { id: "v3", title: "Intro to Mechanics", url: "url" }],
            &[Test { id: "t3", title: "Mechanics Basics Quiz" }],
        )],
    },
    Subject {
        id: "chem",
        name: "Chemistry",
        icon: SubjectIcon::Science,
        chapters: &[chapter(
            "organic",
            "Organic Chemistry",
            "Notes for Organic Chemistry...",
            &[Video { id: "v4", title: "Intro to Organic Chemistry", url: "url" }],
            &[Test { id: "t4", title: "Organic Chemistry Basics Quiz" }],
        )],
    },
    Subject {
        id: "bio",
        name: "Biology",
        icon: SubjectIcon::Public,
        chapters: &[chapter(
            "cells",
            "Cells",
            "Notes for Cells...",
            &[Video { id: "v5", title: "The Cell", url: "url" }],
            &[Test { id: "t5", title: "Cell Quiz" }],
        )],
    },
    Subject {
        id: "eng",
        name: "English",
        icon: SubjectIcon::Book,
        chapters: &[chapter(
            "grammar",
            "Grammar",
            "Notes on Grammar...",
            &[Video { id: "v6", title: "Parts of Speech", url: "url" }],
            &[Test { id: "t6", title: "Grammar Test" }],
        )],
    },
];

/// All subjects in display order.
pub fn subjects() -> &'static [Subject] {
    SUBJECTS
}

/// Looks up one subject by id.
pub fn subject(subject_id: &str) -> Option<&'static Subject> {
    SUBJECTS.iter().find(|subject| subject.id == subject_id)
}
