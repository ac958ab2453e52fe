//! Navigation state for browsing the course catalog.
//!
//! The current screen is one tagged variant instead of a pair of nullable
//! selections, so an impossible combination (chapter without subject) cannot
//! be represented.

use crate::model::course_catalog::{self, Chapter, Subject};

/// Content section shown for a chapter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChapterTab {
    #[default]
    Notes,
    Videos,
    Tests,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourseView {
    SubjectList,
    ChapterList {
        subject: &'static Subject,
    },
    ChapterContent {
        subject: &'static Subject,
        chapter: &'static Chapter,
        tab: ChapterTab,
    },
}

/// Course catalog browser driven by user selections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CourseBrowser {
    view: CourseView,
}

impl Default for CourseBrowser {
    fn default() -> Self {
        Self::new()
    }
}

impl CourseBrowser {
    pub fn new() -> Self {
        Self {
            view: CourseView::SubjectList,
        }
    }

    pub fn view(&self) -> CourseView {
        self.view
    }

    /// Subjects offered on the subject list.
    pub fn subjects(&self) -> &'static [Subject] {
        course_catalog::subjects()
    }

    /// Opens a subject's chapter list. Only valid from the subject list.
    pub fn select_subject(&mut self, subject_id: &str) -> bool {
        let CourseView::SubjectList = self.view else {
            return false;
        };
        match course_catalog::subject(subject_id) {
            Some(subject) => {
                self.view = CourseView::ChapterList { subject };
                true
            }
            None => false,
        }
    }

    /// Opens a chapter of the current subject on its notes tab.
    pub fn select_chapter(&mut self, chapter_id: &str) -> bool {
        let CourseView::ChapterList { subject } = self.view else {
            return false;
        };
        match subject.chapter(chapter_id) {
            Some(chapter) => {
                self.view = CourseView::ChapterContent {
                    subject,
                    chapter,
                    tab: ChapterTab::default(),
                };
                true
            }
            None => false,
        }
    }

    /// Switches the visible section of the open chapter.
    pub fn select_tab(&mut self, tab: ChapterTab) -> bool {
        match &mut self.view {
            CourseView::ChapterContent { tab: current, .. } => {
                *current = tab;
                true
            }
            _ => false,
        }
    }

    /// Goes one level up. Returns `false` on the subject list.
    pub fn back(&mut self) -> bool {
        self.view = match self.view {
            CourseView::SubjectList => return false,
            CourseView::ChapterList { .. } => CourseView::SubjectList,
            CourseView::ChapterContent { subject, .. } => CourseView::ChapterList { subject },
        };
        true
    }
}
