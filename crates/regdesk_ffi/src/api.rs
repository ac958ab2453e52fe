//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose registration, listing, export and catalog use-cases to Dart
//!   via FRB.
//! - Convert core errors into response envelopes with user-facing messages.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Store-backed functions are not `sync`; FRB runs them off the UI thread.
//! - Every store-backed call opens its own connection; no connection is
//!   shared between calls.

use log::warn;
use regdesk_core::db::open_db;
use regdesk_core::model::course_catalog::{Chapter, Subject};
use regdesk_core::model::catalog::filter_option_label;
use regdesk_core::service::notice::{form_cleared_notice, form_title};
use regdesk_core::{
    accept_mobile_input as accept_mobile_input_inner, admin_filter_options,
    confirmation_rows as confirmation_rows_inner, core_version as core_version_inner,
    init_logging as init_logging_inner, ping as ping_inner, validate_draft, ChapterTab,
    CourseBrowser, CourseView, CsvLayout, FormVariant, ListingService, Navigation, RegdeskConfig,
    RegistrationForm, RegistrationService, SessionContext, SqliteStudentStore, StoreError,
    StudentFilter, StudentRecord, SubmitErrorKind, ValidationReport,
};
use std::path::PathBuf;
use std::sync::OnceLock;

static CONFIG: OnceLock<RegdeskConfig> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive);
///   blank uses `REGDESK_LOG_LEVEL` or the build default.
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Sync call; may perform small file-system setup work.
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    let level = if level.trim().is_empty() {
        resolve_config().log_level.clone()
    } else {
        level
    };
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Student record as seen by Dart.
///
/// `id` is `None` for drafts that were never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentItem {
    pub id: Option<String>,
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub student_class: String,
    pub course: String,
    pub course_type: String,
    pub school_college: String,
    pub medium: String,
    pub board: String,
    pub notes: Option<String>,
    /// Store write time in epoch milliseconds.
    pub timestamp: Option<i64>,
}

impl From<StudentRecord> for StudentItem {
    fn from(record: StudentRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            email: record.email,
            mobile: record.mobile,
            student_class: record.student_class,
            course: record.course,
            course_type: record.course_type,
            school_college: record.school_college,
            medium: record.medium,
            board: record.board,
            notes: record.notes,
            timestamp: record.timestamp,
        }
    }
}

impl From<StudentItem> for StudentRecord {
    fn from(item: StudentItem) -> Self {
        Self {
            id: item.id.filter(|id| !id.trim().is_empty()),
            name: item.name,
            email: item.email,
            mobile: item.mobile,
            student_class: item.student_class,
            course: item.course,
            course_type: item.course_type,
            school_college: item.school_college,
            medium: item.medium,
            board: item.board,
            notes: item.notes.filter(|notes| !notes.is_empty()),
            timestamp: item.timestamp,
        }
    }
}

/// One field-scoped validation message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldErrorItem {
    /// Persisted field name (`name`, `mobile`, `school_college`, ...).
    pub field: String,
    pub message: String,
}

/// Validation result envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResponse {
    pub ok: bool,
    pub errors: Vec<FieldErrorItem>,
}

/// Submission result envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitResponse {
    /// Whether the record was persisted.
    pub ok: bool,
    /// `validation|duplicate_mobile|store|unauthenticated|already_submitted`
    /// on failure.
    pub error_kind: Option<String>,
    /// Notice shown to the user, success or failure.
    pub message: String,
    /// Field errors when `error_kind` is `validation`.
    pub field_errors: Vec<FieldErrorItem>,
    /// `show_confirmation` after insert, `dismiss` after update or profile
    /// save, `none` on failure.
    pub navigation: String,
    /// Persisted record for the confirmation view (insert only).
    pub student: Option<StudentItem>,
}

impl SubmitResponse {
    fn failure(error_kind: &str, message: impl Into<String>) -> Self {
        Self {
            ok: false,
            error_kind: Some(error_kind.to_string()),
            message: message.into(),
            field_errors: Vec::new(),
            navigation: "none".to_string(),
            student: None,
        }
    }
}

/// Listing result envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentListResponse {
    pub ok: bool,
    /// Records in store order.
    pub items: Vec<StudentItem>,
    pub message: String,
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    pub ok: bool,
    pub message: String,
}

/// CSV export result envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportResponse {
    pub ok: bool,
    /// Written file, `None` when nothing was exported.
    pub path: Option<String>,
    pub message: String,
}

/// Dropdown catalogs of one form variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormOptionsResponse {
    pub title: String,
    pub classes: Vec<String>,
    pub courses: Vec<String>,
    /// Empty for the enrollment form.
    pub course_types: Vec<String>,
    pub media: Vec<String>,
    pub boards: Vec<String>,
    /// Notice shown after the user confirms clearing the form.
    pub cleared_notice: String,
}

/// Admin filter catalogs; `""` means "All".
///
/// `*_labels` are the display texts of the values at the same index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOptionsResponse {
    pub classes: Vec<String>,
    pub class_labels: Vec<String>,
    pub courses: Vec<String>,
    pub course_labels: Vec<String>,
    pub boards: Vec<String>,
    pub board_labels: Vec<String>,
}

/// Label/value row of the confirmation view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationRowItem {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectItem {
    pub id: String,
    pub name: String,
    /// Icon name (`calculate|science|public|book`).
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterItem {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoItem {
    pub id: String,
    pub title: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterContentItem {
    pub id: String,
    pub title: String,
    /// `notes|videos|tests`.
    pub tab: String,
    pub notes: String,
    pub videos: Vec<VideoItem>,
    /// Test titles.
    pub tests: Vec<String>,
}

/// Course browser screen reached by a selection path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseViewResponse {
    pub ok: bool,
    /// `subject_list|chapter_list|chapter_content`.
    pub screen: String,
    pub message: String,
    pub subjects: Vec<SubjectItem>,
    pub chapters: Vec<ChapterItem>,
    pub content: Option<ChapterContentItem>,
}

/// Checks whether typed mobile input may replace the current value.
///
/// # FFI contract
/// - Sync call, pure.
#[flutter_rust_bridge::frb(sync)]
pub fn accept_mobile_input(input: String) -> bool {
    accept_mobile_input_inner(input.as_str())
}

/// Validates a draft for `variant` (`enrollment|profile`).
///
/// # FFI contract
/// - Sync call, pure; unknown variants validate as `enrollment`.
#[flutter_rust_bridge::frb(sync)]
pub fn validate_student(draft: StudentItem, variant: String) -> ValidationResponse {
    let report = validate_draft(&draft.into(), parse_variant(&variant));
    ValidationResponse {
        ok: report.is_valid(),
        errors: field_errors(&report),
    }
}

/// Dropdown catalogs and screen title for `variant`.
#[flutter_rust_bridge::frb(sync)]
pub fn form_options(variant: String, draft: StudentItem) -> FormOptionsResponse {
    let variant = parse_variant(&variant);
    let options = variant.options();
    FormOptionsResponse {
        title: form_title(variant, &draft.into()),
        classes: to_strings(options.classes),
        courses: to_strings(options.courses),
        course_types: to_strings(options.course_types),
        media: to_strings(options.media),
        boards: to_strings(options.boards),
        cleared_notice: form_cleared_notice().to_string(),
    }
}

/// Filter catalogs of the admin listing.
#[flutter_rust_bridge::frb(sync)]
pub fn filter_options() -> FilterOptionsResponse {
    let options = admin_filter_options();
    FilterOptionsResponse {
        classes: to_strings(options.classes),
        class_labels: to_labels(options.classes),
        courses: to_strings(options.courses),
        course_labels: to_labels(options.courses),
        boards: to_strings(options.boards),
        board_labels: to_labels(options.boards),
    }
}

/// Rows rendered by the confirmation view for a persisted record.
#[flutter_rust_bridge::frb(sync)]
pub fn confirmation_rows(student: StudentItem) -> Vec<ConfirmationRowItem> {
    confirmation_rows_inner(&student.into())
        .into_iter()
        .map(|(label, value)| ConfirmationRowItem { label, value })
        .collect()
}

/// Submits a confirmed enrollment draft.
///
/// Drafts without `id` are checked for a duplicate mobile and inserted;
/// drafts with `id` replace the stored record.
///
/// # FFI contract
/// - Async (non-`sync`) call, DB-backed execution.
/// - Never panics.
/// - Exactly one persistence attempt; the caller keeps its draft on failure.
pub fn submit_enrollment(draft: StudentItem) -> SubmitResponse {
    submit_form(
        RegistrationForm::with_draft(FormVariant::Enrollment, draft.into()),
        &SessionContext::anonymous(),
    )
}

/// Saves the signed-in user's profile draft.
///
/// # FFI contract
/// - Async (non-`sync`) call, DB-backed execution.
/// - `user_id = None` or blank fails with `unauthenticated`.
pub fn submit_profile(user_id: Option<String>, draft: StudentItem) -> SubmitResponse {
    let session = user_id
        .map(SessionContext::signed_in)
        .unwrap_or_else(SessionContext::anonymous);
    submit_form(
        RegistrationForm::with_draft(FormVariant::Profile, draft.into()),
        &session,
    )
}

/// Lists enrollments matching the admin filters in store order.
///
/// Blank filter values impose no constraint.
///
/// # FFI contract
/// - Async (non-`sync`) call, DB-backed execution.
/// - Never panics.
pub fn list_students(
    class: String,
    course: String,
    board: String,
    query: String,
) -> StudentListResponse {
    let filter = StudentFilter {
        class,
        course,
        board,
        query,
    };
    match with_store(|store| {
        ListingService::new(store)
            .list_filtered(&filter)
            .map_err(|err| err.to_string())
    }) {
        Ok(records) => {
            let items = records.into_iter().map(StudentItem::from).collect::<Vec<_>>();
            let message = if items.is_empty() {
                "No students found.".to_string()
            } else {
                format!("Found {} student(s).", items.len())
            };
            StudentListResponse {
                ok: true,
                items,
                message,
            }
        }
        Err(err) => StudentListResponse {
            ok: false,
            items: Vec::new(),
            message: format!("Error: {err}"),
        },
    }
}

/// Deletes one enrollment. Deleting a missing record succeeds.
///
/// # FFI contract
/// - Async (non-`sync`) call, DB-backed execution.
pub fn delete_student(id: String) -> ActionResponse {
    let id = id.trim().to_string();
    if id.is_empty() {
        return ActionResponse {
            ok: false,
            message: "Error: student id is required".to_string(),
        };
    }
    match with_store(|store| {
        ListingService::new(store)
            .delete_student(&id)
            .map_err(|err| err.to_string())
    }) {
        Ok(()) => ActionResponse {
            ok: true,
            message: "Student deleted".to_string(),
        },
        Err(err) => ActionResponse {
            ok: false,
            message: format!("Error: {err}"),
        },
    }
}

/// Exports every enrollment to `students.csv`.
///
/// Input semantics:
/// - `layout`: `admin` or `listing`; anything else exports `admin`.
/// - `out_dir`: target directory; `None` or blank uses the configured
///   downloads location.
///
/// # FFI contract
/// - Async (non-`sync`) call, DB- and file-backed execution.
/// - An empty store writes no file and still returns `ok`.
pub fn export_students_csv(layout: String, out_dir: Option<String>) -> ExportResponse {
    let layout = parse_layout(&layout);
    let dir = out_dir
        .map(|dir| dir.trim().to_string())
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| resolve_config().export_dir.clone());

    match with_store(|store| {
        ListingService::new(store)
            .export_students(&dir, layout)
            .map_err(|err| err.to_string())
    }) {
        Ok(Some(path)) => ExportResponse {
            ok: true,
            message: format!("Exported to {}", path.display()),
            path: Some(path.display().to_string()),
        },
        Ok(None) => ExportResponse {
            ok: true,
            path: None,
            message: "No students to export".to_string(),
        },
        Err(err) => ExportResponse {
            ok: false,
            path: None,
            message: format!("Export failed: {err}"),
        },
    }
}

/// Resolves the course browser screen for a selection path.
///
/// `subject_id` then `chapter_id` then `tab` (`notes|videos|tests`) are
/// applied in order; an unknown id stops at the last valid screen.
#[flutter_rust_bridge::frb(sync)]
pub fn course_view(
    subject_id: Option<String>,
    chapter_id: Option<String>,
    tab: Option<String>,
) -> CourseViewResponse {
    let mut browser = CourseBrowser::new();
    let mut message = String::new();

    if let Some(subject_id) = subject_id {
        if !browser.select_subject(&subject_id) {
            message = format!("Unknown subject `{subject_id}`");
        } else if let Some(chapter_id) = chapter_id {
            if !browser.select_chapter(&chapter_id) {
                message = format!("Unknown chapter `{chapter_id}`");
            } else if let Some(tab) = tab {
                browser.select_tab(parse_tab(&tab));
            }
        }
    }

    let mut response = CourseViewResponse {
        ok: message.is_empty(),
        screen: String::new(),
        message,
        subjects: Vec::new(),
        chapters: Vec::new(),
        content: None,
    };
    match browser.view() {
        CourseView::SubjectList => {
            response.screen = "subject_list".to_string();
            response.subjects = browser.subjects().iter().map(to_subject_item).collect();
        }
        CourseView::ChapterList { subject } => {
            response.screen = "chapter_list".to_string();
            response.chapters = chapter_items(subject);
        }
        CourseView::ChapterContent { chapter, tab, .. } => {
            response.screen = "chapter_content".to_string();
            response.content = Some(to_chapter_content(chapter, tab));
        }
    }
    response
}

fn submit_form(mut form: RegistrationForm, session: &SessionContext) -> SubmitResponse {
    let conn = match open_db(&resolve_config().db_path) {
        Ok(conn) => conn,
        Err(err) => {
            warn!("event=ffi_submit module=ffi status=error error_kind=db_open");
            return SubmitResponse::failure("store", StoreError::from(err).to_string());
        }
    };
    let store = SqliteStudentStore::new(&conn);
    let service = RegistrationService::new(&store);

    match service.submit(&mut form, session) {
        Ok(outcome) => {
            let (navigation, student) = match outcome.navigation() {
                Navigation::ShowConfirmation(record) => {
                    ("show_confirmation", Some(StudentItem::from(record)))
                }
                Navigation::Dismiss => ("dismiss", None),
            };
            SubmitResponse {
                ok: true,
                error_kind: None,
                message: outcome.notice().to_string(),
                field_errors: Vec::new(),
                navigation: navigation.to_string(),
                student,
            }
        }
        Err(err) => {
            let mut response =
                SubmitResponse::failure(error_kind_label(err.kind()), err.user_message());
            response.field_errors = field_errors(form.report());
            response
        }
    }
}

fn with_store<T>(
    f: impl FnOnce(&SqliteStudentStore<'_>) -> Result<T, String>,
) -> Result<T, String> {
    let conn = open_db(&resolve_config().db_path).map_err(|err| err.to_string())?;
    let store = SqliteStudentStore::new(&conn);
    f(&store)
}

fn resolve_config() -> &'static RegdeskConfig {
    CONFIG.get_or_init(RegdeskConfig::from_env)
}

fn parse_variant(value: &str) -> FormVariant {
    match value.trim().to_ascii_lowercase().as_str() {
        "profile" => FormVariant::Profile,
        _ => FormVariant::Enrollment,
    }
}

fn parse_layout(value: &str) -> CsvLayout {
    match value.trim().to_ascii_lowercase().as_str() {
        "listing" => CsvLayout::StudentListing,
        _ => CsvLayout::Admin,
    }
}

fn parse_tab(value: &str) -> ChapterTab {
    match value.trim().to_ascii_lowercase().as_str() {
        "videos" => ChapterTab::Videos,
        "tests" => ChapterTab::Tests,
        _ => ChapterTab::Notes,
    }
}

fn tab_label(tab: ChapterTab) -> &'static str {
    match tab {
        ChapterTab::Notes => "notes",
        ChapterTab::Videos => "videos",
        ChapterTab::Tests => "tests",
    }
}

fn error_kind_label(kind: SubmitErrorKind) -> &'static str {
    match kind {
        SubmitErrorKind::Validation => "validation",
        SubmitErrorKind::DuplicateMobile => "duplicate_mobile",
        SubmitErrorKind::Store => "store",
        SubmitErrorKind::Unauthenticated => "unauthenticated",
        SubmitErrorKind::AlreadySubmitted => "already_submitted",
    }
}

fn field_errors(report: &ValidationReport) -> Vec<FieldErrorItem> {
    report
        .errors()
        .map(|(field, message)| FieldErrorItem {
            field: field.stored_name().to_string(),
            message: message.to_string(),
        })
        .collect()
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_string()).collect()
}

fn to_labels(values: &[&str]) -> Vec<String> {
    values
        .iter()
        .map(|value| filter_option_label(value).to_string())
        .collect()
}

fn to_subject_item(subject: &Subject) -> SubjectItem {
    SubjectItem {
        id: subject.id.to_string(),
        name: subject.name.to_string(),
        icon: subject.icon.name().to_string(),
    }
}

fn chapter_items(subject: &Subject) -> Vec<ChapterItem> {
    subject
        .chapters
        .iter()
        .map(|chapter| ChapterItem {
            id: chapter.id.to_string(),
            title: chapter.title.to_string(),
        })
        .collect()
}

fn to_chapter_content(chapter: &Chapter, tab: ChapterTab) -> ChapterContentItem {
    ChapterContentItem {
        id: chapter.id.to_string(),
        title: chapter.title.to_string(),
        tab: tab_label(tab).to_string(),
        notes: chapter.notes.to_string(),
        videos: chapter
            .videos
            .iter()
            .map(|video| VideoItem {
                id: video.id.to_string(),
                title: video.title.to_string(),
                url: video.url.to_string(),
            })
            .collect(),
        tests: chapter
            .tests
            .iter()
            .map(|test| test.title.to_string())
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        accept_mobile_input, confirmation_rows, core_version, course_view, delete_student,
        export_students_csv, filter_options, form_options, init_logging, list_students, ping,
        submit_enrollment, submit_profile, validate_student, StudentItem,
    };
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn mobile_input_filter_is_exposed() {
        assert!(accept_mobile_input("98765".to_string()));
        assert!(!accept_mobile_input("98765abc".to_string()));
    }

    #[test]
    fn validate_student_reports_stored_field_names() {
        let mut draft = valid_draft("9000000000");
        draft.school_college = "  ".to_string();
        draft.course_type = String::new();

        let enrollment = validate_student(draft.clone(), "enrollment".to_string());
        assert!(!enrollment.ok);
        assert_eq!(enrollment.errors.len(), 1);
        assert_eq!(enrollment.errors[0].field, "school_college");

        let profile = validate_student(draft, "profile".to_string());
        assert_eq!(profile.errors.len(), 2);
        assert!(profile
            .errors
            .iter()
            .any(|error| error.field == "course_type" && error.message == "Course type required"));
    }

    #[test]
    fn catalogs_follow_variant() {
        let enrollment = form_options("enrollment".to_string(), valid_draft("9000000000"));
        assert_eq!(enrollment.title, "Join Regular");
        assert!(enrollment.course_types.is_empty());
        assert!(enrollment.courses.contains(&"Polytechnic".to_string()));

        let profile = form_options("profile".to_string(), StudentItem::default());
        assert_eq!(profile.title, "Student Details");
        assert_eq!(profile.course_types.len(), 4);

        assert_eq!(profile.cleared_notice, "Form cleared successfully");

        let filters = filter_options();
        assert_eq!(filters.classes.first().map(String::as_str), Some(""));
        assert_eq!(filters.class_labels.first().map(String::as_str), Some("All"));
        assert_eq!(filters.class_labels[1], filters.classes[1]);
        assert_eq!(filters.course_labels.len(), filters.courses.len());
        assert_eq!(filters.board_labels[0], "All");
    }

    #[test]
    fn invalid_enrollment_returns_field_errors_without_persisting() {
        let mut draft = valid_draft("12345");
        draft.email = "not-an-email".to_string();

        let response = submit_enrollment(draft);
        assert!(!response.ok);
        assert_eq!(response.error_kind.as_deref(), Some("validation"));
        assert_eq!(response.message, "Please fix errors above");
        assert_eq!(response.field_errors.len(), 2);
        assert_eq!(response.navigation, "none");
    }

    #[test]
    fn enrollment_insert_then_duplicate_then_list_and_delete() {
        let mobile = unique_mobile();
        let created = submit_enrollment(valid_draft(&mobile));
        assert!(created.ok, "{}", created.message);
        assert_eq!(created.navigation, "show_confirmation");
        let student = created.student.expect("insert returns persisted record");
        let id = student.id.clone().expect("persisted record has id");
        assert!(student.timestamp.is_some());

        let rows = confirmation_rows(student);
        assert_eq!(rows[0].label, "Name");

        let duplicate = submit_enrollment(valid_draft(&mobile));
        assert!(!duplicate.ok);
        assert_eq!(duplicate.error_kind.as_deref(), Some("duplicate_mobile"));

        let listed = list_students(String::new(), String::new(), String::new(), mobile.clone());
        assert!(listed.ok, "{}", listed.message);
        assert_eq!(listed.items.len(), 1);
        assert_eq!(listed.items[0].id.as_deref(), Some(id.as_str()));

        let deleted = delete_student(id.clone());
        assert!(deleted.ok, "{}", deleted.message);
        let after = list_students(String::new(), String::new(), String::new(), mobile);
        assert!(after.items.is_empty());
        assert!(delete_student(id).ok);
    }

    #[test]
    fn profile_without_user_is_unauthenticated() {
        let response = submit_profile(None, valid_draft("9000000001"));
        assert!(!response.ok);
        assert_eq!(response.error_kind.as_deref(), Some("unauthenticated"));
    }

    #[test]
    fn profile_with_user_is_saved_and_dismissed() {
        let response = submit_profile(Some(unique_mobile()), valid_draft("9000000002"));
        assert!(response.ok, "{}", response.message);
        assert_eq!(response.message, "User data saved successfully!");
        assert_eq!(response.navigation, "dismiss");
    }

    #[test]
    fn export_writes_csv_into_requested_directory() {
        let created = submit_enrollment(valid_draft(&unique_mobile()));
        assert!(created.ok, "{}", created.message);
        let out = tempfile::tempdir().expect("temp export dir");

        let response = export_students_csv(
            "listing".to_string(),
            Some(out.path().to_string_lossy().into_owned()),
        );
        assert!(response.ok, "{}", response.message);
        let path = response.path.expect("non-empty store writes a file");
        let content = std::fs::read_to_string(path).expect("read export");
        assert!(content.starts_with("Name,Email,Mobile,Class,Course,School/College"));
    }

    #[test]
    fn course_view_follows_selection_path() {
        let root = course_view(None, None, None);
        assert_eq!(root.screen, "subject_list");
        assert!(!root.subjects.is_empty());

        let subject_id = root.subjects[0].id.clone();
        let chapters = course_view(Some(subject_id.clone()), None, None);
        assert_eq!(chapters.screen, "chapter_list");
        let chapter_id = chapters.chapters[0].id.clone();

        let content = course_view(
            Some(subject_id.clone()),
            Some(chapter_id),
            Some("videos".to_string()),
        );
        assert!(content.ok);
        assert_eq!(content.screen, "chapter_content");
        assert_eq!(content.content.expect("chapter content").tab, "videos");

        let unknown = course_view(Some(subject_id), Some("missing".to_string()), None);
        assert!(!unknown.ok);
        assert_eq!(unknown.screen, "chapter_list");
    }

    fn valid_draft(mobile: &str) -> StudentItem {
        StudentItem {
            name: "Kiran Kumari".to_string(),
            email: "kiran@example.com".to_string(),
            mobile: mobile.to_string(),
            student_class: "10".to_string(),
            course: "JEE".to_string(),
            course_type: "Regular".to_string(),
            school_college: "DAV Public School".to_string(),
            medium: "English".to_string(),
            board: "CBSE".to_string(),
            ..StudentItem::default()
        }
    }

    fn unique_mobile() -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{:010}", nanos % 10_000_000_000)
    }
}
