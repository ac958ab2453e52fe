use regdesk_core::db::open_db_in_memory;
use regdesk_core::{
    profile_collection, FormVariant, Navigation, PersistKind, RegistrationForm,
    RegistrationService, SessionContext, SqliteStudentStore, StoreError, StoreResult,
    StudentField, StudentId, StudentRecord, StudentStore, SubmissionState, SubmitError,
    SubmitErrorKind, SubmitOutcome, ENROLLMENT_COLLECTION, PROFILE_DOCUMENT_ID,
};
use std::cell::{Cell, RefCell};

fn fill_valid(form: &mut RegistrationForm, mobile: &str) {
    assert!(form.set_field(StudentField::Name, "Sana Parveen"));
    assert!(form.set_field(StudentField::Email, "sana@example.com"));
    assert!(form.set_field(StudentField::Mobile, mobile));
    assert!(form.set_field(StudentField::Class, "11"));
    assert!(form.set_field(StudentField::Course, "NEET"));
    assert!(form.set_field(StudentField::SchoolCollege, "Govt Girls School"));
    assert!(form.set_field(StudentField::Medium, "Bilingual"));
    assert!(form.set_field(StudentField::Board, "Bihar Board"));
    if form.variant() == FormVariant::Profile {
        assert!(form.set_field(StudentField::CourseType, "Crash"));
    }
}

/// Store double recording calls and failing on demand.
struct ScriptedStore<'conn> {
    inner: SqliteStudentStore<'conn>,
    calls: RefCell<Vec<&'static str>>,
    fail_query: Cell<bool>,
    fail_writes: Cell<bool>,
}

impl<'conn> ScriptedStore<'conn> {
    fn new(inner: SqliteStudentStore<'conn>) -> Self {
        Self {
            inner,
            calls: RefCell::new(Vec::new()),
            fail_query: Cell::new(false),
            fail_writes: Cell::new(false),
        }
    }

    fn record(&self, call: &'static str) {
        self.calls.borrow_mut().push(call);
    }

    fn calls(&self) -> Vec<&'static str> {
        self.calls.borrow().clone()
    }

    fn write_guard(&self) -> StoreResult<()> {
        if self.fail_writes.get() {
            return Err(StoreError::Unavailable("connection lost".to_string()));
        }
        Ok(())
    }
}

impl StudentStore for ScriptedStore<'_> {
    fn insert(&self, collection: &str, record: &StudentRecord) -> StoreResult<StudentId> {
        self.record("insert");
        self.write_guard()?;
        self.inner.insert(collection, record)
    }

    fn update(&self, collection: &str, id: &str, record: &StudentRecord) -> StoreResult<()> {
        self.record("update");
        self.write_guard()?;
        self.inner.update(collection, id, record)
    }

    fn upsert(&self, collection: &str, id: &str, record: &StudentRecord) -> StoreResult<()> {
        self.record("upsert");
        self.write_guard()?;
        self.inner.upsert(collection, id, record)
    }

    fn delete(&self, collection: &str, id: &str) -> StoreResult<()> {
        self.record("delete");
        self.inner.delete(collection, id)
    }

    fn get(&self, collection: &str, id: &str) -> StoreResult<Option<StudentRecord>> {
        self.record("get");
        self.inner.get(collection, id)
    }

    fn query_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> StoreResult<Vec<StudentRecord>> {
        self.record("query");
        if self.fail_query.get() {
            return Err(StoreError::Unavailable("network unreachable".to_string()));
        }
        self.inner.query_by_field(collection, field, value)
    }

    fn list_all(&self, collection: &str) -> StoreResult<Vec<StudentRecord>> {
        self.record("list");
        self.inner.list_all(collection)
    }
}

#[test]
fn new_enrollment_is_checked_inserted_and_confirmed() {
    let conn = open_db_in_memory().unwrap();
    let store = ScriptedStore::new(SqliteStudentStore::new(&conn));
    let service = RegistrationService::new(&store);

    let mut form = RegistrationForm::enrollment("Foundation");
    fill_valid(&mut form, "9123456780");
    assert_eq!(form.confirmation_prompt().title, "Confirm Submission");

    let outcome = service
        .submit(&mut form, &SessionContext::anonymous())
        .unwrap();
    assert_eq!(store.calls(), vec!["query", "insert", "get"]);
    assert_eq!(form.state(), SubmissionState::Done(PersistKind::Insert));
    assert!(form.is_update());

    let SubmitOutcome::Inserted(persisted) = &outcome else {
        panic!("unexpected outcome: {outcome:?}");
    };
    assert_eq!(persisted.course_type, "Foundation");
    assert!(persisted.timestamp.is_some());
    assert_eq!(persisted.id, form.draft().id);
    assert_eq!(outcome.notice(), "Welcome to join SIGMA CLASSES");
    assert_eq!(outcome.navigation(), Navigation::ShowConfirmation(persisted.clone()));

    let stored = store.inner.list_all(ENROLLMENT_COLLECTION).unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].mobile, "9123456780");
}

#[test]
fn duplicate_mobile_is_rejected_before_any_insert() {
    let conn = open_db_in_memory().unwrap();
    let store = ScriptedStore::new(SqliteStudentStore::new(&conn));
    store
        .inner
        .insert(
            ENROLLMENT_COLLECTION,
            &StudentRecord {
                mobile: "9999999999".to_string(),
                ..StudentRecord::default()
            },
        )
        .unwrap();
    let service = RegistrationService::new(&store);

    let mut form = RegistrationForm::enrollment("JEE");
    fill_valid(&mut form, "9999999999");
    let before = form.draft().clone();

    let err = service
        .submit(&mut form, &SessionContext::anonymous())
        .unwrap_err();
    assert!(matches!(err, SubmitError::DuplicateMobile));
    assert_eq!(err.user_message(), "This mobile number is already registered");
    assert_eq!(store.calls(), vec!["query"]);
    assert_eq!(form.state(), SubmissionState::Idle);
    assert_eq!(form.draft(), &before);
}

#[test]
fn failed_duplicate_check_is_a_store_error_and_keeps_draft() {
    let conn = open_db_in_memory().unwrap();
    let store = ScriptedStore::new(SqliteStudentStore::new(&conn));
    store.fail_query.set(true);
    let service = RegistrationService::new(&store);

    let mut form = RegistrationForm::enrollment("JEE");
    fill_valid(&mut form, "9000011111");
    let before = form.draft().clone();

    let err = service
        .submit(&mut form, &SessionContext::anonymous())
        .unwrap_err();
    assert_eq!(err.kind(), SubmitErrorKind::Store);
    assert!(matches!(err, SubmitError::DuplicateCheckFailed(_)));
    assert_eq!(
        err.user_message(),
        "Error checking mobile: network unreachable"
    );
    assert_eq!(store.calls(), vec!["query"]);
    assert_eq!(form.state(), SubmissionState::Idle);
    assert_eq!(form.draft(), &before);

    // Idle again: the user may retry once the store is reachable.
    store.fail_query.set(false);
    let outcome = service
        .submit(&mut form, &SessionContext::anonymous())
        .unwrap();
    assert!(matches!(outcome, SubmitOutcome::Inserted(_)));
}

#[test]
fn invalid_draft_never_contacts_store() {
    let conn = open_db_in_memory().unwrap();
    let store = ScriptedStore::new(SqliteStudentStore::new(&conn));
    let service = RegistrationService::new(&store);

    let mut form = RegistrationForm::enrollment("JEE");
    fill_valid(&mut form, "98765");

    let err = service
        .submit(&mut form, &SessionContext::anonymous())
        .unwrap_err();
    let SubmitError::Validation(report) = &err else {
        panic!("unexpected error: {err}");
    };
    assert_eq!(report.len(), 1);
    assert_eq!(
        form.report().error_for(StudentField::Mobile),
        Some("Enter 10 digit mobile number")
    );
    assert_eq!(err.user_message(), "Please fix errors above");
    assert!(store.calls().is_empty());
    assert_eq!(form.state(), SubmissionState::Idle);
}

#[test]
fn editing_existing_enrollment_updates_in_place() {
    let conn = open_db_in_memory().unwrap();
    let store = ScriptedStore::new(SqliteStudentStore::new(&conn));
    let service = RegistrationService::new(&store);

    let mut first = RegistrationForm::enrollment("NDA");
    fill_valid(&mut first, "9555500000");
    service
        .submit(&mut first, &SessionContext::anonymous())
        .unwrap();
    let existing = store.inner.list_all(ENROLLMENT_COLLECTION).unwrap().remove(0);
    store.calls.borrow_mut().clear();

    let mut edit = RegistrationForm::with_draft(FormVariant::Enrollment, existing.clone());
    assert_eq!(edit.confirmation_prompt().title, "Confirm Update");
    assert!(edit.set_field(StudentField::Class, "12"));

    let outcome = service
        .submit(&mut edit, &SessionContext::anonymous())
        .unwrap();
    // Same mobile as the stored record, but updates skip the duplicate check.
    assert_eq!(store.calls(), vec!["update"]);
    assert_eq!(outcome, SubmitOutcome::Updated(existing.id.clone().unwrap()));
    assert_eq!(outcome.navigation(), Navigation::Dismiss);
    assert_eq!(edit.state(), SubmissionState::Done(PersistKind::Update));

    let all = store.inner.list_all(ENROLLMENT_COLLECTION).unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].student_class, "12");
}

#[test]
fn failed_persist_returns_to_idle_without_retry() {
    let conn = open_db_in_memory().unwrap();
    let store = ScriptedStore::new(SqliteStudentStore::new(&conn));
    store.fail_writes.set(true);
    let service = RegistrationService::new(&store);

    let mut form = RegistrationForm::enrollment("JEE");
    fill_valid(&mut form, "9000022222");

    let err = service
        .submit(&mut form, &SessionContext::anonymous())
        .unwrap_err();
    assert!(matches!(
        err,
        SubmitError::Store {
            kind: PersistKind::Insert,
            ..
        }
    ));
    assert_eq!(err.user_message(), "Error: connection lost");
    assert_eq!(store.calls(), vec!["query", "insert"]);
    assert_eq!(form.state(), SubmissionState::Idle);
    assert!(form.draft().is_new());
}

#[test]
fn done_form_rejects_second_submit_and_edits() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStudentStore::new(&conn);
    let service = RegistrationService::new(&store);

    let mut form = RegistrationForm::enrollment("JEE");
    fill_valid(&mut form, "9000033333");
    service
        .submit(&mut form, &SessionContext::anonymous())
        .unwrap();

    let err = service
        .submit(&mut form, &SessionContext::anonymous())
        .unwrap_err();
    assert!(matches!(err, SubmitError::AlreadySubmitted));
    assert!(!form.set_field(StudentField::Name, "Changed"));
    assert_eq!(store.list_all(ENROLLMENT_COLLECTION).unwrap().len(), 1);
}

#[test]
fn profile_save_requires_session() {
    let conn = open_db_in_memory().unwrap();
    let store = ScriptedStore::new(SqliteStudentStore::new(&conn));
    let service = RegistrationService::new(&store);

    let mut form = RegistrationForm::profile();
    fill_valid(&mut form, "9000044444");

    let err = service
        .submit(&mut form, &SessionContext::anonymous())
        .unwrap_err();
    assert_eq!(err.kind(), SubmitErrorKind::Unauthenticated);
    assert_eq!(
        err.user_message(),
        "User not logged in! Please sign in to save your data."
    );
    assert!(store.calls().is_empty());
    assert_eq!(form.state(), SubmissionState::Idle);
}

#[test]
fn profile_save_overwrites_user_document_without_duplicate_check() {
    let conn = open_db_in_memory().unwrap();
    let store = ScriptedStore::new(SqliteStudentStore::new(&conn));
    let service = RegistrationService::new(&store);
    let session = SessionContext::signed_in("uid-42");

    let mut form = RegistrationForm::profile();
    fill_valid(&mut form, "9000055555");
    assert!(form.set_field(StudentField::Notes, "prefers weekend batch"));

    let outcome = service.submit(&mut form, &session).unwrap();
    assert_eq!(outcome, SubmitOutcome::ProfileSaved);
    assert_eq!(outcome.notice(), "User data saved successfully!");
    assert_eq!(outcome.navigation(), Navigation::Dismiss);
    assert_eq!(store.calls(), vec!["upsert"]);

    let saved = store
        .inner
        .get(&profile_collection("uid-42"), PROFILE_DOCUMENT_ID)
        .unwrap()
        .unwrap();
    assert_eq!(saved.course_type, "Crash");
    assert_eq!(saved.notes.as_deref(), Some("prefers weekend batch"));
}

#[test]
fn profile_store_failure_uses_profile_message() {
    let conn = open_db_in_memory().unwrap();
    let store = ScriptedStore::new(SqliteStudentStore::new(&conn));
    store.fail_writes.set(true);
    let service = RegistrationService::new(&store);

    let mut form = RegistrationForm::profile();
    fill_valid(&mut form, "9000066666");

    let err = service
        .submit(&mut form, &SessionContext::signed_in("uid-1"))
        .unwrap_err();
    assert_eq!(err.user_message(), "Error saving data: connection lost");
    assert_eq!(form.state(), SubmissionState::Idle);
}

#[test]
fn profile_form_requires_course_type() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStudentStore::new(&conn);
    let service = RegistrationService::new(&store);

    let mut form = RegistrationForm::profile();
    fill_valid(&mut form, "9000077777");
    assert!(form.set_field(StudentField::CourseType, ""));

    let err = service
        .submit(&mut form, &SessionContext::signed_in("uid-1"))
        .unwrap_err();
    assert_eq!(err.kind(), SubmitErrorKind::Validation);
    assert_eq!(
        form.report().error_for(StudentField::CourseType),
        Some("Course type required")
    );
}

#[test]
fn mobile_input_and_clear_follow_form_rules() {
    let mut form = RegistrationForm::enrollment("JEE");
    assert!(form.set_field(StudentField::Mobile, "98765"));
    assert!(!form.set_field(StudentField::Mobile, "98765432101"));
    assert!(!form.set_field(StudentField::Mobile, "98x"));
    assert_eq!(form.draft().mobile, "98765");
    assert!(!form.set_field(StudentField::CourseType, "Online"));

    fill_valid(&mut form, "9876543210");
    form.clear();
    assert_eq!(form.draft().name, "");
    assert_eq!(form.draft().mobile, "");
    assert_eq!(form.draft().course_type, "JEE");
    assert!(form.report().is_valid());
}

fn stored_body(conn: &rusqlite::Connection, collection: &str, doc_id: &str) -> serde_json::Value {
    let body: String = conn
        .query_row(
            "SELECT body FROM documents WHERE collection = ?1 AND doc_id = ?2;",
            [collection, doc_id],
            |row| row.get(0),
        )
        .unwrap();
    serde_json::from_str(&body).unwrap()
}

#[test]
fn profile_document_always_has_notes_key() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStudentStore::new(&conn);
    let service = RegistrationService::new(&store);

    let mut form = RegistrationForm::profile();
    fill_valid(&mut form, "9000088888");
    service
        .submit(&mut form, &SessionContext::signed_in("uid-7"))
        .unwrap();

    let collection = profile_collection("uid-7");
    let body = stored_body(&conn, &collection, PROFILE_DOCUMENT_ID);
    assert_eq!(body["notes"], "");
    assert_eq!(form.draft().notes, None);

    let mut enrollment = RegistrationForm::enrollment("JEE");
    fill_valid(&mut enrollment, "9000088889");
    let outcome = service
        .submit(&mut enrollment, &SessionContext::anonymous())
        .unwrap();
    let SubmitOutcome::Inserted(record) = outcome else {
        panic!("unexpected outcome: {outcome:?}");
    };
    let id = record.id.unwrap();
    let body = stored_body(&conn, ENROLLMENT_COLLECTION, &id);
    assert!(body.get("notes").is_none());
}
