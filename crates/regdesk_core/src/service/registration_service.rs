//! Registration submission workflow.
//!
//! # Responsibility
//! - Hold one form's draft and drive it from "validated" to "persisted or
//!   failed".
//! - Gate inserts on the duplicate-mobile check.
//!
//! # Invariants
//! - Steps run strictly one after another; no step starts before the
//!   previous store call returned.
//! - Exactly one persistence call per submit; no automatic retry.
//! - Any failure returns the form to `Idle` with the draft untouched.
//! - The duplicate check and the insert are two separate store calls and are
//!   not atomic: concurrent submissions with the same mobile may both pass.

use crate::model::catalog::FormVariant;
use crate::model::student::{StudentField, StudentId, StudentRecord};
use crate::repo::student_store::{
    profile_collection, StoreError, StudentStore, ENROLLMENT_COLLECTION, PROFILE_DOCUMENT_ID,
};
use crate::service::notice::ConfirmationPrompt;
use crate::service::session::SessionContext;
use crate::validation::{accept_mobile_input, validate_draft, ValidationReport};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Which persistence call a submission issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistKind {
    Insert,
    Update,
    /// Set/overwrite of the signed-in user's profile document.
    Profile,
}

impl PersistKind {
    fn as_str(self) -> &'static str {
        match self {
            Self::Insert => "insert",
            Self::Update => "update",
            Self::Profile => "profile",
        }
    }
}

/// Submission state of one form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    /// Initial state and recovery state after any failure.
    Idle,
    Validating,
    CheckingDuplicate,
    Persisting(PersistKind),
    /// Terminal. The form is not submitted again.
    Done(PersistKind),
}

/// Successful submission result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// New enrollment persisted; carries the stored record.
    Inserted(StudentRecord),
    /// Existing enrollment replaced.
    Updated(StudentId),
    /// Profile document written.
    ProfileSaved,
}

/// Coarse error class used by UI layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitErrorKind {
    Validation,
    DuplicateMobile,
    Store,
    Unauthenticated,
    AlreadySubmitted,
}

/// Failed submission result. The form is back in `Idle` unless noted.
#[derive(Debug)]
pub enum SubmitError {
    /// Field-scoped validation failures; the store was not contacted.
    Validation(ValidationReport),
    /// Another record already uses the draft's mobile number.
    DuplicateMobile,
    /// The duplicate-check query itself failed.
    DuplicateCheckFailed(StoreError),
    /// The persistence call failed.
    Store {
        kind: PersistKind,
        source: StoreError,
    },
    /// Profile save attempted without a signed-in user.
    Unauthenticated,
    /// The form already reached `Done`; its state is unchanged.
    AlreadySubmitted,
}

impl SubmitError {
    pub fn kind(&self) -> SubmitErrorKind {
        match self {
            Self::Validation(_) => SubmitErrorKind::Validation,
            Self::DuplicateMobile => SubmitErrorKind::DuplicateMobile,
            Self::DuplicateCheckFailed(_) | Self::Store { .. } => SubmitErrorKind::Store,
            Self::Unauthenticated => SubmitErrorKind::Unauthenticated,
            Self::AlreadySubmitted => SubmitErrorKind::AlreadySubmitted,
        }
    }
}

impl Display for SubmitError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(report) => {
                write!(f, "draft failed validation on {} field(s)", report.len())
            }
            Self::DuplicateMobile => write!(f, "mobile number already registered"),
            Self::DuplicateCheckFailed(err) => write!(f, "duplicate check failed: {err}"),
            Self::Store { kind, source } => write!(f, "{} failed: {source}", kind.as_str()),
            Self::Unauthenticated => write!(f, "no authenticated session"),
            Self::AlreadySubmitted => write!(f, "form already submitted"),
        }
    }
}

impl Error for SubmitError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::DuplicateCheckFailed(err) => Some(err),
            Self::Store { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// In-memory state of one registration form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationForm {
    variant: FormVariant,
    draft: StudentRecord,
    state: SubmissionState,
    report: ValidationReport,
}

impl RegistrationForm {
    /// Empty enrollment form for a course type taken from the route.
    pub fn enrollment(course_type: impl Into<String>) -> Self {
        Self::with_draft(FormVariant::Enrollment, StudentRecord::draft(course_type))
    }

    /// Empty profile form.
    pub fn profile() -> Self {
        Self::with_draft(FormVariant::Profile, StudentRecord::default())
    }

    /// Form pre-filled from a record; an existing record makes it an edit.
    pub fn with_draft(variant: FormVariant, draft: StudentRecord) -> Self {
        Self {
            variant,
            draft,
            state: SubmissionState::Idle,
            report: ValidationReport::default(),
        }
    }

    pub fn variant(&self) -> FormVariant {
        self.variant
    }

    pub fn draft(&self) -> &StudentRecord {
        &self.draft
    }

    pub fn state(&self) -> SubmissionState {
        self.state
    }

    /// Field errors from the last failed validation.
    pub fn report(&self) -> &ValidationReport {
        &self.report
    }

    /// Whether submitting updates an existing record.
    pub fn is_update(&self) -> bool {
        !self.draft.is_new()
    }

    /// Dialog text the user confirms before [`RegistrationService::submit`].
    pub fn confirmation_prompt(&self) -> ConfirmationPrompt {
        ConfirmationPrompt::for_draft(&self.draft)
    }

    /// Applies user input to one field.
    ///
    /// Returns `false` and keeps the previous value when the input is
    /// rejected: mobile input that is too long or not all digits, any edit
    /// after the form is done, and course type edits on the enrollment form.
    pub fn set_field(&mut self, field: StudentField, value: impl Into<String>) -> bool {
        if matches!(self.state, SubmissionState::Done(_)) {
            return false;
        }
        let value = value.into();
        match field {
            StudentField::Mobile if !accept_mobile_input(&value) => return false,
            StudentField::CourseType if !self.variant.validates_course_type() => return false,
            _ => {}
        }
        self.draft.set_field(field, value);
        true
    }

    /// Resets every editable field and clears field errors.
    ///
    /// The identifier and, on the enrollment form, the routed course type
    /// are kept.
    pub fn clear(&mut self) {
        if matches!(self.state, SubmissionState::Done(_)) {
            return;
        }
        let kept_course_type = match self.variant {
            FormVariant::Enrollment => std::mem::take(&mut self.draft.course_type),
            FormVariant::Profile => String::new(),
        };
        self.draft = StudentRecord {
            id: self.draft.id.take(),
            course_type: kept_course_type,
            ..StudentRecord::default()
        };
        self.report = ValidationReport::default();
    }

    fn transition(&mut self, next: SubmissionState) {
        debug!(
            "event=submission_state module=service from={:?} to={:?}",
            self.state, next
        );
        self.state = next;
    }

    fn fail(&mut self, err: SubmitError) -> SubmitError {
        warn!(
            "event=submit module=service status=error variant={:?} error_kind={:?}",
            self.variant,
            err.kind()
        );
        self.transition(SubmissionState::Idle);
        err
    }
}

/// Use-case service driving registration forms against a store.
pub struct RegistrationService<S: StudentStore> {
    store: S,
}

impl<S: StudentStore> RegistrationService<S> {
    /// Creates a service using the provided store implementation.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Validates and persists one confirmed form.
    ///
    /// Enrollment drafts without an identifier are inserted into
    /// `user_courses` after the duplicate-mobile check; drafts with one are
    /// updated in place. Profile drafts overwrite the signed-in user's
    /// profile document and skip the duplicate check.
    ///
    /// # Errors
    /// Every error leaves the draft unmodified and the form in `Idle`,
    /// except `AlreadySubmitted`, which leaves the form untouched.
    pub fn submit(
        &self,
        form: &mut RegistrationForm,
        session: &SessionContext,
    ) -> Result<SubmitOutcome, SubmitError> {
        if matches!(form.state, SubmissionState::Done(_)) {
            return Err(SubmitError::AlreadySubmitted);
        }

        form.transition(SubmissionState::Validating);
        let report = validate_draft(&form.draft, form.variant);
        if !report.is_valid() {
            form.report = report.clone();
            return Err(form.fail(SubmitError::Validation(report)));
        }
        form.report = ValidationReport::default();

        match (form.variant, form.draft.existing_id().map(str::to_string)) {
            (FormVariant::Profile, _) => self.save_profile(form, session),
            (FormVariant::Enrollment, Some(id)) => self.update_enrollment(form, id),
            (FormVariant::Enrollment, None) => self.insert_enrollment(form),
        }
    }

    fn save_profile(
        &self,
        form: &mut RegistrationForm,
        session: &SessionContext,
    ) -> Result<SubmitOutcome, SubmitError> {
        let Some(user_id) = session.user_id() else {
            return Err(form.fail(SubmitError::Unauthenticated));
        };

        form.transition(SubmissionState::Persisting(PersistKind::Profile));
        let collection = profile_collection(user_id);
        // Profile documents always carry a `notes` key, empty or not.
        let document = StudentRecord {
            notes: Some(form.draft.notes.clone().unwrap_or_default()),
            ..form.draft.clone()
        };
        if let Err(source) = self
            .store
            .upsert(&collection, PROFILE_DOCUMENT_ID, &document)
        {
            return Err(form.fail(SubmitError::Store {
                kind: PersistKind::Profile,
                source,
            }));
        }

        form.transition(SubmissionState::Done(PersistKind::Profile));
        info!("event=submit module=service status=ok mode=profile");
        Ok(SubmitOutcome::ProfileSaved)
    }

    fn update_enrollment(
        &self,
        form: &mut RegistrationForm,
        id: StudentId,
    ) -> Result<SubmitOutcome, SubmitError> {
        form.transition(SubmissionState::Persisting(PersistKind::Update));
        if let Err(source) = self.store.update(ENROLLMENT_COLLECTION, &id, &form.draft) {
            return Err(form.fail(SubmitError::Store {
                kind: PersistKind::Update,
                source,
            }));
        }

        form.transition(SubmissionState::Done(PersistKind::Update));
        info!("event=submit module=service status=ok mode=update doc_id={id}");
        Ok(SubmitOutcome::Updated(id))
    }

    fn insert_enrollment(&self, form: &mut RegistrationForm) -> Result<SubmitOutcome, SubmitError> {
        form.transition(SubmissionState::CheckingDuplicate);
        match self.store.query_by_field(
            ENROLLMENT_COLLECTION,
            StudentField::Mobile.stored_name(),
            &form.draft.mobile,
        ) {
            Ok(matches) if matches.is_empty() => {}
            Ok(_) => return Err(form.fail(SubmitError::DuplicateMobile)),
            Err(err) => return Err(form.fail(SubmitError::DuplicateCheckFailed(err))),
        }

        form.transition(SubmissionState::Persisting(PersistKind::Insert));
        let id = match self.store.insert(ENROLLMENT_COLLECTION, &form.draft) {
            Ok(id) => id,
            Err(source) => {
                return Err(form.fail(SubmitError::Store {
                    kind: PersistKind::Insert,
                    source,
                }))
            }
        };

        // The insert already succeeded; a failed read-back must not invite a
        // retry that would create a second document.
        let persisted = match self.store.get(ENROLLMENT_COLLECTION, &id) {
            Ok(Some(record)) => record,
            Ok(None) => {
                warn!("event=submit_readback module=service status=error doc_id={id} error=missing");
                StudentRecord {
                    id: Some(id.clone()),
                    ..form.draft.clone()
                }
            }
            Err(err) => {
                warn!("event=submit_readback module=service status=error doc_id={id} error={err}");
                StudentRecord {
                    id: Some(id.clone()),
                    ..form.draft.clone()
                }
            }
        };

        form.draft.id = persisted.id.clone();
        form.draft.timestamp = persisted.timestamp;
        form.transition(SubmissionState::Done(PersistKind::Insert));
        info!("event=submit module=service status=ok mode=insert doc_id={id}");
        Ok(SubmitOutcome::Inserted(persisted))
    }
}
