//! Student listing use-cases: load, filter, delete and export.
//!
//! # Invariants
//! - Listing order is the store's return order; nothing here sorts.
//! - Filtering never mutates the loaded record set.

use crate::export::csv_export::{export_csv, CsvLayout, ExportError};
use crate::model::student::StudentRecord;
use crate::repo::student_store::{StoreError, StoreResult, StudentStore, ENROLLMENT_COLLECTION};
use crate::search::filter::StudentFilter;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Error for listing use-cases that touch both store and filesystem.
#[derive(Debug)]
pub enum ListingError {
    Store(StoreError),
    Export(ExportError),
}

impl Display for ListingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::Export(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ListingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Export(err) => Some(err),
        }
    }
}

impl From<StoreError> for ListingError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<ExportError> for ListingError {
    fn from(value: ExportError) -> Self {
        Self::Export(value)
    }
}

/// Listing service facade over a store implementation.
pub struct ListingService<S: StudentStore> {
    store: S,
}

impl<S: StudentStore> ListingService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Loads every enrollment in store order.
    pub fn list_students(&self) -> StoreResult<Vec<StudentRecord>> {
        let records = self.store.list_all(ENROLLMENT_COLLECTION)?;
        info!(
            "event=list_students module=service status=ok count={}",
            records.len()
        );
        Ok(records)
    }

    /// Loads every enrollment and keeps the ones matching `filter`.
    pub fn list_filtered(&self, filter: &StudentFilter) -> StoreResult<Vec<StudentRecord>> {
        let records = self.list_students()?;
        Ok(filter.apply(&records).into_iter().cloned().collect())
    }

    /// Deletes one enrollment. Deleting a missing record succeeds.
    pub fn delete_student(&self, id: &str) -> StoreResult<()> {
        self.store.delete(ENROLLMENT_COLLECTION, id)?;
        info!("event=delete_student module=service status=ok doc_id={id}");
        Ok(())
    }

    /// Exports every enrollment to `students.csv` under `dir`.
    ///
    /// Returns `None` without touching the filesystem when there is nothing
    /// to export.
    pub fn export_students(
        &self,
        dir: &Path,
        layout: CsvLayout,
    ) -> Result<Option<PathBuf>, ListingError> {
        let records = self.store.list_all(ENROLLMENT_COLLECTION)?;
        Ok(export_csv(dir, &records, layout)?)
    }
}
