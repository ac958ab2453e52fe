//! Student document store contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide collection-scoped CRUD over student documents.
//! - Keep SQL and JSON body details inside the persistence boundary.
//!
//! # Invariants
//! - Identifiers are assigned by the store on insert and never reused.
//! - `list_all` and `query_by_field` return documents in insertion order.
//! - `timestamp` is set by the store on every write.
//! - Reading a document never fails on missing string fields; they decode
//!   as empty strings.

use crate::db::DbError;
use crate::model::student::{StudentId, StudentRecord};
use once_cell::sync::Lazy;
use regex::Regex;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Collection holding course enrollments.
pub const ENROLLMENT_COLLECTION: &str = "user_courses";
/// Document id of a user's profile inside [`profile_collection`].
pub const PROFILE_DOCUMENT_ID: &str = "data";

const DOCUMENT_SELECT_SQL: &str = "SELECT doc_id, body, timestamp FROM documents";

/// Kept in columns, not in the document body, so never queryable by field.
const STORE_OWNED_FIELDS: &[&str] = &["id", "timestamp"];

static FIELD_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z_]+$").expect("valid field name regex"));

/// Collection holding one signed-in user's profile document.
pub fn profile_collection(user_id: &str) -> String {
    format!("users/{user_id}/profile")
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Store error for document persistence and query operations.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    NotFound {
        collection: String,
        id: StudentId,
    },
    /// Query field name outside `[a-z_]+`, or a store-owned field.
    InvalidField(String),
    /// Stored body could not be decoded into a record.
    InvalidData(String),
    /// Record could not be encoded into a document body.
    Serialization(serde_json::Error),
    /// Backend failure reported by a non-SQLite store.
    Unavailable(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { collection, id } => {
                write!(f, "document not found: {collection}/{id}")
            }
            Self::InvalidField(field) => write!(f, "invalid query field `{field}`"),
            Self::InvalidData(message) => write!(f, "invalid stored document: {message}"),
            Self::Serialization(err) => write!(f, "failed to encode document: {err}"),
            Self::Unavailable(message) => write!(f, "{message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Serialization(err) => Some(err),
            Self::NotFound { .. }
            | Self::InvalidField(_)
            | Self::InvalidData(_)
            | Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Document store contract for student records.
///
/// `record.id` and `record.timestamp` are ignored on writes; the store owns
/// both.
pub trait StudentStore {
    /// Inserts a new document and returns its assigned identifier.
    fn insert(&self, collection: &str, record: &StudentRecord) -> StoreResult<StudentId>;
    /// Replaces an existing document. Fails with `NotFound` when absent.
    fn update(&self, collection: &str, id: &str, record: &StudentRecord) -> StoreResult<()>;
    /// Creates or replaces a document under a caller-chosen identifier.
    fn upsert(&self, collection: &str, id: &str, record: &StudentRecord) -> StoreResult<()>;
    /// Deletes a document. Deleting a missing document succeeds.
    fn delete(&self, collection: &str, id: &str) -> StoreResult<()>;
    /// Gets one document by identifier.
    fn get(&self, collection: &str, id: &str) -> StoreResult<Option<StudentRecord>>;
    /// Lists documents whose body `field` equals `value` exactly.
    ///
    /// `id` and `timestamp` are store-owned and rejected with `InvalidField`.
    fn query_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> StoreResult<Vec<StudentRecord>>;
    /// Lists every document of a collection.
    fn list_all(&self, collection: &str) -> StoreResult<Vec<StudentRecord>>;
}

impl<S: StudentStore + ?Sized> StudentStore for &S {
    fn insert(&self, collection: &str, record: &StudentRecord) -> StoreResult<StudentId> {
        (**self).insert(collection, record)
    }

    fn update(&self, collection: &str, id: &str, record: &StudentRecord) -> StoreResult<()> {
        (**self).update(collection, id, record)
    }

    fn upsert(&self, collection: &str, id: &str, record: &StudentRecord) -> StoreResult<()> {
        (**self).upsert(collection, id, record)
    }

    fn delete(&self, collection: &str, id: &str) -> StoreResult<()> {
        (**self).delete(collection, id)
    }

    fn get(&self, collection: &str, id: &str) -> StoreResult<Option<StudentRecord>> {
        (**self).get(collection, id)
    }

    fn query_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> StoreResult<Vec<StudentRecord>> {
        (**self).query_by_field(collection, field, value)
    }

    fn list_all(&self, collection: &str) -> StoreResult<Vec<StudentRecord>> {
        (**self).list_all(collection)
    }
}

/// SQLite-backed document store.
pub struct SqliteStudentStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStudentStore<'conn> {
    /// Wraps a connection returned by [`crate::db::open_db`] or
    /// [`crate::db::open_db_in_memory`].
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl StudentStore for SqliteStudentStore<'_> {
    fn insert(&self, collection: &str, record: &StudentRecord) -> StoreResult<StudentId> {
        let id = Uuid::new_v4().simple().to_string();
        let body = encode_body(record)?;

        self.conn.execute(
            "INSERT INTO documents (collection, doc_id, body, timestamp)
             VALUES (?1, ?2, ?3, (CAST(ROUND(unixepoch('subsec') * 1000) AS INTEGER)));",
            params![collection, id.as_str(), body],
        )?;

        Ok(id)
    }

    fn update(&self, collection: &str, id: &str, record: &StudentRecord) -> StoreResult<()> {
        let body = encode_body(record)?;

        let changed = self.conn.execute(
            "UPDATE documents
             SET
                body = ?3,
                timestamp = (CAST(ROUND(unixepoch('subsec') * 1000) AS INTEGER))
             WHERE collection = ?1
               AND doc_id = ?2;",
            params![collection, id, body],
        )?;

        if changed == 0 {
            return Err(StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }

        Ok(())
    }

    fn upsert(&self, collection: &str, id: &str, record: &StudentRecord) -> StoreResult<()> {
        let body = encode_body(record)?;

        self.conn.execute(
            "INSERT INTO documents (collection, doc_id, body, timestamp)
             VALUES (?1, ?2, ?3, (CAST(ROUND(unixepoch('subsec') * 1000) AS INTEGER)))
             ON CONFLICT (collection, doc_id) DO UPDATE SET
                body = excluded.body,
                timestamp = excluded.timestamp;",
            params![collection, id, body],
        )?;

        Ok(())
    }

    fn delete(&self, collection: &str, id: &str) -> StoreResult<()> {
        self.conn.execute(
            "DELETE FROM documents WHERE collection = ?1 AND doc_id = ?2;",
            params![collection, id],
        )?;
        Ok(())
    }

    fn get(&self, collection: &str, id: &str) -> StoreResult<Option<StudentRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "{DOCUMENT_SELECT_SQL}
             WHERE collection = ?1
               AND doc_id = ?2;"
        ))?;

        stmt.query_row(params![collection, id], parse_document_row)
            .optional()?
            .transpose()
    }

    fn query_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> StoreResult<Vec<StudentRecord>> {
        if !FIELD_NAME_RE.is_match(field) || STORE_OWNED_FIELDS.contains(&field) {
            return Err(StoreError::InvalidField(field.to_string()));
        }

        let mut stmt = self.conn.prepare(&format!(
            "{DOCUMENT_SELECT_SQL}
             WHERE collection = ?1
               AND json_extract(body, ?2) = ?3
             ORDER BY seq ASC;"
        ))?;
        let path = format!("$.{field}");
        let rows = stmt.query_map(params![collection, path, value], parse_document_row)?;
        collect_documents(rows)
    }

    fn list_all(&self, collection: &str) -> StoreResult<Vec<StudentRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "{DOCUMENT_SELECT_SQL}
             WHERE collection = ?1
             ORDER BY seq ASC;"
        ))?;
        let rows = stmt.query_map(params![collection], parse_document_row)?;
        collect_documents(rows)
    }
}

fn encode_body(record: &StudentRecord) -> StoreResult<String> {
    serde_json::to_string(record).map_err(StoreError::Serialization)
}

fn collect_documents(
    rows: impl Iterator<Item = rusqlite::Result<StoreResult<StudentRecord>>>,
) -> StoreResult<Vec<StudentRecord>> {
    let mut records = Vec::new();
    for row in rows {
        records.push(row??);
    }
    Ok(records)
}

// Decoding errors are kept apart from SQLite errors so a corrupt body
// surfaces as `InvalidData` instead of a transport failure.
fn parse_document_row(row: &Row<'_>) -> rusqlite::Result<StoreResult<StudentRecord>> {
    let doc_id: String = row.get("doc_id")?;
    let body: String = row.get("body")?;
    let timestamp: i64 = row.get("timestamp")?;

    Ok(decode_body(&doc_id, &body).map(|mut record| {
        record.id = Some(doc_id);
        record.timestamp = Some(timestamp);
        record
    }))
}

fn decode_body(doc_id: &str, body: &str) -> StoreResult<StudentRecord> {
    serde_json::from_str(body).map_err(|err| {
        StoreError::InvalidData(format!("document `{doc_id}` has an undecodable body: {err}"))
    })
}
