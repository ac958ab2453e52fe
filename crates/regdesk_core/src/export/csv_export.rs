//! CSV export of student records.
//!
//! # Responsibility
//! - Serialize records under one of two fixed column layouts.
//! - Write `students.csv`, replacing any previous export.
//!
//! # Invariants
//! - First line is the layout header; one line per record follows, in input
//!   order, each terminated by `\n`.
//! - Fields are written verbatim: no quoting or escaping. A field holding a
//!   comma or newline corrupts its row.
//! - An empty record set writes nothing.

use crate::model::student::StudentRecord;
use csv::{QuoteStyle, Terminator, WriterBuilder};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Fixed export file name; repeated exports overwrite it.
pub const EXPORT_FILE_NAME: &str = "students.csv";

const ADMIN_HEADER: [&str; 9] = [
    "Name",
    "Email",
    "Mobile",
    "Class",
    "Course",
    "CourseType",
    "School",
    "Medium",
    "Board",
];

const LISTING_HEADER: [&str; 9] = [
    "Name",
    "Email",
    "Mobile",
    "Class",
    "Course",
    "School/College",
    "Medium",
    "Board",
    "Course Type",
];

pub type ExportResult<T> = Result<T, ExportError>;

#[derive(Debug)]
pub enum ExportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to write export: {err}"),
            Self::Csv(err) => write!(f, "failed to encode csv: {err}"),
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ExportError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<csv::Error> for ExportError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

/// Column layout of an export. Each listing screen has its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsvLayout {
    /// Admin panel: course type sits after course.
    Admin,
    /// Registered-students listing: course type is the last column.
    StudentListing,
}

impl CsvLayout {
    pub fn header(self) -> &'static [&'static str; 9] {
        match self {
            Self::Admin => &ADMIN_HEADER,
            Self::StudentListing => &LISTING_HEADER,
        }
    }

    /// Record fields in this layout's column order.
    pub fn row(self, record: &StudentRecord) -> [&str; 9] {
        let r = record;
        match self {
            Self::Admin => [
                r.name.as_str(),
                r.email.as_str(),
                r.mobile.as_str(),
                r.student_class.as_str(),
                r.course.as_str(),
                r.course_type.as_str(),
                r.school_college.as_str(),
                r.medium.as_str(),
                r.board.as_str(),
            ],
            Self::StudentListing => [
                r.name.as_str(),
                r.email.as_str(),
                r.mobile.as_str(),
                r.student_class.as_str(),
                r.course.as_str(),
                r.school_college.as_str(),
                r.medium.as_str(),
                r.board.as_str(),
                r.course_type.as_str(),
            ],
        }
    }
}

/// Writes header and rows to `writer`. Returns the number of data rows.
///
/// Writes nothing, not even the header, for an empty record set.
pub fn write_csv<W: Write>(
    writer: W,
    records: &[StudentRecord],
    layout: CsvLayout,
) -> ExportResult<usize> {
    if records.is_empty() {
        return Ok(0);
    }

    let mut csv_writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(writer);

    csv_writer.write_record(layout.header())?;
    for record in records {
        csv_writer.write_record(layout.row(record))?;
    }
    csv_writer.flush()?;

    Ok(records.len())
}

/// Renders the export as a string, or `None` for an empty record set.
pub fn render_csv(records: &[StudentRecord], layout: CsvLayout) -> ExportResult<Option<String>> {
    let mut buffer = Vec::new();
    if write_csv(&mut buffer, records, layout)? == 0 {
        return Ok(None);
    }
    Ok(Some(String::from_utf8_lossy(&buffer).into_owned()))
}

/// Writes `students.csv` under `dir` and returns its path.
///
/// Returns `None` without creating any file for an empty record set.
pub fn export_csv(
    dir: &Path,
    records: &[StudentRecord],
    layout: CsvLayout,
) -> ExportResult<Option<PathBuf>> {
    if records.is_empty() {
        info!("event=export_csv module=export status=skipped reason=empty");
        return Ok(None);
    }

    fs::create_dir_all(dir)?;
    let path = dir.join(EXPORT_FILE_NAME);
    let file = File::create(&path)?;
    let rows = write_csv(file, records, layout)?;

    info!(
        "event=export_csv module=export status=ok layout={:?} rows={} path={}",
        layout,
        rows,
        path.display()
    );
    Ok(Some(path))
}
