//! Flat-file exports of student records.

pub mod csv_export;
