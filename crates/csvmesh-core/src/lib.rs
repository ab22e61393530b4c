//! # csvmesh Core
//!
//! Reconstruction of polygon meshes from CSV point captures.
//!
//! This crate provides the pure part of the import pipeline:
//! - **Profiles**: Known column layouts per source game, plus a custom layout
//! - **Row Parser**: Numeric coercion and scaling of captured rows
//! - **Topology**: Edge chains and triangle construction with per-profile strides
//! - **Import**: File reading and the end-to-end rows-to-geometry pipeline
//!
//! Everything here is a function of its inputs. Materializing a live mesh
//! (welding, cleanup, shading) belongs to an assembler downstream.

pub mod import;
pub mod math;
pub mod parser;
pub mod profile;
pub mod topology;

pub use import::{ImportConfig, ImportedGeometry, import_csv, import_reader};
pub use parser::RowParser;
pub use profile::{CsvFormat, CustomColumns, Profile, Stride};
pub use topology::{ConnectionMode, Topology, build_for_profile, build_topology};

use thiserror::Error;

/// Import errors
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid CSV format: {0}")]
    InvalidFormat(String),

    #[error("Malformed row {row}, column {column}: {reason}")]
    MalformedRow {
        /// 1-based row number in the file (the header is row 1)
        row: usize,
        /// 0-based column index
        column: usize,
        reason: String,
    },

    #[error("CSV file contains no data rows")]
    EmptyInput,

    #[error("Invalid scale factor: {0}")]
    InvalidScale(f32),

    #[error("CSV read error at row {row}: {message}")]
    Csv { row: usize, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for core operations
pub type CoreResult<T> = Result<T, CoreError>;
