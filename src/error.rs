// src/error.rs

//! Central error type for the archive pipeline.
//!
//! Every variant carries the offending entry name or file path so a failure
//! deep in a batch points at the exact input that caused it. Nothing here is
//! retried; callers either surface the error or abort the whole operation.

use std::path::PathBuf;

use scrimshaw_classfile::ClassFileError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to read archive {path}: {source}")]
    ArchiveRead {
        path: PathBuf,
        source: zip::result::ZipError,
    },

    #[error("failed to read archive entry {entry}: {source}")]
    EntryRead {
        entry: String,
        source: std::io::Error,
    },

    #[error("malformed class data in entry {entry}: {source}")]
    ClassParse {
        entry: String,
        source: ClassFileError,
    },

    #[error("failed to serialize class entry {entry}: {source}")]
    ClassSerialize {
        entry: String,
        source: ClassFileError,
    },

    #[error("failed to write archive entry {entry}: {source}")]
    EntryWrite {
        entry: String,
        source: zip::result::ZipError,
    },

    #[error("failed to create archive {path}: {source}")]
    ArchiveCreate {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to decode image {path}: {source}")]
    ImageDecode {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("image scales to a degenerate {width}x{height} grid")]
    DegenerateImage { width: u32, height: u32 },

    #[error("{0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
