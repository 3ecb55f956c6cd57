use std::io;

use thiserror::Error;

/// Fatal failures while reading INI data. Parsing stops at the first one.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to read data")]
    Io(#[from] io::Error),
    #[error("invalid section header on line {line}")]
    InvalidSectionHeader { line: usize },
    #[error("unterminated text block for key {key:?} starting on line {line}")]
    UnterminatedTextBlock { key: String, line: usize },
}

/// Rejected mutations of the document model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntryError {
    #[error("key {key:?} already exists in the section")]
    KeyExists { key: String },
    #[error("section {name:?} already exists")]
    SectionExists { name: String },
}

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("no file path is associated with the INI file")]
    MissingPath,
    #[error("failed to write data")]
    Io(#[from] io::Error),
}
