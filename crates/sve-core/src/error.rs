//! Error types for sve-core
//!
//! Decode, schema and JSON failures each get their own enum so callers can
//! tell a corrupt file from a bad edit; `Error` wraps them all.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for sve-core operations
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Json(#[from] JsonError),

    #[error("not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("file already exists at \"{}\" (use force to overwrite)", .0.display())]
    AlreadyExists(PathBuf),
}

/// Malformed wire data. Always fatal to the parse in progress.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("invalid type tag {tag:#04x} at {offset:#x}")]
    InvalidTag { tag: u8, offset: usize },

    #[error("unexpected end of input while reading {context} at {offset:#x}")]
    UnexpectedEof { context: &'static str, offset: usize },

    #[error("invalid UTF-8 in string at {offset:#x}")]
    InvalidUtf8 { offset: usize },

    #[error("maps nested too deeply at {offset:#x}")]
    TooDeep { offset: usize },

    #[error("missing shortcuts key")]
    MissingShortcuts,

    #[error("value of \"{key}\" is not a map")]
    NotAMap { key: String },

    #[error("invalid shortcut index \"{key}\"")]
    InvalidIndex { key: String },

    #[error("shortcut {index}: property {property} expected {expected}, found {found}")]
    TypeMismatch {
        index: u32,
        property: &'static str,
        expected: &'static str,
        found: &'static str,
    },
}

/// A property name or value that does not fit the schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("unknown property \"{name}\"")]
    UnknownProperty { name: String },

    #[error("shortcut {index}: missing property {property}")]
    MissingProperty { index: u32, property: &'static str },

    #[error("property {property} expects {expected}, got {found}")]
    TypeMismatch {
        property: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error("invalid value {value:?} for property {property}")]
    InvalidValue { property: &'static str, value: String },

    #[error("not a valid array: {value:?}")]
    NotAnArray { value: String },

    #[error("property {property} is read-only")]
    ReadOnly { property: &'static str },

    #[error("no free shortcut index left")]
    CollectionFull,
}

/// Failure while importing a JSON document. Aborts the whole batch.
#[derive(Debug, Error)]
pub enum JsonError {
    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("JSON root must be an array")]
    NotAnArray,

    #[error("element {position} is not an object")]
    NotAnObject { position: usize },

    #[error("element {position}: missing index")]
    MissingIndex { position: usize },

    #[error("element {position}: missing property {property}")]
    MissingProperty {
        position: usize,
        property: &'static str,
    },

    #[error("element {position}: property {property} must be {expected}")]
    WrongType {
        position: usize,
        property: &'static str,
        expected: &'static str,
    },
}
