//! sve-core: codec, schema, and editing logic for `shortcuts.vdf` files
//!
//! This crate focuses on a small, well-factored surface:
//! - Binary vdf tree reader/writer (no schema knowledge)
//! - Fixed property schema and the typed `Shortcut` record built on it
//! - The `Shortcuts` collection: parse, get-or-create, store
//! - JSON export/import for listing and bulk edits
//!
pub mod cursor;
pub mod editor;
pub mod error;
pub mod json;
pub mod model;
pub mod saves;
pub mod schema;
pub mod shortcuts;
pub mod vdf;
pub mod vdf_write;

pub use editor::{StoreOpts, apply_edit, store_with, zip_backup_file};
pub use error::{DecodeError, Error, JsonError, Result, SchemaError};
pub use model::{PropValue, Shortcut, TimeFormat};
pub use saves::{find_shortcuts_files, resolve_shortcuts_path};
pub use schema::{PropKind, Validation};
pub use shortcuts::Shortcuts;

/// Checks a `(key, value)` pair against the schema without touching any record.
pub fn is_prop_valid(key: &str, value: &str) -> Validation {
    schema::validate(key, value, false)
}

pub fn prop_is_uint32(name: &str) -> std::result::Result<bool, SchemaError> {
    schema::is_uint32(name)
}
pub fn prop_is_string(name: &str) -> std::result::Result<bool, SchemaError> {
    schema::is_text(name)
}
pub fn prop_is_stringarr(name: &str) -> std::result::Result<bool, SchemaError> {
    schema::is_text_array(name)
}
