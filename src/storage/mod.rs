//!  Storage is organized through [document::JsonFileStore].
//!  The basic idea is:
//!   - The whole state lives in a single JSON document, see [entities::Store].
//!   - The document is read once per invocation and rewritten as a whole after every change.
//!   - Writes go through a temporary file that replaces the document, so the document is either
//!     old or new, never partial.

pub mod document;
pub mod entities;
