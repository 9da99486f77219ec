//! Loading wizard definitions and writing submitted payloads.

mod format;
mod input;
mod output;

pub use format::DocumentFormat;
pub use input::{definition_schema, load_definition_path, load_definition_str, parse_document_str};
pub use output::{OutputDestination, OutputOptions, emit, emit_payload};
