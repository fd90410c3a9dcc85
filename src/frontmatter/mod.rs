//! Frontmatter parsing and field-by-field translation.

mod parser;
mod transcoder;

pub use parser::{Entry, Frontmatter, Quote, QuotedField, TagList};
pub use transcoder::{FieldError, Transcoded, accept_tags, transcode};
