//! Script parsing
//!
//! Parsing happens in two passes over the source text:
//!
//! 1. [`frontmatter`] splits an optional `---` delimited `key: value` header
//!    off the top. A missing or unterminated header is not an error; the
//!    whole text is then body and the metadata is empty.
//! 2. [`parser::Parser`] walks the body line by line, opening scenes at
//!    `# TITLE` / `# SCENE:` markers, accumulating block command bodies and
//!    buffering prose. Prose lines become text elements through
//!    [`inlines::scan_segments`](crate::lesson::inlines::scan_segments).
//!
//! The syntax is lenient throughout: anything that is not a recognized
//! directive is prose.

pub mod frontmatter;
pub mod parser;

pub use frontmatter::{extract_frontmatter, parse_header};
pub use parser::Parser;
