//! Positioned syntax trees for URL templates.
//!
//! Parses lines such as `https://{{host}}/users/:id?page={{page}}`
//! into a tree that separates protocol, host, port, path segments,
//! path parameters, template variables, and query parameters, with a
//! byte span on every node.
//!
//! # Quick start
//!
//! ```
//! use urltemplate_rs::{NodeKind, parse_line, template};
//!
//! let line = parse_line("http://example.com/items/{{itemId}}?q=1").unwrap();
//! let host = line.child(NodeKind::DomainAndPort).unwrap();
//! assert_eq!(host.text(), "example.com");
//! assert_eq!(template::variables(&line), vec!["itemId"]);
//! ```
//!
//! ## Multi-line input
//!
//! Each line parses on its own; one bad line does not hide the rest.
//!
//! ```
//! use urltemplate_rs::{ParseErrorKind, parse};
//!
//! let file = parse("/a\n/x?\n/b");
//! assert_eq!(file.lines().len(), 3);
//! let err = file.lines()[1].result.as_ref().unwrap_err();
//! assert_eq!(err.kind, ParseErrorKind::DanglingQueryString);
//! assert!(file.lines()[2].result.is_ok());
//! ```
//!
//! # Host or path
//!
//! Text that matches the host patterns (`localhost`, a dotted quad, or
//! a multi-label domain) at the start of a line is always taken as the
//! host, with or without a protocol. That choice is final: `example.com`
//! on its own fails because no path follows the host, even though it
//! would parse as a bare path segment.

// Allow noisy pedantic lints that don't add value for
// a library crate.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod ast;
pub mod diagnostic;
pub mod formatter;
pub mod lexer;
pub mod lines;
pub mod parser;
mod resolver;
pub mod template;
pub mod token;

pub use ast::{Node, NodeKind};
pub use formatter::{SexpError, SexpErrorKind, format_source_file, from_sexp, to_sexp};
pub use lines::split_lines;
pub use parser::{Line, ParseError, ParseErrorKind, SourceFile, parse, parse_line};
pub use token::Span;

/// Unified error type covering parsing and dump reading.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A line failed to parse.
    #[error("{0}")]
    Parse(#[from] ParseError),
    /// A tree dump could not be read back.
    #[error("{0}")]
    Sexp(#[from] SexpError),
}

/// Parse `input` and assemble its `source_file` tree in one step.
pub fn parse_str(input: &str) -> Result<Node<'_>, Error> {
    Ok(parse(input).into_root()?)
}
