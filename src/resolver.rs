//! Host-versus-path decision at the start of a line.
//!
//! Text such as `api.example.com/data` can be read as a host followed
//! by a path, or as a path whose first segment looks like a host. The
//! decision is made once, greedily:
//!
//! 1. Try `domain_and_port` at the current position. It only matches
//!    through its own patterns: `localhost`, a dotted quad, or a
//!    multi-label dotted domain.
//! 2. On a match the host is committed. If no path follows, the line
//!    fails; the host is never handed back to `path`.
//! 3. Otherwise the same position is parsed as `path`.
//!
//! The same rule applies with or without a preceding `protocol`.

use crate::ast::Node;
use crate::parser::Parser;

/// What the text after the optional protocol turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Resolution<'src> {
    /// A committed `domain_and_port` node.
    Host(Node<'src>),
    /// No host here; parse the position as `path`.
    Path,
}

pub(crate) fn resolve_host<'src>(
    parser: &mut Parser<'src>,
    after_protocol: bool,
) -> Resolution<'src> {
    let start = parser.pos();
    log::trace!("resolving host or path at {start} (after protocol: {after_protocol})");
    match parser.domain_and_port() {
        Some(host) => {
            log::debug!("committed host {:?} at {}", host.text(), host.span());
            Resolution::Host(host)
        }
        None => {
            log::trace!("no host at {start}, reading as path");
            Resolution::Path
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::NodeKind;
    use crate::token::Span;

    fn resolve(input: &str) -> Resolution<'_> {
        let mut parser = Parser::new(input, Span::new(0, input.len()), 1);
        resolve_host(&mut parser, false)
    }

    #[test]
    fn dotted_domain_commits() {
        let Resolution::Host(host) = resolve("api.example.com/data") else {
            panic!("expected host");
        };
        assert_eq!(host.kind(), NodeKind::DomainAndPort);
        assert_eq!(host.span(), Span::new(0, 15));
    }

    #[test]
    fn single_label_is_path() {
        assert_eq!(resolve("users/1"), Resolution::Path);
    }

    #[test]
    fn leading_slash_is_path() {
        assert_eq!(resolve("/api.example.com"), Resolution::Path);
    }

    #[test]
    fn variable_is_path() {
        assert_eq!(resolve("{{host}}/x"), Resolution::Path);
    }

    #[test]
    fn dotted_quad_commits_with_port() {
        let Resolution::Host(host) = resolve("127.0.0.1:8080/x") else {
            panic!("expected host");
        };
        assert_eq!(host.text(), "127.0.0.1:8080");
    }
}
