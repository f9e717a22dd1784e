//! Grammar edge cases and error tests.

mod common;

use common::{child, kinds, pairs, parse_ok};
use urltemplate_rs::{NodeKind, ParseErrorKind, parse, parse_line};

// -----------------------------------------------------------
// Protocol.
// -----------------------------------------------------------

#[test]
fn every_scheme() {
    for scheme in ["http", "https", "ftp", "ws", "wss"] {
        let input = format!("{scheme}://example.com/");
        let line = parse_ok(&input);
        let protocol = child(&line, NodeKind::Protocol);
        assert_eq!(protocol.text(), format!("{scheme}://"));
        assert_eq!(protocol.children()[0].text(), scheme);
    }
}

#[test]
fn unknown_scheme_is_not_protocol() {
    let err = parse_line("gopher://example.com/").unwrap_err();
    assert!(matches!(
        err.kind,
        ParseErrorKind::UnexpectedToken {
            found: Some(':'),
            ..
        }
    ));
    assert_eq!(err.offset, 6);
}

#[test]
fn protocol_then_path_without_host() {
    let line = parse_ok("http:///x");
    assert_eq!(kinds(&line), vec![NodeKind::Protocol, NodeKind::Path]);
}

// -----------------------------------------------------------
// Host and port.
// -----------------------------------------------------------

#[test]
fn port_is_capped_at_five_digits() {
    let line = parse_ok("example.com:123456/x");
    let host = child(&line, NodeKind::DomainAndPort);
    assert_eq!(child(host, NodeKind::Port).text(), "12345");
    let path = child(&line, NodeKind::Path);
    assert_eq!(path.children()[0].text(), "6");
}

#[test]
fn host_children_tile() {
    let line = parse_ok("localhost:8080/");
    let host = child(&line, NodeKind::DomainAndPort);
    assert_eq!(
        pairs(host),
        vec![
            (NodeKind::Domain, "localhost"),
            (NodeKind::Literal, ":"),
            (NodeKind::Port, "8080"),
        ]
    );
}

#[test]
fn plain_domain_has_no_hostname_child() {
    let line = parse_ok("example.com/");
    let domain = child(child(&line, NodeKind::DomainAndPort), NodeKind::Domain);
    assert!(domain.is_leaf());
}

// -----------------------------------------------------------
// Path.
// -----------------------------------------------------------

#[test]
fn consecutive_slashes() {
    let line = parse_ok("//a//");
    let path = child(&line, NodeKind::Path);
    let texts: Vec<_> = path.children().iter().map(|c| c.text()).collect();
    assert_eq!(texts, vec!["/", "/", "a", "/", "/"]);
}

#[test]
fn param_directly_after_segment() {
    let line = parse_ok("/file:name");
    let path = child(&line, NodeKind::Path);
    assert_eq!(
        kinds(path),
        vec![NodeKind::Literal, NodeKind::PathSegment, NodeKind::PathParam]
    );
}

#[test]
fn variable_inside_segment_run() {
    let line = parse_ok("/v{{version}}-beta");
    let path = child(&line, NodeKind::Path);
    assert_eq!(
        kinds(path),
        vec![
            NodeKind::Literal,
            NodeKind::PathSegment,
            NodeKind::Variable,
            NodeKind::PathSegment,
        ]
    );
}

#[test]
fn variable_name_rejects_dash() {
    let err = parse_line("/{{user-id}}").unwrap_err();
    assert_eq!(err.offset, 1);
}

#[test]
fn colon_without_name() {
    let err = parse_line("/a:/b").unwrap_err();
    assert_eq!(err.offset, 2);
}

#[test]
fn stray_closing_braces() {
    let err = parse_line("/a}}").unwrap_err();
    assert!(matches!(
        err.kind,
        ParseErrorKind::UnexpectedToken {
            rule: NodeKind::Path,
            found: Some('}'),
            ..
        }
    ));
}

// -----------------------------------------------------------
// Query string.
// -----------------------------------------------------------

#[test]
fn query_structure_tiles() {
    let line = parse_ok("/?a=1&b");
    let query = child(&line, NodeKind::QueryString);
    assert_eq!(
        pairs(query),
        vec![
            (NodeKind::Literal, "?"),
            (NodeKind::QueryParam, "a=1"),
            (NodeKind::Literal, "&"),
            (NodeKind::QueryParam, "b"),
        ]
    );
}

#[test]
fn query_without_slash() {
    let line = parse_ok("search?q=x");
    assert_eq!(kinds(&line), vec![NodeKind::Path, NodeKind::QueryString]);
}

#[test]
fn key_rejects_dots() {
    let err = parse_line("/x?a.b=1").unwrap_err();
    assert!(matches!(
        err.kind,
        ParseErrorKind::UnexpectedToken {
            rule: NodeKind::QueryParam,
            found: Some('.'),
            ..
        }
    ));
    assert_eq!(err.offset, 4);
}

#[test]
fn dangling_after_question_with_ampersand() {
    let err = parse_line("/x?&a=1").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::DanglingQueryString);
    assert_eq!(err.offset, 3);
}

#[test]
fn variable_value_followed_by_text() {
    // `value` takes the variable first and does not fall back to raw text.
    let err = parse_line("/x?a={{v}}z").unwrap_err();
    assert!(matches!(
        err.kind,
        ParseErrorKind::UnexpectedToken {
            rule: NodeKind::QueryString,
            found: Some('z'),
            ..
        }
    ));
}

#[test]
fn value_may_contain_spaces_and_equals() {
    let line = parse_ok("/x?filter=a = b");
    let param = child(child(&line, NodeKind::QueryString), NodeKind::QueryParam);
    assert_eq!(child(param, NodeKind::Value).text(), "a = b");
}

// -----------------------------------------------------------
// Multi-line.
// -----------------------------------------------------------

#[test]
fn newline_inside_parse_line_is_unexpected() {
    let err = parse_line("/a\n/b").unwrap_err();
    assert!(matches!(
        err.kind,
        ParseErrorKind::UnexpectedToken {
            found: Some('\n'),
            ..
        }
    ));
}

#[test]
fn error_offsets_are_absolute() {
    let file = parse("/ok\n/bad path\n");
    let err = file.errors().next().expect("error");
    assert_eq!(err.offset, 8);
    assert_eq!(err.line, 2);
    assert_eq!(err.column, 5);
}

#[test]
fn blank_lines_are_skipped() {
    let file = parse("/a\n\n\n/b\n");
    let numbers: Vec<_> = file.lines().iter().map(|l| l.number).collect();
    assert_eq!(numbers, vec![1, 4]);
    assert!(file.is_ok());
}
