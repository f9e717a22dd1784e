//! Demonstrate per-line errors and caret diagnostics.

use urltemplate_rs::{ParseErrorKind, diagnostic, parse};

fn main() {
    let input = "/ok\n/x?\nexample.com\n/a b";

    let file = parse(input);
    for err in file.errors() {
        println!("Kind: {}", err.kind.name());
        if let ParseErrorKind::PostCommitFailure { host } = err.kind {
            println!("  Host committed at {host}");
        }
        print!("{}", diagnostic::render(input, err));
        println!();
    }

    let valid = file.lines().len() - file.errors().count();
    println!("{valid} of {} line(s) valid", file.lines().len());
}
