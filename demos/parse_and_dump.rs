//! Parse a few templates and print their trees and placeholders.

use urltemplate_rs::{parse, template, to_sexp};

fn main() {
    let input = "https://api.example.com/users/:id?fields={{fields}}\n\
                 {{baseUrl}}/health\n\
                 localhost:8080/items/{{itemId}}";

    let file = parse(input);
    for line in file.lines() {
        match &line.result {
            Ok(tree) => {
                println!("line {}: {}", line.number, to_sexp(tree));
                println!("  variables:   {:?}", template::variables(tree));
                println!("  path params: {:?}", template::path_params(tree));
            }
            Err(e) => println!("line {}: {e}", line.number),
        }
    }
}
