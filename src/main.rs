//! CLI tool to parse, validate, and inspect URL templates.

use std::fs;
use std::io::{self, Read as _};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use urltemplate_rs::{SourceFile, diagnostic, format_source_file, parse, template};

#[derive(Parser)]
#[command(name = "urltemplate")]
#[command(about = "Parse URL templates into positioned syntax trees", long_about = None)]
struct Cli {
    /// Log parser decisions (same as RUST_LOG=debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the syntax tree of every line
    Parse {
        #[command(flatten)]
        input: InputArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value = "sexp")]
        format: OutputFormat,
    },

    /// Check that every line parses, printing diagnostics otherwise
    Check {
        #[command(flatten)]
        input: InputArgs,
    },

    /// List variables, path parameters, and query parameters
    Vars {
        #[command(flatten)]
        input: InputArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: VarsFormat,
    },
}

#[derive(clap::Args)]
struct InputArgs {
    /// Files to read; `-` reads stdin
    files: Vec<PathBuf>,

    /// Inline template to parse instead of files
    #[arg(short, long, conflicts_with = "files")]
    expr: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Sexp,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum VarsFormat {
    Text,
    Json,
}

struct Input {
    name: String,
    content: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let input = match &cli.command {
        Commands::Parse { input, .. } | Commands::Check { input } | Commands::Vars { input, .. } => {
            input
        }
    };

    let Some(inputs) = read_inputs(input) else {
        return ExitCode::from(2);
    };

    let mut had_error = false;
    for Input { name, content } in &inputs {
        let file = parse(content);
        log::debug!("{name}: {} line(s)", file.lines().len());
        let ok = match &cli.command {
            Commands::Parse { format, .. } => print_tree(name, &file, *format),
            Commands::Check { .. } => check(name, &file),
            Commands::Vars { format, .. } => print_vars(name, &file, *format),
        };
        had_error |= !ok;
    }

    if had_error {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn read_inputs(args: &InputArgs) -> Option<Vec<Input>> {
    if let Some(expr) = &args.expr {
        return Some(vec![Input {
            name: "<expr>".to_string(),
            content: expr.clone(),
        }]);
    }
    if args.files.is_empty() {
        eprintln!("Error: no files specified (use `-` for stdin or --expr)");
        return None;
    }

    let mut inputs = Vec::new();
    let mut failed = false;
    for path in &args.files {
        let name = path.display().to_string();
        let content = if name == "-" {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf).map(|_| buf)
        } else {
            fs::read_to_string(path)
        };
        match content {
            Ok(content) => inputs.push(Input { name, content }),
            Err(e) => {
                eprintln!("{name}: {e}");
                failed = true;
            }
        }
    }
    (!failed).then_some(inputs)
}

fn print_tree(name: &str, file: &SourceFile<'_>, format: OutputFormat) -> bool {
    match format {
        OutputFormat::Sexp => print!("{}", format_source_file(file)),
        OutputFormat::Json => match serde_json::to_string_pretty(file.lines()) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("{name}: {e}");
                return false;
            }
        },
    }
    file.is_ok()
}

fn check(name: &str, file: &SourceFile<'_>) -> bool {
    for err in file.errors() {
        eprintln!("{name}:");
        eprint!("{}", diagnostic::render(file.source(), err));
    }
    let total = file.lines().len();
    let failed = file.errors().count();
    if failed == 0 {
        eprintln!("{name}: valid ({total} line(s))");
        true
    } else {
        eprintln!("{name}: {failed} of {total} line(s) invalid");
        false
    }
}

#[derive(serde::Serialize)]
struct LineVars<'src> {
    line: usize,
    variables: Vec<&'src str>,
    path_params: Vec<&'src str>,
    query_params: Vec<template::QueryParam<'src>>,
}

fn print_vars(name: &str, file: &SourceFile<'_>, format: VarsFormat) -> bool {
    let vars: Vec<_> = file
        .lines()
        .iter()
        .filter_map(|line| {
            let node = line.result.as_ref().ok()?;
            Some(LineVars {
                line: line.number,
                variables: template::variables(node),
                path_params: template::path_params(node),
                query_params: template::query_params(node),
            })
        })
        .collect();

    match format {
        VarsFormat::Text => {
            for v in &vars {
                let params: Vec<_> = v.query_params.iter().map(|p| p.key).collect();
                println!(
                    "{name}:{}: variables [{}] path_params [{}] query [{}]",
                    v.line,
                    v.variables.join(", "),
                    v.path_params.join(", "),
                    params.join(", ")
                );
            }
        }
        VarsFormat::Json => match serde_json::to_string_pretty(&vars) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("{name}: {e}");
                return false;
            }
        },
    }

    for err in file.errors() {
        eprintln!("{name}: {err}");
    }
    file.is_ok()
}
