#![allow(clippy::module_inception)]

use std::{fs, path::Path, rc::Rc};

use crate::{
    ast::ast::Program,
    errors::{
        diagnostics::{Diagnostic, Diagnostics},
        errors::{Error, ErrorTip, RunError},
    },
    interpreter::{activation_record::Record, console::SharedConsole, interpreter::interpret},
    lexer::lexer::tokenize,
    modules::resolver::ModuleResolver,
    parser::parser::parse,
    semantic::analyzer::{analyze, Analysis},
};

pub mod ast;
pub mod errors;
pub mod interpreter;
pub mod lexer;
pub mod macros;
pub mod modules;
pub mod parser;
pub mod semantic;
pub mod types;
pub mod value;

extern crate regex;

#[derive(Debug, Clone)]
pub struct Position(pub u32, pub Rc<String>);

#[derive(Debug, Clone)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

/// Returns the 1-based line number, the line text and the byte offset within it.
///
/// Offsets past the end of `source` point just after the last character.
pub fn get_line_at_position(source: &str, position: u32) -> (usize, String, usize) {
    let pos = (position as usize).min(source.len());

    let mut start = 0;
    let mut line_number = 1;

    for line in source.split_inclusive('\n') {
        let end = start + line.len();

        if pos < end || (end == source.len() && !line.ends_with('\n')) {
            return (line_number, line.to_string(), pos - start);
        }

        start = end;
        line_number += 1;
    }

    (line_number, String::new(), pos - start)
}

/// A program that parsed and passed analysis.
#[derive(Debug)]
pub struct Compilation {
    pub program: Program,
    pub analysis: Analysis,
}

fn program_name(file: &str) -> String {
    Path::new(file)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(file)
        .to_string()
}

/// Tokenizes and parses `source`. The program is named after the file stem.
pub fn parse_source(source: &str, file: &str) -> Result<Program, Error> {
    let tokens = tokenize(source, Some(file.to_string()))?;
    let mut program = parse(tokens, Rc::new(file.to_string()))?;
    program.name = program_name(file);
    Ok(program)
}

/// Parses and analyzes `source`, resolving imports through `resolver`.
pub fn compile_source(source: &str, file: &str, resolver: &mut ModuleResolver) -> Result<Compilation, Diagnostics> {
    let source: Rc<str> = Rc::from(source);

    let program = parse_source(&source, file).map_err(|error| {
        let mut diagnostics = Diagnostics::new(Rc::clone(&source));
        diagnostics.report(error);
        diagnostics
    })?;

    let analysis = analyze(&program, source, resolver);
    if !analysis.is_ok() {
        return Err(analysis.diagnostics);
    }

    Ok(Compilation { program, analysis })
}

/// Compiles `source` and, if it has no diagnostics, executes it.
pub fn run_source(source: &str, file: &str, resolver: &mut ModuleResolver) -> Result<Record, RunError> {
    let Compilation { program, .. } = compile_source(source, file, resolver).map_err(RunError::Diagnostics)?;
    Ok(interpret(&program, resolver)?)
}

/// Runs the file at `path` with imports resolved relative to its directory.
pub fn run_file(path: &Path, console: SharedConsole) -> Result<Record, RunError> {
    let source = fs::read_to_string(path).map_err(|source| RunError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let mut resolver = ModuleResolver::for_file(path, console);
    run_source(&source, &path.display().to_string(), &mut resolver)
}


/// Prints `diagnostic` to stderr with the offending line underlined.
pub fn display_error(diagnostic: &Diagnostic) {
    /*
        Error: UndefinedSymbol: 'b' is not defined (...)
        -> main.boink
           |
        20 | int a = b
           | --------^
    */

    let error = &diagnostic.error;
    let line_string = diagnostic.line.to_string();
    let padding = line_string.len() + 2;

    if let ErrorTip::None = error.get_tip() {
        eprintln!("Error: {}: {}", error.get_error_name(), diagnostic.message());
    } else {
        eprintln!(
            "Error: {}: {} ({})",
            error.get_error_name(),
            diagnostic.message(),
            error.get_tip()
        );
    }
    eprintln!("-> {}", diagnostic.file());
    eprintln!("{:>padding$}", "|");

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(&diagnostic.line_text);
    eprintln!("{} | {}", line_string, line_text_removed.trim_end());

    let arrows = diagnostic.column.saturating_sub(removed_whitespace).max(1);

    eprintln!("{:>padding$} {:->arrows$}", "|", "^");
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let start = string.chars().take_while(|c| *c == ' ' || *c == '\t').count();

    (string.chars().skip(start).collect(), start)
}
