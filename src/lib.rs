#![allow(clippy::module_inception)]

use std::rc::Rc;

use log::info;

use crate::{
    ast::ast::Program,
    compiler::{compiler::generate, ir::IrProgram, verify::verify},
    errors::errors::{Error, ErrorTip},
    type_checker::{signatures::FunctionTable, type_checker::type_check},
};

pub mod ast;
pub mod compiler;
pub mod errors;
pub mod macros;
pub mod type_checker;

extern crate regex;

#[derive(Debug, Clone, PartialEq)]
pub struct Position(pub u32, pub Rc<String>);

impl Position {
    pub fn null() -> Self {
        Position(0, Rc::new(String::from("<null>")))
    }

    pub fn is_null(&self) -> bool {
        self.1.as_str() == "<null>"
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: u32, end: u32, file: Rc<String>) -> Self {
        Span {
            start: Position(start, Rc::clone(&file)),
            end: Position(end, file),
        }
    }

    pub fn null() -> Self {
        Span {
            start: Position::null(),
            end: Position::null(),
        }
    }
}

/// Knobs for a single compilation unit.
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Whether the unit must define `int main()`. Library units turn this off.
    pub require_main: bool,
    /// Whether the generated instructions are run through the IR verifier.
    pub verify_ir: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        CompileOptions {
            require_main: true,
            verify_ir: true,
        }
    }
}

impl CompileOptions {
    pub fn new() -> Self {
        CompileOptions::default()
    }

    pub fn require_main(mut self, require_main: bool) -> Self {
        self.require_main = require_main;
        self
    }

    pub fn verify_ir(mut self, verify_ir: bool) -> Self {
        self.verify_ir = verify_ir;
        self
    }
}

/// The output of a successful compilation: the signature table and the
/// flattened instruction stream.
#[derive(Debug, Clone)]
pub struct CompiledProgram {
    pub functions: FunctionTable,
    pub ir: IrProgram,
}

/// Type checks `program` and, only if that succeeds, lowers it to quadruples.
pub fn compile(program: &Program, options: &CompileOptions) -> Result<CompiledProgram, Error> {
    info!("type checking {} function(s)", program.functions.len());
    let functions = type_check(program, options)?;

    info!("generating quadruples");
    let ir = generate(program, &functions)?;

    if options.verify_ir {
        info!("verifying {} quadruple(s)", ir.len());
        verify(&ir)?;
    }

    Ok(CompiledProgram { functions, ir })
}

/// Finds the line containing the byte offset `position`.
///
/// Returns the 1-based line number, the line text and the offset within the line.
pub fn get_line_at_position(source: &str, position: u32) -> Option<(usize, String, usize)> {
    let pos = position as usize;

    if pos >= source.len() {
        return None;
    }

    let mut start = 0;
    let mut line_number = 1;

    for line in source.split_inclusive('\n') {
        let end = start + line.len();

        if (start..end).contains(&pos) {
            let line_pos = pos - start;
            return Some((line_number, line.to_string(), line_pos));
        }

        start = end;
        line_number += 1;
    }

    None
}

/// Renders a diagnostic for `error` against the source text it came from.
pub fn format_error(error: &Error, file_label: &str, source: &str) -> String {
    /*
        Error: name (tip)
        -> file.lat
           |
        20 | int x = true;
           | --------^
    */

    let mut rendered = match error.get_tip() {
        ErrorTip::None => format!("Error: {}\n", error.get_error_name()),
        tip => format!("Error: {} ({})\n", error.get_error_name(), tip),
    };
    rendered.push_str(&format!("-> {}\n", file_label));

    let position = error.get_position();
    if position.is_null() {
        return rendered;
    }

    let Some((line, line_text, line_pos)) = get_line_at_position(source, position.0) else {
        return rendered;
    };

    let line_string = line.to_string();
    let padding = line_string.len() + 2;

    rendered.push_str(&format!("{:>padding$}\n", "|"));

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(&line_text);
    rendered.push_str(&format!("{} | {}\n", line_string, line_text_removed.trim_end()));

    let arrows = line_pos.saturating_sub(removed_whitespace) + 1;
    rendered.push_str(&format!("{:>padding$} {:->arrows$}\n", "|", "^"));

    rendered
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let trimmed = string.trim_start();

    (String::from(trimmed), string.len() - trimmed.len())
}
