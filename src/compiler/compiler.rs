//! Main IR generator module.
//!
//! This module contains the Compiler structure which walks a type checked
//! program and flattens it into quadruples. It owns its own scope stack,
//! separate from the one used during type checking, plus the counters that
//! number temporaries, labels and blocks.

use std::collections::{HashMap, HashSet};

use log::{info, trace};

use crate::{
    ast::{ast::Program, types::Type},
    errors::errors::Error,
    type_checker::{scope::ScopeStack, signatures::FunctionTable},
    Span,
};

use super::{
    ir::{IrProgram, Label, Operand, Quadruple, Temp},
    stmt::gen_function,
};

/// A variable visible to the generator: the name emitted for it and its type.
#[derive(Debug, Clone, PartialEq)]
pub struct Local {
    pub unique_name: String,
    pub var_type: Type,
}

/// The state of one IR generation run.
///
/// This structure tracks:
/// - The signature table produced by the type checker
/// - The lexical scopes mapping source names to emitted names
/// - The instructions emitted so far
/// - Temp and label counters, shared by every function of the program
/// - Per function block numbering used to rename shadowed locals
///
/// # Type Parameters
///
/// * `'a` - Lifetime of the borrowed signature table
#[derive(Debug)]
pub struct Compiler<'a> {
    /// Signatures of every callable function, built-ins included
    pub functions: &'a FunctionTable,
    /// Source name to emitted name, innermost frame last
    pub scopes: ScopeStack<Local>,
    /// The instruction stream being built
    pub quadruples: Vec<Quadruple>,

    temp_counter: usize,
    label_counter: usize,

    /// Blocks opened so far in the current function
    block_counter: usize,
    /// Ids of the currently open blocks, innermost last
    open_blocks: Vec<usize>,
    /// Every local name emitted in the current function
    used_names: HashSet<String>,

    /// Types of temporaries and emitted locals, for operand type queries
    temp_types: HashMap<Temp, Type>,
    local_types: HashMap<String, Type>,
}

impl<'a> Compiler<'a> {
    /// Creates a new Compiler instance.
    ///
    /// # Arguments
    ///
    /// * `functions` - The signature table of an already type checked program
    ///
    /// # Returns
    ///
    /// A Compiler with empty output and all counters at zero.
    pub fn new(functions: &'a FunctionTable) -> Self {
        Compiler {
            functions,
            scopes: ScopeStack::new(),
            quadruples: Vec::new(),
            temp_counter: 0,
            label_counter: 0,
            block_counter: 0,
            open_blocks: Vec::new(),
            used_names: HashSet::new(),
            temp_types: HashMap::new(),
            local_types: HashMap::new(),
        }
    }

    /// Appends an instruction to the output.
    pub fn emit(&mut self, quad: Quadruple) {
        trace!("emit {}", quad);
        self.quadruples.push(quad);
    }

    /// Allocates a fresh temporary holding a value of `ty`.
    ///
    /// # Arguments
    ///
    /// * `ty` - The type of the value the temporary will hold
    ///
    /// # Returns
    ///
    /// A temporary numbered after every one allocated before it.
    pub fn new_temp(&mut self, ty: Type) -> Temp {
        self.temp_counter += 1;
        let temp = Temp(self.temp_counter);
        self.temp_types.insert(temp, ty);
        temp
    }

    pub fn new_label(&mut self) -> Label {
        self.label_counter += 1;
        Label(self.label_counter)
    }

    /// Resets the per-function state before a function body is generated.
    ///
    /// Temp and label numbering carries on across functions.
    pub fn begin_function(&mut self) {
        self.block_counter = 0;
        self.open_blocks.clear();
        self.used_names.clear();
        self.local_types.clear();
    }

    /// Opens a lexical block.
    pub fn enter_block(&mut self) {
        self.block_counter += 1;
        self.open_blocks.push(self.block_counter);
        self.scopes.enter();
    }

    pub fn exit_block(&mut self) -> Result<(), Error> {
        self.open_blocks.pop();
        self.scopes.exit()
    }

    /// Declares a local in the innermost block.
    ///
    /// A name not yet used in the current function is emitted verbatim.
    /// Otherwise it is suffixed with the id of the declaring block, which
    /// keeps shadowing and sibling declarations apart.
    ///
    /// # Arguments
    ///
    /// * `name` - The source name
    /// * `var_type` - The declared type
    /// * `span` - Where the declaration appears
    ///
    /// # Returns
    ///
    /// The name to emit for this local.
    pub fn declare_local(&mut self, name: &str, var_type: Type, span: &Span) -> Result<String, Error> {
        let unique_name = if self.used_names.contains(name) {
            let block = self.open_blocks.last().copied().unwrap_or(0);
            format!("{}.{}", name, block)
        } else {
            name.to_string()
        };

        self.scopes.declare(
            name,
            Local {
                unique_name: unique_name.clone(),
                var_type,
            },
            span,
        )?;
        self.used_names.insert(name.to_string());
        self.used_names.insert(unique_name.clone());
        self.local_types.insert(unique_name.clone(), var_type);

        Ok(unique_name)
    }

    /// Resolves a source name to the local it currently refers to.
    ///
    /// The program has been type checked, so a failed lookup is a bug in
    /// the generator rather than in the program.
    pub fn resolve(&self, name: &str, span: &Span) -> Result<Local, Error> {
        self.scopes
            .lookup(name, span)
            .cloned()
            .map_err(|_| Error::internal(format!("unresolved variable `{}` during generation", name)))
    }

    /// The static type of an operand produced by this generator.
    pub fn operand_type(&self, operand: &Operand) -> Result<Type, Error> {
        match operand {
            Operand::Literal(literal) => Ok(literal.get_type()),
            Operand::Variable(name) => self
                .local_types
                .get(name)
                .copied()
                .ok_or_else(|| Error::internal(format!("no type recorded for local `{}`", name))),
            Operand::Temp(temp) => self
                .temp_types
                .get(temp)
                .copied()
                .ok_or_else(|| Error::internal(format!("no type recorded for {}", temp))),
        }
    }

    /// The literal an uninitialised local of `ty` starts with.
    pub fn default_value(&self, ty: Type) -> Result<Operand, Error> {
        ty.default_literal()
            .map(Operand::Literal)
            .ok_or_else(|| Error::internal(format!("`{}` has no default value", ty)))
    }

    pub fn into_program(self) -> IrProgram {
        IrProgram::new(self.quadruples)
    }
}

/// Lowers a type checked program to quadruples.
///
/// # Arguments
///
/// * `program` - A program that passed `type_check`
/// * `functions` - The signature table `type_check` returned for it
///
/// # Returns
///
/// The instructions of every function, in source order. Any failure is an
/// internal error, since user errors were already reported by the checker.
pub fn generate(program: &Program, functions: &FunctionTable) -> Result<IrProgram, Error> {
    let mut compiler = Compiler::new(functions);

    for function in program.iter() {
        gen_function(&mut compiler, function)?;
    }

    info!(
        "generated {} quadruple(s) using {} temp(s) and {} label(s)",
        compiler.quadruples.len(),
        compiler.temp_counter,
        compiler.label_counter
    );

    Ok(compiler.into_program())
}
