use std::collections::{HashMap, HashSet};

use lazy_static::lazy_static;
use log::debug;

use crate::{
    ast::{ast::Program, types::Type},
    compiler::stdlib::is_runtime_helper,
    errors::errors::{Error, ErrorImpl},
    Span, MK_ERROR,
};

use super::scope::check_identifier;

lazy_static! {
    /// The I/O functions every program can call without defining them.
    pub static ref BUILTINS: Vec<FunctionSignature> = vec![
        FunctionSignature::new("printInt", Type::Void, vec![(Type::Int, "n")]),
        FunctionSignature::new("printString", Type::Void, vec![(Type::String, "s")]),
        FunctionSignature::new("error", Type::Void, vec![]),
        FunctionSignature::new("readInt", Type::Int, vec![]),
        FunctionSignature::new("readString", Type::String, vec![]),
    ];
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSignature {
    pub name: String,
    pub return_type: Type,
    pub params: Vec<(Type, String)>,
}

impl FunctionSignature {
    pub fn new(name: &str, return_type: Type, params: Vec<(Type, &str)>) -> Self {
        FunctionSignature {
            name: name.to_string(),
            return_type,
            params: params
                .into_iter()
                .map(|(ty, name)| (ty, name.to_string()))
                .collect(),
        }
    }

    pub fn param_types(&self) -> Vec<Type> {
        self.params.iter().map(|(ty, _)| *ty).collect()
    }
}

/// Global name to signature mapping. Iteration follows insertion order:
/// built-ins first, then user functions in source order.
#[derive(Debug, Clone, Default)]
pub struct FunctionTable {
    signatures: Vec<FunctionSignature>,
    lookup: HashMap<String, usize>,
}

impl FunctionTable {
    pub fn new() -> Self {
        FunctionTable::default()
    }

    pub fn with_builtins() -> Self {
        let mut table = FunctionTable::new();
        for builtin in BUILTINS.iter() {
            table.insert(builtin.clone());
        }
        table
    }

    fn insert(&mut self, signature: FunctionSignature) {
        self.lookup
            .insert(signature.name.clone(), self.signatures.len());
        self.signatures.push(signature);
    }

    /// Adds a signature. Each name may be defined once.
    pub fn declare(&mut self, signature: FunctionSignature, span: &Span) -> Result<(), Error> {
        if self.lookup.contains_key(&signature.name) {
            return MK_ERROR!(
                ErrorImpl::DuplicateFunction {
                    function: signature.name,
                },
                span
            );
        }

        self.insert(signature);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&FunctionSignature> {
        self.lookup.get(name).map(|index| &self.signatures[*index])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup.contains_key(name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FunctionSignature> {
        self.signatures.iter()
    }

    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }

    pub fn is_builtin(&self, name: &str) -> bool {
        BUILTINS.iter().any(|builtin| builtin.name == name)
    }

    pub fn user_functions(&self) -> impl Iterator<Item = &FunctionSignature> {
        self.signatures
            .iter()
            .filter(|signature| !self.is_builtin(&signature.name))
    }
}

/// First pass: collects every top-level signature so bodies may call
/// functions defined later in the file.
pub fn build_function_table(program: &Program) -> Result<FunctionTable, Error> {
    let mut table = FunctionTable::with_builtins();

    for function in program.iter() {
        check_identifier(&function.identifier, &function.span)?;

        if is_runtime_helper(&function.identifier) {
            return MK_ERROR!(
                ErrorImpl::DuplicateFunction {
                    function: function.identifier.clone(),
                },
                function.span
            );
        }

        let mut seen = HashSet::new();
        let mut params = Vec::with_capacity(function.parameters.len());

        for param in &function.parameters {
            check_identifier(&param.identifier, &param.span)?;

            if param.param_type.is_void() {
                return MK_ERROR!(
                    ErrorImpl::UnsupportedConstruct {
                        construct: format!("void parameter `{}`", param.identifier),
                    },
                    param.span
                );
            }

            if !seen.insert(param.identifier.as_str()) {
                return MK_ERROR!(
                    ErrorImpl::RepeatedParameterName {
                        function: function.identifier.clone(),
                        parameter: param.identifier.clone(),
                    },
                    param.span
                );
            }

            params.push((param.param_type, param.identifier.clone()));
        }

        table.declare(
            FunctionSignature {
                name: function.identifier.clone(),
                return_type: function.return_type,
                params,
            },
            &function.span,
        )?;
        debug!(
            "declared function `{}` with {} parameter(s)",
            function.identifier,
            function.parameters.len()
        );
    }

    Ok(table)
}
