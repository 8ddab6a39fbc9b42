use std::collections::{HashMap, HashSet};

use lazy_static::lazy_static;
use log::trace;
use regex::Regex;

use crate::{
    errors::errors::{Error, ErrorImpl},
    Span, MK_ERROR,
};

lazy_static! {
    static ref IDENTIFIER: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_']*$").unwrap();
    pub static ref RESERVED_WORDS: HashSet<&'static str> = {
        let mut set = HashSet::new();
        set.insert("int");
        set.insert("boolean");
        set.insert("string");
        set.insert("void");
        set.insert("if");
        set.insert("else");
        set.insert("while");
        set.insert("return");
        set.insert("true");
        set.insert("false");
        set
    };
}

/// Rejects names the grammar could not have produced.
pub fn check_identifier(name: &str, span: &Span) -> Result<(), Error> {
    if IDENTIFIER.is_match(name) && !RESERVED_WORDS.contains(name) {
        Ok(())
    } else {
        MK_ERROR!(
            ErrorImpl::UnsupportedConstruct {
                construct: format!("identifier `{}`", name),
            },
            span
        )
    }
}

/// One lexical frame.
#[derive(Debug)]
pub struct Environment<V> {
    pub variable_lookup: HashMap<String, V>,
}

impl<V> Environment<V> {
    pub fn new() -> Self {
        Environment {
            variable_lookup: HashMap::new(),
        }
    }

    pub fn declare_variable(&mut self, name: &str, value: V, span: &Span) -> Result<(), Error> {
        if self.variable_lookup.contains_key(name) {
            MK_ERROR!(
                ErrorImpl::DuplicateDeclaration {
                    variable: name.to_string(),
                },
                span
            )
        } else {
            self.variable_lookup.insert(name.to_string(), value);
            Ok(())
        }
    }

    pub fn get_variable(&self, name: &str) -> Option<&V> {
        self.variable_lookup.get(name)
    }
}

impl<V> Default for Environment<V> {
    fn default() -> Self {
        Environment::new()
    }
}

/// A stack of frames, innermost last. The outermost (global) frame is
/// created with the stack and can never be popped.
///
/// The semantic analyzer stores a `Type` per name; the IR generator stores
/// the unique name it emits alongside the type.
#[derive(Debug)]
pub struct ScopeStack<V> {
    environments: Vec<Environment<V>>,
}

impl<V> ScopeStack<V> {
    pub fn new() -> Self {
        ScopeStack {
            environments: vec![Environment::new()],
        }
    }

    pub fn depth(&self) -> usize {
        self.environments.len()
    }

    pub fn enter(&mut self) {
        self.environments.push(Environment::new());
        trace!("enter scope (depth {})", self.depth());
    }

    pub fn exit(&mut self) -> Result<(), Error> {
        if self.environments.len() <= 1 {
            return Err(Error::internal("attempted to exit the global scope"));
        }

        self.environments.pop();
        trace!("exit scope (depth {})", self.depth());
        Ok(())
    }

    pub fn declare(&mut self, name: &str, value: V, span: &Span) -> Result<(), Error> {
        match self.environments.last_mut() {
            Some(environment) => environment.declare_variable(name, value, span),
            None => Err(Error::internal("scope stack has no frames")),
        }
    }


    pub fn lookup(&self, name: &str, span: &Span) -> Result<&V, Error> {
        for environment in self.environments.iter().rev() {
            if let Some(value) = environment.get_variable(name) {
                return Ok(value);
            }
        }

        MK_ERROR!(
            ErrorImpl::UndeclaredVariable {
                variable: name.to_string(),
            },
            span
        )
    }
}

impl<V> Default for ScopeStack<V> {
    fn default() -> Self {
        ScopeStack::new()
    }
}
