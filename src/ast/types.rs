//! Type system definitions for the AST.
//!
//! The language has three value types and `void`, which may only appear
//! as a function return type.

use std::fmt::Display;

use super::expressions::Literal;

/// Represents the types of the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    Int,
    Boolean,
    String,
    Void,
}

impl Type {
    /// The literal a variable of this type holds when declared without an
    /// initializer. `void` has none.
    pub fn default_literal(&self) -> Option<Literal> {
        match self {
            Type::Int => Some(Literal::Int(0)),
            Type::Boolean => Some(Literal::Bool(false)),
            Type::String => Some(Literal::Str(String::new())),
            Type::Void => None,
        }
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Type::Void)
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Int => write!(f, "int"),
            Type::Boolean => write!(f, "boolean"),
            Type::String => write!(f, "string"),
            Type::Void => write!(f, "void"),
        }
    }
}
