use crate::Span;

use super::{statements::BlockStmt, types::Type};

/// A whole compilation unit: function definitions in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub functions: Vec<FnDecl>,
}

impl Program {
    pub fn new(functions: Vec<FnDecl>) -> Self {
        Program { functions }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FnDecl> {
        self.functions.iter()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub identifier: String,
    pub param_type: Type,
    pub span: Span,
}

impl Param {
    pub fn new(param_type: Type, identifier: &str) -> Self {
        Param {
            identifier: identifier.to_string(),
            param_type,
            span: Span::null(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FnDecl {
    pub identifier: String,
    pub parameters: Vec<Param>,
    pub return_type: Type,
    pub body: BlockStmt,
    pub span: Span,
}

impl FnDecl {
    pub fn new(
        return_type: Type,
        identifier: &str,
        parameters: Vec<Param>,
        body: BlockStmt,
    ) -> Self {
        FnDecl {
            identifier: identifier.to_string(),
            parameters,
            return_type,
            body,
            span: Span::null(),
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }
}
