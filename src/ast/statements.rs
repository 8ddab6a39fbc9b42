use std::slice::Iter;

use crate::Span;

use super::{expressions::Expr, types::Type};

#[derive(Debug, Clone, PartialEq)]
pub struct BlockStmt {
    pub body: Vec<Stmt>,
    pub span: Span,
}

impl BlockStmt {
    pub fn new(body: Vec<Stmt>) -> Self {
        BlockStmt {
            body,
            span: Span::null(),
        }
    }

    pub fn iter(&self) -> Iter<'_, Stmt> {
        self.body.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// One declarator of a declaration statement: `x` or `x = e`.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub identifier: String,
    pub assigned_value: Option<Expr>,
    pub span: Span,
}

impl Item {
    pub fn init(identifier: &str, value: Expr) -> Self {
        Item {
            identifier: identifier.to_string(),
            assigned_value: Some(value),
            span: Span::null(),
        }
    }

    pub fn uninit(identifier: &str) -> Self {
        Item {
            identifier: identifier.to_string(),
            assigned_value: None,
            span: Span::null(),
        }
    }
}

/// Statement nodes.
///
/// Branch and loop bodies are single statements; a braced body is a `Block`.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Empty {
        span: Span,
    },
    Block(BlockStmt),
    VarDecl {
        var_type: Type,
        items: Vec<Item>,
        span: Span,
    },
    Assignment {
        identifier: String,
        value: Expr,
        span: Span,
    },
    Increment {
        identifier: String,
        span: Span,
    },
    Decrement {
        identifier: String,
        span: Span,
    },
    Return {
        value: Option<Expr>,
        span: Span,
    },
    If {
        condition: Expr,
        then_body: Box<Stmt>,
        else_body: Option<Box<Stmt>>,
        span: Span,
    },
    While {
        condition: Expr,
        body: Box<Stmt>,
        span: Span,
    },
    Expression {
        expression: Expr,
        span: Span,
    },
}

impl Stmt {
    pub fn get_span(&self) -> &Span {
        match self {
            Stmt::Block(block) => &block.span,
            Stmt::Empty { span }
            | Stmt::VarDecl { span, .. }
            | Stmt::Assignment { span, .. }
            | Stmt::Increment { span, .. }
            | Stmt::Decrement { span, .. }
            | Stmt::Return { span, .. }
            | Stmt::If { span, .. }
            | Stmt::While { span, .. }
            | Stmt::Expression { span, .. } => span,
        }
    }

    pub fn with_span(mut self, new_span: Span) -> Self {
        match &mut self {
            Stmt::Block(block) => block.span = new_span,
            Stmt::Empty { span }
            | Stmt::VarDecl { span, .. }
            | Stmt::Assignment { span, .. }
            | Stmt::Increment { span, .. }
            | Stmt::Decrement { span, .. }
            | Stmt::Return { span, .. }
            | Stmt::If { span, .. }
            | Stmt::While { span, .. }
            | Stmt::Expression { span, .. } => *span = new_span,
        }
        self
    }

    pub fn empty() -> Self {
        Stmt::Empty { span: Span::null() }
    }

    pub fn block(body: Vec<Stmt>) -> Self {
        Stmt::Block(BlockStmt::new(body))
    }

    pub fn decl(var_type: Type, items: Vec<Item>) -> Self {
        Stmt::VarDecl {
            var_type,
            items,
            span: Span::null(),
        }
    }

    pub fn assign(identifier: &str, value: Expr) -> Self {
        Stmt::Assignment {
            identifier: identifier.to_string(),
            value,
            span: Span::null(),
        }
    }

    pub fn incr(identifier: &str) -> Self {
        Stmt::Increment {
            identifier: identifier.to_string(),
            span: Span::null(),
        }
    }

    pub fn decr(identifier: &str) -> Self {
        Stmt::Decrement {
            identifier: identifier.to_string(),
            span: Span::null(),
        }
    }

    pub fn ret(value: Expr) -> Self {
        Stmt::Return {
            value: Some(value),
            span: Span::null(),
        }
    }

    pub fn void_ret() -> Self {
        Stmt::Return {
            value: None,
            span: Span::null(),
        }
    }

    pub fn if_then(condition: Expr, then_body: Stmt) -> Self {
        Stmt::If {
            condition,
            then_body: Box::new(then_body),
            else_body: None,
            span: Span::null(),
        }
    }

    pub fn if_else(condition: Expr, then_body: Stmt, else_body: Stmt) -> Self {
        Stmt::If {
            condition,
            then_body: Box::new(then_body),
            else_body: Some(Box::new(else_body)),
            span: Span::null(),
        }
    }

    pub fn while_loop(condition: Expr, body: Stmt) -> Self {
        Stmt::While {
            condition,
            body: Box::new(body),
            span: Span::null(),
        }
    }

    pub fn expr(expression: Expr) -> Self {
        Stmt::Expression {
            expression,
            span: Span::null(),
        }
    }
}
