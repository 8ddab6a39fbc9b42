use std::fmt::Display;

use crate::Span;

use super::types::Type;

/// A literal value, as written in the source or synthesized as a default.
///
/// String literals hold their text without the surrounding quotes.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i32),
    Bool(bool),
    Str(String),
}

impl Literal {
    pub fn get_type(&self) -> Type {
        match self {
            Literal::Int(_) => Type::Int,
            Literal::Bool(_) => Type::Boolean,
            Literal::Str(_) => Type::String,
        }
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Literal::Int(value) => write!(f, "{}", value),
            Literal::Bool(value) => write!(f, "{}", value),
            Literal::Str(value) => write!(f, "\"{}\"", value),
        }
    }
}

/// Integer arithmetic, plus `+` on strings (concatenation).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl Display for ArithOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let symbol = match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
            ArithOp::Div => "/",
            ArithOp::Mod => "%",
        };
        write!(f, "{}", symbol)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelOp {
    Less,
    LessEq,
    Greater,
    GreaterEq,
    Eq,
    NotEq,
}

impl Display for RelOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let symbol = match self {
            RelOp::Less => "<",
            RelOp::LessEq => "<=",
            RelOp::Greater => ">",
            RelOp::GreaterEq => ">=",
            RelOp::Eq => "==",
            RelOp::NotEq => "!=",
        };
        write!(f, "{}", symbol)
    }
}

/// Short-circuiting boolean operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolOp {
    And,
    Or,
}

impl Display for BoolOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BoolOp::And => write!(f, "&&"),
            BoolOp::Or => write!(f, "||"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Neg,
}

impl Display for UnaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnaryOp::Not => write!(f, "!"),
            UnaryOp::Neg => write!(f, "-"),
        }
    }
}

/// Expression nodes.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal {
        value: Literal,
        span: Span,
    },
    Symbol {
        name: String,
        span: Span,
    },
    Binary {
        operator: ArithOp,
        left: Box<Expr>,
        right: Box<Expr>,
        span: Span,
    },
    Relational {
        operator: RelOp,
        left: Box<Expr>,
        right: Box<Expr>,
        span: Span,
    },
    Logical {
        operator: BoolOp,
        left: Box<Expr>,
        right: Box<Expr>,
        span: Span,
    },
    Prefix {
        operator: UnaryOp,
        right_expr: Box<Expr>,
        span: Span,
    },
    Paren {
        inner: Box<Expr>,
        span: Span,
    },
    Call {
        callee: String,
        arguments: Vec<Expr>,
        span: Span,
    },
}

impl Expr {
    pub fn get_span(&self) -> &Span {
        match self {
            Expr::Literal { span, .. }
            | Expr::Symbol { span, .. }
            | Expr::Binary { span, .. }
            | Expr::Relational { span, .. }
            | Expr::Logical { span, .. }
            | Expr::Prefix { span, .. }
            | Expr::Paren { span, .. }
            | Expr::Call { span, .. } => span,
        }
    }

    /// Strips any number of enclosing parentheses.
    pub fn unparenthesized(&self) -> &Expr {
        match self {
            Expr::Paren { inner, .. } => inner.unparenthesized(),
            _ => self,
        }
    }

    pub fn boxed(self) -> Box<Self> {
        Box::new(self)
    }

    // Constructors for synthesized nodes. They carry a null span.

    pub fn int(value: i32) -> Self {
        Expr::Literal {
            value: Literal::Int(value),
            span: Span::null(),
        }
    }

    pub fn boolean(value: bool) -> Self {
        Expr::Literal {
            value: Literal::Bool(value),
            span: Span::null(),
        }
    }

    pub fn string(value: &str) -> Self {
        Expr::Literal {
            value: Literal::Str(value.to_string()),
            span: Span::null(),
        }
    }

    pub fn var(name: &str) -> Self {
        Expr::Symbol {
            name: name.to_string(),
            span: Span::null(),
        }
    }

    pub fn binary(operator: ArithOp, left: Expr, right: Expr) -> Self {
        Expr::Binary {
            operator,
            left: left.boxed(),
            right: right.boxed(),
            span: Span::null(),
        }
    }

    pub fn relational(operator: RelOp, left: Expr, right: Expr) -> Self {
        Expr::Relational {
            operator,
            left: left.boxed(),
            right: right.boxed(),
            span: Span::null(),
        }
    }

    pub fn and(left: Expr, right: Expr) -> Self {
        Expr::Logical {
            operator: BoolOp::And,
            left: left.boxed(),
            right: right.boxed(),
            span: Span::null(),
        }
    }

    pub fn or(left: Expr, right: Expr) -> Self {
        Expr::Logical {
            operator: BoolOp::Or,
            left: left.boxed(),
            right: right.boxed(),
            span: Span::null(),
        }
    }

    pub fn not(right_expr: Expr) -> Self {
        Expr::Prefix {
            operator: UnaryOp::Not,
            right_expr: right_expr.boxed(),
            span: Span::null(),
        }
    }

    pub fn neg(right_expr: Expr) -> Self {
        Expr::Prefix {
            operator: UnaryOp::Neg,
            right_expr: right_expr.boxed(),
            span: Span::null(),
        }
    }

    pub fn paren(inner: Expr) -> Self {
        Expr::Paren {
            inner: inner.boxed(),
            span: Span::null(),
        }
    }

    pub fn call(callee: &str, arguments: Vec<Expr>) -> Self {
        Expr::Call {
            callee: callee.to_string(),
            arguments,
            span: Span::null(),
        }
    }

    pub fn with_span(mut self, new_span: Span) -> Self {
        match &mut self {
            Expr::Literal { span, .. }
            | Expr::Symbol { span, .. }
            | Expr::Binary { span, .. }
            | Expr::Relational { span, .. }
            | Expr::Logical { span, .. }
            | Expr::Prefix { span, .. }
            | Expr::Paren { span, .. }
            | Expr::Call { span, .. } => *span = new_span,
        }
        self
    }
}
