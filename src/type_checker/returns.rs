use crate::ast::statements::{BlockStmt, Stmt};

/// Whether every path through `block` ends in a value-returning `return`.
pub fn block_returns(block: &BlockStmt) -> bool {
    block.iter().any(stmt_returns)
}

pub fn stmt_returns(stmt: &Stmt) -> bool {
    match stmt {
        Stmt::Return { value, .. } => value.is_some(),
        Stmt::Block(block) => block_returns(block),
        // Without an else the condition may be false.
        Stmt::If {
            else_body: None, ..
        } => false,
        Stmt::If {
            then_body,
            else_body: Some(else_body),
            ..
        } => stmt_returns(then_body) && stmt_returns(else_body),
        Stmt::While { body, .. } => stmt_returns(body),
        Stmt::Empty { .. }
        | Stmt::VarDecl { .. }
        | Stmt::Assignment { .. }
        | Stmt::Increment { .. }
        | Stmt::Decrement { .. }
        | Stmt::Expression { .. } => false,
    }
}
