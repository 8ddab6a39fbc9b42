use log::{debug, info};

use crate::{
    ast::{
        ast::{FnDecl, Program},
        expressions::Expr,
        statements::{BlockStmt, Stmt},
        types::Type,
    },
    errors::errors::{Error, ErrorImpl},
    CompileOptions, Position, MK_ERROR,
};

use super::{
    expr::TypeEvaluator,
    returns::block_returns,
    scope::{check_identifier, ScopeStack},
    signatures::{build_function_table, FunctionSignature, FunctionTable},
};

/// Statement-level checker for function bodies.
#[derive(Debug)]
pub struct TypeChecker<'a> {
    pub functions: &'a FunctionTable,
    pub scopes: ScopeStack<Type>,
    pub current_function: Option<&'a FunctionSignature>,
    /// False once a `return` ends the current straight-line path.
    pub code_reachable: bool,
}

impl<'a> TypeChecker<'a> {
    pub fn new(functions: &'a FunctionTable) -> Self {
        TypeChecker {
            functions,
            scopes: ScopeStack::new(),
            current_function: None,
            code_reachable: true,
        }
    }

    fn evaluator(&self) -> TypeEvaluator<'_> {
        TypeEvaluator::new(self.functions, &self.scopes)
    }

    pub fn infer(&self, expr: &Expr) -> Result<Type, Error> {
        self.evaluator().infer(expr)
    }

    pub fn check_function(&mut self, function: &FnDecl) -> Result<(), Error> {
        let Some(signature) = self.functions.get(&function.identifier) else {
            return Err(Error::internal(format!(
                "function `{}` missing from the signature table",
                function.identifier
            )));
        };
        debug!("checking function `{}`", function.identifier);

        self.current_function = Some(signature);
        self.code_reachable = true;

        // Parameters live one frame outside the body, so the body may shadow them.
        self.scopes.enter();
        for param in &function.parameters {
            self.scopes
                .declare(&param.identifier, param.param_type, &param.span)?;
        }
        self.check_block(&function.body)?;
        self.scopes.exit()?;

        if !function.return_type.is_void() && !block_returns(&function.body) {
            return MK_ERROR!(
                ErrorImpl::MissingReturn {
                    function: function.identifier.clone(),
                },
                function.span
            );
        }

        self.current_function = None;
        Ok(())
    }

    pub fn check_block(&mut self, block: &BlockStmt) -> Result<(), Error> {
        self.scopes.enter();

        for stmt in block.iter() {
            if !self.code_reachable {
                return MK_ERROR!(ErrorImpl::UnreachableCode, stmt.get_span());
            }
            self.check_stmt(stmt)?;
        }

        self.scopes.exit()
    }

    /// Branch and loop bodies get exactly one frame of their own.
    fn check_body(&mut self, body: &Stmt) -> Result<(), Error> {
        match body {
            Stmt::Block(block) => self.check_block(block),
            _ => {
                self.scopes.enter();
                self.check_stmt(body)?;
                self.scopes.exit()
            }
        }
    }

    fn expect_condition(&self, condition: &Expr) -> Result<(), Error> {
        let condition_type = self.infer(condition)?;
        if condition_type != Type::Boolean {
            return MK_ERROR!(
                ErrorImpl::TypeMismatch {
                    expected: Type::Boolean,
                    received: condition_type,
                },
                condition.get_span()
            );
        }
        Ok(())
    }

    pub fn check_stmt(&mut self, stmt: &Stmt) -> Result<(), Error> {
        match stmt {
            Stmt::Empty { .. } => Ok(()),
            Stmt::Block(block) => self.check_block(block),
            Stmt::VarDecl {
                var_type,
                items,
                span,
            } => {
                if var_type.is_void() {
                    return MK_ERROR!(
                        ErrorImpl::UnsupportedConstruct {
                            construct: String::from("void variable"),
                        },
                        span
                    );
                }

                for item in items {
                    check_identifier(&item.identifier, &item.span)?;

                    if let Some(value) = &item.assigned_value {
                        let value_type = self.infer(value)?;
                        if value_type != *var_type {
                            return MK_ERROR!(
                                ErrorImpl::TypeMismatch {
                                    expected: *var_type,
                                    received: value_type,
                                },
                                value.get_span()
                            );
                        }
                    }

                    self.scopes.declare(&item.identifier, *var_type, &item.span)?;
                }

                Ok(())
            }
            Stmt::Assignment {
                identifier,
                value,
                span,
            } => {
                let target_type = *self.scopes.lookup(identifier, span)?;
                let value_type = self.infer(value)?;

                if target_type != value_type {
                    return MK_ERROR!(
                        ErrorImpl::TypeMismatch {
                            expected: target_type,
                            received: value_type,
                        },
                        value.get_span()
                    );
                }

                Ok(())
            }
            Stmt::Increment { identifier, span } | Stmt::Decrement { identifier, span } => {
                let target_type = *self.scopes.lookup(identifier, span)?;

                if target_type != Type::Int {
                    let operator = match stmt {
                        Stmt::Increment { .. } => "++",
                        _ => "--",
                    };
                    return MK_ERROR!(
                        ErrorImpl::InvalidOperation {
                            operator: operator.to_string(),
                            operand: target_type,
                        },
                        span
                    );
                }

                Ok(())
            }
            Stmt::Return { value, span } => {
                let Some(function) = self.current_function else {
                    return MK_ERROR!(ErrorImpl::ReturnOutsideFunction, span);
                };

                if !self.code_reachable {
                    return MK_ERROR!(ErrorImpl::UnreachableCode, span);
                }

                let returned = match value {
                    Some(value) => self.infer(value)?,
                    None => Type::Void,
                };

                if returned != function.return_type {
                    return MK_ERROR!(
                        ErrorImpl::ReturnTypeMismatch {
                            function: function.name.clone(),
                            expected: function.return_type,
                            received: returned,
                        },
                        span
                    );
                }

                self.code_reachable = false;
                Ok(())
            }
            Stmt::If {
                condition,
                then_body,
                else_body,
                ..
            } => {
                self.expect_condition(condition)?;

                let previous_reachable = self.code_reachable;
                self.check_body(then_body)?;
                let then_reachable = self.code_reachable;
                self.code_reachable = previous_reachable;

                match else_body {
                    Some(else_body) => {
                        self.check_body(else_body)?;
                        let else_reachable = self.code_reachable;
                        self.code_reachable = then_reachable || else_reachable;
                    }
                    None => {
                        self.code_reachable = previous_reachable || then_reachable;
                    }
                }

                Ok(())
            }
            Stmt::While {
                condition, body, ..
            } => {
                self.expect_condition(condition)?;

                let previous_reachable = self.code_reachable;
                self.check_body(body)?;
                self.code_reachable = previous_reachable;

                Ok(())
            }
            Stmt::Expression { expression, .. } => {
                self.infer(expression)?;
                Ok(())
            }
        }
    }
}

/// Requires `int main()` among the user functions.
fn check_main(program: &Program) -> Result<(), Error> {
    let Some(main) = program.iter().find(|function| function.identifier == "main") else {
        return Err(Error::new(ErrorImpl::MissingMain, Position::null()));
    };

    if main.return_type != Type::Int || !main.parameters.is_empty() {
        return MK_ERROR!(
            ErrorImpl::InvalidMainSignature {
                return_type: main.return_type,
                parameters: main.parameters.len(),
            },
            main.span
        );
    }

    Ok(())
}

/// Runs the semantic analysis over a whole program.
///
/// Signatures are collected first, then every body is checked in
/// declaration order, and finally the `main` entry point is validated.
/// The first error found aborts the analysis.
pub fn type_check(program: &Program, options: &CompileOptions) -> Result<FunctionTable, Error> {
    let functions = build_function_table(program)?;
    info!(
        "collected {} signature(s), {} user defined",
        functions.len(),
        functions.user_functions().count()
    );

    {
        let mut checker = TypeChecker::new(&functions);
        for function in program.iter() {
            checker.check_function(function)?;
        }
    }

    if options.require_main {
        check_main(program)?;
    }

    Ok(functions)
}
