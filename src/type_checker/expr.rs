use crate::{
    ast::{
        expressions::{ArithOp, Expr, UnaryOp},
        types::Type,
    },
    errors::errors::{Error, ErrorImpl},
    MK_ERROR,
};

use super::{scope::ScopeStack, signatures::FunctionTable};

/// Infers expression types against a signature table and the current scopes.
///
/// Inference never mutates either, so asking twice gives the same answer.
pub struct TypeEvaluator<'a> {
    pub functions: &'a FunctionTable,
    pub scopes: &'a ScopeStack<Type>,
}

impl<'a> TypeEvaluator<'a> {
    pub fn new(functions: &'a FunctionTable, scopes: &'a ScopeStack<Type>) -> Self {
        TypeEvaluator { functions, scopes }
    }

    pub fn infer(&self, expr: &Expr) -> Result<Type, Error> {
        match expr {
            Expr::Literal { value, .. } => Ok(value.get_type()),
            Expr::Symbol { name, span } => self.scopes.lookup(name, span).copied(),
            Expr::Paren { inner, .. } => self.infer(inner),
            Expr::Binary {
                operator,
                left,
                right,
                span,
            } => {
                let left_type = self.infer(left)?;
                let right_type = self.infer(right)?;

                match (operator, left_type, right_type) {
                    (_, Type::Int, Type::Int) => Ok(Type::Int),
                    (ArithOp::Add, Type::String, Type::String) => Ok(Type::String),
                    (ArithOp::Add, Type::String, _) => MK_ERROR!(
                        ErrorImpl::TypeMismatch {
                            expected: Type::String,
                            received: right_type,
                        },
                        span
                    ),
                    (_, Type::Int, _) => MK_ERROR!(
                        ErrorImpl::TypeMismatch {
                            expected: Type::Int,
                            received: right_type,
                        },
                        span
                    ),
                    _ => MK_ERROR!(
                        ErrorImpl::TypeMismatch {
                            expected: Type::Int,
                            received: left_type,
                        },
                        span
                    ),
                }
            }
            Expr::Relational {
                operator,
                left,
                right,
                span,
            } => {
                let left_type = self.infer(left)?;
                let right_type = self.infer(right)?;

                if left_type.is_void() {
                    return MK_ERROR!(
                        ErrorImpl::InvalidOperation {
                            operator: operator.to_string(),
                            operand: left_type,
                        },
                        span
                    );
                }

                if left_type != right_type {
                    return MK_ERROR!(
                        ErrorImpl::TypeMismatch {
                            expected: left_type,
                            received: right_type,
                        },
                        span
                    );
                }

                Ok(Type::Boolean)
            }
            Expr::Logical { left, right, .. } => {
                for operand in [left, right] {
                    let operand_type = self.infer(operand)?;
                    if operand_type != Type::Boolean {
                        return MK_ERROR!(
                            ErrorImpl::TypeMismatch {
                                expected: Type::Boolean,
                                received: operand_type,
                            },
                            operand.get_span()
                        );
                    }
                }

                Ok(Type::Boolean)
            }
            Expr::Prefix {
                operator,
                right_expr,
                span,
            } => {
                let operand_type = self.infer(right_expr)?;
                let expected = match operator {
                    UnaryOp::Not => Type::Boolean,
                    UnaryOp::Neg => Type::Int,
                };

                if operand_type != expected {
                    return MK_ERROR!(
                        ErrorImpl::InvalidOperation {
                            operator: operator.to_string(),
                            operand: operand_type,
                        },
                        span
                    );
                }

                Ok(expected)
            }
            Expr::Call {
                callee,
                arguments,
                span,
            } => {
                let Some(signature) = self.functions.get(callee) else {
                    return MK_ERROR!(
                        ErrorImpl::UndefinedFunction {
                            function: callee.clone(),
                        },
                        span
                    );
                };

                if arguments.len() != signature.params.len() {
                    return MK_ERROR!(
                        ErrorImpl::ArityMismatch {
                            function: callee.clone(),
                            expected: signature.params.len(),
                            received: arguments.len(),
                        },
                        span
                    );
                }

                for (index, (argument, (param_type, _))) in
                    arguments.iter().zip(signature.params.iter()).enumerate()
                {
                    let argument_type = self.infer(argument)?;
                    if argument_type != *param_type {
                        return MK_ERROR!(
                            ErrorImpl::ArgumentTypeMismatch {
                                function: callee.clone(),
                                index,
                                expected: *param_type,
                                received: argument_type,
                            },
                            argument.get_span()
                        );
                    }
                }

                Ok(signature.return_type)
            }
        }
    }
}
