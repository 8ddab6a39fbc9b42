use std::fmt::Display;

use thiserror::Error;

use crate::{ast::types::Type, Position};

#[derive(Debug, Clone)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    /// Builds a programming-error-class failure with no source position.
    pub fn internal(message: impl Into<String>) -> Self {
        Error::new(
            ErrorImpl::InternalError {
                message: message.into(),
            },
            Position::null(),
        )
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_kind(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn is_internal(&self) -> bool {
        matches!(self.internal_error, ErrorImpl::InternalError { .. })
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::DuplicateDeclaration { .. } => "DuplicateDeclaration",
            ErrorImpl::DuplicateFunction { .. } => "DuplicateFunction",
            ErrorImpl::RepeatedParameterName { .. } => "RepeatedParameterName",
            ErrorImpl::UndeclaredVariable { .. } => "UndeclaredVariable",
            ErrorImpl::UndefinedFunction { .. } => "UndefinedFunction",
            ErrorImpl::ArityMismatch { .. } => "ArityMismatch",
            ErrorImpl::ArgumentTypeMismatch { .. } => "ArgumentTypeMismatch",
            ErrorImpl::TypeMismatch { .. } => "TypeMismatch",
            ErrorImpl::InvalidOperation { .. } => "InvalidOperation",
            ErrorImpl::ReturnOutsideFunction => "ReturnOutsideFunction",
            ErrorImpl::ReturnTypeMismatch { .. } => "ReturnTypeMismatch",
            ErrorImpl::UnreachableCode => "UnreachableCode",
            ErrorImpl::MissingReturn { .. } => "MissingReturn",
            ErrorImpl::MissingMain => "MissingMain",
            ErrorImpl::InvalidMainSignature { .. } => "InvalidMainSignature",
            ErrorImpl::UnsupportedConstruct { .. } => "UnsupportedConstruct",
            ErrorImpl::InternalError { .. } => "InternalError",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::DuplicateDeclaration { variable } => ErrorTip::Suggestion(format!(
                "Variable `{}` is already declared in this block",
                variable
            )),
            ErrorImpl::DuplicateFunction { function } => {
                ErrorTip::Suggestion(format!("Function `{}` is already defined", function))
            }
            ErrorImpl::RepeatedParameterName {
                function,
                parameter,
            } => ErrorTip::Suggestion(format!(
                "Parameter `{}` appears more than once in `{}`",
                parameter, function
            )),
            ErrorImpl::UndeclaredVariable { variable } => {
                ErrorTip::Suggestion(format!("Variable `{}` is not declared", variable))
            }
            ErrorImpl::UndefinedFunction { function } => {
                ErrorTip::Suggestion(format!("Function `{}` is not defined", function))
            }
            ErrorImpl::ArityMismatch {
                function,
                expected,
                received,
            } => ErrorTip::Suggestion(format!(
                "`{}` expects {} argument(s), received {}",
                function, expected, received
            )),
            ErrorImpl::ArgumentTypeMismatch {
                function,
                index,
                expected,
                received,
            } => ErrorTip::Suggestion(format!(
                "Argument {} of `{}` should be `{}`, received `{}`",
                index + 1,
                function,
                expected,
                received
            )),
            ErrorImpl::TypeMismatch { expected, received } => ErrorTip::Suggestion(format!(
                "Expected type `{}`, received `{}`",
                expected, received
            )),
            ErrorImpl::InvalidOperation { operator, operand } => ErrorTip::Suggestion(format!(
                "Operator `{}` cannot be applied to `{}`",
                operator, operand
            )),
            ErrorImpl::ReturnOutsideFunction => ErrorTip::None,
            ErrorImpl::ReturnTypeMismatch {
                function,
                expected,
                received,
            } => ErrorTip::Suggestion(format!(
                "`{}` returns `{}`, but this returns `{}`",
                function, expected, received
            )),
            ErrorImpl::UnreachableCode => ErrorTip::Suggestion(String::from(
                "This statement follows a return on every path",
            )),
            ErrorImpl::MissingReturn { function } => ErrorTip::Suggestion(format!(
                "`{}` may finish without returning a value",
                function
            )),
            ErrorImpl::MissingMain => {
                ErrorTip::Suggestion(String::from("Define `int main()` as the entry point"))
            }
            ErrorImpl::InvalidMainSignature { .. } => {
                ErrorTip::Suggestion(String::from("`main` must be declared as `int main()`"))
            }
            ErrorImpl::UnsupportedConstruct { construct } => {
                ErrorTip::Suggestion(format!("`{}` is not supported here", construct))
            }
            ErrorImpl::InternalError { .. } => ErrorTip::None,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.internal_error)
    }
}

impl std::error::Error for Error {}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    #[error("variable {variable:?} already declared in this scope")]
    DuplicateDeclaration { variable: String },
    #[error("function {function:?} already defined")]
    DuplicateFunction { function: String },
    #[error("repeated parameter {parameter:?} in function {function:?}")]
    RepeatedParameterName { function: String, parameter: String },
    #[error("variable {variable:?} not declared")]
    UndeclaredVariable { variable: String },
    #[error("function {function:?} not defined")]
    UndefinedFunction { function: String },
    #[error("{function:?} expects {expected} argument(s), received {received}")]
    ArityMismatch {
        function: String,
        expected: usize,
        received: usize,
    },
    #[error("argument {index} of {function:?} has type {received}, expected {expected}")]
    ArgumentTypeMismatch {
        function: String,
        index: usize,
        expected: Type,
        received: Type,
    },
    #[error("types do not match: expected {expected}, received {received}")]
    TypeMismatch { expected: Type, received: Type },
    #[error("operator {operator:?} cannot be applied to {operand}")]
    InvalidOperation { operator: String, operand: Type },
    #[error("return statement outside of a function")]
    ReturnOutsideFunction,
    #[error("{function:?} must return {expected}, found {received}")]
    ReturnTypeMismatch {
        function: String,
        expected: Type,
        received: Type,
    },
    #[error("unreachable code after return")]
    UnreachableCode,
    #[error("function {function:?} does not return on every path")]
    MissingReturn { function: String },
    #[error("function \"main\" is missing")]
    MissingMain,
    #[error("\"main\" must return int and take no parameters, found {return_type} with {parameters} parameter(s)")]
    InvalidMainSignature { return_type: Type, parameters: usize },
    #[error("unsupported construct: {construct}")]
    UnsupportedConstruct { construct: String },
    #[error("internal error: {message}")]
    InternalError { message: String },
}
