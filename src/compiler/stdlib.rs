//! Runtime function catalogue.
//!
//! Generated code calls two kinds of external functions: the I/O built-ins
//! visible to programs, and `Concat`, which the generator inserts for string
//! `+`. A backend declares all of them before emitting user functions.

use lazy_static::lazy_static;

use crate::{ast::types::Type, type_checker::signatures::{FunctionSignature, BUILTINS}};

/// Name of the runtime helper joining two strings.
pub const CONCAT: &str = "Concat";

lazy_static! {
    static ref RUNTIME_HELPERS: Vec<FunctionSignature> = vec![FunctionSignature::new(
        CONCAT,
        Type::String,
        vec![(Type::String, "a"), (Type::String, "b")],
    )];
}

/// Whether `name` belongs to a helper the generator calls on its own.
/// Programs may not define functions with these names.
pub fn is_runtime_helper(name: &str) -> bool {
    RUNTIME_HELPERS.iter().any(|helper| helper.name == name)
}

/// Every external function generated code may call, built-ins first.
pub fn runtime_declarations() -> Vec<FunctionSignature> {
    BUILTINS
        .iter()
        .chain(RUNTIME_HELPERS.iter())
        .cloned()
        .collect()
}
