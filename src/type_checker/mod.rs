//! Type checking and semantic analysis module.
//!
//! This module validates a program before any code is generated:
//!
//! - Collecting function signatures (built-ins first, then user functions)
//! - Resolving variables through a stack of lexical scopes
//! - Inferring expression types and checking statements against them
//! - Checking call sites for arity and argument types
//! - Tracking reachability and verifying that non-void functions return
//!   on every path
//!
//! The checker owns its scope stack; the IR generator builds its own.

pub mod expr;
pub mod returns;
pub mod scope;
pub mod signatures;
pub mod type_checker;
