//! IR generation module for the middle end.
//!
//! This module lowers a type checked program into a flat list of
//! quadruples. It handles:
//!
//! - Allocation of temporaries and labels
//! - Lowering of statements and structured control flow into jumps
//! - Short-circuit evaluation of `&&` and `||`
//! - The catalogue of runtime functions generated code may call
//! - Structural verification of the generated instructions

pub mod compiler;
pub mod expr;
pub mod ir;
pub mod stdlib;
pub mod stmt;
pub mod verify;
