/// AST (Abstract Syntax Tree) module
/// Contains the tree handed to the middle end by the parser
///
/// Submodules:
/// - ast: Program, function and parameter definitions
/// - expressions: Expression nodes, operators and literals
/// - statements: Statement nodes and declaration items
/// - types: The language's types
pub mod ast;
pub mod expressions;
pub mod statements;
pub mod types;
