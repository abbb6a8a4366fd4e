/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: Program, the closed statement/expression enums and member chains
/// - expressions: Definitions for the expression nodes
/// - statements: Definitions for the statement nodes
/// - types: Type names as written in source
pub mod ast;
pub mod expressions;
pub mod statements;
pub mod types;
