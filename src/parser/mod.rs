//! Parser module for building an Abstract Syntax Tree (AST).
//!
//! This module contains the parser that transforms a stream of tokens
//! into an Abstract Syntax Tree. It uses a Pratt parser for expressions
//! with operator precedence and handles:
//!
//! - Statement parsing (declarations, assignments, functions, `if`, `give`, imports, types)
//! - Expression parsing (binary and unary ops, calls, member chains, literals)
//! - Type names for declarations and signatures
//!
//! Statements are separated by newlines and blocks are closed with `;`.
//! The first syntax error aborts parsing.

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;
pub mod types;

#[cfg(test)]
mod tests;
