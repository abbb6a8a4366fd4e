//! Semantic analysis: scopes, symbols and static type checking.
//!
//! The analyzer walks a parsed program once, building nested
//! [`SymbolTable`](symbol_table::SymbolTable)s, resolving every name and
//! computing the type of every expression. Errors are collected in a
//! `Diagnostics` sink and analysis carries on after each one.

pub mod analyzer;
pub mod expr;
pub mod stmt;
pub mod symbol_table;
pub mod symbols;

#[cfg(test)]
mod tests;
