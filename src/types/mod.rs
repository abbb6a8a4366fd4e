//! Type descriptors and the operator table.
//!
//! `TypeRef` is the nominal type of an expression: either a built-in kind
//! or a user-defined class id. The operator table in `operators` is the
//! one place that decides which operand kinds an operator accepts and
//! what kind it produces.

pub mod operators;
pub mod types;

#[cfg(test)]
mod tests;
