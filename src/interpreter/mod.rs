//! Tree-walking execution of analyzed programs.
//!
//! The interpreter mirrors the analyzer's traversal but works on values:
//!
//! - `activation_record`: the runtime scope of a call, with copy-on-read parents
//! - `call_stack`: the records of the calls in progress
//! - `console`: where the standard `io` library reads and writes
//! - `stmt` / `expr`: statement execution and expression evaluation
//!
//! Programs reaching the interpreter have passed analysis, so a broken
//! invariant is reported as `RuntimeError::Internal`.

pub mod activation_record;
pub mod call_stack;
pub mod console;
pub mod expr;
pub mod interpreter;
pub mod stmt;
