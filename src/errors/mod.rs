//! Error types and diagnostics for the interpreter.
//!
//! This module defines the errors produced by every phase:
//!
//! - Positioned front-end and analysis errors (`Error` / `ErrorImpl`)
//! - The coarse `ErrorKind` taxonomy shared by all diagnostics
//! - Runtime faults raised while executing a program
//! - The append-only `Diagnostics` sink with line/column resolution

pub mod diagnostics;
pub mod errors;

#[cfg(test)]
mod tests;
