//! Lexical analysis for Boink source.
//!
//! Converts source text into a stream of tokens using an ordered table of
//! anchored regex patterns. It handles:
//!
//! - Keywords, identifiers, and int/float/double/string literals
//! - Operators and punctuation
//! - Significant newlines, which separate statements
//! - `#` line comments and `#> ... <#` block comments

pub mod lexer;
pub mod tokens;

#[cfg(test)]
mod tests;
