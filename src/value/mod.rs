//! Runtime values.
//!
//! A [`Value`](value::Value) is a tagged union over the built-in kinds,
//! user functions and classes, instances and namespaces. Operators are
//! checked against the same table the analyzer uses.

pub mod builtins;
pub mod value;
