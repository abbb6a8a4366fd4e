//! Type annotations as written in source.
//!
//! A `TypeName` is only a name and a span; the analyzer resolves it to a
//! built-in kind or a class in scope.

use crate::{types::types::BuiltinKind, Span};

#[derive(Debug, Clone)]
pub struct TypeName {
    pub name: String,
    pub span: Span,
}

impl TypeName {
    pub fn builtin(&self) -> Option<BuiltinKind> {
        BuiltinKind::from_name(&self.name)
    }
}
