use crate::Span;

use super::{
    ast::{Expr, Stmt},
    types::TypeName,
};

/// `int a = 1` or `Point p`.
#[derive(Debug, Clone)]
pub struct DeclarationStmt {
    pub type_name: TypeName,
    pub name: String,
    pub value: Option<Expr>,
    pub span: Span,
}

/// `a = expr`; the target is always a plain name.
#[derive(Debug, Clone)]
pub struct AssignmentStmt {
    pub name: String,
    pub value: Expr,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct Parameter {
    pub type_name: TypeName,
    pub name: String,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct FunctionStmt {
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub give_type: Option<TypeName>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct IfStmt {
    pub condition: Expr,
    pub body: Vec<Stmt>,
    pub span: Span,
}

/// `give` with an optional value.
#[derive(Debug, Clone)]
pub struct GiveStmt {
    pub value: Option<Expr>,
    pub span: Span,
}

/// `import a.b.c`, stored segment by segment.
#[derive(Debug, Clone)]
pub struct ImportStmt {
    pub hierarchy: Vec<String>,
    pub span: Span,
}

impl ImportStmt {
    pub fn path(&self) -> String {
        self.hierarchy.join(".")
    }
}

/// `type Name ... ;`; the body holds fields, methods and any other statements run on construction.
#[derive(Debug, Clone)]
pub struct TypeDefinitionStmt {
    pub name: String,
    pub body: Vec<Stmt>,
    pub span: Span,
}

/// A call evaluated for its effect.
#[derive(Debug, Clone)]
pub struct ExpressionStmt {
    pub expression: Expr,
    pub span: Span,
}
