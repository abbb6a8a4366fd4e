use crate::{
    types::operators::{BinaryOperator, UnaryOperator},
    Span,
};

use super::ast::{Expr, NodeId, Reference};

#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Int(i32),
    Float(f32),
    Double(f64),
    Bool(bool),
    String(String),
}

/// Literal Expression
/// A constant, optionally followed by a member chain (`"abc".length()`).
#[derive(Debug, Clone)]
pub struct LiteralExpr {
    pub id: NodeId,
    pub value: LiteralValue,
    pub child: Option<Box<Reference>>,
    pub span: Span,
}

/// Binary Expression
#[derive(Debug, Clone)]
pub struct BinaryExpr {
    pub id: NodeId,
    pub left: Box<Expr>,
    pub operator: BinaryOperator,
    pub right: Box<Expr>,
    pub span: Span,
}

/// Unary Expression
/// `+x` or `-x`.
#[derive(Debug, Clone)]
pub struct UnaryExpr {
    pub id: NodeId,
    pub operator: UnaryOperator,
    pub operand: Box<Expr>,
    pub span: Span,
}

/// Variable Reference
/// A name, optionally followed by a member chain (`lib.pkg.value`).
#[derive(Debug, Clone)]
pub struct VariableExpr {
    pub id: NodeId,
    pub name: String,
    pub child: Option<Box<Reference>>,
    pub span: Span,
}

/// Function Call
/// `name(args...)`, optionally followed by a member chain.
#[derive(Debug, Clone)]
pub struct CallExpr {
    pub id: NodeId,
    pub name: String,
    pub arguments: Vec<Expr>,
    pub child: Option<Box<Reference>>,
    pub span: Span,
}
