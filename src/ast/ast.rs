use std::rc::Rc;

use crate::Span;

use super::{
    expressions::{BinaryExpr, CallExpr, LiteralExpr, UnaryExpr, VariableExpr},
    statements::{
        AssignmentStmt, DeclarationStmt, ExpressionStmt, FunctionStmt, GiveStmt, IfStmt,
        ImportStmt, TypeDefinitionStmt,
    },
};

/// Identifies an expression node within one parsed program.
pub type NodeId = usize;

/// Root of a parsed source unit.
#[derive(Debug, Clone)]
pub struct Program {
    /// File name of the source unit, used as the root record name.
    pub name: String,
    pub statements: Vec<Stmt>,
    pub span: Span,
}

/// Statement nodes.
///
/// The set is closed: the analyzer and the interpreter both match on it
/// exhaustively. Functions and type definitions are reference counted
/// because runtime function and class values keep their declaration.
#[derive(Debug, Clone)]
pub enum Stmt {
    Declaration(DeclarationStmt),
    Assignment(AssignmentStmt),
    Function(Rc<FunctionStmt>),
    If(IfStmt),
    Give(GiveStmt),
    Import(ImportStmt),
    TypeDefinition(Rc<TypeDefinitionStmt>),
    Expression(ExpressionStmt),
}

impl Stmt {
    pub fn get_span(&self) -> &Span {
        match self {
            Stmt::Declaration(stmt) => &stmt.span,
            Stmt::Assignment(stmt) => &stmt.span,
            Stmt::Function(stmt) => &stmt.span,
            Stmt::If(stmt) => &stmt.span,
            Stmt::Give(stmt) => &stmt.span,
            Stmt::Import(stmt) => &stmt.span,
            Stmt::TypeDefinition(stmt) => &stmt.span,
            Stmt::Expression(stmt) => &stmt.span,
        }
    }
}

/// Expression nodes.
#[derive(Debug, Clone)]
pub enum Expr {
    Literal(LiteralExpr),
    Binary(BinaryExpr),
    Unary(UnaryExpr),
    Variable(VariableExpr),
    Call(CallExpr),
}

impl Expr {
    pub fn get_span(&self) -> &Span {
        match self {
            Expr::Literal(expr) => &expr.span,
            Expr::Binary(expr) => &expr.span,
            Expr::Unary(expr) => &expr.span,
            Expr::Variable(expr) => &expr.span,
            Expr::Call(expr) => &expr.span,
        }
    }

    pub fn id(&self) -> NodeId {
        match self {
            Expr::Literal(expr) => expr.id,
            Expr::Binary(expr) => expr.id,
            Expr::Unary(expr) => expr.id,
            Expr::Variable(expr) => expr.id,
            Expr::Call(expr) => expr.id,
        }
    }

    /// The slot holding the next segment of a dotted chain, for nodes that can start one.
    pub fn child_slot(&mut self) -> Option<&mut Option<Box<Reference>>> {
        match self {
            Expr::Literal(expr) => Some(&mut expr.child),
            Expr::Variable(expr) => Some(&mut expr.child),
            Expr::Call(expr) => Some(&mut expr.child),
            Expr::Binary(_) | Expr::Unary(_) => None,
        }
    }
}

/// A segment after a `.` in a member chain.
#[derive(Debug, Clone)]
pub enum Reference {
    Variable(VariableExpr),
    Call(CallExpr),
}

impl Reference {
    pub fn id(&self) -> NodeId {
        match self {
            Reference::Variable(expr) => expr.id,
            Reference::Call(expr) => expr.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Reference::Variable(expr) => &expr.name,
            Reference::Call(expr) => &expr.name,
        }
    }

    pub fn get_span(&self) -> &Span {
        match self {
            Reference::Variable(expr) => &expr.span,
            Reference::Call(expr) => &expr.span,
        }
    }

    pub fn child_slot(&mut self) -> &mut Option<Box<Reference>> {
        match self {
            Reference::Variable(expr) => &mut expr.child,
            Reference::Call(expr) => &mut expr.child,
        }
    }
}

/// Appends `reference` after the last segment of the chain starting at `slot`.
pub fn append_reference(slot: &mut Option<Box<Reference>>, reference: Reference) {
    match slot {
        Some(next) => append_reference(next.child_slot(), reference),
        None => *slot = Some(Box::new(reference)),
    }
}
