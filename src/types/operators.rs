use std::fmt::Display;

use super::types::{BuiltinKind, TypeRef};

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    And,
    Or,
    Greater,
    GreaterEquals,
    Less,
    LessEquals,
    EqualsEquals,
}

impl BinaryOperator {
    pub fn name(&self) -> &'static str {
        match self {
            BinaryOperator::Add => "add",
            BinaryOperator::Subtract => "subtract",
            BinaryOperator::Multiply => "multiply",
            BinaryOperator::Divide => "divide",
            BinaryOperator::And => "and",
            BinaryOperator::Or => "or",
            BinaryOperator::Greater => "greater",
            BinaryOperator::GreaterEquals => "greaterEquals",
            BinaryOperator::Less => "less",
            BinaryOperator::LessEquals => "lessEquals",
            BinaryOperator::EqualsEquals => "equalsEquals",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::And => "&&",
            BinaryOperator::Or => "||",
            BinaryOperator::Greater => ">",
            BinaryOperator::GreaterEquals => ">=",
            BinaryOperator::Less => "<",
            BinaryOperator::LessEquals => "<=",
            BinaryOperator::EqualsEquals => "==",
        }
    }
}

impl Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum UnaryOperator {
    Positive,
    Negative,
}

impl UnaryOperator {
    pub fn name(&self) -> &'static str {
        match self {
            UnaryOperator::Positive => "positive",
            UnaryOperator::Negative => "negative",
        }
    }
}

impl Display for UnaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnaryOperator::Positive => write!(f, "+"),
            UnaryOperator::Negative => write!(f, "-"),
        }
    }
}

fn rank(kind: BuiltinKind) -> u8 {
    match kind {
        BuiltinKind::Int => 0,
        BuiltinKind::Float => 1,
        _ => 2,
    }
}

/// The wider of two numeric kinds (`int < float < double`).
pub fn promote(left: BuiltinKind, right: BuiltinKind) -> BuiltinKind {
    if rank(left) >= rank(right) {
        left
    } else {
        right
    }
}

/// Result kind of `left op right`, or `None` when the combination is unsupported.
///
/// Both the analyzer and the interpreter consult this table, so a
/// combination accepted statically is always computable at runtime.
pub fn binary_result(
    left: BuiltinKind,
    operator: BinaryOperator,
    right: BuiltinKind,
) -> Option<BuiltinKind> {
    use BinaryOperator::*;
    use BuiltinKind::{Bool, Double, Float, Int};

    match (left, operator, right) {
        (Int, Divide, Int) => Some(Double),
        (Int | Float | Double, Add | Subtract | Multiply | Divide, Int | Float | Double) => {
            Some(promote(left, right))
        }
        (
            Int | Float | Double,
            Greater | GreaterEquals | Less | LessEquals | EqualsEquals,
            Int | Float | Double,
        ) => Some(Bool),
        (BuiltinKind::String, Add, BuiltinKind::String) => Some(BuiltinKind::String),
        (BuiltinKind::String, EqualsEquals, BuiltinKind::String) => Some(Bool),
        (Bool, And | Or | EqualsEquals, Bool) => Some(Bool),
        _ => None,
    }
}

pub fn unary_result(operator: UnaryOperator, operand: BuiltinKind) -> Option<BuiltinKind> {
    match (operator, operand) {
        (
            UnaryOperator::Positive | UnaryOperator::Negative,
            BuiltinKind::Int | BuiltinKind::Float | BuiltinKind::Double,
        ) => Some(operand),
        _ => None,
    }
}

pub fn binary_result_type(
    left: &TypeRef,
    operator: BinaryOperator,
    right: &TypeRef,
) -> Option<TypeRef> {
    binary_result(left.builtin_kind()?, operator, right.builtin_kind()?).map(TypeRef::Builtin)
}

pub fn unary_result_type(operator: UnaryOperator, operand: &TypeRef) -> Option<TypeRef> {
    unary_result(operator, operand.builtin_kind()?).map(TypeRef::Builtin)
}
