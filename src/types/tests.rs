//! Unit tests for type descriptors and operator result kinds.

use std::rc::Rc;

use super::{
    operators::{binary_result, binary_result_type, unary_result, BinaryOperator, UnaryOperator},
    types::{BuiltinKind, ClassId, TypeRef},
};
use crate::semantic::symbol_table::SymbolTable;

use BuiltinKind::{Bool, Double, Float, Int};

#[test]
fn test_arithmetic_promotion() {
    for operator in [BinaryOperator::Add, BinaryOperator::Subtract, BinaryOperator::Multiply] {
        assert_eq!(binary_result(Int, operator, Int), Some(Int));
        assert_eq!(binary_result(Int, operator, Float), Some(Float));
        assert_eq!(binary_result(Float, operator, Int), Some(Float));
        assert_eq!(binary_result(Int, operator, Double), Some(Double));
        assert_eq!(binary_result(Double, operator, Int), Some(Double));
        assert_eq!(binary_result(Float, operator, Double), Some(Double));
        assert_eq!(binary_result(Double, operator, Float), Some(Double));
        assert_eq!(binary_result(Float, operator, Float), Some(Float));
    }
}

#[test]
fn test_division_widens_integers() {
    assert_eq!(binary_result(Int, BinaryOperator::Divide, Int), Some(Double));
    assert_eq!(binary_result(Int, BinaryOperator::Divide, Float), Some(Float));
    assert_eq!(binary_result(Float, BinaryOperator::Divide, Int), Some(Float));
    assert_eq!(binary_result(Float, BinaryOperator::Divide, Double), Some(Double));
    assert_eq!(binary_result(Double, BinaryOperator::Divide, Int), Some(Double));
}

#[test]
fn test_comparisons_yield_bool() {
    let comparisons = [
        BinaryOperator::Greater,
        BinaryOperator::GreaterEquals,
        BinaryOperator::Less,
        BinaryOperator::LessEquals,
        BinaryOperator::EqualsEquals,
    ];

    for operator in comparisons {
        for left in [Int, Float, Double] {
            for right in [Int, Float, Double] {
                assert_eq!(binary_result(left, operator, right), Some(Bool));
            }
        }
    }
}

#[test]
fn test_string_only_concatenates_with_string() {
    assert_eq!(
        binary_result(BuiltinKind::String, BinaryOperator::Add, BuiltinKind::String),
        Some(BuiltinKind::String)
    );
    assert_eq!(binary_result(BuiltinKind::String, BinaryOperator::Add, Int), None);
    assert_eq!(binary_result(Int, BinaryOperator::Add, BuiltinKind::String), None);
    assert_eq!(binary_result(BuiltinKind::String, BinaryOperator::Subtract, BuiltinKind::String), None);
}

#[test]
fn test_bool_operators() {
    assert_eq!(binary_result(Bool, BinaryOperator::And, Bool), Some(Bool));
    assert_eq!(binary_result(Bool, BinaryOperator::Or, Bool), Some(Bool));
    assert_eq!(binary_result(Bool, BinaryOperator::EqualsEquals, Bool), Some(Bool));
    assert_eq!(binary_result(Bool, BinaryOperator::Add, Bool), None);
    assert_eq!(binary_result(Bool, BinaryOperator::And, Int), None);
    assert_eq!(binary_result(Int, BinaryOperator::And, Int), None);
}

#[test]
fn test_unary_operators() {
    assert_eq!(unary_result(UnaryOperator::Negative, Int), Some(Int));
    assert_eq!(unary_result(UnaryOperator::Positive, Double), Some(Double));
    assert_eq!(unary_result(UnaryOperator::Negative, Bool), None);
    assert_eq!(unary_result(UnaryOperator::Negative, BuiltinKind::String), None);
}

#[test]
fn test_class_identity_is_nominal() {
    let scope = Rc::new(SymbolTable::new("Point", None, None));
    let first = ClassId::new("Point", &scope);
    let second = ClassId::new("Point", &scope);

    assert_eq!(TypeRef::UserDefined(first.clone()), TypeRef::UserDefined(first.clone()));
    assert_ne!(TypeRef::UserDefined(first.clone()), TypeRef::UserDefined(second));
    assert_ne!(TypeRef::UserDefined(first.clone()), TypeRef::Builtin(Int));
    assert_eq!(
        binary_result_type(&TypeRef::UserDefined(first.clone()), BinaryOperator::Add, &TypeRef::UserDefined(first)),
        None
    );
}

#[test]
fn test_builtin_names() {
    assert_eq!(BuiltinKind::from_name("double"), Some(Double));
    assert_eq!(BuiltinKind::from_name("Point"), None);
    assert_eq!(TypeRef::Builtin(Float).to_string(), "float");
}
