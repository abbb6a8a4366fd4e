use std::rc::Rc;

use crate::{
    ast::{
        ast::{Expr, Reference},
        expressions::{CallExpr, LiteralValue, VariableExpr},
    },
    errors::errors::ErrorImpl,
    types::{
        operators::{binary_result_type, unary_result_type},
        types::{describe, BuiltinKind, TypeRef},
    },
};

use super::{
    analyzer::{Checked, Reported, SemanticAnalyzer},
    symbol_table::SymbolTable,
    symbols::Symbol,
};

/// Where a name in a member chain is looked up.
#[derive(Clone)]
pub struct MemberScope {
    pub scope: Rc<SymbolTable>,
    /// Rendered as the parent in `UndefinedMember` diagnostics.
    pub parent: String,
}

pub fn analyze_expr(analyzer: &mut SemanticAnalyzer, expr: &Expr) -> Checked {
    let ty = match expr {
        Expr::Literal(literal) => {
            let kind = match literal.value {
                LiteralValue::Int(_) => BuiltinKind::Int,
                LiteralValue::Float(_) => BuiltinKind::Float,
                LiteralValue::Double(_) => BuiltinKind::Double,
                LiteralValue::Bool(_) => BuiltinKind::Bool,
                LiteralValue::String(_) => BuiltinKind::String,
            };
            let ty = TypeRef::Builtin(kind);
            match &literal.child {
                Some(child) => {
                    let scope = member_scope_of_type(analyzer, &ty, child)?;
                    analyze_reference(analyzer, child, scope)?
                }
                None => Some(ty),
            }
        }
        Expr::Binary(binary) => {
            let left = analyze_expr(analyzer, &binary.left);
            let right = analyze_expr(analyzer, &binary.right);
            let (left, right) = (left?, right?);

            let result = match (&left, &right) {
                (Some(left), Some(right)) => binary_result_type(left, binary.operator, right),
                _ => None,
            };
            if result.is_none() {
                analyzer.report(
                    ErrorImpl::UnsupportedOperation {
                        operation: binary.operator.name().to_string(),
                        left: describe(left.as_ref()),
                        right: describe(right.as_ref()),
                    },
                    &binary.span.start,
                );
                return Err(Reported);
            }
            result
        }
        Expr::Unary(unary) => {
            let operand = analyze_expr(analyzer, &unary.operand)?;
            let result = operand
                .as_ref()
                .and_then(|operand| unary_result_type(unary.operator, operand));
            if result.is_none() {
                analyzer.report(
                    ErrorImpl::UnsupportedUnaryOperation {
                        operation: unary.operator.name().to_string(),
                        operand: describe(operand.as_ref()),
                    },
                    &unary.span.start,
                );
                return Err(Reported);
            }
            result
        }
        Expr::Variable(variable) => analyze_variable(analyzer, variable, None)?,
        Expr::Call(call) => analyze_call(analyzer, call, None)?,
    };

    analyzer.record_type(expr.id(), &ty);
    Ok(ty)
}

fn analyze_reference(analyzer: &mut SemanticAnalyzer, reference: &Reference, scope: MemberScope) -> Checked {
    let ty = match reference {
        Reference::Variable(variable) => analyze_variable(analyzer, variable, Some(scope))?,
        Reference::Call(call) => analyze_call(analyzer, call, Some(scope))?,
    };
    analyzer.record_type(reference.id(), &ty);
    Ok(ty)
}

/// Finds `name` in the member scope of a chain, or in the current scope chain.
fn lookup(
    analyzer: &mut SemanticAnalyzer,
    name: &str,
    scope: &Option<MemberScope>,
    position: &crate::Position,
) -> Result<Symbol, Reported> {
    let symbol = match scope {
        Some(member) => member.scope.lookup_current(name),
        None => analyzer.scope.lookup(name),
    };

    symbol.ok_or_else(|| {
        let error = match scope {
            Some(member) => ErrorImpl::UndefinedMember {
                name: name.to_string(),
                parent: member.parent.clone(),
            },
            None => ErrorImpl::UndefinedSymbol {
                name: name.to_string(),
            },
        };
        analyzer.report(error, position);
        Reported
    })
}

/// The scope for the segment after `.`; namespaces and classes expose their own scope.
fn member_scope_of_symbol(
    analyzer: &mut SemanticAnalyzer,
    symbol: &Symbol,
    child: &Reference,
) -> Result<MemberScope, Reported> {
    match symbol.namespace() {
        Some(scope) => Ok(MemberScope {
            scope,
            parent: symbol.name().to_string(),
        }),
        None => member_scope_of_type(analyzer, &symbol.ty(), child),
    }
}

fn member_scope_of_type(
    analyzer: &mut SemanticAnalyzer,
    ty: &TypeRef,
    child: &Reference,
) -> Result<MemberScope, Reported> {
    match analyzer.member_scope(ty) {
        Some(scope) => Ok(MemberScope {
            scope,
            parent: ty.to_string(),
        }),
        None => {
            analyzer.report(
                ErrorImpl::UndefinedMember {
                    name: child.name().to_string(),
                    parent: ty.to_string(),
                },
                &child.get_span().start,
            );
            Err(Reported)
        }
    }
}

fn analyze_variable(
    analyzer: &mut SemanticAnalyzer,
    variable: &VariableExpr,
    scope: Option<MemberScope>,
) -> Checked {
    let symbol = lookup(analyzer, &variable.name, &scope, &variable.span.start)?;

    match &variable.child {
        Some(child) => {
            let scope = member_scope_of_symbol(analyzer, &symbol, child)?;
            analyze_reference(analyzer, child, scope)
        }
        None => {
            if let Symbol::Class(class) = &symbol {
                analyzer.report(
                    ErrorImpl::TypeUsedAsValue {
                        name: class.name.clone(),
                    },
                    &variable.span.start,
                );
                return Err(Reported);
            }
            Ok(Some(symbol.ty()))
        }
    }
}

fn analyze_call(analyzer: &mut SemanticAnalyzer, call: &CallExpr, scope: Option<MemberScope>) -> Checked {
    let callee = lookup(analyzer, &call.name, &scope, &call.span.start);

    // Arguments are analyzed even when the callee is unknown
    let arguments: Vec<Checked> = call
        .arguments
        .iter()
        .map(|argument| analyze_expr(analyzer, argument))
        .collect();

    let (params, give_type) = match callee? {
        Symbol::Function(function) => (function.params.clone(), function.give_type.clone()),
        Symbol::Class(class) => {
            let params = class
                .constructor()
                .map(|constructor| constructor.params.clone())
                .unwrap_or_default();
            (params, Some(TypeRef::UserDefined(class.id.clone())))
        }
        other => {
            analyzer.report(
                ErrorImpl::IncompatibleTypes {
                    expected: BuiltinKind::Function.to_string(),
                    received: other.ty().to_string(),
                },
                &call.span.start,
            );
            return Err(Reported);
        }
    };

    if params.len() != arguments.len() {
        analyzer.report(
            ErrorImpl::ArgumentMismatch {
                name: call.name.clone(),
                expected: params.len(),
                received: arguments.len(),
            },
            &call.span.start,
        );
        return Err(Reported);
    }

    let mismatch = params.iter().zip(&arguments).find_map(|(param, argument)| match argument {
        Ok(received) if received.as_ref() != Some(param) => Some((param.clone(), received.clone())),
        _ => None,
    });
    if let Some((expected, received)) = mismatch {
        analyzer.report(
            ErrorImpl::IncompatibleTypes {
                expected: expected.to_string(),
                received: describe(received.as_ref()),
            },
            &call.span.start,
        );
        return Err(Reported);
    }
    if arguments.iter().any(Result::is_err) {
        return Err(Reported);
    }

    match &call.child {
        Some(child) => match &give_type {
            Some(ty) => {
                let scope = member_scope_of_type(analyzer, ty, child)?;
                analyze_reference(analyzer, child, scope)
            }
            None => {
                analyzer.report(
                    ErrorImpl::UndefinedMember {
                        name: child.name().to_string(),
                        parent: describe(None),
                    },
                    &child.get_span().start,
                );
                Err(Reported)
            }
        },
        None => Ok(give_type),
    }
}
