use std::{cell::RefCell, rc::Rc};

use crate::{
    ast::{
        ast::Stmt,
        statements::{
            AssignmentStmt, DeclarationStmt, FunctionStmt, GiveStmt, IfStmt, ImportStmt,
            TypeDefinitionStmt,
        },
    },
    errors::errors::ErrorImpl,
    modules::resolver::ImportError,
    types::types::{describe, BuiltinKind, ClassId, TypeRef},
};

use super::{
    analyzer::SemanticAnalyzer,
    expr::analyze_expr,
    symbol_table::{ScopeOwner, SymbolTable},
    symbols::{ClassSymbol, FunctionSymbol, Symbol, VarSymbol},
};

pub fn analyze_stmt(analyzer: &mut SemanticAnalyzer, stmt: &Stmt) {
    match stmt {
        Stmt::Declaration(declaration) => analyze_declaration(analyzer, declaration),
        Stmt::Assignment(assignment) => analyze_assignment(analyzer, assignment),
        Stmt::Function(function) => analyze_function(analyzer, function),
        Stmt::If(if_stmt) => analyze_if(analyzer, if_stmt),
        Stmt::Give(give) => analyze_give(analyzer, give),
        Stmt::Import(import) => analyze_import(analyzer, import),
        Stmt::TypeDefinition(definition) => analyze_type_definition(analyzer, definition),
        Stmt::Expression(stmt) => {
            // A call that gives nothing is fine here
            let _ = analyze_expr(analyzer, &stmt.expression);
        }
    }
}

/// Reports `IncompatibleTypes` unless `received` is exactly `expected`.
fn expect_type(
    analyzer: &mut SemanticAnalyzer,
    expected: Option<&TypeRef>,
    received: Option<&TypeRef>,
    position: &crate::Position,
) {
    if expected != received {
        analyzer.report(
            ErrorImpl::IncompatibleTypes {
                expected: describe(expected),
                received: describe(received),
            },
            position,
        );
    }
}

fn reject_redefinition(analyzer: &mut SemanticAnalyzer, name: &str, position: &crate::Position) -> bool {
    if analyzer.scope.lookup_current(name).is_some() {
        analyzer.report(
            ErrorImpl::MultipleDefinition {
                name: name.to_string(),
            },
            position,
        );
        return true;
    }
    false
}

fn analyze_declaration(analyzer: &mut SemanticAnalyzer, declaration: &DeclarationStmt) {
    let declared = analyzer.resolve_type(&declaration.type_name);
    let redefined = reject_redefinition(analyzer, &declaration.name, &declaration.span.start);

    if let Some(value) = &declaration.value {
        if let (Ok(declared), Ok(received)) = (&declared, analyze_expr(analyzer, value)) {
            expect_type(analyzer, Some(declared), received.as_ref(), &value.get_span().start);
        }
    }

    if let (Ok(ty), false) = (declared, redefined) {
        analyzer.scope.define(
            &declaration.name,
            Symbol::Var(Rc::new(VarSymbol {
                name: declaration.name.clone(),
                ty,
            })),
        );
    }
}

fn analyze_assignment(analyzer: &mut SemanticAnalyzer, assignment: &AssignmentStmt) {
    let target = analyzer.scope.lookup(&assignment.name);
    if target.is_none() {
        analyzer.report(
            ErrorImpl::UndefinedSymbol {
                name: assignment.name.clone(),
            },
            &assignment.span.start,
        );
    }

    let received = analyze_expr(analyzer, &assignment.value);

    match (target, received) {
        (Some(Symbol::Var(variable)), Ok(received)) => {
            expect_type(analyzer, Some(&variable.ty), received.as_ref(), &assignment.value.get_span().start);
        }
        (Some(other), _) => {
            // Only variables can be rebound
            analyzer.report(
                ErrorImpl::IncompatibleTypes {
                    expected: String::from("a variable"),
                    received: other.ty().to_string(),
                },
                &assignment.span.start,
            );
        }
        _ => {}
    }
}

fn analyze_function(analyzer: &mut SemanticAnalyzer, function: &Rc<FunctionStmt>) {
    let redefined = reject_redefinition(analyzer, &function.name, &function.span.start);

    let class = match analyzer.scope.owner() {
        Some(ScopeOwner::Class(class)) => Some(class.clone()),
        _ => None,
    };
    let is_constructor = class.is_some() && function.name == "construct";

    let params: Vec<Result<TypeRef, _>> = function
        .parameters
        .iter()
        .map(|parameter| analyzer.resolve_type(&parameter.type_name))
        .collect();

    let give_type = match (&class, is_constructor, &function.give_type) {
        (Some(class), true, _) => Some(TypeRef::UserDefined(class.clone())),
        (_, _, Some(type_name)) => analyzer.resolve_type(type_name).ok(),
        (_, _, None) => None,
    };

    let symbol = Rc::new(FunctionSymbol {
        name: function.name.clone(),
        params: params.iter().filter_map(|param| param.clone().ok()).collect(),
        give_type: give_type.clone(),
    });

    if !redefined {
        analyzer.scope.define(&function.name, Symbol::Function(Rc::clone(&symbol)));
    }

    analyzer.enter_scope(&function.name, Some(ScopeOwner::Function(symbol)));

    for (parameter, ty) in function.parameters.iter().zip(params) {
        if reject_redefinition(analyzer, &parameter.name, &parameter.span.start) {
            continue;
        }
        if let Ok(ty) = ty {
            analyzer.scope.define(
                &parameter.name,
                Symbol::Var(Rc::new(VarSymbol {
                    name: parameter.name.clone(),
                    ty,
                })),
            );
        }
    }

    let outer_gave = std::mem::replace(&mut analyzer.gave, false);
    for stmt in &function.body {
        analyze_stmt(analyzer, stmt);
    }
    let gave = std::mem::replace(&mut analyzer.gave, outer_gave);

    analyzer.leave_scope();

    if let (Some(give_type), false, false) = (&give_type, gave, is_constructor) {
        analyzer.report(
            ErrorImpl::NoGive {
                name: function.name.clone(),
                give_type: give_type.to_string(),
            },
            &function.span.start,
        );
    }
}

fn analyze_if(analyzer: &mut SemanticAnalyzer, if_stmt: &IfStmt) {
    if let Ok(condition) = analyze_expr(analyzer, &if_stmt.condition) {
        expect_type(
            analyzer,
            Some(&TypeRef::Builtin(BuiltinKind::Bool)),
            condition.as_ref(),
            &if_stmt.condition.get_span().start,
        );
    }

    let owner = analyzer.scope.owner().cloned();
    analyzer.enter_scope("if", owner);
    for stmt in &if_stmt.body {
        analyze_stmt(analyzer, stmt);
    }
    analyzer.leave_scope();
}

fn analyze_give(analyzer: &mut SemanticAnalyzer, give: &GiveStmt) {
    let received = match &give.value {
        Some(value) => analyze_expr(analyzer, value),
        None => Ok(None),
    };

    let function = match analyzer.scope.owner() {
        Some(ScopeOwner::Function(function)) => Rc::clone(function),
        _ => {
            analyzer.report(ErrorImpl::GiveNotAllowed, &give.span.start);
            return;
        }
    };

    analyzer.gave = true;

    if let Ok(received) = received {
        expect_type(analyzer, function.give_type.as_ref(), received.as_ref(), &give.span.start);
    }
}

/// Adds the entries of `from` into the library scope `into`, merging nested libraries.
fn merge_library(into: &SymbolTable, from: &SymbolTable) {
    for (name, symbol) in from.entries() {
        if let (Some(Symbol::Library(existing)), Symbol::Library(incoming)) =
            (into.lookup_current(&name), &symbol)
        {
            merge_library(&existing.scope, &incoming.scope);
            continue;
        }
        into.define(&name, symbol);
    }
}

fn analyze_import(analyzer: &mut SemanticAnalyzer, import: &ImportStmt) {
    let Some(root) = import.hierarchy.first() else {
        return;
    };

    let symbol = match analyzer.resolver.resolve_symbol(&import.hierarchy) {
        Ok(symbol) => symbol,
        Err(ImportError::Failed(diagnostics)) => {
            tracing::debug!(import = %import.path(), "imported package has errors");
            analyzer.diagnostics.extend(diagnostics);
            return;
        }
        Err(ImportError::Cyclic(name)) => {
            analyzer.report(ErrorImpl::CyclicImport { name }, &import.span.start);
            return;
        }
        Err(error) => {
            tracing::debug!(import = %import.path(), %error, "import failed");
            analyzer.report(ErrorImpl::UnknownLibrary { name: import.path() }, &import.span.start);
            return;
        }
    };

    let existing = analyzer.scope.lookup_current(root);
    if let (Some(Symbol::Library(existing)), Symbol::Library(incoming)) = (&existing, &symbol) {
        merge_library(&existing.scope, &incoming.scope);
        return;
    }

    // Importing the same package twice rebinds it
    if matches!((&existing, &symbol), (None, _) | (Some(Symbol::Package(_)), Symbol::Package(_))) {
        analyzer.scope.define(root, symbol);
    } else {
        analyzer.report(ErrorImpl::MultipleDefinition { name: root.clone() }, &import.span.start);
    }
}

fn analyze_type_definition(analyzer: &mut SemanticAnalyzer, definition: &Rc<TypeDefinitionStmt>) {
    let redefined = reject_redefinition(analyzer, &definition.name, &definition.span.start);

    let parent = Rc::clone(&analyzer.scope);
    let scope = Rc::new_cyclic(|members| {
        let id = ClassId::with_members(&definition.name, members.clone());
        SymbolTable::new(&definition.name, Some(&parent), Some(ScopeOwner::Class(id)))
    });
    let Some(ScopeOwner::Class(id)) = scope.owner().cloned() else {
        return;
    };

    let class = Rc::new(ClassSymbol {
        name: definition.name.clone(),
        id: id.clone(),
        scope: Rc::clone(&scope),
        fields: RefCell::new(vec![]),
        methods: RefCell::new(vec![]),
        constructor: RefCell::new(None),
    });

    if !redefined {
        analyzer.scope.define(&definition.name, Symbol::Class(Rc::clone(&class)));
    }

    scope.define(
        "self",
        Symbol::Var(Rc::new(VarSymbol {
            name: String::from("self"),
            ty: TypeRef::UserDefined(id),
        })),
    );

    analyzer.push_scope(Rc::clone(&scope));
    for stmt in &definition.body {
        analyze_stmt(analyzer, stmt);

        match stmt {
            Stmt::Declaration(field) => {
                let known = class.fields.borrow().contains(&field.name);
                if let (Some(Symbol::Var(_)), false) = (scope.lookup_current(&field.name), known) {
                    class.fields.borrow_mut().push(field.name.clone());
                }
            }
            Stmt::Function(method) => {
                let known = class.methods.borrow().contains(&method.name);
                if let (Some(Symbol::Function(symbol)), false) = (scope.lookup_current(&method.name), known) {
                    class.methods.borrow_mut().push(method.name.clone());
                    if method.name == "construct" {
                        *class.constructor.borrow_mut() = Some(symbol);
                    }
                }
            }
            _ => {}
        }
    }
    analyzer.leave_scope();
}
