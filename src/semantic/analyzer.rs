use std::{collections::HashMap, rc::Rc};

use crate::{
    ast::{
        ast::{NodeId, Program},
        types::TypeName,
    },
    errors::{
        diagnostics::Diagnostics,
        errors::{Error, ErrorImpl},
    },
    modules::resolver::ModuleResolver,
    types::types::{BuiltinKind, TypeRef},
    value::builtins::methods_for,
    Position,
};

use super::{
    stmt::analyze_stmt,
    symbol_table::{ScopeOwner, SymbolTable},
    symbols::{FunctionSymbol, Symbol},
};

/// Marker for a subtree whose error has already been reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reported;

/// Type of an analyzed expression: `Ok(None)` when it produces nothing.
pub type Checked = Result<Option<TypeRef>, Reported>;

/// Result of analyzing one program.
#[derive(Debug)]
pub struct Analysis {
    pub global: Rc<SymbolTable>,
    pub diagnostics: Diagnostics,
    pub expr_types: HashMap<NodeId, TypeRef>,
}

impl Analysis {
    pub fn type_of(&self, id: NodeId) -> Option<&TypeRef> {
        self.expr_types.get(&id)
    }

    pub fn is_ok(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

pub struct SemanticAnalyzer<'r> {
    /// The innermost open scope.
    pub scope: Rc<SymbolTable>,
    /// Enclosing open scopes, innermost last.
    outer: Vec<Rc<SymbolTable>>,
    pub diagnostics: Diagnostics,
    pub expr_types: HashMap<NodeId, TypeRef>,
    pub resolver: &'r mut ModuleResolver,
    /// Whether the function being analyzed has a `give` outside nested functions.
    pub gave: bool,
    builtin_scopes: HashMap<BuiltinKind, Rc<SymbolTable>>,
}

impl<'r> SemanticAnalyzer<'r> {
    pub fn new(name: &str, source: Rc<str>, resolver: &'r mut ModuleResolver) -> Self {
        SemanticAnalyzer {
            scope: Rc::new(SymbolTable::new(name, None, None)),
            outer: vec![],
            diagnostics: Diagnostics::new(source),
            expr_types: HashMap::new(),
            resolver,
            gave: false,
            builtin_scopes: HashMap::new(),
        }
    }

    pub fn report(&mut self, error: ErrorImpl, position: &Position) {
        self.diagnostics.report(Error::new(error, position.clone()));
    }

    /// Opens a child scope of the current one.
    pub fn enter_scope(&mut self, name: &str, owner: Option<ScopeOwner>) -> Rc<SymbolTable> {
        let scope = Rc::new(SymbolTable::new(name, Some(&self.scope), owner));
        self.push_scope(Rc::clone(&scope));
        scope
    }

    /// Makes an already built scope current.
    pub fn push_scope(&mut self, scope: Rc<SymbolTable>) {
        let previous = std::mem::replace(&mut self.scope, scope);
        self.outer.push(previous);
    }

    pub fn leave_scope(&mut self) {
        if let Some(previous) = self.outer.pop() {
            self.scope = previous;
        }
    }

    pub fn record_type(&mut self, id: NodeId, ty: &Option<TypeRef>) {
        if let Some(ty) = ty {
            self.expr_types.insert(id, ty.clone());
        }
    }

    /// Resolves a written type to a built-in kind or a class in scope.
    pub fn resolve_type(&mut self, type_name: &TypeName) -> Result<TypeRef, Reported> {
        if let Some(kind) = type_name.builtin() {
            return Ok(TypeRef::Builtin(kind));
        }

        match self.scope.lookup(&type_name.name) {
            Some(Symbol::Class(class)) => Ok(TypeRef::UserDefined(class.id.clone())),
            Some(other) => {
                self.report(
                    ErrorImpl::IncompatibleTypes {
                        expected: String::from("a type"),
                        received: other.ty().to_string(),
                    },
                    &type_name.span.start,
                );
                Err(Reported)
            }
            None => {
                self.report(
                    ErrorImpl::UndefinedSymbol {
                        name: type_name.name.clone(),
                    },
                    &type_name.span.start,
                );
                Err(Reported)
            }
        }
    }

    /// The scope a `.` after a value of type `ty` looks into.
    pub fn member_scope(&mut self, ty: &TypeRef) -> Option<Rc<SymbolTable>> {
        match ty {
            TypeRef::UserDefined(class) => class.members(),
            TypeRef::Builtin(kind) => Some(self.builtin_scope(*kind)),
        }
    }

    fn builtin_scope(&mut self, kind: BuiltinKind) -> Rc<SymbolTable> {
        let scope = self.builtin_scopes.entry(kind).or_insert_with(|| {
            let scope = SymbolTable::new(kind.name(), None, None);
            for method in methods_for(kind) {
                scope.define(method.name, Symbol::Function(Rc::new(FunctionSymbol::from(method))));
            }
            Rc::new(scope)
        });
        Rc::clone(scope)
    }

    pub fn finish(self) -> Analysis {
        let SemanticAnalyzer {
            scope,
            outer,
            diagnostics,
            expr_types,
            ..
        } = self;

        Analysis {
            global: outer.into_iter().next().unwrap_or(scope),
            diagnostics,
            expr_types,
        }
    }
}

/// Analyzes `program`, collecting every diagnostic instead of stopping at the first.
#[tracing::instrument(level = "debug", skip_all, fields(program = %program.name))]
pub fn analyze(program: &Program, source: Rc<str>, resolver: &mut ModuleResolver) -> Analysis {
    let mut analyzer = SemanticAnalyzer::new(&program.name, source, resolver);

    for stmt in &program.statements {
        analyze_stmt(&mut analyzer, stmt);
    }

    let analysis = analyzer.finish();
    tracing::debug!(diagnostics = analysis.diagnostics.len(), "analysis finished");
    analysis
}
