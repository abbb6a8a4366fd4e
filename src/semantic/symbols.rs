use std::{cell::RefCell, rc::Rc};

use crate::{
    types::types::{BuiltinKind, ClassId, TypeRef},
    value::builtins::NativeFunction,
};

use super::symbol_table::SymbolTable;

#[derive(Debug)]
pub struct VarSymbol {
    pub name: String,
    pub ty: TypeRef,
}

/// A function signature. `give_type` is `None` for functions that give nothing.
#[derive(Debug)]
pub struct FunctionSymbol {
    pub name: String,
    pub params: Vec<TypeRef>,
    pub give_type: Option<TypeRef>,
}

impl From<&NativeFunction> for FunctionSymbol {
    fn from(function: &NativeFunction) -> Self {
        FunctionSymbol {
            name: function.name.to_string(),
            params: function.parameters.iter().copied().map(TypeRef::Builtin).collect(),
            give_type: function.give.map(TypeRef::Builtin),
        }
    }
}

/// A user-defined type with its own member scope.
#[derive(Debug)]
pub struct ClassSymbol {
    pub name: String,
    pub id: ClassId,
    pub scope: Rc<SymbolTable>,
    pub fields: RefCell<Vec<String>>,
    pub methods: RefCell<Vec<String>>,
    pub constructor: RefCell<Option<Rc<FunctionSymbol>>>,
}

impl ClassSymbol {
    pub fn constructor(&self) -> Option<Rc<FunctionSymbol>> {
        self.constructor.borrow().clone()
    }
}

/// A directory of importables, or a native standard library.
#[derive(Debug)]
pub struct LibrarySymbol {
    pub name: String,
    pub scope: Rc<SymbolTable>,
}

/// One analyzed source file; `scope` is its global scope.
#[derive(Debug)]
pub struct PackageSymbol {
    pub name: String,
    pub scope: Rc<SymbolTable>,
}

#[derive(Debug, Clone)]
pub enum Symbol {
    Var(Rc<VarSymbol>),
    Function(Rc<FunctionSymbol>),
    Class(Rc<ClassSymbol>),
    Library(Rc<LibrarySymbol>),
    Package(Rc<PackageSymbol>),
}

impl Symbol {
    pub fn name(&self) -> &str {
        match self {
            Symbol::Var(symbol) => &symbol.name,
            Symbol::Function(symbol) => &symbol.name,
            Symbol::Class(symbol) => &symbol.name,
            Symbol::Library(symbol) => &symbol.name,
            Symbol::Package(symbol) => &symbol.name,
        }
    }

    pub fn ty(&self) -> TypeRef {
        match self {
            Symbol::Var(symbol) => symbol.ty.clone(),
            Symbol::Function(_) => TypeRef::Builtin(BuiltinKind::Function),
            Symbol::Class(symbol) => TypeRef::UserDefined(symbol.id.clone()),
            Symbol::Library(_) => TypeRef::Builtin(BuiltinKind::Library),
            Symbol::Package(_) => TypeRef::Builtin(BuiltinKind::Package),
        }
    }

    /// The scope a `.` after this symbol looks into, for namespaces and classes.
    pub fn namespace(&self) -> Option<Rc<SymbolTable>> {
        match self {
            Symbol::Class(symbol) => Some(Rc::clone(&symbol.scope)),
            Symbol::Library(symbol) => Some(Rc::clone(&symbol.scope)),
            Symbol::Package(symbol) => Some(Rc::clone(&symbol.scope)),
            Symbol::Var(_) | Symbol::Function(_) => None,
        }
    }
}
