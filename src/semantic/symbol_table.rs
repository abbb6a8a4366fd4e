use std::{
    cell::RefCell,
    collections::HashMap,
    rc::{Rc, Weak},
};

use crate::types::types::ClassId;

use super::symbols::{FunctionSymbol, Symbol};

/// What a scope belongs to; decides where `give` is allowed.
#[derive(Debug, Clone)]
pub enum ScopeOwner {
    Function(Rc<FunctionSymbol>),
    Class(ClassId),
}

/// A lexical scope.
///
/// Parents are held weakly: the analyzer keeps every open scope alive
/// on its own stack, and scopes kept past their block (class members,
/// package globals) only need their local symbols afterwards.
#[derive(Debug)]
pub struct SymbolTable {
    pub name: String,
    parent: Option<Weak<SymbolTable>>,
    owner: Option<ScopeOwner>,
    symbols: RefCell<HashMap<String, Symbol>>,
}

impl SymbolTable {
    pub fn new(name: &str, parent: Option<&Rc<SymbolTable>>, owner: Option<ScopeOwner>) -> Self {
        SymbolTable {
            name: String::from(name),
            parent: parent.map(Rc::downgrade),
            owner,
            symbols: RefCell::new(HashMap::new()),
        }
    }

    pub fn parent(&self) -> Option<Rc<SymbolTable>> {
        self.parent.as_ref().and_then(Weak::upgrade)
    }

    pub fn owner(&self) -> Option<&ScopeOwner> {
        self.owner.as_ref()
    }

    /// Looks `name` up here, then in each enclosing scope.
    pub fn lookup(&self, name: &str) -> Option<Symbol> {
        if let Some(symbol) = self.lookup_current(name) {
            return Some(symbol);
        }

        self.parent()?.lookup(name)
    }

    pub fn lookup_current(&self, name: &str) -> Option<Symbol> {
        self.symbols.borrow().get(name).cloned()
    }

    /// Binds `name` in this scope, replacing any previous binding here.
    pub fn define(&self, name: &str, symbol: Symbol) {
        self.symbols.borrow_mut().insert(String::from(name), symbol);
    }

    /// Local bindings sorted by name.
    pub fn entries(&self) -> Vec<(String, Symbol)> {
        let mut entries: Vec<(String, Symbol)> = self
            .symbols
            .borrow()
            .iter()
            .map(|(name, symbol)| (name.clone(), symbol.clone()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    pub fn len(&self) -> usize {
        self.symbols.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.borrow().is_empty()
    }
}
