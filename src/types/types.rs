use std::{
    fmt::Display,
    rc::{Rc, Weak},
    sync::atomic::{AtomicU32, Ordering},
};

use crate::semantic::symbol_table::SymbolTable;

static NEXT_CLASS_ID: AtomicU32 = AtomicU32::new(1);

/// Kinds the language provides without a type definition.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum BuiltinKind {
    Int,
    Float,
    Double,
    Bool,
    String,
    Function,
    Package,
    Library,
}

impl BuiltinKind {
    /// Maps a type name as written in source to its kind. Only the declarable kinds have names.
    pub fn from_name(name: &str) -> Option<BuiltinKind> {
        match name {
            "int" => Some(BuiltinKind::Int),
            "float" => Some(BuiltinKind::Float),
            "double" => Some(BuiltinKind::Double),
            "bool" => Some(BuiltinKind::Bool),
            "string" => Some(BuiltinKind::String),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BuiltinKind::Int => "int",
            BuiltinKind::Float => "float",
            BuiltinKind::Double => "double",
            BuiltinKind::Bool => "bool",
            BuiltinKind::String => "string",
            BuiltinKind::Function => "function",
            BuiltinKind::Package => "package",
            BuiltinKind::Library => "library",
        }
    }
}

impl Display for BuiltinKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Nominal identity of a user-defined class.
///
/// Equality only looks at the numeric id, so two classes with the same
/// name and shape are still different types. The member scope is held
/// weakly; the owning `ClassSymbol` keeps it alive.
#[derive(Debug, Clone)]
pub struct ClassId {
    pub id: u32,
    pub name: Rc<str>,
    members: Weak<SymbolTable>,
}

impl ClassId {
    pub fn new(name: &str, members: &Rc<SymbolTable>) -> Self {
        ClassId::with_members(name, Rc::downgrade(members))
    }

    /// Allocates an id for a member scope that is still being built (see `Rc::new_cyclic`).
    pub fn with_members(name: &str, members: Weak<SymbolTable>) -> Self {
        ClassId {
            id: NEXT_CLASS_ID.fetch_add(1, Ordering::Relaxed),
            name: Rc::from(name),
            members,
        }
    }

    pub fn members(&self) -> Option<Rc<SymbolTable>> {
        self.members.upgrade()
    }
}

impl PartialEq for ClassId {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ClassId {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    Builtin(BuiltinKind),
    UserDefined(ClassId),
}

impl TypeRef {
    pub fn builtin_kind(&self) -> Option<BuiltinKind> {
        match self {
            TypeRef::Builtin(kind) => Some(*kind),
            TypeRef::UserDefined(_) => None,
        }
    }

    pub fn is(&self, kind: BuiltinKind) -> bool {
        self.builtin_kind() == Some(kind)
    }
}

impl From<BuiltinKind> for TypeRef {
    fn from(kind: BuiltinKind) -> Self {
        TypeRef::Builtin(kind)
    }
}

impl Display for TypeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeRef::Builtin(kind) => write!(f, "{}", kind),
            TypeRef::UserDefined(class) => write!(f, "{}", class.name),
        }
    }
}

/// Renders an optional type the way diagnostics spell "no value".
pub fn describe(ty: Option<&TypeRef>) -> String {
    match ty {
        Some(ty) => ty.to_string(),
        None => String::from("nothing"),
    }
}
