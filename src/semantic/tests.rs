//! Unit tests for scopes and semantic analysis.

use std::{cell::RefCell, rc::Rc};

use pretty_assertions::assert_eq;

use super::{
    analyzer::{analyze, Analysis},
    symbol_table::SymbolTable,
    symbols::{Symbol, VarSymbol},
};
use crate::{
    ast::ast::{Program, Stmt},
    errors::errors::{ErrorImpl, ErrorKind},
    interpreter::console::BufferConsole,
    modules::resolver::ModuleResolver,
    parse_source,
    types::types::{BuiltinKind, TypeRef},
};

use ErrorKind::*;

fn analyze_program(source: &str) -> (Program, Analysis) {
    let dir = tempfile::tempdir().unwrap();
    let console = Rc::new(RefCell::new(BufferConsole::new()));
    let mut resolver = ModuleResolver::new(dir.path(), console);

    let program = parse_source(source, "main.boink").unwrap();
    let analysis = analyze(&program, Rc::from(source), &mut resolver);
    (program, analysis)
}

fn kinds(source: &str) -> Vec<ErrorKind> {
    analyze_program(source).1.diagnostics.kinds()
}

fn first_error(source: &str) -> ErrorImpl {
    let (_, analysis) = analyze_program(source);
    let diagnostic = analysis.diagnostics.iter().next().unwrap();
    diagnostic.error.get_internal_error().clone()
}

fn int_var(name: &str) -> Symbol {
    Symbol::Var(Rc::new(VarSymbol {
        name: name.to_string(),
        ty: TypeRef::Builtin(BuiltinKind::Int),
    }))
}

#[test]
fn test_symbol_table_lookup_walks_parents() {
    let global = Rc::new(SymbolTable::new("global", None, None));
    global.define("a", int_var("a"));
    let inner = SymbolTable::new("inner", Some(&global), None);

    assert!(inner.lookup("a").is_some());
    assert!(inner.lookup_current("a").is_none());
    assert!(inner.lookup("b").is_none());

    inner.define("a", int_var("a"));
    assert_eq!(inner.len(), 1);
    assert_eq!(
        global.entries().into_iter().map(|(name, _)| name).collect::<Vec<_>>(),
        vec![String::from("a")]
    );
}

#[test]
fn test_symbol_table_parent_is_weak() {
    let global = Rc::new(SymbolTable::new("global", None, None));
    let inner = SymbolTable::new("inner", Some(&global), None);
    assert!(inner.parent().is_some());

    drop(global);
    assert!(inner.parent().is_none());
}

#[test]
fn test_valid_program() {
    let source = "\
import io
int a = 1 + 2
fn add(int x, int y) -> int
    give x + y
;
int b = add(a, 3)
io.writeLine(b.toString())
";
    assert_eq!(kinds(source), vec![]);
}

#[test]
fn test_expression_types_are_recorded() {
    let (program, analysis) = analyze_program("double a = 5 / 2\n");

    let Stmt::Declaration(declaration) = &program.statements[0] else {
        panic!("expected a declaration");
    };
    let value = declaration.value.as_ref().unwrap();
    assert_eq!(analysis.type_of(value.id()), Some(&TypeRef::Builtin(BuiltinKind::Double)));
    assert!(analysis.is_ok());
}

#[test]
fn test_shadowing_in_inner_block() {
    let source = "\
int x = 1
if (x == 1)
    string x = \"inner\"
    string y = x
;
int z = x
";
    assert_eq!(kinds(source), vec![]);
}

#[test]
fn test_block_variable_invisible_after_block() {
    let source = "\
if (true)
    int y = 2
;
int z = y
";
    assert_eq!(kinds(source), vec![UndefinedSymbol]);
}

#[test]
fn test_redefinition() {
    assert_eq!(kinds("int a = 1\nint a = 2\n"), vec![MultipleDefinition]);
    assert_eq!(kinds("fn f()\n;\nint f = 2\n"), vec![MultipleDefinition]);
}

#[test]
fn test_undefined_type() {
    assert_eq!(kinds("Shape s\n"), vec![UndefinedSymbol]);
}

#[test]
fn test_declaration_type_mismatch() {
    assert_eq!(kinds("int a = 5 / 2\n"), vec![IncompatibleTypes]);
    assert_eq!(kinds("string s = true\n"), vec![IncompatibleTypes]);
}

#[test]
fn test_errors_accumulate() {
    assert_eq!(
        kinds("int a = b\nint c = d\nint a = 1\n"),
        vec![UndefinedSymbol, UndefinedSymbol, MultipleDefinition]
    );
}

#[test]
fn test_assignment() {
    assert_eq!(kinds("int a\na = 2\n"), vec![]);
    assert_eq!(kinds("b = 1\n"), vec![UndefinedSymbol]);
    assert_eq!(kinds("int a\na = \"x\"\n"), vec![IncompatibleTypes]);
    assert_eq!(kinds("fn f()\n;\nf = 1\n"), vec![IncompatibleTypes]);
}

#[test]
fn test_unsupported_operation() {
    assert_eq!(kinds("int a = 1 + \"x\"\n"), vec![UnsupportedOperation]);
    assert_eq!(kinds("bool b = -true\n"), vec![UnsupportedOperation]);
}

#[test]
fn test_matching_give() {
    let source = "\
fn half(int n) -> double
    give n / 2
;
";
    assert_eq!(kinds(source), vec![]);
}

#[test]
fn test_missing_give() {
    let source = "\
fn f() -> int
    int a = 1
;
";
    assert_eq!(kinds(source), vec![NoGive]);
}

#[test]
fn test_give_inside_if_satisfies_give_type() {
    let source = "\
fn f(int n) -> int
    if (n > 0)
        give n
    ;
;
";
    assert_eq!(kinds(source), vec![]);
}

#[test]
fn test_bare_give_inside_if() {
    let source = "\
fn f(int n)
    if (n > 0)
        give
    ;
;
";
    assert_eq!(kinds(source), vec![]);
}

#[test]
fn test_give_in_nested_function_does_not_count() {
    let source = "\
fn outer() -> int
    fn inner() -> int
        give 1
    ;
;
";
    assert_eq!(kinds(source), vec![NoGive]);
}

#[test]
fn test_give_type_mismatch() {
    assert_eq!(kinds("fn f() -> int\n    give \"a\"\n;\n"), vec![IncompatibleTypes]);
    assert_eq!(kinds("fn f()\n    give 1\n;\n"), vec![IncompatibleTypes]);
}

#[test]
fn test_give_outside_function() {
    assert_eq!(kinds("give 1\n"), vec![GiveNotAllowed]);
    assert_eq!(kinds("if (true)\n    give\n;\n"), vec![GiveNotAllowed]);
}

#[test]
fn test_argument_count() {
    let source = "\
fn add(int a, int b) -> int
    give a + b
;
int c = add(1)
";
    assert_eq!(kinds(source), vec![ArgumentMismatch]);
    assert!(matches!(
        first_error(source),
        ErrorImpl::ArgumentMismatch { expected: 2, received: 1, .. }
    ));
    assert!(first_error(source).to_string().starts_with("Too few arguments"));
}

#[test]
fn test_argument_type() {
    let source = "\
fn add(int a, int b) -> int
    give a + b
;
int c = add(1, \"x\")
";
    assert_eq!(kinds(source), vec![IncompatibleTypes]);
}

#[test]
fn test_calling_a_variable() {
    assert_eq!(kinds("int a = 1\na()\n"), vec![IncompatibleTypes]);
}

#[test]
fn test_import_standard_library() {
    assert_eq!(kinds("import io\nio.writeLine(\"hi\")\n"), vec![]);
    assert_eq!(kinds("import io\nio.writeLine(1)\n"), vec![IncompatibleTypes]);
    assert_eq!(kinds("import io\nstring s = io.readLine()\n"), vec![]);
}

#[test]
fn test_undefined_member() {
    let source = "import io\nio.nope()\n";
    assert_eq!(kinds(source), vec![UndefinedSymbol]);
    assert!(matches!(
        first_error(source),
        ErrorImpl::UndefinedMember { name, parent } if name == "nope" && parent == "io"
    ));
}

#[test]
fn test_member_of_nothing() {
    let source = "\
fn f()
;
f().toString()
";
    assert_eq!(kinds(source), vec![UndefinedSymbol]);
}

#[test]
fn test_unknown_library() {
    assert_eq!(kinds("import nothing\n"), vec![UnknownLibrary]);
    assert_eq!(kinds("import io.extra\n"), vec![UnknownLibrary]);
}

#[test]
fn test_builtin_methods() {
    let source = "\
int n = \"abc\".length()
string s = 1.5.toString()
bool b = true.toString().contains(\"t\")
";
    assert_eq!(kinds(source), vec![]);
    assert_eq!(kinds("int n = 1.length()\n"), vec![UndefinedSymbol]);
}

#[test]
fn test_class_members() {
    let source = "\
type Point
    int x
    int y
    fn construct(int a, int b)
        x = a
        y = b
    ;
    fn sum() -> int
        give x + y
    ;
;
Point p = Point(1, 2)
int s = p.sum()
int x = p.x
";
    let (_, analysis) = analyze_program(source);
    assert_eq!(analysis.diagnostics.kinds(), vec![]);

    let Some(Symbol::Class(class)) = analysis.global.lookup("Point") else {
        panic!("expected a class");
    };
    assert_eq!(*class.fields.borrow(), vec![String::from("x"), String::from("y")]);
    assert_eq!(*class.methods.borrow(), vec![String::from("construct"), String::from("sum")]);

    let constructor = class.constructor().unwrap();
    assert_eq!(
        constructor.params,
        vec![TypeRef::Builtin(BuiltinKind::Int), TypeRef::Builtin(BuiltinKind::Int)]
    );
    assert_eq!(constructor.give_type, Some(TypeRef::UserDefined(class.id.clone())));
}

#[test]
fn test_constructor_arguments() {
    let source = "\
type Point
    int x
    fn construct(int a)
        x = a
    ;
;
Point p = Point()
";
    assert_eq!(kinds(source), vec![ArgumentMismatch]);

    assert_eq!(kinds("type Empty\n    int x\n;\nEmpty e = Empty(1)\n"), vec![ArgumentMismatch]);
}

#[test]
fn test_type_used_as_value() {
    let source = "\
type Point
    int x
;
Point p = Point
";
    assert_eq!(kinds(source), vec![IncompatibleTypes]);
    assert!(matches!(first_error(source), ErrorImpl::TypeUsedAsValue { .. }));
}

#[test]
fn test_distinct_classes_are_incompatible() {
    let source = "\
type A
    int x
;
type B
    int x
;
A a
B b = a
";
    assert_eq!(kinds(source), vec![IncompatibleTypes]);
}

#[test]
fn test_diagnostic_rendering() {
    let (_, analysis) = analyze_program("int a = 1\nint b = c\n");
    let rendered = analysis.diagnostics.iter().next().unwrap().to_string();

    assert_eq!(
        rendered,
        "UndefinedSymbol: 'c' is not defined. Error Position: (2, 9). File: 'main.boink'"
    );
}
