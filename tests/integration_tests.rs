//! Integration tests for running whole programs.
//!
//! These tests go through the complete pipeline: tokenization, parsing,
//! analysis, import resolution and execution, with output captured by a
//! `BufferConsole` and packages laid out in temporary directories.

use std::{cell::RefCell, fs, path::Path, rc::Rc};

use boink::{
    errors::errors::{ErrorKind, RunError},
    interpreter::{activation_record::Record, console::BufferConsole},
    modules::resolver::ModuleResolver,
    run_file, run_source,
};
use pretty_assertions::assert_eq;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

/// Runs `source` as `main.boink` in an otherwise empty directory.
fn run(source: &str) -> Result<(Record, String), RunError> {
    let dir = tempfile::tempdir().unwrap();
    let console = Rc::new(RefCell::new(BufferConsole::new()));
    let mut resolver = ModuleResolver::new(dir.path(), console.clone());

    let record = run_source(source, "main.boink", &mut resolver)?;
    let output = console.borrow().output().to_string();
    Ok((record, output))
}

/// Writes `main` next to the given files and runs it from disk.
fn run_project(files: &[(&str, &str)], main: &str) -> Result<(Record, String), RunError> {
    let dir = tempfile::tempdir().unwrap();
    for (name, content) in files {
        write(dir.path(), name, content);
    }
    write(dir.path(), "main.boink", main);

    let console = Rc::new(RefCell::new(BufferConsole::new()));
    let record = run_file(&dir.path().join("main.boink"), console.clone())?;
    let output = console.borrow().output().to_string();
    Ok((record, output))
}

fn diagnostic_kinds(result: Result<(Record, String), RunError>) -> Vec<ErrorKind> {
    match result {
        Err(RunError::Diagnostics(diagnostics)) => diagnostics.kinds(),
        Err(other) => panic!("unexpected error: {}", other),
        Ok(_) => panic!("expected diagnostics"),
    }
}

#[test]
fn test_integer_addition() {
    let (record, _) = run("int a = 1 + 2\n").unwrap();
    assert_eq!(record.get_local("a").and_then(|value| value.as_int()), Some(3));
}

#[test]
fn test_integer_division() {
    let (record, _) = run("double a = 5 / 2\n").unwrap();
    assert_eq!(record.get_local("a").and_then(|value| value.as_double()), Some(2.5));

    assert_eq!(diagnostic_kinds(run("int a = 5 / 2\n")), vec![ErrorKind::IncompatibleTypes]);
}

#[test]
fn test_function_call() {
    let source = "\
fn add(int a, int b) -> int
    give a + b
;
int c = add(2, 3)
";
    let (record, _) = run(source).unwrap();
    assert_eq!(record.get_local("c").and_then(|value| value.as_int()), Some(5));
}

#[test]
fn test_bare_give_inside_if() {
    let source = "\
import io
fn f(int n)
    if (n == 0)
        give
    ;
    io.writeLine(n.toString())
;
f(0)
f(7)
";
    let (_, output) = run(source).unwrap();
    assert_eq!(output, "7\n");
}

#[test]
fn test_hello() {
    let (_, output) = run("import io\nio.writeLine(\"hi\")\n").unwrap();
    assert_eq!(output, "hi\n");
}

#[test]
fn test_fresh_instance_field() {
    let source = "\
type Point
    int x
;
Point p
bool zero = p.x == 0
";
    let (record, _) = run(source).unwrap();
    assert_eq!(record.get_local("zero").and_then(|value| value.as_bool()), Some(true));
}

#[test]
fn test_non_local_read_isolation() {
    let source = "\
int x = 1
fn bump() -> int
    x = x + 1
    give x
;
int seen = bump()
";
    let (record, _) = run(source).unwrap();
    assert_eq!(record.get_local("x").and_then(|value| value.as_int()), Some(1));
    assert_eq!(record.get_local("seen").and_then(|value| value.as_int()), Some(2));
}

#[test]
fn test_callee_reads_its_own_scope_not_the_callers() {
    let source = "\
int x = 1
fn f() -> int
    give x
;
fn g() -> int
    string x = \"s\"
    give f()
;
int y = g() + 1
";
    let (record, _) = run(source).unwrap();
    assert_eq!(record.get_local("y").and_then(|value| value.as_int()), Some(2));
}

#[test]
fn test_recursive_method_call() {
    let source = "\
import io
type Node
    fn count(int n) -> int
        if (n < 1)
            give 0
        ;
        int r = self.count(n - 1)
        give r + 1
    ;
;
Node k
io.writeLine(k.count(3).toString())
";
    let (_, output) = run(source).unwrap();
    assert_eq!(output, "3\n");
}

#[test]
fn test_analysis_gates_execution() {
    let source = "\
import io
io.writeLine(\"never\")
fn f() -> int
    int a = 1
;
int b = f(1)
";
    assert_eq!(
        diagnostic_kinds(run(source)),
        vec![ErrorKind::NoGive, ErrorKind::ArgumentMismatch]
    );
}

#[test]
fn test_package_import() {
    let files = [("shapes.boink", "fn area(int w, int h) -> int\n    give w * h\n;\n")];
    let main = "\
import shapes
int a = shapes.area(2, 3)
";
    let (record, _) = run_project(&files, main).unwrap();
    assert_eq!(record.name(), "main");
    assert_eq!(record.get_local("a").and_then(|value| value.as_int()), Some(6));
}

#[test]
fn test_package_function_reads_package_globals() {
    let files = [(
        "counter.boink",
        "int base = 10\nfn plus(int n) -> int\n    give base + n\n;\n",
    )];
    let main = "\
import counter
int total = counter.plus(5)
int base = counter.base
";
    let (record, _) = run_project(&files, main).unwrap();
    assert_eq!(record.get_local("total").and_then(|value| value.as_int()), Some(15));
    assert_eq!(record.get_local("base").and_then(|value| value.as_int()), Some(10));
}

#[test]
fn test_library_imports_merge() {
    let files = [
        ("geometry/circle.boink", "double pi = 3.5\n"),
        ("geometry/square.boink", "fn side() -> int\n    give 2\n;\n"),
    ];
    let main = "\
import geometry.circle
import geometry.square
double p = geometry.circle.pi
int s = geometry.square.side()
";
    let (record, _) = run_project(&files, main).unwrap();
    assert_eq!(record.get_local("p").and_then(|value| value.as_double()), Some(3.5));
    assert_eq!(record.get_local("s").and_then(|value| value.as_int()), Some(2));
}

#[test]
fn test_whole_library_import() {
    let files = [
        ("geometry/circle.boink", "double pi = 3.5\n"),
        ("geometry/nested/deep.boink", "int depth = 3\n"),
    ];
    let main = "\
import geometry
int d = geometry.nested.deep.depth
";
    let (record, _) = run_project(&files, main).unwrap();
    assert_eq!(record.get_local("d").and_then(|value| value.as_int()), Some(3));
}

#[test]
fn test_imported_package_diagnostics_surface() {
    let files = [("broken.boink", "int a = b\n")];

    match run_project(&files, "import broken\n") {
        Err(RunError::Diagnostics(diagnostics)) => {
            assert_eq!(diagnostics.kinds(), vec![ErrorKind::UndefinedSymbol]);
            let diagnostic = diagnostics.iter().next().unwrap();
            assert!(diagnostic.file().ends_with("broken.boink"));
            assert_eq!((diagnostic.line, diagnostic.column), (1, 9));
        }
        Err(other) => panic!("unexpected error: {}", other),
        Ok(_) => panic!("expected diagnostics"),
    }
}

#[test]
fn test_unknown_import() {
    assert_eq!(
        diagnostic_kinds(run_project(&[], "import missing\n")),
        vec![ErrorKind::UnknownLibrary]
    );
}

#[test]
fn test_cyclic_import() {
    let files = [("other.boink", "import main\n")];
    assert_eq!(
        diagnostic_kinds(run_project(&files, "import other\n")),
        vec![ErrorKind::UnknownLibrary]
    );
}

#[test]
fn test_package_output_runs_once() {
    let files = [("noisy.boink", "import io\nio.writeLine(\"loaded\")\n")];
    let main = "\
import io
import noisy
import noisy
io.writeLine(\"main\")
";
    let (_, output) = run_project(&files, main).unwrap();
    assert_eq!(output, "loaded\nmain\n");
}

#[test]
fn test_classes_and_methods() {
    let source = "\
import io
type Rectangle
    int width
    int height
    fn construct(int w, int h)
        width = w
        height = h
    ;
    fn area() -> int
        give width * height
    ;
;
Rectangle r = Rectangle(3, 4)
io.writeLine(\"area \" + r.area().toString())
";
    let (_, output) = run(source).unwrap();
    assert_eq!(output, "area 12\n");
}

#[test]
fn test_read_line() {
    let dir = tempfile::tempdir().unwrap();
    let console = Rc::new(RefCell::new(BufferConsole::with_input(["world"])));
    let mut resolver = ModuleResolver::new(dir.path(), console.clone());

    let source = "\
import io
string name = io.readLine()
io.writeLine(\"hello \" + name.toUpper())
";
    run_source(source, "main.boink", &mut resolver).unwrap();
    assert_eq!(console.borrow().output(), "hello WORLD\n");
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let console = Rc::new(RefCell::new(BufferConsole::new()));

    let error = run_file(&dir.path().join("nope.boink"), console).unwrap_err();
    assert!(matches!(error, RunError::Read { .. }));
}
