use std::{
    cell::RefCell,
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
    rc::Rc,
};

use thiserror::Error;

use crate::{
    ast::ast::Program,
    compile_source,
    errors::{diagnostics::Diagnostics, errors::RuntimeError},
    interpreter::{activation_record::Record, console::SharedConsole, interpreter::interpret},
    semantic::{
        symbol_table::SymbolTable,
        symbols::{FunctionSymbol, LibrarySymbol, PackageSymbol, Symbol},
    },
    value::{
        builtins::standard_library,
        value::{Value, ValueData},
    },
    Compilation,
};

use super::directory_cache::{DirectoryCache, Importable};

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("no library or package named '{0}'")]
    Unknown(String),
    #[error("failed to read '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("package has {} error(s)", .0.len())]
    Failed(Diagnostics),
    #[error("package '{0}' is imported cyclically")]
    Cyclic(String),
}

/// A package compiled by this resolver, with the resolver for its own imports.
struct LoadedPackage {
    program: Program,
    symbol: Rc<PackageSymbol>,
    resolver: ModuleResolver,
    record: Option<Record>,
}

/// Turns import paths into symbols for the analyzer and values for the interpreter.
///
/// User packages and libraries under the root directory are checked
/// before the standard libraries. Each package is compiled at most once
/// per resolver, with a fresh resolver rooted at the package's own
/// directory so that its imports are relative to it.
pub struct ModuleResolver {
    cache: DirectoryCache,
    console: SharedConsole,
    packages: HashMap<PathBuf, LoadedPackage>,
    failures: HashMap<PathBuf, Diagnostics>,
    standard_symbols: HashMap<String, Rc<LibrarySymbol>>,
    standard_values: HashMap<String, Value>,
    /// Packages being compiled, shared with every nested resolver.
    import_chain: Rc<RefCell<Vec<PathBuf>>>,
}

fn canonical(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

fn joined(hierarchy: &[String]) -> String {
    hierarchy.join(".")
}

impl ModuleResolver {
    pub fn new(root: &Path, console: SharedConsole) -> Self {
        ModuleResolver::with_chain(root, console, Rc::new(RefCell::new(vec![])))
    }

    /// A resolver for the directory of `path`, with `path` itself counted as being compiled.
    pub fn for_file(path: &Path, console: SharedConsole) -> Self {
        let path = canonical(path);
        let root = path.parent().map(Path::to_path_buf).unwrap_or_default();
        ModuleResolver::with_chain(&root, console, Rc::new(RefCell::new(vec![path])))
    }

    fn with_chain(root: &Path, console: SharedConsole, import_chain: Rc<RefCell<Vec<PathBuf>>>) -> Self {
        ModuleResolver {
            cache: DirectoryCache::new(&canonical(root)),
            console,
            packages: HashMap::new(),
            failures: HashMap::new(),
            standard_symbols: HashMap::new(),
            standard_values: HashMap::new(),
            import_chain,
        }
    }

    pub fn console(&self) -> SharedConsole {
        Rc::clone(&self.console)
    }

    /// Resolves an import path for analysis. Packages on the path are compiled on first use.
    pub fn resolve_symbol(&mut self, hierarchy: &[String]) -> Result<Symbol, ImportError> {
        let (first, rest) = hierarchy
            .split_first()
            .ok_or_else(|| ImportError::Unknown(String::new()))?;

        if let Some(importable) = self.cache.get(&hierarchy[..1]).cloned() {
            return self.symbol_for(&importable, rest);
        }

        match (standard_library(first), rest.is_empty()) {
            (Some(functions), true) => {
                let symbol = self.standard_symbols.entry(first.clone()).or_insert_with(|| {
                    let scope = SymbolTable::new(first, None, None);
                    for function in functions {
                        scope.define(function.name, Symbol::Function(Rc::new(FunctionSymbol::from(function))));
                    }
                    Rc::new(LibrarySymbol {
                        name: first.clone(),
                        scope: Rc::new(scope),
                    })
                });
                Ok(Symbol::Library(Rc::clone(symbol)))
            }
            _ => Err(ImportError::Unknown(joined(hierarchy))),
        }
    }

    /// Resolves an import path for execution, running packages on first use.
    pub fn resolve_value(&mut self, hierarchy: &[String]) -> Result<Value, RuntimeError> {
        let (first, rest) = hierarchy
            .split_first()
            .ok_or_else(|| RuntimeError::internal("empty import path"))?;

        if let Some(importable) = self.cache.get(&hierarchy[..1]).cloned() {
            return self.value_for(&importable, rest);
        }

        match (standard_library(first), rest.is_empty()) {
            (Some(functions), true) => {
                let value = self.standard_values.entry(first.clone()).or_insert_with(|| {
                    let record = Record::new(first, 1, None);
                    for function in functions {
                        record.define(function.name, function.bind(None));
                    }
                    Value::named(first, ValueData::Library(record))
                });
                Ok(value.clone())
            }
            _ => Err(RuntimeError::internal(format!(
                "'{}' was not resolved during analysis",
                joined(hierarchy)
            ))),
        }
    }

    /// A symbol for `importable`: an intermediate library holds only the next segment, a final one everything below it.
    fn symbol_for(&mut self, importable: &Importable, rest: &[String]) -> Result<Symbol, ImportError> {
        match importable {
            Importable::Package { name, path } => match rest.first() {
                Some(next) => Err(ImportError::Unknown(format!("{}.{}", name, next))),
                None => Ok(Symbol::Package(self.load_package(name, path)?)),
            },
            Importable::Library {
                name, importables, ..
            } => {
                let scope = SymbolTable::new(name, None, None);

                match rest.split_first() {
                    Some((next, tail)) => {
                        let child = importables
                            .get(next)
                            .ok_or_else(|| ImportError::Unknown(format!("{}.{}", name, next)))?;
                        scope.define(next, self.symbol_for(child, tail)?);
                    }
                    None => {
                        for (child_name, child) in importables {
                            scope.define(child_name, self.symbol_for(child, &[])?);
                        }
                    }
                }

                Ok(Symbol::Library(Rc::new(LibrarySymbol {
                    name: name.clone(),
                    scope: Rc::new(scope),
                })))
            }
        }
    }

    fn value_for(&mut self, importable: &Importable, rest: &[String]) -> Result<Value, RuntimeError> {
        match importable {
            Importable::Package { name, path } => {
                let record = self.run_package(name, path)?;
                Ok(Value::named(name, ValueData::Package(record)))
            }
            Importable::Library {
                name, importables, ..
            } => {
                let record = Record::new(name, 1, None);

                match rest.split_first() {
                    Some((next, tail)) => {
                        let child = importables.get(next).ok_or_else(|| {
                            RuntimeError::internal(format!("'{}.{}' was not resolved during analysis", name, next))
                        })?;
                        record.define(next, self.value_for(child, tail)?);
                    }
                    None => {
                        for (child_name, child) in importables {
                            record.define(child_name, self.value_for(child, &[])?);
                        }
                    }
                }

                Ok(Value::named(name, ValueData::Library(record)))
            }
        }
    }

    /// Compiles and analyzes the package at `path`, once.
    #[tracing::instrument(level = "debug", skip_all, fields(package = %name))]
    fn load_package(&mut self, name: &str, path: &Path) -> Result<Rc<PackageSymbol>, ImportError> {
        if let Some(loaded) = self.packages.get(path) {
            return Ok(Rc::clone(&loaded.symbol));
        }
        if let Some(diagnostics) = self.failures.get(path) {
            return Err(ImportError::Failed(diagnostics.clone()));
        }
        if self.import_chain.borrow().iter().any(|loading| loading == path) {
            return Err(ImportError::Cyclic(name.to_string()));
        }

        let source = fs::read_to_string(path).map_err(|source| ImportError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let root = path.parent().unwrap_or(self.cache.root());
        let mut resolver = ModuleResolver::with_chain(root, self.console(), Rc::clone(&self.import_chain));

        self.import_chain.borrow_mut().push(path.to_path_buf());
        let compiled = compile_source(&source, &path.display().to_string(), &mut resolver);
        self.import_chain.borrow_mut().pop();

        match compiled {
            Ok(Compilation { program, analysis }) => {
                let symbol = Rc::new(PackageSymbol {
                    name: name.to_string(),
                    scope: analysis.global,
                });
                self.packages.insert(
                    path.to_path_buf(),
                    LoadedPackage {
                        program,
                        symbol: Rc::clone(&symbol),
                        resolver,
                        record: None,
                    },
                );
                tracing::debug!("package loaded");
                Ok(symbol)
            }
            Err(diagnostics) => {
                self.failures.insert(path.to_path_buf(), diagnostics.clone());
                Err(ImportError::Failed(diagnostics))
            }
        }
    }

    /// Runs the package at `path` once and returns its root record.
    fn run_package(&mut self, name: &str, path: &Path) -> Result<Record, RuntimeError> {
        self.load_package(name, path).map_err(|error| {
            RuntimeError::internal(format!("package '{}' cannot be loaded: {}", name, error))
        })?;

        let loaded = self
            .packages
            .get_mut(path)
            .ok_or_else(|| RuntimeError::internal(format!("package '{}' is not loaded", name)))?;
        if let Some(record) = &loaded.record {
            return Ok(record.clone());
        }

        let record = interpret(&loaded.program, &mut loaded.resolver)?;
        loaded.record = Some(record.clone());
        Ok(record)
    }
}
