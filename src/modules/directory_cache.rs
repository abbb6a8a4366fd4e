use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

/// Extension of importable source files.
pub const SOURCE_EXTENSION: &str = "boink";

/// Something `import` can name: a source file or a directory of them.
#[derive(Debug, Clone, PartialEq)]
pub enum Importable {
    Package {
        name: String,
        path: PathBuf,
    },
    Library {
        name: String,
        path: PathBuf,
        importables: BTreeMap<String, Importable>,
    },
}

impl Importable {
    pub fn name(&self) -> &str {
        match self {
            Importable::Package { name, .. } | Importable::Library { name, .. } => name,
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Importable::Package { path, .. } | Importable::Library { path, .. } => path,
        }
    }
}

/// The importables under one root directory, discovered once.
#[derive(Debug, Clone)]
pub struct DirectoryCache {
    root: PathBuf,
    importables: BTreeMap<String, Importable>,
}

impl DirectoryCache {
    pub fn new(root: &Path) -> Self {
        let importables = discover(root);
        tracing::debug!(root = %root.display(), entries = importables.len(), "directory cache built");

        DirectoryCache {
            root: root.to_path_buf(),
            importables,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    #[cfg(test)]
    pub(crate) fn has_library_or_package(&self, name: &str) -> bool {
        self.importables.contains_key(name)
    }

    /// Walks `hierarchy` segment by segment; every segment but the last must be a library.
    pub fn get(&self, hierarchy: &[String]) -> Option<&Importable> {
        let (first, rest) = hierarchy.split_first()?;
        let mut current = self.importables.get(first)?;

        for segment in rest {
            current = match current {
                Importable::Library { importables, .. } => importables.get(segment)?,
                Importable::Package { .. } => return None,
            };
        }

        Some(current)
    }

    #[cfg(test)]
    pub(crate) fn importables(&self) -> &BTreeMap<String, Importable> {
        &self.importables
    }
}

fn discover(dir: &Path) -> BTreeMap<String, Importable> {
    let mut importables = BTreeMap::new();

    let Ok(entries) = fs::read_dir(dir) else {
        tracing::warn!(dir = %dir.display(), "unreadable directory skipped");
        return importables;
    };

    for entry in entries.flatten() {
        let path = entry.path();

        let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
            continue;
        };
        // Skip hidden files and directories
        if file_name.starts_with('.') {
            continue;
        }

        if path.is_dir() {
            let name = file_name.to_string();
            let nested = discover(&path);
            importables.insert(
                name.clone(),
                Importable::Library {
                    name,
                    path,
                    importables: nested,
                },
            );
        } else if path.extension().is_some_and(|extension| extension == SOURCE_EXTENSION) {
            let Some(name) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            // A directory with the same name wins over the file
            if importables.contains_key(name) {
                tracing::warn!(path = %path.display(), "package shadowed by a library of the same name");
                continue;
            }
            importables.insert(
                name.to_string(),
                Importable::Package {
                    name: name.to_string(),
                    path,
                },
            );
        }
    }

    importables
}
