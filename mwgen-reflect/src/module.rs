//! Loading every Go file of a package directory.

use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::{debug, warn};

use crate::{
    descriptor::{InterfaceDescriptor, SourceFile, TypeDecl, TypeDeclKind},
    error::{Error, Result, SourceContext},
};

/// Options controlling which files are loaded.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadOptions {
    /// Also parse `_test.go` files.
    pub include_tests: bool,
}

/// The parsed Go files of one package directory.
///
/// Files are parsed in lexicographic path order, so lookups that stop at
/// the first match are deterministic.
#[derive(Debug, Clone)]
pub struct GoModule {
    dir: PathBuf,
    files: Vec<SourceFile>,
    import_path: Option<String>,
}

impl GoModule {
    /// Load a package directory with default options.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(dir, LoadOptions::default())
    }

    /// Load a package directory.
    pub fn open_with(dir: impl AsRef<Path>, options: LoadOptions) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        let paths = source_paths(&dir, options.include_tests)?;
        if paths.is_empty() {
            return Err(Box::new(Error::NoSourceFiles { dir }));
        }

        let mut files = Vec::with_capacity(paths.len());
        for path in paths {
            debug!(path = %path.display(), "parsing Go source");
            let source = fs::read_to_string(&path).map_err(|source| {
                Box::new(Error::Io {
                    path: path.clone(),
                    source,
                })
            })?;
            files.push(SourceFile::parse(path, source)?);
        }

        let import_path = find_import_path(&dir);
        match &import_path {
            Some(path) => debug!(import_path = %path, "resolved package import path"),
            None => debug!(dir = %dir.display(), "no go.mod found"),
        }

        Ok(Self {
            dir,
            files,
            import_path,
        })
    }

    /// Override the package import path (e.g. from configuration).
    pub fn with_import_path(mut self, import_path: impl Into<String>) -> Self {
        self.import_path = Some(import_path.into());
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    /// Import path of the package, derived from the enclosing `go.mod`.
    pub fn import_path(&self) -> Option<&str> {
        self.import_path.as_deref()
    }

    /// Reflect the first interface named `name`, in file order.
    pub fn reflect(&self, name: &str) -> Result<InterfaceDescriptor> {
        let (file, decl) = self
            .interface_decls()
            .find(|(_, decl)| decl.name == name)
            .ok_or_else(|| {
                Box::new(Error::InterfaceNotFound {
                    name: name.to_string(),
                    dir: self.dir.clone(),
                })
            })?;

        if decl.generic {
            let ctx = SourceContext::new(&file.source, file.path.display().to_string());
            return Err(ctx.generic_interface_error(name, decl.span.clone()));
        }

        let descriptor = self.describe(file, decl);
        if !descriptor.embedded.is_empty() {
            warn!(
                interface = %name,
                embedded = ?descriptor.embedded,
                "embedded interface elements are not reflected"
            );
        }
        Ok(descriptor)
    }

    /// Every interface declared in the package, in file order.
    ///
    /// Generic interfaces are included with their methods as written.
    pub fn interfaces(&self) -> Vec<InterfaceDescriptor> {
        self.interface_decls()
            .map(|(file, decl)| self.describe(file, decl))
            .collect()
    }

    fn interface_decls(&self) -> impl Iterator<Item = (&SourceFile, &TypeDecl)> {
        self.files.iter().flat_map(|file| {
            file.types
                .iter()
                .filter(|decl| decl.is_interface())
                .map(move |decl| (file, decl))
        })
    }

    fn describe(&self, file: &SourceFile, decl: &TypeDecl) -> InterfaceDescriptor {
        let (methods, embedded) = match &decl.kind {
            TypeDeclKind::Interface { methods, embedded } => (methods.clone(), embedded.clone()),
            TypeDeclKind::Other => (Vec::new(), Vec::new()),
        };
        InterfaceDescriptor {
            name: decl.name.clone(),
            package: file.package.clone(),
            import_path: self.import_path.clone(),
            file: file.path.clone(),
            imports: file.imports.clone(),
            methods,
            embedded,
        }
    }
}

/// Reflect interface `name` declared in the package at `dir`.
pub fn reflect(dir: impl AsRef<Path>, name: &str) -> Result<InterfaceDescriptor> {
    GoModule::open(dir)?.reflect(name)
}

/// Sorted `.go` files directly inside `dir`.
fn source_paths(dir: &Path, include_tests: bool) -> Result<Vec<PathBuf>> {
    let io_error = |source| {
        Box::new(Error::Io {
            path: dir.to_path_buf(),
            source,
        })
    };

    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();
        if !path.is_file() || path.extension().is_none_or(|ext| ext != "go") {
            continue;
        }
        let is_test = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.ends_with("_test.go"));
        if is_test && !include_tests {
            continue;
        }
        paths.push(path);
    }
    paths.sort();
    Ok(paths)
}

/// Derive a package import path from the nearest enclosing `go.mod`.
///
/// The module path is joined with the directory's location relative to the
/// module root, using `/` separators.
pub fn find_import_path(dir: &Path) -> Option<String> {
    let dir = dir.canonicalize().ok()?;
    let root = dir.ancestors().find(|a| a.join("go.mod").is_file())?;
    let content = fs::read_to_string(root.join("go.mod")).ok()?;
    let mut import_path = module_directive(&content)?;

    for component in dir.strip_prefix(root).ok()?.components() {
        import_path.push('/');
        import_path.push_str(component.as_os_str().to_str()?);
    }
    Some(import_path)
}

fn module_directive(go_mod: &str) -> Option<String> {
    go_mod.lines().find_map(|line| {
        let line = line.split("//").next()?.trim();
        let rest = line.strip_prefix("module")?;
        if !rest.starts_with(char::is_whitespace) {
            return None;
        }
        let path = rest.trim().trim_matches('"');
        (!path.is_empty()).then(|| path.to_string())
    })
}
