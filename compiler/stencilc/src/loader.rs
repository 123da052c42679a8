//! Template source loaders.

use std::path::{Component, Path, PathBuf};

use rustc_hash::FxHashMap;
use stencil_diagnostic::{Diagnostic, ErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum LoaderError {
    #[error("template `{0}` not found")]
    NotFound(String),
    #[error("cannot read template `{name}`: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

impl LoaderError {
    pub fn code(&self) -> ErrorCode {
        match self {
            LoaderError::NotFound(_) => ErrorCode::E4001,
            LoaderError::Io { .. } => ErrorCode::E4002,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let diagnostic = Diagnostic::error(self.code()).with_message(self.to_string());
        match self {
            LoaderError::NotFound(name) => diagnostic.with_template(name.clone()),
            LoaderError::Io { name, .. } => diagnostic.with_template(name.clone()),
        }
    }
}

/// Where template sources come from.
pub trait Loader: Send + Sync {
    fn fetch_source(&self, name: &str) -> Result<String, LoaderError>;

    /// Every template this loader can provide, sorted.
    fn names(&self) -> Result<Vec<String>, LoaderError>;
}

/// Templates held in memory, keyed by name.
#[derive(Clone, Debug, Default)]
pub struct MemoryLoader {
    templates: FxHashMap<String, String>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, source: impl Into<String>) -> Self {
        self.insert(name, source);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, source: impl Into<String>) {
        self.templates.insert(name.into(), source.into());
    }
}

impl Loader for MemoryLoader {
    fn fetch_source(&self, name: &str) -> Result<String, LoaderError> {
        self.templates
            .get(name)
            .cloned()
            .ok_or_else(|| LoaderError::NotFound(name.to_string()))
    }

    fn names(&self) -> Result<Vec<String>, LoaderError> {
        let mut names: Vec<String> = self.templates.keys().cloned().collect();
        names.sort();
        Ok(names)
    }
}

/// Templates stored as `<root>/<name>.<extension>`.
///
/// Names use `/` as separator (`partials/header`). Names that would leave
/// the root are reported as not found.
#[derive(Clone, Debug)]
pub struct FileSystemLoader {
    root: PathBuf,
    extension: String,
}

impl FileSystemLoader {
    pub fn new(root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        let extension = extension.into();
        FileSystemLoader {
            root: root.into(),
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, name: &str) -> Option<PathBuf> {
        let relative = Path::new(name);
        let contained = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if name.is_empty() || !contained {
            return None;
        }
        let mut path = self.root.join(relative);
        let file_name = format!("{}.{}", path.file_name()?.to_string_lossy(), self.extension);
        path.set_file_name(file_name);
        Some(path)
    }

    fn collect(&self, dir: &Path, prefix: &str, names: &mut Vec<String>) -> Result<(), LoaderError> {
        let io = |source| LoaderError::Io {
            name: dir.display().to_string(),
            source,
        };
        for entry in std::fs::read_dir(dir).map_err(io)? {
            let path = entry.map_err(io)?.path();
            let Some(stem) = path.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
                continue;
            };
            if path.is_dir() {
                let Some(dir_name) = path.file_name().map(|s| s.to_string_lossy().into_owned()) else {
                    continue;
                };
                self.collect(&path, &format!("{prefix}{dir_name}/"), names)?;
            } else if path.extension().is_some_and(|e| e == self.extension.as_str()) {
                names.push(format!("{prefix}{stem}"));
            }
        }
        Ok(())
    }
}

impl Loader for FileSystemLoader {
    fn fetch_source(&self, name: &str) -> Result<String, LoaderError> {
        let path = self
            .path_for(name)
            .ok_or_else(|| LoaderError::NotFound(name.to_string()))?;
        std::fs::read_to_string(&path).map_err(|source| match source.kind() {
            std::io::ErrorKind::NotFound => LoaderError::NotFound(name.to_string()),
            _ => LoaderError::Io {
                name: name.to_string(),
                source,
            },
        })
    }

    fn names(&self) -> Result<Vec<String>, LoaderError> {
        let mut names = Vec::new();
        self.collect(&self.root, "", &mut names)?;
        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    #![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_memory_loader() {
        let loader = MemoryLoader::new().with("b", "two").with("a", "one");
        assert_eq!(loader.fetch_source("a").unwrap(), "one");
        assert_eq!(loader.names().unwrap(), vec!["a", "b"]);
        let err = loader.fetch_source("c").unwrap_err();
        assert!(matches!(err, LoaderError::NotFound(ref n) if n == "c"));
        assert_eq!(err.code(), ErrorCode::E4001);
    }

    #[test]
    fn test_file_system_loader() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("page.stencil"), "hello").unwrap();
        std::fs::create_dir(dir.path().join("partials")).unwrap();
        std::fs::write(dir.path().join("partials/header.stencil"), "<h1>").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let loader = FileSystemLoader::new(dir.path(), ".stencil");
        assert_eq!(loader.fetch_source("page").unwrap(), "hello");
        assert_eq!(loader.fetch_source("partials/header").unwrap(), "<h1>");
        assert_eq!(loader.names().unwrap(), vec!["page", "partials/header"]);
    }

    #[test]
    fn test_file_system_loader_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let loader = FileSystemLoader::new(dir.path(), "stencil");
        assert!(matches!(
            loader.fetch_source("missing"),
            Err(LoaderError::NotFound(_))
        ));
        assert!(matches!(
            loader.fetch_source("../escape"),
            Err(LoaderError::NotFound(_))
        ));
        assert!(matches!(loader.fetch_source(""), Err(LoaderError::NotFound(_))));
    }
}
