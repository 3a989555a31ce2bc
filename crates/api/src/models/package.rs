use std::path::{Path, PathBuf};

use super::info::TypeInfo;
use super::scope::ScopeTree;
use super::symbol::{PackageId, SymbolId, TypeStore};
use super::syntax::SyntaxTree;
use crate::view::PackageView;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpec {
    pub path: String,
    /// Explicit import name (`import r "math/rand"`).
    pub name: Option<String>,
    /// The `PkgName` symbol the import declares in the file scope.
    pub symbol: Option<SymbolId>,
}

/// In-memory type-checked snapshot of one file and its package.
#[derive(Debug, Clone)]
pub struct CheckedPackage {
    pub package: PackageId,
    pub file_path: PathBuf,
    pub source: String,
    pub store: TypeStore,
    pub syntax: SyntaxTree,
    pub scopes: ScopeTree,
    pub info: TypeInfo,
    pub imports: Vec<ImportSpec>,
}

impl PackageView for CheckedPackage {
    fn package(&self) -> PackageId {
        self.package
    }

    fn file_path(&self) -> &Path {
        &self.file_path
    }

    fn source(&self) -> &str {
        &self.source
    }

    fn store(&self) -> &TypeStore {
        &self.store
    }

    fn syntax(&self) -> &SyntaxTree {
        &self.syntax
    }

    fn scopes(&self) -> &ScopeTree {
        &self.scopes
    }

    fn info(&self) -> &TypeInfo {
        &self.info
    }

    fn imports(&self) -> &[ImportSpec] {
        &self.imports
    }
}
