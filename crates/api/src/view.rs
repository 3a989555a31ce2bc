//! Contracts of the collaborators the completion engine consumes.

use std::collections::HashMap;
use std::path::Path;

use crate::error::ApiResult;
use crate::models::{
    ImportRequest, ImportSpec, NodeId, PackageDescriptor, PackageFilter, PackageId, ScopeId,
    ScopeTree, SyntaxTree, TextEdit, TypeInfo, TypeStore,
};

/// Type-checked view of the package containing the file being completed.
pub trait PackageView: Send + Sync {
    /// The package the file belongs to.
    fn package(&self) -> PackageId;
    fn file_path(&self) -> &Path;
    fn source(&self) -> &str;
    fn store(&self) -> &TypeStore;
    fn syntax(&self) -> &SyntaxTree;
    fn scopes(&self) -> &ScopeTree;
    fn info(&self) -> &TypeInfo;
    fn imports(&self) -> &[ImportSpec];

    /// Syntax path from the node at `offset` out to the file root.
    fn path_enclosing(&self, offset: usize) -> Vec<NodeId> {
        self.syntax().path_enclosing(offset)
    }

    /// Scope chain at `offset`, innermost first.
    fn scope_chain(&self, offset: usize) -> Vec<ScopeId> {
        self.scopes().chain_at(offset)
    }

    fn imports_path(&self, path: &str) -> bool {
        self.imports().iter().any(|i| i.path == path)
    }
}

/// Workspace metadata: which packages exist and what they depend on.
pub trait WorkspaceIndex: Send + Sync {
    fn find_packages(&self, filter: &PackageFilter) -> ApiResult<Vec<PackageDescriptor>>;
    fn package_by_path(&self, path: &str) -> Option<PackageDescriptor>;
}

/// Relevance oracle for import paths; higher is more relevant.
pub trait ImportScorer: Send + Sync {
    fn relevance(&self, paths: &[String]) -> HashMap<String, f64>;
}

/// Computes the edits that add an import to a file.
pub trait ImportEditor: Send + Sync {
    fn import_edits(
        &self,
        file: &Path,
        source: &str,
        request: &ImportRequest,
    ) -> ApiResult<Vec<TextEdit>>;
}
