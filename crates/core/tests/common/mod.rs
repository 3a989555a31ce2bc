#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use burrow_api::{
    ApiResult, CheckedPackage, CompletionItem, CompletionList, CompletionRequest, ImportEditor,
    ImportRequest, ImportScorer, NodeId, PackageBuilder, PackageDescriptor, PackageFilter,
    ScopeId, Signature, SymbolId, TextEdit, WorkspaceIndex,
};
use burrow_core::{CompletionEngine, CompletionOptions};
use tokio_util::sync::CancellationToken;

/// Marks the cursor in fixture sources.
pub const CURSOR: &str = "<>";

/// Source without the cursor marker, and the cursor offset.
pub fn split_cursor(marked: &str) -> (String, usize) {
    let at = marked.find(CURSOR).expect("fixture has a cursor");
    (marked.replacen(CURSOR, "", 1), at)
}

#[derive(Default)]
pub struct FakeIndex {
    pub packages: Vec<PackageDescriptor>,
    /// Number of `find_packages` calls, shared with clones of the counter.
    pub lookups: Arc<AtomicUsize>,
}

impl FakeIndex {
    pub fn with(packages: Vec<PackageDescriptor>) -> Self {
        Self {
            packages,
            lookups: Arc::default(),
        }
    }
}

impl WorkspaceIndex for FakeIndex {
    fn find_packages(&self, filter: &PackageFilter) -> ApiResult<Vec<PackageDescriptor>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .packages
            .iter()
            .filter(|p| filter.accepts(p))
            .cloned()
            .collect())
    }

    fn package_by_path(&self, path: &str) -> Option<PackageDescriptor> {
        self.packages.iter().find(|p| p.path == path).cloned()
    }
}

pub fn descriptor(name: &str, path: &str, files: Vec<PathBuf>) -> PackageDescriptor {
    PackageDescriptor {
        name: name.to_string(),
        path: path.to_string(),
        importable: true,
        test_variant: false,
        standard: !path.contains('.'),
        files,
        dependencies: Vec::new(),
    }
}

#[derive(Default)]
pub struct FakeScorer {
    pub relevance: HashMap<String, f64>,
}

impl ImportScorer for FakeScorer {
    fn relevance(&self, paths: &[String]) -> HashMap<String, f64> {
        paths
            .iter()
            .filter_map(|p| self.relevance.get(p).map(|r| (p.clone(), *r)))
            .collect()
    }
}

/// Inserts `import "path"` at the top of the file and remembers every call.
#[derive(Default)]
pub struct RecordingEditor {
    pub calls: Mutex<Vec<ImportRequest>>,
}

impl ImportEditor for RecordingEditor {
    fn import_edits(
        &self,
        _file: &Path,
        _source: &str,
        request: &ImportRequest,
    ) -> ApiResult<Vec<TextEdit>> {
        self.calls.lock().unwrap().push(request.clone());
        Ok(vec![TextEdit::insert(
            0,
            format!("import \"{}\"\n", request.path),
        )])
    }
}

pub fn engine(index: FakeIndex) -> (CompletionEngine, Arc<RecordingEditor>) {
    engine_with(index, CompletionOptions::default())
}

pub fn engine_with(
    index: FakeIndex,
    options: CompletionOptions,
) -> (CompletionEngine, Arc<RecordingEditor>) {
    let editor = Arc::new(RecordingEditor::default());
    let engine = CompletionEngine::new(
        Arc::new(index),
        Arc::new(FakeScorer::default()),
        editor.clone(),
    )
    .with_options(options);
    (engine, editor)
}

pub async fn complete(engine: &CompletionEngine, pkg: &CheckedPackage, at: usize) -> CompletionList {
    engine
        .complete(pkg, CompletionRequest::at(at), &CancellationToken::new())
        .await
        .expect("completion succeeds")
}

pub fn find<'a>(list: &'a CompletionList, label: &str) -> Option<&'a CompletionItem> {
    list.items.iter().find(|i| i.label == label)
}

pub fn rank(list: &CompletionList, label: &str) -> usize {
    list.items
        .iter()
        .position(|i| i.label == label)
        .unwrap_or_else(|| panic!("{label} missing from {:?}", list.labels()))
}

/// Scaffolding of `func NAME(...) { ... }` found in the fixture source:
/// the function symbol, its scope over the body and the nodes of its
/// signature.
pub struct FuncFixture {
    pub sym: SymbolId,
    pub scope: ScopeId,
    keyword: usize,
    name: NodeId,
    ty: NodeId,
    lbrace: usize,
    rbrace: usize,
}

impl FuncFixture {
    pub fn new(b: &mut PackageBuilder, name: &str, sig: Signature) -> Self {
        let keyword = b.pos(&format!("func {name}(")).expect("function in fixture");
        let name_at = keyword + "func ".len();
        let lbrace = keyword + b.source()[keyword..].find('{').expect("function body");
        let rbrace = lbrace + b.source()[lbrace..].find("\n}").expect("closing brace") + 1;

        let package_scope = b.package_scope(b.current());
        let sym = b.func(package_scope, name, sig, name_at);
        let name_node = b.ident(name, name_at);
        b.def(name_node, sym);
        let ty = b.func_type(name_at + name.len(), Vec::new(), Vec::new(), lbrace - 1);
        let file = b.file_scope();
        let scope = b.func_scope(file, lbrace, rbrace + 1);
        Self {
            sym,
            scope,
            keyword,
            name: name_node,
            ty,
            lbrace,
            rbrace,
        }
    }

    /// Declares a local variable at the `nth` occurrence of `name`.
    pub fn var(
        &self,
        b: &mut PackageBuilder,
        name: &str,
        nth: usize,
        ty: burrow_api::TypeRef,
    ) -> SymbolId {
        let at = b.pos_nth(name, nth).expect("variable in fixture");
        b.var(self.scope, name, ty, at)
    }

    pub fn decl(&self, b: &mut PackageBuilder, stmts: Vec<NodeId>) -> NodeId {
        let body = b.block(stmts, self.lbrace, self.rbrace);
        b.func_decl(self.keyword, None, self.name, self.ty, Some(body))
    }
}

/// Finishes the file: package clause plus `decls`.
pub fn finish(mut b: PackageBuilder, decls: Vec<NodeId>) -> CheckedPackage {
    let name = b.store().package(b.current()).name.to_string();
    let name_node = b.ident(&name, "package ".len());
    let clause = b.package_clause(0, name_node);
    let root = b.file(clause, decls);
    b.finish(root)
}

/// Identifier being typed at `at`; `typed` is the text before the cursor.
pub fn typing(b: &mut PackageBuilder, typed: &str, at: usize) -> NodeId {
    b.ident(typed, at - typed.len())
}
