//! Fluent construction of a [`CheckedPackage`].
//!
//! Type-checker adapters translate their own results through this builder;
//! tests use it to describe a snapshot by hand.
//!
//! ```ignore
//! let src = "package main\n\nfunc main() {\n\tvar n int\n\tn = \n}\n";
//! let mut b = PackageBuilder::new("main", "example.com/app", src);
//! let int = b.universe_type("int");
//! let body = b.block_scope(b.file_scope(), 27, 50);
//! let n = b.var(body, "n", int, b.pos("n int").unwrap());
//! ```

use std::collections::HashMap;
use std::path::PathBuf;

use smol_str::SmolStr;

use super::info::{ExprMode, TypeAndValue, TypeInfo};
use super::package::{CheckedPackage, ImportSpec};
use super::scope::{ScopeId, ScopeKind, ScopeTree};
use super::span::Span;
use super::symbol::{PackageId, PackageInfo, Symbol, SymbolId, SymbolKind, TypeStore};
use super::syntax::{BinaryOp, LitKind, Node, NodeId, NodeKind, SyntaxTree, UnaryOp};
use super::types::{
    BasicKind, InterfaceType, NamedType, Param, Signature, StructType, TypeRef,
};

const UNIVERSE_TYPES: &[(&str, BasicKind)] = &[
    ("bool", BasicKind::Bool),
    ("int", BasicKind::Int),
    ("int8", BasicKind::Int8),
    ("int16", BasicKind::Int16),
    ("int32", BasicKind::Int32),
    ("int64", BasicKind::Int64),
    ("uint", BasicKind::Uint),
    ("uint8", BasicKind::Uint8),
    ("uint16", BasicKind::Uint16),
    ("uint32", BasicKind::Uint32),
    ("uint64", BasicKind::Uint64),
    ("uintptr", BasicKind::Uintptr),
    ("float32", BasicKind::Float32),
    ("float64", BasicKind::Float64),
    ("complex64", BasicKind::Complex64),
    ("complex128", BasicKind::Complex128),
    ("string", BasicKind::String),
    ("byte", BasicKind::Uint8),
    ("rune", BasicKind::Int32),
];

const UNIVERSE_FUNCS: &[&str] = &[
    "append", "cap", "clear", "close", "complex", "copy", "delete", "imag", "len", "make", "max",
    "min", "new", "panic", "print", "println", "real", "recover",
];

pub struct PackageBuilder {
    source: String,
    file_path: PathBuf,
    store: TypeStore,
    scopes: ScopeTree,
    syntax: SyntaxTree,
    info: TypeInfo,
    imports: Vec<ImportSpec>,
    package: PackageId,
    file_scope: ScopeId,
    scope_packages: HashMap<ScopeId, PackageId>,
}

impl PackageBuilder {
    pub fn new(name: &str, path: &str, source: impl Into<String>) -> Self {
        let mut store = TypeStore::new();
        let mut scopes = ScopeTree::new();
        populate_universe(&mut store, &mut scopes);

        let package_scope = scopes.add(ScopeKind::Package, scopes.universe(), None);
        let package = store.add_package(PackageInfo {
            name: name.into(),
            path: path.to_string(),
            scope: package_scope,
        });
        let file_scope = scopes.add(ScopeKind::File, package_scope, None);

        Self {
            source: source.into(),
            file_path: PathBuf::from(format!("{name}.go")),
            store,
            scopes,
            syntax: SyntaxTree::new(),
            info: TypeInfo::default(),
            imports: Vec::new(),
            package,
            file_scope,
            scope_packages: HashMap::from([(package_scope, package), (file_scope, package)]),
        }
    }

    pub fn with_file_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_path = path.into();
        self
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn store(&self) -> &TypeStore {
        &self.store
    }

    pub fn current(&self) -> PackageId {
        self.package
    }

    pub fn file_scope(&self) -> ScopeId {
        self.file_scope
    }

    pub fn package_scope(&self, package: PackageId) -> ScopeId {
        self.store.package(package).scope
    }

    // ---- positions ----

    pub fn pos(&self, needle: &str) -> Option<usize> {
        self.source.find(needle)
    }

    /// Offset of the `nth` (0-based) occurrence of `needle`.
    pub fn pos_nth(&self, needle: &str, nth: usize) -> Option<usize> {
        self.source.match_indices(needle).nth(nth).map(|(i, _)| i)
    }

    // ---- symbols and types ----

    pub fn universe_type(&self, name: &str) -> TypeRef {
        self.universe_symbol(name)
            .and_then(|id| self.store.symbol(id).ty.clone())
            .unwrap_or(TypeRef::Invalid)
    }

    pub fn universe_symbol(&self, name: &str) -> Option<SymbolId> {
        self.scopes.get(self.scopes.universe()).names.get(name).copied()
    }

    pub fn add_package(&mut self, name: &str, path: &str) -> PackageId {
        let scope = self
            .scopes
            .add(ScopeKind::Package, self.scopes.universe(), None);
        let id = self.store.add_package(PackageInfo {
            name: name.into(),
            path: path.to_string(),
            scope,
        });
        self.scope_packages.insert(scope, id);
        id
    }

    pub fn import(&mut self, package: PackageId) -> SymbolId {
        let name = self.store.package(package).name.clone();
        self.add_import(package, name, None)
    }

    pub fn import_as(&mut self, package: PackageId, alias: &str) -> SymbolId {
        self.add_import(package, alias.into(), Some(alias.to_string()))
    }

    fn add_import(&mut self, package: PackageId, name: SmolStr, alias: Option<String>) -> SymbolId {
        let symbol = self.store.add_symbol(Symbol {
            name: name.clone(),
            kind: SymbolKind::PkgName { imported: package },
            ty: None,
            package: Some(self.package),
            pos: 0,
        });
        self.scopes.insert(self.file_scope, name, symbol);
        self.imports.push(ImportSpec {
            path: self.store.package(package).path.clone(),
            name: alias,
            symbol: Some(symbol),
        });
        symbol
    }

    pub fn scope(&mut self, parent: ScopeId, kind: ScopeKind, span: Option<Span>) -> ScopeId {
        self.scopes.add(kind, parent, span)
    }

    pub fn func_scope(&mut self, parent: ScopeId, start: usize, end: usize) -> ScopeId {
        self.scopes
            .add(ScopeKind::Function, parent, Some(Span::new(start, end)))
    }

    pub fn block_scope(&mut self, parent: ScopeId, start: usize, end: usize) -> ScopeId {
        self.scopes
            .add(ScopeKind::Block, parent, Some(Span::new(start, end)))
    }

    fn package_of_scope(&self, scope: ScopeId) -> Option<PackageId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            if let Some(pkg) = self.scope_packages.get(&id) {
                return Some(*pkg);
            }
            current = self.scopes.get(id).parent;
        }
        None
    }

    pub fn declare(
        &mut self,
        scope: ScopeId,
        name: &str,
        kind: SymbolKind,
        ty: Option<TypeRef>,
        pos: usize,
    ) -> SymbolId {
        let package = self.package_of_scope(scope);
        let id = self.store.add_symbol(Symbol {
            name: name.into(),
            kind,
            ty,
            package,
            pos,
        });
        self.scopes.insert(scope, name, id);
        id
    }

    pub fn var(&mut self, scope: ScopeId, name: &str, ty: TypeRef, pos: usize) -> SymbolId {
        self.declare(scope, name, SymbolKind::Var, Some(ty), pos)
    }

    pub fn constant(&mut self, scope: ScopeId, name: &str, ty: TypeRef, pos: usize) -> SymbolId {
        self.declare(scope, name, SymbolKind::Const, Some(ty), pos)
    }

    pub fn func(&mut self, scope: ScopeId, name: &str, sig: Signature, pos: usize) -> SymbolId {
        self.declare(
            scope,
            name,
            SymbolKind::Func,
            Some(TypeRef::signature(sig)),
            pos,
        )
    }

    /// Declares a named type whose underlying type is set later, for
    /// self-referential types.
    pub fn declare_named(&mut self, scope: ScopeId, name: &str, pos: usize) -> TypeRef {
        let obj = self.declare(scope, name, SymbolKind::TypeName, None, pos);
        let id = self.store.add_named(NamedType {
            obj,
            underlying: TypeRef::Invalid,
            methods: Vec::new(),
        });
        let ty = TypeRef::Named(id);
        self.store.symbol_mut(obj).ty = Some(ty.clone());
        ty
    }

    pub fn set_underlying(&mut self, named: &TypeRef, underlying: TypeRef) {
        if let TypeRef::Named(id) = named {
            self.store.named_mut(*id).underlying = underlying;
        }
    }

    pub fn named_type(
        &mut self,
        scope: ScopeId,
        name: &str,
        underlying: TypeRef,
        pos: usize,
    ) -> TypeRef {
        let ty = self.declare_named(scope, name, pos);
        self.set_underlying(&ty, underlying);
        ty
    }

    /// Adds a method to a named type; the receiver is `*T` when `pointer_recv`.
    pub fn method(
        &mut self,
        on: &TypeRef,
        name: &str,
        sig: Signature,
        pointer_recv: bool,
    ) -> SymbolId {
        let TypeRef::Named(id) = on else {
            return self.store.add_symbol(Symbol {
                name: name.into(),
                kind: SymbolKind::Func,
                ty: None,
                package: Some(self.package),
                pos: 0,
            });
        };
        let recv_ty = if pointer_recv {
            TypeRef::pointer(on.clone())
        } else {
            on.clone()
        };
        let package = self.store.symbol(self.store.named(*id).obj).package;
        let method = self.store.add_symbol(Symbol {
            name: name.into(),
            kind: SymbolKind::Func,
            ty: Some(TypeRef::signature(sig.with_recv(Param::unnamed(recv_ty)))),
            package,
            pos: 0,
        });
        self.store.named_mut(*id).methods.push(method);
        method
    }

    pub fn field(&mut self, package: PackageId, name: &str, ty: TypeRef, embedded: bool) -> SymbolId {
        self.store.add_symbol(Symbol {
            name: name.into(),
            kind: SymbolKind::Field { embedded },
            ty: Some(ty),
            package: Some(package),
            pos: 0,
        })
    }

    /// Struct of plain (non-embedded) fields owned by `package`.
    pub fn struct_type(&mut self, package: PackageId, fields: &[(&str, TypeRef)]) -> TypeRef {
        let fields = fields
            .iter()
            .map(|(name, ty)| self.field(package, name, ty.clone(), false))
            .collect();
        Self::struct_of(fields)
    }

    pub fn struct_of(fields: Vec<SymbolId>) -> TypeRef {
        TypeRef::Struct(StructType { fields }.into())
    }

    pub fn interface_method(&mut self, package: PackageId, name: &str, sig: Signature) -> SymbolId {
        self.store.add_symbol(Symbol {
            name: name.into(),
            kind: SymbolKind::Func,
            ty: Some(TypeRef::signature(sig)),
            package: Some(package),
            pos: 0,
        })
    }

    pub fn interface_of(methods: Vec<SymbolId>) -> TypeRef {
        TypeRef::Interface(InterfaceType { methods }.into())
    }

    // ---- syntax ----

    pub fn node(&mut self, kind: NodeKind, span: Span) -> NodeId {
        self.syntax.push(Node { span, kind })
    }

    fn span(&self, id: NodeId) -> Span {
        self.syntax.span(id)
    }

    fn cover(&self, start: Span, ids: &[NodeId]) -> Span {
        ids.iter().fold(start, |acc, id| acc.cover(self.span(*id)))
    }

    pub fn ident(&mut self, name: &str, at: usize) -> NodeId {
        self.node(
            NodeKind::Ident { name: name.into() },
            Span::new(at, at + name.len()),
        )
    }

    /// Identifier at the `nth` occurrence of `name` in the source.
    pub fn ident_nth(&mut self, name: &str, nth: usize) -> Option<NodeId> {
        let at = self.pos_nth(name, nth)?;
        Some(self.ident(name, at))
    }

    pub fn basic_lit(&mut self, kind: LitKind, span: Span) -> NodeId {
        self.node(NodeKind::BasicLit { kind }, span)
    }

    pub fn package_clause(&mut self, keyword: usize, name: NodeId) -> NodeId {
        let span = self.cover(Span::empty(keyword), &[name]);
        self.node(NodeKind::PackageClause { name }, span)
    }

    pub fn file(&mut self, package: NodeId, decls: Vec<NodeId>) -> NodeId {
        let span = Span::new(0, self.source.len());
        self.node(NodeKind::File { package, decls }, span)
    }

    pub fn comment(&mut self, span: Span) {
        self.syntax.add_comment(span);
    }

    pub fn gen_decl(&mut self, keyword: usize, specs: Vec<NodeId>) -> NodeId {
        let span = self.cover(Span::new(keyword, keyword + 3), &specs);
        self.node(NodeKind::GenDecl { specs }, span)
    }

    pub fn value_spec(
        &mut self,
        names: Vec<NodeId>,
        ty: Option<NodeId>,
        values: Vec<NodeId>,
    ) -> NodeId {
        let first = names.first().map(|n| self.span(*n)).unwrap_or_default();
        let mut all = names.clone();
        all.extend(ty);
        all.extend(values.iter().copied());
        let span = self.cover(first, &all);
        self.node(NodeKind::ValueSpec { names, ty, values }, span)
    }

    pub fn type_spec(&mut self, name: NodeId, ty: NodeId) -> NodeId {
        let span = self.cover(self.span(name), &[ty]);
        self.node(NodeKind::TypeSpec { name, ty }, span)
    }

    pub fn field_node(&mut self, names: Vec<NodeId>, ty: NodeId) -> NodeId {
        let start = names.first().map(|n| self.span(*n)).unwrap_or(self.span(ty));
        let span = self.cover(start, &[ty]);
        self.node(NodeKind::Field { names, ty }, span)
    }

    /// `start` is the `func` keyword (or the opening paren of the parameter
    /// list in a declaration), `end` is one past the signature.
    pub fn func_type(
        &mut self,
        start: usize,
        params: Vec<NodeId>,
        results: Vec<NodeId>,
        end: usize,
    ) -> NodeId {
        self.node(NodeKind::FuncType { params, results }, Span::new(start, end))
    }

    pub fn func_decl(
        &mut self,
        keyword: usize,
        recv: Option<NodeId>,
        name: NodeId,
        ty: NodeId,
        body: Option<NodeId>,
    ) -> NodeId {
        let mut parts = vec![name, ty];
        parts.extend(recv);
        parts.extend(body);
        let span = self.cover(Span::new(keyword, keyword + 4), &parts);
        self.node(
            NodeKind::FuncDecl {
                recv,
                name,
                ty,
                body,
            },
            span,
        )
    }

    pub fn func_lit(&mut self, ty: NodeId, body: NodeId) -> NodeId {
        let span = self.cover(self.span(ty), &[body]);
        self.node(NodeKind::FuncLit { ty, body }, span)
    }

    pub fn block(&mut self, stmts: Vec<NodeId>, lbrace: usize, rbrace: usize) -> NodeId {
        self.node(
            NodeKind::Block {
                stmts,
                lbrace,
                rbrace,
            },
            Span::new(lbrace, rbrace + 1),
        )
    }

    pub fn expr_stmt(&mut self, x: NodeId) -> NodeId {
        let span = self.span(x);
        self.node(NodeKind::ExprStmt { x }, span)
    }

    pub fn decl_stmt(&mut self, decl: NodeId) -> NodeId {
        let span = self.span(decl);
        self.node(NodeKind::DeclStmt { decl }, span)
    }

    pub fn assign(
        &mut self,
        lhs: Vec<NodeId>,
        rhs: Vec<NodeId>,
        tok_pos: usize,
        define: bool,
    ) -> NodeId {
        let tok = Span::new(tok_pos, tok_pos + if define { 2 } else { 1 });
        let mut all = lhs.clone();
        all.extend(rhs.iter().copied());
        let span = self.cover(tok, &all);
        self.node(
            NodeKind::Assign {
                lhs,
                rhs,
                tok_pos,
                define,
            },
            span,
        )
    }

    pub fn ret(&mut self, keyword: usize, results: Vec<NodeId>) -> NodeId {
        let span = self.cover(Span::new(keyword, keyword + 6), &results);
        self.node(NodeKind::Return { results }, span)
    }

    pub fn if_stmt(
        &mut self,
        keyword: usize,
        init: Option<NodeId>,
        cond: NodeId,
        body: NodeId,
        els: Option<NodeId>,
    ) -> NodeId {
        let mut parts = vec![cond, body];
        parts.extend(init);
        parts.extend(els);
        let span = self.cover(Span::new(keyword, keyword + 2), &parts);
        self.node(
            NodeKind::If {
                init,
                cond,
                body,
                els,
            },
            span,
        )
    }

    pub fn for_stmt(
        &mut self,
        keyword: usize,
        init: Option<NodeId>,
        cond: Option<NodeId>,
        post: Option<NodeId>,
        body: NodeId,
    ) -> NodeId {
        let mut parts = vec![body];
        parts.extend(init);
        parts.extend(cond);
        parts.extend(post);
        let span = self.cover(Span::new(keyword, keyword + 3), &parts);
        self.node(
            NodeKind::For {
                init,
                cond,
                post,
                body,
            },
            span,
        )
    }

    pub fn range_stmt(
        &mut self,
        keyword: usize,
        key: Option<NodeId>,
        value: Option<NodeId>,
        x: NodeId,
        body: NodeId,
    ) -> NodeId {
        let mut parts = vec![x, body];
        parts.extend(key);
        parts.extend(value);
        let span = self.cover(Span::new(keyword, keyword + 3), &parts);
        self.node(
            NodeKind::Range {
                key,
                value,
                x,
                body,
            },
            span,
        )
    }

    pub fn switch_stmt(
        &mut self,
        keyword: usize,
        init: Option<NodeId>,
        tag: Option<NodeId>,
        body: NodeId,
    ) -> NodeId {
        let mut parts = vec![body];
        parts.extend(init);
        parts.extend(tag);
        let span = self.cover(Span::new(keyword, keyword + 6), &parts);
        self.node(NodeKind::Switch { init, tag, body }, span)
    }

    pub fn type_switch(
        &mut self,
        keyword: usize,
        init: Option<NodeId>,
        assign: NodeId,
        body: NodeId,
    ) -> NodeId {
        let mut parts = vec![assign, body];
        parts.extend(init);
        let span = self.cover(Span::new(keyword, keyword + 6), &parts);
        self.node(NodeKind::TypeSwitch { init, assign, body }, span)
    }

    pub fn case_clause(
        &mut self,
        keyword: usize,
        list: Vec<NodeId>,
        colon: usize,
        body: Vec<NodeId>,
    ) -> NodeId {
        let mut parts = list.clone();
        parts.extend(body.iter().copied());
        let span = self.cover(Span::new(keyword, colon + 1), &parts);
        self.node(NodeKind::CaseClause { list, body, colon }, span)
    }

    pub fn send(&mut self, chan: NodeId, value: NodeId, arrow: usize) -> NodeId {
        let span = self.cover(self.span(chan), &[value]);
        self.node(NodeKind::Send { chan, value, arrow }, span)
    }

    pub fn go_stmt(&mut self, keyword: usize, call: NodeId) -> NodeId {
        let span = self.cover(Span::new(keyword, keyword + 2), &[call]);
        self.node(NodeKind::Go { call }, span)
    }

    pub fn defer_stmt(&mut self, keyword: usize, call: NodeId) -> NodeId {
        let span = self.cover(Span::new(keyword, keyword + 5), &[call]);
        self.node(NodeKind::Defer { call }, span)
    }

    pub fn selector(&mut self, x: NodeId, sel: NodeId) -> NodeId {
        let span = self.cover(self.span(x), &[sel]);
        self.node(NodeKind::Selector { x, sel }, span)
    }

    pub fn call(&mut self, fun: NodeId, args: Vec<NodeId>, lparen: usize, rparen: usize) -> NodeId {
        let span = Span::new(self.span(fun).start, rparen + 1);
        self.node(
            NodeKind::Call {
                fun,
                args,
                lparen,
                rparen,
                ellipsis: None,
            },
            span,
        )
    }

    pub fn index(&mut self, x: NodeId, index: NodeId, lbrack: usize, rbrack: usize) -> NodeId {
        let span = Span::new(self.span(x).start, rbrack + 1);
        self.node(
            NodeKind::Index {
                x,
                index,
                lbrack,
                rbrack,
            },
            span,
        )
    }

    pub fn slice_expr(
        &mut self,
        x: NodeId,
        low: Option<NodeId>,
        high: Option<NodeId>,
        lbrack: usize,
        rbrack: usize,
    ) -> NodeId {
        let span = Span::new(self.span(x).start, rbrack + 1);
        self.node(
            NodeKind::Slice {
                x,
                low,
                high,
                max: None,
                lbrack,
                rbrack,
            },
            span,
        )
    }

    pub fn star(&mut self, at: usize, x: NodeId) -> NodeId {
        let span = self.cover(Span::new(at, at + 1), &[x]);
        self.node(NodeKind::Star { x }, span)
    }

    pub fn unary(&mut self, op: UnaryOp, at: usize, x: NodeId) -> NodeId {
        let span = self.cover(Span::new(at, at + 1), &[x]);
        self.node(NodeKind::Unary { op, x }, span)
    }

    pub fn binary(&mut self, op: BinaryOp, x: NodeId, y: NodeId, op_pos: usize) -> NodeId {
        let span = self.cover(self.span(x), &[y]);
        self.node(NodeKind::Binary { op, x, y, op_pos }, span)
    }

    pub fn paren(&mut self, lparen: usize, x: NodeId, rparen: usize) -> NodeId {
        self.node(NodeKind::Paren { x }, Span::new(lparen, rparen + 1))
    }

    pub fn composite_lit(
        &mut self,
        ty: Option<NodeId>,
        elts: Vec<NodeId>,
        lbrace: usize,
        rbrace: usize,
    ) -> NodeId {
        let start = ty.map(|t| self.span(t).start).unwrap_or(lbrace);
        self.node(
            NodeKind::CompositeLit {
                ty,
                elts,
                lbrace,
                rbrace,
            },
            Span::new(start, rbrace + 1),
        )
    }

    pub fn key_value(&mut self, key: NodeId, value: NodeId, colon: usize) -> NodeId {
        let span = self.cover(self.span(key), &[value]);
        self.node(NodeKind::KeyValue { key, value, colon }, span)
    }

    pub fn type_assert(
        &mut self,
        x: NodeId,
        ty: Option<NodeId>,
        lparen: usize,
        rparen: usize,
    ) -> NodeId {
        let span = Span::new(self.span(x).start, rparen + 1);
        self.node(
            NodeKind::TypeAssert {
                x,
                ty,
                lparen,
                rparen,
            },
            span,
        )
    }

    // ---- type info ----

    pub fn set_type(&mut self, node: NodeId, ty: TypeRef) {
        self.record(node, ty, ExprMode::Value);
    }

    pub fn set_type_expr(&mut self, node: NodeId, ty: TypeRef) {
        self.record(node, ty, ExprMode::TypeExpr);
    }

    pub fn record(&mut self, node: NodeId, ty: TypeRef, mode: ExprMode) {
        self.info.types.insert(node, TypeAndValue { ty, mode });
    }

    pub fn def(&mut self, node: NodeId, symbol: SymbolId) {
        self.info.defs.insert(node, symbol);
    }

    pub fn use_symbol(&mut self, node: NodeId, symbol: SymbolId) {
        self.info.uses.insert(node, symbol);
    }

    pub fn finish(mut self, root: NodeId) -> CheckedPackage {
        self.syntax.set_root(root);
        CheckedPackage {
            package: self.package,
            file_path: self.file_path,
            source: self.source,
            store: self.store,
            syntax: self.syntax,
            scopes: self.scopes,
            info: self.info,
            imports: self.imports,
        }
    }
}

fn populate_universe(store: &mut TypeStore, scopes: &mut ScopeTree) {
    let universe = scopes.universe();
    let mut declare = |store: &mut TypeStore, name: &str, kind: SymbolKind, ty: Option<TypeRef>| {
        let id = store.add_symbol(Symbol {
            name: name.into(),
            kind,
            ty,
            package: None,
            pos: 0,
        });
        scopes.insert(universe, name, id);
        id
    };

    for (name, kind) in UNIVERSE_TYPES {
        declare(
            store,
            name,
            SymbolKind::TypeName,
            Some(TypeRef::Basic(*kind)),
        );
    }
    declare(
        store,
        "any",
        SymbolKind::TypeName,
        Some(TypeRef::empty_interface()),
    );

    // error is the one named universe type: interface{ Error() string }
    let error_obj = declare(store, "error", SymbolKind::TypeName, None);
    let error_method = store.add_symbol(Symbol {
        name: "Error".into(),
        kind: SymbolKind::Func,
        ty: None,
        package: None,
        pos: 0,
    });
    let error_id = store.add_named(NamedType {
        obj: error_obj,
        underlying: TypeRef::Interface(
            InterfaceType {
                methods: vec![error_method],
            }
            .into(),
        ),
        methods: Vec::new(),
    });
    let error_ty = TypeRef::Named(error_id);
    store.symbol_mut(error_obj).ty = Some(error_ty.clone());
    store.symbol_mut(error_method).ty = Some(TypeRef::signature(
        Signature::new(
            vec![],
            vec![Param::unnamed(TypeRef::Basic(BasicKind::String))],
        )
        .with_recv(Param::unnamed(error_ty)),
    ));

    for name in ["true", "false"] {
        declare(
            store,
            name,
            SymbolKind::Const,
            Some(TypeRef::Basic(BasicKind::UntypedBool)),
        );
    }
    declare(
        store,
        "iota",
        SymbolKind::Const,
        Some(TypeRef::Basic(BasicKind::UntypedInt)),
    );
    declare(
        store,
        "nil",
        SymbolKind::Nil,
        Some(TypeRef::Basic(BasicKind::UntypedNil)),
    );
    for name in UNIVERSE_FUNCS {
        declare(store, name, SymbolKind::Builtin, None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn universe_is_populated() {
        let b = PackageBuilder::new("main", "example.com/app", "package main\n");
        assert_eq!(b.universe_type("int"), TypeRef::Basic(BasicKind::Int));
        assert_eq!(b.universe_type("byte"), TypeRef::Basic(BasicKind::Uint8));
        assert!(matches!(b.universe_type("error"), TypeRef::Named(_)));
        let append = b.universe_symbol("append").unwrap();
        assert_eq!(b.store().symbol(append).kind, SymbolKind::Builtin);
        assert!(b.store().symbol(append).is_universe());
    }

    #[test]
    fn methods_attach_to_named_types() {
        let mut b = PackageBuilder::new("main", "example.com/app", "package main\n");
        let file = b.file_scope();
        let t = b.named_type(file, "T", TypeRef::Struct(Default::default()), 0);
        let m = b.method(&t, "Close", Signature::default(), true);

        let TypeRef::Named(id) = t else {
            panic!("expected named type");
        };
        assert_eq!(b.store().named(id).methods, vec![m]);
        let sym = b.store().symbol(m);
        assert_eq!(sym.package, Some(b.current()));
        let Some(TypeRef::Signature(sig)) = &sym.ty else {
            panic!("expected signature");
        };
        assert!(matches!(sig.recv.as_ref().map(|r| &r.ty), Some(TypeRef::Pointer(_))));
    }

    #[test]
    fn composite_spans_cover_children() {
        let src = "package main\nvar x = f(a)\n";
        let mut b = PackageBuilder::new("main", "example.com/app", src);
        let f = b.ident_nth("f", 0).unwrap();
        let a = b.ident_nth("a", 4).unwrap();
        let lparen = b.pos("(").unwrap();
        let call = b.call(f, vec![a], lparen, lparen + 2);
        assert_eq!(b.span(call).text(src), "f(a)");
    }
}
