//! Per-request completion state.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use burrow_api::{
    CompletionItem, CompletionRequest, ImportScorer, NodeId, NodeKind, PackageView, Selection,
    Signature, Span, SymbolId, SyntaxTree, TriggerKind, TypeInfo, TypeRef, TypeStore,
    WorkspaceIndex,
};
use once_cell::sync::Lazy;
use regex::Regex;
use tokio_util::sync::CancellationToken;

use super::candidate::{Candidate, ObjKey};
use super::inference::Inference;
use super::matcher::FuzzyMatcher;
use super::sources::unimported::Importable;
use crate::config::{CompletionOptions, ScoringPolicy};
use crate::types::{TypeFormatter, TypeOps};

static COMMENT_WORD: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"[\p{L}\p{N}_]+").ok());

/// Function or function literal around the cursor.
pub(crate) struct EnclosingFunc {
    pub sig: Arc<Signature>,
}

/// Composite literal whose braces contain the cursor.
pub(crate) struct CompLitInfo {
    pub lit: NodeId,
    /// Underlying literal type, one pointer level removed.
    pub ty: TypeRef,
    /// Key-value element holding the cursor.
    pub kv: Option<NodeId>,
    pub in_key: bool,
    /// `T{<>}` may become a field name or a value.
    pub maybe_in_field_name: bool,
}

/// Two-generation queue of the deep search.
#[derive(Default)]
pub(crate) struct DeepState {
    pub this_gen: Vec<Candidate>,
    pub next_gen: Vec<Candidate>,
    pub enabled: bool,
    pub queue_closed: bool,
    pub candidate_count: usize,
}

impl DeepState {
    pub fn enqueue(&mut self, cand: Candidate) {
        self.next_gen.push(cand);
    }
}

/// Collaborators the request reads from.
pub(crate) struct Collaborators<'a> {
    pub index: &'a dyn WorkspaceIndex,
    pub scorer: &'a dyn ImportScorer,
}

pub(crate) struct Completer<'a> {
    pub view: &'a dyn PackageView,
    pub store: &'a TypeStore,
    pub syntax: &'a SyntaxTree,
    pub info: &'a TypeInfo,
    pub ops: TypeOps<'a>,
    pub types: TypeFormatter<'a>,
    pub options: &'a CompletionOptions,
    pub policy: &'a ScoringPolicy,
    pub collab: Collaborators<'a>,
    pub offset: usize,
    pub trigger: TriggerKind,
    /// Innermost node first.
    pub path: Vec<NodeId>,
    pub surrounding: Selection,
    pub matcher: FuzzyMatcher,
    pub enclosing_func: Option<EnclosingFunc>,
    pub comp_lit: Option<CompLitInfo>,
    pub inference: Inference,
    pub deep: DeepState,
    pub seen: HashSet<ObjKey>,
    /// Importable packages looked up for a package name, once per request.
    pub importable: Option<(String, Arc<Importable>)>,
    pub items: Vec<CompletionItem>,
    pub comment_completion: bool,
    pub package_completion: bool,
    pub cancel: &'a CancellationToken,
    pub start: Instant,
    pub deadline: Instant,
}

impl<'a> Completer<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        view: &'a dyn PackageView,
        request: &CompletionRequest,
        path: Vec<NodeId>,
        options: &'a CompletionOptions,
        collab: Collaborators<'a>,
        cancel: &'a CancellationToken,
        start: Instant,
    ) -> Self {
        let store = view.store();
        let syntax = view.syntax();
        let surrounding = ident_selection(syntax, view.source(), &path, request.offset);
        let mut completer = Self {
            view,
            store,
            syntax,
            info: view.info(),
            ops: TypeOps::new(store),
            types: TypeFormatter::new(store, view.package()),
            options,
            policy: &options.scoring,
            collab,
            offset: request.offset,
            trigger: request.trigger,
            path,
            matcher: FuzzyMatcher::new(&surrounding.prefix),
            surrounding,
            enclosing_func: None,
            comp_lit: None,
            inference: Inference::default(),
            deep: DeepState {
                enabled: options.deep,
                ..DeepState::default()
            },
            seen: HashSet::new(),
            importable: None,
            items: Vec::new(),
            comment_completion: false,
            package_completion: false,
            cancel,
            start,
            deadline: start + options.budget(),
        };
        completer.enclosing_func = completer.find_enclosing_func();
        completer.comp_lit = completer.find_enclosing_comp_lit();
        completer.inference = completer.expected_candidate();
        completer
    }

    // ---- lookups ----

    pub fn kind(&self, node: NodeId) -> &'a NodeKind {
        self.syntax.kind(node)
    }

    pub fn span(&self, node: NodeId) -> Span {
        self.syntax.span(node)
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.span(node).contains(self.offset)
    }

    pub fn type_of(&self, node: NodeId) -> Option<TypeRef> {
        self.info.type_of(node, self.store)
    }

    pub fn object_of(&self, node: NodeId) -> Option<SymbolId> {
        self.info.object_of(node)
    }

    pub fn text(&self, node: NodeId) -> &'a str {
        self.span(node).text(self.view.source())
    }

    /// Whether the expression denotes an addressable value.
    pub fn is_addressable(&self, node: NodeId) -> bool {
        match self.kind(node) {
            NodeKind::Ident { .. } => self
                .object_of(node)
                .is_some_and(|s| self.store.symbol(s).is_var()),
            NodeKind::Selector { x, sel } => {
                let field = self
                    .object_of(*sel)
                    .is_some_and(|s| self.store.symbol(s).is_field());
                field
                    && (self.is_addressable(*x)
                        || self.type_of(*x).is_some_and(|t| self.ops.is_pointer(&t)))
            }
            // map elements and string bytes never are
            NodeKind::Index { x, .. } => self.type_of(*x).is_some_and(|t| match self.ops.under(&t) {
                TypeRef::Slice(_) => true,
                TypeRef::Array { .. } => self.is_addressable(*x),
                TypeRef::Pointer(elem) => matches!(self.ops.under(elem), TypeRef::Array { .. }),
                _ => false,
            }),
            NodeKind::Star { .. } => true,
            NodeKind::Paren { x } => self.is_addressable(*x),
            _ => false,
        }
    }

    /// Symbols named by a selector chain such as `a.b().c`, outermost first.
    pub fn obj_chain(&self, expr: NodeId) -> Vec<SymbolId> {
        let mut out = Vec::new();
        let mut current = Some(expr);
        while let Some(node) = current {
            match self.kind(node) {
                NodeKind::Ident { .. } => {
                    let Some(sym) = self.object_of(node) else {
                        return Vec::new();
                    };
                    out.push(sym);
                    current = None;
                }
                NodeKind::Selector { x, sel } => {
                    let Some(sym) = self.object_of(*sel) else {
                        return Vec::new();
                    };
                    out.push(sym);
                    current = Some(*x);
                }
                NodeKind::Call { fun, args, .. } if args.is_empty() => current = Some(*fun),
                _ => return Vec::new(),
            }
        }
        out.reverse();
        out
    }

    /// Selector whose name the cursor is completing.
    pub fn enclosing_selector(&self) -> Option<NodeId> {
        let first = *self.path.first()?;
        if let NodeKind::Selector { .. } = self.kind(first) {
            return Some(first);
        }
        let parent = *self.path.get(1)?;
        match self.kind(parent) {
            NodeKind::Selector { sel, .. } if *sel == first => Some(parent),
            _ => None,
        }
    }

    pub fn want_type_name(&self) -> bool {
        self.inference.type_name.want_type_name
    }

    pub fn want_struct_field_completions(&self) -> bool {
        self.comp_lit.as_ref().is_some_and(|cl| {
            matches!(self.ops.under(&cl.ty), TypeRef::Struct(_)) && (cl.in_key || cl.maybe_in_field_name)
        })
    }

    fn find_enclosing_func(&self) -> Option<EnclosingFunc> {
        for &node in &self.path {
            match self.kind(node) {
                NodeKind::FuncDecl { name, body, .. } => {
                    // the signature only counts once we are inside the body
                    if !body.is_some_and(|b| self.contains(b)) {
                        return None;
                    }
                    let sym = self.object_of(*name)?;
                    return self
                        .ops
                        .symbol_type(sym)
                        .and_then(|t| self.ops.signature(t))
                        .map(|sig| EnclosingFunc { sig });
                }
                NodeKind::FuncLit { body, .. } => {
                    if !self.contains(*body) {
                        continue;
                    }
                    return self
                        .type_of(node)
                        .and_then(|t| self.ops.signature(&t))
                        .map(|sig| EnclosingFunc { sig });
                }
                _ => {}
            }
        }
        None
    }

    fn find_enclosing_comp_lit(&self) -> Option<CompLitInfo> {
        for &node in &self.path {
            match self.kind(node) {
                NodeKind::CompositeLit {
                    elts, lbrace, rbrace, ..
                } => {
                    if !(*lbrace < self.offset && self.offset <= *rbrace) {
                        // "Foo{B: Ba<>{}}" is still inside the outer literal
                        continue;
                    }
                    let lit_ty = self.type_of(node)?;
                    let unpointered = self.ops.pointer_elem(&lit_ty).unwrap_or(lit_ty);
                    let ty = self.ops.under(&unpointered).clone();

                    let mut expr = None;
                    let mut kv = None;
                    let mut has_keys = false;
                    for &el in elts {
                        if self.contains(el) {
                            expr = Some(el);
                        }
                        if let NodeKind::KeyValue { .. } = self.kind(el) {
                            has_keys = true;
                            if expr == Some(el) {
                                kv = Some(el);
                                break;
                            }
                        }
                    }

                    let mut info = CompLitInfo {
                        lit: node,
                        ty,
                        kv,
                        in_key: false,
                        maybe_in_field_name: false,
                    };
                    if let Some(kv) = kv {
                        if let NodeKind::KeyValue { colon, .. } = self.kind(kv) {
                            info.in_key = self.offset <= *colon;
                        }
                    } else if has_keys {
                        info.in_key = true;
                    } else {
                        match &info.ty {
                            TypeRef::Struct(_) => {
                                info.maybe_in_field_name = match elts.len() {
                                    0 => true,
                                    1 => expr.is_some_and(|e| {
                                        matches!(self.kind(e), NodeKind::Ident { .. })
                                    }),
                                    _ => false,
                                };
                            }
                            TypeRef::Map { .. } => info.in_key = true,
                            _ => {}
                        }
                    }
                    return Some(info);
                }
                _ => {
                    if self.breaks_inference(node) {
                        return None;
                    }
                }
            }
        }
        None
    }

    /// Nodes past which the expected type of an inner position says
    /// nothing about the outer one.
    pub fn breaks_inference(&self, node: NodeId) -> bool {
        match self.kind(node) {
            NodeKind::CompositeLit { ty, .. } => ty.is_none_or(|t| !self.contains(t)),
            NodeKind::Call { fun, .. } => !self.contains(*fun),
            NodeKind::FuncLit { .. } | NodeKind::Index { .. } | NodeKind::Slice { .. } => true,
            _ => false,
        }
    }

    /// Replaces the selection with the word around the cursor in a comment.
    pub fn select_comment_word(&mut self, comment: Span) {
        let source = self.view.source();
        let text = comment.text(source);
        let cursor = self.offset.saturating_sub(comment.start);
        let word = COMMENT_WORD.as_ref().and_then(|re| {
            re.find_iter(text)
                .find(|m| m.start() <= cursor && cursor <= m.end())
        });
        self.surrounding = match word {
            Some(m) => Selection {
                span: Span::new(comment.start + m.start(), comment.start + m.end()),
                prefix: text.get(m.start()..cursor).unwrap_or_default().to_string(),
            },
            None => Selection {
                span: Span::empty(self.offset),
                prefix: String::new(),
            },
        };
        self.matcher = FuzzyMatcher::new(&self.surrounding.prefix);
    }

    pub fn past_deadline(&self) -> bool {
        Instant::now() >= self.deadline
    }
}

/// Identifier containing the cursor, or an empty selection at the cursor.
fn ident_selection(syntax: &SyntaxTree, source: &str, path: &[NodeId], offset: usize) -> Selection {
    if let Some(&first) = path.first()
        && let NodeKind::Ident { .. } = syntax.kind(first)
    {
        let span = syntax.span(first);
        return Selection {
            span,
            prefix: source.get(span.start..offset).unwrap_or_default().to_string(),
        };
    }
    Selection {
        span: Span::empty(offset),
        prefix: String::new(),
    }
}
