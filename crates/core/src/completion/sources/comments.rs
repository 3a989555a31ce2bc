use burrow_api::{NodeId, NodeKind, Span, TriggerKind, TypeRef};

use crate::completion::candidate::{Candidate, Obj};
use crate::completion::context::Completer;

impl Completer<'_> {
    /// Names declared by the declaration a comment documents.
    pub(crate) fn comment_candidates(&mut self, comment: Span) {
        if self.trigger == TriggerKind::Character('.') {
            return;
        }
        self.deep.enabled = false;
        self.comment_completion = true;
        self.select_comment_word(comment);

        let Some(root) = self.syntax.root() else {
            return;
        };
        let NodeKind::File { decls, .. } = self.kind(root) else {
            return;
        };
        let comment_line = self.line_of(comment.end);
        for &decl in decls {
            let span = self.span(decl);
            let decl_line = self.line_of(span.start);
            let documents = decl_line == comment_line || decl_line == comment_line + 1;
            let inside = span.start <= comment.start && comment.end <= span.end;
            if !documents && !inside {
                continue;
            }
            match self.kind(decl) {
                NodeKind::GenDecl { specs } => {
                    for &spec in specs {
                        self.spec_candidates(spec, decl_line == comment_line + 1);
                    }
                }
                NodeKind::FuncDecl { recv, name, ty, .. } => {
                    if let Some(recv) = recv {
                        self.field_list_candidates(&[*recv]);
                        self.receiver_field_candidates(*name);
                    }
                    if let NodeKind::FuncType { params, results } = self.kind(*ty) {
                        self.field_list_candidates(params);
                        self.field_list_candidates(results);
                    }
                    if let Some(sym) = self.named_object(*name)
                        && self.store.symbol(sym).package == Some(self.view.package())
                    {
                        self.deep
                            .enqueue(Candidate::new(Obj::Symbol(sym), self.policy.high_score));
                    }
                }
                _ => {}
            }
        }
    }

    fn spec_candidates(&mut self, spec: NodeId, next_line: bool) {
        match self.kind(spec) {
            NodeKind::ValueSpec { names, .. } => {
                for &name in names {
                    if let Some(sym) = self.named_object(name) {
                        self.deep
                            .enqueue(Candidate::new(Obj::Symbol(sym), self.policy.std_score));
                    }
                }
            }
            NodeKind::TypeSpec { name, ty } => {
                match self.kind(*ty) {
                    NodeKind::StructType { fields } => self.field_list_candidates(fields),
                    NodeKind::InterfaceType { methods } => self.field_list_candidates(methods),
                    NodeKind::FuncType { params, results } => {
                        self.field_list_candidates(params);
                        self.field_list_candidates(results);
                    }
                    _ => {}
                }
                // above its fields, below the declaration right under the comment
                let score = if next_line {
                    self.policy.high_score
                } else {
                    self.policy.std_score * 1.1
                };
                if let Some(sym) = self.named_object(*name) {
                    self.deep.enqueue(Candidate::new(Obj::Symbol(sym), score));
                }
            }
            _ => {}
        }
    }

    fn field_list_candidates(&mut self, fields: &[NodeId]) {
        for &field in fields {
            let NodeKind::Field { names, .. } = self.kind(field) else {
                continue;
            };
            for &name in names {
                if let Some(sym) = self.named_object(name) {
                    self.deep
                        .enqueue(Candidate::new(Obj::Symbol(sym), self.policy.std_score));
                }
            }
        }
    }

    /// Fields of a method's receiver struct.
    fn receiver_field_candidates(&mut self, method: NodeId) {
        let Some(recv) = self
            .object_of(method)
            .and_then(|m| self.ops.symbol_type(m))
            .and_then(|t| self.ops.signature(t))
            .and_then(|sig| sig.recv.clone())
        else {
            return;
        };
        let named = self.ops.pointer_elem(&recv.ty).unwrap_or(recv.ty);
        if !matches!(named, TypeRef::Named(_)) {
            return;
        }
        for field in self.ops.fields(&named) {
            self.deep
                .enqueue(Candidate::new(Obj::Symbol(field), self.policy.low_score));
        }
    }

    /// Object an identifier declares, skipping the blank identifier.
    fn named_object(&self, ident: NodeId) -> Option<burrow_api::SymbolId> {
        if self.syntax.ident_name(ident).is_some_and(|n| n == "_") {
            return None;
        }
        self.object_of(ident)
    }

    /// Zero-based line of a byte offset.
    fn line_of(&self, offset: usize) -> usize {
        let source = self.view.source();
        source
            .get(..offset.min(source.len()))
            .unwrap_or_default()
            .matches('\n')
            .count()
    }
}
