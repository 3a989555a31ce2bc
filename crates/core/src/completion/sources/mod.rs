//! Candidate sources. Each one queues candidates for the deep search or
//! pushes finished items.

mod comments;
mod keywords;
mod lexical;
mod literal;
mod postfix;
mod selector;
mod statements;
mod struct_literal;
pub(crate) mod unimported;

use burrow_api::{NodeId, NodeKind, Span, SymbolKind};
use tracing::debug;

use super::context::Completer;

/// What kind of completion the cursor position calls for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Plan {
    /// Word inside a comment.
    Comment(Span),
    /// Name of the `package` clause.
    PackageClause,
    /// `x.<>`
    Selector { x: NodeId },
    /// Field names of a struct literal.
    StructFields,
    Lexical,
}

impl Completer<'_> {
    /// Picks the source for this position. `None` when nothing should be
    /// offered, e.g. on a defining identifier.
    pub(crate) fn plan(&self) -> Option<Plan> {
        if let Some(comment) = self.syntax.comment_at(self.offset) {
            return Some(Plan::Comment(comment));
        }
        let first = *self.path.first()?;
        let parent = self.path.get(1).copied();

        if let Some(parent) = parent
            && let NodeKind::PackageClause { name } = self.kind(parent)
            && *name == first
        {
            return Some(Plan::PackageClause);
        }
        if self.want_struct_field_completions() {
            return Some(Plan::StructFields);
        }

        match self.kind(first) {
            NodeKind::Ident { .. } => {
                if let Some(sel) = parent
                    && let NodeKind::Selector { x, sel: name } = self.kind(sel)
                    && *name == first
                {
                    return Some(Plan::Selector { x: *x });
                }
                if self.is_definition(first) {
                    debug!(offset = self.offset, "cursor on a definition");
                    return None;
                }
                Some(Plan::Lexical)
            }
            NodeKind::Selector { x, .. } => Some(Plan::Selector { x: *x }),
            _ => Some(Plan::Lexical),
        }
    }

    /// Defining identifiers get nothing, except embedded fields, which
    /// also name a type.
    fn is_definition(&self, ident: NodeId) -> bool {
        let Some(&sym) = self.info.defs.get(&ident) else {
            return false;
        };
        !matches!(
            self.store.symbol(sym).kind,
            SymbolKind::Field { embedded: true }
        )
    }

    /// Runs the local sources of `plan`.
    pub(crate) fn collect(&mut self, plan: Plan) {
        match plan {
            Plan::Comment(comment) => self.comment_candidates(comment),
            Plan::PackageClause => self.package_clause_candidates(),
            Plan::Selector { x } => self.selector(x),
            Plan::StructFields => {
                // a key position cannot hold a deep expression
                if self.comp_lit.as_ref().is_some_and(|cl| cl.in_key) {
                    self.deep.enabled = false;
                }
                self.struct_literal_field_names();
            }
            Plan::Lexical => {
                self.lexical();
                if self.options.keywords {
                    self.keywords();
                }
            }
        }
    }
}
