use burrow_api::{CompletionItem, NodeId, NodeKind, TypeRef};
use burrow_go::snippet::escape;
use lsp_types::CompletionItemKind;

use crate::completion::context::Completer;

impl Completer<'_> {
    /// Offers `if err != nil { return ..., err }` right after a statement
    /// assigning an error.
    pub(crate) fn statement_candidates(&mut self) {
        if !self.options.snippets {
            return;
        }
        let Some((stmts, idx)) = self.statement_position() else {
            return;
        };
        let Some(&prev) = idx.checked_sub(1).and_then(|i| stmts.get(i)) else {
            return;
        };
        let NodeKind::Assign { lhs, .. } = self.kind(prev) else {
            return;
        };
        let Some(&err) = lhs.last() else {
            return;
        };
        if !matches!(self.kind(err), NodeKind::Ident { .. })
            || !self.type_of(err).is_some_and(|t| self.ops.is_error(&t))
        {
            return;
        }
        let Some(func) = &self.enclosing_func else {
            return;
        };
        let sig = func.sig.clone();
        if !sig.results.last().is_some_and(|r| self.ops.is_error(&r.ty)) {
            return;
        }

        let err_var = self.text(err);
        let mut values: Vec<String> = sig.results[..sig.results.len() - 1]
            .iter()
            .map(|r| escape(&self.zero_value(&r.ty)))
            .collect();
        values.push(format!("${{1:{}}}", escape(err_var)));
        let snippet = format!(
            "if {} != nil {{\n\treturn {}\n}}",
            escape(err_var),
            values.join(", ")
        );
        let label = format!("if {err_var} != nil {{ return {err_var} }}");

        let match_score = self.matcher.score(&label).max(self.matcher.score(err_var));
        if match_score <= 0.0 {
            return;
        }
        self.items.push(
            CompletionItem::new(
                label,
                CompletionItemKind::SNIPPET,
                self.policy.high_score * match_score,
            )
            .with_insert_text(snippet, true),
        );
    }

    /// Statements of the block the cursor starts a statement in, and the
    /// index of that statement.
    fn statement_position(&self) -> Option<(&[NodeId], usize)> {
        let first = *self.path.first()?;
        match self.kind(first) {
            NodeKind::Block { stmts, .. } => {
                let idx = stmts
                    .iter()
                    .take_while(|&&s| self.span(s).end <= self.offset)
                    .count();
                Some((stmts, idx))
            }
            NodeKind::Ident { .. } => {
                let stmt = *self.path.get(1)?;
                if !matches!(self.kind(stmt), NodeKind::ExprStmt { .. }) {
                    return None;
                }
                let NodeKind::Block { stmts, .. } = self.kind(*self.path.get(2)?) else {
                    return None;
                };
                let idx = stmts.iter().position(|&s| s == stmt)?;
                Some((stmts, idx))
            }
            _ => None,
        }
    }

    /// Source text of the zero value of `ty`.
    pub(crate) fn zero_value(&self, ty: &TypeRef) -> String {
        match self.ops.under(ty) {
            TypeRef::Basic(b) if b.is_numeric() => "0".to_string(),
            TypeRef::Basic(b) if b.is_string() => "\"\"".to_string(),
            TypeRef::Basic(b) if b.is_boolean() => "false".to_string(),
            TypeRef::Struct(_) | TypeRef::Array { .. } => format!("{}{{}}", self.types.format(ty)),
            _ => "nil".to_string(),
        }
    }
}
