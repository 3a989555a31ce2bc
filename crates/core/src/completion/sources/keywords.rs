use std::collections::HashSet;

use burrow_api::{CompletionItem, NodeKind};
use lsp_types::CompletionItemKind;

use crate::completion::context::Completer;

const KEYWORDS: &[&str] = &[
    "break",
    "case",
    "chan",
    "const",
    "continue",
    "default",
    "defer",
    "else",
    "fallthrough",
    "for",
    "func",
    "go",
    "goto",
    "if",
    "import",
    "interface",
    "map",
    "package",
    "range",
    "return",
    "select",
    "struct",
    "switch",
    "type",
    "var",
];

pub(crate) fn is_keyword(word: &str) -> bool {
    KEYWORDS.contains(&word)
}

impl Completer<'_> {
    /// Keywords that can start the code at the cursor.
    pub(crate) fn keywords(&mut self) {
        let mut seen = HashSet::new();
        let (std, high) = (self.policy.std_score, self.policy.high_score);

        if self.want_type_name() && self.inference.obj_type.is_none() {
            // declaring a named type usually means a struct or interface
            let in_type_spec = self
                .path
                .get(1)
                .is_some_and(|&p| matches!(self.kind(p), NodeKind::TypeSpec { .. }));
            let (struct_intf, func_chan_map) = if in_type_spec { (high, std) } else { (std, high) };
            self.add_keywords(&mut seen, struct_intf, &["struct", "interface"]);
            self.add_keywords(&mut seen, func_chan_map, &["func", "chan", "map"]);
        }

        let Some(&first) = self.path.first() else {
            return;
        };
        let parent = self.path.get(1).copied();
        if parent.is_none_or(|p| matches!(self.kind(p), NodeKind::File { .. })) {
            self.add_keywords(&mut seen, std, &["type", "func", "var", "const", "import"]);
            return;
        }
        if !matches!(self.kind(first), NodeKind::Ident { .. }) {
            return;
        }

        // "for i := r<>" has not become a range clause yet
        if let Some(&outer) = self.path.get(2)
            && let NodeKind::For { init: Some(init), .. } = self.kind(outer)
            && self.contains(*init)
        {
            self.add_keywords(&mut seen, std, &["range"]);
        }

        // only at the start of a statement
        match parent.map(|p| self.kind(p)) {
            Some(NodeKind::Block { .. } | NodeKind::ExprStmt { .. }) => {}
            Some(NodeKind::CaseClause { colon, .. }) if self.offset > *colon => {}
            _ => return,
        }

        let outer: Vec<_> = self.path[1..].to_vec();
        for (i, &node) in outer.iter().enumerate() {
            match self.kind(node) {
                NodeKind::CaseClause { colon, .. } => {
                    if self.offset > *colon {
                        self.add_keywords(&mut seen, std, &["break"]);
                        // clause, switch body, switch
                        if let Some(&switch) = outer.get(i + 2)
                            && matches!(self.kind(switch), NodeKind::Switch { .. })
                        {
                            self.add_keywords(&mut seen, std, &["fallthrough"]);
                        }
                    }
                }
                NodeKind::Switch { .. } | NodeKind::TypeSwitch { .. } => {
                    self.add_keywords(&mut seen, std, &["case", "default"]);
                }
                NodeKind::For { .. } | NodeKind::Range { .. } => {
                    self.add_keywords(&mut seen, std, &["break", "continue"]);
                }
                NodeKind::FuncDecl { body: Some(body), .. } | NodeKind::FuncLit { body, .. } => {
                    if let NodeKind::Block { lbrace, .. } = self.kind(*body)
                        && self.offset > *lbrace
                    {
                        self.add_keywords(
                            &mut seen,
                            std,
                            &[
                                "defer", "return", "for", "go", "switch", "select", "if", "else",
                                "var", "const", "goto", "type",
                            ],
                        );
                    }
                }
                _ => {}
            }
        }
    }

    fn add_keywords(&mut self, seen: &mut HashSet<&'static str>, score: f64, keywords: &[&'static str]) {
        for &kw in keywords {
            if !seen.insert(kw) {
                continue;
            }
            let match_score = self.matcher.score(kw);
            if match_score > 0.0 {
                self.items.push(CompletionItem::new(
                    kw,
                    CompletionItemKind::KEYWORD,
                    score * match_score,
                ));
            }
        }
    }

    /// The package's own name, and `main`.
    pub(crate) fn package_clause_candidates(&mut self) {
        self.package_completion = true;
        let current = self.store.package(self.view.package()).name.to_string();
        let mut names = vec![(current, self.policy.high_score)];
        if names[0].0 != "main" {
            names.push(("main".to_string(), self.policy.std_score));
        }
        for (name, score) in names {
            let match_score = self.matcher.score(&name);
            if match_score > 0.0 {
                self.items.push(CompletionItem::new(
                    name,
                    CompletionItemKind::MODULE,
                    score * match_score,
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::is_keyword;

    #[test]
    fn keyword_lookup() {
        assert!(is_keyword("range"));
        assert!(is_keyword("map"));
        assert!(!is_keyword("int"));
        assert!(!is_keyword("err"));
    }
}
