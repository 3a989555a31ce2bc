//! Turns scored items into the final list: duplicates merged, aliases
//! added, import edits attached, ordered and truncated.

use std::collections::HashMap;
use std::path::Path;

use burrow_api::{CompletionItem, ImportEditor, ImportRequest, TextEdit};
use indexmap::IndexMap;
use indexmap::map::Entry;
use tracing::{debug, warn};

use crate::config::CompletionOptions;

/// Alternative labels for items, e.g. a short name an editor prefers for a
/// well-known function. An alias is offered next to the original item and
/// sorts just above it.
pub trait LabelAliases: Send + Sync {
    fn alias(&self, _item: &CompletionItem) -> Option<String> {
        None
    }
}

/// No aliases at all.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoAliases;

impl LabelAliases for NoAliases {}

/// Fixed table from label to alias.
#[derive(Debug, Default, Clone)]
pub struct StaticAliases {
    table: HashMap<String, String>,
}

impl StaticAliases {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, label: impl Into<String>, alias: impl Into<String>) -> Self {
        self.table.insert(label.into(), alias.into());
        self
    }
}

impl<L: Into<String>, A: Into<String>> FromIterator<(L, A)> for StaticAliases {
    fn from_iter<I: IntoIterator<Item = (L, A)>>(iter: I) -> Self {
        Self {
            table: iter
                .into_iter()
                .map(|(l, a)| (l.into(), a.into()))
                .collect(),
        }
    }
}

impl LabelAliases for StaticAliases {
    fn alias(&self, item: &CompletionItem) -> Option<String> {
        self.table.get(&item.label).cloned()
    }
}

pub(crate) struct Assembler<'a> {
    pub editor: &'a dyn ImportEditor,
    pub aliases: &'a dyn LabelAliases,
    pub options: &'a CompletionOptions,
    pub file: &'a Path,
    pub source: &'a str,
}

impl Assembler<'_> {
    pub fn assemble(&self, items: Vec<CompletionItem>) -> Vec<CompletionItem> {
        let collected = items.len();
        let mut items = self.with_aliases(dedupe(items));
        self.attach_imports(&mut items);
        sort(&mut items);
        if self.options.max_results > 0 {
            items.truncate(self.options.max_results);
        }
        debug!(collected, returned = items.len(), "assembled completion list");
        items
    }

    fn with_aliases(&self, items: Vec<CompletionItem>) -> Vec<CompletionItem> {
        let mut out = Vec::with_capacity(items.len());
        for item in items {
            if let Some(alias) = self.aliases.alias(&item)
                && alias != item.label
            {
                let mut aliased = item.clone();
                aliased.insert_text = aliased.insert_text.replacen(&item.label, &alias, 1);
                aliased.label = alias;
                aliased.score += self.options.scoring.alias_epsilon;
                out.push(aliased);
            }
            out.push(item);
        }
        dedupe(out)
    }

    /// Resolves each distinct import once. Items whose import cannot be
    /// added are dropped.
    fn attach_imports(&self, items: &mut Vec<CompletionItem>) {
        let mut cache: HashMap<ImportRequest, Option<Vec<TextEdit>>> = HashMap::new();
        items.retain_mut(|item| {
            let Some(request) = item.import.take() else {
                return true;
            };
            let edits = cache.entry(request.clone()).or_insert_with(|| {
                match self.editor.import_edits(self.file, self.source, &request) {
                    Ok(edits) => Some(edits),
                    Err(e) => {
                        warn!(path = %request.path, "import edit failed: {e}");
                        None
                    }
                }
            });
            match edits {
                Some(edits) => {
                    item.additional_edits.extend(edits.iter().cloned());
                    true
                }
                None => false,
            }
        });
    }
}

/// One item per (label, insert text), keeping the best score.
fn dedupe(items: Vec<CompletionItem>) -> Vec<CompletionItem> {
    let mut unique: IndexMap<(String, String), CompletionItem> = IndexMap::with_capacity(items.len());
    for item in items {
        match unique.entry((item.label.clone(), item.insert_text.clone())) {
            Entry::Occupied(mut e) => {
                if item.score > e.get().score {
                    e.insert(item);
                }
            }
            Entry::Vacant(e) => {
                e.insert(item);
            }
        }
    }
    unique.into_values().collect()
}

/// Best first; ties are broken by label and then detail so the order is
/// stable across runs.
fn sort(items: &mut [CompletionItem]) {
    items.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.label.cmp(&b.label))
            .then_with(|| a.detail.cmp(&b.detail))
            .then_with(|| a.insert_text.cmp(&b.insert_text))
    });
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Mutex;

    use burrow_api::{ApiError, ApiResult, Span};
    use lsp_types::CompletionItemKind;

    use super::*;

    #[derive(Default)]
    struct RecordingEditor {
        calls: Mutex<Vec<String>>,
    }

    impl ImportEditor for RecordingEditor {
        fn import_edits(
            &self,
            _file: &Path,
            _source: &str,
            request: &ImportRequest,
        ) -> ApiResult<Vec<TextEdit>> {
            self.calls.lock().unwrap().push(request.path.clone());
            if request.path == "broken" {
                return Err(ApiError::Internal("unparsable import block".into()));
            }
            Ok(vec![TextEdit::insert(0, format!("import \"{}\"\n", request.path))])
        }
    }

    fn item(label: &str, score: f64) -> CompletionItem {
        CompletionItem::new(label, CompletionItemKind::VARIABLE, score)
    }

    fn import(path: &str) -> Option<ImportRequest> {
        Some(ImportRequest {
            path: path.to_string(),
            name: None,
        })
    }

    fn run(
        editor: &RecordingEditor,
        aliases: &dyn LabelAliases,
        options: &CompletionOptions,
        items: Vec<CompletionItem>,
    ) -> Vec<CompletionItem> {
        let file = PathBuf::from("main.go");
        Assembler {
            editor,
            aliases,
            options,
            file: &file,
            source: "package main\n",
        }
        .assemble(items)
    }

    #[test]
    fn duplicates_keep_the_best_score() {
        let editor = RecordingEditor::default();
        let options = CompletionOptions::default();
        let items = vec![item("a", 1.0), item("b", 2.0), item("a", 3.0)];

        let out = run(&editor, &NoAliases, &options, items);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].label, "a");
        assert_eq!(out[0].score, 3.0);
    }

    #[test]
    fn ties_sort_by_label() {
        let editor = RecordingEditor::default();
        let options = CompletionOptions::default();
        let items = vec![item("zeta", 1.0), item("alpha", 1.0), item("mid", 2.0)];

        let out = run(&editor, &NoAliases, &options, items);
        let labels: Vec<_> = out.iter().map(|i| i.label.as_str()).collect();
        assert_eq!(labels, vec!["mid", "alpha", "zeta"]);
    }

    #[test]
    fn imports_are_resolved_once_per_package() {
        let editor = RecordingEditor::default();
        let options = CompletionOptions::default();
        let mut a = item("Println", 1.0);
        a.import = import("fmt");
        let mut b = item("Printf", 1.0);
        b.import = import("fmt");

        let out = run(&editor, &NoAliases, &options, vec![a, b]);
        assert_eq!(editor.calls.lock().unwrap().len(), 1);
        assert!(out.iter().all(|i| i.additional_edits.len() == 1));
        assert!(out.iter().all(|i| i.import.is_none()));
        assert_eq!(out[0].additional_edits[0].span, Span::empty(0));
    }

    #[test]
    fn failed_imports_drop_the_item() {
        let editor = RecordingEditor::default();
        let options = CompletionOptions::default();
        let mut bad = item("Thing", 5.0);
        bad.import = import("broken");

        let out = run(&editor, &NoAliases, &options, vec![bad, item("local", 1.0)]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].label, "local");
    }

    #[test]
    fn aliases_sort_just_above_the_original() {
        let editor = RecordingEditor::default();
        let options = CompletionOptions::default();
        let aliases: StaticAliases = [("Println", "println")].into_iter().collect();
        let items = vec![item("Println", 1.0), item("Print", 1.0)];

        let out = run(&editor, &aliases, &options, items);
        let labels: Vec<_> = out.iter().map(|i| i.label.as_str()).collect();
        assert_eq!(labels, vec!["println", "Print", "Println"]);
        assert_eq!(out[0].insert_text, "println");
    }

    #[test]
    fn results_are_truncated() {
        let editor = RecordingEditor::default();
        let options = CompletionOptions {
            max_results: 2,
            ..CompletionOptions::default()
        };
        let items = (0..5).map(|i| item(&format!("v{i}"), i as f64)).collect();

        let out = run(&editor, &NoAliases, &options, items);
        let labels: Vec<_> = out.iter().map(|i| i.label.as_str()).collect();
        assert_eq!(labels, vec!["v4", "v3"]);
    }
}
