use lsp_types::CompletionItemKind;
use serde::{Deserialize, Serialize};

use super::span::{Span, TextEdit};
use super::workspace::ImportRequest;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TriggerKind {
    #[default]
    Invoked,
    Character(char),
    Incomplete,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionRequest {
    pub offset: usize,
    pub trigger: TriggerKind,
}

impl CompletionRequest {
    pub fn at(offset: usize) -> Self {
        Self {
            offset,
            trigger: TriggerKind::Invoked,
        }
    }
}

/// Text being replaced plus what the user already typed of it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Selection {
    pub span: Span,
    pub prefix: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CompletionItem {
    pub label: String,
    pub insert_text: String,
    pub kind: CompletionItemKind,
    pub score: f64,
    pub detail: String,
    pub documentation: Option<String>,
    pub additional_edits: Vec<TextEdit>,
    pub is_snippet: bool,
    /// Import the item needs; turned into `additional_edits` on assembly.
    #[serde(skip)]
    pub import: Option<ImportRequest>,
}

impl CompletionItem {
    pub fn new(label: impl Into<String>, kind: CompletionItemKind, score: f64) -> Self {
        let label = label.into();
        Self {
            insert_text: label.clone(),
            label,
            kind,
            score,
            detail: String::new(),
            documentation: None,
            additional_edits: Vec::new(),
            is_snippet: false,
            import: None,
        }
    }

    pub fn with_insert_text(mut self, text: impl Into<String>, is_snippet: bool) -> Self {
        self.insert_text = text.into();
        self.is_snippet = is_snippet;
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = detail.into();
        self
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Default)]
pub struct CompletionList {
    pub items: Vec<CompletionItem>,
    pub surrounding: Selection,
}

impl CompletionList {
    pub fn labels(&self) -> Vec<&str> {
        self.items.iter().map(|i| i.label.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn items_serialize_without_their_pending_import() {
        let mut item = CompletionItem::new("strconv", CompletionItemKind::MODULE, 1.0);
        item.import = Some(ImportRequest {
            path: "strconv".to_string(),
            name: None,
        });
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["kind"], 9);
        assert_eq!(json["insert_text"], "strconv");
        assert!(json.get("import").is_none());
    }

    #[test]
    fn requests_read_the_trigger_character() {
        let request: CompletionRequest =
            serde_json::from_str(r#"{"offset":12,"trigger":{"Character":"."}}"#).unwrap();
        assert_eq!(request.offset, 12);
        assert_eq!(request.trigger, TriggerKind::Character('.'));
    }
}
