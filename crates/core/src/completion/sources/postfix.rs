//! Postfix templates: `x.range` becomes a loop over `x`, `x.len` becomes
//! `len(x)` and so on.

use burrow_api::{CompletionItem, NodeId, NodeKind, Span, TextEdit, TypeRef};
use burrow_go::snippet::escape;
use lsp_types::CompletionItemKind;

use super::keywords::is_keyword;
use crate::completion::context::Completer;

/// Shape of `x` a template applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Slice,
    Array,
    Map,
    Chan,
    String,
    Bool,
    Nilable,
    Error,
    Any,
}

struct Template {
    label: &'static str,
    details: &'static str,
    statement: bool,
    shapes: &'static [Shape],
}

const TEMPLATES: &[Template] = &[
    Template {
        label: "len",
        details: "len(x)",
        statement: false,
        shapes: &[Shape::Slice, Shape::Array, Shape::Map, Shape::Chan, Shape::String],
    },
    Template {
        label: "last",
        details: "x[len(x)-1]",
        statement: false,
        shapes: &[Shape::Slice],
    },
    Template {
        label: "not",
        details: "!x",
        statement: false,
        shapes: &[Shape::Bool],
    },
    Template {
        label: "range",
        details: "range over x",
        statement: true,
        shapes: &[Shape::Slice, Shape::Array, Shape::Map, Shape::Chan, Shape::String],
    },
    Template {
        label: "for",
        details: "range over x's keys",
        statement: true,
        shapes: &[Shape::Slice, Shape::Array, Shape::Map, Shape::String],
    },
    Template {
        label: "forvar",
        details: "range over x's values",
        statement: true,
        shapes: &[Shape::Slice, Shape::Array, Shape::Map],
    },
    Template {
        label: "append",
        details: "append and re-assign x",
        statement: true,
        shapes: &[Shape::Slice],
    },
    Template {
        label: "copy",
        details: "duplicate x",
        statement: true,
        shapes: &[Shape::Slice],
    },
    Template {
        label: "var",
        details: "assign x to a variable",
        statement: true,
        shapes: &[Shape::Any],
    },
    Template {
        label: "keys",
        details: "collect x's keys",
        statement: true,
        shapes: &[Shape::Map],
    },
    Template {
        label: "ifnotnil",
        details: "if x != nil",
        statement: true,
        shapes: &[Shape::Nilable],
    },
    Template {
        label: "iferr",
        details: "check error and return",
        statement: true,
        shapes: &[Shape::Error],
    },
];

impl Completer<'_> {
    /// Adds the templates that fit the type of `x` in `x.<>`.
    pub(crate) fn postfix_candidates(&mut self, x: NodeId, ty: &TypeRef) {
        if !self.options.snippets || self.info.is_type_expr(x) {
            return;
        }
        let Some(sel) = self.enclosing_selector() else {
            return;
        };
        let NodeKind::Selector { sel: name, .. } = self.kind(sel) else {
            return;
        };
        let at_statement = self
            .path
            .iter()
            .position(|&n| n == sel)
            .and_then(|i| self.path.get(i + 1))
            .is_some_and(|&p| matches!(self.kind(p), NodeKind::ExprStmt { .. }));
        let shapes = self.shapes(ty);
        // the template replaces the whole "x." as well as the name
        let delete = TextEdit::delete(Span::new(self.span(sel).start, self.span(*name).start));
        let x_text = self.text(x);

        for template in TEMPLATES {
            if template.statement && !at_statement {
                continue;
            }
            if !template.shapes.iter().any(|s| shapes.contains(s)) {
                continue;
            }
            let match_score = self.matcher.score(template.label);
            if match_score <= 0.0 {
                continue;
            }
            let Some(body) = self.expand_template(template.label, x_text, ty) else {
                continue;
            };
            let mut item = CompletionItem::new(
                template.label,
                CompletionItemKind::SNIPPET,
                self.policy.low_score * match_score,
            )
            .with_insert_text(body, true)
            .with_detail(template.details);
            item.additional_edits.push(delete.clone());
            self.items.push(item);
        }
    }

    fn shapes(&self, ty: &TypeRef) -> Vec<Shape> {
        let mut shapes = vec![Shape::Any];
        match self.ops.under(ty) {
            TypeRef::Slice(_) => shapes.push(Shape::Slice),
            TypeRef::Array { .. } => shapes.push(Shape::Array),
            TypeRef::Map { .. } => shapes.push(Shape::Map),
            TypeRef::Chan { .. } => shapes.push(Shape::Chan),
            TypeRef::Basic(b) if b.is_string() => shapes.push(Shape::String),
            TypeRef::Basic(b) if b.is_boolean() => shapes.push(Shape::Bool),
            _ => {}
        }
        if self.ops.is_nilable(ty) {
            shapes.push(Shape::Nilable);
        }
        if self.ops.is_error(ty) {
            shapes.push(Shape::Error);
        }
        shapes
    }

    fn expand_template(&self, label: &str, raw: &str, ty: &TypeRef) -> Option<String> {
        let x = escape(raw);
        let under = self.ops.under(ty);
        let elem_type = || match under {
            TypeRef::Slice(elem) | TypeRef::Array { elem, .. } => Some(escape(&self.types.format(elem))),
            _ => None,
        };
        let text = match label {
            "len" => format!("len({x})"),
            "last" => format!("{x}[len({x})-1]"),
            "not" => format!("!{x}"),
            "range" => match under {
                TypeRef::Chan { .. } => format!("for ${{1:e}} := range {x} {{\n\t$0\n}}"),
                TypeRef::Map { .. } => format!("for ${{1:k}}, ${{2:v}} := range {x} {{\n\t$0\n}}"),
                _ => format!("for ${{1:i}}, ${{2:v}} := range {x} {{\n\t$0\n}}"),
            },
            "for" => {
                let key = if matches!(under, TypeRef::Map { .. }) { "k" } else { "i" };
                format!("for ${{1:{key}}} := range {x} {{\n\t$0\n}}")
            }
            "forvar" => format!("for _, ${{1:v}} := range {x} {{\n\t$0\n}}"),
            "append" => format!("{x} = append({x}, $0)"),
            "copy" => {
                let elem = elem_type()?;
                let dup = copy_name(raw);
                format!("${{1:{dup}}} := make([]{elem}, len({x}))\ncopy(${{1:{dup}}}, {x})$0")
            }
            "var" => format!("${{1:{}}} := {x}$0", var_name(&self.types.format(ty))),
            "keys" => {
                let TypeRef::Map { key, .. } = under else {
                    return None;
                };
                let key = escape(&self.types.format(key));
                format!(
                    "keys := make([]{key}, 0, len({x}))\nfor k := range {x} {{\n\tkeys = append(keys, k)\n}}\n$0"
                )
            }
            "ifnotnil" => format!("if {x} != nil {{\n\t$0\n}}"),
            "iferr" => {
                let sig = &self.enclosing_func.as_ref()?.sig;
                let returns_error = sig.results.last().is_some_and(|r| self.ops.is_error(&r.ty));
                if !returns_error {
                    return None;
                }
                let mut values: Vec<String> = sig.results[..sig.results.len() - 1]
                    .iter()
                    .map(|r| escape(&self.zero_value(&r.ty)))
                    .collect();
                values.push(format!("${{1:{x}}}"));
                format!("if {x} != nil {{\n\treturn {}\n}}\n$0", values.join(", "))
            }
            _ => return None,
        };
        Some(text)
    }
}

/// Variable name suggested for a value of a type: the lower-cased last
/// word of its name.
fn var_name(type_name: &str) -> String {
    let base = type_name
        .trim_start_matches(['*', '[', ']'])
        .rsplit('.')
        .next()
        .unwrap_or_default();
    let word_start = base
        .char_indices()
        .rev()
        .find(|(_, c)| c.is_uppercase())
        .map_or(0, |(i, _)| i);
    let word: String = base[word_start..]
        .chars()
        .take_while(|c| c.is_alphanumeric())
        .collect::<String>()
        .to_lowercase();
    if word.is_empty() || !word.starts_with(|c: char| c.is_alphabetic()) || is_keyword(&word) {
        "v".to_string()
    } else {
        word
    }
}

/// Name for a copy of the slice `x`, e.g. `itemsCopy` for `s.items`.
fn copy_name(x: &str) -> String {
    let last: String = x
        .rsplit('.')
        .next()
        .unwrap_or_default()
        .chars()
        .take_while(|c| c.is_alphanumeric() || *c == '_')
        .collect();
    if last.is_empty() {
        "dup".to_string()
    } else {
        format!("{last}Copy")
    }
}

#[cfg(test)]
mod tests {
    use super::var_name;

    #[test]
    fn var_names_follow_the_type() {
        assert_eq!(var_name("*bytes.Buffer"), "buffer");
        assert_eq!(var_name("http.ResponseWriter"), "writer");
        assert_eq!(var_name("int"), "int");
        assert_eq!(var_name("map[string]int"), "v");
        assert_eq!(var_name("[]byte"), "byte");
    }

    #[test]
    fn copies_are_named_after_the_slice() {
        assert_eq!(super::copy_name("s.items"), "itemsCopy");
        assert_eq!(super::copy_name("names"), "namesCopy");
        assert_eq!(super::copy_name("f()"), "fCopy");
        assert_eq!(super::copy_name("()"), "dup");
    }
}
