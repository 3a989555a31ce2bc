//! Literal values of an expected type: `T{}`, `&T{}`, `make(T, 0)`,
//! `func(...) {}` and conversions such as `http.Dir()`.

use std::collections::HashMap;

use burrow_api::{CompletionItem, ImportRequest, Signature, TextEdit, TypeRef};
use burrow_go::snippet::escape;
use lsp_types::CompletionItemKind;

use crate::completion::candidate::{Candidate, Modifier, Obj};
use crate::completion::context::Completer;

/// Finished literal before scoring.
struct Literal {
    label: String,
    snippet: String,
    kind: CompletionItemKind,
    detail: String,
    score: f64,
}

impl Completer<'_> {
    /// Literal candidates of type `ty`, when such a value fits the cursor.
    pub(crate) fn literal(&mut self, ty: &TypeRef, import: Option<ImportRequest>) {
        if !self.options.snippets || !self.options.literals {
            return;
        }
        let expected = self.inference.obj_type.clone();
        // "fmt.Print(<>)" should not get "[]any{}"
        if self.inference.variadic
            && let Some(exp) = &expected
            && self.ops.assignable(ty, &TypeRef::slice(exp.clone()))
        {
            return;
        }
        if expected.as_ref().is_some_and(|e| self.ops.is_empty_interface(e)) {
            return;
        }
        // an unnamed expected type already produced its own literal
        if matches!(ty, TypeRef::Named(_))
            && expected.as_ref().is_some_and(|e| !matches!(e, TypeRef::Named(_)))
        {
            return;
        }

        let under = self.ops.under(ty).clone();
        let addressable = matches!(
            under,
            TypeRef::Struct(_) | TypeRef::Array { .. } | TypeRef::Slice(_) | TypeRef::Map { .. }
        );
        let mut cand = Candidate::new(Obj::Value(ty.clone()), 0.0).addressable(addressable);
        if !self.matching_candidate(&mut cand) || cand.convert_to.is_some() {
            return;
        }

        let selector = self.enclosing_selector();
        let type_name = self.literal_type_name(ty, selector.is_some());
        // "[]int" does not fuzzy-match well, "int" does
        let match_name = match ty {
            TypeRef::Slice(elem) | TypeRef::Array { elem, .. } => self.types.format(elem),
            _ => type_name.clone(),
        };
        let reference = cand.has_mod(Modifier::Reference);
        let mut edits = Vec::new();
        let mut literals = Vec::new();

        let score = self.matcher.score(&match_name);
        if score > 0.0 {
            let mut prefix = String::new();
            if reference {
                // "foo.B<>" becomes "&foo.Bar{}"
                match selector {
                    Some(sel) => edits.push(TextEdit::insert(self.span(sel).start, "&")),
                    None => prefix.push('&'),
                }
            }
            let name = format!("{prefix}{type_name}");
            match &under {
                TypeRef::Struct(_) | TypeRef::Array { .. } | TypeRef::Slice(_) | TypeRef::Map { .. } => {
                    let stop = if self.fields_accessible(&under) { "$0" } else { "" };
                    literals.push(Literal {
                        label: format!("{name}{{}}"),
                        snippet: format!("{}{{{stop}\\}}", escape(&name)),
                        kind: CompletionItemKind::VARIABLE,
                        detail: String::new(),
                        score,
                    });
                }
                TypeRef::Signature(_) | TypeRef::Basic(_) => {
                    // conversions: "http.HandlerFunc()" for an interface,
                    // "float64()" for the type itself
                    let fits = expected.as_ref().is_some_and(|e| {
                        self.ops.is_interface(e)
                            || (matches!(under, TypeRef::Basic(_)) && self.ops.identical(e, ty))
                    });
                    if fits && !ty.is_untyped() {
                        literals.push(Literal {
                            label: format!("{name}()"),
                            snippet: format!("{}($0)", escape(&name)),
                            kind: CompletionItemKind::VARIABLE,
                            detail: self.types.format(ty),
                            score,
                        });
                    }
                }
                _ => {}
            }
        }

        let score = self.matcher.score(&format!("make.{match_name}"));
        if !reference && score > 0.0 {
            let second = match &under {
                TypeRef::Slice(_) => Some("0"),
                TypeRef::Map { .. } | TypeRef::Chan { .. } => Some(""),
                _ => None,
            };
            if let Some(second) = second {
                let (label, snippet) = if second.is_empty() {
                    (format!("make({type_name})"), format!("make({})", escape(&type_name)))
                } else {
                    let arg = if self.options.placeholders { second } else { "" };
                    (
                        format!("make({type_name}, {second})"),
                        format!("make({}, ${{1:{arg}}})", escape(&type_name)),
                    )
                };
                literals.push(Literal {
                    label,
                    snippet,
                    kind: CompletionItemKind::FUNCTION,
                    detail: String::new(),
                    // just below the other literals
                    score: score * 0.99,
                });
            }
        }

        let score = self.matcher.score("func");
        if !reference
            && score > 0.0
            && !expected.as_ref().is_some_and(|e| self.ops.is_interface(e))
            && let TypeRef::Signature(sig) = &under
        {
            literals.push(Literal {
                label: "func(...) {}".to_string(),
                snippet: self.function_literal(sig),
                kind: CompletionItemKind::VARIABLE,
                detail: String::new(),
                score,
            });
        }

        let base = self.policy.literal_score();
        for lit in literals {
            let mut item = CompletionItem::new(lit.label, lit.kind, base * lit.score)
                .with_insert_text(lit.snippet, true)
                .with_detail(lit.detail);
            item.additional_edits = edits.clone();
            item.import = import.clone();
            self.items.push(item);
        }
    }

    /// Type as written in a literal; a selector already carries the package.
    fn literal_type_name(&self, ty: &TypeRef, in_selector: bool) -> String {
        match ty {
            TypeRef::Named(id) if in_selector => self.store.named_name(*id).to_string(),
            _ => self.types.format(ty),
        }
    }

    /// Whether some field of a struct can be set from this package.
    fn fields_accessible(&self, under: &TypeRef) -> bool {
        let TypeRef::Struct(st) = under else {
            return true;
        };
        st.fields.iter().any(|&f| {
            let field = self.store.symbol(f);
            field.is_exported() || field.package == Some(self.view.package())
        })
    }

    /// `func(name T, ...) R {}` snippet with generated names for unnamed
    /// parameters.
    fn function_literal(&self, sig: &Signature) -> String {
        let names: Vec<String> = sig
            .params
            .iter()
            .map(|p| {
                if p.name.is_empty() || p.name == "_" {
                    abbreviate(&self.types.format(&p.ty))
                } else {
                    p.name.to_string()
                }
            })
            .collect();
        let names = uniquify(names);

        let last = sig.params.len().saturating_sub(1);
        let mut params = Vec::with_capacity(sig.params.len());
        for (i, (p, name)) in sig.params.iter().zip(&names).enumerate() {
            let ty = match (&p.ty, sig.variadic && i == last) {
                (TypeRef::Slice(elem), true) => format!("...{}", self.types.format(elem)),
                (ty, _) => self.types.format(ty),
            };
            let name = if self.options.placeholders {
                format!("${{{}:{}}}", i + 1, escape(name))
            } else {
                escape(name)
            };
            params.push(format!("{name} {}", escape(&ty)));
        }

        let results: Vec<String> = sig
            .results
            .iter()
            .map(|r| {
                let ty = escape(&self.types.format(&r.ty));
                if r.name.is_empty() {
                    ty
                } else {
                    format!("{} {ty}", r.name)
                }
            })
            .collect();
        let results = match results.as_slice() {
            [] => String::new(),
            [one] if sig.results[0].name.is_empty() => format!(" {one}"),
            _ => format!(" ({})", results.join(", ")),
        };
        format!("func({}){results} {{$0\\}}", params.join(", "))
    }
}

/// Short name for a parameter of a type: initials of the last name in it,
/// `rw` for `http.ResponseWriter`, `i` for `int`.
fn abbreviate(type_name: &str) -> String {
    let base = type_name
        .trim_start_matches(['*', '[', ']', '.'])
        .rsplit('.')
        .next()
        .unwrap_or_default();
    let mut out = String::new();
    for (i, c) in base.chars().enumerate() {
        if !(c.is_alphanumeric() || c == '_') {
            break;
        }
        if i == 0 || c.is_uppercase() {
            out.extend(c.to_lowercase());
        }
    }
    if out.is_empty() || !out.starts_with(|c: char| c.is_alphabetic()) {
        "p".to_string()
    } else {
        out
    }
}

/// Numbers repeated names: `i, i` becomes `i1, i2`.
fn uniquify(names: Vec<String>) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for name in &names {
        *counts.entry(name.as_str()).or_default() += 1;
    }
    let mut seen: HashMap<&str, usize> = HashMap::new();
    names
        .iter()
        .map(|name| {
            if counts[name.as_str()] == 1 {
                return name.clone();
            }
            let n = seen.entry(name.as_str()).or_default();
            *n += 1;
            format!("{name}{n}")
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abbreviations_use_initials() {
        assert_eq!(abbreviate("http.ResponseWriter"), "rw");
        assert_eq!(abbreviate("*http.Request"), "r");
        assert_eq!(abbreviate("int"), "i");
        assert_eq!(abbreviate("[]string"), "s");
        assert_eq!(abbreviate("func()"), "f");
    }

    #[test]
    fn repeated_names_are_numbered() {
        let names = vec!["i".to_string(), "s".to_string(), "i".to_string()];
        assert_eq!(uniquify(names), vec!["i1", "s", "i2"]);
    }
}
