//! Candidate to completion item.

use std::collections::HashMap;

use burrow_api::{CompletionItem, Signature, SymbolKind, TextEdit, TypeRef};
use burrow_go::snippet::{call_snippet, escape};
use burrow_go::{DeclKind, ScannedDecl, ScannedParam};
use lsp_types::CompletionItemKind;
use once_cell::sync::Lazy;

use super::candidate::{Candidate, Modifier, Obj};
use super::context::Completer;

/// Parameter list and result of a builtin function, as documented.
struct BuiltinSig {
    params: &'static [(&'static str, &'static str, bool)],
    results: &'static str,
}

const fn sig(
    params: &'static [(&'static str, &'static str, bool)],
    results: &'static str,
) -> BuiltinSig {
    BuiltinSig { params, results }
}

static BUILTINS: Lazy<HashMap<&'static str, BuiltinSig>> = Lazy::new(|| {
    HashMap::from([
        ("append", sig(&[("slice", "[]Type", false), ("elems", "Type", true)], "[]Type")),
        ("cap", sig(&[("v", "Type", false)], "int")),
        ("clear", sig(&[("t", "T", false)], "")),
        ("close", sig(&[("c", "chan<- Type", false)], "")),
        ("complex", sig(&[("r", "float64", false), ("i", "float64", false)], "complex128")),
        ("copy", sig(&[("dst", "[]Type", false), ("src", "[]Type", false)], "int")),
        ("delete", sig(&[("m", "map[Type]Type1", false), ("key", "Type", false)], "")),
        ("imag", sig(&[("c", "complex128", false)], "float64")),
        ("len", sig(&[("v", "Type", false)], "int")),
        ("make", sig(&[("t", "Type", false), ("size", "IntegerType", true)], "Type")),
        ("max", sig(&[("x", "T", false), ("y", "T", true)], "T")),
        ("min", sig(&[("x", "T", false), ("y", "T", true)], "T")),
        ("new", sig(&[("", "Type", false)], "*Type")),
        ("panic", sig(&[("v", "any", false)], "")),
        ("print", sig(&[("args", "Type", true)], "")),
        ("println", sig(&[("args", "Type", true)], "")),
        ("real", sig(&[("c", "complex128", false)], "float64")),
        ("recover", sig(&[], "any")),
    ])
});

impl BuiltinSig {
    fn scanned_params(&self) -> Vec<ScannedParam> {
        self.params
            .iter()
            .map(|(name, ty, variadic)| ScannedParam {
                name: (*name).into(),
                ty: (*ty).to_string(),
                variadic: *variadic,
            })
            .collect()
    }

    fn detail(&self) -> String {
        let params: Vec<String> = self.scanned_params().iter().map(ScannedParam::display).collect();
        let params = params.join(", ");
        if self.results.is_empty() {
            format!("func({params})")
        } else {
            format!("func({params}) {}", self.results)
        }
    }
}

impl Completer<'_> {
    pub(crate) fn item(&self, cand: &Candidate) -> Option<CompletionItem> {
        if matches!(cand.obj, Obj::Value(_)) {
            return None;
        }
        let label = cand.deep_name(self.store);
        let (kind, mut detail) = self.kind_and_detail(&cand.obj);
        let mut insert = label.clone();
        let mut is_snippet = false;

        let mut prefix = String::new();
        for m in &cand.mods {
            match m {
                Modifier::Reference => prefix.insert(0, '&'),
                Modifier::Dereference => prefix.insert(0, '*'),
                Modifier::ChanRead => prefix.insert_str(0, "<-"),
                _ => {}
            }
        }

        let mut suffix = String::new();
        let always_call = self.is_builtin(&cand.obj);
        if always_call || cand.has_mod(Modifier::Invoke) {
            let (text, snippet) = self.call_text(&cand.obj, &label);
            insert = text;
            is_snippet |= snippet;
        }
        for m in &cand.mods {
            match m {
                Modifier::TakeSlice => suffix.push_str("[:]"),
                Modifier::TakeDotDotDot => suffix.push_str("..."),
                Modifier::Index => {
                    if self.options.snippets {
                        suffix.push_str("[$1]");
                        is_snippet = true;
                    } else {
                        suffix.push_str("[]");
                    }
                }
                _ => {}
            }
        }

        if let Some(to) = &cand.convert_to {
            let target = if to.is_untyped() {
                self.ops.default_type(to)
            } else {
                to.clone()
            };
            let mut type_name = self.types.format(&target);
            // "(*int)(foo)", not "*int(foo)"
            if matches!(target, TypeRef::Pointer(_) | TypeRef::Signature(_)) {
                type_name = format!("({type_name})");
            }
            prefix = format!("{type_name}({prefix}");
            suffix.push(')');
        }

        let (prefix, suffix) = if is_snippet {
            (escape(&prefix), escape_suffix(&suffix))
        } else {
            (prefix, suffix)
        };

        let mut additional_edits = Vec::new();
        if !prefix.is_empty() {
            // "foo.B<>" becomes "&foo.Bar", not "foo.&Bar"
            match self.enclosing_selector() {
                Some(sel) => additional_edits.push(TextEdit::insert(self.span(sel).start, prefix)),
                None => insert = format!("{prefix}{insert}"),
            }
        }
        insert.push_str(&suffix);

        if let Some(import) = &cand.import
            && kind != CompletionItemKind::MODULE
        {
            if !detail.is_empty() {
                detail.push(' ');
            }
            detail.push_str(&format!("(from \"{}\")", import.path));
        }
        if detail != "untyped nil"
            && let Some(trimmed) = detail.strip_prefix("untyped ")
        {
            detail = trimmed.to_string();
        }

        let mut item = CompletionItem::new(label, kind, cand.score)
            .with_insert_text(insert, is_snippet)
            .with_detail(detail);
        item.additional_edits = additional_edits;
        item.import = cand.import.clone();
        Some(item)
    }

    fn is_builtin(&self, obj: &Obj) -> bool {
        matches!(obj, Obj::Symbol(id) if matches!(self.store.symbol(*id).kind, SymbolKind::Builtin))
    }

    /// Call expression text for an invoked candidate.
    fn call_text(&self, obj: &Obj, label: &str) -> (String, bool) {
        if !self.options.snippets {
            return (format!("{label}()"), false);
        }
        let params = match obj {
            Obj::Scanned(decl) => decl.params.clone(),
            Obj::Symbol(id) if self.is_builtin(obj) => BUILTINS
                .get(self.store.symbol(*id).name.as_str())
                .map(BuiltinSig::scanned_params)
                .unwrap_or_default(),
            _ => match obj.ty(self.store).and_then(|t| self.ops.signature(&t)) {
                Some(sig) => self.signature_params(&sig),
                None => Vec::new(),
            },
        };
        call_snippet(label, &params, self.options.placeholders)
    }

    fn signature_params(&self, sig: &Signature) -> Vec<ScannedParam> {
        let last = sig.params.len().saturating_sub(1);
        sig.params
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let variadic = sig.variadic && i == last;
                let ty = match (&p.ty, variadic) {
                    (TypeRef::Slice(elem), true) => self.types.format(elem),
                    (ty, _) => self.types.format(ty),
                };
                ScannedParam {
                    name: p.name.clone(),
                    ty,
                    variadic,
                }
            })
            .collect()
    }

    fn kind_and_detail(&self, obj: &Obj) -> (CompletionItemKind, String) {
        match obj {
            Obj::Symbol(id) => {
                let sym = self.store.symbol(*id);
                let ty = sym.ty.as_ref().filter(|t| !t.is_invalid());
                let formatted = ty.map(|t| self.types.format(t)).unwrap_or_default();
                match &sym.kind {
                    SymbolKind::Var => {
                        let detail = if matches!(ty, Some(TypeRef::Struct(_))) {
                            "struct{...}".to_string()
                        } else {
                            formatted
                        };
                        (CompletionItemKind::VARIABLE, detail)
                    }
                    SymbolKind::Field { .. } => (CompletionItemKind::FIELD, formatted),
                    SymbolKind::Const => (
                        CompletionItemKind::CONSTANT,
                        ty.map(|t| self.types.detail(t)).unwrap_or_default(),
                    ),
                    SymbolKind::Func => {
                        let is_method = ty
                            .and_then(|t| self.ops.signature(t))
                            .is_some_and(|s| s.recv.is_some());
                        let kind = if is_method {
                            CompletionItemKind::METHOD
                        } else {
                            CompletionItemKind::FUNCTION
                        };
                        (kind, formatted)
                    }
                    SymbolKind::TypeName => match ty.map(|t| self.ops.under(t)) {
                        Some(TypeRef::Struct(_)) => (CompletionItemKind::STRUCT, "struct{...}".to_string()),
                        Some(TypeRef::Interface(_)) => {
                            (CompletionItemKind::INTERFACE, "interface{...}".to_string())
                        }
                        Some(under) => (CompletionItemKind::CLASS, self.types.format(under)),
                        None => (CompletionItemKind::CLASS, String::new()),
                    },
                    SymbolKind::PkgName { imported } => (
                        CompletionItemKind::MODULE,
                        format!("\"{}\"", self.store.package(*imported).path),
                    ),
                    SymbolKind::Builtin => (
                        CompletionItemKind::FUNCTION,
                        BUILTINS
                            .get(sym.name.as_str())
                            .map(BuiltinSig::detail)
                            .unwrap_or_default(),
                    ),
                    SymbolKind::Nil => (CompletionItemKind::VARIABLE, "untyped nil".to_string()),
                }
            }
            Obj::Package { path, .. } => (CompletionItemKind::MODULE, format!("\"{path}\"")),
            Obj::Scanned(decl) => scanned_kind_and_detail(decl),
            Obj::Value(ty) => (CompletionItemKind::VARIABLE, self.types.format(ty)),
        }
    }
}

fn scanned_kind_and_detail(decl: &ScannedDecl) -> (CompletionItemKind, String) {
    match decl.kind {
        DeclKind::Func => {
            let params: Vec<String> = decl.params.iter().map(ScannedParam::display).collect();
            let mut detail = format!("func({})", params.join(", "));
            if let Some(results) = &decl.results {
                detail.push(' ');
                detail.push_str(results);
            }
            (CompletionItemKind::FUNCTION, detail)
        }
        DeclKind::Type => (CompletionItemKind::CLASS, String::new()),
        DeclKind::Var => (CompletionItemKind::VARIABLE, String::new()),
        DeclKind::Const => (CompletionItemKind::CONSTANT, String::new()),
    }
}

/// Escapes a suffix without touching the tab stops it carries.
fn escape_suffix(suffix: &str) -> String {
    match suffix.split_once("[$1]") {
        Some((head, tail)) => format!("{}[$1]{}", escape(head), escape(tail)),
        None => escape(suffix),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_details_read_like_docs() {
        assert_eq!(
            BUILTINS["append"].detail(),
            "func(slice []Type, elems ...Type) []Type"
        );
        assert_eq!(BUILTINS["recover"].detail(), "func() any");
        assert_eq!(BUILTINS["new"].detail(), "func(Type) *Type");
    }

    #[test]
    fn suffix_escaping_keeps_tab_stops() {
        assert_eq!(escape_suffix("[$1])"), "[$1])");
        assert_eq!(escape_suffix("...)"), "...)");
    }
}
