use burrow_api::{LitKind, NodeKind, UnaryOp};

use super::TypeNameInference;
use crate::completion::candidate::Modifier;
use crate::completion::context::Completer;

impl Completer<'_> {
    /// Detects positions where only a type name can appear.
    pub(super) fn expect_type_name(&self) -> TypeNameInference {
        let mut inf = TypeNameInference::default();
        for (i, &node) in self.path.iter().enumerate() {
            match self.kind(node) {
                // parameter, result, receiver and field types
                NodeKind::Field { .. }
                | NodeKind::FuncType { .. }
                | NodeKind::StructType { .. }
                | NodeKind::InterfaceType { .. } => {
                    inf.want_type_name = true;
                    break;
                }
                NodeKind::CaseClause { .. } => {
                    let Some(switch) = self.find_switch(i, node) else {
                        return TypeNameInference::default();
                    };
                    let NodeKind::TypeSwitch { assign, body, .. } = self.kind(switch) else {
                        return TypeNameInference::default();
                    };
                    let guard = self
                        .syntax
                        .find_in(*assign, &|k| matches!(k, NodeKind::TypeAssert { .. }));
                    if let Some(guard) = guard
                        && let NodeKind::TypeAssert { x, .. } = self.kind(guard)
                    {
                        inf.assertable_from = self.type_of(*x);
                    }
                    inf.want_type_name = true;

                    // types other cases already cover
                    if let NodeKind::Block { stmts, .. } = self.kind(*body) {
                        for &clause in stmts {
                            let NodeKind::CaseClause { list, .. } = self.kind(clause) else {
                                continue;
                            };
                            for &expr in list {
                                let span = self.span(expr);
                                if span.start < self.offset && self.offset <= span.end {
                                    continue;
                                }
                                if let Some(ty) = self.type_of(expr) {
                                    inf.seen_type_switch_cases.push(ty);
                                }
                            }
                        }
                    }
                    break;
                }
                NodeKind::TypeAssert {
                    x, lparen, rparen, ..
                } => {
                    if *lparen < self.offset && self.offset <= *rparen {
                        inf.assertable_from = self.type_of(*x);
                        inf.want_type_name = true;
                        break;
                    }
                    return TypeNameInference::default();
                }
                NodeKind::Star { .. } => inf.mods.push(Modifier::Reference),
                NodeKind::CompositeLit { ty, .. } => {
                    if ty.is_some_and(|t| self.contains(t)) {
                        inf.want_type_name = true;
                        inf.comp_lit_type = true;
                        // "&Foo<>{}" wants a pointer even though the & applies
                        // to the literal
                        if let Some(&parent) = self.path.get(i + 1)
                            && let NodeKind::Unary {
                                op: UnaryOp::And, ..
                            } = self.kind(parent)
                        {
                            inf.mods.push(Modifier::Reference);
                        }
                    }
                    break;
                }
                NodeKind::ArrayType { len, elem } => {
                    if !self.contains(*elem) {
                        continue;
                    }
                    inf.want_type_name = true;
                    match len {
                        None => inf.mods.push(Modifier::SliceType),
                        Some(len) => {
                            if let Some(n) = self.array_len(*len) {
                                inf.mods.push(Modifier::ArrayType(n));
                            }
                        }
                    }
                    // [][]<> nests
                    if let Some(&parent) = self.path.get(i + 1)
                        && let NodeKind::ArrayType { .. } = self.kind(parent)
                    {
                        continue;
                    }
                    break;
                }
                NodeKind::MapType { key, .. } => {
                    inf.want_type_name = true;
                    inf.want_comparable = self.contains(*key);
                    break;
                }
                NodeKind::ValueSpec { ty, .. } => {
                    inf.want_type_name = ty.is_some_and(|t| self.contains(t));
                    break;
                }
                NodeKind::TypeSpec { ty, .. } => {
                    inf.want_type_name = self.contains(*ty);
                }
                _ => {
                    if self.breaks_inference(node) {
                        return TypeNameInference::default();
                    }
                }
            }
        }
        inf
    }

    fn array_len(&self, len: burrow_api::NodeId) -> Option<u64> {
        match self.kind(len) {
            NodeKind::BasicLit { kind: LitKind::Int } => parse_int_literal(self.text(len)),
            _ => None,
        }
    }
}

/// Parses a Go integer literal: decimal, hex, octal or binary, with `_`
/// separators.
fn parse_int_literal(text: &str) -> Option<u64> {
    let cleaned: String = text.chars().filter(|&c| c != '_').collect();
    let lower = cleaned.to_ascii_lowercase();
    if let Some(hex) = lower.strip_prefix("0x") {
        u64::from_str_radix(hex, 16).ok()
    } else if let Some(bin) = lower.strip_prefix("0b") {
        u64::from_str_radix(bin, 2).ok()
    } else if let Some(oct) = lower.strip_prefix("0o") {
        u64::from_str_radix(oct, 8).ok()
    } else if lower.len() > 1 && lower.starts_with('0') {
        u64::from_str_radix(&lower[1..], 8).ok()
    } else {
        lower.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::parse_int_literal;

    #[test]
    fn parses_go_integer_literals() {
        assert_eq!(parse_int_literal("16"), Some(16));
        assert_eq!(parse_int_literal("0x10"), Some(16));
        assert_eq!(parse_int_literal("0o20"), Some(16));
        assert_eq!(parse_int_literal("020"), Some(16));
        assert_eq!(parse_int_literal("0b1_0000"), Some(16));
        assert_eq!(parse_int_literal("0"), Some(0));
        assert_eq!(parse_int_literal("n"), None);
    }
}
