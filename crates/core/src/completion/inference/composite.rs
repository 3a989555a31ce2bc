use burrow_api::{BasicKind, NodeKind, TypeRef};

use super::expr_at_pos;
use crate::completion::context::Completer;

impl Completer<'_> {
    /// Expected type of the element at the cursor inside a composite literal.
    pub(super) fn expected_composite_literal_type(&self) -> Option<TypeRef> {
        let cl = self.comp_lit.as_ref()?;
        match &cl.ty {
            TypeRef::Slice(elem) | TypeRef::Array { elem, .. } => {
                if cl.in_key {
                    Some(TypeRef::Basic(BasicKind::UntypedInt))
                } else {
                    Some(elem.as_ref().clone())
                }
            }
            TypeRef::Map { key, value } => {
                if cl.in_key {
                    Some(key.as_ref().clone())
                } else {
                    Some(value.as_ref().clone())
                }
            }
            TypeRef::Struct(st) => {
                // field names have no type to match
                if cl.in_key {
                    return None;
                }
                if let Some(kv) = cl.kv {
                    let NodeKind::KeyValue { key, .. } = self.kind(kv) else {
                        return None;
                    };
                    let name = self.syntax.ident_name(*key)?;
                    return st
                        .fields
                        .iter()
                        .map(|&f| self.store.symbol(f))
                        .find(|f| &f.name == name)
                        .and_then(|f| f.ty.clone());
                }
                // positional elements follow declaration order
                let NodeKind::CompositeLit { elts, .. } = self.kind(cl.lit) else {
                    return None;
                };
                let idx = expr_at_pos(self, elts);
                st.fields
                    .get(idx)
                    .and_then(|&f| self.store.symbol(f).ty.clone())
            }
            _ => None,
        }
    }
}
