use std::collections::HashSet;

use burrow_api::{NodeKind, TypeRef};

use crate::completion::candidate::{Candidate, Obj};
use crate::completion::context::Completer;

impl Completer<'_> {
    /// Fields of the enclosing struct literal not given yet, in declaration
    /// order.
    pub(crate) fn struct_literal_field_names(&mut self) {
        let Some(cl) = &self.comp_lit else {
            return;
        };
        let (lit, kv, maybe_in_field_name) = (cl.lit, cl.kv, cl.maybe_in_field_name);
        let TypeRef::Struct(st) = cl.ty.clone() else {
            self.lexical();
            return;
        };

        let mut used = HashSet::new();
        if let NodeKind::CompositeLit { elts, .. } = self.kind(lit) {
            for &el in elts {
                if Some(el) == kv {
                    continue;
                }
                if let NodeKind::KeyValue { key, .. } = self.kind(el)
                    && let Some(field) = self.object_of(*key)
                {
                    used.insert(field);
                }
            }
        }

        for (i, &field) in st.fields.iter().enumerate() {
            if used.contains(&field) {
                continue;
            }
            let score = self.policy.high_score - i as f64 * self.policy.struct_field_delta;
            self.deep.enqueue(Candidate::new(Obj::Symbol(field), score));
        }

        // "T{<>}" may also start a positional value
        if maybe_in_field_name {
            self.lexical();
        }
    }
}
