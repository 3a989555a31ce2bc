use burrow_api::{BasicKind, NodeId, NodeKind, SymbolId, TypeRef};

use super::{Inference, PenalizedChain, expr_at_pos};
use crate::completion::context::Completer;
use crate::types::ObjKind;

impl Completer<'_> {
    /// Argument kinds accepted by a builtin at the cursor's argument.
    pub(super) fn builtin_arg_kind(&self, builtin: SymbolId, call: NodeId) -> ObjKind {
        let NodeKind::Call { args, .. } = self.kind(call) else {
            return ObjKind::empty();
        };
        let idx = expr_at_pos(self, args);
        match self.store.symbol(builtin).name.as_str() {
            "cap" => ObjKind::SLICE | ObjKind::ARRAY | ObjKind::CHAN,
            "len" => ObjKind::SLICE | ObjKind::ARRAY | ObjKind::CHAN | ObjKind::MAP | ObjKind::STRING,
            "copy" => ObjKind::SLICE,
            "delete" if idx == 0 => ObjKind::MAP,
            "close" => ObjKind::CHAN,
            _ => ObjKind::empty(),
        }
    }

    /// Expected argument type of a builtin call, given what the call itself
    /// is expected to produce (`parent`).
    pub(super) fn builtin_arg_type(
        &self,
        builtin: SymbolId,
        call: NodeId,
        parent: Inference,
    ) -> Inference {
        let NodeKind::Call { args, .. } = self.kind(call) else {
            return parent;
        };
        let idx = expr_at_pos(self, args);
        let mut inf = Inference {
            type_name: parent.type_name.clone(),
            mods: parent.mods.clone(),
            obj_kind: parent.obj_kind,
            ..Inference::default()
        };

        match self.store.symbol(builtin).name.as_str() {
            "append" => {
                if let Some(expected) = &parent.obj_type {
                    inf.obj_type = Some(expected.clone());
                    if idx == 0 {
                        return inf;
                    }
                    inf.obj_type = self.ops.deslice(expected);
                }
                if idx == 0 {
                    return inf;
                }
                if let Some(&first) = args.first() {
                    if let Some(slice) = self.type_of(first).and_then(|t| self.ops.deslice(&t)) {
                        inf.obj_type = Some(slice);
                    }
                    inf.variadic = idx == 1 && args.len() <= 2;
                    // appending a slice to itself is rarely wanted
                    let chain = self.obj_chain(first);
                    if !chain.is_empty() {
                        inf.penalized.push(PenalizedChain {
                            chain,
                            penalty: self.policy.append_self_penalty,
                        });
                    }
                }
            }
            "delete" => {
                if idx > 0
                    && let Some(&first) = args.first()
                    && let Some(mt) = self.type_of(first)
                    && let TypeRef::Map { key, .. } = self.ops.under(&mt)
                {
                    inf.obj_type = Some(key.as_ref().clone());
                }
            }
            "copy" => {
                let dst = args.first().and_then(|&a| self.type_of(a));
                let src = args.get(1).and_then(|&a| self.type_of(a));
                inf.obj_type = match idx {
                    1 => dst,
                    0 => src,
                    _ => None,
                };
            }
            "new" => {
                inf.type_name.want_type_name = true;
                if let Some(expected) = &parent.obj_type {
                    inf.obj_type = self.ops.pointer_elem(expected);
                }
            }
            "make" => {
                if idx == 0 {
                    inf.type_name.want_type_name = true;
                    inf.obj_type = parent.obj_type.clone();
                } else {
                    inf.obj_type = Some(TypeRef::Basic(BasicKind::UntypedInt));
                }
            }
            _ => {}
        }
        inf
    }
}
