use std::sync::Arc;

use burrow_api::{NodeId, NodeKind, Signature, SymbolId, SymbolKind};

use super::{Inference, Step, expr_at_pos};
use crate::completion::context::Completer;

impl Completer<'_> {
    pub(super) fn infer_call(
        &self,
        node: NodeId,
        inf: &mut Inference,
        deferred: &mut Vec<(SymbolId, NodeId)>,
    ) -> Step {
        let NodeKind::Call {
            fun, lparen, rparen, ..
        } = self.kind(node)
        else {
            return Step::Stop;
        };
        if !(*lparen < self.offset && self.offset <= *rparen) {
            return Step::Continue;
        }

        // "int64(<>)" only tells us the value must convert to int64
        if self.info.is_type_expr(*fun) {
            inf.convertible_to = self.type_of(*fun);
            return Step::Stop;
        }

        if let Some(sig) = self.type_of(*fun).and_then(|t| self.ops.signature(&t)) {
            self.expected_call_param_type(inf, node, &sig);
        }

        if let NodeKind::Ident { .. } = self.kind(*fun)
            && let Some(sym) = self.object_of(*fun)
            && self.store.symbol(sym).is_universe()
            && matches!(self.store.symbol(sym).kind, SymbolKind::Builtin)
        {
            // "var s []int = append(<>)": the arguments follow from what
            // the call itself must produce, one level further out.
            deferred.push((sym, node));
            return Step::Continue;
        }
        Step::Stop
    }

    /// Expected type of the argument at the cursor, variadic tail included.
    pub(super) fn expected_call_param_type(
        &self,
        inf: &mut Inference,
        call: NodeId,
        sig: &Arc<Signature>,
    ) {
        let NodeKind::Call { args, .. } = self.kind(call) else {
            return;
        };
        let num_params = sig.params.len();
        if num_params == 0 {
            return;
        }
        let idx = expr_at_pos(self, args);

        // f(<>) may be filled by one call returning every argument
        if args.len() <= 1 && idx == 0 {
            inf.assignees = sig.params.iter().map(|p| Some(p.ty.clone())).collect();
            inf.variadic_assignees = sig.variadic;
        }

        let param = &sig.params[idx.min(num_params - 1)];
        inf.obj_type = Some(param.ty.clone());

        if sig.variadic && idx >= num_params - 1 {
            inf.obj_type = self.ops.deslice(&param.ty).or(inf.obj_type.take());
            inf.variadic = idx == num_params - 1 && args.len() <= num_params;
        }
    }
}
