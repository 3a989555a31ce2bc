//! Expected-type inference.
//!
//! The syntax path is walked outward from the cursor. Every node falls in a
//! closed set of [`NodeCategory`] variants; each category refines the
//! [`Inference`] and says whether the walk goes on.

mod builtin;
mod call;
mod composite;
mod type_name;

use burrow_api::{BasicKind, BinaryOp, NodeId, NodeKind, SymbolId, TypeRef, UnaryOp};
use tracing::trace;

use super::candidate::Modifier;
use super::context::Completer;
use crate::types::ObjKind;

/// Object chain (`a.b.c`) whose reuse is discouraged at the cursor.
#[derive(Debug, Clone)]
pub(crate) struct PenalizedChain {
    pub chain: Vec<SymbolId>,
    /// Fraction taken off the score, in `(0, 1)`.
    pub penalty: f64,
}

/// What a type-name position expects.
#[derive(Debug, Clone, Default)]
pub(crate) struct TypeNameInference {
    pub want_type_name: bool,
    /// Syntax wrapped around the type name, e.g. `[]` or `*`.
    pub mods: Vec<Modifier>,
    /// Interface type the named type must be assertable from.
    pub assertable_from: Option<TypeRef>,
    /// Map keys must be comparable.
    pub want_comparable: bool,
    /// Types already listed by sibling type switch cases.
    pub seen_type_switch_cases: Vec<TypeRef>,
    /// Completing the type of a composite literal.
    pub comp_lit_type: bool,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct Inference {
    pub obj_type: Option<TypeRef>,
    pub obj_kind: ObjKind,
    /// Completing the first variadic argument, so `x...` fits too.
    pub variadic: bool,
    /// Syntax applied to the candidate at the cursor, innermost last.
    pub mods: Vec<Modifier>,
    /// Set inside a conversion `T(<>)`.
    pub convertible_to: Option<TypeRef>,
    pub type_name: TypeNameInference,
    /// Types receiving a multi-value call, one per receiver.
    pub assignees: Vec<Option<TypeRef>>,
    pub variadic_assignees: bool,
    pub penalized: Vec<PenalizedChain>,
}

/// Closed set of node categories the walk distinguishes.
enum NodeCategory {
    Binary,
    Assign,
    ValueSpec,
    Call,
    Return,
    CaseClause,
    Slice,
    Index,
    Send,
    Range,
    Star,
    Unary(UnaryOp),
    GoDefer,
    Other,
}

impl NodeCategory {
    fn of(kind: &NodeKind) -> Self {
        match kind {
            NodeKind::Binary { .. } => NodeCategory::Binary,
            NodeKind::Assign { .. } => NodeCategory::Assign,
            NodeKind::ValueSpec { .. } => NodeCategory::ValueSpec,
            NodeKind::Call { .. } => NodeCategory::Call,
            NodeKind::Return { .. } => NodeCategory::Return,
            NodeKind::CaseClause { .. } => NodeCategory::CaseClause,
            NodeKind::Slice { .. } => NodeCategory::Slice,
            NodeKind::Index { .. } => NodeCategory::Index,
            NodeKind::Send { .. } => NodeCategory::Send,
            NodeKind::Range { .. } => NodeCategory::Range,
            NodeKind::Star { .. } => NodeCategory::Star,
            NodeKind::Unary { op, .. } => NodeCategory::Unary(*op),
            NodeKind::Go { .. } | NodeKind::Defer { .. } => NodeCategory::GoDefer,
            _ => NodeCategory::Other,
        }
    }
}

/// Whether the outward walk goes on after a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    Continue,
    Stop,
}

/// Index of the expression containing `offset`, or `exprs.len()`.
pub(crate) fn expr_at_pos(c: &Completer<'_>, exprs: &[NodeId]) -> usize {
    exprs
        .iter()
        .position(|&e| c.contains(e))
        .unwrap_or(exprs.len())
}

impl Completer<'_> {
    /// Computes what the cursor position expects.
    pub(crate) fn expected_candidate(&self) -> Inference {
        let mut inf = Inference {
            type_name: self.expect_type_name(),
            ..Inference::default()
        };
        if self.comp_lit.is_some() {
            inf.obj_type = self.expected_composite_literal_type();
        }

        // Builtin calls take their argument types from the call's own
        // expected type, so they are resolved once the walk is done.
        let mut deferred: Vec<(SymbolId, NodeId)> = Vec::new();
        for (i, &node) in self.path.iter().enumerate() {
            let step = match NodeCategory::of(self.kind(node)) {
                NodeCategory::Binary => self.infer_binary(node, &mut inf),
                NodeCategory::Assign => self.infer_assign(node, &mut inf),
                NodeCategory::ValueSpec => self.infer_value_spec(node, &mut inf),
                NodeCategory::Call => self.infer_call(node, &mut inf, &mut deferred),
                NodeCategory::Return => self.infer_return(node, &mut inf),
                NodeCategory::CaseClause => self.infer_case_clause(i, node, &mut inf),
                NodeCategory::Slice => self.infer_slice(node, &mut inf),
                NodeCategory::Index => self.infer_index(node, &mut inf),
                NodeCategory::Send => self.infer_send(node, &mut inf),
                NodeCategory::Range => self.infer_range(node, &mut inf),
                NodeCategory::Star => {
                    inf.mods.push(Modifier::Dereference);
                    Step::Continue
                }
                NodeCategory::Unary(op) => {
                    match op {
                        UnaryOp::And => inf.mods.push(Modifier::Reference),
                        UnaryOp::Arrow => inf.mods.push(Modifier::ChanRead),
                        _ => {}
                    }
                    Step::Continue
                }
                NodeCategory::GoDefer => {
                    inf.obj_kind |= ObjKind::FUNC;
                    Step::Stop
                }
                NodeCategory::Other => {
                    if self.breaks_inference(node) {
                        Step::Stop
                    } else {
                        Step::Continue
                    }
                }
            };
            if step == Step::Stop {
                break;
            }
        }

        for (builtin, call) in deferred.into_iter().rev() {
            inf = self.builtin_arg_type(builtin, call, inf);
            inf.obj_kind = self.builtin_arg_kind(builtin, call);
        }

        trace!(
            expected = ?inf.obj_type.as_ref().map(|t| self.types.format(t)),
            kind = ?inf.obj_kind,
            want_type_name = inf.type_name.want_type_name,
            "inferred expected candidate"
        );
        inf
    }

    fn infer_binary(&self, node: NodeId, inf: &mut Inference) -> Step {
        let NodeKind::Binary { op, x, y, .. } = self.kind(node) else {
            return Step::Continue;
        };
        if matches!(op, BinaryOp::Shl | BinaryOp::Shr) {
            // the shift count is an integer; the shifted operand takes the
            // type expected of the whole expression
            if self.contains(*y) {
                inf.obj_kind |= ObjKind::INT;
                return Step::Stop;
            }
            return Step::Continue;
        }
        let other = if self.contains(*x) { *y } else { *x };
        let Some(ty) = self.type_of(other) else {
            return Step::Continue;
        };
        // "a && <>" composes booleans from anything, so no bool bias
        if !op.is_short_circuit() {
            inf.obj_type = Some(ty);
        }
        Step::Stop
    }

    fn infer_assign(&self, node: NodeId, inf: &mut Inference) -> Step {
        let NodeKind::Assign {
            lhs, rhs, tok_pos, ..
        } = self.kind(node)
        else {
            return Step::Stop;
        };
        if self.offset > *tok_pos && !lhs.is_empty() {
            let i = expr_at_pos(self, rhs).min(lhs.len() - 1);
            if let Some(ty) = self.type_of(lhs[i]) {
                inf.obj_type = Some(ty);
            }
            if rhs.len() <= 1 {
                inf.assignees = lhs.iter().map(|&l| self.type_of(l)).collect();
            } else {
                inf.assignees.push(self.type_of(lhs[i]));
            }
        }
        Step::Stop
    }

    fn infer_value_spec(&self, node: NodeId, inf: &mut Inference) -> Step {
        if let NodeKind::ValueSpec { ty: Some(ty), .. } = self.kind(node)
            && self.offset > self.span(*ty).end
        {
            inf.obj_type = self.type_of(*ty);
        }
        Step::Stop
    }

    fn infer_return(&self, node: NodeId, inf: &mut Inference) -> Step {
        let NodeKind::Return { results } = self.kind(node) else {
            return Step::Stop;
        };
        if let Some(func) = &self.enclosing_func {
            let idx = expr_at_pos(self, results);
            if let Some(result) = func.sig.results.get(idx) {
                inf.obj_type = Some(result.ty.clone());
            }
        }
        Step::Stop
    }

    fn infer_case_clause(&self, i: usize, node: NodeId, inf: &mut Inference) -> Step {
        let Some(switch) = self.find_switch(i, node) else {
            return Step::Stop;
        };
        let NodeKind::Switch {
            tag: Some(tag),
            body,
            ..
        } = self.kind(switch)
        else {
            return Step::Stop;
        };
        let Some(tag_ty) = self.type_of(*tag) else {
            return Step::Stop;
        };
        inf.obj_type = Some(tag_ty);

        // values already used by sibling cases rank lower
        let NodeKind::Block { stmts, .. } = self.kind(*body) else {
            return Step::Stop;
        };
        for &clause in stmts {
            let NodeKind::CaseClause { list, .. } = self.kind(clause) else {
                continue;
            };
            for &expr in list {
                let span = self.span(expr);
                if span.start < self.offset && self.offset <= span.end {
                    continue;
                }
                let chain = self.obj_chain(expr);
                if !chain.is_empty() {
                    inf.penalized.push(PenalizedChain {
                        chain,
                        penalty: self.policy.switch_case_penalty,
                    });
                }
            }
        }
        Step::Stop
    }

    /// Switch (or type switch) owning `clause` when the cursor sits in the
    /// clause's expression list.
    pub(crate) fn find_switch(&self, i: usize, clause: NodeId) -> Option<NodeId> {
        let NodeKind::CaseClause { colon, .. } = self.kind(clause) else {
            return None;
        };
        if self.offset > *colon {
            return None;
        }
        // clause -> body block -> switch
        let switch = *self.path.get(i + 2)?;
        match self.kind(switch) {
            NodeKind::Switch { .. } | NodeKind::TypeSwitch { .. } => Some(switch),
            _ => None,
        }
    }

    fn infer_slice(&self, node: NodeId, inf: &mut Inference) -> Step {
        if let NodeKind::Slice { lbrack, rbrack, .. } = self.kind(node)
            && *lbrack < self.offset
            && self.offset <= *rbrack
        {
            inf.obj_type = Some(TypeRef::Basic(BasicKind::UntypedInt));
        }
        Step::Stop
    }

    fn infer_index(&self, node: NodeId, inf: &mut Inference) -> Step {
        if let NodeKind::Index {
            x, lbrack, rbrack, ..
        } = self.kind(node)
            && *lbrack < self.offset
            && self.offset <= *rbrack
            && let Some(xt) = self.type_of(*x)
        {
            inf.obj_type = match self.ops.under(&xt) {
                TypeRef::Map { key, .. } => Some(key.as_ref().clone()),
                TypeRef::Slice(_) | TypeRef::Array { .. } | TypeRef::Pointer(_) => {
                    Some(TypeRef::Basic(BasicKind::UntypedInt))
                }
                TypeRef::Basic(kind) if kind.is_string() => {
                    Some(TypeRef::Basic(BasicKind::UntypedInt))
                }
                _ => None,
            };
        }
        Step::Stop
    }

    fn infer_send(&self, node: NodeId, inf: &mut Inference) -> Step {
        if let NodeKind::Send { chan, arrow, .. } = self.kind(node)
            && self.offset > *arrow + 1
            && let Some(ct) = self.type_of(*chan)
            && let TypeRef::Chan { elem, .. } = self.ops.under(&ct)
        {
            inf.obj_type = Some(elem.as_ref().clone());
        }
        Step::Stop
    }

    fn infer_range(&self, node: NodeId, inf: &mut Inference) -> Step {
        if let NodeKind::Range { x, value, .. } = self.kind(node)
            && self.contains(*x)
        {
            inf.obj_kind |= ObjKind::SLICE | ObjKind::ARRAY | ObjKind::MAP | ObjKind::STRING;
            if value.is_none() {
                inf.obj_kind |= ObjKind::CHAN;
            }
        }
        Step::Stop
    }
}

