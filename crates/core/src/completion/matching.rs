//! Does a candidate fit what the cursor expects?

use burrow_api::{BasicKind, Signature, TypeRef};

use super::candidate::{Candidate, Modifier, Obj};
use super::context::Completer;
use crate::types::ObjKind;

/// Pointer layers followed while looking for a dereferenced match.
const MAX_DEREF_DEPTH: usize = 8;

impl Completer<'_> {
    /// Whether `cand` matches the inferred expectation. May attach
    /// modifiers, a conversion or a score penalty to `cand`.
    pub(crate) fn matching_candidate(&self, cand: &mut Candidate) -> bool {
        if self.comment_completion {
            return false;
        }
        // field names inside a struct literal key are always welcome
        if cand.obj.is_field(self.store) && self.want_struct_field_completions() {
            return true;
        }
        if cand.obj.is_type_name(self.store) {
            return self.matching_type_name(cand);
        }
        if self.want_type_name() {
            return false;
        }
        if self.cand_type_matches(cand) {
            return true;
        }

        let Some(cand_type) = cand.obj.ty(self.store) else {
            return false;
        };
        if let Some(sig) = self.ops.signature(&cand_type)
            && self.assignees_match(cand, &sig)
        {
            cand.mods.push(Modifier::Invoke);
            return true;
        }
        // functions in statement position are called by default
        if cand.obj.is_func(self.store) {
            cand.mods.push(Modifier::Invoke);
        }
        false
    }

    /// Fraction to take off `cand` when it repeats a discouraged chain.
    pub(crate) fn penalty(&self, cand: &Candidate) -> f64 {
        self.inference
            .penalized
            .iter()
            .find(|p| obj_chain_matches(cand, &p.chain))
            .map_or(0.0, |p| p.penalty)
    }

    fn cand_type_matches(&self, cand: &mut Candidate) -> bool {
        let inf = &self.inference;
        let mut exp_types: Vec<(TypeRef, bool)> = Vec::with_capacity(2);
        if let Some(obj_type) = &inf.obj_type {
            exp_types.push((obj_type.clone(), false));
            if inf.variadic {
                exp_types.push((TypeRef::slice(obj_type.clone()), true));
            }
        }

        self.any_cand_type(cand, &mut |cand, cand_type, addressable| {
            let Some(cand_type) = self.apply_type_modifiers(cand_type, addressable) else {
                return false;
            };
            if let Some(to) = &inf.convertible_to
                && self.ops.convertible(&cand_type, to)
            {
                return true;
            }

            for (exp_type, is_variadic_slice) in &exp_types {
                if self.ops.is_empty_interface(exp_type) {
                    continue;
                }
                if !self.type_matches(Some(exp_type), &cand_type) {
                    if self.consider_type_conversion(&cand_type, exp_type, &cand.path) {
                        cand.convert_to = Some(exp_type.clone());
                        cand.score *= self.policy.conversion_penalty;
                        return true;
                    }
                    continue;
                }
                if *is_variadic_slice {
                    cand.mods.push(Modifier::TakeDotDotDot);
                }
                // untyped constants lose to exact matches; builtins such as
                // "true" keep their score
                if cand_type.is_untyped()
                    && !self.ops.identical(&cand_type, exp_type)
                    && !cand.obj.is_universe(self.store)
                {
                    let deep_into_package = cand
                        .path
                        .first()
                        .is_some_and(|p| p.is_pkg_name(self.store));
                    cand.score *= if deep_into_package {
                        self.policy.deep_untyped_penalty
                    } else {
                        self.policy.untyped_penalty
                    };
                }
                return true;
            }

            // no specific type: fall back to the coarse kind
            let open = inf
                .obj_type
                .as_ref()
                .is_none_or(|t| self.ops.is_empty_interface(t));
            if open {
                // "<-fo<>" matched once the "<-" applied
                if !inf.mods.is_empty() {
                    return true;
                }
                if self.kind_matches(&cand_type) {
                    if inf.obj_kind == ObjKind::FUNC {
                        cand.mods.push(Modifier::Invoke);
                    }
                    return true;
                }
            }
            false
        })
    }

    /// Tries every way of reading `cand` as a value until `f` accepts one,
    /// recording the modifier that reading needs.
    fn any_cand_type(
        &self,
        cand: &mut Candidate,
        f: &mut dyn FnMut(&mut Candidate, &TypeRef, bool) -> bool,
    ) -> bool {
        let Some(obj_type) = cand.obj.ty(self.store) else {
            return false;
        };
        let addressable = cand.addressable;
        if f(cand, &obj_type, addressable) {
            return true;
        }

        if let Some(sig) = self.ops.signature(&obj_type)
            && sig.results.len() == 1
            && f(cand, &sig.results[0].ty, false)
        {
            cand.mods.push(Modifier::Invoke);
            return true;
        }

        let mut ptr_type = obj_type.clone();
        let mut depth = 0;
        while let Some(elem) = self.ops.pointer_elem(&ptr_type) {
            depth += 1;
            if depth > MAX_DEREF_DEPTH {
                break;
            }
            if f(cand, &elem, false) {
                cand.mods.extend(std::iter::repeat_n(Modifier::Dereference, depth));
                return true;
            }
            ptr_type = elem;
        }

        if addressable && f(cand, &TypeRef::pointer(obj_type.clone()), false) {
            cand.mods.push(Modifier::Reference);
            return true;
        }

        match self.ops.under(&obj_type) {
            TypeRef::Array { elem, .. } => {
                if f(cand, &TypeRef::slice(elem.as_ref().clone()), false) {
                    cand.mods.push(Modifier::TakeSlice);
                    return true;
                }
                if f(cand, &**elem, false) {
                    cand.mods.push(Modifier::Index);
                    return true;
                }
            }
            TypeRef::Slice(elem) | TypeRef::Map { value: elem, .. } => {
                if f(cand, &**elem, false) {
                    cand.mods.push(Modifier::Index);
                    return true;
                }
            }
            _ => {}
        }
        false
    }

    /// Applies the syntax around the cursor (`*`, `&`, `<-`) to a candidate
    /// type; `None` when it cannot apply.
    fn apply_type_modifiers(&self, ty: &TypeRef, addressable: bool) -> Option<TypeRef> {
        let mut ty = ty.clone();
        for m in &self.inference.mods {
            ty = match m {
                Modifier::Dereference => self.ops.pointer_elem(&ty)?,
                Modifier::Reference => {
                    if !addressable {
                        return None;
                    }
                    TypeRef::pointer(ty)
                }
                Modifier::ChanRead => match self.ops.under(&ty) {
                    TypeRef::Chan { elem, .. } => elem.as_ref().clone(),
                    _ => return None,
                },
                _ => ty,
            };
        }
        Some(ty)
    }

    /// Wraps a type in the type-name syntax around the cursor (`[]`, `*`).
    fn apply_type_name_modifiers(&self, ty: &TypeRef) -> TypeRef {
        let mut ty = ty.clone();
        for m in &self.inference.type_name.mods {
            ty = match m {
                Modifier::Reference => TypeRef::pointer(ty),
                Modifier::ArrayType(len) => TypeRef::array(*len, ty),
                Modifier::SliceType => TypeRef::slice(ty),
                _ => ty,
            };
        }
        ty
    }

    pub(crate) fn type_matches(&self, exp_type: Option<&TypeRef>, cand_type: &TypeRef) -> bool {
        let Some(exp_type) = exp_type else {
            return !self.inference.obj_kind.is_empty() && self.kind_matches(cand_type);
        };
        let cand_type = self.apply_type_name_modifiers(cand_type);

        // untyped constants match by constant class; an untyped int also
        // fits a float
        if let (Some(cand_basic), Some(exp_basic)) =
            (self.ops.basic(&cand_type), self.ops.basic(exp_type))
        {
            let (mut a, mut b) = (cand_basic, exp_basic);
            if !a.is_untyped() || (b.is_integer() && b.is_untyped()) {
                std::mem::swap(&mut a, &mut b);
            }
            if a.is_untyped() {
                if a.is_integer() && b.is_float() {
                    return true;
                }
                if a.const_class() == b.const_class() {
                    return true;
                }
            }
        }
        self.ops.assignable(&cand_type, exp_type)
    }

    fn kind_matches(&self, ty: &TypeRef) -> bool {
        self.inference.obj_kind.intersects(ObjKind::of(&self.ops, ty))
    }

    fn consider_type_conversion(&self, from: &TypeRef, to: &TypeRef, path: &[Obj]) -> bool {
        // converting random package-level constants is noise
        if path.first().is_some_and(|p| p.is_pkg_name(self.store)) {
            return false;
        }
        if !self.ops.convertible(from, to) {
            return false;
        }
        // string(int) yields a rune, not digits
        let int_from = self.ops.basic(from).is_some_and(BasicKind::is_integer);
        let string_to = self.ops.basic(to).is_some_and(BasicKind::is_string);
        !(int_from && string_to)
    }

    /// Multi-value call results against the assignees receiving them.
    fn assignees_match(&self, cand: &mut Candidate, sig: &Signature) -> bool {
        let inf = &self.inference;
        if inf.assignees.len() < 2 && !inf.variadic_assignees {
            return false;
        }
        // single results go through the normal matching
        if sig.results.len() == 1 {
            return false;
        }
        // every function would fit func(...any)
        if inf.variadic_assignees
            && inf.assignees.len() == 1
            && inf.assignees[0]
                .as_ref()
                .and_then(|t| self.ops.deslice(t))
                .is_some_and(|t| self.ops.is_empty_interface(&t))
        {
            return false;
        }

        let could_match = if inf.variadic_assignees {
            sig.results.len() + 1 >= inf.assignees.len()
        } else {
            sig.results.len() == inf.assignees.len()
        };
        if !could_match {
            cand.score *= self.policy.assignee_mismatch;
            return false;
        }

        let last = inf.assignees.len().saturating_sub(1);
        let mut all_match = false;
        for (i, result) in sig.results.iter().enumerate() {
            let assignee = if inf.variadic_assignees && i >= last {
                inf.assignees
                    .get(last)
                    .cloned()
                    .flatten()
                    .map(|t| self.ops.deslice(&t).unwrap_or(t))
            } else {
                inf.assignees.get(i).cloned().flatten()
            };
            let Some(assignee) = assignee.filter(|t| !t.is_invalid()) else {
                continue;
            };
            all_match = self.type_matches(Some(&assignee), &result.ty);
            if !all_match {
                break;
            }
        }
        all_match
    }

    fn matching_type_name(&self, cand: &mut Candidate) -> bool {
        if !self.want_type_name() {
            return false;
        }
        let Some(ty) = cand.obj.ty(self.store) else {
            return false;
        };
        let type_name = &self.inference.type_name;
        let fits = |cand_type: &TypeRef| -> bool {
            let cand_type = self.apply_type_name_modifiers(cand_type);
            if let Some(from) = &type_name.assertable_from {
                // "foo.(io.Writer)" on an io.Writer is pointless
                if self.ops.identical(from, &cand_type) {
                    return false;
                }
                if self.ops.is_interface(from) && !self.ops.assertable_to(from, &cand_type) {
                    return false;
                }
            }
            if type_name.want_comparable && !self.ops.comparable(&cand_type) {
                return false;
            }
            if type_name
                .seen_type_switch_cases
                .iter()
                .any(|seen| self.ops.identical(&cand_type, seen))
            {
                return false;
            }
            // "var foo []int; foo = []i<>" wants a type name and a type
            match &self.inference.obj_type {
                Some(expected) => self.ops.assignable(&cand_type, expected),
                None => true,
            }
        };

        if fits(&ty) {
            return true;
        }
        if !self.ops.is_interface(&ty) && fits(&TypeRef::pointer(ty.clone())) {
            // "&Foo{}" for literals, "*Foo" elsewhere
            cand.mods.push(if type_name.comp_lit_type {
                Modifier::Reference
            } else {
                Modifier::Dereference
            });
            return true;
        }
        false
    }
}

/// Whether the candidate's path plus object spells out `chain`.
fn obj_chain_matches(cand: &Candidate, chain: &[burrow_api::SymbolId]) -> bool {
    if chain.len() != cand.path.len() + 1 {
        return false;
    }
    let path_matches = cand
        .path
        .iter()
        .zip(chain)
        .all(|(p, c)| p.symbol() == Some(*c));
    path_matches && cand.obj.symbol() == chain.last().copied()
}
