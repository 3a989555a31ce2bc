//! Go type relations over the snapshot's structural types.
//!
//! The checker hands us types; we still need identity, assignability,
//! method sets and friends to decide whether a candidate fits.

pub mod format;
pub mod kinds;

use std::collections::HashSet;
use std::sync::Arc;

use burrow_api::{BasicKind, NamedId, Signature, SymbolId, TypeRef, TypeStore};

pub use format::TypeFormatter;
pub use kinds::ObjKind;

/// Named types only ever point at non-named underlying types, but a broken
/// snapshot must not hang us.
const MAX_UNDERLYING_HOPS: usize = 16;

#[derive(Clone, Copy)]
pub struct TypeOps<'a> {
    store: &'a TypeStore,
}

impl<'a> TypeOps<'a> {
    pub fn new(store: &'a TypeStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &'a TypeStore {
        self.store
    }

    pub fn under<'t>(&self, ty: &'t TypeRef) -> &'t TypeRef
    where
        'a: 't,
    {
        let mut current = ty;
        for _ in 0..MAX_UNDERLYING_HOPS {
            match current {
                TypeRef::Named(id) => current = &self.store.named(*id).underlying,
                _ => return current,
            }
        }
        current
    }

    pub fn symbol_type(&self, id: SymbolId) -> Option<&'a TypeRef> {
        self.store.symbol(id).ty.as_ref()
    }

    /// Defined types: named types and the typed predeclared basics.
    pub fn is_defined(&self, ty: &TypeRef) -> bool {
        match ty {
            TypeRef::Named(_) => true,
            TypeRef::Basic(kind) => !kind.is_untyped(),
            _ => false,
        }
    }

    pub fn is_interface(&self, ty: &TypeRef) -> bool {
        matches!(self.under(ty), TypeRef::Interface(_))
    }

    pub fn is_empty_interface(&self, ty: &TypeRef) -> bool {
        matches!(self.under(ty), TypeRef::Interface(i) if i.methods.is_empty())
    }

    pub fn is_pointer(&self, ty: &TypeRef) -> bool {
        matches!(ty, TypeRef::Pointer(_))
    }

    pub fn pointer_elem(&self, ty: &TypeRef) -> Option<TypeRef> {
        match self.under(ty) {
            TypeRef::Pointer(elem) => Some(elem.as_ref().clone()),
            _ => None,
        }
    }

    /// Element type of a slice.
    pub fn deslice(&self, ty: &TypeRef) -> Option<TypeRef> {
        match self.under(ty) {
            TypeRef::Slice(elem) => Some(elem.as_ref().clone()),
            _ => None,
        }
    }

    pub fn signature(&self, ty: &TypeRef) -> Option<Arc<Signature>> {
        match self.under(ty) {
            TypeRef::Signature(sig) => Some(Arc::clone(sig)),
            _ => None,
        }
    }

    pub fn basic(&self, ty: &TypeRef) -> Option<BasicKind> {
        match self.under(ty) {
            TypeRef::Basic(kind) => Some(*kind),
            _ => None,
        }
    }

    pub fn is_error(&self, ty: &TypeRef) -> bool {
        matches!(ty, TypeRef::Named(id) if self.store.named_name(*id) == "error"
            && self.store.symbol(self.store.named(*id).obj).is_universe())
    }

    pub fn is_nilable(&self, ty: &TypeRef) -> bool {
        matches!(
            self.under(ty),
            TypeRef::Pointer(_)
                | TypeRef::Slice(_)
                | TypeRef::Map { .. }
                | TypeRef::Chan { .. }
                | TypeRef::Signature(_)
                | TypeRef::Interface(_)
                | TypeRef::Basic(BasicKind::UnsafePointer)
        )
    }

    /// Type an untyped constant takes when nothing else constrains it.
    pub fn default_type(&self, ty: &TypeRef) -> TypeRef {
        match ty {
            TypeRef::Basic(kind) => TypeRef::Basic(match kind {
                BasicKind::UntypedBool => BasicKind::Bool,
                BasicKind::UntypedInt => BasicKind::Int,
                BasicKind::UntypedRune => BasicKind::Int32,
                BasicKind::UntypedFloat => BasicKind::Float64,
                BasicKind::UntypedString => BasicKind::String,
                other => *other,
            }),
            other => other.clone(),
        }
    }

    pub fn identical(&self, a: &TypeRef, b: &TypeRef) -> bool {
        match (a, b) {
            (TypeRef::Basic(x), TypeRef::Basic(y)) => x == y,
            (TypeRef::Named(x), TypeRef::Named(y)) => x == y,
            (TypeRef::Pointer(x), TypeRef::Pointer(y)) | (TypeRef::Slice(x), TypeRef::Slice(y)) => {
                self.identical(x, y)
            }
            (
                TypeRef::Array { len: l1, elem: e1 },
                TypeRef::Array { len: l2, elem: e2 },
            ) => l1 == l2 && self.identical(e1, e2),
            (
                TypeRef::Map { key: k1, value: v1 },
                TypeRef::Map { key: k2, value: v2 },
            ) => self.identical(k1, k2) && self.identical(v1, v2),
            (
                TypeRef::Chan { dir: d1, elem: e1 },
                TypeRef::Chan { dir: d2, elem: e2 },
            ) => d1 == d2 && self.identical(e1, e2),
            (TypeRef::Signature(x), TypeRef::Signature(y)) => self.identical_signatures(x, y),
            (TypeRef::Struct(x), TypeRef::Struct(y)) => {
                Arc::ptr_eq(x, y)
                    || (x.fields.len() == y.fields.len()
                        && x.fields.iter().zip(&y.fields).all(|(f, g)| {
                            let (f, g) = (self.store.symbol(*f), self.store.symbol(*g));
                            f.name == g.name
                                && f.is_embedded() == g.is_embedded()
                                && self.identical_opt(f.ty.as_ref(), g.ty.as_ref())
                        }))
            }
            (TypeRef::Interface(x), TypeRef::Interface(y)) => {
                Arc::ptr_eq(x, y)
                    || (x.methods.len() == y.methods.len()
                        && x.methods.iter().all(|m| {
                            let m = self.store.symbol(*m);
                            y.methods.iter().any(|n| {
                                let n = self.store.symbol(*n);
                                m.name == n.name && self.identical_opt(m.ty.as_ref(), n.ty.as_ref())
                            })
                        }))
            }
            (TypeRef::Tuple(x), TypeRef::Tuple(y)) => {
                x.len() == y.len() && x.iter().zip(y.iter()).all(|(a, b)| self.identical(a, b))
            }
            _ => false,
        }
    }

    fn identical_opt(&self, a: Option<&TypeRef>, b: Option<&TypeRef>) -> bool {
        match (a, b) {
            (Some(a), Some(b)) => self.identical(a, b),
            _ => false,
        }
    }

    /// Parameter names and receivers do not take part in identity.
    pub fn identical_signatures(&self, a: &Signature, b: &Signature) -> bool {
        a.variadic == b.variadic
            && a.params.len() == b.params.len()
            && a.results.len() == b.results.len()
            && a.params.iter().zip(&b.params).all(|(p, q)| self.identical(&p.ty, &q.ty))
            && a.results.iter().zip(&b.results).all(|(p, q)| self.identical(&p.ty, &q.ty))
    }

    fn has_pointer_receiver(&self, method: SymbolId) -> bool {
        matches!(
            self.symbol_type(method),
            Some(TypeRef::Signature(sig))
                if matches!(sig.recv.as_ref().map(|r| &r.ty), Some(TypeRef::Pointer(_)))
        )
    }

    /// Method set of `ty`, promoted methods included. With `pointer_view`,
    /// methods declared on `*T` are included for a plain `T` too.
    pub fn method_set(&self, ty: &TypeRef, pointer_view: bool) -> Vec<SymbolId> {
        let (base, is_pointer) = match ty {
            TypeRef::Pointer(elem) => (elem.as_ref(), true),
            other => (other, false),
        };
        if let TypeRef::Interface(iface) = self.under(base) {
            // A pointer to an interface has no methods.
            return if is_pointer {
                Vec::new()
            } else {
                iface.methods.clone()
            };
        }

        let mut out = Vec::new();
        let mut taken: HashSet<&str> = HashSet::new();
        let mut visited: HashSet<NamedId> = HashSet::new();
        let mut level = vec![(base.clone(), is_pointer || pointer_view)];

        while !level.is_empty() {
            let mut next = Vec::new();
            let mut found: Vec<&str> = Vec::new();
            for (t, pointer_ok) in level {
                if let TypeRef::Named(id) = &t {
                    if !visited.insert(*id) {
                        continue;
                    }
                    for &m in &self.store.named(*id).methods {
                        let name = self.store.symbol(m).name.as_str();
                        if taken.contains(name) || (self.has_pointer_receiver(m) && !pointer_ok) {
                            continue;
                        }
                        out.push(m);
                        found.push(name);
                    }
                }
                match self.under(&t) {
                    TypeRef::Struct(st) => {
                        for &f in &st.fields {
                            let field = self.store.symbol(f);
                            found.push(field.name.as_str());
                            if !field.is_embedded() {
                                continue;
                            }
                            match &field.ty {
                                Some(TypeRef::Pointer(elem)) => next.push((elem.as_ref().clone(), true)),
                                Some(other) => next.push((other.clone(), pointer_ok)),
                                None => {}
                            }
                        }
                    }
                    TypeRef::Interface(iface) => {
                        for &m in &iface.methods {
                            let name = self.store.symbol(m).name.as_str();
                            if !taken.contains(name) {
                                out.push(m);
                                found.push(name);
                            }
                        }
                    }
                    _ => {}
                }
            }
            taken.extend(found);
            level = next;
        }
        out
    }

    /// Fields of the struct behind `ty` (one pointer level is looked
    /// through), followed depth-first by the fields of embedded members.
    /// Embedded fields themselves are listed too.
    pub fn fields(&self, ty: &TypeRef) -> Vec<SymbolId> {
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        self.visit_fields(ty, &mut seen, &mut out);
        out
    }

    fn visit_fields(&self, ty: &TypeRef, seen: &mut HashSet<usize>, out: &mut Vec<SymbolId>) {
        let base = match ty {
            TypeRef::Pointer(elem) => elem.as_ref(),
            other => other,
        };
        let TypeRef::Struct(st) = self.under(base) else {
            return;
        };
        if !seen.insert(Arc::as_ptr(st) as usize) {
            return;
        }
        for &f in &st.fields {
            out.push(f);
            let field = self.store.symbol(f);
            if field.is_embedded()
                && let Some(fty) = &field.ty
            {
                self.visit_fields(fty, seen, out);
            }
        }
    }

    /// Whether `ty` implements the interface `iface`.
    pub fn implements(&self, ty: &TypeRef, iface: &TypeRef) -> bool {
        let TypeRef::Interface(wanted) = self.under(iface) else {
            return false;
        };
        if wanted.methods.is_empty() {
            return true;
        }
        let have = self.method_set(ty, false);
        wanted.methods.iter().all(|&m| {
            let m = self.store.symbol(m);
            have.iter().any(|&h| {
                let h = self.store.symbol(h);
                h.name == m.name
                    && match (&h.ty, &m.ty) {
                        (Some(TypeRef::Signature(a)), Some(TypeRef::Signature(b))) => {
                            self.identical_signatures(a, b)
                        }
                        _ => false,
                    }
            })
        })
    }

    /// Go assignability of a value of type `v` to a variable of type `t`.
    pub fn assignable(&self, v: &TypeRef, t: &TypeRef) -> bool {
        if v.is_invalid() || t.is_invalid() {
            return false;
        }
        if self.identical(v, t) {
            return true;
        }

        if let TypeRef::Basic(vb) = v
            && vb.is_untyped()
        {
            return match self.under(t) {
                TypeRef::Basic(tb) => {
                    if *vb == BasicKind::UntypedNil {
                        *tb == BasicKind::UnsafePointer
                    } else {
                        untyped_fits(*vb, *tb)
                    }
                }
                TypeRef::Interface(iface) => *vb == BasicKind::UntypedNil || iface.methods.is_empty(),
                TypeRef::Pointer(_)
                | TypeRef::Slice(_)
                | TypeRef::Map { .. }
                | TypeRef::Chan { .. }
                | TypeRef::Signature(_) => *vb == BasicKind::UntypedNil,
                _ => false,
            };
        }

        let (vu, tu) = (self.under(v), self.under(t));
        if self.identical(vu, tu) && (!self.is_defined(v) || !self.is_defined(t)) {
            return true;
        }
        if matches!(tu, TypeRef::Interface(_)) && self.implements(v, t) {
            return true;
        }
        if let (
            TypeRef::Chan {
                dir: burrow_api::ChanDir::Both,
                elem: ve,
            },
            TypeRef::Chan { elem: te, .. },
        ) = (vu, tu)
        {
            return self.identical(ve, te) && (!self.is_defined(v) || !self.is_defined(t));
        }
        false
    }

    /// Go convertibility of `v` to `t`.
    pub fn convertible(&self, v: &TypeRef, t: &TypeRef) -> bool {
        if self.assignable(v, t) {
            return true;
        }
        let (vu, tu) = (self.under(v), self.under(t));
        if self.identical(vu, tu) {
            return true;
        }
        if let (TypeRef::Pointer(a), TypeRef::Pointer(b)) = (v, t)
            && self.identical(self.under(a), self.under(b))
        {
            return true;
        }
        match (vu, tu) {
            (TypeRef::Basic(a), TypeRef::Basic(b)) => {
                (a.is_numeric() && b.is_numeric())
                    || (b.is_string() && (a.is_integer() || a.is_string()))
            }
            (TypeRef::Slice(elem), TypeRef::Basic(b)) => b.is_string() && self.is_byte_or_rune(elem),
            (TypeRef::Basic(a), TypeRef::Slice(elem)) => a.is_string() && self.is_byte_or_rune(elem),
            _ => false,
        }
    }

    fn is_byte_or_rune(&self, ty: &TypeRef) -> bool {
        matches!(
            self.under(ty),
            TypeRef::Basic(BasicKind::Uint8 | BasicKind::Int32)
        )
    }

    pub fn comparable(&self, ty: &TypeRef) -> bool {
        match self.under(ty) {
            TypeRef::Slice(_) | TypeRef::Map { .. } | TypeRef::Signature(_) => false,
            TypeRef::Array { elem, .. } => self.comparable(elem),
            TypeRef::Struct(st) => st.fields.iter().all(|f| {
                self.symbol_type(*f).is_none_or(|t| self.comparable(t))
            }),
            _ => true,
        }
    }

    /// Whether a type assertion from the interface `iface` to `ty` can succeed.
    pub fn assertable_to(&self, iface: &TypeRef, ty: &TypeRef) -> bool {
        self.is_interface(ty) || self.implements(ty, iface)
    }
}

fn untyped_fits(untyped: BasicKind, target: BasicKind) -> bool {
    match untyped {
        BasicKind::UntypedBool => target.is_boolean(),
        BasicKind::UntypedInt | BasicKind::UntypedRune => target.is_numeric(),
        BasicKind::UntypedFloat => target.is_float() || target.is_complex(),
        BasicKind::UntypedString => target.is_string(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burrow_api::{PackageBuilder, Param};

    fn string_result() -> Signature {
        Signature::new(vec![], vec![Param::unnamed(TypeRef::Basic(BasicKind::String))])
    }

    #[test]
    fn pointer_receivers_need_the_pointer_view() {
        let mut b = PackageBuilder::new("main", "example.com/app", "package main\n");
        let file = b.file_scope();
        let t = b.named_type(file, "T", TypeRef::Struct(Default::default()), 0);
        let value = b.method(&t, "Value", Signature::default(), false);
        let pointer = b.method(&t, "Pointer", Signature::default(), true);
        let ops = TypeOps::new(b.store());

        assert_eq!(ops.method_set(&t, false), vec![value]);
        assert_eq!(ops.method_set(&t, true), vec![value, pointer]);
        assert_eq!(ops.method_set(&TypeRef::pointer(t.clone()), false), vec![value, pointer]);
    }

    #[test]
    fn promoted_members_come_from_embedded_fields() {
        let mut b = PackageBuilder::new("main", "example.com/app", "package main\n");
        let file = b.file_scope();
        let pkg = b.current();
        let inner = b.named_type(file, "Inner", TypeRef::Struct(Default::default()), 0);
        let name = b.method(&inner, "Name", string_result(), false);
        let embedded = b.field(pkg, "Inner", inner.clone(), true);
        let count = b.field(pkg, "count", TypeRef::Basic(BasicKind::Int), false);
        let outer = b.named_type(file, "Outer", PackageBuilder::struct_of(vec![embedded, count]), 0);
        let ops = TypeOps::new(b.store());

        assert_eq!(ops.method_set(&outer, false), vec![name]);
        assert_eq!(ops.fields(&outer), vec![embedded, count]);
    }

    #[test]
    fn concrete_types_satisfy_interfaces_through_method_sets() {
        let mut b = PackageBuilder::new("main", "example.com/app", "package main\n");
        let file = b.file_scope();
        let pkg = b.current();
        let stringer_method = b.interface_method(pkg, "String", string_result());
        let stringer = b.named_type(file, "Stringer", PackageBuilder::interface_of(vec![stringer_method]), 0);
        let t = b.named_type(file, "T", TypeRef::Struct(Default::default()), 0);
        b.method(&t, "String", string_result(), true);
        let ops = TypeOps::new(b.store());

        assert!(!ops.assignable(&t, &stringer));
        assert!(ops.assignable(&TypeRef::pointer(t.clone()), &stringer));
        assert!(ops.assignable(&t, &TypeRef::empty_interface()));
    }

    #[test]
    fn defined_types_need_conversion() {
        let mut b = PackageBuilder::new("main", "example.com/app", "package main\n");
        let file = b.file_scope();
        let int = TypeRef::Basic(BasicKind::Int);
        let celsius = b.named_type(file, "Celsius", TypeRef::Basic(BasicKind::Float64), 0);
        let ops = TypeOps::new(b.store());

        assert!(!ops.assignable(&int, &celsius));
        assert!(ops.convertible(&int, &celsius));
        assert!(ops.assignable(&TypeRef::Basic(BasicKind::UntypedInt), &celsius));
        assert!(ops.assignable(&TypeRef::Basic(BasicKind::UntypedNil), &TypeRef::slice(int.clone())));
        assert!(!ops.assignable(&TypeRef::Basic(BasicKind::UntypedNil), &int));
        assert!(ops.assignable(&TypeRef::slice(int.clone()), &TypeRef::slice(int)));
    }

    #[test]
    fn maps_are_not_comparable() {
        let b = PackageBuilder::new("main", "example.com/app", "package main\n");
        let ops = TypeOps::new(b.store());
        let int = TypeRef::Basic(BasicKind::Int);
        assert!(ops.comparable(&int));
        assert!(!ops.comparable(&TypeRef::map(int.clone(), int.clone())));
        assert!(ops.comparable(&TypeRef::array(2, int)));
    }
}
