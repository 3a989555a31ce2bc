use burrow_api::TypeRef;

use super::TypeOps;

bitflags::bitflags! {
    /// Coarse type categories an expression position may accept.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ObjKind: u16 {
        const ARRAY = 1 << 0;
        const SLICE = 1 << 1;
        const CHAN = 1 << 2;
        const MAP = 1 << 3;
        const STRUCT = 1 << 4;
        const STRING = 1 << 5;
        const INT = 1 << 6;
        const FLOAT = 1 << 7;
        const COMPLEX = 1 << 8;
        const BOOL = 1 << 9;
        const BYTES = 1 << 10;
        const PTR = 1 << 11;
        const INTERFACE = 1 << 12;
        const FUNC = 1 << 13;
    }
}

impl ObjKind {
    /// Categories of `ty`'s underlying type.
    pub fn of(ops: &TypeOps<'_>, ty: &TypeRef) -> ObjKind {
        match ops.under(ty) {
            TypeRef::Basic(kind) => {
                let mut out = ObjKind::empty();
                if kind.is_string() {
                    out |= ObjKind::STRING;
                }
                if kind.is_integer() {
                    out |= ObjKind::INT;
                }
                if kind.is_float() {
                    out |= ObjKind::FLOAT;
                }
                if kind.is_complex() {
                    out |= ObjKind::COMPLEX;
                }
                if kind.is_boolean() {
                    out |= ObjKind::BOOL;
                }
                out
            }
            TypeRef::Array { .. } => ObjKind::ARRAY,
            TypeRef::Slice(elem) => {
                if matches!(ops.under(elem), TypeRef::Basic(burrow_api::BasicKind::Uint8)) {
                    ObjKind::SLICE | ObjKind::BYTES
                } else {
                    ObjKind::SLICE
                }
            }
            TypeRef::Chan { .. } => ObjKind::CHAN,
            TypeRef::Map { .. } => ObjKind::MAP,
            TypeRef::Struct(_) => ObjKind::STRUCT,
            TypeRef::Pointer(_) => ObjKind::PTR,
            TypeRef::Interface(_) => ObjKind::INTERFACE,
            TypeRef::Signature(_) => ObjKind::FUNC,
            TypeRef::Invalid | TypeRef::Named(_) | TypeRef::Tuple(_) => ObjKind::empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burrow_api::{BasicKind, TypeStore};

    #[test]
    fn byte_slices_are_also_bytes() {
        let store = TypeStore::new();
        let ops = TypeOps::new(&store);
        let bytes = TypeRef::slice(TypeRef::Basic(BasicKind::Uint8));
        assert_eq!(ObjKind::of(&ops, &bytes), ObjKind::SLICE | ObjKind::BYTES);
        assert!(ObjKind::of(&ops, &TypeRef::Basic(BasicKind::UntypedString)).contains(ObjKind::STRING));
        assert!(ObjKind::of(&ops, &TypeRef::Invalid).is_empty());
    }
}
