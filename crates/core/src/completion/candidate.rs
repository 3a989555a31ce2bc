use std::sync::Arc;

use burrow_api::{ImportRequest, PackageId, SymbolId, TypeRef, TypeStore};
use burrow_go::{DeclKind, ScannedDecl};
use smol_str::SmolStr;

/// What a candidate refers to.
#[derive(Debug, Clone)]
pub enum Obj {
    Symbol(SymbolId),
    /// A package the file does not import yet. `id` is set when the
    /// snapshot knows the package's members.
    Package {
        name: SmolStr,
        path: String,
        id: Option<PackageId>,
    },
    /// A member of an unimported package, known only from a quick scan.
    Scanned(Arc<ScannedDecl>),
    /// Stand-in value of a type, used to test literal candidates.
    Value(TypeRef),
}

/// Identity of an [`Obj`] for dedupe and cycle checks.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ObjKey {
    Symbol(SymbolId),
    Package(String),
    Scanned(String, SmolStr),
    Value,
}

impl Obj {
    pub fn key(&self) -> ObjKey {
        match self {
            Obj::Symbol(id) => ObjKey::Symbol(*id),
            Obj::Package { path, .. } => ObjKey::Package(path.clone()),
            Obj::Scanned(decl) => ObjKey::Scanned(decl.package_path.clone(), decl.name.clone()),
            Obj::Value(_) => ObjKey::Value,
        }
    }

    pub fn symbol(&self) -> Option<SymbolId> {
        match self {
            Obj::Symbol(id) => Some(*id),
            _ => None,
        }
    }

    pub fn name<'s>(&'s self, store: &'s TypeStore) -> &'s str {
        match self {
            Obj::Symbol(id) => store.symbol(*id).name.as_str(),
            Obj::Package { name, .. } => name.as_str(),
            Obj::Scanned(decl) => decl.name.as_str(),
            Obj::Value(_) => "",
        }
    }

    /// Declared type; `None` for packages, scanned members and symbols the
    /// checker could not type.
    pub fn ty(&self, store: &TypeStore) -> Option<TypeRef> {
        match self {
            Obj::Symbol(id) => store.symbol(*id).ty.clone().filter(|t| !t.is_invalid()),
            Obj::Value(ty) => Some(ty.clone()),
            Obj::Package { .. } | Obj::Scanned(_) => None,
        }
    }

    pub fn is_type_name(&self, store: &TypeStore) -> bool {
        match self {
            Obj::Symbol(id) => store.symbol(*id).is_type_name(),
            Obj::Scanned(decl) => decl.kind == DeclKind::Type,
            _ => false,
        }
    }

    pub fn is_pkg_name(&self, store: &TypeStore) -> bool {
        match self {
            Obj::Symbol(id) => store.symbol(*id).is_pkg_name(),
            Obj::Package { .. } => true,
            _ => false,
        }
    }

    pub fn is_func(&self, store: &TypeStore) -> bool {
        match self {
            Obj::Symbol(id) => store.symbol(*id).is_func(),
            Obj::Scanned(decl) => decl.kind == DeclKind::Func,
            _ => false,
        }
    }

    pub fn is_field(&self, store: &TypeStore) -> bool {
        matches!(self, Obj::Symbol(id) if store.symbol(*id).is_field())
    }

    pub fn is_embedded(&self, store: &TypeStore) -> bool {
        matches!(self, Obj::Symbol(id) if store.symbol(*id).is_embedded())
    }

    pub fn is_var(&self, store: &TypeStore) -> bool {
        matches!(self, Obj::Symbol(id) if store.symbol(*id).is_var())
    }

    pub fn is_universe(&self, store: &TypeStore) -> bool {
        matches!(self, Obj::Symbol(id) if store.symbol(*id).is_universe())
    }

    pub fn is_exported(&self, store: &TypeStore) -> bool {
        match self {
            Obj::Symbol(id) => store.symbol(*id).is_exported(),
            Obj::Package { .. } => true,
            Obj::Scanned(decl) => burrow_go::naming::is_exported(&decl.name),
            Obj::Value(_) => true,
        }
    }

    pub fn package(&self, store: &TypeStore) -> Option<PackageId> {
        match self {
            Obj::Symbol(id) => store.symbol(*id).package,
            _ => None,
        }
    }
}

/// Adjustment applied to a candidate, or implied by the syntax around the
/// cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    /// `*x`
    Dereference,
    /// `&x`
    Reference,
    /// `<-x`
    ChanRead,
    /// `[]T` in a type position.
    SliceType,
    /// `[N]T` in a type position.
    ArrayType(u64),
    /// `x()`
    Invoke,
    /// `x[:]`
    TakeSlice,
    /// `x...`
    TakeDotDotDot,
    /// `x[]`
    Index,
}

#[derive(Debug, Clone)]
pub struct Candidate {
    pub obj: Obj,
    pub score: f64,
    /// Objects traversed to reach `obj`, outermost first.
    pub path: Vec<Obj>,
    /// Bit `i` set when `path[i]` is called.
    pub invoke_mask: u64,
    pub addressable: bool,
    pub mods: Vec<Modifier>,
    /// Explicit conversion the candidate needs to fit.
    pub convert_to: Option<TypeRef>,
    pub import: Option<ImportRequest>,
}

impl Candidate {
    pub fn new(obj: Obj, score: f64) -> Self {
        Self {
            obj,
            score,
            path: Vec::new(),
            invoke_mask: 0,
            addressable: false,
            mods: Vec::new(),
            convert_to: None,
            import: None,
        }
    }

    pub fn addressable(mut self, addressable: bool) -> Self {
        self.addressable = addressable;
        self
    }

    pub fn with_import(mut self, import: Option<ImportRequest>) -> Self {
        self.import = import;
        self
    }

    pub fn has_mod(&self, modifier: Modifier) -> bool {
        self.mods.contains(&modifier)
    }

    pub fn in_path(&self, key: &ObjKey) -> bool {
        self.path.iter().any(|p| &p.key() == key)
    }

    /// Name as written at the cursor, e.g. `a.b().c`.
    pub fn deep_name(&self, store: &TypeStore) -> String {
        let mut out = String::new();
        for (i, seg) in self.path.iter().enumerate() {
            out.push_str(seg.name(store));
            if self.invoke_mask & (1 << i) != 0 {
                out.push_str("()");
            }
            out.push('.');
        }
        out.push_str(self.obj.name(store));
        out
    }
}
