use smol_str::SmolStr;

use super::scope::ScopeId;
use super::types::{NamedId, NamedType, TypeRef};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackageId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Var,
    Field { embedded: bool },
    Const,
    Func,
    TypeName,
    PkgName { imported: PackageId },
    /// Universe functions such as `append` or `len`; they carry no type.
    Builtin,
    Nil,
}

/// A declared entity, owned by the type-checked snapshot.
#[derive(Debug, Clone)]
pub struct Symbol {
    pub name: SmolStr,
    pub kind: SymbolKind,
    /// `None` when the checker could not resolve the declaration.
    pub ty: Option<TypeRef>,
    /// `None` for universe symbols.
    pub package: Option<PackageId>,
    pub pos: usize,
}

impl Symbol {
    /// Go rule: the first character is an upper-case letter.
    pub fn is_exported(&self) -> bool {
        self.name.chars().next().is_some_and(char::is_uppercase)
    }

    pub fn is_universe(&self) -> bool {
        self.package.is_none()
    }

    pub fn is_type_name(&self) -> bool {
        matches!(self.kind, SymbolKind::TypeName)
    }

    pub fn is_pkg_name(&self) -> bool {
        matches!(self.kind, SymbolKind::PkgName { .. })
    }

    pub fn is_var(&self) -> bool {
        matches!(self.kind, SymbolKind::Var | SymbolKind::Field { .. })
    }

    pub fn is_field(&self) -> bool {
        matches!(self.kind, SymbolKind::Field { .. })
    }

    pub fn is_embedded(&self) -> bool {
        matches!(self.kind, SymbolKind::Field { embedded: true })
    }

    pub fn is_func(&self) -> bool {
        matches!(self.kind, SymbolKind::Func)
    }

    pub fn imported_package(&self) -> Option<PackageId> {
        match self.kind {
            SymbolKind::PkgName { imported } => Some(imported),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PackageInfo {
    pub name: SmolStr,
    pub path: String,
    pub scope: ScopeId,
}

/// Symbol, named type and package arena of one type-checked snapshot.
#[derive(Debug, Clone, Default)]
pub struct TypeStore {
    symbols: Vec<Symbol>,
    named: Vec<NamedType>,
    packages: Vec<PackageInfo>,
}

impl TypeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_symbol(&mut self, symbol: Symbol) -> SymbolId {
        self.symbols.push(symbol);
        SymbolId(self.symbols.len() as u32 - 1)
    }

    pub fn add_named(&mut self, named: NamedType) -> NamedId {
        self.named.push(named);
        NamedId(self.named.len() as u32 - 1)
    }

    pub fn add_package(&mut self, package: PackageInfo) -> PackageId {
        self.packages.push(package);
        PackageId(self.packages.len() as u32 - 1)
    }

    /// Ids are only ever handed out by this store.
    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.0 as usize]
    }

    pub fn symbol_mut(&mut self, id: SymbolId) -> &mut Symbol {
        &mut self.symbols[id.0 as usize]
    }

    pub fn named(&self, id: NamedId) -> &NamedType {
        &self.named[id.0 as usize]
    }

    pub fn named_mut(&mut self, id: NamedId) -> &mut NamedType {
        &mut self.named[id.0 as usize]
    }

    pub fn package(&self, id: PackageId) -> &PackageInfo {
        &self.packages[id.0 as usize]
    }

    pub fn packages(&self) -> impl Iterator<Item = (PackageId, &PackageInfo)> {
        self.packages
            .iter()
            .enumerate()
            .map(|(i, p)| (PackageId(i as u32), p))
    }

    pub fn package_by_path(&self, path: &str) -> Option<PackageId> {
        self.packages
            .iter()
            .position(|p| p.path == path)
            .map(|i| PackageId(i as u32))
    }

    /// Name of the type name symbol behind a named type.
    pub fn named_name(&self, id: NamedId) -> &str {
        &self.symbol(self.named(id).obj).name
    }
}
