use std::collections::BTreeMap;

use smol_str::SmolStr;

use super::span::Span;
use super::symbol::{SymbolId, TypeStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Universe,
    Package,
    File,
    Function,
    Block,
}

impl ScopeKind {
    /// Declarations in local scopes only become visible after their position.
    pub fn is_local(self) -> bool {
        matches!(self, ScopeKind::Function | ScopeKind::Block)
    }
}

#[derive(Debug, Clone)]
pub struct Scope {
    pub kind: ScopeKind,
    pub parent: Option<ScopeId>,
    /// Universe, package and file scopes have no span.
    pub span: Option<Span>,
    pub names: BTreeMap<SmolStr, SymbolId>,
}

#[derive(Debug, Clone)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
    file: Option<ScopeId>,
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeTree {
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope {
                kind: ScopeKind::Universe,
                parent: None,
                span: None,
                names: BTreeMap::new(),
            }],
            file: None,
        }
    }

    pub fn universe(&self) -> ScopeId {
        ScopeId(0)
    }

    pub fn add(&mut self, kind: ScopeKind, parent: ScopeId, span: Option<Span>) -> ScopeId {
        self.scopes.push(Scope {
            kind,
            parent: Some(parent),
            span,
            names: BTreeMap::new(),
        });
        let id = ScopeId(self.scopes.len() as u32 - 1);
        if kind == ScopeKind::File {
            self.file = Some(id);
        }
        id
    }

    pub fn insert(&mut self, scope: ScopeId, name: impl Into<SmolStr>, symbol: SymbolId) {
        self.scopes[scope.0 as usize].names.insert(name.into(), symbol);
    }

    pub fn get(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0 as usize]
    }

    pub fn file_scope(&self) -> Option<ScopeId> {
        self.file
    }

    /// Innermost scope whose span contains `offset`, falling back to the file
    /// scope (or the universe when there is none).
    pub fn innermost(&self, offset: usize) -> ScopeId {
        self.scopes
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.span.filter(|span| span.contains(offset)).map(|sp| (i, sp)))
            .min_by_key(|(_, span)| span.len())
            .map(|(i, _)| ScopeId(i as u32))
            .or(self.file)
            .unwrap_or(self.universe())
    }

    /// Scope chain at `offset`, innermost first, universe last.
    pub fn chain_at(&self, offset: usize) -> Vec<ScopeId> {
        std::iter::successors(Some(self.innermost(offset)), |id| self.get(*id).parent).collect()
    }

    /// Finds the scope that declares `name` as visible from `scope` at `pos`.
    pub fn lookup_parent(
        &self,
        scope: ScopeId,
        name: &str,
        pos: usize,
        store: &TypeStore,
    ) -> Option<(ScopeId, SymbolId)> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let s = self.get(id);
            if let Some(&sym) = s.names.get(name)
                && (!s.kind.is_local() || store.symbol(sym).pos < pos)
            {
                return Some((id, sym));
            }
            current = s.parent;
        }
        None
    }
}
