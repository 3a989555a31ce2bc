use std::collections::HashMap;

use super::symbol::{SymbolId, TypeStore};
use super::syntax::NodeId;
use super::types::TypeRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExprMode {
    Value,
    /// The expression denotes a type, e.g. the callee of `int64(x)`.
    TypeExpr,
    Builtin,
    Package,
    NoValue,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeAndValue {
    pub ty: TypeRef,
    pub mode: ExprMode,
}

/// Per-expression types plus identifier definition and use maps.
#[derive(Debug, Clone, Default)]
pub struct TypeInfo {
    pub types: HashMap<NodeId, TypeAndValue>,
    pub defs: HashMap<NodeId, SymbolId>,
    pub uses: HashMap<NodeId, SymbolId>,
}

impl TypeInfo {
    pub fn object_of(&self, node: NodeId) -> Option<SymbolId> {
        self.defs.get(&node).or_else(|| self.uses.get(&node)).copied()
    }

    /// Recorded expression type, falling back to the type of the identifier's
    /// symbol. Invalid types read as absent.
    pub fn type_of(&self, node: NodeId, store: &TypeStore) -> Option<TypeRef> {
        let ty = match self.types.get(&node) {
            Some(tv) => Some(tv.ty.clone()),
            None => self
                .object_of(node)
                .and_then(|sym| store.symbol(sym).ty.clone()),
        };
        ty.filter(|t| !t.is_invalid())
    }

    pub fn mode_of(&self, node: NodeId) -> Option<ExprMode> {
        self.types.get(&node).map(|tv| tv.mode)
    }

    pub fn is_type_expr(&self, node: NodeId) -> bool {
        self.mode_of(node) == Some(ExprMode::TypeExpr)
    }
}
