use burrow_api::{NodeId, NodeKind, SymbolKind};
use tracing::debug;

use crate::completion::context::Completer;

impl Completer<'_> {
    /// Members after `x.`: a package's objects, a value's methods and
    /// fields, or members of a package the file has yet to import.
    pub(crate) fn selector(&mut self, x: NodeId) {
        if let NodeKind::Ident { .. } = self.kind(x)
            && let Some(sym) = self.object_of(x)
            && let SymbolKind::PkgName { imported } = self.store.symbol(sym).kind
        {
            for cand in self.package_members(imported, self.policy.std_score, None) {
                self.deep.enqueue(cand);
            }
            return;
        }

        if let Some(ty) = self.type_of(x) {
            let addressable = self.is_addressable(x);
            for cand in self.methods_and_fields(&ty, addressable, None) {
                self.deep.enqueue(cand);
            }
            if self.options.postfix {
                self.postfix_candidates(x, &ty);
            }
            return;
        }

        if self.options.unimported
            && let NodeKind::Ident { name } = self.kind(x)
        {
            debug!(package = %name, "selector on an unresolved name");
            self.loaded_package_members(name);
        }
    }
}
