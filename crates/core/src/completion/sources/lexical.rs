use std::collections::HashSet;

use burrow_api::{ImportRequest, NodeKind, PackageFilter, SymbolKind, TypeRef};
use burrow_go::naming::needs_import_name;
use smol_str::SmolStr;
use tracing::{debug, warn};

use crate::completion::candidate::{Candidate, Obj};
use crate::completion::context::Completer;
use crate::deps::{DependencyGraph, is_import_candidate};

impl Completer<'_> {
    /// Names visible at the cursor, innermost scope first. An inner
    /// declaration hides outer ones of the same name.
    pub(crate) fn lexical(&mut self) {
        let view = self.view;
        let store = self.store;
        let scopes = view.scopes();
        let decl_lhs = self.enclosing_decl_lhs();
        let in_const = self.in_const_decl();

        let mut seen: HashSet<SmolStr> = HashSet::new();
        for (depth, &scope) in view.scope_chain(self.offset).iter().enumerate() {
            for (name, &sym) in &scopes.get(scope).names {
                // declared further out, or not visible yet
                match scopes.lookup_parent(scope, name, self.offset, store) {
                    Some((found, _)) if found == scope => {}
                    _ => continue,
                }
                let symbol = store.symbol(sym);
                if decl_lhs.contains(&symbol.pos) && !symbol.is_universe() {
                    continue;
                }
                if symbol.is_universe() && name == "iota" && !in_const {
                    continue;
                }

                let mut score = self.policy.std_score * self.policy.scope_decay.powi(depth as i32);
                if symbol.is_universe() {
                    score *= self.policy.universe_factor;
                }
                if matches!(symbol.kind, SymbolKind::Nil) {
                    score *= self.policy.nil_factor;
                }
                if seen.insert(name.clone()) {
                    self.deep.enqueue(
                        Candidate::new(Obj::Symbol(sym), score).addressable(symbol.is_var()),
                    );
                }
            }
        }

        self.expected_type_package(&mut seen);
        if self.options.unimported {
            self.unimported_packages(&seen);
        }
        // unnamed expected types get their literal up front; named ones come
        // through their type name
        if let Some(ty) = self.inference.obj_type.clone()
            && !matches!(ty, TypeRef::Named(_))
        {
            self.literal(&ty, None);
        }
    }

    /// Offers the package of a named expected type when the file does not
    /// import it yet.
    fn expected_type_package(&mut self, seen: &mut HashSet<SmolStr>) {
        let Some(TypeRef::Named(id)) = &self.inference.obj_type else {
            return;
        };
        let Some(pkg) = self.store.symbol(self.store.named(*id).obj).package else {
            return;
        };
        if pkg == self.view.package() {
            return;
        }
        let info = self.store.package(pkg);
        if seen.contains(&info.name) || self.view.imports_path(&info.path) {
            return;
        }
        seen.insert(info.name.clone());
        let import = import_request(&info.path, &info.name);
        debug!(package = %info.path, "offering the expected type's package");
        self.deep.enqueue(
            Candidate::new(
                Obj::Package {
                    name: info.name.clone(),
                    path: info.path.clone(),
                    id: Some(pkg),
                },
                self.policy.std_score,
            )
            .with_import(Some(import)),
        );
    }

    /// Package names the typed prefix could start, taken from the workspace.
    fn unimported_packages(&mut self, seen: &HashSet<SmolStr>) {
        let prefix = self.surrounding.prefix.clone();
        if prefix.is_empty() {
            return;
        }
        let found = match self.collab.index.find_packages(&PackageFilter::prefixed(&prefix)) {
            Ok(found) => found,
            Err(e) => {
                warn!("package lookup failed: {e}");
                return;
            }
        };

        let current = &self.store.package(self.view.package()).path;
        let graph = DependencyGraph::build(self.collab.index, current);
        let mut packages: Vec<_> = found
            .into_iter()
            .filter(|p| is_import_candidate(p, current, &graph, |path| self.view.imports_path(path)))
            .filter(|p| !seen.contains(p.name.as_str()))
            .collect();
        let paths: Vec<String> = packages.iter().map(|p| p.path.clone()).collect();
        let relevance = self.collab.scorer.relevance(&paths);
        let rel = |path: &str| relevance.get(path).copied().unwrap_or_default();
        packages.sort_by(|a, b| {
            rel(&b.path)
                .total_cmp(&rel(&a.path))
                .then_with(|| a.path.cmp(&b.path))
        });

        for package in packages.into_iter().take(self.options.max_unimported_packages) {
            let import = import_request(&package.path, &package.name);
            let score = self.policy.unimported_score(rel(&package.path));
            // members are unknown until the package is loaded, so no id
            self.deep.enqueue(
                Candidate::new(
                    Obj::Package {
                        name: package.name.into(),
                        path: package.path,
                        id: None,
                    },
                    score,
                )
                .with_import(Some(import)),
            );
        }
    }

    /// Start offsets of the names an enclosing `x := <>` or `var x = <>`
    /// declares; they are not usable on their own right-hand side.
    fn enclosing_decl_lhs(&self) -> Vec<usize> {
        for &node in &self.path {
            match self.kind(node) {
                NodeKind::ValueSpec { names, .. } => {
                    return names.iter().map(|&n| self.span(n).start).collect();
                }
                NodeKind::Assign { lhs, define, .. } => {
                    if !define {
                        return Vec::new();
                    }
                    return lhs
                        .iter()
                        .filter(|&&n| matches!(self.kind(n), NodeKind::Ident { .. }))
                        .map(|&n| self.span(n).start)
                        .collect();
                }
                _ => {}
            }
        }
        Vec::new()
    }

    fn in_const_decl(&self) -> bool {
        self.path.iter().any(|&node| match self.kind(node) {
            NodeKind::ValueSpec { names, .. } => names
                .first()
                .and_then(|&n| self.object_of(n))
                .is_some_and(|sym| matches!(self.store.symbol(sym).kind, SymbolKind::Const)),
            _ => false,
        })
    }
}

/// Import of `path` under `name`, naming it explicitly when the path alone
/// would not.
pub(crate) fn import_request(path: &str, name: &str) -> ImportRequest {
    ImportRequest {
        path: path.to_string(),
        name: needs_import_name(path, name).then(|| name.to_string()),
    }
}
