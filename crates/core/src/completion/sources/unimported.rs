//! Members of packages the file does not import yet.
//!
//! Packages already loaded in the snapshot are listed from their scope.
//! Others are handed to the quick declaration scan, which runs while the
//! local candidates are searched; its results come back through
//! [`Completer::accept_scanned`].

use std::collections::HashMap;
use std::sync::Arc;

use burrow_api::{NodeKind, PackageDescriptor, PackageFilter};
use burrow_go::{PackageScan, ScannedDecl};
use smol_str::SmolStr;
use tracing::{debug, warn};

use super::Plan;
use super::lexical::import_request;
use crate::completion::candidate::{Candidate, Obj};
use crate::completion::context::Completer;
use crate::deps::{DependencyGraph, is_import_candidate};

/// Packages queued for the quick scan, with what is needed to score their
/// members once they come back.
#[derive(Debug, Default)]
pub(crate) struct MemberScan {
    pub jobs: Vec<PackageScan>,
    relevance: HashMap<String, f64>,
    /// Package name by path.
    names: HashMap<String, SmolStr>,
}

/// Import candidates named like an unresolved selector operand.
#[derive(Debug, Default)]
pub(crate) struct Importable {
    /// Sorted by relevance then path.
    pub packages: Vec<PackageDescriptor>,
    pub relevance: HashMap<String, f64>,
}

impl MemberScan {
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

impl Completer<'_> {
    /// Scan jobs for `x.<>` when `x` names no object, most relevant
    /// packages first.
    pub(crate) fn plan_member_scan(&mut self, plan: Plan) -> Option<MemberScan> {
        if !self.options.unimported {
            return None;
        }
        let Plan::Selector { x } = plan else {
            return None;
        };
        let NodeKind::Ident { name } = self.kind(x) else {
            return None;
        };
        if self.object_of(x).is_some() || self.type_of(x).is_some() {
            return None;
        }

        let importable = self.importable_packages(name);
        let mut scan = MemberScan {
            relevance: importable.relevance.clone(),
            ..MemberScan::default()
        };
        // loaded packages are listed from the snapshot instead
        for package in importable
            .packages
            .iter()
            .filter(|p| self.store.package_by_path(&p.path).is_none())
            .take(self.options.max_unimported_packages)
        {
            scan.names.insert(package.path.clone(), package.name.as_str().into());
            scan.jobs.push(PackageScan::from(package));
        }
        debug!(
            name = %name,
            packages = scan.jobs.len(),
            "planned unimported member scan"
        );
        Some(scan)
    }

    /// Workspace packages called `name` that may be imported here. The
    /// lookup is remembered for the rest of the request.
    fn importable_packages(&mut self, name: &str) -> Arc<Importable> {
        if let Some((cached, importable)) = &self.importable
            && cached == name
        {
            return Arc::clone(importable);
        }
        let importable = Arc::new(self.lookup_importable(name));
        self.importable = Some((name.to_string(), Arc::clone(&importable)));
        importable
    }

    fn lookup_importable(&self, name: &str) -> Importable {
        let found = match self.collab.index.find_packages(&PackageFilter::named(name)) {
            Ok(found) => found,
            Err(e) => {
                warn!("package lookup failed: {e}");
                return Importable::default();
            }
        };
        let current = &self.store.package(self.view.package()).path;
        let graph = DependencyGraph::build(self.collab.index, current);
        let mut packages: Vec<PackageDescriptor> = found
            .into_iter()
            .filter(|p| is_import_candidate(p, current, &graph, |path| self.view.imports_path(path)))
            .collect();

        let paths: Vec<String> = packages.iter().map(|p| p.path.clone()).collect();
        let relevance = self.collab.scorer.relevance(&paths);
        let rel = |path: &str| relevance.get(path).copied().unwrap_or_default();
        packages.sort_by(|a, b| {
            rel(&b.path)
                .total_cmp(&rel(&a.path))
                .then_with(|| a.path.cmp(&b.path))
        });
        Importable {
            packages,
            relevance,
        }
    }

    /// Members of snapshot packages called `name` the file does not import.
    pub(crate) fn loaded_package_members(&mut self, name: &str) {
        let importable = self.importable_packages(name);
        let current = self.view.package();
        let loaded: Vec<_> = self
            .store
            .packages()
            .filter(|(id, info)| {
                *id != current
                    && info.name == name
                    && !self.view.imports_path(&info.path)
                    && importable.packages.iter().any(|p| p.path == info.path)
            })
            .map(|(id, info)| (id, info.path.clone()))
            .collect();

        for (id, path) in loaded {
            let score = self
                .policy
                .unimported_score(importable.relevance.get(&path).copied().unwrap_or_default());
            let import = import_request(&path, name);
            for cand in self.package_members(id, score, Some(import)) {
                self.deep.enqueue(cand);
            }
        }
    }

    /// Queues scanned declarations as candidates for the second deep pass.
    pub(crate) fn accept_scanned(&mut self, scan: &MemberScan, mut decls: Vec<ScannedDecl>) {
        decls.sort_by(|a, b| {
            a.package_path
                .cmp(&b.package_path)
                .then_with(|| a.name.cmp(&b.name))
        });
        decls.dedup_by(|a, b| a.package_path == b.package_path && a.name == b.name);
        debug!(decls = decls.len(), "accepting scanned members");

        for mut decl in decls {
            let Some(name) = scan.names.get(&decl.package_path) else {
                continue;
            };
            decl.package_name = name.clone();
            let relevance = scan
                .relevance
                .get(&decl.package_path)
                .copied()
                .unwrap_or_default();
            let import = import_request(&decl.package_path, name);
            let score = self.policy.unimported_score(relevance);
            self.deep.enqueue(
                Candidate::new(Obj::Scanned(Arc::new(decl)), score).with_import(Some(import)),
            );
        }
    }
}
