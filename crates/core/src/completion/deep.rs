//! Budgeted breadth-first search over candidate members.
//!
//! Candidates are drained one generation at a time; expanding a candidate
//! queues its members (or its call result's members) into the next
//! generation. The walk never recurses.

use std::time::Instant;

use burrow_api::{ImportRequest, PackageId, SymbolKind, TypeRef};
use tracing::{debug, trace};

use super::candidate::{Candidate, Obj};
use super::context::Completer;
use crate::error::{CompletionError, Result};

/// Longest path a deep candidate may have; bounded by the invoke mask width.
const MAX_PATH_LEN: usize = 63;
/// Candidates processed between two budget checks.
const BUDGET_CHECK_INTERVAL: usize = 100;
/// Share of the budget after which nothing new is queued.
const QUEUE_CLOSE_RATIO: f64 = 0.85;

impl Completer<'_> {
    /// Drains the queue generation by generation. The first `min_depth`
    /// generations are processed whatever the deadline says.
    pub(crate) fn deep_search(&mut self, min_depth: usize) -> Result<()> {
        let result = self.drain_generations(min_depth);
        self.deep.this_gen.clear();
        self.deep.next_gen.clear();
        result
    }

    fn drain_generations(&mut self, min_depth: usize) -> Result<()> {
        let mut depth = 0;
        while !self.deep.next_gen.is_empty() {
            depth += 1;
            if self.cancel.is_cancelled() {
                return Err(CompletionError::Cancelled);
            }
            if depth > min_depth && self.past_deadline() {
                debug!(depth, "deep search stopped at the deadline");
                return Ok(());
            }

            std::mem::swap(&mut self.deep.this_gen, &mut self.deep.next_gen);
            let mut generation = std::mem::take(&mut self.deep.this_gen);
            trace!(depth, candidates = generation.len(), "deep search generation");
            for cand in generation.drain(..) {
                self.visit(cand)?;
            }
            // hand the buffer back so the next swap reuses it
            self.deep.this_gen = generation;
        }
        Ok(())
    }

    fn visit(&mut self, cand: Candidate) -> Result<()> {
        let key = cand.obj.key();
        if cand.path.is_empty() && !self.seen.insert(key.clone()) {
            return Ok(());
        }
        if !self.package_completion && !self.is_accessible(&cand.obj) {
            return Ok(());
        }
        // packages may hold type names and untyped candidates might be ones
        if self.want_type_name()
            && cand.obj.ty(self.store).is_some()
            && !cand.obj.is_type_name(self.store)
            && !cand.obj.is_pkg_name(self.store)
        {
            return Ok(());
        }
        // "foo.Baz" and "bar.Baz" may share an object; a cycle may not
        if cand.in_path(&key) {
            return Ok(());
        }

        let name = cand.deep_name(self.store);
        let match_score = self.matcher.score(&name);
        if match_score > 0.0 {
            self.add_candidate(cand.clone(), match_score);
        }

        self.deep.candidate_count += 1;
        if self.options.budget_ms > 0 && self.deep.candidate_count % BUDGET_CHECK_INTERVAL == 0 {
            if self.cancel.is_cancelled() {
                return Err(CompletionError::Cancelled);
            }
            let spent = Instant::now().duration_since(self.start).as_secs_f64()
                / self.options.budget().as_secs_f64();
            if !self.deep.queue_closed && spent >= QUEUE_CLOSE_RATIO {
                debug!(
                    candidates = self.deep.candidate_count,
                    "budget nearly spent, closing the deep queue"
                );
                self.deep.queue_closed = true;
            }
        }

        if !self.deep.enabled || self.deep.queue_closed || cand.path.len() >= MAX_PATH_LEN {
            return Ok(());
        }
        self.expand(cand);
        Ok(())
    }

    /// Queues the members reachable from `cand`.
    fn expand(&mut self, cand: Candidate) {
        let store = self.store;
        if cand.obj.is_type_name(store) || cand.obj.is_embedded(store) {
            return;
        }

        let mut path = cand.path.clone();
        path.push(cand.obj.clone());

        if let Some(pkg) = self.package_of(&cand.obj) {
            for mut member in self.package_members(pkg, self.policy.std_score, cand.import.clone()) {
                member.invoke_mask = cand.invoke_mask;
                member.path = path.clone();
                self.deep.enqueue(member);
            }
            return;
        }

        let Some(ty) = cand.obj.ty(store) else {
            return;
        };
        // "foo().bar": a call result is searched too, but never addressed
        if let Some(sig) = self.ops.signature(&ty)
            && sig.params.is_empty()
            && sig.results.len() == 1
        {
            let mask = cand.invoke_mask | (1 << cand.path.len());
            for mut member in self.methods_and_fields(&sig.results[0].ty, false, cand.import.clone()) {
                member.invoke_mask = mask;
                member.path = path.clone();
                self.deep.enqueue(member);
            }
        }
        for mut member in self.methods_and_fields(&ty, cand.addressable, cand.import.clone()) {
            member.invoke_mask = cand.invoke_mask;
            member.path = path.clone();
            self.deep.enqueue(member);
        }
    }

    fn package_of(&self, obj: &Obj) -> Option<PackageId> {
        match obj {
            Obj::Symbol(id) => match self.store.symbol(*id).kind {
                SymbolKind::PkgName { imported } => Some(imported),
                _ => None,
            },
            Obj::Package { id, .. } => *id,
            _ => None,
        }
    }

    /// Unexported objects of other packages are out of reach.
    fn is_accessible(&self, obj: &Obj) -> bool {
        match obj.package(self.store) {
            Some(pkg) if pkg != self.view.package() => obj.is_exported(self.store),
            _ => true,
        }
    }

    /// Method set (pointer view when addressable) plus fields of `ty`.
    pub(crate) fn methods_and_fields(
        &self,
        ty: &TypeRef,
        addressable: bool,
        import: Option<ImportRequest>,
    ) -> Vec<Candidate> {
        let is_pointer = self.ops.is_pointer(ty);
        let pointer_view = addressable && !self.ops.is_interface(ty) && !is_pointer;
        let addressable = addressable || is_pointer;

        let methods = self.ops.method_set(ty, pointer_view).into_iter().map(|m| {
            Candidate::new(Obj::Symbol(m), self.policy.std_score)
                .addressable(addressable)
                .with_import(import.clone())
        });
        // fields sort just below methods of the same score
        let field_score = self.policy.std_score - self.policy.field_offset;
        let fields = self.ops.fields(ty).into_iter().map(|f| {
            Candidate::new(Obj::Symbol(f), field_score)
                .addressable(addressable)
                .with_import(import.clone())
        });
        methods.chain(fields).collect()
    }

    /// Every top-level object of `pkg`, in name order.
    pub(crate) fn package_members(
        &self,
        pkg: PackageId,
        score: f64,
        import: Option<ImportRequest>,
    ) -> Vec<Candidate> {
        let scope = self.store.package(pkg).scope;
        self.view
            .scopes()
            .get(scope)
            .names
            .values()
            .map(|&sym| {
                Candidate::new(Obj::Symbol(sym), score)
                    .addressable(self.store.symbol(sym).is_var())
                    .with_import(import.clone())
            })
            .collect()
    }
}
