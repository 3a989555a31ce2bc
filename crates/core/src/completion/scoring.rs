use burrow_api::TypeRef;
use tracing::trace;

use super::candidate::{Candidate, Modifier, Obj};
use super::context::Completer;
use crate::config::ScoringPolicy;

impl Completer<'_> {
    /// Scores an accepted candidate and renders it into an item.
    pub(crate) fn add_candidate(&mut self, mut cand: Candidate, match_score: f64) {
        let matched = self.matching_candidate(&mut cand);
        if matched {
            cand.score *= self.policy.high_score;
            let penalty = self.penalty(&cand);
            if penalty > 0.0 {
                cand.score *= 1.0 - penalty;
            }
        } else if cand.obj.is_type_name(self.store)
            && let Some(ty @ TypeRef::Named(_)) = cand.obj.ty(self.store)
        {
            // a type that does not fit may still build a value that does
            self.literal(&ty, cand.import.clone());
        }

        // prefer plain values to method calls unless the call's result is
        // what fits
        if !matched && cand.has_mod(Modifier::Invoke) && self.is_method(&cand.obj) {
            cand.score *= self.policy.method_call_discount;
        }
        // locality: visible unexported names beat exported ones
        if !cand.obj.is_exported(self.store) && !cand.obj.is_universe(self.store) {
            cand.score *= self.policy.unexported_boost;
        }
        if cand.has_mod(Modifier::Index) {
            cand.score *= self.policy.index_discount;
        }

        cand.score -= cand.score * depth_penalty(self, &cand);
        cand.score = cand.score.max(0.0) * match_score;

        trace!(
            name = %cand.deep_name(self.store),
            score = cand.score,
            matched,
            "candidate accepted"
        );
        if let Some(item) = self.item(&cand) {
            self.items.push(item);
        }
    }

    fn is_method(&self, obj: &Obj) -> bool {
        obj.ty(self.store)
            .and_then(|t| self.ops.signature(&t))
            .is_some_and(|sig| sig.recv.is_some())
    }
}

/// Share of the score a deep candidate loses for its path: one segment
/// each, a little less for unexported segments and a little more for calls,
/// normalized so ten plain segments cost everything.
fn depth_penalty(c: &Completer<'_>, cand: &Candidate) -> f64 {
    let policy: &ScoringPolicy = c.policy;
    let raw: f64 = cand
        .path
        .iter()
        .map(|seg| {
            let mut p = policy.depth_segment;
            if !seg.is_exported(c.store) {
                p -= policy.depth_unexported_delta;
            }
            if seg
                .ty(c.store)
                .is_some_and(|t| c.ops.signature(&t).is_some())
            {
                p += policy.depth_signature_delta;
            }
            p
        })
        .sum();
    raw / policy.depth_normalizer
}
