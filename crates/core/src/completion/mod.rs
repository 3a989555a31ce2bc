//! Type-directed completion for Go.
//!
//! A request goes through four stages:
//!
//! 1. the expected type and object at the cursor are inferred from the
//!    enclosing syntax ([`inference`]);
//! 2. candidate sources queue objects in scope, members of a selector
//!    operand, struct fields and so on ([`sources`]);
//! 3. a budgeted breadth-first search expands candidates into members and
//!    call results, scoring every one it visits ([`deep`], [`scoring`]);
//! 4. the items are merged, given their import edits and ordered
//!    ([`assemble`]).
//!
//! Members of packages the file does not import yet are scanned from disk
//! concurrently with stages 2 and 3, and searched once the scan is done.

pub mod assemble;
mod candidate;
mod context;
mod deep;
mod format;
mod inference;
mod matcher;
mod matching;
mod scoring;
mod sources;

use std::sync::Arc;
use std::time::Instant;

use burrow_api::{
    CompletionList, CompletionRequest, ImportEditor, ImportScorer, NodeKind, PackageView,
    Selection, Span, WorkspaceIndex,
};
use burrow_go::{GoDeclScanner, PackageScan, ScannedDecl};
use burrow_ingest::{DynScanner, IngestError, RuntimeConfig, ScanRuntime};
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

use crate::config::CompletionOptions;
use crate::error::{CompletionError, Result};
use assemble::{Assembler, LabelAliases, NoAliases};
use context::{Collaborators, Completer};
use sources::Plan;

pub use assemble::StaticAliases;

/// Entry point of completion. Holds the workspace collaborators and options;
/// every request gets its own state, so one engine serves concurrent
/// requests.
pub struct CompletionEngine {
    index: Arc<dyn WorkspaceIndex>,
    scorer: Arc<dyn ImportScorer>,
    editor: Arc<dyn ImportEditor>,
    aliases: Arc<dyn LabelAliases>,
    scanner: DynScanner<PackageScan, ScannedDecl>,
    options: CompletionOptions,
}

impl CompletionEngine {
    pub fn new(
        index: Arc<dyn WorkspaceIndex>,
        scorer: Arc<dyn ImportScorer>,
        editor: Arc<dyn ImportEditor>,
    ) -> Self {
        Self {
            index,
            scorer,
            editor,
            aliases: Arc::new(NoAliases),
            scanner: Arc::new(GoDeclScanner::new()),
            options: CompletionOptions::default(),
        }
    }

    pub fn with_options(mut self, options: CompletionOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_aliases(mut self, aliases: Arc<dyn LabelAliases>) -> Self {
        self.aliases = aliases;
        self
    }

    /// Replaces the declaration scanner used for unimported packages.
    pub fn with_scanner(mut self, scanner: DynScanner<PackageScan, ScannedDecl>) -> Self {
        self.scanner = scanner;
        self
    }

    pub fn options(&self) -> &CompletionOptions {
        &self.options
    }

    /// Completes at `request.offset` in the file of `view`.
    ///
    /// Returns `CompletionError::Cancelled` when `cancel` fires; any scan
    /// started for the request has finished by the time this returns.
    #[instrument(skip_all, fields(offset = request.offset))]
    pub async fn complete(
        &self,
        view: &dyn PackageView,
        request: CompletionRequest,
        cancel: &CancellationToken,
    ) -> Result<CompletionList> {
        let start = Instant::now();
        if cancel.is_cancelled() {
            return Err(CompletionError::Cancelled);
        }

        let path = view.path_enclosing(request.offset);
        let Some(&first) = path.first() else {
            return Err(CompletionError::UnresolvablePosition {
                offset: request.offset,
            });
        };
        // nothing to offer inside a string or number literal
        if matches!(view.syntax().kind(first), NodeKind::BasicLit { .. })
            && view.syntax().comment_at(request.offset).is_none()
        {
            debug!("cursor inside a basic literal");
            return Ok(CompletionList {
                items: Vec::new(),
                surrounding: Selection {
                    span: Span::empty(request.offset),
                    prefix: String::new(),
                },
            });
        }

        let collab = Collaborators {
            index: self.index.as_ref(),
            scorer: self.scorer.as_ref(),
        };
        let mut completer =
            Completer::new(view, &request, path, &self.options, collab, cancel, start);
        let Some(plan) = completer.plan() else {
            return Ok(CompletionList {
                items: Vec::new(),
                surrounding: completer.surrounding,
            });
        };
        debug!(?plan, prefix = %completer.surrounding.prefix, "completion planned");

        let mut member_scan = completer.plan_member_scan(plan).filter(|s| !s.is_empty());
        let scan_token = cancel.child_token();
        // a dropped request must not leave the scan running
        let _scan_guard = scan_token.clone().drop_guard();
        let scan_handle = member_scan.as_mut().map(|scan| {
            let jobs = std::mem::take(&mut scan.jobs);
            let runtime = ScanRuntime::new(RuntimeConfig::from(&self.options), self.scanner.clone());
            let token = scan_token.clone();
            tokio::spawn(async move { runtime.run(jobs, &token).await })
        });

        let local = local_candidates(&mut completer, plan);

        if let (Some(handle), Some(scan)) = (scan_handle, member_scan) {
            if local.is_err() {
                scan_token.cancel();
            }
            let joined = handle.await;
            local?;
            match joined.map_err(|e| CompletionError::Internal(e.to_string()))? {
                Ok(outcome) => {
                    debug!(
                        decls = outcome.items.len(),
                        failed = outcome.stats.failed,
                        "unimported scan done"
                    );
                    completer.accept_scanned(&scan, outcome.items);
                    completer.deep_search(1)?;
                }
                Err(IngestError::Cancelled) => return Err(CompletionError::Cancelled),
                Err(e) => warn!("unimported scan failed: {e}"),
            }
        } else {
            local?;
        }

        if cancel.is_cancelled() {
            return Err(CompletionError::Cancelled);
        }

        let assembler = Assembler {
            editor: self.editor.as_ref(),
            aliases: self.aliases.as_ref(),
            options: &self.options,
            file: view.file_path(),
            source: view.source(),
        };
        let items = assembler.assemble(std::mem::take(&mut completer.items));
        debug!(
            items = items.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "completion done"
        );
        Ok(CompletionList {
            items,
            surrounding: completer.surrounding,
        })
    }
}

/// Sources that need no disk access, followed by the deep search over what
/// they queued.
fn local_candidates(completer: &mut Completer<'_>, plan: Plan) -> Result<()> {
    completer.collect(plan);
    completer.deep_search(1)?;
    if plan == Plan::Lexical {
        completer.statement_candidates();
    }
    Ok(())
}
