mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use burrow_api::{CheckedPackage, CompletionRequest, PackageBuilder, Signature};
use burrow_core::CompletionError;
use burrow_go::{PackageScan, ScannedDecl};
use burrow_ingest::{IngestError, ScanContext, Scanner};
use common::{
    FakeIndex, FuncFixture, complete, descriptor, engine, find, finish, split_cursor, typing,
};
use lsp_types::CompletionItemKind;
use tokio_util::sync::CancellationToken;

/// `NAME.<typed><>` inside main, with `NAME` resolving to nothing.
fn unresolved_selector(x: &str, typed: &str) -> (CheckedPackage, usize) {
    let (src, at) = split_cursor(&format!(
        "package main\n\nfunc main() {{\n\t{x}.{typed}<>\n}}\n"
    ));
    let mut b = PackageBuilder::new("main", "example.com/app", src);
    let main = FuncFixture::new(&mut b, "main", Signature::default());
    let x_node = b.ident_nth(x, 0).unwrap();
    let sel = typing(&mut b, typed, at);
    let selector = b.selector(x_node, sel);
    let stmt = b.expr_stmt(selector);
    let decl = main.decl(&mut b, vec![stmt]);
    (finish(b, vec![decl]), at)
}

#[tokio::test]
async fn package_names_come_with_an_import() {
    let (src, at) = split_cursor("package main\n\nfunc main() {\n\tstrc<>\n}\n");
    let mut b = PackageBuilder::new("main", "example.com/app", src);
    let main = FuncFixture::new(&mut b, "main", Signature::default());
    let typed = typing(&mut b, "strc", at);
    let stmt = b.expr_stmt(typed);
    let decl = main.decl(&mut b, vec![stmt]);
    let pkg = finish(b, vec![decl]);
    let index = FakeIndex::with(vec![
        descriptor("strconv", "strconv", Vec::new()),
        descriptor("strings", "strings", Vec::new()),
    ]);
    let (engine, editor) = engine(index);

    let list = complete(&engine, &pkg, at).await;
    let strconv = find(&list, "strconv").unwrap();
    assert_eq!(strconv.kind, CompletionItemKind::MODULE);
    assert_eq!(strconv.additional_edits.len(), 1);
    assert_eq!(strconv.additional_edits[0].new_text, "import \"strconv\"\n");
    // "strings" does not match the prefix
    assert!(find(&list, "strings").is_none());

    let calls = editor.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].path, "strconv");
}

#[tokio::test]
async fn members_of_unloaded_packages_are_scanned_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("util.go");
    std::fs::write(
        &file,
        "package stringsx\n\nfunc Reverse(s string) string { return s }\n\nfunc helper() {}\n",
    )
    .unwrap();

    let (pkg, at) = unresolved_selector("stringsx", "Rev");
    let index = FakeIndex::with(vec![descriptor(
        "stringsx",
        "example.com/stringsx",
        vec![file],
    )]);
    let (engine, editor) = engine(index);

    let list = complete(&engine, &pkg, at).await;
    let reverse = find(&list, "Reverse").unwrap();
    assert!(
        reverse
            .additional_edits
            .iter()
            .any(|e| e.new_text.contains("example.com/stringsx"))
    );
    assert!(find(&list, "helper").is_none());
    assert_eq!(editor.calls.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn package_lookup_runs_once_per_request() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("util.go");
    std::fs::write(&file, "package stringsx\n\nfunc Reverse(s string) string { return s }\n").unwrap();

    let (pkg, at) = unresolved_selector("stringsx", "");
    let index = FakeIndex::with(vec![descriptor(
        "stringsx",
        "example.com/stringsx",
        vec![file],
    )]);
    let lookups = index.lookups.clone();
    let (engine, _) = engine(index);

    let list = complete(&engine, &pkg, at).await;
    assert!(find(&list, "Reverse").is_some());
    assert_eq!(lookups.load(Ordering::SeqCst), 1);
}

/// Spins until cancelled, counting the scans in flight.
#[derive(Default)]
struct BlockingScanner {
    started: AtomicUsize,
    live: AtomicUsize,
}

impl Scanner<PackageScan, ScannedDecl> for BlockingScanner {
    fn scan(&self, _job: PackageScan, ctx: &ScanContext) -> Result<Vec<ScannedDecl>, IngestError> {
        self.live.fetch_add(1, Ordering::SeqCst);
        self.started.fetch_add(1, Ordering::SeqCst);
        while !ctx.cancel.is_cancelled() {
            std::thread::sleep(Duration::from_millis(5));
        }
        self.live.fetch_sub(1, Ordering::SeqCst);
        Err(IngestError::Cancelled)
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn cancelling_a_request_stops_its_scan() {
    let (pkg, at) = unresolved_selector("stringsx", "");
    let index = FakeIndex::with(vec![descriptor(
        "stringsx",
        "example.com/stringsx",
        vec!["stringsx/util.go".into()],
    )]);
    let scanner = Arc::new(BlockingScanner::default());
    let (engine, _) = engine(index);
    let engine = engine.with_scanner(scanner.clone());

    let cancel = CancellationToken::new();
    let canceller = {
        let cancel = cancel.clone();
        let scanner = scanner.clone();
        tokio::spawn(async move {
            while scanner.started.load(Ordering::SeqCst) == 0 {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
            cancel.cancel();
        })
    };

    let result = engine.complete(&pkg, CompletionRequest::at(at), &cancel).await;
    canceller.await.unwrap();
    assert!(matches!(result, Err(CompletionError::Cancelled)));
    assert_eq!(scanner.live.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn cancelled_tokens_fail_fast() {
    let (pkg, at) = unresolved_selector("stringsx", "Rev");
    let (engine, _) = engine(FakeIndex::default());
    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = engine.complete(&pkg, CompletionRequest::at(at), &cancel).await;
    assert!(matches!(result, Err(CompletionError::Cancelled)));
}

#[tokio::test]
async fn offsets_outside_the_file_are_rejected() {
    let (pkg, _) = unresolved_selector("stringsx", "Rev");
    let (engine, _) = engine(FakeIndex::default());
    let beyond = 10_000;

    let result = engine
        .complete(&pkg, CompletionRequest::at(beyond), &CancellationToken::new())
        .await;
    assert!(matches!(
        result,
        Err(CompletionError::UnresolvablePosition { offset }) if offset == beyond
    ));
}
