use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use burrow_go::{DeclKind, GoDeclScanner, PackageScan, ScannedDecl};
use burrow_ingest::{RuntimeConfig, ScanRuntime};
use tokio_util::sync::CancellationToken;

fn write_package(dir: &tempfile::TempDir, name: &str, files: &[(&str, &str)]) -> PackageScan {
    let root = dir.path().join(name);
    fs::create_dir_all(&root).expect("create package dir");
    let files = files
        .iter()
        .map(|(file, body)| {
            let path = root.join(file);
            fs::write(&path, body).expect("write source");
            path
        })
        .collect();
    PackageScan {
        name: name.to_string(),
        path: format!("example.com/{name}"),
        files,
    }
}

fn runtime(result_target: usize) -> ScanRuntime<PackageScan, ScannedDecl> {
    ScanRuntime::new(
        RuntimeConfig {
            max_in_flight: 2,
            result_target,
        },
        Arc::new(GoDeclScanner::new()),
    )
}

#[tokio::test]
async fn scans_several_packages_concurrently() {
    let dir = tempfile::tempdir().expect("tempdir");
    let jobs = vec![
        write_package(
            &dir,
            "color",
            &[
                ("color.go", "package color\n\nfunc Paint(s string) string { return s }\n"),
                ("color_test.go", "package color\n\nfunc TestPaint() {}\n"),
            ],
        ),
        write_package(
            &dir,
            "units",
            &[("units.go", "package units\n\nconst Meter = 1\n\ntype Length float64\n")],
        ),
    ];

    let outcome = runtime(usize::MAX)
        .run(jobs, &CancellationToken::new())
        .await
        .expect("scan should succeed");

    let mut names: Vec<_> = outcome
        .items
        .iter()
        .map(|d| format!("{}.{}", d.package_name, d.name))
        .collect();
    names.sort();
    assert_eq!(names, vec!["color.Paint", "units.Length", "units.Meter"]);
    assert!(
        outcome
            .items
            .iter()
            .any(|d| d.name == "Length" && d.kind == DeclKind::Type)
    );
}

#[tokio::test]
async fn unreadable_package_does_not_abort_the_scan() {
    let dir = tempfile::tempdir().expect("tempdir");
    let good = write_package(&dir, "good", &[("good.go", "package good\n\nvar Ready = true\n")]);
    let broken = PackageScan {
        name: "gone".to_string(),
        path: "example.com/gone".to_string(),
        files: vec![PathBuf::from(dir.path()).join("gone/missing.go")],
    };

    let outcome = runtime(usize::MAX)
        .run(vec![broken, good], &CancellationToken::new())
        .await
        .expect("failures are isolated");

    assert_eq!(outcome.stats.failed, 1);
    assert_eq!(outcome.items.len(), 1);
    assert_eq!(outcome.items[0].name, "Ready");
}

#[tokio::test]
async fn cancelled_scan_reports_cancellation() {
    let dir = tempfile::tempdir().expect("tempdir");
    let job = write_package(&dir, "p", &[("p.go", "package p\n\nfunc F() {}\n")]);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = runtime(usize::MAX)
        .run(vec![job], &cancel)
        .await
        .expect_err("cancelled before start");
    assert!(err.is_cancelled());
}
