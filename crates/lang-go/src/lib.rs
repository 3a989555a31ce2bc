//! Go-specific pieces of completion that work without type information:
//! a quick declaration scanner for packages the file does not import yet,
//! import-path naming rules and parameter snippets.

pub mod error;
pub mod naming;
pub mod scanner;
pub mod snippet;

pub use error::ScanError;
pub use scanner::{DeclKind, GoDeclScanner, PackageScan, ScannedDecl, ScannedParam};
