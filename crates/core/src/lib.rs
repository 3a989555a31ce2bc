//! Type-directed completion for Go packages.
//!
//! [`CompletionEngine`] answers completion requests against a type-checked
//! [`burrow_api::PackageView`], consulting the workspace index for packages
//! the file does not import yet.

pub mod completion;
pub mod config;
pub mod deps;
pub mod error;
pub mod logging;
pub mod types;

pub use completion::assemble::{LabelAliases, NoAliases, StaticAliases};
pub use completion::CompletionEngine;
pub use config::{CompletionOptions, ScoringPolicy};
pub use error::{CompletionError, Result};
