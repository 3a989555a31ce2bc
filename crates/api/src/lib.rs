pub mod error;
pub mod models;
pub mod view;

// Re-export commonly used types
pub use error::{ApiError, ApiResult};
pub use models::*;
pub use view::{ImportEditor, ImportScorer, PackageView, WorkspaceIndex};
