pub mod error;
pub mod runtime;
pub mod traits;
pub mod types;

pub use error::IngestError;
pub use runtime::{DynScanner, FlowControlConfig, FlowController, ScanRuntime};
pub use traits::Scanner;
pub use types::{EnoughFlag, RuntimeConfig, ScanContext, ScanOutcome, ScanStats};
