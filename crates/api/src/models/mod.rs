pub mod builder;
pub mod completion;
pub mod info;
pub mod package;
pub mod scope;
pub mod span;
pub mod symbol;
pub mod syntax;
pub mod types;
pub mod workspace;

pub use builder::PackageBuilder;
pub use completion::*;
pub use info::*;
pub use package::*;
pub use scope::*;
pub use span::*;
pub use symbol::*;
pub use syntax::*;
pub use types::*;
pub use workspace::*;
