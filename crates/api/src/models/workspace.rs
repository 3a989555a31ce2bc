use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// What the workspace index knows about one package.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PackageDescriptor {
    pub name: String,
    pub path: String,
    pub importable: bool,
    pub test_variant: bool,
    /// Standard library packages are reachable from every package.
    pub standard: bool,
    pub files: Vec<PathBuf>,
    pub dependencies: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum NameFilter {
    Exact(String),
    Prefix(String),
    Any,
}

impl NameFilter {
    pub fn matches(&self, name: &str) -> bool {
        match self {
            NameFilter::Exact(n) => name == n,
            NameFilter::Prefix(p) => name.starts_with(p.as_str()),
            NameFilter::Any => true,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PackageFilter {
    pub name: NameFilter,
    pub include_tests: bool,
}

impl PackageFilter {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: NameFilter::Exact(name.into()),
            include_tests: false,
        }
    }

    pub fn prefixed(prefix: impl Into<String>) -> Self {
        Self {
            name: NameFilter::Prefix(prefix.into()),
            include_tests: false,
        }
    }

    pub fn accepts(&self, descriptor: &PackageDescriptor) -> bool {
        self.name.matches(&descriptor.name) && (self.include_tests || !descriptor.test_variant)
    }
}

/// A package the completion wants imported.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImportRequest {
    pub path: String,
    /// Explicit name, set only when the package name differs from the
    /// name implied by the path.
    pub name: Option<String>,
}
