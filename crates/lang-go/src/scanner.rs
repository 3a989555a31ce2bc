//! Type-free scan of a package's top-level declarations.
//!
//! Function bodies are never visited; only names, declaration kinds and
//! the syntactic parameter lists of functions are recovered.

use std::path::{Path, PathBuf};

use burrow_api::PackageDescriptor;
use burrow_ingest::{IngestError, ScanContext, Scanner};
use smol_str::SmolStr;
use tracing::{debug, trace};
use tree_sitter::{Language, Node, Parser};

use crate::error::ScanError;
use crate::naming::is_exported;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclKind {
    Func,
    Type,
    Var,
    Const,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedParam {
    /// Empty for unnamed parameters.
    pub name: SmolStr,
    /// Declared type as written, without the `...` of a variadic parameter.
    pub ty: String,
    pub variadic: bool,
}

impl ScannedParam {
    pub fn display(&self) -> String {
        let dots = if self.variadic { "..." } else { "" };
        if self.name.is_empty() {
            format!("{dots}{}", self.ty)
        } else {
            format!("{} {dots}{}", self.name, self.ty)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedDecl {
    pub package_name: SmolStr,
    pub package_path: String,
    pub name: SmolStr,
    pub kind: DeclKind,
    pub params: Vec<ScannedParam>,
    /// Result list as written, e.g. `(int, error)`.
    pub results: Option<String>,
}

/// One package to scan.
#[derive(Debug, Clone)]
pub struct PackageScan {
    pub name: String,
    pub path: String,
    pub files: Vec<PathBuf>,
}

impl From<&PackageDescriptor> for PackageScan {
    fn from(value: &PackageDescriptor) -> Self {
        Self {
            name: value.name.clone(),
            path: value.path.clone(),
            files: value.files.clone(),
        }
    }
}

pub struct GoDeclScanner {
    language: Language,
}

impl Default for GoDeclScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl GoDeclScanner {
    pub fn new() -> Self {
        Self {
            language: tree_sitter_go::LANGUAGE.into(),
        }
    }

    /// Exported top-level declarations of one source file.
    pub fn scan_source(
        &self,
        package_path: &str,
        source: &str,
        file: &Path,
    ) -> Result<Vec<ScannedDecl>, ScanError> {
        let mut parser = Parser::new();
        parser.set_language(&self.language)?;
        let tree = parser
            .parse(source, None)
            .ok_or_else(|| ScanError::Parse(file.to_path_buf()))?;

        let root = tree.root_node();
        let mut package_name = SmolStr::default();
        let mut decls = Vec::new();
        let mut out = DeclSink {
            source,
            package_path,
            decls: &mut decls,
        };

        for node in root.named_children(&mut root.walk()) {
            match node.kind() {
                "package_clause" => {
                    if let Some(name) = node.named_child(0) {
                        package_name = text(name, source).into();
                    }
                }
                "function_declaration" => out.function(node),
                "type_declaration" => out.types(node),
                "var_declaration" => out.values(node, "var_spec", DeclKind::Var),
                "const_declaration" => out.values(node, "const_spec", DeclKind::Const),
                _ => {}
            }
        }

        for decl in &mut decls {
            decl.package_name = package_name.clone();
        }
        trace!(file = %file.display(), decls = decls.len(), "scanned file");
        Ok(decls)
    }

    pub fn scan_file(&self, package_path: &str, file: &Path) -> Result<Vec<ScannedDecl>, ScanError> {
        let source = std::fs::read_to_string(file).map_err(|source| ScanError::Io {
            path: file.to_path_buf(),
            source,
        })?;
        self.scan_source(package_path, &source, file)
    }
}

impl Scanner<PackageScan, ScannedDecl> for GoDeclScanner {
    fn scan(&self, job: PackageScan, ctx: &ScanContext) -> Result<Vec<ScannedDecl>, IngestError> {
        let mut out = Vec::new();
        for file in job.files.iter().filter(|f| is_scannable(f)) {
            if ctx.cancel.is_cancelled() {
                return Err(IngestError::Cancelled);
            }
            if ctx.enough.is_set() {
                break;
            }
            out.extend(self.scan_file(&job.path, file)?);
        }
        debug!(package = %job.path, decls = out.len(), "scanned package");
        Ok(out)
    }
}

fn is_scannable(file: &Path) -> bool {
    file.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(".go") && !n.ends_with("_test.go"))
}

fn text<'a>(node: Node<'_>, source: &'a str) -> &'a str {
    node.utf8_text(source.as_bytes()).unwrap_or_default()
}

struct DeclSink<'a> {
    source: &'a str,
    package_path: &'a str,
    decls: &'a mut Vec<ScannedDecl>,
}

impl DeclSink<'_> {
    fn push(&mut self, name: &str, kind: DeclKind, params: Vec<ScannedParam>, results: Option<String>) {
        if !is_exported(name) {
            return;
        }
        self.decls.push(ScannedDecl {
            package_name: SmolStr::default(),
            package_path: self.package_path.to_string(),
            name: name.into(),
            kind,
            params,
            results,
        });
    }

    fn function(&mut self, node: Node<'_>) {
        let Some(name) = node.child_by_field_name("name") else {
            return;
        };
        let params = node
            .child_by_field_name("parameters")
            .map(|list| self.params(list))
            .unwrap_or_default();
        let results = node
            .child_by_field_name("result")
            .map(|r| text(r, self.source).to_string());
        self.push(text(name, self.source), DeclKind::Func, params, results);
    }

    fn params(&self, list: Node<'_>) -> Vec<ScannedParam> {
        let mut out = Vec::new();
        for decl in list.named_children(&mut list.walk()) {
            let variadic = match decl.kind() {
                "parameter_declaration" => false,
                "variadic_parameter_declaration" => true,
                _ => continue,
            };
            let ty = decl
                .child_by_field_name("type")
                .map(|t| text(t, self.source).to_string())
                .unwrap_or_default();
            let names: Vec<_> = decl
                .children_by_field_name("name", &mut decl.walk())
                .map(|n| SmolStr::from(text(n, self.source)))
                .collect();
            if names.is_empty() {
                out.push(ScannedParam {
                    name: SmolStr::default(),
                    ty,
                    variadic,
                });
                continue;
            }
            out.extend(names.into_iter().map(|name| ScannedParam {
                name,
                ty: ty.clone(),
                variadic,
            }));
        }
        out
    }

    fn types(&mut self, node: Node<'_>) {
        for spec in node.named_children(&mut node.walk()) {
            if matches!(spec.kind(), "type_spec" | "type_alias")
                && let Some(name) = spec.child_by_field_name("name")
            {
                self.push(text(name, self.source), DeclKind::Type, Vec::new(), None);
            }
        }
    }

    fn values(&mut self, node: Node<'_>, spec_kind: &str, kind: DeclKind) {
        for child in node.named_children(&mut node.walk()) {
            if child.kind() == spec_kind {
                self.value_spec(child, kind);
            } else if child.kind().ends_with("_spec_list") {
                for spec in child.named_children(&mut child.walk()) {
                    if spec.kind() == spec_kind {
                        self.value_spec(spec, kind);
                    }
                }
            }
        }
    }

    fn value_spec(&mut self, spec: Node<'_>, kind: DeclKind) {
        let names: Vec<Node<'_>> = spec
            .named_children(&mut spec.walk())
            .filter(|c| c.kind() == "identifier")
            .collect();
        for name in names {
            self.push(text(name, self.source), kind, Vec::new(), None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = r#"package strutil

import "strings"

// Join concatenates parts.
func Join(sep string, parts ...string) string {
	return strings.Join(parts, sep)
}

func Pair(a, b int) (int, error) { return a + b, nil }

func helper() {}

type Builder struct{ buf []byte }

type Alias = Builder

var (
	Default = &Builder{}
	hidden  = 1
)

const Max, Min = 10, 0
"#;

    fn scan() -> Vec<ScannedDecl> {
        GoDeclScanner::new()
            .scan_source("example.com/strutil", SOURCE, Path::new("strutil.go"))
            .expect("source should scan")
    }

    #[test]
    fn keeps_only_exported_top_level_names() {
        let names: Vec<_> = scan().into_iter().map(|d| d.name).collect();
        assert_eq!(
            names,
            vec!["Join", "Pair", "Builder", "Alias", "Default", "Max", "Min"]
        );
    }

    #[test]
    fn records_parameter_shape() {
        let decls = scan();
        let join = decls.iter().find(|d| d.name == "Join").unwrap();
        assert_eq!(join.kind, DeclKind::Func);
        assert_eq!(join.package_name, "strutil");
        assert_eq!(
            join.params.iter().map(ScannedParam::display).collect::<Vec<_>>(),
            vec!["sep string", "parts ...string"]
        );

        let pair = decls.iter().find(|d| d.name == "Pair").unwrap();
        assert_eq!(pair.params.len(), 2);
        assert_eq!(pair.results.as_deref(), Some("(int, error)"));
    }

    #[test]
    fn test_files_are_not_scanned() {
        assert!(is_scannable(Path::new("a/b.go")));
        assert!(!is_scannable(Path::new("a/b_test.go")));
        assert!(!is_scannable(Path::new("a/README.md")));
    }
}
