/// Exported Go identifiers start with an upper-case letter.
pub fn is_exported(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

/// Package name implied by an import path when the package clause is unknown.
///
/// Follows the go tool's convention: a trailing major-version element
/// (`/v2`) is skipped, a `go-` prefix is dropped and the name is cut at the
/// first character that cannot appear in an identifier.
pub fn assumed_package_name(import_path: &str) -> String {
    let mut elems = import_path.rsplit('/');
    let mut base = elems.next().unwrap_or_default();
    if is_major_version(base)
        && let Some(prev) = elems.next()
    {
        base = prev;
    }
    let base = base.strip_prefix("go-").unwrap_or(base);
    base.chars()
        .take_while(|c| c.is_alphanumeric() || *c == '_')
        .collect()
}

fn is_major_version(elem: &str) -> bool {
    elem.strip_prefix('v')
        .is_some_and(|rest| !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()))
}

/// Whether an import needs an explicit name for `name` to refer to it.
pub fn needs_import_name(import_path: &str, name: &str) -> bool {
    assumed_package_name(import_path) != name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assumed_names() {
        assert_eq!(assumed_package_name("fmt"), "fmt");
        assert_eq!(assumed_package_name("net/http"), "http");
        assert_eq!(assumed_package_name("github.com/go-yaml/yaml/v3"), "yaml");
        assert_eq!(assumed_package_name("github.com/mattn/go-isatty"), "isatty");
        assert_eq!(assumed_package_name("gopkg.in/yaml.v2"), "yaml");
    }

    #[test]
    fn exported_names() {
        assert!(is_exported("Println"));
        assert!(!is_exported("println"));
        assert!(!is_exported("_x"));
    }

    #[test]
    fn import_name_only_when_it_differs() {
        assert!(!needs_import_name("math/rand", "rand"));
        assert!(needs_import_name("gopkg.in/yaml.v2", "yamlv2"));
    }
}
