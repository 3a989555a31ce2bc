use crate::scanner::ScannedParam;

/// Call snippet for a function known only from its syntax.
///
/// With placeholders every parameter becomes a tab stop showing its
/// declared text; without them the cursor lands inside the parentheses.
/// Returns the text and whether it uses snippet syntax.
pub fn call_snippet(name: &str, params: &[ScannedParam], placeholders: bool) -> (String, bool) {
    if params.is_empty() {
        return (format!("{name}()"), false);
    }
    if !placeholders {
        return (format!("{name}($0)"), true);
    }

    let stops: Vec<String> = params
        .iter()
        .enumerate()
        .map(|(i, p)| format!("${{{}:{}}}", i + 1, escape(&p.display())))
        .collect();
    (format!("{name}({})", stops.join(", ")), true)
}

/// Escapes text for use inside a snippet placeholder.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '$' | '}' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param(name: &str, ty: &str, variadic: bool) -> ScannedParam {
        ScannedParam {
            name: name.into(),
            ty: ty.to_string(),
            variadic,
        }
    }

    #[test]
    fn placeholders_show_parameter_text() {
        let params = [param("format", "string", false), param("a", "any", true)];
        let (text, snippet) = call_snippet("Printf", &params, true);
        assert_eq!(text, "Printf(${1:format string}, ${2:a ...any})");
        assert!(snippet);
    }

    #[test]
    fn plain_calls() {
        assert_eq!(call_snippet("Now", &[], true), ("Now()".to_string(), false));
        let params = [param("", "int", false)];
        assert_eq!(call_snippet("Sleep", &params, false).0, "Sleep($0)");
        assert_eq!(call_snippet("Sleep", &params, true).0, "Sleep(${1:int})");
    }

    #[test]
    fn escapes_snippet_metacharacters() {
        assert_eq!(escape("map[string]struct{}"), "map[string]struct{\\}");
    }
}
