use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use serde_json_path::JsonPath;

use crate::error::QueryError;

static ARRAY_INDEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\d+\]").expect("valid index pattern"));

/// Evaluates a path query against the raw document.
///
/// Calls are synchronous and unbounded; an embedding host that needs a
/// latency bound has to wrap its evaluator accordingly.
pub trait QueryEvaluator {
    fn evaluate(&self, expr: &str, document: &Value) -> Result<Value, QueryError>;
}

/// RFC 9535 JSONPath via `serde_json_path`.
///
/// A singular path returns the selected value itself; any path that can
/// select several nodes returns them collected into an array.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonPathEvaluator;

impl QueryEvaluator for JsonPathEvaluator {
    fn evaluate(&self, expr: &str, document: &Value) -> Result<Value, QueryError> {
        let path = JsonPath::parse(expr).map_err(|e| QueryError::Syntax {
            expr: expr.to_string(),
            reason: e.to_string(),
        })?;
        let nodes = path.query(document).all();

        if is_singular(expr) {
            nodes
                .first()
                .map(|&v| v.clone())
                .ok_or_else(|| QueryError::NoMatch(expr.to_string()))
        } else {
            Ok(Value::Array(nodes.into_iter().cloned().collect()))
        }
    }
}

/// True when `expr` has no wildcard, filter, slice, union or descendant
/// segment outside of quoted member names.
pub fn is_singular(expr: &str) -> bool {
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut prev = '\0';
    for c in expr.chars() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' => quote = Some(c),
            '*' | '?' | ':' | ',' => return false,
            '.' if prev == '.' => return false,
            _ => {}
        }
        prev = c;
    }
    true
}

/// `$.items[0].name` becomes `$.items[*].name`. Quoted member names are
/// copied untouched, so `$["[0]"]` keeps naming the same member.
pub fn path_to_wildcard(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut plain = String::new();
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for c in path.chars() {
        match quote {
            Some(q) => {
                out.push(c);
                if escaped {
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == q {
                    quote = None;
                }
            }
            None if c == '\'' || c == '"' => {
                out.push_str(&ARRAY_INDEX.replace_all(&plain, "[*]"));
                plain.clear();
                out.push(c);
                quote = Some(c);
            }
            None => plain.push(c),
        }
    }
    out.push_str(&ARRAY_INDEX.replace_all(&plain, "[*]"));
    out
}

/// Live evaluation is only attempted for input that already looks like a path.
pub fn looks_like_query(expr: &str) -> bool {
    expr.starts_with('$') || expr.contains('.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc() -> Value {
        json!({"a": 1, "b": {"c": 2}, "items": [{"name": "x"}, {"name": "y"}]})
    }

    #[test]
    fn singular_paths_return_the_value() {
        let eval = JsonPathEvaluator;
        assert_eq!(eval.evaluate("$.b", &doc()).unwrap(), json!({"c": 2}));
        assert_eq!(eval.evaluate("$", &doc()).unwrap(), doc());
        assert_eq!(eval.evaluate("$.items[1].name", &doc()).unwrap(), json!("y"));
    }

    #[test]
    fn wildcards_collect_into_an_array() {
        let eval = JsonPathEvaluator;
        assert_eq!(eval.evaluate("$.items[*].name", &doc()).unwrap(), json!(["x", "y"]));
        assert_eq!(eval.evaluate("$..c", &doc()).unwrap(), json!([2]));
        assert_eq!(eval.evaluate("$.nope[*]", &doc()).unwrap(), json!([]));
    }

    #[test]
    fn missing_singular_path_is_an_error() {
        let err = JsonPathEvaluator.evaluate("$.missing", &doc()).unwrap_err();
        assert_eq!(err, QueryError::NoMatch("$.missing".into()));
    }

    #[test]
    fn bad_syntax_is_an_error() {
        let err = JsonPathEvaluator.evaluate("$.[", &doc()).unwrap_err();
        assert!(matches!(err, QueryError::Syntax { .. }));
    }

    #[test]
    fn quoted_names_do_not_break_singularity() {
        assert!(is_singular("$['a*b'].c"));
        assert!(is_singular("$[\"x,y\"]"));
        assert!(!is_singular("$.a[0:2]"));
        assert!(!is_singular("$[?@.a]"));
    }

    #[test]
    fn generalizes_array_indices() {
        assert_eq!(path_to_wildcard("$.items[0].name"), "$.items[*].name");
        assert_eq!(path_to_wildcard("$[3][12]"), "$[*][*]");
        assert_eq!(path_to_wildcard("$.plain"), "$.plain");
    }

    #[test]
    fn wildcarding_skips_quoted_names() {
        assert_eq!(path_to_wildcard("$[\"[0]\"].x"), "$[\"[0]\"].x");
        assert_eq!(path_to_wildcard("$[\"[0]\"][2]"), "$[\"[0]\"][*]");
        assert_eq!(path_to_wildcard("$[\"a\\\"[1]\"][3]"), "$[\"a\\\"[1]\"][*]");

        let doc = json!({"[0]": {"x": 1}});
        let seeded = path_to_wildcard("$[\"[0]\"].x");
        assert_eq!(JsonPathEvaluator.evaluate(&seeded, &doc).unwrap(), json!(1));
    }

    #[test]
    fn live_gate() {
        assert!(looks_like_query("$"));
        assert!(looks_like_query("a.b"));
        assert!(!looks_like_query("abc"));
    }
}
