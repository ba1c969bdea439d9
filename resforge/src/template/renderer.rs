//! Minimal text templating
//!
//! Two constructs:
//! - `{{name}}`, `{{a.b.c}}`, `{{.}}`: variable interpolation by dotted path
//! - `{{#name}}...{{/name}}`: sections gated or repeated by the value of `name`
//!
//! Missing variables render as an empty string. Sections are resolved before
//! variables at every level, so rows of an iterated section see their own
//! values through `{{.}}` and their merged keys.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

static SECTION_OPEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{\s*#\s*([A-Za-z0-9_.-]+)\s*\}\}").expect("Invalid regex"));
static SECTION_CLOSE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{\s*/\s*([A-Za-z0-9_.-]+)\s*\}\}").expect("Invalid regex"));
static VARIABLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{\s*([A-Za-z0-9_.-]+)\s*\}\}").expect("Invalid regex"));

/// Upper bound on section passes; rendered values that keep producing new
/// section markers stop expanding here.
const MAX_PASSES: usize = 64;

/// Renders `{{var}}` / `{{#section}}` templates against JSON values
pub struct TemplateRenderer;

impl TemplateRenderer {
    /// Render `template` with the keys of `vars`
    ///
    /// Non-object `vars` is bound to `.` only.
    ///
    /// # Examples
    ///
    /// ```
    /// # use resforge::template::TemplateRenderer;
    /// # use serde_json::json;
    /// let out = TemplateRenderer::render(
    ///     "{{#items}}[{{.}}]{{/items}} {{#flag}}on{{/flag}}",
    ///     &json!({"items": ["a", "b"], "flag": false}),
    /// );
    /// assert_eq!(out, "[a][b] ");
    /// ```
    #[must_use]
    pub fn render(template: &str, vars: &Value) -> String {
        let context = match vars {
            Value::Object(map) => map.clone(),
            other => {
                let mut map = Map::new();
                map.insert(".".to_string(), other.clone());
                map
            }
        };
        render_with(template, &context)
    }
}

fn render_with(template: &str, context: &Map<String, Value>) -> String {
    let mut out = template.to_string();

    for _ in 0..MAX_PASSES {
        match render_sections_pass(&out, context) {
            Some(next) => out = next,
            None => break,
        }
    }

    render_variables(&out, context)
}

/// A located `{{#name}}inner{{/name}}` span
struct Section<'a> {
    start: usize,
    end: usize,
    name: &'a str,
    inner: &'a str,
}

/// First opener at or after `from` that has a matching close tag, paired
/// with the nearest such close tag
fn find_section(text: &str, from: usize) -> Option<Section<'_>> {
    let mut search = from;

    while let Some(caps) = SECTION_OPEN.captures_at(text, search) {
        let (open, name) = (caps.get(0)?, caps.get(1)?);
        let close = SECTION_CLOSE
            .captures_iter(&text[open.end()..])
            .filter(|close| &close[1] == name.as_str())
            .find_map(|close| close.get(0));

        if let Some(close) = close {
            let offset = open.end();
            return Some(Section {
                start: open.start(),
                end: offset + close.end(),
                name: name.as_str(),
                inner: &text[offset..offset + close.start()],
            });
        }

        search = open.end();
    }

    None
}

/// One left-to-right pass over non-overlapping sections; `None` when there
/// was nothing to resolve
fn render_sections_pass(text: &str, context: &Map<String, Value>) -> Option<String> {
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    let mut replaced = false;

    while let Some(section) = find_section(text, cursor) {
        out.push_str(&text[cursor..section.start]);
        out.push_str(&render_section(section.name, section.inner, context));
        cursor = section.end;
        replaced = true;
    }

    if !replaced {
        return None;
    }

    out.push_str(&text[cursor..]);
    Some(out)
}

fn render_section(name: &str, inner: &str, context: &Map<String, Value>) -> String {
    let value = lookup(name, context);
    if is_falsy(&value) {
        return String::new();
    }

    match &value {
        Value::Array(rows) => rows
            .iter()
            .map(|row| render_with(inner, &row_context(context, row)))
            .collect(),
        Value::Object(map) => {
            let mut merged = context.clone();
            merged.extend(map.iter().map(|(k, v)| (k.clone(), v.clone())));
            render_with(inner, &merged)
        }
        _ => render_with(inner, context),
    }
}

fn row_context(context: &Map<String, Value>, row: &Value) -> Map<String, Value> {
    let mut merged = context.clone();
    if let Value::Object(fields) = row {
        merged.extend(fields.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
    merged.insert(".".to_string(), row.clone());
    merged
}

/// `null`, `false`, `""`, integer `0` and empty containers
fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Number(n) => n.as_i64() == Some(0) || n.as_u64() == Some(0),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

fn lookup(path: &str, context: &Map<String, Value>) -> Value {
    if path == "." {
        return context.get(".").cloned().unwrap_or(Value::Null);
    }

    let mut segments = path.split('.');
    let Some(mut current) = segments.next().and_then(|first| context.get(first)) else {
        return Value::Null;
    };

    for segment in segments {
        let next = match current {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        };
        let Some(value) = next else {
            return Value::Null;
        };
        current = value;
    }

    current.clone()
}

fn render_variables(text: &str, context: &Map<String, Value>) -> String {
    VARIABLE
        .replace_all(text, |caps: &regex::Captures<'_>| {
            stringify(&lookup(&caps[1], context))
        })
        .into_owned()
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::Bool(true) => Some("1".to_string()),
        Value::Bool(false) => Some(String::new()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Array(items) => {
            let scalars: Vec<String> = items.iter().filter_map(scalar_string).collect();
            if scalars.is_empty() {
                value.to_string()
            } else {
                scalars.join("\n")
            }
        }
        Value::Object(_) => value.to_string(),
        scalar => scalar_string(scalar).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(template: &str, vars: &Value) -> String {
        TemplateRenderer::render(template, vars)
    }

    #[test]
    fn test_gating_falsy_values() {
        for value in [json!(false), Value::Null, json!(""), json!(0), json!([]), json!({})] {
            assert_eq!(render("{{#x}}Y{{/x}}", &json!({ "x": value })), "");
        }
        assert_eq!(render("{{#x}}Y{{/x}}", &json!({"x": true})), "Y");
    }

    #[test]
    fn test_missing_section_value_is_falsy() {
        assert_eq!(render("a{{#x}}Y{{/x}}b", &json!({})), "ab");
    }

    #[test]
    fn test_float_zero_is_truthy() {
        assert_eq!(render("{{#x}}Y{{/x}}", &json!({"x": 0.0})), "Y");
    }

    #[test]
    fn test_iteration_over_scalars() {
        assert_eq!(
            render("{{#items}}[{{.}}]{{/items}}", &json!({"items": ["a", "b"]})),
            "[a][b]"
        );
    }

    #[test]
    fn test_iteration_over_mapping_rows_shadows_outer() {
        let vars = json!({
            "name": "outer",
            "table": "books",
            "rows": [{"name": "title"}, {"name": "pages"}]
        });
        assert_eq!(
            render("{{#rows}}{{name}}@{{table}};{{/rows}}{{name}}", &vars),
            "title@books;pages@books;outer"
        );
    }

    #[test]
    fn test_mapping_section_renders_once_merged() {
        let vars = json!({"api": {"prefix": "/v1"}, "entity": "Book"});
        assert_eq!(render("{{#api}}{{prefix}}/{{entity}}{{/api}}", &vars), "/v1/Book");
    }

    #[test]
    fn test_truthy_scalar_keeps_context() {
        let vars = json!({"uuid": "yes", "entity": "Book"});
        assert_eq!(render("{{#uuid}}{{entity}}{{/uuid}}", &vars), "Book");
    }

    #[test]
    fn test_nested_sections() {
        let vars = json!({
            "fields": [
                {"name": "title", "nullable": false},
                {"name": "pages", "nullable": true}
            ]
        });
        let out = render(
            "{{#fields}}{{name}}{{#nullable}}?{{/nullable}} {{/fields}}",
            &vars,
        );
        assert_eq!(out, "title pages? ");
    }

    #[test]
    fn test_same_name_sections_in_sequence() {
        let vars = json!({"x": true});
        assert_eq!(render("{{#x}}a{{/x}}-{{#x}}b{{/x}}", &vars), "a-b");
    }

    #[test]
    fn test_dotted_paths_and_missing_keys() {
        let vars = json!({"a": {"b": {"c": "deep"}}, "list": ["x", "y"]});
        assert_eq!(render("{{a.b.c}}|{{a.z}}|{{nope}}|{{list.1}}", &vars), "deep|||y");
    }

    #[test]
    fn test_variable_stringification() {
        let vars = json!({
            "t": true,
            "f": false,
            "n": 42,
            "lines": ["a", "b"],
            "objs": [{"k": 1}]
        });
        assert_eq!(render("{{t}}|{{f}}|{{n}}", &vars), "1||42");
        assert_eq!(render("{{lines}}", &vars), "a\nb");
        assert_eq!(render("{{objs}}", &vars), r#"[{"k":1}]"#);
    }

    #[test]
    fn test_whitespace_inside_tags() {
        let vars = json!({"x": true, "name": "Book"});
        assert_eq!(render("{{ # x }}{{ name }}{{ / x }}", &vars), "Book");
    }

    #[test]
    fn test_close_tag_matches_own_name() {
        let vars = json!({"outer": true, "inner": false});
        assert_eq!(render("{{#outer}}a{{/inner}}b{{/outer}}c", &vars), "a{{/inner}}bc");
        assert_eq!(render("{{#a.b}}x{{ /a.b }}", &json!({"a": {"b": 1}})), "x");
    }

    #[test]
    fn test_many_sections_render_in_order() {
        let template: String = (0..200)
            .map(|i| format!("{{{{#s{i}}}}}{i};{{{{/s{i}}}}}"))
            .collect();
        let vars: Map<String, Value> = (0..200)
            .filter(|i| i % 2 == 0)
            .map(|i| (format!("s{i}"), Value::Bool(true)))
            .collect();
        let out = render(&template, &Value::Object(vars));
        assert!(out.starts_with("0;2;4;"));
        assert_eq!(out.matches(';').count(), 100);
    }

    #[test]
    fn test_unclosed_section_left_alone() {
        assert_eq!(render("{{#x}}Y", &json!({"x": true})), "{{#x}}Y");
    }
}
