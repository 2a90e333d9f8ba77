//! Submission payload sanitization.
//!
//! Strips HTML markup from string values before they are rendered into
//! the notification body. This guards the rendered mail against markup
//! injection; it is not a browser-side XSS defense.

use serde_json::Value;

/// Remove HTML tags from a string.
///
/// Everything from a `<` up to and including the next `>` is dropped; an
/// unterminated tag swallows the rest of the input.
pub fn strip_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_tag = false;

    for c in input.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }

    out
}

/// Render a payload value for the notification body.
///
/// Strings are HTML-stripped; anything structured is rendered as its
/// JSON text.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => strip_html(s),
        other => other.to_string(),
    }
}

/// Capitalize the first character of a field name.
pub fn capitalize_key(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strip_html_basic() {
        assert_eq!(strip_html("<b>Bob</b>"), "Bob");
        assert_eq!(strip_html("no markup"), "no markup");
        assert_eq!(strip_html(""), "");
    }

    #[test]
    fn test_strip_html_nested_and_attrs() {
        assert_eq!(
            strip_html("<a href=\"https://evil.example\">click</a> me"),
            "click me"
        );
        assert_eq!(strip_html("<div><p>hi</p></div>"), "hi");
    }

    #[test]
    fn test_strip_html_unterminated_tag() {
        assert_eq!(strip_html("hello <script"), "hello ");
    }

    #[test]
    fn test_strip_html_keeps_bare_gt() {
        assert_eq!(strip_html("1 > 0"), "1 > 0");
    }

    #[test]
    fn test_render_value() {
        assert_eq!(render_value(&json!("<i>hi</i>")), "hi");
        assert_eq!(render_value(&json!(42)), "42");
        assert_eq!(render_value(&json!(true)), "true");
        assert_eq!(render_value(&json!(["a", "b"])), r#"["a","b"]"#);
        assert_eq!(render_value(&json!({"k": 1})), r#"{"k":1}"#);
        assert_eq!(render_value(&Value::Null), "null");
    }

    #[test]
    fn test_capitalize_key() {
        assert_eq!(capitalize_key("name"), "Name");
        assert_eq!(capitalize_key("Name"), "Name");
        assert_eq!(capitalize_key(""), "");
        assert_eq!(capitalize_key("x"), "X");
    }
}
