// HTML renderers. Each renderer is a pure function from the decoded result to
// an HTML fragment; `None` means the element is omitted from the page.
// All payload text passes through `escape`.

pub mod aggregate;
pub mod badge;
pub mod evaluator;
pub mod page;
pub mod summary;

pub use page::render_page;

use html_escape::encode_double_quoted_attribute;

/// Escapes text for HTML element content and double-quoted attributes.
pub fn escape(text: &str) -> String {
    encode_double_quoted_attribute(text).into_owned()
}

/// One digit after the decimal point, ties away from zero (`7.25` → `7.3`).
pub fn format_score(score: f64) -> String {
    let scaled = score * 10.0;
    if !scaled.is_finite() {
        return format!("{score:.1}");
    }
    let rounded = scaled.round() / 10.0;
    // Avoid "-0.0" for small negative inputs.
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{rounded:.1}")
}

/// `<ul>` of escaped items with a per-list marker class.
pub(crate) fn bullet_list(items: &[String], marker: &str) -> String {
    let mut html = format!(r#"<ul class="bullets {marker}">"#);
    for item in items {
        html.push_str("<li>");
        html.push_str(&escape(item));
        html.push_str("</li>");
    }
    html.push_str("</ul>");
    html
}
