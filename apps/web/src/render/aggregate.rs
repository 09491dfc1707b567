use super::bullet_list;

/// Top strengths / top risks side by side. Nothing at all when both are empty;
/// an empty column is dropped while the other still renders.
pub fn render_strengths_risks(strengths: &[String], risks: &[String]) -> Option<String> {
    if strengths.is_empty() && risks.is_empty() {
        return None;
    }

    let mut html = String::from(r#"<div class="grid-two">"#);
    if !strengths.is_empty() {
        html.push_str(&column("Top Strengths", "&#10003;", "strength", strengths));
    }
    if !risks.is_empty() {
        html.push_str(&column("Top Risks", "&#9888;", "risk", risks));
    }
    html.push_str("</div>");
    Some(html)
}

fn column(title: &str, icon: &str, marker: &str, items: &[String]) -> String {
    format!(
        r#"<section class="card aggregate {marker}-column"><h3><span class="icon {marker}">{icon}</span> {title}</h3>{}</section>"#,
        bullet_list(items, marker)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_both_empty_renders_nothing() {
        assert!(render_strengths_risks(&[], &[]).is_none());
    }

    #[test]
    fn test_only_strengths_column() {
        let html = render_strengths_risks(&["a".to_string()], &[]).unwrap();
        assert!(html.contains("Top Strengths"));
        assert!(html.contains("<li>a</li>"));
        assert!(!html.contains("Top Risks"));
    }

    #[test]
    fn test_only_risks_column() {
        let html = render_strengths_risks(&[], &["confounding".to_string()]).unwrap();
        assert!(!html.contains("Top Strengths"));
        assert!(html.contains("Top Risks"));
    }

    #[test]
    fn test_both_columns_keep_order() {
        let html =
            render_strengths_risks(&["s1".to_string(), "s2".to_string()], &["r1".to_string()])
                .unwrap();
        let strengths_at = html.find("Top Strengths").unwrap();
        let risks_at = html.find("Top Risks").unwrap();
        assert!(strengths_at < risks_at);
        assert_eq!(html.matches("<li>").count(), 3);
    }
}
