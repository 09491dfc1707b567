use super::{bullet_list, escape, format_score};
use crate::analysis::{AnalysisResult, PaperIr};

/// Picks the structured overview when the paper IR carries citation metadata
/// or a design summary, and the narrative summary otherwise.
pub fn render_summary(result: &AnalysisResult) -> Option<String> {
    if result.paper_ir.has_overview() {
        return Some(render_paper_overview(&result.paper_ir));
    }
    let text = narrative_summary(&result.paper_ir, result.aggregation.overall_score);
    if text.is_empty() {
        return None;
    }
    Some(format!(
        r#"<section class="card"><h2>Summary</h2><p class="narrative">{}</p></section>"#,
        escape(&text)
    ))
}

pub fn render_paper_overview(paper: &PaperIr) -> String {
    let mut html = String::from(r#"<section class="card overview"><h2>Paper Overview</h2>"#);

    if let Some(title) = paper.title() {
        html.push_str(&format!(r#"<h3 class="paper-title">{}</h3>"#, escape(title)));
    }
    if let Some(byline) = byline(paper) {
        html.push_str(&format!(r#"<div class="byline">{byline}</div>"#));
    }
    if let Some(design) = &paper.study_design_summary {
        html.push_str(&format!(r#"<p class="design">{}</p>"#, escape(design)));
    }
    if !paper.main_claims.is_empty() {
        html.push_str(r#"<div class="overview-list"><h4>Main Claims</h4>"#);
        html.push_str(&bullet_list(&paper.main_claims, "claim"));
        html.push_str("</div>");
    }
    if !paper.stated_limitations.is_empty() {
        html.push_str(r#"<div class="overview-list"><h4>Stated Limitations</h4>"#);
        html.push_str(&bullet_list(&paper.stated_limitations, "limitation"));
        html.push_str("</div>");
    }

    html.push_str("</section>");
    html
}

/// Authors, year and journal joined with `" · "`; `None` when all are missing.
pub fn byline(paper: &PaperIr) -> Option<String> {
    let mut parts = Vec::new();
    if !paper.authors().is_empty() {
        parts.push(escape(&paper.authors().join(", ")));
    }
    if let Some(year) = paper.year() {
        parts.push(escape(year));
    }
    if let Some(journal) = paper.journal() {
        parts.push(format!("<em>{}</em>", escape(journal)));
    }
    (!parts.is_empty()).then(|| parts.join(" · "))
}

/// Plain-text summary: claims, limitations and score sentences, each omitted
/// when its source is empty.
pub fn narrative_summary(paper: &PaperIr, overall_score: Option<f64>) -> String {
    let mut sentences = Vec::new();
    if !paper.main_claims.is_empty() {
        sentences.push(format!(
            "The paper claims: {}.",
            first_two(&paper.main_claims)
        ));
    }
    if !paper.stated_limitations.is_empty() {
        sentences.push(format!(
            "Key limitations include: {}.",
            first_two(&paper.stated_limitations)
        ));
    }
    if let Some(score) = overall_score {
        sentences.push(format!(
            "The overall quality score is {} out of 10.",
            format_score(score)
        ));
    }
    sentences.join(" ")
}

fn first_two(items: &[String]) -> String {
    items
        .iter()
        .take(2)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::models::Citation;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_narrative_uses_first_two_items() {
        let paper = PaperIr {
            main_claims: strings(&["A lowers B", "C is safe", "D is ignored"]),
            stated_limitations: strings(&["single site"]),
            ..Default::default()
        };
        assert_eq!(
            narrative_summary(&paper, Some(7.25)),
            "The paper claims: A lowers B; C is safe. \
             Key limitations include: single site. \
             The overall quality score is 7.3 out of 10."
        );
    }

    #[test]
    fn test_narrative_omits_empty_sentences() {
        let paper = PaperIr {
            stated_limitations: strings(&["short follow-up"]),
            ..Default::default()
        };
        assert_eq!(
            narrative_summary(&paper, None),
            "Key limitations include: short follow-up."
        );
        assert_eq!(narrative_summary(&PaperIr::default(), None), "");
    }

    #[test]
    fn test_byline_separators() {
        let paper = PaperIr {
            citation: Some(Citation {
                authors: strings(&["Smith", "Jones"]),
                year: Some("2021".to_string()),
                journal: Some("Lancet".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(
            byline(&paper).unwrap(),
            "Smith, Jones · 2021 · <em>Lancet</em>"
        );
    }

    #[test]
    fn test_byline_without_authors_starts_with_year() {
        let paper = PaperIr {
            year: Some("2019".to_string()),
            ..Default::default()
        };
        assert_eq!(byline(&paper).unwrap(), "2019");
        assert!(byline(&PaperIr::default()).is_none());
    }

    #[test]
    fn test_overview_renders_only_present_parts() {
        let paper = PaperIr {
            title: Some("A <randomised> trial".to_string()),
            main_claims: strings(&["X works"]),
            ..Default::default()
        };
        let html = render_paper_overview(&paper);
        assert!(html.contains("A &lt;randomised&gt; trial"));
        assert!(html.contains("<h4>Main Claims</h4>"));
        assert!(!html.contains("Stated Limitations"));
        assert!(!html.contains("byline"));
        assert!(!html.contains(r#"class="design""#));
    }

    #[test]
    fn test_summary_falls_back_to_narrative() {
        let mut result = AnalysisResult::default();
        result.paper_ir.main_claims = strings(&["X works"]);
        let html = render_summary(&result).unwrap();
        assert!(html.contains("<h2>Summary</h2>"));
        assert!(html.contains("The paper claims: X works."));

        assert!(render_summary(&AnalysisResult::default()).is_none());
    }

    #[test]
    fn test_summary_prefers_overview_with_citation() {
        let mut result = AnalysisResult::default();
        result.paper_ir.journal = Some("BMJ".to_string());
        let html = render_summary(&result).unwrap();
        assert!(html.contains("Paper Overview"));
    }
}
