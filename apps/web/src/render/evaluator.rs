//! Evaluator cards, one per rubric criterion.
//!
//! A card with no section renders nothing. The header is a toggle button; the
//! body is only emitted while the card is expanded. Both the flat
//! (`assessment`/`details`) and the structured (lists + priority) section
//! shapes are rendered from the same object.

use std::collections::BTreeSet;

use super::{bullet_list, escape, format_score};
use crate::analysis::{Criterion, EvaluationSection, Evaluations};

pub const NO_DETAILS: &str = "No details available.";

pub fn render_evaluator(
    criterion: Criterion,
    section: Option<&EvaluationSection>,
    expanded: bool,
) -> Option<String> {
    let section = section?;
    let key = criterion.key();

    let mut html = format!(
        r#"<section class="card evaluator" id="{key}"><form method="post" action="/evaluations/{key}/toggle"><button type="submit" class="evaluator-header" aria-expanded="{expanded}"><span class="evaluator-title">{title}</span>"#,
        title = escape(criterion.label()),
    );
    if let Some(score) = section.score {
        html.push_str(&format!(
            r#"<span class="score-pill">{}</span>"#,
            format_score(score)
        ));
    }
    let chevron = if expanded { "&#9652;" } else { "&#9662;" };
    html.push_str(&format!(
        r#"<span class="chevron">{chevron}</span></button></form>"#
    ));

    if expanded {
        html.push_str(&render_body(section));
    }
    html.push_str("</section>");
    Some(html)
}

fn render_body(section: &EvaluationSection) -> String {
    let mut body = String::from(r#"<div class="evaluator-body">"#);

    if !section.has_details() {
        body.push_str(&format!(r#"<p class="muted placeholder">{NO_DETAILS}</p>"#));
        body.push_str("</div>");
        return body;
    }

    if let Some(assessment) = &section.assessment {
        body.push_str(&format!(r#"<p class="assessment">{}</p>"#, escape(assessment)));
    }
    if let Some(details) = &section.details {
        body.push_str(&format!(r#"<p class="muted">{}</p>"#, escape(details)));
    }
    if let Some(priority) = &section.priority_label {
        body.push_str(&format!(
            r#"<p class="priority"><strong>Priority:</strong> {}</p>"#,
            escape(priority)
        ));
    }

    let groups = [
        ("Strengths", &section.strengths, "strength"),
        ("Risks", &section.risks, "risk"),
        ("Questions to Ask", &section.questions_to_ask, "question"),
    ];
    for (label, items, marker) in groups {
        if items.is_empty() {
            continue;
        }
        body.push_str(&format!(
            r#"<div class="finding-group"><h4>{label}</h4>{}</div>"#,
            bullet_list(items, marker)
        ));
    }

    body.push_str("</div>");
    body
}

/// All cards in criterion order; absent sections are skipped.
pub fn render_evaluations(evaluations: &Evaluations, expanded: &BTreeSet<Criterion>) -> String {
    Criterion::ALL
        .into_iter()
        .filter_map(|criterion| {
            render_evaluator(
                criterion,
                evaluations.get(criterion),
                expanded.contains(&criterion),
            )
        })
        .collect()
}
