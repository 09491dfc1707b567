//! Full-page composer.
//!
//! Layout: header, upload panel on the left, main panel driven by the request
//! state. Loading, error and result displays are mutually exclusive because
//! they are arms of one `match`.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use super::aggregate::render_strengths_risks;
use super::badge::render_badge;
use super::escape;
use super::evaluator::render_evaluations;
use super::summary::render_summary;
use crate::analysis::{AnalysisResult, Criterion};
use crate::page::controller::{PageController, RequestState};

/// Seconds between automatic reloads while an analysis is in flight.
const LOADING_REFRESH_SECS: u32 = 2;

pub const IDLE_PROMPT: &str = "Upload a PDF and click Analyze to begin.";

pub fn render_page(page: &PageController) -> String {
    let refresh = if page.state().is_loading() {
        format!(r#"<meta http-equiv="refresh" content="{LOADING_REFRESH_SECS}">"#)
    } else {
        String::new()
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
{refresh}
<title>Paper Evaluator</title>
<style>{styles}</style>
</head>
<body>
<header class="site-header"><div class="wrap"><span class="logo">&#9879;</span><h1>Paper Evaluator</h1></div></header>
<div class="wrap layout">
<aside class="sidebar">{upload}</aside>
<main class="main">{main}</main>
</div>
<script>{script}</script>
</body>
</html>"#,
        styles = STYLES,
        upload = render_upload_panel(page),
        main = render_main(page),
        script = SCRIPT,
    )
}

fn render_upload_panel(page: &PageController) -> String {
    let loading = page.state().is_loading();
    let zone_class = if loading { "dropzone disabled" } else { "dropzone" };
    let input_disabled = if loading { " disabled" } else { "" };

    let zone_content = match page.selection() {
        Some(selection) => format!(
            r#"<span class="file-icon">&#128196;</span><span class="file-name">{}</span>"#,
            escape(selection.file_name())
        ),
        None => r#"<span class="upload-icon">&#8679;</span><p class="muted">Drop a PDF here or <span class="link">browse</span></p>"#
            .to_string(),
    };

    let button_disabled = if page.can_analyze() { "" } else { " disabled" };
    let button_label = if loading {
        r#"<span class="spinner small"></span>Analyzing&hellip;"#
    } else {
        "Analyze Paper"
    };

    format!(
        r#"<section class="card upload">
<h2>Upload Paper</h2>
<form id="upload-form" method="post" action="/upload" enctype="multipart/form-data">
<label id="dropzone" class="{zone_class}" for="file-input">{zone_content}</label>
<input id="file-input" class="hidden" type="file" name="file" accept="application/pdf"{input_disabled}>
</form>
<form method="post" action="/analyze">
<button id="analyze" type="submit" class="primary"{button_disabled}>{button_label}</button>
</form>
</section>"#
    )
}

fn render_main(page: &PageController) -> String {
    match page.state() {
        RequestState::Idle => format!(r#"<div class="empty muted">{IDLE_PROMPT}</div>"#),
        RequestState::Loading { file_name, .. } => format!(
            r#"<div class="loading"><div class="spinner"></div><p class="muted">Analyzing {}&hellip;</p></div>"#,
            escape(file_name)
        ),
        RequestState::Failure { message } => format!(
            r#"<div class="error" role="alert"><strong>Error:</strong> {}</div>"#,
            escape(message)
        ),
        RequestState::Success {
            result,
            file_name,
            completed_at,
        } => render_result(result, page.expanded(), file_name, completed_at),
    }
}

/// Badge, summary, evaluator cards, then strengths/risks.
pub fn render_result(
    result: &AnalysisResult,
    expanded: &BTreeSet<Criterion>,
    file_name: &str,
    completed_at: &DateTime<Utc>,
) -> String {
    let aggregation = &result.aggregation;
    let mut html = String::from(r#"<div class="results">"#);

    html.push_str(&format!(
        r#"<section class="card">{}</section>"#,
        render_badge(aggregation.quality_band.as_deref(), aggregation.overall_score)
    ));

    if let Some(summary) = render_summary(result) {
        html.push_str(&summary);
    }

    let cards = render_evaluations(&result.evaluations, expanded);
    if !cards.is_empty() {
        html.push_str(&format!(
            r#"<div class="evaluations"><h2>Evaluations</h2>{cards}</div>"#
        ));
    }

    if let Some(grid) = render_strengths_risks(&aggregation.top_strengths, &aggregation.top_risks)
    {
        html.push_str(&grid);
    }

    html.push_str(&format!(
        r#"<p class="footnote muted">Analysed {} at {}</p>"#,
        escape(file_name),
        completed_at.format("%Y-%m-%d %H:%M UTC")
    ));
    html.push_str("</div>");
    html
}

const SCRIPT: &str = r#"
(function () {
  var form = document.getElementById('upload-form');
  var input = document.getElementById('file-input');
  var zone = document.getElementById('dropzone');
  if (!form || !input || !zone) return;
  input.addEventListener('change', function () {
    if (input.files.length) form.submit();
  });
  zone.addEventListener('dragover', function (e) {
    e.preventDefault();
    if (!input.disabled) zone.classList.add('drag-over');
  });
  zone.addEventListener('dragleave', function () {
    zone.classList.remove('drag-over');
  });
  zone.addEventListener('drop', function (e) {
    e.preventDefault();
    zone.classList.remove('drag-over');
    if (input.disabled || !e.dataTransfer.files.length) return;
    input.files = e.dataTransfer.files;
    form.submit();
  });
})();
"#;

const STYLES: &str = r#"
:root { --bg:#f7f7f5; --card:#fff; --border:#e3e3de; --fg:#1d1d1b; --muted:#6b6b66;
  --primary:#2f6f5e; --excellent:#2e8b57; --good:#4c9a6a; --moderate:#c48a1c; --low:#c0392b;
  --strength:#2e8b57; --risk:#c0392b; }
* { box-sizing:border-box; }
body { margin:0; font-family:system-ui,-apple-system,Segoe UI,sans-serif; background:var(--bg); color:var(--fg); }
.wrap { max-width:64rem; margin:0 auto; padding:0 1.5rem; }
.site-header { background:var(--card); border-bottom:1px solid var(--border); }
.site-header .wrap { display:flex; align-items:center; gap:.75rem; padding-top:1.25rem; padding-bottom:1.25rem; }
.site-header h1 { margin:0; font-size:1.5rem; }
.logo { color:var(--primary); font-size:1.5rem; }
.layout { display:flex; gap:1.5rem; padding-top:2rem; padding-bottom:2rem; }
.sidebar { width:18rem; flex-shrink:0; }
.main { flex:1; min-width:0; display:flex; flex-direction:column; gap:1.5rem; }
.card { background:var(--card); border:1px solid var(--border); border-radius:.75rem; padding:1.5rem; }
.card h2 { margin:0 0 1rem; font-size:1.15rem; }
.muted { color:var(--muted); }
.hidden { display:none; }
.dropzone { display:flex; flex-direction:column; align-items:center; justify-content:center; gap:.5rem;
  border:2px dashed var(--border); border-radius:.5rem; padding:2.5rem 1.5rem; cursor:pointer; }
.dropzone:hover, .dropzone.drag-over { border-color:var(--primary); background:#eef5f2; }
.dropzone.disabled { pointer-events:none; opacity:.6; }
.file-name { font-weight:600; word-break:break-all; }
.link { color:var(--primary); font-weight:600; }
button.primary { margin-top:1rem; width:100%; padding:.65rem 1.25rem; border:0; border-radius:.5rem;
  background:var(--primary); color:#fff; font-weight:600; cursor:pointer; display:inline-flex; justify-content:center; align-items:center; gap:.5rem; }
button.primary:disabled { opacity:.5; cursor:not-allowed; }
.empty, .loading { display:flex; flex-direction:column; align-items:center; justify-content:center; padding:5rem 0; }
.spinner { width:2rem; height:2rem; border:4px solid var(--border); border-top-color:var(--primary); border-radius:50%; animation:spin 1s linear infinite; }
.spinner.small { width:1rem; height:1rem; border-width:2px; }
@keyframes spin { to { transform:rotate(360deg); } }
.error { border:1px solid #e8b4ae; background:#fbeeed; color:var(--low); border-radius:.5rem; padding:1rem 1.25rem; font-size:.9rem; }
.results { display:flex; flex-direction:column; gap:1.5rem; }
.badge-row { display:flex; align-items:center; gap:1rem; }
.badge { display:inline-flex; border-radius:.4rem; padding:.5rem 1rem; font-weight:600; color:#fff; }
.badge-excellent { background:var(--excellent); } .badge-good { background:var(--good); }
.badge-moderate { background:var(--moderate); } .badge-low { background:var(--low); }
.overall-score { font-size:1.9rem; font-weight:700; }
.narrative, .design { line-height:1.6; font-size:.92rem; }
.paper-title { margin:0 0 .25rem; }
.byline { color:var(--muted); font-size:.9rem; margin-bottom:1rem; }
.overview-list h4, .finding-group h4 { margin:.75rem 0 .4rem; font-size:.75rem; text-transform:uppercase; letter-spacing:.05em; color:var(--muted); }
.evaluations { display:flex; flex-direction:column; gap:.75rem; }
.evaluations h2 { margin:0; font-size:1.15rem; }
.evaluator { padding:0; }
.evaluator form { margin:0; }
.evaluator-header { width:100%; display:flex; align-items:center; gap:.75rem; padding:1rem 1.25rem; background:none; border:0; text-align:left; cursor:pointer; font:inherit; }
.evaluator-title { font-weight:600; font-size:.92rem; }
.score-pill { background:#efefeb; border-radius:.35rem; padding:.1rem .5rem; font-size:.75rem; }
.chevron { margin-left:auto; color:var(--muted); }
.evaluator-body { border-top:1px solid var(--border); padding:1rem 1.25rem; font-size:.9rem; line-height:1.6; }
.placeholder { font-style:italic; }
.grid-two { display:grid; gap:1rem; grid-template-columns:repeat(auto-fit,minmax(16rem,1fr)); }
.aggregate h3 { margin:0 0 .75rem; font-size:.92rem; }
.icon.strength { color:var(--strength); } .icon.risk { color:var(--risk); }
.bullets { margin:0; padding-left:1.1rem; font-size:.9rem; }
.bullets li { margin:.3rem 0; }
.bullets.strength li::marker { color:var(--strength); } .bullets.risk li::marker { color:var(--risk); }
.footnote { font-size:.75rem; margin:0; }
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{AnalysisError, EvaluationSection};
    use bytes::Bytes;

    fn with_selection() -> PageController {
        let mut page = PageController::new();
        page.select_file(
            "trial <v2>.pdf",
            Some("application/pdf"),
            Bytes::from_static(b"%PDF"),
        );
        page
    }

    #[test]
    fn test_idle_page_prompts_and_disables_analyze() {
        let html = render_page(&PageController::new());
        assert!(html.contains(IDLE_PROMPT));
        assert!(html.contains(r#"class="primary" disabled>Analyze Paper"#));
        assert!(html.contains("Drop a PDF here"));
        assert!(!html.contains("http-equiv=\"refresh\""));
    }

    #[test]
    fn test_selection_enables_analyze_and_shows_file_name() {
        let html = render_page(&with_selection());
        assert!(html.contains(r#"class="primary">Analyze Paper"#));
        assert!(html.contains("trial &lt;v2&gt;.pdf"));
    }

    #[test]
    fn test_loading_page_refreshes_and_hides_other_states() {
        let mut page = with_selection();
        page.begin_analysis().unwrap();

        let html = render_page(&page);

        assert!(html.contains(r#"<meta http-equiv="refresh" content="2">"#));
        assert!(html.contains(r#"class="loading""#));
        assert!(html.contains("Analyzing&hellip;"));
        assert!(html.contains(r#"class="primary" disabled>"#));
        assert!(html.contains("dropzone disabled"));
        assert!(!html.contains(IDLE_PROMPT));
        assert!(!html.contains("<strong>Error:</strong>"));
    }

    #[test]
    fn test_failure_page_shows_message() {
        let mut page = with_selection();
        let ticket = page.begin_analysis().unwrap();
        page.finish_analysis(ticket.request_id, Err(AnalysisError::server(500, "bad file")));

        let html = render_page(&page);

        assert!(html.contains("<strong>Error:</strong> bad file"));
        assert!(!html.contains(r#"class="loading""#));
        assert!(!html.contains(IDLE_PROMPT));
    }

    #[test]
    fn test_success_page_composes_sections_in_order() {
        let mut result = AnalysisResult::default();
        result.aggregation.overall_score = Some(8.4);
        result.aggregation.quality_band = Some("good".to_string());
        result.aggregation.top_risks = vec!["small sample".to_string()];
        result.paper_ir.main_claims = vec!["X lowers Y".to_string()];
        result.evaluations.statistical_rigor = Some(EvaluationSection {
            score: Some(6.0),
            ..Default::default()
        });

        let mut page = with_selection();
        let ticket = page.begin_analysis().unwrap();
        page.finish_analysis(ticket.request_id, Ok(result));
        let html = render_page(&page);

        let badge = html.find("8.4 / 10").unwrap();
        let summary = html.find("<h2>Summary</h2>").unwrap();
        let evaluations = html.find("<h2>Evaluations</h2>").unwrap();
        let risks = html.find("Top Risks").unwrap();
        assert!(badge < summary && summary < evaluations && evaluations < risks);
        assert!(html.contains(">Good</span>"));
        assert!(!html.contains("Top Strengths"));
        assert!(html.contains("Analysed trial &lt;v2&gt;.pdf at "));
    }

    #[test]
    fn test_success_without_sections_omits_evaluations_heading() {
        let html = render_result(
            &AnalysisResult::default(),
            &BTreeSet::new(),
            "a.pdf",
            &Utc::now(),
        );
        assert!(html.contains("Moderate Quality"));
        assert!(!html.contains("<h2>Evaluations</h2>"));
        assert!(!html.contains("grid-two"));
    }
}
