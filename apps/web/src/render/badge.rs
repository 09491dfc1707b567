//! Quality badge: band label + overall score.
//!
//! The band table is the union of the labels both response schemas use.
//! Unknown or missing labels fall back to `DEFAULT_BAND`.

use super::{escape, format_score};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Excellent,
    Good,
    Moderate,
    Low,
}

impl Severity {
    pub fn css_class(self) -> &'static str {
        match self {
            Severity::Excellent => "badge-excellent",
            Severity::Good => "badge-good",
            Severity::Moderate => "badge-moderate",
            Severity::Low => "badge-low",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualityBand {
    pub label: &'static str,
    pub severity: Severity,
}

pub const DEFAULT_BAND: QualityBand = QualityBand {
    label: "Moderate Quality",
    severity: Severity::Moderate,
};

const BANDS: &[(&str, QualityBand)] = &[
    ("excellent", QualityBand { label: "Excellent", severity: Severity::Excellent }),
    ("high quality", QualityBand { label: "High Quality", severity: Severity::Excellent }),
    ("high", QualityBand { label: "High", severity: Severity::Excellent }),
    ("good", QualityBand { label: "Good", severity: Severity::Good }),
    ("moderate", QualityBand { label: "Moderate", severity: Severity::Moderate }),
    ("moderate quality", DEFAULT_BAND),
    ("fair", QualityBand { label: "Fair", severity: Severity::Moderate }),
    ("low", QualityBand { label: "Low", severity: Severity::Low }),
    ("low quality", QualityBand { label: "Low Quality", severity: Severity::Low }),
    ("poor", QualityBand { label: "Poor", severity: Severity::Low }),
];

/// Case-insensitive lookup; surrounding whitespace is ignored.
pub fn resolve_band(label: Option<&str>) -> QualityBand {
    let Some(label) = label else {
        return DEFAULT_BAND;
    };
    let needle = label.trim().to_lowercase();
    BANDS
        .iter()
        .find(|(key, _)| *key == needle)
        .map(|(_, band)| *band)
        .unwrap_or(DEFAULT_BAND)
}

/// `"8.4 / 10"`
pub fn score_out_of_ten(score: f64) -> String {
    format!("{} / 10", format_score(score))
}

pub fn render_badge(quality_band: Option<&str>, overall_score: Option<f64>) -> String {
    let band = resolve_band(quality_band);
    let mut html = format!(
        r#"<div class="badge-row"><span class="badge {}">{}</span>"#,
        band.severity.css_class(),
        escape(band.label)
    );
    if let Some(score) = overall_score {
        html.push_str(&format!(
            r#"<span class="overall-score">{}</span>"#,
            score_out_of_ten(score)
        ));
    }
    html.push_str("</div>");
    html
}
