//! Typed analysis result, validated at the network boundary.
//!
//! One superset model covers both response shapes the analysis service has
//! produced: flat `assessment`/`details` evaluator fields vs structured
//! `strengths`/`risks`/`questions_to_ask`, nested `paper_ir.citation` vs flat
//! citation fields, and the optional top-level `error`. Unknown fields are
//! ignored.

use serde::Deserialize;
use serde_json::Value;

use super::de;
use super::AnalysisError;

// ────────────────────────────────────────────────────────────────────────────
// Top-level result
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AnalysisResult {
    /// Set by the service when it accepted the upload but could not analyse it.
    #[serde(default, deserialize_with = "de::message")]
    pub error: Option<String>,
    #[serde(default, deserialize_with = "de::object")]
    pub aggregation: Aggregation,
    #[serde(default, deserialize_with = "de::object")]
    pub paper_ir: PaperIr,
    #[serde(default, deserialize_with = "de::object")]
    pub evaluations: Evaluations,
}

impl AnalysisResult {
    /// Decodes a response body. The body must be a JSON object; everything
    /// inside it is optional.
    pub fn from_json(body: &str) -> Result<Self, AnalysisError> {
        let value: Value =
            serde_json::from_str(body).map_err(|e| AnalysisError::Decode(e.to_string()))?;
        if !value.is_object() {
            return Err(AnalysisError::Decode(
                "expected a JSON object".to_string(),
            ));
        }
        serde_json::from_value(value).map_err(|e| AnalysisError::Decode(e.to_string()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Aggregation {
    #[serde(default, deserialize_with = "de::number")]
    pub overall_score: Option<f64>,
    #[serde(default, deserialize_with = "de::text")]
    pub quality_band: Option<String>,
    #[serde(default, deserialize_with = "de::list")]
    pub top_strengths: Vec<String>,
    #[serde(default, deserialize_with = "de::list")]
    pub top_risks: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Paper IR
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Citation {
    #[serde(default, deserialize_with = "de::text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "de::list")]
    pub authors: Vec<String>,
    #[serde(default, deserialize_with = "de::text")]
    pub year: Option<String>,
    #[serde(default, deserialize_with = "de::text")]
    pub journal: Option<String>,
}

/// Extracted representation of the uploaded paper. Citation fields may arrive
/// nested under `citation` or flat; the accessors prefer the nested value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PaperIr {
    #[serde(default, deserialize_with = "de::optional_object")]
    pub citation: Option<Citation>,
    #[serde(default, deserialize_with = "de::text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "de::list")]
    pub authors: Vec<String>,
    #[serde(default, deserialize_with = "de::text")]
    pub year: Option<String>,
    #[serde(default, deserialize_with = "de::text")]
    pub journal: Option<String>,
    #[serde(default, deserialize_with = "de::text")]
    pub study_design_summary: Option<String>,
    #[serde(default, deserialize_with = "de::list")]
    pub main_claims: Vec<String>,
    #[serde(default, deserialize_with = "de::list")]
    pub stated_limitations: Vec<String>,
}

impl PaperIr {
    pub fn title(&self) -> Option<&str> {
        self.citation
            .as_ref()
            .and_then(|c| c.title.as_deref())
            .or(self.title.as_deref())
    }

    pub fn authors(&self) -> &[String] {
        match &self.citation {
            Some(c) if !c.authors.is_empty() => &c.authors,
            _ => &self.authors,
        }
    }

    pub fn year(&self) -> Option<&str> {
        self.citation
            .as_ref()
            .and_then(|c| c.year.as_deref())
            .or(self.year.as_deref())
    }

    pub fn journal(&self) -> Option<&str> {
        self.citation
            .as_ref()
            .and_then(|c| c.journal.as_deref())
            .or(self.journal.as_deref())
    }

    /// True when there is anything for the structured overview card to show
    /// beyond claims and limitations.
    pub fn has_overview(&self) -> bool {
        self.title().is_some()
            || !self.authors().is_empty()
            || self.year().is_some()
            || self.journal().is_some()
            || self.study_design_summary.is_some()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Evaluations
// ────────────────────────────────────────────────────────────────────────────

/// The fixed rubric dimensions, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Criterion {
    StatisticalRigor,
    MethodologicalSoundness,
    ClinicalRelevance,
    PracticalImpactPriority,
}

impl Criterion {
    pub const ALL: [Criterion; 4] = [
        Criterion::StatisticalRigor,
        Criterion::MethodologicalSoundness,
        Criterion::ClinicalRelevance,
        Criterion::PracticalImpactPriority,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Criterion::StatisticalRigor => "statistical_rigor",
            Criterion::MethodologicalSoundness => "methodological_soundness",
            Criterion::ClinicalRelevance => "clinical_relevance",
            Criterion::PracticalImpactPriority => "practical_impact_priority",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Criterion::StatisticalRigor => "Statistical Rigor",
            Criterion::MethodologicalSoundness => "Methodological Soundness",
            Criterion::ClinicalRelevance => "Clinical Relevance",
            Criterion::PracticalImpactPriority => "Practical Impact & Priority",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.key() == key)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Evaluations {
    #[serde(default, deserialize_with = "de::optional_object")]
    pub statistical_rigor: Option<EvaluationSection>,
    #[serde(default, deserialize_with = "de::optional_object")]
    pub methodological_soundness: Option<EvaluationSection>,
    #[serde(default, deserialize_with = "de::optional_object")]
    pub clinical_relevance: Option<EvaluationSection>,
    #[serde(default, deserialize_with = "de::optional_object")]
    pub practical_impact_priority: Option<EvaluationSection>,
}

impl Evaluations {
    pub fn get(&self, criterion: Criterion) -> Option<&EvaluationSection> {
        match criterion {
            Criterion::StatisticalRigor => self.statistical_rigor.as_ref(),
            Criterion::MethodologicalSoundness => self.methodological_soundness.as_ref(),
            Criterion::ClinicalRelevance => self.clinical_relevance.as_ref(),
            Criterion::PracticalImpactPriority => self.practical_impact_priority.as_ref(),
        }
    }
}

/// One criterion's findings. Older payloads carry `assessment`/`details`,
/// newer ones the structured lists and `priority_label`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EvaluationSection {
    #[serde(default, deserialize_with = "de::number")]
    pub score: Option<f64>,
    #[serde(default, deserialize_with = "de::text")]
    pub assessment: Option<String>,
    #[serde(default, deserialize_with = "de::text")]
    pub details: Option<String>,
    #[serde(default, deserialize_with = "de::text")]
    pub priority_label: Option<String>,
    #[serde(default, deserialize_with = "de::list")]
    pub strengths: Vec<String>,
    #[serde(default, deserialize_with = "de::list")]
    pub risks: Vec<String>,
    #[serde(default, deserialize_with = "de::list")]
    pub questions_to_ask: Vec<String>,
}

impl EvaluationSection {
    pub fn has_details(&self) -> bool {
        self.assessment.is_some()
            || self.details.is_some()
            || self.priority_label.is_some()
            || !self.strengths.is_empty()
            || !self.risks.is_empty()
            || !self.questions_to_ask.is_empty()
    }
}
