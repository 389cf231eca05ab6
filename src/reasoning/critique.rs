// src/reasoning/critique.rs
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::reasoning::analysis::ResponseAnalysis;

/// How hard the cycle pushes back on a response. Gates how many generators
/// run; verification itself always runs when a verifier is configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CritiqueLevel {
    Light,
    Moderate,
    Deep,
}

/// One finding from a perspective or critique generator.
#[derive(Debug, Clone, Serialize)]
pub struct Finding {
    pub origin: String,
    pub text: String,
}

/// Two dimensions whose scores pull in opposite directions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DimensionConflict {
    pub dimension_a: String,
    pub dimension_b: String,
    pub score_a: f32,
    pub score_b: f32,
    pub description: String,
}

/// Reads the response from a different angle; may return nothing.
pub trait PerspectiveGenerator: Send + Sync {
    fn name(&self) -> &'static str;
    fn generate(&self, query: &str, analysis: &ResponseAnalysis) -> Vec<Finding>;
}

/// Attacks the response; may return nothing.
pub trait CritiqueGenerator: Send + Sync {
    fn name(&self) -> &'static str;
    fn generate(&self, query: &str, analysis: &ResponseAnalysis) -> Vec<Finding>;
}

// ---- built-in perspectives ----

pub struct SkepticPerspective;
impl PerspectiveGenerator for SkepticPerspective {
    fn name(&self) -> &'static str { "skeptic" }
    fn generate(&self, _query: &str, analysis: &ResponseAnalysis) -> Vec<Finding> {
        let mut out = Vec::new();
        if !analysis.confidence_markers.is_empty() && analysis.evidence_sources.is_empty() {
            out.push(Finding {
                origin: self.name().to_string(),
                text: format!(
                    "stated certainty ({}) is not backed by any cited source",
                    analysis.confidence_markers.join(", ")
                ),
            });
        }
        if analysis.word_count < 30 {
            out.push(Finding {
                origin: self.name().to_string(),
                text: "a fuller treatment would address counter-cases the short answer skips"
                    .to_string(),
            });
        }
        out
    }
}

pub struct PragmatistPerspective;
impl PerspectiveGenerator for PragmatistPerspective {
    fn name(&self) -> &'static str { "pragmatist" }
    fn generate(&self, query: &str, analysis: &ResponseAnalysis) -> Vec<Finding> {
        let mut out = Vec::new();
        if !analysis.uncertainty_markers.is_empty() {
            out.push(Finding {
                origin: self.name().to_string(),
                text: format!(
                    "hedged language ({}) leaves the practical next step undecided",
                    analysis.uncertainty_markers.join(", ")
                ),
            });
        }
        if query.trim_end().ends_with('?') && analysis.word_count > 200 {
            out.push(Finding {
                origin: self.name().to_string(),
                text: "a direct question deserves a headline answer before the detail".to_string(),
            });
        }
        out
    }
}

// ---- built-in critiques ----

pub struct UnsupportedClaimCritique;
impl CritiqueGenerator for UnsupportedClaimCritique {
    fn name(&self) -> &'static str { "unsupported_claim" }
    fn generate(&self, _query: &str, analysis: &ResponseAnalysis) -> Vec<Finding> {
        if analysis.confidence_markers.len() >= 2 && analysis.evidence_sources.is_empty() {
            vec![Finding {
                origin: self.name().to_string(),
                text: format!(
                    "{} strong-confidence markers with zero cited sources",
                    analysis.confidence_markers.len()
                ),
            }]
        } else {
            Vec::new()
        }
    }
}

pub struct AssumptionLoadCritique;
impl CritiqueGenerator for AssumptionLoadCritique {
    fn name(&self) -> &'static str { "assumption_load" }
    fn generate(&self, _query: &str, analysis: &ResponseAnalysis) -> Vec<Finding> {
        if analysis.assumptions.len() >= 2 {
            vec![Finding {
                origin: self.name().to_string(),
                text: format!(
                    "conclusion rests on {} unvalidated assumptions",
                    analysis.assumptions.len()
                ),
            }]
        } else {
            Vec::new()
        }
    }
}

pub fn default_perspective_generators() -> Vec<Box<dyn PerspectiveGenerator>> {
    vec![Box::new(SkepticPerspective), Box::new(PragmatistPerspective)]
}

pub fn default_critique_generators() -> Vec<Box<dyn CritiqueGenerator>> {
    vec![Box::new(UnsupportedClaimCritique), Box::new(AssumptionLoadCritique)]
}

/// Flag dimension pairs whose scores diverge past `threshold`.
pub fn detect_dimension_conflicts(
    scores: &HashMap<String, f32>,
    threshold: f32,
) -> Vec<DimensionConflict> {
    let mut dims: Vec<(&String, &f32)> = scores.iter().collect();
    dims.sort_by(|a, b| a.0.cmp(b.0)); // deterministic pair order

    let mut conflicts = Vec::new();
    for i in 0..dims.len() {
        for j in (i + 1)..dims.len() {
            let (da, sa) = dims[i];
            let (db, sb) = dims[j];
            if (sa - sb).abs() > threshold {
                conflicts.push(DimensionConflict {
                    dimension_a: da.clone(),
                    dimension_b: db.clone(),
                    score_a: *sa,
                    score_b: *sb,
                    description: format!(
                        "{da} ({sa:.2}) and {db} ({sb:.2}) pull in opposite directions"
                    ),
                });
            }
        }
    }
    conflicts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reasoning::analysis::{analyze_response, ReasoningContext};
    use crate::verify::VerificationResult;

    fn analysis_of(text: &str) -> ResponseAnalysis {
        analyze_response(
            "q",
            text,
            VerificationResult::unverified(),
            &ReasoningContext::default(),
        )
    }

    #[test]
    fn critique_levels_are_ordered() {
        assert!(CritiqueLevel::Light < CritiqueLevel::Moderate);
        assert!(CritiqueLevel::Moderate < CritiqueLevel::Deep);
    }

    #[test]
    fn skeptic_fires_on_unbacked_certainty() {
        let a = analysis_of("This is definitely the cause and clearly nothing else matters here at all in any case.");
        let findings = SkepticPerspective.generate("q", &a);
        assert!(findings.iter().any(|f| f.text.contains("not backed")));
    }

    #[test]
    fn conflict_scan_flags_divergent_pairs() {
        let mut scores = HashMap::new();
        scores.insert("credibility".to_string(), 0.9);
        scores.insert("utility".to_string(), 0.2);
        scores.insert("novelty".to_string(), 0.85);
        let conflicts = detect_dimension_conflicts(&scores, 0.4);
        assert_eq!(conflicts.len(), 2); // credibility/utility and novelty/utility
        assert!(conflicts[0].description.contains("opposite directions"));
    }

    #[test]
    fn conflict_scan_is_quiet_on_agreement() {
        let mut scores = HashMap::new();
        scores.insert("credibility".to_string(), 0.7);
        scores.insert("utility".to_string(), 0.6);
        assert!(detect_dimension_conflicts(&scores, 0.4).is_empty());
    }
}
