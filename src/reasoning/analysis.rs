// src/reasoning/analysis.rs
use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::reasoning::critique::DimensionConflict;
use crate::verify::VerificationResult;

/// One cited backing source for a response, as supplied by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvidenceSource {
    pub label: String,
    pub source_type: String, // "academic" | "official" | "web" | ...
}

/// Caller-supplied context for a reasoning cycle: upstream dimension
/// scores, cited sources, and optionally a pre-computed verification
/// verdict (when the caller ran its own check and skips the verifier).
#[derive(Debug, Clone, Default)]
pub struct ReasoningContext {
    pub dimension_scores: HashMap<String, f32>,
    pub evidence_sources: Vec<EvidenceSource>,
    pub is_substantive: Option<bool>,
    pub verification_confidence: Option<f32>,
    pub dimension_conflicts: Vec<DimensionConflict>,
}

/// Structured analysis of one candidate response, verification included so
/// downstream consumers never re-query the verifier.
#[derive(Debug, Clone, Serialize)]
pub struct ResponseAnalysis {
    pub word_count: usize,
    pub assumptions: Vec<String>,
    pub uncertainty_markers: Vec<String>,
    pub confidence_markers: Vec<String>,
    pub dimension_scores: HashMap<String, f32>,
    pub evidence_sources: Vec<EvidenceSource>,
    pub verification: VerificationResult,
}

const UNCERTAINTY_TERMS: [&str; 9] = [
    "might", "may", "possibly", "perhaps", "unclear", "uncertain", "not sure", "could be",
    "unsure",
];

const CONFIDENCE_TERMS: [&str; 6] = [
    "definitely", "clearly", "certainly", "obviously", "undoubtedly", "without doubt",
];

static ASSUMPTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(assum\w+|presum\w+|suppos\w+|taken? for granted)\b")
        .expect("assumption pattern compiles")
});

/// Scan a response into its structured analysis. Pure text heuristics; the
/// heavier signals (dimensions, sources) come from the caller context.
pub fn analyze_response(
    _query: &str,
    response: &str,
    verification: VerificationResult,
    context: &ReasoningContext,
) -> ResponseAnalysis {
    let lower = response.to_ascii_lowercase();

    ResponseAnalysis {
        word_count: response.split_whitespace().count(),
        assumptions: assumption_sentences(response),
        uncertainty_markers: matched_terms(&lower, &UNCERTAINTY_TERMS),
        confidence_markers: matched_terms(&lower, &CONFIDENCE_TERMS),
        dimension_scores: context.dimension_scores.clone(),
        evidence_sources: context.evidence_sources.clone(),
        verification,
    }
}

/// Sentences carrying an assumption cue, order preserved, capped so a
/// hedge-heavy response does not flood the analysis.
fn assumption_sentences(response: &str) -> Vec<String> {
    response
        .split(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| !s.is_empty() && ASSUMPTION_RE.is_match(s))
        .take(5)
        .map(str::to_string)
        .collect()
}

fn matched_terms(lower: &str, terms: &[&str]) -> Vec<String> {
    terms
        .iter()
        .filter(|t| lower.contains(*t))
        .map(|t| t.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verified() -> VerificationResult {
        VerificationResult::unverified()
    }

    #[test]
    fn finds_assumptions_and_markers() {
        let response = "Assuming the cache is warm, latency clearly drops. \
                        The queue might still saturate under burst load.";
        let a = analyze_response("q", response, verified(), &ReasoningContext::default());
        assert_eq!(a.assumptions.len(), 1);
        assert!(a.assumptions[0].contains("Assuming"));
        assert_eq!(a.uncertainty_markers, vec!["might".to_string()]);
        assert_eq!(a.confidence_markers, vec!["clearly".to_string()]);
    }

    #[test]
    fn clean_text_yields_empty_scans() {
        let a = analyze_response(
            "q",
            "The result follows from the benchmark data.",
            verified(),
            &ReasoningContext::default(),
        );
        assert!(a.assumptions.is_empty());
        assert!(a.uncertainty_markers.is_empty());
        assert!(a.confidence_markers.is_empty());
    }

    #[test]
    fn context_scores_flow_through() {
        let mut ctx = ReasoningContext::default();
        ctx.dimension_scores.insert("credibility".into(), 0.8);
        let a = analyze_response("q", "some response text here", verified(), &ctx);
        assert_eq!(a.dimension_scores["credibility"], 0.8);
    }
}
