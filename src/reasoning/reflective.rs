// src/reasoning/reflective.rs
use std::time::Instant;

use serde::Serialize;
use serde_json::json;

use crate::config::TraceCfg;
use crate::reasoning::analysis::{analyze_response, ReasoningContext, ResponseAnalysis};
use crate::reasoning::critique::{
    default_critique_generators, default_perspective_generators, detect_dimension_conflicts,
    CritiqueGenerator, CritiqueLevel, DimensionConflict, Finding, PerspectiveGenerator,
};
use crate::reasoning::justifier::{
    ConfidenceJustification, ConfidenceJustifier, ConfidenceLevel,
};
use crate::trace::record_cycle_trace;
use crate::verify::{NoVerifier, VerificationResult, Verifier};

/// Score divergence past which two dimensions count as conflicting.
const CONFLICT_THRESHOLD: f32 = 0.4;

/// Marker prepended to the final text when the response failed the
/// substantiveness check.
pub const QUALITY_ALERT_MARKER: &str = "[QUALITY ALERT]";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepType {
    InitialAnalysis,
    AlternativePerspectives,
    AdversarialCritique,
    ConflictScan,
    ConfidenceJustification,
    Synthesis,
}

/// One entry of the reasoning chain.
#[derive(Debug, Clone, Serialize)]
pub struct ReasoningStep {
    pub step_type: StepType,
    pub summary: String,
    pub data: serde_json::Value,
}

/// Everything one reflective cycle produced.
#[derive(Debug, Clone, Serialize)]
pub struct ReflectiveResult {
    pub session_id: String,
    pub original_query: String,
    pub initial_response: String,
    pub analysis: ResponseAnalysis,
    pub alternative_perspectives: Vec<Finding>,
    pub adversarial_critiques: Vec<Finding>,
    pub dimension_conflicts: Vec<DimensionConflict>,
    pub justification: ConfidenceJustification,
    pub reasoning_chain: Vec<ReasoningStep>,
    pub final_response: String,
    pub reported_confidence_level: ConfidenceLevel,
    pub critique_summary: String,
    pub meta_confidence: f32,
    pub duration_ms: u64,
    pub timestamp: String,
}

/// Orchestrates analysis, verification, critique generation, confidence
/// justification, and final synthesis for one candidate response.
///
/// The verifier is injected at construction (absent -> `NoVerifier`), so
/// "configured vs. unconfigured" is a variant, decided once, not a flag
/// checked at every call site. Declared non-parallel: a cycle runs to
/// completion before any dependent consumer reads its outputs.
pub struct ReflectiveEngine {
    verifier: Box<dyn Verifier>,
    critique_level: CritiqueLevel,
    justifier: ConfidenceJustifier,
    perspectives: Vec<Box<dyn PerspectiveGenerator>>,
    critics: Vec<Box<dyn CritiqueGenerator>>,
    trace: TraceCfg,
}

impl ReflectiveEngine {
    pub fn new(critique_level: CritiqueLevel, profile: &str) -> Self {
        Self {
            verifier: Box::new(NoVerifier),
            critique_level,
            justifier: ConfidenceJustifier::new(profile),
            perspectives: default_perspective_generators(),
            critics: default_critique_generators(),
            trace: TraceCfg::default(),
        }
    }

    pub fn with_verifier(mut self, verifier: Option<Box<dyn Verifier>>) -> Self {
        self.verifier = verifier.unwrap_or_else(|| Box::new(NoVerifier));
        self
    }

    pub fn with_trace(mut self, trace: TraceCfg) -> Self {
        self.trace = trace;
        self
    }

    pub fn set_critique_level(&mut self, level: CritiqueLevel) {
        self.critique_level = level;
    }

    /// The caught verifier boundary: one blocking call; an internal
    /// failure degrades to a moderate default and never propagates.
    pub fn run_verifier(&self, response: &str) -> VerificationResult {
        match self.verifier.verify(response) {
            Ok(v) => v,
            Err(e) => {
                eprintln!("[verify] verifier failed, using fallback verdict: {e:#}");
                VerificationResult::error_fallback(&format!("{e:#}"))
            }
        }
    }

    /// One full reasoning cycle. Infallible by design: every failure mode
    /// below this level resolves to a degraded verdict, not an error.
    pub fn reasoning_cycle(
        &self,
        query: &str,
        response: &str,
        context: &ReasoningContext,
    ) -> ReflectiveResult {
        let start = Instant::now();
        let timestamp = chrono::Utc::now();
        let session_id = format!("cycle_{}", timestamp.timestamp_millis());

        // 1. verification + structured analysis
        let verification = self.run_verifier(response);
        let analysis = analyze_response(query, response, verification, context);
        eprintln!(
            "[reflect] {session_id}: substantive={} method={} conf={:.2}",
            analysis.verification.is_substantive,
            analysis.verification.method.as_str(),
            analysis.verification.confidence
        );

        // 2. perspectives / critiques / conflicts, gated by critique level
        let perspective_count = match self.critique_level {
            CritiqueLevel::Light => 1.min(self.perspectives.len()),
            _ => self.perspectives.len(),
        };
        let alternative_perspectives: Vec<Finding> = self.perspectives[..perspective_count]
            .iter()
            .flat_map(|g| g.generate(query, &analysis))
            .collect();

        let adversarial_critiques: Vec<Finding> = if self.critique_level >= CritiqueLevel::Moderate
        {
            self.critics
                .iter()
                .flat_map(|g| g.generate(query, &analysis))
                .collect()
        } else {
            Vec::new()
        };

        let dimension_conflicts = if self.critique_level >= CritiqueLevel::Deep {
            detect_dimension_conflicts(&analysis.dimension_scores, CONFLICT_THRESHOLD)
        } else {
            Vec::new()
        };

        // 3. reasoning chain; step 0 always carries the verification outcome
        let mut reasoning_chain = self.build_chain(
            &analysis,
            &alternative_perspectives,
            &adversarial_critiques,
            &dimension_conflicts,
        );

        // 4. confidence justification over the full evidence set
        let mut justify_ctx = context.clone();
        justify_ctx.dimension_conflicts = dimension_conflicts.clone();
        let justification = self.justifier.justify(&analysis, &justify_ctx);
        eprintln!(
            "[justify] {session_id}: score={:.3} level={}",
            justification.confidence_score,
            justification.confidence_level.as_str()
        );

        reasoning_chain.push(ReasoningStep {
            step_type: StepType::ConfidenceJustification,
            summary: format!(
                "justified confidence {:.3} ({}) from {} evidence items",
                justification.confidence_score,
                justification.confidence_level.as_str(),
                justification.evidence_items.len()
            ),
            data: json!({
                "confidence_score": justification.confidence_score,
                "confidence_level": justification.confidence_level,
                "limiting_factors": justification.limiting_factors,
            }),
        });

        // 5. synthesis
        let (final_response, reported_confidence_level) =
            synthesize_final_response(response, &analysis, &justification);
        reasoning_chain.push(ReasoningStep {
            step_type: StepType::Synthesis,
            summary: if analysis.verification.is_substantive {
                "passed response through unannotated".to_string()
            } else {
                "prepended superficiality alert and demoted the reported level".to_string()
            },
            data: json!({ "reported_level": reported_confidence_level }),
        });

        let meta_confidence = if analysis.verification.is_substantive {
            justification.confidence_score
        } else {
            justification.confidence_score * 0.6
        };

        let critique_summary = format!(
            "{} perspectives, {} critiques, {} conflicts; quality: {}",
            alternative_perspectives.len(),
            adversarial_critiques.len(),
            dimension_conflicts.len(),
            if analysis.verification.is_substantive {
                "substantive"
            } else {
                "superficial"
            }
        );

        let result = ReflectiveResult {
            session_id,
            original_query: query.to_string(),
            initial_response: response.to_string(),
            analysis,
            alternative_perspectives,
            adversarial_critiques,
            dimension_conflicts,
            justification,
            reasoning_chain,
            final_response,
            reported_confidence_level,
            critique_summary,
            meta_confidence,
            duration_ms: start.elapsed().as_millis() as u64,
            timestamp: timestamp.to_rfc3339(),
        };

        if self.trace.enabled {
            record_cycle_trace(&self.trace.dir, "reasoning_cycle", &cycle_trace_payload(&result));
        }

        result
    }

    /// Degraded result for a caller-detected failure (elapsed deadline,
    /// poisoned upstream state). Verification still runs if possible; the
    /// verdict lands at the internal-error defaults.
    pub fn fallback_cycle(&self, query: &str, response: &str, reason: &str) -> ReflectiveResult {
        eprintln!("[reflect] fallback cycle: {reason}");
        let verification = VerificationResult::error_fallback(reason);
        let context = ReasoningContext::default();
        let analysis = analyze_response(query, response, verification, &context);
        let justification = self.justifier.justify(&analysis, &context);
        let reasoning_chain = self.build_chain(&analysis, &[], &[], &[]);
        let level = justification.confidence_level.demoted();

        ReflectiveResult {
            session_id: format!("fallback_{}", chrono::Utc::now().timestamp_millis()),
            original_query: query.to_string(),
            initial_response: response.to_string(),
            final_response: format!(
                "{response}\n\nNote: reflective meta-reasoning unavailable ({reason}); confidence reported conservatively."
            ),
            reported_confidence_level: level,
            critique_summary: format!("fallback mode: {reason}"),
            meta_confidence: justification.confidence_score.min(0.3),
            analysis,
            alternative_perspectives: Vec::new(),
            adversarial_critiques: Vec::new(),
            dimension_conflicts: Vec::new(),
            justification,
            reasoning_chain,
            duration_ms: 0,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    fn build_chain(
        &self,
        analysis: &ResponseAnalysis,
        perspectives: &[Finding],
        critiques: &[Finding],
        conflicts: &[DimensionConflict],
    ) -> Vec<ReasoningStep> {
        let v = &analysis.verification;
        let mut chain = vec![ReasoningStep {
            step_type: StepType::InitialAnalysis,
            summary: format!(
                "analyzed response: {} assumptions, {} uncertainty markers",
                analysis.assumptions.len(),
                analysis.uncertainty_markers.len()
            ),
            data: json!({
                "superficiality_verified": v.method.as_str() != "none",
                "is_substantive": v.is_substantive,
                "verification_method": v.method.as_str(),
                "verification_confidence": v.confidence,
            }),
        }];

        if !perspectives.is_empty() {
            chain.push(ReasoningStep {
                step_type: StepType::AlternativePerspectives,
                summary: format!("{} alternative perspective(s)", perspectives.len()),
                data: json!(perspectives),
            });
        }
        if !critiques.is_empty() {
            chain.push(ReasoningStep {
                step_type: StepType::AdversarialCritique,
                summary: format!("{} adversarial critique(s)", critiques.len()),
                data: json!(critiques),
            });
        }
        if !conflicts.is_empty() {
            chain.push(ReasoningStep {
                step_type: StepType::ConflictScan,
                summary: format!("{} dimension conflict(s)", conflicts.len()),
                data: json!(conflicts),
            });
        }
        chain
    }
}

/// Build the final text and the reported level. Superficial responses get
/// the alert annotation prepended (explanation, method, literal verifier
/// confidence to two decimals) and the level forced down one tier;
/// substantive responses pass through untouched.
fn synthesize_final_response(
    response: &str,
    analysis: &ResponseAnalysis,
    justification: &ConfidenceJustification,
) -> (String, ConfidenceLevel) {
    let v = &analysis.verification;
    if v.is_substantive {
        return (response.to_string(), justification.confidence_level);
    }

    let level = justification.confidence_level.demoted();
    let annotated = format!(
        "{QUALITY_ALERT_MARKER} Superficial response detected: {} (method: {}, verification confidence: {:.2}; reported confidence: {})\n\n{}",
        v.explanation,
        v.method.as_str(),
        v.confidence,
        level.as_str(),
        response
    );
    (annotated, level)
}

fn cycle_trace_payload(result: &ReflectiveResult) -> serde_json::Value {
    json!({
        "session_id": result.session_id,
        "confidence_score": result.justification.confidence_score,
        "confidence_level": result.justification.confidence_level,
        "reported_level": result.reported_confidence_level,
        "is_substantive": result.analysis.verification.is_substantive,
        "verification_method": result.analysis.verification.method,
        "perspectives": result.alternative_perspectives.len(),
        "critiques": result.adversarial_critiques.len(),
        "conflicts": result.dimension_conflicts.len(),
        "duration_ms": result.duration_ms,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_step_zero_embeds_verification() {
        let engine = ReflectiveEngine::new(CritiqueLevel::Light, "general")
            .with_trace(TraceCfg { enabled: false, ..TraceCfg::default() });
        let result = engine.reasoning_cycle(
            "why is the sky blue?",
            "Rayleigh scattering preferentially redirects shorter wavelengths.",
            &ReasoningContext::default(),
        );
        let step0 = &result.reasoning_chain[0];
        assert_eq!(step0.step_type, StepType::InitialAnalysis);
        assert_eq!(step0.data["is_substantive"], json!(true));
        assert_eq!(step0.data["verification_method"], json!("none"));
        assert_eq!(step0.data["superficiality_verified"], json!(false));
    }

    #[test]
    fn unverified_cycle_is_unannotated() {
        let engine = ReflectiveEngine::new(CritiqueLevel::Light, "general")
            .with_trace(TraceCfg { enabled: false, ..TraceCfg::default() });
        let result = engine.reasoning_cycle(
            "q",
            "A reasoned answer grounded in the measurements taken earlier.",
            &ReasoningContext::default(),
        );
        assert!(!result.final_response.contains(QUALITY_ALERT_MARKER));
        assert_eq!(result.reported_confidence_level, result.justification.confidence_level);
    }
}
