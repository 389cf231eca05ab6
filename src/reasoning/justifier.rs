// src/reasoning/justifier.rs
use serde::{Deserialize, Serialize};

use crate::reasoning::analysis::{ReasoningContext, ResponseAnalysis};
use crate::verify::VerifyMethod;

// Band boundaries for the substantiveness evidence score. Fixed and named
// rather than inlined: the rest of the engine (limiting factors,
// reliability wording) keys off the same constants.
pub const SUPERFICIALITY_CRITICAL: f32 = 0.35;
pub const SUPERFICIALITY_MINOR: f32 = 0.6;
pub const SUBSTANTIVE_AFFIRMED: f32 = 0.8;

/// Evidence below this score becomes a limiting factor; at or above
/// `PRIMARY_FACTOR_THRESHOLD` it becomes a primary factor.
const LOW_EVIDENCE_THRESHOLD: f32 = 0.5;
const PRIMARY_FACTOR_THRESHOLD: f32 = 0.75;

/// Typed signal feeding the confidence verdict. Open set; these are the
/// signals the pipeline produces today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceType {
    SourceCredibility,
    ResponseSubstantiveness,
    DimensionScores,
    AssumptionCount,
    UncertaintyMarkers,
    ConfidenceMarkers,
    DimensionConflicts,
}

impl EvidenceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EvidenceType::SourceCredibility => "source_credibility",
            EvidenceType::ResponseSubstantiveness => "response_substantiveness",
            EvidenceType::DimensionScores => "dimension_scores",
            EvidenceType::AssumptionCount => "assumption_count",
            EvidenceType::UncertaintyMarkers => "uncertainty_markers",
            EvidenceType::ConfidenceMarkers => "confidence_markers",
            EvidenceType::DimensionConflicts => "dimension_conflicts",
        }
    }
}

/// One scored, weighted signal. Never mutated after creation.
#[derive(Debug, Clone, Serialize)]
pub struct EvidenceItem {
    pub evidence_type: EvidenceType,
    pub score: f32,
    pub weight: f32,
    pub description: String,
    pub supporting_details: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    VeryLow,
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl ConfidenceLevel {
    pub fn from_score(score: f32) -> Self {
        if score < 0.2 {
            ConfidenceLevel::VeryLow
        } else if score < 0.4 {
            ConfidenceLevel::Low
        } else if score < 0.6 {
            ConfidenceLevel::Moderate
        } else if score < 0.8 {
            ConfidenceLevel::High
        } else {
            ConfidenceLevel::VeryHigh
        }
    }

    /// One tier down, saturating at the bottom.
    pub fn demoted(self) -> Self {
        match self {
            ConfidenceLevel::VeryHigh => ConfidenceLevel::High,
            ConfidenceLevel::High => ConfidenceLevel::Moderate,
            ConfidenceLevel::Moderate => ConfidenceLevel::Low,
            ConfidenceLevel::Low | ConfidenceLevel::VeryLow => ConfidenceLevel::VeryLow,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceLevel::VeryLow => "very_low",
            ConfidenceLevel::Low => "low",
            ConfidenceLevel::Moderate => "moderate",
            ConfidenceLevel::High => "high",
            ConfidenceLevel::VeryHigh => "very_high",
        }
    }
}

/// Final scored verdict for one reasoning cycle.
#[derive(Debug, Clone, Serialize)]
pub struct ConfidenceJustification {
    pub confidence_score: f32,
    pub confidence_level: ConfidenceLevel,
    pub evidence_items: Vec<EvidenceItem>,
    pub primary_factors: Vec<String>,
    pub limiting_factors: Vec<String>,
    pub reliability_assessment: String,
}

/// Named weighting policy. Unknown profile names fall back to General.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    General,
    Researcher,
    Business,
    Legal,
}

impl Profile {
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "researcher" => Profile::Researcher,
            "business" => Profile::Business,
            "legal" => Profile::Legal,
            "general" => Profile::General,
            other => {
                if !other.is_empty() {
                    eprintln!("[justify] unknown profile '{other}', using general");
                }
                Profile::General
            }
        }
    }

    /// Per-profile evidence weights. Every weight is strictly positive;
    /// the overall score normalizes by the weight sum, so rows need not
    /// sum to 1.
    pub fn weight(&self, evidence_type: EvidenceType) -> f32 {
        use EvidenceType::*;
        match self {
            Profile::General => match evidence_type {
                SourceCredibility => 0.20,
                ResponseSubstantiveness => 0.15,
                DimensionScores => 0.20,
                AssumptionCount => 0.15,
                UncertaintyMarkers => 0.12,
                ConfidenceMarkers => 0.08,
                DimensionConflicts => 0.10,
            },
            Profile::Researcher => match evidence_type {
                SourceCredibility => 0.30,
                ResponseSubstantiveness => 0.12,
                DimensionScores => 0.18,
                AssumptionCount => 0.15,
                UncertaintyMarkers => 0.10,
                ConfidenceMarkers => 0.05,
                DimensionConflicts => 0.10,
            },
            Profile::Business => match evidence_type {
                SourceCredibility => 0.15,
                ResponseSubstantiveness => 0.20,
                DimensionScores => 0.20,
                AssumptionCount => 0.10,
                UncertaintyMarkers => 0.12,
                ConfidenceMarkers => 0.13,
                DimensionConflicts => 0.10,
            },
            Profile::Legal => match evidence_type {
                SourceCredibility => 0.28,
                ResponseSubstantiveness => 0.18,
                DimensionScores => 0.16,
                AssumptionCount => 0.16,
                UncertaintyMarkers => 0.10,
                ConfidenceMarkers => 0.04,
                DimensionConflicts => 0.08,
            },
        }
    }
}

pub struct ConfidenceJustifier {
    profile: Profile,
}

impl ConfidenceJustifier {
    pub fn new(profile_name: &str) -> Self {
        Self { profile: Profile::from_name(profile_name) }
    }

    pub fn profile(&self) -> Profile {
        self.profile
    }

    /// Compute the justified confidence verdict from the analysis and the
    /// caller context. Deterministic: the returned score is exactly the
    /// weighted mean of the returned evidence items.
    pub fn justify(
        &self,
        analysis: &ResponseAnalysis,
        context: &ReasoningContext,
    ) -> ConfidenceJustification {
        let items = self.collect_evidence(analysis, context);

        let total_weight: f32 = items.iter().map(|e| e.weight).sum();
        let confidence_score = if total_weight > 0.0 {
            items.iter().map(|e| e.score * e.weight).sum::<f32>() / total_weight
        } else {
            0.5
        };

        let substantiveness_score = items
            .iter()
            .find(|e| e.evidence_type == EvidenceType::ResponseSubstantiveness)
            .map(|e| e.score);

        let limiting_factors = identify_limiting_factors(&items);
        let primary_factors = items
            .iter()
            .filter(|e| e.score >= PRIMARY_FACTOR_THRESHOLD)
            .map(|e| format!("{}: {}", e.evidence_type.as_str(), e.description))
            .collect();

        ConfidenceJustification {
            confidence_score,
            confidence_level: ConfidenceLevel::from_score(confidence_score),
            reliability_assessment: reliability_assessment(
                confidence_score,
                substantiveness_score,
            ),
            evidence_items: items,
            primary_factors,
            limiting_factors,
        }
    }

    fn collect_evidence(
        &self,
        analysis: &ResponseAnalysis,
        context: &ReasoningContext,
    ) -> Vec<EvidenceItem> {
        let mut items = vec![
            self.assess_source_credibility(analysis),
            self.assess_substantiveness(analysis, context),
            self.assess_dimension_scores(analysis),
            self.assess_assumption_count(analysis),
            self.assess_uncertainty_markers(analysis),
            self.assess_confidence_markers(analysis),
        ];
        items.push(self.assess_dimension_conflicts(context));
        items
    }

    fn item(
        &self,
        evidence_type: EvidenceType,
        score: f32,
        description: String,
        supporting_details: Vec<String>,
    ) -> EvidenceItem {
        EvidenceItem {
            evidence_type,
            score: score.clamp(0.0, 1.0),
            weight: self.profile.weight(evidence_type),
            description,
            supporting_details,
        }
    }

    fn assess_source_credibility(&self, analysis: &ResponseAnalysis) -> EvidenceItem {
        let sources = &analysis.evidence_sources;
        if sources.is_empty() {
            return self.item(
                EvidenceType::SourceCredibility,
                0.3,
                "no credible evidence sources cited".to_string(),
                Vec::new(),
            );
        }
        let authoritative = sources
            .iter()
            .filter(|s| matches!(s.source_type.as_str(), "academic" | "official"))
            .count();
        let score = 0.5 + 0.1 * sources.len() as f32 + 0.05 * authoritative as f32;
        self.item(
            EvidenceType::SourceCredibility,
            score.min(0.95),
            format!("{} sources cited ({} authoritative)", sources.len(), authoritative),
            sources.iter().map(|s| format!("{} [{}]", s.label, s.source_type)).collect(),
        )
    }

    /// Substantiveness evidence, straight from the verifier outcome. The
    /// caller context can stand in for a skipped verifier invocation; the
    /// scoring policy is the same either way.
    fn assess_substantiveness(
        &self,
        analysis: &ResponseAnalysis,
        context: &ReasoningContext,
    ) -> EvidenceItem {
        let v = &analysis.verification;

        if v.method == VerifyMethod::None {
            // context-only path: the caller may have verified out-of-band
            if let Some(is_substantive) = context.is_substantive {
                let conf = context.verification_confidence.unwrap_or(0.5);
                let (score, _) = substantiveness_score(is_substantive, conf);
                let kind = if is_substantive { "substantive" } else { "superficial" };
                return self.item(
                    EvidenceType::ResponseSubstantiveness,
                    score,
                    format!("context indicates {kind} response"),
                    vec![format!("verification confidence: {conf:.2} (from caller context)")],
                );
            }
            return self.item(
                EvidenceType::ResponseSubstantiveness,
                0.7,
                "no superficiality verification performed".to_string(),
                vec!["verifier not configured".to_string()],
            );
        }

        if v.method == VerifyMethod::ErrorFallback {
            // moderate degradation only; a failed check is not a verdict
            return self.item(
                EvidenceType::ResponseSubstantiveness,
                0.6,
                "verification failed; response treated as substantive".to_string(),
                vec![v.explanation.clone(), format!("verification confidence: {:.2}", v.confidence)],
            );
        }

        let (score, description) = substantiveness_score(v.is_substantive, v.confidence);
        self.item(
            EvidenceType::ResponseSubstantiveness,
            score,
            format!("{description}: {}", v.explanation),
            vec![
                format!("method: {}", v.method.as_str()),
                format!("verification confidence: {:.2}", v.confidence),
            ],
        )
    }

    fn assess_dimension_scores(&self, analysis: &ResponseAnalysis) -> EvidenceItem {
        let scores = &analysis.dimension_scores;
        if scores.is_empty() {
            return self.item(
                EvidenceType::DimensionScores,
                0.5,
                "no dimension scores available".to_string(),
                Vec::new(),
            );
        }
        let mean = scores.values().sum::<f32>() / scores.len() as f32;
        let mut details: Vec<String> =
            scores.iter().map(|(k, v)| format!("{k}: {v:.2}")).collect();
        details.sort();
        self.item(
            EvidenceType::DimensionScores,
            mean,
            format!("mean of {} dimension scores", scores.len()),
            details,
        )
    }

    fn assess_assumption_count(&self, analysis: &ResponseAnalysis) -> EvidenceItem {
        let n = analysis.assumptions.len();
        let score = (1.0 - 0.15 * n as f32).clamp(0.2, 1.0);
        self.item(
            EvidenceType::AssumptionCount,
            score,
            format!("{n} assumption(s) detected"),
            analysis.assumptions.clone(),
        )
    }

    fn assess_uncertainty_markers(&self, analysis: &ResponseAnalysis) -> EvidenceItem {
        let n = analysis.uncertainty_markers.len();
        let score = (1.0 - 0.1 * n as f32).clamp(0.3, 1.0);
        self.item(
            EvidenceType::UncertaintyMarkers,
            score,
            format!("{n} uncertainty marker(s)"),
            analysis.uncertainty_markers.clone(),
        )
    }

    fn assess_confidence_markers(&self, analysis: &ResponseAnalysis) -> EvidenceItem {
        let n = analysis.confidence_markers.len();
        let score = (0.5 + 0.1 * n as f32).min(0.9);
        self.item(
            EvidenceType::ConfidenceMarkers,
            score,
            format!("{n} confidence marker(s)"),
            analysis.confidence_markers.clone(),
        )
    }

    fn assess_dimension_conflicts(&self, context: &ReasoningContext) -> EvidenceItem {
        let n = context.dimension_conflicts.len();
        let score = (0.8 - 0.15 * n as f32).clamp(0.2, 0.8);
        self.item(
            EvidenceType::DimensionConflicts,
            score,
            format!("{n} cross-dimension conflict(s)"),
            context
                .dimension_conflicts
                .iter()
                .map(|c| c.description.clone())
                .collect(),
        )
    }
}

/// The fixed substantiveness scoring policy.
/// Superficial: strictly below 0.5, dropping further the more confident the
/// detection. Substantive: strictly above 0.8, rising with confidence.
fn substantiveness_score(is_substantive: bool, verification_confidence: f32) -> (f32, &'static str) {
    let conf = verification_confidence.clamp(0.0, 1.0);
    if is_substantive {
        ((0.82 + 0.18 * conf).min(1.0), "substantive response verified")
    } else {
        ((0.48 - 0.35 * conf).max(0.05), "superficial response detected")
    }
}

fn identify_limiting_factors(items: &[EvidenceItem]) -> Vec<String> {
    let mut factors = Vec::new();

    // critical superficiality always leads, whatever else scored low
    if let Some(sub) = items
        .iter()
        .find(|e| e.evidence_type == EvidenceType::ResponseSubstantiveness)
    {
        if sub.score <= SUPERFICIALITY_CRITICAL {
            factors.push(format!("CRITICAL superficiality: {}", sub.description));
        }
    }

    for e in items {
        if e.score < LOW_EVIDENCE_THRESHOLD {
            factors.push(format!("low {}: {}", e.evidence_type.as_str(), e.description));
        }
    }
    factors
}

fn reliability_assessment(overall: f32, substantiveness: Option<f32>) -> String {
    if let Some(s) = substantiveness {
        if s <= SUPERFICIALITY_CRITICAL {
            return "CRITICAL: response shows significant superficiality issues; treat its conclusions with caution".to_string();
        }
        if s < SUPERFICIALITY_MINOR {
            return "response may contain superficial elements; verify key claims independently"
                .to_string();
        }
        if s >= SUBSTANTIVE_AFFIRMED && overall >= 0.7 {
            return "response verified as substantive and detailed; reliability is high"
                .to_string();
        }
    }
    if overall >= 0.6 {
        format!("reliability is adequate (overall confidence {overall:.2})")
    } else {
        format!("reliability is limited (overall confidence {overall:.2})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn superficial_score_decreases_with_detection_confidence() {
        let mut prev = 0.5;
        for conf in [0.0f32, 0.2, 0.5, 0.8, 1.0] {
            let (s, _) = substantiveness_score(false, conf);
            assert!(s < 0.5, "superficial score must stay below 0.5");
            assert!(s < prev || conf == 0.0, "must decrease as confidence rises");
            prev = s;
        }
    }

    #[test]
    fn substantive_score_increases_with_verification_confidence() {
        let mut prev = 0.0;
        for conf in [0.0f32, 0.2, 0.5, 0.8, 1.0] {
            let (s, _) = substantiveness_score(true, conf);
            assert!(s > 0.8, "substantive score must stay above 0.8");
            assert!(s > prev, "must increase as confidence rises");
            prev = s;
        }
    }

    #[test]
    fn every_profile_weight_is_positive() {
        use EvidenceType::*;
        let all = [
            SourceCredibility,
            ResponseSubstantiveness,
            DimensionScores,
            AssumptionCount,
            UncertaintyMarkers,
            ConfidenceMarkers,
            DimensionConflicts,
        ];
        for profile in [Profile::General, Profile::Researcher, Profile::Business, Profile::Legal] {
            for t in all {
                assert!(profile.weight(t) > 0.0, "{profile:?}/{t:?}");
            }
        }
    }

    #[test]
    fn business_weights_substantiveness_at_least_as_much_as_researcher() {
        assert!(
            Profile::Business.weight(EvidenceType::ResponseSubstantiveness)
                >= Profile::Researcher.weight(EvidenceType::ResponseSubstantiveness)
        );
    }

    #[test]
    fn unknown_profile_falls_back_to_general() {
        assert_eq!(Profile::from_name("astronaut"), Profile::General);
        assert_eq!(Profile::from_name("LEGAL"), Profile::Legal);
    }

    #[test]
    fn level_thresholds_are_fixed() {
        assert_eq!(ConfidenceLevel::from_score(0.1), ConfidenceLevel::VeryLow);
        assert_eq!(ConfidenceLevel::from_score(0.3), ConfidenceLevel::Low);
        assert_eq!(ConfidenceLevel::from_score(0.5), ConfidenceLevel::Moderate);
        assert_eq!(ConfidenceLevel::from_score(0.7), ConfidenceLevel::High);
        assert_eq!(ConfidenceLevel::from_score(0.9), ConfidenceLevel::VeryHigh);
    }

    #[test]
    fn demotion_saturates_at_the_bottom() {
        assert_eq!(ConfidenceLevel::VeryHigh.demoted(), ConfidenceLevel::High);
        assert_eq!(ConfidenceLevel::VeryLow.demoted(), ConfidenceLevel::VeryLow);
    }

    #[test]
    fn critical_superficiality_factor_leads() {
        let items = vec![
            EvidenceItem {
                evidence_type: EvidenceType::SourceCredibility,
                score: 0.3,
                weight: 0.2,
                description: "no credible sources".to_string(),
                supporting_details: Vec::new(),
            },
            EvidenceItem {
                evidence_type: EvidenceType::ResponseSubstantiveness,
                score: 0.2,
                weight: 0.15,
                description: "contains stalling phrases".to_string(),
                supporting_details: Vec::new(),
            },
        ];
        let factors = identify_limiting_factors(&items);
        assert!(factors[0].starts_with("CRITICAL superficiality"));
        assert!(factors.iter().any(|f| f.contains("source_credibility")));
    }

    #[test]
    fn reliability_wording_follows_the_bands() {
        let critical = reliability_assessment(0.3, Some(0.2));
        assert!(critical.starts_with("CRITICAL"));

        let minor = reliability_assessment(0.5, Some(0.4));
        assert!(minor.contains("may contain superficial elements"));

        let affirmed = reliability_assessment(0.8, Some(0.9));
        assert!(affirmed.contains("verified as substantive and detailed"));
    }
}
