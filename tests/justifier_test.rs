// tests/justifier_test.rs

use raziel::reasoning::analysis::{analyze_response, EvidenceSource, ReasoningContext};
use raziel::reasoning::{ConfidenceJustifier, ConfidenceLevel, EvidenceType, Profile};
use raziel::verify::{VerificationResult, VerifyMethod};

fn superficial_verdict(conf: f32) -> VerificationResult {
    VerificationResult {
        is_substantive: false,
        confidence: conf,
        method: VerifyMethod::PatternMatching,
        explanation: "Contains stalling phrases: [\"let's solve this\"]".to_string(),
    }
}

fn substantive_verdict(conf: f32) -> VerificationResult {
    VerificationResult {
        is_substantive: true,
        confidence: conf,
        method: VerifyMethod::ModelBased,
        explanation: "detailed analysis provided".to_string(),
    }
}

fn substantiveness_score(justifier: &ConfidenceJustifier, v: VerificationResult) -> f32 {
    let ctx = ReasoningContext::default();
    let analysis = analyze_response("q", "a response of reasonable length for scanning", v, &ctx);
    let justification = justifier.justify(&analysis, &ctx);
    justification
        .evidence_items
        .iter()
        .find(|e| e.evidence_type == EvidenceType::ResponseSubstantiveness)
        .map(|e| e.score)
        .unwrap()
}

#[test]
fn score_is_the_weighted_mean_of_its_own_evidence() {
    let justifier = ConfidenceJustifier::new("general");
    let mut ctx = ReasoningContext::default();
    ctx.dimension_scores.insert("credibility".to_string(), 0.6);
    ctx.dimension_scores.insert("utility".to_string(), 0.7);
    ctx.evidence_sources.push(EvidenceSource {
        label: "benchmark report".to_string(),
        source_type: "academic".to_string(),
    });

    let analysis = analyze_response(
        "q",
        "The figures clearly support the conclusion, though load might vary.",
        substantive_verdict(0.85),
        &ctx,
    );
    let justification = justifier.justify(&analysis, &ctx);

    // recompute independently from the returned items
    let total_weight: f32 = justification.evidence_items.iter().map(|e| e.weight).sum();
    let recomputed: f32 = justification
        .evidence_items
        .iter()
        .map(|e| e.score * e.weight)
        .sum::<f32>()
        / total_weight;

    assert!((justification.confidence_score - recomputed).abs() < 1e-6);
    assert_eq!(
        justification.confidence_level,
        ConfidenceLevel::from_score(justification.confidence_score)
    );
}

#[test]
fn superficiality_evidence_is_monotone_in_detection_confidence() {
    let justifier = ConfidenceJustifier::new("general");

    let mut prev = f32::MAX;
    for conf in [0.1f32, 0.4, 0.7, 0.95] {
        let s = substantiveness_score(&justifier, superficial_verdict(conf));
        assert!(s < 0.5, "superficial evidence must score below 0.5");
        assert!(s < prev, "more confident detection must score lower");
        prev = s;
    }

    let mut prev = 0.0;
    for conf in [0.1f32, 0.4, 0.7, 0.95] {
        let s = substantiveness_score(&justifier, substantive_verdict(conf));
        assert!(s > 0.8, "verified substance must score above 0.8");
        assert!(s > prev, "more confident verification must score higher");
        prev = s;
    }
}

#[test]
fn unverified_response_scores_neutral() {
    let justifier = ConfidenceJustifier::new("general");
    let s = substantiveness_score(&justifier, VerificationResult::unverified());
    assert!((s - 0.7).abs() < 1e-6);
}

#[test]
fn verifier_failure_degrades_moderately_not_critically() {
    let justifier = ConfidenceJustifier::new("general");
    let s = substantiveness_score(&justifier, VerificationResult::error_fallback("timeout"));
    // below neutral, but nowhere near the critical band
    assert!(s < 0.7);
    assert!(s > 0.35);
}

#[test]
fn context_only_verification_synthesizes_the_evidence() {
    let justifier = ConfidenceJustifier::new("general");
    let mut ctx = ReasoningContext::default();
    ctx.is_substantive = Some(false);
    ctx.verification_confidence = Some(0.8);

    // no verifier ran: the analysis carries an unverified verdict
    let analysis = analyze_response(
        "q",
        "a response of reasonable length for scanning",
        VerificationResult::unverified(),
        &ctx,
    );
    let justification = justifier.justify(&analysis, &ctx);

    let sub = justification
        .evidence_items
        .iter()
        .find(|e| e.evidence_type == EvidenceType::ResponseSubstantiveness)
        .unwrap();
    assert!(sub.score < 0.5);
    assert!(sub.description.contains("context indicates"));
}

#[test]
fn critical_superficiality_factor_comes_first() {
    let justifier = ConfidenceJustifier::new("general");
    let ctx = ReasoningContext::default();
    let analysis = analyze_response(
        "q",
        "a response of reasonable length for scanning",
        superficial_verdict(0.9),
        &ctx,
    );
    let justification = justifier.justify(&analysis, &ctx);

    assert!(!justification.limiting_factors.is_empty());
    assert!(justification.limiting_factors[0].starts_with("CRITICAL superficiality"));
    assert!(justification.reliability_assessment.starts_with("CRITICAL"));
}

#[test]
fn substantive_high_confidence_gets_affirmative_reliability() {
    let justifier = ConfidenceJustifier::new("general");
    let mut ctx = ReasoningContext::default();
    ctx.dimension_scores.insert("credibility".to_string(), 0.85);
    ctx.dimension_scores.insert("utility".to_string(), 0.8);
    ctx.evidence_sources.push(EvidenceSource {
        label: "primary dataset".to_string(),
        source_type: "official".to_string(),
    });
    ctx.evidence_sources.push(EvidenceSource {
        label: "peer-reviewed study".to_string(),
        source_type: "academic".to_string(),
    });

    let analysis = analyze_response(
        "q",
        "The dataset shows a consistent effect across every cohort measured.",
        substantive_verdict(0.9),
        &ctx,
    );
    let justification = justifier.justify(&analysis, &ctx);

    assert!(justification.confidence_score >= 0.7);
    assert!(justification
        .reliability_assessment
        .contains("verified as substantive and detailed"));
    assert!(!justification.primary_factors.is_empty());
}

#[test]
fn business_profile_ranks_substantiveness_at_least_as_high_as_researcher() {
    assert!(
        Profile::Business.weight(EvidenceType::ResponseSubstantiveness)
            >= Profile::Researcher.weight(EvidenceType::ResponseSubstantiveness)
    );
    // and researcher leans harder on sources than business does
    assert!(
        Profile::Researcher.weight(EvidenceType::SourceCredibility)
            > Profile::Business.weight(EvidenceType::SourceCredibility)
    );
}

#[test]
fn profiles_change_the_verdict_weighting() {
    let mut ctx = ReasoningContext::default();
    ctx.dimension_scores.insert("credibility".to_string(), 0.7);

    let analysis_for = |justifier: &ConfidenceJustifier| {
        let analysis = analyze_response(
            "q",
            "a response of reasonable length for scanning",
            superficial_verdict(0.9),
            &ctx,
        );
        justifier.justify(&analysis, &ctx).confidence_score
    };

    let business = analysis_for(&ConfidenceJustifier::new("business"));
    let researcher = analysis_for(&ConfidenceJustifier::new("researcher"));
    // business punishes the superficial verdict harder
    assert!(business < researcher);
}

#[test]
fn empty_dimension_scores_stay_neutral() {
    let justifier = ConfidenceJustifier::new("general");
    let ctx = ReasoningContext::default();
    let analysis = analyze_response(
        "q",
        "a response of reasonable length for scanning",
        VerificationResult::unverified(),
        &ctx,
    );
    let justification = justifier.justify(&analysis, &ctx);
    let dims = justification
        .evidence_items
        .iter()
        .find(|e| e.evidence_type == EvidenceType::DimensionScores)
        .unwrap();
    assert!((dims.score - 0.5).abs() < 1e-6);
}
