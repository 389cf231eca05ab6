// src/verify/verifier.rs
use serde::{Deserialize, Serialize};

/// How a verdict was produced. Open set: model-backed implementations slot
/// in without changing the contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerifyMethod {
    PatternMatching,
    ModelBased,
    LengthHeuristic,
    None,
    ErrorFallback,
}

impl VerifyMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerifyMethod::PatternMatching => "pattern_matching",
            VerifyMethod::ModelBased => "model_based",
            VerifyMethod::LengthHeuristic => "length_heuristic",
            VerifyMethod::None => "none",
            VerifyMethod::ErrorFallback => "error_fallback",
        }
    }
}

/// Verdict of one substantiveness check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationResult {
    pub is_substantive: bool,
    pub confidence: f32,
    pub method: VerifyMethod,
    pub explanation: String,
}

impl VerificationResult {
    /// The default when no verifier is configured: absence of verification
    /// is not evidence of superficiality.
    pub fn unverified() -> Self {
        Self {
            is_substantive: true,
            confidence: 1.0,
            method: VerifyMethod::None,
            explanation: "no verifier configured".to_string(),
        }
    }

    /// The default when a verifier failed internally. Degrades confidence
    /// moderately; never a strong superficiality signal.
    pub fn error_fallback(err: &str) -> Self {
        Self {
            is_substantive: true,
            confidence: 0.5,
            method: VerifyMethod::ErrorFallback,
            explanation: format!("verifier failed: {err}"),
        }
    }
}

/// One operation, swappable implementation, no other contract.
pub trait Verifier: Send + Sync {
    fn method(&self) -> VerifyMethod;
    fn verify(&self, response: &str) -> anyhow::Result<VerificationResult>;
}

/// Null-object verifier: "unconfigured" is a variant, not a conditional
/// scattered through call sites.
pub struct NoVerifier;

impl Verifier for NoVerifier {
    fn method(&self) -> VerifyMethod {
        VerifyMethod::None
    }

    fn verify(&self, _response: &str) -> anyhow::Result<VerificationResult> {
        Ok(VerificationResult::unverified())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_verifier_is_not_negative_evidence() {
        let v = NoVerifier.verify("anything").unwrap();
        assert!(v.is_substantive);
        assert_eq!(v.confidence, 1.0);
        assert_eq!(v.method, VerifyMethod::None);
    }

    #[test]
    fn method_tags_round_trip_snake_case() {
        let json = serde_json::to_string(&VerifyMethod::ErrorFallback).unwrap();
        assert_eq!(json, "\"error_fallback\"");
        let back: VerifyMethod = serde_json::from_str(&json).unwrap();
        assert_eq!(back, VerifyMethod::ErrorFallback);
    }
}
