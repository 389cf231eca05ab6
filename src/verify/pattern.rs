// src/verify/pattern.rs
use regex::RegexSet;

use crate::config::VerifierCfg;
use crate::verify::verifier::{VerificationResult, Verifier, VerifyMethod};

/// Lightweight substantiveness check: scans for boilerplate stalling
/// phrases and enforces a minimum length. No signal means substantive.
pub struct PatternVerifier {
    cfg: VerifierCfg,
    patterns: RegexSet,
}

impl PatternVerifier {
    pub fn new(cfg: VerifierCfg) -> anyhow::Result<Self> {
        // literal phrases, matched case-insensitively anywhere in the text
        let escaped: Vec<String> = cfg
            .stall_patterns
            .iter()
            .map(|p| format!("(?i){}", regex::escape(p)))
            .collect();
        let patterns = RegexSet::new(&escaped)?;
        Ok(Self { cfg, patterns })
    }

    pub fn with_defaults() -> Self {
        // the default phrase list is valid by construction
        Self::new(VerifierCfg::default()).expect("default stall patterns compile")
    }

    fn detected_phrases(&self, response: &str) -> Vec<&str> {
        self.patterns
            .matches(response)
            .into_iter()
            .map(|i| self.cfg.stall_patterns[i].as_str())
            .collect()
    }
}

impl Verifier for PatternVerifier {
    fn method(&self) -> VerifyMethod {
        VerifyMethod::PatternMatching
    }

    fn verify(&self, response: &str) -> anyhow::Result<VerificationResult> {
        let trimmed = response.trim();

        if trimmed.len() < self.cfg.min_response_length {
            return Ok(VerificationResult {
                is_substantive: false,
                confidence: 0.9,
                method: VerifyMethod::PatternMatching,
                explanation: format!("Response too short ({} chars)", trimmed.len()),
            });
        }

        let hits = self.detected_phrases(trimmed);
        if !hits.is_empty() {
            let confidence = (0.6 + 0.1 * hits.len() as f32).min(0.9);
            return Ok(VerificationResult {
                is_substantive: false,
                confidence,
                method: VerifyMethod::PatternMatching,
                explanation: format!("Contains stalling phrases: {hits:?}"),
            });
        }

        Ok(VerificationResult {
            is_substantive: true,
            confidence: 0.7,
            method: VerifyMethod::PatternMatching,
            explanation: "No stalling phrases detected".to_string(),
        })
    }
}

/// Length-only heuristic. Coarser than pattern matching; kept as a cheap
/// swap-in where phrase lists are unavailable.
pub struct LengthVerifier;

impl Verifier for LengthVerifier {
    fn method(&self) -> VerifyMethod {
        VerifyMethod::LengthHeuristic
    }

    fn verify(&self, response: &str) -> anyhow::Result<VerificationResult> {
        let len = response.trim().len();
        let (is_substantive, confidence, label) = if len < 20 {
            (false, 0.8, "Very short response")
        } else if len < 100 {
            (true, 0.5, "Medium length response")
        } else {
            (true, 0.7, "Long response")
        };
        Ok(VerificationResult {
            is_substantive,
            confidence,
            method: VerifyMethod::LengthHeuristic,
            explanation: format!("{label} ({len} chars)"),
        })
    }
}
