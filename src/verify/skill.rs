// src/verify/skill.rs
use anyhow::Result;
use serde_json::Value;

use crate::skills::base::{SkillDeclaration, SkillModule};
use crate::uif::InterfaceRecord;
use crate::verify::verifier::{VerificationResult, Verifier};

const DECLARATION: SkillDeclaration = SkillDeclaration {
    name: "substantiveness_verifier",
    version: "1.0.0",
    description: "Judges whether a candidate response is substantive or superficial",
    category: "reasoning",
    required_inputs: &["verification_response"],
    optional_inputs: &["verification_question", "verification_reference"],
    output_keys: &[
        "is_substantive",
        "verification_confidence",
        "verification_method",
        "verification_explanation",
    ],
    requires_external_access: false,
    requires_vetting: false,
    can_run_parallel: true,
    estimated_execution_secs: 2.0,
};

/// Skill adapter over any `Verifier`: reads the candidate response from the
/// record and writes the verdict fields back for downstream stages.
pub struct VerificationSkill {
    verifier: Box<dyn Verifier>,
}

impl VerificationSkill {
    pub fn new(verifier: Box<dyn Verifier>) -> Self {
        Self { verifier }
    }
}

impl SkillModule for VerificationSkill {
    fn declaration(&self) -> &SkillDeclaration {
        &DECLARATION
    }

    fn can_execute(&self, rec: &InterfaceRecord) -> bool {
        rec.get_str("verification_response")
            .map(|s| !s.trim().is_empty())
            .unwrap_or(false)
    }

    fn execute(&self, rec: &mut InterfaceRecord) -> Result<()> {
        let response = rec
            .get_str("verification_response")
            .unwrap_or_default()
            .to_string();

        // caught boundary: failure degrades, never escalates
        let verdict = match self.verifier.verify(&response) {
            Ok(v) => v,
            Err(e) => {
                rec.add_warning(format!("verifier failed, using fallback verdict: {e:#}"));
                VerificationResult::error_fallback(&format!("{e:#}"))
            }
        };

        rec.set("is_substantive", Value::Bool(verdict.is_substantive));
        rec.set("verification_confidence", Value::from(verdict.confidence as f64));
        rec.set("verification_method", Value::from(verdict.method.as_str()));
        rec.set("verification_explanation", Value::from(verdict.explanation));
        Ok(())
    }
}
