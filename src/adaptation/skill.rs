// src/adaptation/skill.rs
use std::time::Instant;

use anyhow::Result;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::adaptation::adapter::AdapterArtifact;
use crate::adaptation::examples::{extract_examples, validate_examples};
use crate::adaptation::loo::generate_training_data;
use crate::adaptation::trainer::{
    run_training, score_adaptation, SimulatedStepExecutor, TrainingStepExecutor,
};
use crate::config::AdaptationCfg;
use crate::skills::base::{SkillDeclaration, SkillModule};
use crate::uif::InterfaceRecord;

/// Outcome of one adaptation attempt. Immutable after creation; stored into
/// the record for downstream consumers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdaptationMetadata {
    pub training_steps: usize,
    pub convergence_score: f32,
    pub confidence_score: f32,
    pub adaptation_time: f64,
    pub examples_used: usize,
    pub adapter_rank: usize,
    pub final_loss: f32,
    pub early_stopped: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<String>,
}

impl AdaptationMetadata {
    fn fallback(reason: String) -> Self {
        Self {
            training_steps: 0,
            convergence_score: 0.0,
            confidence_score: 0.0,
            adaptation_time: 0.0,
            examples_used: 0,
            adapter_rank: 0,
            final_loss: f32::INFINITY,
            early_stopped: false,
            fallback_reason: Some(reason),
        }
    }
}

const DECLARATION: SkillDeclaration = SkillDeclaration {
    name: "test_time_adaptation",
    version: "1.0.0",
    description: "Adapts reasoning to a few-shot task by fitting a temporary low-rank adapter at inference time",
    category: "reasoning",
    required_inputs: &["few_shot_examples"],
    optional_inputs: &["test_query"],
    output_keys: &[
        "temporary_adapter",
        "adaptation_metadata",
        "adaptation_enabled",
        "fallback_to_icl",
    ],
    requires_external_access: false,
    requires_vetting: false,
    // each training step consumes the previous step's adapter state
    can_run_parallel: false,
    estimated_execution_secs: 2.0,
};

enum AdaptOutcome {
    Accepted {
        artifact: AdapterArtifact,
        metadata: AdaptationMetadata,
    },
    LowConfidence {
        confidence: f32,
    },
}

/// Test-time adaptation over few-shot examples.
///
/// State flow: Validating -> GeneratingTrainingData -> Training ->
/// Evaluating -> Accepted | FallbackIcl. Validation failure means the skill
/// simply does not run (`can_execute` false, no fallback state); every
/// failure after that point lands in FallbackIcl with a readable reason and
/// the record left fully consumable.
pub struct TestTimeAdaptation {
    cfg: AdaptationCfg,
}

impl TestTimeAdaptation {
    pub fn new(cfg: AdaptationCfg) -> Self {
        Self { cfg }
    }

    pub fn cfg(&self) -> &AdaptationCfg {
        &self.cfg
    }

    /// Same as `execute` but with an injected step executor and optional
    /// cancel channel; tests drive exact convergence paths through this.
    pub fn execute_with_executor(
        &self,
        rec: &mut InterfaceRecord,
        executor: &mut dyn TrainingStepExecutor,
        cancel: Option<&crossbeam_channel::Receiver<()>>,
    ) -> Result<()> {
        let start = Instant::now();

        if !self.can_execute(rec) {
            self.fallback_icl(rec, "failed adaptation validation checks".to_string());
            return Ok(());
        }

        match self.try_adapt(rec, executor, cancel, start) {
            Ok(AdaptOutcome::Accepted { artifact, metadata }) => {
                eprintln!(
                    "[adapt] accepted: confidence={:.3} steps={} time={:.2}s",
                    metadata.confidence_score, metadata.training_steps, metadata.adaptation_time
                );
                rec.set_typed("temporary_adapter", &artifact);
                rec.set_typed("adaptation_metadata", &metadata);
                rec.set("adaptation_enabled", Value::Bool(true));
            }
            Ok(AdaptOutcome::LowConfidence { confidence }) => {
                self.fallback_icl(rec, format!("low confidence: {confidence:.3}"));
            }
            Err(e) => {
                self.fallback_icl(rec, format!("internal error: {e:#}"));
            }
        }
        Ok(())
    }

    fn try_adapt(
        &self,
        rec: &InterfaceRecord,
        executor: &mut dyn TrainingStepExecutor,
        cancel: Option<&crossbeam_channel::Receiver<()>>,
        start: Instant,
    ) -> Result<AdaptOutcome> {
        // ---- GeneratingTrainingData ----
        let raw = rec
            .get("few_shot_examples")
            .and_then(Value::as_array)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("few_shot_examples vanished after validation"))?;
        let examples = extract_examples(&raw);
        let training_data = generate_training_data(&examples);
        eprintln!("[adapt] generated {} training instances", training_data.len());

        // ---- Training ----
        let report = run_training(&self.cfg, executor, cancel)?;

        // ---- Evaluating ----
        let (convergence_score, confidence_score) = score_adaptation(&self.cfg, &report);
        if confidence_score < self.cfg.confidence_threshold {
            return Ok(AdaptOutcome::LowConfidence {
                confidence: confidence_score,
            });
        }

        let mut rng = rand::rngs::StdRng::seed_from_u64(self.cfg.seed);
        let artifact =
            AdapterArtifact::simulated(self.cfg.adapter_rank, self.cfg.adapter_dim, &mut rng);

        let metadata = AdaptationMetadata {
            training_steps: report.steps,
            convergence_score,
            confidence_score,
            adaptation_time: start.elapsed().as_secs_f64(),
            examples_used: training_data.len(),
            adapter_rank: self.cfg.adapter_rank,
            final_loss: report.final_loss,
            early_stopped: report.early_stopped,
            fallback_reason: None,
        };

        Ok(AdaptOutcome::Accepted { artifact, metadata })
    }

    /// Terminal fallback: unmodified in-context reasoning downstream. The
    /// record always ends up valid here, whatever went wrong above.
    fn fallback_icl(&self, rec: &mut InterfaceRecord, reason: String) {
        eprintln!("[adapt] falling back to in-context reasoning: {reason}");
        let metadata = AdaptationMetadata::fallback(reason.clone());
        rec.set_typed("adaptation_metadata", &metadata);
        rec.set("adaptation_enabled", Value::Bool(false));
        rec.set("fallback_to_icl", Value::Bool(true));
        rec.add_warning(format!("adaptation fell back to in-context reasoning: {reason}"));
    }
}

impl SkillModule for TestTimeAdaptation {
    fn declaration(&self) -> &SkillDeclaration {
        &DECLARATION
    }

    fn can_execute(&self, rec: &InterfaceRecord) -> bool {
        // Validating state: all-or-nothing over the whole batch
        match rec.get("few_shot_examples").and_then(Value::as_array) {
            Some(raw) => validate_examples(raw, self.cfg.min_examples, self.cfg.max_examples),
            None => false,
        }
    }

    fn execute(&self, rec: &mut InterfaceRecord) -> Result<()> {
        let mut executor = SimulatedStepExecutor::new(self.cfg.seed);
        self.execute_with_executor(rec, &mut executor, None)
    }
}
