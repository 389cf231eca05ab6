// src/config.rs
use serde::Deserialize;

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct PipelineConfig {
    pub adaptation: AdaptationCfg,
    pub verifier: VerifierCfg,
    pub justifier: JustifierCfg,
    pub trace: TraceCfg,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct AdaptationCfg {
    pub adapter_rank: usize,
    pub adapter_dim: usize,
    pub max_training_steps: usize,
    pub min_training_steps: usize,
    pub learning_rate: f64,
    pub convergence_threshold: f32,
    pub confidence_threshold: f32,
    pub min_examples: usize,
    pub max_examples: usize,
    pub seed: u64,
    pub early_stop_bonus: f32,      // multiplier when training converged early
    pub non_converged_penalty: f32, // multiplier when it ran to max_steps
    pub reference_loss: f32,        // initial-loss scale used for convergence scoring
}

impl Default for AdaptationCfg {
    fn default() -> Self {
        Self {
            adapter_rank: 16,
            adapter_dim: 64,
            max_training_steps: 8,
            min_training_steps: 2,
            learning_rate: 1e-4,
            convergence_threshold: 0.01,
            confidence_threshold: 0.7,
            min_examples: 2,
            max_examples: 10,
            seed: 42,
            early_stop_bonus: 0.9,
            non_converged_penalty: 0.7,
            reference_loss: 2.0,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct VerifierCfg {
    pub min_response_length: usize,
    pub stall_patterns: Vec<String>,
}

impl Default for VerifierCfg {
    fn default() -> Self {
        Self {
            min_response_length: 10,
            stall_patterns: vec![
                "thought process:".to_string(),
                "let's solve this".to_string(),
                "solution:".to_string(),
                "step by step".to_string(),
                "let me think".to_string(),
                "i need to".to_string(),
            ],
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct JustifierCfg {
    pub profile: String,
}

impl Default for JustifierCfg {
    fn default() -> Self {
        Self { profile: "general".to_string() }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct TraceCfg {
    pub enabled: bool,
    pub dir: String,
}

impl Default for TraceCfg {
    fn default() -> Self {
        Self { enabled: true, dir: "data/trace".to_string() }
    }
}

pub fn load_config(path: &str) -> anyhow::Result<PipelineConfig> {
    let txt = std::fs::read_to_string(path)?;
    Ok(toml::from_str::<PipelineConfig>(&txt)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_usable() {
        let cfg = PipelineConfig::default();
        assert_eq!(cfg.adaptation.min_examples, 2);
        assert_eq!(cfg.adaptation.max_examples, 10);
        assert!(cfg.adaptation.confidence_threshold > 0.0);
        assert!(!cfg.verifier.stall_patterns.is_empty());
        assert_eq!(cfg.justifier.profile, "general");
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let cfg: PipelineConfig = toml::from_str(
            "[adaptation]\nmax_training_steps = 4\nseed = 7\n",
        )
        .unwrap();
        assert_eq!(cfg.adaptation.max_training_steps, 4);
        assert_eq!(cfg.adaptation.seed, 7);
        // untouched sections keep defaults
        assert_eq!(cfg.adaptation.min_training_steps, 2);
        assert_eq!(cfg.verifier.min_response_length, 10);
    }
}
