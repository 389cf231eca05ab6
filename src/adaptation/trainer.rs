// src/adaptation/trainer.rs
use anyhow::Result;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

use crate::config::AdaptationCfg;

/// Produces one loss value per training step. The production executor
/// simulates the loss curve; a real backend slots in here, and tests inject
/// fixed sequences to exercise convergence paths exactly.
pub trait TrainingStepExecutor {
    fn step(&mut self, step_idx: usize, prev_loss: Option<f32>) -> Result<f32>;
}

/// Seeded synthetic loss curve: exponential decay toward ~0.1 with gaussian
/// noise, the shape a small adapter fit typically traces.
pub struct SimulatedStepExecutor {
    rng: ChaCha8Rng,
    noise: Normal<f32>,
}

impl SimulatedStepExecutor {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            // sigma chosen small enough that the decay dominates
            noise: Normal::new(0.0, 0.1).expect("valid noise sigma"),
        }
    }
}

impl TrainingStepExecutor for SimulatedStepExecutor {
    fn step(&mut self, step_idx: usize, _prev_loss: Option<f32>) -> Result<f32> {
        let decay = 2.0 * (-0.5 * step_idx as f32).exp();
        let eta = self.noise.sample(&mut self.rng);
        Ok((decay + eta).max(0.1))
    }
}

/// Fixed loss sequence for tests.
pub struct FixedStepExecutor {
    losses: Vec<f32>,
    cursor: usize,
}

impl FixedStepExecutor {
    pub fn new(losses: Vec<f32>) -> Self {
        Self { losses, cursor: 0 }
    }
}

impl TrainingStepExecutor for FixedStepExecutor {
    fn step(&mut self, _step_idx: usize, _prev_loss: Option<f32>) -> Result<f32> {
        let loss = self
            .losses
            .get(self.cursor)
            .copied()
            .ok_or_else(|| anyhow::anyhow!("fixed loss sequence exhausted"))?;
        self.cursor += 1;
        Ok(loss)
    }
}

#[derive(Debug, Clone)]
pub struct TrainReport {
    pub steps: usize,
    pub losses: Vec<f32>,
    pub final_loss: f32,
    pub early_stopped: bool,
}

/// Run the sequential training loop. Each step consumes the previous loss,
/// so steps must never be parallelized. Convergence is declared once
/// `min_training_steps` have elapsed and the last improvement falls below
/// `convergence_threshold`; otherwise the loop runs to `max_training_steps`.
/// The optional cancel receiver is the caller-owned deadline: a signal
/// aborts the run, and the caller falls back exactly as on internal error.
pub fn run_training(
    cfg: &AdaptationCfg,
    executor: &mut dyn TrainingStepExecutor,
    cancel: Option<&crossbeam_channel::Receiver<()>>,
) -> Result<TrainReport> {
    let mut losses: Vec<f32> = Vec::with_capacity(cfg.max_training_steps);
    let mut early_stopped = false;

    for step in 0..cfg.max_training_steps {
        if let Some(rx) = cancel {
            if rx.try_recv().is_ok() {
                anyhow::bail!("deadline elapsed after {} steps", step);
            }
        }

        let prev = losses.last().copied();
        let loss = executor.step(step, prev)?;
        losses.push(loss);

        if step + 1 >= cfg.min_training_steps && losses.len() >= 2 {
            let improvement = losses[losses.len() - 2] - losses[losses.len() - 1];
            if improvement < cfg.convergence_threshold {
                early_stopped = true;
                eprintln!("[adapt] converged after {} steps (Δloss={improvement:.4})", step + 1);
                break;
            }
        }
    }

    let final_loss = losses.last().copied().unwrap_or(1.0);
    Ok(TrainReport {
        steps: losses.len(),
        losses,
        final_loss,
        early_stopped,
    })
}

/// Derive the adaptation quality scores from a finished run.
/// convergence_score = clamp((reference_loss - final_loss) / reference_loss, 0, 1);
/// the confidence multiplier rewards early convergence.
pub fn score_adaptation(cfg: &AdaptationCfg, report: &TrainReport) -> (f32, f32) {
    let convergence_score =
        ((cfg.reference_loss - report.final_loss) / cfg.reference_loss).clamp(0.0, 1.0);
    let multiplier = if report.early_stopped {
        cfg.early_stop_bonus
    } else {
        cfg.non_converged_penalty
    };
    (convergence_score, convergence_score * multiplier)
}
