// src/adaptation/adapter.rs
use std::path::Path;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// Opaque adaptation outcome: a low-rank parameter delta plus the rank and
/// scaling metadata needed to apply it. Downstream consumers treat the
/// weight vectors as payload; rank and scaling must survive save/load.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdapterArtifact {
    pub down: Vec<f32>, // rank x dim
    pub up: Vec<f32>,   // dim x rank
    pub rank: usize,
    pub dim: usize,
    pub scaling: f32,
}

impl AdapterArtifact {
    /// Simulated weights; the real loss-producing backend would fill these.
    pub fn simulated<R: Rng>(rank: usize, dim: usize, rng: &mut R) -> Self {
        let down = (0..rank * dim).map(|_| rng.gen_range(-0.05..0.05)).collect();
        let up = (0..dim * rank).map(|_| rng.gen_range(-0.05..0.05)).collect();
        Self { down, up, rank, dim, scaling: 0.1 }
    }

    pub fn save(&self, path: &Path) -> Result<(), PipelineError> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string(self)?;
        std::fs::write(path, json)?;
        eprintln!("[adapter] saved {}", path.display());
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, PipelineError> {
        let txt = std::fs::read_to_string(path)?;
        let artifact: AdapterArtifact = serde_json::from_str(&txt)?;
        if artifact.rank == 0 {
            return Err(PipelineError::Adapter(format!(
                "artifact at {} has zero rank",
                path.display()
            )));
        }
        Ok(artifact)
    }
}
