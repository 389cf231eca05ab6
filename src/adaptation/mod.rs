pub mod adapter;
pub mod examples;
pub mod loo;
pub mod skill;
pub mod trainer;

pub use adapter::AdapterArtifact;
pub use examples::FewShotExample;
pub use loo::TrainingInstance;
pub use skill::{AdaptationMetadata, TestTimeAdaptation};
pub use trainer::{SimulatedStepExecutor, TrainingStepExecutor};
