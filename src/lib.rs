pub mod adaptation;
pub mod config;
pub mod error;
pub mod reasoning;
pub mod skills;
pub mod trace;
pub mod uif;
pub mod verify;

pub use crate::adaptation::{AdaptationMetadata, AdapterArtifact, TestTimeAdaptation};
pub use crate::config::{load_config, PipelineConfig};
pub use crate::error::PipelineError;
pub use crate::reasoning::{
    ConfidenceJustification, ConfidenceJustifier, ConfidenceLevel, CritiqueLevel, EvidenceItem,
    EvidenceType, Profile, ReasoningContext, ReflectiveEngine, ReflectiveResult,
};
pub use crate::skills::{SkillDeclaration, SkillModule};
pub use crate::uif::InterfaceRecord;
pub use crate::verify::{
    LengthVerifier, NoVerifier, PatternVerifier, VerificationResult, Verifier, VerifyMethod,
};
