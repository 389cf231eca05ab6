pub mod analysis;
pub mod critique;
pub mod justifier;
pub mod reflective;

pub use analysis::{analyze_response, EvidenceSource, ReasoningContext, ResponseAnalysis};
pub use critique::{CritiqueLevel, DimensionConflict, Finding};
pub use justifier::{
    ConfidenceJustification, ConfidenceJustifier, ConfidenceLevel, EvidenceItem, EvidenceType,
    Profile,
};
pub use reflective::{ReflectiveEngine, ReflectiveResult};
