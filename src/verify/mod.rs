pub mod pattern;
pub mod skill;
pub mod verifier;

pub use pattern::{LengthVerifier, PatternVerifier};
pub use skill::VerificationSkill;
pub use verifier::{NoVerifier, VerificationResult, Verifier, VerifyMethod};
