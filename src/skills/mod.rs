pub mod base;

pub use base::{SkillDeclaration, SkillModule};
