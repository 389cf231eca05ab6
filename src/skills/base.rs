// src/skills/base.rs
use crate::uif::InterfaceRecord;

/// Static metadata every skill declares up front. The orchestrator reads
/// this for scheduling and key-conflict checks; nothing here is enforced at
/// runtime by the skill itself.
#[derive(Debug, Clone)]
pub struct SkillDeclaration {
    pub name: &'static str,
    pub version: &'static str,
    pub description: &'static str,
    pub category: &'static str,
    pub required_inputs: &'static [&'static str],
    pub optional_inputs: &'static [&'static str],
    pub output_keys: &'static [&'static str],
    pub requires_external_access: bool,
    pub requires_vetting: bool,
    pub can_run_parallel: bool,
    /// Scheduling/budgeting hint in seconds, not a hard timeout.
    pub estimated_execution_secs: f32,
}

pub trait SkillModule {
    fn declaration(&self) -> &SkillDeclaration;

    /// Pure eligibility predicate. Must not mutate the record and must
    /// return false (never panic) on missing or malformed inputs.
    fn can_execute(&self, rec: &InterfaceRecord) -> bool;

    /// Only invoked after `can_execute` returned true. Internal failures
    /// are recovered inside: the skill records a warning and represents the
    /// failure through its own output keys. `Err` is reserved for invariant
    /// breakage the orchestrator should treat as a bug, not a routine
    /// failure path.
    fn execute(&self, rec: &mut InterfaceRecord) -> anyhow::Result<()>;
}
