// src/adaptation/loo.rs
use crate::adaptation::examples::FewShotExample;

/// One held-out training instance: context prompt plus target completion.
#[derive(Debug, Clone)]
pub struct TrainingInstance {
    pub prompt: String,
    pub target: String,
    pub held_out_id: String,
}

/// Leave-One-Out generation: for N examples, N instances, each holding out
/// example i as the target while the remaining N-1 form the context prefix.
/// Every example serves as both context and held-out target exactly once,
/// which is what squeezes supervision out of a tiny example set.
pub fn generate_training_data(examples: &[FewShotExample]) -> Vec<TrainingInstance> {
    examples
        .iter()
        .enumerate()
        .map(|(i, held_out)| {
            let context: Vec<String> = examples
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(_, ex)| format!("Input: {}\nOutput: {}", ex.input_text, ex.output_text))
                .collect();

            TrainingInstance {
                prompt: format!(
                    "{}\n\nInput: {}\nOutput:",
                    context.join("\n\n"),
                    held_out.input_text
                ),
                target: held_out.output_text.clone(),
                held_out_id: held_out.example_id.clone(),
            }
        })
        .collect()
}
