use crate::core::command::{CommandBuilder, CommandLine};
use crate::core::msa::MaxMsa;

pub const EXECUTABLE: &str = "colabfold_batch";

/// Structure prediction settings for `colabfold_batch`.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionParams {
    pub model_type: String,
    pub num_models: u32,
    pub num_recycles: u32,
    pub max_msa: Option<MaxMsa>,
    pub use_gpu: bool,
}

impl Default for PredictionParams {
    fn default() -> Self {
        Self {
            model_type: "auto".to_string(),
            num_models: 5,
            num_recycles: 3,
            max_msa: None,
            use_gpu: true,
        }
    }
}

/// `colabfold_batch <input> <output> --model-type .. --num-models .. --num-recycle .. [--max-msa ..]`
pub fn command(params: &PredictionParams, input: &str, output: &str) -> CommandLine {
    CommandBuilder::new(EXECUTABLE)
        .arg(input)
        .arg(output)
        .flag("--model-type", params.model_type.as_str())
        .flag("--num-models", params.num_models)
        .flag("--num-recycle", params.num_recycles)
        .opt_flag("--max-msa", params.max_msa.as_ref().map(ToString::to_string))
        .build()
}
