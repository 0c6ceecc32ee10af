use crate::core::command::{CommandBuilder, CommandLine};

pub const INTERPRETER: &str = "python";
pub const RUN_SCRIPT: &str = "/app/protein_mpnn_run.py";

/// Model weights shipped with ProteinMPNN.
pub const MODEL_NAMES: [&str; 4] = ["v_48_002", "v_48_010", "v_48_020", "v_48_030"];

/// Chain selector meaning "design every chain".
pub const ALL_CHAINS: &str = "all";

/// Sequence design settings for `protein_mpnn_run.py`.
#[derive(Debug, Clone, PartialEq)]
pub struct DesignParams {
    pub chains: String,
    pub num_designs: u32,
    /// Passed through as given; ProteinMPNN accepts several space-separated temperatures.
    pub temperature: String,
    pub omit_aa: String,
    pub model_name: String,
    pub batch_size: u32,
    pub ca_only: bool,
    pub max_length: Option<u32>,
    pub seed: Option<u64>,
    pub save_score: Option<bool>,
    pub save_probs: Option<bool>,
}

impl Default for DesignParams {
    fn default() -> Self {
        Self {
            chains: ALL_CHAINS.to_string(),
            num_designs: 10,
            temperature: "0.1".to_string(),
            omit_aa: String::new(),
            model_name: "v_48_020".to_string(),
            batch_size: 1,
            ca_only: false,
            max_length: None,
            seed: None,
            save_score: None,
            save_probs: None,
        }
    }
}

impl DesignParams {
    /// The chain list to restrict design to, or `None` when every chain is designed.
    pub fn chain_restriction(&self) -> Option<&str> {
        let chains = self.chains.trim();
        if chains.is_empty() || chains.eq_ignore_ascii_case(ALL_CHAINS) {
            None
        } else {
            Some(chains)
        }
    }

    fn omitted_residues(&self) -> Option<&str> {
        Some(self.omit_aa.as_str()).filter(|aa| !aa.is_empty())
    }
}

/// `python /app/protein_mpnn_run.py --pdb_path .. [--pdb_path_chains ..] --out_folder .. ...`
pub fn command(params: &DesignParams, input: &str, output: &str) -> CommandLine {
    CommandBuilder::new(INTERPRETER)
        .arg(RUN_SCRIPT)
        .flag("--pdb_path", input)
        .opt_flag("--pdb_path_chains", params.chain_restriction())
        .flag("--out_folder", output)
        .flag("--num_seq_per_target", params.num_designs)
        .flag("--sampling_temp", params.temperature.as_str())
        .flag("--model_name", params.model_name.as_str())
        .flag("--batch_size", params.batch_size)
        .opt_flag("--omit_AAs", params.omitted_residues())
        .switch("--ca_only", params.ca_only)
        .opt_flag("--max_length", params.max_length)
        .opt_flag("--seed", params.seed)
        .opt_flag("--save_score", params.save_score.map(u8::from))
        .opt_flag("--save_probs", params.save_probs.map(u8::from))
        .build()
}

/// The reduced invocation used by the benchmark, which always pins the seed.
pub fn benchmark_command(
    num_sequences: u32,
    temperature: f64,
    seed: u64,
    input: &str,
    output: &str,
) -> CommandLine {
    CommandBuilder::new(INTERPRETER)
        .arg(RUN_SCRIPT)
        .flag("--pdb_path", input)
        .flag("--out_folder", output)
        .flag("--num_seq_per_target", num_sequences)
        .flag("--sampling_temp", temperature)
        .flag("--seed", seed)
        .build()
}
