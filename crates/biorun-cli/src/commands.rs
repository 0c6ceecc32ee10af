pub mod benchmark;
pub mod colabfold;
pub mod foldseek;
pub mod proteinmpnn;

use biorun_core::engine::config::RuntimeConfig;
use biorun_core::engine::docker::DockerClient;
use biorun_core::engine::process::SystemRunner;

fn docker_client(runtime: &RuntimeConfig) -> DockerClient<SystemRunner> {
    DockerClient::new(SystemRunner, runtime.docker_binary.clone())
}

/// First non-empty line of a captured stream, for one-line failure summaries.
fn first_line(text: &str) -> &str {
    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_line_skips_blank_lines() {
        assert_eq!(first_line("\n  \nError: bad db\nmore"), "Error: bad db");
        assert_eq!(first_line(""), "");
    }
}
