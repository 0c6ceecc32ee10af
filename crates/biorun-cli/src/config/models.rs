use biorun_core::engine::config::RuntimeConfig;

/// Fully merged settings for one subcommand invocation.
#[derive(Debug, Clone)]
pub struct AppConfig<J> {
    pub runtime: RuntimeConfig,
    pub job: J,
}
