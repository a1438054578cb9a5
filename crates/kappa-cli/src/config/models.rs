use crate::input::InputFormat;
use kappa::engine::config as core_config;

pub struct AppConfig {
    pub core_config: core_config::AnalysisConfig,
    pub format: Option<InputFormat>,
    /// Whether the box side came from the user; otherwise file headers may supply it.
    pub box_size_explicit: bool,
    pub pattern: String,
    pub max_in_flight: Option<usize>,
}
