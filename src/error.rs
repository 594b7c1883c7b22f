use thiserror::Error;

/// Failure modes of a simulation run.
///
/// Configuration problems are rejected before the step loop starts; numerical
/// divergence and I/O failures abort the run where they happen. There is no
/// recovery path: a run either completes or dies with a diagnostic.
#[derive(Debug, Error)]
pub enum Error {
    /// Bad run parameters, caught by [`Config::validate`](crate::config::Config::validate).
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A parameter file could not be read or parsed.
    #[error("config file: {0}")]
    ConfigFile(#[from] confy::ConfyError),

    /// Non-finite position or velocity. Continuing would produce meaningless
    /// output, so the run stops at the first offending particle.
    #[error("simulation diverged at step {step}: non-finite state on particle {particle}")]
    Diverged { step: usize, particle: usize },

    /// The velocity-rescale radicand went negative or non-finite, which only
    /// happens when the system has heated catastrophically.
    #[error("thermostat scale undefined at step {step} (interval temperature {t_avg})")]
    ThermostatScale { step: usize, t_avg: f32 },

    /// Trajectory file write failed.
    #[error("trajectory output: {0}")]
    Io(#[from] std::io::Error),
}
