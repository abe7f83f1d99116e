use streamview_core::ConfigurationError;

#[derive(thiserror::Error, Debug)]
pub enum RuntimeError {
    #[error("failed to spawn {name} thread: {source}")]
    Spawn {
        name: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{0} thread exited before reporting ready")]
    Startup(String),
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}
