use thiserror::Error;

#[derive(Error, Debug)]
/// Batch error
pub enum BatchError {
    #[error("ItemWriter from: {0}")]
    ItemWriter(String),

    #[error("ItemReader from: {0}")]
    ItemReader(String),

    #[error("ItemProcessor from: {0}")]
    ItemProcessor(String),

    /// A reader, processor or writer failed inside the named step.
    #[error("Step {name} failed: {source}")]
    Step {
        name: String,
        #[source]
        source: Box<BatchError>,
    },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Unit of work error: {0}")]
    Transaction(String),

    /// A host platform collaborator (accounts, identities, courses) failed.
    #[error("Platform error: {0}")]
    Platform(String),

    #[error("Error generating username for name {0}")]
    UsernameExhausted(String),

    /// Identity storage is not installed on the host, nothing was processed.
    #[error("Feature unavailable: {0}")]
    FeatureUnavailable(String),

    #[error("Invalid request: {}", .0.join(", "))]
    Validation(Vec<String>),
}

impl BatchError {
    /// Attaches an item failure to the step it happened in. Failures that
    /// already carry their own category are returned unchanged.
    pub(crate) fn in_step(self, name: &str) -> Self {
        match self {
            BatchError::ItemReader(_) | BatchError::ItemProcessor(_) | BatchError::ItemWriter(_) => {
                BatchError::Step {
                    name: name.to_string(),
                    source: Box::new(self),
                }
            }
            other => other,
        }
    }
}
