use thiserror::Error;

#[derive(Error, Debug)]
/// Batch error
pub enum BatchError {
    #[error("ItemReader error: {0}")]
    ItemReader(String),

    #[error("ItemProcessor error: {0}")]
    ItemProcessor(String),

    #[error("ItemWriter error: {0}")]
    ItemWriter(String),

    #[error("ItemListener error: {0}")]
    ItemListener(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Step failed: {0}")]
    Step(String),
}
