use af_entry::PinError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlowError {
    #[error("flow configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Pin(#[from] PinError),
}

pub type FlowResult<T> = Result<T, FlowError>;
