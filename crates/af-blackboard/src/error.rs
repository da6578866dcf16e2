use af_core::Name;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BlackboardError {
    #[error("schema {schema}: duplicate key {key}")]
    DuplicateKey { schema: Name, key: Name },

    #[error("schema {0}: key name must not be None")]
    EmptyKeyName(Name),

    #[error("schema {0}: too many keys")]
    TooManyKeys(Name),
}

pub type BlackboardResult<T> = Result<T, BlackboardError>;
