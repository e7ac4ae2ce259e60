use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} environment variable must be set")]
    MissingVar(&'static str),

    #[error("{name} has an invalid value: {reason}")]
    InvalidValue { name: &'static str, reason: String },
}
