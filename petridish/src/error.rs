use thiserror::Error;

/// everything that can go wrong while reading configuration.
/// the simulation itself never fails, only the values fed into it can.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {field}: {value:?}")]
    Invalid { field: &'static str, value: String },

    #[error("{field} must be {expected}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("unknown team: {0:?}")]
    UnknownTeam(String),

    #[error("unknown mutation: {0:?}")]
    UnknownMutation(String),

    #[error("could not read settings: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not parse settings: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
