use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Unknown type: {0}")]
    UnknownType(String),

    #[error("{0} is not a top-level type")]
    UnsupportedType(String),

    #[error("Illegal format: {0}")]
    UnsupportedFormat(String),

    #[error("{item_type} items take {expected} key(s), got {actual}")]
    ItemKeys {
        item_type: String,
        expected: usize,
        actual: usize,
    },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML deserialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("API error: {message}")]
    Api { message: String },
}

pub type Result<T> = std::result::Result<T, ImportError>;
