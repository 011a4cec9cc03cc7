use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpeechError {
    #[error(
        "Speech credentials not found. Run 'pdf-audio login' or set {key_var} and {region_var}."
    )]
    MissingCredentials {
        key_var: &'static str,
        region_var: &'static str,
    },

    #[error("HTTP client error: {0}")]
    Http(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, SpeechError>;
