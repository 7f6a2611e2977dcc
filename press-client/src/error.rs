use thiserror::Error;

#[derive(Error, Debug)]
pub enum PressError {
    /// The backend answered with a non-success status or a `success: false` body.
    #[error("{message}")]
    Api {
        message: String,
        status_code: Option<u16>,
    },

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Failed to parse response: {0}")]
    Decode(String),

    #[error("Progress stream error: {0}")]
    Stream(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl PressError {
    /// Backend-reported failure without an HTTP status (a `success: false` body).
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Api {
            message: message.into(),
            status_code: None,
        }
    }

    /// HTTP status of a backend failure, if there was one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { status_code, .. } => *status_code,
            _ => None,
        }
    }

    /// Whether the request never produced a usable response.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Stream(_))
    }
}

impl From<reqwest::Error> for PressError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            PressError::Decode(e.to_string())
        } else {
            PressError::Transport(e.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, PressError>;
