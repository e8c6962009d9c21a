/// Startup failures.  Nothing that happens once the loop is running is an
/// error: every per-tick operation either succeeds or is a no-op.
use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum GameError {
    #[error("Unable to load sprite {path}: {source}")]
    Asset {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Sprite {0} contains no visible characters")]
    EmptySprite(PathBuf),
    #[error("Unable to read config {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed config: {0}")]
    ConfigParse(#[from] toml::de::Error),
    #[error("Invalid setting `{field}`: {reason}")]
    InvalidSettings {
        field: &'static str,
        reason: &'static str,
    },
    #[error("Terminal unavailable: {0}")]
    Terminal(#[source] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GameError>;
