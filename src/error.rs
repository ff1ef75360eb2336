#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Could not read config file")]
    Io(#[from] std::io::Error),

    #[error("Invalid config")]
    Json(#[from] serde_json::Error),

    #[error("Invalid tag name `{0}`, expected `@name`")]
    InvalidTagName(String),
}
