use anyhow::Result as _Result;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
#[allow(dead_code)]
pub enum SklmanError {
    #[error("Usage Error: {message}")]
    Usage { message: String },

    #[error("Config Error: {message}")]
    Config { message: String },

    #[error("Remote Access Error: {message}")]
    RemoteAccess { message: String },

    #[error("Global skills directory is a symlink: {path}")]
    GlobalDirSymlink { path: PathBuf },

    #[error("Custom Error: {0}")]
    Custom(String),

    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Inquire Error: {0}")]
    Inquire(#[from] inquire::InquireError),

    #[error("JSON Parse Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML Parse Error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("HTTP Error: {0}")]
    Http(#[from] reqwest::Error),
}

impl SklmanError {
    pub fn display_localized(&self) -> String {
        match self {
            SklmanError::Usage { message } => t!("errors.usage", message = message).to_string(),
            SklmanError::Config { message } => {
                t!("errors.config_error", message = message).to_string()
            }
            SklmanError::RemoteAccess { message } => {
                t!("errors.remote_access", message = message).to_string()
            }
            SklmanError::GlobalDirSymlink { path } => {
                t!("errors.global_dir_symlink", path = path.display()).to_string()
            }
            _ => self.to_string(),
        }
    }
}

pub type Result<T> = _Result<T, SklmanError>;
