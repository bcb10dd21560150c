use crate::error::SklmanError;
use crate::skills::TargetRole;
use anyhow::{Result, anyhow};
use directories::ProjectDirs;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const APP_NAME: &str = "sklman";
pub const ENV_CONFIG_DIR: &str = "SKLMAN_CONFIG_DIR";
pub const ENV_LIBRARY_DIR: &str = "SKLMAN_LIBRARY_DIR";
pub const ENV_GLOBAL_DIR: &str = "SKLMAN_GLOBAL_DIR";
pub const CONFIG_FILE: &str = "config.toml";

pub const DEFAULT_LIBRARY_DIR: &str = "dotfiles/skills";
pub const DEFAULT_GLOBAL_DIR: &str = ".agents/skills";
pub const DEFAULT_LOCAL_CANDIDATES: &[&str] = &[".agents/skills", ".claude/skills"];

pub fn resolve_config_dir(cli_override: Option<&Path>) -> Result<PathBuf> {
    let env_override = env::var(ENV_CONFIG_DIR).ok();
    resolve_config_dir_with(cli_override, env_override.as_deref())
}

pub fn resolve_config_dir_with(
    cli_override: Option<&Path>,
    env_override: Option<&str>,
) -> Result<PathBuf> {
    if let Some(path) = cli_override {
        validate_path_str(&path.to_string_lossy())
            .map_err(|e| anyhow!(t!("errors.invalid_config_dir", error = e)))?;
        return Ok(path.to_path_buf());
    }

    if let Some(env_config_dir) = env_override {
        validate_path_str(env_config_dir)
            .map_err(|e| anyhow!(t!("errors.invalid_config_dir_env", error = e)))?;
        return Ok(PathBuf::from(env_config_dir));
    }

    let project_dirs = ProjectDirs::from("", "", APP_NAME)
        .ok_or_else(|| anyhow!(t!("errors.not_find_config_dir")))?;
    Ok(project_dirs.config_dir().to_path_buf())
}

fn validate_path_str(path_str: &str) -> Result<(), String> {
    if path_str.trim().is_empty() {
        return Err("path cannot be empty or contain only whitespace".to_string());
    }
    Ok(())
}

#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub paths: PathsSection,
}

#[derive(Debug, Default, Deserialize)]
pub struct PathsSection {
    pub library: Option<String>,
    pub global: Option<String>,
    pub local_candidates: Option<Vec<String>>,
}

pub fn load_config_file(config_dir: &Path) -> Result<ConfigFile> {
    let path = config_dir.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(ConfigFile::default());
    }
    let content = fs::read_to_string(&path)?;
    let parsed = toml::from_str(&content).map_err(|e| {
        anyhow!(t!(
            "errors.config_parse_failed",
            path = path.display(),
            error = e
        ))
    })?;
    Ok(parsed)
}

/// Resolved filesystem layout: the canonical skill library plus the
/// directories that consume links into it.
#[derive(Clone, Debug)]
pub struct Workspace {
    pub library_dir: PathBuf,
    pub global_dir: PathBuf,
    pub local_dir: Option<PathBuf>,
}

#[derive(Debug, Default)]
pub struct WorkspaceOverrides {
    pub library_dir: Option<PathBuf>,
    pub global_dir: Option<PathBuf>,
}

impl Workspace {
    pub fn resolve(config_dir: &Path, overrides: &WorkspaceOverrides, cwd: &Path) -> Result<Self> {
        let file = load_config_file(config_dir)?;
        let home = dirs::home_dir().ok_or_else(|| anyhow!(t!("errors.no_home_dir")))?;

        let library_dir = resolve_dir(
            overrides.library_dir.as_deref(),
            ENV_LIBRARY_DIR,
            file.paths.library.as_deref(),
            home.join(DEFAULT_LIBRARY_DIR),
            &home,
        );
        let global_dir = resolve_dir(
            overrides.global_dir.as_deref(),
            ENV_GLOBAL_DIR,
            file.paths.global.as_deref(),
            home.join(DEFAULT_GLOBAL_DIR),
            &home,
        );

        let candidates = file
            .paths
            .local_candidates
            .unwrap_or_else(|| DEFAULT_LOCAL_CANDIDATES.iter().map(|s| s.to_string()).collect());
        let local_dir = candidates
            .iter()
            .map(|candidate| cwd.join(candidate))
            .find(|path| path.exists());

        Ok(Self {
            library_dir,
            global_dir,
            local_dir,
        })
    }

    pub fn target_dir(&self, role: TargetRole) -> Option<&Path> {
        match role {
            TargetRole::Global => Some(&self.global_dir),
            TargetRole::Local => self.local_dir.as_deref(),
        }
    }

    /// The global directory must be a real directory; a symlinked global
    /// directory would make every "link" land inside the library itself.
    pub fn ensure_global_dir_usable(&self) -> Result<()> {
        if let Ok(meta) = fs::symlink_metadata(&self.global_dir)
            && meta.file_type().is_symlink()
        {
            return Err(SklmanError::GlobalDirSymlink {
                path: self.global_dir.clone(),
            }
            .into());
        }
        Ok(())
    }
}

fn resolve_dir(
    cli_override: Option<&Path>,
    env_key: &str,
    file_value: Option<&str>,
    default: PathBuf,
    home: &Path,
) -> PathBuf {
    if let Some(path) = cli_override {
        return path.to_path_buf();
    }
    if let Ok(value) = env::var(env_key)
        && !value.trim().is_empty()
    {
        return expand_home(&value, home);
    }
    if let Some(value) = file_value {
        return expand_home(value, home);
    }
    default
}

fn expand_home(raw: &str, home: &Path) -> PathBuf {
    if raw == "~" {
        return home.to_path_buf();
    }
    if let Some(rest) = raw.strip_prefix("~/") {
        return home.join(rest);
    }
    PathBuf::from(raw)
}
