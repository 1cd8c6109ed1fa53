use std::env;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories_next::ProjectDirs;

pub const ENV_CONFIG_DIR: &str = "WAVETOOL_CONFIG_DIR";
pub const ENV_DATA_DIR: &str = "WAVETOOL_DATA_DIR";

const QUALIFIER: &str = "org";
const ORGANISATION: &str = "WaveTool";
const APPLICATION: &str = "wavetool";

const CONFIG_FILE: &str = "scene.toml";
const SHADER_DIR: &str = "shaders";

#[derive(Debug, Clone)]
pub struct AppPaths {
    config_dir: PathBuf,
    data_dir: PathBuf,
}

impl AppPaths {
    pub fn discover() -> Result<Self> {
        // Env overrides keep working where no home directory can be found.
        let project_dirs = ProjectDirs::from(QUALIFIER, ORGANISATION, APPLICATION);

        let config_dir = resolve_dir(
            ENV_CONFIG_DIR,
            project_dirs.as_ref().map(ProjectDirs::config_dir),
        )
        .context("failed to resolve wavetool config directory")?;
        let data_dir = resolve_dir(ENV_DATA_DIR, project_dirs.as_ref().map(ProjectDirs::data_dir))
            .context("failed to resolve wavetool data directory")?;

        Ok(Self {
            config_dir,
            data_dir,
        })
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE)
    }

    /// Default shader search roots, user config first.
    pub fn shader_roots(&self) -> Vec<PathBuf> {
        vec![
            self.config_dir.join(SHADER_DIR),
            self.data_dir.join(SHADER_DIR),
        ]
    }
}

#[cfg(test)]
impl AppPaths {
    pub fn from_raw(config_dir: PathBuf, data_dir: PathBuf) -> Self {
        Self {
            config_dir,
            data_dir,
        }
    }
}

fn resolve_dir(env_var: &str, default: Option<&Path>) -> Result<PathBuf> {
    if let Some(value) = env_override(env_var) {
        return Ok(value);
    }
    default
        .map(Path::to_path_buf)
        .ok_or_else(|| anyhow!("failed to determine user directories"))
}

fn env_override(name: &str) -> Option<PathBuf> {
    match env::var_os(name) {
        Some(value) if !value.is_empty() => Some(PathBuf::from(value)),
        _ => None,
    }
}
